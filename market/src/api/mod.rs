//! # Marketplace API
//!
//! Thin wrappers over the marketplace's HTTP endpoints, plus the static
//! navigation menu.
//!
//! ```text
//! types.rs : NftRecord, NftListing, PurchaseRequest, id encoding
//! client.rs: MarketClient: listings, purchases, payment checks
//! menu.rs  : navigation menu
//! ```

pub mod client;
pub mod menu;
pub mod types;

pub use client::MarketClient;
pub use menu::{navigation_menu, MenuItem};
pub use types::{nft_id_to_decimal, NftListing, NftMetadata, NftRecord, PurchaseRequest};
