// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # Pavilion Market Client Library
//!
//! Everything a Pavilion front end needs to talk to the marketplace: a
//! per-profile Ed25519 identity, the signing helpers built on it, and thin
//! wrappers over the marketplace HTTP API.
//!
//! ## Architecture
//!
//! - **config**: Constants, endpoint paths, and [`ClientConfig`].
//! - **crypto**: Ed25519 keypair, public key, and signature types.
//! - **identity**: The identity seed, its [`KeyStore`], and the
//!   [`IdentityHelper`] that creates and uses it.
//! - **transaction**: Mint/transfer messages and their signatures.
//! - **api**: [`MarketClient`] and the request/response types.
//! - **error**: [`MarketError`], shared by all of the above.
//!
//! ## Quick tour
//!
//! ```no_run
//! use std::sync::Arc;
//! use pavilion_market::{ClientConfig, IdentityHelper, MarketClient, MemoryKeyStore};
//!
//! # async fn demo() -> Result<(), pavilion_market::MarketError> {
//! let identity = IdentityHelper::new(Arc::new(MemoryKeyStore::new()));
//! let client = MarketClient::new(ClientConfig::default())?;
//!
//! for listing in client.get_for_sale_nfts().await {
//!     println!("{}: {} {}", listing.nft.metadata.name, listing.price, listing.currency_symbol);
//! }
//!
//! let request = client.try_purchase(&identity, &[1, 2, 3], "addr1").await?;
//! let paid = client.check_payment(&request.nft_id).await;
//! # let _ = paid;
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod config;
pub mod crypto;
pub mod error;
pub mod identity;
pub mod transaction;

pub use api::{MarketClient, MenuItem, NftListing, NftMetadata, NftRecord, PurchaseRequest};
pub use config::ClientConfig;
pub use error::{MarketError, MarketResult};
pub use identity::{IdentityHelper, KeyStore, MemoryKeyStore, SledKeyStore, StoreError};
