//! # Identity
//!
//! The per-profile signing identity: a 32-byte seed in a [`KeyStore`], and
//! the [`IdentityHelper`] that creates it, derives its public key, and signs
//! with it.
//!
//! ```text
//! keystore.rs: KeyStore trait, in-memory and sled-backed stores
//! helper.rs  : get-or-create seed, public key, purchase requests, signing
//! ```

pub mod helper;
pub mod keystore;

pub use helper::{derive_public_key, sign_transaction_message, IdentityHelper};
pub use keystore::{KeyStore, MemoryKeyStore, SledKeyStore, StoreError, StoreResult};
