//! # Cryptographic Primitives
//!
//! Thin, type-safe wrappers around `ed25519-dalek`. Nothing in here
//! implements curve arithmetic; key derivation and signing are delegated
//! wholesale to the library.

pub mod keys;
pub mod signatures;

pub use keys::{generate_seed, IdentityKeypair, IdentitySeed, KeyError, PublicKey, Signature};
pub use signatures::{sign, verify, verify_raw, SignatureError};
