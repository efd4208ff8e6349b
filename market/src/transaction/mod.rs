//! # Transaction Messages
//!
//! Signed mint and transfer payloads. The marketplace doesn't relay these
//! yet; they exist so the client can produce and check the exact bytes a
//! counterpart service will verify.
//!
//! ```text
//! message.rs: TransactionMessage, NftDescriptor, canonical encoding
//! signing.rs: sign_transaction / verify_transaction
//! ```

pub mod message;
pub mod signing;

pub use crate::api::types::NftMetadata;
pub use message::{
    NftDescriptor, SignedTransaction, TransactionAction, TransactionMessage, MESSAGE_VERSION,
};
pub use signing::{sign_transaction, verify_transaction};
