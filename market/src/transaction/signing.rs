//! Transaction signing with identity keypairs.
//!
//! Signing is a separate step from building because the keypair lives
//! behind the [`IdentityHelper`](crate::identity::IdentityHelper) and may
//! not be loaded when the message is assembled.

use super::message::{SignedTransaction, TransactionMessage};
use crate::crypto::keys::IdentityKeypair;

/// Signs `message` with `keypair`, attaching the detached signature and the
/// signer's public key.
///
/// # Example
///
/// ```
/// use pavilion_market::crypto::IdentityKeypair;
/// use pavilion_market::transaction::{sign_transaction, NftDescriptor, TransactionMessage};
///
/// let keypair = IdentityKeypair::generate();
/// let message = TransactionMessage::transfer(NftDescriptor {
///     from: keypair.public_key().to_hex(),
///     to: "buyer".into(),
///     metadata: Default::default(),
///     id: vec![0x2a],
/// });
///
/// let signed = sign_transaction(message, &keypair);
/// assert!(signed.verify());
/// ```
pub fn sign_transaction(message: TransactionMessage, keypair: &IdentityKeypair) -> SignedTransaction {
    let signature = keypair.sign(&message.signable_bytes());
    SignedTransaction {
        message,
        signer: keypair.public_key(),
        signature,
    }
}

/// Checks a signed transaction. Same as [`SignedTransaction::verify`].
pub fn verify_transaction(signed: &SignedTransaction) -> bool {
    signed.verify()
}
