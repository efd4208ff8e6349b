//! # Detached Signatures
//!
//! Free-function wrappers over [`IdentityKeypair::sign`] and
//! [`PublicKey::verify`], plus a raw-bytes verifier for signatures that
//! arrive off the wire.
//!
//! Verification is strict (`ed25519-dalek` defaults) and never tells the
//! caller *why* a signature was rejected.

use ed25519_dalek::{Signature as DalekSignature, Verifier, VerifyingKey};
use thiserror::Error;

use super::keys::{IdentityKeypair, PublicKey, Signature};
use crate::config::{PUBLIC_KEY_LENGTH, SIGNATURE_LENGTH};

/// Errors during raw signature verification.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SignatureError {
    #[error("signature verification failed")]
    VerificationFailed,

    #[error("invalid public key")]
    InvalidPublicKey,
}

/// Sign `message` with `keypair`, producing a 64-byte detached signature.
///
/// # Example
///
/// ```
/// use pavilion_market::crypto::{sign, verify, IdentityKeypair};
///
/// let keypair = IdentityKeypair::generate();
/// let message = b"buy nft 66051";
/// let signature = sign(&keypair, message);
///
/// assert!(verify(&keypair.public_key(), message, &signature));
/// ```
pub fn sign(keypair: &IdentityKeypair, message: &[u8]) -> Signature {
    keypair.sign(message)
}

/// Verify a detached signature against a public key and message.
pub fn verify(public_key: &PublicKey, message: &[u8], signature: &Signature) -> bool {
    public_key.verify(message, signature)
}

/// Verify a signature given as raw byte arrays.
///
/// The "I got these bytes off the wire" variant: parses the public key,
/// then checks the signature.
pub fn verify_raw(
    public_key_bytes: &[u8; PUBLIC_KEY_LENGTH],
    message: &[u8],
    signature_bytes: &[u8; SIGNATURE_LENGTH],
) -> Result<(), SignatureError> {
    let verifying_key =
        VerifyingKey::from_bytes(public_key_bytes).map_err(|_| SignatureError::InvalidPublicKey)?;

    let signature = DalekSignature::from_bytes(signature_bytes);

    verifying_key
        .verify(message, &signature)
        .map_err(|_| SignatureError::VerificationFailed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_and_verify() {
        let kp = IdentityKeypair::generate();
        let msg = b"hello, marketplace";
        let sig = sign(&kp, msg);
        assert!(verify(&kp.public_key(), msg, &sig));
    }

    #[test]
    fn test_single_bit_flip_fails() {
        let kp = IdentityKeypair::generate();
        let mut msg = b"mint:alice:bob:66051".to_vec();
        let sig = sign(&kp, &msg);

        msg[3] ^= 0x01;
        assert!(!verify(&kp.public_key(), &msg, &sig));
    }

    #[test]
    fn test_deterministic_signatures() {
        let kp = IdentityKeypair::generate();
        let msg = b"determinism is underrated";
        assert_eq!(sign(&kp, msg), sign(&kp, msg));
    }

    #[test]
    fn test_verify_raw_roundtrip() {
        let kp = IdentityKeypair::generate();
        let msg = b"bytes go in, bytes come out";
        let sig = sign(&kp, msg);

        let mut sig_arr = [0u8; SIGNATURE_LENGTH];
        sig_arr.copy_from_slice(sig.as_bytes());
        assert!(verify_raw(kp.public_key().as_bytes(), msg, &sig_arr).is_ok());
        assert_eq!(
            verify_raw(kp.public_key().as_bytes(), b"other", &sig_arr),
            Err(SignatureError::VerificationFailed)
        );
    }

    #[test]
    fn test_verify_raw_with_zero_signature() {
        let kp = IdentityKeypair::generate();
        let sig = [0u8; SIGNATURE_LENGTH];
        assert!(verify_raw(kp.public_key().as_bytes(), b"doesn't matter", &sig).is_err());
    }

    #[test]
    fn test_empty_message() {
        let kp = IdentityKeypair::generate();
        let sig = sign(&kp, b"");
        assert!(verify(&kp.public_key(), b"", &sig));
    }
}
