//! Mint and transfer messages, and their canonical byte encoding.
//!
//! The encoding is what gets signed, so it must be byte-for-byte
//! reproducible. JSON is avoided because field ordering and whitespace are
//! not guaranteed across serializers.
//!
//! ## Layout
//!
//! ```text
//! version       u16 LE
//! action        u32 LE length ‖ UTF-8 ("mint" | "transfer")
//! from          u32 LE length ‖ UTF-8
//! to            u32 LE length ‖ UTF-8
//! name          u32 LE length ‖ UTF-8
//! description   u32 LE length ‖ UTF-8
//! image_url     u32 LE length ‖ UTF-8
//! id            u32 LE length ‖ raw bytes (big-endian integer)
//! ```
//!
//! Every variable-length field is length-prefixed, so no two distinct
//! messages share an encoding.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::api::types::NftMetadata;
use crate::crypto::keys::{PublicKey, Signature};

/// Current encoding version.
pub const MESSAGE_VERSION: u16 = 1;

/// What the message asks the marketplace to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionAction {
    /// Create a new NFT and hand it to `to`.
    Mint,
    /// Move an existing NFT from `from` to `to`.
    Transfer,
}

impl fmt::Display for TransactionAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mint => write!(f, "mint"),
            Self::Transfer => write!(f, "transfer"),
        }
    }
}

/// The NFT being minted or moved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NftDescriptor {
    /// Sending address. For mints, the minting authority.
    pub from: String,
    /// Receiving address (usually a hex public key).
    pub to: String,
    /// Display metadata.
    pub metadata: NftMetadata,
    /// Identifier bytes, big-endian.
    pub id: Vec<u8>,
}

/// A mint or transfer request, unsigned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionMessage {
    pub version: u16,
    pub action: TransactionAction,
    pub nft: NftDescriptor,
}

impl TransactionMessage {
    pub fn new(action: TransactionAction, nft: NftDescriptor) -> Self {
        Self {
            version: MESSAGE_VERSION,
            action,
            nft,
        }
    }

    pub fn mint(nft: NftDescriptor) -> Self {
        Self::new(TransactionAction::Mint, nft)
    }

    pub fn transfer(nft: NftDescriptor) -> Self {
        Self::new(TransactionAction::Transfer, nft)
    }

    /// Canonical bytes covered by the signature. See the module docs for
    /// the layout.
    pub fn signable_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(128);

        buf.extend_from_slice(&self.version.to_le_bytes());
        put_field(&mut buf, self.action.to_string().as_bytes());
        put_field(&mut buf, self.nft.from.as_bytes());
        put_field(&mut buf, self.nft.to.as_bytes());
        put_field(&mut buf, self.nft.metadata.name.as_bytes());
        put_field(&mut buf, self.nft.metadata.description.as_bytes());
        put_field(&mut buf, self.nft.metadata.image_url.as_bytes());
        put_field(&mut buf, &self.nft.id);

        buf
    }
}

fn put_field(buf: &mut Vec<u8>, bytes: &[u8]) {
    buf.extend_from_slice(&(bytes.len() as u32).to_le_bytes());
    buf.extend_from_slice(bytes);
}

/// A message together with its detached signature and the key that made it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedTransaction {
    pub message: TransactionMessage,
    pub signer: PublicKey,
    pub signature: Signature,
}

impl SignedTransaction {
    /// `true` if `signature` is valid for `message` under `signer`.
    pub fn verify(&self) -> bool {
        self.signer
            .verify(&self.message.signable_bytes(), &self.signature)
    }
}
