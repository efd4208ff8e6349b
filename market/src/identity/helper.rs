//! # Identity Helper
//!
//! Owns the one piece of long-lived state in the client: the identity seed.
//!
//! The seed is created lazily on first use, persisted through the injected
//! [`KeyStore`] as a JSON array of byte values, and read back byte-for-byte
//! on every later call. Public keys and signatures are recomputed from it on
//! demand and never stored.
//!
//! ## Concurrency
//!
//! The read-generate-write sequence runs under `init_lock`, so two callers
//! sharing one helper can never mint two different seeds. Two *processes*
//! sharing one store still can; nobody runs two profiles' first launch at
//! the same instant, and we don't try to coordinate across processes.

use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::keystore::{KeyStore, StoreError};
use crate::api::types::{nft_id_to_decimal, PurchaseRequest};
use crate::config::IDENTITY_STORAGE_KEY;
use crate::crypto::keys::{
    generate_seed, seed_from_slice, IdentityKeypair, IdentitySeed, PublicKey, Signature,
};
use crate::error::MarketResult;
use crate::transaction::{sign_transaction, SignedTransaction, TransactionMessage};

/// Derive the public key for `seed`. Pure; same seed, same key, every time.
pub fn derive_public_key(seed: &IdentitySeed) -> PublicKey {
    IdentityKeypair::from_seed(seed).public_key()
}

/// Produce a 64-byte detached signature over already-encoded message bytes.
pub fn sign_transaction_message(message: &[u8], seed: &IdentitySeed) -> Signature {
    IdentityKeypair::from_seed(seed).sign(message)
}

/// Key & transaction helper bound to one [`KeyStore`].
pub struct IdentityHelper {
    store: Arc<dyn KeyStore>,
    storage_key: String,
    init_lock: Mutex<()>,
}

impl IdentityHelper {
    /// A helper keeping its seed under [`IDENTITY_STORAGE_KEY`].
    pub fn new(store: Arc<dyn KeyStore>) -> Self {
        Self::with_storage_key(store, IDENTITY_STORAGE_KEY)
    }

    /// A helper keeping its seed under a custom key. Handy when several
    /// identities share one store.
    pub fn with_storage_key(store: Arc<dyn KeyStore>, storage_key: impl Into<String>) -> Self {
        Self {
            store,
            storage_key: storage_key.into(),
            init_lock: Mutex::new(()),
        }
    }

    /// The key this helper reads and writes.
    pub fn storage_key(&self) -> &str {
        &self.storage_key
    }

    /// Returns the persisted seed, creating and persisting one if the store
    /// is empty.
    ///
    /// # Errors
    ///
    /// [`MarketError::Storage`](crate::MarketError::Storage) if the store
    /// fails or holds something that isn't a 32-byte seed. Nothing is
    /// generated in that case.
    pub fn try_identity_seed(&self) -> MarketResult<IdentitySeed> {
        let _guard = self.init_lock.lock();

        if let Some(seed) = self.load_seed()? {
            return Ok(seed);
        }

        let seed = generate_seed();
        self.store_seed(&seed)?;
        info!(public_key = %derive_public_key(&seed), "generated new identity seed");
        Ok(seed)
    }

    /// Like [`try_identity_seed`](Self::try_identity_seed), but never fails.
    ///
    /// An unreadable store is logged and treated as empty, so a fresh seed is
    /// generated. If that seed can't be persisted either, the failure is
    /// logged and the seed is returned anyway; the next call will generate
    /// yet another one.
    pub fn identity_seed(&self) -> IdentitySeed {
        let _guard = self.init_lock.lock();

        match self.load_seed() {
            Ok(Some(seed)) => return seed,
            Ok(None) => {}
            Err(e) => warn!(error = %e, "could not read identity seed, generating a new one"),
        }

        let seed = generate_seed();
        if let Err(e) = self.store_seed(&seed) {
            warn!(error = %e, "could not persist identity seed");
        }
        info!(public_key = %derive_public_key(&seed), "generated new identity seed");
        seed
    }

    /// The identity keypair, or a storage error.
    pub fn try_keypair(&self) -> MarketResult<IdentityKeypair> {
        Ok(IdentityKeypair::from_seed(&self.try_identity_seed()?))
    }

    /// The identity's public key, computed from the (possibly fresh) seed.
    pub fn public_key(&self) -> PublicKey {
        derive_public_key(&self.identity_seed())
    }

    /// Assemble the body of a `POST /buy-nft/` call.
    ///
    /// `nft_id` is the listing's big-endian identifier bytes; it is sent as a
    /// decimal string. The local identity's hex public key becomes
    /// `nft_receiver`.
    ///
    /// # Errors
    ///
    /// `InvalidInput` for an empty or oversized id, `Storage` if the identity
    /// can't be loaded.
    pub fn build_purchase_request(
        &self,
        nft_id: &[u8],
        payment_sender: &str,
    ) -> MarketResult<PurchaseRequest> {
        let nft_id = nft_id_to_decimal(nft_id)?;
        let receiver = derive_public_key(&self.try_identity_seed()?);
        debug!(%nft_id, payment_sender, "built purchase request");

        Ok(PurchaseRequest {
            nft_id,
            payment_sender: payment_sender.to_string(),
            nft_receiver: receiver.to_hex(),
        })
    }

    /// Sign a mint or transfer message with the local identity.
    pub fn sign_transaction(&self, message: TransactionMessage) -> MarketResult<SignedTransaction> {
        let keypair = self.try_keypair()?;
        Ok(sign_transaction(message, &keypair))
    }

    fn load_seed(&self) -> Result<Option<IdentitySeed>, StoreError> {
        let Some(raw) = self.store.get(&self.storage_key)? else {
            return Ok(None);
        };

        let bytes: Vec<u8> = serde_json::from_slice(&raw)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        let seed = seed_from_slice(&bytes).map_err(|e| StoreError::Corrupt {
            key: self.storage_key.clone(),
            reason: e.to_string(),
        })?;
        Ok(Some(seed))
    }

    fn store_seed(&self, seed: &IdentitySeed) -> Result<(), StoreError> {
        let json =
            serde_json::to_vec(seed.as_slice()).map_err(|e| StoreError::Serialization(e.to_string()))?;
        self.store.set(&self.storage_key, &json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::keystore::{MemoryKeyStore, StoreResult};
    use crate::transaction::{NftDescriptor, NftMetadata};
    use crate::MarketError;

    /// A store whose every operation fails.
    struct BrokenStore;

    impl KeyStore for BrokenStore {
        fn get(&self, _key: &str) -> StoreResult<Option<Vec<u8>>> {
            Err(StoreError::Serialization("store unavailable".into()))
        }

        fn set(&self, _key: &str, _value: &[u8]) -> StoreResult<()> {
            Err(StoreError::Serialization("store unavailable".into()))
        }
    }

    fn helper() -> (Arc<MemoryKeyStore>, IdentityHelper) {
        let store = Arc::new(MemoryKeyStore::new());
        let helper = IdentityHelper::new(store.clone());
        (store, helper)
    }

    #[test]
    fn seed_is_stable_across_calls() {
        let (_, helper) = helper();
        let first = helper.identity_seed();
        let second = helper.identity_seed();
        assert_eq!(first, second);
        assert_eq!(helper.try_identity_seed().unwrap(), first);
    }

    #[test]
    fn seed_is_persisted_as_json_array() {
        let (store, helper) = helper();
        let seed = helper.identity_seed();

        let raw = store.get(IDENTITY_STORAGE_KEY).unwrap().unwrap();
        let stored: Vec<u8> = serde_json::from_slice(&raw).unwrap();
        assert_eq!(stored, seed.to_vec());
    }

    #[test]
    fn second_helper_on_same_store_sees_same_seed() {
        let (store, helper) = helper();
        let seed = helper.identity_seed();
        let other = IdentityHelper::new(store);
        assert_eq!(other.identity_seed(), seed);
    }

    #[test]
    fn clearing_store_yields_new_seed() {
        let (store, helper) = helper();
        let before = helper.identity_seed();
        store.clear();
        assert_ne!(helper.identity_seed(), before);
    }

    #[test]
    fn custom_storage_keys_are_independent() {
        let store = Arc::new(MemoryKeyStore::new());
        let alice = IdentityHelper::with_storage_key(store.clone(), "alice");
        let bob = IdentityHelper::with_storage_key(store.clone(), "bob");
        assert_ne!(alice.identity_seed(), bob.identity_seed());
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn corrupt_entry_is_a_storage_error() {
        let (store, helper) = helper();
        store.set(IDENTITY_STORAGE_KEY, b"[1,2,3]").unwrap();

        let err = helper.try_identity_seed().unwrap_err();
        assert!(err.is_storage());
    }

    #[test]
    fn corrupt_entry_falls_back_to_regeneration() {
        let (store, helper) = helper();
        store.set(IDENTITY_STORAGE_KEY, b"not json").unwrap();

        let seed = helper.identity_seed();
        // The fresh seed overwrote the garbage.
        assert_eq!(helper.try_identity_seed().unwrap(), seed);
    }

    #[test]
    fn broken_store_surfaces_storage_error() {
        let helper = IdentityHelper::new(Arc::new(BrokenStore));
        assert!(matches!(
            helper.try_identity_seed(),
            Err(MarketError::Storage(_))
        ));
    }

    #[test]
    fn broken_store_fallback_still_returns_a_seed() {
        let helper = IdentityHelper::new(Arc::new(BrokenStore));
        let seed = helper.identity_seed();
        assert_eq!(seed.len(), 32);
    }

    #[test]
    fn derive_public_key_is_pure() {
        let seed = [9u8; 32];
        assert_eq!(derive_public_key(&seed), derive_public_key(&seed));
        assert_ne!(derive_public_key(&seed), derive_public_key(&[8u8; 32]));
    }

    #[test]
    fn public_key_matches_seed() {
        let (_, helper) = helper();
        let seed = helper.identity_seed();
        assert_eq!(helper.public_key(), derive_public_key(&seed));
    }

    #[test]
    fn purchase_request_encodes_id_as_decimal() {
        let (_, helper) = helper();
        let request = helper.build_purchase_request(&[1, 2, 3], "addr1").unwrap();

        assert_eq!(request.nft_id, "66051");
        assert_eq!(request.payment_sender, "addr1");
        assert_eq!(request.nft_receiver.len(), 64);
        assert!(request.nft_receiver.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(request.nft_receiver, helper.public_key().to_hex());
    }

    #[test]
    fn purchase_request_accepts_zero_padded_id() {
        let (_, helper) = helper();
        let mut padded = vec![0u8; 33];
        padded.push(1);

        let request = helper.build_purchase_request(&padded, "addr1").unwrap();
        assert_eq!(request.nft_id, "1");
    }

    #[test]
    fn purchase_request_rejects_empty_id() {
        let (_, helper) = helper();
        let err = helper.build_purchase_request(&[], "addr1").unwrap_err();
        assert!(matches!(err, MarketError::InvalidInput(_)));
    }

    #[test]
    fn purchase_request_propagates_storage_failure() {
        let helper = IdentityHelper::new(Arc::new(BrokenStore));
        let err = helper.build_purchase_request(&[1], "addr1").unwrap_err();
        assert!(err.is_storage());
    }

    #[test]
    fn signature_verifies_and_mutation_breaks_it() {
        let seed = [3u8; 32];
        let mut message = b"transfer:alice:bob:66051".to_vec();
        let signature = sign_transaction_message(&message, &seed);
        let public_key = derive_public_key(&seed);

        assert_eq!(signature.as_bytes().len(), 64);
        assert!(public_key.verify(&message, &signature));

        message[0] ^= 0x80;
        assert!(!public_key.verify(&message, &signature));
    }

    #[test]
    fn helper_signs_transaction_messages() {
        let (_, helper) = helper();
        let message = TransactionMessage::mint(NftDescriptor {
            from: "market".into(),
            to: helper.public_key().to_hex(),
            metadata: NftMetadata::default(),
            id: vec![0x01, 0x00],
        });

        let signed = helper.sign_transaction(message).unwrap();
        assert_eq!(signed.signer, helper.public_key());
        assert!(signed.verify());
    }
}
