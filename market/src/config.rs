//! # Client Configuration & Constants
//!
//! Every magic number in the Pavilion client lives here: storage keys,
//! endpoint paths, key sizes, and the demo pricing the marketplace currently
//! attaches to every listing.
//!
//! Runtime-tunable values (where the API lives, how long to wait for it) are
//! grouped in [`ClientConfig`]. Everything else is a constant, because the
//! remote service treats these paths as fixed and so do we.

use serde::{Deserialize, Serialize};
use std::time::Duration;

// ---------------------------------------------------------------------------
// Identity Storage
// ---------------------------------------------------------------------------

/// Key under which the identity seed is persisted in the [`KeyStore`].
///
/// Changing this orphans every existing identity, so don't.
///
/// [`KeyStore`]: crate::identity::KeyStore
pub const IDENTITY_STORAGE_KEY: &str = "pavilion.identity_seed";

/// Name of the sled tree that holds identity entries on disk.
pub const IDENTITY_TREE: &str = "identity";

// ---------------------------------------------------------------------------
// Cryptographic Parameters
// ---------------------------------------------------------------------------

/// Ed25519 seed length. The seed *is* the secret key.
pub const SEED_LENGTH: usize = 32;

/// Public (verifying) key length in bytes.
pub const PUBLIC_KEY_LENGTH: usize = 32;

/// Detached Ed25519 signature length. Always 64 bytes.
pub const SIGNATURE_LENGTH: usize = 64;

/// Most significant bytes an NFT identifier may carry (U256). Leading zero
/// bytes don't count.
pub const MAX_NFT_ID_LENGTH: usize = 32;

// ---------------------------------------------------------------------------
// Marketplace API
// ---------------------------------------------------------------------------

/// Where the marketplace service listens when nobody says otherwise.
pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8000";

/// `GET`: every NFT currently listed for sale.
pub const LISTED_NFTS_PATH: &str = "/listed-nfts/";

/// `POST`: submit a purchase request.
pub const BUY_NFT_PATH: &str = "/buy-nft/";

/// `GET {path}{nft_id}`: 2xx once the payment for `nft_id` has landed.
pub const CHECK_PAYMENT_PATH: &str = "/check-payment/";

/// How long [`wait_for_payment`] keeps polling by default.
///
/// [`wait_for_payment`]: crate::api::MarketClient::wait_for_payment
pub const PAYMENT_POLL_TIMEOUT: Duration = Duration::from_secs(60);

/// Pause between payment checks.
pub const PAYMENT_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Shortest pause between payment checks. Smaller intervals are raised to
/// this.
pub const MIN_PAYMENT_POLL_INTERVAL: Duration = Duration::from_millis(100);

// ---------------------------------------------------------------------------
// Demo Pricing
// ---------------------------------------------------------------------------

/// Price attached to every listing until the service starts returning real
/// prices.
pub const DEMO_PRICE: u64 = 10;

/// Currency symbol attached to every listing.
pub const DEMO_CURRENCY_SYMBOL: &str = "PVL";

// ---------------------------------------------------------------------------
// ClientConfig
// ---------------------------------------------------------------------------

/// Runtime settings for [`MarketClient`](crate::api::MarketClient).
///
/// The default points at a local service with no request timeout, which is
/// how the marketplace front end has always behaved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL of the marketplace API, without a trailing slash.
    pub base_url: String,

    /// Optional per-request timeout. `None` waits as long as the transport
    /// allows.
    pub timeout: Option<Duration>,
}

impl ClientConfig {
    /// Config for a service at `base_url`. Trailing slashes are stripped so
    /// path constants can be appended verbatim.
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            timeout: None,
        }
    }

    /// Sets a per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Joins an endpoint path onto the base URL.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_API_URL)
    }
}
