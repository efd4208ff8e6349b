//! HTTP client for the marketplace API.
//!
//! Each call comes in two flavors:
//!
//! - `try_*` returns `Result<_, MarketError>` so callers can tell "no
//!   results" from "request failed".
//! - the unprefixed form swallows the error (after logging it) and returns
//!   the same default the marketplace front end has always shown: an empty
//!   list, `false`, or nothing.

use reqwest::{Client, Response, Url};
use std::time::Duration;
use tokio::time::{sleep, Instant};
use tracing::{debug, info, warn};

use super::menu::{navigation_menu, MenuItem};
use super::types::{NftListing, NftRecord, PurchaseRequest};
use crate::config::{
    ClientConfig, BUY_NFT_PATH, CHECK_PAYMENT_PATH, LISTED_NFTS_PATH, MIN_PAYMENT_POLL_INTERVAL,
};
use crate::error::{MarketError, MarketResult};
use crate::identity::IdentityHelper;

/// Client for the marketplace service.
#[derive(Debug, Clone)]
pub struct MarketClient {
    http: Client,
    config: ClientConfig,
    payment_base: Url,
}

impl MarketClient {
    /// Build a client from `config`.
    ///
    /// # Errors
    ///
    /// `Config` if `base_url` is not an absolute http(s)-style URL that can
    /// carry a path.
    pub fn new(config: ClientConfig) -> MarketResult<Self> {
        let payment_base = parse_base(&config.endpoint(CHECK_PAYMENT_PATH))?;

        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            http: builder.build()?,
            config,
            payment_base,
        })
    }

    /// The config this client was built with.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    // -- Listings -----------------------------------------------------------

    /// Every NFT listed for sale, priced with the demo price and currency.
    pub async fn try_get_for_sale_nfts(&self) -> MarketResult<Vec<NftListing>> {
        let url = self.config.endpoint(LISTED_NFTS_PATH);
        debug!(%url, "fetching listed nfts");

        let response = ensure_success(self.http.get(&url).send().await?)?;
        let records: Vec<NftRecord> = response.json().await?;
        Ok(records.into_iter().map(NftListing::from).collect())
    }

    /// [`try_get_for_sale_nfts`](Self::try_get_for_sale_nfts), or `[]` on
    /// any failure.
    pub async fn get_for_sale_nfts(&self) -> Vec<NftListing> {
        self.try_get_for_sale_nfts().await.unwrap_or_else(|e| {
            warn!(error = %e, "failed to fetch listed nfts");
            Vec::new()
        })
    }

    // -- Purchases ----------------------------------------------------------

    /// Submit a purchase request. The response body is ignored.
    pub async fn try_buy_nft(&self, request: &PurchaseRequest) -> MarketResult<()> {
        let url = self.config.endpoint(BUY_NFT_PATH);
        debug!(%url, nft_id = %request.nft_id, "submitting purchase");

        ensure_success(self.http.post(&url).json(request).send().await?)?;
        Ok(())
    }

    /// [`try_buy_nft`](Self::try_buy_nft), logging instead of failing.
    pub async fn buy_nft(&self, request: &PurchaseRequest) {
        if let Err(e) = self.try_buy_nft(request).await {
            warn!(error = %e, nft_id = %request.nft_id, "purchase request failed");
        }
    }

    /// Build a purchase request with `identity` and submit it.
    ///
    /// Returns the request that was sent, so the caller can poll
    /// [`check_payment`](Self::check_payment) with its `nft_id`.
    pub async fn try_purchase(
        &self,
        identity: &IdentityHelper,
        nft_id: &[u8],
        payment_sender: &str,
    ) -> MarketResult<PurchaseRequest> {
        let request = identity.build_purchase_request(nft_id, payment_sender)?;
        self.try_buy_nft(&request).await?;
        Ok(request)
    }

    // -- Payments -----------------------------------------------------------

    /// Whether the payment for `nft_id` (decimal) has been received.
    ///
    /// The service answers with a status code only: 2xx is paid, anything
    /// else is not. Only transport failures are errors.
    pub async fn try_check_payment(&self, nft_id: &str) -> MarketResult<bool> {
        let url = self.payment_url(nft_id)?;
        debug!(%url, "checking payment");

        let response = self.http.get(url).send().await?;
        Ok(response.status().is_success())
    }

    /// [`try_check_payment`](Self::try_check_payment), or `false` on any
    /// failure.
    pub async fn check_payment(&self, nft_id: &str) -> bool {
        self.try_check_payment(nft_id).await.unwrap_or_else(|e| {
            warn!(error = %e, nft_id, "payment check failed");
            false
        })
    }

    /// Poll [`check_payment`](Self::check_payment) every `interval` until it
    /// reports paid or `timeout` elapses. Returns the last answer.
    ///
    /// `interval` is raised to [`MIN_PAYMENT_POLL_INTERVAL`]. A `timeout` too
    /// large to represent as a deadline means polling until paid.
    pub async fn wait_for_payment(
        &self,
        nft_id: &str,
        timeout: Duration,
        interval: Duration,
    ) -> bool {
        let interval = interval.max(MIN_PAYMENT_POLL_INTERVAL);
        let deadline = Instant::now().checked_add(timeout);
        loop {
            if self.check_payment(nft_id).await {
                info!(nft_id, "payment received");
                return true;
            }
            if let Some(deadline) = deadline {
                let next_check = Instant::now().checked_add(interval);
                if next_check.map_or(true, |next| next > deadline) {
                    debug!(nft_id, "gave up waiting for payment");
                    return false;
                }
            }
            sleep(interval).await;
        }
    }

    fn payment_url(&self, nft_id: &str) -> MarketResult<Url> {
        let mut url = self.payment_base.clone();
        url.path_segments_mut()
            .map_err(|_| {
                MarketError::Config(format!("api url {} cannot hold a path", self.payment_base))
            })?
            .pop_if_empty()
            .push(nft_id);
        Ok(url)
    }

    // -- Menu ---------------------------------------------------------------

    /// The navigation menu. Static, so this never touches the network.
    pub async fn get_menu(&self) -> Vec<MenuItem> {
        navigation_menu().to_vec()
    }
}

/// Parse an endpoint URL, rejecting anything that can't take path segments.
fn parse_base(endpoint: &str) -> MarketResult<Url> {
    let url = Url::parse(endpoint)
        .map_err(|e| MarketError::Config(format!("bad api url {endpoint}: {e}")))?;
    if url.cannot_be_a_base() {
        return Err(MarketError::Config(format!(
            "api url {endpoint} cannot hold a path"
        )));
    }
    Ok(url)
}

/// Turn a non-2xx response into [`MarketError::HttpStatus`].
fn ensure_success(response: Response) -> MarketResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    Err(MarketError::HttpStatus {
        status: status.as_u16(),
        url: response.url().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str) -> MarketClient {
        MarketClient::new(ClientConfig::new(base)).unwrap()
    }

    #[test]
    fn payment_url_appends_id() {
        let url = client("http://127.0.0.1:8000").payment_url("66051").unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:8000/check-payment/66051");
    }

    #[test]
    fn payment_url_escapes_path_characters() {
        let url = client("http://127.0.0.1:8000").payment_url("a/b").unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:8000/check-payment/a%2Fb");
    }

    #[test]
    fn garbage_base_url_is_a_config_error() {
        for base in ["not a url", "mailto:market@example.com"] {
            let err = MarketClient::new(ClientConfig::new(base)).unwrap_err();
            assert!(matches!(err, MarketError::Config(_)), "{base}: {err}");
            assert!(!err.is_network());
        }
    }

    #[tokio::test]
    async fn menu_is_static() {
        let menu = client("http://127.0.0.1:1").get_menu().await;
        assert_eq!(menu, navigation_menu().to_vec());
    }
}
