//! Request and response types for the marketplace API.

use primitive_types::U256;
use serde::{Deserialize, Serialize};

use crate::config::{DEMO_CURRENCY_SYMBOL, DEMO_PRICE, MAX_NFT_ID_LENGTH};
use crate::error::{MarketError, MarketResult};

/// Render big-endian identifier bytes as a decimal string.
///
/// Equivalent to hex-encoding the bytes and parsing the hex as an unsigned
/// big integer: `[1, 2, 3]` → `0x010203` → `"66051"`. Leading zero bytes
/// carry no value, so `[0, 0, 1]` and `[1]` both render as `"1"`.
///
/// # Errors
///
/// `InvalidInput` if `id` is empty, or if its value needs more than 32
/// bytes (the id no longer fits a `U256`).
pub fn nft_id_to_decimal(id: &[u8]) -> MarketResult<String> {
    if id.is_empty() {
        return Err(MarketError::InvalidInput(
            "nft id must not be empty".to_string(),
        ));
    }

    let first_significant = id.iter().position(|&b| b != 0).unwrap_or(id.len());
    let significant = &id[first_significant..];
    if significant.is_empty() {
        return Ok("0".to_string());
    }
    if significant.len() > MAX_NFT_ID_LENGTH {
        return Err(MarketError::InvalidInput(format!(
            "nft id has {} significant bytes, at most {} supported",
            significant.len(),
            MAX_NFT_ID_LENGTH
        )));
    }
    Ok(U256::from_big_endian(significant).to_string())
}

/// Display metadata for an NFT.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NftMetadata {
    pub name: String,
    pub description: String,
    #[serde(alias = "url", alias = "image")]
    pub image_url: String,
}

/// An NFT as the service returns it from `GET /listed-nfts/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NftRecord {
    /// Identifier bytes, big-endian.
    pub id: Vec<u8>,
    #[serde(default)]
    pub metadata: NftMetadata,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
}

impl NftRecord {
    /// The identifier as the decimal string the service expects back.
    pub fn decimal_id(&self) -> MarketResult<String> {
        nft_id_to_decimal(&self.id)
    }
}

/// A record with a price attached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NftListing {
    #[serde(flatten)]
    pub nft: NftRecord,
    pub price: u64,
    pub currency_symbol: String,
}

impl From<NftRecord> for NftListing {
    /// Attaches the demo price and currency. The service doesn't price
    /// listings yet.
    fn from(nft: NftRecord) -> Self {
        Self {
            nft,
            price: DEMO_PRICE,
            currency_symbol: DEMO_CURRENCY_SYMBOL.to_string(),
        }
    }
}

/// Body of `POST /buy-nft/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseRequest {
    /// NFT identifier, decimal.
    pub nft_id: String,
    /// Address paying for the NFT.
    pub payment_sender: String,
    /// Hex public key of the buyer's identity.
    pub nft_receiver: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decimal_id_matches_hex_parse() {
        assert_eq!(nft_id_to_decimal(&[1, 2, 3]).unwrap(), "66051");
        assert_eq!(nft_id_to_decimal(&[0]).unwrap(), "0");
        assert_eq!(nft_id_to_decimal(&[0, 0, 0xff]).unwrap(), "255");
    }

    #[test]
    fn decimal_id_handles_full_width() {
        let max = nft_id_to_decimal(&[0xff; 32]).unwrap();
        assert_eq!(max, U256::MAX.to_string());
        assert_eq!(max.len(), 78);
    }

    #[test]
    fn decimal_id_rejects_empty_and_oversized() {
        assert!(matches!(
            nft_id_to_decimal(&[]),
            Err(MarketError::InvalidInput(_))
        ));
        assert!(matches!(
            nft_id_to_decimal(&[1; 33]),
            Err(MarketError::InvalidInput(_))
        ));
        assert!(matches!(
            nft_id_to_decimal(&[0xff; 40]),
            Err(MarketError::InvalidInput(_))
        ));
    }

    #[test]
    fn decimal_id_ignores_leading_zero_bytes() {
        let mut padded = vec![0u8; 33];
        padded.push(1);
        assert_eq!(nft_id_to_decimal(&padded).unwrap(), "1");

        let mut wide = vec![0u8; 8];
        wide.extend_from_slice(&[0xff; 32]);
        assert_eq!(nft_id_to_decimal(&wide).unwrap(), U256::MAX.to_string());

        assert_eq!(nft_id_to_decimal(&[0; 64]).unwrap(), "0");
    }

    #[test]
    fn record_parses_with_missing_metadata() {
        let record: NftRecord = serde_json::from_str(r#"{"id":[4,2]}"#).unwrap();
        assert_eq!(record.id, vec![4, 2]);
        assert_eq!(record.metadata, NftMetadata::default());
        assert_eq!(record.decimal_id().unwrap(), "1026");
    }

    #[test]
    fn metadata_accepts_url_alias() {
        let meta: NftMetadata =
            serde_json::from_str(r#"{"name":"n","description":"d","url":"u"}"#).unwrap();
        assert_eq!(meta.image_url, "u");
    }

    #[test]
    fn listing_flattens_record_and_adds_price() {
        let record: NftRecord =
            serde_json::from_str(r#"{"id":[1],"metadata":{"name":"A"}}"#).unwrap();
        let listing = NftListing::from(record);
        assert_eq!(listing.price, 10);
        assert_eq!(listing.currency_symbol, "PVL");

        let json = serde_json::to_value(&listing).unwrap();
        assert_eq!(json["id"], serde_json::json!([1]));
        assert_eq!(json["metadata"]["name"], "A");
        assert_eq!(json["price"], 10);
        assert_eq!(json["currency_symbol"], "PVL");
    }

    #[test]
    fn purchase_request_wire_shape() {
        let req = PurchaseRequest {
            nft_id: "66051".into(),
            payment_sender: "addr1".into(),
            nft_receiver: "ab".repeat(32),
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["nft_id"], "66051");
        assert_eq!(json["payment_sender"], "addr1");
        assert_eq!(json["nft_receiver"].as_str().unwrap().len(), 64);
    }
}
