//! # CLI Interface
//!
//! Command-line arguments for `pavilion`, via `clap` derive. Global options
//! pick the marketplace, the profile directory, and logging; each subcommand
//! maps onto one client operation.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use pavilion_market::config::DEFAULT_API_URL;
use pavilion_market::transaction::TransactionAction;

use crate::logging::LogFormat;

/// Pavilion NFT marketplace client.
///
/// Browses listings, buys NFTs, and checks payments against a Pavilion
/// marketplace service, signing with a per-profile Ed25519 identity that is
/// created on first use.
#[derive(Parser, Debug)]
#[command(
    name = "pavilion",
    about = "Pavilion NFT marketplace client",
    version,
    propagate_version = true
)]
pub struct PavilionCli {
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Options shared by every subcommand.
#[derive(Args, Debug)]
pub struct GlobalArgs {
    /// Base URL of the marketplace API.
    #[arg(long, global = true, env = "PAVILION_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// Profile directory holding the identity store. Created on first use.
    #[arg(
        long,
        short = 'd',
        global = true,
        env = "PAVILION_DATA_DIR",
        default_value = ".pavilion"
    )]
    pub data_dir: PathBuf,

    /// Per-request timeout in seconds. Unset means wait indefinitely.
    #[arg(long, global = true, env = "PAVILION_TIMEOUT_SECS")]
    pub timeout_secs: Option<u64>,

    /// Log output format.
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print this profile's public key, creating the identity if needed.
    Identity,
    /// List NFTs for sale.
    Listings,
    /// Submit a purchase request for an NFT.
    Buy(BuyArgs),
    /// Check (or wait for) the payment for an NFT.
    CheckPayment(CheckPaymentArgs),
    /// Print the navigation menu.
    Menu,
    /// Sign a mint or transfer message with this profile's identity.
    Sign(SignArgs),
    /// Print version information and exit.
    Version,
}

/// Arguments for `buy`.
#[derive(Args, Debug)]
pub struct BuyArgs {
    /// NFT identifier as big-endian hex, e.g. `010203`.
    #[arg(long, value_parser = parse_nft_id)]
    pub nft_id: ::std::vec::Vec<u8>,

    /// Address the payment is sent from.
    #[arg(long)]
    pub payment_sender: String,
}

/// Arguments for `check-payment`.
#[derive(Args, Debug)]
pub struct CheckPaymentArgs {
    /// NFT identifier in decimal, as returned by `buy`.
    pub nft_id: String,

    /// Keep polling until paid or this many seconds pass.
    #[arg(long)]
    pub wait_secs: Option<u64>,

    /// Seconds between polls when waiting. Zero polls as fast as the client
    /// allows (every 100 ms).
    #[arg(long, default_value_t = 2)]
    pub interval_secs: u64,
}

/// Which action `sign` produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SignAction {
    Mint,
    Transfer,
}

impl From<SignAction> for TransactionAction {
    fn from(action: SignAction) -> Self {
        match action {
            SignAction::Mint => TransactionAction::Mint,
            SignAction::Transfer => TransactionAction::Transfer,
        }
    }
}

/// Arguments for `sign`.
#[derive(Args, Debug)]
pub struct SignArgs {
    #[arg(long, value_enum)]
    pub action: SignAction,

    /// NFT identifier as big-endian hex.
    #[arg(long, value_parser = parse_nft_id)]
    pub nft_id: ::std::vec::Vec<u8>,

    /// Sending address. Defaults to this profile's public key.
    #[arg(long)]
    pub from: Option<String>,

    /// Receiving address.
    #[arg(long)]
    pub to: String,

    #[arg(long, default_value = "")]
    pub name: String,

    #[arg(long, default_value = "")]
    pub description: String,

    #[arg(long, default_value = "")]
    pub image_url: String,
}

/// Parse a hex NFT id, with or without a `0x` prefix.
pub fn parse_nft_id(s: &str) -> Result<Vec<u8>, String> {
    let digits = s.strip_prefix("0x").unwrap_or(s);
    if digits.is_empty() {
        return Err("nft id must not be empty".to_string());
    }
    // Odd-length ids get a leading zero nibble: `fff` is 0x0fff.
    let padded = if digits.len() % 2 == 1 {
        format!("0{digits}")
    } else {
        digits.to_string()
    };
    hex::decode(padded).map_err(|e| format!("invalid hex nft id: {e}"))
}
