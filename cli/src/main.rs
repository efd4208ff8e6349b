// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # Pavilion CLI
//!
//! Entry point for the `pavilion` binary. Parses CLI arguments, initializes
//! logging, opens the profile's identity store, and runs one marketplace
//! operation.
//!
//! Command output goes to stdout as pretty JSON; logs go to stderr.

mod cli;
mod logging;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use pavilion_market::config::IDENTITY_TREE;
use pavilion_market::transaction::{NftDescriptor, TransactionMessage, MESSAGE_VERSION};
use pavilion_market::{ClientConfig, IdentityHelper, MarketClient, NftMetadata, SledKeyStore};

use cli::{BuyArgs, CheckPaymentArgs, Commands, GlobalArgs, PavilionCli, SignArgs};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = PavilionCli::parse();

    if !matches!(cli.command, Commands::Version) {
        logging::init_logging(logging::DEFAULT_FILTER, cli.global.log_format);
    }

    match cli.command {
        Commands::Identity => {
            let identity = open_identity(&cli.global.data_dir)?;
            let public_key = identity.try_keypair()?.public_key();
            print_json(&serde_json::json!({ "public_key": public_key.to_hex() }))
        }
        Commands::Listings => {
            let client = market_client(&cli.global)?;
            print_json(&client.try_get_for_sale_nfts().await?)
        }
        Commands::Buy(args) => buy(&cli.global, args).await,
        Commands::CheckPayment(args) => check_payment(&cli.global, args).await,
        Commands::Menu => {
            let client = market_client(&cli.global)?;
            print_json(&client.get_menu().await)
        }
        Commands::Sign(args) => sign(&cli.global, args),
        Commands::Version => {
            print_version();
            Ok(())
        }
    }
}

/// Opens (creating if needed) the sled-backed identity store under
/// `data_dir`.
fn open_identity(data_dir: &Path) -> Result<IdentityHelper> {
    let store_path = data_dir.join(IDENTITY_TREE);
    std::fs::create_dir_all(&store_path).with_context(|| {
        format!(
            "failed to create identity directory: {}",
            store_path.display()
        )
    })?;

    let store = SledKeyStore::open(&store_path)
        .with_context(|| format!("failed to open identity store at {}", store_path.display()))?;
    tracing::debug!(path = %store_path.display(), "identity store opened");

    Ok(IdentityHelper::new(Arc::new(store)))
}

fn market_client(global: &GlobalArgs) -> Result<MarketClient> {
    let mut config = ClientConfig::new(&global.api_url);
    if let Some(secs) = global.timeout_secs {
        config = config.with_timeout(Duration::from_secs(secs));
    }
    MarketClient::new(config).context("failed to set up marketplace client")
}

async fn buy(global: &GlobalArgs, args: BuyArgs) -> Result<()> {
    let identity = open_identity(&global.data_dir)?;
    let client = market_client(global)?;

    let request = client
        .try_purchase(&identity, &args.nft_id, &args.payment_sender)
        .await
        .context("purchase request failed")?;

    tracing::info!(nft_id = %request.nft_id, "purchase submitted");
    print_json(&request)
}

async fn check_payment(global: &GlobalArgs, args: CheckPaymentArgs) -> Result<()> {
    let client = market_client(global)?;

    let paid = match args.wait_secs {
        Some(secs) => {
            client
                .wait_for_payment(
                    &args.nft_id,
                    Duration::from_secs(secs),
                    Duration::from_secs(args.interval_secs),
                )
                .await
        }
        None => client
            .try_check_payment(&args.nft_id)
            .await
            .context("payment check failed")?,
    };

    print_json(&serde_json::json!({ "nft_id": args.nft_id, "paid": paid }))
}

fn sign(global: &GlobalArgs, args: SignArgs) -> Result<()> {
    let identity = open_identity(&global.data_dir)?;
    let from = match args.from {
        Some(from) => from,
        None => identity.try_keypair()?.public_key().to_hex(),
    };

    let message = TransactionMessage::new(
        args.action.into(),
        NftDescriptor {
            from,
            to: args.to,
            metadata: NftMetadata {
                name: args.name,
                description: args.description,
                image_url: args.image_url,
            },
            id: args.nft_id,
        },
    );

    let signed = identity.sign_transaction(message)?;
    tracing::info!(
        action = %signed.message.action,
        signer = ?signed.signer,
        "transaction signed"
    );
    print_json(&signed)
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let rendered = serde_json::to_string_pretty(value).context("failed to render output")?;
    println!("{rendered}");
    Ok(())
}

/// Prints build version information.
fn print_version() {
    println!("pavilion {}", env!("CARGO_PKG_VERSION"));
    println!("message   v{}", MESSAGE_VERSION);
    println!("rustc     {}", rustc_version());
}

/// Returns the Rust compiler version used to build this binary.
fn rustc_version() -> &'static str {
    option_env!("RUSTC_VERSION").unwrap_or("unknown")
}
