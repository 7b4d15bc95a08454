//! zkFact withdraw CLI.
//!
//! Subcommands:
//!   decode    - Decode a proof and print the call arguments as JSON
//!   calldata  - Print the ABI-encoded withdraw calldata
//!   withdraw  - Decode a proof and submit it to the zkFact contract
//!
//! Proof paths accept `-` for stdin.

mod config;
mod contract;

use std::fs;
use std::io::Read;

use alloy::providers::ProviderBuilder;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;
use zkfact_lib::ProofArguments;

use crate::config::Config;
use crate::contract::{await_outcome, submit_proof, Verdict, IZkFact};

#[derive(Parser)]
#[command(name = "zkfact")]
#[command(about = "Submit a zkSNARK proof to a zkFact contract's withdraw function")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode a proof and print the withdraw arguments as JSON
    Decode {
        /// Path to the proof text (`-` for stdin)
        #[arg(long)]
        proof: String,
        /// Write the JSON here instead of stdout
        #[arg(long)]
        output: Option<String>,
    },
    /// Print hex-encoded withdraw calldata (for use with other tooling)
    Calldata {
        /// Path to the proof text (`-` for stdin)
        #[arg(long)]
        proof: String,
    },
    /// Decode a proof and send it to the contract's withdraw function
    Withdraw {
        /// Path to the proof text (`-` for stdin)
        #[arg(long)]
        proof: String,
        /// zkFact contract address (defaults to CONTRACT_ADDRESS)
        #[arg(long)]
        address: Option<String>,
        /// Return after the node accepts the transaction, without waiting for the receipt
        #[arg(long, default_value = "false")]
        no_wait: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    setup_logger();
    let cli = Cli::parse();

    match cli.command {
        Commands::Decode { proof, output } => {
            let args = decode_file(&proof)?;
            let json = serde_json::to_string_pretty(&args)?;
            match output {
                Some(path) => {
                    fs::write(&path, json)
                        .with_context(|| format!("Failed to write {path}"))?;
                    println!("Arguments written to {path}");
                }
                None => println!("{json}"),
            }
        }
        Commands::Calldata { proof } => {
            let args = decode_file(&proof)?;
            println!("0x{}", hex::encode(contract::calldata(&args)));
        }
        Commands::Withdraw {
            proof,
            address,
            no_wait,
        } => {
            let config = Config::from_env()?;
            withdraw(&config, &proof, address.as_deref(), !no_wait).await?;
        }
    }

    Ok(())
}

fn setup_logger() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn read_proof(path: &str) -> Result<String> {
    if path == "-" {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read proof from stdin")?;
        return Ok(text);
    }
    fs::read_to_string(path).with_context(|| format!("Failed to read proof file: {path}"))
}

fn decode_file(path: &str) -> Result<ProofArguments> {
    let text = read_proof(path)?;
    zkfact_lib::decode(&text).with_context(|| format!("Malformed proof in {path}"))
}

async fn withdraw(config: &Config, proof_path: &str, address: Option<&str>, wait: bool) -> Result<()> {
    let proof_text = read_proof(proof_path)?;
    let contract_addr = config.contract_address(address)?;
    let signer = config.signer()?;

    println!("Wallet:    {}", signer.address());
    println!("Contract:  {contract_addr}");
    println!("RPC:       {}", config.rpc_url);

    let provider = ProviderBuilder::new()
        .wallet(signer)
        .connect_http(config.rpc_url.parse().context("RPC_URL is not a valid URL")?);
    let zk_fact = IZkFact::new(contract_addr, &provider);

    let pending = submit_proof(&zk_fact, &proof_text).await?;
    println!("Tx:        {}", pending.tx_hash());

    if !wait {
        return Ok(());
    }

    info!("waiting for receipt");
    let outcome = await_outcome(pending).await?;
    println!(
        "Status:    {}",
        if outcome.succeeded { "mined" } else { "reverted" }
    );
    for verdict in &outcome.verdicts {
        match verdict {
            Verdict::Verified(msg) => println!("  Verified:     {msg}"),
            Verdict::PaidOut(msg) => println!("  PaidOut:      {msg}"),
            Verdict::WrongAnswer(msg) => println!("  WrongAnswer:  {msg}"),
        }
    }
    if outcome.paid_out() {
        println!("Withdraw complete ✓");
    } else {
        println!("⚠ No payout. Check the proof and resubmit.");
    }

    Ok(())
}
