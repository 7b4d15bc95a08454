//! Environment configuration.
//!
//! Env vars (a `.env` file is loaded first if present):
//!   RPC_URL           — JSON-RPC endpoint (default: http://localhost:8545)
//!   PRIVATE_KEY       — Key that signs the withdraw transaction
//!   CONTRACT_ADDRESS  — Deployed zkFact address (overridden by --address)

use alloy::{primitives::Address, signers::local::PrivateKeySigner};
use anyhow::{Context, Result};

/// Local node fallback, used when no endpoint is configured.
pub const DEFAULT_RPC_URL: &str = "http://localhost:8545";

#[derive(Clone)]
pub struct Config {
    pub rpc_url: String,
    private_key: Option<String>,
    contract_address: Option<Address>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup. Empty values count as unset.
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str| var(key).filter(|value| !value.trim().is_empty());

        let rpc_url = var("RPC_URL").unwrap_or_else(|| DEFAULT_RPC_URL.to_string());
        let private_key = var("PRIVATE_KEY");
        let contract_address = var("CONTRACT_ADDRESS")
            .map(|addr| addr.trim().parse::<Address>())
            .transpose()
            .context("CONTRACT_ADDRESS is not a valid address")?;

        Ok(Config {
            rpc_url,
            private_key,
            contract_address,
        })
    }

    /// The `--address` flag wins over `CONTRACT_ADDRESS`.
    pub fn contract_address(&self, flag: Option<&str>) -> Result<Address> {
        match flag {
            Some(addr) => addr
                .trim()
                .parse()
                .with_context(|| format!("--address {addr} is not a valid address")),
            None => self
                .contract_address
                .context("no contract address: pass --address or set CONTRACT_ADDRESS"),
        }
    }

    pub fn signer(&self) -> Result<PrivateKeySigner> {
        self.private_key
            .as_deref()
            .context("PRIVATE_KEY not set")?
            .trim()
            .parse()
            .context("PRIVATE_KEY is not a valid secp256k1 key")
    }
}
