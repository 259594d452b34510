//! Launcher configuration - passed from the surface (CLI, browser binding)

use std::env;

use crate::core::Network;
use crate::deploy::{ArtifactLocation, Pacing};
use crate::wallet::PaymentOutput;

pub const DEFAULT_FEE_RATE: u64 = 10;
pub const DEFAULT_PRIORITY_FEE: u64 = 10_000;
pub const DEFAULT_GAS_SAT_FEE: u64 = 50_000;
pub const PLATFORM_FEE_SATS: u64 = 10_000;
pub const MAX_SPEND_SATS: u64 = 100_000;

pub const ENV_FACTORY: &str = "TOKENLAUNCH_FACTORY";
pub const ENV_PLATFORM_FEE_ADDRESS: &str = "TOKENLAUNCH_PLATFORM_FEE_ADDRESS";
pub const ENV_ARTIFACT: &str = "TOKENLAUNCH_ARTIFACT";
pub const ENV_RPC_URL: &str = "TOKENLAUNCH_RPC_URL";
pub const ENV_FAST: &str = "TOKENLAUNCH_FAST";

#[derive(Debug, Clone)]
pub struct LauncherConfig {
    /// Factory contract address. Unset means every deployment is direct.
    pub factory: Option<String>,
    pub platform_fee_address: Option<String>,
    pub platform_fee_sats: u64,
    pub max_spend_sats: u64,
    pub fee_rate: u64,
    pub priority_fee: u64,
    pub gas_sat_fee: u64,
    pub default_artifact: Option<ArtifactLocation>,
    pub pacing: Pacing,
    /// Overrides the per-network endpoint.
    pub rpc_url: Option<String>,
}

impl Default for LauncherConfig {
    fn default() -> Self {
        Self {
            factory: None,
            platform_fee_address: None,
            platform_fee_sats: PLATFORM_FEE_SATS,
            max_spend_sats: MAX_SPEND_SATS,
            fee_rate: DEFAULT_FEE_RATE,
            priority_fee: DEFAULT_PRIORITY_FEE,
            gas_sat_fee: DEFAULT_GAS_SAT_FEE,
            default_artifact: None,
            pacing: Pacing::default(),
            rpc_url: None,
        }
    }
}

impl LauncherConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_factory(mut self, address: impl Into<String>) -> Self {
        self.factory = Some(address.into());
        self
    }

    pub fn with_platform_fee(mut self, address: impl Into<String>) -> Self {
        self.platform_fee_address = Some(address.into());
        self
    }

    pub fn with_default_artifact(mut self, location: ArtifactLocation) -> Self {
        self.default_artifact = Some(location);
        self
    }

    pub fn with_pacing(mut self, pacing: Pacing) -> Self {
        self.pacing = pacing;
        self
    }

    pub fn with_rpc_url(mut self, url: impl Into<String>) -> Self {
        self.rpc_url = Some(url.into());
        self
    }

    /// Read `TOKENLAUNCH_*` variables. Empty values count as unset.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(factory) = env_value(ENV_FACTORY) {
            config = config.with_factory(factory);
        }
        if let Some(address) = env_value(ENV_PLATFORM_FEE_ADDRESS) {
            config = config.with_platform_fee(address);
        }
        if let Some(artifact) = env_value(ENV_ARTIFACT) {
            config = config.with_default_artifact(ArtifactLocation::parse(&artifact));
        }
        if let Some(url) = env_value(ENV_RPC_URL) {
            config = config.with_rpc_url(url);
        }
        if env_value(ENV_FAST).map(|v| v == "1" || v.eq_ignore_ascii_case("true")).unwrap_or(false) {
            config = config.with_pacing(Pacing::instant());
        }
        config
    }

    pub fn rpc_url_for(&self, network: Network) -> String {
        self.rpc_url.clone().unwrap_or_else(|| network.rpc_url().to_string())
    }

    /// Platform fee output, only when the configured address belongs to
    /// `network`.
    pub fn platform_fee_output(&self, network: Network) -> Option<PaymentOutput> {
        let address = self.platform_fee_address.as_deref()?;
        let parsed = address.parse::<bitcoin::Address<bitcoin::address::NetworkUnchecked>>().ok()?;
        if parsed.require_network(network.to_bitcoin()).is_err() {
            tracing::debug!("Platform fee address {} is not a {} address; skipping fee", address, network);
            return None;
        }
        Some(PaymentOutput { address: address.to_string(), value: self.platform_fee_sats })
    }
}

fn env_value(key: &str) -> Option<String> {
    env::var(key).ok().map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

/// Load `KEY=value` lines from `.env` without overriding variables already set.
pub fn load_dotenv(path: &str) {
    let Ok(contents) = std::fs::read_to_string(path) else {
        return;
    };
    for line in contents.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Some((key, value)) = line.split_once('=') {
            let value = value.trim().trim_matches('"');
            if !value.is_empty() && env::var(key.trim()).is_err() {
                env::set_var(key.trim(), value);
            }
        }
    }
}
