//! Live token preview and deployment cost estimate.

use serde::Serialize;

use crate::core::{group_thousands, Network};

use super::params::{DeployForm, DEFAULT_DECIMALS};

pub const DEFAULT_PREVIEW_NAME: &str = "Your Token";
pub const DEFAULT_PREVIEW_SYMBOL: &str = "SYM";
pub const DEFAULT_PREVIEW_SUPPLY: &str = "21000000";

pub const ESTIMATE_FEE_RATE: u64 = 10;
pub const BASE_VBYTES: u64 = 350;
pub const MINTABLE_VBYTES: u64 = 40;
pub const PAUSABLE_VBYTES: u64 = 30;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPreview {
    pub icon: String,
    pub name: String,
    pub details: String,
}

impl TokenPreview {
    pub fn from_form(form: &DeployForm) -> Self {
        let name = non_empty(&form.name).unwrap_or(DEFAULT_PREVIEW_NAME);
        let symbol = non_empty(&form.symbol).unwrap_or(DEFAULT_PREVIEW_SYMBOL);
        let supply = non_empty(&form.supply).unwrap_or(DEFAULT_PREVIEW_SUPPLY);
        let decimals = non_empty(&form.decimals).unwrap_or(DEFAULT_DECIMALS);

        let icon: String = symbol.chars().take(2).collect::<String>().to_uppercase();
        let icon = if icon.is_empty() { "₿".to_string() } else { icon };

        let digits: String = supply.chars().take_while(|c| c.is_ascii_digit()).collect();
        let supply = if digits.is_empty() { "0".to_string() } else { group_thousands(digits.trim_start_matches('0')) };
        let supply = if supply.is_empty() { "0".to_string() } else { supply };

        let mut details = format!("{} · {} supply · {} decimals", symbol.to_uppercase(), supply, decimals);
        for (enabled, label) in [(form.mintable, "Mintable"), (form.burnable, "Burnable"), (form.pausable, "Pausable")] {
            if enabled {
                details.push_str(" · ");
                details.push_str(label);
            }
        }

        Self { icon, name: name.to_string(), details }
    }
}

fn non_empty(value: &str) -> Option<&str> {
    let value = value.trim();
    (!value.is_empty()).then_some(value)
}

/// Rough fee breakdown shown before deploying.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CostEstimate {
    pub network: Network,
    pub vbytes: u64,
    pub network_fee_sats: u64,
    pub platform_fee_sats: u64,
    pub max_spend_sats: u64,
    pub total_sats: u64,
}

impl CostEstimate {
    pub fn new(network: Network, mintable: bool, pausable: bool, platform_fee_sats: u64, max_spend_sats: u64) -> Self {
        let mut vbytes = BASE_VBYTES;
        if mintable {
            vbytes += MINTABLE_VBYTES;
        }
        if pausable {
            vbytes += PAUSABLE_VBYTES;
        }
        let network_fee_sats = ESTIMATE_FEE_RATE * vbytes;
        Self {
            network,
            vbytes,
            network_fee_sats,
            platform_fee_sats,
            max_spend_sats,
            total_sats: network_fee_sats + platform_fee_sats,
        }
    }

    /// Total as `~0.010350 rBTC`.
    pub fn total_display(&self) -> String {
        let whole = self.total_sats / 100_000_000;
        let micro = (self.total_sats % 100_000_000 + 50) / 100;
        let (whole, micro) = if micro == 1_000_000 { (whole + 1, 0) } else { (whole, micro) };
        format!("~{}.{:06} {}", whole, micro, self.network.symbol())
    }

    pub fn lines(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Network fee", format!("~{} sats", group_thousands(&self.network_fee_sats.to_string()))),
            ("Platform fee", format!("{} sats", group_thousands(&self.platform_fee_sats.to_string()))),
            ("Max spend limit", format!("{} sats", group_thousands(&self.max_spend_sats.to_string()))),
            ("Total", format!("~{} sats", group_thousands(&self.total_sats.to_string()))),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_form_uses_placeholders() {
        let preview = TokenPreview::from_form(&DeployForm::default());
        assert_eq!(preview.icon, "SY");
        assert_eq!(preview.name, "Your Token");
        assert_eq!(preview.details, "SYM · 21,000,000 supply · 18 decimals");
    }

    #[test]
    fn features_are_appended_in_order() {
        let mut form = DeployForm::new("Moon", "moon", "1000");
        form.mintable = true;
        form.pausable = true;
        let preview = TokenPreview::from_form(&form);
        assert_eq!(preview.icon, "MO");
        assert_eq!(preview.details, "MOON · 1,000 supply · 18 decimals · Mintable · Pausable");
    }

    #[test]
    fn estimate_adds_feature_bytes() {
        let base = CostEstimate::new(Network::Regtest, false, false, 10_000, 100_000);
        assert_eq!(base.network_fee_sats, 3_500);
        assert_eq!(base.total_sats, 13_500);
        assert_eq!(base.total_display(), "~0.000135 rBTC");

        let full = CostEstimate::new(Network::Mainnet, true, true, 10_000, 100_000);
        assert_eq!(full.vbytes, 420);
        assert_eq!(full.total_sats, 14_200);
        assert_eq!(full.total_display(), "~0.000142 BTC");
        assert_eq!(full.lines()[3].1, "~14,200 sats");
    }
}
