//! Connected-wallet state.

use serde::Serialize;

use crate::core::{format_btc, Address, Network};

/// Exists only while a wallet is connected; dropped on disconnect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletSession {
    pub bitcoin_address: String,
    /// p2op rendering of `sender`, or the Bitcoin address when unresolved.
    pub protocol_address: String,
    pub sender: Option<Address>,
    pub balance_sats: u64,
    /// Network name exactly as the wallet reported it.
    pub wallet_network: String,
}

impl WalletSession {
    pub fn new(bitcoin_address: impl Into<String>, wallet_network: impl Into<String>) -> Self {
        let bitcoin_address = bitcoin_address.into();
        Self {
            protocol_address: bitcoin_address.clone(),
            bitcoin_address,
            sender: None,
            balance_sats: 0,
            wallet_network: wallet_network.into(),
        }
    }

    /// Wallet network, `Regtest` when the name is unknown.
    pub fn network(&self) -> Network {
        Network::from_name(&self.wallet_network).unwrap_or_default()
    }

    /// Record a resolved sender and its protocol address.
    pub fn resolve(&mut self, sender: Address) {
        self.protocol_address = match sender.p2op(self.network()) {
            Ok(p2op) => p2op,
            Err(e) => {
                tracing::warn!("Could not render protocol address: {}", e);
                sender.to_hex()
            }
        };
        self.sender = Some(sender);
    }

    pub fn is_resolved(&self) -> bool {
        self.sender.is_some()
    }

    pub fn balance_display(&self) -> String {
        format!("{} {}", format_btc(self.balance_sats), self.network().symbol())
    }

    pub fn short_address(&self) -> String {
        Address::abbreviate(&self.protocol_address)
    }
}
