//! Form input and the validated deployment parameters derived from it.

use ruint::aliases::U256;
use serde::{Deserialize, Serialize};

use crate::abi::{DeployTokenArgs, TokenInit};
use crate::core::codec::{parse_u256, scale_by_decimals};
use crate::core::Address;

pub const DEFAULT_DECIMALS: &str = "18";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Please fill in all required fields.")]
    MissingFields,
    #[error("Invalid {0}: expected a non-negative whole number.")]
    InvalidNumber(&'static str),
    #[error("Invalid {0}: value is too large.")]
    Overflow(&'static str),
    #[error("Invalid decimals: {0}")]
    InvalidDecimals(String),
}

/// Raw form fields, as typed. Numbers stay strings until validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DeployForm {
    pub name: String,
    pub symbol: String,
    pub supply: String,
    pub decimals: String,
    /// Empty means "mint the whole supply".
    pub initial_mint: String,
    pub free_mint_supply: String,
    pub free_mint_per_tx: String,
    pub free_mint_user_cap: String,
    pub mintable: bool,
    pub burnable: bool,
    pub pausable: bool,
}

impl Default for DeployForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            symbol: String::new(),
            supply: String::new(),
            decimals: DEFAULT_DECIMALS.to_string(),
            initial_mint: String::new(),
            free_mint_supply: String::new(),
            free_mint_per_tx: String::new(),
            free_mint_user_cap: String::new(),
            mintable: false,
            burnable: false,
            pausable: false,
        }
    }
}

impl DeployForm {
    pub fn new(name: &str, symbol: &str, supply: &str) -> Self {
        Self { name: name.to_string(), symbol: symbol.to_string(), supply: supply.to_string(), ..Default::default() }
    }

    pub fn with_decimals(mut self, decimals: u8) -> Self {
        self.decimals = decimals.to_string();
        self
    }

    pub fn with_initial_mint(mut self, amount: &str) -> Self {
        self.initial_mint = amount.to_string();
        self
    }

    pub fn validate(&self) -> Result<DeployParams, ValidationError> {
        let name = self.name.trim();
        let symbol = self.symbol.trim();
        let supply = self.supply.trim();
        if name.is_empty() || symbol.is_empty() || supply.is_empty() {
            return Err(ValidationError::MissingFields);
        }

        let decimals_raw = self.decimals.trim();
        let decimals_raw = if decimals_raw.is_empty() { DEFAULT_DECIMALS } else { decimals_raw };
        let decimals: u8 = decimals_raw
            .parse()
            .map_err(|_| ValidationError::InvalidDecimals(decimals_raw.to_string()))?;

        let max_supply = scaled("supply", supply, decimals)?;
        let initial_mint_amount = match self.initial_mint.trim() {
            "" => max_supply,
            amount => scaled("initial mint", amount, decimals)?,
        };

        Ok(DeployParams {
            name: name.to_string(),
            symbol: symbol.to_string(),
            decimals,
            max_supply,
            initial_mint_amount,
            free_mint_supply: optional_scaled("free mint supply", &self.free_mint_supply, decimals)?,
            free_mint_per_tx: optional_scaled("free mint per tx", &self.free_mint_per_tx, decimals)?,
            free_mint_user_cap: optional_scaled("free mint user cap", &self.free_mint_user_cap, decimals)?,
            burn_enabled: self.burnable,
            mintable: self.mintable,
            pausable: self.pausable,
        })
    }
}

fn scaled(field: &'static str, value: &str, decimals: u8) -> Result<U256, ValidationError> {
    if !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ValidationError::InvalidNumber(field));
    }
    let whole = parse_u256(value).ok_or(ValidationError::Overflow(field))?;
    scale_by_decimals(whole, decimals).ok_or(ValidationError::Overflow(field))
}

fn optional_scaled(field: &'static str, value: &str, decimals: u8) -> Result<U256, ValidationError> {
    match value.trim() {
        "" => Ok(U256::ZERO),
        v => scaled(field, v, decimals),
    }
}

/// Validated parameters, amounts already in base units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeployParams {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
    pub max_supply: U256,
    pub initial_mint_amount: U256,
    pub free_mint_supply: U256,
    pub free_mint_per_tx: U256,
    pub free_mint_user_cap: U256,
    pub burn_enabled: bool,
    pub mintable: bool,
    pub pausable: bool,
}

impl DeployParams {
    /// Constructor payload for a direct deployment.
    pub fn token_init(&self, initial_mint_to: Address) -> TokenInit {
        TokenInit {
            max_supply: self.max_supply,
            decimals: self.decimals,
            name: self.name.clone(),
            symbol: self.symbol.clone(),
            initial_mint_to,
            initial_mint_amount: self.initial_mint_amount,
        }
    }

    /// `deployToken` arguments; the sender receives the initial mint and
    /// ownership.
    pub fn factory_args(&self, sender: Address) -> DeployTokenArgs {
        DeployTokenArgs {
            max_supply: self.max_supply,
            decimals: self.decimals,
            name: self.name.clone(),
            symbol: self.symbol.clone(),
            initial_mint_to: sender,
            initial_mint_amount: self.initial_mint_amount,
            free_mint_supply: self.free_mint_supply,
            free_mint_per_tx: self.free_mint_per_tx,
            free_mint_user_cap: self.free_mint_user_cap,
            token_owner: sender,
            burn_enabled: self.burn_enabled,
        }
    }
}
