//! MintableToken - OP-20 template with owner mint and holder burn.
//!
//! State model of the contract the deployer ships. Initialized from the
//! constructor calldata, then driven through `execute` with selector
//! calldata exactly as the runtime would hand it over.

use ruint::aliases::U256;
use std::collections::HashMap;

use crate::abi::{AbiError, TokenCall, TokenInit};
use crate::core::Address;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("Only deployer can call this method")]
    OnlyDeployer,
    #[error("Max supply reached")]
    MaxSupplyReached,
    #[error("Insufficient balance")]
    InsufficientBalance,
    #[error("Already initialized")]
    AlreadyInitialized,
    #[error("Not initialized")]
    NotInitialized,
    #[error(transparent)]
    Abi(#[from] AbiError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenInfo {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
    pub max_supply: U256,
}

#[derive(Debug, Clone)]
pub struct MintableToken {
    deployer: Address,
    info: Option<TokenInfo>,
    total_supply: U256,
    balances: HashMap<Address, U256>,
}

impl MintableToken {
    pub fn new(deployer: Address) -> Self {
        Self { deployer, info: None, total_supply: U256::ZERO, balances: HashMap::new() }
    }

    /// Runs once on deployment with the constructor payload.
    pub fn on_deployment(&mut self, calldata: &[u8]) -> Result<(), TokenError> {
        if self.info.is_some() {
            return Err(TokenError::AlreadyInitialized);
        }
        let init = TokenInit::decode(calldata).map_err(AbiError::from)?;
        self.info = Some(TokenInfo {
            name: init.name,
            symbol: init.symbol,
            decimals: init.decimals,
            max_supply: init.max_supply,
        });
        if init.initial_mint_amount > U256::ZERO {
            self.credit(init.initial_mint_to, init.initial_mint_amount)?;
        }
        Ok(())
    }

    pub fn execute(&mut self, sender: Address, calldata: &[u8]) -> Result<bool, TokenError> {
        match TokenCall::decode(calldata)? {
            TokenCall::Mint { to, amount } => self.mint(sender, to, amount),
            TokenCall::Burn { amount } => self.burn(sender, amount),
        }
    }

    pub fn mint(&mut self, sender: Address, to: Address, amount: U256) -> Result<bool, TokenError> {
        if sender != self.deployer {
            return Err(TokenError::OnlyDeployer);
        }
        self.credit(to, amount)?;
        Ok(true)
    }

    pub fn burn(&mut self, sender: Address, amount: U256) -> Result<bool, TokenError> {
        self.info.as_ref().ok_or(TokenError::NotInitialized)?;
        let balance = self.balance_of(&sender);
        let remaining = balance.checked_sub(amount).ok_or(TokenError::InsufficientBalance)?;
        self.balances.insert(sender, remaining);
        self.total_supply -= amount;
        Ok(true)
    }

    fn credit(&mut self, to: Address, amount: U256) -> Result<(), TokenError> {
        let info = self.info.as_ref().ok_or(TokenError::NotInitialized)?;
        let supply = self.total_supply.checked_add(amount).ok_or(TokenError::MaxSupplyReached)?;
        if supply > info.max_supply {
            return Err(TokenError::MaxSupplyReached);
        }
        self.total_supply = supply;
        *self.balances.entry(to).or_insert(U256::ZERO) += amount;
        Ok(())
    }

    pub fn balance_of(&self, owner: &Address) -> U256 {
        self.balances.get(owner).copied().unwrap_or(U256::ZERO)
    }

    pub fn total_supply(&self) -> U256 {
        self.total_supply
    }

    pub fn info(&self) -> Option<&TokenInfo> {
        self.info.as_ref()
    }

    pub fn deployer(&self) -> Address {
        self.deployer
    }
}
