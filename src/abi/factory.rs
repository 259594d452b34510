//! Token factory ABI: `deployToken` and the `TokenDeployed` event.

use ruint::aliases::U256;
use serde::Serialize;

use super::{selector, AbiError};
use crate::core::codec::{BinaryReader, BinaryWriter, CodecResult};
use crate::core::Address;

pub const DEPLOY_TOKEN_SIGNATURE: &str =
    "deployToken(uint256,uint8,string,string,address,uint256,uint256,uint256,uint256,address,bool)";
pub const TOKEN_DEPLOYED_EVENT: &str = "TokenDeployed";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeployTokenArgs {
    pub max_supply: U256,
    pub decimals: u8,
    pub name: String,
    pub symbol: String,
    pub initial_mint_to: Address,
    pub initial_mint_amount: U256,
    pub free_mint_supply: U256,
    pub free_mint_per_tx: U256,
    pub free_mint_user_cap: U256,
    pub token_owner: Address,
    pub burn_enabled: bool,
}

impl DeployTokenArgs {
    pub fn encode(&self) -> CodecResult<Vec<u8>> {
        let mut w = BinaryWriter::with_selector(selector(DEPLOY_TOKEN_SIGNATURE));
        w.write_u256(&self.max_supply).write_u8(self.decimals);
        w.write_string_with_length(&self.name)?;
        w.write_string_with_length(&self.symbol)?;
        w.write_address(&self.initial_mint_to)
            .write_u256(&self.initial_mint_amount)
            .write_u256(&self.free_mint_supply)
            .write_u256(&self.free_mint_per_tx)
            .write_u256(&self.free_mint_user_cap)
            .write_address(&self.token_owner)
            .write_bool(self.burn_enabled);
        Ok(w.finish())
    }

    pub fn decode(calldata: &[u8]) -> Result<Self, AbiError> {
        let mut r = BinaryReader::new(calldata);
        let sel = r.read_u32()?;
        if sel != selector(DEPLOY_TOKEN_SIGNATURE) {
            return Err(AbiError::UnknownSelector(sel));
        }
        let args = Self {
            max_supply: r.read_u256()?,
            decimals: r.read_u8()?,
            name: r.read_string_with_length()?,
            symbol: r.read_string_with_length()?,
            initial_mint_to: r.read_address()?,
            initial_mint_amount: r.read_u256()?,
            free_mint_supply: r.read_u256()?,
            free_mint_per_tx: r.read_u256()?,
            free_mint_user_cap: r.read_u256()?,
            token_owner: r.read_address()?,
            burn_enabled: r.read_bool()?,
        };
        r.finish()?;
        Ok(args)
    }
}

/// `TokenDeployed(address deployer, address tokenAddress, string name, string symbol)`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenDeployed {
    pub deployer: Address,
    pub token_address: Address,
    pub name: String,
    pub symbol: String,
}

impl TokenDeployed {
    pub fn encode(&self) -> CodecResult<Vec<u8>> {
        let mut w = BinaryWriter::new();
        w.write_address(&self.deployer).write_address(&self.token_address);
        w.write_string_with_length(&self.name)?;
        w.write_string_with_length(&self.symbol)?;
        Ok(w.finish())
    }

    pub fn decode(data: &[u8]) -> CodecResult<Self> {
        let mut r = BinaryReader::new(data);
        Ok(Self {
            deployer: r.read_address()?,
            token_address: r.read_address()?,
            name: r.read_string_with_length()?,
            symbol: r.read_string_with_length()?,
        })
    }
}
