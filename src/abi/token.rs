//! MintableToken ABI: deployment initializer plus `mint` and `burn`.

use ruint::aliases::U256;
use serde::Serialize;

use super::{selector, AbiError};
use crate::core::codec::{BinaryReader, BinaryWriter, CodecResult, STRING_LEN_PREFIX, U256_LEN};
use crate::core::address::{Address, ADDRESS_LEN};

pub const MINT_SIGNATURE: &str = "mint(address,uint256)";
pub const BURN_SIGNATURE: &str = "burn(uint256)";

/// Bytes of the initializer payload that do not depend on name/symbol.
pub const FIXED_HEADER_LEN: usize = U256_LEN + 1 + STRING_LEN_PREFIX * 2 + ADDRESS_LEN + U256_LEN;

/// Deployment-time initializer arguments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenInit {
    pub max_supply: U256,
    pub decimals: u8,
    pub name: String,
    pub symbol: String,
    pub initial_mint_to: Address,
    pub initial_mint_amount: U256,
}

impl TokenInit {
    pub fn encode(&self) -> CodecResult<Vec<u8>> {
        let mut w = BinaryWriter::new();
        w.write_u256(&self.max_supply).write_u8(self.decimals);
        w.write_string_with_length(&self.name)?;
        w.write_string_with_length(&self.symbol)?;
        w.write_address(&self.initial_mint_to).write_u256(&self.initial_mint_amount);
        Ok(w.finish())
    }

    pub fn decode(calldata: &[u8]) -> CodecResult<Self> {
        let mut r = BinaryReader::new(calldata);
        let init = Self {
            max_supply: r.read_u256()?,
            decimals: r.read_u8()?,
            name: r.read_string_with_length()?,
            symbol: r.read_string_with_length()?,
            initial_mint_to: r.read_address()?,
            initial_mint_amount: r.read_u256()?,
        };
        r.finish()?;
        Ok(init)
    }

    pub fn encoded_len(&self) -> usize {
        FIXED_HEADER_LEN + self.name.len() + self.symbol.len()
    }
}

/// A decoded call against the token's runtime entry points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenCall {
    Mint { to: Address, amount: U256 },
    Burn { amount: U256 },
}

impl TokenCall {
    pub fn encode(&self) -> Vec<u8> {
        match self {
            TokenCall::Mint { to, amount } => {
                let mut w = BinaryWriter::with_selector(selector(MINT_SIGNATURE));
                w.write_address(to).write_u256(amount);
                w.finish()
            }
            TokenCall::Burn { amount } => {
                let mut w = BinaryWriter::with_selector(selector(BURN_SIGNATURE));
                w.write_u256(amount);
                w.finish()
            }
        }
    }

    pub fn decode(calldata: &[u8]) -> Result<Self, AbiError> {
        let mut r = BinaryReader::new(calldata);
        let sel = r.read_u32()?;
        let call = if sel == selector(MINT_SIGNATURE) {
            TokenCall::Mint { to: r.read_address()?, amount: r.read_u256()? }
        } else if sel == selector(BURN_SIGNATURE) {
            TokenCall::Burn { amount: r.read_u256()? }
        } else {
            return Err(AbiError::UnknownSelector(sel));
        };
        r.finish()?;
        Ok(call)
    }
}
