//! Contract ABIs: the token template and the deployment factory.
//!
//! Function calldata is a 4-byte selector followed by the arguments in the
//! codec layout. The selector is the first four bytes of the SHA-256 of the
//! canonical signature, e.g. `burn(uint256)`.

pub mod factory;
pub mod token;

use sha2::{Digest, Sha256};

use crate::core::CodecError;

pub use factory::{DeployTokenArgs, TokenDeployed};
pub use token::{TokenCall, TokenInit};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum AbiError {
    #[error(transparent)]
    Codec(#[from] CodecError),
    #[error("unknown selector {0:#010x}")]
    UnknownSelector(u32),
}

pub fn selector(signature: &str) -> u32 {
    let digest = Sha256::digest(signature.as_bytes());
    u32::from_be_bytes([digest[0], digest[1], digest[2], digest[3]])
}
