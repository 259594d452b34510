//! Core types shared by every surface: networks, addresses, calldata codec.

pub mod address;
pub mod codec;
pub mod markup;
pub mod network;

pub use address::{Address, AddressError};
pub use codec::{BinaryReader, BinaryWriter, CodecError, CodecResult};
pub use network::{format_btc, group_thousands, Network};
pub use ruint::aliases::U256;
