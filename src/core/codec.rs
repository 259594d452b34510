//! Calldata codec - OP_NET binary layout
//!
//! Everything is big-endian. `u256` values take 32 bytes, addresses 32 bytes,
//! booleans one byte, strings a `u32` byte length followed by UTF-8.
//!
//! ```text
//! u256 maxSupply | u8 decimals | str name | str symbol | address to | u256 amount
//!      32             1          4 + n       4 + m          32           32
//! ```

use ruint::aliases::U256;

use super::address::{Address, ADDRESS_LEN};

pub const U256_LEN: usize = 32;
pub const STRING_LEN_PREFIX: usize = 4;

#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum CodecError {
    #[error("unexpected end of calldata: need {needed} bytes at offset {offset}, {available} available")]
    UnexpectedEnd { offset: usize, needed: usize, available: usize },
    #[error("string at offset {0} is not valid UTF-8")]
    InvalidUtf8(usize),
    #[error("string too long: {0} bytes")]
    StringTooLong(usize),
    #[error("invalid boolean byte {0:#04x}")]
    InvalidBool(u8),
    #[error("{0} trailing bytes after payload")]
    TrailingBytes(usize),
}

pub type CodecResult<T> = Result<T, CodecError>;

/// Append-only calldata buffer.
#[derive(Debug, Default, Clone)]
pub struct BinaryWriter {
    buf: Vec<u8>,
}

impl BinaryWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_selector(selector: u32) -> Self {
        let mut w = Self::new();
        w.write_u32(selector);
        w
    }

    pub fn write_u8(&mut self, value: u8) -> &mut Self {
        self.buf.push(value);
        self
    }

    pub fn write_bool(&mut self, value: bool) -> &mut Self {
        self.write_u8(value as u8)
    }

    pub fn write_u32(&mut self, value: u32) -> &mut Self {
        self.buf.extend_from_slice(&value.to_be_bytes());
        self
    }

    pub fn write_u256(&mut self, value: &U256) -> &mut Self {
        self.buf.extend_from_slice(&value.to_be_bytes::<U256_LEN>());
        self
    }

    pub fn write_address(&mut self, value: &Address) -> &mut Self {
        self.buf.extend_from_slice(value.as_bytes());
        self
    }

    pub fn write_string_with_length(&mut self, value: &str) -> CodecResult<&mut Self> {
        let len = u32::try_from(value.len()).map_err(|_| CodecError::StringTooLong(value.len()))?;
        self.write_u32(len);
        self.buf.extend_from_slice(value.as_bytes());
        Ok(self)
    }

    pub fn write_bytes(&mut self, value: &[u8]) -> &mut Self {
        self.buf.extend_from_slice(value);
        self
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn finish(self) -> Vec<u8> {
        self.buf
    }
}

/// Cursor over calldata.
#[derive(Debug, Clone)]
pub struct BinaryReader<'a> {
    data: &'a [u8],
    offset: usize,
}

impl<'a> BinaryReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, offset: 0 }
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.offset
    }

    fn take(&mut self, needed: usize) -> CodecResult<&'a [u8]> {
        if self.remaining() < needed {
            return Err(CodecError::UnexpectedEnd { offset: self.offset, needed, available: self.remaining() });
        }
        let slice = &self.data[self.offset..self.offset + needed];
        self.offset += needed;
        Ok(slice)
    }

    pub fn read_u8(&mut self) -> CodecResult<u8> {
        Ok(self.take(1)?[0])
    }

    pub fn read_bool(&mut self) -> CodecResult<bool> {
        match self.read_u8()? {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(CodecError::InvalidBool(other)),
        }
    }

    pub fn read_u32(&mut self) -> CodecResult<u32> {
        let bytes = self.take(4)?;
        Ok(u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    pub fn read_u256(&mut self) -> CodecResult<U256> {
        let mut out = [0u8; U256_LEN];
        out.copy_from_slice(self.take(U256_LEN)?);
        Ok(U256::from_be_bytes(out))
    }

    pub fn read_address(&mut self) -> CodecResult<Address> {
        let mut out = [0u8; ADDRESS_LEN];
        out.copy_from_slice(self.take(ADDRESS_LEN)?);
        Ok(Address::new(out))
    }

    pub fn read_string_with_length(&mut self) -> CodecResult<String> {
        let len = self.read_u32()? as usize;
        let start = self.offset;
        let bytes = self.take(len)?;
        String::from_utf8(bytes.to_vec()).map_err(|_| CodecError::InvalidUtf8(start))
    }

    /// Fails if anything is left unread.
    pub fn finish(self) -> CodecResult<()> {
        match self.remaining() {
            0 => Ok(()),
            n => Err(CodecError::TrailingBytes(n)),
        }
    }
}

/// Parse a decimal (or `0x` hex) integer into a `U256`.
pub fn parse_u256(value: &str) -> Option<U256> {
    let value = value.trim();
    if value.is_empty() || value.starts_with('-') || value.starts_with('+') {
        return None;
    }
    match value.strip_prefix("0x") {
        Some(hex_digits) => U256::from_str_radix(hex_digits, 16).ok(),
        None => U256::from_str_radix(value, 10).ok(),
    }
}

/// `value * 10^decimals`, `None` on overflow.
pub fn scale_by_decimals(value: U256, decimals: u8) -> Option<U256> {
    let ten = U256::from(10u64);
    let mut out = value;
    for _ in 0..decimals {
        out = out.checked_mul(ten)?;
    }
    Some(out)
}
