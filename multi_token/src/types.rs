// Multi-Token Ledger - Core Types
// Identifiers shared by every component of the ledger.

use std::fmt;

use primitive_types::U256;
use serde::{Deserialize, Serialize};

/// Token type identifier (general 256-bit scheme)
pub type TokenType = U256;

/// Token type identifier of the compact variant
pub type CompactTokenType = u32;

/// Four-byte function selector returned by receiver hooks
pub type Selector = [u8; 4];

/// Account identity holding balances (20 bytes, EVM style)
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Address([u8; 20]);

impl Address {
    /// The null address, never a valid recipient
    pub const ZERO: Address = Address([0u8; 20]);

    pub const fn new(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    /// Address with every byte set to `byte`
    pub const fn repeat_byte(byte: u8) -> Self {
        Self([byte; 20])
    }

    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 20]
    }
}

impl From<[u8; 20]> for Address {
    fn from(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self)
    }
}

/// Location of a token type inside the packed ledger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BinIndex {
    /// Bin number (`token_type / items_per_bin`)
    pub bin: U256,
    /// Sub-field inside the bin (`token_type % items_per_bin`)
    pub offset: usize,
}

impl BinIndex {
    pub fn new(bin: U256, offset: usize) -> Self {
        Self { bin, offset }
    }
}
