use primitive_types::U256;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::Selector;

// Size of a storage bin in bits
pub const BIN_BITS: usize = 256;

// Receiver acknowledgement values
// keccak256("onERC1155Received(address,address,uint256,uint256,bytes)")[..4]
pub const ON_ERC1155_RECEIVED: Selector = [0xf2, 0x3a, 0x6e, 0x61];
// keccak256("onERC1155BatchReceived(address,address,uint256[],uint256[],bytes)")[..4]
pub const ON_ERC1155_BATCH_RECEIVED: Selector = [0xbc, 0x19, 0x7c, 0x81];

// Interface ids (ERC-165)
pub const ERC165_INTERFACE_ID: Selector = [0x01, 0xff, 0xc9, 0xa7];
pub const ERC1155_INTERFACE_ID: Selector = [0xd9, 0xb6, 0x7a, 0x26];
// XOR of both receiver selectors
pub const ERC1155_RECEIVER_INTERFACE_ID: Selector = [0x4e, 0x23, 0x12, 0xe0];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Unsupported balance width: {0} bits")]
    UnsupportedBalanceWidth(u32),
}

/// Number of bits used by each packed balance
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum BalanceWidth {
    /// 16 balances per bin
    Bits16,
    /// 8 balances per bin
    #[default]
    Bits32,
}

impl BalanceWidth {
    #[inline]
    pub const fn bits(&self) -> usize {
        match self {
            BalanceWidth::Bits16 => 16,
            BalanceWidth::Bits32 => 32,
        }
    }

    #[inline]
    pub const fn items_per_bin(&self) -> usize {
        BIN_BITS / self.bits()
    }

    /// Largest balance a sub-field can hold (`2^bits - 1`)
    pub fn max_value(&self) -> U256 {
        (U256::one() << self.bits()) - U256::one()
    }
}

impl TryFrom<u32> for BalanceWidth {
    type Error = ConfigError;

    fn try_from(bits: u32) -> Result<Self, Self::Error> {
        match bits {
            16 => Ok(BalanceWidth::Bits16),
            32 => Ok(BalanceWidth::Bits32),
            other => Err(ConfigError::UnsupportedBalanceWidth(other)),
        }
    }
}

impl From<BalanceWidth> for u32 {
    fn from(width: BalanceWidth) -> Self {
        width.bits() as u32
    }
}

/// Ledger configuration, fixed for the lifetime of a ledger instance
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerConfig {
    pub balance_width: BalanceWidth,
}

impl LedgerConfig {
    pub fn new(balance_width: BalanceWidth) -> Self {
        Self { balance_width }
    }
}
