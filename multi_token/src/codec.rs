//! Bin codec
//!
//! A bin is one 256-bit storage word holding `items_per_bin` fixed-width
//! balances. Sub-field `i` occupies bits `[i * bits, (i + 1) * bits)`.
//!
//! ```text
//!  bit 255                                                   bit 0
//!  | offset 7 | offset 6 | ... | offset 1 | offset 0 |   (32-bit width)
//! ```

use primitive_types::U256;

use crate::config::{BalanceWidth, LedgerConfig};
use crate::error::{MultiTokenError, MultiTokenResult};
use crate::types::{BinIndex, CompactTokenType, TokenType};

/// Stateless packing rules for one balance width
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BinCodec {
    width: BalanceWidth,
}

impl BinCodec {
    pub fn new(width: BalanceWidth) -> Self {
        Self { width }
    }

    pub fn from_config(config: &LedgerConfig) -> Self {
        Self::new(config.balance_width)
    }

    #[inline]
    pub fn width(&self) -> BalanceWidth {
        self.width
    }

    #[inline]
    pub fn items_per_bin(&self) -> usize {
        self.width.items_per_bin()
    }

    #[inline]
    pub fn max_value(&self) -> U256 {
        self.width.max_value()
    }

    /// Bin and offset holding `token_type`
    pub fn locate(&self, token_type: TokenType) -> BinIndex {
        let items = U256::from(self.items_per_bin());
        let bin = token_type / items;
        // offset < items_per_bin <= 16
        let offset = (token_type % items).low_u64() as usize;
        BinIndex::new(bin, offset)
    }

    /// Same as `locate`, for 32-bit identifiers of the compact variant
    pub fn locate_compact(&self, token_type: CompactTokenType) -> (CompactTokenType, usize) {
        let items = self.items_per_bin() as CompactTokenType;
        (token_type / items, (token_type % items) as usize)
    }

    /// Read the balance stored at `offset`
    pub fn unpack(&self, bin_value: U256, offset: usize) -> U256 {
        debug_assert!(offset < self.items_per_bin(), "offset out of range");
        (bin_value >> self.shift(offset)) & self.max_value()
    }

    /// Replace the balance stored at `offset`, leaving the other sub-fields intact
    pub fn pack(&self, bin_value: U256, offset: usize, balance: U256) -> MultiTokenResult<U256> {
        debug_assert!(offset < self.items_per_bin(), "offset out of range");
        let mask = self.max_value();
        if balance > mask {
            return Err(MultiTokenError::ValueTooLarge);
        }

        let shift = self.shift(offset);
        let cleared = bin_value & !(mask << shift);
        Ok(cleared | (balance << shift))
    }

    #[inline]
    fn shift(&self, offset: usize) -> usize {
        offset * self.width.bits()
    }
}
