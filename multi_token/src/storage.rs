// Multi-Token Ledger - Storage Layer
// The ledger maps (owner, bin) to a packed 256-bit word. Entries that were
// never written read as zero; entries are never deleted.

use std::collections::HashMap;

use primitive_types::U256;

use crate::codec::BinCodec;
use crate::error::{MultiTokenError, MultiTokenResult};
use crate::types::{Address, TokenType};

// ========================================
// Storage Trait (for dependency injection)
// ========================================

/// Abstract bin storage. Runtime implementations provide concrete backends.
pub trait BalanceStorage {
    /// Packed word for `(owner, bin)`, zero when absent
    fn get_bin(&self, owner: &Address, bin: &U256) -> U256;

    /// Same as `get_bin`, but a backend failure is an error instead of a
    /// zero word. Every read that feeds a write goes through here.
    fn try_get_bin(&self, owner: &Address, bin: &U256) -> MultiTokenResult<U256> {
        Ok(self.get_bin(owner, bin))
    }

    /// Replace the packed word for `(owner, bin)`
    fn set_bin(&mut self, owner: &Address, bin: &U256, value: U256) -> MultiTokenResult<()>;
}

impl<S: BalanceStorage + ?Sized> BalanceStorage for &mut S {
    fn get_bin(&self, owner: &Address, bin: &U256) -> U256 {
        (**self).get_bin(owner, bin)
    }

    fn try_get_bin(&self, owner: &Address, bin: &U256) -> MultiTokenResult<U256> {
        (**self).try_get_bin(owner, bin)
    }

    fn set_bin(&mut self, owner: &Address, bin: &U256, value: U256) -> MultiTokenResult<()> {
        (**self).set_bin(owner, bin, value)
    }
}

/// In-memory ledger
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    bins: HashMap<(Address, U256), U256>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of (owner, bin) entries ever written
    pub fn len(&self) -> usize {
        self.bins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }

    /// Whether `(owner, bin)` has been written at least once
    pub fn contains(&self, owner: &Address, bin: &U256) -> bool {
        self.bins.contains_key(&(*owner, *bin))
    }
}

impl BalanceStorage for MemoryStorage {
    fn get_bin(&self, owner: &Address, bin: &U256) -> U256 {
        self.bins.get(&(*owner, *bin)).copied().unwrap_or_default()
    }

    fn set_bin(&mut self, owner: &Address, bin: &U256, value: U256) -> MultiTokenResult<()> {
        self.bins.insert((*owner, *bin), value);
        Ok(())
    }
}

// ========================================
// Balance Accessors
// ========================================

/// Balance of `owner` for `token_type`
pub fn get_balance<S: BalanceStorage + ?Sized>(
    storage: &S,
    codec: &BinCodec,
    owner: &Address,
    token_type: TokenType,
) -> U256 {
    let index = codec.locate(token_type);
    codec.unpack(storage.get_bin(owner, &index.bin), index.offset)
}

/// Overwrite the balance of `owner` for `token_type`
///
/// Only the bin covering `token_type` is written.
pub fn set_balance<S: BalanceStorage + ?Sized>(
    storage: &mut S,
    codec: &BinCodec,
    owner: &Address,
    token_type: TokenType,
    balance: U256,
) -> MultiTokenResult<()> {
    let index = codec.locate(token_type);
    let current = storage.try_get_bin(owner, &index.bin)?;
    let updated = codec.pack(current, index.offset, balance)?;
    storage.set_bin(owner, &index.bin, updated)
}

/// Element-wise balances, in input order
pub fn get_balance_batch<S: BalanceStorage + ?Sized>(
    storage: &S,
    codec: &BinCodec,
    owners: &[Address],
    token_types: &[TokenType],
) -> MultiTokenResult<Vec<U256>> {
    if owners.len() != token_types.len() {
        return Err(MultiTokenError::ArrayLengthMismatch);
    }

    Ok(owners
        .iter()
        .zip(token_types)
        .map(|(owner, token_type)| get_balance(storage, codec, owner, *token_type))
        .collect())
}
