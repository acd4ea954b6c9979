// Multi-Token Ledger - Shared Handle
// Serializes every operation on one ledger across threads. The guard is
// held for the whole call, and receiver hooks re-enter through the ledger
// they are handed, so nested calls never lock again.

use std::sync::{Arc, Mutex};

use primitive_types::U256;

use crate::error::MultiTokenResult;
use crate::events::TransferEvent;
use crate::operations::{MultiToken, MultiTokenLedger, OperationContext};
use crate::storage::BalanceStorage;
use crate::types::{Address, TokenType};

/// Cloneable, thread-safe handle to a ledger
pub struct SharedMultiToken<S> {
    inner: Arc<Mutex<MultiToken<S>>>,
}

impl<S> Clone for SharedMultiToken<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: BalanceStorage> SharedMultiToken<S> {
    pub fn new(ledger: MultiToken<S>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(ledger)),
        }
    }

    /// Run `f` with exclusive access to the ledger
    pub fn with_ledger<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut MultiToken<S>) -> R,
    {
        let mut guard = match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        f(&mut guard)
    }

    pub fn take_events(&self) -> Vec<TransferEvent> {
        self.with_ledger(|ledger| ledger.take_events())
    }
}

impl<S: BalanceStorage> MultiTokenLedger for SharedMultiToken<S> {
    fn balance_of(&self, owner: &Address, id: TokenType) -> U256 {
        self.with_ledger(|ledger| ledger.balance_of(owner, id))
    }

    fn balance_of_batch(&self, owners: &[Address], ids: &[TokenType]) -> MultiTokenResult<Vec<U256>> {
        self.with_ledger(|ledger| ledger.balance_of_batch(owners, ids))
    }

    fn safe_transfer_from(
        &mut self,
        ctx: &OperationContext,
        from: &Address,
        to: &Address,
        id: TokenType,
        amount: U256,
        data: &[u8],
    ) -> MultiTokenResult<()> {
        self.with_ledger(|ledger| ledger.safe_transfer_from(ctx, from, to, id, amount, data))
    }

    fn safe_batch_transfer_from(
        &mut self,
        ctx: &OperationContext,
        from: &Address,
        to: &Address,
        ids: &[TokenType],
        amounts: &[U256],
        data: &[u8],
    ) -> MultiTokenResult<()> {
        self.with_ledger(|ledger| ledger.safe_batch_transfer_from(ctx, from, to, ids, amounts, data))
    }

    fn mint(
        &mut self,
        ctx: &OperationContext,
        to: &Address,
        id: TokenType,
        amount: U256,
        data: &[u8],
    ) -> MultiTokenResult<()> {
        self.with_ledger(|ledger| ledger.mint(ctx, to, id, amount, data))
    }

    fn mint_batch(
        &mut self,
        ctx: &OperationContext,
        to: &Address,
        ids: &[TokenType],
        amounts: &[U256],
        data: &[u8],
    ) -> MultiTokenResult<()> {
        self.with_ledger(|ledger| ledger.mint_batch(ctx, to, ids, amounts, data))
    }

    fn burn(
        &mut self,
        ctx: &OperationContext,
        from: &Address,
        id: TokenType,
        amount: U256,
    ) -> MultiTokenResult<()> {
        self.with_ledger(|ledger| ledger.burn(ctx, from, id, amount))
    }

    fn burn_batch(
        &mut self,
        ctx: &OperationContext,
        from: &Address,
        ids: &[TokenType],
        amounts: &[U256],
    ) -> MultiTokenResult<()> {
        self.with_ledger(|ledger| ledger.burn_batch(ctx, from, ids, amounts))
    }
}
