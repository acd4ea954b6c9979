// Multi-Token Operations Module
// This module contains the transfer, mint and burn engines.
//
// The operations are runtime-agnostic:
// - Bin storage is abstracted via the `BalanceStorage` trait
// - Authorization is decided by the caller and passed in `OperationContext`
// - Contract detection and receiver hooks go through `ReceiverResolver`
//
// Every public operation is atomic. Bins are staged in a `BinOverlay`,
// committed through the journal, then the event is recorded and the
// receiver hook runs. Any error reverts the whole call, including changes
// made by calls nested inside a receiver hook.

mod burn;
mod mint;
mod query;
mod transfer;
mod validation;

pub use validation::*;

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use log::warn;
use primitive_types::U256;

use crate::codec::BinCodec;
use crate::config::{LedgerConfig, ON_ERC1155_BATCH_RECEIVED, ON_ERC1155_RECEIVED};
use crate::error::{MultiTokenError, MultiTokenResult};
use crate::events::TransferEvent;
use crate::journal::{Checkpoint, Journal};
use crate::overlay::BinOverlay;
use crate::planner::{apply_credits, apply_debits, BinEntry};
use crate::receiver::{check_acknowledgement, classify, ReceiverKind, ReceiverRegistry, ReceiverResolver};
use crate::storage::BalanceStorage;
use crate::types::{Address, TokenType};

// ========================================
// Operation Context
// ========================================

/// Caller identity and the access-control verdict for this call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperationContext {
    /// Account executing the operation
    pub operator: Address,
    /// Whether `operator` may move the tokens of the `from` account
    pub approved: bool,
}

impl OperationContext {
    pub fn new(operator: Address, approved: bool) -> Self {
        Self { operator, approved }
    }

    /// Context of an owner acting on its own tokens
    pub fn owner(owner: Address) -> Self {
        Self::new(owner, true)
    }
}

// ========================================
// Ledger Interface
// ========================================

/// Public surface of the ledger, object safe so receiver hooks can re-enter
pub trait MultiTokenLedger {
    fn balance_of(&self, owner: &Address, id: TokenType) -> U256;

    fn balance_of_batch(&self, owners: &[Address], ids: &[TokenType]) -> MultiTokenResult<Vec<U256>>;

    fn safe_transfer_from(
        &mut self,
        ctx: &OperationContext,
        from: &Address,
        to: &Address,
        id: TokenType,
        amount: U256,
        data: &[u8],
    ) -> MultiTokenResult<()>;

    fn safe_batch_transfer_from(
        &mut self,
        ctx: &OperationContext,
        from: &Address,
        to: &Address,
        ids: &[TokenType],
        amounts: &[U256],
        data: &[u8],
    ) -> MultiTokenResult<()>;

    fn mint(
        &mut self,
        ctx: &OperationContext,
        to: &Address,
        id: TokenType,
        amount: U256,
        data: &[u8],
    ) -> MultiTokenResult<()>;

    fn mint_batch(
        &mut self,
        ctx: &OperationContext,
        to: &Address,
        ids: &[TokenType],
        amounts: &[U256],
        data: &[u8],
    ) -> MultiTokenResult<()>;

    fn burn(
        &mut self,
        ctx: &OperationContext,
        from: &Address,
        id: TokenType,
        amount: U256,
    ) -> MultiTokenResult<()>;

    fn burn_batch(
        &mut self,
        ctx: &OperationContext,
        from: &Address,
        ids: &[TokenType],
        amounts: &[U256],
    ) -> MultiTokenResult<()>;
}

// ========================================
// Ledger
// ========================================

/// Packed-balance multi-token ledger
pub struct MultiToken<S> {
    storage: S,
    codec: BinCodec,
    receivers: Arc<dyn ReceiverResolver>,
    journal: Journal,
    events: Vec<TransferEvent>,
}

impl<S: BalanceStorage> MultiToken<S> {
    pub fn new(storage: S, config: LedgerConfig) -> Self {
        Self {
            storage,
            codec: BinCodec::from_config(&config),
            receivers: Arc::new(ReceiverRegistry::new()),
            journal: Journal::new(),
            events: Vec::new(),
        }
    }

    /// Use `receivers` to detect contracts and their acknowledgement hooks
    pub fn with_receivers(mut self, receivers: Arc<dyn ReceiverResolver>) -> Self {
        self.receivers = receivers;
        self
    }

    pub fn codec(&self) -> &BinCodec {
        &self.codec
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn into_storage(self) -> S {
        self.storage
    }

    /// Notifications recorded so far
    pub fn events(&self) -> &[TransferEvent] {
        &self.events
    }

    /// Open atomic frames, zero between calls
    pub fn journal_depth(&self) -> usize {
        self.journal.depth()
    }

    /// Drain recorded notifications for the event-log collaborator
    pub fn take_events(&mut self) -> Vec<TransferEvent> {
        std::mem::take(&mut self.events)
    }

    /// Run `op` atomically: on error every bin write and event it produced,
    /// including those of nested calls, is undone.
    /// A panic inside `op` (usually from a receiver hook) is undone the same
    /// way before it continues unwinding.
    fn run<F>(&mut self, op: F) -> MultiTokenResult<()>
    where
        F: FnOnce(&mut Self) -> MultiTokenResult<()>,
    {
        let checkpoint = self.journal.begin(self.events.len());
        match panic::catch_unwind(AssertUnwindSafe(|| op(&mut *self))) {
            Ok(Ok(())) => {
                self.journal.commit();
                Ok(())
            }
            Ok(Err(e)) => {
                self.rollback(checkpoint);
                Err(e)
            }
            Err(payload) => {
                warn!("operation panicked, reverting to checkpoint {:?}", checkpoint);
                self.rollback(checkpoint);
                panic::resume_unwind(payload)
            }
        }
    }

    fn rollback(&mut self, checkpoint: Checkpoint) {
        self.journal.revert(&mut self.storage, checkpoint);
        self.events.truncate(checkpoint.events());
    }

    fn stage_debits(
        &self,
        overlay: &mut BinOverlay,
        owner: &Address,
        bin: U256,
        entries: &[BinEntry],
    ) -> MultiTokenResult<()> {
        let current = overlay.load(&self.storage, owner, &bin)?;
        let updated = apply_debits(&self.codec, current, entries)?;
        overlay.stage(*owner, bin, updated);
        Ok(())
    }

    fn stage_credits(
        &self,
        overlay: &mut BinOverlay,
        owner: &Address,
        bin: U256,
        entries: &[BinEntry],
    ) -> MultiTokenResult<()> {
        let current = overlay.load(&self.storage, owner, &bin)?;
        let updated = apply_credits(&self.codec, current, entries)?;
        overlay.stage(*owner, bin, updated);
        Ok(())
    }

    /// Write staged bins, one write per bin
    fn commit_overlay(&mut self, overlay: BinOverlay) -> MultiTokenResult<()> {
        for ((owner, bin), value) in overlay.into_changes() {
            let previous = self.storage.try_get_bin(&owner, &bin)?;
            self.journal.record(owner, bin, previous);
            self.storage.set_bin(&owner, &bin, value)?;
        }
        Ok(())
    }

    fn emit(&mut self, event: TransferEvent) {
        self.events.push(event);
    }

    fn notify_single(
        &mut self,
        ctx: &OperationContext,
        from: &Address,
        to: &Address,
        id: TokenType,
        value: U256,
        data: &[u8],
    ) -> MultiTokenResult<()> {
        let resolver = Arc::clone(&self.receivers);
        match classify(resolver.as_ref(), to) {
            ReceiverKind::NotContract => Ok(()),
            ReceiverKind::ContractNoCapability => {
                warn!("contract {} cannot acknowledge transfers", to);
                Err(MultiTokenError::TransferRejected)
            }
            ReceiverKind::ContractWithCapability(receiver) => {
                let response = receiver.on_received_single(self, &ctx.operator, from, id, value, data);
                check_acknowledgement(to, response, ON_ERC1155_RECEIVED)
            }
        }
    }

    fn notify_batch(
        &mut self,
        ctx: &OperationContext,
        from: &Address,
        to: &Address,
        ids: &[TokenType],
        values: &[U256],
        data: &[u8],
    ) -> MultiTokenResult<()> {
        let resolver = Arc::clone(&self.receivers);
        match classify(resolver.as_ref(), to) {
            ReceiverKind::NotContract => Ok(()),
            ReceiverKind::ContractNoCapability => {
                warn!("contract {} cannot acknowledge batch transfers", to);
                Err(MultiTokenError::TransferRejected)
            }
            ReceiverKind::ContractWithCapability(receiver) => {
                let response = receiver.on_received_batch(self, &ctx.operator, from, ids, values, data);
                check_acknowledgement(to, response, ON_ERC1155_BATCH_RECEIVED)
            }
        }
    }
}

impl<S: BalanceStorage> MultiTokenLedger for MultiToken<S> {
    fn balance_of(&self, owner: &Address, id: TokenType) -> U256 {
        MultiToken::balance_of(self, owner, id)
    }

    fn balance_of_batch(&self, owners: &[Address], ids: &[TokenType]) -> MultiTokenResult<Vec<U256>> {
        MultiToken::balance_of_batch(self, owners, ids)
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
        MultiToken::safe_transfer_from(self, ctx, from, to, id, amount, data)
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
        MultiToken::safe_batch_transfer_from(self, ctx, from, to, ids, amounts, data)
    }

    fn mint(
        &mut self,
        ctx: &OperationContext,
        to: &Address,
        id: TokenType,
        amount: U256,
        data: &[u8],
    ) -> MultiTokenResult<()> {
        MultiToken::mint(self, ctx, to, id, amount, data)
    }

    fn mint_batch(
        &mut self,
        ctx: &OperationContext,
        to: &Address,
        ids: &[TokenType],
        amounts: &[U256],
        data: &[u8],
    ) -> MultiTokenResult<()> {
        MultiToken::mint_batch(self, ctx, to, ids, amounts, data)
    }

    fn burn(
        &mut self,
        ctx: &OperationContext,
        from: &Address,
        id: TokenType,
        amount: U256,
    ) -> MultiTokenResult<()> {
        MultiToken::burn(self, ctx, from, id, amount)
    }

    fn burn_batch(
        &mut self,
        ctx: &OperationContext,
        from: &Address,
        ids: &[TokenType],
        amounts: &[U256],
    ) -> MultiTokenResult<()> {
        MultiToken::burn_batch(self, ctx, from, ids, amounts)
    }
}

#[cfg(test)]
pub(crate) mod test_utils {
    use super::*;
    use crate::config::BalanceWidth;
    use crate::storage::MemoryStorage;

    pub fn alice() -> Address {
        Address::repeat_byte(0xa1)
    }

    pub fn bob() -> Address {
        Address::repeat_byte(0xb0)
    }

    pub fn carol() -> Address {
        Address::repeat_byte(0xc0)
    }

    pub fn ids(values: &[u64]) -> Vec<U256> {
        values.iter().map(|v| U256::from(*v)).collect()
    }

    pub fn ledger(width: BalanceWidth) -> MultiToken<MemoryStorage> {
        MultiToken::new(MemoryStorage::new(), LedgerConfig::new(width))
    }
}
