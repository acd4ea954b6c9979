// Multi-Token Transfer Operations
// Single and batch transfers between two owners.

use log::debug;
use primitive_types::U256;

use crate::error::{MultiTokenError, MultiTokenResult};
use crate::events::TransferEvent;
use crate::overlay::BinOverlay;
use crate::planner::{group_by_bin, BinEntry};
use crate::storage::BalanceStorage;
use crate::types::{Address, TokenType};

use super::validation::{validate_authorized, validate_lengths, validate_recipient, validate_sender};
use super::{MultiToken, OperationContext};

impl<S: BalanceStorage> MultiToken<S> {
    // ========================================
    // Single Transfer
    // ========================================

    /// Move `amount` of token type `id` from `from` to `to`
    ///
    /// `from == to` is a real transfer: the debit is applied before the
    /// credit, so the balance must cover `amount` and ends unchanged.
    ///
    /// # Returns
    /// - `Ok(())`: Success, one single notification recorded
    /// - `Err(NotAuthorized)`: `ctx` does not allow moving `from`'s tokens
    /// - `Err(InvalidRecipient)`: `to` is zero
    /// - `Err(InvalidSender)`: `from` is zero
    /// - `Err(InsufficientBalance)`: `from` holds less than `amount`
    /// - `Err(BalanceOverflow)`: `to`'s balance would exceed the packed width
    /// - `Err(TransferRejected)`: contract recipient did not acknowledge
    pub fn safe_transfer_from(
        &mut self,
        ctx: &OperationContext,
        from: &Address,
        to: &Address,
        id: TokenType,
        amount: U256,
        data: &[u8],
    ) -> MultiTokenResult<()> {
        self.run(|ledger| {
            // Step 1: Input validation
            validate_authorized(ctx)?;
            validate_recipient(to)?;
            validate_sender(from)?;

            // Step 2: Stage debit then credit
            let index = ledger.codec.locate(id);
            let entries = [BinEntry {
                position: 0,
                offset: index.offset,
                amount,
            }];
            let mut overlay = BinOverlay::new();
            ledger.stage_debits(&mut overlay, from, index.bin, &entries)?;
            ledger.stage_credits(&mut overlay, to, index.bin, &entries)?;

            // Step 3: Commit before any external call
            ledger.commit_overlay(overlay)?;
            ledger.emit(TransferEvent::Single {
                operator: ctx.operator,
                from: *from,
                to: *to,
                id,
                value: amount,
            });
            if log::log_enabled!(log::Level::Debug) {
                debug!("transferred {} of token {} from {} to {}", amount, id, from, to);
            }

            // Step 4: Receiver acknowledgement
            ledger.notify_single(ctx, from, to, id, amount, data)
        })
    }

    // ========================================
    // Batch Transfer
    // ========================================

    /// Move `amounts[i]` of `ids[i]` from `from` to `to` for every `i`
    ///
    /// Each bin of the sender and of the recipient is read and written once.
    /// A batch with `from == to` writes nothing: every entry is checked
    /// against the pre-call balance and the call is otherwise a no-op.
    ///
    /// # Returns
    /// - `Ok(())`: Success, one batch notification listing every id
    /// - `Err(ArrayLengthMismatch)`: `ids` and `amounts` differ in length
    /// - `Err(NotAuthorized)`, `Err(InvalidRecipient)`, `Err(InvalidSender)`
    /// - `Err(InsufficientBalance)`, `Err(BalanceOverflow)`
    /// - `Err(TransferRejected)`: contract recipient did not acknowledge
    pub fn safe_batch_transfer_from(
        &mut self,
        ctx: &OperationContext,
        from: &Address,
        to: &Address,
        ids: &[TokenType],
        amounts: &[U256],
        data: &[u8],
    ) -> MultiTokenResult<()> {
        self.run(|ledger| {
            // Step 1: Input validation
            validate_lengths(ids, amounts)?;
            validate_authorized(ctx)?;
            validate_recipient(to)?;
            validate_sender(from)?;

            // Step 2: Update balances
            if from == to {
                ledger.check_balances(from, ids, amounts)?;
            } else {
                let groups = group_by_bin(&ledger.codec, ids, amounts)?;
                let mut overlay = BinOverlay::new();
                for group in &groups {
                    ledger.stage_debits(&mut overlay, from, group.bin, &group.entries)?;
                }
                for group in &groups {
                    ledger.stage_credits(&mut overlay, to, group.bin, &group.entries)?;
                }
                ledger.commit_overlay(overlay)?;
            }

            // Step 3: One notification for the whole batch
            ledger.emit(TransferEvent::Batch {
                operator: ctx.operator,
                from: *from,
                to: *to,
                ids: ids.to_vec(),
                values: amounts.to_vec(),
            });
            if log::log_enabled!(log::Level::Debug) {
                debug!("batch transferred {} entries from {} to {}", ids.len(), from, to);
            }

            // Step 4: Receiver acknowledgement
            ledger.notify_batch(ctx, from, to, ids, amounts, data)
        })
    }

    /// Every entry must be covered by the current balance on its own
    fn check_balances(&self, owner: &Address, ids: &[TokenType], amounts: &[U256]) -> MultiTokenResult<()> {
        for (position, (id, amount)) in ids.iter().zip(amounts).enumerate() {
            let index = self.codec.locate(*id);
            let balance = self
                .codec
                .unpack(self.storage.try_get_bin(owner, &index.bin)?, index.offset);
            if balance < *amount {
                if log::log_enabled!(log::Level::Debug) {
                    debug!(
                        "insufficient balance at batch position {}: token {}, balance {}, amount {}",
                        position, id, balance, amount
                    );
                }
                return Err(MultiTokenError::InsufficientBalance);
            }
        }
        Ok(())
    }
}
