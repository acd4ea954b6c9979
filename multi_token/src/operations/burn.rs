// Multi-Token Burn Operations
// Destruction of balances. No receiver is notified.

use log::debug;
use primitive_types::U256;

use crate::error::MultiTokenResult;
use crate::events::TransferEvent;
use crate::overlay::BinOverlay;
use crate::planner::{group_by_bin, BinEntry};
use crate::storage::BalanceStorage;
use crate::types::{Address, TokenType};

use super::validation::{validate_authorized, validate_lengths, validate_sender};
use super::{MultiToken, OperationContext};

impl<S: BalanceStorage> MultiToken<S> {
    /// Destroy `amount` units of `id` held by `from`
    ///
    /// # Returns
    /// - `Ok(())`: Success, one single notification with a zero recipient
    /// - `Err(NotAuthorized)`: `ctx` does not allow burning `from`'s tokens
    /// - `Err(InvalidSender)`: `from` is zero
    /// - `Err(InsufficientBalance)`: `from` holds less than `amount`
    pub fn burn(
        &mut self,
        ctx: &OperationContext,
        from: &Address,
        id: TokenType,
        amount: U256,
    ) -> MultiTokenResult<()> {
        self.run(|ledger| {
            validate_authorized(ctx)?;
            validate_sender(from)?;

            let index = ledger.codec.locate(id);
            let entries = [BinEntry {
                position: 0,
                offset: index.offset,
                amount,
            }];
            let mut overlay = BinOverlay::new();
            ledger.stage_debits(&mut overlay, from, index.bin, &entries)?;
            ledger.commit_overlay(overlay)?;

            ledger.emit(TransferEvent::Single {
                operator: ctx.operator,
                from: *from,
                to: Address::ZERO,
                id,
                value: amount,
            });
            if log::log_enabled!(log::Level::Debug) {
                debug!("burned {} of token {} from {}", amount, id, from);
            }
            Ok(())
        })
    }

    /// Destroy `amounts[i]` units of `ids[i]` held by `from` for every `i`
    ///
    /// # Returns
    /// - `Err(ArrayLengthMismatch)`: `ids` and `amounts` differ in length
    /// - `Err(NotAuthorized)`, `Err(InvalidSender)`, `Err(InsufficientBalance)`
    pub fn burn_batch(
        &mut self,
        ctx: &OperationContext,
        from: &Address,
        ids: &[TokenType],
        amounts: &[U256],
    ) -> MultiTokenResult<()> {
        self.run(|ledger| {
            validate_lengths(ids, amounts)?;
            validate_authorized(ctx)?;
            validate_sender(from)?;

            let groups = group_by_bin(&ledger.codec, ids, amounts)?;
            let mut overlay = BinOverlay::new();
            for group in &groups {
                ledger.stage_debits(&mut overlay, from, group.bin, &group.entries)?;
            }
            ledger.commit_overlay(overlay)?;

            ledger.emit(TransferEvent::Batch {
                operator: ctx.operator,
                from: *from,
                to: Address::ZERO,
                ids: ids.to_vec(),
                values: amounts.to_vec(),
            });
            if log::log_enabled!(log::Level::Debug) {
                debug!("batch burned {} entries from {}", ids.len(), from);
            }
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_utils::*;
    use super::super::OperationContext;
    use crate::config::BalanceWidth;
    use crate::error::MultiTokenError;
    use crate::types::Address;
    use primitive_types::U256;

    #[test]
    fn test_burn_success() {
        let mut ledger = ledger(BalanceWidth::Bits16);
        let ctx = OperationContext::owner(alice());
        ledger.mint(&ctx, &alice(), U256::from(2), U256::from(10), &[]).unwrap();

        ledger.burn(&ctx, &alice(), U256::from(2), U256::from(4)).unwrap();
        assert_eq!(ledger.balance_of(&alice(), U256::from(2)), U256::from(6));

        let events = ledger.take_events();
        assert_eq!(events.len(), 2);
        assert!(events[1].is_burn());
        assert_eq!(events[1].to(), &Address::ZERO);
    }

    #[test]
    fn test_burn_underflow_guard() {
        let mut ledger = ledger(BalanceWidth::Bits32);
        let ctx = OperationContext::owner(alice());
        ledger.mint(&ctx, &alice(), U256::from(2), U256::from(3), &[]).unwrap();

        assert_eq!(
            ledger.burn(&ctx, &alice(), U256::from(2), U256::from(4)),
            Err(MultiTokenError::InsufficientBalance)
        );
        assert_eq!(ledger.balance_of(&alice(), U256::from(2)), U256::from(3));

        ledger.burn(&ctx, &alice(), U256::from(2), U256::from(3)).unwrap();
        assert_eq!(ledger.balance_of(&alice(), U256::from(2)), U256::zero());
    }

    #[test]
    fn test_burn_not_authorized() {
        let mut ledger = ledger(BalanceWidth::Bits32);
        ledger
            .mint(&OperationContext::owner(alice()), &alice(), U256::one(), U256::one(), &[])
            .unwrap();
        assert_eq!(
            ledger.burn(&OperationContext::new(bob(), false), &alice(), U256::one(), U256::one()),
            Err(MultiTokenError::NotAuthorized)
        );
    }

    #[test]
    fn test_burn_from_zero_address() {
        let mut ledger = ledger(BalanceWidth::Bits32);
        let ctx = OperationContext::owner(alice());
        assert_eq!(
            ledger.burn(&ctx, &Address::ZERO, U256::one(), U256::zero()),
            Err(MultiTokenError::InvalidSender)
        );
    }

    #[test]
    fn test_burn_batch_atomic() {
        let mut ledger = ledger(BalanceWidth::Bits16);
        let ctx = OperationContext::owner(alice());
        ledger
            .mint_batch(&ctx, &alice(), &ids(&[1, 40]), &ids(&[5, 5]), &[])
            .unwrap();
        ledger.take_events();

        assert_eq!(
            ledger.burn_batch(&ctx, &alice(), &ids(&[1, 40, 40]), &ids(&[5, 3, 3])),
            Err(MultiTokenError::InsufficientBalance)
        );
        assert_eq!(ledger.balance_of(&alice(), U256::one()), U256::from(5));
        assert_eq!(ledger.balance_of(&alice(), U256::from(40)), U256::from(5));
        assert!(ledger.events().is_empty());

        ledger
            .burn_batch(&ctx, &alice(), &ids(&[1, 40, 40]), &ids(&[5, 3, 2]))
            .unwrap();
        assert_eq!(ledger.balance_of(&alice(), U256::one()), U256::zero());
        assert_eq!(ledger.balance_of(&alice(), U256::from(40)), U256::zero());
        assert_eq!(ledger.events().len(), 1);
    }
}
