// Multi-Token Mint Operations
// Creation of new balances. Supply accounting and minting rights belong to
// the caller; only the recipient and the packed width are checked here.

use log::debug;
use primitive_types::U256;

use crate::error::MultiTokenResult;
use crate::events::TransferEvent;
use crate::overlay::BinOverlay;
use crate::planner::{group_by_bin, BinEntry};
use crate::storage::BalanceStorage;
use crate::types::{Address, TokenType};

use super::validation::{validate_lengths, validate_recipient};
use super::{MultiToken, OperationContext};

impl<S: BalanceStorage> MultiToken<S> {
    /// Create `amount` units of `id` for `to`
    ///
    /// # Returns
    /// - `Ok(())`: Success, one single notification with a zero sender
    /// - `Err(InvalidRecipient)`: `to` is zero
    /// - `Err(BalanceOverflow)`: the new balance would exceed the packed width
    /// - `Err(TransferRejected)`: contract recipient did not acknowledge
    pub fn mint(
        &mut self,
        ctx: &OperationContext,
        to: &Address,
        id: TokenType,
        amount: U256,
        data: &[u8],
    ) -> MultiTokenResult<()> {
        self.run(|ledger| {
            validate_recipient(to)?;

            let index = ledger.codec.locate(id);
            let entries = [BinEntry {
                position: 0,
                offset: index.offset,
                amount,
            }];
            let mut overlay = BinOverlay::new();
            ledger.stage_credits(&mut overlay, to, index.bin, &entries)?;
            ledger.commit_overlay(overlay)?;

            ledger.emit(TransferEvent::Single {
                operator: ctx.operator,
                from: Address::ZERO,
                to: *to,
                id,
                value: amount,
            });
            if log::log_enabled!(log::Level::Debug) {
                debug!("minted {} of token {} to {}", amount, id, to);
            }

            ledger.notify_single(ctx, &Address::ZERO, to, id, amount, data)
        })
    }

    /// Create `amounts[i]` units of `ids[i]` for `to` for every `i`
    ///
    /// # Returns
    /// - `Err(ArrayLengthMismatch)`: `ids` and `amounts` differ in length
    /// - `Err(InvalidRecipient)`, `Err(BalanceOverflow)`, `Err(TransferRejected)`
    pub fn mint_batch(
        &mut self,
        ctx: &OperationContext,
        to: &Address,
        ids: &[TokenType],
        amounts: &[U256],
        data: &[u8],
    ) -> MultiTokenResult<()> {
        self.run(|ledger| {
            validate_lengths(ids, amounts)?;
            validate_recipient(to)?;

            let groups = group_by_bin(&ledger.codec, ids, amounts)?;
            let mut overlay = BinOverlay::new();
            for group in &groups {
                ledger.stage_credits(&mut overlay, to, group.bin, &group.entries)?;
            }
            ledger.commit_overlay(overlay)?;

            ledger.emit(TransferEvent::Batch {
                operator: ctx.operator,
                from: Address::ZERO,
                to: *to,
                ids: ids.to_vec(),
                values: amounts.to_vec(),
            });
            if log::log_enabled!(log::Level::Debug) {
                debug!("batch minted {} entries across {} bins to {}", ids.len(), groups.len(), to);
            }

            ledger.notify_batch(ctx, &Address::ZERO, to, ids, amounts, data)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_utils::*;
    use super::super::OperationContext;
    use crate::config::BalanceWidth;
    use crate::error::MultiTokenError;
    use crate::events::TransferEvent;
    use crate::types::Address;
    use primitive_types::U256;

    #[test]
    fn test_mint_records_event() {
        let mut ledger = ledger(BalanceWidth::Bits32);
        let ctx = OperationContext::owner(bob());
        ledger.mint(&ctx, &alice(), U256::from(9), U256::from(3), &[]).unwrap();

        assert_eq!(ledger.balance_of(&alice(), U256::from(9)), U256::from(3));
        let events = ledger.take_events();
        assert_eq!(
            events,
            vec![TransferEvent::Single {
                operator: bob(),
                from: Address::ZERO,
                to: alice(),
                id: U256::from(9),
                value: U256::from(3),
            }]
        );
        assert!(events[0].is_mint());
    }

    #[test]
    fn test_mint_ignores_approval() {
        let mut ledger = ledger(BalanceWidth::Bits32);
        let ctx = OperationContext::new(bob(), false);
        ledger.mint(&ctx, &alice(), U256::one(), U256::one(), &[]).unwrap();
        assert_eq!(ledger.balance_of(&alice(), U256::one()), U256::one());
    }

    #[test]
    fn test_mint_to_zero_address() {
        let mut ledger = ledger(BalanceWidth::Bits32);
        let ctx = OperationContext::owner(alice());
        assert_eq!(
            ledger.mint(&ctx, &Address::ZERO, U256::one(), U256::one(), &[]),
            Err(MultiTokenError::InvalidRecipient)
        );
        assert!(ledger.storage().is_empty());
    }

    #[test]
    fn test_mint_overflow_guard() {
        for width in [BalanceWidth::Bits16, BalanceWidth::Bits32] {
            let mut ledger = ledger(width);
            let ctx = OperationContext::owner(alice());
            let max = width.max_value();

            ledger.mint(&ctx, &alice(), U256::from(5), max, &[]).unwrap();
            assert_eq!(
                ledger.mint(&ctx, &alice(), U256::from(5), U256::one(), &[]),
                Err(MultiTokenError::BalanceOverflow)
            );
            assert_eq!(ledger.balance_of(&alice(), U256::from(5)), max);
            assert_eq!(ledger.events().len(), 1);
        }
    }

    #[test]
    fn test_mint_neighbours_untouched() {
        let mut ledger = ledger(BalanceWidth::Bits16);
        let ctx = OperationContext::owner(alice());
        ledger.mint(&ctx, &alice(), U256::from(4), U256::from(7), &[]).unwrap();
        ledger.mint(&ctx, &alice(), U256::from(5), U256::from(9), &[]).unwrap();

        assert_eq!(ledger.balance_of(&alice(), U256::from(3)), U256::zero());
        assert_eq!(ledger.balance_of(&alice(), U256::from(4)), U256::from(7));
        assert_eq!(ledger.balance_of(&alice(), U256::from(5)), U256::from(9));
        assert_eq!(ledger.storage().len(), 1);
    }

    #[test]
    fn test_mint_batch_repeated_id() {
        let mut ledger = ledger(BalanceWidth::Bits32);
        let ctx = OperationContext::owner(alice());
        ledger
            .mint_batch(&ctx, &alice(), &ids(&[5, 5]), &ids(&[3, 4]), &[])
            .unwrap();
        assert_eq!(ledger.balance_of(&alice(), U256::from(5)), U256::from(7));
        assert_eq!(ledger.events().len(), 1);
    }

    #[test]
    fn test_mint_batch_overflow_is_atomic() {
        let mut ledger = ledger(BalanceWidth::Bits16);
        let ctx = OperationContext::owner(alice());
        let max = BalanceWidth::Bits16.max_value();

        // Second entry overflows a bin the first entry already touched
        let result = ledger.mint_batch(&ctx, &alice(), &ids(&[0, 1, 1]), &[U256::one(), max, U256::one()], &[]);
        assert_eq!(result, Err(MultiTokenError::BalanceOverflow));
        assert_eq!(ledger.balance_of(&alice(), U256::zero()), U256::zero());
        assert_eq!(ledger.balance_of(&alice(), U256::one()), U256::zero());
        assert!(ledger.storage().is_empty());
        assert!(ledger.events().is_empty());
    }

    #[test]
    fn test_mint_batch_length_mismatch() {
        let mut ledger = ledger(BalanceWidth::Bits32);
        let ctx = OperationContext::owner(alice());
        assert_eq!(
            ledger.mint_batch(&ctx, &alice(), &ids(&[1]), &ids(&[1, 2]), &[]),
            Err(MultiTokenError::ArrayLengthMismatch)
        );
    }
}
