//! Batch planning
//!
//! Groups the `(token_type, amount)` pairs of a batch by bin so that each
//! bin is read once, updated in memory and written back once, even when the
//! input revisits a bin non-contiguously. Within a bin, entries keep their
//! input order and are applied against the running value, so a token type
//! repeated in one batch accumulates.

use indexmap::IndexMap;
use log::debug;
use primitive_types::U256;

use crate::codec::BinCodec;
use crate::error::{MultiTokenError, MultiTokenResult};
use crate::types::TokenType;

/// One `(token_type, amount)` pair of the input, located in its bin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BinEntry {
    /// Position in the caller's arrays
    pub position: usize,
    pub offset: usize,
    pub amount: U256,
}

/// All entries of a batch that land in the same bin
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinGroup {
    pub bin: U256,
    pub entries: Vec<BinEntry>,
}

/// Group a batch by bin, bins ordered by first appearance
pub fn group_by_bin(
    codec: &BinCodec,
    token_types: &[TokenType],
    amounts: &[U256],
) -> MultiTokenResult<Vec<BinGroup>> {
    if token_types.len() != amounts.len() {
        return Err(MultiTokenError::ArrayLengthMismatch);
    }

    let mut groups: IndexMap<U256, Vec<BinEntry>> = IndexMap::new();
    for (position, (token_type, amount)) in token_types.iter().zip(amounts).enumerate() {
        let index = codec.locate(*token_type);
        groups.entry(index.bin).or_default().push(BinEntry {
            position,
            offset: index.offset,
            amount: *amount,
        });
    }

    Ok(groups
        .into_iter()
        .map(|(bin, entries)| BinGroup { bin, entries })
        .collect())
}

/// Subtract every entry from its sub-field, in order
///
/// Fails with `InsufficientBalance` at the first entry whose running
/// balance is short.
pub fn apply_debits(codec: &BinCodec, bin_value: U256, entries: &[BinEntry]) -> MultiTokenResult<U256> {
    let mut value = bin_value;
    for entry in entries {
        let balance = codec.unpack(value, entry.offset);
        let remaining = balance.checked_sub(entry.amount).ok_or_else(|| {
            if log::log_enabled!(log::Level::Debug) {
                debug!(
                    "insufficient balance at batch position {}: balance {}, amount {}",
                    entry.position, balance, entry.amount
                );
            }
            MultiTokenError::InsufficientBalance
        })?;
        value = codec.pack(value, entry.offset, remaining)?;
    }
    Ok(value)
}

/// Add every entry to its sub-field, in order
///
/// Fails with `BalanceOverflow` at the first entry whose running balance
/// would exceed the packed width.
pub fn apply_credits(codec: &BinCodec, bin_value: U256, entries: &[BinEntry]) -> MultiTokenResult<U256> {
    let max = codec.max_value();
    let mut value = bin_value;
    for entry in entries {
        let balance = codec.unpack(value, entry.offset);
        let updated = balance
            .checked_add(entry.amount)
            .filter(|sum| *sum <= max)
            .ok_or_else(|| {
                if log::log_enabled!(log::Level::Debug) {
                    debug!(
                        "balance overflow at batch position {}: balance {}, amount {}",
                        entry.position, balance, entry.amount
                    );
                }
                MultiTokenError::BalanceOverflow
            })?;
        value = codec.pack(value, entry.offset, updated)?;
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BalanceWidth;

    fn ids(values: &[u64]) -> Vec<U256> {
        values.iter().map(|v| U256::from(*v)).collect()
    }

    #[test]
    fn test_group_contiguous_ids() {
        let codec = BinCodec::new(BalanceWidth::Bits16);
        let groups = group_by_bin(&codec, &ids(&[0, 1, 2, 15]), &ids(&[1, 1, 1, 1])).unwrap();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].bin, U256::zero());
        assert_eq!(
            groups[0].entries.iter().map(|e| e.offset).collect::<Vec<_>>(),
            vec![0, 1, 2, 15]
        );
    }

    #[test]
    fn test_group_non_contiguous_revisit() {
        let codec = BinCodec::new(BalanceWidth::Bits16);
        let groups = group_by_bin(&codec, &ids(&[0, 16, 3, 17]), &ids(&[1, 2, 3, 4])).unwrap();

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].bin, U256::zero());
        assert_eq!(groups[1].bin, U256::one());
        assert_eq!(
            groups[0].entries,
            vec![
                BinEntry { position: 0, offset: 0, amount: U256::from(1) },
                BinEntry { position: 2, offset: 3, amount: U256::from(3) },
            ]
        );
        assert_eq!(
            groups[1].entries.iter().map(|e| e.position).collect::<Vec<_>>(),
            vec![1, 3]
        );
    }

    #[test]
    fn test_group_length_mismatch() {
        let codec = BinCodec::default();
        let result = group_by_bin(&codec, &ids(&[1, 2]), &ids(&[1]));
        assert_eq!(result, Err(MultiTokenError::ArrayLengthMismatch));
    }

    #[test]
    fn test_group_empty_batch() {
        let codec = BinCodec::default();
        assert!(group_by_bin(&codec, &[], &[]).unwrap().is_empty());
    }

    #[test]
    fn test_repeated_id_accumulates() {
        let codec = BinCodec::default();
        let groups = group_by_bin(&codec, &ids(&[5, 5]), &ids(&[3, 4])).unwrap();
        let value = apply_credits(&codec, U256::zero(), &groups[0].entries).unwrap();
        assert_eq!(codec.unpack(value, 5), U256::from(7));
    }

    #[test]
    fn test_debits_use_running_value() {
        let codec = BinCodec::default();
        let bin = codec.pack(U256::zero(), 2, U256::from(10)).unwrap();
        let groups = group_by_bin(&codec, &ids(&[2, 2]), &ids(&[6, 5])).unwrap();

        // 10 - 6 leaves 4, the second debit of 5 must fail
        let result = apply_debits(&codec, bin, &groups[0].entries);
        assert_eq!(result, Err(MultiTokenError::InsufficientBalance));
    }

    #[test]
    fn test_credit_overflow() {
        let codec = BinCodec::new(BalanceWidth::Bits16);
        let bin = codec.pack(U256::zero(), 0, U256::from(u16::MAX)).unwrap();
        let entries = [BinEntry { position: 0, offset: 0, amount: U256::one() }];
        assert_eq!(
            apply_credits(&codec, bin, &entries),
            Err(MultiTokenError::BalanceOverflow)
        );
    }

    #[test]
    fn test_credit_huge_amount_overflows() {
        let codec = BinCodec::default();
        let entries = [BinEntry { position: 0, offset: 1, amount: U256::MAX }];
        assert_eq!(
            apply_credits(&codec, U256::one(), &entries),
            Err(MultiTokenError::BalanceOverflow)
        );
    }

    #[test]
    fn test_debit_credit_leave_other_offsets() {
        let codec = BinCodec::default();
        let mut bin = U256::zero();
        for offset in 0..8 {
            bin = codec.pack(bin, offset, U256::from(100 + offset)).unwrap();
        }
        let entries = [BinEntry { position: 0, offset: 4, amount: U256::from(50) }];
        let debited = apply_debits(&codec, bin, &entries).unwrap();

        for offset in 0..8 {
            let expected = if offset == 4 { 54 } else { 100 + offset };
            assert_eq!(codec.unpack(debited, offset), U256::from(expected));
        }
    }
}
