use indexmap::IndexMap;
use primitive_types::U256;

use crate::error::MultiTokenResult;
use crate::storage::BalanceStorage;
use crate::types::Address;

/// Staged bin values for one operation
///
/// Accumulates the bins an operation wants to write. Nothing reaches the
/// ledger until the whole operation has been validated; on failure the
/// overlay is simply dropped.
#[derive(Debug, Clone, Default)]
pub struct BinOverlay {
    changes: IndexMap<(Address, U256), U256>,
}

impl BinOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }

    /// Current value of a bin: staged if present, otherwise from storage
    pub fn load<S: BalanceStorage + ?Sized>(
        &self,
        storage: &S,
        owner: &Address,
        bin: &U256,
    ) -> MultiTokenResult<U256> {
        match self.changes.get(&(*owner, *bin)) {
            Some(value) => Ok(*value),
            None => storage.try_get_bin(owner, bin),
        }
    }

    pub fn stage(&mut self, owner: Address, bin: U256, value: U256) {
        self.changes.insert((owner, bin), value);
    }

    /// Staged bins in the order they were first staged
    pub fn into_changes(self) -> impl Iterator<Item = ((Address, U256), U256)> {
        self.changes.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    #[test]
    fn test_load_prefers_staged_value() {
        let owner = Address::repeat_byte(1);
        let mut storage = MemoryStorage::new();
        storage.set_bin(&owner, &U256::zero(), U256::from(10)).unwrap();

        let mut overlay = BinOverlay::new();
        assert_eq!(overlay.load(&storage, &owner, &U256::zero()), Ok(U256::from(10)));

        overlay.stage(owner, U256::zero(), U256::from(3));
        assert_eq!(overlay.load(&storage, &owner, &U256::zero()), Ok(U256::from(3)));
        // Storage untouched until commit
        assert_eq!(storage.get_bin(&owner, &U256::zero()), U256::from(10));
    }

    #[test]
    fn test_changes_keep_first_stage_order() {
        let a = Address::repeat_byte(1);
        let b = Address::repeat_byte(2);
        let mut overlay = BinOverlay::new();
        overlay.stage(b, U256::one(), U256::from(1));
        overlay.stage(a, U256::zero(), U256::from(2));
        overlay.stage(b, U256::one(), U256::from(3));

        let changes: Vec<_> = overlay.into_changes().collect();
        assert_eq!(
            changes,
            vec![((b, U256::one()), U256::from(3)), ((a, U256::zero()), U256::from(2))]
        );
    }
}
