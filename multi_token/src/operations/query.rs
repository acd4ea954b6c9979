// Multi-Token Query Operations
// Read-only functions, no side effects.

use primitive_types::U256;

use crate::config::{ERC1155_INTERFACE_ID, ERC165_INTERFACE_ID};
use crate::error::MultiTokenResult;
use crate::storage::{get_balance, get_balance_batch, BalanceStorage};
use crate::types::{Address, Selector, TokenType};

use super::MultiToken;

impl<S: BalanceStorage> MultiToken<S> {
    /// Balance of `owner` for token type `id`
    pub fn balance_of(&self, owner: &Address, id: TokenType) -> U256 {
        get_balance(&self.storage, &self.codec, owner, id)
    }

    /// Balances of `owners[i]` for `ids[i]`, in input order
    ///
    /// # Returns
    /// - `Err(ArrayLengthMismatch)`: `owners` and `ids` differ in length
    pub fn balance_of_batch(&self, owners: &[Address], ids: &[TokenType]) -> MultiTokenResult<Vec<U256>> {
        get_balance_batch(&self.storage, &self.codec, owners, ids)
    }

    /// Interface-support query for the ledger itself (ERC-165)
    pub fn supports_interface(&self, interface_id: Selector) -> bool {
        interface_id == ERC165_INTERFACE_ID || interface_id == ERC1155_INTERFACE_ID
    }
}
