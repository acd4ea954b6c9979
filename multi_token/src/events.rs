// Multi-Token Ledger - Transfer Notifications
// Exactly one notification is recorded per successful call. Mints use the
// zero address as `from`, burns use it as `to`.

use primitive_types::U256;
use serde::{Deserialize, Serialize};

use crate::types::{Address, TokenType};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TransferEvent {
    Single {
        operator: Address,
        from: Address,
        to: Address,
        id: TokenType,
        value: U256,
    },
    Batch {
        operator: Address,
        from: Address,
        to: Address,
        ids: Vec<TokenType>,
        values: Vec<U256>,
    },
}

impl TransferEvent {
    pub fn operator(&self) -> &Address {
        match self {
            TransferEvent::Single { operator, .. } | TransferEvent::Batch { operator, .. } => operator,
        }
    }

    pub fn from(&self) -> &Address {
        match self {
            TransferEvent::Single { from, .. } | TransferEvent::Batch { from, .. } => from,
        }
    }

    pub fn to(&self) -> &Address {
        match self {
            TransferEvent::Single { to, .. } | TransferEvent::Batch { to, .. } => to,
        }
    }

    /// Token types carried by the notification
    pub fn ids(&self) -> &[TokenType] {
        match self {
            TransferEvent::Single { id, .. } => std::slice::from_ref(id),
            TransferEvent::Batch { ids, .. } => ids.as_slice(),
        }
    }

    pub fn is_mint(&self) -> bool {
        self.from().is_zero()
    }

    pub fn is_burn(&self) -> bool {
        self.to().is_zero()
    }
}
