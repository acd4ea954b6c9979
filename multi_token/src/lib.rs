// Packed-balance multi-token ledger (ERC-1155 semantics)
//
// Balances of many token types are packed into 256-bit bins per owner.
// Transfers, mints and burns are atomic, batch updates touch each bin once,
// and contract recipients must acknowledge what they receive.

#![allow(clippy::too_many_arguments)]

pub mod cache;
pub mod codec;
pub mod config;
pub mod error;
pub mod events;
pub mod journal;
pub mod operations;
pub mod overlay;
pub mod planner;
pub mod receiver;
pub mod shared;
pub mod storage;
pub mod types;

pub use codec::BinCodec;
pub use config::{BalanceWidth, LedgerConfig};
pub use error::{MultiTokenError, MultiTokenResult};
pub use events::TransferEvent;
pub use operations::{MultiToken, MultiTokenLedger, OperationContext};
pub use receiver::{ReceiverKind, ReceiverRegistry, ReceiverResolver, TokenReceiver};
pub use shared::SharedMultiToken;
pub use storage::{BalanceStorage, MemoryStorage};
pub use types::{Address, BinIndex, CompactTokenType, Selector, TokenType};
