// Multi-Token Ledger - Receiver Acknowledgement
// Contract-like recipients must acknowledge incoming tokens by returning the
// expected selector. The capability is checked once per call and resolved to
// a `ReceiverKind`.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use log::warn;
use primitive_types::U256;
use sha3::{Digest, Keccak256};

use crate::config::{ERC165_INTERFACE_ID, ERC1155_RECEIVER_INTERFACE_ID};
use crate::error::{MultiTokenError, MultiTokenResult};
use crate::operations::MultiTokenLedger;
use crate::types::{Address, Selector, TokenType};

/// First four bytes of the keccak-256 hash of a function signature
pub fn selector(signature: &str) -> Selector {
    let hash = Keccak256::digest(signature.as_bytes());
    let mut out = [0u8; 4];
    out.copy_from_slice(&hash[..4]);
    out
}

/// Recipient-side hook of a contract-like account
///
/// The hook runs after balances are committed and receives the ledger, so
/// it can observe the post-transfer state or start new operations.
pub trait TokenReceiver: Send + Sync {
    /// Interface-support query (ERC-165)
    fn supports_interface(&self, interface_id: Selector) -> bool {
        interface_id == ERC1155_RECEIVER_INTERFACE_ID || interface_id == ERC165_INTERFACE_ID
    }

    fn on_received_single(
        &self,
        ledger: &mut dyn MultiTokenLedger,
        operator: &Address,
        from: &Address,
        id: TokenType,
        value: U256,
        data: &[u8],
    ) -> MultiTokenResult<Selector>;

    fn on_received_batch(
        &self,
        ledger: &mut dyn MultiTokenLedger,
        operator: &Address,
        from: &Address,
        ids: &[TokenType],
        values: &[U256],
        data: &[u8],
    ) -> MultiTokenResult<Selector>;
}

/// Trait for checking if an address is a contract and finding its hook
pub trait ReceiverResolver: Send + Sync {
    fn is_contract(&self, address: &Address) -> bool;

    /// Receiver hook deployed at `address`, if any
    fn receiver(&self, address: &Address) -> Option<Arc<dyn TokenReceiver>>;
}

/// Result of probing a recipient
#[derive(Clone)]
pub enum ReceiverKind {
    /// Plain account, no acknowledgement needed
    NotContract,
    /// Contract without the acknowledgement capability
    ContractNoCapability,
    /// Contract exposing the acknowledgement capability
    ContractWithCapability(Arc<dyn TokenReceiver>),
}

impl fmt::Debug for ReceiverKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReceiverKind::NotContract => write!(f, "NotContract"),
            ReceiverKind::ContractNoCapability => write!(f, "ContractNoCapability"),
            ReceiverKind::ContractWithCapability(_) => write!(f, "ContractWithCapability"),
        }
    }
}

/// Resolve what kind of recipient `address` is
pub fn classify<R: ReceiverResolver + ?Sized>(resolver: &R, address: &Address) -> ReceiverKind {
    if !resolver.is_contract(address) {
        return ReceiverKind::NotContract;
    }

    match resolver.receiver(address) {
        Some(receiver) if receiver.supports_interface(ERC1155_RECEIVER_INTERFACE_ID) => {
            ReceiverKind::ContractWithCapability(receiver)
        }
        _ => ReceiverKind::ContractNoCapability,
    }
}

/// Map a hook response to the call outcome
pub fn check_acknowledgement(
    to: &Address,
    response: MultiTokenResult<Selector>,
    expected: Selector,
) -> MultiTokenResult<()> {
    match response {
        Ok(value) if value == expected => Ok(()),
        Ok(value) => {
            warn!(
                "receiver {} returned unexpected acknowledgement 0x{}",
                to,
                hex::encode(value)
            );
            Err(MultiTokenError::TransferRejected)
        }
        Err(e) => {
            warn!("receiver {} rejected transfer: {}", to, e);
            Err(MultiTokenError::TransferRejected)
        }
    }
}

/// In-memory resolver
#[derive(Default, Clone)]
pub struct ReceiverRegistry {
    contracts: HashMap<Address, Option<Arc<dyn TokenReceiver>>>,
}

impl ReceiverRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a contract exposing a receiver hook
    pub fn register_receiver(&mut self, address: Address, receiver: Arc<dyn TokenReceiver>) {
        self.contracts.insert(address, Some(receiver));
    }

    /// Register a contract without any receiver hook
    pub fn register_contract(&mut self, address: Address) {
        self.contracts.insert(address, None);
    }
}

impl ReceiverResolver for ReceiverRegistry {
    fn is_contract(&self, address: &Address) -> bool {
        self.contracts.contains_key(address)
    }

    fn receiver(&self, address: &Address) -> Option<Arc<dyn TokenReceiver>> {
        self.contracts.get(address).cloned().flatten()
    }
}
