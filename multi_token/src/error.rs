// Multi-Token Ledger - Error Codes
//
// Error Code Ranges:
// - 100-199: Input shape errors
// - 200-299: Address and permission errors
// - 300-399: Balance arithmetic errors
// - 400-499: Receiver acknowledgement errors
// - 900-999: System errors

use thiserror::Error;

/// Multi-token operation result type
pub type MultiTokenResult<T> = Result<T, MultiTokenError>;

/// Multi-token error type with numeric code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[repr(u64)]
pub enum MultiTokenError {
    // ========================================
    // Input shape errors (100-199)
    // ========================================
    #[error("Array length mismatch")]
    ArrayLengthMismatch = 100,

    // ========================================
    // Address and permission errors (200-299)
    // ========================================
    #[error("Invalid recipient")]
    InvalidRecipient = 200,

    #[error("Invalid sender")]
    InvalidSender = 201,

    #[error("Operator not authorized")]
    NotAuthorized = 202,

    // ========================================
    // Balance arithmetic errors (300-399)
    // ========================================
    #[error("Insufficient balance")]
    InsufficientBalance = 300,

    #[error("Balance overflow")]
    BalanceOverflow = 301,

    // ========================================
    // Receiver errors (400-499)
    // ========================================
    #[error("Transfer rejected by receiver")]
    TransferRejected = 400,

    // ========================================
    // System errors (900-999)
    // ========================================
    #[error("Value too large for packed width")]
    ValueTooLarge = 900,

    #[error("Storage error")]
    StorageError = 901,
}

impl MultiTokenError {
    /// Get the numeric error code
    #[inline]
    pub fn code(&self) -> u64 {
        *self as u64
    }

    /// Create error from numeric code
    pub fn from_code(code: u64) -> Option<Self> {
        match code {
            100 => Some(Self::ArrayLengthMismatch),
            200 => Some(Self::InvalidRecipient),
            201 => Some(Self::InvalidSender),
            202 => Some(Self::NotAuthorized),
            300 => Some(Self::InsufficientBalance),
            301 => Some(Self::BalanceOverflow),
            400 => Some(Self::TransferRejected),
            900 => Some(Self::ValueTooLarge),
            901 => Some(Self::StorageError),
            _ => None,
        }
    }

    /// Caller errors can be fixed by changing the request; the rest point at
    /// a broken invariant or backend
    pub fn is_caller_error(&self) -> bool {
        !matches!(self, Self::ValueTooLarge | Self::StorageError)
    }
}
