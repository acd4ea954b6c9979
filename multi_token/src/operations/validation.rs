// Multi-Token Input Validation Helpers

use primitive_types::U256;

use crate::error::{MultiTokenError, MultiTokenResult};
use crate::types::{Address, TokenType};

use super::OperationContext;

/// Paired arrays must have the same length
pub fn validate_lengths(ids: &[TokenType], amounts: &[U256]) -> MultiTokenResult<()> {
    if ids.len() != amounts.len() {
        return Err(MultiTokenError::ArrayLengthMismatch);
    }
    Ok(())
}

/// Recipient must be non-zero
pub fn validate_recipient(to: &Address) -> MultiTokenResult<()> {
    if to.is_zero() {
        return Err(MultiTokenError::InvalidRecipient);
    }
    Ok(())
}

/// Sender must be non-zero
pub fn validate_sender(from: &Address) -> MultiTokenResult<()> {
    if from.is_zero() {
        return Err(MultiTokenError::InvalidSender);
    }
    Ok(())
}

/// Operator must be allowed to move the sender's tokens
pub fn validate_authorized(ctx: &OperationContext) -> MultiTokenResult<()> {
    if !ctx.approved {
        return Err(MultiTokenError::NotAuthorized);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_lengths() {
        assert!(validate_lengths(&[U256::one()], &[U256::one()]).is_ok());
        assert!(validate_lengths(&[], &[]).is_ok());
        assert_eq!(
            validate_lengths(&[U256::one()], &[]),
            Err(MultiTokenError::ArrayLengthMismatch)
        );
    }

    #[test]
    fn test_validate_addresses() {
        assert_eq!(
            validate_recipient(&Address::ZERO),
            Err(MultiTokenError::InvalidRecipient)
        );
        assert_eq!(validate_sender(&Address::ZERO), Err(MultiTokenError::InvalidSender));
        assert!(validate_recipient(&Address::repeat_byte(1)).is_ok());
    }

    #[test]
    fn test_validate_authorized() {
        let operator = Address::repeat_byte(1);
        assert!(validate_authorized(&OperationContext::owner(operator)).is_ok());
        assert_eq!(
            validate_authorized(&OperationContext::new(operator, false)),
            Err(MultiTokenError::NotAuthorized)
        );
    }
}
