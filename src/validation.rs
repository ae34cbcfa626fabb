use crate::backend::LoginError;

pub const EMPTY_IDENTIFIER_MESSAGE: &str = "Please enter Membership No, Email, or Mobile No.";

/// Membership number, email or phone; only emptiness is checked locally.
pub fn validate_identifier(value: &str) -> Result<&str, LoginError> {
    if value.is_empty() {
        Err(LoginError::EmptyIdentifier)
    } else {
        Ok(value)
    }
}
