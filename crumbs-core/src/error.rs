//! Error types for cookie attribute handling

/// Result type for cookie attribute operations
pub type CookieResult<T> = Result<T, CookieError>;

/// Cookie attribute error type
///
/// Raised synchronously at the call site. Errors from the header
/// serializer are not wrapped here, see [`crate::session::SerializeError`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CookieError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl CookieError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        CookieError::InvalidArgument(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CookieError::invalid("options must be an object");
        assert_eq!(err.to_string(), "Invalid argument: options must be an object");
    }
}
