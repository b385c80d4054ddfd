use thiserror::Error;

/// Ways a statement fetch can fail. None of them are retried.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Connection, DNS, or body read failure
    #[error(transparent)]
    Transport(#[from] reqwest::Error),

    /// The server answered with a non-2xx status
    #[error("HTTP error! status: {0}")]
    Status(u16),

    /// The body was not valid JSON
    #[error(transparent)]
    Parse(#[from] serde_json::Error),

    /// The JSON lacks `account` or `transactions`, or they have the wrong shape
    #[error("Invalid data structure received: {0}")]
    InvalidStructure(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_message() {
        let err = FetchError::Status(503);
        assert_eq!(err.to_string(), "HTTP error! status: 503");
    }

    #[test]
    fn test_invalid_structure_message() {
        let err = FetchError::InvalidStructure("missing `account`".to_string());
        assert!(err.to_string().contains("Invalid data structure"));
    }

    #[test]
    fn test_parse_message_is_verbatim() {
        let inner = serde_json::from_str::<serde_json::Value>("{oops").unwrap_err();
        let expected = inner.to_string();
        assert_eq!(FetchError::from(inner).to_string(), expected);
    }
}
