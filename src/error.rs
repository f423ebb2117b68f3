//! Client error types
//!
//! Defines the failures a recharge API call or an edit form can produce.

use thiserror::Error;

/// Errors returned by a [`RechargeApi`](crate::api::RechargeApi) call
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ApiError {
    /// Network failure before any response arrived
    #[error("Network error: {0}")]
    Transport(String),

    /// Non-success status without a usable error body
    #[error("HTTP status {status}")]
    Status { status: u16 },

    /// The server rejected the request with a JSON `error` field
    #[error("{message}")]
    Rejected { status: u16, message: String },

    /// The response body could not be decoded
    #[error("Parse error: {0}")]
    Parse(String),
}

impl ApiError {
    /// Message supplied by the server, if the failure carried one
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ApiError::Rejected { message, .. } if !message.is_empty() => Some(message),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Parse(err.to_string())
    }
}

/// Result type alias for API calls
pub type ApiResult<T> = Result<T, ApiError>;

/// A field of the edit form that cannot be sent as-is.
///
/// `Display` is for logs; users see [`Messages::form_error`](crate::locale::Messages::form_error).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FormError {
    #[error("Invalid date: {0:?}")]
    InvalidDate(String),

    #[error("Invalid value for {field}: {value:?}")]
    InvalidNumber { field: &'static str, value: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ApiError::Status { status: 500 };
        assert_eq!(err.to_string(), "HTTP status 500");

        let err = ApiError::Rejected {
            status: 400,
            message: "kWh deve ser > 0.".to_string(),
        };
        assert_eq!(err.to_string(), "kWh deve ser > 0.");
    }

    #[test]
    fn test_server_message() {
        let err = ApiError::Rejected {
            status: 422,
            message: "Data obrigatória".to_string(),
        };
        assert_eq!(err.server_message(), Some("Data obrigatória"));

        let empty = ApiError::Rejected {
            status: 422,
            message: String::new(),
        };
        assert_eq!(empty.server_message(), None);
        assert_eq!(ApiError::Transport("refused".into()).server_message(), None);
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: ApiError = json_err.into();
        assert!(matches!(err, ApiError::Parse(_)));
    }
}
