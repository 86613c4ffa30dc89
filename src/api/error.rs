//! Errors returned by the platform API

use thiserror::Error;

/// Failure of a single API call
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The server could not be reached (connect error, timeout)
    #[error("network unreachable: {0}")]
    Network(String),

    /// The server answered with an error
    #[error("{message}")]
    Rejected {
        status: Option<u16>,
        /// Machine readable code such as `duplicate_email`, when the server sends one
        code: Option<String>,
        message: String,
    },

    /// The response body did not have the expected shape
    #[error("unexpected response: {0}")]
    Decode(String),

    /// The form could not be turned into a request body
    #[error("could not build request: {0}")]
    Payload(String),
}

/// Coarse grouping of submission failures, used only to pick wording
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    DuplicateEmail,
    DuplicatePhone,
    Network,
    Validation,
    Other,
}

impl ApiError {
    /// Rejection carrying only a message, as most backends send
    pub fn rejected(message: impl Into<String>) -> Self {
        ApiError::Rejected {
            status: None,
            code: None,
            message: message.into(),
        }
    }

    pub fn rejected_with_code(code: &str, message: impl Into<String>) -> Self {
        ApiError::Rejected {
            status: None,
            code: Some(code.to_string()),
            message: message.into(),
        }
    }

    /// Classify the failure. A structured code wins. Without one, gateway
    /// statuses mean the server is unreachable, then the message text is
    /// sniffed, and a 400/422 that names nothing specific is a validation error.
    pub fn category(&self) -> ErrorCategory {
        match self {
            ApiError::Network(_) => ErrorCategory::Network,
            ApiError::Decode(_) => ErrorCategory::Other,
            ApiError::Payload(_) => ErrorCategory::Validation,
            ApiError::Rejected {
                status,
                code,
                message,
            } => {
                if let Some(category) = code.as_deref().and_then(category_from_code) {
                    return category;
                }
                if matches!(status, Some(502..=504)) {
                    return ErrorCategory::Network;
                }
                match category_from_message(message) {
                    ErrorCategory::Other if matches!(status, Some(400 | 422)) => {
                        ErrorCategory::Validation
                    }
                    category => category,
                }
            }
        }
    }

    /// Wording shown in the submission banner
    pub fn friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::DuplicateEmail => {
                "This email is already registered. Use a different email address.".to_string()
            }
            ErrorCategory::DuplicatePhone => {
                "This phone number is already registered. Use a different phone number."
                    .to_string()
            }
            ErrorCategory::Network => {
                "Could not reach the server. Check your connection and try again.".to_string()
            }
            ErrorCategory::Validation => match self {
                ApiError::Payload(detail) => {
                    format!("Some fields could not be sent: {detail}. Check them and try again.")
                }
                _ => format!("The server rejected the form: {self}"),
            },
            ErrorCategory::Other => self.to_string(),
        }
    }
}

fn category_from_code(code: &str) -> Option<ErrorCategory> {
    match code {
        "duplicate_email" | "email_taken" => Some(ErrorCategory::DuplicateEmail),
        "duplicate_phone" | "phone_taken" => Some(ErrorCategory::DuplicatePhone),
        "validation_failed" | "invalid_payload" => Some(ErrorCategory::Validation),
        _ => None,
    }
}

// TODO: drop the message sniffing once every backend endpoint sends `code`.
fn category_from_message(message: &str) -> ErrorCategory {
    let lower = message.to_lowercase();
    if lower.contains("email") {
        ErrorCategory::DuplicateEmail
    } else if lower.contains("phone") {
        ErrorCategory::DuplicatePhone
    } else if lower.contains("network") || lower.contains("failed to fetch") {
        ErrorCategory::Network
    } else if lower.contains("validation") || lower.contains("invalid") {
        ErrorCategory::Validation
    } else {
        ErrorCategory::Other
    }
}
