#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("gateway returned {status}: {}", message.as_deref().unwrap_or(body.as_str()))]
    Api {
        status: u16,
        message: Option<String>,
        body: String,
    },

    #[error("session expired")]
    SessionExpired,

    #[error("invalid token: {0}")]
    Token(String),

    #[error("storage error: {0}")]
    Storage(String),
}

pub type Result<T> = std::result::Result<T, ClientError>;

impl ClientError {
    /// The `message` field of the gateway's error body, if it sent one.
    pub fn gateway_message(&self) -> Option<&str> {
        match self {
            Self::Api { message, .. } => message.as_deref(),
            _ => None,
        }
    }

    /// Raw response text of a failed gateway call.
    pub fn body_text(&self) -> Option<&str> {
        match self {
            Self::Api { body, .. } if !body.is_empty() => Some(body.as_str()),
            _ => None,
        }
    }

    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network(_))
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Client-side validation failures shown inline before any request is made.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormError {
    #[error("OTP must be 6 digits")]
    InvalidOtp,

    #[error("Passwords do not match")]
    PasswordMismatch,

    #[error("Password must be at least 6 characters")]
    PasswordTooShort,

    #[error("{0} is required")]
    Required(&'static str),
}
