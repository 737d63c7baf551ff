pub const GENERIC_FAILURE_MESSAGE: &str =
    "there was an error sending the form, please try again";

/// Why a submission did not go through.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SubmitError {
    #[error("{0}")]
    Configuration(String),

    #[error("{0}")]
    Invalid(#[from] validator::ValidationErrors),

    #[error("please wait {remaining_secs} seconds before sending another message")]
    RateLimited { remaining_secs: u64 },

    #[error("the request took too long, check your connection and try again")]
    Timeout,

    #[error("connection error, check your internet connection and try again")]
    Network(String),

    #[error("{0}")]
    Unknown(String),
}

impl SubmitError {
    pub fn unknown(message: impl Into<String>) -> Self {
        let message = message.into();
        if message.trim().is_empty() {
            return Self::Unknown(GENERIC_FAILURE_MESSAGE.to_owned());
        }

        Self::Unknown(message)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    /// DNS, connect or send failure; indistinguishable from an opaque
    /// cross-origin rejection.
    #[error("network error: {0}")]
    Network(String),

    #[error("form endpoint answered with status {0}")]
    Status(u16),

    #[error("{0}")]
    Other(String),
}

impl From<reqwest::Error> for DispatchError {
    fn from(value: reqwest::Error) -> Self {
        if value.is_connect() || value.is_request() {
            return Self::Network(value.to_string());
        }

        Self::Other(value.to_string())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    #[error("ip lookup failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("ip lookup answer carries no ip")]
    MissingIp,
}
