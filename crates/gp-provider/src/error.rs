use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProviderError {
    /// The provider answered but rejected the call (unknown app, bad option, ...)
    #[error("{message}")]
    Upstream { status: u16, message: String },

    #[error("Provider request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Invalid provider response: {0}")]
    Decode(String),

    /// Rejected before reaching the provider
    #[error("{0}")]
    InvalidRequest(String),
}

impl ProviderError {
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest(message.into())
    }

    pub fn upstream(status: u16, message: impl Into<String>) -> Self {
        Self::Upstream {
            status,
            message: message.into(),
        }
    }
}
