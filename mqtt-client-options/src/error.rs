use thiserror::Error;

/// Errors raised while configuring or loading [ClientOptions](crate::ClientOptions).
///
/// Every variant is a caller error: the rejected call left the options untouched
/// and can be retried with a corrected value.
#[derive(Error, Debug)]
pub enum OptionsError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error("Unable to deserialize options: {0}")]
    Deserialization(#[from] serde_json::Error),
}

impl OptionsError {
    pub(crate) fn invalid<S: Into<String>>(reason: S) -> Self {
        OptionsError::InvalidArgument(reason.into())
    }
}
