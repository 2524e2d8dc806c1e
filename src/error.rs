use thiserror::Error;

/// Unified error type for the library.
///
/// Only conditions that abort a call before anything reaches the wire are
/// surfaced as `Err` values. Transport, HTTP and gateway-level failures are
/// reported through [`crate::GatewayResponse`] instead, so a submission always
/// completes with a classifiable result.
#[derive(Debug, Error)]
pub enum Error {
    /// A setter rejected its input. The field bag is left untouched.
    #[error("invalid value for {field}: {message}")]
    Validation {
        field: &'static str,
        message: String,
    },

    /// The client cannot be constructed from the given configuration.
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl Error {
    pub(crate) fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Error::Validation {
            field,
            message: message.into(),
        }
    }
}
