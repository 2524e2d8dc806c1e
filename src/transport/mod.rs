//! HTTP/TLS transport.
//!
//! The rest of the crate sees the transport as "post these envelope bytes
//! with our credentials, get back a status and body". Failures at this layer
//! are data, not `Err`: every outcome becomes a [`Reply`] the classifier can
//! consume, so a submission always completes.

mod http;

pub use http::HttpTransport;

/// Transport failure codes, curl-compatible numbering carried over from the
/// reference integration so downstream error handling keeps working.
pub mod codes {
    /// Could not reach the gateway host.
    pub const CONNECT: u32 = 7;
    /// The exchange did not complete within the configured timeout.
    pub const TIMEOUT: u32 = 28;
    /// Failed while reading the response body.
    pub const RECEIVE: u32 = 56;
    /// Client certificate or key missing, unreadable, or rejected.
    pub const CLIENT_CERT: u32 = 58;
    /// Any other transport-level failure.
    pub const OTHER: u32 = 1;
}

/// Outcome of one POST to the gateway.
#[derive(Debug, Clone)]
pub enum Reply {
    /// The exchange completed; the gateway answered.
    Http { status: u16, body: String },
    /// The transport failed before a response was read.
    Failed { code: u32, message: String },
}
