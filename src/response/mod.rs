//! Response classification.
//!
//! One [`GatewayResponse`] is produced per submission. Four independent
//! failure signals are checked in a fixed precedence, first hit wins:
//!
//! 1. HTTP status outside {200, 201, 202};
//! 2. transport-level failure (connect, TLS, certificate, timeout);
//! 3. empty response body;
//! 4. business error parsed from the body (SOAP fault, or a transaction
//!    result other than `APPROVED`).
//!
//! Anything else is success. `is_error`/`is_success` recompute from the raw
//! signals on every call; there is no separate state.

mod parse;

pub use parse::{parse_soap_body, OrderResponse, SoapBody};

/// HTTP statuses the gateway uses for an accepted exchange.
const VALID_STATUSES: [u16; 3] = [200, 201, 202];

/// Outcome of one submission: the raw transport result plus the parsed
/// gateway payload. Overwritten by the next call, never appended to.
#[derive(Debug, Clone)]
pub struct GatewayResponse {
    http_status: u16,
    transport_error_code: u32,
    transport_error_message: String,
    body: String,
    order: Option<OrderResponse>,
    derived_error: Option<String>,
}

impl GatewayResponse {
    /// Classify a completed HTTP exchange.
    ///
    /// `transport_error_code` of 0 means the transport itself did not fail.
    /// The body is only parsed when the upstream checks pass; a status or
    /// transport failure short-circuits without a parse attempt.
    pub fn from_raw(
        http_status: u16,
        transport_error_code: u32,
        transport_error_message: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        let body = body.into();
        let mut order = None;
        let mut derived_error = None;

        let reached_body_check = VALID_STATUSES.contains(&http_status)
            && transport_error_code == 0
            && !body.is_empty();
        if reached_body_check {
            match parse_soap_body(&body) {
                Ok(parsed) => {
                    derived_error = parsed.error_message();
                    if let SoapBody::Order(o) = parsed {
                        order = Some(o);
                    }
                }
                Err(err) => {
                    tracing::warn!(error = %err, "gateway response body is not parseable XML");
                    derived_error = Some("unparseable gateway response".to_string());
                }
            }
        }

        GatewayResponse {
            http_status,
            transport_error_code,
            transport_error_message: transport_error_message.into(),
            body,
            order,
            derived_error,
        }
    }

    /// Did this exchange fail, on any of the four signals?
    pub fn is_error(&self) -> bool {
        if !VALID_STATUSES.contains(&self.http_status) {
            return true;
        }
        if self.transport_error_code > 0 {
            return true;
        }
        if self.body.is_empty() {
            return true;
        }
        self.derived_error.is_some()
    }

    /// Was the transaction accepted end to end?
    pub fn is_success(&self) -> bool {
        !self.is_error()
    }

    /// Human-readable failure reason, following the same precedence as
    /// [`is_error`](Self::is_error). `None` on success.
    pub fn error_message(&self) -> Option<String> {
        if !VALID_STATUSES.contains(&self.http_status) {
            let message = if self.transport_error_message.is_empty() {
                format!("no valid HTTP status ({})", self.http_status)
            } else {
                self.transport_error_message.clone()
            };
            return Some(message);
        }
        if self.transport_error_code > 0 {
            return Some(self.transport_error_message.clone());
        }
        if self.body.is_empty() {
            return Some("empty response from gateway".to_string());
        }
        self.derived_error.clone()
    }

    pub fn http_status(&self) -> u16 {
        self.http_status
    }

    /// Transport failure code, 0 when the transport succeeded.
    pub fn transport_error_code(&self) -> u32 {
        self.transport_error_code
    }

    pub fn transport_error_message(&self) -> &str {
        &self.transport_error_message
    }

    /// Raw response body as received.
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Parsed order payload, when the body carried one.
    pub fn order(&self) -> Option<&OrderResponse> {
        self.order.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_failure_wins_over_empty_body() {
        let resp = GatewayResponse::from_raw(200, 7, "connection refused", "");
        assert!(resp.is_error());
        assert_eq!(resp.error_message().as_deref(), Some("connection refused"));
    }

    #[test]
    fn bad_status_does_not_parse_body() {
        let resp = GatewayResponse::from_raw(500, 0, "", "<not-even-xml");
        assert!(resp.is_error());
        assert_eq!(
            resp.error_message().as_deref(),
            Some("no valid HTTP status (500)")
        );
        assert!(resp.order().is_none());
    }

    #[test]
    fn unparseable_body_is_flagged_not_propagated() {
        let resp = GatewayResponse::from_raw(200, 0, "", "<broken");
        assert!(resp.is_error());
        assert_eq!(
            resp.error_message().as_deref(),
            Some("unparseable gateway response")
        );
    }

    #[test]
    fn plain_text_body_is_not_success() {
        // A proxy or maintenance page can answer 200 with bare text.
        let resp = GatewayResponse::from_raw(200, 0, "", "gateway under maintenance");
        assert!(resp.is_error());
        assert!(!resp.is_success());
        assert_eq!(
            resp.error_message().as_deref(),
            Some("unparseable gateway response")
        );
        assert!(resp.order().is_none());
    }
}
