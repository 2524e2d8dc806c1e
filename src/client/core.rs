use crate::client::builder::GatewayClientBuilder;
use crate::config::GatewayConfig;
use crate::request::OrderRequest;
use crate::response::GatewayResponse;
use crate::transport::{HttpTransport, Reply};
use tracing::{debug, warn};

/// Client for the First Data Global Gateway Web Service API.
///
/// One client holds one in-flight transaction at a time: the shared field
/// bag makes accumulation, render and clear non-atomic as a unit, so
/// concurrent submissions need a client each.
pub struct GatewayClient {
    config: GatewayConfig,
    transport: HttpTransport,
    order: OrderRequest,
}

impl GatewayClient {
    pub fn builder() -> GatewayClientBuilder {
        GatewayClientBuilder::new()
    }

    /// Build directly from a configuration value.
    pub fn from_config(config: GatewayConfig) -> crate::Result<Self> {
        GatewayClientBuilder::from_config(config).build()
    }

    pub(crate) fn from_parts(
        config: GatewayConfig,
        transport: HttpTransport,
        order: OrderRequest,
    ) -> Self {
        GatewayClient {
            config,
            transport,
            order,
        }
    }

    /// The transaction currently being accumulated.
    pub fn order(&mut self) -> &mut OrderRequest {
        &mut self.order
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Render the accumulated order, post it, and classify the outcome.
    ///
    /// Always completes with a [`GatewayResponse`]; transport, HTTP and
    /// gateway failures are reported through its classifier accessors, never
    /// as `Err`. The field bag is cleared unconditionally afterwards, win or
    /// lose, so the next transaction starts clean.
    pub async fn submit(&mut self) -> GatewayResponse {
        let envelope = self.order.render();
        let reply = self.transport.post(&envelope).await;

        let response = match reply {
            Reply::Http { status, body } => GatewayResponse::from_raw(status, 0, "", body),
            Reply::Failed { code, message } => GatewayResponse::from_raw(0, code, message, ""),
        };

        if response.is_error() {
            warn!(
                status = response.http_status(),
                transport_code = response.transport_error_code(),
                message = response.error_message().as_deref().unwrap_or(""),
                "transaction failed"
            );
        } else {
            debug!(status = response.http_status(), "transaction approved");
        }

        self.order.reset();
        response
    }
}
