use crate::client::core::GatewayClient;
use crate::config::{Environment, GatewayConfig};
use crate::error::Error;
use crate::request::OrderRequest;
use crate::transport::HttpTransport;
use crate::Result;
use std::path::PathBuf;

/// Builder for creating clients with custom configuration.
///
/// Keep this surface small and predictable: every knob maps onto one
/// [`GatewayConfig`] field, plus a base-URL override for testing.
pub struct GatewayClientBuilder {
    config: GatewayConfig,
    /// Override the environment endpoint (primarily for mock servers).
    base_url_override: Option<String>,
}

impl GatewayClientBuilder {
    pub fn new() -> Self {
        Self {
            config: GatewayConfig::new("", ""),
            base_url_override: None,
        }
    }

    /// Start from an existing configuration, e.g. one deserialized from the
    /// host application's config file.
    pub fn from_config(config: GatewayConfig) -> Self {
        Self {
            config,
            base_url_override: None,
        }
    }

    /// Gateway API username, also the certificate file basename.
    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.config.username = username.into();
        self
    }

    /// Gateway API password.
    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.config.password = password.into();
        self
    }

    /// Directory holding `{username}.pem` / `{username}.key`.
    pub fn cert_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.cert_dir = Some(dir.into());
        self
    }

    /// Passphrase for the client private key.
    pub fn cert_password(mut self, password: impl Into<String>) -> Self {
        self.config.cert_password = Some(password.into());
        self
    }

    /// Target environment; default is production.
    pub fn environment(mut self, environment: Environment) -> Self {
        self.config.environment = environment;
        self
    }

    /// Total request timeout in seconds (default 60).
    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.config.timeout_secs = secs;
        self
    }

    /// Connection establishment timeout in seconds (default 30).
    pub fn connect_timeout_secs(mut self, secs: u64) -> Self {
        self.config.connect_timeout_secs = secs;
        self
    }

    /// Skip server-certificate verification (opt-in, off by default).
    pub fn accept_invalid_certs(mut self, accept: bool) -> Self {
        self.config.accept_invalid_certs = accept;
        self
    }

    /// Override the environment endpoint.
    ///
    /// This is primarily for testing with mock servers; in production the
    /// endpoint follows [`Environment`].
    pub fn base_url_override(mut self, base_url: impl Into<String>) -> Self {
        self.base_url_override = Some(base_url.into());
        self
    }

    /// Build the client.
    pub fn build(self) -> Result<GatewayClient> {
        if self.config.username.is_empty() {
            return Err(Error::Configuration("username is required".into()));
        }
        if self.config.password.is_empty() {
            return Err(Error::Configuration("password is required".into()));
        }

        let transport = HttpTransport::new(&self.config, self.base_url_override.as_deref());
        Ok(GatewayClient::from_parts(
            self.config,
            transport,
            OrderRequest::new(),
        ))
    }
}

impl Default for GatewayClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credentials_are_required() {
        assert!(GatewayClientBuilder::new().build().is_err());
        assert!(GatewayClientBuilder::new().username("u").build().is_err());
        assert!(GatewayClientBuilder::new()
            .username("u")
            .password("p")
            .build()
            .is_ok());
    }
}
