//! Gateway endpoint and credential configuration.

use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Production order endpoint.
pub const LIVE_API_URL: &str =
    "https://ws.firstdataglobalgateway.com/fdggwsapi/services/order.wsdl";
/// Merchant-test (sandbox) order endpoint.
pub const TEST_API_URL: &str =
    "https://ws.merchanttest.firstdataglobalgateway.com/fdggwsapi/services/order.wsdl";

/// Which gateway environment to target.
///
/// An explicit per-client field instead of process-wide test-mode state, so
/// concurrent clients can target different environments safely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Production,
    Sandbox,
}

impl Environment {
    /// Endpoint URL for this environment.
    pub fn endpoint(&self) -> &'static str {
        match self {
            Environment::Production => LIVE_API_URL,
            Environment::Sandbox => TEST_API_URL,
        }
    }
}

/// Connection settings for one gateway client.
///
/// The TLS client certificate and private key are located by convention at
/// `{cert_dir}/{username}.pem` and `{cert_dir}/{username}.key`. When
/// `cert_dir` is not set, no client identity is presented (useful against
/// mock servers in tests).
///
/// `Deserialize` is derived so host applications can embed this struct in
/// their own configuration files.
#[derive(Debug, Clone, Deserialize)]
pub struct GatewayConfig {
    /// Gateway API username (also the certificate file basename).
    pub username: String,
    /// Gateway API password.
    pub password: String,
    /// Directory holding `{username}.pem` / `{username}.key`.
    #[serde(default)]
    pub cert_dir: Option<PathBuf>,
    /// Passphrase for the private key, when the key file is encrypted.
    ///
    /// rustls only reads unencrypted PKCS#8/RSA keys; an encrypted key is
    /// reported as a client-certificate transport failure at submit time.
    #[serde(default)]
    pub cert_password: Option<String>,
    #[serde(default)]
    pub environment: Environment,
    /// Total request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Connection establishment timeout in seconds.
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
    /// Skip server-certificate verification.
    ///
    /// The reference integration ran with peer verification disabled; this
    /// port defaults to verifying and the switch is opt-in.
    #[serde(default)]
    pub accept_invalid_certs: bool,
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_connect_timeout_secs() -> u64 {
    30
}

impl GatewayConfig {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            cert_dir: None,
            cert_password: None,
            environment: Environment::default(),
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
            accept_invalid_certs: false,
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    /// Path of the client certificate, when a certificate directory is set.
    pub fn cert_path(&self) -> Option<PathBuf> {
        self.cert_dir
            .as_ref()
            .map(|dir| dir.join(format!("{}.pem", self.username)))
    }

    /// Path of the client private key, when a certificate directory is set.
    pub fn key_path(&self) -> Option<PathBuf> {
        self.cert_dir
            .as_ref()
            .map(|dir| dir.join(format!("{}.key", self.username)))
    }
}
