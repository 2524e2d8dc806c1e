use super::{codes, Reply};
use crate::config::GatewayConfig;
use reqwest::header::CONTENT_TYPE;
use std::fs;
use tracing::{debug, warn};

/// reqwest-backed transport with HTTP Basic auth and an optional TLS client
/// identity loaded from `{cert_dir}/{username}.pem` + `{cert_dir}/{username}.key`.
pub struct HttpTransport {
    state: ClientState,
    url: String,
    username: String,
    password: String,
}

/// A client that failed to construct (unreadable certificate, bad identity)
/// is kept around so every submit replays the failure as a classifiable
/// transport error instead of aborting the caller.
enum ClientState {
    Ready(reqwest::Client),
    Failed { code: u32, message: String },
}

impl HttpTransport {
    /// Build the transport once per client.
    ///
    /// `base_url_override` replaces the environment endpoint, primarily for
    /// mock-server tests.
    pub fn new(config: &GatewayConfig, base_url_override: Option<&str>) -> Self {
        let url = base_url_override
            .map(str::to_string)
            .unwrap_or_else(|| config.environment.endpoint().to_string());

        let state = match build_client(config) {
            Ok(client) => ClientState::Ready(client),
            Err((code, message)) => {
                warn!(code, %message, "HTTP client construction failed");
                ClientState::Failed { code, message }
            }
        };

        HttpTransport {
            state,
            url,
            username: config.username.clone(),
            password: config.password.clone(),
        }
    }

    /// Endpoint this transport posts to.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// POST one SOAP envelope, buffering the full response body.
    pub async fn post(&self, envelope: &str) -> Reply {
        let client = match &self.state {
            ClientState::Ready(client) => client,
            ClientState::Failed { code, message } => {
                return Reply::Failed {
                    code: *code,
                    message: message.clone(),
                }
            }
        };

        debug!(url = %self.url, bytes = envelope.len(), "posting order envelope");
        let result = client
            .post(&self.url)
            .basic_auth(&self.username, Some(&self.password))
            .header(CONTENT_TYPE, "text/xml")
            .body(envelope.to_string())
            .send()
            .await;

        match result {
            Ok(response) => {
                let status = response.status().as_u16();
                match response.text().await {
                    Ok(body) => Reply::Http { status, body },
                    Err(err) => Reply::Failed {
                        code: codes::RECEIVE,
                        message: format!("failed to read response body: {err}"),
                    },
                }
            }
            Err(err) => Reply::Failed {
                code: failure_code(&err),
                message: err.to_string(),
            },
        }
    }
}

fn build_client(config: &GatewayConfig) -> Result<reqwest::Client, (u32, String)> {
    let mut builder = reqwest::Client::builder()
        .timeout(config.timeout())
        .connect_timeout(config.connect_timeout());

    if config.accept_invalid_certs {
        builder = builder.danger_accept_invalid_certs(true);
    }

    if let (Some(cert_path), Some(key_path)) = (config.cert_path(), config.key_path()) {
        let mut pem = fs::read(&cert_path).map_err(|err| {
            (
                codes::CLIENT_CERT,
                format!(
                    "cannot read client certificate {}: {err}",
                    cert_path.display()
                ),
            )
        })?;
        let key = fs::read(&key_path).map_err(|err| {
            (
                codes::CLIENT_CERT,
                format!("cannot read client key {}: {err}", key_path.display()),
            )
        })?;
        pem.extend_from_slice(&key);

        // rustls only accepts unencrypted PKCS#8/RSA keys; an encrypted key
        // surfaces here as an identity rejection.
        let identity = reqwest::Identity::from_pem(&pem)
            .map_err(|err| (codes::CLIENT_CERT, format!("invalid client identity: {err}")))?;
        builder = builder.identity(identity);
    }

    builder
        .build()
        .map_err(|err| (codes::OTHER, format!("cannot build HTTP client: {err}")))
}

fn failure_code(err: &reqwest::Error) -> u32 {
    if err.is_timeout() {
        codes::TIMEOUT
    } else if err.is_connect() {
        // TLS handshake failures also surface as connect errors in reqwest.
        codes::CONNECT
    } else {
        codes::OTHER
    }
}
