//! Transport layer.
//!
//! The [`Transport`] trait is the seam between the application clients and the
//! network. [`HttpTransport`] is the reqwest-backed implementation; tests and
//! embedders may supply their own.
//!
//! Implementations must be `Send + Sync`: a client may be cloned and used from
//! several tasks at once, and every clone shares the same transport.

use crate::config::{ClientConfig, CredentialMode};
use crate::error::{ClientError, ClientResult};
use crate::request::{ApiRequest, Method};
use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION, COOKIE};
use reqwest::Client;
use tracing::instrument;

/// Status and body of a response, before any interpretation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body as text.
    pub body: String,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Check for a 2xx status.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Performs one request against an application.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send `request` to the application named `app`.
    ///
    /// Only failures to obtain a response are errors here; non-success
    /// statuses are returned as a [`RawResponse`].
    async fn send(&self, app: &str, request: &ApiRequest) -> ClientResult<RawResponse>;
}

/// HTTP transport built on a pooled reqwest client.
#[derive(Clone)]
pub struct HttpTransport {
    /// HTTP client instance.
    client: Client,

    /// Connection configuration.
    config: ClientConfig,
}

impl std::fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpTransport")
            .field("server_root", &self.config.server_root())
            .field("credential_mode", &self.config.credential_mode)
            .finish()
    }
}

impl HttpTransport {
    /// Create a transport from a validated configuration.
    pub fn new(config: ClientConfig) -> ClientResult<Self> {
        config.validate()?;

        let client = Client::builder()
            .timeout(config.timeout())
            .danger_accept_invalid_certs(!config.verify_tls)
            .build()?;

        Ok(Self { client, config })
    }

    /// Connection configuration in use.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn authorize(&self, mut builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.config.credential_mode {
            CredentialMode::Sso => {
                if let Some(ref cookie) = self.config.cookie {
                    builder = builder.header(COOKIE, cookie);
                }
            }
            CredentialMode::ClientCredentials => {
                if let Some(ref token) = self.config.access_token {
                    builder = builder.header(AUTHORIZATION, format!("Bearer {}", token));
                }
            }
        }
        builder
    }
}

#[async_trait]
impl Transport for HttpTransport {
    #[instrument(skip(self, request), fields(method = %request.method, path = %request.path))]
    async fn send(&self, app: &str, request: &ApiRequest) -> ClientResult<RawResponse> {
        let url = self.config.app_url(app, &request.path_and_query());

        let mut builder = match request.method {
            Method::Get => self.client.get(&url),
            Method::Post => self.client.post(&url),
            Method::Put => self.client.put(&url),
            Method::Delete => self.client.delete(&url),
        };
        builder = self.authorize(builder).header(ACCEPT, "application/json");

        if let Some(ref body) = request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        Ok(RawResponse { status, body })
    }
}
