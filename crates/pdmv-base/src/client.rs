//! Base client shared by the application clients.
//!
//! `BaseClient` binds a transport to one application and turns raw responses
//! into results: non-success statuses become [`ClientError::Status`], bodies
//! that are not JSON become [`ClientError::Decode`]. Nothing is retried,
//! cached or translated.

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use crate::request::ApiRequest;
use crate::transport::{HttpTransport, RawResponse, Transport};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Client for one PdmV application.
#[derive(Clone)]
pub struct BaseClient {
    /// Application name, the first path segment under the server root.
    app: String,

    /// Log requests and responses at info level.
    debug: bool,

    /// Shared transport.
    transport: Arc<dyn Transport>,
}

impl std::fmt::Debug for BaseClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BaseClient")
            .field("app", &self.app)
            .field("debug", &self.debug)
            .finish_non_exhaustive()
    }
}

impl BaseClient {
    /// Create a client for `app` over HTTP.
    pub fn new(app: impl Into<String>, config: ClientConfig) -> ClientResult<Self> {
        let debug = config.debug;
        let transport = HttpTransport::new(config)?;
        Ok(Self::with_transport(app, debug, Arc::new(transport)))
    }

    /// Create a client for `app` over an explicit transport.
    pub fn with_transport(
        app: impl Into<String>,
        debug: bool,
        transport: Arc<dyn Transport>,
    ) -> Self {
        Self {
            app: app.into(),
            debug,
            transport,
        }
    }

    /// Application name.
    pub fn app(&self) -> &str {
        &self.app
    }

    /// Send a request and decode the JSON response.
    pub async fn execute(&self, request: ApiRequest) -> ClientResult<Value> {
        let response = self.send_checked(&request).await?;
        decode_json(response.body)
    }

    /// Send a request and return the body as text.
    pub async fn execute_text(&self, request: ApiRequest) -> ClientResult<String> {
        let response = self.send_checked(&request).await?;
        Ok(response.body)
    }

    pub async fn get(&self, path: impl Into<String>) -> ClientResult<Value> {
        self.execute(ApiRequest::get(path)).await
    }

    /// GET decoded into a concrete type.
    pub async fn get_json<T: DeserializeOwned>(&self, path: impl Into<String>) -> ClientResult<T> {
        let response = self.send_checked(&ApiRequest::get(path)).await?;
        serde_json::from_str(&response.body).map_err(|e| ClientError::Decode {
            message: e.to_string(),
            body: response.body,
        })
    }

    pub async fn get_text(&self, path: impl Into<String>) -> ClientResult<String> {
        self.execute_text(ApiRequest::get(path)).await
    }

    pub async fn post(&self, path: impl Into<String>, body: Value) -> ClientResult<Value> {
        self.execute(ApiRequest::post(path, body)).await
    }

    pub async fn put(&self, path: impl Into<String>, body: Value) -> ClientResult<Value> {
        self.execute(ApiRequest::put(path, body)).await
    }

    /// DELETE, with or without a body.
    pub async fn delete(&self, path: impl Into<String>, body: Option<Value>) -> ClientResult<Value> {
        let mut request = ApiRequest::delete(path);
        request.body = body;
        self.execute(request).await
    }

    async fn send_checked(&self, request: &ApiRequest) -> ClientResult<RawResponse> {
        if self.debug {
            info!(app = %self.app, "{} {}", request.method, request.path_and_query());
        } else {
            debug!(app = %self.app, "{} {}", request.method, request.path_and_query());
        }

        let response = self.transport.send(&self.app, request).await?;

        if self.debug {
            info!(app = %self.app, status = response.status, "response: {}", response.body);
        }

        if !response.is_success() {
            warn!(
                "{} API error ({}) on {}",
                self.app, response.status, request.path
            );
            return Err(ClientError::Status {
                status: response.status,
                body: response.body,
            });
        }

        Ok(response)
    }
}

fn decode_json(body: String) -> ClientResult<Value> {
    serde_json::from_str(&body).map_err(|e| ClientError::Decode {
        message: e.to_string(),
        body,
    })
}
