//! RelMonService client.
//!
//! HTTP client for the RelMonService application, which schedules and tracks
//! RelMon validation reports.

use pdmv_base::{
    ApiRequest, BaseClient, ClientConfig, ClientResult, RelmonListParams, Transport,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{debug, instrument};

/// Application name of RelMonService.
pub const APP_NAME: &str = "relmonservice";

/// RelMonService client.
#[derive(Debug, Clone)]
pub struct RelMonService {
    base: BaseClient,
}

impl RelMonService {
    /// Create a client over HTTP.
    pub fn new(config: ClientConfig) -> ClientResult<Self> {
        Ok(Self {
            base: BaseClient::new(APP_NAME, config)?,
        })
    }

    /// Create a client configured from `PDMV_*` environment variables.
    pub fn from_env() -> ClientResult<Self> {
        Self::new(ClientConfig::from_env()?)
    }

    /// Create a client over an explicit transport.
    pub fn with_transport(transport: Arc<dyn Transport>, debug: bool) -> Self {
        Self {
            base: BaseClient::with_transport(APP_NAME, debug, transport),
        }
    }

    /// Underlying base client.
    pub fn base(&self) -> &BaseClient {
        &self.base
    }

    /// Fetch RelMons from the database.
    #[instrument(skip(self))]
    pub async fn get_relmons(&self, params: RelmonListParams) -> ClientResult<Value> {
        let request = ApiRequest::get("api/get_relmons").with_query(params.to_query());
        self.base.execute(request).await
    }

    /// Create a new RelMon.
    #[instrument(skip(self, relmon))]
    pub async fn create(&self, relmon: Value) -> ClientResult<Value> {
        self.base.post("api/create", relmon).await
    }

    /// Reset a RelMon by id.
    #[instrument(skip(self))]
    pub async fn reset(&self, relmon_id: &str) -> ClientResult<Value> {
        debug!("Resetting RelMon {}", relmon_id);
        self.base.post("api/reset", json!({ "id": relmon_id })).await
    }

    /// Delete a RelMon by id. The id travels in the query string.
    #[instrument(skip(self))]
    pub async fn delete(&self, relmon_id: &str) -> ClientResult<Value> {
        debug!("Deleting RelMon {}", relmon_id);
        let request = ApiRequest::delete("api/delete").with_query_pair("id", relmon_id);
        self.base.execute(request).await
    }

    /// Edit an existing RelMon.
    #[instrument(skip(self, relmon))]
    pub async fn edit(&self, relmon: Value) -> ClientResult<Value> {
        self.base.post("api/edit", relmon).await
    }

    /// Update RelMon info (status, categories, ...).
    ///
    /// Requires the service account role.
    #[instrument(skip(self, relmon_update))]
    pub async fn update(&self, relmon_update: Value) -> ClientResult<Value> {
        self.base.post("api/update", relmon_update).await
    }

    /// Trigger a controller tick.
    #[instrument(skip(self))]
    pub async fn tick(&self) -> ClientResult<Value> {
        self.base.get("api/tick").await
    }

    /// Get information about the authenticated user.
    #[instrument(skip(self))]
    pub async fn user(&self) -> ClientResult<Value> {
        self.base.get("api/user").await
    }
}
