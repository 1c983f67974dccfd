//! RelVal client.
//!
//! HTTP client for the RelVal application: RelVal and ticket management plus
//! the generic database search.

use pdmv_base::{
    ApiRequest, BaseClient, ClientConfig, ClientResult, QueryEncoding, SearchParams, Transport,
};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Application name of RelVal.
pub const APP_NAME: &str = "relval";

/// Endpoint used to create tickets.
///
/// Two revisions of the service exposed ticket creation under different
/// paths; which one a deployment answers on is not known client-side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TicketCreatePath {
    /// `api/tickets/create`
    #[default]
    Tickets,
    /// `api/ticket/create`
    Legacy,
}

impl TicketCreatePath {
    pub fn as_str(&self) -> &'static str {
        match self {
            TicketCreatePath::Tickets => "api/tickets/create",
            TicketCreatePath::Legacy => "api/ticket/create",
        }
    }
}

/// RelVal client.
#[derive(Debug, Clone)]
pub struct RelVal {
    base: BaseClient,
    ticket_create_path: TicketCreatePath,
}

impl RelVal {
    /// Create a client over HTTP.
    pub fn new(config: ClientConfig) -> ClientResult<Self> {
        Ok(Self {
            base: BaseClient::new(APP_NAME, config)?,
            ticket_create_path: TicketCreatePath::default(),
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
            ticket_create_path: TicketCreatePath::default(),
        }
    }

    /// Select the ticket creation endpoint.
    pub fn with_ticket_create_path(mut self, path: TicketCreatePath) -> Self {
        self.ticket_create_path = path;
        self
    }

    /// Underlying base client.
    pub fn base(&self) -> &BaseClient {
        &self.base
    }

    // ============== RelVals ==============

    /// Create a new RelVal. Requires manager role.
    #[instrument(skip(self, data))]
    pub async fn create(&self, data: Value) -> ClientResult<Value> {
        self.base.put("api/relvals/create", data).await
    }

    /// Delete one or multiple RelVals. Requires manager role.
    #[instrument(skip(self, data))]
    pub async fn delete(&self, data: Value) -> ClientResult<Value> {
        self.base.delete("api/relvals/delete", Some(data)).await
    }

    /// Update one or multiple RelVals. Requires manager role.
    #[instrument(skip(self, data))]
    pub async fn update(&self, data: Value) -> ClientResult<Value> {
        self.base.post("api/relvals/update", data).await
    }

    /// Retrieve a single RelVal by prepid.
    #[instrument(skip(self))]
    pub async fn get_relval(&self, prepid: &str) -> ClientResult<Value> {
        self.base.get(format!("api/relvals/get/{}", prepid)).await
    }

    /// Which RelVal fields are editable, globally or for one RelVal.
    ///
    /// An empty prepid counts as none.
    #[instrument(skip(self))]
    pub async fn get_editable(&self, prepid: Option<&str>) -> ClientResult<Value> {
        let path = match prepid.filter(|p| !p.is_empty()) {
            Some(prepid) => format!("api/relvals/get_editable/{}", prepid),
            None => "api/relvals/get_editable".to_string(),
        };
        self.base.get(path).await
    }

    /// Bash script with the cmsDriver.py commands of a RelVal.
    #[instrument(skip(self))]
    pub async fn get_cmsdriver(&self, prepid: &str) -> ClientResult<String> {
        self.base
            .get_text(format!("api/relvals/get_cmsdriver/{}", prepid))
            .await
    }

    /// Bash script that uploads configs to the ReqMgr config cache.
    #[instrument(skip(self))]
    pub async fn get_config_upload(&self, prepid: &str) -> ClientResult<String> {
        self.base
            .get_text(format!("api/relvals/get_config_upload/{}", prepid))
            .await
    }

    /// Job dictionary for ReqMgr2.
    #[instrument(skip(self))]
    pub async fn get_dict(&self, prepid: &str) -> ClientResult<Value> {
        self.base.get(format!("api/relvals/get_dict/{}", prepid)).await
    }

    /// Empty step usable as a template.
    #[instrument(skip(self))]
    pub async fn get_default_step(&self) -> ClientResult<Value> {
        self.base.get("api/relvals/get_default_step").await
    }

    /// Move one or multiple RelVals to the next status. Requires manager role.
    #[instrument(skip(self, data))]
    pub async fn next_status(&self, data: Value) -> ClientResult<Value> {
        self.base.post("api/relvals/next_status", data).await
    }

    /// Move one or multiple RelVals to the previous status. Requires manager role.
    #[instrument(skip(self, data))]
    pub async fn previous_status(&self, data: Value) -> ClientResult<Value> {
        self.base.post("api/relvals/previous_status", data).await
    }

    /// Refresh one or multiple RelVals from Stats2 (ReqMgr2 + DBS).
    /// Requires manager role.
    #[instrument(skip(self, data))]
    pub async fn update_workflows(&self, data: Value) -> ClientResult<Value> {
        self.base.post("api/relvals/update_workflows", data).await
    }

    // ============== Tickets ==============

    /// Create a new ticket. Requires manager role.
    #[instrument(skip(self, data))]
    pub async fn create_ticket(&self, data: Value) -> ClientResult<Value> {
        debug!("Creating ticket via {}", self.ticket_create_path.as_str());
        self.base.put(self.ticket_create_path.as_str(), data).await
    }

    /// Delete a ticket. Requires manager role.
    #[instrument(skip(self, data))]
    pub async fn delete_ticket(&self, data: Value) -> ClientResult<Value> {
        self.base.put("api/tickets/delete", data).await
    }

    /// Create the RelVals of a ticket. Requires manager role.
    #[instrument(skip(self, data))]
    pub async fn create_relvals(&self, data: Value) -> ClientResult<Value> {
        self.base.post("api/tickets/create_relvals", data).await
    }

    /// Get a ticket by prepid.
    #[instrument(skip(self))]
    pub async fn get_ticket(&self, prepid: &str) -> ClientResult<Value> {
        self.base.get(format!("api/tickets/get/{}", prepid)).await
    }

    // ============== Search ==============

    /// Search a database, e.g. `relvals` or `tickets`.
    ///
    /// Filtering by `ticket` on the `relvals` database is special-cased by the
    /// server.
    #[instrument(skip(self, params))]
    pub async fn search(&self, db_name: &str, params: SearchParams) -> ClientResult<Value> {
        let request = ApiRequest::get("api/search")
            .with_query(params.to_query(db_name))
            .with_query_encoding(QueryEncoding::KeepCommas);
        self.base.execute(request).await
    }

    /// Search the `relvals` database.
    pub async fn search_relvals(&self, params: SearchParams) -> ClientResult<Value> {
        self.search("relvals", params).await
    }

    /// Search the `tickets` database.
    pub async fn search_tickets(&self, params: SearchParams) -> ClientResult<Value> {
        self.search("tickets", params).await
    }
}
