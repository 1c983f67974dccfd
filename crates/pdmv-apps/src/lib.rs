//! # PdmV Apps
//!
//! REST clients for the PdmV web applications.
//!
//! ## Service Clients
//!
//! - `RelMonService`: list, create, reset, delete, edit and update RelMons;
//!   controller tick; user info
//! - `RelVal`: RelVal CRUD and status transitions, cmsDriver and config-upload
//!   scripts, tickets, database search
//!
//! Every method maps to exactly one HTTP request. Failures are returned
//! unchanged from [`pdmv_base`]: network errors, non-success statuses and
//! undecodable bodies each have their own [`ClientError`] variant.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use pdmv_apps::{RelVal, SearchParams};
//! use pdmv_base::ClientConfig;
//!
//! async fn submitted_relvals() -> pdmv_base::ClientResult<serde_json::Value> {
//!     let relval = RelVal::new(ClientConfig::from_env()?)?;
//!
//!     relval
//!         .search_relvals(
//!             SearchParams::new()
//!                 .limit(50)
//!                 .filter("status", "submitted"),
//!         )
//!         .await
//! }
//! ```

pub mod clients;

pub use clients::{RelMonService, RelVal, TicketCreatePath};

// Re-export the types needed to call the clients
pub use pdmv_base::{
    ClientConfig, ClientError, ClientResult, CredentialMode, FilterValue, Filters,
    RelmonListParams, SearchParams,
};
