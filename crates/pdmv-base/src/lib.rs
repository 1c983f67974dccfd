//! # PdmV Base
//!
//! Shared plumbing for the PdmV application clients (RelMonService, RelVal).
//!
//! ## Overview
//!
//! The pdmv-base crate handles:
//! - **Configuration**: credential mode, target deployment, credentials, timeouts
//! - **Requests**: resolved request descriptors and query-string encoding
//! - **Marshaling**: search and list parameters into ordered query pairs
//! - **Transport**: the `Transport` seam and its reqwest implementation
//! - **Errors**: network, HTTP status and JSON decode failures kept distinct
//!
//! Authentication flows are not performed here. An SSO cookie or a bearer
//! token obtained elsewhere is attached to each request as configured.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use pdmv_base::{BaseClient, ClientConfig};
//!
//! async fn example() -> pdmv_base::ClientResult<()> {
//!     let config = ClientConfig::default().with_cookie("session=...");
//!     let client = BaseClient::new("relval", config)?;
//!
//!     let step = client.get("api/relvals/get_default_step").await?;
//!     println!("{}", step);
//!     Ok(())
//! }
//! ```
//!
//! ## Concurrency
//!
//! Each operation performs exactly one request. Clients are cheap to clone and
//! share their transport, so any `Transport` must be safe for concurrent use.

pub mod client;
pub mod config;
pub mod error;
pub mod logging;
pub mod query;
pub mod request;
pub mod transport;

pub use client::BaseClient;
pub use config::{ClientConfig, CredentialMode, DEV_SERVER_ROOT, PROD_SERVER_ROOT};
pub use error::{ClientError, ClientResult, ConfigError};
pub use query::{FilterValue, Filters, RelmonListParams, SearchParams};
pub use request::{ApiRequest, Method, QueryEncoding};
pub use transport::{HttpTransport, RawResponse, Transport};
