//! Application clients.
//!
//! One client per PdmV application:
//! - RelMonService: RelMon report scheduling and tracking
//! - RelVal: RelVal and ticket management, database search
//!
//! Both delegate transport, authentication headers and error mapping to
//! [`pdmv_base::BaseClient`].

pub mod relmon;
pub mod relval;

pub use relmon::RelMonService;
pub use relval::{RelVal, TicketCreatePath};
