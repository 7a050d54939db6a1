//! Typed control messages exchanged with an OpenFlow-style switch.
//!
//! The controller core never touches the wire format. It builds the typed
//! requests in [`api`], hands them to a [`SwitchConnection`], and receives
//! [`SwitchEvent`]s from whatever transport owns the connection.
//!
//! - [`api`]: outbound requests (rule-add, packet-out, port counters)
//! - [`event`]: inbound notifications
//! - [`connection`]: the send side of one switch connection
//! - [`error`]: error types for send failures
//!
//! # Example
//!
//! ```ignore
//! use ofctl_switch::{api::PortStatsRequest, SwitchConnection, SwitchResult};
//! use ofctl_types::PortNo;
//!
//! async fn poll(conn: &dyn SwitchConnection, port: PortNo) -> SwitchResult<()> {
//!     conn.send(PortStatsRequest::new(port).into()).await
//! }
//! ```

pub mod api;
pub mod connection;
pub mod error;
pub mod event;
pub mod types;

pub use connection::{SwitchConnection, SwitchMessage};
pub use error::{SwitchError, SwitchResult};
pub use event::{FlowRemoved, PacketIn, PortStatsReply, PortStatus, SwitchEvent, SwitchFeatures};
pub use types::{BufferId, FlowRemovedReason, PortReason};
