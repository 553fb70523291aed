//! Component G — Event Ingress & Run Log.

pub mod bus;
pub mod log;
pub mod types;

pub use bus::{EventBus, EventBusError, SharedEventBus};
pub use log::{Digest, EventLogError, RunEventLog, SpindleRisk};
pub use types::{CoreEvent, EventRecord, RunId, SessionId, TicketId};
