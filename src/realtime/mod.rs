//! Realtime payment channel
//!
//! Socket.IO over a WebSocket transport: pending payments are pushed by the
//! backend, operator responses are emitted back with an acknowledgment.

pub mod backoff;
pub mod protocol;
pub mod relay;
pub mod response;

pub use backoff::Backoff;
pub use relay::{ConnectionState, RealtimeRelay, RelayStatus, ADMIN_RESPONSE_EVENT, NEW_PAYMENT_EVENT};
pub use response::{AdminAck, AdminResponder, AdminResponse};
