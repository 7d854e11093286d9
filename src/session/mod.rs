//! Session management module
//!
//! This module holds the persisted operator token and exposes it as an
//! explicit context injected into the resource client and realtime relay.

pub mod context;
pub mod storage;

pub use context::{Session, SessionState, Credentials};
pub use storage::SessionStorage;
