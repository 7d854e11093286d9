//! Test helpers module
//!
//! Mock backends and shared setup for the integration suites: a wiremock
//! REST backend, a scripted Socket.IO server and a test context tying them
//! to settings and a session.

#![allow(dead_code)]

pub mod api_mock;
pub mod socket_mock;
pub mod test_context;
pub mod test_data;

pub use api_mock::*;
pub use socket_mock::*;
pub use test_context::*;
pub use test_data::*;
