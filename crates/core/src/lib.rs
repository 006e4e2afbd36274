//! Core domain logic for the vetvoice consultation service.
//!
//! This crate holds everything that does not depend on the web framework:
//! the scripted fallback advisor, the chat message model, the session state
//! machine, and the client for the third-party voice vendor. The `api`
//! service crate wires these pieces to HTTP and WebSocket endpoints.

pub mod advisor;
pub mod message;
pub mod session;
pub mod vendor;
