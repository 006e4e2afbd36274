//! WebSocket Session Runtime
//!
//! This module hosts live consultation sessions over WebSockets. It is
//! structured into submodules for clarity:
//!
//! - `protocol`: the JSON-based message format between browser and server.
//! - `session`: the socket lifecycle and the executor for the state
//!   machine's commands (turn dispatch, the capture re-arm timer, cleanup).

pub mod protocol;
pub mod session;

pub use session::ws_handler;
