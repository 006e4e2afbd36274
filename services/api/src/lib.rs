//! Vetvoice API Library Crate
//!
//! This library contains all the logic for the consultation web service:
//! configuration, the request/response models, the two vendor proxy
//! endpoints, the conversation-turn orchestration, the WebSocket session
//! runtime, and routing. The `api` binary is a thin wrapper around it.

pub mod audio;
pub mod config;
pub mod handlers;
pub mod models;
pub mod proxy;
pub mod router;
pub mod state;
pub mod ws;
