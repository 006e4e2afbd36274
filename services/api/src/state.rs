//! Shared Application State
//!
//! This module defines the `AppState` struct, which holds the shared,
//! clonable resources handlers need: the vendor client and the configuration.

use crate::config::Config;
use std::sync::Arc;
use vetvoice_core::vendor::VoiceVendor;

/// The shared application state, created once at startup and passed to all
/// handlers. `vendor` is `None` when no credential is configured; the proxy
/// endpoints then answer with a configuration error and the chat session
/// serves scripted responses only.
#[derive(Clone)]
pub struct AppState {
    pub vendor: Option<Arc<dyn VoiceVendor>>,
    pub config: Arc<Config>,
}
