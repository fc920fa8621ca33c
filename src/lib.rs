//! Accessibility announcement engine: watches a host application's widget
//! tree and speaks focus, menu and screen changes through the best available
//! speech backend.

use crate::{
    cli::config::AppConfig, lifecycle::coordinator::AccessibilityEngine,
    speech::registry::BackendRegistry,
};

pub mod cli;
pub mod clock;
pub mod error;
pub mod host;
pub mod introspect;
pub mod lifecycle;
pub mod narrator;
pub mod speech;
pub mod trace;
pub mod tracker;

/// Engine with the built-in backend kinds, configured from `config`.
pub fn build_engine(config: &AppConfig) -> AccessibilityEngine {
    AccessibilityEngine::from_config(config, &BackendRegistry::with_defaults())
}
