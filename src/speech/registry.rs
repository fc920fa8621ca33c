use std::collections::HashMap;
use std::time::Duration;

use tracing::{info, warn};

use crate::cli::config::BackendConfig;
use crate::speech::backend::SpeechBackend;
use crate::speech::command::CommandBackend;
use crate::speech::console::ConsoleBackend;
use crate::speech::http::{DEFAULT_BRIDGE_ENDPOINT, HttpBackend};
use crate::speech::manager::SpeechManager;

/// Builds a backend from its config entry; `None` means "not available here".
pub type BackendFactory = fn(&BackendConfig) -> Option<Box<dyn SpeechBackend>>;

/// Backend constructors keyed by kind, resolved once at startup.
pub struct BackendRegistry {
    factories: HashMap<String, BackendFactory>,
}

impl Default for BackendRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl BackendRegistry {
    pub fn empty() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// Registry with the built-in `console`, `command` and `http` kinds.
    pub fn with_defaults() -> Self {
        let mut registry = Self::empty();
        registry.register("console", console_factory);
        registry.register("command", command_factory);
        registry.register("http", http_factory);
        registry
    }

    pub fn register(&mut self, kind: &str, factory: BackendFactory) {
        self.factories.insert(kind.to_string(), factory);
    }

    pub fn kinds(&self) -> Vec<&str> {
        let mut kinds: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        kinds.sort_unstable();
        kinds
    }

    pub fn build(&self, config: &BackendConfig) -> Option<Box<dyn SpeechBackend>> {
        let Some(factory) = self.factories.get(&config.kind) else {
            warn!(
                "Speech backend '{}' has unknown kind '{}'; treating as unavailable",
                config.name, config.kind
            );
            return None;
        };

        let backend = factory(config);
        if backend.is_none() {
            info!("Speech backend '{}' could not be created on this system", config.name);
        }
        backend
    }

    /// Build every configured backend into a manager.
    pub fn build_manager(&self, configs: &[BackendConfig], probe_period: Duration) -> SpeechManager {
        let mut manager = SpeechManager::new(probe_period);
        for config in configs {
            if let Some(backend) = self.build(config) {
                manager.register(backend, config.priority);
            }
        }
        manager
    }
}

fn console_factory(config: &BackendConfig) -> Option<Box<dyn SpeechBackend>> {
    Some(Box::new(ConsoleBackend::stdout(&config.name)))
}

fn command_factory(config: &BackendConfig) -> Option<Box<dyn SpeechBackend>> {
    let mut backend = match &config.program {
        Some(program) => CommandBackend::new(&config.name, program, config.args.clone()),
        None => CommandBackend::platform_default(&config.name),
    };

    if let Some(cancel) = &config.cancel_args {
        backend = backend.with_cancel_args(cancel.clone());
    }

    Some(Box::new(backend))
}

fn http_factory(config: &BackendConfig) -> Option<Box<dyn SpeechBackend>> {
    let endpoint = config.endpoint.as_deref().unwrap_or(DEFAULT_BRIDGE_ENDPOINT);
    let timeout = Duration::from_millis(config.timeout_ms);

    match HttpBackend::new(&config.name, endpoint, timeout) {
        Ok(backend) => Some(Box::new(backend)),
        Err(e) => {
            warn!("Could not create HTTP speech bridge '{}': {}", config.name, e);
            None
        }
    }
}
