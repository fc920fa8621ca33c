use crate::host::widget::WidgetRef;

/// Failures reading from or writing to the host's widget tree.
#[derive(Debug, thiserror::Error)]
pub enum HostError {
    /// The host has not created its input-focus manager yet
    #[error("focus manager is not available yet")]
    FocusManagerUnavailable,

    /// Widget enumeration is not ready (host still initializing)
    #[error("host widget tree not ready: {0}")]
    NotReady(String),

    /// The handle refers to a widget the host has destroyed
    #[error("widget {0} no longer exists")]
    StaleWidget(WidgetRef),
}

/// Failures reported by a single speech backend.
#[derive(Debug, thiserror::Error)]
pub enum SpeechError {
    /// Text-to-speech program could not be started
    #[error("failed to spawn {program}: {source}")]
    Spawn {
        program: String,
        source: std::io::Error,
    },

    /// Transport failure talking to an HTTP speech bridge
    #[error("speech bridge request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend answered but refused the request
    #[error("{backend} rejected the request: {reason}")]
    Rejected { backend: String, reason: String },
}

/// Failures loading a replay script.
#[derive(Debug, thiserror::Error)]
pub enum ScriptError {
    #[error("could not read script '{path}': {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("could not parse script '{path}': {source}")]
    Parse {
        path: String,
        source: serde_yaml::Error,
    },
}
