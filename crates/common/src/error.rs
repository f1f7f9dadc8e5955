//! Unified error type for the trip finder.

use std::sync::Arc;

use thiserror::Error;

/// Clonable so one failed refresh can be handed to every waiting caller.
#[derive(Debug, Clone, Error)]
pub enum Error {
    #[error("Missing parameters: {}. Needs: origin, nights, budget, profile", .0.join(", "))]
    MissingParameter(Vec<String>),

    #[error("Invalid parameter {name}: {reason}")]
    InvalidParameter { name: String, reason: String },

    #[error("Unsupported profile {0:?}. Needs: balanced, luxury, affordable")]
    UnsupportedProfile(String),

    #[error("Unsupported origin city: {0}")]
    UnknownOrigin(String),

    #[error("No inventory for {0}")]
    NoInventory(String),

    #[error("Inventory lookup for {key} timed out after {timeout_ms}ms")]
    ProviderTimeout { key: String, timeout_ms: u64 },

    #[error("Inventory provider error: {0}")]
    Provider(String),

    #[error("Weight document error: {0}")]
    Weights(String),

    #[error("JSON error in {context}: {source}")]
    Json {
        context: String,
        #[source]
        source: Arc<serde_json::Error>,
    },

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: Arc<std::io::Error>,
    },
}

impl Error {
    /// True for errors caused by the search request rather than the backend.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Error::MissingParameter(_)
                | Error::InvalidParameter { .. }
                | Error::UnsupportedProfile(_)
                | Error::UnknownOrigin(_)
        )
    }

    pub fn io(path: impl Into<String>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source: Arc::new(source),
        }
    }

    pub fn json(context: impl Into<String>, source: serde_json::Error) -> Self {
        Error::Json {
            context: context.into(),
            source: Arc::new(source),
        }
    }

    /// True when a cache key had nothing to score.
    pub fn is_no_inventory(&self) -> bool {
        matches!(self, Error::NoInventory(_))
    }
}
