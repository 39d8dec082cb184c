use thiserror::Error;

use crate::source::{HookPoint, Operation};

/// Errors returned by a data source
#[derive(Error, Debug)]
pub enum DataSourceError {
    /// The backend operation has no demo-mode counterpart
    #[error("{operation} not available in demo mode.")]
    UnsupportedInDemoMode { operation: Operation },

    /// A caller-attached hook failed and aborted the fetch
    #[error("{point} hook failed: {source}")]
    Hook {
        point: HookPoint,
        #[source]
        source: anyhow::Error,
    },

    #[error("Dataset decode error: {0}")]
    Dataset(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl DataSourceError {
    /// The unsupported operation, if this is an `UnsupportedInDemoMode` error
    pub fn operation(&self) -> Option<Operation> {
        match self {
            DataSourceError::UnsupportedInDemoMode { operation } => Some(*operation),
            _ => None,
        }
    }

    /// The hook point that failed, if this is a `Hook` error
    pub fn hook_point(&self) -> Option<HookPoint> {
        match self {
            DataSourceError::Hook { point, .. } => Some(*point),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, DataSourceError>;
