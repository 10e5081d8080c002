use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SpecstackError {
    #[error("not initialized: run 'specstack init'")]
    NotInitialized,

    #[error("stack catalog not found: {}", .0.display())]
    CatalogNotFound(PathBuf),

    #[error("malformed catalog entry '{stack}': {message}")]
    Parse { stack: String, message: String },

    #[error("stack not found: {name} (known stacks: {})", .known.join(", "))]
    StackNotFound { name: String, known: Vec<String> },

    #[error("no stacks available: the catalog defines no entries")]
    NoStacksAvailable,

    #[error("detail document for stack '{stack}' not found: {}", .path.display())]
    StackFileMissing { stack: String, path: PathBuf },

    #[error("bundled template missing: {0}")]
    TemplateMissing(String),

    #[error("contract violation: {} still contains '{marker}'", .path.display())]
    ContractViolation { path: PathBuf, marker: String },

    #[error("unsupported target '{target}' (supported: {})", .supported.join(", "))]
    UnsupportedTarget {
        target: String,
        supported: Vec<String>,
    },

    #[error("command file not installed: {} (run 'specstack init' first)", .0.display())]
    SourceMissing(PathBuf),

    #[error("home directory not found: set HOME or pass --home")]
    HomeNotFound,

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
}

impl SpecstackError {
    /// True for the "something expected on disk is absent" family.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            SpecstackError::NotInitialized
                | SpecstackError::CatalogNotFound(_)
                | SpecstackError::StackFileMissing { .. }
                | SpecstackError::TemplateMissing(_)
                | SpecstackError::SourceMissing(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, SpecstackError>;
