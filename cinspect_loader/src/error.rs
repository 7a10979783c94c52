use cinspect_types::Severity;
use std::path::PathBuf;
use thiserror::Error;

/// Result alias used across the loader crate.
pub type LoadResult<T> = Result<T, LoadError>;

/// Errors raised while turning input paths into descriptor units.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The descriptor file could not be read.
    #[error("failed to read '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The descriptor file is not valid YAML for the descriptor schema.
    #[error("failed to parse YAML descriptors in '{}': {source}", path.display())]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yml::Error,
    },

    /// The descriptor file is not valid JSON for the descriptor schema.
    #[error("failed to parse JSON descriptors in '{}': {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The front end reported a diagnostic at or above the abort threshold.
    #[error(
        "Failed to parse file '{}': {count} diagnostic(s) at or above '{threshold}', first: {first}",
        path.display()
    )]
    FatalDiagnostic {
        path: PathBuf,
        threshold: Severity,
        count: usize,
        first: String,
    },

    /// A glob pattern could not be translated.
    #[error("invalid glob pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// A glob pattern matched nothing.
    #[error("pattern '{pattern}' did not match any files")]
    NoMatches { pattern: String },

    /// Walking a directory while expanding a pattern failed.
    #[error("failed to walk '{}': {source}", path.display())]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },
}
