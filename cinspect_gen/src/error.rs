use cinspect_types::SourceLocation;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while building the struct table.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// A struct name was declared twice under the `error` redeclaration policy.
    #[error(
        "struct '{name}' redeclared in '{second_unit}' at {second} (first declared in '{first_unit}' at {first})"
    )]
    Redeclared {
        name: String,
        first_unit: String,
        first: SourceLocation,
        second_unit: String,
        second: SourceLocation,
    },
}

/// Errors raised while loading a generator configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config '{}': {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yml::Error,
    },

    /// Generated printers treat a zero bound as "unset", so it cannot be a default.
    #[error("max-depth-default must be at least 1")]
    ZeroMaxDepth,
}
