use crate::error::{LoadError, LoadResult};
use crate::file::{DescriptorFile, FileFormat};
use cinspect_types::{Diagnostic, DescriptorUnit, Severity};
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

/* Anything that can hand over the raw struct descriptors of one input unit */
pub trait DescriptorSource {
    fn load_unit(&self, path: &Path) -> LoadResult<DescriptorUnit>;
}

/* Loads descriptor files from disk and aborts on severe front-end diagnostics */
#[derive(Debug, Clone)]
pub struct DescriptorLoader {
    /* Diagnostics at or above this severity abort the run */
    abort_threshold: Severity,
}

impl Default for DescriptorLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl DescriptorLoader {
    pub fn new() -> Self {
        Self {
            abort_threshold: Severity::Error,
        }
    }

    pub fn with_abort_threshold(abort_threshold: Severity) -> Self {
        Self { abort_threshold }
    }

    pub fn abort_threshold(&self) -> Severity {
        self.abort_threshold
    }

    /* Load one descriptor file into a unit */
    pub fn load_file(&self, path: &Path) -> LoadResult<DescriptorUnit> {
        debug!(path = %path.display(), "loading descriptor file");

        let contents = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        self.load_str(path, &contents, FileFormat::from_path(path))
    }

    /* Parse descriptor text that was read from `path` */
    pub fn load_str(
        &self,
        path: &Path,
        contents: &str,
        format: FileFormat,
    ) -> LoadResult<DescriptorUnit> {
        let file: DescriptorFile = match format {
            FileFormat::Yaml => serde_yml::from_str(contents).map_err(|source| LoadError::Yaml {
                path: path.to_path_buf(),
                source,
            })?,
            FileFormat::Json => {
                serde_json::from_str(contents).map_err(|source| LoadError::Json {
                    path: path.to_path_buf(),
                    source,
                })?
            }
        };

        self.check_diagnostics(path, &file.diagnostics)?;

        let unit = file.into_unit(&path.to_string_lossy());
        debug!(unit = %unit.name, structs = unit.structs.len(), "loaded descriptor unit");
        Ok(unit)
    }

    /* Load every path in order, stopping at the first failure */
    pub fn load_all(&self, paths: &[PathBuf]) -> LoadResult<Vec<DescriptorUnit>> {
        paths.iter().map(|path| self.load_file(path)).collect()
    }

    fn check_diagnostics(&self, path: &Path, diagnostics: &[Diagnostic]) -> LoadResult<()> {
        for diagnostic in diagnostics {
            report_diagnostic(path, diagnostic);
        }

        let severe: Vec<&Diagnostic> = diagnostics
            .iter()
            .filter(|diagnostic| diagnostic.severity >= self.abort_threshold)
            .collect();

        match severe.first() {
            None => Ok(()),
            Some(first) => Err(LoadError::FatalDiagnostic {
                path: path.to_path_buf(),
                threshold: self.abort_threshold,
                count: severe.len(),
                first: first.to_string(),
            }),
        }
    }
}

impl DescriptorSource for DescriptorLoader {
    fn load_unit(&self, path: &Path) -> LoadResult<DescriptorUnit> {
        self.load_file(path)
    }
}

fn report_diagnostic(path: &Path, diagnostic: &Diagnostic) {
    let file = path.display();
    let location = &diagnostic.location;
    let message = &diagnostic.message;
    match diagnostic.severity {
        Severity::Ignored => debug!(%file, %location, "{message}"),
        Severity::Note => info!(%file, %location, "{message}"),
        Severity::Warning => warn!(%file, %location, "{message}"),
        Severity::Error | Severity::Fatal => {
            error!(%file, %location, severity = %diagnostic.severity, "{message}")
        }
    }
}
