/* Generator configuration: optional YAML file merged under command-line flags */

use crate::codegen::{BackendKind, PrinterOptions};
use crate::error::ConfigError;
use crate::resolved::RedeclarationPolicy;
use serde_derive::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/* Values a config file may set; every key is optional */
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct GeneratorConfig {
    pub output_dir: Option<PathBuf>,
    pub backends: Option<BackendKind>,
    pub on_redeclare: Option<RedeclarationPolicy>,
    pub max_depth_default: Option<u32>,
}

impl GeneratorConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(path, &contents)
    }

    pub fn parse(path: &Path, contents: &str) -> Result<Self, ConfigError> {
        serde_yml::from_str(contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

/* Settings passed on the command line; None means "not given" */
#[derive(Debug, Clone, Default)]
pub struct CodegenOverrides {
    pub output_dir: Option<PathBuf>,
    pub backends: Option<BackendKind>,
    pub on_redeclare: Option<RedeclarationPolicy>,
    pub max_depth_default: Option<u32>,
}

/* Effective settings of one codegen run */
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodegenSettings {
    /* None: display artifacts instead of writing them */
    pub output_dir: Option<PathBuf>,
    pub backends: BackendKind,
    pub on_redeclare: RedeclarationPolicy,
    pub printer: PrinterOptions,
}

impl Default for CodegenSettings {
    fn default() -> Self {
        Self {
            output_dir: None,
            backends: BackendKind::default(),
            on_redeclare: RedeclarationPolicy::default(),
            printer: PrinterOptions::default(),
        }
    }
}

impl CodegenSettings {
    /* Command-line values win over file values, which win over defaults */
    pub fn resolve(
        overrides: CodegenOverrides,
        file: Option<GeneratorConfig>,
    ) -> Result<Self, ConfigError> {
        let file = file.unwrap_or_default();
        let defaults = Self::default();

        let max_depth = overrides
            .max_depth_default
            .or(file.max_depth_default)
            .unwrap_or(defaults.printer.default_max_depth);
        if max_depth == 0 {
            return Err(ConfigError::ZeroMaxDepth);
        }

        Ok(Self {
            output_dir: overrides.output_dir.or(file.output_dir),
            backends: overrides.backends.or(file.backends).unwrap_or(defaults.backends),
            on_redeclare: overrides
                .on_redeclare
                .or(file.on_redeclare)
                .unwrap_or(defaults.on_redeclare),
            printer: PrinterOptions {
                default_max_depth: max_depth,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config_file() {
        let config = GeneratorConfig::parse(
            Path::new("cinspect.yaml"),
            "output-dir: generated\nbackends: printer\non-redeclare: error\nmax-depth-default: 4\n",
        )
        .unwrap();
        assert_eq!(config.output_dir, Some(PathBuf::from("generated")));
        assert_eq!(config.backends, Some(BackendKind::Printer));
        assert_eq!(config.on_redeclare, Some(RedeclarationPolicy::Error));
        assert_eq!(config.max_depth_default, Some(4));
    }

    #[test]
    fn test_unknown_keys_are_rejected() {
        let err = GeneratorConfig::parse(Path::new("cinspect.yaml"), "outptu-dir: x\n").unwrap_err();
        assert!(err.to_string().contains("cinspect.yaml"));
    }

    #[test]
    fn test_flags_override_file() {
        let file = GeneratorConfig {
            output_dir: Some(PathBuf::from("from-file")),
            backends: Some(BackendKind::Printer),
            on_redeclare: Some(RedeclarationPolicy::Overwrite),
            max_depth_default: Some(3),
        };
        let overrides = CodegenOverrides {
            output_dir: Some(PathBuf::from("from-flag")),
            backends: None,
            on_redeclare: Some(RedeclarationPolicy::Error),
            max_depth_default: None,
        };

        let settings = CodegenSettings::resolve(overrides, Some(file)).unwrap();
        assert_eq!(settings.output_dir, Some(PathBuf::from("from-flag")));
        assert_eq!(settings.backends, BackendKind::Printer);
        assert_eq!(settings.on_redeclare, RedeclarationPolicy::Error);
        assert_eq!(settings.printer.default_max_depth, 3);
    }

    #[test]
    fn test_defaults() {
        let settings = CodegenSettings::resolve(CodegenOverrides::default(), None).unwrap();
        assert_eq!(settings, CodegenSettings::default());
        assert_eq!(settings.output_dir, None);
        assert_eq!(settings.backends, BackendKind::All);
        assert_eq!(settings.on_redeclare, RedeclarationPolicy::Warn);
        assert_eq!(settings.printer.default_max_depth, 2);
    }

    #[test]
    fn test_zero_max_depth_is_rejected() {
        let overrides = CodegenOverrides {
            max_depth_default: Some(0),
            ..Default::default()
        };
        assert!(matches!(
            CodegenSettings::resolve(overrides, None),
            Err(ConfigError::ZeroMaxDepth)
        ));
    }
}
