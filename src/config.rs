//! Configuration for docstrings-complete.
//!
//! Configuration is read from a YAML file. Every field has a default, so an
//! empty file (or no file at all) is a valid configuration.

use std::fs;
use std::path::{Path, PathBuf};

use globset::{Glob, GlobSet, GlobSetBuilder};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::detect::skip;

/// File names searched for by [`Config::discover`], in order.
pub const CONFIG_FILE_NAMES: [&str; 2] = ["docstrings-complete.yaml", ".docstrings-complete.yaml"];

pub const DEFAULT_TEST_FILENAME_PATTERN: &str = r"test_.*\.py";
pub const DEFAULT_TEST_FUNCTION_PATTERN: &str = r"test_.*";
pub const DEFAULT_FIXTURE_FILENAME_PATTERN: &str = r"conftest\.py";
pub const DEFAULT_FIXTURE_DECORATOR_PATTERN: &str = r"(^|\.)fixture$";
pub const DEFAULT_DOCS_BASE_URL: &str = "https://github.com/jdkandersson/flake8-docstrings-complete";

/// Errors that can occur while loading or validating configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid {field} {pattern:?}: {message}")]
    InvalidPattern {
        field: &'static str,
        pattern: String,
        message: String,
    },
    #[error("invalid excluded_paths pattern {pattern:?}: {message}")]
    InvalidGlob { pattern: String, message: String },
    #[error("{}", .0.iter().map(|e| e.to_string()).collect::<Vec<_>>().join("; "))]
    Multiple(Vec<ConfigError>),
}

/// When a class constructor is exempt from documentation checks.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum ConstructorExemption {
    /// `__init__` never needs a docstring or an arguments section.
    #[default]
    Always,
    /// Exempt only when the class docstring has an attributes section.
    ClassAttrs,
    /// `__init__` is checked like any other method.
    Never,
}

impl ConstructorExemption {
    /// Whether a constructor is exempt given its class docstring.
    pub fn exempts(&self, class_documents_attrs: bool) -> bool {
        match self {
            ConstructorExemption::Always => true,
            ConstructorExemption::ClassAttrs => class_documents_attrs,
            ConstructorExemption::Never => false,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ConstructorExemption::Always => "always",
            ConstructorExemption::ClassAttrs => "class-attrs",
            ConstructorExemption::Never => "never",
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Files whose base name matches are test files.
    pub test_filename_pattern: String,
    /// Functions in test files whose name matches are skipped.
    pub test_function_pattern: String,
    /// Files whose base name matches are fixture files.
    pub fixture_filename_pattern: String,
    /// Decorators marking fixtures in test and fixture files.
    pub fixture_decorator_pattern: String,
    pub constructor_exemption: ConstructorExemption,
    /// Arguments starting with `_` need not be documented.
    pub private_args_optional: bool,
    /// Base of the documentation link appended to every message.
    pub docs_base_url: String,
    /// Glob patterns for paths to exclude (e.g., "**/migrations/**")
    pub excluded_paths: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            test_filename_pattern: DEFAULT_TEST_FILENAME_PATTERN.to_string(),
            test_function_pattern: DEFAULT_TEST_FUNCTION_PATTERN.to_string(),
            fixture_filename_pattern: DEFAULT_FIXTURE_FILENAME_PATTERN.to_string(),
            fixture_decorator_pattern: DEFAULT_FIXTURE_DECORATOR_PATTERN.to_string(),
            constructor_exemption: ConstructorExemption::default(),
            private_args_optional: false,
            docs_base_url: DEFAULT_DOCS_BASE_URL.to_string(),
            excluded_paths: Vec::new(),
        }
    }
}

impl Config {
    /// Parse a configuration from a YAML file.
    pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_yaml_str(&content)
    }

    /// Parse a configuration from YAML text. Empty text is the default config.
    pub fn from_yaml_str(content: &str) -> Result<Self, ConfigError> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    /// Render as YAML, as written by `init`.
    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Find a config file in `dir`.
    pub fn discover(dir: &Path) -> Option<PathBuf> {
        CONFIG_FILE_NAMES
            .iter()
            .map(|name| dir.join(name))
            .find(|p| p.is_file())
    }

    /// Check every pattern, reporting all that are invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();

        let anchored = [
            ("test_filename_pattern", &self.test_filename_pattern),
            ("test_function_pattern", &self.test_function_pattern),
            ("fixture_filename_pattern", &self.fixture_filename_pattern),
        ];
        for (field, pattern) in anchored {
            if let Err(e) = skip::anchored_regex(pattern) {
                errors.push(ConfigError::InvalidPattern {
                    field,
                    pattern: pattern.clone(),
                    message: e.to_string(),
                });
            }
        }
        if let Err(e) = skip::search_regex(&self.fixture_decorator_pattern) {
            errors.push(ConfigError::InvalidPattern {
                field: "fixture_decorator_pattern",
                pattern: self.fixture_decorator_pattern.clone(),
                message: e.to_string(),
            });
        }

        for pattern in &self.excluded_paths {
            if let Err(e) = Glob::new(pattern) {
                errors.push(ConfigError::InvalidGlob {
                    pattern: pattern.clone(),
                    message: e.to_string(),
                });
            }
        }

        match errors.len() {
            0 => Ok(()),
            1 => Err(errors.remove(0)),
            _ => Err(ConfigError::Multiple(errors)),
        }
    }

    /// Compile `excluded_paths` into a matcher.
    pub fn excluded_matcher(&self) -> Result<GlobSet, ConfigError> {
        let mut builder = GlobSetBuilder::new();
        for pattern in &self.excluded_paths {
            let glob = Glob::new(pattern).map_err(|e| ConfigError::InvalidGlob {
                pattern: pattern.clone(),
                message: e.to_string(),
            })?;
            builder.add(glob);
        }
        builder.build().map_err(|e| ConfigError::InvalidGlob {
            pattern: self.excluded_paths.join(", "),
            message: e.to_string(),
        })
    }

    /// Check if a path should be excluded based on excluded_paths patterns.
    /// Uses globset for matching, which supports `**` for recursive directory matching.
    pub fn is_path_excluded(&self, path: &Path) -> bool {
        if self.excluded_paths.is_empty() {
            return false;
        }

        match self.excluded_matcher() {
            Ok(matcher) => matcher.is_match(path),
            Err(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = Config::from_yaml_str("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.test_filename_pattern, r"test_.*\.py");
        assert_eq!(config.constructor_exemption, ConstructorExemption::Always);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_config() {
        let yaml = r#"
test_function_pattern: 'check_.*'
constructor_exemption: class-attrs
private_args_optional: true
excluded_paths:
  - "**/migrations/**"
"#;
        let config = Config::from_yaml_str(yaml).unwrap();
        assert_eq!(config.test_function_pattern, "check_.*");
        assert_eq!(config.test_filename_pattern, DEFAULT_TEST_FILENAME_PATTERN);
        assert_eq!(config.constructor_exemption, ConstructorExemption::ClassAttrs);
        assert!(config.private_args_optional);
        assert!(config.is_path_excluded(Path::new("app/migrations/0001_initial.py")));
        assert!(!config.is_path_excluded(Path::new("app/models.py")));
    }

    #[test]
    fn test_unknown_exemption_is_rejected() {
        let err = Config::from_yaml_str("constructor_exemption: sometimes").unwrap_err();
        assert!(matches!(err, ConfigError::Yaml(_)));
    }

    #[test]
    fn test_validate_reports_every_invalid_pattern() {
        let config = Config {
            test_function_pattern: "(".to_string(),
            fixture_decorator_pattern: "[".to_string(),
            excluded_paths: vec!["a/{b".to_string()],
            ..Default::default()
        };

        match config.validate().unwrap_err() {
            ConfigError::Multiple(errors) => assert_eq!(errors.len(), 3),
            other => panic!("expected multiple errors, got {}", other),
        }
    }

    #[test]
    fn test_constructor_exemption() {
        assert!(ConstructorExemption::Always.exempts(false));
        assert!(ConstructorExemption::ClassAttrs.exempts(true));
        assert!(!ConstructorExemption::ClassAttrs.exempts(false));
        assert!(!ConstructorExemption::Never.exempts(true));
    }

    #[test]
    fn test_yaml_roundtrip_and_discover() {
        let temp = TempDir::new().unwrap();
        assert!(Config::discover(temp.path()).is_none());

        let path = temp.path().join(".docstrings-complete.yaml");
        std::fs::write(&path, Config::default().to_yaml().unwrap()).unwrap();

        assert_eq!(Config::discover(temp.path()), Some(path.clone()));
        assert_eq!(Config::parse_file(&path).unwrap(), Config::default());
    }

    #[test]
    fn test_missing_file() {
        let err = Config::parse_file("/nonexistent/docstrings-complete.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
