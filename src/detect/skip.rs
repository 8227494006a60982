//! Skip policy for test and fixture code.
//!
//! Test functions and fixtures are exempt from every check. A file is a test
//! file when its base name matches the test-filename pattern, otherwise a
//! fixture file when it matches the fixture-filename pattern. Filename and
//! function-name patterns match at the start of the name; the decorator
//! pattern is searched anywhere in the qualified decorator name, ignoring
//! case. Only functions and methods are ever skipped.

use regex::Regex;

use crate::analysis::CodeEntity;
use crate::config::{Config, ConfigError};

/// Compile a pattern that must match at the start of the text.
pub fn anchored_regex(pattern: &str) -> Result<Regex, regex::Error> {
    Regex::new(&format!("^(?:{})", pattern))
}

/// Compile a case-insensitive pattern searched anywhere in the text.
pub fn search_regex(pattern: &str) -> Result<Regex, regex::Error> {
    Regex::new(&format!("(?i)(?:{})", pattern))
}

/// How a file is treated by the skip policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileType {
    Test,
    Fixture,
    Default,
}

/// Compiled skip patterns.
#[derive(Debug, Clone)]
pub struct SkipPolicy {
    test_filename: Regex,
    test_function: Regex,
    fixture_filename: Regex,
    fixture_decorator: Regex,
}

impl SkipPolicy {
    pub fn new(config: &Config) -> Result<Self, ConfigError> {
        let compile = |field: &'static str,
                       pattern: &str,
                       build: fn(&str) -> Result<Regex, regex::Error>| {
            build(pattern).map_err(|e| ConfigError::InvalidPattern {
                field,
                pattern: pattern.to_string(),
                message: e.to_string(),
            })
        };

        Ok(Self {
            test_filename: compile(
                "test_filename_pattern",
                &config.test_filename_pattern,
                anchored_regex,
            )?,
            test_function: compile(
                "test_function_pattern",
                &config.test_function_pattern,
                anchored_regex,
            )?,
            fixture_filename: compile(
                "fixture_filename_pattern",
                &config.fixture_filename_pattern,
                anchored_regex,
            )?,
            fixture_decorator: compile(
                "fixture_decorator_pattern",
                &config.fixture_decorator_pattern,
                search_regex,
            )?,
        })
    }

    /// Classify a file by its base name.
    pub fn file_type(&self, file_name: &str) -> FileType {
        if self.test_filename.is_match(file_name) {
            FileType::Test
        } else if self.fixture_filename.is_match(file_name) {
            FileType::Fixture
        } else {
            FileType::Default
        }
    }

    pub fn is_fixture_decorator(&self, decorator: &str) -> bool {
        self.fixture_decorator.is_match(decorator)
    }

    /// Whether every check is skipped for this entity.
    pub fn is_skipped(&self, entity: &CodeEntity) -> bool {
        if !entity.kind.is_callable() {
            return false;
        }

        let file_type = self.file_type(&entity.file);
        if file_type == FileType::Test && self.test_function.is_match(&entity.name) {
            return true;
        }

        matches!(file_type, FileType::Test | FileType::Fixture)
            && entity
                .decorators
                .iter()
                .any(|d| self.is_fixture_decorator(d))
    }
}
