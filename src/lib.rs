//! docstrings-complete - a completeness linter for Python docstrings.
//!
//! Every function, method and class docstring is cross-checked against the
//! code it documents. Arguments, returned and yielded values, raised
//! exceptions and class attributes must be described in the matching
//! Google-style section, and sections that describe nothing the code does
//! are reported too. Each finding carries a stable `DCO0xx` code.
//!
//! # Architecture
//!
//! - `docstring`: section extraction from docstring text
//! - `analysis`: tree-sitter front-end, syntax model and code facts
//! - `detect`: cross-validation, skip policy, suppressions and the runner
//! - `config`: YAML configuration
//! - `report`: output formatting (pretty, JSON, SARIF)
//!
//! # Library use
//!
//! ```no_run
//! use docstrings_complete::{Config, Runner};
//!
//! let runner = Runner::new(&Config::default()).unwrap();
//! let result = runner.lint_source("source.py", b"def foo(bar):\n    pass\n").unwrap();
//! for violation in &result.violations {
//!     println!("{}:{} {}", violation.line, violation.column, violation.code);
//! }
//! ```

pub mod analysis;
pub mod cli;
pub mod config;
pub mod detect;
pub mod docstring;
pub mod report;

pub use analysis::{
    extract_entities, register_analyzers, CodeEntity, EntityKind, LanguageAnalyzer,
    PythonAnalyzer,
};
pub use config::{Config, ConfigError, ConstructorExemption};
pub use detect::{
    lint_entities, validate_entity, DetectionResult, Runner, SkipPolicy, ValidateOptions,
    Violation, ViolationCode,
};

/// Initialize all subsystems.
///
/// Call this once at startup.
pub fn init() {
    register_analyzers();
}
