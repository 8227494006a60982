//! Docstring checks over extracted code facts.

mod runner;
pub mod skip;
mod suppress;
mod types;
mod validate;

pub use runner::Runner;
pub use skip::{FileType, SkipPolicy};
pub use suppress::{
    filter_suppressed, matches_suppression, parse_noqa, parse_suppressions, SuppressedViolation,
    Suppression,
};
pub use types::{
    sort_violations, DetectionResult, Dimension, EntityRef, FileFailure, Finding, Violation,
    ViolationCode,
};
pub use validate::{lint_entities, validate_entity, ValidateOptions};
