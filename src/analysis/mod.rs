//! AST-backed code analysis module.
//!
//! This module turns source code into per-definition "facts" consumed by the
//! docstring checks. Facts include:
//! - Declared arguments (with their kinds and the implicit receiver)
//! - Whether a function returns or yields a value
//! - Raised exception types and bare re-raises
//! - Attributes a class exposes
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐     ┌──────────────┐     ┌───────────────┐
//! │ Source Files    │────▶│ Front-ends   │────▶│ syntax::Module│
//! └─────────────────┘     │ (tree-sitter)│     │ (parser-      │
//!                         └──────────────┘     │  neutral)     │
//!                                              └───────────────┘
//!                                                      │
//!                                                      ▼
//!                         ┌──────────────┐     ┌───────────────┐
//!                         │ Validation   │◀────│ CodeEntity    │
//!                         │ Rules        │     │ (facts)       │
//!                         └──────────────┘     └───────────────┘
//! ```
//!
//! # Adding a New Front-end
//!
//! 1. Create a new module in `src/analysis/languages/`
//! 2. Implement `LanguageAnalyzer`, lowering the native tree into `syntax`
//! 3. Register the analyzer in `languages/mod.rs`
//!
//! See `languages/python.rs` for the reference implementation.

mod extract;
mod facts;
mod languages;
pub mod syntax;
mod traits;

pub use extract::extract_entities;
pub use facts::{
    is_public_name, Argument, ArgumentKind, AttributeRef, CodeEntity, EntityContext, EntityKind,
    ExceptionRef, Span,
};
pub use languages::{get_analyzer, register_analyzers, registered_extensions, PythonAnalyzer};
pub use traits::{Comment, LanguageAnalyzer, ParsedFile};
