//! Core traits for language front-ends.

use std::path::Path;

use super::syntax::Module;

/// Holds a parsed tree-sitter tree and associated metadata.
///
/// This is kept separate from the syntax model to allow reusing the tree
/// for multiple passes (definitions, comments) without re-parsing.
pub struct ParsedFile {
    /// The tree-sitter parse tree.
    pub tree: tree_sitter::Tree,
    /// The original source code (kept for node text extraction).
    pub source: Vec<u8>,
    /// The file path (for error reporting).
    pub path: String,
}

impl ParsedFile {
    /// Get the source code as a string slice.
    pub fn source_str(&self) -> &str {
        std::str::from_utf8(&self.source).unwrap_or("")
    }

    /// Get text for a tree-sitter node.
    pub fn node_text(&self, node: tree_sitter::Node) -> &str {
        node.utf8_text(&self.source).unwrap_or("")
    }

    /// Whether tree-sitter had to recover from syntax errors.
    pub fn has_errors(&self) -> bool {
        self.tree.root_node().has_error()
    }
}

/// A source comment, used for inline suppressions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    /// Line of the comment (1-indexed).
    pub line: usize,
    /// First line the comment applies to. A comment that follows the closing
    /// quotes of a multi-line string covers the whole string.
    pub first_line: usize,
    /// Comment text including the leading `#`.
    pub text: String,
}

/// Language front-end trait.
///
/// A front-end parses source text and lowers it into the parser-neutral
/// [`Module`] consumed by the fact extractor.
///
/// # Thread Safety
///
/// Note: tree_sitter::Parser is not Sync, so implementations should
/// create parsers as needed or use thread-local storage.
pub trait LanguageAnalyzer: Send + Sync {
    /// Returns the language identifier (e.g., "python").
    fn language_id(&self) -> &'static str;

    /// Returns file extensions this analyzer handles (without dot).
    fn file_extensions(&self) -> &'static [&'static str];

    /// Parse a source file into a tree-sitter tree.
    ///
    /// Partial parse errors are still returned as a valid tree with ERROR nodes.
    fn parse(&self, path: &Path, source: &[u8]) -> anyhow::Result<ParsedFile>;

    /// Lower a parsed file into the syntax model.
    fn extract_module(&self, parsed: &ParsedFile) -> anyhow::Result<Module>;

    /// Collect every comment in the file, in source order.
    fn extract_comments(&self, parsed: &ParsedFile) -> anyhow::Result<Vec<Comment>>;

    /// Check if this analyzer handles the given file extension.
    fn handles_extension(&self, ext: &str) -> bool {
        self.file_extensions().contains(&ext)
    }
}
