//! Fact structures extracted from definitions.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Source location span with byte offsets and line/column positions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    /// Start byte offset (0-indexed).
    pub start_byte: usize,
    /// End byte offset (0-indexed, exclusive).
    pub end_byte: usize,
    /// Start line (1-indexed).
    pub start_line: usize,
    /// Start column (1-indexed).
    pub start_col: usize,
    /// End line (1-indexed).
    pub end_line: usize,
    /// End column (1-indexed).
    pub end_col: usize,
}

impl Span {
    /// Create a span from a tree-sitter node.
    pub fn from_node(node: tree_sitter::Node) -> Self {
        let start = node.start_position();
        let end = node.end_position();
        Self {
            start_byte: node.start_byte(),
            end_byte: node.end_byte(),
            start_line: start.row + 1, // tree-sitter is 0-indexed
            start_col: start.column + 1,
            end_line: end.row + 1,
            end_col: end.column + 1,
        }
    }

    /// A zero-width span at a line and column, for front-ends without byte offsets.
    pub fn point(line: usize, col: usize) -> Self {
        Self {
            start_byte: 0,
            end_byte: 0,
            start_line: line,
            start_col: col,
            end_line: line,
            end_col: col,
        }
    }

    /// Position used for ordering violations.
    pub fn position(&self) -> (usize, usize) {
        (self.start_line, self.start_col)
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.start_line, self.start_col)
    }
}

/// Kind of documented entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Function,
    Method,
    Class,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Function => "function",
            EntityKind::Method => "method",
            EntityKind::Class => "class",
        }
    }

    /// Check if this is a callable (function or method).
    pub fn is_callable(&self) -> bool {
        matches!(self, EntityKind::Function | EntityKind::Method)
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How a parameter is declared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArgumentKind {
    Positional,
    PositionalOnly,
    KeywordOnly,
    /// `*args`
    VarArgs,
    /// `**kwargs`
    KwArgs,
}

/// A declared parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Argument {
    pub name: String,
    pub kind: ArgumentKind,
    /// True for the implicit leading `self`/`cls` of a method.
    pub excluded: bool,
    pub span: Span,
}

impl Argument {
    /// Whether the name marks the argument as unused/private.
    pub fn is_private(&self) -> bool {
        self.name.starts_with('_')
    }
}

/// An exception type raised by a function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExceptionRef {
    /// Type name (last dotted segment of the raised expression).
    pub name: String,
    /// Location of the first raise of this type.
    pub span: Span,
}

/// An attribute exposed by a class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeRef {
    pub name: String,
    /// No leading underscore.
    pub public: bool,
    /// Location of the first binding.
    pub span: Span,
}

impl AttributeRef {
    pub fn new(name: impl Into<String>, span: Span) -> Self {
        let name = name.into();
        Self {
            public: is_public_name(&name),
            name,
            span,
        }
    }
}

/// Public means no leading underscore; name-mangled and dunder names are private.
pub fn is_public_name(name: &str) -> bool {
    !name.starts_with('_')
}

/// Enclosing-context flags of a definition.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EntityContext {
    pub inside_class: bool,
    /// `__init__` of a class.
    pub constructor: bool,
    pub is_static: bool,
    pub is_classmethod: bool,
    pub is_async: bool,
    /// Decorated with `property` or `cached_property`.
    pub property_like: bool,
    /// Decorated with `typing.overload`.
    pub overload_like: bool,
}

/// All documentation-relevant facts about one definition.
#[derive(Debug, Clone)]
pub struct CodeEntity {
    pub kind: EntityKind,
    pub name: String,
    /// Dotted path of enclosing classes/functions plus the name.
    pub qualified_name: String,
    /// Span of the `def`/`class` line; decorators are not included.
    pub span: Span,
    /// Base name of the containing file.
    pub file: String,
    /// Dedented docstring text.
    pub docstring: Option<String>,
    /// Span of the docstring literal.
    pub docstring_span: Option<Span>,
    /// Declared parameters in order, including excluded `self`/`cls`.
    pub arguments: Vec<Argument>,
    pub returns_value: bool,
    pub yields_value: bool,
    /// Raised exception types, deduplicated by name, in order of first raise.
    pub raised_exceptions: Vec<ExceptionRef>,
    /// Class attributes, deduplicated by name, in order of first binding.
    pub attributes: Vec<AttributeRef>,
    pub has_bare_raise: bool,
    /// Qualified decorator names (e.g. `pytest.fixture`).
    pub decorators: Vec<String>,
    pub context: EntityContext,
    /// For constructors: whether the enclosing class docstring has an attributes section.
    pub class_documents_attrs: bool,
}

impl CodeEntity {
    /// A blank entity; front-ends and tests fill in the facts.
    pub fn new(kind: EntityKind, name: impl Into<String>, span: Span) -> Self {
        let name = name.into();
        Self {
            kind,
            qualified_name: name.clone(),
            name,
            span,
            file: String::new(),
            docstring: None,
            docstring_span: None,
            arguments: Vec::new(),
            returns_value: false,
            yields_value: false,
            raised_exceptions: Vec::new(),
            attributes: Vec::new(),
            has_bare_raise: false,
            decorators: Vec::new(),
            context: EntityContext::default(),
            class_documents_attrs: false,
        }
    }

    /// Arguments counted for documentation purposes.
    pub fn accountable_arguments(&self) -> impl Iterator<Item = &Argument> {
        self.arguments.iter().filter(|a| !a.excluded)
    }

    pub fn public_attributes(&self) -> impl Iterator<Item = &AttributeRef> {
        self.attributes.iter().filter(|a| a.public)
    }

    pub fn find_exception(&self, name: &str) -> Option<&ExceptionRef> {
        self.raised_exceptions.iter().find(|e| e.name == name)
    }

    pub fn find_attribute(&self, name: &str) -> Option<&AttributeRef> {
        self.attributes.iter().find(|a| a.name == name)
    }

    /// Record a raised exception type, keeping the first location.
    pub fn add_exception(&mut self, name: &str, span: Span) {
        if self.find_exception(name).is_none() {
            self.raised_exceptions.push(ExceptionRef {
                name: name.to_string(),
                span,
            });
        }
    }

    /// Record an attribute binding, keeping the first location.
    pub fn add_attribute(&mut self, name: &str, span: Span) {
        if self.find_attribute(name).is_none() {
            self.attributes.push(AttributeRef::new(name, span));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_name_boundary() {
        assert!(is_public_name("bar"));
        assert!(is_public_name("Bar_"));
        assert!(!is_public_name("_bar"));
        assert!(!is_public_name("__bar"));
        assert!(!is_public_name("__slots__"));
    }

    #[test]
    fn test_accountable_arguments_skip_excluded() {
        let mut entity = CodeEntity::new(EntityKind::Method, "run", Span::point(1, 1));
        entity.arguments = vec![
            Argument {
                name: "self".to_string(),
                kind: ArgumentKind::Positional,
                excluded: true,
                span: Span::point(1, 9),
            },
            Argument {
                name: "bar".to_string(),
                kind: ArgumentKind::Positional,
                excluded: false,
                span: Span::point(1, 15),
            },
        ];

        let names: Vec<_> = entity.accountable_arguments().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["bar"]);
    }

    #[test]
    fn test_exceptions_and_attributes_deduplicate() {
        let mut entity = CodeEntity::new(EntityKind::Class, "Foo", Span::point(1, 1));
        entity.add_exception("BarError", Span::point(3, 5));
        entity.add_exception("BarError", Span::point(7, 5));
        entity.add_attribute("bar", Span::point(2, 5));
        entity.add_attribute("_baz", Span::point(4, 5));
        entity.add_attribute("bar", Span::point(9, 5));

        assert_eq!(entity.raised_exceptions.len(), 1);
        assert_eq!(entity.raised_exceptions[0].span.start_line, 3);
        assert_eq!(entity.attributes.len(), 2);
        assert_eq!(entity.public_attributes().count(), 1);
    }
}
