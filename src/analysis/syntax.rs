//! Parser-neutral syntax model.
//!
//! Front-ends translate their native trees into this model and the fact
//! extractor only ever sees these types. Bodies are flattened: statements
//! found inside compound statements (`if`, `for`, `try`, `with`, ...) are
//! listed in source order in the enclosing scope's body. Nested function and
//! class definitions appear as their own variants and are never flattened
//! into the enclosing scope.

use super::{ArgumentKind, Span};

/// One parsed source file.
#[derive(Debug, Clone, Default)]
pub struct Module {
    pub body: Vec<Stmt>,
}

/// A statement relevant to documentation checks.
#[derive(Debug, Clone)]
pub enum Stmt {
    FunctionDef(FunctionDef),
    ClassDef(ClassDef),
    Assign(Assign),
    Return(Return),
    Yield(Yield),
    Raise(Raise),
}

/// Docstring literal with its text already dedented.
///
/// Dedenting must keep line structure intact so that line `n` of the text is
/// line `span.start_line + n - 1` of the source.
#[derive(Debug, Clone)]
pub struct Docstring {
    pub text: String,
    pub span: Span,
}

/// A decorator resolved to its qualified name, call parentheses stripped.
///
/// `@functools.cached_property` is `functools.cached_property`,
/// `@pytest.fixture(scope="module")` is `pytest.fixture`.
#[derive(Debug, Clone)]
pub struct Decorator {
    pub name: String,
    pub span: Span,
}

impl Decorator {
    /// Last dotted segment of the name.
    pub fn base_name(&self) -> &str {
        self.name.rsplit('.').next().unwrap_or(&self.name)
    }
}

#[derive(Debug, Clone)]
pub struct Param {
    pub name: String,
    pub kind: ArgumentKind,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct FunctionDef {
    pub name: String,
    /// Span of the `def` statement itself; decorators are not included.
    pub span: Span,
    pub is_async: bool,
    pub decorators: Vec<Decorator>,
    pub params: Vec<Param>,
    pub docstring: Option<Docstring>,
    pub body: Vec<Stmt>,
}

#[derive(Debug, Clone)]
pub struct ClassDef {
    pub name: String,
    pub span: Span,
    pub decorators: Vec<Decorator>,
    pub docstring: Option<Docstring>,
    pub body: Vec<Stmt>,
}

/// Target of an assignment.
#[derive(Debug, Clone)]
pub enum Target {
    /// `name = ...`
    Name { name: String, span: Span },
    /// `object.attr = ...` where `object` is a plain name.
    Attribute {
        object: String,
        attr: String,
        span: Span,
    },
    /// Subscripts, nested attributes and other shapes.
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignKind {
    /// `a = b = value`, `a, b = value`
    Plain,
    /// `a: int = value`, `a: int`
    Annotated,
    /// `a += value`
    Augmented,
}

#[derive(Debug, Clone)]
pub struct Assign {
    /// Every bound target; tuple and list unpacking is flattened.
    pub targets: Vec<Target>,
    pub kind: AssignKind,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReturnValue {
    /// `return`
    Absent,
    /// `return None`
    NoneLiteral,
    /// `return <expr>`
    Value,
}

#[derive(Debug, Clone)]
pub struct Return {
    pub value: ReturnValue,
    pub span: Span,
}

impl Return {
    pub fn has_value(&self) -> bool {
        self.value == ReturnValue::Value
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum YieldKind {
    /// `yield`
    Bare,
    /// `yield <expr>`
    Value,
    /// `yield from <expr>`
    Delegated,
}

#[derive(Debug, Clone)]
pub struct Yield {
    pub kind: YieldKind,
    pub span: Span,
}

impl Yield {
    pub fn has_value(&self) -> bool {
        !matches!(self.kind, YieldKind::Bare)
    }
}

/// What a raise statement raises.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RaiseKind {
    /// `raise` re-raising the active exception.
    Bare,
    /// `raise Name`, `raise mod.Name(...)`; holds the last dotted segment.
    Named(String),
    /// An exception expression whose type cannot be named statically.
    Unresolved,
}

#[derive(Debug, Clone)]
pub struct Raise {
    pub kind: RaiseKind,
    /// Span of the exception name when named, otherwise of the statement.
    pub span: Span,
}
