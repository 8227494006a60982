//! Python front-end using tree-sitter.
//!
//! Lowers a tree-sitter-python tree into the parser-neutral syntax model.
//! Statements nested in compound statements are flattened into the enclosing
//! scope; function and class definitions open a new scope; lambdas and
//! ERROR nodes are not descended into.

use std::path::Path;

use streaming_iterator::StreamingIterator;
use tree_sitter::{Language, Node, Parser, Query, QueryCursor};

use crate::analysis::syntax::{
    Assign, AssignKind, ClassDef, Decorator, Docstring, FunctionDef, Module, Param, Raise,
    RaiseKind, Return, ReturnValue, Stmt, Target, Yield, YieldKind,
};
use crate::analysis::{ArgumentKind, Comment, LanguageAnalyzer, ParsedFile, Span};

/// Tree-sitter query for extracting comments and the strings they may trail.
const COMMENT_QUERY: &str = r#"
(comment) @comment
(string) @string
"#;

pub struct PythonAnalyzer {
    language: Language,
}

impl PythonAnalyzer {
    pub fn new() -> Self {
        Self {
            language: tree_sitter_python::LANGUAGE.into(),
        }
    }

    fn create_parser(&self) -> anyhow::Result<Parser> {
        let mut parser = Parser::new();
        parser.set_language(&self.language)?;
        Ok(parser)
    }
}

impl Default for PythonAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl LanguageAnalyzer for PythonAnalyzer {
    fn language_id(&self) -> &'static str {
        "python"
    }

    fn file_extensions(&self) -> &'static [&'static str] {
        &["py", "pyi"]
    }

    fn parse(&self, path: &Path, source: &[u8]) -> anyhow::Result<ParsedFile> {
        let mut parser = self.create_parser()?;
        let tree = parser
            .parse(source, None)
            .ok_or_else(|| anyhow::anyhow!("failed to parse Python source: {}", path.display()))?;

        Ok(ParsedFile {
            tree,
            source: source.to_vec(),
            path: path.to_string_lossy().to_string(),
        })
    }

    fn extract_module(&self, parsed: &ParsedFile) -> anyhow::Result<Module> {
        if parsed.has_errors() {
            tracing::debug!(path = %parsed.path, "syntax errors, analysing recovered tree");
        }

        let lowering = Lowering { parsed };
        Ok(Module {
            body: lowering.scope_body(parsed.tree.root_node()),
        })
    }

    fn extract_comments(&self, parsed: &ParsedFile) -> anyhow::Result<Vec<Comment>> {
        let query = Query::new(&self.language, COMMENT_QUERY)?;
        let mut cursor = QueryCursor::new();
        let mut matches = cursor.matches(&query, parsed.tree.root_node(), &parsed.source[..]);

        let mut comments = Vec::new();
        // (first, last) lines of strings spanning more than one line.
        let mut strings: Vec<(usize, usize)> = Vec::new();
        while let Some(m) = matches.next() {
            for capture in m.captures {
                let node = capture.node;
                let first = node.start_position().row + 1;
                let last = node.end_position().row + 1;
                match query.capture_names()[capture.index as usize] {
                    "comment" => comments.push(Comment {
                        line: first,
                        first_line: first,
                        text: parsed.node_text(node).to_string(),
                    }),
                    _ if last > first => strings.push((first, last)),
                    _ => {}
                }
            }
        }

        for comment in &mut comments {
            if let Some(start) = strings
                .iter()
                .filter(|(_, last)| *last == comment.line)
                .map(|(first, _)| *first)
                .min()
            {
                comment.first_line = start;
            }
        }

        comments.sort_by_key(|c| c.line);
        Ok(comments)
    }
}

/// Translation of one parsed file into the syntax model.
struct Lowering<'a> {
    parsed: &'a ParsedFile,
}

impl<'a> Lowering<'a> {
    fn text(&self, node: Node<'a>) -> &'a str {
        self.parsed.node_text(node)
    }

    /// Named children that are not comments.
    fn children(node: Node<'a>) -> Vec<Node<'a>> {
        let mut cursor = node.walk();
        node.named_children(&mut cursor)
            .filter(|c| c.kind() != "comment")
            .collect()
    }

    /// Whether `node` has an anonymous child token of the given kind.
    fn has_token(node: Node<'a>, token: &str) -> bool {
        let mut cursor = node.walk();
        let found = node
            .children(&mut cursor)
            .any(|c| !c.is_named() && c.kind() == token);
        found
    }

    /// Flattened statements of a module or block.
    fn scope_body(&self, node: Node<'a>) -> Vec<Stmt> {
        let mut body = Vec::new();
        for child in Self::children(node) {
            self.collect(child, &mut body);
        }
        body
    }

    fn descend(&self, node: Node<'a>, out: &mut Vec<Stmt>) {
        for child in Self::children(node) {
            self.collect(child, out);
        }
    }

    fn collect(&self, node: Node<'a>, out: &mut Vec<Stmt>) {
        match node.kind() {
            "function_definition" => {
                if let Some(def) = self.function_def(node, Vec::new()) {
                    out.push(Stmt::FunctionDef(def));
                }
            }
            "class_definition" => {
                if let Some(def) = self.class_def(node, Vec::new()) {
                    out.push(Stmt::ClassDef(def));
                }
            }
            "decorated_definition" => self.decorated(node, out),
            "lambda" | "ERROR" => {}
            "return_statement" => {
                out.push(Stmt::Return(Return {
                    value: self.return_value(node),
                    span: Span::from_node(node),
                }));
                self.descend(node, out);
            }
            "yield" => {
                out.push(Stmt::Yield(Yield {
                    kind: Self::yield_kind(node),
                    span: Span::from_node(node),
                }));
                self.descend(node, out);
            }
            "raise_statement" => {
                out.push(Stmt::Raise(self.raise(node)));
                self.descend(node, out);
            }
            "assignment" | "augmented_assignment" => {
                let kind = if node.kind() == "augmented_assignment" {
                    AssignKind::Augmented
                } else if node.child_by_field_name("type").is_some() {
                    AssignKind::Annotated
                } else {
                    AssignKind::Plain
                };

                let mut targets = Vec::new();
                if let Some(left) = node.child_by_field_name("left") {
                    self.flatten_target(left, &mut targets);
                }
                out.push(Stmt::Assign(Assign {
                    targets,
                    kind,
                    span: Span::from_node(node),
                }));

                // Chained assignments are nested on the right.
                if let Some(right) = node.child_by_field_name("right") {
                    self.collect(right, out);
                }
            }
            _ => self.descend(node, out),
        }
    }

    fn return_value(&self, node: Node<'a>) -> ReturnValue {
        match Self::children(node).first() {
            None => ReturnValue::Absent,
            Some(value) if value.kind() == "none" => ReturnValue::NoneLiteral,
            Some(_) => ReturnValue::Value,
        }
    }

    fn yield_kind(node: Node<'a>) -> YieldKind {
        if Self::has_token(node, "from") {
            YieldKind::Delegated
        } else if Self::children(node).is_empty() {
            YieldKind::Bare
        } else {
            YieldKind::Value
        }
    }

    fn raise(&self, node: Node<'a>) -> Raise {
        let cause = node.child_by_field_name("cause");
        let exception = Self::children(node)
            .into_iter()
            .find(|c| Some(*c) != cause);

        match exception {
            None => Raise {
                kind: RaiseKind::Bare,
                span: Span::from_node(node),
            },
            Some(expr) => match self.exception_name(expr) {
                Some(name) => Raise {
                    kind: RaiseKind::Named(name.to_string()),
                    span: Span::from_node(expr),
                },
                None => Raise {
                    kind: RaiseKind::Unresolved,
                    span: Span::from_node(node),
                },
            },
        }
    }

    /// Name of a raised exception: `Name`, `mod.Name`, or either one called.
    fn exception_name(&self, expr: Node<'a>) -> Option<&'a str> {
        let expr = if expr.kind() == "call" {
            expr.child_by_field_name("function")?
        } else {
            expr
        };

        match expr.kind() {
            "identifier" => Some(self.text(expr)),
            "attribute" => expr.child_by_field_name("attribute").map(|a| self.text(a)),
            _ => None,
        }
    }

    fn flatten_target(&self, node: Node<'a>, targets: &mut Vec<Target>) {
        match node.kind() {
            "identifier" => targets.push(Target::Name {
                name: self.text(node).to_string(),
                span: Span::from_node(node),
            }),
            "attribute" => {
                let object = node.child_by_field_name("object");
                let attr = node.child_by_field_name("attribute");
                match (object, attr) {
                    (Some(object), Some(attr)) if object.kind() == "identifier" => {
                        targets.push(Target::Attribute {
                            object: self.text(object).to_string(),
                            attr: self.text(attr).to_string(),
                            span: Span::from_node(node),
                        })
                    }
                    _ => targets.push(Target::Other),
                }
            }
            "pattern_list" | "tuple_pattern" | "list_pattern" | "list_splat_pattern"
            | "tuple" | "list" | "list_splat" | "parenthesized_expression" => {
                for child in Self::children(node) {
                    self.flatten_target(child, targets);
                }
            }
            _ => targets.push(Target::Other),
        }
    }

    fn decorated(&self, node: Node<'a>, out: &mut Vec<Stmt>) {
        let decorators: Vec<Decorator> = Self::children(node)
            .into_iter()
            .filter(|c| c.kind() == "decorator")
            .filter_map(|d| {
                let expr = Self::children(d).into_iter().next()?;
                Some(Decorator {
                    name: self.decorator_name(expr),
                    span: Span::from_node(d),
                })
            })
            .collect();

        let Some(definition) = node.child_by_field_name("definition") else {
            return;
        };
        match definition.kind() {
            "function_definition" => {
                if let Some(def) = self.function_def(definition, decorators) {
                    out.push(Stmt::FunctionDef(def));
                }
            }
            "class_definition" => {
                if let Some(def) = self.class_def(definition, decorators) {
                    out.push(Stmt::ClassDef(def));
                }
            }
            _ => {}
        }
    }

    /// Qualified decorator name with call arguments stripped.
    fn decorator_name(&self, expr: Node<'a>) -> String {
        match expr.kind() {
            "call" => match expr.child_by_field_name("function") {
                Some(function) => self.decorator_name(function),
                None => self.text(expr).trim().to_string(),
            },
            _ => self
                .text(expr)
                .chars()
                .filter(|c| !c.is_whitespace())
                .collect(),
        }
    }

    fn function_def(&self, node: Node<'a>, decorators: Vec<Decorator>) -> Option<FunctionDef> {
        let name = node.child_by_field_name("name")?;
        let block = node.child_by_field_name("body")?;
        let params = node
            .child_by_field_name("parameters")
            .map(|p| self.params(p))
            .unwrap_or_default();

        Some(FunctionDef {
            name: self.text(name).to_string(),
            span: Span::from_node(node),
            is_async: Self::has_token(node, "async"),
            decorators,
            params,
            docstring: self.docstring(block),
            body: self.scope_body(block),
        })
    }

    fn class_def(&self, node: Node<'a>, decorators: Vec<Decorator>) -> Option<ClassDef> {
        let name = node.child_by_field_name("name")?;
        let block = node.child_by_field_name("body")?;

        Some(ClassDef {
            name: self.text(name).to_string(),
            span: Span::from_node(node),
            decorators,
            docstring: self.docstring(block),
            body: self.scope_body(block),
        })
    }

    fn params(&self, node: Node<'a>) -> Vec<Param> {
        let mut params: Vec<Param> = Vec::new();
        let mut keyword_only = false;

        for child in Self::children(node) {
            let target = match child.kind() {
                "keyword_separator" => {
                    keyword_only = true;
                    continue;
                }
                "positional_separator" => {
                    for param in params.iter_mut() {
                        if param.kind == ArgumentKind::Positional {
                            param.kind = ArgumentKind::PositionalOnly;
                        }
                    }
                    continue;
                }
                "default_parameter" | "typed_default_parameter" => {
                    match child.child_by_field_name("name") {
                        Some(name) => name,
                        None => continue,
                    }
                }
                // `name: type`, `*args: type` and `**kwargs: type`
                "typed_parameter" => match Self::children(child).into_iter().next() {
                    Some(inner) => inner,
                    None => continue,
                },
                _ => child,
            };

            let (name_node, kind) = match target.kind() {
                "identifier" => (Some(target), None),
                "list_splat_pattern" => (
                    Self::first_identifier(target),
                    Some(ArgumentKind::VarArgs),
                ),
                "dictionary_splat_pattern" => {
                    (Self::first_identifier(target), Some(ArgumentKind::KwArgs))
                }
                // Tuple parameters and other shapes carry no single name.
                _ => (None, None),
            };
            let Some(name_node) = name_node else {
                continue;
            };

            let kind = kind.unwrap_or(if keyword_only {
                ArgumentKind::KeywordOnly
            } else {
                ArgumentKind::Positional
            });
            if kind == ArgumentKind::VarArgs {
                keyword_only = true;
            }

            params.push(Param {
                name: self.text(name_node).to_string(),
                kind,
                span: Span::from_node(name_node),
            });
        }

        params
    }

    fn first_identifier(node: Node<'a>) -> Option<Node<'a>> {
        Self::children(node)
            .into_iter()
            .find(|c| c.kind() == "identifier")
    }

    /// The docstring of a block: a string literal as its first statement.
    fn docstring(&self, block: Node<'a>) -> Option<Docstring> {
        let first = Self::children(block).into_iter().next()?;
        if first.kind() != "expression_statement" {
            return None;
        }

        let parts = Self::children(first);
        let [literal] = parts.as_slice() else {
            return None;
        };

        let raw = match literal.kind() {
            "string" => self.string_content(*literal)?,
            "concatenated_string" => {
                let mut joined = String::new();
                for part in Self::children(*literal) {
                    joined.push_str(&self.string_content(part)?);
                }
                joined
            }
            _ => return None,
        };

        Some(Docstring {
            text: dedent(&raw),
            span: Span::from_node(*literal),
        })
    }

    /// Contents of a plain or raw string literal without prefix and quotes.
    ///
    /// Byte strings and f-strings are not docstrings.
    fn string_content(&self, node: Node<'a>) -> Option<String> {
        if node.kind() != "string" {
            return None;
        }

        let text = self.text(node);
        let quote_start = text.find(['"', '\''])?;
        let prefix = text[..quote_start].to_ascii_lowercase();
        if prefix.contains('f') || prefix.contains('b') {
            return None;
        }

        let quoted = &text[quote_start..];
        let quote_len = if quoted.starts_with("\"\"\"") || quoted.starts_with("'''") {
            3
        } else {
            1
        };
        if quoted.len() < quote_len * 2 {
            return None;
        }

        let body = &quoted[quote_len..quoted.len() - quote_len];
        if prefix.contains('r') {
            Some(body.to_string())
        } else {
            Some(unescape(body))
        }
    }
}

/// Decode the simple escape sequences of a non-raw string literal.
///
/// Numeric and named escapes are kept verbatim; a backslash before a newline
/// joins the lines.
fn unescape(body: &str) -> String {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('\\') => out.push('\\'),
            Some('\'') => out.push('\''),
            Some('"') => out.push('"'),
            Some('\n') => {}
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

/// Remove common indentation while keeping every line.
///
/// The first line loses its leading whitespace; the remaining lines lose the
/// smallest indentation found among their non-blank lines.
fn dedent(text: &str) -> String {
    fn indent_of(line: &str) -> usize {
        line.bytes().take_while(|b| *b == b' ' || *b == b'\t').count()
    }

    let indent = text
        .lines()
        .skip(1)
        .filter(|l| !l.trim().is_empty())
        .map(indent_of)
        .min()
        .unwrap_or(0);

    text.lines()
        .enumerate()
        .map(|(index, line)| {
            if index == 0 {
                line.trim_start()
            } else {
                &line[indent_of(line).min(indent)..]
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lower(source: &str) -> Module {
        let analyzer = PythonAnalyzer::new();
        let parsed = analyzer
            .parse(Path::new("test.py"), source.as_bytes())
            .unwrap();
        analyzer.extract_module(&parsed).unwrap()
    }

    fn only_function(module: &Module) -> &FunctionDef {
        match module.body.as_slice() {
            [Stmt::FunctionDef(def)] => def,
            other => panic!("expected one function, got {:?}", other),
        }
    }

    fn only_class(module: &Module) -> &ClassDef {
        match module.body.as_slice() {
            [Stmt::ClassDef(def)] => def,
            other => panic!("expected one class, got {:?}", other),
        }
    }

    #[test]
    fn test_parameter_kinds() {
        let module = lower("def f(a, b=1, /, c: int = 2, *args, d, e: str, **kwargs):\n    pass\n");
        let def = only_function(&module);

        let params: Vec<_> = def.params.iter().map(|p| (p.name.as_str(), p.kind)).collect();
        assert_eq!(
            params,
            vec![
                ("a", ArgumentKind::PositionalOnly),
                ("b", ArgumentKind::PositionalOnly),
                ("c", ArgumentKind::Positional),
                ("args", ArgumentKind::VarArgs),
                ("d", ArgumentKind::KeywordOnly),
                ("e", ArgumentKind::KeywordOnly),
                ("kwargs", ArgumentKind::KwArgs),
            ]
        );
    }

    #[test]
    fn test_keyword_separator_and_typed_splats() {
        let module = lower("def f(a, *, b, **kw: int):\n    pass\n\ndef g(*items: str):\n    pass\n");

        let Stmt::FunctionDef(f) = &module.body[0] else {
            panic!("expected function");
        };
        let kinds: Vec<_> = f.params.iter().map(|p| p.kind).collect();
        assert_eq!(
            kinds,
            vec![
                ArgumentKind::Positional,
                ArgumentKind::KeywordOnly,
                ArgumentKind::KwArgs
            ]
        );

        let Stmt::FunctionDef(g) = &module.body[1] else {
            panic!("expected function");
        };
        assert_eq!(g.params[0].name, "items");
        assert_eq!(g.params[0].kind, ArgumentKind::VarArgs);
    }

    #[test]
    fn test_docstring_dedent_keeps_lines() {
        let source = "def f(bar):\n    \"\"\"Perform.\n\n    Args:\n        bar: The bar.\n    \"\"\"\n";
        let module = lower(source);
        let doc = only_function(&module).docstring.as_ref().unwrap();

        assert_eq!(doc.text, "Perform.\n\nArgs:\n    bar: The bar.\n");
        assert_eq!(doc.span.start_line, 2);
    }

    #[test]
    fn test_docstring_prefixes() {
        let raw = lower("def f():\n    r'''Raw.'''\n");
        assert_eq!(only_function(&raw).docstring.as_ref().unwrap().text, "Raw.");

        let fstring = lower("def f():\n    f\"\"\"Not {1}.\"\"\"\n");
        assert!(only_function(&fstring).docstring.is_none());

        let bytes = lower("def f():\n    b'Bytes.'\n");
        assert!(only_function(&bytes).docstring.is_none());

        let late = lower("def f():\n    x = 1\n    \"\"\"Too late.\"\"\"\n");
        assert!(only_function(&late).docstring.is_none());
    }

    #[test]
    fn test_returns_and_yields() {
        let module = lower(
            "def f():\n    if x:\n        return\n    elif y:\n        return None\n    for a in b:\n        yield\n        yield 1\n        value = yield from g()\n    return 3\n",
        );
        let def = only_function(&module);

        let returns: Vec<_> = def
            .body
            .iter()
            .filter_map(|s| match s {
                Stmt::Return(r) => Some(r.value),
                _ => None,
            })
            .collect();
        assert_eq!(
            returns,
            vec![ReturnValue::Absent, ReturnValue::NoneLiteral, ReturnValue::Value]
        );

        let yields: Vec<_> = def
            .body
            .iter()
            .filter_map(|s| match s {
                Stmt::Yield(y) => Some(y.kind),
                _ => None,
            })
            .collect();
        assert_eq!(
            yields,
            vec![YieldKind::Bare, YieldKind::Value, YieldKind::Delegated]
        );
    }

    #[test]
    fn test_raise_kinds() {
        let module = lower(
            "def f():\n    try:\n        raise BarError\n    except Exception:\n        raise\n    raise errors.BazError('x') from None\n    raise (lambda: Exception)()\n",
        );
        let def = only_function(&module);

        let raises: Vec<_> = def
            .body
            .iter()
            .filter_map(|s| match s {
                Stmt::Raise(r) => Some(r.kind.clone()),
                _ => None,
            })
            .collect();
        assert_eq!(
            raises,
            vec![
                RaiseKind::Named("BarError".to_string()),
                RaiseKind::Bare,
                RaiseKind::Named("BazError".to_string()),
                RaiseKind::Unresolved,
            ]
        );
    }

    #[test]
    fn test_nested_scopes_are_not_flattened() {
        let module = lower("def outer():\n    def inner():\n        return 1\n    f = lambda: (yield)\n");
        let outer = only_function(&module);

        assert!(outer.body.iter().all(|s| !matches!(s, Stmt::Return(_) | Stmt::Yield(_))));
        let inner = outer
            .body
            .iter()
            .find_map(|s| match s {
                Stmt::FunctionDef(def) => Some(def),
                _ => None,
            })
            .unwrap();
        assert_eq!(inner.name, "inner");
        assert!(matches!(inner.body.as_slice(), [Stmt::Return(_)]));
    }

    #[test]
    fn test_assignment_targets() {
        let module = lower(
            "class Foo:\n    a = b = 1\n    c, (d, *e) = f()\n    g: int\n    h += 1\n    items[0] = 2\n\n    def __init__(self):\n        self.bar = 1\n        self.x.y = 2\n",
        );
        let class = only_class(&module);

        let mut names = Vec::new();
        let mut kinds = Vec::new();
        for stmt in &class.body {
            if let Stmt::Assign(assign) = stmt {
                kinds.push(assign.kind);
                for target in &assign.targets {
                    if let Target::Name { name, .. } = target {
                        names.push(name.clone());
                    }
                }
            }
        }
        assert_eq!(names, vec!["a", "b", "c", "d", "e", "g", "h"]);
        assert!(kinds.contains(&AssignKind::Annotated));
        assert!(kinds.contains(&AssignKind::Augmented));

        let Some(Stmt::FunctionDef(init)) = class.body.last() else {
            panic!("expected __init__ last");
        };
        let Stmt::Assign(first) = &init.body[0] else {
            panic!("expected assignment");
        };
        assert!(matches!(
            &first.targets[0],
            Target::Attribute { object, attr, .. } if object == "self" && attr == "bar"
        ));
        let Stmt::Assign(second) = &init.body[1] else {
            panic!("expected assignment");
        };
        assert!(matches!(second.targets[0], Target::Other));
    }

    #[test]
    fn test_decorators_and_async() {
        let module = lower(
            "@pytest.fixture(scope='module')\n@property\nasync def f():\n    pass\n",
        );
        let def = only_function(&module);

        let names: Vec<_> = def.decorators.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["pytest.fixture", "property"]);
        assert_eq!(def.decorators[0].base_name(), "fixture");
        assert!(def.is_async);
        assert_eq!(def.span.start_line, 3);
    }

    #[test]
    fn test_class_docstring_and_decorator() {
        let module = lower("@dataclass\nclass Foo:\n    '''Foo.'''\n    bar: int = 0\n");
        let class = only_class(&module);

        assert_eq!(class.name, "Foo");
        assert_eq!(class.decorators[0].name, "dataclass");
        assert_eq!(class.docstring.as_ref().unwrap().text, "Foo.");
    }

    #[test]
    fn test_comments() {
        let analyzer = PythonAnalyzer::new();
        let source = "x = 1  # noqa\n# standalone\ndef f():  # noqa: DCO010\n    pass\n";
        let parsed = analyzer.parse(Path::new("test.py"), source.as_bytes()).unwrap();
        let comments = analyzer.extract_comments(&parsed).unwrap();

        let lines: Vec<_> = comments.iter().map(|c| c.line).collect();
        assert_eq!(lines, vec![1, 2, 3]);
        assert_eq!(comments[2].text, "# noqa: DCO010");
        assert!(comments.iter().all(|c| c.first_line == c.line));
    }

    #[test]
    fn test_comment_after_multiline_string_covers_it() {
        let analyzer = PythonAnalyzer::new();
        let source = "def f():\n    \"\"\"Summary.\n\n    Args:\n        x: y\n    \"\"\"  # noqa\n    return 1  # noqa\n";
        let parsed = analyzer.parse(Path::new("test.py"), source.as_bytes()).unwrap();
        let comments = analyzer.extract_comments(&parsed).unwrap();

        let ranges: Vec<_> = comments.iter().map(|c| (c.first_line, c.line)).collect();
        assert_eq!(ranges, vec![(2, 6), (7, 7)]);
    }

    #[test]
    fn test_recovers_from_syntax_errors() {
        let module = lower("def ok():\n    return 1\n\ndef broken(:\n    pass\n");
        assert!(module
            .body
            .iter()
            .any(|s| matches!(s, Stmt::FunctionDef(def) if def.name == "ok")));
    }

    #[test]
    fn test_escaped_docstring_layout() {
        let module = lower("def f(bar):\n    \"\"\"Perform.\\n\\nArgs:\\n    bar: x \\\"quoted\\\"\"\"\"\n");
        let def = only_function(&module);
        assert_eq!(
            def.docstring.as_ref().unwrap().text,
            "Perform.\n\nArgs:\n    bar: x \"quoted\""
        );

        let module = lower("def f():\n    r\"\"\"Keep \\n and \\d.\"\"\"\n");
        assert_eq!(only_function(&module).docstring.as_ref().unwrap().text, "Keep \\n and \\d.");
    }

    #[test]
    fn test_unescape() {
        assert_eq!(unescape(r"a\nb\tc"), "a\nb\tc");
        assert_eq!(unescape(r#"\\ \' \""#), "\\ ' \"");
        assert_eq!(unescape(r"\d \x41"), r"\d \x41");
        assert_eq!(unescape("one \\\ntwo"), "one two");
    }

    #[test]
    fn test_dedent() {
        assert_eq!(dedent("Summary.\n    a\n      b\n"), "Summary.\na\n  b");
        assert_eq!(dedent("  One line.  "), "One line.  ");
        assert_eq!(dedent(""), "");
    }
}
