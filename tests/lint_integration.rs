//! Integration tests for the full lint pipeline.
//!
//! These tests run the runner against the Python fixtures in `testdata/` and
//! against small inline sources.

use std::path::{Path, PathBuf};

use docstrings_complete::cli::collect_files;
use docstrings_complete::config::{Config, ConstructorExemption};
use docstrings_complete::detect::{DetectionResult, Runner, ViolationCode};

fn testdata_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("testdata")
}

fn testdata_config() -> Config {
    Config::parse_file(testdata_path().join("docstrings-complete.yaml"))
        .expect("should parse config")
}

fn lint_fixture(name: &str) -> DetectionResult {
    let runner = Runner::new(&testdata_config()).expect("valid config");
    runner.run(&[testdata_path().join(name)])
}

fn lint(source: &str) -> Vec<(ViolationCode, usize, usize)> {
    lint_with(&Config::default(), "source.py", source)
}

fn lint_with(config: &Config, path: &str, source: &str) -> Vec<(ViolationCode, usize, usize)> {
    let runner = Runner::new(config).expect("valid config");
    runner
        .lint_source(path, source.as_bytes())
        .expect("lint should succeed")
        .violations
        .iter()
        .map(|v| (v.code, v.line, v.column))
        .collect()
}

fn codes(violations: &[(ViolationCode, usize, usize)]) -> Vec<&'static str> {
    violations.iter().map(|(c, _, _)| c.as_str()).collect()
}

#[test]
fn test_clean_fixture_has_no_violations() {
    let result = lint_fixture("clean.py");
    assert_eq!(result.scanned, 1);
    assert!(result.violations.is_empty(), "{:#?}", result.violations);
}

#[test]
fn test_incomplete_fixture() {
    let result = lint_fixture("incomplete.py");
    let found: Vec<_> = result
        .violations
        .iter()
        .map(|v| (v.code.as_str(), v.line, v.column, v.identifier.as_deref()))
        .collect();

    assert_eq!(
        found,
        vec![
            ("DCO010", 4, 1, None),
            ("DCO023", 8, 23, Some("baz")),
            ("DCO024", 13, 5, Some("qux")),
            ("DCO031", 18, 5, None),
            ("DCO050", 26, 5, None),
            ("DCO060", 36, 5, None),
        ]
    );

    let extra = &result.violations[2];
    assert_eq!(extra.entity.name, "missing_args");
    assert!(extra
        .message
        .starts_with("\"qux\" argument should not be described in the docstring"));
    assert!(extra
        .message
        .ends_with("flake8-docstrings-complete#fix-dco024"));
}

#[test]
fn test_test_and_fixture_files_are_skipped() {
    let result = lint_fixture("test_skipped.py");
    let names: Vec<_> = result
        .violations
        .iter()
        .map(|v| (v.entity.name.as_str(), v.code))
        .collect();
    assert_eq!(names, vec![("helper", ViolationCode::DocstringMissing)]);

    let result = lint_fixture("conftest.py");
    assert!(result.violations.is_empty(), "{:#?}", result.violations);
}

#[test]
fn test_noqa_comments_suppress() {
    let result = lint_fixture("suppressed.py");
    assert!(result.violations.is_empty(), "{:#?}", result.violations);

    let suppressed: Vec<_> = result
        .suppressed
        .iter()
        .map(|s| (s.violation.code, s.suppression.line))
        .collect();
    assert_eq!(
        suppressed,
        vec![
            (ViolationCode::DocstringMissing, 1),
            (ViolationCode::ArgMissing, 5)
        ]
    );
}

#[test]
fn test_directory_walk_honours_excluded_paths() {
    let config = testdata_config();
    let matcher = config.excluded_matcher().unwrap();
    let files = collect_files(&testdata_path(), &matcher).unwrap();

    let names: Vec<_> = files
        .iter()
        .filter_map(|p| p.file_name().and_then(|n| n.to_str()))
        .collect();
    assert_eq!(
        names,
        vec![
            "clean.py",
            "conftest.py",
            "incomplete.py",
            "suppressed.py",
            "test_skipped.py"
        ]
    );

    let runner = Runner::new(&config).unwrap().jobs(Some(2));
    let result = runner.run(&files);
    assert_eq!(result.scanned, 5);
    assert_eq!(result.violations.len(), 7);
    assert_eq!(result.suppressed_count(), 2);

    // Sorted by file, then position.
    let files: Vec<_> = result
        .violations
        .iter()
        .map(|v| Path::new(&v.file).file_name().unwrap().to_owned())
        .collect();
    let mut sorted = files.clone();
    sorted.sort();
    assert_eq!(files, sorted);
}

#[test]
fn test_missing_args_section() {
    let source = r#"
def foo(bar):
    """Perform."""
"#;
    assert_eq!(lint(source), vec![(ViolationCode::ArgsSectionMissing, 3, 5)]);
}

#[test]
fn test_unexpected_args_section() {
    let source = r#"
def foo():
    """Perform.

    Args:
        bar: The bar.
    """
"#;
    assert_eq!(codes(&lint(source)), vec!["DCO021"]);
}

#[test]
fn test_documented_argument() {
    let source = r#"
def foo(bar):
    """Perform.

    Args:
        bar: The bar.
    """
"#;
    assert!(lint(source).is_empty());
}

#[test]
fn test_partially_documented_arguments() {
    let source = r#"
def foo(bar, baz):
    """Perform.

    Args:
        bar: The bar.
    """
"#;
    assert_eq!(lint(source), vec![(ViolationCode::ArgMissing, 2, 14)]);
}

#[test]
fn test_class_attributes() {
    let missing = r#"
class Foo:
    """Perform."""

    bar = 1
"#;
    assert_eq!(codes(&lint(missing)), vec!["DCO060"]);

    let documented = r#"
class Foo:
    """Perform.

    Attrs:
        bar: The bar.
    """

    bar = 1
"#;
    assert!(lint(documented).is_empty());
}

#[test]
fn test_duplicate_raises_section() {
    let source = r#"
def foo():
    """Perform.

    Raises:
        BarError: Always.

    Raises:
        BarError: Always.
    """
    raise BarError
"#;
    assert_eq!(codes(&lint(source)), vec!["DCO052"]);
}

#[test]
fn test_duplicate_argument_reported_once() {
    let source = r#"
def foo(bar):
    """Perform.

    Args:
        bar: The bar.
        bar: The bar again.
        bar: And again.
    """
"#;
    assert_eq!(lint(source), vec![(ViolationCode::ArgDuplicate, 7, 5)]);
}

#[test]
fn test_bare_reraise() {
    let source = r#"
def foo():
    """Perform."""
    try:
        pass
    except ValueError:
        raise
"#;
    assert_eq!(codes(&lint(source)), vec!["DCO050", "DCO055"]);

    let documented = r#"
def foo():
    """Perform.

    Raises:
        ValueError: When it fails.
    """
    try:
        pass
    except ValueError:
        raise
"#;
    assert!(lint(documented).is_empty());
}

#[test]
fn test_generators_and_returns() {
    let source = r#"
def foo():
    """Perform."""
    yield 1


def bar():
    """Perform."""
    return None


def baz():
    """Perform."""
    return 1
"#;
    assert_eq!(codes(&lint(source)), vec!["DCO040", "DCO030"]);
}

#[test]
fn test_nested_function_owns_its_facts() {
    let source = r#"
def outer():
    """Perform."""

    def inner():
        """Perform.

        Returns:
            One.
        """
        return 1

    return inner
"#;
    let found = lint(source);
    assert_eq!(found, vec![(ViolationCode::ReturnsSectionMissing, 3, 5)]);
}

#[test]
fn test_constructor_exemption_modes() {
    let source = r#"
class Foo:
    """Perform.

    Attrs:
        bar: The bar.
    """

    def __init__(self, bar):
        self.bar = bar
"#;
    assert!(lint(source).is_empty());

    let class_attrs = Config {
        constructor_exemption: ConstructorExemption::ClassAttrs,
        ..Default::default()
    };
    assert!(lint_with(&class_attrs, "source.py", source).is_empty());

    let never = Config {
        constructor_exemption: ConstructorExemption::Never,
        ..Default::default()
    };
    assert_eq!(
        lint_with(&never, "source.py", source),
        vec![(ViolationCode::DocstringMissing, 9, 5)]
    );
}

#[test]
fn test_private_args_optional() {
    let source = r#"
def foo(bar, _baz):
    """Perform.

    Args:
        bar: The bar.
    """
"#;
    assert_eq!(codes(&lint(source)), vec!["DCO023"]);

    let config = Config {
        private_args_optional: true,
        ..Default::default()
    };
    assert!(lint_with(&config, "source.py", source).is_empty());
}

#[test]
fn test_overloads_and_properties() {
    let source = r#"
from typing import overload


class Foo:
    """Perform.

    Attrs:
        value: The value.
    """

    @property
    def value(self):
        """The value."""
        return 1

    @overload
    def get(self, key: int) -> int: ...

    def get(self, key):
        """Get a value.

        Args:
            key: The key.

        Returns:
            The value.
        """
        return key
"#;
    assert!(lint(source).is_empty(), "{:?}", lint(source));
}

#[test]
fn test_syntax_errors_do_not_abort() {
    let source = r#"
def foo(bar):
    """Perform."""


print(1 +)
"#;
    let found = lint(source);
    assert!(found.contains(&(ViolationCode::ArgsSectionMissing, 3, 5)));
}

#[test]
fn test_noqa_after_multiline_docstring() {
    let runner = Runner::new(&Config::default()).expect("valid config");
    let source = "def foo():\n    \"\"\"Perform.\n\n    Args:\n        bar: x\n    \"\"\"  # noqa: DCO021\n";
    let result = runner.lint_source("source.py", source.as_bytes()).unwrap();
    assert!(result.violations.is_empty(), "{:#?}", result.violations);
    let suppressed: Vec<_> = result
        .suppressed
        .iter()
        .map(|s| (s.violation.code, s.violation.line, s.suppression.first_line))
        .collect();
    assert_eq!(suppressed, vec![(ViolationCode::ArgsSectionUnexpected, 2, 2)]);

    // Items inside the docstring are covered too; other codes stay active.
    let source = "def foo(bar):\n    \"\"\"Perform.\n\n    Args:\n        bar: x\n        qux: y\n    \"\"\"  # noqa: DCO024\n    return 1\n";
    let result = runner.lint_source("source.py", source.as_bytes()).unwrap();
    let active: Vec<_> = result.violations.iter().map(|v| v.code).collect();
    assert_eq!(active, vec![ViolationCode::ReturnsSectionMissing]);
    assert_eq!(result.suppressed[0].violation.code, ViolationCode::ArgExtra);
    assert_eq!(result.suppressed[0].violation.line, 6);
}

#[test]
fn test_classmethod_bindings_are_not_attributes() {
    let source = r#"
class Foo:
    """Foo."""

    @classmethod
    def build(cls):
        """Build."""
        cls.registry = {}
"#;
    assert!(lint(source).is_empty(), "{:?}", lint(source));
}

#[test]
fn test_escaped_newlines_in_docstring() {
    let source = "def foo(bar):\n    \"\"\"Perform.\\n\\nArgs:\\n    bar: The bar.\"\"\"\n";
    assert!(lint(source).is_empty(), "{:?}", lint(source));
}
