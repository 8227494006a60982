//! Core types for lint results.

use serde::{Deserialize, Serialize};

use crate::analysis::EntityKind;
use crate::docstring::SectionKind;

/// What a violation is about. Ordering follows report order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dimension {
    Docstring,
    Args,
    Returns,
    Yields,
    Raises,
    Attrs,
}

impl From<SectionKind> for Dimension {
    fn from(kind: SectionKind) -> Self {
        match kind {
            SectionKind::Args => Dimension::Args,
            SectionKind::Returns => Dimension::Returns,
            SectionKind::Yields => Dimension::Yields,
            SectionKind::Raises => Dimension::Raises,
            SectionKind::Attrs => Dimension::Attrs,
        }
    }
}

/// Kind of mismatch. Ordering is the tie-break within one position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Finding {
    MissingDocstring,
    MissingSection,
    UnexpectedSection,
    DuplicateSection,
    MissingItem,
    ExtraItem,
    DuplicateItem,
    EmptyRaisesForBareRaise,
}

/// Stable violation codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ViolationCode {
    #[serde(rename = "DCO010")]
    DocstringMissing,
    #[serde(rename = "DCO020")]
    ArgsSectionMissing,
    #[serde(rename = "DCO021")]
    ArgsSectionUnexpected,
    #[serde(rename = "DCO022")]
    ArgsSectionDuplicate,
    #[serde(rename = "DCO023")]
    ArgMissing,
    #[serde(rename = "DCO024")]
    ArgExtra,
    #[serde(rename = "DCO025")]
    ArgDuplicate,
    #[serde(rename = "DCO030")]
    ReturnsSectionMissing,
    #[serde(rename = "DCO031")]
    ReturnsSectionUnexpected,
    #[serde(rename = "DCO032")]
    ReturnsSectionDuplicate,
    #[serde(rename = "DCO040")]
    YieldsSectionMissing,
    #[serde(rename = "DCO041")]
    YieldsSectionUnexpected,
    #[serde(rename = "DCO042")]
    YieldsSectionDuplicate,
    #[serde(rename = "DCO050")]
    RaisesSectionMissing,
    #[serde(rename = "DCO051")]
    RaisesSectionUnexpected,
    #[serde(rename = "DCO052")]
    RaisesSectionDuplicate,
    #[serde(rename = "DCO053")]
    ExceptionMissing,
    #[serde(rename = "DCO054")]
    ExceptionExtra,
    #[serde(rename = "DCO055")]
    RaisesEmptyForBareRaise,
    #[serde(rename = "DCO056")]
    ExceptionDuplicate,
    #[serde(rename = "DCO060")]
    AttrsSectionMissing,
    #[serde(rename = "DCO061")]
    AttrsSectionUnexpected,
    #[serde(rename = "DCO062")]
    AttrsSectionDuplicate,
    #[serde(rename = "DCO063")]
    AttrMissing,
    #[serde(rename = "DCO064")]
    AttrExtra,
    #[serde(rename = "DCO065")]
    AttrDuplicate,
}

impl ViolationCode {
    /// Every code, in numeric order.
    pub const ALL: [ViolationCode; 26] = [
        ViolationCode::DocstringMissing,
        ViolationCode::ArgsSectionMissing,
        ViolationCode::ArgsSectionUnexpected,
        ViolationCode::ArgsSectionDuplicate,
        ViolationCode::ArgMissing,
        ViolationCode::ArgExtra,
        ViolationCode::ArgDuplicate,
        ViolationCode::ReturnsSectionMissing,
        ViolationCode::ReturnsSectionUnexpected,
        ViolationCode::ReturnsSectionDuplicate,
        ViolationCode::YieldsSectionMissing,
        ViolationCode::YieldsSectionUnexpected,
        ViolationCode::YieldsSectionDuplicate,
        ViolationCode::RaisesSectionMissing,
        ViolationCode::RaisesSectionUnexpected,
        ViolationCode::RaisesSectionDuplicate,
        ViolationCode::ExceptionMissing,
        ViolationCode::ExceptionExtra,
        ViolationCode::RaisesEmptyForBareRaise,
        ViolationCode::ExceptionDuplicate,
        ViolationCode::AttrsSectionMissing,
        ViolationCode::AttrsSectionUnexpected,
        ViolationCode::AttrsSectionDuplicate,
        ViolationCode::AttrMissing,
        ViolationCode::AttrExtra,
        ViolationCode::AttrDuplicate,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ViolationCode::DocstringMissing => "DCO010",
            ViolationCode::ArgsSectionMissing => "DCO020",
            ViolationCode::ArgsSectionUnexpected => "DCO021",
            ViolationCode::ArgsSectionDuplicate => "DCO022",
            ViolationCode::ArgMissing => "DCO023",
            ViolationCode::ArgExtra => "DCO024",
            ViolationCode::ArgDuplicate => "DCO025",
            ViolationCode::ReturnsSectionMissing => "DCO030",
            ViolationCode::ReturnsSectionUnexpected => "DCO031",
            ViolationCode::ReturnsSectionDuplicate => "DCO032",
            ViolationCode::YieldsSectionMissing => "DCO040",
            ViolationCode::YieldsSectionUnexpected => "DCO041",
            ViolationCode::YieldsSectionDuplicate => "DCO042",
            ViolationCode::RaisesSectionMissing => "DCO050",
            ViolationCode::RaisesSectionUnexpected => "DCO051",
            ViolationCode::RaisesSectionDuplicate => "DCO052",
            ViolationCode::ExceptionMissing => "DCO053",
            ViolationCode::ExceptionExtra => "DCO054",
            ViolationCode::RaisesEmptyForBareRaise => "DCO055",
            ViolationCode::ExceptionDuplicate => "DCO056",
            ViolationCode::AttrsSectionMissing => "DCO060",
            ViolationCode::AttrsSectionUnexpected => "DCO061",
            ViolationCode::AttrsSectionDuplicate => "DCO062",
            ViolationCode::AttrMissing => "DCO063",
            ViolationCode::AttrExtra => "DCO064",
            ViolationCode::AttrDuplicate => "DCO065",
        }
    }

    /// Parse a code, case-insensitively (`DCO020`, `dco020`).
    pub fn parse(s: &str) -> Option<Self> {
        let upper = s.trim().to_ascii_uppercase();
        Self::ALL.into_iter().find(|c| c.as_str() == upper)
    }

    /// The code for a finding in a dimension, if the pair is defined.
    pub fn for_finding(dimension: Dimension, finding: Finding) -> Option<Self> {
        use Dimension as D;
        use Finding as F;

        let code = match (dimension, finding) {
            (D::Docstring, F::MissingDocstring) => ViolationCode::DocstringMissing,
            (D::Args, F::MissingSection) => ViolationCode::ArgsSectionMissing,
            (D::Args, F::UnexpectedSection) => ViolationCode::ArgsSectionUnexpected,
            (D::Args, F::DuplicateSection) => ViolationCode::ArgsSectionDuplicate,
            (D::Args, F::MissingItem) => ViolationCode::ArgMissing,
            (D::Args, F::ExtraItem) => ViolationCode::ArgExtra,
            (D::Args, F::DuplicateItem) => ViolationCode::ArgDuplicate,
            (D::Returns, F::MissingSection) => ViolationCode::ReturnsSectionMissing,
            (D::Returns, F::UnexpectedSection) => ViolationCode::ReturnsSectionUnexpected,
            (D::Returns, F::DuplicateSection) => ViolationCode::ReturnsSectionDuplicate,
            (D::Yields, F::MissingSection) => ViolationCode::YieldsSectionMissing,
            (D::Yields, F::UnexpectedSection) => ViolationCode::YieldsSectionUnexpected,
            (D::Yields, F::DuplicateSection) => ViolationCode::YieldsSectionDuplicate,
            (D::Raises, F::MissingSection) => ViolationCode::RaisesSectionMissing,
            (D::Raises, F::UnexpectedSection) => ViolationCode::RaisesSectionUnexpected,
            (D::Raises, F::DuplicateSection) => ViolationCode::RaisesSectionDuplicate,
            (D::Raises, F::MissingItem) => ViolationCode::ExceptionMissing,
            (D::Raises, F::ExtraItem) => ViolationCode::ExceptionExtra,
            (D::Raises, F::DuplicateItem) => ViolationCode::ExceptionDuplicate,
            (D::Raises, F::EmptyRaisesForBareRaise) => ViolationCode::RaisesEmptyForBareRaise,
            (D::Attrs, F::MissingSection) => ViolationCode::AttrsSectionMissing,
            (D::Attrs, F::UnexpectedSection) => ViolationCode::AttrsSectionUnexpected,
            (D::Attrs, F::DuplicateSection) => ViolationCode::AttrsSectionDuplicate,
            (D::Attrs, F::MissingItem) => ViolationCode::AttrMissing,
            (D::Attrs, F::ExtraItem) => ViolationCode::AttrExtra,
            (D::Attrs, F::DuplicateItem) => ViolationCode::AttrDuplicate,
            _ => return None,
        };
        Some(code)
    }

    pub fn dimension(&self) -> Dimension {
        use ViolationCode::*;

        match self {
            DocstringMissing => Dimension::Docstring,
            ArgsSectionMissing | ArgsSectionUnexpected | ArgsSectionDuplicate | ArgMissing
            | ArgExtra | ArgDuplicate => Dimension::Args,
            ReturnsSectionMissing | ReturnsSectionUnexpected | ReturnsSectionDuplicate => {
                Dimension::Returns
            }
            YieldsSectionMissing | YieldsSectionUnexpected | YieldsSectionDuplicate => {
                Dimension::Yields
            }
            RaisesSectionMissing | RaisesSectionUnexpected | RaisesSectionDuplicate
            | ExceptionMissing | ExceptionExtra | RaisesEmptyForBareRaise
            | ExceptionDuplicate => Dimension::Raises,
            AttrsSectionMissing | AttrsSectionUnexpected | AttrsSectionDuplicate | AttrMissing
            | AttrExtra | AttrDuplicate => Dimension::Attrs,
        }
    }

    pub fn finding(&self) -> Finding {
        match self {
            ViolationCode::DocstringMissing => Finding::MissingDocstring,
            ViolationCode::ArgsSectionMissing
            | ViolationCode::ReturnsSectionMissing
            | ViolationCode::YieldsSectionMissing
            | ViolationCode::RaisesSectionMissing
            | ViolationCode::AttrsSectionMissing => Finding::MissingSection,
            ViolationCode::ArgsSectionUnexpected
            | ViolationCode::ReturnsSectionUnexpected
            | ViolationCode::YieldsSectionUnexpected
            | ViolationCode::RaisesSectionUnexpected
            | ViolationCode::AttrsSectionUnexpected => Finding::UnexpectedSection,
            ViolationCode::ArgsSectionDuplicate
            | ViolationCode::ReturnsSectionDuplicate
            | ViolationCode::YieldsSectionDuplicate
            | ViolationCode::RaisesSectionDuplicate
            | ViolationCode::AttrsSectionDuplicate => Finding::DuplicateSection,
            ViolationCode::ArgMissing | ViolationCode::ExceptionMissing | ViolationCode::AttrMissing => {
                Finding::MissingItem
            }
            ViolationCode::ArgExtra | ViolationCode::ExceptionExtra | ViolationCode::AttrExtra => {
                Finding::ExtraItem
            }
            ViolationCode::ArgDuplicate
            | ViolationCode::ExceptionDuplicate
            | ViolationCode::AttrDuplicate => Finding::DuplicateItem,
            ViolationCode::RaisesEmptyForBareRaise => Finding::EmptyRaisesForBareRaise,
        }
    }

    /// One-line description for listings and SARIF rules.
    pub fn summary(&self) -> &'static str {
        match self {
            ViolationCode::DocstringMissing => "docstring is missing",
            ViolationCode::ArgsSectionMissing => "arguments section is missing",
            ViolationCode::ArgsSectionUnexpected => "arguments section is not expected",
            ViolationCode::ArgsSectionDuplicate => "arguments section appears more than once",
            ViolationCode::ArgMissing => "argument is not described",
            ViolationCode::ArgExtra => "described argument does not exist",
            ViolationCode::ArgDuplicate => "argument is described more than once",
            ViolationCode::ReturnsSectionMissing => "returns section is missing",
            ViolationCode::ReturnsSectionUnexpected => "returns section is not expected",
            ViolationCode::ReturnsSectionDuplicate => "returns section appears more than once",
            ViolationCode::YieldsSectionMissing => "yields section is missing",
            ViolationCode::YieldsSectionUnexpected => "yields section is not expected",
            ViolationCode::YieldsSectionDuplicate => "yields section appears more than once",
            ViolationCode::RaisesSectionMissing => "raises section is missing",
            ViolationCode::RaisesSectionUnexpected => "raises section is not expected",
            ViolationCode::RaisesSectionDuplicate => "raises section appears more than once",
            ViolationCode::ExceptionMissing => "raised exception is not described",
            ViolationCode::ExceptionExtra => "described exception is not raised",
            ViolationCode::RaisesEmptyForBareRaise => {
                "re-raise without any exception described"
            }
            ViolationCode::ExceptionDuplicate => "exception is described more than once",
            ViolationCode::AttrsSectionMissing => "attributes section is missing",
            ViolationCode::AttrsSectionUnexpected => "attributes section is not expected",
            ViolationCode::AttrsSectionDuplicate => "attributes section appears more than once",
            ViolationCode::AttrMissing => "attribute is not described",
            ViolationCode::AttrExtra => "described attribute does not exist",
            ViolationCode::AttrDuplicate => "attribute is described more than once",
        }
    }
}

impl std::fmt::Display for ViolationCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The definition a violation belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityRef {
    /// Dotted path, e.g. `Foo.bar`.
    pub name: String,
    pub kind: EntityKind,
    pub line: usize,
    pub column: usize,
}

/// A single detected issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    pub code: ViolationCode,
    pub message: String,
    pub file: String,
    pub line: usize,
    pub column: usize,
    pub entity: EntityRef,
    /// Offending argument, exception or attribute name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,
}

impl Violation {
    /// Ordering key: entity, dimension, position, then finding.
    pub fn sort_key(&self) -> (&str, usize, usize, Dimension, usize, usize, Finding) {
        (
            self.file.as_str(),
            self.entity.line,
            self.entity.column,
            self.code.dimension(),
            self.line,
            self.column,
            self.code.finding(),
        )
    }
}

/// Sort violations into report order. Ties keep their emission order.
pub fn sort_violations(violations: &mut [Violation]) {
    violations.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));
}

/// A file that could not be linted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileFailure {
    pub file: String,
    pub error: String,
}

/// Results of linting a set of files.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DetectionResult {
    pub violations: Vec<Violation>,
    /// Violations that were suppressed by inline comments
    #[serde(default)]
    pub suppressed: Vec<super::SuppressedViolation>,
    /// Number of files scanned
    pub scanned: usize,
    /// Files skipped because they could not be read or parsed
    #[serde(default)]
    pub failed: Vec<FileFailure>,
}

impl DetectionResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge another result into this one.
    pub fn merge(&mut self, other: DetectionResult) {
        self.violations.extend(other.violations);
        self.suppressed.extend(other.suppressed);
        self.scanned += other.scanned;
        self.failed.extend(other.failed);
    }

    /// Number of suppressed violations.
    pub fn suppressed_count(&self) -> usize {
        self.suppressed.len()
    }

    pub fn has_violations(&self) -> bool {
        !self.violations.is_empty()
    }

    /// Sort violations (and suppressed ones) into report order.
    pub fn sort(&mut self) {
        sort_violations(&mut self.violations);
        self.suppressed
            .sort_by(|a, b| a.violation.sort_key().cmp(&b.violation.sort_key()));
        self.failed.sort_by(|a, b| a.file.cmp(&b.file));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn violation(code: ViolationCode, entity_line: usize, line: usize) -> Violation {
        Violation {
            code,
            message: String::new(),
            file: "a.py".to_string(),
            line,
            column: 1,
            entity: EntityRef {
                name: "f".to_string(),
                kind: EntityKind::Function,
                line: entity_line,
                column: 1,
            },
            identifier: None,
        }
    }

    #[test]
    fn test_code_table_is_consistent() {
        for code in ViolationCode::ALL {
            assert_eq!(ViolationCode::parse(code.as_str()), Some(code));
            assert_eq!(
                ViolationCode::for_finding(code.dimension(), code.finding()),
                Some(code),
                "{}",
                code
            );
        }
        assert_eq!(ViolationCode::parse("dco023"), Some(ViolationCode::ArgMissing));
        assert_eq!(ViolationCode::parse("DCO099"), None);
    }

    #[test]
    fn test_undefined_pairs() {
        assert_eq!(
            ViolationCode::for_finding(Dimension::Returns, Finding::MissingItem),
            None
        );
        assert_eq!(
            ViolationCode::for_finding(Dimension::Args, Finding::EmptyRaisesForBareRaise),
            None
        );
    }

    #[test]
    fn test_serde_uses_code() {
        let json = serde_json::to_string(&ViolationCode::RaisesEmptyForBareRaise).unwrap();
        assert_eq!(json, "\"DCO055\"");
    }

    #[test]
    fn test_sort_order() {
        let mut violations = vec![
            violation(ViolationCode::AttrMissing, 1, 2),
            violation(ViolationCode::ArgExtra, 1, 5),
            violation(ViolationCode::ArgMissing, 1, 5),
            violation(ViolationCode::DocstringMissing, 10, 10),
            violation(ViolationCode::ArgsSectionDuplicate, 1, 3),
        ];
        sort_violations(&mut violations);

        let codes: Vec<_> = violations.iter().map(|v| v.code.as_str()).collect();
        assert_eq!(codes, vec!["DCO022", "DCO023", "DCO024", "DCO063", "DCO010"]);
    }
}
