//! Docstring section extraction.
//!
//! Splits a docstring into Google-style sections (`Args:`, `Returns:`,
//! `Yields:`, `Raises:`, `Attrs:`) and the sub-items listed beneath them.
//!
//! ```text
//! Perform the operation.          <- ignored
//!
//! Args:                           <- header, starts an ARGS section
//!     bar (int): the bar.         <- item "bar"
//!         continued description   <- ignored
//!     baz: the baz.               <- item "baz"
//!                                 <- blank line ends the section
//! Returns:                        <- header, starts a RETURNS section
//!     The result.
//! ```
//!
//! Only the first occurrence of a section kind contributes items. Later
//! occurrences are counted so that duplicates can be reported.

use std::collections::BTreeMap;
use std::fmt;

use lazy_static::lazy_static;
use phf::phf_map;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Kind of docstring section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionKind {
    Args,
    Returns,
    Yields,
    Raises,
    Attrs,
}

impl SectionKind {
    /// All section kinds in validation order.
    pub const ALL: [SectionKind; 5] = [
        SectionKind::Args,
        SectionKind::Returns,
        SectionKind::Yields,
        SectionKind::Raises,
        SectionKind::Attrs,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SectionKind::Args => "args",
            SectionKind::Returns => "returns",
            SectionKind::Yields => "yields",
            SectionKind::Raises => "raises",
            SectionKind::Attrs => "attrs",
        }
    }

    /// Name used in violation messages.
    pub fn description(&self) -> &'static str {
        match self {
            SectionKind::Args => "arguments",
            SectionKind::Returns => "returns",
            SectionKind::Yields => "yields",
            SectionKind::Raises => "raises",
            SectionKind::Attrs => "attributes",
        }
    }

    /// Canonical header keyword, used when rendering sections.
    pub fn header(&self) -> &'static str {
        match self {
            SectionKind::Args => "Args",
            SectionKind::Returns => "Returns",
            SectionKind::Yields => "Yields",
            SectionKind::Raises => "Raises",
            SectionKind::Attrs => "Attrs",
        }
    }

    /// Look up a header keyword (case-insensitive) in the alias table.
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        SECTION_ALIASES
            .get(keyword.to_lowercase().as_str())
            .copied()
    }
}

impl fmt::Display for SectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Header keywords and the section they open.
static SECTION_ALIASES: phf::Map<&'static str, SectionKind> = phf_map! {
    "args" => SectionKind::Args,
    "arguments" => SectionKind::Args,
    "parameters" => SectionKind::Args,
    "return" => SectionKind::Returns,
    "returns" => SectionKind::Returns,
    "yield" => SectionKind::Yields,
    "yields" => SectionKind::Yields,
    "raises" => SectionKind::Raises,
    "raise" => SectionKind::Raises,
    "attrs" => SectionKind::Attrs,
    "attributes" => SectionKind::Attrs,
};

lazy_static! {
    /// `Args:` with optional surrounding whitespace and nothing else.
    static ref SECTION_HEADER: Regex = Regex::new(r"^\s*(\w+):\s*$").unwrap();
    /// `name:`, `name (type):`, `*args:` followed by anything.
    static ref SUB_ITEM: Regex = Regex::new(r"^\s*\*{0,2}(\w+)(?:\s*\(.*\))?:").unwrap();
}

/// One documented entry within a section.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DocItem {
    /// The documented identifier.
    pub name: String,
    /// Line within the docstring (1-indexed).
    pub line: usize,
}

/// All occurrences of one section kind within a docstring.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocSection {
    pub kind: SectionKind,
    /// Items of the first occurrence, in order of appearance.
    pub items: Vec<DocItem>,
    /// Number of headers of this kind across the whole docstring.
    pub occurrence_count: usize,
    /// Header keyword of every occurrence as written (e.g. `Args`, `Parameters`).
    pub headers: Vec<String>,
    /// Line of the first header (1-indexed).
    pub line: usize,
}

impl DocSection {
    fn new(kind: SectionKind, line: usize) -> Self {
        Self {
            kind,
            items: Vec::new(),
            occurrence_count: 0,
            headers: Vec::new(),
            line,
        }
    }

    /// Names of the documented items, in order.
    pub fn item_names(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(|i| i.name.as_str())
    }

    /// First occurrence of an item by name.
    pub fn find_item(&self, name: &str) -> Option<&DocItem> {
        self.items.iter().find(|i| i.name == name)
    }

    /// Items documented more than once, reported at their first repeat.
    ///
    /// Each name appears at most once in the result regardless of how many
    /// times it repeats.
    pub fn duplicate_items(&self) -> Vec<&DocItem> {
        let mut seen = std::collections::HashSet::new();
        let mut reported = std::collections::HashSet::new();
        let mut duplicates = Vec::new();

        for item in &self.items {
            if !seen.insert(item.name.as_str()) && reported.insert(item.name.as_str()) {
                duplicates.push(item);
            }
        }

        duplicates
    }
}

/// Parsed sections of one docstring, keyed by kind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sections {
    sections: BTreeMap<SectionKind, DocSection>,
}

impl Sections {
    pub fn get(&self, kind: SectionKind) -> Option<&DocSection> {
        self.sections.get(&kind)
    }

    pub fn contains(&self, kind: SectionKind) -> bool {
        self.sections.contains_key(&kind)
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Sections in validation order.
    pub fn iter(&self) -> impl Iterator<Item = &DocSection> {
        self.sections.values()
    }
}

impl fmt::Display for Sections {
    /// Renders the first occurrence of every section in canonical form.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for section in self.iter() {
            if !first {
                writeln!(f)?;
            }
            first = false;
            writeln!(f, "{}:", section.kind.header())?;
            for item in &section.items {
                writeln!(f, "    {}:", item.name)?;
            }
        }
        Ok(())
    }
}

/// Match a section header line, returning the kind and the keyword as written.
fn section_header(line: &str) -> Option<(SectionKind, &str)> {
    let caps = SECTION_HEADER.captures(line)?;
    let keyword = caps.get(1)?.as_str();
    SectionKind::from_keyword(keyword).map(|kind| (kind, keyword))
}

/// Match a sub-item line, returning the documented identifier.
fn sub_item(line: &str) -> Option<&str> {
    SUB_ITEM
        .captures(line)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Parse a docstring into its sections.
///
/// Never fails: text that is not part of a recognised section is ignored.
pub fn parse(text: &str) -> Sections {
    let mut sections: BTreeMap<SectionKind, DocSection> = BTreeMap::new();
    // Kind of the section being read, whether it is the first occurrence, and
    // the indentation of its header.
    let mut current: Option<(SectionKind, bool, usize)> = None;

    for (index, line) in text.lines().enumerate() {
        let line_number = index + 1;
        let indent = indentation(line);

        // An item such as `returns:` nested under an open section is not a header.
        let header = match current {
            Some((_, _, header_indent)) if indent > header_indent => None,
            _ => section_header(line),
        };

        if let Some((kind, keyword)) = header {
            let section = sections
                .entry(kind)
                .or_insert_with(|| DocSection::new(kind, line_number));
            section.occurrence_count += 1;
            section.headers.push(keyword.to_string());
            current = Some((kind, section.occurrence_count == 1, indent));
            continue;
        }

        if line.trim().is_empty() {
            current = None;
            continue;
        }

        if let Some((kind, true, _)) = current {
            if let Some(name) = sub_item(line) {
                if let Some(section) = sections.get_mut(&kind) {
                    section.items.push(DocItem {
                        name: name.to_string(),
                        line: line_number,
                    });
                }
            }
        }
    }

    Sections { sections }
}

fn indentation(line: &str) -> usize {
    line.len() - line.trim_start().len()
}

/// Parse an optional docstring; an absent docstring has no sections.
pub fn parse_optional(text: Option<&str>) -> Sections {
    text.map(parse).unwrap_or_default()
}
