//! Cross-validation of docstring sections against code facts.
//!
//! For every applicable dimension the validator compares what the code does
//! (a [`CodeEntity`]) with what the docstring says (its [`Sections`]):
//!
//! | Dimension | Needed when                              | Items       |
//! |-----------|------------------------------------------|-------------|
//! | Args      | accountable arguments exist              | arguments   |
//! | Returns   | a value is returned                      |             |
//! | Yields    | a value is yielded                       |             |
//! | Raises    | an exception is raised or re-raised      | exceptions  |
//! | Attrs     | the class has public attributes          | attributes  |
//!
//! Functions and methods are checked on every dimension, classes on Attrs
//! only. An attributes section in a function docstring is always unexpected.

use std::collections::BTreeSet;

use crate::analysis::{CodeEntity, EntityKind, Span};
use crate::config::{Config, ConstructorExemption, DEFAULT_DOCS_BASE_URL};
use crate::docstring::{self, DocSection, SectionKind, Sections};

use super::skip::SkipPolicy;
use super::types::{sort_violations, Dimension, EntityRef, Finding, Violation, ViolationCode};

/// Options that change what the validator reports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidateOptions {
    pub constructor_exemption: ConstructorExemption,
    pub private_args_optional: bool,
    pub docs_base_url: String,
}

impl Default for ValidateOptions {
    fn default() -> Self {
        Self {
            constructor_exemption: ConstructorExemption::default(),
            private_args_optional: false,
            docs_base_url: DEFAULT_DOCS_BASE_URL.to_string(),
        }
    }
}

impl From<&Config> for ValidateOptions {
    fn from(config: &Config) -> Self {
        Self {
            constructor_exemption: config.constructor_exemption,
            private_args_optional: config.private_args_optional,
            docs_base_url: config.docs_base_url.clone(),
        }
    }
}

/// A name the code expects to find documented.
struct Expected<'e> {
    name: &'e str,
    span: Span,
    /// Must be documented, as opposed to merely allowed.
    required: bool,
}

/// What one dimension expects of its section.
struct Expectation<'e> {
    kind: SectionKind,
    /// The section must be present.
    needs: bool,
    /// The section may be present.
    permits: bool,
    /// Names for item-bearing dimensions.
    items: Option<Vec<Expected<'e>>>,
    /// Skip the extra-item check.
    allow_extra: bool,
}

/// Validate every non-skipped entity and return violations in report order.
pub fn lint_entities(
    entities: &[CodeEntity],
    policy: &SkipPolicy,
    options: &ValidateOptions,
) -> Vec<Violation> {
    let mut violations = Vec::new();
    for entity in entities {
        if policy.is_skipped(entity) {
            tracing::trace!(entity = %entity.qualified_name, "skipped");
            continue;
        }
        violations.extend(validate_entity(entity, options));
    }
    sort_violations(&mut violations);
    violations
}

/// Validate one entity, ignoring the skip policy.
pub fn validate_entity(entity: &CodeEntity, options: &ValidateOptions) -> Vec<Violation> {
    let mut emitter = Emitter::new(entity, options);

    let constructor_exempt = entity.context.constructor
        && options
            .constructor_exemption
            .exempts(entity.class_documents_attrs);

    let Some(text) = entity.docstring.as_deref() else {
        if !constructor_exempt && !entity.context.overload_like {
            emitter.emit(
                Dimension::Docstring,
                Finding::MissingDocstring,
                entity.span,
                None,
                None,
            );
        }
        return emitter.finish();
    };

    let sections = docstring::parse(text);
    for expectation in expectations(entity, options, constructor_exempt) {
        check_dimension(&mut emitter, &sections, expectation);
    }

    if entity.kind.is_callable() && entity.has_bare_raise {
        let documented = sections
            .get(SectionKind::Raises)
            .map(|s| !s.items.is_empty())
            .unwrap_or(false);
        if !documented {
            let at = emitter.docstring_span();
            emitter.emit(
                Dimension::Raises,
                Finding::EmptyRaisesForBareRaise,
                at,
                None,
                None,
            );
        }
    }

    emitter.finish()
}

/// The dimensions applicable to an entity and what each one expects.
fn expectations<'e>(
    entity: &'e CodeEntity,
    options: &ValidateOptions,
    constructor_exempt: bool,
) -> Vec<Expectation<'e>> {
    let mut result = Vec::new();

    if entity.kind == EntityKind::Class {
        result.push(attrs_expectation(entity));
        return result;
    }

    if !constructor_exempt {
        let args: Vec<Expected> = entity
            .accountable_arguments()
            .map(|a| Expected {
                name: &a.name,
                span: a.span,
                required: !(options.private_args_optional && a.is_private()),
            })
            .collect();
        let needs = args.iter().any(|a| a.required);
        let permits = if options.private_args_optional {
            !args.is_empty()
        } else {
            needs
        };
        result.push(Expectation {
            kind: SectionKind::Args,
            needs,
            permits,
            items: Some(args),
            allow_extra: false,
        });
    }

    result.push(presence_only(SectionKind::Returns, entity.returns_value));
    result.push(presence_only(SectionKind::Yields, entity.yields_value));

    let raises: Vec<Expected> = entity
        .raised_exceptions
        .iter()
        .map(|e| Expected {
            name: &e.name,
            span: e.span,
            required: true,
        })
        .collect();
    let needs = !raises.is_empty() || entity.has_bare_raise;
    result.push(Expectation {
        kind: SectionKind::Raises,
        needs,
        permits: needs,
        items: Some(raises),
        allow_extra: entity.has_bare_raise,
    });

    // A constructor's bindings are checked against the class docstring.
    if !entity.context.constructor {
        result.push(presence_only(SectionKind::Attrs, false));
    }

    result
}

fn presence_only<'e>(kind: SectionKind, needs: bool) -> Expectation<'e> {
    Expectation {
        kind,
        needs,
        permits: needs,
        items: None,
        allow_extra: false,
    }
}

fn attrs_expectation(entity: &CodeEntity) -> Expectation<'_> {
    let attrs: Vec<Expected> = entity
        .attributes
        .iter()
        .map(|a| Expected {
            name: &a.name,
            span: a.span,
            required: a.public,
        })
        .collect();

    Expectation {
        kind: SectionKind::Attrs,
        needs: attrs.iter().any(|a| a.required),
        permits: !attrs.is_empty(),
        items: Some(attrs),
        allow_extra: false,
    }
}

fn check_dimension(emitter: &mut Emitter, sections: &Sections, expectation: Expectation) {
    let dimension = Dimension::from(expectation.kind);
    let section = sections.get(expectation.kind);
    let at = emitter.docstring_span();

    let Some(section) = section else {
        if expectation.needs {
            emitter.emit(dimension, Finding::MissingSection, at, None, None);
        }
        return;
    };

    if !expectation.permits {
        emitter.emit(dimension, Finding::UnexpectedSection, at, None, None);
    }

    if section.occurrence_count > 1 {
        let found = section.headers.join(",");
        emitter.emit(dimension, Finding::DuplicateSection, at, None, Some(found));
    }

    if !expectation.permits {
        return;
    }
    if let Some(items) = &expectation.items {
        check_items(emitter, dimension, section, items, expectation.allow_extra);
    }
}

fn check_items(
    emitter: &mut Emitter,
    dimension: Dimension,
    section: &DocSection,
    expected: &[Expected],
    allow_extra: bool,
) {
    let documented: BTreeSet<&str> = section.item_names().collect();

    for item in expected {
        if item.required && !documented.contains(item.name) {
            emitter.emit(
                dimension,
                Finding::MissingItem,
                item.span,
                Some(item.name),
                None,
            );
        }
    }

    if !allow_extra {
        let known: BTreeSet<&str> = expected.iter().map(|e| e.name).collect();
        for name in documented.difference(&known).copied() {
            if let Some(item) = section.find_item(name) {
                let at = emitter.docstring_line(item.line);
                emitter.emit(dimension, Finding::ExtraItem, at, Some(name), None);
            }
        }
    }

    for item in section.duplicate_items() {
        let at = emitter.docstring_line(item.line);
        emitter.emit(
            dimension,
            Finding::DuplicateItem,
            at,
            Some(item.name.as_str()),
            None,
        );
    }
}

/// Collects violations for one entity.
struct Emitter<'a> {
    entity: &'a CodeEntity,
    options: &'a ValidateOptions,
    violations: Vec<Violation>,
}

impl<'a> Emitter<'a> {
    fn new(entity: &'a CodeEntity, options: &'a ValidateOptions) -> Self {
        Self {
            entity,
            options,
            violations: Vec::new(),
        }
    }

    fn docstring_span(&self) -> Span {
        self.entity.docstring_span.unwrap_or(self.entity.span)
    }

    /// Source position of a docstring line (1-indexed within the docstring).
    fn docstring_line(&self, line: usize) -> Span {
        let doc = self.docstring_span();
        Span::point(doc.start_line + line.saturating_sub(1), doc.start_col)
    }

    fn emit(
        &mut self,
        dimension: Dimension,
        finding: Finding,
        at: Span,
        identifier: Option<&str>,
        detail: Option<String>,
    ) {
        let Some(code) = ViolationCode::for_finding(dimension, finding) else {
            tracing::debug!(?dimension, ?finding, "no code for finding");
            return;
        };

        let message = format!(
            "{}, more information: {}#fix-{}",
            describe(code, self.entity.kind, identifier, detail.as_deref()),
            self.options.docs_base_url,
            code.as_str().to_lowercase()
        );

        self.violations.push(Violation {
            code,
            message,
            file: self.entity.file.clone(),
            line: at.start_line,
            column: at.start_col,
            entity: EntityRef {
                name: self.entity.qualified_name.clone(),
                kind: self.entity.kind,
                line: self.entity.span.start_line,
                column: self.entity.span.start_col,
            },
            identifier: identifier.map(str::to_string),
        });
    }

    fn finish(self) -> Vec<Violation> {
        self.violations
    }
}

/// Human-readable message for a code, without the documentation link.
fn describe(
    code: ViolationCode,
    kind: EntityKind,
    identifier: Option<&str>,
    detail: Option<&str>,
) -> String {
    use ViolationCode::*;

    let name = identifier.unwrap_or_default();
    let found = detail.unwrap_or_default();
    let single = |section: &str| {
        format!(
            "a docstring should only contain a single {} section, found {}",
            section, found
        )
    };

    match code {
        DocstringMissing => "docstring should be defined for a function/ method/ class".to_string(),
        ArgsSectionMissing => "a function/ method with arguments should have the arguments section in the docstring".to_string(),
        ArgsSectionUnexpected => "a function/ method without arguments should not have the arguments section in the docstring".to_string(),
        ArgsSectionDuplicate => single("arguments"),
        ArgMissing => format!("\"{}\" argument should be described in the docstring", name),
        ArgExtra => format!("\"{}\" argument should not be described in the docstring", name),
        ArgDuplicate => format!("\"{}\" argument should only be described once in the docstring", name),
        ReturnsSectionMissing => "function/ method that returns a value should have the returns section in the docstring".to_string(),
        ReturnsSectionUnexpected => "function/ method that does not return a value should not have the returns section in the docstring".to_string(),
        ReturnsSectionDuplicate => single("returns"),
        YieldsSectionMissing => "function/ method that yields a value should have the yields section in the docstring".to_string(),
        YieldsSectionUnexpected => "function/ method that does not yield a value should not have the yields section in the docstring".to_string(),
        YieldsSectionDuplicate => single("yields"),
        RaisesSectionMissing => "a function/ method that raises an exception should have the raises section in the docstring".to_string(),
        RaisesSectionUnexpected => "a function/ method that does not raise an exception should not have the raises section in the docstring".to_string(),
        RaisesSectionDuplicate => single("raises"),
        ExceptionMissing => format!("\"{}\" exception should be described in the docstring", name),
        ExceptionExtra => format!("\"{}\" exception should not be described in the docstring", name),
        RaisesEmptyForBareRaise => "a function/ method that re-raises exceptions should describe at least one exception in the raises section of the docstring".to_string(),
        ExceptionDuplicate => format!("\"{}\" exception should only be described once in the docstring", name),
        AttrsSectionMissing => "a class with attributes should have the attributes section in the docstring".to_string(),
        AttrsSectionUnexpected if kind.is_callable() => "a function/ method should not have the attributes section in the docstring".to_string(),
        AttrsSectionUnexpected => "a class without attributes should not have the attributes section in the docstring".to_string(),
        AttrsSectionDuplicate => single("attributes"),
        AttrMissing => format!("\"{}\" attribute should be described in the docstring", name),
        AttrExtra => format!("\"{}\" attribute should not be described in the docstring", name),
        AttrDuplicate => format!("\"{}\" attribute should only be described once in the docstring", name),
    }
}
