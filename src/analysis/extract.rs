//! Code fact extraction.
//!
//! Walks a parser-neutral [`Module`] and produces one [`CodeEntity`] per
//! function, method and class definition, in source order. Each entity only
//! sees its own scope: returns, yields and raises of nested functions belong
//! to the nested function.

use crate::docstring::{self, SectionKind};

use super::syntax::{ClassDef, Decorator, FunctionDef, Module, Param, RaiseKind, Stmt, Target};
use super::{Argument, ArgumentKind, CodeEntity, EntityContext, EntityKind};

/// Implicit receivers excluded from the accountable arguments.
const SELF_CLS: [&str; 2] = ["self", "cls"];

const PROPERTY_DECORATORS: &[&str] = &[
    "property",
    "cached_property",
    "functools.cached_property",
    "builtins.property",
];

const OVERLOAD_DECORATORS: &[&str] = &["overload", "typing.overload", "typing_extensions.overload"];

const CONSTRUCTOR_NAME: &str = "__init__";

/// Where a definition lives.
#[derive(Clone, Copy)]
enum Scope {
    Module,
    Function,
    Class { documents_attrs: bool },
}

/// Extract facts for every definition in a module.
///
/// `file` is the base name of the containing file.
pub fn extract_entities(module: &Module, file: &str) -> Vec<CodeEntity> {
    let mut entities = Vec::new();
    visit_body(&module.body, Scope::Module, "", file, &mut entities);
    entities
}

fn visit_body(
    body: &[Stmt],
    scope: Scope,
    prefix: &str,
    file: &str,
    entities: &mut Vec<CodeEntity>,
) {
    for stmt in body {
        match stmt {
            Stmt::FunctionDef(def) => {
                let entity = function_entity(def, scope, prefix, file);
                let qualified = entity.qualified_name.clone();
                entities.push(entity);
                visit_body(&def.body, Scope::Function, &qualified, file, entities);
            }
            Stmt::ClassDef(def) => {
                let entity = class_entity(def, prefix, file);
                let qualified = entity.qualified_name.clone();
                let documents_attrs = def
                    .docstring
                    .as_ref()
                    .map(|d| docstring::parse(&d.text).contains(SectionKind::Attrs))
                    .unwrap_or(false);
                entities.push(entity);
                visit_body(
                    &def.body,
                    Scope::Class { documents_attrs },
                    &qualified,
                    file,
                    entities,
                );
            }
            _ => {}
        }
    }
}

fn qualify(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", prefix, name)
    }
}

fn has_decorator(decorators: &[Decorator], names: &[&str]) -> bool {
    decorators.iter().any(|d| names.contains(&d.name.as_str()))
}

pub(crate) fn is_property_like(decorators: &[Decorator]) -> bool {
    has_decorator(decorators, PROPERTY_DECORATORS)
}

pub(crate) fn is_overload_like(decorators: &[Decorator]) -> bool {
    has_decorator(decorators, OVERLOAD_DECORATORS)
}

fn function_context(def: &FunctionDef, scope: Scope) -> EntityContext {
    let inside_class = matches!(scope, Scope::Class { .. });
    EntityContext {
        inside_class,
        constructor: inside_class && def.name == CONSTRUCTOR_NAME,
        is_static: has_decorator(&def.decorators, &["staticmethod"]),
        is_classmethod: has_decorator(&def.decorators, &["classmethod"]),
        is_async: def.is_async,
        property_like: is_property_like(&def.decorators),
        overload_like: is_overload_like(&def.decorators),
    }
}

/// Build the argument list, marking an implicit leading `self`/`cls`.
fn build_arguments(params: &[Param], context: &EntityContext) -> Vec<Argument> {
    let has_receiver = context.inside_class && !context.is_static;

    params
        .iter()
        .enumerate()
        .map(|(index, param)| {
            let excluded = has_receiver
                && index == 0
                && matches!(
                    param.kind,
                    ArgumentKind::Positional | ArgumentKind::PositionalOnly
                )
                && SELF_CLS.contains(&param.name.as_str());
            Argument {
                name: param.name.clone(),
                kind: param.kind,
                excluded,
                span: param.span,
            }
        })
        .collect()
}

fn function_entity(def: &FunctionDef, scope: Scope, prefix: &str, file: &str) -> CodeEntity {
    let context = function_context(def, scope);
    let kind = if context.inside_class {
        EntityKind::Method
    } else {
        EntityKind::Function
    };

    let mut entity = CodeEntity::new(kind, def.name.clone(), def.span);
    entity.qualified_name = qualify(prefix, &def.name);
    entity.file = file.to_string();
    entity.docstring = def.docstring.as_ref().map(|d| d.text.clone());
    entity.docstring_span = def.docstring.as_ref().map(|d| d.span);
    entity.decorators = def.decorators.iter().map(|d| d.name.clone()).collect();
    entity.arguments = build_arguments(&def.params, &context);
    entity.context = context;
    if let Scope::Class { documents_attrs } = scope {
        entity.class_documents_attrs = documents_attrs;
    }

    for stmt in &def.body {
        match stmt {
            Stmt::Return(ret) if ret.has_value() => entity.returns_value = true,
            Stmt::Yield(y) if y.has_value() => entity.yields_value = true,
            Stmt::Raise(raise) => match &raise.kind {
                RaiseKind::Bare => entity.has_bare_raise = true,
                RaiseKind::Named(name) => entity.add_exception(name, raise.span),
                RaiseKind::Unresolved => {}
            },
            _ => {}
        }
    }

    // Signature-only shells document nothing about behaviour.
    if context.overload_like {
        entity.returns_value = false;
        entity.yields_value = false;
        entity.raised_exceptions.clear();
        entity.has_bare_raise = false;
    }
    // Properties are documented as class attributes.
    if context.property_like {
        entity.returns_value = false;
        entity.yields_value = false;
    }

    entity
}

fn class_entity(def: &ClassDef, prefix: &str, file: &str) -> CodeEntity {
    let mut entity = CodeEntity::new(EntityKind::Class, def.name.clone(), def.span);
    entity.qualified_name = qualify(prefix, &def.name);
    entity.file = file.to_string();
    entity.docstring = def.docstring.as_ref().map(|d| d.text.clone());
    entity.docstring_span = def.docstring.as_ref().map(|d| d.span);
    entity.decorators = def.decorators.iter().map(|d| d.name.clone()).collect();

    for stmt in &def.body {
        match stmt {
            Stmt::Assign(assign) => {
                for target in &assign.targets {
                    if let Target::Name { name, span } = target {
                        entity.add_attribute(name, *span);
                    }
                }
            }
            Stmt::FunctionDef(method) => collect_method_attributes(&mut entity, method),
            _ => {}
        }
    }

    entity
}

/// Attributes a method contributes to its class: its own name when it is a
/// property, and `self.<name>` bindings in instance methods.
fn collect_method_attributes(class: &mut CodeEntity, method: &FunctionDef) {
    if is_property_like(&method.decorators) {
        class.add_attribute(&method.name, method.span);
    }

    if has_decorator(&method.decorators, &["staticmethod", "classmethod"]) {
        return;
    }

    let receiver = match method.params.first() {
        Some(p) if matches!(p.kind, ArgumentKind::Positional | ArgumentKind::PositionalOnly) => {
            p.name.as_str()
        }
        _ => return,
    };

    for stmt in &method.body {
        if let Stmt::Assign(assign) = stmt {
            for target in &assign.targets {
                if let Target::Attribute { object, attr, span } = target {
                    if object == receiver {
                        class.add_attribute(attr, *span);
                    }
                }
            }
        }
    }
}
