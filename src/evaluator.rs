/*
 * ==========================================================================
 * POSH - document merge engine
 * ==========================================================================
 *
 * File:     evaluator.rs
 * Purpose:  Evaluates a compiled expression against the ancestor context
 *           and the stub. Pure: never mutates either input. `None` means
 *           "not yet" - the flow engine retries on the next pass - and is
 *           not itself an error.
 *
 * Author:   Sam Wilcox
 * ==========================================================================
 */

use crate::ast::Ast;
use crate::context::Context;
use crate::document::{find_in_path, Document};

/// Evaluates `ast` against `context` and `stub`. Returns `None` when the
/// expression cannot yet produce a value.
pub fn evaluate(ast: &Ast, context: &Context, stub: &Document) -> Option<Document> {
    match ast {
        Ast::IntLit(v) => Some(Document::Integer(*v)),
        Ast::StringLit(s) => Some(Document::String(s.clone())),
        Ast::BoolLit(b) => Some(Document::Boolean(*b)),

        Ast::Reference(path) => {
            let (head, rest) = path.split_first()?;
            let root = context.resolve(head)?;
            find_in_path(rest, &root)
        }

        Ast::Merge(path) => find_in_path(path, stub),

        Ast::Auto(path) => evaluate_auto(path, context),

        Ast::Or(a, b) => evaluate(a, context, stub).or_else(|| evaluate(b, context, stub)),

        Ast::Concat(a, b) => {
            let left = string_from(&evaluate(a, context, stub)?)?;
            let right = string_from(&evaluate(b, context, stub)?)?;
            Some(Document::String(format!("{left}{right}")))
        }

        Ast::Add(a, b) => {
            let left = int_from(&evaluate(a, context, stub)?)?;
            let right = int_from(&evaluate(b, context, stub)?)?;
            Some(Document::Integer(left + right))
        }

        Ast::Sub(a, b) => {
            let left = int_from(&evaluate(a, context, stub)?)?;
            let right = int_from(&evaluate(b, context, stub)?)?;
            Some(Document::Integer(left - right))
        }

        Ast::List(items) => {
            let mut resolved = Vec::with_capacity(items.len());
            for item in items {
                resolved.push(evaluate(item, context, stub)?);
            }
            Some(Document::Sequence(resolved))
        }

        // Transient compiler markers, and calls with no matching builtin:
        // surface as unresolved rather than producing a placeholder.
        Ast::Seq(_) | Ast::Function(_) | Ast::Call(_, _) => None,
    }
}

/// Coerces a resolved document node to a string for `Concat`. Only
/// `String` itself coerces - `Integer` deliberately does not (see
/// DESIGN.md for why this mirrors the source this was distilled from).
fn string_from(doc: &Document) -> Option<String> {
    match doc {
        Document::String(s) => Some(s.clone()),
        _ => None,
    }
}

fn int_from(doc: &Document) -> Option<i64> {
    match doc {
        Document::Integer(i) => Some(*i),
        _ => None,
    }
}

/// The only recognised shape for `auto`: sum the `instances` of every
/// `jobs` entry whose `resource_pool` matches `path[1]`.
fn evaluate_auto(path: &[String], context: &Context) -> Option<Document> {
    if path.len() != 3 || path[0] != "resource_pools" || path[2] != "size" {
        return None;
    }
    let pool = path[1].as_str();

    let jobs = match context.resolve("jobs")? {
        Document::Sequence(items) => items,
        _ => return None,
    };

    let mut size = 0i64;
    for job in &jobs {
        let attrs = match job.as_mapping() {
            Some(m) => m,
            None => continue,
        };
        let resource_pool = match attrs.get("resource_pool") {
            Some(v) => v,
            None => continue,
        };
        let pool_name = match string_from(resource_pool) {
            Some(s) => s,
            None => continue,
        };
        if pool_name != pool {
            continue;
        }
        // A job that matches the pool but lacks a usable `instances`
        // makes the whole sum defer, rather than silently skipping it.
        let instances = attrs.get("instances")?;
        size += int_from(instances)?;
    }
    Some(Document::Integer(size))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    fn mapping(pairs: Vec<(&str, Document)>) -> crate::document::Mapping {
        pairs.into_iter().map(|(k, v)| (k.to_string(), v)).collect()
    }

    #[test]
    fn reference_resolves_from_innermost_context() {
        let ctx = Context::new().push(Rc::new(mapping(vec![("b", Document::Integer(1))])));
        let ast = Ast::Reference(vec!["b".to_string()]);
        assert_eq!(evaluate(&ast, &ctx, &Document::Mapping(mapping(vec![]))), Some(Document::Integer(1)));
    }

    #[test]
    fn reference_to_unknown_identifier_defers() {
        let ctx = Context::new();
        let ast = Ast::Reference(vec!["nope".to_string()]);
        assert_eq!(evaluate(&ast, &ctx, &Document::Mapping(mapping(vec![]))), None);
    }

    #[test]
    fn merge_looks_up_own_path_in_stub() {
        let stub = Document::Mapping(mapping(vec![("a", Document::String("hello".to_string()))]));
        let ast = Ast::Merge(vec!["a".to_string()]);
        assert_eq!(evaluate(&ast, &Context::new(), &stub), Some(Document::String("hello".to_string())));
    }

    #[test]
    fn or_falls_back_when_lhs_unresolved() {
        let ast = Ast::Or(Box::new(Ast::Reference(vec!["foo".to_string()])), Box::new(Ast::IntLit(7)));
        assert_eq!(evaluate(&ast, &Context::new(), &Document::Mapping(mapping(vec![]))), Some(Document::Integer(7)));
    }

    #[test]
    fn concat_does_not_coerce_integers() {
        let ast = Ast::Concat(Box::new(Ast::StringLit("n=".to_string())), Box::new(Ast::IntLit(1)));
        assert_eq!(evaluate(&ast, &Context::new(), &Document::Mapping(mapping(vec![]))), None);
    }

    #[test]
    fn concat_joins_two_strings() {
        let ast = Ast::Concat(Box::new(Ast::StringLit("hello ".to_string())), Box::new(Ast::StringLit("world".to_string())));
        assert_eq!(
            evaluate(&ast, &Context::new(), &Document::Mapping(mapping(vec![]))),
            Some(Document::String("hello world".to_string()))
        );
    }

    #[test]
    fn auto_sums_matching_jobs() {
        let jobs = Document::Sequence(vec![
            Document::Mapping(mapping(vec![
                ("resource_pool", Document::String("p".to_string())),
                ("instances", Document::Integer(2)),
            ])),
            Document::Mapping(mapping(vec![
                ("resource_pool", Document::String("q".to_string())),
                ("instances", Document::Integer(9)),
            ])),
        ]);
        let ctx = Context::new().push(Rc::new(mapping(vec![("jobs", jobs)])));
        let ast = Ast::Auto(vec!["resource_pools".to_string(), "p".to_string(), "size".to_string()]);
        assert_eq!(evaluate(&ast, &ctx, &Document::Mapping(mapping(vec![]))), Some(Document::Integer(2)));
    }

    #[test]
    fn auto_skips_jobs_missing_resource_pool_but_defers_on_missing_instances() {
        let jobs = Document::Sequence(vec![
            Document::Mapping(mapping(vec![("instances", Document::Integer(2))])),
            Document::Mapping(mapping(vec![
                ("resource_pool", Document::String("p".to_string())),
            ])),
        ]);
        let ctx = Context::new().push(Rc::new(mapping(vec![("jobs", jobs)])));
        let ast = Ast::Auto(vec!["resource_pools".to_string(), "p".to_string(), "size".to_string()]);
        assert_eq!(evaluate(&ast, &ctx, &Document::Mapping(mapping(vec![]))), None);
    }

    #[test]
    fn auto_ignores_unrecognised_path_shapes() {
        let ast = Ast::Auto(vec!["something".to_string(), "else".to_string()]);
        assert_eq!(evaluate(&ast, &Context::new(), &Document::Mapping(mapping(vec![]))), None);
    }
}
