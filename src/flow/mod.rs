/*
 * ==========================================================================
 * POSH - document merge engine
 * ==========================================================================
 *
 * File:     flow/mod.rs
 * Purpose:  The fixed-point tree rewrite: locates embedded expressions in
 *           scalars, evaluates them, substitutes results, and repeats
 *           until a pass changes nothing.
 *
 * Author:   Sam Wilcox
 * ==========================================================================
 */

pub mod delimiter;
pub mod resolution;

use std::rc::Rc;

use crate::compiler;
use crate::config::Config;
use crate::context::Context;
use crate::document::{is_path_name, Document, Mapping, Unresolved};
use crate::error::PoshError;
use crate::evaluator::evaluate;
use crate::grammar;

/// One rewrite pass over `root`. Returns the rewritten tree and whether
/// anything changed.
pub fn flow(
    root: Document,
    path: &[String],
    context: &Context,
    stub: &Document,
    config: &Config,
) -> Result<(Document, bool), PoshError> {
    match root {
        Document::Mapping(mapping) => flow_mapping(mapping, path, context, stub, config),
        Document::Sequence(items) => flow_sequence(items, path, context, stub, config),
        Document::String(s) => flow_scalar(s, path, context, stub, config),
        Document::Integer(_) | Document::Boolean(_) => Ok((root, false)),
        Document::Unresolved(u) => flow_unresolved(u, context, stub),
    }
}

fn flow_mapping(
    mapping: Mapping,
    path: &[String],
    context: &Context,
    stub: &Document,
    config: &Config,
) -> Result<(Document, bool), PoshError> {
    // Parse every direct scalar child into its compiled expression *before*
    // building the ancestor scope a sibling sees. Otherwise a sibling whose
    // own turn hasn't come up yet would still look like raw delimited text
    // in the context, and something concatenating it would treat that text
    // as a literal string instead of correctly deferring until it settles.
    let prescanned = prescan_mapping(mapping, path, config)?;

    let ancestor = Rc::new(prescanned.clone());
    let child_context = context.push(ancestor);

    let mut result = Mapping::new();
    let mut progressed = false;
    for (key, value) in prescanned.into_iter() {
        let mut child_path = path.to_vec();
        child_path.push(key.clone());
        let (flowed, did) = flow(value, &child_path, &child_context, stub, config)?;
        progressed |= did;
        result.insert(key, flowed);
    }
    Ok((Document::Mapping(result), progressed))
}

/// Turns every direct `String` child that embeds an expression into its
/// `Unresolved` compiled form, without attempting to evaluate any of them
/// yet. Leaves nested mappings/sequences alone - their own `flow_mapping`
/// call prescans at their own level.
fn prescan_mapping(mapping: Mapping, path: &[String], config: &Config) -> Result<Mapping, PoshError> {
    let mut result = Mapping::new();
    for (key, value) in mapping.into_iter() {
        let mut child_path = path.to_vec();
        child_path.push(key.clone());
        let scanned = match value {
            Document::String(s) => parse_scalar(s, &child_path, config)?,
            other => other,
        };
        result.insert(key, scanned);
    }
    Ok(result)
}

fn flow_sequence(
    items: Vec<Document>,
    path: &[String],
    context: &Context,
    stub: &Document,
    config: &Config,
) -> Result<(Document, bool), PoshError> {
    let mut result = Vec::with_capacity(items.len());
    let mut progressed = false;
    for item in items {
        let entry_path = named_entry_path(&item, path);
        let (flowed, did) = flow(item, &entry_path, context, stub, config)?;
        progressed |= did;
        result.push(flowed);
    }
    Ok((Document::Sequence(result), progressed))
}

fn named_entry_path(item: &Document, path: &[String]) -> Vec<String> {
    if let Some(name) = item.as_mapping().and_then(|m| m.get("name")).and_then(|v| v.as_str()) {
        if is_path_name(name) {
            let mut p = path.to_vec();
            p.push(name.to_string());
            return p;
        }
    }
    path.to_vec()
}

fn flow_scalar(
    s: String,
    path: &[String],
    context: &Context,
    stub: &Document,
    config: &Config,
) -> Result<(Document, bool), PoshError> {
    match parse_scalar(s, path, config)? {
        Document::Unresolved(u) => {
            // Try resolving immediately against the context this scalar was
            // found in, rather than always deferring to the next pass - an
            // expression with no forward dependency (e.g. a plain `merge`)
            // settles in the same pass it's discovered in.
            flow_unresolved(u, context, stub)
        }
        other => Ok((other, false)),
    }
}

/// Recognises a delimited expression in `s` and compiles it. Returns the
/// scalar unchanged if it embeds none.
fn parse_scalar(s: String, path: &[String], config: &Config) -> Result<Document, PoshError> {
    let inner = match delimiter::extract(&s, config) {
        Some(inner) => inner,
        None => return Ok(Document::String(s)),
    };

    let tokens = grammar::parse(&inner)?;
    let ast = compiler::compile(&inner, &tokens, path)?;
    Ok(Document::Unresolved(Unresolved { ast: Rc::new(ast), path: path.to_vec() }))
}

/// Re-evaluates a still-pending expression against `context` - always the
/// *current* ancestor context the flow engine is walking with at this call
/// site, never one captured when the node was first produced. That is
/// what lets one sibling's expression see another sibling's result once it
/// has settled in an earlier pass (see DESIGN.md).
fn flow_unresolved(u: Unresolved, context: &Context, stub: &Document) -> Result<(Document, bool), PoshError> {
    match evaluate(&u.ast, context, stub) {
        Some(resolved) => Ok((resolved, true)),
        None => Ok((Document::Unresolved(u), false)),
    }
}

/// Runs `flow` repeatedly until a pass makes no progress, mirroring
/// `for didFlow := true; didFlow; flowed, didFlow = flow(flowed) {}`.
pub fn flow_to_fixed_point(mut root: Document, stub: &Document, config: &Config) -> Result<Document, PoshError> {
    loop {
        let (flowed, progressed) = flow(root, &[], &Context::new(), stub, config)?;
        root = flowed;
        if !progressed {
            return Ok(root);
        }
    }
}
