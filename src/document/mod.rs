/*
 * ==========================================================================
 * POSH - document merge engine
 * ==========================================================================
 *
 * File:     document/mod.rs
 * Purpose:  The uniform tagged tree that every template, stub and result
 *           is expressed in, plus the path-based lookup used by both the
 *           evaluator and the flow engine.
 *
 * Author:   Sam Wilcox
 * Email:    sam@pawx-lang.com
 * Website:  https://www.pawx-lang.com
 * GitHub:   https://github.com/samwilcox/pawx
 *
 * --------------------------------------------------------------------------
 *  LICENSE
 * --------------------------------------------------------------------------
 * This file is part of the PAWX programming language project.
 *
 * PAWX is dual-licensed under the terms of:
 *   - The MIT License
 *   - The Apache License, Version 2.0
 *
 * You may choose either license to govern your use of this software.
 *
 * Full license text available at:
 *    https://license.pawx-lang.com
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under these licenses is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 * ==========================================================================
 */

pub mod load;

use std::rc::Rc;

use crate::ast::Ast;

/// An ordered, string-keyed collection of document nodes.
///
/// Backed by a `Vec` of pairs rather than a `HashMap` so that key order
/// (insertion order) survives every rebuild the flow engine performs.
#[derive(Debug, Clone, PartialEq)]
pub struct Mapping(Vec<(String, Document)>);

impl Mapping {
    pub fn new() -> Self {
        Mapping(Vec::new())
    }

    pub fn get(&self, key: &str) -> Option<&Document> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn insert(&mut self, key: String, value: Document) {
        self.0.push((key, value));
    }

    pub fn iter(&self) -> impl Iterator<Item = &(String, Document)> {
        self.0.iter()
    }

    pub fn into_iter(self) -> impl Iterator<Item = (String, Document)> {
        self.0.into_iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl Default for Mapping {
    fn default() -> Self {
        Self::new()
    }
}

impl FromIterator<(String, Document)> for Mapping {
    fn from_iter<I: IntoIterator<Item = (String, Document)>>(iter: I) -> Self {
        Mapping(iter.into_iter().collect())
    }
}

/// A scalar string embedding an expression that has not yet produced a
/// value, captured together with what the evaluator needs to retry it:
/// the compiled expression and its originating path.
///
/// Deliberately holds no context of its own. Forward and mutual references
/// between siblings only resolve if every retry is evaluated against the
/// *current* ancestor context the flow engine is walking with, not a
/// snapshot frozen at the pass where this node was first produced - a
/// stored snapshot would keep seeing whatever the referenced sibling
/// looked like back then (see DESIGN.md).
///
/// This wrapper is substituted outright by the flow engine once it
/// resolves; it never mutates in place (see DESIGN.md for the tradeoff
/// against the in-place-mutation alternative).
#[derive(Debug, Clone, PartialEq)]
pub struct Unresolved {
    pub ast: Rc<Ast>,
    pub path: Vec<String>,
}

/// A node in the document tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Document {
    Mapping(Mapping),
    Sequence(Vec<Document>),
    String(String),
    Integer(i64),
    Boolean(bool),
    Unresolved(Unresolved),
}

impl Document {
    pub fn as_mapping(&self) -> Option<&Mapping> {
        match self {
            Document::Mapping(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[Document]> {
        match self {
            Document::Sequence(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Document::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Document::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn is_unresolved(&self) -> bool {
        matches!(self, Document::Unresolved(_))
    }
}

/// A path segment is valid as a named sequence-element address only if it
/// is non-empty and every character is alphanumeric or `_`.
pub fn is_path_name(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Descends `root` step by step following `path`, per the lookup rules in
/// the document model: mapping keys resolve directly, sequence elements
/// resolve by their scalar `name` field, anything else fails.
///
/// Pure: never mutates `root`. Returns `None` (not an error) when the path
/// cannot be followed to completion - callers decide whether that means
/// "defer to next pass" or "genuinely absent".
pub fn find_in_path(path: &[String], root: &Document) -> Option<Document> {
    let mut here = root.clone();
    for step in path {
        here = next_step(step, &here)?;
    }
    Some(here)
}

fn next_step(step: &str, here: &Document) -> Option<Document> {
    match here {
        Document::Mapping(m) => m.get(step).cloned(),
        Document::Sequence(items) => items.iter().find_map(|item| {
            let m = item.as_mapping()?;
            let name = m.get("name")?.as_str()?;
            if name == step {
                Some(item.clone())
            } else {
                None
            }
        }),
        // Still pending under the outright-substitution design; see
        // DESIGN.md. Defers to the next pass rather than erroring.
        Document::Unresolved(_) => None,
        _ => None,
    }
}
