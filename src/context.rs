/*
 * ==========================================================================
 * POSH - document merge engine
 * ==========================================================================
 *
 * File:     context.rs
 * Purpose:  The ancestor scope stack an embedded expression resolves
 *           identifiers against, innermost-first.
 *
 * Author:   Sam Wilcox
 * ==========================================================================
 */

use std::rc::Rc;

use crate::document::{Document, Mapping};

/// A stack of ancestor mappings, deepest last. Cloning a `Context` is an
/// `Rc` bump per entry, not a deep copy, so extending it on every recursive
/// descent into a child mapping stays cheap.
#[derive(Debug, Clone, PartialEq)]
pub struct Context(Vec<Rc<Mapping>>);

impl Context {
    pub fn new() -> Self {
        Context(Vec::new())
    }

    /// Returns a new context with `mapping` pushed as the innermost scope.
    pub fn push(&self, mapping: Rc<Mapping>) -> Context {
        let mut next = self.0.clone();
        next.push(mapping);
        Context(next)
    }

    /// Resolves `name` by searching innermost-to-outermost, returning a
    /// clone of the first match.
    pub fn resolve(&self, name: &str) -> Option<Document> {
        for mapping in self.0.iter().rev() {
            if let Some(v) = mapping.get(name) {
                return Some(v.clone());
            }
        }
        None
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}
