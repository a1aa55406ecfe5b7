/*
 * ==========================================================================
 * POSH - document merge engine
 * ==========================================================================
 *
 * File:     flow/resolution.rs
 * Purpose:  Walks a tree after the fixed point, confirming no embedded
 *           expression is still waiting to resolve.
 *
 * Author:   Sam Wilcox
 * ==========================================================================
 */

use crate::document::Document;
use crate::error::{PoshError, UnresolvedEntry};

/// Fails if any `Unresolved` node remains anywhere in `root`.
pub fn check(root: &Document) -> Result<(), PoshError> {
    let mut entries = Vec::new();
    walk(root, &mut entries);
    if entries.is_empty() {
        Ok(())
    } else {
        Err(PoshError::unresolved(entries))
    }
}

fn walk(node: &Document, entries: &mut Vec<UnresolvedEntry>) {
    match node {
        Document::Mapping(m) => {
            for (_, v) in m.iter() {
                walk(v, entries);
            }
        }
        Document::Sequence(items) => {
            for item in items {
                walk(item, entries);
            }
        }
        Document::Unresolved(u) => {
            entries.push(UnresolvedEntry { path: u.path.clone(), expression: u.ast.to_string() });
        }
        Document::String(_) | Document::Integer(_) | Document::Boolean(_) => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::load::load_str;
    use crate::flow::flow_to_fixed_point;
    use crate::config::Config;

    #[test]
    fn passes_when_nothing_unresolved() {
        let doc = load_str(r#"{"a": 1}"#).unwrap();
        assert!(check(&doc).is_ok());
    }

    #[test]
    fn fails_and_names_the_path_when_something_unresolved() {
        let template = load_str(r#"{"x": "((undefined))"}"#).unwrap();
        let stub = load_str("{}").unwrap();
        let flowed = flow_to_fixed_point(template, &stub, &Config::default()).unwrap();
        match check(&flowed) {
            Err(PoshError::Unresolved { entries }) => {
                assert_eq!(entries.len(), 1);
                assert_eq!(entries[0].path, vec!["x".to_string()]);
            }
            other => panic!("expected Unresolved error, got {other:?}"),
        }
    }
}
