/*
 * ==========================================================================
 * POSH - document merge engine
 * ==========================================================================
 *
 * File:     grammar/mod.rs
 * Purpose:  Entry point for the embedded expression grammar: a backtracking
 *           recursive-descent (PEG-style) parser that lowers source text
 *           into a linear, reduction-order token stream.
 *
 * Submodules:
 *  - `rules`  the `Rule` tags and the `GrammarToken` they're carried in.
 *  - `parser` the recursive-descent parser itself.
 *
 * Author:   Sam Wilcox
 * ==========================================================================
 */

pub mod parser;
pub mod rules;

pub use parser::parse;
pub use rules::{GrammarToken, Rule};
