/*
 * ==========================================================================
 * POSH - document merge engine
 * ==========================================================================
 *
 * File:     ast.rs
 * Purpose:  The typed expression tree the compiler (§ compiler.rs) produces
 *           and the evaluator consumes.
 *
 * Author:   Sam Wilcox
 * ==========================================================================
 */

use std::fmt;

/// A compiled embedded expression.
///
/// `Seq` and `Function` are transient compiler-stack markers (see
/// `compiler.rs`): `Seq` groups comma-separated arguments mid-parse and
/// `Function` carries a call's name between its `Name` token and the
/// matching `Call` reduction. Neither is ever handed to the evaluator in
/// a position where it would need to produce a value - if one surfaces
/// there, the resolution check reports it like any other stuck expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Ast {
    Auto(Vec<String>),
    Merge(Vec<String>),
    Reference(Vec<String>),
    IntLit(i64),
    StringLit(String),
    BoolLit(bool),
    Or(Box<Ast>, Box<Ast>),
    Concat(Box<Ast>, Box<Ast>),
    Add(Box<Ast>, Box<Ast>),
    Sub(Box<Ast>, Box<Ast>),
    List(Vec<Ast>),
    Call(String, Vec<Ast>),
    Seq(Vec<Ast>),
    Function(String),
}

impl fmt::Display for Ast {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ast::Auto(_) => write!(f, "auto"),
            Ast::Merge(_) => write!(f, "merge"),
            Ast::Reference(segments) => write!(f, "{}", segments.join(".")),
            Ast::IntLit(v) => write!(f, "{v}"),
            Ast::StringLit(s) => write!(f, "\"{s}\""),
            Ast::BoolLit(b) => write!(f, "{b}"),
            Ast::Or(a, b) => write!(f, "{a} || {b}"),
            Ast::Concat(a, b) => write!(f, "{a} {b}"),
            Ast::Add(a, b) => write!(f, "{a} + {b}"),
            Ast::Sub(a, b) => write!(f, "{a} - {b}"),
            Ast::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
            Ast::Call(name, args) => {
                write!(f, "{name}(")?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{arg}")?;
                }
                write!(f, ")")
            }
            Ast::Seq(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                Ok(())
            }
            Ast::Function(name) => write!(f, "{name}"),
        }
    }
}
