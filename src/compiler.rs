/*
 * ==========================================================================
 * POSH - document merge engine
 * ==========================================================================
 *
 * File:     compiler.rs
 * Purpose:  Shift-reduces the grammar's reduction-order token stream into
 *           a typed `Ast`, using a single explicit stack.
 *
 * Author:   Sam Wilcox
 * ==========================================================================
 */

use crate::ast::Ast;
use crate::error::PoshError;
use crate::grammar::{GrammarToken, Rule};

enum StackItem {
    Expr(Ast),
    Function(String),
}

/// Compiles a token stream produced by `grammar::parse` into an `Ast`,
/// threading `path` through so `merge`/`auto` can record where in the
/// document tree they were embedded.
pub fn compile(source: &str, tokens: &[GrammarToken], path: &[String]) -> Result<Ast, PoshError> {
    let mut stack: Vec<StackItem> = Vec::new();

    // One frame per currently-open comma-separated scope (an `Arguments`
    // or `Contents`), pushed on `SeqOpen` and popped when that scope's
    // rule reduces. A single flag isn't enough: a list/call element that
    // is itself a list/call opens its own scope with its own commas, and
    // its `Expression` tokens must not consume a pending comma left over
    // from the *enclosing* scope.
    let mut comma_pending: Vec<bool> = Vec::new();

    for token in tokens {
        let text = &source[token.begin..token.end];
        match token.rule {
            Rule::Integer => {
                let cleaned: String = text.chars().filter(|c| *c != '_').collect();
                let value: i64 = cleaned
                    .parse()
                    .map_err(|_| PoshError::compile(format!("malformed integer literal: {text}")))?;
                stack.push(StackItem::Expr(Ast::IntLit(value)));
            }
            Rule::String => {
                let inner = &text[1..text.len() - 1];
                stack.push(StackItem::Expr(Ast::StringLit(inner.to_string())));
            }
            Rule::Boolean => {
                // Unreachable from this grammar (see grammar §4.2); kept
                // for fidelity with the original compile table.
                stack.push(StackItem::Expr(Ast::BoolLit(text == "true")));
            }
            Rule::Reference => {
                let segments = text.split('.').map(str::to_string).collect();
                stack.push(StackItem::Expr(Ast::Reference(segments)));
            }
            Rule::Merge => stack.push(StackItem::Expr(Ast::Merge(path.to_vec()))),
            Rule::Auto => stack.push(StackItem::Expr(Ast::Auto(path.to_vec()))),
            Rule::Name => {
                stack.push(StackItem::Function(text.to_string()));
            }
            Rule::Or => {
                let rhs = pop_expr(&mut stack)?;
                let lhs = pop_expr(&mut stack)?;
                stack.push(StackItem::Expr(Ast::Or(Box::new(lhs), Box::new(rhs))));
            }
            Rule::Concatenation => {
                let rhs = pop_expr(&mut stack)?;
                let lhs = pop_expr(&mut stack)?;
                stack.push(StackItem::Expr(Ast::Concat(Box::new(lhs), Box::new(rhs))));
            }
            Rule::Addition => {
                let rhs = pop_expr(&mut stack)?;
                let lhs = pop_expr(&mut stack)?;
                stack.push(StackItem::Expr(Ast::Add(Box::new(lhs), Box::new(rhs))));
            }
            Rule::Subtraction => {
                let rhs = pop_expr(&mut stack)?;
                let lhs = pop_expr(&mut stack)?;
                stack.push(StackItem::Expr(Ast::Sub(Box::new(lhs), Box::new(rhs))));
            }
            Rule::SeqOpen => comma_pending.push(false),
            Rule::Comma => {
                if let Some(top) = comma_pending.last_mut() {
                    *top = true;
                }
            }
            Rule::Expression => {
                if let Some(top) = comma_pending.last_mut() {
                    if *top {
                        let expr = pop_expr(&mut stack)?;
                        let mut seq = pop_seq(&mut stack)?;
                        seq.push(expr);
                        stack.push(StackItem::Expr(Ast::Seq(seq)));
                        *top = false;
                    }
                }
            }
            Rule::Call => {
                let args = pop_seq(&mut stack)?;
                let name = pop_function(&mut stack)?;
                stack.push(StackItem::Expr(Ast::Call(name, args)));
            }
            Rule::List => {
                let items = pop_seq(&mut stack)?;
                stack.push(StackItem::Expr(Ast::List(items)));
            }
            Rule::Arguments | Rule::Contents => {
                comma_pending.pop();
            }
            Rule::Grouped | Rule::Level0 | Rule::Level1 | Rule::Level2 | Rule::Ws => {
                // Structural no-ops: the grammar emits a token for every
                // production it invokes, but these carry no information
                // the compiler needs.
            }
            Rule::Posh => {
                let expr = pop_expr(&mut stack)?;
                if !stack.is_empty() {
                    return Err(PoshError::compile("stack not empty after Posh reduction"));
                }
                return Ok(expr);
            }
        }
    }

    Err(PoshError::compile("token stream ended without a Posh reduction"))
}

fn pop_expr(stack: &mut Vec<StackItem>) -> Result<Ast, PoshError> {
    match stack.pop() {
        Some(StackItem::Expr(e)) => Ok(e),
        _ => Err(PoshError::compile("expected an expression on the stack")),
    }
}

/// If the top of the stack is already a `Seq` (built by a prior comma),
/// takes its items; otherwise wraps the single popped expression as a
/// one-element sequence.
fn pop_seq(stack: &mut Vec<StackItem>) -> Result<Vec<Ast>, PoshError> {
    match stack.pop() {
        Some(StackItem::Expr(Ast::Seq(items))) => Ok(items),
        Some(StackItem::Expr(e)) => Ok(vec![e]),
        _ => Err(PoshError::compile("expected an expression on the stack for a sequence")),
    }
}

fn pop_function(stack: &mut Vec<StackItem>) -> Result<String, PoshError> {
    match stack.pop() {
        Some(StackItem::Function(name)) => Ok(name),
        _ => Err(PoshError::compile("call reduction found no function name on the stack")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar;

    fn compile_str(source: &str) -> Ast {
        let tokens = grammar::parse(source).unwrap();
        compile(source, &tokens, &["x".to_string()]).unwrap()
    }

    #[test]
    fn compiles_integer_literal() {
        assert_eq!(compile_str("42"), Ast::IntLit(42));
    }

    #[test]
    fn compiles_underscored_integer() {
        assert_eq!(compile_str("1_000"), Ast::IntLit(1000));
    }

    #[test]
    fn compiles_string_literal_without_quotes() {
        assert_eq!(compile_str("\"hi\""), Ast::StringLit("hi".to_string()));
    }

    #[test]
    fn compiles_dotted_reference() {
        assert_eq!(compile_str("a.b"), Ast::Reference(vec!["a".to_string(), "b".to_string()]));
    }

    #[test]
    fn compiles_merge_with_path() {
        assert_eq!(compile_str("merge"), Ast::Merge(vec!["x".to_string()]));
    }

    #[test]
    fn compiles_auto_with_path() {
        assert_eq!(compile_str("auto"), Ast::Auto(vec!["x".to_string()]));
    }

    #[test]
    fn compiles_or_fallback() {
        assert_eq!(
            compile_str("foo || 7"),
            Ast::Or(Box::new(Ast::Reference(vec!["foo".to_string()])), Box::new(Ast::IntLit(7)))
        );
    }

    #[test]
    fn compiles_call_with_multiple_arguments() {
        match compile_str("foo(1, 2, 3)") {
            Ast::Call(name, args) => {
                assert_eq!(name, "foo");
                assert_eq!(args, vec![Ast::IntLit(1), Ast::IntLit(2), Ast::IntLit(3)]);
            }
            other => panic!("expected Call, got {other:?}"),
        }
    }

    #[test]
    fn compiles_list_literal() {
        assert_eq!(compile_str("[1, 2]"), Ast::List(vec![Ast::IntLit(1), Ast::IntLit(2)]));
    }

    #[test]
    fn compiles_nested_grouping() {
        assert_eq!(compile_str("(1 + 2)"), Ast::Add(Box::new(Ast::IntLit(1)), Box::new(Ast::IntLit(2))));
    }

    #[test]
    fn compiles_list_with_a_nested_list_as_a_non_first_element() {
        assert_eq!(
            compile_str("[1, [2, 3]]"),
            Ast::List(vec![Ast::IntLit(1), Ast::List(vec![Ast::IntLit(2), Ast::IntLit(3)])])
        );
    }

    #[test]
    fn compiles_call_with_a_nested_call_as_a_non_first_argument() {
        match compile_str("foo(1, bar(2, 3))") {
            Ast::Call(name, args) => {
                assert_eq!(name, "foo");
                assert_eq!(args.len(), 2);
                assert_eq!(args[0], Ast::IntLit(1));
                match &args[1] {
                    Ast::Call(inner_name, inner_args) => {
                        assert_eq!(inner_name, "bar");
                        assert_eq!(inner_args, &vec![Ast::IntLit(2), Ast::IntLit(3)]);
                    }
                    other => panic!("expected nested Call, got {other:?}"),
                }
            }
            other => panic!("expected Call, got {other:?}"),
        }
    }
}
