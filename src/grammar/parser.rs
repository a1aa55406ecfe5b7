/*
 * ==========================================================================
 * POSH - document merge engine
 * ==========================================================================
 *
 * File:     grammar/parser.rs
 * Purpose:  The embedded expression grammar, implemented as a backtracking
 *           recursive-descent parser.
 *
 * Parsing order follows the grammar's own precedence levels:
 *
 *   Expression -> Level2 -> (Or | Level1) -> (Concatenation | Addition |
 *     Subtraction | Level0) -> (Grouped | Call | String | Integer | List |
 *     merge | auto | Reference)
 *
 * Every production, on success, appends one `GrammarToken` spanning the
 * source it consumed (see `rules.rs`); on failure it restores both the
 * byte cursor and the token buffer, so a dead alternative leaves no trace.
 *
 * Author:   Sam Wilcox
 * ==========================================================================
 */

use crate::error::{PoshError, Span};

use super::rules::{GrammarToken, Rule};

struct Parser<'a> {
    input: &'a str,
    bytes: &'a [u8],
    pos: usize,
    tokens: Vec<GrammarToken>,
}

/// Parses `source` as a single embedded expression, returning its
/// reduction-order token stream.
pub fn parse(source: &str) -> Result<Vec<GrammarToken>, PoshError> {
    let mut parser = Parser { input: source, bytes: source.as_bytes(), pos: 0, tokens: Vec::new() };
    match parser.posh() {
        Some(()) => Ok(parser.tokens),
        None => {
            let span = Span::from_offset(source, parser.pos);
            Err(PoshError::parse("expression does not match the grammar", span, source))
        }
    }
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn advance(&mut self) {
        if let Some(c) = self.peek() {
            self.pos += c.len_utf8();
        }
    }

    fn at_eof(&self) -> bool {
        self.pos >= self.bytes.len()
    }

    fn literal(&mut self, text: &str) -> Option<()> {
        if self.input[self.pos..].starts_with(text) {
            self.pos += text.len();
            Some(())
        } else {
            None
        }
    }

    /// Runs `body`, wrapping a successful match in a token spanning the
    /// source consumed. On failure, restores the cursor and discards any
    /// tokens `body` emitted before failing.
    fn emit<F>(&mut self, rule: Rule, body: F) -> Option<()>
    where
        F: FnOnce(&mut Self) -> Option<()>,
    {
        let start = self.pos;
        let mark = self.tokens.len();
        match body(self) {
            Some(()) => {
                self.tokens.push(GrammarToken { rule, begin: start, end: self.pos });
                Some(())
            }
            None => {
                self.pos = start;
                self.tokens.truncate(mark);
                None
            }
        }
    }

    fn is_name_char(c: char) -> bool {
        c.is_ascii_alphanumeric() || c == '_'
    }

    fn is_ws_char(c: char) -> bool {
        matches!(c, ' ' | '\t' | '\n' | '\r')
    }

    /// Consumes zero or more whitespace characters without requiring any.
    fn ws(&mut self) -> Option<()> {
        self.emit(Rule::Ws, |p| {
            while p.peek().map_or(false, Self::is_ws_char) {
                p.advance();
            }
            Some(())
        })
    }

    /// Consumes one or more whitespace characters; fails if none present.
    /// Not itself a named rule - no token is emitted (see grammar §4.2).
    fn ws_plus(&mut self) -> Option<()> {
        let start = self.pos;
        while self.peek().map_or(false, Self::is_ws_char) {
            self.advance();
        }
        if self.pos > start {
            Some(())
        } else {
            None
        }
    }

    /// Matches `[A-Za-z0-9_]+` without emitting a token. Used inline by
    /// `Reference`, where only the enclosing rule's dotted span is a
    /// token - a `Name` token here would also push a spurious function
    /// marker in the compiler (see grammar §4.2).
    fn raw_name(&mut self) -> bool {
        let start = self.pos;
        while self.peek().map_or(false, Self::is_name_char) {
            self.advance();
        }
        self.pos > start
    }

    fn posh(&mut self) -> Option<()> {
        self.emit(Rule::Posh, |p| {
            p.expression()?;
            if p.at_eof() {
                Some(())
            } else {
                None
            }
        })
    }

    fn expression(&mut self) -> Option<()> {
        self.emit(Rule::Expression, |p| p.level2())
    }

    fn level2(&mut self) -> Option<()> {
        self.emit(Rule::Level2, |p| p.or_expr().or_else(|| p.level1()))
    }

    fn or_expr(&mut self) -> Option<()> {
        self.emit(Rule::Or, |p| {
            p.level1()?;
            p.ws()?;
            p.literal("||")?;
            p.ws()?;
            p.expression()?;
            Some(())
        })
    }

    fn level1(&mut self) -> Option<()> {
        self.emit(Rule::Level1, |p| {
            p.concatenation().or_else(|| p.addition()).or_else(|| p.subtraction()).or_else(|| p.level0())
        })
    }

    fn concatenation(&mut self) -> Option<()> {
        self.emit(Rule::Concatenation, |p| {
            p.level0()?;
            p.ws_plus()?;
            p.level1()?;
            Some(())
        })
    }

    fn addition(&mut self) -> Option<()> {
        self.emit(Rule::Addition, |p| {
            p.level0()?;
            p.ws()?;
            p.literal("+")?;
            p.ws()?;
            p.level1()?;
            Some(())
        })
    }

    fn subtraction(&mut self) -> Option<()> {
        self.emit(Rule::Subtraction, |p| {
            p.level0()?;
            p.ws()?;
            p.literal("-")?;
            p.ws()?;
            p.level1()?;
            Some(())
        })
    }

    fn level0(&mut self) -> Option<()> {
        self.emit(Rule::Level0, |p| {
            p.grouped()
                .or_else(|| p.call())
                .or_else(|| p.string_lit())
                .or_else(|| p.integer())
                .or_else(|| p.list())
                .or_else(|| p.merge_kw())
                .or_else(|| p.auto_kw())
                .or_else(|| p.reference())
        })
    }

    fn grouped(&mut self) -> Option<()> {
        self.emit(Rule::Grouped, |p| {
            p.literal("(")?;
            p.expression()?;
            p.literal(")")?;
            Some(())
        })
    }

    fn call(&mut self) -> Option<()> {
        self.emit(Rule::Call, |p| {
            p.name()?;
            p.literal("(")?;
            p.arguments()?;
            p.literal(")")?;
            Some(())
        })
    }

    fn name(&mut self) -> Option<()> {
        self.emit(Rule::Name, |p| if p.raw_name() { Some(()) } else { None })
    }

    /// Marks the start of a comma-separated scope, before its first
    /// `Expression`. Zero-width; exists only so the compiler can tell apart
    /// nested scopes sharing the same flat token stream. Pushed directly
    /// rather than through `emit`, since it always succeeds - if the
    /// enclosing `Arguments`/`Contents` ends up failing, the enclosing
    /// `emit`'s own rollback truncates this token along with the rest.
    fn seq_open(&mut self) {
        self.tokens.push(GrammarToken { rule: Rule::SeqOpen, begin: self.pos, end: self.pos });
    }

    fn arguments(&mut self) -> Option<()> {
        self.emit(Rule::Arguments, |p| {
            p.seq_open();
            p.expression()?;
            p.comma_separated_rest()
        })
    }

    fn contents(&mut self) -> Option<()> {
        self.emit(Rule::Contents, |p| {
            p.seq_open();
            p.expression()?;
            p.comma_separated_rest()
        })
    }

    /// Shared tail of `Arguments`/`Contents`: `("," ws Expression)*`.
    fn comma_separated_rest(&mut self) -> Option<()> {
        loop {
            let save_pos = self.pos;
            let save_len = self.tokens.len();
            if self.comma().is_some() && self.ws().is_some() && self.expression().is_some() {
                continue;
            }
            self.pos = save_pos;
            self.tokens.truncate(save_len);
            break;
        }
        Some(())
    }

    fn comma(&mut self) -> Option<()> {
        self.emit(Rule::Comma, |p| p.literal(","))
    }

    fn integer(&mut self) -> Option<()> {
        self.emit(Rule::Integer, |p| {
            let start = p.pos;
            while p.peek().map_or(false, |c| c.is_ascii_digit() || c == '_') {
                p.advance();
            }
            if p.pos > start {
                Some(())
            } else {
                None
            }
        })
    }

    fn string_lit(&mut self) -> Option<()> {
        self.emit(Rule::String, |p| {
            p.literal("\"")?;
            while let Some(c) = p.peek() {
                if c == '"' {
                    break;
                }
                p.advance();
            }
            p.literal("\"")?;
            Some(())
        })
    }

    fn list(&mut self) -> Option<()> {
        self.emit(Rule::List, |p| {
            p.literal("[")?;
            p.contents()?;
            p.literal("]")?;
            Some(())
        })
    }

    fn merge_kw(&mut self) -> Option<()> {
        self.emit(Rule::Merge, |p| p.literal("merge"))
    }

    fn auto_kw(&mut self) -> Option<()> {
        self.emit(Rule::Auto, |p| p.literal("auto"))
    }

    fn reference(&mut self) -> Option<()> {
        self.emit(Rule::Reference, |p| {
            if !p.raw_name() {
                return None;
            }
            loop {
                let save = p.pos;
                if p.literal(".").is_some() && p.raw_name() {
                    continue;
                }
                p.pos = save;
                break;
            }
            Some(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rules(tokens: &[GrammarToken]) -> Vec<Rule> {
        tokens.iter().map(|t| t.rule).collect()
    }

    #[test]
    fn parses_bare_reference() {
        let tokens = parse("foo.bar").unwrap();
        assert!(rules(&tokens).contains(&Rule::Reference));
        let reference = tokens.iter().find(|t| t.rule == Rule::Reference).unwrap();
        assert_eq!(&"foo.bar"[reference.begin..reference.end], "foo.bar");
    }

    #[test]
    fn parses_merge_keyword() {
        let tokens = parse("merge").unwrap();
        assert_eq!(rules(&tokens).last(), Some(&Rule::Posh));
        assert!(rules(&tokens).contains(&Rule::Merge));
    }

    #[test]
    fn merge_prefix_does_not_allow_trailing_garbage() {
        // "merge" is tried before Reference in Level0's ordered choice;
        // once it commits, a longer identifier like "mergex" cannot be
        // recovered as a Reference from that same starting position -
        // ordinary PEG ordered-choice semantics, faithfully preserved.
        assert!(parse("mergex").is_err());
    }

    #[test]
    fn parses_call_with_arguments() {
        let tokens = parse("foo(1, 2)").unwrap();
        assert!(rules(&tokens).contains(&Rule::Call));
        assert!(rules(&tokens).contains(&Rule::Comma));
        let name_tokens: Vec<_> = tokens.iter().filter(|t| t.rule == Rule::Name).collect();
        assert_eq!(name_tokens.len(), 1);
    }

    #[test]
    fn reference_segments_do_not_emit_name_tokens() {
        let tokens = parse("a.b.c").unwrap();
        assert!(!rules(&tokens).contains(&Rule::Name));
    }

    #[test]
    fn parses_or_fallback() {
        let tokens = parse("foo || 7").unwrap();
        assert!(rules(&tokens).contains(&Rule::Or));
    }

    #[test]
    fn parses_concatenation_requires_space() {
        assert!(parse("\"a\" \"b\"").is_ok());
        assert!(parse("\"a\"\"b\"").is_err());
    }

    #[test]
    fn parses_string_with_quotes_stripped_by_compiler_not_parser() {
        let tokens = parse("\"hi\"").unwrap();
        let string_tok = tokens.iter().find(|t| t.rule == Rule::String).unwrap();
        assert_eq!(&"\"hi\""[string_tok.begin..string_tok.end], "\"hi\"");
    }

    #[test]
    fn integer_allows_underscores() {
        let tokens = parse("1_000").unwrap();
        assert!(rules(&tokens).contains(&Rule::Integer));
    }

    #[test]
    fn rejects_trailing_garbage() {
        assert!(parse("foo bar(").is_err());
    }

    #[test]
    fn parses_nested_list() {
        let tokens = parse("[1, [2, 3]]").unwrap();
        let list_count = tokens.iter().filter(|t| t.rule == Rule::List).count();
        assert_eq!(list_count, 2);
    }
}
