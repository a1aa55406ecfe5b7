/*
 * ==========================================================================
 * POSH - document merge engine
 * ==========================================================================
 *
 * File:     error.rs
 * Purpose:  The error kinds the pipeline can fail with, per stage.
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

use std::fmt;

/// A 1-based line/column position within a scalar's embedded expression
/// text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub line: usize,
    pub column: usize,
}

impl Span {
    pub fn new(line: usize, column: usize) -> Self {
        Span { line, column }
    }

    /// Computes the line/column of a byte offset within `source`.
    pub fn from_offset(source: &str, offset: usize) -> Self {
        let mut line = 1;
        let mut column = 1;
        for ch in source[..offset.min(source.len())].chars() {
            if ch == '\n' {
                line += 1;
                column = 1;
            } else {
                column += 1;
            }
        }
        Span::new(line, column)
    }
}

/// One expression that never resolved by the fixed point.
#[derive(Debug, Clone)]
pub struct UnresolvedEntry {
    pub path: Vec<String>,
    pub expression: String,
}

/// The four ways this pipeline can fail.
#[derive(Debug, Clone)]
pub enum PoshError {
    /// The input document is malformed, has non-string keys, or contains
    /// a value the Document Model can't represent.
    Load { message: String },

    /// An embedded expression doesn't match the grammar.
    Parse { message: String, span: Span, source: String },

    /// Internal: the grammar parsed but the token stream surprised the
    /// compiler. Should never happen for output the grammar itself
    /// produced; exists as a defensive backstop.
    Compile { message: String },

    /// The fixed point was reached with expressions still unresolved.
    Unresolved { entries: Vec<UnresolvedEntry> },
}

impl PoshError {
    pub fn load(message: impl Into<String>) -> Self {
        PoshError::Load { message: message.into() }
    }

    pub fn parse(message: impl Into<String>, span: Span, source: impl Into<String>) -> Self {
        PoshError::Parse { message: message.into(), span, source: source.into() }
    }

    pub fn compile(message: impl Into<String>) -> Self {
        PoshError::Compile { message: message.into() }
    }

    pub fn unresolved(entries: Vec<UnresolvedEntry>) -> Self {
        PoshError::Unresolved { entries }
    }

    pub fn code(&self) -> &'static str {
        match self {
            PoshError::Load { .. } => "P_LOAD",
            PoshError::Parse { .. } => "P_PARSE",
            PoshError::Compile { .. } => "P_COMPILE",
            PoshError::Unresolved { .. } => "P_UNRESOLVED",
        }
    }

    /// The process exit code this error should produce. Distinct per
    /// kind; the external interface only requires non-zero.
    pub fn exit_code(&self) -> i32 {
        match self {
            PoshError::Load { .. } => 1,
            PoshError::Parse { .. } => 2,
            PoshError::Compile { .. } => 2,
            PoshError::Unresolved { .. } => 3,
        }
    }
}

impl fmt::Display for PoshError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PoshError::Load { message } => write!(f, "{message}"),
            PoshError::Parse { message, span, .. } => {
                write!(f, "{message} (line {}, column {})", span.line, span.column)
            }
            PoshError::Compile { message } => write!(f, "{message}"),
            PoshError::Unresolved { entries } => {
                write!(f, "{} expression(s) never resolved:", entries.len())?;
                for entry in entries {
                    write!(f, "\n  {}: {}", entry.path.join("."), entry.expression)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for PoshError {}
