/*
 * ==========================================================================
 * POSH - document merge engine
 * ==========================================================================
 *
 * File:     diagnostics.rs
 * Purpose:  Renders a `PoshError` as a human-readable, source-pointing
 *           message on stderr.
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

use crate::error::PoshError;

/// Prints `error` to stderr in a compiler-style format: a one-line header
/// naming its code and message, then for parse errors the offending
/// expression text with a caret under the failing column.
///
/// # Output example
/// ```text
/// error[P_PARSE]: unexpected character '%'
///   --> expression:1:5
///    |
///  1 | foo % bar
///    |     ^
/// ```
pub fn print(error: &PoshError) {
    match error {
        PoshError::Parse { message, span, source } => {
            eprintln!("error[{}]: {}", error.code(), message);
            eprintln!("  --> expression:{}:{}", span.line, span.column);
            eprintln!("   |");
            let line_text = source.lines().nth(span.line.saturating_sub(1)).unwrap_or("");
            eprintln!("{:>3} | {}", span.line, line_text);
            let mut underline = String::new();
            for _ in 1..span.column {
                underline.push(' ');
            }
            underline.push('^');
            eprintln!("   | {underline}");
        }
        PoshError::Unresolved { entries } => {
            eprintln!("error[{}]: {} expression(s) never resolved", error.code(), entries.len());
            for entry in entries {
                eprintln!("  at {}: {}", entry.path.join("."), entry.expression);
            }
        }
        PoshError::Load { message } => {
            eprintln!("error[{}]: {}", error.code(), message);
        }
        PoshError::Compile { message } => {
            eprintln!("error[{}]: {}", error.code(), message);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Span;

    #[test]
    fn prints_parse_error_without_panicking() {
        let err = PoshError::parse("unexpected character", Span::new(1, 5), "foo % bar");
        print(&err);
    }
}
