/*
 * ==========================================================================
 * POSH - document merge engine
 * ==========================================================================
 *
 * File:     flow/delimiter.rs
 * Purpose:  Recognises and strips the expression delimiter from a scalar
 *           string, the one place the document model's text touches an
 *           external formatting convention.
 *
 * Author:   Sam Wilcox
 * ==========================================================================
 */

use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::Config;

static DEFAULT_DELIMITER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\(\(\s*(.*?)\s*\)\)").expect("static delimiter regex is valid"));

/// Finds the first delimited run anywhere in `s` and returns its trimmed
/// inner text. An embedded expression is a *substring* of the scalar, not
/// necessarily the whole of it - unanchored, matching the convention this
/// is grounded on. Any text outside the matched run is not spliced back
/// in: the flow engine replaces the whole scalar with the expression's
/// result, the same as the implementation this is grounded on.
pub fn extract(s: &str, config: &Config) -> Option<String> {
    if config.uses_default_delimiter() {
        return DEFAULT_DELIMITER.captures(s).map(|c| c[1].to_string());
    }
    let pattern =
        format!("{}\\s*(.*?)\\s*{}", regex::escape(&config.delimiter_open), regex::escape(&config.delimiter_close));
    let re = Regex::new(&pattern).ok()?;
    re.captures(s).map(|c| c[1].to_string())
}
