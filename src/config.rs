/*
 * ==========================================================================
 * POSH - document merge engine
 * ==========================================================================
 *
 * File:     config.rs
 * Purpose:  CLI configuration: the two required document paths and the
 *           (parameterised) expression delimiter.
 *
 * Author:   Sam Wilcox
 * ==========================================================================
 */

use crate::error::PoshError;

#[derive(Debug, Clone)]
pub struct Config {
    pub template: String,
    pub stub: String,
    pub delimiter_open: String,
    pub delimiter_close: String,
}

impl Config {
    pub fn uses_default_delimiter(&self) -> bool {
        self.delimiter_open == "((" && self.delimiter_close == "))"
    }

    /// Parses `--template <path> --stub <path>` from the given arguments
    /// (excluding argv[0]). Neither flag has a default; both are
    /// required, matching the external interface's two-flag surface.
    pub fn from_args<I: IntoIterator<Item = String>>(args: I) -> Result<Config, PoshError> {
        let mut template = None;
        let mut stub = None;
        let mut iter = args.into_iter();

        while let Some(arg) = iter.next() {
            match arg.as_str() {
                "--template" => {
                    template = Some(iter.next().ok_or_else(|| PoshError::load("--template requires a path"))?);
                }
                "--stub" => {
                    stub = Some(iter.next().ok_or_else(|| PoshError::load("--stub requires a path"))?);
                }
                other => {
                    return Err(PoshError::load(format!("unrecognised argument: {other}")));
                }
            }
        }

        Ok(Config {
            template: template.ok_or_else(|| PoshError::load("--template is required"))?,
            stub: stub.ok_or_else(|| PoshError::load("--stub is required"))?,
            delimiter_open: "((".to_string(),
            delimiter_close: "))".to_string(),
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            template: String::new(),
            stub: String::new(),
            delimiter_open: "((".to_string(),
            delimiter_close: "))".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn parses_both_required_flags() {
        let config = Config::from_args(args(&["--template", "t.json", "--stub", "s.json"])).unwrap();
        assert_eq!(config.template, "t.json");
        assert_eq!(config.stub, "s.json");
    }

    #[test]
    fn missing_stub_is_an_error() {
        assert!(Config::from_args(args(&["--template", "t.json"])).is_err());
    }

    #[test]
    fn unknown_flag_is_an_error() {
        assert!(Config::from_args(args(&["--bogus", "x"])).is_err());
    }
}
