/*
 * ==========================================================================
 * POSH - document merge engine
 * ==========================================================================
 *
 * File:     main.rs
 * Purpose:  CLI entry point: `posh --template <path> --stub <path>`.
 *
 * Author:   Sam Wilcox
 * ==========================================================================
 */

use std::fs;
use std::process::ExitCode;

use posh::config::Config;
use posh::diagnostics;
use posh::error::PoshError;
use posh::merge;

fn main() -> ExitCode {
    match run() {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            diagnostics::print(&err);
            ExitCode::from(err.exit_code() as u8)
        }
    }
}

fn run() -> Result<String, PoshError> {
    let args = std::env::args().skip(1);
    let config = Config::from_args(args)?;

    let template_text = fs::read_to_string(&config.template)
        .map_err(|e| PoshError::load(format!("reading template {}: {e}", config.template)))?;
    let stub_text =
        fs::read_to_string(&config.stub).map_err(|e| PoshError::load(format!("reading stub {}: {e}", config.stub)))?;

    merge(&template_text, &stub_text, &config)
}
