/*
 * ==========================================================================
 * POSH - document merge engine
 * ==========================================================================
 *
 * File:     lib.rs
 * Purpose:  Crate root. Wires the Document Model, Expression Grammar, AST
 *           Compiler, Evaluator and Flow Engine together, plus the loader,
 *           diagnostics and configuration that surround them.
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

pub mod ast;
pub mod compiler;
pub mod config;
pub mod context;
pub mod diagnostics;
pub mod document;
pub mod error;
pub mod evaluator;
pub mod flow;
pub mod grammar;

use config::Config;
use document::load::load_str;
use error::PoshError;

/// Runs the full pipeline: load both documents, flow the template to a
/// fixed point against the stub, confirm nothing is left unresolved, and
/// return the resolved document serialised as JSON.
pub fn merge(template_text: &str, stub_text: &str, config: &Config) -> Result<String, PoshError> {
    let template = load_str(template_text)?;
    let stub = load_str(stub_text)?;

    let resolved = flow::flow_to_fixed_point(template, &stub, config)?;
    flow::resolution::check(&resolved)?;

    document::load::to_json_string(&resolved)
}
