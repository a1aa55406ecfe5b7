/*
 * ==========================================================================
 * POSH - document merge engine
 * ==========================================================================
 *
 * File:     tests/end_to_end.rs
 * Purpose:  Exercises the public `merge` entry point the way the CLI does,
 *           rather than the internal pipeline stages.
 *
 * Author:   Sam Wilcox
 * ==========================================================================
 */

use posh::config::Config;
use posh::merge;

fn resolve(template: &str, stub: &str) -> String {
    merge(template, stub, &Config::default()).expect("merge should succeed")
}

#[test]
fn resolves_a_full_manifest() {
    let template = r#"
    {
      "jobs": [
        {"name": "web", "resource_pool": "compute", "instances": 3},
        {"name": "worker", "resource_pool": "compute", "instances": 2}
      ],
      "resource_pools": [
        {"name": "compute", "size": "((auto))"}
      ],
      "greeting": "((\"hello \" site_name))",
      "site_name": "((merge))",
      "timeout": "((default_timeout || 30))"
    }"#;
    let stub = r#"{"site_name": "ord1"}"#;

    let output = resolve(template, stub);
    let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();

    assert_eq!(parsed["resource_pools"][0]["size"], 5);
    assert_eq!(parsed["greeting"], "hello ord1");
    assert_eq!(parsed["timeout"], 30);
}

#[test]
fn surfaces_unresolved_expressions_as_an_error() {
    let err = merge(r#"{"x": "((nowhere))"}"#, "{}", &Config::default()).unwrap_err();
    assert!(err.to_string().contains("nowhere"));
}

#[test]
fn rejects_malformed_embedded_expressions() {
    let err = merge(r#"{"x": "((1 +))"}"#, "{}", &Config::default()).unwrap_err();
    assert_eq!(err.code(), "P_PARSE");
}

#[test]
fn rejects_non_document_json_values() {
    let err = merge(r#"{"x": null}"#, "{}", &Config::default()).unwrap_err();
    assert_eq!(err.code(), "P_LOAD");
}
