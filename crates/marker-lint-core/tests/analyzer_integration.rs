//! Integration test: snapshot discovery and rule evaluation via Analyzer.
//!
//! Uses fixture snapshots under `tests/fixtures/` to verify the full
//! JSON → SymbolTable → MarkerRule → Analyzer pipeline.

use marker_lint_core::{Analyzer, AnalyzerError, Config, MarkerRule, Severity, UnitError};
use std::path::PathBuf;

fn fixture(dir: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(dir)
}

fn beta_rule() -> MarkerRule {
    MarkerRule::new("MK100", "beta-api")
        .marker("com.example.Beta")
        .summary("@Beta should not be used in application code")
        .link("https://example.com/beta")
}

#[test]
fn detects_marked_references_in_snapshots() {
    let analyzer = Analyzer::builder()
        .root(fixture("snapshots"))
        .rule(beta_rule())
        .build()
        .expect("analyzer should build");
    let result = analyzer.analyze().expect("analysis should succeed");

    // Notes.json is not a snapshot and is ignored.
    assert_eq!(result.units_checked, 1);
    assert_eq!(result.sites_checked, 4);

    let lines: Vec<usize> = result.violations.iter().map(|v| v.location.line).collect();
    assert_eq!(lines, vec![3, 9], "got {:#?}", result.violations);
    assert!(result
        .violations
        .iter()
        .all(|v| v.code == "MK100" && v.severity == Severity::Error));
    assert_eq!(result.violations[1].symbol.as_deref(), Some("com.example.Preview.run"));
}

#[test]
fn root_may_point_at_a_single_snapshot() {
    let analyzer = Analyzer::builder()
        .root(fixture("snapshots/app/Main.symbols.json"))
        .rule(beta_rule())
        .build()
        .expect("analyzer should build");
    let result = analyzer.analyze().expect("analysis should succeed");
    assert_eq!(result.units_checked, 1);
    assert_eq!(result.violations.len(), 2);
}

#[test]
fn malformed_snapshots_are_skipped_by_default() {
    let analyzer = Analyzer::builder()
        .root(fixture("broken"))
        .rule(beta_rule())
        .build()
        .expect("analyzer should build");
    let result = analyzer.analyze().expect("analysis should succeed");

    assert_eq!(result.units_checked, 1);
    assert_eq!(result.violations.len(), 2);
}

#[test]
fn malformed_snapshots_fail_when_requested() {
    let analyzer = Analyzer::builder()
        .root(fixture("broken"))
        .rule(beta_rule())
        .fail_on_parse_error(true)
        .build()
        .expect("analyzer should build");
    let err = analyzer.analyze().unwrap_err();

    assert!(matches!(err, AnalyzerError::Unit(UnitError::Parse { .. })));
    assert!(err.to_string().contains("cyclic"));
}

#[test]
fn config_overrides_reach_the_rule() {
    let config = Config::parse(
        r#"
[analyzer]
parallelism = 2

[rules.beta-api]
severity = "warning"
link = "https://example.com/override"
"#,
    )
    .expect("config should parse");

    let analyzer = Analyzer::builder()
        .root(fixture("snapshots"))
        .config(config)
        .rule(beta_rule())
        .build()
        .expect("analyzer should build");
    let result = analyzer.analyze().expect("analysis should succeed");

    assert_eq!(result.violations.len(), 2);
    for v in &result.violations {
        assert_eq!(v.severity, Severity::Warning);
        assert_eq!(v.link.as_deref(), Some("https://example.com/override"));
    }
}

#[test]
fn excluded_snapshots_are_not_loaded() {
    let analyzer = Analyzer::builder()
        .root(fixture("snapshots"))
        .exclude("**/app/**")
        .rule(beta_rule())
        .build()
        .expect("analyzer should build");
    let result = analyzer.analyze().expect("analysis should succeed");
    assert_eq!(result.units_checked, 0);
    assert!(result.violations.is_empty());
}
