//! Shared output formatting for lint results.

use anyhow::Result;
use marker_lint_core::{LintResult, Severity, ViolationDiagnostic};

use crate::OutputFormat;

/// Print lint results in the specified format.
pub fn print(result: &LintResult, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => print!("{}", render_text(result, true)),
        OutputFormat::Json => return print_json(result),
        OutputFormat::Compact => print_compact(result),
        OutputFormat::Fancy => print_fancy(result),
    }
    Ok(())
}

/// Renders each violation block followed by the summary line.
fn render_text(result: &LintResult, color: bool) -> String {
    let mut output = String::new();
    for violation in &result.violations {
        let block = violation.format();
        if color {
            let plain = format!("  {}: ", violation.severity);
            let painted = format!("  {}: ", paint(violation.severity));
            output.push_str(&block.replacen(&plain, &painted, 1));
        } else {
            output.push_str(&block);
        }
        output.push('\n');
    }
    output.push_str(&summary(result, color));
    output.push('\n');
    output
}

fn paint(severity: Severity) -> String {
    let code = match severity {
        Severity::Error => "31",
        Severity::Warning => "33",
        Severity::Info => "34",
    };
    format!("\x1b[{code}m{severity}\x1b[0m")
}

fn summary(result: &LintResult, color: bool) -> String {
    let (errors, warnings, infos) = result.count_by_severity();
    let line = format!(
        "Found {errors} error(s), {warnings} warning(s), {infos} info(s) in {} unit(s), {} reference(s)",
        result.units_checked, result.sites_checked
    );
    if !color {
        return line;
    }

    let summary_color = if errors > 0 {
        "\x1b[31m"
    } else if warnings > 0 {
        "\x1b[33m"
    } else {
        "\x1b[32m"
    };
    format!("{summary_color}{line}\x1b[0m")
}

fn print_json(result: &LintResult) -> Result<()> {
    let json = serde_json::to_string_pretty(result)?;
    println!("{json}");
    Ok(())
}

fn print_compact(result: &LintResult) {
    for violation in &result.violations {
        println!("{violation}");
    }
}

fn print_fancy(result: &LintResult) {
    for violation in &result.violations {
        let report = miette::Report::new(ViolationDiagnostic::from(violation));
        eprintln!("{report:?}");
    }
    println!("{}", summary(result, true));
}
