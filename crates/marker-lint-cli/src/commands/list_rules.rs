//! List rules command implementation.

use marker_lint_rules::all_rules;

/// Runs the list-rules command.
pub fn run() {
    println!("Available rules:\n");
    println!(
        "{:<8} {:<20} {:<28} Description",
        "Code", "Name", "Marker"
    );
    println!("{}", "-".repeat(100));

    for rule in all_rules() {
        println!(
            "{:<8} {:<20} {:<28} {}",
            rule.code(),
            rule.name(),
            rule.marker().unwrap_or("-"),
            rule.description()
        );
    }

    println!("\nPresets:");
    println!("  recommended  - MK001, MK002 (default)");
    println!("  strict       - MK001, MK002 with strict override hierarchy");
    println!("  all          - Every available rule");

    println!("\nUse --rules to filter specific rules, e.g.:");
    println!("  marker-lint check --rules internal-api");
    println!("  marker-lint check --rules MK001 --strict-hierarchy");
}
