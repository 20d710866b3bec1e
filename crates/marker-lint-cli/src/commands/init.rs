//! Init command implementation.

use anyhow::{bail, Context, Result};
use std::path::Path;

const DEFAULT_CONFIG: &str = r#"# marker-lint configuration

# Rule preset: recommended | strict | all
preset = "recommended"

[analyzer]
# Directory holding *.symbols.json snapshots (default: current directory)
# root = "./build/symbols"

# Glob patterns to exclude from analysis
exclude = [
    "**/generated/**",
]

# Worker threads for site evaluation (default: all cores)
# parallelism = 4

# Rule configurations
# Each rule can be enabled/disabled and have its severity overridden

[rules.experimental-api]
enabled = true
# severity = "warning"  # Override default severity
# link = "https://github.com/grpc/grpc-java"

[rules.internal-api]
enabled = true
# Only flag methods when every method they override is internal too
strict_hierarchy = false
# Source paths allowed to use internal APIs
# allow = ["io/grpc/**"]
"#;

/// Runs the init command.
pub fn run(force: bool) -> Result<()> {
    let config_path = Path::new("marker-lint.toml");
    write_config(config_path, force)?;

    println!("Created marker-lint.toml");
    println!("\nNext steps:");
    println!("  1. Edit marker-lint.toml to configure rules");
    println!("  2. Run: marker-lint check");

    Ok(())
}

fn write_config(config_path: &Path, force: bool) -> Result<()> {
    if config_path.exists() && !force {
        bail!(
            "Configuration file already exists at {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    std::fs::write(config_path, DEFAULT_CONFIG)
        .with_context(|| format!("Failed to write {}", config_path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use marker_lint_core::Config;
    use tempfile::TempDir;

    #[test]
    fn template_is_valid_config() {
        let config = Config::parse(DEFAULT_CONFIG).unwrap();
        assert_eq!(config.preset.as_deref(), Some("recommended"));
        assert!(config.is_rule_enabled("internal-api"));
        assert_eq!(config.rules["internal-api"].strict_hierarchy, Some(false));
    }

    #[test]
    fn refuses_to_overwrite_without_force() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("marker-lint.toml");
        std::fs::write(&path, "# mine\n").unwrap();

        assert!(write_config(&path, false).is_err());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "# mine\n");

        write_config(&path, true).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), DEFAULT_CONFIG);
    }
}
