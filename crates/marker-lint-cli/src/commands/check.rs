//! Check command implementation.

use anyhow::{anyhow, Context, Result};
use marker_lint_core::{Analyzer, Config, RuleBox};
use marker_lint_rules::{is_known_rule, rules_by_name, Preset};
use std::path::PathBuf;

use crate::config_resolver::ConfigSource;
use crate::{FailOn, OutputFormat};

/// Options of the `check` subcommand.
#[derive(Debug, Default)]
pub struct CheckOptions {
    /// Snapshot file or directory; falls back to `analyzer.root`.
    pub path: Option<PathBuf>,
    /// Output format.
    pub format: OutputFormat,
    /// Comma-separated rule names or codes.
    pub rules: Option<String>,
    /// Extra exclude globs.
    pub exclude: Vec<String>,
    /// Forces strict hierarchy semantics on every selected rule.
    pub strict_hierarchy: bool,
    /// Abort on malformed snapshots.
    pub fail_on_parse_error: bool,
    /// Lowest severity that fails the run.
    pub fail_on: FailOn,
}

impl CheckOptions {
    /// Directory searched for a project configuration file.
    #[must_use]
    pub fn project_dir(&self) -> PathBuf {
        match &self.path {
            Some(p) if p.is_file() => p
                .parent()
                .map_or_else(|| PathBuf::from("."), std::path::Path::to_path_buf),
            Some(p) => p.clone(),
            None => PathBuf::from("."),
        }
    }
}

/// Runs the check command.
///
/// Returns whether a violation at or above the `fail_on` threshold was
/// reported.
pub fn run(options: CheckOptions, source: &ConfigSource) -> Result<bool> {
    let mut config = load_config(source)?;

    let preset = match config.preset.as_deref() {
        Some(name) => name.parse::<Preset>().map_err(|e| anyhow!(e))?,
        None => Preset::default(),
    };

    let rules = select_rules(preset, options.rules.as_deref());
    if options.strict_hierarchy {
        force_strict_hierarchy(&mut config, &rules);
    }

    let mut builder = Analyzer::builder()
        .config(config)
        .excludes(options.exclude)
        .fail_on_parse_error(options.fail_on_parse_error);
    if let Some(path) = &options.path {
        builder = builder.root(path);
    }
    for rule in rules {
        builder = builder.rule_box(rule);
    }

    let analyzer = builder.build().context("Failed to build analyzer")?;

    tracing::info!(
        "Analyzing {} with {} rules ({:?} preset)",
        analyzer.root().display(),
        analyzer.rule_count(),
        preset
    );

    let result = analyzer.analyze().context("Analysis failed")?;

    super::output::print(&result, options.format)?;

    Ok(result.has_violations_at(options.fail_on.into()))
}

/// Loads the resolved configuration, or defaults.
fn load_config(source: &ConfigSource) -> Result<Config> {
    match source {
        ConfigSource::Default => Ok(Config::default()),
        other => {
            // Invariant: non-Default variants always have a path
            let p = other.path().context("resolved config has no path")?;
            if source.is_global() {
                tracing::info!("Using global config: {}", p.display());
            }
            Config::from_file(p).with_context(|| format!("Failed to load config: {}", p.display()))
        }
    }
}

/// Picks the preset's rules, narrowed by a `--rules` filter if given.
fn select_rules(preset: Preset, filter: Option<&str>) -> Vec<RuleBox> {
    let Some(filter) = filter else {
        return preset.rules();
    };

    let selectors: Vec<&str> = filter
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();
    for selector in selectors.iter().filter(|s| !is_known_rule(s)) {
        tracing::warn!("Unknown rule: {}", selector);
    }

    rules_by_name(preset.rules(), &selectors)
}

/// Sets `strict_hierarchy` for every selected rule, overriding the config file.
fn force_strict_hierarchy(config: &mut Config, rules: &[RuleBox]) {
    for rule in rules {
        config
            .rules
            .entry(rule.name().to_string())
            .or_default()
            .strict_hierarchy = Some(true);
    }
}
