//! Core analyzer for orchestrating lint execution.

use crate::config::Config;
use crate::rule::{Rule, RuleBox};
use crate::site::ReferenceSite;
use crate::types::{LintResult, Violation};
use crate::unit::{is_snapshot, CompilationUnit, UnitError, SNAPSHOT_SUFFIX};

use rayon::prelude::*;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors that can occur during analysis.
#[derive(Debug, Error)]
pub enum AnalyzerError {
    /// IO error reading files.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A snapshot could not be loaded.
    #[error(transparent)]
    Unit(#[from] UnitError),

    /// Glob pattern error.
    #[error("Invalid glob pattern: {0}")]
    Glob(#[from] glob::PatternError),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),

    /// The worker pool could not be created.
    #[error("Failed to start worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// Builder for configuring an [`Analyzer`].
#[derive(Default)]
pub struct AnalyzerBuilder {
    root: Option<PathBuf>,
    rules: Vec<RuleBox>,
    exclude_patterns: Vec<String>,
    config: Option<Config>,
    parallelism: Option<usize>,
    fail_on_parse_error: bool,
}

impl AnalyzerBuilder {
    /// Creates a new builder with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the root directory to search for snapshots.
    #[must_use]
    pub fn root(mut self, path: impl Into<PathBuf>) -> Self {
        self.root = Some(path.into());
        self
    }

    /// Adds a rule to the analyzer.
    #[must_use]
    pub fn rule<R: Rule + 'static>(mut self, rule: R) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    /// Adds a boxed rule to the analyzer.
    #[must_use]
    pub fn rule_box(mut self, rule: RuleBox) -> Self {
        self.rules.push(rule);
        self
    }

    /// Adds an exclude glob pattern.
    #[must_use]
    pub fn exclude(mut self, pattern: impl Into<String>) -> Self {
        self.exclude_patterns.push(pattern.into());
        self
    }

    /// Adds multiple exclude glob patterns.
    #[must_use]
    pub fn excludes<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude_patterns
            .extend(patterns.into_iter().map(Into::into));
        self
    }

    /// Sets the configuration.
    #[must_use]
    pub fn config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Sets the number of worker threads used to evaluate sites.
    #[must_use]
    pub fn parallelism(mut self, threads: usize) -> Self {
        self.parallelism = Some(threads);
        self
    }

    /// Sets whether to fail on malformed snapshots (default: false).
    #[must_use]
    pub fn fail_on_parse_error(mut self, fail: bool) -> Self {
        self.fail_on_parse_error = fail;
        self
    }

    /// Builds the analyzer.
    ///
    /// Disabled rules are dropped, enabled ones receive their configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the working directory cannot be determined, a
    /// glob pattern is invalid, or the worker pool cannot be created.
    pub fn build(self) -> Result<Analyzer, AnalyzerError> {
        let config = self.config.unwrap_or_default();

        let root = self
            .root
            .unwrap_or_else(|| config.analyzer.root.clone());
        let root = if root.is_absolute() {
            root
        } else {
            std::env::current_dir()?.join(&root)
        };

        let mut exclude_patterns = self.exclude_patterns;
        exclude_patterns.extend(config.analyzer.exclude.iter().cloned());
        let exclude = compile_patterns(&exclude_patterns)?;

        let mut rules = Vec::with_capacity(self.rules.len());
        let mut allow = HashMap::new();
        for mut rule in self.rules {
            if !config.is_rule_enabled(rule.name()) {
                debug!("Skipping disabled rule: {}", rule.name());
                continue;
            }
            if let Some(rule_config) = config.rules.get(rule.name()) {
                rule.configure(rule_config);
            }
            allow.insert(rule.name(), compile_patterns(config.rule_allow(rule.name()))?);
            rules.push(rule);
        }

        let pool = match self.parallelism.or(config.analyzer.parallelism) {
            Some(threads) => Some(
                rayon::ThreadPoolBuilder::new()
                    .num_threads(threads)
                    .build()?,
            ),
            None => None,
        };

        Ok(Analyzer {
            root,
            rules,
            exclude,
            allow,
            config,
            pool,
            fail_on_parse_error: self.fail_on_parse_error,
        })
    }
}

fn compile_patterns(patterns: &[String]) -> Result<Vec<glob::Pattern>, AnalyzerError> {
    patterns
        .iter()
        .map(|p| glob::Pattern::new(p).map_err(AnalyzerError::from))
        .collect()
}

/// Checks a path against compiled patterns.
///
/// Patterns like `**/generated/**` also match as a plain substring so that
/// both absolute and host-relative paths are covered.
fn matches_any(patterns: &[glob::Pattern], path: &Path) -> bool {
    let path_str = path.to_string_lossy();
    patterns.iter().any(|pattern| {
        if pattern.matches(&path_str) {
            return true;
        }
        let normalized_pattern = pattern.as_str().replace("**", "");
        !normalized_pattern.is_empty()
            && !normalized_pattern.contains('*')
            && path_str.contains(&normalized_pattern)
    })
}

/// Checks a site path against sanctioned-scope patterns.
///
/// Patterns are matched as globs only, against the whole path or any
/// suffix of it that starts at a component boundary, so `io/grpc/**`
/// covers both `io/grpc/Channel.java` and `/src/main/java/io/grpc/Channel.java`
/// but not `com/acme/studio/grpc/App.java`. `*` does not cross `/`.
fn in_scope(patterns: &[glob::Pattern], path: &Path) -> bool {
    if patterns.is_empty() {
        return false;
    }
    let options = glob::MatchOptions {
        require_literal_separator: true,
        ..glob::MatchOptions::new()
    };
    let components: Vec<_> = path.components().collect();
    (0..components.len()).any(|start| {
        let suffix: PathBuf = components[start..].iter().collect();
        patterns
            .iter()
            .any(|pattern| pattern.matches_path_with(&suffix, options))
    })
}

/// The main analyzer that orchestrates lint execution.
///
/// Use [`Analyzer::builder()`] to construct an instance.
pub struct Analyzer {
    root: PathBuf,
    rules: Vec<RuleBox>,
    exclude: Vec<glob::Pattern>,
    allow: HashMap<&'static str, Vec<glob::Pattern>>,
    config: Config,
    pool: Option<rayon::ThreadPool>,
    fail_on_parse_error: bool,
}

impl Analyzer {
    /// Creates a new builder for configuring an analyzer.
    #[must_use]
    pub fn builder() -> AnalyzerBuilder {
        AnalyzerBuilder::new()
    }

    /// Returns the root directory being analyzed.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the number of active rules.
    #[must_use]
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Analyzes all snapshots under the root and returns the results.
    ///
    /// # Errors
    ///
    /// Returns an error if snapshot discovery or reading fails, or if a
    /// snapshot is malformed and `fail_on_parse_error` is set.
    pub fn analyze(&self) -> Result<LintResult, AnalyzerError> {
        info!("Starting analysis at {:?}", self.root);

        let files = self.discover_files()?;
        info!("Found {} snapshots to analyze", files.len());

        let mut result = LintResult::new();
        for path in &files {
            match CompilationUnit::from_file(path) {
                Ok(unit) => result.extend(self.check_unit(&unit)),
                Err(UnitError::Io { path, source }) => {
                    return Err(AnalyzerError::Unit(UnitError::Io { path, source }));
                }
                Err(e) => {
                    warn!("Skipping {}: {}", path.display(), e);
                    if self.fail_on_parse_error {
                        return Err(e.into());
                    }
                }
            }
        }

        result.sort();
        info!(
            "Analysis complete: {} violations in {} sites across {} units",
            result.violations.len(),
            result.sites_checked,
            result.units_checked
        );

        Ok(result)
    }

    /// Analyzes in-memory compilation units.
    #[must_use]
    pub fn analyze_units(&self, units: &[CompilationUnit]) -> LintResult {
        let mut result = LintResult::new();
        for unit in units {
            result.extend(self.check_unit(unit));
        }
        result.sort();
        result
    }

    /// Evaluates every site of one unit against every active rule.
    fn check_unit(&self, unit: &CompilationUnit) -> LintResult {
        debug!("Analyzing unit {} ({} sites)", unit.name, unit.sites.len());

        let evaluate = || -> Vec<Violation> {
            unit.sites
                .par_iter()
                .flat_map_iter(|site| self.check_site(unit, site))
                .collect()
        };
        let violations = match &self.pool {
            Some(pool) => pool.install(evaluate),
            None => evaluate(),
        };

        LintResult {
            violations,
            units_checked: 1,
            sites_checked: unit.sites.len(),
        }
    }

    fn check_site(&self, unit: &CompilationUnit, site: &ReferenceSite) -> Vec<Violation> {
        if matches_any(&self.exclude, &site.location.file) {
            return Vec::new();
        }

        let mut violations = Vec::new();
        for rule in &self.rules {
            if self
                .allow
                .get(rule.name())
                .is_some_and(|patterns| in_scope(patterns, &site.location.file))
            {
                continue;
            }
            if let Some(violation) = rule.check(&unit.symbols, site) {
                violations.push(self.apply_severity_override(rule.name(), violation));
            }
        }
        violations
    }

    /// Applies severity overrides from configuration.
    fn apply_severity_override(&self, rule_name: &str, mut violation: Violation) -> Violation {
        if let Some(severity) = self.config.rule_severity(rule_name) {
            violation.severity = severity;
        }
        violation
    }

    /// Discovers all snapshot files to analyze.
    fn discover_files(&self) -> Result<Vec<PathBuf>, AnalyzerError> {
        if self.root.is_file() {
            return Ok(vec![self.root.clone()]);
        }

        let pattern = format!("{}/**/*{}", self.root.display(), SNAPSHOT_SUFFIX);
        let mut files = Vec::new();

        for entry in glob::glob(&pattern)? {
            let path = entry.map_err(|e| AnalyzerError::Io(e.into_error()))?;

            if !is_snapshot(&path) || matches_any(&self.exclude, &path) {
                debug!("Excluding: {}", path.display());
                continue;
            }

            files.push(path);
        }

        files.sort();
        Ok(files)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::marker_rule::MarkerRule;
    use crate::site::ReferenceSite;
    use crate::symbol::{AnnotationInstance, Symbol, SymbolId, SymbolKind, SymbolTable};
    use crate::types::{Location, Severity};

    const INTERNAL: &str = "io.grpc.Internal";

    fn internal_rule() -> MarkerRule {
        MarkerRule::new("MK002", "internal-api")
            .marker(INTERNAL)
            .summary("@Internal should not be used in application code")
    }

    fn unit(site_file: &str) -> CompilationUnit {
        let symbols = SymbolTable::new(vec![
            Symbol::new(SymbolId(0), "io.grpc.InternalThing", SymbolKind::Type)
                .annotated(AnnotationInstance::new(INTERNAL)),
            Symbol::new(SymbolId(1), "io.grpc.Stable", SymbolKind::Type),
        ])
        .expect("valid");
        let sites = vec![
            ReferenceSite::identifier(
                "InternalThing",
                Some(SymbolId(0)),
                Location::new(site_file, 3, 1),
            ),
            ReferenceSite::identifier("Stable", Some(SymbolId(1)), Location::new(site_file, 4, 1)),
            ReferenceSite::identifier("Missing", None, Location::new(site_file, 5, 1)),
        ];
        CompilationUnit::new(site_file, symbols, sites)
    }

    #[test]
    fn test_builder() {
        let analyzer = Analyzer::builder()
            .root(".")
            .rule(internal_rule())
            .build()
            .expect("Failed to build analyzer");

        assert!(analyzer.root().exists());
        assert_eq!(analyzer.rule_count(), 1);
    }

    #[test]
    fn test_exclude_patterns() {
        let patterns = compile_patterns(&["**/generated/**".to_string()]).expect("valid");
        assert!(matches_any(&patterns, Path::new("/foo/generated/Foo.java")));
        assert!(matches_any(&patterns, Path::new("src/generated/Foo.java")));
        assert!(!matches_any(&patterns, Path::new("/foo/src/Foo.java")));
    }

    #[test]
    fn test_invalid_pattern() {
        let result = Analyzer::builder().exclude("[").build();
        assert!(matches!(result, Err(AnalyzerError::Glob(_))));
    }

    #[test]
    fn flags_only_marked_sites() {
        let analyzer = Analyzer::builder()
            .rule(internal_rule())
            .build()
            .expect("builds");
        let result = analyzer.analyze_units(&[unit("app/Main.java")]);

        assert_eq!(result.units_checked, 1);
        assert_eq!(result.sites_checked, 3);
        assert_eq!(result.violations.len(), 1);
        assert_eq!(result.violations[0].code, "MK002");
        assert_eq!(result.violations[0].location.line, 3);
    }

    #[test]
    fn excluded_site_files_are_skipped() {
        let analyzer = Analyzer::builder()
            .rule(internal_rule())
            .exclude("**/generated/**")
            .build()
            .expect("builds");
        let result = analyzer.analyze_units(&[unit("app/generated/Main.java")]);
        assert!(result.violations.is_empty());
        assert_eq!(result.sites_checked, 3);
    }

    #[test]
    fn sanctioned_scope_is_not_flagged() {
        let config = Config::parse(
            r#"
[rules.internal-api]
allow = ["io/grpc/**"]
"#,
        )
        .expect("valid config");
        let analyzer = Analyzer::builder()
            .rule(internal_rule())
            .config(config)
            .build()
            .expect("builds");

        let result = analyzer.analyze_units(&[unit("io/grpc/Channel.java"), unit("app/Main.java")]);
        assert_eq!(result.violations.len(), 1);
        assert_eq!(
            result.violations[0].location.file,
            PathBuf::from("app/Main.java")
        );
    }

    #[test]
    fn sanctioned_scope_is_anchored_on_components() {
        let patterns = compile_patterns(&["io/grpc/**".to_string()]).expect("valid");
        assert!(in_scope(&patterns, Path::new("io/grpc/Channel.java")));
        assert!(in_scope(&patterns, Path::new("/repo/src/main/java/io/grpc/Channel.java")));
        assert!(!in_scope(&patterns, Path::new("src/main/java/com/acme/studio/grpc/App.java")));
        assert!(!in_scope(&patterns, Path::new("app/io/grpcx/Main.java")));
        assert!(!in_scope(&[], Path::new("io/grpc/Channel.java")));
    }

    #[test]
    fn near_miss_scope_is_still_flagged() {
        let config = Config::parse("[rules.internal-api]\nallow = [\"io/grpc/**\"]\n")
            .expect("valid config");
        let analyzer = Analyzer::builder()
            .rule(internal_rule())
            .config(config)
            .build()
            .expect("builds");

        let result = analyzer.analyze_units(&[
            unit("src/main/java/com/acme/studio/grpc/App.java"),
            unit("src/main/java/io/grpc/Channel.java"),
        ]);
        assert_eq!(result.violations.len(), 1);
        assert_eq!(
            result.violations[0].location.file,
            PathBuf::from("src/main/java/com/acme/studio/grpc/App.java")
        );
    }

    #[test]
    fn disabled_rules_are_dropped() {
        let config = Config::parse("[rules.internal-api]\nenabled = false\n").expect("valid");
        let analyzer = Analyzer::builder()
            .rule(internal_rule())
            .config(config)
            .build()
            .expect("builds");
        assert_eq!(analyzer.rule_count(), 0);
        assert!(analyzer.analyze_units(&[unit("app/Main.java")]).violations.is_empty());
    }

    #[test]
    fn severity_override_applies() {
        let config = Config::parse("[rules.internal-api]\nseverity = \"warning\"\n").expect("valid");
        let analyzer = Analyzer::builder()
            .rule(internal_rule())
            .config(config)
            .build()
            .expect("builds");
        let result = analyzer.analyze_units(&[unit("app/Main.java")]);
        assert_eq!(result.violations[0].severity, Severity::Warning);
        assert!(!result.has_errors());
    }

    #[test]
    fn parallel_pool_matches_sequential() {
        let units: Vec<CompilationUnit> = (0..8).map(|i| unit(&format!("app/M{i}.java"))).collect();
        let sequential = Analyzer::builder()
            .rule(internal_rule())
            .build()
            .expect("builds")
            .analyze_units(&units);
        let parallel = Analyzer::builder()
            .rule(internal_rule())
            .parallelism(4)
            .build()
            .expect("builds")
            .analyze_units(&units);

        assert_eq!(sequential.violations.len(), 8);
        let lines = |r: &LintResult| {
            r.violations
                .iter()
                .map(|v| v.location.file.clone())
                .collect::<Vec<_>>()
        };
        assert_eq!(lines(&sequential), lines(&parallel));
    }
}
