//! Marker annotation rules.
//!
//! A [`MarkerRule`] is pure configuration over the matching engine: which
//! annotation type to track, whether strict hierarchy semantics apply, and
//! how a match becomes a [`Violation`].
//!
//! # Example
//!
//! ```ignore
//! use marker_lint_core::MarkerRule;
//!
//! let rule = MarkerRule::new("MK100", "beta-api")
//!     .marker("com.example.Beta")
//!     .summary("@Beta should not be used in application code")
//!     .link("https://example.com/beta")
//!     .strict_hierarchy(true);
//! ```

use crate::config::RuleConfig;
use crate::matcher::match_site;
use crate::site::ReferenceSite;
use crate::symbol::{AnnotationInstance, SymbolModel};
use crate::{Rule, Severity, Violation};
use tracing::debug;

/// Turns a positive match into a violation.
///
/// Receives the rule (for its code, summary and link), the flagged site, and
/// the annotation occurrence that justified the match.
pub type DescribeFn = fn(&MarkerRule, &ReferenceSite, &AnnotationInstance) -> Violation;

/// A rule flagging references to symbols carrying a marker annotation.
#[derive(Debug, Clone)]
pub struct MarkerRule {
    code: &'static str,
    name: &'static str,
    description: &'static str,
    summary: String,
    marker: String,
    strict_hierarchy: bool,
    link: Option<String>,
    severity: Severity,
    describe: DescribeFn,
}

impl MarkerRule {
    /// Creates a new marker rule builder.
    ///
    /// # Arguments
    ///
    /// * `code` - Rule code (e.g., "MK001")
    /// * `name` - Rule name (e.g., "experimental-api")
    #[must_use]
    pub fn new(code: &'static str, name: &'static str) -> Self {
        Self {
            code,
            name,
            description: "",
            summary: String::new(),
            marker: String::new(),
            strict_hierarchy: false,
            link: None,
            severity: Severity::Error,
            describe: describe_match,
        }
    }

    /// Sets the tracked annotation type.
    #[must_use]
    pub fn marker(mut self, marker: impl Into<String>) -> Self {
        self.marker = marker.into();
        self
    }

    /// Sets the static description shown by `list-rules`.
    #[must_use]
    pub fn description(mut self, description: &'static str) -> Self {
        self.description = description;
        self
    }

    /// Sets the fixed message text of every violation.
    #[must_use]
    pub fn summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = summary.into();
        self
    }

    /// Sets the rule-level link.
    #[must_use]
    pub fn link(mut self, link: impl Into<String>) -> Self {
        self.link = Some(link.into());
        self
    }

    /// Requires every overridden method to be marked as well.
    #[must_use]
    pub fn strict_hierarchy(mut self, strict: bool) -> Self {
        self.strict_hierarchy = strict;
        self
    }

    /// Sets the severity level.
    #[must_use]
    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    /// Sets the description strategy.
    #[must_use]
    pub fn describe_with(mut self, describe: DescribeFn) -> Self {
        self.describe = describe;
        self
    }

    /// Returns the fixed message text.
    #[must_use]
    pub fn summary_text(&self) -> &str {
        &self.summary
    }

    /// Returns the rule-level link.
    #[must_use]
    pub fn default_link(&self) -> Option<&str> {
        self.link.as_deref()
    }

    /// Starts a violation for `site` with this rule's code, name and
    /// severity. The symbol is the site's source text until
    /// [`Rule::check`] replaces it with the resolved qualified name.
    #[must_use]
    pub fn violation(&self, site: &ReferenceSite, message: impl Into<String>) -> Violation {
        Violation::new(
            self.code,
            self.name,
            self.severity,
            site.location.clone(),
            message,
        )
        .with_symbol(site.target_text())
    }
}

/// Default description: the rule summary plus the rule-level link.
#[must_use]
pub fn describe_match(
    rule: &MarkerRule,
    site: &ReferenceSite,
    _evidence: &AnnotationInstance,
) -> Violation {
    let violation = rule.violation(site, rule.summary_text());
    match rule.default_link() {
        Some(link) => violation.with_link(link),
        None => violation,
    }
}

impl Rule for MarkerRule {
    fn name(&self) -> &'static str {
        self.name
    }

    fn code(&self) -> &'static str {
        self.code
    }

    fn description(&self) -> &'static str {
        self.description
    }

    fn default_severity(&self) -> Severity {
        self.severity
    }

    fn marker(&self) -> Option<&str> {
        Some(&self.marker)
    }

    fn configure(&mut self, config: &RuleConfig) {
        if let Some(marker) = &config.marker {
            self.marker.clone_from(marker);
        }
        if let Some(strict) = config.strict_hierarchy {
            self.strict_hierarchy = strict;
        }
        if let Some(link) = &config.link {
            self.link = Some(link.clone());
        }
        if let Some(severity) = config.severity {
            self.severity = severity;
        }
        debug!(
            "Configured {}: marker={}, strict_hierarchy={}",
            self.name, self.marker, self.strict_hierarchy
        );
    }

    fn check(&self, model: &dyn SymbolModel, site: &ReferenceSite) -> Option<Violation> {
        let evidence = match_site(model, site, &self.marker, self.strict_hierarchy).evidence()?;
        let mut violation = (self.describe)(self, site, evidence);
        if let Some(symbol) = site.symbol.and_then(|id| model.symbol(id)) {
            violation.symbol = Some(symbol.name.clone());
        }
        Some(violation)
    }
}
