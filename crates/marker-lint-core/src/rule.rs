//! Rule trait for defining lint rules.

use crate::config::RuleConfig;
use crate::site::ReferenceSite;
use crate::symbol::SymbolModel;
use crate::types::{Severity, Violation};

/// A lint rule evaluated once per reference site.
///
/// Rules receive the symbol model of the compilation unit the site belongs
/// to. They must not retain state between calls: the analyzer evaluates
/// sites in parallel against a shared rule instance.
///
/// # Example
///
/// ```ignore
/// use marker_lint_core::{match_site, Rule, ReferenceSite, SymbolModel, Violation};
///
/// pub struct NoBetaApi;
///
/// impl Rule for NoBetaApi {
///     fn name(&self) -> &'static str { "no-beta-api" }
///     fn code(&self) -> &'static str { "MK100" }
///
///     fn check(&self, model: &dyn SymbolModel, site: &ReferenceSite) -> Option<Violation> {
///         match_site(model, site, "com.example.Beta", false).evidence()?;
///         Some(Violation::new(self.code(), self.name(), self.default_severity(),
///             site.location.clone(), "@Beta API used"))
///     }
/// }
/// ```
pub trait Rule: Send + Sync {
    /// Returns the kebab-case name of this rule (e.g., "experimental-api").
    fn name(&self) -> &'static str;

    /// Returns the rule code (e.g., "MK001").
    fn code(&self) -> &'static str;

    /// Returns a brief description of what this rule checks.
    fn description(&self) -> &'static str {
        ""
    }

    /// Returns the default severity for violations from this rule.
    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    /// Returns the annotation type this rule tracks, if it tracks one.
    fn marker(&self) -> Option<&str> {
        None
    }

    /// Applies rule-specific settings from configuration.
    fn configure(&mut self, _config: &RuleConfig) {}

    /// Checks a single reference site.
    ///
    /// # Returns
    ///
    /// A violation if the site should be flagged.
    fn check(&self, model: &dyn SymbolModel, site: &ReferenceSite) -> Option<Violation>;
}

/// Type alias for boxed Rule trait objects.
pub type RuleBox = Box<dyn Rule>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbol::SymbolTable;
    use crate::types::Location;

    struct FlagEverything;

    impl Rule for FlagEverything {
        fn name(&self) -> &'static str {
            "flag-everything"
        }
        fn code(&self) -> &'static str {
            "TEST001"
        }

        fn check(&self, _model: &dyn SymbolModel, site: &ReferenceSite) -> Option<Violation> {
            Some(Violation::new(
                self.code(),
                self.name(),
                self.default_severity(),
                site.location.clone(),
                "Test violation",
            ))
        }
    }

    #[test]
    fn test_rule_defaults() {
        let rule = FlagEverything;
        assert_eq!(rule.name(), "flag-everything");
        assert_eq!(rule.default_severity(), Severity::Error);
        assert!(rule.marker().is_none());
        assert_eq!(rule.description(), "");
    }

    #[test]
    fn test_rule_check() {
        let site = ReferenceSite::identifier("x", None, Location::new("T.java", 2, 3));
        let violation = FlagEverything
            .check(&SymbolTable::default(), &site)
            .expect("flagged");
        assert_eq!(violation.location.line, 2);
    }
}
