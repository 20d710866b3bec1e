//! Rule presets for common configurations.

use crate::{experimental_api, experimental_api_rule, internal_api, internal_api_rule};
use marker_lint_core::RuleBox;
use std::str::FromStr;

/// Preset configurations for marker-lint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Preset {
    /// Both rules, non-strict hierarchy.
    #[default]
    Recommended,
    /// Both rules with strict hierarchy semantics.
    Strict,
    /// Every available rule with its defaults.
    All,
}

impl Preset {
    /// Returns the rules for this preset.
    #[must_use]
    pub fn rules(self) -> Vec<RuleBox> {
        match self {
            Self::Recommended => recommended_rules(),
            Self::Strict => strict_rules(),
            Self::All => all_rules(),
        }
    }
}

impl FromStr for Preset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "recommended" => Ok(Self::Recommended),
            "strict" => Ok(Self::Strict),
            "all" => Ok(Self::All),
            other => Err(format!(
                "unknown preset '{other}' (expected recommended, strict or all)"
            )),
        }
    }
}

/// Returns the recommended set of rules.
///
/// Includes:
/// - `experimental-api` (MK001)
/// - `internal-api` (MK002), overrides of public API are still flagged
#[must_use]
pub fn recommended_rules() -> Vec<RuleBox> {
    vec![
        Box::new(experimental_api_rule()),
        Box::new(internal_api_rule()),
    ]
}

/// Returns the strict set of rules.
///
/// A method is flagged only when every method it overrides is marked too.
#[must_use]
pub fn strict_rules() -> Vec<RuleBox> {
    vec![
        Box::new(experimental_api_rule().strict_hierarchy(true)),
        Box::new(internal_api_rule().strict_hierarchy(true)),
    ]
}

/// Returns all available rules.
#[must_use]
pub fn all_rules() -> Vec<RuleBox> {
    vec![
        Box::new(experimental_api_rule()),
        Box::new(internal_api_rule()),
    ]
}

/// Keeps the rules of `rules` whose name or code appears in `selectors`.
///
/// Matching is case-insensitive, so `mk001` selects `MK001`.
#[must_use]
pub fn rules_by_name<S: AsRef<str>>(rules: Vec<RuleBox>, selectors: &[S]) -> Vec<RuleBox> {
    rules
        .into_iter()
        .filter(|rule| {
            selectors.iter().any(|s| {
                let s = s.as_ref().trim();
                s.eq_ignore_ascii_case(rule.name()) || s.eq_ignore_ascii_case(rule.code())
            })
        })
        .collect()
}

/// Returns whether `selector` names a built-in rule.
#[must_use]
pub fn is_known_rule(selector: &str) -> bool {
    [
        experimental_api::NAME,
        experimental_api::CODE,
        internal_api::NAME,
        internal_api::CODE,
    ]
    .iter()
    .any(|known| known.eq_ignore_ascii_case(selector.trim()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codes(rules: &[RuleBox]) -> Vec<&'static str> {
        rules.iter().map(|r| r.code()).collect()
    }

    #[test]
    fn test_preset_rules() {
        assert_eq!(codes(&Preset::Recommended.rules()), vec!["MK001", "MK002"]);
        assert_eq!(codes(&Preset::Strict.rules()), vec!["MK001", "MK002"]);
        assert_eq!(codes(&Preset::All.rules()), vec!["MK001", "MK002"]);
    }

    #[test]
    fn test_preset_from_str() {
        assert_eq!("strict".parse::<Preset>(), Ok(Preset::Strict));
        assert_eq!("ALL".parse::<Preset>(), Ok(Preset::All));
        assert!("minimal".parse::<Preset>().is_err());
    }

    #[test]
    fn test_rules_by_name_accepts_names_and_codes() {
        let picked = rules_by_name(all_rules(), &["internal-api"]);
        assert_eq!(codes(&picked), vec!["MK002"]);

        let picked = rules_by_name(all_rules(), &["mk001", " MK002 "]);
        assert_eq!(codes(&picked), vec!["MK001", "MK002"]);

        assert!(rules_by_name(all_rules(), &["nope"]).is_empty());
    }

    #[test]
    fn test_is_known_rule() {
        assert!(is_known_rule("experimental-api"));
        assert!(is_known_rule("mk002"));
        assert!(!is_known_rule("no-unwrap-expect"));
    }
}
