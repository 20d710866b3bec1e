//! Rule to forbid references to `@ExperimentalApi` declarations.
//!
//! # Rationale
//!
//! Experimental APIs may change or disappear in any release. Application
//! code that depends on them breaks without notice on upgrade.
//!
//! A declaration is experimental if it, or any declaration enclosing it
//! (class, outer class, package), carries the marker. The marker's first
//! element is usually a tracking-issue link, which is surfaced in the
//! message.
//!
//! # Configuration
//!
//! - `marker`: Annotation type to track (default: `io.grpc.ExperimentalApi`)
//! - `link`: Fallback link when the annotation carries none
//! - `strict_hierarchy`: Require the whole override hierarchy to be marked (default: false)
//! - `allow`: Source globs where experimental usage is sanctioned

use marker_lint_core::{AnnotationInstance, MarkerRule, ReferenceSite, Violation};
use tracing::trace;

/// Rule code for experimental-api.
pub const CODE: &str = "MK001";

/// Rule name for experimental-api.
pub const NAME: &str = "experimental-api";

/// Tracked annotation type.
pub const MARKER: &str = "io.grpc.ExperimentalApi";

/// Fixed message text.
pub const SUMMARY: &str = "@ExperimentalApi should not be used in application code";

/// Rule-level link used when the annotation carries no link.
pub const DEFAULT_LINK: &str = "https://github.com/grpc/grpc-java";

/// Creates the experimental-api rule.
#[must_use]
pub fn experimental_api_rule() -> MarkerRule {
    MarkerRule::new(CODE, NAME)
        .description("Forbids references to @ExperimentalApi declarations")
        .marker(MARKER)
        .summary(SUMMARY)
        .link(DEFAULT_LINK)
        .describe_with(describe)
}

/// Returns the link carried by the annotation's first element, if any.
fn find_link(annotation: &AnnotationInstance) -> Option<&str> {
    let value = annotation.first_value()?;
    let value = value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value)
        .trim();
    (!value.is_empty()).then_some(value)
}

fn describe(rule: &MarkerRule, site: &ReferenceSite, evidence: &AnnotationInstance) -> Violation {
    let link = find_link(evidence).or_else(|| {
        trace!("No link on {}, using rule default", evidence.type_identifier);
        rule.default_link()
    });

    match link {
        Some(link) => rule
            .violation(site, format!("{} (see {link})", rule.summary_text()))
            .with_link(link),
        None => rule.violation(site, rule.summary_text()),
    }
}
