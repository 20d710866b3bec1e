//! Rule to forbid references to `@Internal` declarations.
//!
//! # Rationale
//!
//! Internal declarations are public only for the library's own packages.
//! They carry no compatibility guarantee for application code.
//!
//! # Configuration
//!
//! - `strict_hierarchy`: Only flag a method when every method it overrides
//!   is internal too (default: false). This keeps internal implementations
//!   of public interfaces from hiding the public API they implement.
//! - `marker`, `link`, `allow`: as for every marker rule

use marker_lint_core::{describe_match, MarkerRule};

/// Rule code for internal-api.
pub const CODE: &str = "MK002";

/// Rule name for internal-api.
pub const NAME: &str = "internal-api";

/// Tracked annotation type.
pub const MARKER: &str = "io.grpc.Internal";

/// Fixed message text.
pub const SUMMARY: &str = "@Internal should not be used in application code";

/// Rule-level link.
pub const DEFAULT_LINK: &str = "https://github.com/grpc/grpc-java";

/// Creates the internal-api rule with strict hierarchy semantics off.
#[must_use]
pub fn internal_api_rule() -> MarkerRule {
    MarkerRule::new(CODE, NAME)
        .description("Forbids references to @Internal declarations")
        .marker(MARKER)
        .summary(SUMMARY)
        .link(DEFAULT_LINK)
        .describe_with(describe_match)
}

#[cfg(test)]
mod tests {
    use super::*;
    use marker_lint_core::{
        AnnotationInstance, Location, ReferenceSite, Rule, Symbol, SymbolId, SymbolKind,
        SymbolTable,
    };

    /// `InternalImpl` (marked) implements public `Channel.start()` (unmarked).
    fn model() -> SymbolTable {
        SymbolTable::new(vec![
            Symbol::new(SymbolId(0), "io.grpc.Channel", SymbolKind::Type),
            Symbol::new(SymbolId(1), "io.grpc.Channel.start", SymbolKind::Method)
                .owned_by(SymbolId(0)),
            Symbol::new(SymbolId(2), "io.grpc.internal.InternalImpl", SymbolKind::Type)
                .annotated(AnnotationInstance::new(MARKER).with_element("value", "ignored")),
            Symbol::new(
                SymbolId(3),
                "io.grpc.internal.InternalImpl.start",
                SymbolKind::Method,
            )
            .owned_by(SymbolId(2))
            .overrides(SymbolId(1)),
            Symbol::new(
                SymbolId(4),
                "io.grpc.internal.InternalImpl.helper",
                SymbolKind::Method,
            )
            .owned_by(SymbolId(2)),
        ])
        .expect("valid model")
    }

    fn site(id: usize) -> ReferenceSite {
        ReferenceSite::member_select(
            "impl",
            "start",
            Some(SymbolId(id)),
            Location::new("app/Main.java", 12, 9),
        )
    }

    #[test]
    fn message_ignores_annotation_elements() {
        let v = internal_api_rule().check(&model(), &site(2)).expect("flagged");
        assert_eq!(v.code, CODE);
        assert_eq!(v.message, SUMMARY);
        assert_eq!(v.link.as_deref(), Some(DEFAULT_LINK));
    }

    #[test]
    fn override_of_public_api_is_flagged_by_default() {
        assert!(internal_api_rule().check(&model(), &site(3)).is_some());
    }

    #[test]
    fn strict_hierarchy_spares_override_of_public_api() {
        let rule = internal_api_rule().strict_hierarchy(true);
        assert!(rule.check(&model(), &site(3)).is_none());
        // Methods with no overridden declarations are unaffected.
        assert!(rule.check(&model(), &site(4)).is_some());
    }

    #[test]
    fn public_api_itself_is_not_flagged() {
        assert!(internal_api_rule().check(&model(), &site(1)).is_none());
    }
}
