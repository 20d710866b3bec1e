//! Reference sites reported by the host.

use crate::symbol::SymbolId;
use crate::types::Location;
use serde::{Deserialize, Serialize};

/// Syntactic form of a reference.
///
/// The form only changes how the host arrived at the resolved symbol and how
/// the site is rendered; every variant is matched the same way.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReferenceKind {
    /// A bare name, e.g. `AnnotatedClass` or a statically imported `MEMBER`.
    Identifier {
        /// The name as written.
        name: String,
    },
    /// A qualified access, e.g. `AnnotatedClass.MEMBER` or `foo.foo()`.
    MemberSelect {
        /// The expression left of the dot, as written.
        qualifier: String,
        /// The selected member name.
        member: String,
    },
}

/// A location in analyzed source naming a declaration, plus the symbol the
/// host resolved it to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceSite {
    /// Syntactic form of the reference.
    #[serde(flatten)]
    pub kind: ReferenceKind,
    /// Resolved symbol; `None` if the host could not resolve the reference.
    #[serde(default)]
    pub symbol: Option<SymbolId>,
    /// Where the reference appears.
    pub location: Location,
}

impl ReferenceSite {
    /// Creates an identifier reference.
    #[must_use]
    pub fn identifier(name: impl Into<String>, symbol: Option<SymbolId>, location: Location) -> Self {
        Self {
            kind: ReferenceKind::Identifier { name: name.into() },
            symbol,
            location,
        }
    }

    /// Creates a member-select reference.
    #[must_use]
    pub fn member_select(
        qualifier: impl Into<String>,
        member: impl Into<String>,
        symbol: Option<SymbolId>,
        location: Location,
    ) -> Self {
        Self {
            kind: ReferenceKind::MemberSelect {
                qualifier: qualifier.into(),
                member: member.into(),
            },
            symbol,
            location,
        }
    }

    /// Returns the referenced text as it appears in source.
    #[must_use]
    pub fn target_text(&self) -> String {
        match &self.kind {
            ReferenceKind::Identifier { name } => name.clone(),
            ReferenceKind::MemberSelect { qualifier, member } => format!("{qualifier}.{member}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn target_text_per_kind() {
        let loc = Location::new("example/Test.java", 3, 1);
        let ident = ReferenceSite::identifier("MEMBER", Some(SymbolId(2)), loc.clone());
        let select = ReferenceSite::member_select("AnnotatedClass", "foo", None, loc);
        assert_eq!(ident.target_text(), "MEMBER");
        assert_eq!(select.target_text(), "AnnotatedClass.foo");
    }

    #[test]
    fn deserializes_tagged_site() {
        let json = r#"{
            "kind": "member_select", "qualifier": "a", "member": "instanceMethod",
            "symbol": 4,
            "location": {"file": "example/Test.java", "line": 8, "column": 5}
        }"#;
        let site: ReferenceSite = serde_json::from_str(json).expect("valid site");
        assert_eq!(site.symbol, Some(SymbolId(4)));
        assert_eq!(site.target_text(), "a.instanceMethod");

        let unresolved = r#"{"kind": "identifier", "name": "x",
            "location": {"file": "T.java", "line": 1, "column": 1}}"#;
        let site: ReferenceSite = serde_json::from_str(unresolved).expect("valid site");
        assert!(site.symbol.is_none());
    }
}
