//! Read-only symbol model consumed by the matcher.
//!
//! The host front end resolves references and computes override sets; this
//! module only describes the shape of that data. [`SymbolModel`] is the seam
//! a host implements, and [`SymbolTable`] is the arena implementation used by
//! the analyzer when loading exported snapshots.
//!
//! All invariants the matcher relies on (dense ids, resolvable owner and
//! override references, acyclic owner chains) are enforced when a
//! [`SymbolTable`] is constructed.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

// ────────────────────────────────────────────
// Identifiers and kinds
// ────────────────────────────────────────────

/// Index of a symbol within its [`SymbolModel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SymbolId(pub usize);

impl SymbolId {
    /// Returns the raw index.
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for SymbolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Declaration kind of a symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SymbolKind {
    /// Class, interface, enum, or annotation type.
    Type,
    /// Method or constructor.
    Method,
    /// Field or constant.
    Field,
    /// Package.
    Package,
    /// Anything else the host reports.
    Other,
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Type => write!(f, "type"),
            Self::Method => write!(f, "method"),
            Self::Field => write!(f, "field"),
            Self::Package => write!(f, "package"),
            Self::Other => write!(f, "other"),
        }
    }
}

// ────────────────────────────────────────────
// Annotations
// ────────────────────────────────────────────

/// A single element of an annotation occurrence, e.g. `value = "..."`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotationElement {
    /// Element name.
    pub name: String,
    /// Element value rendered as a string.
    pub value: String,
}

/// An occurrence of an annotation on a symbol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotationInstance {
    /// Fully qualified annotation type name.
    pub type_identifier: String,
    /// Explicitly given elements, in declaration order.
    #[serde(default)]
    pub elements: Vec<AnnotationElement>,
}

impl AnnotationInstance {
    /// Creates an annotation occurrence without elements.
    #[must_use]
    pub fn new(type_identifier: impl Into<String>) -> Self {
        Self {
            type_identifier: type_identifier.into(),
            elements: Vec::new(),
        }
    }

    /// Adds an element.
    #[must_use]
    pub fn with_element(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.elements.push(AnnotationElement {
            name: name.into(),
            value: value.into(),
        });
        self
    }

    /// Returns whether this annotation is of the given type.
    #[must_use]
    pub fn is_type(&self, type_identifier: &str) -> bool {
        self.type_identifier == type_identifier
    }

    /// Returns the value of the first declared element, if any.
    #[must_use]
    pub fn first_value(&self) -> Option<&str> {
        self.elements.first().map(|e| e.value.as_str())
    }

}

// ────────────────────────────────────────────
// Symbols
// ────────────────────────────────────────────

/// A declaration in the program's symbol graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Symbol {
    /// Position of this symbol in its model.
    pub id: SymbolId,
    /// Qualified name, used for messages only.
    pub name: String,
    /// Declaration kind.
    pub kind: SymbolKind,
    /// Annotations attached directly to this declaration.
    #[serde(default)]
    pub annotations: Vec<AnnotationInstance>,
    /// Enclosing declaration, `None` for top-level declarations.
    #[serde(default)]
    pub owner: Option<SymbolId>,
    /// Methods this method overrides across the supertype hierarchy.
    #[serde(default)]
    pub overridden: Vec<SymbolId>,
}

impl Symbol {
    /// Creates a symbol with no annotations, owner, or overrides.
    #[must_use]
    pub fn new(id: SymbolId, name: impl Into<String>, kind: SymbolKind) -> Self {
        Self {
            id,
            name: name.into(),
            kind,
            annotations: Vec::new(),
            owner: None,
            overridden: Vec::new(),
        }
    }

    /// Sets the enclosing declaration.
    #[must_use]
    pub fn owned_by(mut self, owner: SymbolId) -> Self {
        self.owner = Some(owner);
        self
    }

    /// Attaches an annotation.
    #[must_use]
    pub fn annotated(mut self, annotation: AnnotationInstance) -> Self {
        self.annotations.push(annotation);
        self
    }

    /// Records an overridden super-method.
    #[must_use]
    pub fn overrides(mut self, method: SymbolId) -> Self {
        self.overridden.push(method);
        self
    }

    /// Returns the first directly attached annotation of the given type.
    #[must_use]
    pub fn annotation(&self, type_identifier: &str) -> Option<&AnnotationInstance> {
        self.annotations.iter().find(|a| a.is_type(type_identifier))
    }

    /// Returns whether this symbol is a method.
    #[must_use]
    pub fn is_method(&self) -> bool {
        self.kind == SymbolKind::Method
    }
}

/// Read-only access to a program's symbols.
///
/// Implementations must be fully constructed before matching begins; the
/// matcher only ever reads through this trait and may do so from several
/// threads at once.
pub trait SymbolModel: Send + Sync {
    /// Looks up a symbol by id.
    fn symbol(&self, id: SymbolId) -> Option<&Symbol>;

    /// Returns the number of symbols in the model.
    fn len(&self) -> usize;

    /// Returns whether the model holds no symbols.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ────────────────────────────────────────────
// Validated arena
// ────────────────────────────────────────────

/// Errors raised when a symbol snapshot violates model invariants.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModelError {
    /// A symbol's id does not match its position.
    #[error("symbol '{name}' has id {found} but is stored at position {expected}")]
    MisplacedId {
        /// Symbol name.
        name: String,
        /// Position in the table.
        expected: usize,
        /// Declared id.
        found: SymbolId,
    },

    /// An owner reference points outside the table.
    #[error("symbol '{name}' references unknown owner {owner}")]
    UnknownOwner {
        /// Symbol name.
        name: String,
        /// Dangling reference.
        owner: SymbolId,
    },

    /// An override reference points outside the table.
    #[error("method '{name}' overrides unknown symbol {target}")]
    UnknownOverride {
        /// Method name.
        name: String,
        /// Dangling reference.
        target: SymbolId,
    },

    /// A non-method symbol declares overrides.
    #[error("{kind} '{name}' declares overrides but only methods can override")]
    OverrideOnNonMethod {
        /// Symbol name.
        name: String,
        /// Actual kind.
        kind: SymbolKind,
    },

    /// An override reference points at a non-method.
    #[error("method '{name}' overrides '{target}', which is not a method")]
    OverrideTargetNotMethod {
        /// Method name.
        name: String,
        /// Name of the referenced symbol.
        target: String,
    },

    /// A method lists itself among its overrides.
    #[error("method '{name}' overrides itself")]
    SelfOverride {
        /// Method name.
        name: String,
    },

    /// Following owners from a symbol returns to that symbol.
    #[error("owner chain of '{name}' is cyclic")]
    CyclicOwner {
        /// Name of a symbol on the cycle.
        name: String,
    },
}

/// Arena of symbols indexed by [`SymbolId`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Symbol>", into = "Vec<Symbol>")]
pub struct SymbolTable {
    symbols: Vec<Symbol>,
}

impl SymbolTable {
    /// Creates a table, validating every model invariant.
    ///
    /// # Errors
    ///
    /// Returns the first [`ModelError`] found.
    pub fn new(symbols: Vec<Symbol>) -> Result<Self, ModelError> {
        let table = Self { symbols };
        table.validate()?;
        Ok(table)
    }

    fn validate(&self) -> Result<(), ModelError> {
        for (index, symbol) in self.symbols.iter().enumerate() {
            if symbol.id.index() != index {
                return Err(ModelError::MisplacedId {
                    name: symbol.name.clone(),
                    expected: index,
                    found: symbol.id,
                });
            }
            if let Some(owner) = symbol.owner {
                if owner.index() >= self.symbols.len() {
                    return Err(ModelError::UnknownOwner {
                        name: symbol.name.clone(),
                        owner,
                    });
                }
            }
            self.validate_overrides(symbol)?;
        }
        self.validate_acyclic()
    }

    fn validate_overrides(&self, symbol: &Symbol) -> Result<(), ModelError> {
        if symbol.overridden.is_empty() {
            return Ok(());
        }
        if !symbol.is_method() {
            return Err(ModelError::OverrideOnNonMethod {
                name: symbol.name.clone(),
                kind: symbol.kind,
            });
        }
        for &target in &symbol.overridden {
            let Some(super_method) = self.symbols.get(target.index()) else {
                return Err(ModelError::UnknownOverride {
                    name: symbol.name.clone(),
                    target,
                });
            };
            if target == symbol.id {
                return Err(ModelError::SelfOverride {
                    name: symbol.name.clone(),
                });
            }
            if !super_method.is_method() {
                return Err(ModelError::OverrideTargetNotMethod {
                    name: symbol.name.clone(),
                    target: super_method.name.clone(),
                });
            }
        }
        Ok(())
    }

    /// Walks every owner chain once, memoising symbols already known to
    /// terminate.
    fn validate_acyclic(&self) -> Result<(), ModelError> {
        let mut terminated: HashSet<SymbolId> = HashSet::new();
        for symbol in &self.symbols {
            let mut path: HashSet<SymbolId> = HashSet::new();
            let mut current = Some(symbol.id);
            while let Some(id) = current {
                if terminated.contains(&id) {
                    break;
                }
                if !path.insert(id) {
                    return Err(ModelError::CyclicOwner {
                        name: self.symbols[id.index()].name.clone(),
                    });
                }
                current = self.symbols[id.index()].owner;
            }
            terminated.extend(path);
        }
        Ok(())
    }
}

impl SymbolModel for SymbolTable {
    fn symbol(&self, id: SymbolId) -> Option<&Symbol> {
        self.symbols.get(id.index())
    }

    fn len(&self) -> usize {
        self.symbols.len()
    }
}

impl TryFrom<Vec<Symbol>> for SymbolTable {
    type Error = ModelError;

    fn try_from(symbols: Vec<Symbol>) -> Result<Self, Self::Error> {
        Self::new(symbols)
    }
}

impl From<SymbolTable> for Vec<Symbol> {
    fn from(table: SymbolTable) -> Self {
        table.symbols
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MARKER: &str = "io.grpc.ExperimentalApi";

    fn package(id: usize, name: &str) -> Symbol {
        Symbol::new(SymbolId(id), name, SymbolKind::Package)
    }

    #[test]
    fn builds_valid_table() {
        let table = SymbolTable::new(vec![
            package(0, "io.grpc"),
            Symbol::new(SymbolId(1), "io.grpc.StableApi", SymbolKind::Type).owned_by(SymbolId(0)),
        ])
        .expect("valid table");
        assert_eq!(table.len(), 2);
        assert_eq!(
            table.symbol(SymbolId(1)).map(|s| s.name.as_str()),
            Some("io.grpc.StableApi")
        );
    }

    #[test]
    fn rejects_misplaced_id() {
        let err = SymbolTable::new(vec![package(3, "io.grpc")]).unwrap_err();
        assert!(matches!(err, ModelError::MisplacedId { expected: 0, .. }));
    }

    #[test]
    fn rejects_unknown_owner() {
        let err = SymbolTable::new(vec![package(0, "io.grpc").owned_by(SymbolId(7))]).unwrap_err();
        assert_eq!(
            err,
            ModelError::UnknownOwner {
                name: "io.grpc".into(),
                owner: SymbolId(7),
            }
        );
    }

    #[test]
    fn rejects_cyclic_owner_chain() {
        let err = SymbolTable::new(vec![
            Symbol::new(SymbolId(0), "A", SymbolKind::Type).owned_by(SymbolId(1)),
            Symbol::new(SymbolId(1), "B", SymbolKind::Type).owned_by(SymbolId(0)),
        ])
        .unwrap_err();
        assert!(matches!(err, ModelError::CyclicOwner { .. }));
    }

    #[test]
    fn rejects_self_owner() {
        let err = SymbolTable::new(vec![package(0, "loop").owned_by(SymbolId(0))]).unwrap_err();
        assert!(matches!(err, ModelError::CyclicOwner { .. }));
    }

    #[test]
    fn rejects_override_on_field() {
        let err = SymbolTable::new(vec![
            Symbol::new(SymbolId(0), "Base.run", SymbolKind::Method),
            Symbol::new(SymbolId(1), "Impl.value", SymbolKind::Field).overrides(SymbolId(0)),
        ])
        .unwrap_err();
        assert!(matches!(err, ModelError::OverrideOnNonMethod { .. }));
    }

    #[test]
    fn rejects_override_of_non_method() {
        let err = SymbolTable::new(vec![
            Symbol::new(SymbolId(0), "Base", SymbolKind::Type),
            Symbol::new(SymbolId(1), "Impl.run", SymbolKind::Method).overrides(SymbolId(0)),
        ])
        .unwrap_err();
        assert!(matches!(err, ModelError::OverrideTargetNotMethod { .. }));
    }

    #[test]
    fn rejects_self_override() {
        let err = SymbolTable::new(vec![
            Symbol::new(SymbolId(0), "Impl.run", SymbolKind::Method).overrides(SymbolId(0))
        ])
        .unwrap_err();
        assert!(matches!(err, ModelError::SelfOverride { .. }));
    }

    #[test]
    fn annotation_lookup_and_first_value() {
        let annotation =
            AnnotationInstance::new(MARKER).with_element("value", "https://example.com/issue");
        let symbol = Symbol::new(SymbolId(0), "io.grpc.AnnotatedClass", SymbolKind::Type)
            .annotated(AnnotationInstance::new("java.lang.Deprecated"))
            .annotated(annotation.clone());

        assert_eq!(symbol.annotation(MARKER), Some(&annotation));
        assert_eq!(annotation.first_value(), Some("https://example.com/issue"));
        assert!(AnnotationInstance::new(MARKER).first_value().is_none());
    }

    #[test]
    fn deserializes_and_validates_from_json() {
        let json = r#"[
            {"id": 0, "name": "io.grpc", "kind": "package"},
            {"id": 1, "name": "io.grpc.IAnnotated", "kind": "type", "owner": 0,
             "annotations": [{"type_identifier": "io.grpc.ExperimentalApi"}]}
        ]"#;
        let table: SymbolTable = serde_json::from_str(json).expect("valid snapshot");
        let iface = table.symbol(SymbolId(1)).expect("symbol 1");
        assert_eq!(iface.owner, Some(SymbolId(0)));
        assert!(iface.annotation(MARKER).is_some());

        let cyclic = r#"[{"id": 0, "name": "x", "kind": "type", "owner": 0}]"#;
        let err = serde_json::from_str::<SymbolTable>(cyclic).unwrap_err();
        assert!(err.to_string().contains("cyclic"));
    }
}
