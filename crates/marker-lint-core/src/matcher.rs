//! Marker matching engine.
//!
//! Three pure functions over a [`SymbolModel`]:
//!
//! - [`find_marker`] walks the owner chain upward, self first, and returns
//!   the nearest occurrence of the tracked annotation.
//! - [`hierarchy_consistently_marked`] requires every overridden
//!   super-method to resolve as marked under the same walk.
//! - [`match_site`] combines both for one reference site.
//!
//! None of them mutate shared state, so sites can be matched from any
//! number of threads against the same model.

use crate::site::ReferenceSite;
use crate::symbol::{AnnotationInstance, SymbolId, SymbolModel};
use tracing::{debug, trace, warn};

/// Outcome of matching one reference site.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchResult<'a> {
    /// The site does not reference a marked symbol.
    NoMatch,
    /// The site references a marked symbol; `evidence` justified the match.
    Match {
        /// The annotation occurrence found nearest to the referenced symbol.
        evidence: &'a AnnotationInstance,
    },
}

impl<'a> MatchResult<'a> {
    /// Returns true for [`MatchResult::Match`].
    #[must_use]
    pub fn is_match(&self) -> bool {
        matches!(self, Self::Match { .. })
    }

    /// Returns the evidence of a match.
    #[must_use]
    pub fn evidence(&self) -> Option<&'a AnnotationInstance> {
        match self {
            Self::Match { evidence } => Some(evidence),
            Self::NoMatch => None,
        }
    }
}

/// Finds the nearest `marker` annotation on `id` or its enclosing declarations.
///
/// Returns `None` when the chain ends without a match or an owner cannot be
/// looked up. An acyclic chain visits at most `model.len()` symbols, so a
/// longer walk means the model has a cycle and is treated as unmarked.
#[must_use]
pub fn find_marker<'m>(
    model: &'m dyn SymbolModel,
    id: SymbolId,
    marker: &str,
) -> Option<&'m AnnotationInstance> {
    let limit = model.len();
    let mut current = Some(id);
    let mut depth = 0;

    while let Some(id) = current {
        if depth >= limit {
            warn!(
                "Owner chain reaches {} after {} levels, model is cyclic; treating as unmarked",
                id, depth
            );
            return None;
        }

        let symbol = model.symbol(id)?;
        if let Some(annotation) = symbol.annotation(marker) {
            trace!("Found {} on '{}' at depth {}", marker, symbol.name, depth);
            return Some(annotation);
        }

        current = symbol.owner;
        depth += 1;
    }

    None
}

/// Checks that every method overridden by `id` is itself marked.
///
/// Non-methods and methods with an empty override set have no hierarchy
/// obligations and return `true`. Each super-method is resolved with
/// [`find_marker`], so it counts as marked through its own owners too.
#[must_use]
pub fn hierarchy_consistently_marked(model: &dyn SymbolModel, id: SymbolId, marker: &str) -> bool {
    let Some(symbol) = model.symbol(id) else {
        return true;
    };
    if !symbol.is_method() {
        return true;
    }

    symbol.overridden.iter().all(|&super_method| {
        let marked = find_marker(model, super_method, marker).is_some();
        if !marked {
            debug!(
                "'{}' overrides unmarked {}, hierarchy is not consistently {}",
                symbol.name, super_method, marker
            );
        }
        marked
    })
}

/// Decides whether `site` references a symbol carrying `marker`.
///
/// Unresolved sites never match. With `strict_hierarchy`, a method whose
/// override set is not uniformly marked does not match even when evidence
/// was found on the method or its owners.
#[must_use]
pub fn match_site<'m>(
    model: &'m dyn SymbolModel,
    site: &ReferenceSite,
    marker: &str,
    strict_hierarchy: bool,
) -> MatchResult<'m> {
    let Some(id) = site.symbol else {
        trace!("Unresolved reference '{}', skipping", site.target_text());
        return MatchResult::NoMatch;
    };

    let Some(evidence) = find_marker(model, id, marker) else {
        return MatchResult::NoMatch;
    };

    if strict_hierarchy && !hierarchy_consistently_marked(model, id, marker) {
        return MatchResult::NoMatch;
    }

    MatchResult::Match { evidence }
}
