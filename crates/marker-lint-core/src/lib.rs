//! # marker-lint-core
//!
//! Core engine for flagging references to declarations that carry a marker
//! annotation (experimental, internal, beta, ...).
//!
//! This crate provides:
//!
//! - [`SymbolModel`] and [`SymbolTable`], the read-only symbol graph supplied
//!   by a host front end
//! - [`find_marker`], [`hierarchy_consistently_marked`] and [`match_site`],
//!   the matching engine
//! - [`Rule`] and [`MarkerRule`] for turning matches into [`Violation`]s
//! - [`Analyzer`] for evaluating rules over compilation unit snapshots
//!
//! ## Example
//!
//! ```ignore
//! use marker_lint_core::{Analyzer, MarkerRule};
//!
//! let analyzer = Analyzer::builder()
//!     .root("./build/symbols")
//!     .rule(MarkerRule::new("MK100", "beta-api").marker("com.example.Beta"))
//!     .build()?;
//!
//! let result = analyzer.analyze()?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod analyzer;
mod config;
mod marker_rule;
mod matcher;
mod rule;
mod site;
mod symbol;
mod types;
mod unit;

pub use analyzer::{Analyzer, AnalyzerBuilder, AnalyzerError};
pub use config::{AnalyzerConfig, Config, ConfigError, RuleConfig};
pub use marker_rule::{describe_match, DescribeFn, MarkerRule};
pub use matcher::{find_marker, hierarchy_consistently_marked, match_site, MatchResult};
pub use rule::{Rule, RuleBox};
pub use site::{ReferenceKind, ReferenceSite};
pub use symbol::{
    AnnotationElement, AnnotationInstance, ModelError, Symbol, SymbolId, SymbolKind, SymbolModel,
    SymbolTable,
};
pub use types::{LintResult, Location, Severity, Violation, ViolationDiagnostic};
pub use unit::{is_snapshot, CompilationUnit, UnitError, SNAPSHOT_SUFFIX};
