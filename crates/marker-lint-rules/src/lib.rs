//! # marker-lint-rules
//!
//! Built-in marker rules for marker-lint.
//!
//! Each rule is a [`MarkerRule`] configuration over the core matching
//! engine. Both track gRPC's stability annotations by default; the tracked
//! marker can be changed through configuration.
//!
//! ## Available Rules
//!
//! | Code | Name | Marker | Description |
//! |------|------|--------|-------------|
//! | MK001 | `experimental-api` | `io.grpc.ExperimentalApi` | Forbids references to experimental declarations |
//! | MK002 | `internal-api` | `io.grpc.Internal` | Forbids references to internal declarations |
//!
//! ## Usage
//!
//! ```ignore
//! use marker_lint_core::Analyzer;
//! use marker_lint_rules::{experimental_api_rule, internal_api_rule};
//!
//! let analyzer = Analyzer::builder()
//!     .root("./build/symbols")
//!     .rule(experimental_api_rule())
//!     .rule(internal_api_rule().strict_hierarchy(true))
//!     .build()?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod experimental_api;
pub mod internal_api;
mod presets;

pub use experimental_api::experimental_api_rule;
pub use internal_api::internal_api_rule;
pub use presets::{all_rules, is_known_rule, recommended_rules, rules_by_name, strict_rules, Preset};

/// Re-export core types for convenience.
pub use marker_lint_core::{MarkerRule, Rule, Severity, Violation};
