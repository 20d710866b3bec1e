//! Compilation unit snapshots exported by a host front end.
//!
//! A snapshot is a JSON document holding the symbols visible to one
//! compilation unit and every reference site the host discovered in it:
//!
//! ```json
//! {
//!   "name": "example/Test.java",
//!   "symbols": [
//!     {"id": 0, "name": "io.grpc", "kind": "package"},
//!     {"id": 1, "name": "io.grpc.AnnotatedClass", "kind": "type", "owner": 0,
//!      "annotations": [{"type_identifier": "io.grpc.ExperimentalApi",
//!                       "elements": [{"name": "value", "value": "https://x/y"}]}]}
//!   ],
//!   "sites": [
//!     {"kind": "identifier", "name": "AnnotatedClass", "symbol": 1,
//!      "location": {"file": "example/Test.java", "line": 9, "column": 9}}
//!   ]
//! }
//! ```

use crate::site::ReferenceSite;
use crate::symbol::{SymbolModel, SymbolTable};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// File suffix of compilation unit snapshots.
pub const SNAPSHOT_SUFFIX: &str = ".symbols.json";

/// Errors loading a snapshot.
#[derive(Debug, thiserror::Error)]
pub enum UnitError {
    /// IO error reading the snapshot.
    #[error("Failed to read snapshot {path}: {source}")]
    Io {
        /// Snapshot path.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// Malformed JSON or invalid symbol model.
    #[error("Invalid snapshot {path}: {source}")]
    Parse {
        /// Snapshot path.
        path: PathBuf,
        /// Underlying JSON error, including model validation failures.
        source: serde_json::Error,
    },

    /// A site references a symbol the unit does not contain.
    #[error("Site '{site}' in {unit} references unknown symbol {symbol}")]
    UnknownSiteSymbol {
        /// Unit name.
        unit: String,
        /// Rendered site target.
        site: String,
        /// Dangling reference.
        symbol: crate::symbol::SymbolId,
    },
}

/// One compilation unit: its symbol graph and reference sites.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompilationUnit {
    /// Unit name, usually the source file path.
    pub name: String,
    /// Symbols visible to this unit.
    #[serde(default)]
    pub symbols: SymbolTable,
    /// Reference sites discovered in this unit.
    #[serde(default)]
    pub sites: Vec<ReferenceSite>,
}

impl CompilationUnit {
    /// Creates a unit from already validated parts.
    #[must_use]
    pub fn new(name: impl Into<String>, symbols: SymbolTable, sites: Vec<ReferenceSite>) -> Self {
        Self {
            name: name.into(),
            symbols,
            sites,
        }
    }

    /// Loads a snapshot file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not a valid snapshot,
    /// or references symbols it does not contain.
    pub fn from_file(path: &Path) -> Result<Self, UnitError> {
        let content = std::fs::read_to_string(path).map_err(|e| UnitError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        let unit: Self = serde_json::from_str(&content).map_err(|e| UnitError::Parse {
            path: path.to_path_buf(),
            source: e,
        })?;
        unit.validate_sites()?;
        Ok(unit)
    }

    /// Parses a snapshot from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is not a valid snapshot.
    pub fn parse(content: &str) -> Result<Self, UnitError> {
        let unit: Self = serde_json::from_str(content).map_err(|e| UnitError::Parse {
            path: PathBuf::new(),
            source: e,
        })?;
        unit.validate_sites()?;
        Ok(unit)
    }

    fn validate_sites(&self) -> Result<(), UnitError> {
        for site in &self.sites {
            if let Some(symbol) = site.symbol {
                if self.symbols.symbol(symbol).is_none() {
                    return Err(UnitError::UnknownSiteSymbol {
                        unit: self.name.clone(),
                        site: site.target_text(),
                        symbol,
                    });
                }
            }
        }
        Ok(())
    }
}

/// Returns whether `path` names a snapshot file.
#[must_use]
pub fn is_snapshot(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.ends_with(SNAPSHOT_SUFFIX))
}
