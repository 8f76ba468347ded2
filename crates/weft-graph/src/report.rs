//! Build report: warnings accumulated during graph construction.
//!
//! Only a collection-load failure aborts a build. Everything else degrades
//! gracefully — the condition is recorded here, logged, and the best-effort
//! graph is served. Strict callers inspect the report and reject graphs
//! that carry warnings.

use serde::{Deserialize, Serialize};
use tracing::warn;
use weft_core::EntryKey;

// ---------------------------------------------------------------------------
// BuildWarning
// ---------------------------------------------------------------------------

/// A non-fatal condition encountered while building a graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum BuildWarning {
    /// A relation points at a target that is not in the build set. The
    /// forward edge is kept; no reverse edge is produced.
    #[error("dangling reference {origin} -[{field}]-> {target}")]
    DanglingReference {
        origin: EntryKey,
        field: String,
        target: EntryKey,
    },

    /// A parent chain revisited a node. The walk stopped there and the
    /// revisited node was treated as if it had no parent.
    #[error("parent cycle at {at}: chain revisits {revisited}")]
    CycleDetected {
        at: EntryKey,
        revisited: EntryKey,
        /// The ancestors collected before the revisit, nearest first.
        chain: Vec<EntryKey>,
    },

    /// A relation field held a value that is neither scalar, object, nor a
    /// sequence of either. The field contributed zero relations.
    #[error("invalid reference shape on {key} field '{field}'")]
    InvalidReferenceShape { key: EntryKey, field: String },
}

// ---------------------------------------------------------------------------
// BuildReport
// ---------------------------------------------------------------------------

/// All warnings from one build, in the order they were encountered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildReport {
    pub warnings: Vec<BuildWarning>,
}

impl BuildReport {
    /// Record a warning and surface it to the log.
    pub fn push(&mut self, warning: BuildWarning) {
        warn!("{warning}");
        self.warnings.push(warning);
    }

    /// `true` when no warnings were recorded.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }

    /// Total number of warnings.
    #[must_use]
    pub fn warning_count(&self) -> usize {
        self.warnings.len()
    }

    /// Number of dangling-reference warnings.
    #[must_use]
    pub fn dangling_count(&self) -> usize {
        self.warnings
            .iter()
            .filter(|w| matches!(w, BuildWarning::DanglingReference { .. }))
            .count()
    }

    /// Number of parent-cycle warnings.
    #[must_use]
    pub fn cycle_count(&self) -> usize {
        self.warnings
            .iter()
            .filter(|w| matches!(w, BuildWarning::CycleDetected { .. }))
            .count()
    }

    /// Number of invalid-shape warnings.
    #[must_use]
    pub fn invalid_shape_count(&self) -> usize {
        self.warnings
            .iter()
            .filter(|w| matches!(w, BuildWarning::InvalidReferenceShape { .. }))
            .count()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
