//! Expansion trace: every edge the router produced, in production order.
//!
//! A trace is the debugging view of one routing run. It serializes to JSON
//! and carries a content digest so sequential runs can be locked against
//! drift.
//!
//! # Digest format
//!
//! `sha256:` followed by the lowercase hex SHA-256 of the compact JSON
//! encoding.

use std::path::Path;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::router::Heuristic;
use crate::worlds::grid::Cell;

/// Prefix of every trace digest.
pub const DIGEST_PREFIX: &str = "sha256:";

/// Errors persisting or digesting a trace.
#[derive(Debug, thiserror::Error)]
pub enum TraceError {
    #[error("trace serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("trace file I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

/// One produced edge, with its heuristic-adjusted incremental cost.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TracedEdge {
    pub from: Cell,
    pub to: Cell,
    pub cost: f64,
}

/// The route a traced run found.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TracedRoute {
    pub cost: f64,
    pub iteration: u64,
    pub path: Vec<Cell>,
}

/// Record of one routing run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpansionTrace {
    pub start: Cell,
    pub goal: Cell,
    pub heuristic: Heuristic,
    pub worker_count: usize,
    /// Edges in the order their successor sequences yielded them.
    pub edges: Vec<TracedEdge>,
    /// `None` when the goal was unreachable.
    pub route: Option<TracedRoute>,
}

impl ExpansionTrace {
    /// Pretty JSON, for files meant to be read by people.
    ///
    /// # Errors
    ///
    /// Returns [`TraceError::Json`] if serialization fails.
    pub fn to_json(&self) -> Result<String, TraceError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Content digest over the compact JSON encoding.
    ///
    /// # Errors
    ///
    /// Returns [`TraceError::Json`] if serialization fails.
    pub fn digest(&self) -> Result<String, TraceError> {
        let bytes = serde_json::to_vec(self)?;
        let hash = Sha256::digest(&bytes);
        Ok(format!("{DIGEST_PREFIX}{}", hex::encode(hash)))
    }

    /// Write the trace as pretty JSON.
    ///
    /// # Errors
    ///
    /// Returns [`TraceError`] on serialization or I/O failure.
    pub fn write_to(&self, path: &Path) -> Result<(), TraceError> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }

    /// Read a trace written by [`ExpansionTrace::write_to`].
    ///
    /// # Errors
    ///
    /// Returns [`TraceError`] on I/O failure or malformed JSON.
    pub fn read_from(path: &Path) -> Result<Self, TraceError> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Distinct cells whose successors were produced.
    #[must_use]
    pub fn expanded_cells(&self) -> std::collections::BTreeSet<Cell> {
        self.edges.iter().map(|edge| edge.from).collect()
    }
}
