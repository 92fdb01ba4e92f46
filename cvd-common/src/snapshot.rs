use crate::summary::Census;
use serde::{Deserialize, Serialize};

/// A snapshot of the lattice at a specific step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    /// Completed steps when the snapshot was taken (0 = initial lattice).
    pub step: u32,
    pub nx: usize,
    pub ny: usize,
    /// Population by cell state.
    pub census: Census,
    /// Optional: row-major cell codes (see `Cell::code`).
    /// Included only if `output.save_cells_in_snapshot` is true.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cells: Option<Vec<u8>>,
}
