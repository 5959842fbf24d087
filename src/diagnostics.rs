//! Structured trace of a cut-placement run, for debugging and regression
//! tooling. Serializes to the version-1 JSON layout.

use std::fmt;

use serde::Serialize;

use crate::config::DEBUG_SCHEMA_VERSION;

/// Why the uniform fallback replaced the optimized cuts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackReason {
    /// Only the start and end rows were candidates.
    NoInternalCandidates,
    /// Candidates existed but no chain of valid pages reached the end row.
    NoValidPathToEnd,
}

impl fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FallbackReason::NoInternalCandidates => write!(f, "no internal candidates"),
            FallbackReason::NoValidPathToEnd => write!(f, "no valid path to end"),
        }
    }
}

/// Bridge candidate chosen inside one band.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BridgeDebug {
    pub row: usize,
    /// Minimum of the smoothed profile within the band.
    pub min_value: f64,
    /// Tolerance above the minimum that still counted as basin.
    pub tolerance: f64,
}

/// One fixed-height snap step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SnapDebug {
    /// Ideal boundary (a multiple of the target height).
    pub ideal: usize,
    /// First and last row examined (inclusive).
    pub start: usize,
    pub end: usize,
    /// Rows in `[start, end]` that passed the unsafe-cut test.
    pub safe_rows: usize,
}

/// Cost breakdown of one page on the chosen path.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EdgeCost {
    /// Candidate index of the page's top boundary.
    pub prev: usize,
    pub ink: f64,
    pub height: f64,
}

/// Read-only report produced alongside a [`CutPlan`](crate::CutPlan).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnostics {
    pub debug_schema_version: u32,
    pub candidates: Vec<usize>,
    pub bridge_debug: Vec<BridgeDebug>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snap_debug: Option<Vec<SnapDebug>>,
    pub chosen_path_costs: Vec<EdgeCost>,
    pub gap_thresh: f64,
    pub fallback: bool,
    pub fallback_reason: Option<FallbackReason>,
}

impl Diagnostics {
    pub(crate) fn new(
        candidates: Vec<usize>,
        bridge_debug: Vec<BridgeDebug>,
        snap_debug: Option<Vec<SnapDebug>>,
        gap_thresh: f64,
    ) -> Self {
        Self {
            debug_schema_version: DEBUG_SCHEMA_VERSION,
            candidates,
            bridge_debug,
            snap_debug,
            chosen_path_costs: Vec::new(),
            gap_thresh,
            fallback: false,
            fallback_reason: None,
        }
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Unweighted ink and height costs summed along the chosen path.
    pub fn path_totals(&self) -> (f64, f64) {
        self.chosen_path_costs
            .iter()
            .fold((0.0, 0.0), |(ink, height), e| (ink + e.ink, height + e.height))
    }
}

impl fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} candidates ({} bridge",
            self.candidates.len(),
            self.bridge_debug.len()
        )?;
        if let Some(snap) = &self.snap_debug {
            let safe: usize = snap.iter().map(|s| s.safe_rows).sum();
            write!(f, ", {} snap steps / {} safe rows", snap.len(), safe)?;
        }
        write!(f, "), gap threshold {:.4}", self.gap_thresh)?;
        match self.fallback_reason {
            Some(reason) => write!(f, ", fallback: {}", reason),
            None => {
                let (ink, height) = self.path_totals();
                write!(f, ", path ink {:.4} height {:.4}", ink, height)
            }
        }
    }
}
