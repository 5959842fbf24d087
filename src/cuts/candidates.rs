//! Candidate cut rows.
//!
//! Three independent generators feed one sorted, duplicate-free list:
//!
//! 1. **Gaps**: midpoints of long runs of blank rows in the raw profile.
//! 2. **Bridges**: per fixed band, the middle of the widest near-minimum
//!    basin of the smoothed profile. These make dense pages cuttable.
//! 3. **Snap** (fixed-height mode only): every safe row around each ideal
//!    multiple of the target height.
//!
//! Row 0 and the end row are always present.

use crate::config::{CutConfig, CutMode};
use crate::diagnostics::{BridgeDebug, SnapDebug};
use crate::profile::{gap_threshold, percentile};

use super::safety::is_unsafe_cut;

/// Output of candidate generation.
#[derive(Debug, Clone)]
pub struct CandidateSet {
    /// Sorted, unique rows in `[0, H]`, always starting at 0 and ending at H.
    pub rows: Vec<usize>,
    pub gap_thresh: f64,
    pub bridge_debug: Vec<BridgeDebug>,
    /// Present only in fixed-height snap mode.
    pub snap_debug: Option<Vec<SnapDebug>>,
}

/// Run all generators over the raw and smoothed profiles.
pub fn generate(raw: &[f64], smoothed: &[f64], config: &CutConfig) -> CandidateSet {
    let h = raw.len();
    let mut rows = vec![0, h];

    let gap_thresh = gap_threshold(raw, config.gap_cap);
    rows.extend(gap_candidates(raw, gap_thresh, config.min_gap_rows));

    let bridge_debug = bridge_candidates(
        smoothed,
        config.band_size,
        config.basin_tol_floor,
        config.basin_tol_scale,
    );
    rows.extend(bridge_debug.iter().map(|b| b.row));

    let snap_debug = match config.cut_mode {
        CutMode::FixedHeightSnap => {
            let (snap_rows, steps) = snap_candidates(raw, config);
            rows.extend(snap_rows);
            Some(steps)
        }
        CutMode::Whitespace => None,
    };

    rows.sort_unstable();
    rows.dedup();

    CandidateSet {
        rows,
        gap_thresh,
        bridge_debug,
        snap_debug,
    }
}

/// Midpoints of every run of rows with `ink <= threshold` that is at least
/// `min_run` rows long.
pub fn gap_candidates(raw: &[f64], threshold: f64, min_run: usize) -> Vec<usize> {
    let h = raw.len();
    let mut out = Vec::new();
    let mut i = 0;
    while i < h {
        if raw[i] <= threshold {
            let start = i;
            while i < h && raw[i] <= threshold {
                i += 1;
            }
            let len = i - start;
            if len >= min_run {
                out.push(start + len / 2);
            }
        } else {
            i += 1;
        }
    }
    out
}

/// One bridge candidate per band of `band_size` rows.
///
/// Within a band every row whose smoothed value is within
/// `max(tol_floor, tol_scale * (median - min))` of the band minimum belongs
/// to the basin; the candidate is the middle entry of that row list. This
/// lands in the widest flat valley instead of on a noisy single minimum.
pub fn bridge_candidates(
    smoothed: &[f64],
    band_size: usize,
    tol_floor: f64,
    tol_scale: f64,
) -> Vec<BridgeDebug> {
    if band_size == 0 {
        return Vec::new();
    }

    let mut out = Vec::new();
    for start in (0..smoothed.len()).step_by(band_size) {
        let end = (start + band_size).min(smoothed.len());
        let band = &smoothed[start..end];
        let Some(median) = percentile(band, 50.0) else {
            continue;
        };
        let min = band.iter().copied().fold(f64::INFINITY, f64::min);
        let tolerance = tol_floor.max(tol_scale * (median - min));

        let basin: Vec<usize> = band
            .iter()
            .enumerate()
            .filter(|&(_, &v)| v <= min + tolerance)
            .map(|(offset, _)| offset)
            .collect();
        if basin.is_empty() {
            continue;
        }

        out.push(BridgeDebug {
            row: start + basin[basin.len() / 2],
            min_value: min,
            tolerance,
        });
    }
    out
}

/// Safe rows within `snap_px` of each multiple of the target height.
pub fn snap_candidates(raw: &[f64], config: &CutConfig) -> (Vec<usize>, Vec<SnapDebug>) {
    let h = raw.len();
    let step = config.target_height;
    let mut rows = Vec::new();
    let mut steps = Vec::new();
    if step == 0 {
        return (rows, steps);
    }

    let mut ideal = step;
    while ideal < h {
        let start = ideal.saturating_sub(config.snap_px);
        let end = (ideal + config.snap_px).min(h);
        let before = rows.len();
        rows.extend((start..=end).filter(|&row| {
            !is_unsafe_cut(
                raw,
                row,
                config.unsafe_window_radius,
                config.unsafe_ink_threshold,
            )
        }));
        steps.push(SnapDebug {
            ideal,
            start,
            end,
            safe_rows: rows.len() - before,
        });
        ideal += step;
    }
    (rows, steps)
}
