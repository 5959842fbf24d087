//! Minimum-cost cut path via dynamic programming.
//!
//! Candidates sorted by row form an implicit DAG: an edge `j → i` is one
//! page spanning `rows[j]..rows[i]`. Internal pages must stay within
//! `max_window` of the target height; the final page only has to be at
//! least [`MIN_LAST_PAGE_HEIGHT`] rows tall. The cost of an edge is
//!
//! ```text
//! w_ink * ink_cost(rows[i]) + w_height * |height - target| / target
//! ```
//!
//! (height term is zero for the final page). Ties within [`TIE_EPSILON`]
//! go to the predecessor whose page height is closest to the target.

use crate::config::{CutConfig, CutMode, INK_COST_RADIUS, MIN_LAST_PAGE_HEIGHT, TIE_EPSILON};
use crate::diagnostics::EdgeCost;

use super::safety::is_unsafe_cut;

/// Per-node DP state, indexed by candidate.
#[derive(Debug, Clone)]
pub struct DpTable {
    /// Best path cost to each node; `f64::INFINITY` when unreachable.
    pub cost: Vec<f64>,
    pub parent: Vec<Option<usize>>,
    /// Cost breakdown of the adopted incoming edge.
    pub edge: Vec<Option<EdgeCost>>,
}

impl DpTable {
    /// Whether the end row (last node) was reached.
    pub fn reaches_end(&self) -> bool {
        self.cost.last().is_some_and(|c| c.is_finite())
    }
}

/// Ink cost of cutting at `row`.
///
/// Zero at the end row. With smoothing enabled, the mean of the smoothed
/// profile over `row ± INK_COST_RADIUS`; otherwise the value at `row`.
pub fn ink_cost(smoothed: &[f64], row: usize, smoothing_radius: usize) -> f64 {
    let h = smoothed.len();
    if row >= h {
        return 0.0;
    }
    if smoothing_radius == 0 {
        return smoothed[row];
    }
    let start = row.saturating_sub(INK_COST_RADIUS);
    let end = (row + INK_COST_RADIUS + 1).min(h);
    let window = &smoothed[start..end];
    window.iter().sum::<f64>() / window.len() as f64
}

/// Fill the DP table over the sorted candidate `rows`.
///
/// `raw` is only consulted in fixed-height snap mode, where unsafe rows are
/// left unreachable so they can never be chosen.
pub fn solve(rows: &[usize], raw: &[f64], smoothed: &[f64], config: &CutConfig) -> DpTable {
    let n = rows.len();
    let h = raw.len();
    let target = config.target_height;
    let max_window = config.max_window();

    let mut cost = vec![f64::INFINITY; n];
    let mut parent: Vec<Option<usize>> = vec![None; n];
    let mut edge: Vec<Option<EdgeCost>> = vec![None; n];
    if n == 0 {
        return DpTable { cost, parent, edge };
    }
    cost[0] = 0.0;

    for i in 1..n {
        let row = rows[i];
        if config.cut_mode == CutMode::FixedHeightSnap
            && is_unsafe_cut(
                raw,
                row,
                config.unsafe_window_radius,
                config.unsafe_ink_threshold,
            )
        {
            continue;
        }

        let ink = ink_cost(smoothed, row, config.smoothing_radius);
        let is_last = row == h;

        for j in (0..i).rev() {
            let height = row - rows[j];
            // Rows only decrease from here on, so every further page is taller.
            if height > target + max_window {
                break;
            }

            let deviation = height.abs_diff(target);
            let height_cost = if is_last {
                if height < MIN_LAST_PAGE_HEIGHT {
                    continue;
                }
                0.0
            } else {
                if deviation > max_window {
                    continue;
                }
                deviation as f64 / target as f64
            };

            let total = cost[j] + config.w_ink * ink + config.w_height * height_cost;
            let adopt = if total < cost[i] - TIE_EPSILON {
                true
            } else if cost[i].is_finite() && (total - cost[i]).abs() < TIE_EPSILON {
                parent[i].is_some_and(|p| deviation < (row - rows[p]).abs_diff(target))
            } else {
                false
            };

            if adopt {
                cost[i] = total;
                parent[i] = Some(j);
                edge[i] = Some(EdgeCost {
                    prev: j,
                    ink,
                    height: height_cost,
                });
            }
        }
    }

    DpTable { cost, parent, edge }
}

/// Walk parent pointers back from the end node.
///
/// Returns the ascending cut rows and the per-page cost breakdown, or
/// `None` when the end row is unreachable.
pub fn backtrace(table: &DpTable, rows: &[usize]) -> Option<(Vec<usize>, Vec<EdgeCost>)> {
    if !table.reaches_end() {
        return None;
    }

    let mut cuts = Vec::new();
    let mut costs = Vec::new();
    let mut cursor = rows.len() - 1;
    loop {
        cuts.push(rows[cursor]);
        if let Some(e) = table.edge[cursor] {
            costs.push(e);
        }
        match table.parent[cursor] {
            Some(prev) => cursor = prev,
            None => break,
        }
    }
    cuts.reverse();
    costs.reverse();
    Some((cuts, costs))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(target: usize, window_frac: f64) -> CutConfig {
        CutConfig {
            target_height: target,
            window_frac,
            smoothing_radius: 0,
            ..CutConfig::default()
        }
    }

    #[test]
    fn ink_cost_window_and_terminal() {
        let smoothed = vec![0.0, 0.1, 0.2, 0.3, 0.4, 0.5];
        assert_eq!(ink_cost(&smoothed, 6, 10), 0.0);
        assert_eq!(ink_cost(&smoothed, 3, 0), 0.3);
        // rows 1..=5
        assert!((ink_cost(&smoothed, 3, 10) - 0.3).abs() < 1e-12);
        // rows 0..=2, clipped at the top
        assert!((ink_cost(&smoothed, 0, 10) - 0.1).abs() < 1e-12);
    }

    #[test]
    fn picks_lowest_ink_row_within_window() {
        let mut raw = vec![0.5; 200];
        raw[95] = 0.1;
        raw[105] = 0.0;
        let rows = vec![0, 95, 105, 200];
        let cfg = config(100, 0.1);
        let table = solve(&rows, &raw, &raw, &cfg);
        let (cuts, costs) = backtrace(&table, &rows).unwrap();
        assert_eq!(cuts, vec![0, 105, 200]);
        assert_eq!(costs.len(), 2);
        assert_eq!(costs[0].prev, 0);
        assert!((costs[0].height - 0.05).abs() < 1e-12);
        assert_eq!(costs[1].ink, 0.0);
    }

    #[test]
    fn tie_prefers_height_closest_to_target() {
        // No ink and no height weight: every path costs exactly zero.
        let raw = vec![0.0; 200];
        let rows = vec![0, 96, 100, 104, 200];
        let cfg = CutConfig {
            w_height: 0.0,
            ..config(100, 0.1)
        };
        let table = solve(&rows, &raw, &raw, &cfg);
        // Node 4 (row 200) is reachable from 96, 100 and 104 at equal cost;
        // 100 gives the exact target height.
        assert_eq!(table.parent[4], Some(2));
        // Row 100 itself: only predecessor 0 is in window.
        assert_eq!(table.parent[2], Some(0));
    }

    #[test]
    fn short_last_page_is_rejected() {
        let raw = vec![0.0; 130];
        let rows = vec![0, 100, 130];
        let table = solve(&rows, &raw, &raw, &config(100, 0.1));
        assert!(!table.reaches_end());
        assert!(backtrace(&table, &rows).is_none());
    }

    #[test]
    fn last_page_ignores_window() {
        let raw = vec![0.0; 160];
        let rows = vec![0, 100, 160];
        let (cuts, _) = backtrace(&solve(&rows, &raw, &raw, &config(100, 0.1)), &rows).unwrap();
        assert_eq!(cuts, vec![0, 100, 160]);
    }

    #[test]
    fn unsafe_rows_are_unreachable_in_snap_mode() {
        let mut raw = vec![0.9; 220];
        raw[110] = 0.0;
        let rows = vec![0, 100, 110, 220];
        let cfg = CutConfig {
            cut_mode: CutMode::FixedHeightSnap,
            unsafe_window_radius: 2,
            unsafe_ink_threshold: 0.3,
            ..config(100, 0.2)
        };
        let table = solve(&rows, &raw, &raw, &cfg);
        assert!(table.cost[1].is_infinite());
        let (cuts, _) = backtrace(&table, &rows).unwrap();
        assert_eq!(cuts, vec![0, 110, 220]);
    }

    #[test]
    fn empty_candidate_list() {
        let table = solve(&[], &[], &[], &config(100, 0.1));
        assert!(!table.reaches_end());
    }
}
