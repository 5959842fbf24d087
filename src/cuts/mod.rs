//! Cut placement: ink profile → page boundaries.
//!
//! 1. Boxcar smoothing of the profile
//! 2. Candidate rows (gaps, bridges, optional fixed-height snap)
//! 3. Minimum-cost path over candidates (DP + tie-break)
//! 4. Backtrace, or uniform fallback when the end row is unreachable

pub mod candidates;
pub mod fallback;
pub mod optimizer;
pub mod safety;

use log::{debug, warn};

use crate::config::CutConfig;
use crate::diagnostics::{Diagnostics, FallbackReason};
use crate::profile::smooth;

/// Page boundaries for one image.
///
/// `cuts` starts at 0, ends at the image height and is strictly increasing;
/// each adjacent pair is one page. `diagnostics` is filled only when
/// [`CutConfig::return_debug_info`] is set.
#[derive(Debug, Clone, PartialEq)]
pub struct CutPlan {
    pub cuts: Vec<usize>,
    /// Set when the uniform fallback replaced the optimized path.
    pub fallback: Option<FallbackReason>,
    pub diagnostics: Option<Diagnostics>,
}

impl CutPlan {
    /// `(start, end)` row range of every page.
    pub fn pages(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.cuts.windows(2).map(|w| (w[0], w[1]))
    }

    pub fn page_count(&self) -> usize {
        self.cuts.len().saturating_sub(1)
    }

    pub fn used_fallback(&self) -> bool {
        self.fallback.is_some()
    }
}

/// Choose page boundaries for an ink profile.
///
/// Never fails: when no chain of valid pages connects row 0 to the end row
/// the plan falls back to uniform slicing and records why. An empty
/// profile yields the single boundary `[0]`.
pub fn find_cuts(profile: &[f64], config: &CutConfig) -> CutPlan {
    let h = profile.len();
    let smoothed = smooth(profile, config.smoothing_radius);

    let set = candidates::generate(profile, &smoothed, config);
    debug!(
        "candidates: {} rows (gap threshold {:.4}, {} bridge{})",
        set.rows.len(),
        set.gap_thresh,
        set.bridge_debug.len(),
        match &set.snap_debug {
            Some(steps) => format!(", {} snap steps", steps.len()),
            None => String::new(),
        }
    );

    let table = optimizer::solve(&set.rows, profile, &smoothed, config);
    let path = if h == 0 {
        None
    } else {
        optimizer::backtrace(&table, &set.rows)
    };

    let (cuts, path_costs, fallback) = match path {
        Some((cuts, costs)) => (cuts, costs, None),
        None => {
            let reason = fallback::reason(set.rows.len());
            warn!(
                "no feasible cut path over {} rows ({}), slicing uniformly every {} rows",
                h, reason, config.target_height
            );
            (
                fallback::uniform_cuts(h, config.target_height),
                Vec::new(),
                Some(reason),
            )
        }
    };

    let diagnostics = config.return_debug_info.then(|| {
        let mut diag = Diagnostics::new(set.rows, set.bridge_debug, set.snap_debug, set.gap_thresh);
        diag.chosen_path_costs = path_costs;
        diag.fallback = fallback.is_some();
        diag.fallback_reason = fallback;
        diag
    });

    CutPlan {
        cuts,
        fallback,
        diagnostics,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pages_pair_up_boundaries() {
        let plan = CutPlan {
            cuts: vec![0, 10, 25],
            fallback: None,
            diagnostics: None,
        };
        assert_eq!(plan.pages().collect::<Vec<_>>(), vec![(0, 10), (10, 25)]);
        assert_eq!(plan.page_count(), 2);
        assert!(!plan.used_fallback());
    }

    #[test]
    fn empty_profile_is_single_boundary() {
        let plan = find_cuts(&[], &CutConfig::default());
        assert_eq!(plan.cuts, vec![0]);
        assert_eq!(plan.page_count(), 0);
        assert_eq!(plan.fallback, Some(FallbackReason::NoInternalCandidates));
    }

    #[test]
    fn short_image_is_one_page() {
        let profile = vec![0.2; 800];
        let config = CutConfig {
            target_height: 1000,
            ..CutConfig::default()
        };
        let plan = find_cuts(&profile, &config);
        assert_eq!(plan.cuts, vec![0, 800]);
        assert!(plan.diagnostics.is_none());
    }

    #[test]
    fn tiny_image_falls_back() {
        // Shorter than the minimum last page: no edge can reach the end.
        let profile = vec![0.0; 30];
        let config = CutConfig {
            target_height: 1000,
            return_debug_info: true,
            ..CutConfig::default()
        };
        let plan = find_cuts(&profile, &config);
        assert_eq!(plan.cuts, vec![0, 30]);
        let diag = plan.diagnostics.unwrap();
        assert!(diag.fallback);
        assert!(diag.chosen_path_costs.is_empty());
    }

    #[test]
    fn diagnostics_mirror_plan() {
        let mut profile = vec![0.3; 2150];
        for v in &mut profile[990..1010] {
            *v = 0.0;
        }
        for v in &mut profile[1990..2010] {
            *v = 0.0;
        }
        let config = CutConfig {
            target_height: 1000,
            window_frac: 0.1,
            return_debug_info: true,
            ..CutConfig::default()
        };
        let plan = find_cuts(&profile, &config);
        let diag = plan.diagnostics.as_ref().unwrap();
        assert!(!diag.fallback);
        assert_eq!(diag.fallback_reason, None);
        assert_eq!(diag.chosen_path_costs.len(), plan.page_count());
        for c in &plan.cuts {
            assert!(diag.candidates.contains(c));
        }
        assert!(diag.snap_debug.is_none());
    }
}
