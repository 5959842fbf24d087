//! Uniform slicing used when the optimizer cannot reach the end row.

use crate::diagnostics::FallbackReason;

/// `0, t, 2t, …` below `height`, closed with `height` itself.
///
/// Monotonic and bounded by 0 and `height`, but carries no window or
/// safety guarantee. A zero `target_height` is treated as 1.
pub fn uniform_cuts(height: usize, target_height: usize) -> Vec<usize> {
    let mut cuts: Vec<usize> = (0..height).step_by(target_height.max(1)).collect();
    cuts.push(height);
    cuts.dedup();
    cuts
}

/// Classify a failed DP run by how many candidates it had.
pub fn reason(candidate_count: usize) -> FallbackReason {
    if candidate_count <= 2 {
        FallbackReason::NoInternalCandidates
    } else {
        FallbackReason::NoValidPathToEnd
    }
}
