#![allow(dead_code)]

pub mod synthetic;

/// Boundaries start at 0, end at `h` and strictly increase.
pub fn assert_plan_invariants(cuts: &[usize], h: usize) {
    assert!(cuts.len() >= 2, "expected at least [0, H], got {:?}", cuts);
    assert_eq!(cuts[0], 0, "cuts must start at 0: {:?}", cuts);
    assert_eq!(*cuts.last().unwrap(), h, "cuts must end at H: {:?}", cuts);
    assert!(
        cuts.windows(2).all(|w| w[0] < w[1]),
        "cuts must strictly increase: {:?}",
        cuts
    );
}

/// Every page except the last is within `floor(target * window_frac)`.
pub fn assert_window(cuts: &[usize], target: usize, window_frac: f64) {
    let max_window = (target as f64 * window_frac) as usize;
    for (i, w) in cuts.windows(2).take(cuts.len().saturating_sub(2)).enumerate() {
        let h = w[1] - w[0];
        assert!(
            h.abs_diff(target) <= max_window,
            "page {} height {} outside {} \u{00b1} {} ({:?})",
            i,
            h,
            target,
            max_window,
            cuts
        );
    }
}
