//! Numeric helpers over 1-D ink profiles.

use crate::config::{GAP_THRESH_BLANK, GAP_THRESH_FLOOR};

/// Boxcar average of width `2 * radius + 1` with edge replication.
///
/// Runs in O(len) for any radius using a sliding sum over clamped indices,
/// so radii beyond half the profile length behave like a replicated edge.
pub fn smooth(profile: &[f64], radius: usize) -> Vec<f64> {
    let n = profile.len();
    if radius == 0 || n == 0 {
        return profile.to_vec();
    }

    let at = |k: isize| profile[k.clamp(0, n as isize - 1) as usize];
    let r = radius as isize;
    let size = (2 * radius + 1) as f64;

    let mut sum: f64 = (-r..=r).map(at).sum();
    let mut out = Vec::with_capacity(n);
    for i in 0..n as isize {
        out.push(sum / size);
        sum += at(i + r + 1) - at(i - r);
    }
    out
}

/// Percentile `q` (0–100) with linear interpolation between closest ranks.
///
/// Returns `None` for an empty slice.
pub fn percentile(values: &[f64], q: f64) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let pos = (q / 100.0).clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}

/// Ink level at or below which a row counts as blank.
///
/// The 5th percentile of the raw profile, capped at `gap_cap` and floored
/// at [`GAP_THRESH_FLOOR`]; a profile without any ink uses
/// [`GAP_THRESH_BLANK`].
pub fn gap_threshold(profile: &[f64], gap_cap: f64) -> f64 {
    let max = profile.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if !(max > 0.0) {
        return GAP_THRESH_BLANK;
    }
    match percentile(profile, 5.0) {
        Some(p5) => p5.min(gap_cap).max(GAP_THRESH_FLOOR),
        None => GAP_THRESH_BLANK,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-12
    }

    #[test]
    fn radius_zero_is_identity() {
        let p = vec![0.1, 0.5, 0.9];
        assert_eq!(smooth(&p, 0), p);
    }

    #[test]
    fn smoothing_replicates_edges() {
        let p = vec![1.0, 0.0, 0.0, 0.0];
        let s = smooth(&p, 1);
        // Row 0 sees [1, 1, 0] through the replicated edge.
        assert!(close(s[0], 2.0 / 3.0));
        assert!(close(s[1], 1.0 / 3.0));
        assert!(close(s[2], 0.0));
        assert!(close(s[3], 0.0));
    }

    #[test]
    fn huge_radius_stays_bounded() {
        let p: Vec<f64> = (0..50).map(|i| i as f64 / 49.0).collect();
        let s = smooth(&p, 500);
        assert_eq!(s.len(), p.len());
        assert!(s.iter().all(|v| v.is_finite() && *v >= -1e-12 && *v <= 1.0 + 1e-12));
        // With the window dwarfing the profile, both ends are dominated by
        // their replicated edge value.
        assert!(s[0] < s[49]);
    }

    #[test]
    fn constant_profile_stays_constant() {
        let p = vec![0.3; 100];
        assert!(smooth(&p, 10).iter().all(|&v| close(v, 0.3)));
    }

    #[test]
    fn percentile_interpolates() {
        let v = [4.0, 1.0, 3.0, 2.0];
        assert_eq!(percentile(&v, 0.0), Some(1.0));
        assert_eq!(percentile(&v, 100.0), Some(4.0));
        assert!(close(percentile(&v, 50.0).unwrap(), 2.5));
        assert!(close(percentile(&v, 5.0).unwrap(), 1.15));
        assert_eq!(percentile(&[], 50.0), None);
    }

    #[test]
    fn gap_threshold_rules() {
        assert_eq!(gap_threshold(&[0.0; 10], 0.05), GAP_THRESH_BLANK);
        assert_eq!(gap_threshold(&[], 0.05), GAP_THRESH_BLANK);
        // Dense everywhere: capped.
        assert_eq!(gap_threshold(&[0.8; 10], 0.05), 0.05);
        // Many blank rows: floored.
        let mut p = vec![0.0; 100];
        p[50] = 0.7;
        assert_eq!(gap_threshold(&p, 0.05), GAP_THRESH_FLOOR);
    }
}
