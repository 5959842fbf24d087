//! Unsafe-cut test used by fixed-height snapping.

/// True when every row within `radius` of `row` has ink above `threshold`,
/// i.e. there is no local gap for a cut to hide in.
///
/// The image boundaries (row 0 and the end row) are never unsafe.
pub fn is_unsafe_cut(profile: &[f64], row: usize, radius: usize, threshold: f64) -> bool {
    let h = profile.len();
    if row == 0 || row >= h {
        return false;
    }
    let start = row.saturating_sub(radius);
    let end = (row + radius + 1).min(h);
    let min_ink = profile[start..end]
        .iter()
        .copied()
        .fold(f64::INFINITY, f64::min);
    min_ink > threshold
}
