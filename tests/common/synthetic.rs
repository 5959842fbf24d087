use image::{Rgb, RgbImage};

/// Profile of `h` rows at a constant ink level.
pub fn flat_profile(h: usize, level: f64) -> Vec<f64> {
    vec![level; h]
}

/// Overwrite `rows` of `profile` with `level`.
pub fn set_band(profile: &mut [f64], rows: std::ops::Range<usize>, level: f64) {
    for v in &mut profile[rows] {
        *v = level;
    }
}

/// White page with dashed "text lines" (14 rows ink, 6 rows leading) and
/// fully blank bands at `gaps`.
pub fn text_page(width: u32, height: u32, gaps: &[(u32, u32)]) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        let in_gap = gaps.iter().any(|&(a, b)| y >= a && y < b);
        let in_line = y % 20 < 14;
        if !in_gap && in_line && x % 8 < 4 {
            Rgb([20, 20, 20])
        } else {
            Rgb([250, 250, 250])
        }
    })
}
