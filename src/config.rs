use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::PaginateError;

// ── Load-bearing constants ───────────────────────────────
//
// These reproduce the reference cut placements bit for bit. Changing any of
// them changes golden outputs, so they are constants rather than knobs.

/// Shortest final page the optimizer will accept, in pixels.
pub const MIN_LAST_PAGE_HEIGHT: usize = 50;
/// Tolerance for treating two DP path costs as equal.
pub const TIE_EPSILON: f64 = 1e-9;
/// Side of the square window used for the local adaptive mean.
pub const ADAPTIVE_BLOCK_SIZE: usize = 11;
/// A pixel is ink when it is darker than `local_mean - ADAPTIVE_OFFSET`.
pub const ADAPTIVE_OFFSET: f64 = 2.0;
/// Half-width of the row window averaged for the ink cost of a cut.
/// Kept separate from `band_size`: the two windows serve different stages.
pub const INK_COST_RADIUS: usize = 2;
/// Lower bound on the gap threshold so a perfectly blank percentile still
/// leaves room for numerical noise.
pub const GAP_THRESH_FLOOR: f64 = 1e-4;
/// Gap threshold used when the profile contains no ink at all.
pub const GAP_THRESH_BLANK: f64 = 0.01;
/// Version of the diagnostics JSON layout.
pub const DEBUG_SCHEMA_VERSION: u32 = 1;

const MM_PER_INCH: f64 = 25.4;

/// How cut rows are chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum CutMode {
    /// Cut wherever the page-height window allows, preferring blank rows.
    #[default]
    Whitespace,
    /// Cut near multiples of the target height, only at rows with a local gap.
    FixedHeightSnap,
}

/// How short pages are emitted by the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum RenderMode {
    /// Each page is exactly as tall as its strip.
    #[default]
    #[value(name = "variable", alias = "variable-size")]
    VariableSize,
    /// Strips shorter than the target height are padded at the bottom.
    #[value(name = "padded", alias = "fixed-size-with-padding")]
    FixedSizeWithPadding,
}

/// All cut-placement parameters in one struct.
///
/// Values are trusted by the optimizer; run [`PaginationConfig::validate`]
/// at the boundary before handing user input in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CutConfig {
    /// Desired page height in pixels.
    pub target_height: usize,
    /// Allowed deviation from `target_height`, as a fraction of it.
    /// Internal pages must be within `floor(target_height * window_frac)`.
    pub window_frac: f64,
    /// Shortest run of blank rows that counts as a gap.
    pub min_gap_rows: usize,
    /// Radius of the boxcar filter applied before bridge search. 0 = off.
    pub smoothing_radius: usize,
    /// Height of the bands searched for bridge candidates.
    pub band_size: usize,
    /// Ceiling on the data-driven gap threshold.
    pub gap_cap: f64,
    /// Minimum tolerance above a band minimum that still counts as basin.
    pub basin_tol_floor: f64,
    /// Basin tolerance as a fraction of `median - min` within the band.
    pub basin_tol_scale: f64,
    /// Weight of the ink cost at a cut row.
    pub w_ink: f64,
    /// Weight of the relative deviation from `target_height`.
    pub w_height: f64,

    // -- Fixed-height snap --
    pub cut_mode: CutMode,
    /// Search radius around each ideal fixed-height boundary.
    pub snap_px: usize,
    /// Radius of the raw-profile window inspected by the unsafe-cut test.
    pub unsafe_window_radius: usize,
    /// A row is unsafe when its whole window is above this ink level.
    pub unsafe_ink_threshold: f64,

    /// Populate [`CutPlan::diagnostics`](crate::CutPlan).
    pub return_debug_info: bool,
}

impl Default for CutConfig {
    fn default() -> Self {
        Self {
            target_height: PaperSize::A4.target_height_px(300),
            window_frac: 0.04,
            min_gap_rows: 12,
            smoothing_radius: 10,
            band_size: 200,
            gap_cap: 0.05,
            basin_tol_floor: 0.02,
            basin_tol_scale: 0.25,
            w_ink: 1.0,
            w_height: 1.0,
            cut_mode: CutMode::Whitespace,
            snap_px: 40,
            unsafe_window_radius: 2,
            unsafe_ink_threshold: 0.3,
            return_debug_info: false,
        }
    }
}

impl CutConfig {
    /// Largest allowed deviation from the target height, in whole pixels.
    pub fn max_window(&self) -> usize {
        (self.target_height as f64 * self.window_frac) as usize
    }
}

/// Physical page format.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaperSize {
    #[default]
    A4,
    A3,
    B5,
    Custom { width_mm: f64, height_mm: f64 },
}

impl PaperSize {
    /// (width, height) in millimetres.
    pub fn dimensions_mm(&self) -> (f64, f64) {
        match *self {
            PaperSize::A4 => (210.0, 297.0),
            PaperSize::A3 => (297.0, 420.0),
            PaperSize::B5 => (176.0, 250.0),
            PaperSize::Custom { width_mm, height_mm } => (width_mm, height_mm),
        }
    }

    /// Page height in pixels when printed 1:1 at `dpi`.
    pub fn target_height_px(&self, dpi: u32) -> usize {
        let (_, h_mm) = self.dimensions_mm();
        (h_mm / MM_PER_INCH * dpi as f64) as usize
    }
}

/// Everything the output stage needs to know about the physical page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageSetup {
    pub paper: PaperSize,
    /// Print resolution; also sets the PDF page size in points.
    pub dpi: u32,
    pub render_mode: RenderMode,
    /// Fill colour for padded pages.
    pub pad_color: [u8; 3],
}

impl Default for PageSetup {
    fn default() -> Self {
        Self {
            paper: PaperSize::A4,
            dpi: 300,
            render_mode: RenderMode::VariableSize,
            pad_color: [255, 255, 255],
        }
    }
}

/// Top-level configuration: cut placement plus page setup.
///
/// Serializable so presets can be stored as JSON; missing fields fall back
/// to their defaults.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PaginationConfig {
    pub cuts: CutConfig,
    pub page: PageSetup,
}

impl PaginationConfig {
    /// Config whose target height follows from the given paper and dpi.
    pub fn for_paper(paper: PaperSize, dpi: u32) -> Self {
        let mut config = Self::default();
        config.page.paper = paper;
        config.page.dpi = dpi;
        config.cuts.target_height = paper.target_height_px(dpi);
        config
    }

    /// Read a (possibly partial) JSON preset.
    pub fn from_json_file(path: &Path) -> Result<Self, PaginateError> {
        let text = std::fs::read_to_string(path)?;
        let config = serde_json::from_str(&text)?;
        Ok(config)
    }

    /// Reject values the optimizer cannot work with.
    pub fn validate(&self) -> Result<(), PaginateError> {
        let c = &self.cuts;
        if c.target_height == 0 {
            return Err(PaginateError::InvalidConfig("target_height must be > 0".into()));
        }
        if c.band_size == 0 {
            return Err(PaginateError::InvalidConfig("band_size must be > 0".into()));
        }
        if self.page.dpi == 0 {
            return Err(PaginateError::InvalidConfig("dpi must be > 0".into()));
        }
        let non_negative = [
            ("window_frac", c.window_frac),
            ("gap_cap", c.gap_cap),
            ("basin_tol_floor", c.basin_tol_floor),
            ("basin_tol_scale", c.basin_tol_scale),
            ("w_ink", c.w_ink),
            ("w_height", c.w_height),
            ("unsafe_ink_threshold", c.unsafe_ink_threshold),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(PaginateError::InvalidConfig(format!(
                    "{} must be a finite non-negative number, got {}",
                    name, value
                )));
            }
        }
        if let PaperSize::Custom { width_mm, height_mm } = self.page.paper {
            if !(width_mm > 0.0 && height_mm > 0.0) {
                return Err(PaginateError::InvalidConfig(
                    "custom paper dimensions must be positive".into(),
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paper_heights_at_300_dpi() {
        assert_eq!(PaperSize::A4.target_height_px(300), 3507);
        assert_eq!(PaperSize::A3.target_height_px(300), 4960);
        assert_eq!(PaperSize::B5.target_height_px(300), 2952);
        let custom = PaperSize::Custom { width_mm: 100.0, height_mm: 25.4 };
        assert_eq!(custom.target_height_px(150), 150);
    }

    #[test]
    fn max_window_truncates() {
        let config = CutConfig {
            target_height: 1000,
            window_frac: 0.0449,
            ..CutConfig::default()
        };
        assert_eq!(config.max_window(), 44);
    }

    #[test]
    fn partial_json_preset_keeps_defaults() {
        let json = r#"{ "cuts": { "cut_mode": "fixed_height_snap", "snap_px": 25 },
                        "page": { "paper": "a3", "render_mode": "fixed_size_with_padding" } }"#;
        let config: PaginationConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.cuts.cut_mode, CutMode::FixedHeightSnap);
        assert_eq!(config.cuts.snap_px, 25);
        assert_eq!(config.cuts.min_gap_rows, 12);
        assert_eq!(config.page.paper, PaperSize::A3);
        assert_eq!(config.page.render_mode, RenderMode::FixedSizeWithPadding);
        assert_eq!(config.page.dpi, 300);
    }

    #[test]
    fn custom_paper_from_json() {
        let json = r#"{ "page": { "paper": { "custom": { "width_mm": 120.0, "height_mm": 180.0 } } } }"#;
        let config: PaginationConfig = serde_json::from_str(json).unwrap();
        assert_eq!(
            config.page.paper,
            PaperSize::Custom { width_mm: 120.0, height_mm: 180.0 }
        );
    }

    #[test]
    fn validate_rejects_bad_values() {
        let mut config = PaginationConfig::default();
        assert!(config.validate().is_ok());

        config.cuts.target_height = 0;
        assert!(matches!(config.validate(), Err(PaginateError::InvalidConfig(_))));

        config.cuts.target_height = 1000;
        config.cuts.window_frac = f64::NAN;
        assert!(config.validate().is_err());

        config.cuts.window_frac = 0.1;
        config.page.dpi = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn for_paper_derives_target_height() {
        let config = PaginationConfig::for_paper(PaperSize::A3, 150);
        assert_eq!(config.cuts.target_height, 2480);
        assert_eq!(config.page.dpi, 150);
    }
}
