//! scrollcut: content-aware pagination of tall images.
//!
//! Splits a long scanned or rendered strip (webtoon pages, receipts,
//! stitched screenshots) into printable pages, placing every cut in a
//! blank gap or the quietest band nearby so that no line of text is
//! sliced in half.
//!
//! # Example
//!
//! ```no_run
//! use scrollcut::{paginate, PaginationConfig, PaperSize};
//! use std::path::Path;
//!
//! let config = PaginationConfig::for_paper(PaperSize::A4, 300);
//! let result = paginate(Path::new("scroll.png"), &config)?;
//! scrollcut::render::write_pdf(&result.pages, Path::new("scroll.pdf"), 300)?;
//! # Ok::<(), scrollcut::PaginateError>(())
//! ```
//!
//! The core entry point is [`find_cuts`], which works on a plain ink
//! profile and never touches the filesystem.

#![forbid(unsafe_code)]

mod bitmap;
mod config;
mod profile;

pub mod cuts;
pub mod diagnostics;
pub mod error;
pub mod render;

pub use bitmap::{ink_profile, ink_profile_of, load_image, PixelBuffer, PixelFormat};
pub use config::{
    CutConfig, CutMode, PageSetup, PaginationConfig, PaperSize, RenderMode,
    ADAPTIVE_BLOCK_SIZE, ADAPTIVE_OFFSET, DEBUG_SCHEMA_VERSION, GAP_THRESH_BLANK,
    GAP_THRESH_FLOOR, INK_COST_RADIUS, MIN_LAST_PAGE_HEIGHT, TIE_EPSILON,
};
pub use cuts::{find_cuts, CutPlan};
pub use diagnostics::{BridgeDebug, Diagnostics, EdgeCost, FallbackReason, SnapDebug};
pub use error::PaginateError;
pub use profile::{gap_threshold, percentile, smooth};

use image::DynamicImage;
use log::info;
use std::path::Path;
use std::time::Instant;

/// Cropped (and possibly padded) pages plus the plan that produced them.
#[derive(Debug, Clone)]
pub struct Pagination {
    pub pages: Vec<DynamicImage>,
    pub plan: CutPlan,
    /// Source dimensions in pixels.
    pub width: u32,
    pub height: u32,
}

/// Full pipeline: image path → pages.
pub fn paginate(image_path: &Path, config: &PaginationConfig) -> Result<Pagination, PaginateError> {
    let img = load_image(image_path)?;
    paginate_image(&img, config)
}

/// Pipeline on an already loaded image.
pub fn paginate_image(
    img: &DynamicImage,
    config: &PaginationConfig,
) -> Result<Pagination, PaginateError> {
    config.validate()?;
    let t_start = Instant::now();
    let (width, height) = (img.width(), img.height());
    if width == 0 || height == 0 {
        return Err(PaginateError::EmptyImage);
    }

    // ── Ink profile ───────────────────────────────────────
    let profile = ink_profile_of(img);
    let inked = profile.iter().filter(|&&v| v > 0.0).count();
    info!("Load        {}x{} px, {} rows with ink", width, height, inked);

    // ── Cuts ──────────────────────────────────────────────
    let plan = find_cuts(&profile, &config.cuts);
    match plan.fallback {
        Some(reason) => info!(
            "Cut         {} pages, uniform fallback ({})",
            plan.page_count(),
            reason
        ),
        None => info!(
            "Cut         {} pages at target {} px (\u{00b1}{})",
            plan.page_count(),
            config.cuts.target_height,
            config.cuts.max_window()
        ),
    }

    // ── Crop & pad ────────────────────────────────────────
    let pages = render::finish_pages(
        render::crop_pages(img, &plan.cuts),
        &config.page,
        config.cuts.target_height,
    );
    info!(
        "Result      {} pages \u{00b7} {:?}  ({}ms)",
        pages.len(),
        config.page.render_mode,
        t_start.elapsed().as_millis()
    );

    Ok(Pagination {
        pages,
        plan,
        width,
        height,
    })
}
