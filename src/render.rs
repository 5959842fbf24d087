//! Output stage: crop pages at the cut rows and write them out.
//!
//! Pages go either into a single PDF (page size in points derived from
//! pixel size and dpi) or into numbered PNG files. A preview PNG with the
//! cut rows drawn over a downscaled copy of the source is available for
//! eyeballing a plan.

use std::path::{Path, PathBuf};

use image::imageops::{self, FilterType};
use image::{DynamicImage, Rgb, RgbImage};
use imageproc::drawing::draw_filled_rect_mut;
use imageproc::rect::Rect;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};

use crate::config::{PageSetup, RenderMode};
use crate::error::PaginateError;

const POINTS_PER_INCH: f32 = 72.0;
const CUT_COLOR: Rgb<u8> = Rgb([220, 30, 30]);
const FALLBACK_CUT_COLOR: Rgb<u8> = Rgb([240, 150, 20]);

/// Full-width strips between consecutive cut rows.
pub fn crop_pages(img: &DynamicImage, cuts: &[usize]) -> Vec<DynamicImage> {
    let width = img.width();
    cuts.windows(2)
        .map(|w| img.crop_imm(0, w[0] as u32, width, (w[1] - w[0]) as u32))
        .collect()
}

/// Pad `page` at the bottom to `target_height` rows with `fill`.
///
/// Pages already at least that tall are returned unchanged; nothing is
/// ever scaled.
pub fn pad_page(page: &DynamicImage, target_height: u32, fill: [u8; 3]) -> DynamicImage {
    if page.height() >= target_height {
        return page.clone();
    }
    let mut canvas = RgbImage::from_pixel(page.width(), target_height, Rgb(fill));
    imageops::replace(&mut canvas, &page.to_rgb8(), 0, 0);
    DynamicImage::ImageRgb8(canvas)
}

/// Apply the page setup's render mode to cropped pages.
pub fn finish_pages(
    pages: Vec<DynamicImage>,
    setup: &PageSetup,
    target_height: usize,
) -> Vec<DynamicImage> {
    match setup.render_mode {
        RenderMode::VariableSize => pages,
        RenderMode::FixedSizeWithPadding => pages
            .iter()
            .map(|p| pad_page(p, target_height as u32, setup.pad_color))
            .collect(),
    }
}

/// Physical size in PDF points of `px` pixels printed at `dpi`.
pub fn page_size_points(px: u32, dpi: u32) -> f32 {
    px as f32 * POINTS_PER_INCH / dpi as f32
}

/// Write one PDF page per image, each sized to print 1:1 at `dpi`.
pub fn write_pdf(pages: &[DynamicImage], path: &Path, dpi: u32) -> Result<(), PaginateError> {
    if pages.is_empty() {
        return Err(PaginateError::NoPages);
    }

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let mut kids: Vec<Object> = Vec::with_capacity(pages.len());

    for page in pages {
        let rgb = page.to_rgb8();
        let (w, h) = rgb.dimensions();
        let image_id = doc.add_object(Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => w as i64,
                "Height" => h as i64,
                "ColorSpace" => "DeviceRGB",
                "BitsPerComponent" => 8,
            },
            rgb.into_raw(),
        ));

        let w_pt = page_size_points(w, dpi);
        let h_pt = page_size_points(h, dpi);
        let content = Content {
            operations: vec![
                Operation::new("q", vec![]),
                Operation::new(
                    "cm",
                    vec![
                        Object::Real(w_pt),
                        0.into(),
                        0.into(),
                        Object::Real(h_pt),
                        0.into(),
                        0.into(),
                    ],
                ),
                Operation::new("Do", vec!["Im0".into()]),
                Operation::new("Q", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));

        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![0.into(), 0.into(), Object::Real(w_pt), Object::Real(h_pt)],
            "Contents" => content_id,
            "Resources" => dictionary! {
                "XObject" => dictionary! { "Im0" => image_id },
            },
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.compress();
    doc.save(path)?;
    Ok(())
}

/// Write `<stem>_page_001.png`, `<stem>_page_002.png`, … into `dir`.
pub fn write_png_pages(
    pages: &[DynamicImage],
    dir: &Path,
    stem: &str,
) -> Result<Vec<PathBuf>, PaginateError> {
    if pages.is_empty() {
        return Err(PaginateError::NoPages);
    }
    std::fs::create_dir_all(dir)?;
    let mut written = Vec::with_capacity(pages.len());
    for (i, page) in pages.iter().enumerate() {
        let path = dir.join(format!("{}_page_{:03}.png", stem, i + 1));
        page.save(&path)?;
        written.push(path);
    }
    Ok(written)
}

/// Downscaled copy of `img` (at most `max_height` rows) with every internal
/// cut drawn as a 3-px band. Fallback cuts are drawn in orange.
pub fn render_preview(
    img: &DynamicImage,
    cuts: &[usize],
    fallback: bool,
    output_path: &Path,
    max_height: u32,
) -> Result<(), PaginateError> {
    let (w, h) = (img.width(), img.height());
    if w == 0 || h == 0 {
        return Err(PaginateError::NoPages);
    }
    let scale = (max_height as f64 / h as f64).min(1.0);
    let pw = ((w as f64 * scale).round() as u32).max(1);
    let ph = ((h as f64 * scale).round() as u32).max(1);

    let mut canvas = img.resize_exact(pw, ph, FilterType::Triangle).to_rgb8();
    let color = if fallback { FALLBACK_CUT_COLOR } else { CUT_COLOR };
    let interior = cuts.len().saturating_sub(1);
    for &cut in cuts.iter().take(interior).skip(1) {
        let y = (cut as f64 * scale).round() as i32;
        draw_filled_rect_mut(&mut canvas, Rect::at(0, y - 1).of_size(pw, 3), color);
    }
    canvas.save(output_path)?;
    Ok(())
}
