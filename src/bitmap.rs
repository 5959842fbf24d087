//! Image loading and the per-row ink profile.

use std::path::Path;

use image::{DynamicImage, GrayImage, ImageReader, Luma};
use imageproc::definitions::Image;
use imageproc::integral_image::{integral_image, sum_image_pixels};

use crate::config::{ADAPTIVE_BLOCK_SIZE, ADAPTIVE_OFFSET};
use crate::error::PaginateError;

/// Load an image, keeping grayscale as Luma8 and converting everything
/// else to Rgb8.
pub fn load_image(path: &Path) -> Result<DynamicImage, PaginateError> {
    let img = ImageReader::open(path)
        .map_err(|e| PaginateError::ImageLoad(e.to_string()))?
        .with_guessed_format()
        .map_err(|e| PaginateError::ImageLoad(e.to_string()))?
        .decode()
        .map_err(|e| PaginateError::ImageLoad(e.to_string()))?;

    if matches!(img, DynamicImage::ImageLuma8(_) | DynamicImage::ImageRgb8(_)) {
        Ok(img)
    } else {
        Ok(DynamicImage::ImageRgb8(img.to_rgb8()))
    }
}

/// Channel layout of a [`PixelBuffer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    Gray,
    Rgb,
}

impl PixelFormat {
    pub fn channels(self) -> usize {
        match self {
            PixelFormat::Gray => 1,
            PixelFormat::Rgb => 3,
        }
    }
}

/// Borrowed row-major 8-bit image, tightly packed.
#[derive(Debug, Clone, Copy)]
pub struct PixelBuffer<'a> {
    pub width: usize,
    pub height: usize,
    pub format: PixelFormat,
    pub data: &'a [u8],
}

impl<'a> PixelBuffer<'a> {
    pub fn new(
        width: usize,
        height: usize,
        format: PixelFormat,
        data: &'a [u8],
    ) -> Result<Self, PaginateError> {
        let expected = width * height * format.channels();
        if data.len() < expected {
            return Err(PaginateError::BufferSize {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self { width, height, format, data })
    }

    /// Luminance plane (ITU-R 601 weights, truncated).
    pub fn gray_levels(&self) -> Vec<u8> {
        let n = self.width * self.height;
        match self.format {
            PixelFormat::Gray => self.data[..n].to_vec(),
            PixelFormat::Rgb => self.data[..n * 3]
                .chunks_exact(3)
                .map(|px| {
                    let (r, g, b) = (px[0] as f64, px[1] as f64, px[2] as f64);
                    (0.299 * r + 0.587 * g + 0.114 * b) as u8
                })
                .collect(),
        }
    }
}

/// Ink profile of a decoded image.
pub fn ink_profile_of(img: &DynamicImage) -> Vec<f64> {
    let (w, h) = (img.width() as usize, img.height() as usize);
    match img {
        DynamicImage::ImageLuma8(gray) => ink_profile(&PixelBuffer {
            width: w,
            height: h,
            format: PixelFormat::Gray,
            data: gray.as_raw(),
        }),
        DynamicImage::ImageRgb8(rgb) => ink_profile(&PixelBuffer {
            width: w,
            height: h,
            format: PixelFormat::Rgb,
            data: rgb.as_raw(),
        }),
        other => {
            let rgb = other.to_rgb8();
            ink_profile(&PixelBuffer {
                width: w,
                height: h,
                format: PixelFormat::Rgb,
                data: rgb.as_raw(),
            })
        }
    }
}

/// Fraction of ink pixels in every row, each in [0, 1].
///
/// Pixels are binarized against the mean of their 11×11 neighbourhood
/// (clipped at the borders): ink when `gray < trunc(mean - 2)`. Dark text on
/// a light page therefore counts as ink regardless of uneven illumination.
pub fn ink_profile(buf: &PixelBuffer) -> Vec<f64> {
    let (w, h) = (buf.width, buf.height);
    if w == 0 || h == 0 {
        // No pixels to normalize by: every raw row sum is zero.
        return vec![0.0; h];
    }

    let Some(gray) = GrayImage::from_raw(w as u32, h as u32, buf.gray_levels()) else {
        return vec![0.0; h];
    };
    let integral: Image<Luma<u64>> = integral_image(&gray);
    let half = ADAPTIVE_BLOCK_SIZE / 2;

    let mut profile = Vec::with_capacity(h);
    for y in 0..h {
        let y0 = y.saturating_sub(half);
        let y1 = (y + half).min(h - 1);
        let mut ink = 0usize;
        for x in 0..w {
            let x0 = x.saturating_sub(half);
            let x1 = (x + half).min(w - 1);

            let [sum] = sum_image_pixels(&integral, x0 as u32, y0 as u32, x1 as u32, y1 as u32);
            let area = ((x1 - x0 + 1) * (y1 - y0 + 1)) as f64;
            let threshold = (sum as f64 / area - ADAPTIVE_OFFSET) as i64;

            if (gray.get_pixel(x as u32, y as u32)[0] as i64) < threshold {
                ink += 1;
            }
        }
        profile.push(ink as f64 / w as f64);
    }
    profile
}
