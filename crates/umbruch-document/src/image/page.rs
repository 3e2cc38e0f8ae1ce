// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Raster page preparation — grayscale, contrast, binarization, and
// device-fit resizing for reflowed page images, using the `image` and
// `imageproc` crates.

use image::DynamicImage;
use imageproc::contrast::{ThresholdType, otsu_level, threshold};
use tracing::{debug, info, instrument};
use umbruch_core::error::{Result, UmbruchError};

/// A page image moving through the reflow raster pipeline.
///
/// All operations are non-destructive: each method consumes `self` and
/// returns a new `PageImage` wrapping the transformed image, enabling
/// method chaining.
///
/// ```ignore
/// let jpeg = PageImage::open("scan.png")?
///     .grayscale()
///     .adjust_contrast(10.0)
///     .fit_to(560, 735)
///     .to_jpeg_bytes(75)?;
/// ```
#[derive(Debug)]
pub struct PageImage {
    /// The current working image.
    image: DynamicImage,
}

impl PageImage {
    // -- Construction ---------------------------------------------------------

    /// Load a page image from a file path.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let img = image::open(path.as_ref()).map_err(|err| {
            UmbruchError::ImageError(format!(
                "failed to open {}: {}",
                path.as_ref().display(),
                err
            ))
        })?;
        info!(width = img.width(), height = img.height(), "Page image loaded");
        Ok(Self { image: img })
    }

    /// Create a page from raw encoded bytes (JPEG, PNG, TIFF).
    #[instrument(skip(data), fields(data_len = data.len()))]
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let img = image::load_from_memory(data).map_err(|err| {
            UmbruchError::ImageError(format!("failed to decode page image: {}", err))
        })?;
        Ok(Self { image: img })
    }

    /// Wrap an already-decoded `DynamicImage`.
    pub fn from_dynamic(image: DynamicImage) -> Self {
        Self { image }
    }

    // -- Accessors ------------------------------------------------------------

    /// Current width in pixels.
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    /// Current height in pixels.
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Borrow the underlying `DynamicImage`.
    pub fn as_dynamic(&self) -> &DynamicImage {
        &self.image
    }

    /// Consume the page and return the underlying `DynamicImage`.
    pub fn into_dynamic(self) -> DynamicImage {
        self.image
    }

    // -- Transformations (consume self, return new Self) ----------------------

    /// Convert to grayscale. E-ink panels render grayscale only, so this is
    /// the first step of every raster pipeline.
    pub fn grayscale(self) -> Self {
        Self {
            image: self.image.grayscale(),
        }
    }

    /// Adjust contrast. Positive values increase contrast, negative values
    /// decrease it; zero is a no-op.
    #[instrument(skip(self), fields(amount))]
    pub fn adjust_contrast(self, amount: f32) -> Self {
        Self {
            image: self.image.adjust_contrast(amount),
        }
    }

    /// Resize to fit within `max_width` x `max_height`, preserving aspect
    /// ratio. Uses Lanczos3 filtering.
    #[instrument(skip(self), fields(max_width, max_height))]
    pub fn fit_to(self, max_width: u32, max_height: u32) -> Self {
        let resized =
            self.image
                .resize(max_width, max_height, image::imageops::FilterType::Lanczos3);
        debug!(new_w = resized.width(), new_h = resized.height(), "Page resized");
        Self { image: resized }
    }

    /// Reduce the page to black and white using Otsu's global threshold.
    /// Produces the smallest, crispest output for clean text pages.
    #[instrument(skip(self))]
    pub fn bilevel(self) -> Self {
        let gray = self.image.to_luma8();
        let level = otsu_level(&gray);
        debug!(level, "Otsu threshold computed");
        let bw = threshold(&gray, level, ThresholdType::Binary);
        Self {
            image: DynamicImage::ImageLuma8(bw),
        }
    }

    // -- Output ---------------------------------------------------------------

    /// Encode the current page as JPEG bytes at the given quality (1-100).
    pub fn to_jpeg_bytes(&self, quality: u8) -> Result<Vec<u8>> {
        let mut buffer = Vec::new();
        let rgb = self.image.to_rgb8();
        let encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut buffer, quality);
        rgb.write_with_encoder(encoder)
            .map_err(|err| UmbruchError::ImageError(format!("JPEG encoding failed: {}", err)))?;
        Ok(buffer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma, RgbImage};

    fn checkered(width: u32, height: u32) -> DynamicImage {
        let img = GrayImage::from_fn(width, height, |x, y| {
            if (x / 8 + y / 8) % 2 == 0 {
                Luma([40u8])
            } else {
                Luma([210u8])
            }
        });
        DynamicImage::ImageLuma8(img)
    }

    #[test]
    fn fit_preserves_aspect_ratio() {
        let page = PageImage::from_dynamic(checkered(400, 800)).fit_to(100, 100);
        // 400x800 into 100x100 → 50x100.
        assert_eq!(page.width(), 50);
        assert_eq!(page.height(), 100);
    }

    #[test]
    fn bilevel_leaves_only_black_and_white() {
        let page = PageImage::from_dynamic(checkered(64, 64)).bilevel();
        let gray = page.into_dynamic().to_luma8();
        assert!(gray.pixels().all(|p| p.0[0] == 0 || p.0[0] == 255));
    }

    #[test]
    fn grayscale_of_color_image() {
        let rgb = RgbImage::from_pixel(10, 10, image::Rgb([200, 30, 30]));
        let page = PageImage::from_dynamic(DynamicImage::ImageRgb8(rgb)).grayscale();
        assert_eq!(page.width(), 10);
    }

    #[test]
    fn jpeg_encoding_produces_bytes() {
        let page = PageImage::from_dynamic(checkered(32, 32));
        let low = page.to_jpeg_bytes(50).unwrap();
        assert!(!low.is_empty());
        // JPEG magic bytes.
        assert_eq!(&low[..2], &[0xFF, 0xD8]);
    }

    #[test]
    fn undecodable_bytes_are_rejected() {
        let err = PageImage::from_bytes(b"nope").unwrap_err();
        assert!(matches!(err, UmbruchError::ImageError(_)));
    }
}
