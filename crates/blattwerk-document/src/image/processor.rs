// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image processor — color-mode conversion (color, grayscale, binary) and
// JPEG/PNG encoding of rasterized pages, built on the `image` crate.

use blattwerk_core::error::BlattwerkError;
use blattwerk_core::types::ColorMode;
use image::{DynamicImage, GrayImage, ImageFormat, Luma};
use tracing::{debug, info, instrument};

/// Image processing pipeline operating on a single in-memory image.
///
/// All operations are non-destructive: each method consumes `self` and
/// returns a new `ImageProcessor` wrapping the transformed image, enabling
/// method chaining.
///
/// ```ignore
/// let jpeg = ImageProcessor::from_dynamic(page)
///     .apply_color_mode(ColorMode::Binary, 180)
///     .to_jpeg_bytes(85)?;
/// ```
pub struct ImageProcessor {
    /// The current working image.
    image: DynamicImage,
}

impl ImageProcessor {
    // -- Construction ---------------------------------------------------------

    /// Create a processor from raw encoded bytes (JPEG, PNG, etc.).
    #[instrument(skip(data), fields(data_len = data.len()))]
    pub fn from_bytes(data: &[u8]) -> Result<Self, BlattwerkError> {
        let img = image::load_from_memory(data)
            .map_err(|err| BlattwerkError::ImageError(format!("failed to decode image: {err}")))?;
        debug!(
            width = img.width(),
            height = img.height(),
            "Image decoded from bytes"
        );
        Ok(Self { image: img })
    }

    /// Wrap an already-decoded `DynamicImage`.
    pub fn from_dynamic(image: DynamicImage) -> Self {
        Self { image }
    }

    // -- Accessors ------------------------------------------------------------

    /// Current image width in pixels.
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    /// Current image height in pixels.
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Borrow the underlying `DynamicImage`.
    pub fn as_dynamic(&self) -> &DynamicImage {
        &self.image
    }

    /// Consume the processor and return the underlying `DynamicImage`.
    pub fn into_dynamic(self) -> DynamicImage {
        self.image
    }

    // -- Transformations (consume self, return new Self) -----------------------

    /// Crop a rectangular region from the image.
    ///
    /// `x` and `y` are the top-left corner; values are clamped to image
    /// bounds.
    #[instrument(skip(self), fields(x, y, width, height))]
    pub fn crop(self, x: u32, y: u32, width: u32, height: u32) -> Self {
        let img_w = self.image.width();
        let img_h = self.image.height();

        let safe_x = x.min(img_w.saturating_sub(1));
        let safe_y = y.min(img_h.saturating_sub(1));
        let safe_w = width.min(img_w - safe_x);
        let safe_h = height.min(img_h - safe_y);

        let cropped = self.image.crop_imm(safe_x, safe_y, safe_w, safe_h);
        Self { image: cropped }
    }

    /// Convert the image to grayscale (luma).
    pub fn grayscale(self) -> Self {
        Self {
            image: self.image.grayscale(),
        }
    }

    /// Threshold the image to black and white.
    ///
    /// Pixels at or above `threshold` become white, the rest black. The
    /// result stays 8-bit grayscale: JPEG has no 1-bit mode.
    #[instrument(skip(self))]
    pub fn binarize(self, threshold: u8) -> Self {
        let gray = self.image.to_luma8();
        let (width, height) = gray.dimensions();

        let mut output = GrayImage::new(width, height);
        for y in 0..height {
            for x in 0..width {
                let val = gray.get_pixel(x, y).0[0];
                let binary = if val >= threshold { 255u8 } else { 0u8 };
                output.put_pixel(x, y, Luma([binary]));
            }
        }

        Self {
            image: DynamicImage::ImageLuma8(output),
        }
    }

    /// Apply an output color mode.
    #[instrument(skip(self))]
    pub fn apply_color_mode(self, mode: ColorMode, threshold: u8) -> Self {
        info!(?mode, "Applying color mode");
        match mode {
            ColorMode::Color => Self {
                image: DynamicImage::ImageRgb8(self.image.to_rgb8()),
            },
            ColorMode::Grayscale => Self {
                image: DynamicImage::ImageLuma8(self.image.to_luma8()),
            },
            ColorMode::Binary => self.binarize(threshold),
        }
    }

    // -- Output ---------------------------------------------------------------

    /// Encode the current image as PNG bytes.
    pub fn to_png_bytes(&self) -> Result<Vec<u8>, BlattwerkError> {
        let mut buffer = Vec::new();
        let mut cursor = std::io::Cursor::new(&mut buffer);
        self.image
            .write_to(&mut cursor, ImageFormat::Png)
            .map_err(|err| BlattwerkError::ImageError(format!("PNG encoding failed: {err}")))?;
        Ok(buffer)
    }

    /// Encode the current image as JPEG bytes with the given quality (1-100).
    ///
    /// Grayscale images are encoded as single-channel JPEG; everything else
    /// is flattened to RGB first.
    pub fn to_jpeg_bytes(&self, quality: u8) -> Result<Vec<u8>, BlattwerkError> {
        let mut buffer = Vec::new();
        let encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut buffer, quality);

        let result = match &self.image {
            DynamicImage::ImageLuma8(gray) => gray.write_with_encoder(encoder),
            other => other.to_rgb8().write_with_encoder(encoder),
        };
        result.map_err(|err| BlattwerkError::ImageError(format!("JPEG encoding failed: {err}")))?;
        Ok(buffer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    fn gradient(width: u32, height: u32) -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, _| {
            Rgb([(x * 2) as u8, 100, 200])
        }))
    }

    #[test]
    fn color_mode_color_yields_rgb8() {
        let out = ImageProcessor::from_dynamic(gradient(10, 10))
            .apply_color_mode(ColorMode::Color, 0)
            .into_dynamic();
        assert!(matches!(out, DynamicImage::ImageRgb8(_)));
    }

    #[test]
    fn color_mode_grayscale_yields_luma8() {
        let out = ImageProcessor::from_dynamic(gradient(10, 10))
            .apply_color_mode(ColorMode::Grayscale, 0)
            .into_dynamic();
        assert!(matches!(out, DynamicImage::ImageLuma8(_)));
    }

    #[test]
    fn binarize_splits_at_the_threshold() {
        let mut img = GrayImage::new(2, 1);
        img.put_pixel(0, 0, Luma([179]));
        img.put_pixel(1, 0, Luma([180]));

        let out = ImageProcessor::from_dynamic(DynamicImage::ImageLuma8(img))
            .binarize(180)
            .into_dynamic()
            .to_luma8();
        assert_eq!(out.get_pixel(0, 0).0[0], 0);
        assert_eq!(out.get_pixel(1, 0).0[0], 255);
    }

    #[test]
    fn jpeg_round_trip_preserves_dimensions() {
        let bytes = ImageProcessor::from_dynamic(gradient(32, 16))
            .to_jpeg_bytes(85)
            .unwrap();
        let decoded = ImageProcessor::from_bytes(&bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (32, 16));
    }

    #[test]
    fn grayscale_jpeg_is_single_channel() {
        let bytes = ImageProcessor::from_dynamic(gradient(8, 8))
            .apply_color_mode(ColorMode::Binary, 128)
            .to_jpeg_bytes(85)
            .unwrap();
        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!(decoded.color(), image::ColorType::L8);
    }

    #[test]
    fn crop_clamps_to_bounds() {
        let out = ImageProcessor::from_dynamic(gradient(20, 20)).crop(15, 15, 100, 100);
        assert_eq!((out.width(), out.height()), (5, 5));
    }
}
