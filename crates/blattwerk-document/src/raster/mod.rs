// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Rasterized pages and the rasterizer capability.
//
// Rendering a document page into pixels is consumed as a capability, not
// reimplemented: the engine only defines the contract (`PageRasterizer`)
// and an optional `pdfium-render`-backed implementation behind the
// `pdfium` feature gate.

use blattwerk_core::error::Result;
use image::DynamicImage;

use crate::pdf::frame::ClippedCrop;

#[cfg(feature = "pdfium")]
pub mod pdfium;

/// One rasterized document page.
#[derive(Debug, Clone)]
pub struct RasterPage {
    image: DynamicImage,
}

impl RasterPage {
    /// Wrap an already-decoded image.
    pub fn from_dynamic(image: DynamicImage) -> Self {
        Self { image }
    }

    /// Page width in pixels.
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    /// Page height in pixels.
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Borrow the underlying image.
    pub fn as_dynamic(&self) -> &DynamicImage {
        &self.image
    }

    /// Consume the page and return the underlying image.
    pub fn into_dynamic(self) -> DynamicImage {
        self.image
    }

    /// Extract the region described by a validated crop.
    ///
    /// The crop invariant (`0 <= x1 < x2 <= width`, same for y) guarantees
    /// the region lies within the page.
    pub fn crop(&self, crop: &ClippedCrop) -> RasterPage {
        let region = self
            .image
            .crop_imm(crop.x1, crop.y1, crop.width(), crop.height());
        RasterPage { image: region }
    }
}

/// Renders every page of a document at a requested resolution.
///
/// Implementations return exactly one [`RasterPage`] per document page, in
/// page order.
pub trait PageRasterizer {
    fn rasterize(&self, document: &[u8], dpi: u16) -> Result<Vec<RasterPage>>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    #[test]
    fn crop_extracts_the_exact_region() {
        let img = RgbImage::from_fn(100, 80, |x, y| Rgb([x as u8, y as u8, 0]));
        let page = RasterPage::from_dynamic(DynamicImage::ImageRgb8(img));

        let crop = ClippedCrop {
            source_page: 0,
            x1: 10,
            y1: 20,
            x2: 40,
            y2: 50,
        };
        let region = page.crop(&crop);
        assert_eq!((region.width(), region.height()), (30, 30));

        // Top-left pixel of the crop is (10, 20) of the source.
        let rgb = region.into_dynamic().to_rgb8();
        assert_eq!(rgb.get_pixel(0, 0), &Rgb([10, 20, 0]));
    }
}
