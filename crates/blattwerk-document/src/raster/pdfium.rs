// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// pdfium-backed rasterizer (behind the `pdfium` feature gate).
//
// pdfium binds to a native library at runtime; construction fails cleanly
// when the library is absent instead of panicking at first render.

use blattwerk_core::error::{BlattwerkError, Result};
use pdfium_render::prelude::*;
use tracing::{debug, info, instrument};

use super::{PageRasterizer, RasterPage};

/// Renders document pages through the pdfium C++ library.
pub struct PdfiumRasterizer {
    pdfium: Pdfium,
}

impl PdfiumRasterizer {
    /// Bind to the system pdfium library.
    pub fn new() -> Result<Self> {
        let bindings = Pdfium::bind_to_system_library()
            .map_err(|err| BlattwerkError::RasterError(format!("pdfium unavailable: {err}")))?;
        Ok(Self {
            pdfium: Pdfium::new(bindings),
        })
    }
}

impl PageRasterizer for PdfiumRasterizer {
    #[instrument(skip_all, fields(bytes = document.len(), dpi))]
    fn rasterize(&self, document: &[u8], dpi: u16) -> Result<Vec<RasterPage>> {
        let doc = self
            .pdfium
            .load_pdf_from_byte_slice(document, None)
            .map_err(|err| BlattwerkError::MalformedDocument(format!("{err:?}")))?;

        let pages = doc.pages();
        info!(pages = pages.len(), "document loaded for rasterization");

        let mut rendered = Vec::with_capacity(pages.len() as usize);
        for (index, page) in pages.iter().enumerate() {
            // Page dimensions are in points (1/72 in); scale to the target
            // resolution.
            let width_px = (page.width().value * f32::from(dpi) / 72.0).round() as i32;
            let height_px = (page.height().value * f32::from(dpi) / 72.0).round() as i32;

            let config = PdfRenderConfig::new()
                .set_target_width(width_px)
                .set_maximum_height(height_px);

            let bitmap = page.render_with_config(&config).map_err(|err| {
                BlattwerkError::RasterError(format!("page {}: {err:?}", index + 1))
            })?;

            let image = bitmap.as_image();
            debug!(
                page = index + 1,
                width = image.width(),
                height = image.height(),
                "page rasterized"
            );
            rendered.push(RasterPage::from_dynamic(image));
        }

        Ok(rendered)
    }
}
