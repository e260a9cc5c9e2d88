// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// blattwerk-document — Document processing for the Blattwerk engine.
//
// Provides PDF sanitization (marker XObject removal, overlay-frame stripping,
// stamp annotation filtering), content-stream tokenization and classification,
// crop compositing (pixel-space frames over rasterized pages → a new PDF),
// and page-to-image conversion.

pub mod content;
pub mod convert;
pub mod image;
pub mod pdf;
pub mod raster;

// Re-export the primary entry points so callers can use
// `blattwerk_document::sanitize` etc.
pub use convert::{convert_document_to_images, convert_documents};
pub use image::processor::ImageProcessor;
pub use pdf::compositor::compose;
pub use pdf::sanitizer::{sanitize, sanitize_document};
pub use raster::{PageRasterizer, RasterPage};

#[cfg(feature = "pdfium")]
pub use raster::pdfium::PdfiumRasterizer;
