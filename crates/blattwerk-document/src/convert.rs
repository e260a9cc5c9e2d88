// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Page-to-image conversion.
//
// A document is rasterized through the `PageRasterizer` capability, each page
// run through the color-mode pipeline, and encoded as JPEG. Batch requests
// fan out across documents on a bounded worker pool; pages within one
// document always stay in order, and batch results come back in input order.

use std::path::Path;

use rayon::prelude::*;
use tracing::{debug, info, instrument};

use blattwerk_core::error::{BlattwerkError, Result};
use blattwerk_core::types::ConvertOptions;

use crate::image::processor::ImageProcessor;
use crate::raster::PageRasterizer;

/// One converted page: `("<n>.jpg", bytes)`, numbered from 1.
pub type PageImage = (String, Vec<u8>);

/// Convert a document into one JPEG per page.
///
/// Validates `options` (dpi ∈ [72, 600], quality ∈ [50, 95]) and rejects
/// empty input before rasterizing. Page labels are 1-based.
#[instrument(skip_all, fields(bytes = document.len(), dpi = options.dpi))]
pub fn convert_document_to_images<R: PageRasterizer>(
    rasterizer: &R,
    document: &[u8],
    options: &ConvertOptions,
) -> Result<Vec<PageImage>> {
    options.validate()?;
    if document.is_empty() {
        return Err(BlattwerkError::EmptyInput("document bytes".into()));
    }

    let pages = rasterizer.rasterize(document, options.dpi)?;
    info!(pages = pages.len(), "document rasterized");

    let mut out = Vec::with_capacity(pages.len());
    for (number, page) in pages.into_iter().enumerate() {
        let jpeg = ImageProcessor::from_dynamic(page.into_dynamic())
            .apply_color_mode(options.color_mode, options.threshold)
            .to_jpeg_bytes(options.quality)?;
        debug!(page = number + 1, bytes = jpeg.len(), "page encoded");
        out.push((format!("{}.jpg", number + 1), jpeg));
    }
    Ok(out)
}

/// Convert several documents, fanning out across a bounded worker pool.
///
/// `inputs` are `(file name, document bytes)` pairs; the result pairs each
/// input's file stem with its converted pages, in input order. Any
/// per-document failure fails the whole batch — a partial archive would
/// silently drop a caller's document.
#[instrument(skip_all, fields(documents = inputs.len()))]
pub fn convert_documents<R: PageRasterizer + Sync>(
    rasterizer: &R,
    inputs: &[(String, Vec<u8>)],
    options: &ConvertOptions,
    max_workers: Option<usize>,
) -> Result<Vec<(String, Vec<PageImage>)>> {
    options.validate()?;
    if inputs.is_empty() {
        return Err(BlattwerkError::EmptyInput("document list".into()));
    }

    let convert_one = |(name, data): &(String, Vec<u8>)| -> Result<(String, Vec<PageImage>)> {
        let pages = convert_document_to_images(rasterizer, data, options)?;
        let stem = Path::new(name)
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| name.clone());
        Ok((stem, pages))
    };

    info!(workers = ?max_workers, "starting batch conversion");

    match max_workers {
        Some(workers) => {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(workers)
                .build()
                .map_err(|err| BlattwerkError::Processing(format!("worker pool: {err}")))?;
            pool.install(|| inputs.par_iter().map(convert_one).collect())
        }
        None => inputs.par_iter().map(convert_one).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::RasterPage;
    use blattwerk_core::types::ColorMode;
    use image::{DynamicImage, Rgb, RgbImage};

    /// Deterministic in-memory rasterizer: page count and size derive from
    /// the "document" bytes, so tests need no real renderer.
    struct StubRasterizer;

    impl PageRasterizer for StubRasterizer {
        fn rasterize(&self, document: &[u8], _dpi: u16) -> Result<Vec<RasterPage>> {
            let page_count = document[0] as usize;
            Ok((0..page_count)
                .map(|n| {
                    let img = RgbImage::from_fn(40, 30, |x, y| {
                        Rgb([(x + n as u32) as u8, y as u8, 0])
                    });
                    RasterPage::from_dynamic(DynamicImage::ImageRgb8(img))
                })
                .collect())
        }
    }

    #[test]
    fn labels_pages_from_one() {
        let out =
            convert_document_to_images(&StubRasterizer, &[3], &ConvertOptions::default()).unwrap();
        let labels: Vec<&str> = out.iter().map(|(label, _)| label.as_str()).collect();
        assert_eq!(labels, vec!["1.jpg", "2.jpg", "3.jpg"]);
    }

    #[test]
    fn produced_bytes_are_jpeg() {
        let out =
            convert_document_to_images(&StubRasterizer, &[1], &ConvertOptions::default()).unwrap();
        let decoded = image::load_from_memory(&out[0].1).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (40, 30));
    }

    #[test]
    fn binary_mode_produces_grayscale_jpeg() {
        let mut options = ConvertOptions::default();
        options.color_mode = ColorMode::Binary;
        options.threshold = 10;

        let out = convert_document_to_images(&StubRasterizer, &[1], &options).unwrap();
        let decoded = image::load_from_memory(&out[0].1).unwrap();
        assert_eq!(decoded.color(), image::ColorType::L8);
    }

    #[test]
    fn rejects_out_of_range_parameters() {
        let mut options = ConvertOptions::default();
        options.dpi = 20;
        assert!(matches!(
            convert_document_to_images(&StubRasterizer, &[1], &options),
            Err(BlattwerkError::InvalidParameter(_))
        ));
    }

    #[test]
    fn rejects_empty_document() {
        assert!(matches!(
            convert_document_to_images(&StubRasterizer, &[], &ConvertOptions::default()),
            Err(BlattwerkError::EmptyInput(_))
        ));
    }

    #[test]
    fn batch_preserves_input_order_and_stems() {
        let inputs = vec![
            ("b-second.pdf".to_string(), vec![2u8]),
            ("a-first.pdf".to_string(), vec![1u8]),
            ("nested".to_string(), vec![3u8]),
        ];
        let out =
            convert_documents(&StubRasterizer, &inputs, &ConvertOptions::default(), Some(2))
                .unwrap();

        let stems: Vec<&str> = out.iter().map(|(stem, _)| stem.as_str()).collect();
        assert_eq!(stems, vec!["b-second", "a-first", "nested"]);
        assert_eq!(out[0].1.len(), 2);
        assert_eq!(out[1].1.len(), 1);
        assert_eq!(out[2].1.len(), 3);
    }

    #[test]
    fn batch_fails_closed_on_any_bad_document() {
        let inputs = vec![
            ("good.pdf".to_string(), vec![1u8]),
            ("empty.pdf".to_string(), vec![]),
        ];
        assert!(matches!(
            convert_documents(&StubRasterizer, &inputs, &ConvertOptions::default(), None),
            Err(BlattwerkError::EmptyInput(_))
        ));
    }

    #[test]
    fn empty_batch_is_rejected() {
        assert!(matches!(
            convert_documents(&StubRasterizer, &[], &ConvertOptions::default(), None),
            Err(BlattwerkError::EmptyInput(_))
        ));
    }
}
