// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Crop compositor — assembles pixel-space crops of rasterized pages into a
// new PDF, one output page per crop, using `printpdf` 0.8.
//
// The policy is strict and fail-closed: a compose call either produces a
// page for every requested frame or fails with a diagnostic enumerating
// every frame that would have been dropped. A partial document could
// silently omit content the caller asked for.

use blattwerk_core::error::{BlattwerkError, Result};
use blattwerk_core::types::Frame;
use printpdf::{
    Mm, Op, PdfDocument, PdfPage, PdfSaveOptions, PdfWarnMsg, Pt, RawImage, RawImageData,
    RawImageFormat, XObjectTransform,
};
use tracing::{debug, info, instrument, warn};

use crate::pdf::frame::{ClippedCrop, FrameSkip, clip_frame};
use crate::raster::RasterPage;

/// Output pages are sized 1 px = 1 pt, i.e. rendered at 72 dpi.
const OUTPUT_DPI: f32 = 72.0;

fn px_to_mm(px: u32) -> Mm {
    Mm(px as f32 * 25.4 / OUTPUT_DPI)
}

/// Composite crops of rasterized pages into a single PDF.
///
/// Frames are processed in input order and each surviving crop becomes one
/// output page sized exactly to the crop's pixel dimensions. Hard errors
/// (empty frame list, page index out of range) abort immediately; skipped
/// frames are aggregated into one [`BlattwerkError::SkippedFrames`].
#[instrument(skip_all, fields(pages = pages.len(), frames = frames.len()))]
pub fn compose(pages: &[RasterPage], frames: &[Frame]) -> Result<Vec<u8>> {
    if frames.is_empty() {
        return Err(BlattwerkError::MalformedFrameList("empty frame list".into()));
    }

    let mut crops: Vec<ClippedCrop> = Vec::with_capacity(frames.len());
    let mut skipped: Vec<FrameSkip> = Vec::new();

    for (index, frame) in frames.iter().enumerate() {
        if frame.page < 0 || frame.page as usize >= pages.len() {
            return Err(BlattwerkError::FrameOutOfRange {
                index,
                page: frame.page,
                page_count: pages.len(),
            });
        }

        let page = &pages[frame.page as usize];
        match clip_frame(frame, page.width(), page.height()) {
            Ok(crop) => crops.push(crop),
            Err(reason) => skipped.push(FrameSkip {
                index,
                frame: *frame,
                page_width: page.width(),
                page_height: page.height(),
                reason,
            }),
        }
    }

    if !skipped.is_empty() {
        let details = skipped
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ");
        warn!(
            skipped = skipped.len(),
            total = frames.len(),
            "compose rejected: frames outside page bounds"
        );
        return Err(BlattwerkError::SkippedFrames {
            skipped: skipped.len(),
            total: frames.len(),
            details,
        });
    }

    if crops.is_empty() {
        return Err(BlattwerkError::NoValidFrames);
    }

    info!(crops = crops.len(), "assembling crop document");

    let mut doc = PdfDocument::new("Blattwerk Crops");
    let mut out_pages: Vec<PdfPage> = Vec::with_capacity(crops.len());

    for crop in &crops {
        let cropped = pages[crop.source_page].crop(crop);
        let rgb = cropped.into_dynamic().to_rgb8();
        let (width, height) = (crop.width(), crop.height());

        let raw = RawImage {
            pixels: RawImageData::U8(rgb.into_raw()),
            width: width as usize,
            height: height as usize,
            data_format: RawImageFormat::RGB8,
            tag: Vec::new(),
        };
        let image_id = doc.add_image(&raw);

        // The image fills the page edge to edge: page size and placement are
        // both derived from the crop's pixel dimensions at 72 dpi.
        let ops = vec![Op::UseXobject {
            id: image_id,
            transform: XObjectTransform {
                translate_x: Some(Pt(0.0)),
                translate_y: Some(Pt(0.0)),
                scale_x: None,
                scale_y: None,
                dpi: Some(OUTPUT_DPI),
                rotate: None,
            },
        }];

        debug!(
            page = crop.source_page,
            width, height, "crop placed on output page"
        );
        out_pages.push(PdfPage::new(px_to_mm(width), px_to_mm(height), ops));
    }

    doc.with_pages(out_pages);

    let mut warnings: Vec<PdfWarnMsg> = Vec::new();
    let output = doc.save(&PdfSaveOptions::default(), &mut warnings);
    debug!(bytes = output.len(), "crop document serialized");
    Ok(output)
}
