// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Blattwerk.

use thiserror::Error;

/// Top-level error type for all Blattwerk operations.
#[derive(Debug, Error)]
pub enum BlattwerkError {
    // -- Caller input errors --
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("empty input: {0}")]
    EmptyInput(String),

    // -- Frame errors (compose) --
    #[error("frames must be a non-empty list of {{page,x,y,width,height}} objects: {0}")]
    MalformedFrameList(String),

    #[error("frame #{index}: invalid fields, expected integers page,x,y,width,height")]
    InvalidFrameFields { index: usize },

    #[error("frame #{index}: page index {page} out of range (document has {page_count} pages)")]
    FrameOutOfRange {
        index: usize,
        page: i64,
        page_count: usize,
    },

    /// Aggregated per-frame diagnostics: compose never drops bad frames
    /// silently, it enumerates every one of them in a single failure.
    #[error(
        "skipped {skipped} of {total} frames due to invalid or out-of-bounds coordinates: \
         {details}. Hint: ensure client DPI and page coordinates match the server \
         rasterization DPI"
    )]
    SkippedFrames {
        skipped: usize,
        total: usize,
        details: String,
    },

    #[error("no valid frames after clipping")]
    NoValidFrames,

    // -- Document errors --
    #[error("malformed document: {0}")]
    MalformedDocument(String),

    #[error("PDF operation failed: {0}")]
    PdfError(String),

    #[error("image processing failed: {0}")]
    ImageError(String),

    #[error("rasterization failed: {0}")]
    RasterError(String),

    #[error("processing error: {0}")]
    Processing(String),

    // -- Infrastructure --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, BlattwerkError>;
