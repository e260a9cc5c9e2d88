// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF module — frame validation, crop compositing, and document sanitization.

pub mod compositor;
pub mod frame;
pub mod sanitizer;

pub use compositor::compose;
pub use frame::{ClippedCrop, FrameSkip, SkipReason, clip_frame, parse_frames};
pub use sanitizer::{sanitize, sanitize_document};
