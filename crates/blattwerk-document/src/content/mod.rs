// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Content-stream analysis — line tokenization, overlay-frame stripping, and
// marker classification over the PDF graphics-operator language.

pub mod classifier;
pub mod stripper;
pub mod tokenizer;

pub use classifier::is_likely_marker;
pub use stripper::strip_overlay_frames;
pub use tokenizer::{LineKind, TokenLine, tokenize};
