// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Overlay-frame stripper — removes the drawing block painted in the overlay
// tool's frame color from a tokenized content stream.
//
// Single pass, two states. A color-set line matching the target color starts
// a skip; the drawing operators and graphics-state brackets that follow are
// assumed to belong to that one shape and are dropped as a unit. Any other
// line ends the skip and is handled normally again, so a second matching
// color-set immediately starts the next skip. This is a best-effort heuristic
// over an untyped token stream, not a content-stream interpreter.

use tracing::debug;

use super::tokenizer::{LineKind, TokenLine, has_color_operator_token};

/// Frame color drawn by the upstream annotation tool: RGB(28, 136, 191).
const TARGET_RGB: [f32; 3] = [28.0 / 255.0, 136.0 / 255.0, 191.0 / 255.0];

/// Absolute per-channel tolerance, absorbing the encoder's float rounding.
const CHANNEL_TOLERANCE: f32 = 0.02;

/// True if the operands sit within tolerance of the overlay frame color.
fn matches_target(r: f32, g: f32, b: f32) -> bool {
    (r - TARGET_RGB[0]).abs() <= CHANNEL_TOLERANCE
        && (g - TARGET_RGB[1]).abs() <= CHANNEL_TOLERANCE
        && (b - TARGET_RGB[2]).abs() <= CHANNEL_TOLERANCE
}

/// Remove overlay-frame drawing blocks, returning the surviving lines in
/// order.
pub fn strip_overlay_frames<'a>(lines: &[TokenLine<'a>]) -> Vec<&'a str> {
    let mut kept = Vec::with_capacity(lines.len());
    let mut skipping = false;
    let mut dropped = 0usize;

    for line in lines {
        if skipping {
            // A new color assignment always terminates the skip, even when
            // the line would otherwise classify as drawing content.
            if has_color_operator_token(line.raw) {
                skipping = false;
            } else if matches!(line.kind, LineKind::Drawing | LineKind::StateBracket) {
                dropped += 1;
                continue;
            } else {
                skipping = false;
            }
        }

        match line.kind {
            LineKind::ColorSet { r, g, b, .. } if matches_target(r, g, b) => {
                skipping = true;
                dropped += 1;
            }
            _ => kept.push(line.raw),
        }
    }

    if dropped > 0 {
        debug!(dropped, kept = kept.len(), "overlay frame lines removed");
    }
    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::tokenizer::tokenize;

    fn strip(content: &str) -> Vec<String> {
        let lines = tokenize(content);
        strip_overlay_frames(&lines)
            .into_iter()
            .map(String::from)
            .collect()
    }

    #[test]
    fn removes_frame_block_and_keeps_the_rest() {
        let out = strip("0.109 0.533 0.749 RG\n10 10 50 50 re\nS\n1 0 0 RG\nother");
        assert_eq!(out, vec!["1 0 0 RG", "other"]);
    }

    #[test]
    fn tolerance_absorbs_encoder_rounding() {
        // 28/255 = 0.10980…, emitted here rounded to two digits.
        let out = strip("0.11 0.53 0.75 rg\n0 0 20 20 re\nf");
        assert!(out.is_empty());
    }

    #[test]
    fn off_color_rectangles_survive() {
        let content = "1 0 0 RG\n10 10 50 50 re\nS";
        let out = strip(content);
        assert_eq!(out, vec!["1 0 0 RG", "10 10 50 50 re", "S"]);
    }

    #[test]
    fn state_brackets_inside_the_block_are_dropped() {
        let out = strip("0.109 0.533 0.749 RG\nq\n2 w\n10 10 50 50 re\nS\nQ\nBT");
        assert_eq!(out, vec!["BT"]);
    }

    #[test]
    fn non_drawing_line_ends_the_skip_and_is_emitted() {
        let out = strip("0.109 0.533 0.749 RG\n10 10 50 50 re\n(label) Tj\nS");
        // The text line ends the skip; the stroke after it is unrelated
        // content again.
        assert_eq!(out, vec!["(label) Tj", "S"]);
    }

    #[test]
    fn consecutive_frame_blocks_are_each_removed() {
        let out = strip(
            "0.109 0.533 0.749 RG\n10 10 50 50 re\nS\n0.109 0.533 0.749 RG\n60 60 50 50 re\nS\nET",
        );
        assert_eq!(out, vec!["ET"]);
    }

    #[test]
    fn gray_color_op_terminates_the_skip() {
        let out = strip("0.109 0.533 0.749 RG\n10 10 50 50 re\n0.5 g\nf");
        // `0.5 g` ends the skip and passes through; the fill that follows is
        // treated as unrelated content.
        assert_eq!(out, vec!["0.5 g", "f"]);
    }

    #[test]
    fn untouched_stream_passes_through_unchanged() {
        let content = "q\nBT\n/F1 12 Tf\n(hi) Tj\nET\nQ";
        let out = strip(content);
        assert_eq!(out.join("\n"), content);
    }
}
