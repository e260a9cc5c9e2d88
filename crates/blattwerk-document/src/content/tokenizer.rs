// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Line-oriented tokenizer for PDF content streams.
//
// This is deliberately not a grammar-complete parser of the graphics-operator
// language. The upstream encoders this engine targets emit the operators of
// interest one per line, so each line is treated as an atomic token and
// classified by its trailing operator name. Unrecognized lines pass through
// verbatim.

use once_cell::sync::Lazy;
use regex::Regex;

/// `<num> <num> <num> RG` (stroke) or `<num> <num> <num> rg` (fill).
static COLOR_SET_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([0-9.eE+-]+)\s+([0-9.eE+-]+)\s+([0-9.eE+-]+)\s+(RG|rg)$")
        .expect("color-set pattern is valid")
});

/// Operators that construct, paint, or clip a path, set the line width, or
/// close a subpath. A line ending in one of these belongs to a drawing block.
const DRAWING_OPS: &[&str] = &[
    "re", // rectangle construction
    "S", "s", // stroke
    "f", "F", "f*", // fill (non-zero and even-odd)
    "B", "B*", "b", "b*", // combined stroke + fill
    "h", // close path
    "W", "W*", // clip
    "m", // move-to
    "l", // line-to
    "c", "v", "y", // curve-to
    "w", // line width
];

/// Markers that flag a drawing line even when the operator is not the last
/// token (some encoders pack coordinates and operators on one line).
const INLINE_DRAW_MARKERS: &[&str] = &["re", "m", "l", "w"];

/// Classification of one content-stream line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LineKind {
    /// A stroke (`RG`) or fill (`rg`) color assignment with its operands.
    ColorSet { r: f32, g: f32, b: f32, stroke: bool },
    /// Path construction / painting / clipping / line-width.
    Drawing,
    /// Graphics-state save (`q`) or restore (`Q`).
    StateBracket,
    /// Anything else — preserved verbatim.
    Other,
}

/// One line of a content stream together with its classification.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TokenLine<'a> {
    /// The line exactly as it appeared, without the trailing line feed.
    pub raw: &'a str,
    pub kind: LineKind,
}

/// Split a content stream's text into classified lines.
pub fn tokenize(content: &str) -> Vec<TokenLine<'_>> {
    content
        .split('\n')
        .map(|raw| TokenLine {
            raw,
            kind: classify(raw),
        })
        .collect()
}

/// True if any whitespace-separated token of the line is a color operator
/// (`RG`, `rg`, `G`, `g`). Intentionally broad: the stripper uses this to
/// guarantee a skip always terminates at the next color assignment.
pub fn has_color_operator_token(line: &str) -> bool {
    line.split_whitespace()
        .any(|tok| matches!(tok, "RG" | "rg" | "G" | "g"))
}

fn classify(raw: &str) -> LineKind {
    let trimmed = raw.trim();
    if trimmed == "q" || trimmed == "Q" {
        return LineKind::StateBracket;
    }

    if let Some(caps) = COLOR_SET_RE.captures(trimmed)
        && let (Ok(r), Ok(g), Ok(b)) = (
            caps[1].parse::<f32>(),
            caps[2].parse::<f32>(),
            caps[3].parse::<f32>(),
        )
    {
        return LineKind::ColorSet {
            r,
            g,
            b,
            stroke: &caps[4] == "RG",
        };
    }

    let tokens: Vec<&str> = trimmed.split_whitespace().collect();
    if let Some(last) = tokens.last() {
        if DRAWING_OPS.contains(last) {
            return LineKind::Drawing;
        }
        if tokens.iter().any(|tok| INLINE_DRAW_MARKERS.contains(tok)) {
            return LineKind::Drawing;
        }
    }

    LineKind::Other
}
