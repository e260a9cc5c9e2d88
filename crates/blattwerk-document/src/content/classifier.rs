// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Marker classifier — flags form XObjects that encode a scannable 2D code
// (QR and friends) as a dense grid of small filled rectangles.
//
// The signature is purely statistical: many rectangle constructions, many
// fills, and (near-)zero text operators. Ordinary page content mixes text
// with graphics or has low rectangle density. False positives and negatives
// are an accepted cost; the marker payload is never decoded.

use tracing::trace;

/// Fill operators, non-zero and even-odd variants.
const FILL_OPS: &[&str] = &["f", "F", "f*"];

/// Text showing and positioning operators.
const TEXT_OPS: &[&str] = &[
    "BT", "ET", "Tj", "TJ", "'", "\"", "Td", "TD", "Tm", "T*", "Tf", "TL",
];

/// Heuristically decide whether a form XObject's operator stream encodes an
/// embedded marker.
pub fn is_likely_marker(content: &[u8]) -> bool {
    let text = String::from_utf8_lossy(content);

    let mut rects = 0usize;
    let mut fills = 0usize;
    let mut text_ops = 0usize;

    for token in text.split_whitespace() {
        if token == "re" {
            rects += 1;
        } else if FILL_OPS.contains(&token) {
            fills += 1;
        } else if TEXT_OPS.contains(&token) {
            text_ops += 1;
        }
    }

    let marker = (rects > 10 && fills > 10 && text_ops < 5)
        || (rects + fills > 20 && text_ops == 0);
    trace!(rects, fills, text_ops, marker, "form object classified");
    marker
}
