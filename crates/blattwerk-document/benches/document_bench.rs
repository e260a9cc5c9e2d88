// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Criterion benchmarks for the blattwerk-document crate. Currently benchmarks
// content-stream tokenization and overlay-frame stripping on a synthetic
// stream resembling sanitizer input.

use criterion::{Criterion, black_box, criterion_group, criterion_main};

use blattwerk_document::content::{strip_overlay_frames, tokenize};

// ---------------------------------------------------------------------------
// Benchmarks
// ---------------------------------------------------------------------------

/// Build a synthetic content stream: text blocks interleaved with overlay
/// frames and unrelated vector graphics, roughly the mix the sanitizer sees
/// on a scanned-letter page.
fn synthetic_stream(blocks: usize) -> String {
    let mut s = String::new();
    for i in 0..blocks {
        s.push_str("q\nBT\n/F1 12 Tf\n(paragraph text) Tj\nET\nQ\n");
        s.push_str(&format!("0.109 0.533 0.749 RG\n{i} {i} 120 40 re\nS\n"));
        s.push_str("1 0 0 rg\n5 5 10 10 re\nf\n");
    }
    s
}

/// Tokenize + strip a 200-block stream (~1800 lines).
fn bench_tokenize_and_strip(c: &mut Criterion) {
    let stream = synthetic_stream(200);

    c.bench_function("tokenize+strip (200 blocks)", |b| {
        b.iter(|| {
            let lines = tokenize(black_box(&stream));
            let kept = strip_overlay_frames(&lines);
            black_box(kept.len());
        });
    });
}

criterion_group!(benches, bench_tokenize_and_strip);
criterion_main!(benches);
