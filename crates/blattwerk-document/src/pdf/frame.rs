// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Frame validation and clipping — pure geometry, no I/O.
//
// A frame is validated against the rasterized page it references. Anything
// the caller must fix (non-integer fields, page index out of range) is a
// hard error for the whole request; geometric problems (zero size, fully
// outside the page, clipped away) are per-frame skips that the compositor
// aggregates into one diagnostic.

use blattwerk_core::error::{BlattwerkError, Result};
use blattwerk_core::types::Frame;

/// A frame intersected with its page's pixel bounds.
///
/// Invariant: `0 <= x1 < x2 <= page width` and `0 <= y1 < y2 <= page height`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClippedCrop {
    pub source_page: usize,
    pub x1: u32,
    pub y1: u32,
    pub x2: u32,
    pub y2: u32,
}

impl ClippedCrop {
    pub fn width(&self) -> u32 {
        self.x2 - self.x1
    }

    pub fn height(&self) -> u32 {
        self.y2 - self.y1
    }
}

/// Why a frame produced no crop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    NonPositiveSize,
    /// The raw rectangle lies entirely off the page; the detail names the
    /// side(s) it fell off.
    OutsideBounds(String),
    /// Degenerate (zero-area) intersection left after clamping.
    ClippedToZero,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NonPositiveSize => write!(f, "non-positive width/height"),
            Self::OutsideBounds(detail) => write!(f, "{detail}"),
            Self::ClippedToZero => write!(f, "clipped to zero area"),
        }
    }
}

/// Diagnostic record for one skipped frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameSkip {
    pub index: usize,
    pub frame: Frame,
    pub page_width: u32,
    pub page_height: u32,
    pub reason: SkipReason,
}

impl std::fmt::Display for FrameSkip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "frame #{} page={} coords=({},{}) {}×{} (page {}×{}; {})",
            self.index,
            self.frame.page,
            self.frame.x,
            self.frame.y,
            self.frame.width,
            self.frame.height,
            self.page_width,
            self.page_height,
            self.reason
        )
    }
}

/// Clip a frame against its page, yielding either a crop or a skip reason.
///
/// The page-range check is the caller's responsibility (it is a hard error,
/// not a skip); this function assumes `frame.page` already resolved to a
/// page of `page_width` × `page_height` pixels.
pub fn clip_frame(
    frame: &Frame,
    page_width: u32,
    page_height: u32,
) -> std::result::Result<ClippedCrop, SkipReason> {
    if frame.width <= 0 || frame.height <= 0 {
        return Err(SkipReason::NonPositiveSize);
    }

    let w = i64::from(page_width);
    let h = i64::from(page_height);
    let (x1_raw, y1_raw) = (frame.x, frame.y);
    let (x2_raw, y2_raw) = (
        frame.x.saturating_add(frame.width),
        frame.y.saturating_add(frame.height),
    );

    if x2_raw <= 0 || y2_raw <= 0 || x1_raw >= w || y1_raw >= h {
        let mut sides = Vec::new();
        if x2_raw <= 0 {
            sides.push("frame entirely left of page");
        }
        if x1_raw >= w {
            sides.push("frame entirely right of page");
        }
        if y2_raw <= 0 {
            sides.push("frame entirely above page");
        }
        if y1_raw >= h {
            sides.push("frame entirely below page");
        }
        return Err(SkipReason::OutsideBounds(sides.join(", ")));
    }

    let x1 = x1_raw.clamp(0, w);
    let y1 = y1_raw.clamp(0, h);
    let x2 = x2_raw.clamp(0, w);
    let y2 = y2_raw.clamp(0, h);

    if x2 <= x1 || y2 <= y1 {
        return Err(SkipReason::ClippedToZero);
    }

    Ok(ClippedCrop {
        source_page: frame.page as usize,
        x1: x1 as u32,
        y1: y1 as u32,
        x2: x2 as u32,
        y2: y2 as u32,
    })
}

/// Parse a JSON array of frames, reporting per-index field errors.
///
/// The service boundary receives frames as JSON text; a value that is not a
/// non-empty array is a [`BlattwerkError::MalformedFrameList`], and an entry
/// whose fields are missing or not integers is a
/// [`BlattwerkError::InvalidFrameFields`] naming the offending index.
pub fn parse_frames(json: &str) -> Result<Vec<Frame>> {
    let values: Vec<serde_json::Value> = serde_json::from_str(json)
        .map_err(|err| BlattwerkError::MalformedFrameList(err.to_string()))?;
    if values.is_empty() {
        return Err(BlattwerkError::MalformedFrameList("empty array".into()));
    }

    values
        .iter()
        .enumerate()
        .map(|(index, value)| {
            serde_json::from_value::<Frame>(value.clone())
                .map_err(|_| BlattwerkError::InvalidFrameFields { index })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(page: i64, x: i64, y: i64, width: i64, height: i64) -> Frame {
        Frame {
            page,
            x,
            y,
            width,
            height,
        }
    }

    #[test]
    fn in_bounds_frame_passes_through() {
        let crop = clip_frame(&frame(0, 100, 100, 300, 400), 1000, 1400).unwrap();
        assert_eq!(
            crop,
            ClippedCrop {
                source_page: 0,
                x1: 100,
                y1: 100,
                x2: 400,
                y2: 500
            }
        );
        assert_eq!((crop.width(), crop.height()), (300, 400));
    }

    #[test]
    fn negative_origin_clips_to_page() {
        let crop = clip_frame(&frame(0, -50, 0, 100, 100), 1000, 1400).unwrap();
        assert_eq!((crop.x1, crop.y1, crop.x2, crop.y2), (0, 0, 50, 100));
    }

    #[test]
    fn zero_size_is_a_skip_not_an_error() {
        assert_eq!(
            clip_frame(&frame(0, 10, 10, 0, 100), 1000, 1400),
            Err(SkipReason::NonPositiveSize)
        );
        assert_eq!(
            clip_frame(&frame(0, 10, 10, 100, -5), 1000, 1400),
            Err(SkipReason::NonPositiveSize)
        );
    }

    #[test]
    fn fully_outside_names_the_sides() {
        let err = clip_frame(&frame(0, -200, -200, 100, 100), 1000, 1400).unwrap_err();
        match err {
            SkipReason::OutsideBounds(detail) => {
                assert!(detail.contains("left"));
                assert!(detail.contains("above"));
            }
            other => panic!("expected OutsideBounds, got {other:?}"),
        }

        assert!(matches!(
            clip_frame(&frame(0, 1000, 0, 10, 10), 1000, 1400),
            Err(SkipReason::OutsideBounds(_))
        ));
    }

    #[test]
    fn edge_touching_frames_are_skipped() {
        // A frame ending exactly at the top edge (y2_raw == 0) shares only a
        // line with the page and is classified as outside.
        let reason = clip_frame(&frame(0, 990, -100, 20, 100), 1000, 1400).unwrap_err();
        assert_eq!(
            reason,
            SkipReason::OutsideBounds("frame entirely above page".into())
        );
    }

    #[test]
    fn skip_display_carries_full_context() {
        let skip = FrameSkip {
            index: 3,
            frame: frame(1, -10, 20, 30, 40),
            page_width: 800,
            page_height: 600,
            reason: SkipReason::ClippedToZero,
        };
        let text = skip.to_string();
        assert!(text.contains("frame #3"));
        assert!(text.contains("page=1"));
        assert!(text.contains("(-10,20) 30×40"));
        assert!(text.contains("800×600"));
        assert!(text.contains("clipped to zero area"));
    }

    #[test]
    fn parse_frames_rejects_non_arrays_and_empties() {
        assert!(matches!(
            parse_frames("{}"),
            Err(BlattwerkError::MalformedFrameList(_))
        ));
        assert!(matches!(
            parse_frames("[]"),
            Err(BlattwerkError::MalformedFrameList(_))
        ));
    }

    #[test]
    fn parse_frames_reports_the_offending_index() {
        let json = r#"[
            {"page": 0, "x": 1, "y": 2, "width": 3, "height": 4},
            {"page": 0, "x": 1.5, "y": 2, "width": 3, "height": 4}
        ]"#;
        assert!(matches!(
            parse_frames(json),
            Err(BlattwerkError::InvalidFrameFields { index: 1 })
        ));
    }

    #[test]
    fn parse_frames_accepts_well_formed_input() {
        let frames =
            parse_frames(r#"[{"page": 2, "x": -5, "y": 0, "width": 10, "height": 20}]"#).unwrap();
        assert_eq!(frames, vec![frame(2, -5, 0, 10, 20)]);
    }
}
