// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the Blattwerk document engine.

use serde::{Deserialize, Serialize};

use crate::error::{BlattwerkError, Result};

/// A rectangle to crop out of one rasterized document page.
///
/// Coordinates are pixels in the page's rasterized coordinate space, origin
/// at the top-left corner. `x`/`y` may be negative and `width`/`height` may
/// be non-positive — the validator classifies such frames rather than
/// rejecting them at parse time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Frame {
    /// 0-based page index into the rasterized page sequence.
    pub page: i64,
    pub x: i64,
    pub y: i64,
    pub width: i64,
    pub height: i64,
}

/// Output color handling for page-to-image conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    /// 24-bit RGB output.
    Color,
    /// 8-bit grayscale output.
    Grayscale,
    /// Black-and-white via a global threshold. The output stays 8-bit
    /// grayscale because JPEG has no 1-bit mode.
    Binary,
}

impl std::str::FromStr for ColorMode {
    type Err = BlattwerkError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "color" => Ok(Self::Color),
            "grayscale" => Ok(Self::Grayscale),
            "binary" => Ok(Self::Binary),
            other => Err(BlattwerkError::InvalidParameter(format!(
                "mode must be one of: color, grayscale, binary (got {other:?})"
            ))),
        }
    }
}

/// Parameters for converting a document into per-page images.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ConvertOptions {
    /// Rasterization resolution, valid range [72, 600].
    pub dpi: u16,
    /// JPEG quality, valid range [50, 95].
    pub quality: u8,
    pub color_mode: ColorMode,
    /// Cutoff for [`ColorMode::Binary`]: pixels at or above the threshold
    /// become white. The `u8` type enforces the [0, 255] contract.
    pub threshold: u8,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self::from_config(&crate::EngineConfig::default())
    }
}

impl ConvertOptions {
    /// Build options from engine-level defaults.
    pub fn from_config(config: &crate::EngineConfig) -> Self {
        Self {
            dpi: config.default_dpi,
            quality: config.default_quality,
            color_mode: ColorMode::Color,
            threshold: config.default_threshold,
        }
    }

    /// Check the numeric ranges, reporting the first violation.
    pub fn validate(&self) -> Result<()> {
        if !(72..=600).contains(&self.dpi) {
            return Err(BlattwerkError::InvalidParameter(format!(
                "dpi must be in [72, 600] (got {})",
                self.dpi
            )));
        }
        if !(50..=95).contains(&self.quality) {
            return Err(BlattwerkError::InvalidParameter(format!(
                "quality must be in [50, 95] (got {})",
                self.quality
            )));
        }
        Ok(())
    }
}
