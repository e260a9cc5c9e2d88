// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Engine configuration.

use serde::{Deserialize, Serialize};

/// Engine-level defaults and resource bounds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Default rasterization resolution for conversion requests.
    pub default_dpi: u16,
    /// Default JPEG quality for conversion requests.
    pub default_quality: u8,
    /// Default binarization threshold.
    pub default_threshold: u8,
    /// Upper bound on worker threads for batch conversion.
    /// `None` uses the process-wide pool.
    pub max_batch_workers: Option<usize>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_dpi: 200,
            default_quality: 85,
            default_threshold: 180,
            max_batch_workers: None,
        }
    }
}
