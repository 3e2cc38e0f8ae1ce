// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Staged conversion parameters consumed by a reflow call.
//
// Fields are independent: each setter validates its own value and touches
// nothing else. Last successful write wins per field — applying a device
// profile overwrites width/height/quality defaults, and a later explicit
// setter call overwrites the profile's value again.

use serde::{Deserialize, Serialize};

use crate::device::DeviceProfile;
use crate::error::{Result, UmbruchError};

/// Upper bound on the page-range selector length. Longer input is rejected,
/// not truncated.
pub const MAX_PAGE_RANGE_LEN: usize = 1023;

/// Output fidelity level, staged as 1–3 by the host.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Quality {
    Low,
    Medium,
    High,
}

impl Quality {
    /// Map a host-supplied level (1–3) to a quality. Out-of-range levels
    /// return `None`.
    pub fn from_level(level: i32) -> Option<Self> {
        match level {
            1 => Some(Self::Low),
            2 => Some(Self::Medium),
            3 => Some(Self::High),
            _ => None,
        }
    }

    /// The host-facing level, 1–3.
    pub fn level(&self) -> i32 {
        match self {
            Self::Low => 1,
            Self::Medium => 2,
            Self::High => 3,
        }
    }

    /// JPEG quality score used when encoding reflowed page images:
    /// 50, 75, or 100.
    pub fn jpeg_quality(&self) -> u8 {
        (50 + (self.level() - 1) * 25) as u8
    }
}

/// The full set of staged conversion parameters.
///
/// Owned exclusively by the session; the engine receives it read-only at
/// conversion time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionSettings {
    /// Name of the last applied device profile, if any.
    pub device: Option<String>,
    /// Output page width in pixels.
    pub width_px: u32,
    /// Output page height in pixels.
    pub height_px: u32,
    /// Output fidelity level.
    pub quality: Quality,
    /// Whether OCR text extraction runs during conversion.
    pub ocr_enabled: bool,
    /// Raw page-range selector (e.g. "1-10", "1,3,5"). Parsed by the
    /// engine at conversion time; `None` selects every page.
    pub page_range: Option<String>,
    /// Output path staged by the most recent conversion call.
    pub output_path: Option<String>,
}

impl Default for ConversionSettings {
    /// Engine defaults: the base 6" e-reader geometry, medium quality,
    /// OCR off, every page.
    fn default() -> Self {
        Self {
            device: None,
            width_px: 560,
            height_px: 735,
            quality: Quality::Medium,
            ocr_enabled: false,
            page_range: None,
            output_path: None,
        }
    }
}

impl ConversionSettings {
    /// Overwrite width, height, and quality with a device profile's
    /// defaults. Other fields are untouched.
    pub fn apply_device(&mut self, profile: &'static DeviceProfile) {
        self.device = Some(profile.name.to_string());
        self.width_px = profile.width_px;
        self.height_px = profile.height_px;
        self.quality = profile.quality;
    }

    /// Set the output width in pixels. Non-positive values are rejected and
    /// leave the current value in place.
    pub fn set_width_px(&mut self, px: i32) -> Result<()> {
        if px <= 0 {
            return Err(UmbruchError::InvalidValue {
                field: "width",
                reason: format!("{px} is not a positive pixel count"),
            });
        }
        self.width_px = px as u32;
        Ok(())
    }

    /// Set the output height in pixels. Non-positive values are rejected.
    pub fn set_height_px(&mut self, px: i32) -> Result<()> {
        if px <= 0 {
            return Err(UmbruchError::InvalidValue {
                field: "height",
                reason: format!("{px} is not a positive pixel count"),
            });
        }
        self.height_px = px as u32;
        Ok(())
    }

    /// Set the quality level (1–3).
    pub fn set_quality_level(&mut self, level: i32) -> Result<()> {
        let quality = Quality::from_level(level).ok_or(UmbruchError::InvalidValue {
            field: "quality",
            reason: format!("level {level} outside 1-3"),
        })?;
        self.quality = quality;
        Ok(())
    }

    /// Stage a page-range selector verbatim. The selector syntax is not
    /// validated here — syntax errors surface at conversion time as engine
    /// failures. Input longer than [`MAX_PAGE_RANGE_LEN`] is rejected.
    pub fn set_page_range(&mut self, spec: &str) -> Result<()> {
        if spec.len() > MAX_PAGE_RANGE_LEN {
            return Err(UmbruchError::InvalidValue {
                field: "page_range",
                reason: format!(
                    "selector is {} chars, maximum is {MAX_PAGE_RANGE_LEN}",
                    spec.len()
                ),
            });
        }
        self.page_range = Some(spec.to_string());
        Ok(())
    }

    /// Stage the output path, replacing any prior value wholesale.
    pub fn set_output_path(&mut self, path: &str) {
        self.output_path = Some(path.to_string());
    }
}
