// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// The seam between the session layer and the reflow engine.
//
// The session owns the engine as an opaque `Box<dyn ReflowEngine>`: created
// on init, dropped on cleanup, never shared. Everything the engine needs for
// a conversion arrives through the settings snapshot and the input path.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::settings::ConversionSettings;

/// A page-reflow conversion engine.
///
/// `convert_file` is synchronous and blocking: it returns only once the
/// output has been fully produced (or the attempt has failed), and it
/// processes exactly one input per call. Transient buffers allocated during
/// a conversion must be released before the call returns.
pub trait ReflowEngine {
    /// Convert a single input document using the staged settings. The
    /// output location is `settings.output_path`.
    fn convert_file(
        &mut self,
        settings: &ConversionSettings,
        input: &Path,
    ) -> Result<ConversionReport>;

    /// Open `path` read-only and report its page count.
    fn page_count(&self, path: &Path) -> Result<usize>;
}

/// What a completed conversion reports back to the host.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionReport {
    /// Input document path, as given by the host.
    pub input: String,
    /// Output document path the engine wrote to.
    pub output: String,
    /// Number of pages in the output document.
    pub pages_written: usize,
    /// Path of the OCR text sidecar, when OCR ran.
    pub ocr_sidecar: Option<String>,
    /// When the conversion finished.
    pub completed_at: DateTime<Utc>,
}

impl ConversionReport {
    /// JSON rendition for scripting hosts that consume strings rather than
    /// Rust structs.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}
