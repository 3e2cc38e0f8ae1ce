// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Conversion dispatch: the one call that consumes the staged settings.
//
// `process_file` stages the output path into the settings (a real settings
// mutation, so a later call overwrites it wholesale), then hands the full
// snapshot to the engine. The call blocks until the engine has produced —
// or failed to produce — the output document. Engine-side failures surface
// as a single opaque `ConversionFailed`; the one distinction this layer
// adds is that an engine "success" with zero written pages is also a
// failure.

use std::path::Path;

use tracing::{info, warn};
use umbruch_core::engine::ConversionReport;
use umbruch_core::error::{Result, UmbruchError};

use crate::session::Session;

impl Session {
    /// Convert `input` into `output` using the staged settings.
    ///
    /// Synchronous and blocking: returns only once the output exists (or
    /// the attempt failed). Exactly one input is processed per call; there
    /// is no queuing and no cancellation.
    pub fn process_file(&mut self, input: &str, output: &str) -> Result<ConversionReport> {
        if !self.is_initialized() {
            return Err(UmbruchError::NotInitialized);
        }
        if input.trim().is_empty() {
            return Err(UmbruchError::InvalidArgument(
                "input path is empty".to_string(),
            ));
        }
        if output.trim().is_empty() {
            return Err(UmbruchError::InvalidArgument(
                "output path is empty".to_string(),
            ));
        }

        self.settings_mut().set_output_path(output);

        let (engine, settings) = self.engine_and_settings()?;
        let report = engine
            .convert_file(settings, Path::new(input))
            .map_err(|err| match err {
                failed @ UmbruchError::ConversionFailed(_) => failed,
                other => UmbruchError::ConversionFailed(other.to_string()),
            })?;

        if report.pages_written == 0 {
            warn!(input, output, "engine returned without writing any pages");
            return Err(UmbruchError::ConversionFailed(
                "engine produced no output pages".to_string(),
            ));
        }

        info!(input, output, pages = report.pages_written, "conversion complete");
        Ok(report)
    }
}
