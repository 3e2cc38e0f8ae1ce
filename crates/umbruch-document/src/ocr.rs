// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// OCR sidecar extraction for reflowed pages.
//
// When OCR is staged for a conversion, the recognized text of the raster
// page is written next to the output document as a `.txt` sidecar.
// Recognition uses the `ocrs` crate, a pure-Rust OCR engine backed by
// neural network models executed via `rten`.
//
// Only compiled when the `ocr` feature is enabled. The two model files,
// `text-detection.rten` and `text-recognition.rten`, are looked up in
// `$XDG_CACHE_HOME/ocrs` (usually `~/.cache/ocrs`) unless the host points
// elsewhere; running the `ocrs-cli` tool once downloads them there.

use std::path::{Path, PathBuf};

use image::DynamicImage;
use ocrs::{ImageSource, OcrEngine as OcrsEngine, OcrEngineParams};
use rten::Model;
use tracing::{debug, info, instrument};
use umbruch_core::error::{Result, UmbruchError};

/// Model cache directory per the XDG Base Directory specification, shared
/// with the `ocrs-cli` download location.
fn default_model_dir() -> PathBuf {
    std::env::var_os("XDG_CACHE_HOME")
        .map(PathBuf::from)
        .or_else(|| std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".cache")))
        .map(|cache| cache.join("ocrs"))
        // Last resort — current directory.
        .unwrap_or_else(|| PathBuf::from("ocrs-models"))
}

/// Locations of the two `.rten` model files recognition needs.
#[derive(Debug, Clone)]
pub struct ModelPaths {
    /// Text-detection model (locates text regions on the page).
    pub detection: PathBuf,
    /// Text-recognition model (decodes characters from detected regions).
    pub recognition: PathBuf,
}

impl Default for ModelPaths {
    fn default() -> Self {
        Self::in_dir(default_model_dir())
    }
}

impl ModelPaths {
    /// Point at a directory holding `text-detection.rten` and
    /// `text-recognition.rten`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            detection: dir.join("text-detection.rten"),
            recognition: dir.join("text-recognition.rten"),
        }
    }
}

fn load_model(path: &Path, role: &str) -> Result<Model> {
    if !path.exists() {
        return Err(UmbruchError::OcrError(format!(
            "{role} model missing at {}; run `ocrs-cli` once to download it",
            path.display()
        )));
    }
    Model::load_file(path).map_err(|err| {
        UmbruchError::OcrError(format!(
            "{role} model at {} failed to load: {err}",
            path.display()
        ))
    })
}

/// Text extractor for reflowed raster pages.
///
/// Model loading is the expensive step. The reflow pipeline constructs the
/// engine lazily on the first OCR-enabled conversion and reuses it for the
/// rest of the session.
pub struct OcrEngine {
    /// The underlying `ocrs` engine instance.
    engine: OcrsEngine,
}

impl OcrEngine {
    /// Create an engine from explicit model locations.
    #[instrument(skip_all, fields(
        detection = %models.detection.display(),
        recognition = %models.recognition.display(),
    ))]
    pub fn new(models: ModelPaths) -> Result<Self> {
        let engine = OcrsEngine::new(OcrEngineParams {
            detection_model: Some(load_model(&models.detection, "detection")?),
            recognition_model: Some(load_model(&models.recognition, "recognition")?),
            ..Default::default()
        })
        .map_err(|err| UmbruchError::OcrError(format!("engine start failed: {err}")))?;

        info!("OCR engine ready");
        Ok(Self { engine })
    }

    /// Create an engine with models from the default cache directory.
    pub fn with_default_models() -> Result<Self> {
        Self::new(ModelPaths::default())
    }

    /// Recognized text of a page image, lines separated by newlines. The
    /// page is converted to RGB8 internally.
    #[instrument(skip_all, fields(width = page.width(), height = page.height()))]
    pub fn page_text(&self, page: &DynamicImage) -> Result<String> {
        let rgb = page.to_rgb8();

        let source = ImageSource::from_bytes(rgb.as_raw(), rgb.dimensions())
            .map_err(|err| UmbruchError::OcrError(format!("page image rejected: {err}")))?;
        let input = self
            .engine
            .prepare_input(source)
            .map_err(|err| UmbruchError::OcrError(format!("page preprocessing failed: {err}")))?;
        let text = self
            .engine
            .get_text(&input)
            .map_err(|err| UmbruchError::OcrError(format!("recognition failed: {err}")))?;

        debug!(lines = text.lines().count(), chars = text.len(), "page recognized");
        Ok(text)
    }

    /// Recognize `page` and write its text beside the output document as
    /// `<output>.txt`. Returns the sidecar path.
    pub fn write_sidecar(&self, page: &DynamicImage, output: &str) -> Result<String> {
        let text = self.page_text(page)?;
        let sidecar = format!("{output}.txt");
        std::fs::write(&sidecar, &text)?;

        info!(sidecar, chars = text.len(), "OCR sidecar written");
        Ok(sidecar)
    }
}
