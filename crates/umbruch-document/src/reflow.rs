// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// The default reflow engine.
//
// Dispatches on the input's document type: PDF inputs go through page
// selection and extraction; raster inputs go through the quality-driven
// image pipeline and come out as a device-sized single-page PDF. All work
// is synchronous; a conversion call returns only once the output file is
// fully written.

use std::path::Path;

use chrono::Utc;
use tracing::{info, instrument, warn};
use umbruch_core::engine::{ConversionReport, ReflowEngine};
use umbruch_core::error::{Result, UmbruchError};
use umbruch_core::settings::{ConversionSettings, Quality};

use crate::image::page::PageImage;
use crate::pagelist;
use crate::pdf::reader::PdfReader;
use crate::pdf::writer::DeviceWriter;

#[cfg(feature = "ocr")]
use crate::ocr::OcrEngine;

/// Supported input document types, inferred from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InputKind {
    Pdf,
    Jpeg,
    Png,
    Tiff,
}

impl InputKind {
    fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?;
        match ext.to_ascii_lowercase().as_str() {
            "pdf" => Some(Self::Pdf),
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "png" => Some(Self::Png),
            "tif" | "tiff" => Some(Self::Tiff),
            _ => None,
        }
    }
}

/// The engine behind the default session: lopdf-backed page extraction for
/// PDFs, image pipeline plus device writer for raster inputs, optional OCR
/// sidecar output.
pub struct ReflowPipeline {
    /// Lazily constructed OCR engine, reused across conversions.
    #[cfg(feature = "ocr")]
    ocr: Option<OcrEngine>,
}

impl ReflowPipeline {
    pub fn new() -> Self {
        Self {
            #[cfg(feature = "ocr")]
            ocr: None,
        }
    }
}

impl Default for ReflowPipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl ReflowEngine for ReflowPipeline {
    #[instrument(skip_all, fields(input = %input.display()))]
    fn convert_file(
        &mut self,
        settings: &ConversionSettings,
        input: &Path,
    ) -> Result<ConversionReport> {
        let output = settings
            .output_path
            .as_deref()
            .ok_or_else(|| UmbruchError::InvalidArgument("no output path staged".into()))?;

        let kind = InputKind::from_path(input).ok_or_else(|| {
            UmbruchError::DocumentUnreadable(format!(
                "unsupported input type: {}",
                input.display()
            ))
        })?;

        match kind {
            InputKind::Pdf => self.reflow_pdf(settings, input, output),
            InputKind::Jpeg | InputKind::Png | InputKind::Tiff => {
                self.reflow_image(settings, input, output)
            }
        }
    }

    fn page_count(&self, path: &Path) -> Result<usize> {
        match InputKind::from_path(path) {
            Some(InputKind::Pdf) => Ok(PdfReader::open(path)?.page_count()),
            Some(_) => {
                std::fs::metadata(path)?;
                Ok(1)
            }
            None => Err(UmbruchError::DocumentUnreadable(format!(
                "unsupported document type: {}",
                path.display()
            ))),
        }
    }
}

impl ReflowPipeline {
    /// PDF path: resolve the staged page selection and extract those pages
    /// into the output document.
    fn reflow_pdf(
        &mut self,
        settings: &ConversionSettings,
        input: &Path,
        output: &str,
    ) -> Result<ConversionReport> {
        let reader = PdfReader::open(input)?;
        let total = reader.page_count();

        let pages = match settings.page_range.as_deref() {
            Some(spec) => pagelist::select_pages(spec, total)?,
            None => (1..=total as u32).collect(),
        };

        let bytes = reader.extract_pages(&pages)?;
        std::fs::write(output, &bytes)?;

        if settings.ocr_enabled {
            // Text extraction runs on raster inputs; PDF pages would need
            // rasterization first.
            warn!("OCR was staged but the input is a PDF; skipping text extraction");
        }

        info!(
            total,
            selected = pages.len(),
            output,
            "PDF reflow complete"
        );

        Ok(ConversionReport {
            input: input.display().to_string(),
            output: output.to_string(),
            pages_written: pages.len(),
            ocr_sidecar: None,
            completed_at: Utc::now(),
        })
    }

    /// Raster path: run the quality-driven pipeline and emit a device-sized
    /// single-page PDF, plus the OCR text sidecar when staged.
    fn reflow_image(
        &mut self,
        settings: &ConversionSettings,
        input: &Path,
        output: &str,
    ) -> Result<ConversionReport> {
        // A raster input is a one-page document; the staged selection must
        // still match it.
        if let Some(spec) = settings.page_range.as_deref() {
            pagelist::select_pages(spec, 1)?;
        }

        let page = PageImage::open(input)?;

        #[cfg(feature = "ocr")]
        let ocr_sidecar = if settings.ocr_enabled {
            Some(self.write_ocr_sidecar(page.as_dynamic(), output)?)
        } else {
            None
        };
        #[cfg(not(feature = "ocr"))]
        let ocr_sidecar: Option<String> = if settings.ocr_enabled {
            return Err(UmbruchError::OcrUnavailable);
        } else {
            None
        };

        let processed = prepare_page(page, settings);
        let jpeg = processed.to_jpeg_bytes(settings.quality.jpeg_quality())?;

        let mut writer = DeviceWriter::new(settings.width_px, settings.height_px);
        if let Some(name) = input.file_stem().and_then(|stem| stem.to_str()) {
            writer.set_title(name);
        }
        writer.write_image_to_file(&jpeg, output)?;

        info!(output, "Raster reflow complete");

        Ok(ConversionReport {
            input: input.display().to_string(),
            output: output.to_string(),
            pages_written: 1,
            ocr_sidecar,
            completed_at: Utc::now(),
        })
    }

    /// Recognize text on the page and write it next to the output document.
    #[cfg(feature = "ocr")]
    fn write_ocr_sidecar(
        &mut self,
        image: &image::DynamicImage,
        output: &str,
    ) -> Result<String> {
        if self.ocr.is_none() {
            self.ocr = Some(OcrEngine::with_default_models()?);
        }
        let Some(engine) = self.ocr.as_ref() else {
            return Err(UmbruchError::OcrError("engine unavailable".into()));
        };

        engine.write_sidecar(image, output)
    }
}

/// Apply the quality-driven raster pipeline: grayscale always (e-ink
/// output), contrast and binarization as fidelity decreases, then fit to
/// the staged device dimensions.
fn prepare_page(page: PageImage, settings: &ConversionSettings) -> PageImage {
    let page = page.grayscale();
    let page = match settings.quality {
        Quality::High => page,
        Quality::Medium => page.adjust_contrast(10.0),
        Quality::Low => page.adjust_contrast(10.0).bilevel(),
    };
    page.fit_to(settings.width_px, settings.height_px)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::reader::sample_pdf;
    use image::{DynamicImage, GrayImage, Luma};

    fn settings() -> ConversionSettings {
        ConversionSettings::default()
    }

    fn write_sample_png(path: &Path) {
        let img = GrayImage::from_fn(300, 400, |x, y| {
            if (x / 10 + y / 10) % 2 == 0 {
                Luma([20u8])
            } else {
                Luma([230u8])
            }
        });
        DynamicImage::ImageLuma8(img).save(path).unwrap();
    }

    #[test]
    fn pdf_page_count() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.pdf");
        std::fs::write(&path, sample_pdf(4)).unwrap();

        let pipeline = ReflowPipeline::new();
        assert_eq!(pipeline.page_count(&path).unwrap(), 4);
    }

    #[test]
    fn image_page_count_is_one() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("page.png");
        write_sample_png(&path);

        let pipeline = ReflowPipeline::new();
        assert_eq!(pipeline.page_count(&path).unwrap(), 1);
    }

    #[test]
    fn unsupported_extension_is_unreadable() {
        let pipeline = ReflowPipeline::new();
        let err = pipeline.page_count(Path::new("notes.docx")).unwrap_err();
        assert!(matches!(err, UmbruchError::DocumentUnreadable(_)));
    }

    #[test]
    fn pdf_reflow_selects_staged_pages() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.pdf");
        let output = dir.path().join("out.pdf");
        std::fs::write(&input, sample_pdf(5)).unwrap();

        let mut config = settings();
        config.set_page_range("1-3").unwrap();
        config.set_output_path(output.to_str().unwrap());

        let mut pipeline = ReflowPipeline::new();
        let report = pipeline.convert_file(&config, &input).unwrap();

        assert_eq!(report.pages_written, 3);
        assert_eq!(pipeline.page_count(&output).unwrap(), 3);
    }

    #[test]
    fn pdf_reflow_defaults_to_every_page() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.pdf");
        let output = dir.path().join("out.pdf");
        std::fs::write(&input, sample_pdf(3)).unwrap();

        let mut config = settings();
        config.set_output_path(output.to_str().unwrap());

        let mut pipeline = ReflowPipeline::new();
        let report = pipeline.convert_file(&config, &input).unwrap();
        assert_eq!(report.pages_written, 3);
    }

    #[test]
    fn bad_selector_fails_at_conversion_time() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.pdf");
        let output = dir.path().join("out.pdf");
        std::fs::write(&input, sample_pdf(3)).unwrap();

        let mut config = settings();
        config.set_page_range("banana").unwrap();
        config.set_output_path(output.to_str().unwrap());

        let mut pipeline = ReflowPipeline::new();
        let err = pipeline.convert_file(&config, &input).unwrap_err();
        assert!(matches!(err, UmbruchError::PageRange(_)));
        assert!(!output.exists());
    }

    #[test]
    fn image_reflow_produces_device_pdf() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("scan.png");
        let output = dir.path().join("out.pdf");
        write_sample_png(&input);

        let mut config = settings();
        config.set_quality_level(1).unwrap();
        config.set_output_path(output.to_str().unwrap());

        let mut pipeline = ReflowPipeline::new();
        let report = pipeline.convert_file(&config, &input).unwrap();

        assert_eq!(report.pages_written, 1);
        assert_eq!(pipeline.page_count(&output).unwrap(), 1);
    }

    #[test]
    fn missing_output_path_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.pdf");
        std::fs::write(&input, sample_pdf(2)).unwrap();

        let mut pipeline = ReflowPipeline::new();
        let err = pipeline.convert_file(&settings(), &input).unwrap_err();
        assert!(matches!(err, UmbruchError::InvalidArgument(_)));
    }
}
