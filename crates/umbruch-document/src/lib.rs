// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// umbruch-document — Engine-side document operations for the Umbruch
// page-reflow converter.
//
// Provides PDF reading (page count, page extraction), device-sized PDF page
// writing, raster page preparation (grayscale, contrast, binarization,
// resize), page-range selector parsing, and an optional OCR text extractor.
// The pieces are composed by `ReflowPipeline`, the default implementation of
// the engine seam the session layer drives.

pub mod image;
pub mod pagelist;
pub mod pdf;
pub mod reflow;

#[cfg(feature = "ocr")]
pub mod ocr;

// Re-export the primary structs so callers can use `umbruch_document::PdfReader` etc.
pub use crate::image::page::PageImage;
pub use pdf::reader::PdfReader;
pub use pdf::writer::DeviceWriter;
pub use reflow::ReflowPipeline;

#[cfg(feature = "ocr")]
pub use ocr::{ModelPaths, OcrEngine};
