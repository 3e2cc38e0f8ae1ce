// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Device writer — build single-page PDFs sized to a target device's screen
// using `printpdf` 0.8.
//
// printpdf 0.8 uses a data-oriented API: documents are built by constructing
// `PdfPage` structs containing `Vec<Op>` operation lists, then serialised via
// `PdfDocument::save()`.

use std::path::Path;

use printpdf::{
    Mm, Op, PdfDocument, PdfPage, PdfSaveOptions, PdfWarnMsg, Pt, RawImage, RawImageData,
    RawImageFormat, XObjectTransform,
};
use tracing::{debug, info, instrument};
use umbruch_core::error::{Result, UmbruchError};

/// Pixel density the output pages are rendered at. Matches the native
/// density of 6" e-ink panels.
pub const OUTPUT_DPI: f32 = 167.0;

/// Creates device-sized PDF pages from reflowed page images.
///
/// Page geometry comes from the staged output dimensions in pixels,
/// converted at [`OUTPUT_DPI`]; the page image is scaled to fill the page
/// (upscaling is fine — the page was prepared for this device).
pub struct DeviceWriter {
    /// Output page width in pixels.
    width_px: u32,
    /// Output page height in pixels.
    height_px: u32,
    /// Title metadata embedded in the PDF /Info dictionary.
    title: Option<String>,
}

impl DeviceWriter {
    /// Create a writer targeting the given output dimensions in pixels.
    pub fn new(width_px: u32, height_px: u32) -> Self {
        Self {
            width_px,
            height_px,
            title: None,
        }
    }

    /// Set a title for the PDF metadata.
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = Some(title.into());
    }

    /// Page dimensions in printpdf's Mm units.
    fn page_dimensions(&self) -> (Mm, Mm) {
        let to_mm = |px: u32| Mm(px as f32 / OUTPUT_DPI * 25.4);
        (to_mm(self.width_px), to_mm(self.height_px))
    }

    // -- Image to PDF ---------------------------------------------------------

    /// Create a single-page PDF containing the given encoded image (JPEG or
    /// PNG bytes), scaled to fill the device page and centred on the axis
    /// that does not fill completely.
    #[instrument(skip(self, image_bytes), fields(bytes_len = image_bytes.len()))]
    pub fn create_from_image(&self, image_bytes: &[u8]) -> Result<Vec<u8>> {
        let (page_w, page_h) = self.page_dimensions();
        let title = self.title.as_deref().unwrap_or("Umbruch Output");

        info!(
            width_px = self.width_px,
            height_px = self.height_px,
            title,
            "Creating device page"
        );

        let (px_w, px_h, pixels) = decode_rgb(image_bytes)?;
        let raw = RawImage {
            pixels: RawImageData::U8(pixels),
            width: px_w,
            height: px_h,
            data_format: RawImageFormat::RGB8,
            tag: Vec::new(),
        };

        let mut doc = PdfDocument::new(title);
        let xobject_id = doc.add_image(&raw);

        let page_w_pt = page_w.into_pt().0;
        let page_h_pt = page_h.into_pt().0;

        // Image native size at the output DPI.
        let img_w_pt = px_w as f32 / OUTPUT_DPI * 72.0;
        let img_h_pt = px_h as f32 / OUTPUT_DPI * 72.0;

        // Scale to fill the page while preserving aspect ratio. Unlike a
        // print layout there are no margins: the reading device's screen is
        // the page.
        let scale = (page_w_pt / img_w_pt).min(page_h_pt / img_h_pt);

        let rendered_w_pt = img_w_pt * scale;
        let rendered_h_pt = img_h_pt * scale;

        let x_offset = (page_w_pt - rendered_w_pt) / 2.0;
        let y_offset = (page_h_pt - rendered_h_pt) / 2.0;

        let ops = vec![Op::UseXobject {
            id: xobject_id,
            transform: XObjectTransform {
                translate_x: Some(Pt(x_offset)),
                translate_y: Some(Pt(y_offset)),
                scale_x: Some(scale),
                scale_y: Some(scale),
                dpi: Some(OUTPUT_DPI),
                rotate: None,
            },
        }];

        let page = PdfPage::new(page_w, page_h, ops);
        doc.with_pages(vec![page]);

        debug!(rendered_w_pt, rendered_h_pt, scale, "Page image placed");

        let mut warnings: Vec<PdfWarnMsg> = Vec::new();
        let output = doc.save(&PdfSaveOptions::default(), &mut warnings);

        Ok(output)
    }

    /// Create an image page and write it directly to a file.
    pub fn write_image_to_file(
        &self,
        image_bytes: &[u8],
        path: impl AsRef<Path>,
    ) -> Result<()> {
        let bytes = self.create_from_image(image_bytes)?;
        std::fs::write(path.as_ref(), &bytes)?;
        info!("Wrote device page to {}", path.as_ref().display());
        Ok(())
    }
}

/// Decode encoded image bytes into RGB8 pixel data plus dimensions, the
/// form printpdf embeds.
fn decode_rgb(image_bytes: &[u8]) -> Result<(usize, usize, Vec<u8>)> {
    let decoded = ::image::load_from_memory(image_bytes).map_err(|err| {
        UmbruchError::ImageError(format!("failed to decode page image: {}", err))
    })?;
    let (w, h) = (decoded.width() as usize, decoded.height() as usize);
    Ok((w, h, decoded.to_rgb8().into_raw()))
}
