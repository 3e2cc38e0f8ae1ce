// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF reader — open existing documents, count their pages, and extract a
// selected set of pages into a new standalone document using the `lopdf`
// crate.

use std::collections::BTreeMap;
use std::path::Path;

use lopdf::{Document, Object, ObjectId, dictionary};
use tracing::{debug, info, instrument, warn};
use umbruch_core::error::{Result, UmbruchError};

/// Reads existing PDF files on behalf of the reflow pipeline.
#[derive(Debug)]
pub struct PdfReader {
    /// The underlying lopdf document.
    document: Document,
}

impl PdfReader {
    // -- Construction ---------------------------------------------------------

    /// Open a PDF from the filesystem.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path_ref = path.as_ref();
        info!("Opening PDF: {}", path_ref.display());

        let document = Document::load(path_ref).map_err(|err| {
            UmbruchError::PdfError(format!(
                "failed to open {}: {}",
                path_ref.display(),
                err
            ))
        })?;

        debug!(pages = document.get_pages().len(), "PDF loaded");

        Ok(Self { document })
    }

    /// Create a reader from raw PDF bytes already in memory.
    #[instrument(skip_all, fields(bytes_len = data.len()))]
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let document = Document::load_mem(data).map_err(|err| {
            UmbruchError::PdfError(format!("failed to load PDF from memory: {}", err))
        })?;

        Ok(Self { document })
    }

    // -- Inspection -----------------------------------------------------------

    /// Number of pages in the document.
    pub fn page_count(&self) -> usize {
        self.document.get_pages().len()
    }

    // -- Extraction -----------------------------------------------------------

    /// Build a new standalone PDF containing `page_numbers` (1-indexed, in
    /// the given order, duplicates allowed) and return its serialized bytes.
    ///
    /// Objects referenced by the selected pages (fonts, images, content
    /// streams) are cloned into the new document once, no matter how many
    /// pages share them.
    #[instrument(skip(self), fields(selected = page_numbers.len()))]
    pub fn extract_pages(&self, page_numbers: &[u32]) -> Result<Vec<u8>> {
        let pages = self.document.get_pages();
        let mut target = Document::with_version("1.5");
        let pages_id = target.new_object_id();
        let mut cloner = ObjectCloner::default();

        let mut kids: Vec<Object> = Vec::with_capacity(page_numbers.len());
        for &number in page_numbers {
            let page_id = *pages.get(&number).ok_or_else(|| {
                UmbruchError::PdfError(format!(
                    "page {} not found (document has {} pages)",
                    number,
                    pages.len()
                ))
            })?;

            let page_object = self.document.get_object(page_id).map_err(|err| {
                UmbruchError::PdfError(format!(
                    "cannot read page object {:?}: {}",
                    page_id, err
                ))
            })?;

            let cloned = cloner.clone_value(&self.document, &mut target, page_object)?;
            let new_id = target.add_object(cloned);

            // Re-parent the page onto the new document's page tree.
            if let Ok(Object::Dictionary(page_dict)) = target.get_object_mut(new_id) {
                page_dict.set("Parent", Object::Reference(pages_id));
            }

            kids.push(Object::Reference(new_id));
        }

        let count = kids.len() as i64;
        target.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
            }),
        );

        let catalog_id = target.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        target.trailer.set("Root", catalog_id);
        target.compress();

        let mut output = Vec::new();
        target.save_to(&mut output).map_err(|err| {
            UmbruchError::PdfError(format!("failed to serialise extracted pages: {}", err))
        })?;

        debug!(output_bytes = output.len(), "Pages extracted");
        Ok(output)
    }
}

// -- Object cloning -----------------------------------------------------------

/// Clones objects from one document into another, memoizing by source
/// `ObjectId` so that resources shared between selected pages land in the
/// target exactly once.
#[derive(Default)]
struct ObjectCloner {
    map: BTreeMap<ObjectId, ObjectId>,
}

impl ObjectCloner {
    /// Clone a single value. References are followed and cloned through the
    /// memo table; /Parent keys are skipped (the caller re-parents pages
    /// explicitly, and following them would drag in the source page tree).
    fn clone_value(
        &mut self,
        source: &Document,
        target: &mut Document,
        object: &Object,
    ) -> Result<Object> {
        match object {
            Object::Reference(ref_id) => {
                let new_id = self.clone_referenced(source, target, *ref_id)?;
                Ok(Object::Reference(new_id))
            }
            Object::Dictionary(dict) => {
                let mut new_dict = lopdf::Dictionary::new();
                for (key, value) in dict.iter() {
                    if key == b"Parent" {
                        continue;
                    }
                    let cloned_value = self.clone_value(source, target, value)?;
                    new_dict.set(key.clone(), cloned_value);
                }
                Ok(Object::Dictionary(new_dict))
            }
            Object::Array(arr) => {
                let mut new_arr = Vec::with_capacity(arr.len());
                for item in arr {
                    new_arr.push(self.clone_value(source, target, item)?);
                }
                Ok(Object::Array(new_arr))
            }
            Object::Stream(stream) => {
                let mut new_dict = lopdf::Dictionary::new();
                for (key, value) in stream.dict.iter() {
                    if key == b"Parent" {
                        continue;
                    }
                    let cloned_value = self.clone_value(source, target, value)?;
                    new_dict.set(key.clone(), cloned_value);
                }
                Ok(Object::Stream(lopdf::Stream::new(
                    new_dict,
                    stream.content.clone(),
                )))
            }
            // Boolean, Integer, Real, String, Name, Null are trivially cloneable.
            other => Ok(other.clone()),
        }
    }

    /// Clone the object behind a reference, allocating its target id before
    /// descending so that reference cycles terminate.
    fn clone_referenced(
        &mut self,
        source: &Document,
        target: &mut Document,
        ref_id: ObjectId,
    ) -> Result<ObjectId> {
        if let Some(&mapped) = self.map.get(&ref_id) {
            return Ok(mapped);
        }

        let new_id = target.new_object_id();
        self.map.insert(ref_id, new_id);

        let cloned = match source.get_object(ref_id) {
            Ok(referenced) => self.clone_value(source, target, referenced)?,
            Err(err) => {
                warn!(?ref_id, %err, "Cannot resolve reference, using Null");
                Object::Null
            }
        };

        target.objects.insert(new_id, cloned);
        Ok(new_id)
    }
}

/// Build a minimal self-contained PDF with `count` pages. Test fixture
/// shared with the pipeline tests.
#[cfg(test)]
pub(crate) fn sample_pdf(count: usize) -> Vec<u8> {
    use lopdf::Stream;
    use lopdf::content::{Content, Operation};

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => Object::Reference(font_id) },
    });

    let mut kids: Vec<Object> = Vec::with_capacity(count);
    for number in 1..=count {
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 12.into()]),
                Operation::new("Td", vec![72.into(), 720.into()]),
                Operation::new(
                    "Tj",
                    vec![Object::string_literal(format!("Page {number}"))],
                ),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(
            dictionary! {},
            content.encode().unwrap(),
        ));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => Object::Reference(pages_id),
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
            "Resources" => Object::Reference(resources_id),
            "Contents" => Object::Reference(content_id),
        });
        kids.push(Object::Reference(page_id));
    }

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count as i64,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).unwrap();
    bytes
}
