// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Optionally compiled-in features, queryable at runtime.
//
// Hosts should consult the build's capability set instead of probing for
// features with calls that fail. The set is assembled where the compile-time
// feature flags are known (the bridge crate); this module only defines the
// vocabulary.

use serde::{Deserialize, Serialize};

/// A feature whose availability is fixed at build time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Capability {
    /// PDF documents are accepted as conversion input.
    PdfInput,
    /// Raster images (JPEG, PNG, TIFF) are accepted as conversion input.
    ImageInput,
    /// OCR text extraction can run during conversion.
    Ocr,
}

impl std::fmt::Display for Capability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::PdfInput => "pdf-input",
            Self::ImageInput => "image-input",
            Self::Ocr => "ocr",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_are_stable() {
        assert_eq!(Capability::PdfInput.to_string(), "pdf-input");
        assert_eq!(Capability::ImageInput.to_string(), "image-input");
        assert_eq!(Capability::Ocr.to_string(), "ocr");
    }
}
