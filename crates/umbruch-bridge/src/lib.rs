// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// umbruch-bridge — Host-facing session API for the Umbruch page-reflow
// converter.
//
// An embedding host drives conversions through a `Session`: a context
// object it constructs once and owns for the lifetime of a conversion
// workflow. The protocol is init → any number of setter calls in any
// order → process_file → cleanup; inspection calls (page counts) are valid
// any time after init, and `version()` needs no session at all.
//
// The session is synchronous and single-caller: every call runs to
// completion before the host regains control, and nothing inside the
// session locks or spawns. A host that shares a session across threads must
// serialize the calls itself.

pub mod dispatch;
pub mod session;
pub mod status;

pub use session::{InitOutcome, Session};

use umbruch_core::Capability;

/// Version identifier of this build. Constant per build; callable without a
/// session.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

/// The capability set compiled into this build.
///
/// Hosts should consult this instead of probing for optional features with
/// calls that fail.
pub fn supported_capabilities() -> &'static [Capability] {
    #[cfg(feature = "ocr")]
    {
        &[Capability::PdfInput, Capability::ImageInput, Capability::Ocr]
    }
    #[cfg(not(feature = "ocr"))]
    {
        &[Capability::PdfInput, Capability::ImageInput]
    }
}
