// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Stable integer status codes for scripting hosts.
//
// Embedding hosts that cannot consume Rust enums get a flat i32 rendition
// of every result: 0 for success, 1 for the already-initialized no-op, and
// a distinct negative per failure class. The values are part of the host
// contract and must not be renumbered.

use umbruch_core::error::UmbruchError;

use crate::session::InitOutcome;

/// Operation succeeded.
pub const STATUS_OK: i32 = 0;
/// `init` was called on an initialized session; nothing changed.
pub const STATUS_ALREADY_INITIALIZED: i32 = 1;
/// The requested capability is not compiled in, or the interface slot is
/// reserved but unimplemented.
pub const STATUS_UNAVAILABLE: i32 = -1;
/// Operation called before `init` (or after `cleanup`).
pub const STATUS_NOT_INITIALIZED: i32 = -2;
/// A caller-supplied value or argument is outside the contract.
pub const STATUS_INVALID_VALUE: i32 = -3;
/// Device-profile lookup miss.
pub const STATUS_UNKNOWN_DEVICE: i32 = -4;
/// The engine failed to produce usable output.
pub const STATUS_CONVERSION_FAILED: i32 = -5;
/// The document could not be opened or parsed.
pub const STATUS_UNREADABLE: i32 = -6;
/// Filesystem or internal failure.
pub const STATUS_INTERNAL: i32 = -7;

/// Status code for an error.
pub fn error_status(err: &UmbruchError) -> i32 {
    match err {
        UmbruchError::NotInitialized => STATUS_NOT_INITIALIZED,
        UmbruchError::InvalidValue { .. } | UmbruchError::InvalidArgument(_) => {
            STATUS_INVALID_VALUE
        }
        UmbruchError::UnknownDevice(_) => STATUS_UNKNOWN_DEVICE,
        UmbruchError::OcrUnavailable | UmbruchError::NotImplemented(_) => STATUS_UNAVAILABLE,
        UmbruchError::ConversionFailed(_) => STATUS_CONVERSION_FAILED,
        UmbruchError::DocumentUnreadable(_) => STATUS_UNREADABLE,
        // Engine-internal variants reach hosts only when an engine is driven
        // directly, but they still need stable codes.
        UmbruchError::PdfError(_)
        | UmbruchError::ImageError(_)
        | UmbruchError::PageRange(_) => STATUS_UNREADABLE,
        UmbruchError::OcrError(_) => STATUS_CONVERSION_FAILED,
        UmbruchError::Io(_) | UmbruchError::Serialization(_) => STATUS_INTERNAL,
    }
}

/// Flatten any result to a status code.
pub fn status_of<T>(result: &Result<T, UmbruchError>) -> i32 {
    match result {
        Ok(_) => STATUS_OK,
        Err(err) => error_status(err),
    }
}

/// Flatten an `init` result, distinguishing the already-initialized no-op
/// from a first initialization.
pub fn init_status(result: &Result<InitOutcome, UmbruchError>) -> i32 {
    match result {
        Ok(InitOutcome::Initialized) => STATUS_OK,
        Ok(InitOutcome::AlreadyInitialized) => STATUS_ALREADY_INITIALIZED,
        Err(err) => error_status(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::Session;

    #[test]
    fn init_statuses() {
        let mut session = Session::new();
        assert_eq!(init_status(&session.init()), STATUS_OK);
        assert_eq!(init_status(&session.init()), STATUS_ALREADY_INITIALIZED);
    }

    #[test]
    fn failure_codes_are_negative_and_distinct() {
        let errors = [
            UmbruchError::NotInitialized,
            UmbruchError::InvalidValue {
                field: "width",
                reason: "0".into(),
            },
            UmbruchError::UnknownDevice("x".into()),
            UmbruchError::OcrUnavailable,
            UmbruchError::ConversionFailed("x".into()),
            UmbruchError::DocumentUnreadable("x".into()),
            UmbruchError::Io(std::io::Error::other("x")),
        ];

        let codes: Vec<i32> = errors.iter().map(error_status).collect();
        assert!(codes.iter().all(|&code| code < 0));
        for (i, a) in codes.iter().enumerate() {
            for b in &codes[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn setter_results_flatten_to_the_documented_codes() {
        let mut session = Session::new();
        assert_eq!(
            status_of(&session.set_width(600)),
            STATUS_NOT_INITIALIZED
        );

        session.init().unwrap();
        assert_eq!(status_of(&session.set_width(600)), STATUS_OK);
        assert_eq!(status_of(&session.set_width(-1)), STATUS_INVALID_VALUE);
        assert_eq!(
            status_of(&session.set_device("unknown")),
            STATUS_UNKNOWN_DEVICE
        );
        assert_eq!(
            status_of(&session.set_margins(0.0, 0.0, 0.0, 0.0)),
            STATUS_UNAVAILABLE
        );
    }

    #[cfg(not(feature = "ocr"))]
    #[test]
    fn ocr_enable_maps_to_unavailable() {
        let mut session = Session::new();
        session.init().unwrap();
        assert_eq!(status_of(&session.set_ocr(true)), STATUS_UNAVAILABLE);
        assert_eq!(status_of(&session.set_ocr(false)), STATUS_OK);
    }
}
