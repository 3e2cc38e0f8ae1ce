// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// The conversion session: lifecycle, configuration staging, and read-only
// inspection.
//
// A session owns at most one live engine instance. `init` allocates it and
// resets the staged settings to engine defaults; `cleanup` releases it.
// Every other operation first checks that the session is initialized and
// either fully validates-and-applies or leaves all state untouched.

use std::path::Path;

use tracing::{debug, info};
use umbruch_core::device;
use umbruch_core::engine::ReflowEngine;
use umbruch_core::error::{Result, UmbruchError};
use umbruch_core::settings::ConversionSettings;
use umbruch_document::ReflowPipeline;

/// What an `init` call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitOutcome {
    /// The engine was allocated and settings were reset to defaults.
    Initialized,
    /// The session was already initialized; nothing changed. A success-like
    /// signal, not an error.
    AlreadyInitialized,
}

/// A conversion session, constructed once by the host and driven by a
/// single logical caller.
pub struct Session {
    /// The engine handle. `None` means uninitialized.
    engine: Option<Box<dyn ReflowEngine>>,
    /// Staged conversion parameters.
    settings: ConversionSettings,
}

impl Session {
    // -- Lifecycle ------------------------------------------------------------

    /// Create an uninitialized session. No engine resources are allocated
    /// until [`init`](Self::init).
    pub fn new() -> Self {
        Self {
            engine: None,
            settings: ConversionSettings::default(),
        }
    }

    /// Initialize the session with the default reflow engine.
    ///
    /// Idempotent-safe: calling `init` on an initialized session returns
    /// [`InitOutcome::AlreadyInitialized`] without touching the existing
    /// engine or settings.
    pub fn init(&mut self) -> Result<InitOutcome> {
        self.init_with_engine(Box::new(ReflowPipeline::new()))
    }

    /// Initialize the session with a caller-supplied engine.
    pub fn init_with_engine(&mut self, engine: Box<dyn ReflowEngine>) -> Result<InitOutcome> {
        if self.engine.is_some() {
            debug!("init on an initialized session is a no-op");
            return Ok(InitOutcome::AlreadyInitialized);
        }

        self.settings = ConversionSettings::default();
        self.engine = Some(engine);
        info!("session initialized");
        Ok(InitOutcome::Initialized)
    }

    /// Release the engine and return to the uninitialized state.
    ///
    /// Safe to call from any state, any number of times; never errors and
    /// never double-frees. After cleanup every other operation fails with
    /// `NotInitialized` until `init` runs again.
    pub fn cleanup(&mut self) {
        if self.engine.take().is_some() {
            info!("session cleaned up");
        }
    }

    /// Whether the session currently owns a live engine.
    pub fn is_initialized(&self) -> bool {
        self.engine.is_some()
    }

    /// The currently staged settings.
    pub fn settings(&self) -> &ConversionSettings {
        &self.settings
    }

    fn require_initialized(&self) -> Result<()> {
        if self.engine.is_some() {
            Ok(())
        } else {
            Err(UmbruchError::NotInitialized)
        }
    }

    // -- Configuration staging ------------------------------------------------

    /// Apply a device profile, overwriting width, height, and quality with
    /// the profile's defaults. Unknown names leave settings unchanged.
    pub fn set_device(&mut self, name: &str) -> Result<()> {
        self.require_initialized()?;
        let profile =
            device::resolve(name).ok_or_else(|| UmbruchError::UnknownDevice(name.to_string()))?;
        self.settings.apply_device(profile);
        debug!(device = profile.name, "device profile applied");
        Ok(())
    }

    /// Stage the output width in pixels.
    pub fn set_width(&mut self, px: i32) -> Result<()> {
        self.require_initialized()?;
        self.settings.set_width_px(px)
    }

    /// Stage the output height in pixels.
    pub fn set_height(&mut self, px: i32) -> Result<()> {
        self.require_initialized()?;
        self.settings.set_height_px(px)
    }

    /// Stage the quality level (1–3).
    pub fn set_quality(&mut self, level: i32) -> Result<()> {
        self.require_initialized()?;
        self.settings.set_quality_level(level)
    }

    /// Stage a page-range selector verbatim. Selector syntax is checked at
    /// conversion time, not here.
    pub fn set_page_range(&mut self, spec: &str) -> Result<()> {
        self.require_initialized()?;
        self.settings.set_page_range(spec)
    }

    /// Stage whether OCR runs during conversion.
    #[cfg(feature = "ocr")]
    pub fn set_ocr(&mut self, enable: bool) -> Result<()> {
        self.require_initialized()?;
        self.settings.ocr_enabled = enable;
        Ok(())
    }

    /// Stage whether OCR runs during conversion. OCR is not compiled into
    /// this build: enabling fails with `OcrUnavailable`; disabling is an
    /// accepted no-op.
    #[cfg(not(feature = "ocr"))]
    pub fn set_ocr(&mut self, enable: bool) -> Result<()> {
        self.require_initialized()?;
        if enable {
            return Err(UmbruchError::OcrUnavailable);
        }
        self.settings.ocr_enabled = false;
        Ok(())
    }

    /// Reserved interface slot: page margins are not wired into the engine
    /// in this version.
    pub fn set_margins(
        &mut self,
        _left: f64,
        _top: f64,
        _right: f64,
        _bottom: f64,
    ) -> Result<()> {
        self.require_initialized()?;
        Err(UmbruchError::NotImplemented("page margins"))
    }

    // -- Inspection -----------------------------------------------------------

    /// Open `path` read-only and report its page count. Does not mutate the
    /// staged settings.
    pub fn page_count(&self, path: &str) -> Result<usize> {
        let engine = self.engine.as_ref().ok_or(UmbruchError::NotInitialized)?;
        if path.trim().is_empty() {
            return Err(UmbruchError::InvalidArgument(
                "document path is empty".to_string(),
            ));
        }
        engine.page_count(Path::new(path)).map_err(|err| match err {
            unreadable @ UmbruchError::DocumentUnreadable(_) => unreadable,
            other => UmbruchError::DocumentUnreadable(other.to_string()),
        })
    }

    // -- Internal -------------------------------------------------------------

    /// Split borrow used by the dispatcher: the engine mutably, the settings
    /// shared.
    pub(crate) fn engine_and_settings(
        &mut self,
    ) -> Result<(&mut Box<dyn ReflowEngine>, &ConversionSettings)> {
        match self.engine.as_mut() {
            Some(engine) => Ok((engine, &self.settings)),
            None => Err(UmbruchError::NotInitialized),
        }
    }

    pub(crate) fn settings_mut(&mut self) -> &mut ConversionSettings {
        &mut self.settings
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use umbruch_core::engine::ConversionReport;

    /// Engine double that counts live instances, for leak checks.
    struct CountedEngine {
        live: Arc<AtomicUsize>,
    }

    impl CountedEngine {
        fn spawn(live: &Arc<AtomicUsize>) -> Box<dyn ReflowEngine> {
            live.fetch_add(1, Ordering::SeqCst);
            Box::new(Self { live: live.clone() })
        }
    }

    impl Drop for CountedEngine {
        fn drop(&mut self) {
            self.live.fetch_sub(1, Ordering::SeqCst);
        }
    }

    impl ReflowEngine for CountedEngine {
        fn convert_file(
            &mut self,
            settings: &ConversionSettings,
            input: &Path,
        ) -> umbruch_core::error::Result<ConversionReport> {
            Ok(ConversionReport {
                input: input.display().to_string(),
                output: settings.output_path.clone().unwrap_or_default(),
                pages_written: 1,
                ocr_sidecar: None,
                completed_at: chrono::Utc::now(),
            })
        }

        fn page_count(&self, _path: &Path) -> umbruch_core::error::Result<usize> {
            Ok(7)
        }
    }

    fn counted_session() -> (Session, Arc<AtomicUsize>) {
        let live = Arc::new(AtomicUsize::new(0));
        let mut session = Session::new();
        session
            .init_with_engine(CountedEngine::spawn(&live))
            .unwrap();
        (session, live)
    }

    #[test]
    fn init_twice_is_a_noop_and_keeps_one_engine() {
        let (mut session, live) = counted_session();
        assert_eq!(live.load(Ordering::SeqCst), 1);

        let outcome = session
            .init_with_engine(CountedEngine::spawn(&live))
            .unwrap();
        assert_eq!(outcome, InitOutcome::AlreadyInitialized);
        // The rejected second engine is dropped immediately; the original
        // stays live.
        assert_eq!(live.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn repeated_init_cleanup_cycles_do_not_leak() {
        let live = Arc::new(AtomicUsize::new(0));
        let mut session = Session::new();

        for _ in 0..1000 {
            session
                .init_with_engine(CountedEngine::spawn(&live))
                .unwrap();
            assert_eq!(live.load(Ordering::SeqCst), 1);
            session.cleanup();
            assert_eq!(live.load(Ordering::SeqCst), 0);
        }
    }

    #[test]
    fn cleanup_without_init_is_a_noop() {
        let mut session = Session::new();
        session.cleanup();
        session.cleanup();
        assert!(!session.is_initialized());
    }

    #[test]
    fn operations_fail_before_init_and_after_cleanup() {
        let mut session = Session::new();
        assert!(matches!(
            session.set_width(600),
            Err(UmbruchError::NotInitialized)
        ));
        assert!(matches!(
            session.page_count("doc.pdf"),
            Err(UmbruchError::NotInitialized)
        ));
        assert_eq!(session.settings(), &ConversionSettings::default());

        session.init().unwrap();
        session.set_width(600).unwrap();

        session.cleanup();
        assert!(matches!(
            session.set_width(600),
            Err(UmbruchError::NotInitialized)
        ));
    }

    #[test]
    fn failed_setters_do_not_alter_settings() {
        let (mut session, _live) = counted_session();
        let before = session.settings().clone();

        assert!(session.set_width(0).is_err());
        assert!(session.set_quality(9).is_err());
        assert!(session.set_device("no-such-device").is_err());
        assert!(session.set_margins(0.0, 0.0, 0.0, 0.0).is_err());

        assert_eq!(session.settings(), &before);
    }

    #[test]
    fn init_resets_settings_to_defaults() {
        let (mut session, live) = counted_session();
        session.set_width(999).unwrap();

        session.cleanup();
        session
            .init_with_engine(CountedEngine::spawn(&live))
            .unwrap();
        assert_eq!(session.settings(), &ConversionSettings::default());
    }

    #[test]
    fn quality_bounds_and_monotonic_scores() {
        let (mut session, _live) = counted_session();

        assert!(matches!(
            session.set_quality(0),
            Err(UmbruchError::InvalidValue { field: "quality", .. })
        ));
        assert!(session.set_quality(4).is_err());

        let mut scores = Vec::new();
        for level in 1..=3 {
            session.set_quality(level).unwrap();
            scores.push(session.settings().quality.jpeg_quality());
        }
        assert!(scores.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn explicit_width_overrides_profile_but_height_keeps_default() {
        let (mut session, _live) = counted_session();
        let kv = device::resolve("kv").unwrap();

        session.set_device("kv").unwrap();
        session.set_width(999).unwrap();

        assert_eq!(session.settings().width_px, 999);
        assert_eq!(session.settings().height_px, kv.height_px);
    }

    #[test]
    fn last_setter_wins_across_profile_and_dimensions() {
        let (mut session, _live) = counted_session();
        let kindle = device::resolve("kindle").unwrap();

        session.set_width(400).unwrap();
        session.set_device("kindle").unwrap();
        assert_eq!(session.settings().width_px, kindle.width_px);

        session.set_width(400).unwrap();
        assert_eq!(session.settings().width_px, 400);
        assert_eq!(session.settings().device.as_deref(), Some("kindle"));
    }

    #[test]
    fn unknown_device_error_carries_the_name() {
        let (mut session, _live) = counted_session();
        match session.set_device("royal-typewriter") {
            Err(UmbruchError::UnknownDevice(name)) => assert_eq!(name, "royal-typewriter"),
            other => panic!("expected UnknownDevice, got {other:?}"),
        }
    }

    #[test]
    fn margins_always_fail() {
        let (mut session, _live) = counted_session();
        assert!(matches!(
            session.set_margins(0.0, 0.0, 0.0, 0.0),
            Err(UmbruchError::NotImplemented(_))
        ));
        assert!(matches!(
            session.set_margins(1.5, 1.5, 1.5, 1.5),
            Err(UmbruchError::NotImplemented(_))
        ));
    }

    #[test]
    fn page_range_is_staged_verbatim() {
        let (mut session, _live) = counted_session();
        session.set_page_range("1-10,15-20").unwrap();
        assert_eq!(
            session.settings().page_range.as_deref(),
            Some("1-10,15-20")
        );
    }

    #[test]
    fn page_count_rejects_empty_path() {
        let (session, _live) = counted_session();
        assert!(matches!(
            session.page_count("  "),
            Err(UmbruchError::InvalidArgument(_))
        ));
    }

    #[test]
    fn page_count_delegates_to_the_engine() {
        let (session, _live) = counted_session();
        assert_eq!(session.page_count("anything.pdf").unwrap(), 7);
    }

    #[cfg(feature = "ocr")]
    #[test]
    fn ocr_stages_both_ways_when_compiled_in() {
        let (mut session, _live) = counted_session();
        session.set_ocr(true).unwrap();
        assert!(session.settings().ocr_enabled);
        session.set_ocr(false).unwrap();
        assert!(!session.settings().ocr_enabled);
    }

    #[cfg(not(feature = "ocr"))]
    #[test]
    fn enabling_ocr_fails_when_not_compiled_in() {
        let (mut session, _live) = counted_session();
        let before = session.settings().clone();

        assert!(matches!(
            session.set_ocr(true),
            Err(UmbruchError::OcrUnavailable)
        ));
        assert_eq!(session.settings(), &before);
    }

    #[cfg(not(feature = "ocr"))]
    #[test]
    fn disabling_ocr_is_a_noop_success_when_not_compiled_in() {
        let (mut session, _live) = counted_session();
        session.set_ocr(false).unwrap();
        assert!(!session.settings().ocr_enabled);
    }
}
