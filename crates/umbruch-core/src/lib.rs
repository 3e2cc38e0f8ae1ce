// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Umbruch — Core types and error definitions shared across all crates.

pub mod capability;
pub mod device;
pub mod engine;
pub mod error;
pub mod human_errors;
pub mod settings;

pub use capability::Capability;
pub use device::DeviceProfile;
pub use engine::{ConversionReport, ReflowEngine};
pub use error::UmbruchError;
pub use settings::{ConversionSettings, Quality};
