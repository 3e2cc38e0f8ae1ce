// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Static device-profile table for target e-reader hardware.

use serde::Serialize;

use crate::settings::Quality;

/// A named bundle of output defaults for a target reading device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DeviceProfile {
    /// Lookup key used by hosts. Matched case-sensitively.
    pub name: &'static str,
    /// Human-readable device name, for listings and diagnostics.
    pub description: &'static str,
    /// Usable screen width in pixels.
    pub width_px: u32,
    /// Usable screen height in pixels.
    pub height_px: u32,
    /// Default output fidelity for this device class.
    pub quality: Quality,
}

/// All known device profiles.
///
/// Dimensions are the usable output area of each device's screen, not the
/// panel's nominal resolution.
pub const PROFILES: &[DeviceProfile] = &[
    DeviceProfile {
        name: "k2",
        description: "Kindle 2-5",
        width_px: 560,
        height_px: 735,
        quality: Quality::Medium,
    },
    DeviceProfile {
        name: "kindle",
        description: "Kindle 2-5",
        width_px: 560,
        height_px: 735,
        quality: Quality::Medium,
    },
    DeviceProfile {
        name: "dx",
        description: "Kindle DX",
        width_px: 800,
        height_px: 1180,
        quality: Quality::Medium,
    },
    DeviceProfile {
        name: "kpw",
        description: "Kindle Paperwhite",
        width_px: 658,
        height_px: 889,
        quality: Quality::Medium,
    },
    DeviceProfile {
        name: "kp3",
        description: "Kindle Paperwhite 3",
        width_px: 936,
        height_px: 1240,
        quality: Quality::High,
    },
    DeviceProfile {
        name: "kv",
        description: "Kindle Voyage",
        width_px: 1016,
        height_px: 1364,
        quality: Quality::High,
    },
    DeviceProfile {
        name: "ko2",
        description: "Kobo Touch",
        width_px: 600,
        height_px: 730,
        quality: Quality::Medium,
    },
];

/// Look up a device profile by name. Case-sensitive exact match; a miss
/// returns `None`, never a fuzzy fallback.
pub fn resolve(name: &str) -> Option<&'static DeviceProfile> {
    PROFILES.iter().find(|profile| profile.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_profiles_resolve() {
        for key in ["k2", "kindle", "dx", "kpw", "kp3", "kv", "ko2"] {
            let profile = resolve(key).unwrap_or_else(|| panic!("missing profile {key}"));
            assert!(profile.width_px > 0);
            assert!(profile.height_px > 0);
        }
    }

    #[test]
    fn lookup_is_case_sensitive() {
        assert!(resolve("kindle").is_some());
        assert!(resolve("Kindle").is_none());
        assert!(resolve("KINDLE").is_none());
    }

    #[test]
    fn unknown_name_misses() {
        assert!(resolve("remarkable").is_none());
        assert!(resolve("").is_none());
    }

    #[test]
    fn profile_names_are_unique() {
        for (i, a) in PROFILES.iter().enumerate() {
            for b in &PROFILES[i + 1..] {
                assert_ne!(a.name, b.name);
            }
        }
    }
}
