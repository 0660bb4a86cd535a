//! Workspace-wide constants for axis naming and kinematic limits.
//!
//! Single source of truth for the axis alphabet and the triplet geometry.

use static_assertions::const_assert_eq;

/// Number of slots in one axis triplet (an XYZ-like group).
pub const TRIPLET_LEN: usize = 3;

/// Maximum number of triplets a machine may declare (XYZ, ABC, UVW).
pub const MAX_TRIPLETS: usize = 3;

/// Maximum number of global axis indices.
pub const MAX_AXES: usize = TRIPLET_LEN * MAX_TRIPLETS;

/// Canonical letter per global axis index, three triplets in order.
pub const AXIS_ALPHABET: &str = "XYZABCUVW";

const_assert_eq!(AXIS_ALPHABET.len(), MAX_AXES);

/// Lower bound of the "unhomed" limit sentinel (`low > high`).
pub const UNHOMED_LOW: f64 = 1.0;

/// Upper bound of the "unhomed" limit sentinel.
pub const UNHOMED_HIGH: f64 = -1.0;

/// Pre-travel multiplier applied to the endstop-to-far-limit distance
/// when staging a homing move.
pub const HOMING_OVERSHOOT: f64 = 1.5;

/// Default machine configuration path.
pub const DEFAULT_CONFIG_PATH: &str = "/etc/corexy/machine.toml";

/// Canonical letter for a global axis index, `None` past the alphabet.
#[inline]
pub fn canonical_letter(index: usize) -> Option<char> {
    AXIS_ALPHABET.chars().nth(index)
}
