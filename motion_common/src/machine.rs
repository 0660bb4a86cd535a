//! Machine configuration structures.
//!
//! All config types use `serde::Deserialize` for TOML loading. Optional
//! fields use `#[serde(default)]` so older files keep loading.
//!
//! # TOML Example
//!
//! ```toml
//! [printer]
//! max_velocity = 300.0
//! max_accel = 3000.0
//! axis_count = 6
//!
//! [kinematics]
//! axes = "ABC"
//! axis_indices = [3, 4, 5]
//! max_z_velocity = 20.0
//!
//! [stepper.a]
//! position_min = 0.0
//! position_max = 200.0
//! position_endstop = 200.0
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config::{ConfigError, SharedConfig};
use crate::consts::TRIPLET_LEN;

// ─── Top-Level Config ───────────────────────────────────────────────

/// Complete machine configuration for one kinematics instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MachineConfig {
    /// Logging and instance name.
    #[serde(default)]
    pub shared: SharedConfig,
    /// Toolhead-wide motion limits.
    pub printer: PrinterConfig,
    /// Axis set and secondary-axis limits.
    #[serde(default)]
    pub kinematics: KinematicsConfig,
    /// Per-axis rail sections keyed by lowercase axis letter
    /// (`[stepper.a]` describes the rail `stepper_a`).
    #[serde(default)]
    pub stepper: BTreeMap<String, RailConfig>,
}

impl MachineConfig {
    /// Rail section for an axis letter, matched case-insensitively.
    pub fn rail(&self, letter: char) -> Option<&RailConfig> {
        self.stepper.get(&letter.to_ascii_lowercase().to_string())
    }

    /// Validate parameter bounds of every section.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.shared.validate()?;
        self.printer.validate()?;
        for (letter, rail) in &self.stepper {
            rail.validate()
                .map_err(|e| ConfigError::invalid(format!("[{}] {e}", rail_section(letter))))?;
        }
        Ok(())
    }
}

/// Name of the rail (and its config section) for an axis letter.
pub fn rail_section(letter: impl std::fmt::Display) -> String {
    format!("stepper_{}", letter.to_string().to_ascii_lowercase())
}

// ─── Printer ────────────────────────────────────────────────────────

/// Toolhead-wide limits, the defaults for the secondary axis limits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrinterConfig {
    /// Maximum toolhead velocity [mm/s].
    pub max_velocity: f64,
    /// Maximum toolhead acceleration [mm/s²].
    pub max_accel: f64,
    /// Total number of global axes the toolhead carries.
    #[serde(default = "default_axis_count")]
    pub axis_count: usize,
}

fn default_axis_count() -> usize {
    TRIPLET_LEN
}

impl PrinterConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_velocity <= 0.0 {
            return Err(ConfigError::invalid(format!(
                "max_velocity {} must be above 0",
                self.max_velocity
            )));
        }
        if self.max_accel <= 0.0 {
            return Err(ConfigError::invalid(format!(
                "max_accel {} must be above 0",
                self.max_accel
            )));
        }
        if self.axis_count < TRIPLET_LEN {
            return Err(ConfigError::invalid(format!(
                "axis_count {} is below one triplet ({TRIPLET_LEN})",
                self.axis_count
            )));
        }
        Ok(())
    }
}

// ─── Kinematics ─────────────────────────────────────────────────────

/// Axis set handled by one kinematics instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KinematicsConfig {
    /// Axis letters, 1 to 3 characters (`"XYZ"`, `"AB"`, ...).
    #[serde(default = "default_axes")]
    pub axes: String,
    /// Global axis indices, one per letter.
    #[serde(default = "default_axis_indices")]
    pub axis_indices: Vec<usize>,
    /// Secondary-axis velocity cap [mm/s]; defaults to `printer.max_velocity`.
    #[serde(default)]
    pub max_z_velocity: Option<f64>,
    /// Secondary-axis acceleration cap [mm/s²]; defaults to `printer.max_accel`.
    #[serde(default)]
    pub max_z_accel: Option<f64>,
}

fn default_axes() -> String {
    "XYZ".to_string()
}
fn default_axis_indices() -> Vec<usize> {
    vec![0, 1, 2]
}

impl Default for KinematicsConfig {
    fn default() -> Self {
        Self {
            axes: default_axes(),
            axis_indices: default_axis_indices(),
            max_z_velocity: None,
            max_z_accel: None,
        }
    }
}

/// Read an optional float constrained to `(0, maxval]`, defaulting to `maxval`.
pub fn bounded_float(name: &str, value: Option<f64>, maxval: f64) -> Result<f64, ConfigError> {
    let v = value.unwrap_or(maxval);
    if v <= 0.0 {
        return Err(ConfigError::invalid(format!("{name} {v} must be above 0")));
    }
    if v > maxval {
        return Err(ConfigError::invalid(format!(
            "{name} {v} must not exceed {maxval}"
        )));
    }
    Ok(v)
}

// ─── Rails ──────────────────────────────────────────────────────────

/// One axis rail: travel range, endstop placement and its steppers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RailConfig {
    /// Stepper names driven by this rail; defaults to the rail name.
    #[serde(default)]
    pub steppers: Vec<String>,
    /// Minimum valid position [mm].
    #[serde(default)]
    pub position_min: f64,
    /// Maximum valid position [mm].
    pub position_max: f64,
    /// Position of the endstop trigger [mm].
    pub position_endstop: f64,
    /// Whether the endstop triggers while moving towards +.
    /// Inferred from the endstop placement when omitted.
    #[serde(default)]
    pub homing_positive_dir: Option<bool>,
}

impl RailConfig {
    /// Validate range and endstop placement.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.position_min >= self.position_max {
            return Err(ConfigError::invalid(format!(
                "position_min {} must be below position_max {}",
                self.position_min, self.position_max
            )));
        }
        if self.position_endstop < self.position_min || self.position_endstop > self.position_max
        {
            return Err(ConfigError::invalid(format!(
                "position_endstop {} must be within [{}, {}]",
                self.position_endstop, self.position_min, self.position_max
            )));
        }
        self.homing_positive_dir().map(|_| ())
    }

    /// Homing direction, explicit or inferred from an endstop at either end.
    pub fn homing_positive_dir(&self) -> Result<bool, ConfigError> {
        match self.homing_positive_dir {
            Some(dir) => Ok(dir),
            None if self.position_endstop >= self.position_max => Ok(true),
            None if self.position_endstop <= self.position_min => Ok(false),
            None => Err(ConfigError::invalid(
                "unable to infer homing_positive_dir; the endstop is not at either end of the range",
            )),
        }
    }
}
