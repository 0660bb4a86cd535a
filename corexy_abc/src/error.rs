//! Error types for the kinematics.
//!
//! | Error            | When                      | Recovery              |
//! |------------------|---------------------------|-----------------------|
//! | `Config`         | construction              | none, setup aborts    |
//! | `MoveRejected`   | `check_move`              | planner replans       |
//! | `Homing`         | `home`                    | request aborted       |
//! | `UnknownRail`    | `calc_position`           | caller bug            |

use std::fmt;

use motion_common::config::ConfigError;
use thiserror::Error;

/// Top-level error for every kinematics operation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum KinematicsError {
    /// Invalid axis set, rail section or limit at construction.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The move would leave the known travel range.
    #[error(transparent)]
    MoveRejected(#[from] MoveError),

    /// Homing execution failed; the rest of the sequence was abandoned.
    #[error("Homing failed: {0}")]
    Homing(#[from] HomingError),

    /// A rail position was requested for a rail this kinematics does not own.
    #[error("No measured position for rail '{0}'")]
    UnknownRail(String),
}

/// Why a move was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveRejection {
    /// The axis limit still holds the unhomed sentinel.
    NotHomed,
    /// The axis is homed but the end position is outside its range.
    OutOfRange,
}

impl fmt::Display for MoveRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotHomed => f.write_str("Must home axis first"),
            Self::OutOfRange => f.write_str("Move out of range"),
        }
    }
}

/// Rejected move with the offending end position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoveError {
    pub reason: MoveRejection,
    pub end_pos: [f64; 3],
}

impl fmt::Display for MoveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [x, y, z] = self.end_pos;
        write!(f, "{}: {x:.3} {y:.3} {z:.3}", self.reason)
    }
}

impl std::error::Error for MoveError {}

/// Failure reported by the homing execution collaborator.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum HomingError {
    /// The endstop did not trigger within the forced travel.
    #[error("No trigger on {rail} after full movement")]
    NoTrigger { rail: String },

    /// Requested axis is not a configured axis of this triplet.
    #[error("Axis {0} is not homeable by this kinematics")]
    UnknownAxis(usize),
}
