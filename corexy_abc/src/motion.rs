//! Move validation and secondary-axis speed de-rating.
//!
//! `check_move` runs before a move reaches the time-critical queue:
//!
//! 1. An end position outside the X/Y-equivalent limits triggers endstop
//!    diagnosis; only an axis that actually moves can fail it.
//! 2. A move without slot-2 travel passes unchanged.
//! 3. A move with slot-2 travel is diagnosed on all three slots, then its
//!    velocity and acceleration are capped at the slot-2 limits scaled by
//!    `move_d / |dz|`.

use tracing::debug;

use crate::axis::Slot;
use crate::error::{MoveError, MoveRejection};
use crate::limits::LimitSet;

/// Planner move, in triplet-local coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct Move {
    pub start_pos: [f64; 3],
    pub end_pos: [f64; 3],
    /// Per-slot displacement.
    pub axes_d: [f64; 3],
    /// Total move distance.
    pub move_d: f64,
    /// Acceleration cap [mm/s²].
    pub accel: f64,
    /// Squared cruise velocity cap [mm²/s²].
    pub max_cruise_v2: f64,
    /// Minimum duration implied by the velocity cap [s].
    pub min_move_t: f64,
    pub delta_v2: f64,
}

impl Move {
    pub fn new(start_pos: [f64; 3], end_pos: [f64; 3], speed: f64, accel: f64) -> Self {
        let axes_d = [
            end_pos[0] - start_pos[0],
            end_pos[1] - start_pos[1],
            end_pos[2] - start_pos[2],
        ];
        let move_d = axes_d.iter().map(|d| d * d).sum::<f64>().sqrt();
        let min_move_t = if speed > 0.0 { move_d / speed } else { f64::INFINITY };
        Self {
            start_pos,
            end_pos,
            axes_d,
            move_d,
            accel,
            max_cruise_v2: speed * speed,
            min_move_t,
            delta_v2: 2.0 * move_d * accel,
        }
    }

    /// Lower the velocity/acceleration caps; never raises them.
    pub fn limit_speed(&mut self, speed: f64, accel: f64) {
        let speed2 = speed * speed;
        if speed2 < self.max_cruise_v2 {
            self.max_cruise_v2 = speed2;
            self.min_move_t = if speed > 0.0 {
                self.move_d / speed
            } else {
                f64::INFINITY
            };
        }
        self.accel = self.accel.min(accel);
        self.delta_v2 = 2.0 * self.move_d * self.accel;
    }

    /// Current velocity cap [mm/s].
    pub fn max_cruise_v(&self) -> f64 {
        self.max_cruise_v2.sqrt()
    }
}

/// Validates moves against a limit snapshot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionValidator {
    max_z_velocity: f64,
    max_z_accel: f64,
}

impl MotionValidator {
    pub fn new(max_z_velocity: f64, max_z_accel: f64) -> Self {
        Self {
            max_z_velocity,
            max_z_accel,
        }
    }

    pub fn max_z_velocity(&self) -> f64 {
        self.max_z_velocity
    }

    pub fn max_z_accel(&self) -> f64 {
        self.max_z_accel
    }

    pub fn check_move(&self, limits: &LimitSet, mv: &mut Move) -> Result<(), MoveError> {
        let [xpos, ypos, _] = mv.end_pos;
        if !limits.get(Slot::X).contains(xpos) || !limits.get(Slot::Y).contains(ypos) {
            check_endstops(limits, mv)?;
        }
        if mv.axes_d[2] == 0.0 {
            return Ok(());
        }

        check_endstops(limits, mv)?;
        let z_ratio = mv.move_d / mv.axes_d[2].abs();
        mv.limit_speed(self.max_z_velocity * z_ratio, self.max_z_accel * z_ratio);
        Ok(())
    }
}

/// Fail if any moving slot ends outside its limit.
fn check_endstops(limits: &LimitSet, mv: &Move) -> Result<(), MoveError> {
    for slot in Slot::ALL {
        let limit = limits.get(slot);
        let i = slot.index();
        if mv.axes_d[i] != 0.0 && !limit.contains(mv.end_pos[i]) {
            let reason = if limit.is_homed() {
                MoveRejection::OutOfRange
            } else {
                MoveRejection::NotHomed
            };
            debug!("Slot {slot:?} rejected: {reason}");
            return Err(MoveError {
                reason,
                end_pos: mv.end_pos,
            });
        }
    }
    Ok(())
}
