//! Homing move generation.
//!
//! The kinematics does not drive the motors during homing. For each axis it
//! computes two targets and hands them to the [`HomingState`] supplied by
//! the planner, which performs the moves and watches the endstops:
//!
//! | Target     | Meaning                                                   |
//! |------------|-----------------------------------------------------------|
//! | `forcepos` | Staging point 1.5× the endstop-to-far-limit distance away |
//! | `homepos`  | Endstop trigger coordinate                                |
//!
//! ## Lifecycle
//!
//! 1. Every requested axis is checked against the configured slots.
//! 2. Axes are homed strictly one at a time, in the requested order.
//! 3. The first failure aborts the rest of the request and propagates.
//!    Nothing is retried here.

use motion_common::consts::HOMING_OVERSHOOT;
use tracing::{debug, info};

use crate::axis::{AxisSet, Triplet};
use crate::error::HomingError;
use crate::rail::Rail;

/// Targets for homing one axis, indexed by global axis index.
/// Every entry other than `axis` is `None` (no movement).
#[derive(Debug, Clone, PartialEq)]
pub struct HomingMove {
    pub axis: usize,
    pub forcepos: Vec<Option<f64>>,
    pub homepos: Vec<Option<f64>>,
}

/// Homing request handle provided by the planner.
pub trait HomingState {
    /// Global axis indices to home, in order.
    fn axes(&self) -> Vec<usize>;

    /// Execute the homing moves for `rails`; blocks until the endstop
    /// triggers or the attempt fails.
    fn home_rails(&mut self, rails: &[&Rail], homing: &HomingMove) -> Result<(), HomingError>;
}

/// Compute the homing targets of one rail.
pub fn homing_move(axis: usize, rail: &Rail, axis_count: usize) -> HomingMove {
    let (position_min, position_max) = rail.range();
    let hi = rail.homing_info();

    let mut homepos = vec![None; axis_count];
    homepos[axis] = Some(hi.position_endstop);

    let force = if hi.positive_dir {
        hi.position_endstop - HOMING_OVERSHOOT * (hi.position_endstop - position_min)
    } else {
        hi.position_endstop + HOMING_OVERSHOOT * (position_max - hi.position_endstop)
    };
    let mut forcepos = homepos.clone();
    forcepos[axis] = Some(force);

    HomingMove {
        axis,
        forcepos,
        homepos,
    }
}

/// Drives the per-axis homing protocol for one triplet.
#[derive(Debug, Clone, Copy)]
pub struct HomingSequencer {
    /// Length of the position vectors handed to the planner.
    axis_count: usize,
}

impl HomingSequencer {
    pub fn new(axis_count: usize) -> Self {
        Self { axis_count }
    }

    /// Home every axis `state` asks for.
    pub fn run(
        &self,
        axis_set: &AxisSet,
        rails: &Triplet<Option<Rail>>,
        state: &mut dyn HomingState,
    ) -> Result<(), HomingError> {
        let axes = state.axes();
        let mut plan = Vec::with_capacity(axes.len());
        for &axis in &axes {
            let rail = axis_set
                .slot_of(axis)
                .and_then(|slot| rails[slot].as_ref())
                .ok_or(HomingError::UnknownAxis(axis))?;
            plan.push((axis, rail));
        }

        for (axis, rail) in plan {
            let homing = homing_move(axis, rail, self.axis_count);
            debug!(
                "Homing {} (axis {axis}): force {:?} -> home {:?}",
                rail.name(),
                homing.forcepos[axis],
                homing.homepos[axis]
            );
            state.home_rails(&[rail], &homing)?;
            info!("Homed {} (axis {axis})", rail.name());
        }
        Ok(())
    }
}
