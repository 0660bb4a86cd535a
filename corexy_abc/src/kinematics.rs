//! CoreXY kinematics for one axis triplet.
//!
//! [`CoreXYKinematics`] owns the rails and limits of a triplet (`XYZ`, `ABC`
//! or `UVW`) and answers the planner's questions about it. Slots 0 and 1 form
//! the belt-coupled pair; slot 2 is an independent axis or a dummy.
//!
//! # Setup
//!
//! ```text
//! AxisSet::resolve ─► Rail::from_config (per slot) ─► couple_endstops(0, 1)
//!        │                                                 │
//!        ▼                                                 ▼
//!  toolhead checks                      setup_solver / trapq / step generators
//!                                                          │
//!                                                          ▼
//!                                      MotorOff handler ─► LimitTracker::reset
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use motion_common::config::ConfigError;
use motion_common::consts::TRIPLET_LEN;
use motion_common::machine::{bounded_float, rail_section, MachineConfig};
use serde::Serialize;
use tracing::{debug, info};

use crate::axis::{AxisSet, Slot, Triplet};
use crate::error::{HomingError, KinematicsError};
use crate::homing::{HomingSequencer, HomingState};
use crate::limits::{Limit, LimitTracker};
use crate::motion::{MotionValidator, Move};
use crate::rail::{couple_endstops, Rail, SolverBinding, StepperRef};
use crate::toolhead::{EventBus, MachineEvent, Toolhead, TrapQueue};

/// Status snapshot published to the host.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KinematicsStatus {
    /// Homed slots as `x`/`y`/`z`, in slot order, whatever the configured
    /// letters (`"xy"` for a homed A/B pair).
    pub homed_axes: String,
    pub axis_minimum: [f64; 3],
    pub axis_maximum: [f64; 3],
}

#[derive(Debug)]
pub struct CoreXYKinematics {
    axis_set: AxisSet,
    rails: Triplet<Option<Rail>>,
    trapq: TrapQueue,
    limits: LimitTracker,
    validator: MotionValidator,
    sequencer: HomingSequencer,
    axes_min: [f64; 3],
    axes_max: [f64; 3],
    /// Last commanded triplet-local position.
    position: [f64; 3],
}

impl CoreXYKinematics {
    /// Build the kinematics for `axis_letters`/`axis_indices`.
    ///
    /// Registers every stepper with `toolhead` and the motor-off handler with
    /// `events`. When `trapq` is `None` the toolhead supplies the queue for
    /// the configured letters.
    pub fn new(
        toolhead: &mut dyn Toolhead,
        events: &mut dyn EventBus,
        config: &MachineConfig,
        trapq: Option<TrapQueue>,
        axis_indices: &[usize],
        axis_letters: &str,
    ) -> Result<Self, KinematicsError> {
        let axis_set = AxisSet::resolve(axis_letters, axis_indices)?;

        let needed = TRIPLET_LEN * (axis_set.triplet_number() + 1);
        if toolhead.axis_count() < needed {
            return Err(ConfigError::invalid(format!(
                "toolhead carries {} axes, triplet {:?} needs {needed}",
                toolhead.axis_count(),
                axis_set.triplet()
            ))
            .into());
        }

        let trapq = trapq.unwrap_or_else(|| toolhead.trapq(axis_set.letters()));

        let mut rails: Triplet<Option<Rail>> = Triplet::default();
        for (slot, axis) in axis_set.slots().iter_slots() {
            let Some(axis) = axis else { continue };
            let section = config.rail(axis.letter).ok_or_else(|| {
                ConfigError::invalid(format!(
                    "missing rail section [{}] for axis {}",
                    rail_section(axis.letter),
                    axis.letter
                ))
            })?;
            rails[slot] = Some(Rail::from_config(axis.letter, section)?);
        }

        match &mut rails.0 {
            [Some(a), Some(b), _] => couple_endstops(a, b),
            _ => {
                return Err(ConfigError::invalid(format!(
                    "axes '{}' leave the coupled pair of triplet {:?} incomplete",
                    axis_set.letters(),
                    axis_set.triplet()
                ))
                .into());
            }
        }

        for slot in Slot::ALL {
            if let Some(rail) = rails[slot].as_mut() {
                rail.setup_solver(SolverBinding::for_slot(slot));
            }
        }

        for stepper in rails.iter().flatten().flat_map(|r| r.steppers()) {
            stepper.set_trapq(trapq.clone());
            toolhead.register_step_generator(Arc::clone(stepper));
        }

        let (max_velocity, max_accel) = toolhead.max_velocity();
        let max_z_velocity = bounded_float(
            "max_z_velocity",
            config.kinematics.max_z_velocity,
            max_velocity,
        )?;
        let max_z_accel = bounded_float("max_z_accel", config.kinematics.max_z_accel, max_accel)?;

        let limits = LimitTracker::new();
        events.register_event_handler(MachineEvent::MotorOff, limits.motor_off_handler());

        let mut axes_min = [0.0; 3];
        let mut axes_max = [0.0; 3];
        for (slot, rail) in rails.iter_slots() {
            if let Some(rail) = rail {
                (axes_min[slot.index()], axes_max[slot.index()]) = rail.range();
            }
        }

        info!(
            "CoreXY kinematics '{}' on {:?}: trapq {trapq}, max_z_velocity {max_z_velocity}, max_z_accel {max_z_accel}",
            axis_set.letters(),
            axis_set.triplet()
        );

        Ok(Self {
            sequencer: HomingSequencer::new(toolhead.axis_count()),
            validator: MotionValidator::new(max_z_velocity, max_z_accel),
            axis_set,
            rails,
            trapq,
            limits,
            axes_min,
            axes_max,
            position: [0.0; 3],
        })
    }

    pub fn axis_set(&self) -> &AxisSet {
        &self.axis_set
    }

    pub fn rails(&self) -> &Triplet<Option<Rail>> {
        &self.rails
    }

    pub fn limits(&self) -> &LimitTracker {
        &self.limits
    }

    pub fn trapq(&self) -> &TrapQueue {
        &self.trapq
    }

    pub fn validator(&self) -> &MotionValidator {
        &self.validator
    }

    /// Every physical stepper across the rails, in slot order.
    pub fn steppers(&self) -> Vec<StepperRef> {
        self.rails
            .iter()
            .flatten()
            .flat_map(|r| r.steppers().iter().cloned())
            .collect()
    }

    /// Machine coordinate from measured rail positions keyed by rail name.
    pub fn calc_position(
        &self,
        rail_positions: &HashMap<String, f64>,
    ) -> Result<[f64; 3], KinematicsError> {
        let mut pos = self.position;
        for (slot, rail) in self.rails.iter_slots() {
            if let Some(rail) = rail {
                pos[slot.index()] = *rail_positions
                    .get(rail.name())
                    .ok_or_else(|| KinematicsError::UnknownRail(rail.name().to_string()))?;
            }
        }
        Ok(crate::transform::forward(pos))
    }

    /// Push `new_pos` to every rail and mark the `homing_axes` (global
    /// indices) homed over their rail's full range.
    pub fn set_position(
        &mut self,
        new_pos: [f64; 3],
        homing_axes: &[usize],
    ) -> Result<(), KinematicsError> {
        let slots = homing_axes
            .iter()
            .map(|&axis| self.configured_slot(axis))
            .collect::<Result<Vec<_>, _>>()?;

        for rail in self.rails.iter().flatten() {
            rail.set_position(new_pos);
        }
        self.position = new_pos;

        for slot in slots {
            if let Some(rail) = &self.rails[slot] {
                self.limits.set_limit(slot, Limit::from(rail.range()));
            }
        }
        Ok(())
    }

    /// Invalidate the slot-2 limit, e.g. after a safe-home lift.
    pub fn note_z_not_homed(&self) {
        self.limits.mark_unhomed(Slot::Z);
    }

    /// Invalidate the limit of one configured axis (global index).
    pub fn mark_axis_unhomed(&self, axis: usize) -> Result<(), KinematicsError> {
        let slot = self.configured_slot(axis)?;
        self.limits.mark_unhomed(slot);
        Ok(())
    }

    /// Home the axes requested by `state`, one after the other.
    pub fn home(&self, state: &mut dyn HomingState) -> Result<(), KinematicsError> {
        self.sequencer.run(&self.axis_set, &self.rails, state)?;
        Ok(())
    }

    /// Validate a move against the current limits; may lower its speed caps.
    pub fn check_move(&self, mv: &mut Move) -> Result<(), KinematicsError> {
        let limits = self.limits.snapshot();
        self.validator.check_move(&limits, mv)?;
        Ok(())
    }

    pub fn get_status(&self, eventtime: f64) -> KinematicsStatus {
        let limits = self.limits.snapshot();
        let homed_axes: String = Slot::ALL
            .into_iter()
            .filter(|&slot| !self.axis_set.is_dummy(slot) && limits.is_homed(slot))
            .map(Slot::status_letter)
            .collect();
        debug!("Status at {eventtime:.3}: homed '{homed_axes}'");
        KinematicsStatus {
            homed_axes,
            axis_minimum: self.axes_min,
            axis_maximum: self.axes_max,
        }
    }

    fn configured_slot(&self, axis: usize) -> Result<Slot, KinematicsError> {
        self.axis_set
            .slot_of(axis)
            .ok_or(KinematicsError::Homing(HomingError::UnknownAxis(axis)))
    }
}
