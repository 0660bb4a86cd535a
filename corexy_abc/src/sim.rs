//! In-process collaborators.
//!
//! Stand-ins for the machine host so the kinematics can run without
//! hardware: the CLI drives them, and the tests inspect what was recorded.

use std::fmt;

use motion_common::machine::PrinterConfig;
use tracing::{debug, warn};

use crate::error::HomingError;
use crate::homing::{HomingMove, HomingState};
use crate::rail::{Rail, StepperRef};
use crate::toolhead::{EventBus, EventHandler, MachineEvent, Toolhead, TrapQueue};

// ─── Toolhead ───────────────────────────────────────────────────────

/// Toolhead that records registered step generators.
#[derive(Debug, Clone)]
pub struct SimToolhead {
    axis_count: usize,
    max_velocity: f64,
    max_accel: f64,
    registered: Vec<StepperRef>,
}

impl SimToolhead {
    pub fn new(axis_count: usize, max_velocity: f64, max_accel: f64) -> Self {
        Self {
            axis_count,
            max_velocity,
            max_accel,
            registered: Vec::new(),
        }
    }

    pub fn from_config(printer: &PrinterConfig) -> Self {
        Self::new(printer.axis_count, printer.max_velocity, printer.max_accel)
    }

    pub fn registered(&self) -> &[StepperRef] {
        &self.registered
    }
}

impl Toolhead for SimToolhead {
    fn axis_count(&self) -> usize {
        self.axis_count
    }

    fn max_velocity(&self) -> (f64, f64) {
        (self.max_velocity, self.max_accel)
    }

    fn trapq(&self, axes: &str) -> TrapQueue {
        TrapQueue::new(&format!("trapq_{}", axes.to_ascii_lowercase()))
    }

    fn register_step_generator(&mut self, stepper: StepperRef) {
        debug!("Step generator registered for {}", stepper.name());
        self.registered.push(stepper);
    }
}

// ─── Event Bus ──────────────────────────────────────────────────────

/// Synchronous event bus; `fire` runs handlers on the calling thread.
#[derive(Default)]
pub struct SimEventBus {
    handlers: Vec<(MachineEvent, EventHandler)>,
}

impl SimEventBus {
    pub fn handler_count(&self, event: MachineEvent) -> usize {
        self.handlers.iter().filter(|(e, _)| *e == event).count()
    }

    /// Dispatch `event`; returns the number of handlers invoked.
    pub fn fire(&self, event: MachineEvent, eventtime: f64) -> usize {
        let mut count = 0;
        for (_, handler) in self.handlers.iter().filter(|(e, _)| *e == event) {
            handler(eventtime);
            count += 1;
        }
        debug!("Fired {} to {count} handler(s)", event.name());
        count
    }
}

impl EventBus for SimEventBus {
    fn register_event_handler(&mut self, event: MachineEvent, handler: EventHandler) {
        self.handlers.push((event, handler));
    }
}

impl fmt::Debug for SimEventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let events: Vec<_> = self.handlers.iter().map(|(e, _)| e.name()).collect();
        f.debug_struct("SimEventBus").field("handlers", &events).finish()
    }
}

// ─── Homing ─────────────────────────────────────────────────────────

/// Homing request that "triggers" every endstop at its configured position.
#[derive(Debug, Clone, Default)]
pub struct SimHomingState {
    axes: Vec<usize>,
    moves: Vec<HomingMove>,
    homed_rails: Vec<String>,
    fail_axis: Option<usize>,
}

impl SimHomingState {
    pub fn new(axes: Vec<usize>) -> Self {
        Self {
            axes,
            ..Self::default()
        }
    }

    /// Make the endstop of `axis` never trigger.
    pub fn failing_on(mut self, axis: usize) -> Self {
        self.fail_axis = Some(axis);
        self
    }

    pub fn moves(&self) -> &[HomingMove] {
        &self.moves
    }

    pub fn homed_rails(&self) -> &[String] {
        &self.homed_rails
    }

    /// Global indices homed so far.
    pub fn homed_axes(&self) -> Vec<usize> {
        self.moves.iter().map(|m| m.axis).collect()
    }

    /// Triplet-local position after homing: endstop coordinates of the
    /// homed axes, `0.0` elsewhere.
    pub fn final_position(&self, triplet: [usize; 3]) -> [f64; 3] {
        let mut pos = [0.0; 3];
        for m in &self.moves {
            if let Some(slot) = triplet.iter().position(|&i| i == m.axis) {
                pos[slot] = m.homepos[m.axis].unwrap_or(0.0);
            }
        }
        pos
    }
}

impl HomingState for SimHomingState {
    fn axes(&self) -> Vec<usize> {
        self.axes.clone()
    }

    fn home_rails(&mut self, rails: &[&Rail], homing: &HomingMove) -> Result<(), HomingError> {
        let name = rails.first().map_or("", |r| r.name()).to_string();
        if self.fail_axis == Some(homing.axis) {
            warn!("Simulated endstop {name} did not trigger");
            return Err(HomingError::NoTrigger { rail: name });
        }
        self.moves.push(homing.clone());
        self.homed_rails.push(name);
        Ok(())
    }
}
