//! Collaborator interfaces owned by the machine host.
//!
//! The kinematics never schedules steps, queues trapezoids or dispatches
//! events itself. It talks to those services through the traits below; the
//! [`sim`](crate::sim) module provides in-process implementations.
//!
//! # Lifecycle
//!
//! 1. The host builds its toolhead and event bus.
//! 2. `CoreXYKinematics::new()` registers every stepper with the toolhead
//!    and subscribes to [`MachineEvent::MotorOff`], once.
//! 3. The planner then calls `check_move()`, `set_position()` and `home()`
//!    from a single motion context; events may arrive from any thread.

use std::fmt;
use std::sync::Arc;

use crate::rail::StepperRef;

/// Handle to a trapezoid motion queue shared by a set of steppers.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TrapQueue(Arc<str>);

impl TrapQueue {
    pub fn new(name: &str) -> Self {
        Self(Arc::from(name))
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TrapQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Toolhead services needed at construction time.
pub trait Toolhead {
    /// Total number of global axes carried by the toolhead.
    fn axis_count(&self) -> usize;

    /// `(max_velocity, max_accel)` of the toolhead.
    fn max_velocity(&self) -> (f64, f64);

    /// Trapezoid queue serving the given axis letters.
    fn trapq(&self, axes: &str) -> TrapQueue;

    /// Register a stepper with the step-generation scheduler.
    fn register_step_generator(&mut self, stepper: StepperRef);
}

/// Machine-wide events a kinematics may subscribe to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MachineEvent {
    /// All motors lost power; position knowledge is gone.
    MotorOff,
}

impl MachineEvent {
    pub const fn name(&self) -> &'static str {
        match self {
            Self::MotorOff => "stepper_enable:motor_off",
        }
    }
}

/// Event callback; receives the event time.
pub type EventHandler = Box<dyn Fn(f64) + Send + Sync>;

/// Event-notification bus.
pub trait EventBus {
    fn register_event_handler(&mut self, event: MachineEvent, handler: EventHandler);
}
