//! # CoreXY ABC Kinematics
//!
//! CoreXY kinematics for one configurable axis triplet: `XYZ`, `ABC` or
//! `UVW`, with one to three configured axes. Slots 0 and 1 are the belt
//! coupled pair, slot 2 an independent axis or a dummy placeholder.
//!
//! # Module Structure
//!
//! - [`axis`] - Axis set resolution, triplet slots and dummy axes
//! - [`rail`] - Rails, steppers, endstops and solver bindings
//! - [`transform`] - Forward CoreXY transform
//! - [`limits`] - Per-slot soft limits and the motor-off reset
//! - [`homing`] - Homing move generation and sequencing
//! - [`motion`] - Move validation and secondary-axis de-rating
//! - [`kinematics`] - The [`CoreXYKinematics`] facade and status
//! - [`toolhead`] - Collaborator traits (toolhead, event bus)
//! - [`sim`] - In-process collaborators for the CLI and tests
//! - [`error`] - Error types
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────┐
//! │                     CoreXYKinematics                          │
//! │  ┌──────────┐   ┌──────────────┐   ┌───────────────────────┐  │
//! │  │ AxisSet  │──►│ Rails (x3)   │──►│ Toolhead / EventBus   │  │
//! │  └──────────┘   └──────┬───────┘   └───────────┬───────────┘  │
//! │                        │                       │ MotorOff     │
//! │  ┌──────────────┐      ▼                       ▼              │
//! │  │ Homing       │  ┌────────────────────────────────────┐     │
//! │  │ Sequencer    │  │ LimitTracker (Arc<RwLock<[..;3]>>) │     │
//! │  └──────────────┘  └─────────────────┬──────────────────┘     │
//! │                                      ▼                        │
//! │                              MotionValidator                  │
//! └───────────────────────────────────────────────────────────────┘
//! ```

pub mod axis;
pub mod error;
pub mod homing;
pub mod kinematics;
pub mod limits;
pub mod motion;
pub mod rail;
pub mod sim;
pub mod toolhead;
pub mod transform;

// Re-export key types for convenience
pub use crate::axis::{AxisSet, AxisSlot, Slot, Triplet};
pub use crate::error::{HomingError, KinematicsError, MoveError, MoveRejection};
pub use crate::homing::{HomingMove, HomingSequencer, HomingState};
pub use crate::kinematics::{CoreXYKinematics, KinematicsStatus};
pub use crate::limits::{Limit, LimitSet, LimitTracker};
pub use crate::motion::{MotionValidator, Move};
pub use crate::rail::{Rail, SolverBinding, Stepper, StepperRef};
pub use crate::toolhead::{EventBus, EventHandler, MachineEvent, Toolhead, TrapQueue};
