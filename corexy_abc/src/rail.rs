//! Rails, steppers, endstops and solver bindings.
//!
//! A [`Rail`] is created once per configured axis letter at setup and lives
//! for the whole machine session. Its steppers are shared handles
//! ([`StepperRef`]) because the toolhead's step scheduler and the endstops of
//! the coupled rail hold them too.

use std::sync::Arc;

use motion_common::config::ConfigError;
use motion_common::machine::{rail_section, RailConfig};
use parking_lot::Mutex;
use tracing::debug;

use crate::axis::Slot;
use crate::toolhead::TrapQueue;

// ─── Solver Binding ─────────────────────────────────────────────────

/// Transform rule the step-generation side applies to a rail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SolverBinding {
    /// Belt driven by `x + y`.
    CoupledPlus,
    /// Belt driven by `x - y`.
    CoupledMinus,
    /// Slot-2 axis, passes straight through.
    Independent,
}

impl SolverBinding {
    /// Binding for a triplet slot: `X` and `Y` form the coupled pair.
    pub const fn for_slot(slot: Slot) -> Self {
        match slot {
            Slot::X => Self::CoupledPlus,
            Slot::Y => Self::CoupledMinus,
            Slot::Z => Self::Independent,
        }
    }

    /// Rail position for a triplet-local machine coordinate.
    #[inline]
    pub fn rail_position(&self, coord: [f64; 3]) -> f64 {
        match self {
            Self::CoupledPlus => coord[0] + coord[1],
            Self::CoupledMinus => coord[0] - coord[1],
            Self::Independent => coord[2],
        }
    }

    pub const fn name(&self) -> &'static str {
        match self {
            Self::CoupledPlus => "coupled-plus",
            Self::CoupledMinus => "coupled-minus",
            Self::Independent => "independent",
        }
    }
}

// ─── Stepper ────────────────────────────────────────────────────────

/// Shared stepper handle.
pub type StepperRef = Arc<Stepper>;

#[derive(Debug, Default)]
struct StepperState {
    binding: Option<SolverBinding>,
    trapq: Option<TrapQueue>,
    position: f64,
}

/// One physical stepper driver.
#[derive(Debug)]
pub struct Stepper {
    name: String,
    state: Mutex<StepperState>,
}

impl Stepper {
    pub fn new(name: impl Into<String>) -> StepperRef {
        Arc::new(Self {
            name: name.into(),
            state: Mutex::new(StepperState::default()),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn binding(&self) -> Option<SolverBinding> {
        self.state.lock().binding
    }

    pub fn trapq(&self) -> Option<TrapQueue> {
        self.state.lock().trapq.clone()
    }

    /// Commanded rail position, as produced by the solver binding.
    pub fn position(&self) -> f64 {
        self.state.lock().position
    }

    pub fn set_binding(&self, binding: SolverBinding) {
        self.state.lock().binding = Some(binding);
    }

    pub fn set_trapq(&self, trapq: TrapQueue) {
        self.state.lock().trapq = Some(trapq);
    }

    /// Push a machine coordinate; the binding turns it into a rail position.
    /// An unbound stepper keeps its previous position.
    pub fn set_position(&self, coord: [f64; 3]) {
        let mut state = self.state.lock();
        match state.binding {
            Some(binding) => state.position = binding.rail_position(coord),
            None => debug!("Stepper {} has no solver binding, position unchanged", self.name),
        }
    }
}

// ─── Endstop ────────────────────────────────────────────────────────

/// An endstop and the steppers it must halt when it triggers.
#[derive(Debug)]
pub struct Endstop {
    name: String,
    steppers: Vec<StepperRef>,
}

impl Endstop {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            steppers: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Register a stepper; registering the same handle twice is a no-op.
    pub fn add_stepper(&mut self, stepper: StepperRef) {
        if !self.has_stepper(&stepper) {
            self.steppers.push(stepper);
        }
    }

    pub fn has_stepper(&self, stepper: &StepperRef) -> bool {
        self.steppers.iter().any(|s| Arc::ptr_eq(s, stepper))
    }

    pub fn steppers(&self) -> &[StepperRef] {
        &self.steppers
    }
}

// ─── Rail ───────────────────────────────────────────────────────────

/// Homing metadata of a rail.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HomingInfo {
    /// Machine coordinate where the endstop triggers.
    pub position_endstop: f64,
    /// Endstop triggers while moving towards +.
    pub positive_dir: bool,
}

/// Motor rail of one axis letter.
#[derive(Debug)]
pub struct Rail {
    name: String,
    position_min: f64,
    position_max: f64,
    homing: HomingInfo,
    endstop: Endstop,
    steppers: Vec<StepperRef>,
    binding: Option<SolverBinding>,
}

impl Rail {
    /// Build the rail `stepper_<letter>` from its config section.
    pub fn from_config(letter: char, config: &RailConfig) -> Result<Self, ConfigError> {
        let name = rail_section(letter);
        config
            .validate()
            .map_err(|e| ConfigError::invalid(format!("[{name}] {e}")))?;
        let positive_dir = config.homing_positive_dir()?;

        let steppers: Vec<StepperRef> = if config.steppers.is_empty() {
            vec![Stepper::new(name.clone())]
        } else {
            config.steppers.iter().map(Stepper::new).collect()
        };

        let mut endstop = Endstop::new(name.clone());
        for s in &steppers {
            endstop.add_stepper(Arc::clone(s));
        }

        Ok(Self {
            name,
            position_min: config.position_min,
            position_max: config.position_max,
            homing: HomingInfo {
                position_endstop: config.position_endstop,
                positive_dir,
            },
            endstop,
            steppers,
            binding: None,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Mechanical travel range `(min, max)`.
    pub fn range(&self) -> (f64, f64) {
        (self.position_min, self.position_max)
    }

    pub fn homing_info(&self) -> HomingInfo {
        self.homing
    }

    pub fn endstop(&self) -> &Endstop {
        &self.endstop
    }

    pub fn steppers(&self) -> &[StepperRef] {
        &self.steppers
    }

    pub fn binding(&self) -> Option<SolverBinding> {
        self.binding
    }

    /// Assign the solver binding to the rail and every stepper on it.
    pub fn setup_solver(&mut self, binding: SolverBinding) {
        self.binding = Some(binding);
        for s in &self.steppers {
            s.set_binding(binding);
        }
        debug!("Rail {} bound to {}", self.name, binding.name());
    }

    /// Push a machine coordinate to every stepper's position register.
    pub fn set_position(&self, coord: [f64; 3]) {
        for s in &self.steppers {
            s.set_position(coord);
        }
    }

    /// Commanded position of the rail's first stepper.
    pub fn position(&self) -> f64 {
        self.steppers.first().map_or(0.0, |s| s.position())
    }
}

/// Cross-register the endstops of a coupled pair.
///
/// Triggering either endstop must stop both belts, so every stepper of `a`
/// joins `b`'s endstop and every stepper of `b` joins `a`'s.
pub fn couple_endstops(a: &mut Rail, b: &mut Rail) {
    for s in &b.steppers {
        a.endstop.add_stepper(Arc::clone(s));
    }
    for s in &a.steppers {
        b.endstop.add_stepper(Arc::clone(s));
    }
    debug!(
        "Coupled endstops {} <-> {} ({} / {} steppers)",
        a.name,
        b.name,
        a.endstop.steppers().len(),
        b.endstop.steppers().len()
    );
}
