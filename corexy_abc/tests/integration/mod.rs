//! Shared fixtures for the integration tests.

pub mod homing;
pub mod motion;
pub mod setup;
pub mod transform;

use corexy_abc::CoreXYKinematics;
use corexy_abc::sim::{SimEventBus, SimToolhead};
use motion_common::config::ConfigLoader;
use motion_common::machine::MachineConfig;

/// ABC triplet on a six-axis toolhead.
pub const ABC_MACHINE: &str = r#"
[shared]
service_name = "corexy-abc-test"

[printer]
max_velocity = 300.0
max_accel = 3000.0
axis_count = 6

[kinematics]
axes = "ABC"
axis_indices = [3, 4, 5]
max_z_velocity = 25.0
max_z_accel = 500.0

[stepper.a]
steppers = ["stepper_a", "stepper_a1"]
position_max = 200.0
position_endstop = 0.0

[stepper.b]
position_max = 200.0
position_endstop = 200.0

[stepper.c]
position_max = 100.0
position_endstop = 0.0
"#;

pub struct Rig {
    pub kin: CoreXYKinematics,
    pub toolhead: SimToolhead,
    pub events: SimEventBus,
}

pub fn machine() -> MachineConfig {
    MachineConfig::from_toml(ABC_MACHINE).unwrap()
}

pub fn rig_with(config: &MachineConfig, letters: &str, indices: &[usize]) -> Rig {
    let mut toolhead = SimToolhead::from_config(&config.printer);
    let mut events = SimEventBus::default();
    let kin = CoreXYKinematics::new(&mut toolhead, &mut events, config, None, indices, letters)
        .unwrap();
    Rig {
        kin,
        toolhead,
        events,
    }
}

pub fn abc_rig() -> Rig {
    rig_with(&machine(), "ABC", &[3, 4, 5])
}

/// Rig with every axis homed at the origin.
pub fn homed_abc_rig() -> Rig {
    let mut rig = abc_rig();
    rig.kin.set_position([0.0; 3], &[3, 4, 5]).unwrap();
    rig
}
