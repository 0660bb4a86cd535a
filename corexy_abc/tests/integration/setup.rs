//! Integration test: construction of the kinematics.
//!
//! Axis-set validation, rail lookup, endstop cross-registration and the
//! toolhead/event-bus registrations made at setup.

use corexy_abc::sim::{SimEventBus, SimToolhead};
use corexy_abc::{
    AxisSet, CoreXYKinematics, KinematicsError, MachineEvent, Slot, SolverBinding, TrapQueue,
};
use motion_common::config::ConfigError;
use proptest::prelude::*;

use super::{abc_rig, machine, rig_with};

fn try_build(letters: &str, indices: &[usize]) -> Result<CoreXYKinematics, KinematicsError> {
    let config = machine();
    let mut toolhead = SimToolhead::from_config(&config.printer);
    let mut events = SimEventBus::default();
    CoreXYKinematics::new(&mut toolhead, &mut events, &config, None, indices, letters)
}

// ── Tests ───────────────────────────────────────────────────────────

#[test]
fn length_mismatch_is_a_config_error() {
    let err = try_build("ABC", &[3, 4]).unwrap_err();
    match err {
        KinematicsError::Config(ConfigError::ValidationError(msg)) => {
            assert!(msg.contains("ABC"));
            assert!(msg.contains("[3, 4]"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn coupled_rails_share_endstops() {
    let rig = abc_rig();
    let a = rig.kin.rails()[Slot::X].as_ref().unwrap();
    let b = rig.kin.rails()[Slot::Y].as_ref().unwrap();
    let c = rig.kin.rails()[Slot::Z].as_ref().unwrap();

    for s in a.steppers().iter().chain(b.steppers()) {
        assert!(a.endstop().has_stepper(s));
        assert!(b.endstop().has_stepper(s));
        assert!(!c.endstop().has_stepper(s));
    }
    assert_eq!(a.endstop().steppers().len(), 3);
    assert_eq!(c.endstop().steppers().len(), 1);
}

#[test]
fn every_stepper_is_registered_once_on_the_queue() {
    let rig = abc_rig();
    let names: Vec<_> = rig.toolhead.registered().iter().map(|s| s.name().to_string()).collect();
    assert_eq!(names, ["stepper_a", "stepper_a1", "stepper_b", "stepper_c"]);
    for s in rig.kin.steppers() {
        assert_eq!(s.trapq(), Some(TrapQueue::new("trapq_abc")));
    }
    assert_eq!(rig.events.handler_count(MachineEvent::MotorOff), 1);
}

#[test]
fn explicit_trapq_is_used_as_given() {
    let config = machine();
    let mut toolhead = SimToolhead::from_config(&config.printer);
    let mut events = SimEventBus::default();
    let queue = TrapQueue::new("extra_queue");
    let kin = CoreXYKinematics::new(
        &mut toolhead,
        &mut events,
        &config,
        Some(queue.clone()),
        &[3, 4, 5],
        "ABC",
    )
    .unwrap();
    assert_eq!(kin.trapq(), &queue);
    assert!(kin.steppers().iter().all(|s| s.trapq() == Some(queue.clone())));
}

#[test]
fn solver_bindings_follow_slots() {
    let rig = abc_rig();
    let bindings: Vec<_> = rig.kin.steppers().iter().map(|s| s.binding()).collect();
    assert_eq!(
        bindings,
        [
            Some(SolverBinding::CoupledPlus),
            Some(SolverBinding::CoupledPlus),
            Some(SolverBinding::CoupledMinus),
            Some(SolverBinding::Independent),
        ]
    );
}

#[test]
fn two_axis_set_keeps_a_dummy_third_slot() {
    let rig = rig_with(&machine(), "AB", &[3, 4]);
    assert_eq!(rig.kin.axis_set().dummy_axes(), vec![(5, 'C')]);
    assert!(rig.kin.rails()[Slot::Z].is_none());
    assert_eq!(rig.kin.steppers().len(), 3);
    let status = rig.kin.get_status(0.0);
    assert_eq!(status.axis_minimum, [0.0, 0.0, 0.0]);
    assert_eq!(status.axis_maximum, [200.0, 200.0, 0.0]);
}

#[test]
fn missing_rail_section_names_it() {
    let mut config = machine();
    config.stepper.remove("c");
    let mut toolhead = SimToolhead::from_config(&config.printer);
    let mut events = SimEventBus::default();
    let err = CoreXYKinematics::new(&mut toolhead, &mut events, &config, None, &[3, 4, 5], "ABC")
        .unwrap_err();
    assert!(err.to_string().contains("stepper_c"));
}

#[test]
fn toolhead_must_carry_the_whole_triplet() {
    let config = machine();
    let mut toolhead = SimToolhead::new(3, 300.0, 3000.0);
    let mut events = SimEventBus::default();
    let err = CoreXYKinematics::new(&mut toolhead, &mut events, &config, None, &[3, 4, 5], "ABC")
        .unwrap_err();
    assert!(matches!(err, KinematicsError::Config(_)));
}

#[test]
fn z_limits_default_to_toolhead_maxima() {
    let mut config = machine();
    config.kinematics.max_z_velocity = None;
    config.kinematics.max_z_accel = None;
    let rig = rig_with(&config, "ABC", &[3, 4, 5]);
    assert_eq!(rig.kin.validator().max_z_velocity(), 300.0);
    assert_eq!(rig.kin.validator().max_z_accel(), 3000.0);
}

#[test]
fn non_positive_z_accel_is_rejected() {
    let mut config = machine();
    config.kinematics.max_z_accel = Some(0.0);
    let mut toolhead = SimToolhead::from_config(&config.printer);
    let mut events = SimEventBus::default();
    let err = CoreXYKinematics::new(&mut toolhead, &mut events, &config, None, &[3, 4, 5], "ABC")
        .unwrap_err();
    assert!(err.to_string().contains("max_z_accel"));
}

proptest! {
    #[test]
    fn mismatched_lengths_never_resolve(letters in "[A-C]{1,3}", extra in 1usize..3) {
        let n = letters.len();
        let indices: Vec<usize> = (3..3 + n + extra).collect();
        prop_assert!(AxisSet::resolve(&letters, &indices).is_err());
    }

    #[test]
    fn triplet_follows_first_index(base in 0usize..3, len in 1usize..=3) {
        let letters = &"XYZABCUVW"[3 * base..3 * base + len];
        let indices: Vec<usize> = (3 * base..3 * base + len).collect();
        let set = AxisSet::resolve(letters, &indices).unwrap();
        prop_assert_eq!(set.triplet(), [3 * base, 3 * base + 1, 3 * base + 2]);
        prop_assert_eq!(set.dummy_axes().len(), 3 - len);
    }
}
