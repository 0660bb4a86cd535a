//! Integration test: homing sequence for the ABC triplet.
//!
//! Validates the homing targets handed to the planner, sequential order,
//! abort on the first failure and the limits after `set_position`.

use corexy_abc::sim::SimHomingState;
use corexy_abc::{HomingError, KinematicsError, Slot};

use super::abc_rig;

#[test]
fn b_axis_targets_on_six_axis_toolhead() {
    let rig = abc_rig();
    let mut state = SimHomingState::new(vec![4]);
    rig.kin.home(&mut state).unwrap();

    let m = &state.moves()[0];
    assert_eq!(m.axis, 4);
    assert_eq!(m.homepos.len(), 6);
    assert_eq!(m.homepos[4], Some(200.0));
    assert_eq!(m.forcepos[4], Some(-100.0));
    for i in [0, 1, 2, 3, 5] {
        assert_eq!(m.homepos[i], None);
        assert_eq!(m.forcepos[i], None);
    }
}

#[test]
fn negative_endstop_overshoots_past_max() {
    let rig = abc_rig();
    let mut state = SimHomingState::new(vec![5]);
    rig.kin.home(&mut state).unwrap();
    // C: range [0, 100], endstop 0 -> 0 + 1.5 * 100
    assert_eq!(state.moves()[0].forcepos[5], Some(150.0));
    assert_eq!(state.moves()[0].homepos[5], Some(0.0));
}

#[test]
fn full_sequence_then_set_position_homes_all() {
    let mut rig = abc_rig();
    let mut state = SimHomingState::new(vec![3, 4, 5]);
    rig.kin.home(&mut state).unwrap();
    assert_eq!(state.homed_rails(), ["stepper_a", "stepper_b", "stepper_c"]);

    let pos = state.final_position(rig.kin.axis_set().triplet());
    assert_eq!(pos, [0.0, 200.0, 0.0]);
    rig.kin.set_position(pos, &state.homed_axes()).unwrap();

    let status = rig.kin.get_status(1.0);
    assert_eq!(status.homed_axes, "xyz");
    let limits = rig.kin.limits().snapshot();
    assert_eq!((limits.get(Slot::Z).low, limits.get(Slot::Z).high), (0.0, 100.0));
}

#[test]
fn homed_pair_reports_xy_letters() {
    let mut rig = abc_rig();
    let mut state = SimHomingState::new(vec![3, 4]);
    rig.kin.home(&mut state).unwrap();
    let pos = state.final_position(rig.kin.axis_set().triplet());
    rig.kin.set_position(pos, &state.homed_axes()).unwrap();

    let status = rig.kin.get_status(2.0);
    assert_eq!(status.homed_axes, "xy");
    assert_eq!(serde_json::to_value(&status).unwrap()["homed_axes"], "xy");
}

#[test]
fn first_failure_aborts_the_rest() {
    let rig = abc_rig();
    let mut state = SimHomingState::new(vec![3, 4, 5]).failing_on(4);
    let err = rig.kin.home(&mut state).unwrap_err();
    assert_eq!(
        err,
        KinematicsError::Homing(HomingError::NoTrigger {
            rail: "stepper_b".to_string()
        })
    );
    assert_eq!(state.homed_rails(), ["stepper_a"]);
    assert!(err.to_string().starts_with("Homing failed: No trigger on stepper_b"));
}

#[test]
fn axis_of_another_triplet_is_refused() {
    let rig = abc_rig();
    let mut state = SimHomingState::new(vec![3, 0]);
    let err = rig.kin.home(&mut state).unwrap_err();
    assert_eq!(err, KinematicsError::Homing(HomingError::UnknownAxis(0)));
    assert!(state.moves().is_empty());
}
