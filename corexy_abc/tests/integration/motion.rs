//! Integration test: move validation through the facade.
//!
//! Unhomed and out-of-range rejections, the slot-2 speed de-rating and the
//! rule that de-rating never raises a cap.

use corexy_abc::{KinematicsError, MoveRejection, Move};

use super::{abc_rig, homed_abc_rig};

fn rejection(err: KinematicsError) -> MoveRejection {
    match err {
        KinematicsError::MoveRejected(e) => e.reason,
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn unhomed_move_is_refused() {
    let rig = abc_rig();
    let mut mv = Move::new([0.0; 3], [10.0, 0.0, 0.0], 100.0, 1000.0);
    let err = rig.kin.check_move(&mut mv).unwrap_err();
    assert_eq!(err.to_string(), "Must home axis first: 10.000 0.000 0.000");
    assert_eq!(rejection(err), MoveRejection::NotHomed);
}

#[test]
fn homed_move_past_max_is_out_of_range() {
    let rig = homed_abc_rig();
    let mut mv = Move::new([0.0; 3], [0.0, 250.0, 0.0], 100.0, 1000.0);
    let err = rig.kin.check_move(&mut mv).unwrap_err();
    assert_eq!(err.to_string(), "Move out of range: 0.000 250.000 0.000");
}

#[test]
fn planar_move_keeps_its_caps() {
    let rig = homed_abc_rig();
    let mut mv = Move::new([0.0; 3], [100.0, 50.0, 0.0], 150.0, 2000.0);
    rig.kin.check_move(&mut mv).unwrap();
    assert_eq!(mv.max_cruise_v(), 150.0);
    assert_eq!(mv.accel, 2000.0);
}

#[test]
fn pure_z_move_uses_z_limits() {
    let rig = homed_abc_rig();
    let mut mv = Move::new([0.0; 3], [0.0, 0.0, 10.0], 150.0, 2000.0);
    rig.kin.check_move(&mut mv).unwrap();
    assert!((mv.max_cruise_v() - 25.0).abs() < 1e-9);
    assert!((mv.accel - 500.0).abs() < 1e-9);
}

#[test]
fn diagonal_z_move_is_scaled_by_ratio() {
    let rig = homed_abc_rig();
    // move_d = 10, dz = 6 -> ratio 10/6
    let mut mv = Move::new([0.0; 3], [8.0, 0.0, 6.0], 150.0, 2000.0);
    rig.kin.check_move(&mut mv).unwrap();
    let ratio = 10.0 / 6.0;
    assert!((mv.max_cruise_v() - 25.0 * ratio).abs() < 1e-9);
    assert!((mv.accel - 500.0 * ratio).abs() < 1e-9);
}

#[test]
fn slow_move_is_never_sped_up() {
    let rig = homed_abc_rig();
    let mut mv = Move::new([0.0; 3], [0.0, 0.0, 10.0], 5.0, 50.0);
    rig.kin.check_move(&mut mv).unwrap();
    assert_eq!(mv.max_cruise_v(), 5.0);
    assert_eq!(mv.accel, 50.0);
}

#[test]
fn z_unhomed_blocks_only_z_moves() {
    let rig = homed_abc_rig();
    rig.kin.note_z_not_homed();

    let mut planar = Move::new([0.0; 3], [10.0, 10.0, 0.0], 100.0, 1000.0);
    assert!(rig.kin.check_move(&mut planar).is_ok());

    let mut lift = Move::new([0.0; 3], [0.0, 0.0, 5.0], 100.0, 1000.0);
    let err = rig.kin.check_move(&mut lift).unwrap_err();
    assert_eq!(rejection(err), MoveRejection::NotHomed);
}
