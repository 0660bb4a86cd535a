//! Integration test: forward transform against the solver bindings.
//!
//! Rail positions produced by the bindings on `set_position` must map back
//! to the commanded machine coordinate.

use std::collections::HashMap;

use corexy_abc::{Slot, SolverBinding};
use corexy_abc::transform::forward;
use proptest::prelude::*;

use super::{abc_rig, machine, rig_with};

fn measured(rig: &super::Rig) -> HashMap<String, f64> {
    rig.kin
        .rails()
        .iter()
        .flatten()
        .map(|r| (r.name().to_string(), r.position()))
        .collect()
}

#[test]
fn set_then_calc_returns_the_commanded_point() {
    let mut rig = abc_rig();
    rig.kin.set_position([12.0, -4.0, 30.0], &[]).unwrap();
    assert_eq!(rig.kin.rails()[Slot::X].as_ref().unwrap().position(), 8.0);
    assert_eq!(rig.kin.rails()[Slot::Y].as_ref().unwrap().position(), 16.0);
    assert_eq!(rig.kin.calc_position(&measured(&rig)).unwrap(), [12.0, -4.0, 30.0]);
}

#[test]
fn dummy_slot_tracks_last_commanded_value() {
    let mut rig = rig_with(&machine(), "AB", &[3, 4]);
    rig.kin.set_position([1.0, 1.0, 42.0], &[]).unwrap();
    let pos = rig.kin.calc_position(&measured(&rig)).unwrap();
    assert_eq!(pos, [1.0, 1.0, 42.0]);
}

proptest! {
    #[test]
    fn bindings_invert_forward(x in -500.0f64..500.0, y in -500.0f64..500.0, z in -500.0f64..500.0) {
        let coord = [x, y, z];
        let rails = [
            SolverBinding::CoupledPlus.rail_position(coord),
            SolverBinding::CoupledMinus.rail_position(coord),
            SolverBinding::Independent.rail_position(coord),
        ];
        let back = forward(rails);
        for i in 0..3 {
            prop_assert!((back[i] - coord[i]).abs() < 1e-9);
        }
    }

    #[test]
    fn forward_is_linear(a in prop::array::uniform3(-100.0f64..100.0), k in -10.0f64..10.0) {
        let scaled = forward(a.map(|v| v * k));
        let expected = forward(a).map(|v| v * k);
        for i in 0..3 {
            prop_assert!((scaled[i] - expected[i]).abs() < 1e-9);
        }
    }
}
