#![cfg(target_arch = "wasm32")]

use boid_wasm::BoidSimulation;
use wasm_bindgen::JsValue;
use wasm_bindgen_test::*;

fn simulation() -> BoidSimulation {
    BoidSimulation::new(900.0, 570.0, 25, Some(7)).expect("simulation should start")
}

#[wasm_bindgen_test]
fn test_positions_are_interleaved() {
    let sim = simulation();
    assert_eq!(sim.boid_count(), 25);
    assert_eq!(sim.positions().length(), 50);
    assert_eq!(sim.velocities().length(), 50);
}

#[wasm_bindgen_test]
fn test_invalid_world_is_rejected() {
    assert!(BoidSimulation::new(0.0, 570.0, 10, None).is_err());
}

#[wasm_bindgen_test]
fn test_step_and_reject_negative_dt() {
    let mut sim = simulation();
    sim.step(1.0 / 60.0).unwrap();
    assert_eq!(sim.frame(), 1);
    assert!(sim.step(-1.0).is_err());
    assert_eq!(sim.frame(), 1);
}

#[wasm_bindgen_test]
fn test_marker_round_trip() {
    let mut sim = simulation();
    let attractor = sim.place_attractor(100.0, 120.0);
    let detractor = sim.place_detractor(300.0, 320.0);
    assert_ne!(attractor, detractor);

    let positions = sim.attractor_positions().to_vec();
    assert_eq!(positions, vec![100.0, 120.0]);
    assert_eq!(sim.detractor_positions().length(), 2);

    assert!(!sim.remove_attractor(detractor));
    assert!(sim.remove_attractor(attractor));
    assert!(sim.remove_detractor(detractor));
    assert_eq!(sim.attractor_positions().length(), 0);
    assert_eq!(sim.detractor_positions().length(), 0);
}

#[wasm_bindgen_test]
fn test_parameters_from_js_values() {
    let mut sim = simulation();
    sim.set_parameter("max_speed", JsValue::from_f64(80.0))
        .unwrap();
    sim.set_parameter("wrap_around", JsValue::from_bool(true))
        .unwrap();
    assert!(sim
        .set_parameter("max_speed", JsValue::from_str("fast"))
        .is_err());
    assert!(sim.set_parameter("nope", JsValue::from_f64(1.0)).is_err());

    assert_eq!(sim.get_parameter("max_speed").unwrap().as_f64(), Some(80.0));
    assert_eq!(sim.get_parameter("wrap_around").unwrap().as_bool(), Some(true));

    sim.explode();
    for v in sim.velocities().to_vec() {
        assert_eq!(v.abs(), 80.0);
    }
}

#[wasm_bindgen_test]
fn test_snapshot_json() {
    let mut sim = simulation();
    sim.place_attractor(1.0, 2.0);
    let json = sim.snapshot_json().unwrap();
    assert!(json.contains("\"attractors\":[{\"id\":1"));
}

#[wasm_bindgen_test]
fn test_status_json() {
    let mut sim = simulation();
    sim.place_detractor(5.0, 5.0);
    sim.step(0.1).unwrap();
    let json = sim.status_json().unwrap();
    assert!(json.contains("\"boid_count\":25"));
    assert!(json.contains("\"detractor_count\":1"));
    assert!(json.contains("\"frame\":1"));
}
