//! Browser bindings. The page owns the canvas, the mouse handlers and the
//! control panel; this module only forwards their events to the flock and
//! hands back flat position buffers to draw from.

use boid_core::{Flock, FlockConfig, Marker, MarkerId, ParamValue, Vector2D, World};
use boid_shared::{FrameSnapshot, StatusResponse};
use js_sys::Float32Array;
use wasm_bindgen::prelude::*;

macro_rules! console_log {
    ($($t:tt)*) => (web_sys::console::log_1(&format_args!($($t)*).to_string().into()))
}

fn to_js_error(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// Interleaved `[x0, y0, x1, y1, ...]`.
fn flatten<I: Iterator<Item = Vector2D>>(points: I) -> Float32Array {
    let flat: Vec<f32> = points.flat_map(|p| [p.x, p.y]).collect();
    Float32Array::from(flat.as_slice())
}

fn marker_positions(markers: &[Marker]) -> Float32Array {
    flatten(markers.iter().map(|m| m.position))
}

#[wasm_bindgen]
pub struct BoidSimulation {
    flock: Flock,
}

#[wasm_bindgen]
impl BoidSimulation {
    #[wasm_bindgen(constructor)]
    pub fn new(
        width: f32,
        height: f32,
        boid_count: usize,
        seed: Option<u64>,
    ) -> Result<BoidSimulation, JsValue> {
        console_log!("Initializing boid simulation with {} boids", boid_count);

        let world = World::new(width, height).map_err(to_js_error)?;
        let flock = match seed {
            Some(seed) => Flock::with_seed(world, boid_count, FlockConfig::default(), seed),
            None => Flock::new(world, boid_count),
        };

        Ok(BoidSimulation { flock })
    }

    /// Advances one frame; `dt` is in seconds.
    pub fn step(&mut self, dt: f32) -> Result<(), JsValue> {
        self.flock.step(dt).map_err(to_js_error)
    }

    pub fn place_attractor(&mut self, x: f32, y: f32) -> u32 {
        self.flock.place_attractor(Vector2D::new(x, y)).0
    }

    /// Returns `false` if no attractor has this id.
    pub fn remove_attractor(&mut self, id: u32) -> bool {
        self.flock.remove_attractor(MarkerId(id)).is_ok()
    }

    pub fn place_detractor(&mut self, x: f32, y: f32) -> u32 {
        self.flock.place_detractor(Vector2D::new(x, y)).0
    }

    /// Returns `false` if no detractor has this id.
    pub fn remove_detractor(&mut self, id: u32) -> bool {
        self.flock.remove_detractor(MarkerId(id)).is_ok()
    }

    pub fn explode(&mut self) {
        self.flock.explode();
    }

    pub fn reset(&mut self) {
        self.flock.reset();
    }

    /// Accepts a number, or a boolean for `wrap_around`.
    pub fn set_parameter(&mut self, name: &str, value: JsValue) -> Result<(), JsValue> {
        let value = if let Some(flag) = value.as_bool() {
            ParamValue::Flag(flag)
        } else if let Some(number) = value.as_f64() {
            ParamValue::Number(number as f32)
        } else {
            return Err(JsValue::from_str(&format!(
                "parameter {} needs a number or boolean",
                name
            )));
        };
        self.flock.set_parameter(name, value).map_err(to_js_error)
    }

    pub fn get_parameter(&self, name: &str) -> Result<JsValue, JsValue> {
        let parameter = name.parse().map_err(to_js_error)?;
        Ok(match self.flock.config().get(parameter) {
            ParamValue::Number(n) => JsValue::from_f64(n as f64),
            ParamValue::Flag(flag) => JsValue::from_bool(flag),
        })
    }

    pub fn positions(&self) -> Float32Array {
        flatten(self.flock.boids().iter().map(|b| b.position))
    }

    pub fn velocities(&self) -> Float32Array {
        flatten(self.flock.boids().iter().map(|b| b.velocity))
    }

    pub fn attractor_positions(&self) -> Float32Array {
        marker_positions(self.flock.attractors())
    }

    pub fn detractor_positions(&self) -> Float32Array {
        marker_positions(self.flock.detractors())
    }

    pub fn boid_count(&self) -> usize {
        self.flock.boids().len()
    }

    pub fn frame(&self) -> u64 {
        self.flock.frame()
    }

    /// [`StatusResponse`] as JSON, for a status line under the canvas.
    pub fn status_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(&StatusResponse::from(&self.flock)).map_err(to_js_error)
    }

    /// Full [`FrameSnapshot`] as JSON, marker ids included.
    pub fn snapshot_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(&FrameSnapshot::from(&self.flock)).map_err(to_js_error)
    }
}
