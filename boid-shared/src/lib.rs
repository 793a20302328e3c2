//! Messages exchanged between the simulation and its collaborators: input
//! events coming in from a UI or script, snapshots going out to a renderer.

use boid_core::rand::Rng;
use boid_core::{Flock, FlockError, Marker, MarkerId, ParamValue, Vector2D};
use serde::{Deserialize, Serialize};

/// Represents a 2D position in world coordinates
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl From<Vector2D> for Position {
    fn from(v: Vector2D) -> Self {
        Self::new(v.x, v.y)
    }
}

impl From<Position> for Vector2D {
    fn from(p: Position) -> Self {
        Vector2D::new(p.x, p.y)
    }
}

/// Input event from a control surface, mouse handler or script.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SimulationEvent {
    Step { dt: f32 },
    PlaceAttractor { x: f32, y: f32 },
    RemoveAttractor { id: MarkerId },
    PlaceDetractor { x: f32, y: f32 },
    RemoveDetractor { id: MarkerId },
    Explode,
    SetParameter { name: String, value: ParamValue },
    Reset,
}

/// What applying an event produced, if anything worth reporting back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventOutcome {
    Placed(MarkerId),
    Applied,
}

impl SimulationEvent {
    pub fn apply<R: Rng>(&self, flock: &mut Flock<R>) -> Result<EventOutcome, FlockError> {
        match self {
            SimulationEvent::Step { dt } => flock.step(*dt)?,
            SimulationEvent::PlaceAttractor { x, y } => {
                return Ok(EventOutcome::Placed(
                    flock.place_attractor(Vector2D::new(*x, *y)),
                ));
            }
            SimulationEvent::RemoveAttractor { id } => flock.remove_attractor(*id)?,
            SimulationEvent::PlaceDetractor { x, y } => {
                return Ok(EventOutcome::Placed(
                    flock.place_detractor(Vector2D::new(*x, *y)),
                ));
            }
            SimulationEvent::RemoveDetractor { id } => flock.remove_detractor(*id)?,
            SimulationEvent::Explode => flock.explode(),
            SimulationEvent::SetParameter { name, value } => flock.set_parameter(name, *value)?,
            SimulationEvent::Reset => flock.reset(),
        }
        Ok(EventOutcome::Applied)
    }
}

/// An event to apply right before the given frame is stepped.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScheduledEvent {
    pub frame: u64,
    #[serde(flatten)]
    pub event: SimulationEvent,
}

/// Parses a JSON array of scheduled events and orders it by frame. Events on
/// the same frame keep their file order.
pub fn parse_script(json: &str) -> serde_json::Result<Vec<ScheduledEvent>> {
    let mut events: Vec<ScheduledEvent> = serde_json::from_str(json)?;
    events.sort_by_key(|e| e.frame);
    log::debug!("parsed {} scheduled events", events.len());
    Ok(events)
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct BoidState {
    pub position: Position,
    pub velocity: Position,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct MarkerState {
    pub id: MarkerId,
    pub position: Position,
}

impl From<&Marker> for MarkerState {
    fn from(marker: &Marker) -> Self {
        Self {
            id: marker.id,
            position: marker.position.into(),
        }
    }
}

/// Everything a renderer needs to draw one frame.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FrameSnapshot {
    pub frame: u64,
    pub width: f32,
    pub height: f32,
    pub boids: Vec<BoidState>,
    pub attractors: Vec<MarkerState>,
    pub detractors: Vec<MarkerState>,
}

impl<R> From<&Flock<R>> for FrameSnapshot {
    fn from(flock: &Flock<R>) -> Self {
        let world = flock.world();
        Self {
            frame: flock.frame(),
            width: world.width,
            height: world.height,
            boids: flock
                .boids()
                .iter()
                .map(|b| BoidState {
                    position: b.position.into(),
                    velocity: b.velocity.into(),
                })
                .collect(),
            attractors: flock.attractors().iter().map(MarkerState::from).collect(),
            detractors: flock.detractors().iter().map(MarkerState::from).collect(),
        }
    }
}

/// Short summary of a running simulation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StatusResponse {
    pub boid_count: usize,
    pub attractor_count: usize,
    pub detractor_count: usize,
    pub frame: u64,
}

impl<R> From<&Flock<R>> for StatusResponse {
    fn from(flock: &Flock<R>) -> Self {
        Self {
            boid_count: flock.boids().len(),
            attractor_count: flock.attractors().len(),
            detractor_count: flock.detractors().len(),
            frame: flock.frame(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use boid_core::{FlockConfig, World};

    fn flock() -> Flock {
        Flock::with_seed(World::default(), 8, FlockConfig::default(), 42)
    }

    #[test]
    fn test_event_json_shape() {
        let event: SimulationEvent =
            serde_json::from_str(r#"{"type":"place_attractor","x":10.0,"y":20.5}"#).unwrap();
        assert_eq!(event, SimulationEvent::PlaceAttractor { x: 10.0, y: 20.5 });

        let event: SimulationEvent =
            serde_json::from_str(r#"{"type":"set_parameter","name":"wrap_around","value":true}"#)
                .unwrap();
        assert_eq!(
            event,
            SimulationEvent::SetParameter {
                name: "wrap_around".to_string(),
                value: ParamValue::Flag(true),
            }
        );

        let event: SimulationEvent = serde_json::from_str(r#"{"type":"explode"}"#).unwrap();
        assert_eq!(event, SimulationEvent::Explode);

        let json = serde_json::to_value(SimulationEvent::RemoveDetractor { id: MarkerId(3) })
            .unwrap();
        assert_eq!(json, serde_json::json!({"type": "remove_detractor", "id": 3}));
    }

    #[test]
    fn test_apply_events() {
        let mut flock = flock();

        let placed = SimulationEvent::PlaceAttractor { x: 5.0, y: 5.0 }
            .apply(&mut flock)
            .unwrap();
        let EventOutcome::Placed(id) = placed else {
            panic!("expected a placed marker, got {:?}", placed);
        };
        assert_eq!(flock.attractors().len(), 1);

        SimulationEvent::RemoveAttractor { id }
            .apply(&mut flock)
            .unwrap();
        assert!(flock.attractors().is_empty());

        SimulationEvent::SetParameter {
            name: "jitter".to_string(),
            value: ParamValue::Number(0.5),
        }
        .apply(&mut flock)
        .unwrap();
        assert_eq!(flock.config().jitter, 0.5);

        assert_eq!(
            SimulationEvent::Step { dt: 0.1 }.apply(&mut flock),
            Ok(EventOutcome::Applied)
        );
        assert_eq!(flock.frame(), 1);

        assert!(SimulationEvent::Step { dt: -1.0 }.apply(&mut flock).is_err());
        assert!(SimulationEvent::RemoveDetractor { id }
            .apply(&mut flock)
            .is_err());
    }

    #[test]
    fn test_parse_script_orders_by_frame() {
        let script = r#"[
            {"frame": 10, "type": "explode"},
            {"frame": 0, "type": "place_detractor", "x": 1.0, "y": 2.0},
            {"frame": 10, "type": "reset"}
        ]"#;
        let events = parse_script(script).unwrap();
        let frames: Vec<_> = events.iter().map(|e| e.frame).collect();
        assert_eq!(frames, vec![0, 10, 10]);
        assert_eq!(events[1].event, SimulationEvent::Explode);
        assert_eq!(events[2].event, SimulationEvent::Reset);
    }

    #[test]
    fn test_snapshot_from_flock() {
        let mut flock = flock();
        flock.place_attractor(Vector2D::new(1.0, 2.0));
        flock.place_detractor(Vector2D::new(3.0, 4.0));
        flock.step(0.016).unwrap();

        let snapshot = FrameSnapshot::from(&flock);
        assert_eq!(snapshot.frame, 1);
        assert_eq!(snapshot.width, 900.0);
        assert_eq!(snapshot.boids.len(), 8);
        assert_eq!(
            snapshot.boids[0].position,
            Position::from(flock.boids()[0].position)
        );
        assert_eq!(snapshot.attractors[0].position, Position::new(1.0, 2.0));
        assert_eq!(snapshot.detractors[0].position, Position::new(3.0, 4.0));

        let status = StatusResponse::from(&flock);
        assert_eq!(status.boid_count, 8);
        assert_eq!(status.attractor_count, 1);
        assert_eq!(status.detractor_count, 1);
    }
}
