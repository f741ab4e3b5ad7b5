//! Physics-backed game world
//!
//! Owns the rapier2d state and is the only place that mutates it. Each tick
//! reads the ship pose, runs the pure `sim::step`, applies its output and
//! steps the engine.

pub mod physics;
pub mod scene;

pub use physics::PhysicsWorld;
pub use scene::{BodyVisual, PartShape, PartVisual, SceneBuilder, Ship, colors};

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use rapier2d::prelude::Vector;

use crate::consts::{MS2_TO_S2, SHIP_HULL, SHIP_THRUSTER};
use crate::rotate;
use crate::settings::{SceneKind, Settings};
use crate::sim::{
    Bounds, InputState, ShipPose, StepOutput, TerrainError, TerrainProfile, ThrustTuning,
    generate_terrain, step,
};

/// Vertical gap kept between a spawning ship and the terrain below it
const SPAWN_CLEARANCE: f32 = 150.0;

/// A drawable shape in world space
#[derive(Debug, Clone, PartialEq)]
pub enum WorldShape {
    /// Convex polygon, corners in order
    Polygon { points: [Vec2; 4], color: [f32; 4] },
    Circle { center: Vec2, radius: f32, color: [f32; 4] },
    Ground { surface: Vec<Vec2>, floor: f32, color: [f32; 4] },
}

/// Complete game world
pub struct World {
    pub physics: PhysicsWorld,
    pub ship: Ship,
    pub visuals: Vec<BodyVisual>,
    /// Generated chunk, terrain scenes only
    pub terrain: Option<TerrainProfile>,
    /// Output of the most recent tick
    pub last_step: Option<StepOutput>,
    pub tick_count: u64,
}

impl World {
    /// Build the configured scene. `seed` feeds the terrain generator.
    pub fn new(settings: &Settings, seed: u64) -> Result<Self, TerrainError> {
        let mut physics = PhysicsWorld::new(&settings.physics);
        let mut builder = SceneBuilder::new(&mut physics, &settings.physics);

        let mut hull = SHIP_HULL;
        let mut thruster = SHIP_THRUSTER;

        let terrain = match settings.scene {
            SceneKind::Sandbox => {
                builder.sandbox();
                None
            }
            SceneKind::Terrain => {
                let mut rng = Pcg32::seed_from_u64(seed);
                let profile = generate_terrain(&settings.terrain, &mut rng)?;
                builder.terrain(&profile);

                // Lift the ship if the ground under it rose too high
                let ground = profile.surface_height_at(hull[0]);
                let ship_bottom = thruster[1] + thruster[3] / 2.0;
                let lift = (ship_bottom - (ground - SPAWN_CLEARANCE)).max(0.0);
                hull[1] -= lift;
                thruster[1] -= lift;
                Some(profile)
            }
        };

        let ship = builder.ship(hull, thruster);
        let visuals = builder.finish();

        log::info!(
            "World built: scene={}, bodies={}, colliders={}",
            settings.scene.as_str(),
            physics.rigid_body_set.len(),
            physics.collider_set.len()
        );

        Ok(Self {
            physics,
            ship,
            visuals,
            terrain,
            last_step: None,
            tick_count: 0,
        })
    }

    /// Ship origin, heading and thruster position as the engine sees them now
    pub fn ship_pose(&self) -> ShipPose {
        let (position, angle) = self
            .physics
            .pose(self.ship.body)
            .unwrap_or((Vec2::ZERO, 0.0));
        ShipPose {
            position,
            angle,
            thruster: position + rotate(self.ship.thruster_offset, angle),
        }
    }

    /// Push a step's forces into the engine.
    ///
    /// rapier keeps user forces until reset, so last tick's thrust is cleared
    /// first; forces act for exactly one tick.
    pub fn apply(&mut self, out: &StepOutput) {
        let Some(body) = self.physics.rigid_body_set.get_mut(self.ship.body) else {
            return;
        };
        body.reset_forces(false);

        if out.is_thrusting() {
            let force = out.total_force() * MS2_TO_S2;
            body.add_force_at_point(
                Vector::new(force.x, force.y),
                Vector::new(out.point.x, out.point.y),
                true,
            );
        }
    }

    /// One tick: read pose, compute thrust and camera, apply, step the engine.
    ///
    /// The camera is moved before the engine steps, so it shows the pose the
    /// forces were computed from.
    pub fn tick(
        &mut self,
        input: &InputState,
        camera: &mut Bounds,
        tuning: &ThrustTuning,
    ) -> StepOutput {
        let pose = self.ship_pose();
        let out = step(input, &pose, camera, tuning);

        self.apply(&out);
        camera.translate(out.camera_delta);
        self.physics.step();

        self.tick_count += 1;
        self.last_step = Some(out);
        log::trace!(
            "tick {}: ship=({:.1}, {:.1}) angle={:.3} thrust={:?}",
            self.tick_count,
            pose.position.x,
            pose.position.y,
            pose.angle,
            out.total_force()
        );
        out
    }

    /// Every body part as a world-space shape, in build order
    pub fn shapes(&self) -> Vec<WorldShape> {
        let mut shapes = Vec::new();
        for visual in &self.visuals {
            let Some((origin, angle)) = self.physics.pose(visual.body) else {
                continue;
            };
            let to_world = |local: Vec2| origin + rotate(local, angle);

            for part in &visual.parts {
                match &part.shape {
                    PartShape::Rect { half } => {
                        let corners = [
                            Vec2::new(-half.x, -half.y),
                            Vec2::new(half.x, -half.y),
                            Vec2::new(half.x, half.y),
                            Vec2::new(-half.x, half.y),
                        ];
                        shapes.push(WorldShape::Polygon {
                            points: corners.map(|c| to_world(part.offset + c)),
                            color: part.color,
                        });
                    }
                    PartShape::Circle { radius } => shapes.push(WorldShape::Circle {
                        center: to_world(part.offset),
                        radius: *radius,
                        color: part.color,
                    }),
                    // Terrain is fixed at the origin, drawn as authored
                    PartShape::Ground { surface, floor } => shapes.push(WorldShape::Ground {
                        surface: surface.iter().map(|p| *p + origin).collect(),
                        floor: *floor + origin.y,
                        color: part.color,
                    }),
                }
            }
        }
        shapes
    }
}
