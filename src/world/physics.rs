//! rapier2d state bundle
//!
//! All engine sets and pipelines live in one struct so the game can own a
//! single value and step it once per tick.

use glam::Vec2;
use rapier2d::prelude::*;

use crate::settings::PhysicsTuning;

/// rapier2d world in pixel units, y down
pub struct PhysicsWorld {
    /// Gravity in px/s²
    pub gravity: Vector,
    /// Timestep and solver configuration
    pub integration_parameters: IntegrationParameters,
    pub physics_pipeline: PhysicsPipeline,
    pub island_manager: IslandManager,
    pub broad_phase: BroadPhaseBvh,
    pub narrow_phase: NarrowPhase,
    pub rigid_body_set: RigidBodySet,
    pub collider_set: ColliderSet,
    pub impulse_joint_set: ImpulseJointSet,
    pub multibody_joint_set: MultibodyJointSet,
    pub ccd_solver: CCDSolver,
}

/// Typical body size in px, tells the solver what "small" means
const LENGTH_UNIT: f32 = 50.0;

impl PhysicsWorld {
    pub fn new(tuning: &PhysicsTuning) -> Self {
        let integration_parameters = IntegrationParameters {
            dt: tuning.dt(),
            length_unit: LENGTH_UNIT,
            ..Default::default()
        };
        let g = tuning.gravity();

        Self {
            gravity: Vector::new(g.x, g.y),
            integration_parameters,
            physics_pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: BroadPhaseBvh::new(),
            narrow_phase: NarrowPhase::new(),
            rigid_body_set: RigidBodySet::new(),
            collider_set: ColliderSet::new(),
            impulse_joint_set: ImpulseJointSet::new(),
            multibody_joint_set: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
        }
    }

    /// Advance by one fixed timestep
    pub fn step(&mut self) {
        self.physics_pipeline.step(
            self.gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.rigid_body_set,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            &mut self.ccd_solver,
            &(),
            &(),
        );
    }

    /// Insert a body and attach its colliders
    pub fn insert(&mut self, body: RigidBody, colliders: Vec<Collider>) -> RigidBodyHandle {
        let handle = self.rigid_body_set.insert(body);
        for collider in colliders {
            self.collider_set
                .insert_with_parent(collider, handle, &mut self.rigid_body_set);
        }
        handle
    }

    /// Body origin and heading, None for stale handles
    pub fn pose(&self, handle: RigidBodyHandle) -> Option<(Vec2, f32)> {
        let body = self.rigid_body_set.get(handle)?;
        let t = body.translation();
        Some((Vec2::new(t.x, t.y), body.rotation().angle()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_physics_world_initializes() {
        let world = PhysicsWorld::new(&PhysicsTuning::default());
        assert_eq!(world.rigid_body_set.len(), 0);
        assert_eq!(world.collider_set.len(), 0);
        assert!((world.gravity.y - 1000.0).abs() < 1e-2);
        assert_eq!(world.gravity.x, 0.0);
    }

    #[test]
    fn test_timestep_follows_time_scale() {
        let world = PhysicsWorld::new(&PhysicsTuning::default());
        let expected = 0.5_f32 / 60.0;
        assert!(
            (world.integration_parameters.dt - expected).abs() < f32::EPSILON,
            "dt={} expected={}",
            world.integration_parameters.dt,
            expected
        );
    }

    #[test]
    fn test_dynamic_body_falls_down_screen() {
        let mut world = PhysicsWorld::new(&PhysicsTuning::default());
        let body = RigidBodyBuilder::dynamic()
            .translation(Vector::new(0.0, 100.0))
            .build();
        let handle = world.insert(body, vec![ColliderBuilder::ball(5.0).build()]);

        for _ in 0..60 {
            world.step();
        }

        let (pos, _) = world.pose(handle).unwrap();
        assert!(pos.y > 100.0, "Body should have fallen (y down): y={}", pos.y);
    }

    #[test]
    fn test_empty_world_steps_without_error() {
        let mut world = PhysicsWorld::new(&PhysicsTuning::default());
        for _ in 0..100 {
            world.step();
        }
    }
}
