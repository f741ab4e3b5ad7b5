//! Scene assembly
//!
//! Builds rapier bodies for the ship and the surrounding world, and records
//! how each part should be drawn. Rect parts are given the way level layouts
//! read naturally: centre x, centre y, width, height.

use glam::Vec2;
use rapier2d::prelude::*;

use super::physics::PhysicsWorld;
use crate::consts::*;
use crate::rect_centroid;
use crate::settings::PhysicsTuning;
use crate::sim::TerrainProfile;

/// Colors for scene elements
pub mod colors {
    pub const HULL: [f32; 4] = [0.933, 0.933, 0.933, 1.0];
    pub const THRUSTER: [f32; 4] = [0.933, 0.008, 0.008, 1.0];
    pub const FLAME: [f32; 4] = [1.0, 0.6, 0.1, 0.9];
    pub const STATIC: [f32; 4] = [0.024, 0.039, 0.098, 1.0];
    pub const WALL: [f32; 4] = [0.18, 0.2, 0.26, 1.0];
    pub const GROUND: [f32; 4] = [0.35, 0.3, 0.27, 1.0];
    pub const BACKGROUND: [f32; 4] = [0.08, 0.09, 0.12, 1.0];
    /// Cycled through for loose props
    pub const PROPS: [[f32; 4]; 5] = [
        [0.33, 0.54, 0.78, 1.0],
        [0.78, 0.46, 0.25, 1.0],
        [0.45, 0.72, 0.42, 1.0],
        [0.76, 0.36, 0.55, 1.0],
        [0.86, 0.78, 0.35, 1.0],
    ];
}

/// Shape of one drawable part, in body-local coordinates
#[derive(Debug, Clone, PartialEq)]
pub enum PartShape {
    Rect { half: Vec2 },
    Circle { radius: f32 },
    /// Surface line filled down to `floor`
    Ground { surface: Vec<Vec2>, floor: f32 },
}

/// One drawable part attached to a body
#[derive(Debug, Clone, PartialEq)]
pub struct PartVisual {
    pub offset: Vec2,
    pub shape: PartShape,
    pub color: [f32; 4],
}

/// Drawable parts of one body
#[derive(Debug, Clone)]
pub struct BodyVisual {
    pub body: RigidBodyHandle,
    pub parts: Vec<PartVisual>,
}

/// Handles the game needs after the scene is built
#[derive(Debug, Clone, Copy)]
pub struct Ship {
    pub body: RigidBodyHandle,
    /// Thruster centre relative to the body origin
    pub thruster_offset: Vec2,
}

/// Builds bodies into a physics world and collects their visuals
pub struct SceneBuilder<'a> {
    physics: &'a mut PhysicsWorld,
    damping: f32,
    friction: f32,
    visuals: Vec<BodyVisual>,
    prop_count: usize,
}

impl<'a> SceneBuilder<'a> {
    pub fn new(physics: &'a mut PhysicsWorld, tuning: &PhysicsTuning) -> Self {
        Self {
            physics,
            damping: tuning.damping(),
            friction: tuning.friction,
            visuals: Vec::new(),
            prop_count: 0,
        }
    }

    pub fn finish(self) -> Vec<BodyVisual> {
        self.visuals
    }

    fn next_prop_color(&mut self) -> [f32; 4] {
        let color = colors::PROPS[self.prop_count % colors::PROPS.len()];
        self.prop_count += 1;
        color
    }

    fn body_builder(&self, is_static: bool, origin: Vec2) -> RigidBodyBuilder {
        let builder = if is_static {
            RigidBodyBuilder::fixed()
        } else {
            RigidBodyBuilder::dynamic()
                .linear_damping(self.damping)
                .angular_damping(self.damping)
        };
        builder.translation(Vector::new(origin.x, origin.y))
    }

    /// Body made of rectangles, origin at their area-weighted centroid.
    ///
    /// `place_at` moves the whole body so its centroid lands there.
    fn compound(
        &mut self,
        parts: &[([f32; 4], [f32; 4])],
        is_static: bool,
        place_at: Option<Vec2>,
        density: f32,
    ) -> RigidBodyHandle {
        let rects: Vec<[f32; 4]> = parts.iter().map(|(r, _)| *r).collect();
        let centroid = rect_centroid(&rects);
        let origin = place_at.unwrap_or(centroid);

        let mut colliders = Vec::with_capacity(parts.len());
        let mut visuals = Vec::with_capacity(parts.len());
        for &([cx, cy, w, h], color) in parts {
            let offset = Vec2::new(cx, cy) - centroid;
            let half = Vec2::new(w, h) / 2.0;
            colliders.push(
                ColliderBuilder::cuboid(half.x, half.y)
                    .translation(Vector::new(offset.x, offset.y))
                    .density(density)
                    .friction(self.friction)
                    .restitution(0.0)
                    .build(),
            );
            visuals.push(PartVisual {
                offset,
                shape: PartShape::Rect { half },
                color,
            });
        }

        let body = self.body_builder(is_static, origin).build();
        let handle = self.physics.insert(body, colliders);
        self.visuals.push(BodyVisual {
            body: handle,
            parts: visuals,
        });
        handle
    }

    /// Single rectangle body
    pub fn rect(
        &mut self,
        rect: [f32; 4],
        is_static: bool,
        color: Option<[f32; 4]>,
    ) -> RigidBodyHandle {
        let color = match color {
            Some(c) => c,
            None if is_static => colors::WALL,
            None => self.next_prop_color(),
        };
        self.compound(&[(rect, color)], is_static, None, DEFAULT_DENSITY)
    }

    /// Single circle body
    pub fn circle(
        &mut self,
        center: Vec2,
        radius: f32,
        color: Option<[f32; 4]>,
    ) -> RigidBodyHandle {
        let color = color.unwrap_or_else(|| self.next_prop_color());
        let collider = ColliderBuilder::ball(radius)
            .density(DEFAULT_DENSITY)
            .friction(self.friction)
            .restitution(0.0)
            .build();
        let body = self.body_builder(false, center).build();
        let handle = self.physics.insert(body, vec![collider]);
        self.visuals.push(BodyVisual {
            body: handle,
            parts: vec![PartVisual {
                offset: Vec2::ZERO,
                shape: PartShape::Circle { radius },
                color,
            }],
        });
        handle
    }

    /// Two-part ship: hull with the thruster nozzle fixed underneath
    pub fn ship(&mut self, hull: [f32; 4], thruster: [f32; 4]) -> Ship {
        let centroid = rect_centroid(&[hull, thruster]);
        let body = self.compound(
            &[(hull, colors::HULL), (thruster, colors::THRUSTER)],
            false,
            None,
            SHIP_DENSITY,
        );
        Ship {
            body,
            thruster_offset: Vec2::new(thruster[0], thruster[1]) - centroid,
        }
    }

    /// Static terrain chunk as a closed outline
    pub fn terrain(&mut self, profile: &TerrainProfile) -> RigidBodyHandle {
        let vertices: Vec<Vector> = profile
            .vertices
            .iter()
            .map(|v| Vector::new(v.x, v.y))
            .collect();
        let collider = ColliderBuilder::polyline(vertices, Some(profile.edges()))
            .friction(self.friction)
            .restitution(0.0)
            .build();

        let body = self.body_builder(true, Vec2::ZERO).build();
        let handle = self.physics.insert(body, vec![collider]);
        self.visuals.push(BodyVisual {
            body: handle,
            parts: vec![PartVisual {
                offset: Vec2::ZERO,
                shape: PartShape::Ground {
                    surface: profile.surface().to_vec(),
                    floor: profile.params.chunk_height,
                },
                color: colors::GROUND,
            }],
        });
        handle
    }

    /// Walled 800x600 play box with crates, a ball and an L-shaped fixture
    pub fn sandbox(&mut self) {
        // Walls
        for wall in [
            [400.0, 0.0, 800.0, 50.0],
            [400.0, 600.0, 800.0, 50.0],
            [800.0, 300.0, 50.0, 600.0],
            [0.0, 300.0, 50.0, 600.0],
        ] {
            self.rect(wall, true, None);
        }

        // Anchored crate plus loose ones
        self.rect([100.0, 300.0, 50.0, 50.0], true, Some(colors::STATIC));
        for x in [200.0, 300.0, 400.0, 550.0, 700.0] {
            self.rect([x, 200.0, 50.0, 50.0], false, None);
        }
        self.circle(Vec2::new(400.0, 100.0), 25.0, Some(colors::STATIC));

        // Static compound, laid out at y=200 then moved to (600, 300)
        self.compound(
            &[
                ([600.0, 200.0, 120.0 * 0.8, 50.0 * 0.8], colors::STATIC),
                ([660.0, 200.0, 50.0 * 0.8, 190.0 * 0.8], colors::STATIC),
            ],
            true,
            Some(Vec2::new(600.0, 300.0)),
            DEFAULT_DENSITY,
        );
    }
}
