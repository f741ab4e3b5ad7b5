//! Shape generation for 2D primitives
//!
//! All output is in world coordinates; the pipeline maps it through the
//! camera bounds.

use glam::Vec2;
use std::f32::consts::PI;

use super::vertex::Vertex;
use crate::sim::{ShipPose, StepOutput};
use crate::world::{WorldShape, colors};

/// Flame length per unit of thrust (engine units)
const FLAME_LENGTH_PER_FORCE: f32 = 2500.0;
/// Half-width of a flame at the nozzle
const FLAME_HALF_WIDTH: f32 = 4.0;
const CIRCLE_SEGMENTS: u32 = 24;

/// Generate vertices for a convex polygon (triangle fan from the first corner)
pub fn polygon(points: &[Vec2], color: [f32; 4]) -> Vec<Vertex> {
    if points.len() < 3 {
        return Vec::new();
    }

    let mut vertices = Vec::with_capacity((points.len() - 2) * 3);
    for pair in points[1..].windows(2) {
        vertices.push(Vertex::at(points[0], color));
        vertices.push(Vertex::at(pair[0], color));
        vertices.push(Vertex::at(pair[1], color));
    }
    vertices
}

/// Generate vertices for a filled circle
pub fn circle(center: Vec2, radius: f32, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 3) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        // Triangle from center to edge
        vertices.push(Vertex::at(center, color));
        vertices.push(Vertex::at(center + Vec2::from_angle(theta1) * radius, color));
        vertices.push(Vertex::at(center + Vec2::from_angle(theta2) * radius, color));
    }

    vertices
}

/// Generate vertices for terrain: one quad per surface segment down to the floor
pub fn ground(surface: &[Vec2], floor: f32, color: [f32; 4]) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity(surface.len().saturating_sub(1) * 6);

    for pair in surface.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        let a_floor = Vec2::new(a.x, floor);
        let b_floor = Vec2::new(b.x, floor);

        // Two triangles
        vertices.push(Vertex::at(a, color));
        vertices.push(Vertex::at(b, color));
        vertices.push(Vertex::at(a_floor, color));

        vertices.push(Vertex::at(b, color));
        vertices.push(Vertex::at(b_floor, color));
        vertices.push(Vertex::at(a_floor, color));
    }

    vertices
}

/// Exhaust triangles pointing away from each active nozzle force
pub fn flames(pose: &ShipPose, step: &StepOutput) -> Vec<Vertex> {
    let mut vertices = Vec::new();

    for force in [step.left, step.right].into_iter().flatten() {
        let dir = force.normalize_or_zero();
        if dir == Vec2::ZERO {
            continue;
        }
        let side = dir.perp() * FLAME_HALF_WIDTH;
        let tip = pose.thruster - dir * force.length() * FLAME_LENGTH_PER_FORCE;

        vertices.push(Vertex::at(pose.thruster + side, colors::FLAME));
        vertices.push(Vertex::at(pose.thruster - side, colors::FLAME));
        vertices.push(Vertex::at(tip, colors::FLAME));
    }

    vertices
}

/// Triangulate every shape in draw order
pub fn scene_vertices(shapes: &[WorldShape]) -> Vec<Vertex> {
    let mut vertices = Vec::new();
    for shape in shapes {
        match shape {
            WorldShape::Polygon { points, color } => vertices.extend(polygon(points, *color)),
            WorldShape::Circle {
                center,
                radius,
                color,
            } => vertices.extend(circle(*center, *radius, *color, CIRCLE_SEGMENTS)),
            WorldShape::Ground {
                surface,
                floor,
                color,
            } => vertices.extend(ground(surface, *floor, *color)),
        }
    }
    vertices
}

#[cfg(test)]
mod tests {
    use super::*;

    const WHITE: [f32; 4] = [1.0; 4];

    #[test]
    fn test_quad_is_two_triangles() {
        let quad = [
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 0.0),
            Vec2::new(10.0, 10.0),
            Vec2::new(0.0, 10.0),
        ];
        let v = polygon(&quad, WHITE);
        assert_eq!(v.len(), 6);
        assert!(polygon(&quad[..2], WHITE).is_empty());
    }

    #[test]
    fn test_circle_vertex_count() {
        let v = circle(Vec2::new(5.0, 5.0), 2.0, WHITE, 12);
        assert_eq!(v.len(), 36);
        for vert in v.iter().skip(1).step_by(3) {
            assert!(((vert.pos() - Vec2::new(5.0, 5.0)).length() - 2.0).abs() < 1e-4);
        }
    }

    #[test]
    fn test_ground_reaches_floor() {
        let surface = [Vec2::new(0.0, 50.0), Vec2::new(20.0, 40.0), Vec2::new(40.0, 60.0)];
        let v = ground(&surface, 100.0, WHITE);
        assert_eq!(v.len(), 12);
        let max_y = v.iter().map(|v| v.position[1]).fold(f32::MIN, f32::max);
        assert_eq!(max_y, 100.0);
        assert!(ground(&surface[..1], 100.0, WHITE).is_empty());
    }

    #[test]
    fn test_flames_only_for_active_nozzles() {
        let pose = ShipPose {
            position: Vec2::new(0.0, 0.0),
            angle: 0.0,
            thruster: Vec2::new(0.0, 17.5),
        };
        let idle = StepOutput {
            left: None,
            right: None,
            point: pose.thruster,
            camera_delta: Vec2::ZERO,
        };
        assert!(flames(&pose, &idle).is_empty());

        let burn = StepOutput {
            left: Some(Vec2::new(0.0, -0.008)),
            ..idle
        };
        let v = flames(&pose, &burn);
        assert_eq!(v.len(), 3);
        // Exhaust points down, away from the upward force
        assert!(v[2].position[1] > pose.thruster.y);
    }
}
