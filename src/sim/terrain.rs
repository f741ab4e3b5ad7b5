//! Procedural terrain chunk
//!
//! A chunk is a closed outline: the two bottom corners followed by a
//! random-walk surface sampled every `granularity` px from left to right.
//! Heights use screen coordinates, so larger y is lower ground.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::{CHUNK_HEIGHT, CHUNK_WIDTH, LAND_GRAN, LAND_VARIATION};

/// Invalid chunk parameters
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TerrainError {
    #[error("chunk {field} must be positive and finite, got {value}")]
    NonPositive { field: &'static str, value: f32 },

    #[error("granularity {granularity} is wider than the chunk ({width})")]
    GranularityTooLarge { granularity: f32, width: f32 },

    #[error("height variation must be finite and non-negative, got {0}")]
    BadVariation(f32),

    #[error("chunk {width} wide at granularity {granularity} needs more than {max} samples")]
    TooManySamples {
        width: f32,
        granularity: f32,
        max: usize,
    },
}

/// Upper bound on surface samples per chunk
pub const MAX_SURFACE_SAMPLES: usize = 100_000;

/// Chunk shape parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainParams {
    pub chunk_width: f32,
    pub chunk_height: f32,
    /// Horizontal distance between surface samples
    pub granularity: f32,
    /// Max height change between neighbouring samples
    pub variation: f32,
}

impl Default for TerrainParams {
    fn default() -> Self {
        Self {
            chunk_width: CHUNK_WIDTH,
            chunk_height: CHUNK_HEIGHT,
            granularity: LAND_GRAN,
            variation: LAND_VARIATION,
        }
    }
}

impl TerrainParams {
    pub fn validate(&self) -> Result<(), TerrainError> {
        for (field, value) in [
            ("width", self.chunk_width),
            ("height", self.chunk_height),
            ("granularity", self.granularity),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(TerrainError::NonPositive { field, value });
            }
        }
        if self.granularity > self.chunk_width {
            return Err(TerrainError::GranularityTooLarge {
                granularity: self.granularity,
                width: self.chunk_width,
            });
        }
        if self.chunk_width / self.granularity > MAX_SURFACE_SAMPLES as f32 {
            return Err(TerrainError::TooManySamples {
                width: self.chunk_width,
                granularity: self.granularity,
                max: MAX_SURFACE_SAMPLES,
            });
        }
        if !(self.variation.is_finite() && self.variation >= 0.0) {
            return Err(TerrainError::BadVariation(self.variation));
        }
        Ok(())
    }

    /// Number of surface samples, both ends included
    pub fn sample_count(&self) -> usize {
        (self.chunk_width / self.granularity).floor() as usize + 1
    }
}

/// Generated chunk outline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TerrainProfile {
    pub params: TerrainParams,
    /// Bottom-right corner, bottom-left corner, then the surface left to right
    pub vertices: Vec<Vec2>,
}

impl TerrainProfile {
    /// The two bottom corners
    pub fn corners(&self) -> &[Vec2] {
        self.vertices.get(..2).unwrap_or(&[])
    }

    /// Surface samples, left to right
    pub fn surface(&self) -> &[Vec2] {
        self.vertices.get(2..).unwrap_or(&[])
    }

    /// Surface height at `x` by linear interpolation, clamped to the chunk
    pub fn surface_height_at(&self, x: f32) -> f32 {
        let surface = self.surface();
        let Some(first) = surface.first() else {
            return self.params.chunk_height;
        };
        if x <= first.x {
            return first.y;
        }
        for pair in surface.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            if x <= b.x {
                let t = (x - a.x) / (b.x - a.x);
                return a.y + (b.y - a.y) * t;
            }
        }
        surface.last().map_or(first.y, |p| p.y)
    }

    /// Closed outline as index pairs (for polyline colliders)
    pub fn edges(&self) -> Vec<[u32; 2]> {
        let n = self.vertices.len() as u32;
        (0..n).map(|i| [i, (i + 1) % n]).collect()
    }
}

/// Build a terrain chunk from a random walk.
///
/// The walk starts halfway down the chunk and moves by
/// uniform(-variation, +variation) per sample, clamped inside the chunk.
pub fn generate_terrain<R: Rng>(
    params: &TerrainParams,
    rng: &mut R,
) -> Result<TerrainProfile, TerrainError> {
    params.validate()?;

    let w = params.chunk_width;
    let h = params.chunk_height;
    let samples = params.sample_count();

    let mut vertices = Vec::with_capacity(samples + 2);
    vertices.push(Vec2::new(w, h));
    vertices.push(Vec2::new(0.0, h));

    let mut y = h / 2.0;
    for i in 0..samples {
        if i > 0 {
            let step = if params.variation > 0.0 {
                rng.random_range(-params.variation..=params.variation)
            } else {
                0.0
            };
            y = (y + step).clamp(0.0, h);
        }
        let x = (i as f32 * params.granularity).min(w);
        vertices.push(Vec2::new(x, y));
    }

    log::debug!(
        "Generated terrain chunk {}x{} with {} surface samples",
        w,
        h,
        samples
    );

    Ok(TerrainProfile {
        params: *params,
        vertices,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn chunk(seed: u64) -> TerrainProfile {
        let mut rng = Pcg32::seed_from_u64(seed);
        generate_terrain(&TerrainParams::default(), &mut rng).expect("valid params")
    }

    #[test]
    fn test_default_chunk_layout() {
        let profile = chunk(7);
        let params = TerrainParams {
            chunk_width: 4000.0,
            chunk_height: 1000.0,
            granularity: 20.0,
            variation: LAND_VARIATION,
        };
        assert_eq!(profile.params, params);

        assert_eq!(
            profile.corners(),
            &[Vec2::new(4000.0, 1000.0), Vec2::new(0.0, 1000.0)]
        );
        assert_eq!(profile.surface().len(), 4000 / 20 + 1);
        assert_eq!(profile.vertices.len(), 4000 / 20 + 3);

        for (i, p) in profile.surface().iter().enumerate() {
            assert_eq!(p.x, i as f32 * 20.0);
        }
        assert_eq!(profile.surface()[0].y, 500.0);
        assert_eq!(profile.surface().last().unwrap().x, 4000.0);
    }

    #[test]
    fn test_same_seed_same_chunk() {
        assert_eq!(chunk(42), chunk(42));
        assert_ne!(chunk(42), chunk(43));
    }

    #[test]
    fn test_flat_when_no_variation() {
        let params = TerrainParams {
            variation: 0.0,
            ..Default::default()
        };
        let mut rng = Pcg32::seed_from_u64(1);
        let profile = generate_terrain(&params, &mut rng).unwrap();
        assert!(profile.surface().iter().all(|p| p.y == 500.0));
    }

    #[test]
    fn test_invalid_params() {
        let mut rng = Pcg32::seed_from_u64(1);

        let zero_gran = TerrainParams {
            granularity: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            generate_terrain(&zero_gran, &mut rng),
            Err(TerrainError::NonPositive {
                field: "granularity",
                ..
            })
        ));

        let wide_gran = TerrainParams {
            granularity: 5000.0,
            ..Default::default()
        };
        assert!(matches!(
            generate_terrain(&wide_gran, &mut rng),
            Err(TerrainError::GranularityTooLarge { .. })
        ));

        let bad_var = TerrainParams {
            variation: -1.0,
            ..Default::default()
        };
        assert_eq!(
            generate_terrain(&bad_var, &mut rng),
            Err(TerrainError::BadVariation(-1.0))
        );

        let nan_width = TerrainParams {
            chunk_width: f32::NAN,
            ..Default::default()
        };
        assert!(generate_terrain(&nan_width, &mut rng).is_err());
    }

    #[test]
    fn test_huge_width_rejected() {
        let mut rng = Pcg32::seed_from_u64(1);
        let huge = TerrainParams {
            chunk_width: f32::MAX,
            granularity: 1.0,
            ..Default::default()
        };
        assert!(matches!(
            huge.validate(),
            Err(TerrainError::TooManySamples { .. })
        ));
        assert!(matches!(
            generate_terrain(&huge, &mut rng),
            Err(TerrainError::TooManySamples { .. })
        ));

        // Right at the cap still builds
        let at_cap = TerrainParams {
            chunk_width: MAX_SURFACE_SAMPLES as f32,
            granularity: 1.0,
            variation: 0.0,
            ..Default::default()
        };
        let profile = generate_terrain(&at_cap, &mut rng).unwrap();
        assert_eq!(profile.surface().len(), MAX_SURFACE_SAMPLES + 1);
    }

    #[test]
    fn test_uneven_granularity_ends_inside_chunk() {
        let params = TerrainParams {
            chunk_width: 100.0,
            granularity: 30.0,
            ..Default::default()
        };
        let mut rng = Pcg32::seed_from_u64(9);
        let profile = generate_terrain(&params, &mut rng).unwrap();
        let xs: Vec<f32> = profile.surface().iter().map(|p| p.x).collect();
        assert_eq!(xs, vec![0.0, 30.0, 60.0, 90.0]);
    }

    #[test]
    fn test_surface_height_interpolates() {
        let profile = TerrainProfile {
            params: TerrainParams {
                chunk_width: 40.0,
                chunk_height: 100.0,
                granularity: 20.0,
                variation: 10.0,
            },
            vertices: vec![
                Vec2::new(40.0, 100.0),
                Vec2::new(0.0, 100.0),
                Vec2::new(0.0, 50.0),
                Vec2::new(20.0, 60.0),
                Vec2::new(40.0, 40.0),
            ],
        };
        assert_eq!(profile.surface_height_at(-5.0), 50.0);
        assert!((profile.surface_height_at(10.0) - 55.0).abs() < 1e-5);
        assert!((profile.surface_height_at(30.0) - 50.0).abs() < 1e-5);
        assert_eq!(profile.surface_height_at(100.0), 40.0);
    }

    #[test]
    fn test_edges_close_the_outline() {
        let profile = chunk(3);
        let edges = profile.edges();
        let n = profile.vertices.len() as u32;
        assert_eq!(edges.len(), n as usize);
        assert_eq!(edges[0], [0, 1]);
        assert_eq!(*edges.last().unwrap(), [n - 1, 0]);
    }

    proptest! {
        #[test]
        fn prop_walk_stays_bounded(seed in any::<u64>(), variation in 0.0f32..200.0) {
            let params = TerrainParams { variation, ..Default::default() };
            let mut rng = Pcg32::seed_from_u64(seed);
            let profile = generate_terrain(&params, &mut rng).unwrap();

            for pair in profile.surface().windows(2) {
                let dy = (pair[1].y - pair[0].y).abs();
                prop_assert!(dy <= variation + 1e-3, "dy {} > {}", dy, variation);
            }
            for p in profile.surface() {
                prop_assert!((0.0..=params.chunk_height).contains(&p.y));
            }
        }
    }
}
