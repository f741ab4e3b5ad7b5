//! Game settings and tuning
//!
//! Persisted in LocalStorage as JSON. Every field has a default, so a saved
//! blob from an older build still loads.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;
use crate::sim::{Bounds, TerrainError, TerrainParams, ThrustTuning};

/// Settings that failed to load
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("settings JSON is malformed: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("terrain settings rejected: {0}")]
    Terrain(#[from] TerrainError),

    #[error("setting {field} out of range: {value}")]
    Physics { field: &'static str, value: f32 },

    #[error("initial view must have a finite, positive size")]
    EmptyView,
}

/// Which world to build around the ship
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum SceneKind {
    /// Walled 800x600 box with crates to knock around
    #[default]
    Sandbox,
    /// One generated terrain chunk
    Terrain,
}

impl SceneKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SceneKind::Sandbox => "sandbox",
            SceneKind::Terrain => "terrain",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "sandbox" | "box" => Some(SceneKind::Sandbox),
            "terrain" | "land" => Some(SceneKind::Terrain),
            _ => None,
        }
    }
}

/// Physics engine tuning, in engine units (px, ms)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsTuning {
    /// Ticks per second
    pub fps: f32,
    /// Simulated time per real time
    pub time_scale: f32,
    pub gravity_y: f32,
    pub gravity_scale: f32,
    /// Fraction of velocity lost per step
    pub air_friction: f32,
    /// Contact friction coefficient
    pub friction: f32,
}

impl Default for PhysicsTuning {
    fn default() -> Self {
        Self {
            fps: TARGET_FPS,
            time_scale: TIME_SCALE,
            gravity_y: GRAVITY_Y,
            gravity_scale: GRAVITY_SCALE,
            air_friction: AIR_FRICTION,
            friction: SURFACE_FRICTION,
        }
    }
}

impl PhysicsTuning {
    /// Simulated seconds per tick
    pub fn dt(&self) -> f32 {
        self.time_scale / self.fps
    }

    /// Gravity acceleration in px/s²
    pub fn gravity(&self) -> Vec2 {
        Vec2::new(0.0, self.gravity_y * self.gravity_scale * MS2_TO_S2)
    }

    /// Continuous damping that removes `air_friction` of the velocity per
    /// scaled step
    pub fn damping(&self) -> f32 {
        self.air_friction * self.time_scale / self.dt()
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub thrust: ThrustTuning,
    pub physics: PhysicsTuning,
    pub terrain: TerrainParams,
    pub scene: SceneKind,
    /// Region fitted to the canvas at startup
    pub view: Bounds,
    /// Fixed terrain seed; None draws one from the clock
    pub terrain_seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            thrust: ThrustTuning::default(),
            physics: PhysicsTuning::default(),
            terrain: TerrainParams::default(),
            scene: SceneKind::default(),
            view: Bounds::new(Vec2::ZERO, Vec2::new(400.0, 600.0)),
            terrain_seed: None,
        }
    }
}

impl Settings {
    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "lander_settings";

    /// Parse and validate settings JSON
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        let p = &self.physics;
        let t = &self.thrust;
        for (field, value, ok) in [
            ("fps", p.fps, p.fps > 0.0),
            ("time_scale", p.time_scale, p.time_scale > 0.0),
            ("gravity_y", p.gravity_y, true),
            ("gravity_scale", p.gravity_scale, p.gravity_scale >= 0.0),
            ("air_friction", p.air_friction, (0.0..1.0).contains(&p.air_friction)),
            ("friction", p.friction, p.friction >= 0.0),
            ("thrust.magnitude", t.magnitude, t.magnitude >= 0.0),
            ("thrust.throw_angle", t.throw_angle, true),
        ] {
            if !(value.is_finite() && ok) {
                return Err(SettingsError::Physics { field, value });
            }
        }

        self.terrain.validate()?;

        let size = self.view.size();
        let finite = self.view.min.is_finite() && self.view.max.is_finite();
        if !(finite && size.x > 0.0 && size.y > 0.0 && size.is_finite()) {
            return Err(SettingsError::EmptyView);
        }
        Ok(())
    }

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings;
                    }
                    Err(e) => log::warn!("Ignoring saved settings: {}", e),
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            match self.to_json() {
                Ok(json) => {
                    let _ = storage.set_item(Self::STORAGE_KEY, &json);
                    log::info!("Settings saved");
                }
                Err(e) => log::warn!("Settings not saved: {}", e),
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        let settings = Settings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.scene, SceneKind::Sandbox);
        assert_eq!(settings.thrust.magnitude, 0.008);
        assert_eq!(settings.thrust.throw_angle, 0.28);
    }

    #[test]
    fn test_json_roundtrip_keeps_overrides() {
        let mut settings = Settings::default();
        settings.scene = SceneKind::Terrain;
        settings.terrain_seed = Some(1234);
        settings.thrust.magnitude = 0.01;

        let json = settings.to_json().unwrap();
        let loaded = Settings::from_json(&json).unwrap();
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let loaded = Settings::from_json(r#"{ "scene": "Terrain" }"#).unwrap();
        assert_eq!(loaded.scene, SceneKind::Terrain);
        assert_eq!(loaded.physics, PhysicsTuning::default());
        assert_eq!(loaded.terrain, TerrainParams::default());
    }

    #[test]
    fn test_bad_json_rejected() {
        assert!(matches!(
            Settings::from_json("{ not json"),
            Err(SettingsError::Parse(_))
        ));
    }

    #[test]
    fn test_bad_values_rejected() {
        let mut settings = Settings::default();
        settings.physics.fps = 0.0;
        assert!(matches!(
            settings.validate(),
            Err(SettingsError::Physics { field: "fps", .. })
        ));

        let mut settings = Settings::default();
        settings.terrain.granularity = -5.0;
        assert!(matches!(settings.validate(), Err(SettingsError::Terrain(_))));

        let mut settings = Settings::default();
        settings.view = Bounds::new(Vec2::ZERO, Vec2::ZERO);
        assert!(matches!(settings.validate(), Err(SettingsError::EmptyView)));
    }

    #[test]
    fn test_overflowing_numbers_rejected() {
        // 1e39 does not fit in f32 and parses to infinity
        for (json, bad_field) in [
            (r#"{ "physics": { "gravity_y": 1e39 } }"#, "gravity_y"),
            (r#"{ "thrust": { "magnitude": 1e39 } }"#, "thrust.magnitude"),
            (r#"{ "thrust": { "throw_angle": -1e39 } }"#, "thrust.throw_angle"),
        ] {
            match Settings::from_json(json) {
                Err(SettingsError::Physics { field, .. }) => assert_eq!(field, bad_field),
                other => panic!("{} should be rejected, got {:?}", json, other),
            }
        }

        let mut settings = Settings::default();
        settings.view = Bounds::new(Vec2::ZERO, Vec2::new(f32::INFINITY, 600.0));
        assert!(matches!(settings.validate(), Err(SettingsError::EmptyView)));
    }

    #[test]
    fn test_scene_names() {
        assert_eq!(SceneKind::from_str("Terrain"), Some(SceneKind::Terrain));
        assert_eq!(SceneKind::from_str("box"), Some(SceneKind::Sandbox));
        assert_eq!(SceneKind::from_str("moon"), None);
        assert_eq!(SceneKind::from_str(SceneKind::Terrain.as_str()), Some(SceneKind::Terrain));
    }

    #[test]
    fn test_physics_conversions() {
        let physics = PhysicsTuning::default();
        assert!((physics.dt() - 0.5 / 60.0).abs() < 1e-7);
        // 0.001 px/ms² = 1000 px/s²
        assert!((physics.gravity().y - 1000.0).abs() < 1e-2);
        // 0.01 * 0.5 per 1/120 s step
        assert!((physics.damping() - 0.6).abs() < 1e-4);
    }
}
