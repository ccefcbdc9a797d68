use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use glam::Vec3;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::biome::Palette;
use crate::error::{PlanetError, Result};
use crate::icosphere::MAX_SUBDIVISIONS;
use crate::noise::{NoiseKind, NoiseProvider};
use crate::terrain::{TerrainShape, WaterLevel};

/// Seeded scatter density.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeConfig {
    /// Number of candidate placements; rejected ones are dropped.
    pub density: u32,
    pub seed: u64,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            density: 600,
            seed: 1,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CloudConfig {
    pub density: u32,
    pub seed: u64,
    /// Height of the cloud layer above the local ground.
    pub altitude: f32,
}

impl Default for CloudConfig {
    fn default() -> Self {
        Self {
            density: 40,
            seed: 2,
            altitude: 0.25,
        }
    }
}

/// Every knob that shapes a planet. Missing fields take their defaults, so
/// older world codes keep decoding as new options are added.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PlanetConfig {
    /// Icosphere subdivision level.
    pub resolution: i32,
    pub noise_type: NoiseKind,
    /// Displacement amplitude.
    pub noise_strength: f32,
    /// Spatial frequency multiplier.
    pub noise_freq: f32,
    /// Sphere radius separating ocean from land. Also the floor the ocean
    /// bed is clamped to, which keeps the sea surface smooth.
    pub water_level: f32,
    /// Depth at which water is shaded fully deep.
    #[serde(alias = "maxDepth")]
    pub deep_water_threshold: f32,
    pub palette: Palette,
    pub trees: TreeConfig,
    pub clouds: CloudConfig,
}

impl Default for PlanetConfig {
    fn default() -> Self {
        Self {
            resolution: 5,
            noise_type: NoiseKind::Gradient,
            noise_strength: 0.1,
            noise_freq: 2.0,
            water_level: 1.0,
            deep_water_threshold: 0.05,
            palette: Palette::default(),
            trees: TreeConfig::default(),
            clouds: CloudConfig::default(),
        }
    }
}

impl PlanetConfig {
    /// Displacement parameters shared by every terrain stage.
    pub fn shape(&self) -> TerrainShape {
        TerrainShape {
            strength: self.noise_strength,
            frequency: self.noise_freq,
            min_deformation: self.water_level,
        }
    }

    pub fn water(&self) -> WaterLevel {
        WaterLevel {
            level: self.water_level,
            max_depth: self.deep_water_threshold,
        }
    }

    /// Reject values no generation stage can work with.
    pub fn validate(&self) -> Result<()> {
        if !(0..=MAX_SUBDIVISIONS).contains(&self.resolution) {
            return Err(PlanetError::InvalidArgument(format!(
                "resolution must be in 0..={MAX_SUBDIVISIONS}, got {}",
                self.resolution
            )));
        }
        let finite = [
            ("noiseStrength", self.noise_strength),
            ("noiseFreq", self.noise_freq),
            ("waterLevel", self.water_level),
            ("cloud altitude", self.clouds.altitude),
        ];
        if let Some((name, v)) = finite.iter().find(|(_, v)| !v.is_finite()) {
            return Err(PlanetError::InvalidArgument(format!(
                "{name} must be finite, got {v}"
            )));
        }
        if self.deep_water_threshold.is_nan() || self.deep_water_threshold <= 0.0 {
            return Err(PlanetError::InvalidArgument(format!(
                "deepWaterThreshold must be positive, got {}",
                self.deep_water_threshold
            )));
        }
        if self.noise_freq <= 0.0 {
            return Err(PlanetError::InvalidArgument(format!(
                "noiseFreq must be positive, got {}",
                self.noise_freq
            )));
        }
        Ok(())
    }
}

/// A reproducible planet: seed, configuration and user-planted objects.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct World {
    pub seed: String,
    pub config: PlanetConfig,
    /// Surface points where the user planted trees.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub planted: Vec<Vec3>,
}

impl World {
    pub fn new(seed: impl Into<String>, config: PlanetConfig) -> Result<Self> {
        let seed = seed.into();
        if seed.trim().is_empty() {
            return Err(PlanetError::InvalidArgument("seed must not be empty".into()));
        }
        config.validate()?;
        Ok(Self {
            seed,
            config,
            planted: Vec::new(),
        })
    }

    /// The noise field this world's terrain is sampled from.
    pub fn noise(&self) -> NoiseProvider {
        NoiseProvider::from_seed_str(self.config.noise_type, &self.seed)
    }

    /// Shareable planet code: Base64 of the world as compact JSON.
    pub fn to_code(&self) -> Result<String> {
        let json = serde_json::to_vec(self)?;
        Ok(STANDARD.encode(json))
    }

    fn decode(code: &str) -> Option<World> {
        let bytes = STANDARD.decode(code).ok()?;
        let world: World = serde_json::from_slice(&bytes).ok()?;
        World::new(world.seed.clone(), world.config.clone())
            .ok()
            .map(|_| world)
    }

    /// Resolve user input into a world.
    ///
    /// A valid planet code restores the exact world. Anything else is taken
    /// as a plain seed with the default configuration.
    pub fn from_code(input: &str) -> Result<Self> {
        let input = input.trim();
        if let Some(world) = Self::decode(input) {
            return Ok(world);
        }
        debug!(input, "not a planet code, using it as a seed");
        Self::new(input, PlanetConfig::default())
    }
}
