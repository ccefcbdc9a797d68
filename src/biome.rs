/// Biome definition, palette and altitude-band selection.
///
/// This module owns the [`Biome`] type and the mapping from terrain height to
/// color:
///  - [`Biome`]       — the seven surface categories.
///  - [`Palette`]     — biome → RGB, serialised with the world snapshot.
///  - [`land_biome`]  — altitude above the waterline → biome band.
///  - [`water_color`] — depth below the waterline → shallow/deep blend.
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Linear RGB, each channel in `[0, 1]`.
pub type Color = [f32; 3];

/// Shown wherever the palette has no entry for a biome.
pub const MISSING_COLOR: Color = [1.0, 0.0, 1.0];

// ── Biome type ────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Biome {
    // ── Water ─────────────────────────────────────────────────────────────────
    DeepWater,
    ShallowWater,
    // ── Land, low to high ─────────────────────────────────────────────────────
    Sand,
    Grass,
    Forest,
    Rock,
    Snow,
}

impl Biome {
    pub const ALL: [Biome; 7] = [
        Biome::DeepWater,
        Biome::ShallowWater,
        Biome::Sand,
        Biome::Grass,
        Biome::Forest,
        Biome::Rock,
        Biome::Snow,
    ];

    pub fn is_water(self) -> bool {
        matches!(self, Biome::DeepWater | Biome::ShallowWater)
    }
}

impl fmt::Display for Biome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Biome::DeepWater => "deepWater",
            Biome::ShallowWater => "shallowWater",
            Biome::Sand => "sand",
            Biome::Grass => "grass",
            Biome::Forest => "forest",
            Biome::Rock => "rock",
            Biome::Snow => "snow",
        };
        f.write_str(s)
    }
}

/// Default biome → RGB colour mapping.
pub fn default_color(b: Biome) -> Color {
    match b {
        // Water
        Biome::DeepWater => [0.02, 0.08, 0.35],
        Biome::ShallowWater => [0.10, 0.40, 0.75],
        // Land
        Biome::Sand => [0.86, 0.82, 0.55],
        Biome::Grass => [0.35, 0.68, 0.25],
        Biome::Forest => [0.10, 0.42, 0.14],
        Biome::Rock => [0.48, 0.44, 0.40],
        Biome::Snow => [0.95, 0.95, 0.98],
    }
}

// ── Palette ───────────────────────────────────────────────────────────────────

/// Biome colours for one planet.
///
/// Entries may be missing (a hand-edited world code, for instance); lookups
/// then return [`MISSING_COLOR`] so the gap is visible on the globe.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Palette(BTreeMap<Biome, Color>);

impl Default for Palette {
    fn default() -> Self {
        Self(Biome::ALL.into_iter().map(|b| (b, default_color(b))).collect())
    }
}

impl Palette {
    pub fn empty() -> Self {
        Self(BTreeMap::new())
    }

    pub fn get(&self, biome: Biome) -> Option<Color> {
        self.0.get(&biome).copied()
    }

    /// Colour for `biome`, or [`MISSING_COLOR`] when unset.
    pub fn color(&self, biome: Biome) -> Color {
        self.get(biome).unwrap_or(MISSING_COLOR)
    }

    pub fn set(&mut self, biome: Biome, color: Color) {
        self.0.insert(biome, color);
    }

    pub fn remove(&mut self, biome: Biome) -> Option<Color> {
        self.0.remove(&biome)
    }

    /// Biomes with no colour assigned.
    pub fn missing(&self) -> impl Iterator<Item = Biome> + '_ {
        Biome::ALL.into_iter().filter(|b| !self.0.contains_key(b))
    }
}

// ── Altitude bands ────────────────────────────────────────────────────────────

/// Land biome for a given altitude above the waterline.
///
/// Bands (upper bounds, exclusive): sand 0.02, grass 0.05, forest 0.10,
/// rock 0.15, rock 0.20, then snow. The 0.15..0.20 band repeats rock.
#[allow(clippy::if_same_then_else)]
pub fn land_biome(altitude: f32) -> Biome {
    if altitude < 0.02 {
        Biome::Sand
    } else if altitude < 0.05 {
        Biome::Grass
    } else if altitude < 0.1 {
        Biome::Forest
    } else if altitude < 0.15 {
        Biome::Rock
    } else if altitude < 0.20 {
        Biome::Rock
    } else {
        Biome::Snow
    }
}

fn lerp(a: Color, b: Color, t: f32) -> Color {
    let s = 1.0 - t;
    [a[0] * s + b[0] * t, a[1] * s + b[1] * t, a[2] * s + b[2] * t]
}

/// Blend from shallow to deep water by `depth` in `[0, 1]`.
pub fn water_color(palette: &Palette, depth: f32) -> Color {
    lerp(
        palette.color(Biome::ShallowWater),
        palette.color(Biome::DeepWater),
        depth.clamp(0.0, 1.0),
    )
}
