//! Procedural icosphere planets.
//!
//! A planet is built by a chain of pure stages, each consuming the previous
//! stage's value:
//!
//! 1. [`IcoSphere::build`] subdivides an icosahedron into a unit sphere.
//! 2. [`terrain::displace`] pushes vertices out along noise.
//! 3. [`terrain::classify`] colors vertices by biome.
//! 4. [`mesh::flatten`] and [`SurfaceBuffers::from_flat`] produce flat-shaded
//!    triangle buffers.
//! 5. [`scatter::scatter_objects`] instances trees and clouds on the surface.
//!
//! [`generate_planet`] runs the whole chain for a [`World`].

pub mod biome;
pub mod error;
pub mod export;
pub mod generation;
pub mod icosphere;
pub mod mesh;
pub mod noise;
pub mod scatter;
pub mod template;
pub mod terrain;
pub mod world;

pub use biome::{Biome, Color, Palette};
pub use error::{PlanetError, Result};
pub use generation::{PlanetMeshes, Templates, generate_planet};
pub use icosphere::IcoSphere;
pub use mesh::{FlatMesh, IndexedMesh, SurfaceBuffers};
pub use noise::{NoiseKind, NoiseProvider};
pub use world::{PlanetConfig, World};
