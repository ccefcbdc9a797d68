use std::path::{Path, PathBuf};

use clap::Parser;
use planet_generator::export::{
    export_height_map, export_json, export_obj, export_preview_png,
};
use planet_generator::noise::seed_from_str;
use planet_generator::template::{CLOUD_COLOR, cloud_puff, load_template, tree};
use planet_generator::{NoiseKind, PlanetConfig, Result, Templates, World, generate_planet};
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Generate a procedural planet and export it to disk.
#[derive(Parser, Debug)]
#[command(name = "planet-generator", version, about)]
struct Args {
    /// Seed text. A random seed is chosen when neither this nor --code is set.
    #[arg(long, conflicts_with = "code")]
    seed: Option<String>,

    /// Planet code (or any text, which is then used as the seed).
    #[arg(long)]
    code: Option<String>,

    /// RON file with a planet configuration.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the subdivision level.
    #[arg(long, allow_negative_numbers = true)]
    resolution: Option<i32>,

    /// Override the noise algorithm.
    #[arg(long, value_enum)]
    noise: Option<NoiseKind>,

    /// OBJ model to use for cloud puffs.
    #[arg(long)]
    cloud_model: Option<PathBuf>,

    /// Output root directory.
    #[arg(long, default_value = "worlds")]
    out: PathBuf,

    /// Width of the PNG preview maps in pixels.
    #[arg(long, default_value_t = 1024)]
    preview_width: u32,
}

fn init_logging() {
    // Base filter: info by default, overridable via RUST_LOG env var
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let console_layer = fmt::layer()
        .with_target(true)
        .with_level(true)
        .with_timer(fmt::time::uptime());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .init();
}

fn load_config(path: &Path) -> Result<PlanetConfig> {
    let text = std::fs::read_to_string(path)?;
    let config = ron::from_str(&text)?;
    info!(path = %path.display(), "loaded config");
    Ok(config)
}

fn resolve_world(args: &Args) -> Result<World> {
    let mut world = match (&args.code, &args.seed) {
        (Some(code), _) => World::from_code(code)?,
        (None, seed) => {
            let config = match &args.config {
                Some(path) => load_config(path)?,
                None => PlanetConfig::default(),
            };
            let seed = seed
                .clone()
                .unwrap_or_else(|| rand::random::<u32>().to_string());
            World::new(seed, config)?
        }
    };

    if let Some(resolution) = args.resolution {
        world.config.resolution = resolution;
    }
    if let Some(noise) = args.noise {
        world.config.noise_type = noise;
    }
    world.config.validate()?;
    Ok(world)
}

fn run(args: &Args) -> Result<()> {
    let world = resolve_world(args)?;
    let templates = Templates {
        tree: tree(),
        cloud: match &args.cloud_model {
            Some(path) => load_template(path, CLOUD_COLOR),
            None => cloud_puff(),
        },
    };
    let meshes = generate_planet(&world, &templates)?;

    let dir = args.out.join(format!("{:08x}", seed_from_str(&world.seed)));
    std::fs::create_dir_all(&dir)?;

    export_json(&world, &dir.join("world.json"))?;
    export_obj(&meshes.surface, &dir.join("planet.obj"))?;
    export_obj(&meshes.clouds, &dir.join("clouds.obj"))?;
    export_preview_png(&world, args.preview_width, &dir.join("preview.png"))?;
    export_height_map(&world, args.preview_width, &dir.join("height.png"))?;

    println!("World generated → {}/", dir.display());
    println!("Planet code: {}", world.to_code()?);
    Ok(())
}

fn main() {
    init_logging();
    let args = Args::parse();
    if let Err(e) = run(&args) {
        error!(error = %e, "generation failed");
        std::process::exit(1);
    }
}
