use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::Result;
use crate::world::World;

#[derive(Serialize)]
struct WorldFile<'a> {
    code: String,
    #[serde(flatten)]
    world: &'a World,
}

/// Write the world snapshot as pretty JSON, alongside its planet code.
pub fn export_json(world: &World, path: &Path) -> Result<()> {
    let file = WorldFile {
        code: world.to_code()?,
        world,
    };
    let mut out = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut out, &file)?;
    out.write_all(b"\n")?;
    out.flush()?;
    Ok(())
}
