/// Export backends: world JSON, OBJ meshes, PNG biome preview and height map.
pub mod height_map;
pub mod json;
pub mod obj;
pub mod png;

pub use height_map::export_height_map;
pub use json::export_json;
pub use obj::export_obj;
pub use png::export_preview_png;
