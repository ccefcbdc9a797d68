//! Error types shared by every generation stage.

/// Errors that can occur while building, exporting or configuring a planet.
///
/// Most runtime problems (missing palette entries, degenerate triangles,
/// unreadable template models, malformed world codes) are recovered locally
/// and never surface here. What remains are structural mistakes made by the
/// caller and plumbing failures at the file boundary.
#[derive(Debug, thiserror::Error)]
pub enum PlanetError {
    /// An argument supplied programmatically is out of range.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Reading or writing a file failed.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// A template model could not be parsed.
    #[error("template parse error on line {line}: {message}")]
    TemplateParse { line: usize, message: String },

    /// JSON encoding or decoding failed.
    #[error("failed to serialize world: {0}")]
    Serialize(#[from] serde_json::Error),

    /// RON config file could not be parsed.
    #[error("failed to parse config: {0}")]
    Config(#[from] ron::error::SpannedError),

    /// Preview image could not be written.
    #[error("failed to write image: {0}")]
    Image(#[from] image::ImageError),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, PlanetError>;
