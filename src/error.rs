//! Setup-time failures
//!
//! Only startup can fail the process. Everything inside the frame loop
//! self-corrects (recycling, countdown fallbacks) or is logged and skipped.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum FxError {
    /// Display, window, renderer or texture acquisition failed
    #[error("display setup failed: {0}")]
    Sdl(String),

    /// Font could not be opened or a glyph could not be rasterized
    #[error("font setup failed: {0}")]
    Font(String),

    #[error("failed to read config {}: {source}", path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {}: {source}", path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

pub type Result<T> = std::result::Result<T, FxError>;
