//! Unified error type for videotools.
//!
//! Operations report engine failures through their result values; [`Error`]
//! is reserved for conditions the caller has to handle: a missing required
//! input, an engine that cannot be spawned, or an unreadable configuration.
//! The CLI derives its process exit status via [`Error::exit_code`].

use std::path::PathBuf;

/// Unified error type covering all failure modes in videotools.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A required input file does not exist.
    #[error("file not found: {}", path.display())]
    FileNotFound {
        /// The path that was checked.
        path: PathBuf,
    },

    /// An I/O operation failed.
    #[error("IO error: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// An external tool (ffmpeg, ffprobe) could not be located or spawned.
    #[error("Tool error [{tool}]: {message}")]
    Tool {
        /// Name of the tool that failed.
        tool: String,
        /// Human-readable error description.
        message: String,
    },

    /// Request data failed validation.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The configuration could not be read or parsed.
    #[error("Config error: {0}")]
    Config(String),
}

impl Error {
    /// Map this error to a process exit status for the CLI.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::FileNotFound { .. } => 2,
            Error::Validation(_) | Error::Config(_) => 3,
            Error::Tool { .. } => 4,
            Error::Io { .. } => 5,
        }
    }

    /// Convenience constructor for [`Error::FileNotFound`].
    pub fn file_not_found(path: impl Into<PathBuf>) -> Self {
        Error::FileNotFound { path: path.into() }
    }

    /// Convenience constructor for [`Error::Tool`].
    pub fn tool(tool: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Tool {
            tool: tool.into(),
            message: message.into(),
        }
    }
}

/// Result alias using the crate-level [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
