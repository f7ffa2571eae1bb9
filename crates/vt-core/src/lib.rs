//! vt-core: shared types, errors, configuration, and time parsing.
//!
//! This crate is the foundational dependency for the other videotools
//! crates, providing the unified error type, the media-domain enums used by
//! the operations, the configuration tree, and the lenient duration parser.

pub mod config;
pub mod duration;
pub mod error;
pub mod media;

// Re-export the most commonly used items at the crate root.
pub use duration::parse_duration;
pub use error::{Error, Result};
pub use media::*;
