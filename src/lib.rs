//! videotools - ffmpeg-backed media operations
//!
//! This library crate exposes the CLI's configuration loading for
//! integration testing. The operations themselves live in `vt-av`.

pub mod config;
