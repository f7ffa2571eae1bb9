//! # vt-av
//!
//! External engine orchestration for videotools.
//!
//! This crate provides:
//!
//! - **Tool discovery** ([`ToolRegistry`]) -- find and cache paths to ffmpeg
//!   and ffprobe.
//! - **Command execution** ([`ToolCommand`], [`Executor`]) -- argv-only
//!   process invocation behind an injectable trait.
//! - **Escaping** ([`escape`]) -- quoting for filter values, concat lists,
//!   and logged command lines.
//! - **Filter graphs** ([`filter`]) -- typed stages validated before they are
//!   serialized.
//! - **Workspace management** ([`Workspace`]) -- temp artifacts released on
//!   every exit path.
//! - **Operations** ([`MediaTools`]) -- trim, thumbnail, audio extraction,
//!   merge, watermark, and resize.
//! - **Probing** ([`probe::FfprobeProber`]) -- duration and stream summary via
//!   ffprobe.

pub mod command;
pub mod escape;
pub mod executor;
pub mod filter;
pub mod ops;
pub mod probe;
pub mod tools;
pub mod workspace;

// ---- Re-exports for convenience ----

pub use command::{ToolCommand, ToolOutput};
pub use executor::{Executor, SystemExecutor};
pub use filter::{Filter, FilterGraph};
pub use ops::{MediaTools, OperationResult, WatermarkOptions};
pub use probe::{FfprobeProber, MediaInfo};
pub use tools::{ToolConfig, ToolInfo, ToolRegistry};
pub use workspace::{TempArtifact, Workspace};
