// this_file: src/lib.rs
//! Framekit - batch frame compositing
//!
//! This library provides functionality for:
//! - Resolution-independent crop and overlay geometry
//! - Compositing photos under a shared frame and encoding JPEGs
//! - Packing outputs into a single ZIP archive
//! - Running one batch on a background worker with a small message protocol

pub mod archive;
pub mod batch;
pub mod canvas;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod geometry;
pub mod logging;
pub mod protocol;
pub mod render;
pub mod resample;
pub mod security;
pub mod source;

// Re-export commonly used types
pub use archive::{entry_name, ArchiveBuilder, ArchiveSink};
pub use batch::{BatchJob, CropDescriptor, FitMode, PhotoJobItem, PlacementDescriptor};
pub use canvas::{CanvasMode, CanvasSize};
pub use config::{Background, EngineOptions, ResizeFilter};
pub use dispatcher::{JobDispatcher, JobState, JobSummary, Worker};
pub use error::{Error, Result};
pub use geometry::{resolve_crop, resolve_placement, Rect};
pub use protocol::{Request, Response};
pub use source::{ByteSource, LocalSource, MemorySource};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
