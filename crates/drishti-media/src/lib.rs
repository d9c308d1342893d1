//! Video source access and frame sampling for the Drishti pipeline.
//!
//! This crate wraps the FFmpeg CLI tools for probing and decoding video
//! sources, implements the evenly-spaced frame sampler, and provides
//! frame-local annotation (marker drawing) via the `image` crate.

pub mod annotate;
pub mod command;
pub mod download;
pub mod error;
pub mod probe;
pub mod sampler;

pub use annotate::annotate_frame;
pub use command::FfmpegCommand;
pub use download::fetch_video;
pub use error::{MediaError, MediaResult};
pub use probe::{probe_video, VideoInfo};
pub use sampler::FrameSampler;
