//! Evenly-spaced frame sampling.
//!
//! The sampler visits source positions `0, step, 2*step, ...` where
//! `step = max(total_frames / max_frames, 1)`, decodes each position to a
//! JPEG via FFmpeg, and assigns zero-based contiguous indices in extraction
//! order. A decode failure ends sampling early: position failures near the
//! end of a file almost always mean the source is exhausted.

use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::{debug, info, warn};

use drishti_models::Frame;

use crate::command::FfmpegCommand;
use crate::error::{MediaError, MediaResult};
use crate::probe::probe_video;

/// Compute the source positions the sampler will visit.
///
/// Pure stride arithmetic, exposed separately so the sampling contract can
/// be tested without FFmpeg.
pub fn sample_positions(total_frames: u64, max_frames: u32) -> Vec<u64> {
    if total_frames == 0 || max_frames == 0 {
        return Vec::new();
    }
    let step = (total_frames / u64::from(max_frames)).max(1);
    (0..total_frames)
        .step_by(step as usize)
        .take(max_frames as usize)
        .collect()
}

/// Extracts a bounded set of evenly spaced frames from a video source.
#[derive(Debug, Clone)]
pub struct FrameSampler {
    /// Directory that receives the decoded `frame_NNNNNN.jpg` files
    frames_dir: PathBuf,
}

impl FrameSampler {
    /// Create a sampler writing decoded frames into `frames_dir`.
    pub fn new(frames_dir: impl Into<PathBuf>) -> Self {
        Self {
            frames_dir: frames_dir.into(),
        }
    }

    /// Sample up to `max_frames` evenly spaced frames from `source`.
    ///
    /// An empty source yields an empty vector, not an error. Probe failures
    /// propagate: without a readable source there is nothing to analyze.
    pub async fn sample(&self, source: impl AsRef<Path>, max_frames: u32) -> MediaResult<Vec<Frame>> {
        let source = source.as_ref();
        let info = probe_video(source).await?;

        if info.total_frames == 0 {
            info!(source = %source.display(), "Source has no frames, nothing to sample");
            return Ok(Vec::new());
        }

        fs::create_dir_all(&self.frames_dir).await?;

        let positions = sample_positions(info.total_frames, max_frames);
        let fps = if info.fps > 0.0 { info.fps } else { 30.0 };
        let mut frames = Vec::with_capacity(positions.len());

        for position in positions {
            let index = frames.len() as u32;
            let content_ref = self.frames_dir.join(format!("frame_{:06}.jpg", index));

            match extract_frame(source, position, fps, &content_ref).await {
                Ok(()) => {
                    debug!(index, position, "Extracted frame");
                    frames.push(Frame::new(index, position, content_ref));
                }
                Err(e) => {
                    warn!(
                        position,
                        error = %e,
                        "Frame decode failed, stopping sampling early"
                    );
                    break;
                }
            }
        }

        info!(
            source = %source.display(),
            sampled = frames.len(),
            total = info.total_frames,
            "Frame sampling complete"
        );
        Ok(frames)
    }
}

/// Decode the frame at `position` to a JPEG at `output`.
async fn extract_frame(
    source: &Path,
    position: u64,
    fps: f64,
    output: &Path,
) -> MediaResult<()> {
    let seconds = position as f64 / fps;

    FfmpegCommand::new(source, output)
        .seek(seconds)
        .single_frame()
        .quality(2)
        .run()
        .await
        .map_err(|e| MediaError::frame_decode_failed(position, e.to_string()))?;

    // FFmpeg exits zero on a seek past EOF without writing anything
    match fs::metadata(output).await {
        Ok(meta) if meta.len() > 0 => Ok(()),
        _ => Err(MediaError::frame_decode_failed(
            position,
            "no frame decoded at position",
        )),
    }
}
