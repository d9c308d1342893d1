//! Video download using yt-dlp.
//!
//! Lets the pipeline accept a retrievable URL as well as a local path.
//! Quality is capped at 720p: the detection capability works on sampled
//! stills, so full-resolution downloads only slow the run down.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use tokio::process::Command;
use tracing::{debug, info};

use crate::error::{MediaError, MediaResult};

/// Download `url` to `dest` with yt-dlp. Returns `dest` on success.
pub async fn fetch_video(url: &str, dest: impl AsRef<Path>) -> MediaResult<PathBuf> {
    let dest = dest.as_ref();

    which::which("yt-dlp").map_err(|_| MediaError::YtDlpNotFound)?;

    if let Some(parent) = dest.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }

    info!(url, dest = %dest.display(), "Downloading video");

    let output = Command::new("yt-dlp")
        .args([
            "-f",
            "best[height<=720]",
            "--no-playlist",
            "-o",
            &dest.to_string_lossy(),
            url,
        ])
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .await?;

    if !output.status.success() {
        return Err(MediaError::download_failed(format!(
            "yt-dlp exited with {:?}: {}",
            output.status.code(),
            String::from_utf8_lossy(&output.stderr)
        )));
    }

    let meta = tokio::fs::metadata(dest)
        .await
        .map_err(|_| MediaError::download_failed("yt-dlp produced no output file"))?;
    debug!(size = meta.len(), "Download complete");

    Ok(dest.to_path_buf())
}

/// True if a source string refers to a remote video rather than a local file.
pub fn is_remote_source(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}
