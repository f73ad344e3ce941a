use anyhow::{Context, Result};
use std::path::Path;
use std::process::Command;
use tracing::info;

/// Handles video encoding using external FFmpeg process
pub struct VideoEncoder;

impl VideoEncoder {
    /// Check if FFmpeg is available
    pub fn is_available() -> bool {
        Command::new("ffmpeg").arg("-version").output().is_ok()
    }

    /// Arguments for encoding a PPM frame sequence to H.264
    pub fn command_args(frame_pattern: &Path, output_path: &Path, fps: u32) -> Vec<String> {
        vec![
            "-y".into(),
            "-loglevel".into(),
            "error".into(),
            "-f".into(),
            "image2".into(),
            "-framerate".into(),
            fps.to_string(),
            "-i".into(),
            frame_pattern.display().to_string(),
            "-c:v".into(),
            "libx264".into(),
            "-pix_fmt".into(),
            "yuv420p".into(),
            output_path.display().to_string(),
        ]
    }

    /// Encode a sequence of frames to a video file
    ///
    /// # Arguments
    /// * `frame_pattern` - Pattern for input frames (e.g., "output/Quote/frame_%d.ppm")
    /// * `output_path` - Path for the output video (e.g., "output/Quote.mp4")
    /// * `fps` - Frames per second
    pub fn encode(frame_pattern: &Path, output_path: &Path, fps: u32) -> Result<()> {
        if !Self::is_available() {
            anyhow::bail!("FFmpeg not found. Please install ffmpeg to enable video encoding.");
        }

        info!(output = %output_path.display(), "encoding video");

        let status = Command::new("ffmpeg")
            .args(Self::command_args(frame_pattern, output_path, fps))
            .status()
            .context("Failed to execute ffmpeg")?;

        if !status.success() {
            anyhow::bail!("FFmpeg encoding failed for {}", output_path.display());
        }

        Ok(())
    }
}
