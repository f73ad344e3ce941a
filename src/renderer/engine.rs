use crate::renderer::sampler::sample;
use crate::renderer::{Compositor, FrameBuffer, VideoEncoder};
use crate::scene::{SceneRecord, Timeline};
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// What a backend produced for one scene
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderOutput {
    pub files: Vec<PathBuf>,
    pub frames: u32,
}

/// Consumes a scene record and produces output on disk
pub trait RenderBackend {
    fn name(&self) -> &'static str;

    fn render(&mut self, record: &SceneRecord) -> Result<RenderOutput>;
}

fn ensure_dir(dir: &Path) -> Result<()> {
    if !dir.exists() {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create output directory: {}", dir.display()))?;
    }
    Ok(())
}

/// Writes the scheduled timeline of each scene as `<scene>.json`
pub struct PlanBackend {
    output_dir: PathBuf,
}

impl PlanBackend {
    pub fn new(output_dir: impl AsRef<Path>) -> Self {
        Self {
            output_dir: output_dir.as_ref().to_path_buf(),
        }
    }
}

impl RenderBackend for PlanBackend {
    fn name(&self) -> &'static str {
        "plan"
    }

    fn render(&mut self, record: &SceneRecord) -> Result<RenderOutput> {
        ensure_dir(&self.output_dir)?;
        let path = self.output_dir.join(format!("{}.json", record.name));
        let json = serde_json::to_string_pretty(record)?;
        fs::write(&path, json)
            .with_context(|| format!("Failed to write plan: {}", path.display()))?;
        debug!(scene = %record.name, path = %path.display(), "plan written");
        Ok(RenderOutput {
            files: vec![path],
            frames: 0,
        })
    }
}

/// Rasterises placeholder frames to `<output>/<scene>/frame_<n>.ppm`
pub struct PreviewBackend {
    output_dir: PathBuf,
    fps: u32,
    width: u32,
    height: u32,
    encode: bool,
}

impl PreviewBackend {
    pub fn new(output_dir: impl AsRef<Path>, fps: u32, (width, height): (u32, u32)) -> Self {
        Self {
            output_dir: output_dir.as_ref().to_path_buf(),
            fps: fps.max(1),
            width,
            height,
            encode: false,
        }
    }

    /// Encode `<scene>.mp4` after the frames when FFmpeg is installed
    pub fn with_encoding(mut self, encode: bool) -> Self {
        self.encode = encode;
        self
    }

    /// Render one frame of `record` at frame index `frame`
    pub fn render_frame(&self, record: &SceneRecord, frame: u32, buffer: &mut FrameBuffer) {
        let t = Timeline::frame_to_time(frame, self.fps);
        let snapshot = sample(record, t);
        Compositor::draw(buffer, &record.objects, &snapshot);
    }
}

impl RenderBackend for PreviewBackend {
    fn name(&self) -> &'static str {
        "preview"
    }

    fn render(&mut self, record: &SceneRecord) -> Result<RenderOutput> {
        let scene_dir = self.output_dir.join(&record.name);
        ensure_dir(&scene_dir)?;

        // A zero-length scene still gets its final state as one frame
        let total_frames = record.timeline.total_frames(self.fps).max(1);
        let mut buffer = FrameBuffer::new(self.width, self.height);
        let mut files = Vec::with_capacity(total_frames as usize);

        for frame in 0..total_frames {
            if frame % self.fps == 0 {
                println!("  Rendering frame {}/{}", frame, total_frames);
            }
            self.render_frame(record, frame, &mut buffer);
            let path = scene_dir.join(format!("frame_{}.ppm", frame));
            buffer.save_ppm(&path)?;
            files.push(path);
        }

        if self.encode {
            if VideoEncoder::is_available() {
                let video = self.output_dir.join(format!("{}.mp4", record.name));
                VideoEncoder::encode(&scene_dir.join("frame_%d.ppm"), &video, self.fps)?;
                files.push(video);
            } else {
                warn!("FFmpeg not found, skipping video encoding");
            }
        }

        info!(scene = %record.name, frames = total_frames, "preview rendered");
        Ok(RenderOutput {
            files,
            frames: total_frames,
        })
    }
}
