use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct AppConfig {
    pub assets: AssetsConfig,
    pub render: RenderConfig,
    pub scenes: ScenesConfig,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct AssetsConfig {
    pub base_path: PathBuf,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct RenderConfig {
    pub backend: String, // "preview" or "plan"
    pub output_dir: PathBuf,
    pub fps: u32,
    pub resolution: String,
    /// Encode previews with FFmpeg when it is installed
    pub encode: bool,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ScenesConfig {
    pub seed: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            assets: AssetsConfig {
                base_path: PathBuf::from("assets"),
            },
            render: RenderConfig {
                backend: "preview".to_string(),
                output_dir: PathBuf::from("output"),
                fps: 30,
                resolution: "854x480".to_string(),
                encode: true,
            },
            scenes: ScenesConfig { seed: 0 },
        }
    }
}

impl RenderConfig {
    /// Parse `resolution` as `WIDTHxHEIGHT`
    pub fn dimensions(&self) -> anyhow::Result<(u32, u32)> {
        parse_resolution(&self.resolution)
    }
}

pub fn parse_resolution(value: &str) -> anyhow::Result<(u32, u32)> {
    let (w, h) = value
        .split_once('x')
        .ok_or_else(|| anyhow::anyhow!("Invalid resolution '{}', expected WIDTHxHEIGHT", value))?;
    let width: u32 = w.trim().parse()?;
    let height: u32 = h.trim().parse()?;
    if width == 0 || height == 0 {
        anyhow::bail!("Resolution must be non-zero, got '{}'", value);
    }
    Ok((width, height))
}

impl AppConfig {
    /// Defaults, then `computability.toml` if present, then environment
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::builder(config::File::with_name("computability").required(false))?
            .build()?
            .try_deserialize()
    }

    fn builder(
        file: config::File<config::FileSourceFile, config::FileFormat>,
    ) -> Result<config::ConfigBuilder<config::builder::DefaultState>, config::ConfigError> {
        let defaults = Self::default();
        Ok(config::Config::builder()
            .set_default("assets.base_path", path_str(&defaults.assets.base_path))?
            .set_default("render.backend", defaults.render.backend)?
            .set_default("render.output_dir", path_str(&defaults.render.output_dir))?
            .set_default("render.fps", defaults.render.fps)?
            .set_default("render.resolution", defaults.render.resolution)?
            .set_default("render.encode", defaults.render.encode)?
            .set_default("scenes.seed", defaults.scenes.seed)?
            .add_source(file)
            // Env overrides, e.g. COMPUTABILITY_RENDER__FPS=15
            .add_source(
                config::Environment::with_prefix("COMPUTABILITY")
                    .prefix_separator("_")
                    .separator("__"),
            ))
    }
}

fn path_str(path: &std::path::Path) -> String {
    path.display().to_string()
}
