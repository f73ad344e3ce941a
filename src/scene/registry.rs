use crate::assets::AssetLoader;
use crate::error::SceneError;
use crate::scene::{Scene, SceneContext, SceneRecord};
use crate::scenes;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::info;

/// Inputs shared by every scene invocation
#[derive(Debug, Clone)]
pub struct BuildOptions {
    pub assets: PathBuf,
    pub seed: u64,
}

impl BuildOptions {
    pub fn new(assets: impl AsRef<Path>, seed: u64) -> Self {
        Self {
            assets: assets.as_ref().to_path_buf(),
            seed,
        }
    }
}

/// Named scenes in video order
pub struct SceneRegistry {
    scenes: Vec<Box<dyn Scene>>,
}

impl SceneRegistry {
    pub fn empty() -> Self {
        Self { scenes: Vec::new() }
    }

    /// The scenes of the computability video
    pub fn builtin() -> Self {
        let mut registry = Self::empty();
        registry.register(Box::new(scenes::Quote));
        registry.register(Box::new(scenes::ComputerPile));
        registry.register(Box::new(scenes::Mathematicians));
        registry.register(Box::new(scenes::ChurchAndTuring));
        registry.register(Box::new(scenes::Functions));
        registry
    }

    /// Add a scene; a scene with the same name is replaced
    pub fn register(&mut self, scene: Box<dyn Scene>) {
        self.scenes.retain(|s| s.name() != scene.name());
        self.scenes.push(scene);
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.scenes.iter().map(|s| s.name()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn Scene> {
        self.scenes.iter().map(|s| s.as_ref())
    }

    pub fn get(&self, name: &str) -> Result<&dyn Scene, SceneError> {
        self.scenes
            .iter()
            .find(|s| s.name().eq_ignore_ascii_case(name))
            .map(|s| s.as_ref())
            .ok_or_else(|| SceneError::UnknownScene(name.to_string()))
    }

    /// Construct `name` from scratch with a fresh loader and context
    pub fn build(&self, name: &str, options: &BuildOptions) -> Result<SceneRecord> {
        let scene = self.get(name)?;
        let mut loader = AssetLoader::new(&options.assets);
        let mut ctx = SceneContext::new(&mut loader, options.seed);
        scene
            .construct(&mut ctx)
            .with_context(|| format!("Failed to construct scene '{}'", scene.name()))?;
        let record = ctx.finish(scene.name());
        info!(
            scene = scene.name(),
            steps = record.timeline.steps().len(),
            duration = record.duration,
            assets = %loader.stats(),
            "scene constructed"
        );
        Ok(record)
    }

    pub fn build_all(&self, options: &BuildOptions) -> Result<Vec<SceneRecord>> {
        self.iter().map(|s| self.build(s.name(), options)).collect()
    }
}
