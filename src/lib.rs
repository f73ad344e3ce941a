pub mod animation;
pub mod assets;
pub mod config;
pub mod error;
pub mod geometry;
pub mod layout;
pub mod logging;
pub mod mobject;
pub mod renderer;
pub mod scene;
pub mod scenes;
pub mod tex;

pub use animation::{Animation, AnimationGroup};
pub use assets::AssetLoader;
pub use config::AppConfig;
pub use error::{SceneError, SceneResult};
pub use renderer::{PlanBackend, PreviewBackend, RenderBackend};
pub use scene::registry::BuildOptions;
pub use scene::{Scene, SceneContext, SceneRecord, SceneRegistry, Timeline};
