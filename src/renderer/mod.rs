pub mod compositor;
pub mod encoder;
pub mod engine;
pub mod frame_buffer;
pub mod sampler;

pub use compositor::Compositor;
pub use encoder::VideoEncoder;
pub use engine::{PlanBackend, PreviewBackend, RenderBackend, RenderOutput};
pub use frame_buffer::FrameBuffer;
pub use sampler::{sample, FrameSnapshot};
