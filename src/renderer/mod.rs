//! WebGPU rendering module
//!
//! Three passes per frame: depth-only into the shadow map, Phong-lit into
//! an off-screen framebuffer (with the UI overlay on top), then a
//! full-screen post effect onto the swapchain.

pub mod gpu_mesh;
pub mod lit_pass;
pub mod overlay;
pub mod pipeline;
pub mod post_effect;
pub mod shadow_pass;
pub mod shapes;
pub mod targets;
pub mod uniforms;
pub mod vertex;

pub use pipeline::ScenePipeline;
