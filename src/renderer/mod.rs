//! WebGPU rendering module
//!
//! The scene is flattened to one colored triangle list per frame in pixel
//! space; the pipeline maps it to clip space and draws it in one pass.

pub mod pipeline;
pub mod scene;
pub mod shapes;
pub mod vertex;

pub use pipeline::{RenderError, RenderState, pixel_to_ndc};
pub use scene::build_frame;
pub use vertex::Vertex;
