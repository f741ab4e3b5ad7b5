//! WebGPU rendering module
//!
//! World shapes are triangulated on the CPU and drawn as one flat-coloured
//! triangle list per frame.

pub mod pipeline;
pub mod shapes;
pub mod vertex;

pub use pipeline::RenderState;
pub use shapes::scene_vertices;
pub use vertex::Vertex;
