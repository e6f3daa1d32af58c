pub mod mesh;
pub mod pipeline;
pub mod recording;
pub mod renderer;
pub mod shaders;
pub mod uniforms;

pub use pipeline::*;
pub use recording::*;
pub use renderer::*;
pub use uniforms::*;
