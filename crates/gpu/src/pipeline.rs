use crate::renderer::RenderFrame;
use crate::uniforms::{TextureSlot, Uniform, UniformKind, UniformValue};
use formats::texture::EquirectTexture;

/// Graphics backend seam. The view drives rendering only through this trait,
/// so it can run against a GPU or headless.
pub trait RenderPipeline {
    fn set_uniform(&mut self, uniform: Uniform, value: UniformValue) -> Result<(), PipelineError>;

    fn upload_texture(
        &mut self,
        slot: TextureSlot,
        texture: &EquirectTexture,
    ) -> Result<(), PipelineError>;

    fn submit_frame(&mut self, frame: &RenderFrame<'_>) -> Result<(), PipelineError>;

    /// Releases GPU resources. Every later call fails with
    /// [`PipelineError::Disposed`].
    fn dispose(&mut self);
}

#[derive(Debug, Clone, PartialEq)]
pub enum PipelineError {
    Disposed,
    UniformType {
        uniform: Uniform,
        expected: UniformKind,
        actual: UniformKind,
    },
    MissingTexture(TextureSlot),
    Backend(String),
}

impl std::fmt::Display for PipelineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PipelineError::Disposed => write!(f, "render pipeline already disposed"),
            PipelineError::UniformType {
                uniform,
                expected,
                actual,
            } => write!(
                f,
                "uniform {uniform:?} expects {expected:?}, got {actual:?}"
            ),
            PipelineError::MissingTexture(slot) => {
                write!(f, "texture {slot:?} has not been uploaded")
            }
            PipelineError::Backend(e) => write!(f, "render backend error: {e}"),
        }
    }
}

impl std::error::Error for PipelineError {}
