use crate::pipeline::{PipelineError, RenderPipeline};
use crate::renderer::{DrawKind, RenderFrame};
use crate::uniforms::{TextureSlot, Uniform, UniformBlock, UniformValue};
use formats::texture::EquirectTexture;

/// Summary of one submitted draw.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedDraw {
    pub name: &'static str,
    pub blended: bool,
    /// Line vertices for line draws, 0 otherwise.
    pub line_vertices: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedFrame {
    pub uniforms: UniformBlock,
    pub draws: Vec<RecordedDraw>,
    pub light_count: usize,
}

impl RecordedFrame {
    pub fn draw(&self, name: &str) -> Option<&RecordedDraw> {
        self.draws.iter().find(|d| d.name == name)
    }
}

/// Headless [`RenderPipeline`] that validates calls and keeps a log of
/// everything submitted.
#[derive(Debug, Default)]
pub struct RecordingPipeline {
    uniforms: UniformBlock,
    textures: [Option<(u32, u32)>; 3],
    frames: Vec<RecordedFrame>,
    disposed: bool,
}

impl RecordingPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn uniforms(&self) -> &UniformBlock {
        &self.uniforms
    }

    /// Dimensions of the uploaded texture in `slot`.
    pub fn texture(&self, slot: TextureSlot) -> Option<(u32, u32)> {
        self.textures[slot.index()]
    }

    pub fn frames(&self) -> &[RecordedFrame] {
        &self.frames
    }

    pub fn last_frame(&self) -> Option<&RecordedFrame> {
        self.frames.last()
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    fn ensure_live(&self) -> Result<(), PipelineError> {
        if self.disposed {
            Err(PipelineError::Disposed)
        } else {
            Ok(())
        }
    }
}

impl RenderPipeline for RecordingPipeline {
    fn set_uniform(&mut self, uniform: Uniform, value: UniformValue) -> Result<(), PipelineError> {
        self.ensure_live()?;
        self.uniforms.set(uniform, value)
    }

    fn upload_texture(
        &mut self,
        slot: TextureSlot,
        texture: &EquirectTexture,
    ) -> Result<(), PipelineError> {
        self.ensure_live()?;
        self.textures[slot.index()] = Some((texture.width(), texture.height()));
        Ok(())
    }

    fn submit_frame(&mut self, frame: &RenderFrame<'_>) -> Result<(), PipelineError> {
        self.ensure_live()?;
        if let Some(slot) = TextureSlot::ALL
            .into_iter()
            .find(|slot| self.textures[slot.index()].is_none())
        {
            return Err(PipelineError::MissingTexture(slot));
        }

        let draws = frame
            .commands
            .iter()
            .map(|c| RecordedDraw {
                name: c.name,
                blended: c.material.is_blended(),
                line_vertices: match c.kind {
                    DrawKind::Lines(segments) => segments.vertex_count(),
                    _ => 0,
                },
            })
            .collect();
        self.frames.push(RecordedFrame {
            uniforms: self.uniforms,
            draws,
            light_count: frame.lights.len(),
        });
        Ok(())
    }

    fn dispose(&mut self) {
        self.disposed = true;
    }
}

#[cfg(test)]
mod tests {
    use super::RecordingPipeline;
    use crate::pipeline::{PipelineError, RenderPipeline};
    use crate::renderer::Renderer;
    use crate::uniforms::{TextureSlot, Uniform, UniformValue};
    use formats::texture::EquirectTexture;
    use scene::graph::SceneGraph;
    use scene::prefabs::globe;

    fn with_textures() -> RecordingPipeline {
        let mut pipeline = RecordingPipeline::new();
        for slot in TextureSlot::ALL {
            pipeline
                .upload_texture(slot, &EquirectTexture::solid([0, 0, 0, 255]))
                .unwrap();
        }
        pipeline
    }

    #[test]
    fn submit_requires_every_texture() {
        let graph = SceneGraph::new();
        let mut pipeline = RecordingPipeline::new();
        pipeline
            .upload_texture(TextureSlot::Day, &EquirectTexture::solid([0; 4]))
            .unwrap();
        assert_eq!(
            pipeline.submit_frame(&Renderer::collect(&graph)),
            Err(PipelineError::MissingTexture(TextureSlot::Water))
        );
        assert!(pipeline.frames().is_empty());
    }

    #[test]
    fn records_draws_with_uniform_snapshot() {
        let mut graph = SceneGraph::new();
        let root = graph.root();
        graph.add(root, globe()).unwrap();

        let mut pipeline = with_textures();
        pipeline
            .set_uniform(Uniform::Kp, UniformValue::Float(3.0))
            .unwrap();
        pipeline.submit_frame(&Renderer::collect(&graph)).unwrap();

        let frame = pipeline.last_frame().unwrap();
        assert_eq!(frame.uniforms.kp, 3.0);
        assert!(frame.draw("globe").is_some_and(|d| !d.blended));
    }

    #[test]
    fn disposed_pipeline_rejects_calls() {
        let graph = SceneGraph::new();
        let mut pipeline = with_textures();
        pipeline.dispose();
        assert!(pipeline.is_disposed());
        assert_eq!(
            pipeline.submit_frame(&Renderer::collect(&graph)),
            Err(PipelineError::Disposed)
        );
        assert_eq!(
            pipeline.set_uniform(Uniform::Time, UniformValue::Float(1.0)),
            Err(PipelineError::Disposed)
        );
    }
}
