//! The globe view: owns the scene, camera and render pipeline and advances
//! them once per animation frame.

use gpu::pipeline::RenderPipeline;
use gpu::renderer::Renderer;
use gpu::uniforms::{TextureSlot, Uniform, UniformValue};
use layers::aurora::AuroraOvalParameters;
use layers::borders::{BorderOutcome, attach_borders};
use layers::marker::{UserLocation, UserMarker};
use layers::surface::SurfaceTextures;
use runtime::animation::FrameHandler;
use runtime::frame::Frame;
use runtime::lifecycle::{LoadState, Pending};
use scene::camera::{OrbitCamera, OrbitSettings};
use scene::graph::{SceneError, SceneGraph};
use scene::prefabs::drift_starfield;
use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::composer::{ComposedScene, SceneComposer};
use crate::loaders::TextureOutcome;

/// Kp above which the HUD raises a storm alert.
pub const STORM_ALERT_KP: f64 = 5.0;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewStatus {
    Loading,
    Ready,
    /// Surface textures failed; the globe is never drawn.
    Unavailable,
}

/// HUD state handed to the host page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewSummary {
    pub kp_label: String,
    pub storm_alert: bool,
    pub status: ViewStatus,
    /// `"loading"`, `"ready"` or `"unavailable"`.
    pub borders: &'static str,
    pub border_segments: usize,
    pub marker: bool,
    pub camera_distance: f64,
}

pub struct GlobeView<P: RenderPipeline> {
    pipeline: P,
    scene: ComposedScene,
    camera: OrbitCamera,
    oval: AuroraOvalParameters,
    kp_dirty: bool,
    location: UserLocation,
    location_dirty: bool,
    textures: LoadState<()>,
    /// Segment count once attached.
    borders: LoadState<usize>,
    pending_textures: Option<Pending<TextureOutcome>>,
    pending_borders: Option<Pending<BorderOutcome>>,
    submitted_frames: u64,
    torn_down: bool,
}

impl<P: RenderPipeline> GlobeView<P> {
    pub fn new(
        pipeline: P,
        camera: OrbitSettings,
        kp: f64,
        location: UserLocation,
    ) -> Result<Self, SceneError> {
        let scene = SceneComposer::compose(location.coordinate())?;
        let mut view = Self {
            pipeline,
            scene,
            camera: OrbitCamera::new(camera),
            oval: AuroraOvalParameters::new(kp),
            kp_dirty: false,
            location,
            location_dirty: false,
            textures: LoadState::Loading,
            borders: LoadState::Loading,
            pending_textures: None,
            pending_borders: None,
            submitted_frames: 0,
            torn_down: false,
        };
        for (uniform, value) in view.oval.uniforms() {
            view.push_uniform(uniform, value);
        }
        Ok(view)
    }

    pub fn with_texture_load(mut self, pending: Pending<TextureOutcome>) -> Self {
        self.pending_textures = Some(pending);
        self
    }

    pub fn with_border_load(mut self, pending: Pending<BorderOutcome>) -> Self {
        self.pending_borders = Some(pending);
        self
    }

    pub fn pipeline(&self) -> &P {
        &self.pipeline
    }

    pub fn pipeline_mut(&mut self) -> &mut P {
        &mut self.pipeline
    }

    pub fn graph(&self) -> &SceneGraph {
        &self.scene.graph
    }

    pub fn camera(&self) -> &OrbitCamera {
        &self.camera
    }

    pub fn oval(&self) -> &AuroraOvalParameters {
        &self.oval
    }

    pub fn marker(&self) -> Option<&UserMarker> {
        self.scene.marker.as_ref()
    }

    pub fn status(&self) -> ViewStatus {
        match self.textures {
            LoadState::Loading => ViewStatus::Loading,
            LoadState::Ready(()) => ViewStatus::Ready,
            LoadState::Failed(_) => ViewStatus::Unavailable,
        }
    }

    pub fn submitted_frames(&self) -> u64 {
        self.submitted_frames
    }

    pub fn summary(&self) -> ViewSummary {
        let kp = self.oval.kp();
        ViewSummary {
            kp_label: format!("{kp:.1}"),
            storm_alert: kp > STORM_ALERT_KP,
            status: self.status(),
            borders: self.borders.label(),
            border_segments: self.borders.ready().copied().unwrap_or(0),
            marker: self.scene.marker.is_some(),
            camera_distance: self.camera.state().distance,
        }
    }

    /// Takes effect on the next frame.
    pub fn set_kp(&mut self, kp: f64) {
        if self.oval.set_kp(kp) {
            self.kp_dirty = true;
        }
    }

    /// Takes effect on the next frame.
    pub fn set_location(&mut self, location: UserLocation) {
        if location != self.location {
            self.location = location;
            self.location_dirty = true;
        }
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.camera.set_viewport(width, height);
    }

    pub fn pointer_down(&mut self, x: f64, y: f64) {
        self.camera.pointer_down([x, y]);
    }

    pub fn pointer_move(&mut self, x: f64, y: f64) {
        self.camera.pointer_move([x, y]);
    }

    pub fn pointer_up(&mut self) {
        self.camera.pointer_up();
    }

    pub fn wheel(&mut self, delta_y: f64) {
        self.camera.wheel(delta_y);
    }

    fn push_uniform(&mut self, uniform: Uniform, value: UniformValue) {
        if let Err(e) = self.pipeline.set_uniform(uniform, value) {
            warn!(?uniform, error = %e, "uniform update rejected");
        }
    }

    fn drain_textures(&mut self) {
        let Some(outcome) = self.pending_textures.as_ref().and_then(Pending::take) else {
            return;
        };
        self.pending_textures = None;
        self.textures = match outcome.map_err(|e| e.to_string()).and_then(|t| self.upload(&t)) {
            Ok(()) => {
                info!("globe surface ready");
                LoadState::Ready(())
            }
            Err(reason) => {
                error!(%reason, "globe unavailable");
                LoadState::Failed(reason)
            }
        };
    }

    fn upload(&mut self, textures: &SurfaceTextures) -> Result<(), String> {
        for slot in TextureSlot::ALL {
            let texture = match slot {
                TextureSlot::Day => &textures.day,
                TextureSlot::Water => &textures.water,
                TextureSlot::Night => &textures.night,
            };
            self.pipeline
                .upload_texture(slot, texture)
                .map_err(|e| e.to_string())?;
        }
        Ok(())
    }

    fn drain_borders(&mut self) {
        let Some(outcome) = self.pending_borders.as_ref().and_then(Pending::take) else {
            return;
        };
        self.pending_borders = None;
        self.borders = match outcome {
            Ok(segments) => {
                let count = segments.len();
                match attach_borders(&mut self.scene.graph, self.scene.globe_group, segments) {
                    Ok(Some(_)) => LoadState::Ready(count),
                    Ok(None) => {
                        debug!("border dataset has no line segments");
                        LoadState::Ready(0)
                    }
                    Err(e) => {
                        warn!(error = %e, "border layer could not be attached");
                        LoadState::Failed(e.to_string())
                    }
                }
            }
            // Already logged by the loader.
            Err(e) => LoadState::Failed(e.to_string()),
        };
    }

    fn sync_marker(&mut self) -> Result<(), SceneError> {
        let Some(coordinate) = self.location.coordinate() else {
            if let Some(marker) = self.scene.marker.take() {
                marker.remove(&mut self.scene.graph)?;
            }
            return Ok(());
        };
        match self.scene.marker.as_mut() {
            Some(marker) => marker.reposition(&mut self.scene.graph, coordinate),
            None => {
                let marker =
                    UserMarker::spawn(&mut self.scene.graph, self.scene.globe_group, coordinate)?;
                self.scene.marker = Some(marker);
                Ok(())
            }
        }
    }

    fn submit(&mut self) {
        let frame = Renderer::collect(&self.scene.graph);
        match self.pipeline.submit_frame(&frame) {
            Ok(()) => self.submitted_frames += 1,
            Err(e) => warn!(error = %e, "frame submission failed"),
        }
    }
}

impl<P: RenderPipeline> FrameHandler for GlobeView<P> {
    fn on_frame(&mut self, frame: Frame) {
        if self.torn_down {
            return;
        }
        self.drain_textures();
        self.drain_borders();

        self.oval.advance(frame.dt_s);
        if self.kp_dirty {
            self.kp_dirty = false;
            for (uniform, value) in self.oval.kp_uniforms() {
                self.push_uniform(uniform, value);
            }
            debug!(kp = self.oval.kp(), "aurora oval reshaped");
        }

        if self.location_dirty {
            self.location_dirty = false;
            if let Err(e) = self.sync_marker() {
                warn!(error = %e, "user marker update failed");
            }
        }

        if let Some(stars) = self.scene.graph.get_mut(self.scene.stars) {
            drift_starfield(&mut stars.transform, frame.dt_s);
        }
        self.camera.update(frame.dt_s);

        let viewport = self.camera.viewport();
        let eye = self.camera.eye();
        let view_proj = self.camera.view_proj(self.camera.aspect());
        self.push_uniform(Uniform::ViewProj, UniformValue::Mat4(view_proj));
        self.push_uniform(Uniform::CameraEye, UniformValue::Vec3(eye.to_f32()));
        self.push_uniform(
            Uniform::Viewport,
            UniformValue::Vec2([viewport[0] as f32, viewport[1] as f32]),
        );
        self.push_uniform(
            Uniform::Time,
            UniformValue::Float(self.oval.time().seconds() as f32),
        );

        if self.textures.is_ready() {
            self.submit();
        }
    }

    fn on_teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.torn_down = true;
        self.pending_textures = None;
        self.pending_borders = None;
        self.pipeline.dispose();
        debug!(frames = self.submitted_frames, "globe view torn down");
    }
}
