//! Browser entry points for the aurora globe.
//!
//! The host page calls `configure`, then `init`, then drives `frame` from its
//! own `requestAnimationFrame` loop for as long as it returns `true`.

use console_error_panic_hook::set_once;
use std::cell::{Cell, RefCell};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;

use gpu::pipeline::RenderPipeline;
use layers::borders::{BorderOutcome, load_borders};
use layers::marker::UserLocation;
use runtime::animation::AnimationLoop;
use runtime::lifecycle::handoff;
use tracing::{debug, error, info};

pub mod composer;
pub mod config;
pub mod loaders;
pub mod logging;
pub mod view;
mod wgpu;

use config::ViewConfig;
use loaders::{HttpBoundarySource, HttpClient, TextureOutcome, load_textures};
use view::GlobeView;
pub use wgpu::WgpuPipeline;

/// Latest values pushed by the host, applied when the view is created.
#[derive(Debug, Copy, Clone)]
struct HostInputs {
    kp: f64,
    location: UserLocation,
}

thread_local! {
    static CONFIG: RefCell<ViewConfig> = RefCell::new(ViewConfig::default());
    static INPUTS: RefCell<HostInputs> = RefCell::new(HostInputs {
        kp: 0.0,
        location: UserLocation::unavailable(),
    });
    static STATE: RefCell<Option<AnimationLoop<GlobeView<WgpuPipeline>>>> =
        const { RefCell::new(None) };
    /// Bumped by every `init` and `teardown`; an init whose session is no
    /// longer current must not install its view.
    static SESSION: Cell<u64> = const { Cell::new(0) };
}

fn begin_session() -> u64 {
    end_session();
    SESSION.with(Cell::get)
}

fn end_session() {
    SESSION.with(|s| s.set(s.get().wrapping_add(1)));
}

fn is_current_session(session: u64) -> bool {
    SESSION.with(|s| s.get() == session)
}

fn js_error(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn with_view<R>(f: impl FnOnce(&mut GlobeView<WgpuPipeline>) -> R) -> Option<R> {
    STATE.with(|state| {
        state
            .borrow_mut()
            .as_mut()
            .map(|animation| f(animation.handler_mut()))
    })
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    set_once();
    Ok(())
}

/// Applies a JSON configuration. Only effective before `init`.
#[wasm_bindgen]
pub fn configure(json: &str) -> Result<(), JsValue> {
    let config = ViewConfig::from_json(json).map_err(js_error)?;
    logging::init(&config.log_filter);
    debug!(canvas = %config.canvas_id, "configuration applied");
    CONFIG.with(|c| *c.borrow_mut() = config);
    Ok(())
}

/// Creates the view on the configured canvas and starts the asset loads.
#[wasm_bindgen]
pub fn init() {
    let session = begin_session();
    spawn_local(async move {
        if let Err(err) = init_inner(session).await {
            error!(error = ?err, "aurora globe init failed");
        }
    });
}

async fn init_inner(session: u64) -> Result<(), JsValue> {
    let config = CONFIG.with(|c| c.borrow().clone());
    logging::init(&config.log_filter);

    let mut pipeline = WgpuPipeline::from_canvas_id(&config.canvas_id)
        .await
        .map_err(js_error)?;
    if !is_current_session(session) {
        pipeline.dispose();
        debug!(session, "init superseded while acquiring the surface; view dropped");
        return Ok(());
    }
    let (width, height) = pipeline.size();
    let inputs = INPUTS.with(|i| *i.borrow());

    let (textures_done, textures_pending) = handoff::<TextureOutcome>("surface-textures");
    let (borders_done, borders_pending) = handoff::<BorderOutcome>("borders");
    let mut view = GlobeView::new(pipeline, config.camera, inputs.kp, inputs.location)
        .map_err(js_error)?
        .with_texture_load(textures_pending)
        .with_border_load(borders_pending);
    view.resize(width as f64, height as f64);

    let mut animation = AnimationLoop::new(view);
    animation.start();
    let previous = STATE.with(|state| state.borrow_mut().replace(animation));
    if let Some(mut previous) = previous {
        previous.stop();
    }

    let urls = config.textures;
    spawn_local(async move {
        load_textures(&HttpClient, &urls, textures_done).await;
    });
    let borders = HttpBoundarySource::new(config.borders_url);
    spawn_local(async move {
        load_borders(&borders, borders_done).await;
    });

    info!(width, height, "aurora globe started");
    Ok(())
}

/// Runs one frame. Returns whether the host should request another.
#[wasm_bindgen]
pub fn frame(timestamp_ms: f64) -> bool {
    STATE.with(|state| {
        state
            .borrow_mut()
            .as_mut()
            .is_some_and(|animation| animation.tick(timestamp_ms / 1000.0))
    })
}

/// Stops the loop and releases the view. Late asset loads are discarded.
#[wasm_bindgen]
pub fn teardown() {
    end_session();
    let previous = STATE.with(|state| state.borrow_mut().take());
    if let Some(mut animation) = previous {
        animation.stop();
    }
}

#[wasm_bindgen]
pub fn set_kp_index(kp: f64) {
    INPUTS.with(|i| i.borrow_mut().kp = kp);
    with_view(|view| view.set_kp(kp));
}

#[wasm_bindgen]
pub fn set_location(latitude: f64, longitude: f64, available: bool) {
    let location = UserLocation {
        latitude,
        longitude,
        available,
    };
    INPUTS.with(|i| i.borrow_mut().location = location);
    with_view(|view| view.set_location(location));
}

#[wasm_bindgen]
pub fn resize(width: f64, height: f64) {
    with_view(|view| {
        view.resize(width, height);
        view.pipeline_mut().resize(width as u32, height as u32);
    });
}

#[wasm_bindgen]
pub fn pointer_down(x_px: f64, y_px: f64) {
    with_view(|view| view.pointer_down(x_px, y_px));
}

#[wasm_bindgen]
pub fn pointer_move(x_px: f64, y_px: f64) {
    with_view(|view| view.pointer_move(x_px, y_px));
}

#[wasm_bindgen]
pub fn pointer_up() {
    with_view(|view| view.pointer_up());
}

#[wasm_bindgen]
pub fn wheel(delta_y: f64) {
    with_view(|view| view.wheel(delta_y));
}

/// HUD state as JSON, or `null` before `init` completes.
#[wasm_bindgen]
pub fn summary() -> Result<JsValue, JsValue> {
    match with_view(|view| serde_json::to_string(&view.summary())) {
        Some(json) => Ok(JsValue::from_str(&json.map_err(js_error)?)),
        None => Ok(JsValue::NULL),
    }
}

#[cfg(test)]
mod tests {
    use super::{begin_session, end_session, is_current_session};

    #[test]
    fn teardown_invalidates_a_pending_init() {
        let session = begin_session();
        assert!(is_current_session(session));
        end_session();
        assert!(!is_current_session(session));
    }

    #[test]
    fn a_later_init_supersedes_an_earlier_one() {
        let first = begin_session();
        let second = begin_session();
        assert!(!is_current_session(first));
        assert!(is_current_session(second));
    }
}
