use std::future::Future;

use aurora_web::loaders::{TextureLoadError, TextureOutcome};
use aurora_web::view::{GlobeView, ViewStatus};
use formats::texture::EquirectTexture;
use gpu::recording::RecordingPipeline;
use gpu::uniforms::TextureSlot;
use layers::borders::{BorderOutcome, BoundarySource, FetchError, load_borders};
use layers::marker::UserLocation;
use layers::surface::SurfaceTextures;
use pretty_assertions::assert_eq;
use runtime::animation::AnimationLoop;
use runtime::lifecycle::{Completer, handoff};
use scene::camera::OrbitSettings;

const REYKJAVIK: (f64, f64) = (64.1466, -21.9426);

struct FixedSource(Result<String, FetchError>);

impl BoundarySource for FixedSource {
    fn fetch(&self) -> impl Future<Output = Result<String, FetchError>> {
        let result = self.0.clone();
        async move { result }
    }
}

const BORDERS: &str = r#"{"type":"FeatureCollection","features":[
    {"type":"Feature","properties":{"name":"a"},
     "geometry":{"type":"LineString","coordinates":[[0,0],[1,1],[2,2]]}},
    {"type":"Feature","properties":{"name":"b"},
     "geometry":{"type":"MultiLineString","coordinates":[[[10,10],[11,11]],[[20,20],[21,21],[22,22]]]}}
]}"#;

fn surface() -> SurfaceTextures {
    SurfaceTextures {
        day: EquirectTexture::solid([40, 80, 40, 255]),
        water: EquirectTexture::solid([255, 255, 255, 255]),
        night: EquirectTexture::solid([0, 0, 0, 255]),
    }
}

struct Harness {
    animation: AnimationLoop<GlobeView<RecordingPipeline>>,
    textures: Completer<TextureOutcome>,
    borders: Completer<BorderOutcome>,
}

fn harness(kp: f64, location: UserLocation) -> Harness {
    let (textures, textures_pending) = handoff::<TextureOutcome>("surface-textures");
    let (borders, borders_pending) = handoff::<BorderOutcome>("borders");
    let mut view = GlobeView::new(RecordingPipeline::new(), OrbitSettings::default(), kp, location)
        .unwrap()
        .with_texture_load(textures_pending)
        .with_border_load(borders_pending);
    view.resize(800.0, 600.0);
    let mut animation = AnimationLoop::new(view);
    animation.start();
    Harness {
        animation,
        textures,
        borders,
    }
}

fn run_frames(animation: &mut AnimationLoop<GlobeView<RecordingPipeline>>, from: u32, n: u32) {
    for i in from..from + n {
        assert!(animation.tick(i as f64 / 60.0));
    }
}

#[test]
fn reykjavik_with_failed_border_fetch_still_renders() {
    let Harness {
        mut animation,
        textures,
        borders,
    } = harness(2.0, UserLocation::at(REYKJAVIK.0, REYKJAVIK.1));

    let offline = FixedSource(Err(FetchError::Network("offline".into())));
    assert!(pollster::block_on(load_borders(&offline, borders)));
    run_frames(&mut animation, 0, 3);
    assert_eq!(animation.handler().status(), ViewStatus::Loading);
    assert!(animation.handler().pipeline().frames().is_empty());

    assert!(textures.complete(Ok(surface())));
    run_frames(&mut animation, 3, 2);

    let view = animation.handler();
    assert_eq!(view.status(), ViewStatus::Ready);
    assert_eq!(view.graph().find("borders"), None);
    assert_eq!(view.summary().borders, "unavailable");
    assert!(view.graph().find("user-marker").is_some());

    let frames = view.pipeline().frames();
    assert_eq!(frames.len(), 2);
    let last = frames.last().unwrap();
    assert!(last.draw("globe").is_some());
    assert!(last.draw("aurora-oval").unwrap().blended);
    assert!(last.draw("marker-core").is_some());
    assert!(last.draw("borders").is_none());
    // Ambient, key, back and the marker's point light.
    assert_eq!(last.light_count, 4);
    assert!((last.uniforms.oval_center_angle - 0.37).abs() < 1e-6);
    assert!((last.uniforms.oval_band_width - 0.16).abs() < 1e-6);
    assert!(last.uniforms.time > 0.0);
}

#[test]
fn severe_storm_without_location_has_no_marker() {
    let Harness {
        mut animation,
        textures,
        borders,
    } = harness(9.0, UserLocation::unavailable());

    let source = FixedSource(Ok(BORDERS.to_string()));
    pollster::block_on(load_borders(&source, borders));
    textures.complete(Ok(surface()));
    let azimuth_before = animation.handler().camera().state().azimuth;
    run_frames(&mut animation, 0, 2);

    let view = animation.handler();
    // Auto-rotation keeps turning the globe with no input.
    assert_ne!(view.camera().state().azimuth, azimuth_before);
    assert!(view.marker().is_none());
    assert_eq!(view.graph().find("user-marker"), None);
    assert_eq!(view.graph().find("marker-light"), None);

    let last = view.pipeline().last_frame().unwrap();
    assert!((last.uniforms.oval_center_angle - 0.545).abs() < 1e-6);
    assert!((last.uniforms.oval_band_width - 0.30).abs() < 1e-6);
    assert_eq!(last.light_count, 3);
    // 2 + 1 + 2 segments, two vertices each.
    assert_eq!(last.draw("borders").unwrap().line_vertices, 10);

    let summary = view.summary();
    assert_eq!(summary.kp_label, "9.0");
    assert!(summary.storm_alert);
    assert_eq!(summary.borders, "ready");
    assert_eq!(summary.border_segments, 5);
}

#[test]
fn camera_distance_stays_within_bounds() {
    let Harness { mut animation, .. } = harness(3.0, UserLocation::unavailable());
    for _ in 0..200 {
        animation.handler_mut().wheel(-120.0);
    }
    run_frames(&mut animation, 0, 2);
    assert_eq!(animation.handler().camera().state().distance, 3.5);

    for _ in 0..400 {
        animation.handler_mut().wheel(120.0);
    }
    {
        let view = animation.handler_mut();
        view.pointer_down(400.0, 300.0);
        view.pointer_move(900.0, -2000.0);
        view.pointer_up();
    }
    run_frames(&mut animation, 2, 30);
    let state = animation.handler().camera().state();
    assert_eq!(state.distance, 12.0);
    assert!(state.polar > 0.0 && state.polar < std::f64::consts::PI);
}

#[test]
fn texture_failure_leaves_the_view_unavailable() {
    let Harness {
        mut animation,
        textures,
        borders,
    } = harness(4.0, UserLocation::at(REYKJAVIK.0, REYKJAVIK.1));

    textures.complete(Err(TextureLoadError::Fetch {
        slot: TextureSlot::Night,
        error: FetchError::Status {
            url: "earth-night.jpg".into(),
            status: 404,
        },
    }));
    let source = FixedSource(Ok(BORDERS.to_string()));
    pollster::block_on(load_borders(&source, borders));
    run_frames(&mut animation, 0, 10);

    let view = animation.handler();
    assert_eq!(view.status(), ViewStatus::Unavailable);
    assert!(view.pipeline().frames().is_empty());
    assert_eq!(view.pipeline().texture(TextureSlot::Day), None);
    assert!(view.graph().find("borders").is_some());
    assert_eq!(view.summary().status, ViewStatus::Unavailable);
}

#[test]
fn teardown_discards_late_loads() {
    let Harness {
        mut animation,
        textures,
        borders,
    } = harness(1.0, UserLocation::unavailable());
    run_frames(&mut animation, 0, 1);
    animation.stop();

    assert!(animation.handler().pipeline().is_disposed());
    assert!(textures.is_cancelled());
    assert!(!textures.complete(Ok(surface())));
    let source = FixedSource(Ok(BORDERS.to_string()));
    assert!(!pollster::block_on(load_borders(&source, borders)));
    assert!(!animation.tick(1.0));
    assert_eq!(animation.handler().graph().find("borders"), None);
}
