//! Orbit camera around the globe origin.
//!
//! Follows the orbit-controls model: spherical coordinates (azimuth, polar,
//! distance) around a fixed target, drag-to-rotate with damped angular
//! velocity, wheel zoom and constant auto-rotation. Panning is not supported.

use foundation::math::{Mat4, Vec3, mat4_look_at_rh, mat4_mul, mat4_perspective_rh_z0};
use serde::{Deserialize, Serialize};
use std::f64::consts::{PI, TAU};

/// Keeps the polar angle strictly off the poles.
const POLAR_EPSILON: f64 = 1e-6;

/// Remaining damped rotation below which the velocity is dropped.
const REST_THRESHOLD: f64 = 1e-9;

/// Longest frame step applied to the camera, in seconds.
const MAX_STEP_S: f64 = 0.1;

/// Hard limits on the camera distance; configured bounds are clamped into
/// this range.
pub const MIN_DISTANCE: f64 = 3.5;
pub const MAX_DISTANCE: f64 = 12.0;

pub const NEAR_PLANE: f64 = 0.1;
pub const FAR_PLANE: f64 = 1000.0;

/// Tunables of the orbit camera. Every field falls back to its default when
/// missing from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrbitSettings {
    pub min_distance: f64,
    pub max_distance: f64,
    pub initial_distance: f64,
    /// Vertical field of view in degrees.
    pub fov_deg: f64,
    pub rotate_speed: f64,
    pub zoom_speed: f64,
    pub auto_rotate: bool,
    /// 1.0 is one full turn per minute.
    pub auto_rotate_speed: f64,
    /// Fraction of pending rotation applied per 60 Hz frame.
    pub damping_factor: f64,
}

impl Default for OrbitSettings {
    fn default() -> Self {
        Self {
            min_distance: MIN_DISTANCE,
            max_distance: MAX_DISTANCE,
            initial_distance: 7.5,
            fov_deg: 45.0,
            rotate_speed: 0.4,
            zoom_speed: 0.5,
            auto_rotate: true,
            auto_rotate_speed: 0.3,
            damping_factor: 0.1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraState {
    /// Rotation around +Y; 0 looks down -Z from +Z.
    pub azimuth: f64,
    /// Angle from +Y, in (0, π).
    pub polar: f64,
    pub distance: f64,
}

#[derive(Debug, Clone)]
pub struct OrbitCamera {
    settings: OrbitSettings,
    state: CameraState,
    /// Rotation still to be applied, drained by damping.
    pending_azimuth: f64,
    pending_polar: f64,
    viewport_px: [f64; 2],
    last_pointer_px: Option<[f64; 2]>,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self::new(OrbitSettings::default())
    }
}

impl OrbitCamera {
    pub fn new(settings: OrbitSettings) -> Self {
        let (min, max) = distance_bounds(&settings);
        Self {
            settings,
            state: CameraState {
                azimuth: 0.0,
                polar: PI / 2.0,
                distance: settings.initial_distance.clamp(min, max),
            },
            pending_azimuth: 0.0,
            pending_polar: 0.0,
            viewport_px: [1.0, 1.0],
            last_pointer_px: None,
        }
    }

    pub fn settings(&self) -> &OrbitSettings {
        &self.settings
    }

    pub fn state(&self) -> CameraState {
        self.state
    }

    pub fn is_dragging(&self) -> bool {
        self.last_pointer_px.is_some()
    }

    pub fn set_viewport(&mut self, width: f64, height: f64) {
        if width.is_finite() && height.is_finite() {
            self.viewport_px = [width.max(1.0), height.max(1.0)];
        }
    }

    pub fn viewport(&self) -> [f64; 2] {
        self.viewport_px
    }

    pub fn aspect(&self) -> f64 {
        self.viewport_px[0] / self.viewport_px[1]
    }

    pub fn pointer_down(&mut self, pos_px: [f64; 2]) {
        self.last_pointer_px = Some(pos_px);
    }

    pub fn pointer_move(&mut self, pos_px: [f64; 2]) {
        let Some(last) = self.last_pointer_px else {
            return;
        };
        let dx = pos_px[0] - last[0];
        let dy = pos_px[1] - last[1];
        if dx.is_finite() && dy.is_finite() {
            let scale = TAU * self.settings.rotate_speed / self.viewport_px[1];
            self.pending_azimuth -= dx * scale;
            self.pending_polar -= dy * scale;
        }
        self.last_pointer_px = Some(pos_px);
        self.clamp();
    }

    pub fn pointer_up(&mut self) {
        self.last_pointer_px = None;
    }

    /// Wheel zoom. Negative `delta_y` (scroll up) moves closer.
    pub fn wheel(&mut self, delta_y: f64) {
        if !delta_y.is_finite() || delta_y == 0.0 {
            return;
        }
        let step = 0.95f64.powf(self.settings.zoom_speed);
        if delta_y < 0.0 {
            self.state.distance *= step;
        } else {
            self.state.distance /= step;
        }
        self.clamp();
    }

    /// Advances auto-rotation and damping by `dt_s` seconds.
    pub fn update(&mut self, dt_s: f64) {
        let dt = if dt_s.is_finite() {
            dt_s.clamp(0.0, MAX_STEP_S)
        } else {
            0.0
        };

        if self.settings.auto_rotate && !self.is_dragging() {
            self.state.azimuth -= TAU / 60.0 * self.settings.auto_rotate_speed * dt;
        }

        let damping = self.settings.damping_factor.clamp(0.0, 1.0);
        let remaining = (1.0 - damping).powf(dt * 60.0);
        let applied = 1.0 - remaining;
        self.state.azimuth += self.pending_azimuth * applied;
        self.state.polar += self.pending_polar * applied;
        self.pending_azimuth *= remaining;
        self.pending_polar *= remaining;
        if self.pending_azimuth.abs() < REST_THRESHOLD {
            self.pending_azimuth = 0.0;
        }
        if self.pending_polar.abs() < REST_THRESHOLD {
            self.pending_polar = 0.0;
        }

        self.state.azimuth = self.state.azimuth.rem_euclid(TAU);
        self.clamp();
    }

    pub fn eye(&self) -> Vec3 {
        let CameraState {
            azimuth,
            polar,
            distance,
        } = self.state;
        Vec3::new(
            distance * polar.sin() * azimuth.sin(),
            distance * polar.cos(),
            distance * polar.sin() * azimuth.cos(),
        )
    }

    pub fn view_proj(&self, aspect: f64) -> Mat4 {
        let aspect = if aspect.is_finite() && aspect > 0.0 {
            aspect
        } else {
            1.0
        };
        let proj = mat4_perspective_rh_z0(
            self.settings.fov_deg.to_radians(),
            aspect,
            NEAR_PLANE,
            FAR_PLANE,
        );
        let view = mat4_look_at_rh(self.eye(), Vec3::ZERO, Vec3::Y);
        mat4_mul(proj, view)
    }

    fn clamp(&mut self) {
        let (min, max) = distance_bounds(&self.settings);
        self.state.distance = self.state.distance.clamp(min, max);
        self.state.polar = self.state.polar.clamp(POLAR_EPSILON, PI - POLAR_EPSILON);
    }
}

/// Configured bounds intersected with [`MIN_DISTANCE`, `MAX_DISTANCE`].
pub fn distance_bounds(settings: &OrbitSettings) -> (f64, f64) {
    let min = if settings.min_distance.is_finite() {
        settings.min_distance.clamp(MIN_DISTANCE, MAX_DISTANCE)
    } else {
        MIN_DISTANCE
    };
    let max = if settings.max_distance.is_finite() {
        settings.max_distance.clamp(min, MAX_DISTANCE)
    } else {
        MAX_DISTANCE
    };
    (min, max)
}
