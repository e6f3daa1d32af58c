use foundation::math::project;
use scene::components::SegmentBuffer;
use scene::graph::Node;

use crate::symbology::{GRATICULE_STYLE, LayerStyle};

pub const MERIDIAN_SPACING_DEG: i32 = 30;
pub const MERIDIAN_STEP_DEG: i32 = 2;
pub const PARALLEL_SPACING_DEG: i32 = 30;
pub const PARALLEL_LIMIT_DEG: i32 = 60;
pub const PARALLEL_STEP_DEG: i32 = 5;

/// Lat/lon grid: meridians every 30° pole to pole, parallels every 30°
/// between ±60°. Each line is sampled in short chords so it hugs the sphere.
pub fn graticule_segments(style: &LayerStyle) -> SegmentBuffer {
    let radius = style.radius();
    let mut segments = Vec::new();

    for lon in (-180..180).step_by(MERIDIAN_SPACING_DEG as usize) {
        for lat in (-90..90).step_by(MERIDIAN_STEP_DEG as usize) {
            segments.push([
                project(lat as f64, lon as f64, radius),
                project((lat + MERIDIAN_STEP_DEG) as f64, lon as f64, radius),
            ]);
        }
    }

    for lat in (-PARALLEL_LIMIT_DEG..=PARALLEL_LIMIT_DEG).step_by(PARALLEL_SPACING_DEG as usize) {
        for lon in (-180..180).step_by(PARALLEL_STEP_DEG as usize) {
            segments.push([
                project(lat as f64, lon as f64, radius),
                project(lat as f64, (lon + PARALLEL_STEP_DEG) as f64, radius),
            ]);
        }
    }

    SegmentBuffer::new(segments)
}

pub fn graticule_node() -> Node {
    let mut node = Node::lines(
        "graticule",
        graticule_segments(&GRATICULE_STYLE),
        GRATICULE_STYLE.line_material(),
    );
    node.visible = GRATICULE_STYLE.visible;
    node
}
