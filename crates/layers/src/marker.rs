use foundation::color::Rgb;
use foundation::math::GeoCoordinate;
use scene::components::{Geometry, Light, Material, Transform};
use scene::entity::NodeId;
use scene::graph::{Node, SceneError, SceneGraph};
use scene::prefabs::EARTH_RADIUS;

pub const MARKER_ALTITUDE: f64 = 0.005;
pub const MARKER_COLOR: Rgb = Rgb::new(0.0, 212.0 / 255.0, 1.0);

const SEGMENTS: u32 = 16;

/// Location as supplied by the host. `available == false` means the user
/// has not shared a position and no marker is shown.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct UserLocation {
    pub latitude: f64,
    pub longitude: f64,
    pub available: bool,
}

impl UserLocation {
    pub fn unavailable() -> Self {
        Self {
            latitude: 0.0,
            longitude: 0.0,
            available: false,
        }
    }

    pub fn at(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            available: true,
        }
    }

    pub fn coordinate(&self) -> Option<GeoCoordinate> {
        self.available
            .then(|| GeoCoordinate::new(self.latitude, self.longitude))
    }
}

/// Glowing dot marking the user's position: a white core, two translucent
/// cyan halos and a short-range cyan light.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct UserMarker {
    node: NodeId,
    coordinate: GeoCoordinate,
}

impl UserMarker {
    pub fn spawn(
        graph: &mut SceneGraph,
        parent: NodeId,
        coordinate: GeoCoordinate,
    ) -> Result<Self, SceneError> {
        let node = graph.add(
            parent,
            Node::group("user-marker").with_transform(marker_transform(coordinate)),
        )?;
        graph.add(
            node,
            Node::mesh(
                "marker-core",
                Geometry::sphere(0.015, SEGMENTS),
                Material::basic(Rgb::WHITE),
            ),
        )?;
        graph.add(
            node,
            Node::mesh(
                "marker-glow",
                Geometry::sphere(0.03, SEGMENTS),
                Material::basic(MARKER_COLOR).transparent(0.6),
            ),
        )?;
        graph.add(
            node,
            Node::mesh(
                "marker-pulse",
                Geometry::sphere(0.06, SEGMENTS),
                Material::basic(MARKER_COLOR).transparent(0.2),
            ),
        )?;
        graph.add(
            node,
            Node::light(
                "marker-light",
                Light::Point {
                    color: MARKER_COLOR,
                    intensity: 2.0,
                    distance: 0.5,
                    decay: 2.0,
                },
            ),
        )?;
        Ok(Self { node, coordinate })
    }

    pub fn node(&self) -> NodeId {
        self.node
    }

    pub fn coordinate(&self) -> GeoCoordinate {
        self.coordinate
    }

    pub fn reposition(
        &mut self,
        graph: &mut SceneGraph,
        coordinate: GeoCoordinate,
    ) -> Result<(), SceneError> {
        let node = graph
            .get_mut(self.node)
            .ok_or(SceneError::UnknownNode(self.node))?;
        node.transform = marker_transform(coordinate);
        self.coordinate = coordinate;
        Ok(())
    }

    pub fn remove(self, graph: &mut SceneGraph) -> Result<usize, SceneError> {
        graph.remove(self.node)
    }
}

fn marker_transform(coordinate: GeoCoordinate) -> Transform {
    Transform::translate(coordinate.project(EARTH_RADIUS + MARKER_ALTITUDE))
}
