//! Builds the globe scene.

use foundation::math::GeoCoordinate;
use layers::aurora::oval_node;
use layers::graticule::graticule_node;
use layers::marker::UserMarker;
use scene::entity::NodeId;
use scene::graph::{Node, SceneError, SceneGraph, SceneGraphBuilder};
use scene::prefabs::{atmosphere, globe, lights, starfield};
use tracing::debug;

pub const GLOBE_GROUP_NAME: &str = "globe-group";

/// The composed scene plus the nodes the frame loop mutates.
#[derive(Debug)]
pub struct ComposedScene {
    pub graph: SceneGraph,
    /// Parent of everything that sits on the globe: surface, overlays, marker.
    pub globe_group: NodeId,
    pub stars: NodeId,
    pub oval: NodeId,
    pub marker: Option<UserMarker>,
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SceneComposer;

impl SceneComposer {
    /// Root holds the lights, the starfield and the globe group. Borders are
    /// attached later by the view.
    pub fn compose(location: Option<GeoCoordinate>) -> Result<ComposedScene, SceneError> {
        let mut builder = SceneGraphBuilder::new();
        for light in lights() {
            builder.push(light);
        }
        let stars = builder.push(starfield());

        let globe_group = builder.open(Node::group(GLOBE_GROUP_NAME));
        builder.push(globe());
        builder.push(graticule_node());
        builder.push(atmosphere());
        let oval = builder.push(oval_node());
        builder.close();

        let mut graph = builder.build();
        let marker = match location {
            Some(coordinate) => Some(UserMarker::spawn(&mut graph, globe_group, coordinate)?),
            None => None,
        };
        debug!(nodes = graph.len(), marker = marker.is_some(), "scene composed");

        Ok(ComposedScene {
            graph,
            globe_group,
            stars,
            oval,
            marker,
        })
    }
}
