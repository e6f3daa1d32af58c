//! Country border overlay.
//!
//! Borders arrive over the network after the scene is already on screen.
//! [`load_borders`] runs off the frame path and hands one outcome to the
//! frame loop; [`attach_borders`] then adds the layer in a single step.

use std::future::Future;

use formats::boundary::{BoundaryCollection, BoundaryError};
use foundation::math::{GeoCoordinate, Vec3};
use runtime::lifecycle::Completer;
use scene::components::SegmentBuffer;
use scene::entity::NodeId;
use scene::graph::{Node, SceneError, SceneGraph};
use tracing::{debug, info, warn};

use crate::symbology::{BORDER_STYLE, LayerStyle};

/// Natural Earth 1:110m land boundary lines.
pub const DEFAULT_BORDERS_URL: &str = "https://raw.githubusercontent.com/nvkelso/natural-earth-vector/master/geojson/ne_110m_admin_0_boundary_lines_land.geojson";

pub const BORDER_NODE_NAME: &str = "borders";

/// Turns boundary polylines into a flat segment list on the border sphere.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct BorderGeometryBuilder {
    radius: f64,
}

impl Default for BorderGeometryBuilder {
    fn default() -> Self {
        Self::new(&BORDER_STYLE)
    }
}

impl BorderGeometryBuilder {
    pub fn new(style: &LayerStyle) -> Self {
        Self {
            radius: style.radius(),
        }
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// One segment per consecutive vertex pair; a polyline of N vertices
    /// yields N - 1 segments.
    pub fn build(&self, collection: &BoundaryCollection) -> SegmentBuffer {
        let mut segments = Vec::new();
        for line in collection.polylines() {
            segments.extend(self.line_segments(line));
        }
        SegmentBuffer::new(segments)
    }

    fn line_segments<'a>(
        &'a self,
        line: &'a [GeoCoordinate],
    ) -> impl Iterator<Item = [Vec3; 2]> + 'a {
        line.windows(2)
            .map(|pair| [pair[0].project(self.radius), pair[1].project(self.radius)])
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FetchError {
    Network(String),
    Status { url: String, status: u16 },
}

impl std::fmt::Display for FetchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FetchError::Network(e) => write!(f, "request failed: {e}"),
            FetchError::Status { url, status } => write!(f, "{url} answered HTTP {status}"),
        }
    }
}

impl std::error::Error for FetchError {}

#[derive(Debug, Clone, PartialEq)]
pub enum BorderLoadError {
    Fetch(FetchError),
    Parse(BoundaryError),
}

impl std::fmt::Display for BorderLoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BorderLoadError::Fetch(e) => write!(f, "border fetch failed: {e}"),
            BorderLoadError::Parse(e) => write!(f, "border dataset rejected: {e}"),
        }
    }
}

impl std::error::Error for BorderLoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BorderLoadError::Fetch(e) => Some(e),
            BorderLoadError::Parse(e) => Some(e),
        }
    }
}

impl From<FetchError> for BorderLoadError {
    fn from(e: FetchError) -> Self {
        BorderLoadError::Fetch(e)
    }
}

impl From<BoundaryError> for BorderLoadError {
    fn from(e: BoundaryError) -> Self {
        BorderLoadError::Parse(e)
    }
}

/// Where the border dataset comes from.
pub trait BoundarySource {
    /// Fetches the raw GeoJSON document.
    fn fetch(&self) -> impl Future<Output = Result<String, FetchError>>;
}

pub type BorderOutcome = Result<SegmentBuffer, BorderLoadError>;

pub async fn fetch_border_segments<S: BoundarySource>(
    source: &S,
    builder: &BorderGeometryBuilder,
) -> BorderOutcome {
    let payload = source.fetch().await?;
    let collection = BoundaryCollection::from_geojson_str(&payload)?;
    if collection.skipped > 0 {
        debug!(
            skipped = collection.skipped,
            "ignored non-line boundary features"
        );
    }
    Ok(builder.build(&collection))
}

/// Fetches, parses and builds the border layer, then delivers the outcome.
///
/// Failures are logged and delivered as errors; they are never fatal to the
/// view. Returns `false` if the view was torn down before delivery.
pub async fn load_borders<S: BoundarySource>(
    source: &S,
    completer: Completer<BorderOutcome>,
) -> bool {
    if completer.is_cancelled() {
        debug!("border load skipped; view already torn down");
        return false;
    }
    let outcome = fetch_border_segments(source, &BorderGeometryBuilder::default()).await;
    match &outcome {
        Ok(segments) => info!(segments = segments.len(), "border geometry ready"),
        Err(e) => warn!(error = %e, "country borders unavailable"),
    }
    completer.complete(outcome)
}

pub fn border_node(segments: SegmentBuffer) -> Node {
    let mut node = Node::lines(BORDER_NODE_NAME, segments, BORDER_STYLE.line_material());
    node.visible = BORDER_STYLE.visible;
    node
}

/// Adds the border layer under `parent`. An empty buffer adds nothing.
pub fn attach_borders(
    graph: &mut SceneGraph,
    parent: NodeId,
    segments: SegmentBuffer,
) -> Result<Option<NodeId>, SceneError> {
    if segments.is_empty() {
        return Ok(None);
    }
    graph.add(parent, border_node(segments)).map(Some)
}

#[cfg(test)]
mod tests {
    use super::{
        BorderGeometryBuilder, BorderLoadError, BorderOutcome, BoundarySource, FetchError,
        attach_borders, load_borders,
    };
    use formats::boundary::{BoundaryCollection, BoundaryFeature};
    use foundation::math::GeoCoordinate;
    use runtime::lifecycle::handoff;
    use scene::graph::SceneGraph;
    use std::future::Future;

    struct FixedSource(Result<String, FetchError>);

    impl BoundarySource for FixedSource {
        fn fetch(&self) -> impl Future<Output = Result<String, FetchError>> {
            let result = self.0.clone();
            async move { result }
        }
    }

    fn line(n: usize) -> Vec<GeoCoordinate> {
        (0..n)
            .map(|i| GeoCoordinate::new(10.0 + i as f64, 20.0 + i as f64))
            .collect()
    }

    #[test]
    fn line_string_yields_n_minus_one_segments() {
        let collection = BoundaryCollection {
            features: vec![BoundaryFeature {
                name: None,
                lines: vec![line(5)],
            }],
            skipped: 0,
        };
        let builder = BorderGeometryBuilder::default();
        let segments = builder.build(&collection);
        assert_eq!(segments.len(), 4);

        let [start, end] = segments.segments()[0];
        assert_eq!(start, GeoCoordinate::new(10.0, 20.0).project(builder.radius()));
        assert_eq!(end, GeoCoordinate::new(11.0, 21.0).project(builder.radius()));
        assert!((start.length() - 2.505).abs() < 1e-9);
    }

    #[test]
    fn multi_line_string_sums_its_parts() {
        let collection = BoundaryCollection {
            features: vec![BoundaryFeature {
                name: None,
                lines: vec![line(3), line(6), line(1)],
            }],
            skipped: 0,
        };
        let segments = BorderGeometryBuilder::default().build(&collection);
        assert_eq!(segments.len(), 2 + 5);
    }

    #[test]
    fn empty_collection_attaches_no_layer() {
        let segments = BorderGeometryBuilder::default().build(&BoundaryCollection::default());
        assert!(segments.is_empty());

        let mut graph = SceneGraph::new();
        let root = graph.root();
        assert_eq!(attach_borders(&mut graph, root, segments), Ok(None));
        assert_eq!(graph.len(), 1);
    }

    #[test]
    fn load_delivers_segments() {
        let payload = r#"{"type":"FeatureCollection","features":[
            {"type":"Feature","geometry":{"type":"LineString","coordinates":[[0,0],[1,1],[2,2]]}}
        ]}"#;
        let source = FixedSource(Ok(payload.to_string()));
        let (completer, pending) = handoff::<BorderOutcome>("borders");

        assert!(pollster::block_on(load_borders(&source, completer)));
        let segments = pending.take().unwrap().unwrap();
        assert_eq!(segments.len(), 2);

        let mut graph = SceneGraph::new();
        let root = graph.root();
        let node = attach_borders(&mut graph, root, segments).unwrap().unwrap();
        assert_eq!(graph.find("borders"), Some(node));
    }

    #[test]
    fn fetch_and_parse_failures_are_delivered_as_errors() {
        let (completer, pending) = handoff::<BorderOutcome>("borders");
        let source = FixedSource(Err(FetchError::Network("offline".into())));
        assert!(pollster::block_on(load_borders(&source, completer)));
        assert!(matches!(
            pending.take(),
            Some(Err(BorderLoadError::Fetch(FetchError::Network(_))))
        ));

        let (completer, pending) = handoff::<BorderOutcome>("borders");
        let source = FixedSource(Ok("not json".into()));
        pollster::block_on(load_borders(&source, completer));
        assert!(matches!(pending.take(), Some(Err(BorderLoadError::Parse(_)))));
    }

    #[test]
    fn result_after_teardown_is_discarded() {
        let (completer, pending) = handoff::<BorderOutcome>("borders");
        drop(pending);
        let source = FixedSource(Ok(r#"{"type":"FeatureCollection","features":[]}"#.into()));
        assert!(!pollster::block_on(load_borders(&source, completer)));
    }
}
