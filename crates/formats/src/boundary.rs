//! GeoJSON boundary-line datasets.
//!
//! Only line geometries carry border data. Features with any other geometry
//! type (or a `null` geometry) are counted and skipped.

use foundation::math::GeoCoordinate;
use serde_json::Value;

/// One polyline, vertices in dataset order.
pub type Polyline = Vec<GeoCoordinate>;

#[derive(Debug, Clone, PartialEq)]
pub struct BoundaryFeature {
    pub name: Option<String>,
    /// A `LineString` yields one polyline, a `MultiLineString` several.
    pub lines: Vec<Polyline>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoundaryCollection {
    pub features: Vec<BoundaryFeature>,
    /// Features ignored because their geometry is not a line type.
    pub skipped: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub enum BoundaryError {
    Json(String),
    NotAFeatureCollection,
    InvalidFeature { index: usize, reason: String },
}

impl std::fmt::Display for BoundaryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BoundaryError::Json(e) => write!(f, "JSON parse error: {e}"),
            BoundaryError::NotAFeatureCollection => {
                write!(f, "expected GeoJSON FeatureCollection")
            }
            BoundaryError::InvalidFeature { index, reason } => {
                write!(f, "invalid feature at index {index}: {reason}")
            }
        }
    }
}

impl std::error::Error for BoundaryError {}

impl BoundaryCollection {
    pub fn from_geojson_str(payload: &str) -> Result<Self, BoundaryError> {
        let value: Value =
            serde_json::from_str(payload).map_err(|e| BoundaryError::Json(e.to_string()))?;
        Self::from_geojson_value(&value)
    }

    pub fn from_geojson_value(value: &Value) -> Result<Self, BoundaryError> {
        let obj = value
            .as_object()
            .ok_or(BoundaryError::NotAFeatureCollection)?;
        if obj.get("type").and_then(|v| v.as_str()) != Some("FeatureCollection") {
            return Err(BoundaryError::NotAFeatureCollection);
        }
        let features_val = obj
            .get("features")
            .and_then(|v| v.as_array())
            .ok_or(BoundaryError::NotAFeatureCollection)?;

        let mut out = Self::default();
        for (index, feat_val) in features_val.iter().enumerate() {
            let invalid = |reason: &str| BoundaryError::InvalidFeature {
                index,
                reason: reason.to_string(),
            };
            let feat_obj = feat_val
                .as_object()
                .ok_or_else(|| invalid("feature must be an object"))?;

            let geometry = match feat_obj.get("geometry") {
                None | Some(Value::Null) => {
                    out.skipped += 1;
                    continue;
                }
                Some(g) => g,
            };
            let Some(lines) = parse_line_geometry(geometry)
                .map_err(|reason| BoundaryError::InvalidFeature { index, reason })?
            else {
                out.skipped += 1;
                continue;
            };

            let name = feat_obj
                .get("properties")
                .and_then(|p| p.get("name").or_else(|| p.get("NAME")))
                .and_then(|v| v.as_str())
                .map(str::to_string);

            out.features.push(BoundaryFeature { name, lines });
        }
        Ok(out)
    }

    pub fn polylines(&self) -> impl Iterator<Item = &Polyline> {
        self.features.iter().flat_map(|f| f.lines.iter())
    }

    pub fn is_empty(&self) -> bool {
        self.polylines().next().is_none()
    }
}

/// `Ok(None)` for geometry types that carry no lines.
fn parse_line_geometry(value: &Value) -> Result<Option<Vec<Polyline>>, String> {
    let obj = value
        .as_object()
        .ok_or("geometry must be an object".to_string())?;
    let ty = obj
        .get("type")
        .and_then(|v| v.as_str())
        .ok_or("geometry missing type".to_string())?;

    match ty {
        "LineString" => {
            let coords = coordinates(obj)?;
            Ok(Some(vec![parse_line(coords)?]))
        }
        "MultiLineString" => {
            let arr = coordinates(obj)?
                .as_array()
                .ok_or("MultiLineString coordinates must be an array".to_string())?;
            let mut lines = Vec::with_capacity(arr.len());
            for line in arr {
                lines.push(parse_line(line)?);
            }
            Ok(Some(lines))
        }
        _ => Ok(None),
    }
}

fn coordinates(obj: &serde_json::Map<String, Value>) -> Result<&Value, String> {
    obj.get("coordinates")
        .ok_or("geometry missing coordinates".to_string())
}

fn parse_line(coords: &Value) -> Result<Polyline, String> {
    let arr = coords
        .as_array()
        .ok_or("line coordinates must be an array".to_string())?;
    let mut out = Vec::with_capacity(arr.len());
    for item in arr {
        out.push(parse_position(item)?);
    }
    Ok(out)
}

fn parse_position(value: &Value) -> Result<GeoCoordinate, String> {
    let arr = value
        .as_array()
        .ok_or("position must be an array".to_string())?;
    if arr.len() < 2 {
        return Err("position must have [lon, lat]".to_string());
    }
    let lon = arr[0].as_f64().ok_or("lon must be a number".to_string())?;
    let lat = arr[1].as_f64().ok_or("lat must be a number".to_string())?;
    Ok(GeoCoordinate::new(lat, lon))
}
