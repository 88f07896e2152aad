//! Minimal GeoJSON model and bounds derivation

use serde::{Deserialize, Serialize};

use super::bounds::{GeoBounds, pixel_to_geo};
use super::detection::ChangeDetection;
use super::error::GeoError;

/// `[longitude, latitude]` with an optional altitude
pub type Position = Vec<f64>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Geometry {
    Point { coordinates: Position },
    MultiPoint { coordinates: Vec<Position> },
    LineString { coordinates: Vec<Position> },
    MultiLineString { coordinates: Vec<Vec<Position>> },
    Polygon { coordinates: Vec<Vec<Position>> },
    MultiPolygon { coordinates: Vec<Vec<Vec<Position>>> },
    GeometryCollection { geometries: Vec<Geometry> },
}

impl Geometry {
    pub fn type_name(&self) -> &'static str {
        match self {
            Geometry::Point { .. } => "Point",
            Geometry::MultiPoint { .. } => "MultiPoint",
            Geometry::LineString { .. } => "LineString",
            Geometry::MultiLineString { .. } => "MultiLineString",
            Geometry::Polygon { .. } => "Polygon",
            Geometry::MultiPolygon { .. } => "MultiPolygon",
            Geometry::GeometryCollection { .. } => "GeometryCollection",
        }
    }
}

fn feature_type() -> String {
    "Feature".to_string()
}

fn collection_type() -> String {
    "FeatureCollection".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    #[serde(rename = "type", default = "feature_type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<serde_json::Value>,
    pub geometry: Option<Geometry>,
    #[serde(default)]
    pub properties: serde_json::Map<String, serde_json::Value>,
}

impl Feature {
    pub fn new(geometry: Geometry) -> Self {
        Self {
            kind: feature_type(),
            id: None,
            geometry: Some(geometry),
            properties: serde_json::Map::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureCollection {
    #[serde(rename = "type", default = "collection_type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Map<String, serde_json::Value>>,
    #[serde(default)]
    pub features: Vec<Feature>,
}

impl FeatureCollection {
    pub fn new(features: Vec<Feature>) -> Self {
        Self {
            kind: collection_type(),
            metadata: None,
            features,
        }
    }
}

struct BoundsAccumulator {
    bounds: Option<GeoBounds>,
}

impl BoundsAccumulator {
    fn push(&mut self, position: &Position) -> Result<(), GeoError> {
        let (lon, lat) = match position.as_slice() {
            [lon, lat, ..] => (*lon, *lat),
            other => return Err(GeoError::InvalidPosition(other.len())),
        };

        let point = GeoBounds::new(lat, lat, lon, lon);
        self.bounds = Some(match self.bounds {
            Some(current) => current.union(&point),
            None => point,
        });
        Ok(())
    }
}

/// Bounding box of every Point and Polygon in `collection`.
///
/// Features without geometry are skipped. Any other geometry type is an
/// error rather than being silently ignored. Returns `None` when no
/// position was found.
pub fn calculate_bounds(collection: &FeatureCollection) -> Result<Option<GeoBounds>, GeoError> {
    let mut acc = BoundsAccumulator { bounds: None };

    for feature in &collection.features {
        match &feature.geometry {
            None => continue,
            Some(Geometry::Point { coordinates }) => acc.push(coordinates)?,
            Some(Geometry::Polygon { coordinates }) => {
                for position in coordinates.iter().flatten() {
                    acc.push(position)?;
                }
            }
            Some(other) => return Err(GeoError::UnsupportedGeometry(other.type_name().to_string())),
        }
    }

    Ok(acc.bounds)
}

/// Project detections onto `bounds` as closed polygons, the same way the
/// backend's GeoJSON export does.
pub fn detections_to_feature_collection(
    detections: &[ChangeDetection],
    image_height: u32,
    image_width: u32,
    bounds: &GeoBounds,
) -> Result<FeatureCollection, GeoError> {
    bounds.validate()?;

    let mut features = Vec::with_capacity(detections.len());
    for (index, detection) in detections.iter().enumerate() {
        let mut ring = Vec::new();
        for [x, y] in detection.outline() {
            let coordinate = pixel_to_geo(x, y, image_height, image_width, bounds)?;
            ring.push(vec![coordinate.longitude, coordinate.latitude]);
        }
        if let Some(first) = ring.first().cloned() {
            if ring.last() != Some(&first) {
                ring.push(first);
            }
        }

        let id = format!("change_{}", index);
        let mut feature = Feature::new(Geometry::Polygon {
            coordinates: vec![ring],
        });
        feature.id = Some(serde_json::Value::String(id.clone()));

        let properties = serde_json::json!({
            "id": id,
            "change_type": detection.change_type,
            "confidence": detection.confidence.unwrap_or(0.0),
            "severity": detection.severity,
            "area_hectares": detection.area_hectares,
            "bbox": detection.bbox,
        });
        if let serde_json::Value::Object(map) = properties {
            feature.properties = map;
        }

        features.push(feature);
    }

    let mut collection = FeatureCollection::new(features);
    let metadata = serde_json::json!({
        "coordinate_system": "WGS84",
        "image_shape": [image_height, image_width],
        "bounds": bounds,
        "feature_count": collection.features.len(),
    });
    if let serde_json::Value::Object(map) = metadata {
        collection.metadata = Some(map);
    }

    Ok(collection)
}
