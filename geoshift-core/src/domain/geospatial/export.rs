//! Request and response bodies for the geospatial export endpoints

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use super::bounds::{GeoBounds, GeoCoordinate};
use super::data_url::{encode_data_url, encode_json_data_url, parse_data_url};
use super::detection::ChangeDetection;
use super::error::GeoError;
use super::geojson::FeatureCollection;
use crate::domain::ml::{UnknownOption, option_set};

/// Distance the backend clusters within when none is given
pub const DEFAULT_CLUSTER_DISTANCE_METERS: f64 = 1000.0;

/// Mapbox style used by the backend when the request names none
pub const DEFAULT_MAPBOX_STYLE: &str = "mapbox://styles/mapbox/satellite-v9";

option_set! {
    /// Overlay file format produced by the export endpoint
    ExportFormat, "export format" {
        GeoJson => "geojson",
        Kml => "kml",
    }
}

impl Default for ExportFormat {
    fn default() -> Self {
        ExportFormat::GeoJson
    }
}

impl ExportFormat {
    pub fn file_extension(&self) -> &'static str {
        self.as_str()
    }
}

option_set! {
    /// Web map library a configuration is generated for
    MapProvider, "map provider" {
        Mapbox => "mapbox",
        Leaflet => "leaflet",
    }
}

impl Default for MapProvider {
    fn default() -> Self {
        MapProvider::Mapbox
    }
}

/// Body of `POST /export-change-detections`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportRequest {
    pub change_detections_base64: String,
    pub image_height: u32,
    pub image_width: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geo_bounds: Option<GeoBounds>,
    #[serde(default)]
    pub export_format: ExportFormat,
}

impl ExportRequest {
    /// Encode `detections` as a JSON data URL and check the image shape and
    /// bounds before anything is sent.
    pub fn new(
        detections: &[ChangeDetection],
        image_height: u32,
        image_width: u32,
        geo_bounds: Option<GeoBounds>,
        export_format: ExportFormat,
    ) -> Result<Self, GeoError> {
        if image_height == 0 || image_width == 0 {
            return Err(GeoError::InvalidImageShape {
                height: image_height,
                width: image_width,
            });
        }
        if let Some(bounds) = &geo_bounds {
            bounds.validate()?;
        }

        Ok(Self {
            change_detections_base64: encode_json_data_url(detections)?,
            image_height,
            image_width,
            geo_bounds,
            export_format,
        })
    }
}

/// Response of `POST /export-change-detections`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportedOverlay {
    pub filename: String,
    pub content_type: String,
    /// `data:<content_type>;base64,...`
    pub data: String,
    pub export_format: ExportFormat,
}

impl ExportedOverlay {
    /// Decoded GeoJSON or KML document
    pub fn decode(&self) -> Result<String, GeoError> {
        parse_data_url(&self.data)?.into_text()
    }

    /// Parse a GeoJSON overlay; KML overlays are rejected
    pub fn feature_collection(&self) -> Result<FeatureCollection, GeoError> {
        if self.export_format != ExportFormat::GeoJson {
            return Err(GeoError::invalid_data_url(format!(
                "{} overlay does not contain GeoJSON",
                self.export_format
            )));
        }
        Ok(serde_json::from_str(&self.decode()?)?)
    }
}

/// Body of `POST /create-map-configuration`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapConfigurationRequest {
    /// GeoJSON as a `data:application/geo+json;base64,` URL or raw JSON text
    pub geojson_data: Option<String>,
    #[serde(default)]
    pub map_provider: MapProvider,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub map_style: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub center_lat: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub center_lon: Option<f64>,
}

impl MapConfigurationRequest {
    pub fn from_geojson_text(geojson: impl Into<String>) -> Self {
        Self {
            geojson_data: Some(geojson.into()),
            map_provider: MapProvider::default(),
            map_style: None,
            center_lat: None,
            center_lon: None,
        }
    }

    pub fn from_feature_collection(collection: &FeatureCollection) -> Result<Self, GeoError> {
        let json = serde_json::to_vec(collection)?;
        Ok(Self::from_geojson_text(encode_data_url(
            "application/geo+json",
            &json,
        )))
    }

    /// Reuse a GeoJSON export without decoding it
    pub fn from_overlay(overlay: &ExportedOverlay) -> Result<Self, GeoError> {
        if overlay.export_format != ExportFormat::GeoJson {
            return Err(GeoError::invalid_data_url(format!(
                "map configuration needs a GeoJSON overlay, got {}",
                overlay.export_format
            )));
        }
        Ok(Self::from_geojson_text(overlay.data.clone()))
    }

    pub fn with_provider(mut self, provider: MapProvider) -> Self {
        self.map_provider = provider;
        self
    }

    pub fn with_style(mut self, style: impl Into<String>) -> Self {
        self.map_style = Some(style.into());
        self
    }

    pub fn with_center(mut self, center: GeoCoordinate) -> Self {
        self.center_lat = Some(center.latitude);
        self.center_lon = Some(center.longitude);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegendItem {
    pub color: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Legend {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    #[serde(default)]
    pub items: Vec<LegendItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapboxView {
    #[serde(rename = "accessToken")]
    pub access_token: String,
    pub style: String,
    /// `[longitude, latitude]`
    pub center: [f64; 2],
    pub zoom: f64,
    #[serde(default)]
    pub pitch: f64,
    #[serde(default)]
    pub bearing: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapboxConfiguration {
    pub mapboxgl: MapboxView,
    /// Mapbox GL layer definitions, passed through untouched
    #[serde(default)]
    pub layers: Vec<serde_json::Value>,
    #[serde(default)]
    pub popup: serde_json::Value,
    #[serde(default)]
    pub controls: BTreeMap<String, bool>,
    pub legend: Legend,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeafletView {
    /// `[latitude, longitude]`
    pub center: [f64; 2],
    pub zoom: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_zoom: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_zoom: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileLayer {
    pub name: String,
    pub url: String,
    #[serde(default)]
    pub attribution: String,
    #[serde(default)]
    pub default: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeafletConfiguration {
    pub map: LeafletView,
    #[serde(default)]
    pub tile_layers: Vec<TileLayer>,
    /// Data, base style and the JS callbacks as strings
    #[serde(default)]
    pub geo_json_layer: serde_json::Value,
    pub legend: Legend,
    #[serde(default)]
    pub controls: BTreeMap<String, bool>,
}

/// Response of `POST /create-map-configuration`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MapConfiguration {
    Mapbox(MapboxConfiguration),
    Leaflet(LeafletConfiguration),
}

impl MapConfiguration {
    pub fn provider(&self) -> MapProvider {
        match self {
            MapConfiguration::Mapbox(_) => MapProvider::Mapbox,
            MapConfiguration::Leaflet(_) => MapProvider::Leaflet,
        }
    }

    /// Map centre; Mapbox stores `[lon, lat]`, Leaflet `[lat, lon]`
    pub fn center(&self) -> GeoCoordinate {
        match self {
            MapConfiguration::Mapbox(config) => GeoCoordinate {
                latitude: config.mapboxgl.center[1],
                longitude: config.mapboxgl.center[0],
            },
            MapConfiguration::Leaflet(config) => GeoCoordinate {
                latitude: config.map.center[0],
                longitude: config.map.center[1],
            },
        }
    }

    pub fn zoom(&self) -> f64 {
        match self {
            MapConfiguration::Mapbox(config) => config.mapboxgl.zoom,
            MapConfiguration::Leaflet(config) => config.map.zoom,
        }
    }

    pub fn legend(&self) -> &Legend {
        match self {
            MapConfiguration::Mapbox(config) => &config.legend,
            MapConfiguration::Leaflet(config) => &config.legend,
        }
    }

    pub fn controls(&self) -> &BTreeMap<String, bool> {
        match self {
            MapConfiguration::Mapbox(config) => &config.controls,
            MapConfiguration::Leaflet(config) => &config.controls,
        }
    }
}

/// Body of `POST /cluster-detections`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterRequest {
    pub change_detections_base64: String,
    pub max_distance_meters: f64,
}

impl ClusterRequest {
    pub fn new(detections: &[ChangeDetection], max_distance_meters: f64) -> Result<Self, GeoError> {
        if !max_distance_meters.is_finite() || max_distance_meters <= 0.0 {
            return Err(GeoError::InvalidDistance(max_distance_meters));
        }

        Ok(Self {
            change_detections_base64: encode_json_data_url(detections)?,
            max_distance_meters,
        })
    }
}
