//! Geographic bounding boxes, region defaults and pixel mapping

use serde::{Deserialize, Serialize};
use std::fmt;

use super::error::GeoError;

/// Geographic bounding box in WGS84 degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoBounds {
    pub north: f64,
    pub south: f64,
    pub east: f64,
    pub west: f64,
}

/// Geographic coordinate in WGS84 degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoCoordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoBounds {
    pub const fn new(north: f64, south: f64, east: f64, west: f64) -> Self {
        Self {
            north,
            south,
            east,
            west,
        }
    }

    /// Check every bounds invariant, reporting the first one violated
    pub fn validate(&self) -> Result<(), GeoError> {
        for (name, value) in [
            ("north", self.north),
            ("south", self.south),
            ("east", self.east),
            ("west", self.west),
        ] {
            if !value.is_finite() {
                return Err(GeoError::invalid_bounds(format!(
                    "{} is not a finite number",
                    name
                )));
            }
        }

        for (name, value) in [("north", self.north), ("south", self.south)] {
            if !(-90.0..=90.0).contains(&value) {
                return Err(GeoError::invalid_bounds(format!(
                    "{} latitude {} outside [-90, 90]",
                    name, value
                )));
            }
        }

        for (name, value) in [("east", self.east), ("west", self.west)] {
            if !(-180.0..=180.0).contains(&value) {
                return Err(GeoError::invalid_bounds(format!(
                    "{} longitude {} outside [-180, 180]",
                    name, value
                )));
            }
        }

        if self.north <= self.south {
            return Err(GeoError::invalid_bounds(format!(
                "north ({}) must be greater than south ({})",
                self.north, self.south
            )));
        }

        if self.east <= self.west {
            return Err(GeoError::invalid_bounds(format!(
                "east ({}) must be greater than west ({})",
                self.east, self.west
            )));
        }

        Ok(())
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    pub fn center(&self) -> GeoCoordinate {
        GeoCoordinate {
            latitude: (self.north + self.south) / 2.0,
            longitude: (self.east + self.west) / 2.0,
        }
    }

    pub fn contains(&self, point: GeoCoordinate) -> bool {
        (self.south..=self.north).contains(&point.latitude)
            && (self.west..=self.east).contains(&point.longitude)
    }

    /// Smallest box covering both
    pub fn union(&self, other: &GeoBounds) -> GeoBounds {
        GeoBounds {
            north: self.north.max(other.north),
            south: self.south.min(other.south),
            east: self.east.max(other.east),
            west: self.west.min(other.west),
        }
    }
}

impl fmt::Display for GeoBounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "N {:.4}, S {:.4}, E {:.4}, W {:.4}",
            self.north, self.south, self.east, self.west
        )
    }
}

/// Predicate form of [`GeoBounds::validate`]; never panics
pub fn validate_bounds(bounds: &GeoBounds) -> bool {
    bounds.is_valid()
}

/// Named regions with preset bounds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    Amazon,
    Borneo,
    California,
    Default,
}

impl Region {
    pub const ALL: [Region; 4] = [
        Region::Amazon,
        Region::Borneo,
        Region::California,
        Region::Default,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Region::Amazon => "amazon",
            Region::Borneo => "borneo",
            Region::California => "california",
            Region::Default => "default",
        }
    }

    pub fn from_key(key: &str) -> Option<Region> {
        let key = key.trim().to_ascii_lowercase();
        Region::ALL.into_iter().find(|r| r.key() == key)
    }

    pub fn bounds(&self) -> GeoBounds {
        match self {
            Region::Amazon => GeoBounds::new(5.3, -20.0, -44.0, -81.4),
            Region::Borneo => GeoBounds::new(7.4, -4.4, 119.3, 108.6),
            Region::California => GeoBounds::new(42.0, 32.5, -114.1, -124.5),
            Region::Default => GeoBounds::new(40.0, 39.0, -73.0, -74.0),
        }
    }
}

/// Preset bounds for a region key; unknown keys fall back to `default`
pub fn default_bounds(region: &str) -> GeoBounds {
    Region::from_key(region).unwrap_or(Region::Default).bounds()
}

/// Map a pixel position in an image of `height` x `width` onto `bounds`.
///
/// Pixel (0, 0) is the top-left corner, which maps to (north, west).
pub fn pixel_to_geo(
    pixel_x: f64,
    pixel_y: f64,
    height: u32,
    width: u32,
    bounds: &GeoBounds,
) -> Result<GeoCoordinate, GeoError> {
    if height == 0 || width == 0 {
        return Err(GeoError::InvalidImageShape { height, width });
    }

    let norm_x = pixel_x / f64::from(width);
    let norm_y = 1.0 - pixel_y / f64::from(height);

    Ok(GeoCoordinate {
        latitude: bounds.south + norm_y * (bounds.north - bounds.south),
        longitude: bounds.west + norm_x * (bounds.east - bounds.west),
    })
}
