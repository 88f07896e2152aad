use serde::Serialize;
use std::fmt;

/// Square metres in one hectare
pub const SQUARE_METERS_PER_HECTARE: f64 = 10_000.0;
/// Square metres in one square kilometre
pub const SQUARE_METERS_PER_KM2: f64 = 1_000_000.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AreaUnit {
    #[serde(rename = "m²")]
    SquareMeters,
    #[serde(rename = "hectares")]
    Hectares,
    #[serde(rename = "km²")]
    SquareKilometers,
}

impl AreaUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            AreaUnit::SquareMeters => "m²",
            AreaUnit::Hectares => "hectares",
            AreaUnit::SquareKilometers => "km²",
        }
    }
}

/// An area rendered for display: `value` is already formatted
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormattedArea {
    pub value: String,
    pub unit: AreaUnit,
}

impl fmt::Display for FormattedArea {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.value, self.unit.as_str())
    }
}

/// Pick a display unit for an area in square metres.
///
/// Below 10 000 m² the raw value is kept; from 10 000 m² hectares are used and
/// from 1 000 000 m² square kilometres, both with two decimals.
pub fn format_area(square_meters: f64) -> FormattedArea {
    if square_meters < SQUARE_METERS_PER_HECTARE {
        FormattedArea {
            value: format!("{}", square_meters),
            unit: AreaUnit::SquareMeters,
        }
    } else if square_meters < SQUARE_METERS_PER_KM2 {
        FormattedArea {
            value: format!("{:.2}", square_meters / SQUARE_METERS_PER_HECTARE),
            unit: AreaUnit::Hectares,
        }
    } else {
        FormattedArea {
            value: format!("{:.2}", square_meters / SQUARE_METERS_PER_KM2),
            unit: AreaUnit::SquareKilometers,
        }
    }
}

pub fn hectares_to_square_meters(hectares: f64) -> f64 {
    hectares * SQUARE_METERS_PER_HECTARE
}
