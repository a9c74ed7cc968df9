//! Module with GPS specific structures
use crate::Error;
use std::fmt;
use std::str::FromStr;

/// Stores a single geospatial point
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Coordinate {
    /// latitude coordinate in degrees
    latitude: f64,
    /// longitude coordinate in degrees
    longitude: f64,
}

impl Coordinate {
    /// Create a coordinate from decimal degrees, latitude must be within [-90, 90] and
    /// longitude within [-180, 180]
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, Error> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(Error::InvalidCoordinate(format!(
                "latitude {} is outside of [-90, 90]",
                latitude
            )));
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(Error::InvalidCoordinate(format!(
                "longitude {} is outside of [-180, 180]",
                longitude
            )));
        }
        Ok(Coordinate {
            latitude,
            longitude,
        })
    }

    /// Return latitude in degrees
    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Return longitude in degrees
    pub fn longitude(&self) -> f64 {
        self.longitude
    }
}

/// Formats as `lat,lng` using the shortest decimal form that round trips, the output never
/// depends on the host locale.
impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.latitude, self.longitude)
    }
}

impl FromStr for Coordinate {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.splitn(2, ',');
        let (lat, lng) = match (parts.next(), parts.next()) {
            (Some(lat), Some(lng)) => (lat.trim(), lng.trim()),
            _ => {
                return Err(Error::InvalidCoordinate(format!(
                    "expected <lat>,<lng> but got '{}'",
                    s
                )))
            }
        };
        let lat = lat
            .parse::<f64>()
            .map_err(|e| Error::InvalidCoordinate(format!("latitude '{}': {}", lat, e)))?;
        let lng = lng
            .parse::<f64>()
            .map_err(|e| Error::InvalidCoordinate(format!("longitude '{}': {}", lng, e)))?;
        Coordinate::new(lat, lng)
    }
}

/// Elevation resolved for a coordinate
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ElevationResult {
    coordinate: Coordinate,
    elevation_meters: f64,
}

impl ElevationResult {
    pub fn new(coordinate: Coordinate, elevation_meters: f64) -> Self {
        ElevationResult {
            coordinate,
            elevation_meters,
        }
    }

    /// Return the coordinate the elevation was requested for
    pub fn coordinate(&self) -> Coordinate {
        self.coordinate
    }

    /// Return elevation in meters
    pub fn elevation_meters(&self) -> f64 {
        self.elevation_meters
    }

    /// Text label to anchor at the coordinate on a map, e.g. "273m"
    pub fn label(&self) -> String {
        format!("{}m", self.elevation_meters)
    }
}
