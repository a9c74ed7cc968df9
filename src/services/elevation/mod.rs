//! Access elevation data for a given GPS coordinate using an external source
use crate::config::{FromServiceConfig, ServiceConfig};
use crate::{Coordinate, Error, LookupError};
use reqwest::Url;
use std::sync::Arc;

mod airmap;
pub use airmap::{AirMapElevationApi, AirMapParameters, AuthMethod};
mod lookup;
pub use lookup::{CancelToken, ElevationLookupService, LatestLookup, LookupHandle};

/// trait that defines how the elevation of a single lat, long coordinate is requested
pub trait ElevationDataSource: Send + Sync {
    /// Request the elevation in meters at the given coordinate
    fn request_elevation(&self, coordinate: Coordinate) -> Result<f64, LookupError>;

    /// Return the URL a request for the given coordinate is sent to
    fn request_url(&self, coordinate: Coordinate) -> Result<Url, LookupError>;

    /// Same as `request_url` but with any credentials masked, safe to show or log
    fn redacted_request_url(&self, coordinate: Coordinate) -> Result<Url, LookupError> {
        self.request_url(coordinate)
    }
}

/// Create an elevation data source from the handler named in the service config
pub fn new_elevation_handler(config: &ServiceConfig) -> Result<Arc<dyn ElevationDataSource>, Error> {
    match config.handler() {
        "airmap" => Ok(Arc::new(AirMapElevationApi::from_config(config)?)),
        _ => Err(Error::UnknownServiceHandler(format!(
            "unknown handler for elevation service: {}",
            config.handler()
        ))),
    }
}
