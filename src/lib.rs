//! Look up the elevation of a GPS coordinate through a remote elevation API.
//!
//! The lookup itself is a blocking HTTP request, [`ElevationLookupService`] runs it on a
//! worker thread and hands back a cancellable [`LookupHandle`] so callers never block their
//! own event thread on the network.
pub mod cli;
pub mod config;
mod error;
pub use error::{Error, LookupError};
mod gps;
pub use gps::{Coordinate, ElevationResult};
pub mod services;
pub use services::{
    CancelToken, ElevationDataSource, ElevationLookupService, LatestLookup, LookupHandle,
};
