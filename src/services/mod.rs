//! Service module that exports interfaces to external applications, APIs, etc.

pub mod elevation;

// rexport some traits and utilty functions
pub use elevation::{
    new_elevation_handler, CancelToken, ElevationDataSource, ElevationLookupService,
    LatestLookup, LookupHandle,
};
