//! Define the lookup subcommand
use crate::config::Config;
use crate::services::{ElevationLookupService, LookupHandle};
use crate::{Coordinate, Error};
use log::{debug, error};
use std::io::{self, Write};
use structopt::StructOpt;

/// Look up the elevation of one or more coordinates
#[derive(Debug, StructOpt)]
pub struct LookupOpts {
    /// Coordinates formatted as <lat>,<lng> in decimal degrees, e.g. 51.8419,10.7853
    #[structopt(name = "COORDINATES", required = true, allow_hyphen_values = true)]
    coordinates: Vec<Coordinate>,
}

impl LookupOpts {
    pub fn coordinates(&self) -> &[Coordinate] {
        &self.coordinates
    }
}

/// Implementation of the `lookup` subcommand
pub fn lookup_command(config: Config, opts: LookupOpts) -> Result<(), Box<dyn std::error::Error>> {
    let service = match ElevationLookupService::from_config(&config) {
        Ok(service) => service,
        Err(e) => {
            error!("Could not initialize the elevation service {}", e);
            return Err(Box::new(e));
        }
    };

    // an unlocked handle, the logger writes to stdout from the worker threads
    let failed = print_lookups(&service, &opts.coordinates, &mut io::stdout())?;
    if failed > 0 {
        return Err(Box::new(Error::Other(format!(
            "{} of {} elevation lookups failed",
            failed,
            opts.coordinates.len()
        ))));
    }
    Ok(())
}

/// Look up all coordinates concurrently and write one `lat,lng: label` line per successful
/// lookup in input order. Returns the number of failed lookups.
///
/// `out` must not be a held `StdoutLock` when logging goes to stdout, workers log before
/// they deliver their result.
pub fn print_lookups<W: Write>(
    service: &ElevationLookupService,
    coordinates: &[Coordinate],
    out: &mut W,
) -> io::Result<usize> {
    // start every request before waiting on any of them so they run concurrently
    let handles: Vec<LookupHandle> = coordinates
        .iter()
        .map(|c| service.spawn_lookup(*c))
        .collect();

    let mut failed = 0;
    for lookup in handles {
        let coordinate = lookup.coordinate();
        match lookup.wait() {
            Ok(result) => {
                writeln!(out, "{}: {}", coordinate, result.label())?;
                out.flush()?;
            }
            Err(e) => {
                error!("({}) {}", coordinate, e.user_message());
                debug!("{}", e);
                failed += 1;
            }
        }
    }
    Ok(failed)
}
