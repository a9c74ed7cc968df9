//! Define the request-url subcommand
use crate::config::Config;
use crate::Coordinate;
use structopt::StructOpt;

/// Print the URL an elevation request for the coordinate is sent to, API keys are masked
#[derive(Debug, StructOpt)]
pub struct RequestUrlOpts {
    /// Coordinate formatted as <lat>,<lng> in decimal degrees
    #[structopt(name = "COORDINATE", allow_hyphen_values = true)]
    coordinate: Coordinate,
}

/// Implementation of the `request-url` subcommand
pub fn request_url_command(
    config: Config,
    opts: RequestUrlOpts,
) -> Result<(), Box<dyn std::error::Error>> {
    let source = config.get_elevation_handler()?;
    println!("{}", source.redacted_request_url(opts.coordinate)?);
    Ok(())
}
