//! Define the application's command line interface
use crate::config::Config;
use simplelog::LevelFilter;
use std::path::{Path, PathBuf};
use structopt::StructOpt;

mod lookup;
pub use lookup::print_lookups;
use lookup::{lookup_command, LookupOpts};
mod request_url;
use request_url::{request_url_command, RequestUrlOpts};

/// Look up the elevation of GPS coordinates using a remote elevation API
#[derive(Debug, StructOpt)]
pub struct Cli {
    /// Set logging level to debug, use a second time (e.g. -vv) to set logging to trace
    #[structopt(short, long, parse(from_occurrences))]
    verbose: i32,
    /// Suppress info logging messages use a second time (e.g. -qq) to hide warnings
    #[structopt(short, long, parse(from_occurrences))]
    quiet: i32,
    /// Path of the YAML config file, defaults to get-elevation.yml in the user config directory
    #[structopt(short, long, parse(from_os_str))]
    config: Option<PathBuf>,
    #[structopt(subcommand)]
    cmd: Command,
}

impl Cli {
    /// Return the verbose flag counts as a log level filter
    pub fn verbosity(&self, default: LevelFilter) -> LevelFilter {
        if self.quiet == 1 {
            LevelFilter::Warn
        } else if self.quiet > 1 {
            LevelFilter::Error
        } else if self.verbose == 1 {
            LevelFilter::Debug
        } else if self.verbose > 1 {
            LevelFilter::Trace
        } else {
            default
        }
    }

    /// Config file requested on the command line, if any
    pub fn config_path(&self) -> Option<&Path> {
        self.config.as_deref()
    }

    /// Consume options struct and return the result of subcommand execution
    pub fn execute_subcommand(self, config: Config) -> Result<(), Box<dyn std::error::Error>> {
        self.cmd.execute(config)
    }
}

#[derive(Debug, StructOpt)]
pub enum Command {
    /// Look up and print the elevation of one or more coordinates
    #[structopt(name = "lookup")]
    Lookup(LookupOpts),
    /// Print the request URL used for a coordinate without sending it
    #[structopt(name = "request-url")]
    RequestUrl(RequestUrlOpts),
}

impl Command {
    /// Consume enum variant and return the result of the command's execution
    fn execute(self, config: Config) -> Result<(), Box<dyn std::error::Error>> {
        match self {
            Command::Lookup(opts) => lookup_command(config, opts),
            Command::RequestUrl(opts) => request_url_command(config, opts),
        }
    }
}
