use get_elevation::cli::Cli;
use get_elevation::config::{default_config_path, Config};
use log::debug;
use simplelog::{Config as LogConfig, TermLogger, TerminalMode};
use structopt::StructOpt;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let opt = Cli::from_args();
    let config = Config::load_from_path(opt.config_path())?;
    let level_filter = opt.verbosity(config.log_level());
    TermLogger::init(level_filter, LogConfig::default(), TerminalMode::Mixed)?;
    match opt.config_path() {
        Some(path) => debug!("Loaded configuration from {:?}", path),
        None => debug!("Using configuration from {:?} if present", default_config_path()),
    }

    // execute subcommand
    opt.execute_subcommand(config)
}
