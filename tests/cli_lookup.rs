use get_elevation::cli::{print_lookups, Cli};
use get_elevation::config::Config;
use get_elevation::{Coordinate, ElevationLookupService};
use simplelog::{Config as LogConfig, LevelFilter, SimpleLogger, TermLogger, TerminalMode};
use std::sync::mpsc;
use std::sync::Once;
use std::thread;
use std::time::Duration;
use structopt::StructOpt;

mod common;
use common::TestServer;

static LOGGING: Once = Once::new();

/// Log info records to stdout the same way the binary does
fn init_logging() {
    LOGGING.call_once(|| {
        if TermLogger::init(LevelFilter::Info, LogConfig::default(), TerminalMode::Mixed).is_err() {
            let _ = SimpleLogger::init(LevelFilter::Info, LogConfig::default());
        }
    });
}

/// Answer with ten times the requested latitude, negative latitudes fail with a 500
fn elevation_server(count: usize) -> TestServer {
    TestServer::start(count, |target| {
        let points = target.split("points=").nth(1).unwrap_or("");
        let lat: f64 = points.split(',').next().unwrap().parse().unwrap();
        if lat < 0.0 {
            (500, String::new())
        } else {
            (200, format!(r#"{{"status":"success","data":[{}]}}"#, lat * 10.0))
        }
    })
}

fn config_for(server: &TestServer) -> Config {
    let yaml = format!(
        "
services:
  elevation:
    handler: airmap
    configuration:
      base_url: {}
      timeout_secs: 5
",
        server.base_url()
    );
    Config::load(&mut yaml.as_bytes()).unwrap()
}

/// Run a full command line on another thread, giving up if it does not finish in time
fn run_cli(args: &[&str], config: Config) -> Result<(), String> {
    let cli = Cli::from_iter(args);
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let result = cli.execute_subcommand(config).map_err(|e| e.to_string());
        let _ = tx.send(result);
    });
    rx.recv_timeout(Duration::from_secs(20))
        .expect("lookup command did not finish")
}

fn coord(lat: f64, lng: f64) -> Coordinate {
    Coordinate::new(lat, lng).unwrap()
}

#[test]
fn lookup_command_finishes_with_info_logging() {
    init_logging();
    let server = elevation_server(2);
    let result = run_cli(
        &["get_elevation", "lookup", "51.8,10.6", "47.5,-10.25"],
        config_for(&server),
    );
    assert_eq!(result, Ok(()));
}

#[test]
fn lookup_command_fails_when_a_lookup_fails() {
    init_logging();
    let server = elevation_server(2);
    let result = run_cli(
        &["get_elevation", "lookup", "--", "12.5,1", "-3.25,2"],
        config_for(&server),
    );
    assert_eq!(result, Err("1 of 2 elevation lookups failed".to_string()));
}

#[test]
fn labels_are_printed_in_input_order() {
    init_logging();
    let server = elevation_server(3);
    let service = ElevationLookupService::from_config(&config_for(&server)).unwrap();
    let coordinates = [coord(30.5, 1.0), coord(1.25, 2.0), coord(12.0, 3.0)];

    let mut out = Vec::new();
    let failed = print_lookups(&service, &coordinates, &mut out).unwrap();
    assert_eq!(failed, 0);
    assert_eq!(
        String::from_utf8(out).unwrap(),
        "30.5,1: 305m\n1.25,2: 12.5m\n12,3: 120m\n"
    );
}

#[test]
fn failed_lookups_are_counted_and_skipped() {
    init_logging();
    let server = elevation_server(3);
    let service = ElevationLookupService::from_config(&config_for(&server)).unwrap();
    let coordinates = [coord(2.0, 1.0), coord(-8.0, 1.0), coord(4.0, 1.0)];

    let mut out = Vec::new();
    let failed = print_lookups(&service, &coordinates, &mut out).unwrap();
    assert_eq!(failed, 1);
    assert_eq!(String::from_utf8(out).unwrap(), "2,1: 20m\n4,1: 40m\n");
}
