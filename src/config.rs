//! Store application configuration that gets read from disk
use crate::services::{new_elevation_handler, ElevationDataSource};
use crate::Error;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_yaml::Value;
use simplelog::LevelFilter;
use std::collections::HashMap;
use std::fs::File;
use std::io::prelude::*;
use std::iter::Iterator;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;

static CONFIG_FILE_NAME: &str = "get-elevation.yml";

/// Defines the allowed keys under the services map
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceType {
    Elevation,
}

/// Type alias for clarity
pub type ServiceParameters = HashMap<String, Value>;

/// Build a service instance from the parameters of its config entry
pub trait FromServiceConfig: Sized {
    fn from_config(config: &ServiceConfig) -> Result<Self, Error>;
}

/// Configuration options for a single service of any type
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ServiceConfig {
    handler: String,
    #[serde(default)]
    configuration: ServiceParameters,
}

impl ServiceConfig {
    pub fn new(handler: &str) -> Self {
        ServiceConfig {
            handler: handler.to_string(),
            configuration: HashMap::new(),
        }
    }

    pub fn handler(&self) -> &str {
        &self.handler
    }

    pub fn parameters(&self) -> impl Iterator<Item = &String> + '_ {
        self.configuration.keys()
    }

    pub fn get_parameter(&self, key: &str) -> Option<&Value> {
        self.configuration.get(key)
    }

    pub fn set_parameter<V: Into<Value>>(&mut self, key: &str, value: V) {
        self.configuration.insert(key.to_string(), value.into());
    }

    pub fn get_parameter_as_string(&self, key: &str) -> Option<Result<String, Error>> {
        self.configuration.get(key).map(|value| {
            value
                .as_str()
                .ok_or_else(|| {
                    Error::InvalidConfigurationValue(format!(
                        "invalid value for {}.{}, expected a string: {:?}",
                        &self.handler, key, value
                    ))
                })
                .map(|v| v.to_string())
        })
    }

    pub fn get_parameter_as_u64(&self, key: &str) -> Option<Result<u64, Error>> {
        self.configuration.get(key).map(|value| {
            value.as_u64().ok_or_else(|| {
                Error::InvalidConfigurationValue(format!(
                    "invalid value for {}.{}, expected a non-negative integer: {:?}",
                    &self.handler, key, value
                ))
            })
        })
    }
}

/// Set a string parameter on the service instance from a ServiceConfig instance
#[macro_export]
macro_rules! set_string_param_from_config {
    ($b:expr, $k:ident, $c:expr) => {
        if let Some(val) = $c.get_parameter_as_string(stringify!($k)) {
            $b.$k = val?
        }
    };
}

/// Set an unsigned integer parameter on the service instance from a ServiceConfig instance
#[macro_export]
macro_rules! set_uint_param_from_config {
    ($b:expr, $k:ident, $c:expr, $o:ident) => {
        if let Some(val) = $c.get_parameter_as_u64(stringify!($k)) {
            $b.$k = val? as $o
        }
    };
}

/// Configuration struct that we can create from the config file used
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    #[serde(
        deserialize_with = "deserialize_level_filter",
        serialize_with = "serialize_level_filter",
        default = "default_level_filter"
    )]
    log_level: LevelFilter,
    #[serde(default)]
    services: HashMap<ServiceType, ServiceConfig>,
}

impl Config {
    pub fn load<T: Read>(source: &mut T) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_reader(source)
    }

    /// Read the config file at the given path, or the default location when no path is
    /// given. A missing default file is not an error, built-in defaults are used instead.
    pub fn load_from_path(path: Option<&Path>) -> Result<Self, Error> {
        let (path, required) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => (default_config_path(), false),
        };
        if !required && !path.exists() {
            return Ok(Config::default());
        }
        let mut fp = File::open(&path)?;
        Ok(Config::load(&mut fp)?)
    }

    pub fn log_level(&self) -> LevelFilter {
        self.log_level
    }

    pub fn service_config(&self, service: ServiceType) -> Option<&ServiceConfig> {
        self.services.get(&service)
    }

    pub fn get_elevation_handler(&self) -> Result<Arc<dyn ElevationDataSource>, Error> {
        match self.services.get(&ServiceType::Elevation) {
            Some(cfg) => new_elevation_handler(cfg),
            None => {
                // the public airmap endpoint needs no credentials so it works as a default
                new_elevation_handler(&ServiceConfig::new("airmap"))
            }
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            log_level: default_level_filter(),
            services: HashMap::new(),
        }
    }
}

/// Location of the config file when none is given on the command line
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(PathBuf::new)
        .join(CONFIG_FILE_NAME)
}

fn deserialize_level_filter<'de, D>(deserializer: D) -> Result<LevelFilter, D::Error>
where
    D: Deserializer<'de>,
{
    let buf = String::deserialize(deserializer)?;
    LevelFilter::from_str(&buf)
        .map_err(|_| serde::de::Error::custom(format!("invalid level value: {}", buf)))
}

fn serialize_level_filter<S>(level: &LevelFilter, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&level.to_string())
}

fn default_level_filter() -> LevelFilter {
    LevelFilter::Info
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_full_config() {
        let yaml = "
log_level: debug
services:
  elevation:
    handler: airmap
    configuration:
      base_url: http://localhost:8080
      timeout_secs: 3
";
        let config = Config::load(&mut yaml.as_bytes()).unwrap();
        assert_eq!(config.log_level(), LevelFilter::Debug);

        let elevation = config.service_config(ServiceType::Elevation).unwrap();
        assert_eq!(elevation.handler(), "airmap");
        assert_eq!(
            elevation.get_parameter_as_string("base_url").unwrap().unwrap(),
            "http://localhost:8080"
        );
        assert_eq!(
            elevation.get_parameter_as_u64("timeout_secs").unwrap().unwrap(),
            3
        );
        assert!(elevation.get_parameter("api_key").is_none());
    }

    #[test]
    fn empty_config_uses_defaults() {
        let config = Config::load(&mut "{}".as_bytes()).unwrap();
        assert_eq!(config.log_level(), LevelFilter::Info);
        assert!(config.service_config(ServiceType::Elevation).is_none());
        assert!(config.get_elevation_handler().is_ok());
    }

    #[test]
    fn invalid_log_level_is_rejected() {
        assert!(Config::load(&mut "log_level: loud".as_bytes()).is_err());
    }

    #[test]
    fn wrongly_typed_parameter_is_an_error() {
        let mut cfg = ServiceConfig::new("airmap");
        cfg.set_parameter("timeout_secs", "ten");
        match cfg.get_parameter_as_u64("timeout_secs") {
            Some(Err(Error::InvalidConfigurationValue(_))) => {}
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn unknown_handler_is_an_error() {
        let yaml = "
services:
  elevation:
    handler: open-elevation
";
        let config = Config::load(&mut yaml.as_bytes()).unwrap();
        match config.get_elevation_handler() {
            Err(Error::UnknownServiceHandler(_)) => {}
            Err(e) => panic!("unexpected error: {}", e),
            Ok(_) => panic!("expected an error for an unknown handler"),
        }
    }

    #[test]
    fn explicit_missing_path_is_an_error() {
        let path = Path::new("/nonexistent/get-elevation.yml");
        assert!(Config::load_from_path(Some(path)).is_err());
    }
}
