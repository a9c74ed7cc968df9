//! Request elevation data for a lat, long coordinate using the AirMap elevation API
use super::ElevationDataSource;
use crate::{
    config::{FromServiceConfig, ServiceConfig},
    set_string_param_from_config, set_uint_param_from_config, Coordinate, Error, LookupError,
};
use log::{debug, trace, warn};
use reqwest::header::{HeaderName, HeaderValue};
use reqwest::{blocking::Client, Url};
use serde::Deserialize;
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

static REDACTED: &str = "REDACTED";

// response format
// {"status":"success","data":[273]}
#[derive(Debug, Deserialize)]
struct Response {
    status: String,
    #[serde(default)]
    data: Option<Value>,
    #[serde(default)]
    message: Option<String>,
}

/// Extract the elevation from the body of a successful (2xx) response
pub fn parse_elevation(body: &str) -> Result<f64, LookupError> {
    let resp: Response = serde_json::from_str(body)
        .map_err(|e| LookupError::MalformedResponse(format!("invalid JSON body: {}", e)))?;
    if resp.status != "success" {
        return Err(LookupError::MalformedResponse(match resp.message {
            Some(msg) => format!("status was '{}': {}", resp.status, msg),
            None => format!("status was '{}'", resp.status),
        }));
    }

    match resp.data {
        Some(Value::Array(values)) => match values.first() {
            Some(value) => value.as_f64().ok_or_else(|| {
                LookupError::MalformedResponse(format!(
                    "expected a number as first data element, got: {}",
                    value
                ))
            }),
            None => Err(LookupError::EmptyData),
        },
        Some(other) => Err(LookupError::MalformedResponse(format!(
            "expected data to be an array, got: {}",
            other
        ))),
        None => Err(LookupError::MalformedResponse(
            "response has no data field".to_string(),
        )),
    }
}

/// How the API key is attached to a request
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AuthMethod {
    /// send the key as a request header
    Header,
    /// send the key as a query parameter
    Query,
}

impl FromStr for AuthMethod {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "header" => Ok(AuthMethod::Header),
            "query" => Ok(AuthMethod::Query),
            _ => Err(Error::InvalidConfigurationValue(format!(
                "invalid auth_method '{}', expected 'header' or 'query'",
                s
            ))),
        }
    }
}

/// Connection parameters of an AirMap compatible elevation endpoint
#[derive(Clone)]
pub struct AirMapParameters {
    pub base_url: String,
    pub api_version: String,
    /// an empty key sends no credentials at all
    pub api_key: String,
    pub auth_method: AuthMethod,
    pub auth_key_name: String,
    pub timeout_secs: u64,
    pub connect_timeout_secs: u64,
}

impl Default for AirMapParameters {
    fn default() -> Self {
        AirMapParameters {
            base_url: "https://api.airmap.com".to_string(),
            api_version: "v1".to_string(),
            api_key: String::new(),
            auth_method: AuthMethod::Header,
            auth_key_name: "X-API-Key".to_string(),
            timeout_secs: 10,
            connect_timeout_secs: 10,
        }
    }
}

/// Never prints the API key
impl fmt::Debug for AirMapParameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let api_key = if self.api_key.is_empty() { "" } else { REDACTED };
        f.debug_struct("AirMapParameters")
            .field("base_url", &self.base_url)
            .field("api_version", &self.api_version)
            .field("api_key", &api_key)
            .field("auth_method", &self.auth_method)
            .field("auth_key_name", &self.auth_key_name)
            .field("timeout_secs", &self.timeout_secs)
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .finish()
    }
}

/// Requests elevation data from the AirMap elevation API (or a compatible host)
#[derive(Clone)]
pub struct AirMapElevationApi {
    params: AirMapParameters,
    auth_header: Option<(HeaderName, HeaderValue)>,
    client: Client,
}

impl AirMapElevationApi {
    /// Validate the parameters and build the HTTP client shared by all requests
    pub fn new(params: AirMapParameters) -> Result<Self, Error> {
        let base_url = Url::parse(&params.base_url).map_err(|e| {
            Error::InvalidConfigurationValue(format!(
                "invalid value for airmap.base_url '{}': {}",
                params.base_url, e
            ))
        })?;
        // the endpoint path and query get appended to the base url as text
        if base_url.cannot_be_a_base() || base_url.query().is_some() || base_url.fragment().is_some()
        {
            return Err(Error::InvalidConfigurationValue(format!(
                "invalid value for airmap.base_url '{}': must not contain a query or fragment",
                params.base_url
            )));
        }
        if params.timeout_secs == 0 || params.connect_timeout_secs == 0 {
            return Err(Error::InvalidConfigurationValue(
                "airmap.timeout_secs and airmap.connect_timeout_secs must be greater than zero"
                    .to_string(),
            ));
        }

        let auth_header = if !params.api_key.is_empty() && params.auth_method == AuthMethod::Header
        {
            let name = HeaderName::from_bytes(params.auth_key_name.as_bytes()).map_err(|e| {
                Error::InvalidConfigurationValue(format!(
                    "invalid header name for airmap.auth_key_name '{}': {}",
                    params.auth_key_name, e
                ))
            })?;
            let mut value = HeaderValue::from_str(&params.api_key).map_err(|e| {
                Error::InvalidConfigurationValue(format!("invalid airmap.api_key: {}", e))
            })?;
            value.set_sensitive(true);
            Some((name, value))
        } else {
            None
        };

        let client = Client::builder()
            .connect_timeout(Duration::from_secs(params.connect_timeout_secs))
            .timeout(Duration::from_secs(params.timeout_secs))
            .build()
            .map_err(Error::HttpClient)?;

        Ok(AirMapElevationApi {
            params,
            auth_header,
            client,
        })
    }

    pub fn parameters(&self) -> &AirMapParameters {
        &self.params
    }

    fn build_url(&self, coordinate: Coordinate, api_key: &str) -> Result<Url, LookupError> {
        // the points list is written out by hand, a form encoder would escape the comma
        let mut url = format!(
            "{}/elevation/{}/ele/?points={}",
            self.params.base_url.trim_end_matches('/'),
            self.params.api_version,
            coordinate
        );
        if !api_key.is_empty() && self.params.auth_method == AuthMethod::Query {
            let auth = form_urlencoded::Serializer::new(String::new())
                .append_pair(&self.params.auth_key_name, api_key)
                .finish();
            url.push('&');
            url.push_str(&auth);
        }
        Url::parse(&url).map_err(|e| LookupError::InvalidUrl(format!("{} ({})", url, e)))
    }
}

impl fmt::Debug for AirMapElevationApi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AirMapElevationApi")
            .field("params", &self.params)
            .field(
                "auth_header",
                &self.auth_header.as_ref().map(|(name, _)| name),
            )
            .finish()
    }
}

impl FromServiceConfig for AirMapElevationApi {
    fn from_config(config: &ServiceConfig) -> Result<Self, Error> {
        let mut base = AirMapParameters::default();
        for key in config.parameters() {
            match key.as_ref() {
                "base_url" => set_string_param_from_config!(base, base_url, config),
                "api_version" => set_string_param_from_config!(base, api_version, config),
                "api_key" => set_string_param_from_config!(base, api_key, config),
                "auth_method" => {
                    if let Some(val) = config.get_parameter_as_string("auth_method") {
                        base.auth_method = val?.parse()?
                    }
                }
                "auth_key_name" => set_string_param_from_config!(base, auth_key_name, config),
                "timeout_secs" => set_uint_param_from_config!(base, timeout_secs, config, u64),
                "connect_timeout_secs" => {
                    set_uint_param_from_config!(base, connect_timeout_secs, config, u64)
                }
                _ => warn!(
                    "unknown configuration parameter for AirMapElevationApi: {}={:?}",
                    key,
                    config.get_parameter(key)
                ),
            }
        }

        AirMapElevationApi::new(base)
    }
}

impl ElevationDataSource for AirMapElevationApi {
    fn request_url(&self, coordinate: Coordinate) -> Result<Url, LookupError> {
        self.build_url(coordinate, &self.params.api_key)
    }

    fn redacted_request_url(&self, coordinate: Coordinate) -> Result<Url, LookupError> {
        if self.params.api_key.is_empty() {
            self.request_url(coordinate)
        } else {
            self.build_url(coordinate, REDACTED)
        }
    }

    fn request_elevation(&self, coordinate: Coordinate) -> Result<f64, LookupError> {
        let request_url = self.request_url(coordinate)?;
        debug!(
            "Requesting elevation for ({}) from {}",
            coordinate,
            request_url.path()
        );

        let mut request = self.client.get(request_url);
        if let Some((name, value)) = &self.auth_header {
            request = request.header(name.clone(), value.clone());
        }
        let resp = request.send()?;
        if !resp.status().is_success() {
            // error bodies are not documented so we don't try to read them
            let code = resp.status();
            warn!("Elevation request for ({}) failed with code {}", coordinate, code);
            return Err(LookupError::HttpStatus(code));
        }

        let body = resp.text()?;
        trace!("Elevation response for ({}): {}", coordinate, body);
        parse_elevation(&body)
    }
}
