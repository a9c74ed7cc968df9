//! Defines the general error type for the crate and various conversions into it
use reqwest::StatusCode;
use std::convert;
use std::fmt;

/// Reasons a single elevation lookup can fail
#[derive(Debug)]
pub enum LookupError {
    AlreadyDelivered,
    Cancelled,
    EmptyData,
    HttpStatus(StatusCode),
    Interrupted,
    InvalidUrl(String),
    MalformedResponse(String),
    Network(reqwest::Error),
}

impl LookupError {
    /// Short message suitable to show to an end user, e.g. in a notification
    pub fn user_message(&self) -> String {
        match self {
            LookupError::AlreadyDelivered => "Elevation was already delivered".to_string(),
            LookupError::Cancelled => "Elevation request was cancelled".to_string(),
            LookupError::EmptyData => "No elevation data available for this point".to_string(),
            LookupError::HttpStatus(code) => format!("Error getting data: server returned {}", code),
            LookupError::Interrupted => "Elevation request was interrupted".to_string(),
            LookupError::InvalidUrl(_) => "Elevation service is misconfigured".to_string(),
            LookupError::MalformedResponse(_) => "Could not read elevation".to_string(),
            LookupError::Network(e) => format!("Error getting data: {}", e),
        }
    }
}

impl convert::From<reqwest::Error> for LookupError {
    fn from(err: reqwest::Error) -> LookupError {
        LookupError::Network(err)
    }
}

impl fmt::Display for LookupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LookupError::AlreadyDelivered => {
                write!(f, "Elevation lookup result was already handed out")
            }
            LookupError::Cancelled => write!(f, "Elevation lookup was cancelled"),
            LookupError::EmptyData => {
                write!(f, "Elevation response contained an empty data array")
            }
            LookupError::HttpStatus(code) => {
                write!(f, "Elevation data request failed with code: {}", code)
            }
            LookupError::Interrupted => {
                write!(f, "Elevation lookup stopped before delivering a result")
            }
            LookupError::InvalidUrl(url) => write!(f, "Invalid elevation request URL: {}", url),
            LookupError::MalformedResponse(msg) => {
                write!(f, "Malformed elevation response: {}", msg)
            }
            LookupError::Network(e) => write!(f, "Elevation request failed: {}", e),
        }
    }
}

impl std::error::Error for LookupError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LookupError::Network(e) => Some(e),
            _ => None,
        }
    }
}

/// General error type for the crate
#[derive(Debug)]
pub enum Error {
    HttpClient(reqwest::Error),
    InvalidConfigurationValue(String),
    InvalidCoordinate(String),
    Io(std::io::Error),
    Lookup(LookupError),
    Other(String),
    UnknownServiceHandler(String),
    Yaml(serde_yaml::Error),
}

impl convert::From<LookupError> for Error {
    fn from(err: LookupError) -> Error {
        Error::Lookup(err)
    }
}

impl convert::From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Error {
        Error::Io(err)
    }
}

impl convert::From<serde_yaml::Error> for Error {
    fn from(err: serde_yaml::Error) -> Error {
        Error::Yaml(err)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::HttpClient(e) => write!(f, "Could not create the HTTP client: {}", e),
            Error::InvalidConfigurationValue(msg) => write!(f, "{}", msg),
            Error::InvalidCoordinate(msg) => write!(f, "Invalid coordinate: {}", msg),
            Error::Io(e) => write!(f, "{}", e),
            Error::Lookup(e) => write!(f, "{}", e),
            Error::Other(msg) => write!(f, "{}", msg),
            Error::UnknownServiceHandler(msg) => write!(f, "{}", msg),
            Error::Yaml(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::HttpClient(e) => Some(e),
            Error::Io(e) => Some(e),
            Error::Lookup(e) => Some(e),
            Error::Yaml(e) => Some(e),
            _ => None,
        }
    }
}
