// src/services/errors.rs

use std::fmt;

#[derive(Debug)]
pub enum RelayError {
    Config(String),
    InvalidHeader(String),
    Transport(String),
    Timeout,
}

impl fmt::Display for RelayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RelayError::Config(msg) => write!(f, "Configuration Error: {}", msg),
            RelayError::InvalidHeader(msg) => write!(f, "Invalid Header: {}", msg),
            RelayError::Transport(msg) => write!(f, "Upstream Request Failed: {}", msg),
            RelayError::Timeout => write!(f, "Upstream Request Timed Out"),
        }
    }
}

impl std::error::Error for RelayError {}

// reqwest errors carry the request URL; timeouts get their own variant so the
// step record can say so plainly.
impl From<reqwest::Error> for RelayError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            RelayError::Timeout
        } else {
            RelayError::Transport(err.without_url().to_string())
        }
    }
}

impl From<reqwest::header::InvalidHeaderValue> for RelayError {
    fn from(err: reqwest::header::InvalidHeaderValue) -> Self {
        RelayError::InvalidHeader(err.to_string())
    }
}
