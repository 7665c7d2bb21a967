use std::fmt;

#[derive(Debug)]
pub enum ReconError {
    /// TOML parse / deserialization error.
    ConfigParse(String),
    /// Policy validation error (inverted thresholds, bad factor, etc.).
    ConfigValidation(String),
}

impl fmt::Display for ReconError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigParse(msg) => write!(f, "policy parse error: {msg}"),
            Self::ConfigValidation(msg) => write!(f, "policy validation error: {msg}"),
        }
    }
}

impl std::error::Error for ReconError {}
