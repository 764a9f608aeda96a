use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Failure to obtain raw diagnostics. Fatal to the current scrape only.
#[derive(Error, Debug)]
pub enum AcquisitionError {
    #[error("{program} not found - is the NVIDIA driver installed?")]
    NotFound { program: PathBuf },

    #[error("Failed to execute {program}: {source}")]
    Spawn {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} exited with {status}: {stderr}")]
    NonZeroExit {
        program: PathBuf,
        status: String,
        stderr: String,
    },

    #[error("Failed to read fixture {path}: {source}")]
    Fixture {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Diagnostics not available after {0:?}")]
    Timeout(Duration),
}

/// The diagnostic document was not well-formed.
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("Malformed diagnostic document: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("Malformed diagnostic document: <{0}> is never closed")]
    Unclosed(String),

    #[error("Malformed diagnostic document: no root element")]
    NoRoot,
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value:?} ({reason})")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}
