use std::io;
use std::path::PathBuf;

use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum KeysError {
    #[error("--file (-f) must specify a file to read from")]
    MissingKeyFile,
    #[error("unable to read key from file {}", .path.display())]
    EmptyKey { path: PathBuf },
    #[error("failed to read key file {}: {}", .path.display(), .source)]
    KeyFile { path: PathBuf, source: io::Error },
    #[error("invalid API URL: {0}")]
    Url(#[from] url::ParseError),
    #[error("API URL {0} cannot take path segments")]
    BaseUrl(String),
    #[error("http error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("response with status {status} is not valid JSON: {source}")]
    Parse {
        status: StatusCode,
        source: serde_json::Error,
    },
    #[error("failed to write output: {0}")]
    Output(#[from] io::Error),
}

impl KeysError {
    /// Usage errors are reported on stdout and exit with status 1; everything
    /// else propagates to `main`.
    pub fn is_usage(&self) -> bool {
        matches!(self, KeysError::MissingKeyFile | KeysError::EmptyKey { .. })
    }
}
