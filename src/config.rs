//! Runtime configuration, read from the command line with environment
//! variable fallbacks.

use crate::error::UploadError;
use clap::Parser;
use reqwest::Url;
use std::time::Duration;

pub const DEFAULT_SERVER: &str = "http://127.0.0.1:5000";

#[derive(Debug, Clone, Parser)]
#[command(
    name = "scan-translator",
    version,
    about = "Drop an image, send it to the processing server and read back the extracted fields"
)]
pub struct Config {
    /// Base URL of the processing server. `/process` and `/contact` are
    /// resolved relative to it.
    #[arg(long, env = "SCAN_TRANSLATOR_SERVER", default_value = DEFAULT_SERVER)]
    pub server: Url,

    /// Give up on a request after this many seconds. Unset means wait forever.
    #[arg(long, env = "SCAN_TRANSLATOR_TIMEOUT")]
    pub timeout_secs: Option<u64>,

    /// Log filter used when RUST_LOG is not set, e.g. "debug" or
    /// "scan_translator=trace".
    #[arg(long = "log", env = "SCAN_TRANSLATOR_LOG", default_value = "info")]
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: Url::parse(DEFAULT_SERVER).expect("default server URL is valid"),
            timeout_secs: None,
            log_filter: "info".to_string(),
        }
    }
}

impl Config {
    pub fn with_server(server: Url) -> Self {
        Self {
            server,
            ..Self::default()
        }
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    /// Resolve `route` under the server base URL, keeping any base path.
    pub fn endpoint_url(&self, route: &str) -> Result<Url, UploadError> {
        let mut url = self.server.clone();
        url.path_segments_mut()
            .map_err(|_| UploadError::InvalidServerUrl(self.server.to_string()))?
            .pop_if_empty()
            .push(route);
        Ok(url)
    }
}
