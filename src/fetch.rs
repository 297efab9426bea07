use std::time::Duration;

use reqwest::blocking::Client;

use crate::config::Config;
use crate::error::ScrapeError;

/// The one network capability the pipeline needs: fetch a URL and return
/// the raw HTML body. Implemented over a blocking reqwest client in
/// production; tests point `HttpSource` at a mock server or supply their
/// own implementation.
pub trait DocumentSource {
    fn fetch(&self, url: &str) -> Result<String, ScrapeError>;
}

pub struct HttpSource {
    client: Client,
    verbose: u8,
}

impl HttpSource {
    pub fn new(config: &Config) -> Result<Self, ScrapeError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|source| ScrapeError::Network {
                url: config.base_url.clone(),
                source,
            })?;
        Ok(HttpSource {
            client,
            verbose: config.verbose,
        })
    }

    /// Same as `new` but accepts a prebuilt client for test injection.
    pub fn with_client(client: Client, verbose: u8) -> Self {
        HttpSource { client, verbose }
    }
}

impl DocumentSource for HttpSource {
    fn fetch(&self, url: &str) -> Result<String, ScrapeError> {
        vprintln!(self.verbose, 1, "GET {url}");
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|source| ScrapeError::Network {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScrapeError::HttpStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        response.text().map_err(|source| ScrapeError::Network {
            url: url.to_string(),
            source,
        })
    }
}

/// Join a site-relative href onto the base URL without doubling or
/// dropping the separating slash.
pub fn join_url(base: &str, href: &str) -> String {
    let base = base.trim_end_matches('/');
    let href = href.trim_start_matches('/');
    format!("{base}/{href}")
}
