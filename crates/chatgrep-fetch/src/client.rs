//! HTTP client for archive instances.

use reqwest::{Client, Response};
use std::time::Duration;
use thiserror::Error;

/// Configuration for the archive client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Whole-request timeout, including the body. `None` lets long pages stream.
    pub timeout: Option<Duration>,
    /// Connection establishment timeout.
    pub connect_timeout: Duration,
    /// User agent string.
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: None,
            connect_timeout: Duration::from_secs(10),
            user_agent: format!("chatgrep/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Errors that can occur while fetching from an archive.
///
/// Every variant is a transport failure: it ends the current channel's search
/// but not the run. Nothing is retried.
#[derive(Error, Debug)]
pub enum FetchError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Server answered with a non-success status.
    #[error("server returned {status} for {url}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// The requested URL.
        url: String,
    },

    /// Reading the response body failed mid-stream.
    #[error("error reading response body: {0}")]
    Body(#[source] std::io::Error),
}

/// HTTP client for one or more archive instances.
#[derive(Debug, Clone)]
pub struct ArchiveClient {
    client: Client,
    config: ClientConfig,
}

impl ArchiveClient {
    /// Creates a new client with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(config: ClientConfig) -> Result<Self, reqwest::Error> {
        let mut builder = Client::builder()
            .tcp_nodelay(true)
            .tcp_keepalive(Duration::from_secs(60))
            .connect_timeout(config.connect_timeout)
            .user_agent(&config.user_agent)
            .gzip(true);
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
            config,
        })
    }

    /// Creates a client with default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn with_defaults() -> Result<Self, reqwest::Error> {
        Self::new(ClientConfig::default())
    }

    /// Returns the client configuration.
    #[must_use]
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Issues a GET request and checks the response status.
    ///
    /// The body is left unread for the caller to stream.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Http`] on transport failure and
    /// [`FetchError::Status`] on a non-success status.
    pub async fn get(&self, url: &str) -> Result<Response, FetchError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        Ok(response)
    }
}
