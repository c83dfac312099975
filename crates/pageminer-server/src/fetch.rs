//! Native dictionary fetcher: `http(s)` locations over `reqwest`, everything
//! else read from the site root.

use std::path::{Component, Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use pageminer_i18n::{DictionaryFetcher, FetchError};
use reqwest::Client;
use tracing::debug;
use url::Url;

use crate::error::{ServerError, ServerResult};

/// Default per-request timeout for remote dictionary sources.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Fetcher used by the audit command.
#[derive(Clone, Debug)]
pub struct NativeFetcher {
    client: Client,
    root: PathBuf,
    origin: Option<String>,
}

impl NativeFetcher {
    /// Fetcher reading relative locations under `root`, substituting `origin`
    /// into `{origin}` templates when given.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::HttpClient`] when the HTTP client cannot be built.
    pub fn new(
        root: impl Into<PathBuf>,
        origin: Option<&Url>,
        timeout: Duration,
    ) -> ServerResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|source| ServerError::HttpClient { source })?;
        Ok(Self {
            client,
            root: root.into(),
            origin: origin.map(|url| url.as_str().trim_end_matches('/').to_string()),
        })
    }

    /// Site root relative locations resolve against.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    async fn fetch_remote(&self, location: &str) -> Result<Vec<u8>, FetchError> {
        let transport = |err: reqwest::Error| FetchError::Transport {
            location: location.to_string(),
            detail: err.to_string(),
        };
        let response = self.client.get(location).send().await.map_err(transport)?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                location: location.to_string(),
                status: status.as_u16(),
            });
        }
        let body = response.bytes().await.map_err(transport)?;
        Ok(body.to_vec())
    }

    async fn fetch_local(&self, location: &str) -> Result<Vec<u8>, FetchError> {
        let Some(path) = self.local_path(location) else {
            return Err(FetchError::Transport {
                location: location.to_string(),
                detail: "location escapes the site root".to_string(),
            });
        };
        tokio::fs::read(&path)
            .await
            .map_err(|err| FetchError::Transport {
                location: location.to_string(),
                detail: err.to_string(),
            })
    }

    fn local_path(&self, location: &str) -> Option<PathBuf> {
        let relative = Path::new(location.trim_start_matches('/'));
        let mut path = self.root.clone();
        for component in relative.components() {
            match component {
                Component::Normal(part) => path.push(part),
                Component::CurDir => {}
                Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
            }
        }
        Some(path)
    }
}

#[async_trait(?Send)]
impl DictionaryFetcher for NativeFetcher {
    async fn fetch(&self, location: &str) -> Result<Vec<u8>, FetchError> {
        debug!(location, "fetching dictionary");
        if is_remote(location) {
            self.fetch_remote(location).await
        } else {
            self.fetch_local(location).await
        }
    }

    fn origin(&self) -> Option<String> {
        self.origin.clone()
    }
}

fn is_remote(location: &str) -> bool {
    location.starts_with("http://") || location.starts_with("https://")
}
