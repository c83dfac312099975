//! Dictionary fetcher over the browser `fetch` API.

use async_trait::async_trait;
use gloo_net::http::Request;
use pageminer_i18n::{DictionaryFetcher, FetchError};

use crate::diagnostics::Diagnostic;

#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct GlooFetcher;

#[async_trait(?Send)]
impl DictionaryFetcher for GlooFetcher {
    async fn fetch(&self, location: &str) -> Result<Vec<u8>, FetchError> {
        fetch_bytes(location)
            .await
            .inspect_err(|err| Diagnostic::for_fetch(err).emit())
    }

    fn origin(&self) -> Option<String> {
        // `file://` pages report the opaque origin "null".
        gloo::utils::window()
            .location()
            .origin()
            .ok()
            .filter(|origin| !origin.is_empty() && origin != "null")
    }
}

async fn fetch_bytes(location: &str) -> Result<Vec<u8>, FetchError> {
    let transport = |err: gloo_net::Error| FetchError::Transport {
        location: location.to_string(),
        detail: err.to_string(),
    };
    let response = Request::get(location).send().await.map_err(transport)?;
    if !response.ok() {
        return Err(FetchError::Status {
            location: location.to_string(),
            status: response.status(),
        });
    }
    response.binary().await.map_err(transport)
}
