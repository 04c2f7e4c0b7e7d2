use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use thiserror::Error;

use crate::models::Partido;

pub const PARTIDOS_PATH: &str = "/api/partidos";

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("match list API error {status}: {body}")]
    Status { status: StatusCode, body: String },
    #[error("malformed match list: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Anything that can hand back the current match list.
#[async_trait]
pub trait MatchSource: Send + Sync {
    async fn fetch_partidos(&self) -> Result<Vec<Partido>, FetchError>;
}

/// Fetches `/api/partidos` from the fixture site. Requests carry no timeout.
pub struct HttpFetcher {
    client: Client,
    endpoint: String,
}

impl HttpFetcher {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            endpoint: format!("{}{}", base_url.trim_end_matches('/'), PARTIDOS_PATH),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl MatchSource for HttpFetcher {
    async fn fetch_partidos(&self) -> Result<Vec<Partido>, FetchError> {
        let transport = |source: reqwest::Error| FetchError::Transport {
            url: self.endpoint.clone(),
            source,
        };

        let response = self
            .client
            .get(&self.endpoint)
            .send()
            .await
            .map_err(transport)?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::Status { status, body });
        }

        let body = response.text().await.map_err(transport)?;
        let partidos: Vec<Partido> = serde_json::from_str(&body)?;
        tracing::debug!("Fetched {} partidos from {}", partidos.len(), self.endpoint);
        Ok(partidos)
    }
}
