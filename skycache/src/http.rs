//! Chargement d'images par HTTP
//!
//! [`HttpImageFetcher`] télécharge une URL, décode la charge utile en
//! [`Texture`] et signale le résultat au collaborateur de télémétrie
//! (optionnel, jamais bloquant).

use crate::fetcher::{FetchError, Fetcher};
use crate::texture::Texture;
use async_trait::async_trait;
use reqwest::Client;
use skytelemetry::Telemetry;
use std::time::Duration;

/// Timeout par défaut des téléchargements (30 secondes)
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// User-Agent par défaut
pub const DEFAULT_USER_AGENT: &str = "SkyScene/0.1 (skycache)";

/// Fetcher d'images HTTP
///
/// Toute réponse hors 2xx, erreur réseau ou image indécodable est un échec.
#[derive(Debug, Clone)]
pub struct HttpImageFetcher {
    client: Client,
    timeout: Duration,
    telemetry: Telemetry,
}

impl HttpImageFetcher {
    /// Crée un fetcher avec les réglages par défaut et sans télémétrie
    pub fn new() -> Result<Self, reqwest::Error> {
        Self::builder().build()
    }

    pub fn builder() -> FetcherBuilder {
        FetcherBuilder::default()
    }

    pub fn telemetry(&self) -> &Telemetry {
        &self.telemetry
    }

    async fn download(&self, url: &str) -> Result<Texture, FetchError> {
        let response = self
            .client
            .get(url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(FetchError::transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
            });
        }

        let bytes = response.bytes().await.map_err(FetchError::transport)?;

        // Le décodage est coûteux en CPU : on le sort du runtime asynchrone
        tokio::task::spawn_blocking(move || Texture::decode(&bytes))
            .await
            .map_err(FetchError::decode)?
    }
}

#[async_trait]
impl Fetcher for HttpImageFetcher {
    type Resource = Texture;

    async fn fetch(&self, url: &str) -> Result<Texture, FetchError> {
        tracing::debug!("Starting download from: {}", url);

        match self.download(url).await {
            Ok(texture) => {
                tracing::info!(
                    "Download successful: {}x{}, Format: {:?}",
                    texture.width(),
                    texture.height(),
                    texture.format()
                );
                self.telemetry.record_fetch_outcome(url, true, "");
                Ok(texture)
            }
            Err(e) => {
                tracing::error!("Failed to download image {}: {}", url, e);
                self.telemetry
                    .record_fetch_outcome(url, false, &e.to_string());
                Err(e)
            }
        }
    }
}

/// Builder pour [`HttpImageFetcher`]
pub struct FetcherBuilder {
    client: Option<Client>,
    timeout: Duration,
    user_agent: String,
    telemetry: Telemetry,
}

impl Default for FetcherBuilder {
    fn default() -> Self {
        Self {
            client: None,
            timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            telemetry: Telemetry::disabled(),
        }
    }
}

impl FetcherBuilder {
    /// Utilise un client HTTP existant (pool de connexions partagé)
    pub fn client(mut self, client: Client) -> Self {
        self.client = Some(client);
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Collaborateur recevant un événement par téléchargement
    pub fn telemetry(mut self, telemetry: Telemetry) -> Self {
        self.telemetry = telemetry;
        self
    }

    pub fn build(self) -> Result<HttpImageFetcher, reqwest::Error> {
        let client = match self.client {
            Some(client) => client,
            None => Client::builder()
                .user_agent(&self.user_agent)
                .timeout(self.timeout)
                .build()?,
        };

        Ok(HttpImageFetcher {
            client,
            timeout: self.timeout,
            telemetry: self.telemetry,
        })
    }
}
