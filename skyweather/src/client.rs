//! HTTP client for the current-weather API
//!
//! # Example
//!
//! ```no_run
//! use skyweather::{City, WeatherClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = WeatherClient::builder().api_key("my-key").build()?;
//!
//!     let report = client
//!         .current_weather(&City::new("Tokyo", "jp", "Tokyo, JP"))
//!         .await?;
//!     println!("{}: {} {:.1}°C", report.city_name, report.weather_main, report.temperature);
//!
//!     Ok(())
//! }
//! ```

use crate::error::{Error, Result};
use crate::models::{City, WeatherReport, WeatherResponse};
use reqwest::Client;
use std::time::Duration;

/// Default current-weather endpoint
pub const DEFAULT_BASE_URL: &str = "http://api.openweathermap.org/data/2.5/weather";

/// Default timeout for HTTP requests (30 seconds)
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Default User-Agent
pub const DEFAULT_USER_AGENT: &str = "SkyScene/0.1 (skyweather)";

/// Weather HTTP client
///
/// The client is stateless: one request per call, temperatures in metric
/// units.
#[derive(Debug, Clone)]
pub struct WeatherClient {
    client: Client,
    base_url: String,
    api_key: String,
    timeout: Duration,
}

impl WeatherClient {
    /// Create a builder for configuring the client
    pub fn builder() -> ClientBuilder {
        ClientBuilder::default()
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Get the internal HTTP client
    pub fn http_client(&self) -> &Client {
        &self.client
    }

    /// Fetch the raw API payload for `city`
    pub async fn fetch_response(&self, city: &City) -> Result<WeatherResponse> {
        let query = city.query();
        tracing::debug!("Fetching weather for {}", query);

        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("q", query.as_str()),
                ("units", "metric"),
                ("appid", self.api_key.as_str()),
            ])
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Network problem: {}", e);
                Error::Http(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            tracing::error!("Response error: {} for {}", status, query);
            return Err(Error::api_error(format!("HTTP {}", status.as_u16())));
        }

        let body = response.text().await?;
        let payload: WeatherResponse = serde_json::from_str(&body).map_err(|e| {
            tracing::error!("Failed to parse weather data: {}", e);
            Error::Json(e)
        })?;

        Ok(payload)
    }

    /// Current weather for `city`
    pub async fn current_weather(&self, city: &City) -> Result<WeatherReport> {
        let report = WeatherReport::try_from(self.fetch_response(city).await?)?;

        tracing::info!(
            "Weather received for {}: {} {:.1}°C",
            city.display_name,
            report.weather_main,
            report.temperature
        );

        Ok(report)
    }
}

/// Builder for configuring [`WeatherClient`]
pub struct ClientBuilder {
    client: Option<Client>,
    base_url: String,
    api_key: String,
    timeout: Duration,
    user_agent: String,
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self {
            client: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: String::new(),
            timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl ClientBuilder {
    /// Create a new builder with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a custom HTTP client
    pub fn client(mut self, client: Client) -> Self {
        self.client = Some(client);
        self
    }

    /// Set the base URL
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the API key sent as `appid`
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = api_key.into();
        self
    }

    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set a custom User-Agent header
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Build the client
    pub fn build(self) -> Result<WeatherClient> {
        if self.api_key.trim().is_empty() {
            tracing::warn!("No weather API key configured, requests will be rejected");
        }

        let client = match self.client {
            Some(client) => client,
            None => Client::builder()
                .user_agent(&self.user_agent)
                .timeout(self.timeout)
                .build()?,
        };

        Ok(WeatherClient {
            client,
            base_url: self.base_url,
            api_key: self.api_key,
            timeout: self.timeout,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let builder = ClientBuilder::default();
        assert_eq!(builder.base_url, DEFAULT_BASE_URL);
        assert!(builder.api_key.is_empty());
        assert_eq!(
            builder.timeout,
            Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS)
        );
    }

    #[test]
    fn test_builder_overrides() {
        let client = WeatherClient::builder()
            .base_url("http://localhost:1234/weather")
            .api_key("k")
            .build()
            .unwrap();
        assert_eq!(client.base_url(), "http://localhost:1234/weather");
        assert_eq!(client.api_key, "k");
    }
}
