//! HTTP event collector sink
//!
//! Posts each event as a JSON [`EventEnvelope`] to a collector endpoint.
//! Delivery happens on a spawned task: recording never waits for the network
//! and delivery failures are only logged.
//!
//! # Example
//!
//! ```no_run
//! use skytelemetry::{HttpSink, Telemetry};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let sink = HttpSink::builder()
//!         .endpoint("https://collector.example.com/events")
//!         .title_id("A1B2C")
//!         .build()?;
//!
//!     let telemetry = Telemetry::from_sink(sink);
//!     telemetry.city_changed("Tokyo, JP", "London, UK");
//!     Ok(())
//! }
//! ```

use crate::error::{Error, Result};
use crate::event::{EventEnvelope, TelemetryEvent};
use crate::sink::TelemetrySink;
use chrono::Utc;
use reqwest::Client;
use std::time::Duration;
use uuid::Uuid;

/// Placeholder title id shipped in the default configuration
pub const PLACEHOLDER_TITLE_ID: &str = "YOUR_TITLE_ID";

/// Default timeout for collector requests (10 seconds)
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

/// Default User-Agent
pub const DEFAULT_USER_AGENT: &str = "SkyScene/0.1 (skytelemetry)";

/// Sink delivering events to an HTTP collector
#[derive(Debug, Clone)]
pub struct HttpSink {
    client: Client,
    endpoint: String,
    title_id: String,
    session_id: String,
    enabled: bool,
}

impl HttpSink {
    /// Create a builder for configuring the sink
    pub fn builder() -> HttpSinkBuilder {
        HttpSinkBuilder::default()
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Random identifier shared by every event of this process
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// True when the sink is enabled and has a real title id
    pub fn is_ready(&self) -> bool {
        self.enabled
            && !self.endpoint.is_empty()
            && !self.title_id.is_empty()
            && self.title_id != PLACEHOLDER_TITLE_ID
    }

    /// Wraps `event` in an envelope stamped with the current time
    pub fn envelope(&self, event: TelemetryEvent) -> EventEnvelope {
        EventEnvelope::new(&self.title_id, &self.session_id, event, Utc::now())
    }

    /// Posts `envelope` and waits for the collector's answer
    pub async fn send(&self, envelope: &EventEnvelope) -> Result<()> {
        if !self.is_ready() {
            return Err(Error::NotReady);
        }
        post_envelope(&self.client, &self.endpoint, envelope).await
    }
}

async fn post_envelope(client: &Client, endpoint: &str, envelope: &EventEnvelope) -> Result<()> {
    let response = client.post(endpoint).json(envelope).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(Error::api_error(format!("HTTP {}", status)));
    }
    Ok(())
}

impl TelemetrySink for HttpSink {
    fn record(&self, event: TelemetryEvent) {
        if !self.is_ready() {
            tracing::debug!(event = event.name(), "Analytics not ready - skipping event");
            return;
        }

        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            tracing::warn!(
                event = event.name(),
                "No async runtime available, dropping telemetry event"
            );
            return;
        };

        let envelope = self.envelope(event);
        let client = self.client.clone();
        let endpoint = self.endpoint.clone();
        handle.spawn(async move {
            match post_envelope(&client, &endpoint, &envelope).await {
                Ok(()) => tracing::debug!("Event '{}' logged successfully", envelope.event_name),
                Err(e) => tracing::error!("Failed to log event '{}': {}", envelope.event_name, e),
            }
        });
    }
}

/// Builder for [`HttpSink`]
pub struct HttpSinkBuilder {
    client: Option<Client>,
    endpoint: String,
    title_id: String,
    enabled: bool,
    timeout: Duration,
    user_agent: String,
}

impl Default for HttpSinkBuilder {
    fn default() -> Self {
        Self {
            client: None,
            endpoint: String::new(),
            title_id: PLACEHOLDER_TITLE_ID.to_string(),
            enabled: true,
            timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl HttpSinkBuilder {
    /// Create a new builder with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a custom HTTP client
    pub fn client(mut self, client: Client) -> Self {
        self.client = Some(client);
        self
    }

    /// Set the collector URL
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Set the title id attached to every event
    pub fn title_id(mut self, title_id: impl Into<String>) -> Self {
        self.title_id = title_id.into();
        self
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
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

    /// Build the sink
    pub fn build(self) -> Result<HttpSink> {
        let client = match self.client {
            Some(client) => client,
            None => Client::builder()
                .user_agent(&self.user_agent)
                .timeout(self.timeout)
                .build()?,
        };

        let sink = HttpSink {
            client,
            endpoint: self.endpoint,
            title_id: self.title_id,
            session_id: Uuid::new_v4().to_string(),
            enabled: self.enabled,
        };

        if !sink.is_ready() {
            tracing::warn!("Analytics title id or endpoint not set, events will be skipped");
        }

        Ok(sink)
    }
}
