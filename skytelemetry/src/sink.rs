//! Telemetry sinks and the optional handle passed to scene components

use crate::event::TelemetryEvent;
use std::fmt;
use std::sync::{Arc, Mutex};

/// Destination for telemetry events
///
/// `record` is fire-and-forget: implementations must return quickly and must
/// not report delivery failures to the caller.
pub trait TelemetrySink: Send + Sync {
    fn record(&self, event: TelemetryEvent);
}

/// Optional telemetry collaborator
///
/// Components receive a `Telemetry` at construction time. When no sink is
/// attached every call is a no-op, so call sites never have to check for
/// the collaborator being absent.
#[derive(Clone, Default)]
pub struct Telemetry {
    sink: Option<Arc<dyn TelemetrySink>>,
}

impl fmt::Debug for Telemetry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Telemetry")
            .field("enabled", &self.is_enabled())
            .finish()
    }
}

impl Telemetry {
    /// Handle forwarding to `sink`
    pub fn new(sink: Arc<dyn TelemetrySink>) -> Self {
        Self { sink: Some(sink) }
    }

    /// Handle owning `sink`
    pub fn from_sink<S: TelemetrySink + 'static>(sink: S) -> Self {
        Self::new(Arc::new(sink))
    }

    /// Handle that drops every event
    pub fn disabled() -> Self {
        Self { sink: None }
    }

    pub fn is_enabled(&self) -> bool {
        self.sink.is_some()
    }

    pub fn record(&self, event: TelemetryEvent) {
        if let Some(sink) = &self.sink {
            sink.record(event);
        }
    }

    /// Outcome of a remote resource fetch (`diagnostic` is empty on success)
    pub fn record_fetch_outcome(&self, key: &str, success: bool, diagnostic: &str) {
        if self.is_enabled() {
            self.record(TelemetryEvent::image_download(key, success, diagnostic));
        }
    }

    pub fn weather_received(
        &self,
        city_name: &str,
        weather_condition: &str,
        temperature: f32,
        humidity: f32,
    ) {
        if self.is_enabled() {
            self.record(TelemetryEvent::WeatherDataReceived {
                city_name: city_name.to_string(),
                weather_condition: weather_condition.to_string(),
                temperature,
                humidity,
            });
        }
    }

    pub fn city_changed(&self, from_city: &str, to_city: &str) {
        if self.is_enabled() {
            self.record(TelemetryEvent::CityChanged {
                from_city: from_city.to_string(),
                to_city: to_city.to_string(),
            });
        }
    }

    pub fn skybox_changed(&self, weather_condition: &str, skybox_type: &str, is_daytime: bool) {
        if self.is_enabled() {
            self.record(TelemetryEvent::SkyboxChanged {
                weather_condition: weather_condition.to_string(),
                skybox_type: skybox_type.to_string(),
                is_daytime,
            });
        }
    }
}

/// Sink writing every event to the tracing log
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl TelemetrySink for LogSink {
    fn record(&self, event: TelemetryEvent) {
        match serde_json::to_string(&event) {
            Ok(body) => tracing::info!(event = event.name(), %body, "Telemetry event"),
            Err(e) => tracing::warn!(event = event.name(), "Cannot serialize telemetry event: {}", e),
        }
    }
}

/// Sink keeping events in memory, in recording order
#[derive(Debug, Default)]
pub struct MemorySink {
    events: Mutex<Vec<TelemetryEvent>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the recorded events
    pub fn events(&self) -> Vec<TelemetryEvent> {
        self.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<TelemetryEvent>> {
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl TelemetrySink for MemorySink {
    fn record(&self, event: TelemetryEvent) {
        self.lock().push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_handle_is_noop() {
        let telemetry = Telemetry::disabled();
        assert!(!telemetry.is_enabled());
        telemetry.record_fetch_outcome("img://A", false, "boom");
        telemetry.city_changed("a", "b");
    }

    #[test]
    fn test_handle_forwards_to_sink() {
        let sink = Arc::new(MemorySink::new());
        let telemetry = Telemetry::new(sink.clone());

        telemetry.record_fetch_outcome("img://A", true, "");
        telemetry.skybox_changed("Clear", "Clear", true);

        assert_eq!(
            sink.events(),
            vec![
                TelemetryEvent::ImageDownload {
                    image_url: "img://A".into(),
                    success: true,
                    error_message: None,
                },
                TelemetryEvent::SkyboxChanged {
                    weather_condition: "Clear".into(),
                    skybox_type: "Clear".into(),
                    is_daytime: true,
                },
            ]
        );

        sink.clear();
        assert!(sink.is_empty());
    }

    #[test]
    fn test_clones_share_sink() {
        let sink = Arc::new(MemorySink::new());
        let telemetry = Telemetry::new(sink.clone());
        let other = telemetry.clone();

        telemetry.city_changed("a", "b");
        other.city_changed("b", "c");

        assert_eq!(sink.len(), 2);
    }
}
