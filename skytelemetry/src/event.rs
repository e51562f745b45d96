//! Telemetry event model
//!
//! Events are serialized the way the analytics collector expects them: an
//! envelope carrying the event name and timestamp, and a flat `body` with
//! snake_case fields.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Format of the `event_time` field (UTC)
pub const EVENT_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// An analytics event emitted by a scene component
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TelemetryEvent {
    /// Weather data was received for a city
    WeatherDataReceived {
        city_name: String,
        weather_condition: String,
        temperature: f32,
        humidity: f32,
    },
    /// The active city changed
    CityChanged { from_city: String, to_city: String },
    /// A skybox preset was selected
    SkyboxChanged {
        weather_condition: String,
        skybox_type: String,
        is_daytime: bool,
    },
    /// A remote image fetch completed
    ImageDownload {
        image_url: String,
        success: bool,
        #[serde(skip_serializing_if = "Option::is_none")]
        error_message: Option<String>,
    },
}

impl TelemetryEvent {
    /// Builds an `image_download` event; an empty diagnostic is omitted
    pub fn image_download(image_url: &str, success: bool, diagnostic: &str) -> Self {
        Self::ImageDownload {
            image_url: image_url.to_string(),
            success,
            error_message: if diagnostic.is_empty() {
                None
            } else {
                Some(diagnostic.to_string())
            },
        }
    }

    /// Name under which the collector files the event
    pub fn name(&self) -> &'static str {
        match self {
            Self::WeatherDataReceived { .. } => "weather_data_received",
            Self::CityChanged { .. } => "city_changed",
            Self::SkyboxChanged { .. } => "skybox_changed",
            Self::ImageDownload { .. } => "image_download",
        }
    }
}

/// Wire representation of an event sent to the collector
#[derive(Debug, Clone, Serialize)]
pub struct EventEnvelope {
    pub title_id: String,
    pub session_id: String,
    pub event_name: &'static str,
    pub event_time: String,
    pub body: TelemetryEvent,
}

impl EventEnvelope {
    /// Wraps `event`, stamping it with `at`
    pub fn new(
        title_id: impl Into<String>,
        session_id: impl Into<String>,
        event: TelemetryEvent,
        at: DateTime<Utc>,
    ) -> Self {
        Self {
            title_id: title_id.into(),
            session_id: session_id.into(),
            event_name: event.name(),
            event_time: at.format(EVENT_TIME_FORMAT).to_string(),
            body: event,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn test_image_download_omits_empty_diagnostic() {
        let event = TelemetryEvent::image_download("img://A", true, "");
        assert_eq!(
            serde_json::to_value(&event).unwrap(),
            json!({"image_url": "img://A", "success": true})
        );

        let event = TelemetryEvent::image_download("img://A", false, "HTTP 404");
        assert_eq!(
            serde_json::to_value(&event).unwrap(),
            json!({"image_url": "img://A", "success": false, "error_message": "HTTP 404"})
        );
    }

    #[test]
    fn test_envelope_layout() {
        let at = Utc.with_ymd_and_hms(2024, 3, 9, 17, 5, 2).unwrap();
        let event = TelemetryEvent::CityChanged {
            from_city: "Tokyo, JP".into(),
            to_city: "London, UK".into(),
        };
        let envelope = EventEnvelope::new("ABC", "session", event, at);

        assert_eq!(
            serde_json::to_value(&envelope).unwrap(),
            json!({
                "title_id": "ABC",
                "session_id": "session",
                "event_name": "city_changed",
                "event_time": "2024-03-09 17:05:02",
                "body": {"from_city": "Tokyo, JP", "to_city": "London, UK"}
            })
        );
    }
}
