//! City rotation and scene state
//!
//! [`WeatherManager`] walks a list of cities, fetches each one's weather,
//! publishes the report to subscribers and keeps the resulting
//! [`SceneState`].

use crate::client::WeatherClient;
use crate::error::{Error, Result};
use crate::models::{City, WeatherReport};
use crate::scene::SceneState;
use chrono::{DateTime, Utc};
use skytelemetry::Telemetry;
use tokio::sync::broadcast;

/// Capacity of the update channel; slow subscribers skip older reports
const UPDATE_CHANNEL_CAPACITY: usize = 16;

pub struct WeatherManager {
    client: WeatherClient,
    telemetry: Telemetry,
    cities: Vec<City>,
    current_index: usize,
    current_scene: Option<SceneState>,
    updates: broadcast::Sender<WeatherReport>,
}

impl WeatherManager {
    pub fn new(client: WeatherClient, cities: Vec<City>, telemetry: Telemetry) -> Self {
        if cities.is_empty() {
            tracing::warn!("Weather manager created without any city");
        }
        let (updates, _) = broadcast::channel(UPDATE_CHANNEL_CAPACITY);
        Self {
            client,
            telemetry,
            cities,
            current_index: 0,
            current_scene: None,
            updates,
        }
    }

    /// Receiver for the reports published by every successful refresh
    pub fn subscribe(&self) -> broadcast::Receiver<WeatherReport> {
        self.updates.subscribe()
    }

    pub fn cities(&self) -> &[City] {
        &self.cities
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn current_city(&self) -> Option<&City> {
        self.cities.get(self.current_index)
    }

    /// Scene of the last successful refresh
    pub fn current_scene(&self) -> Option<&SceneState> {
        self.current_scene.as_ref()
    }

    /// Switches to city `index` and refreshes
    ///
    /// An out-of-range index is ignored and yields `Ok(None)`.
    pub async fn change_city(&mut self, index: usize) -> Result<Option<SceneState>> {
        if index >= self.cities.len() {
            tracing::debug!(
                "Ignoring city index {} ({} cities)",
                index,
                self.cities.len()
            );
            return Ok(None);
        }

        self.current_index = index;
        self.refresh().await.map(Some)
    }

    /// Advances to the next city (wrapping) and refreshes
    pub async fn next_city(&mut self) -> Result<SceneState> {
        let len = self.cities.len();
        if len == 0 {
            return Err(Error::NoCities);
        }
        self.rotate_to((self.current_index + 1) % len).await
    }

    /// Goes back to the previous city (wrapping) and refreshes
    pub async fn previous_city(&mut self) -> Result<SceneState> {
        let len = self.cities.len();
        if len == 0 {
            return Err(Error::NoCities);
        }
        self.rotate_to((self.current_index + len - 1) % len).await
    }

    async fn rotate_to(&mut self, index: usize) -> Result<SceneState> {
        let from = self.cities[self.current_index].display_name.clone();
        self.current_index = index;
        let to = &self.cities[index].display_name;

        tracing::info!("Changing city: {} -> {}", from, to);
        self.telemetry.city_changed(&from, to);

        self.refresh().await
    }

    /// Fetches the current city's weather and updates the scene
    pub async fn refresh(&mut self) -> Result<SceneState> {
        self.refresh_at(Utc::now()).await
    }

    /// Same as [`refresh`](Self::refresh), with the clock supplied by the caller
    pub async fn refresh_at(&mut self, now_utc: DateTime<Utc>) -> Result<SceneState> {
        let city = self.current_city().cloned().ok_or(Error::NoCities)?;

        let report = match self.client.current_weather(&city).await {
            Ok(report) => report,
            Err(e) => {
                tracing::error!("Failed to fetch weather for {}: {}", city.display_name, e);
                return Err(e);
            }
        };

        self.telemetry.weather_received(
            &city.display_name,
            &report.weather_main,
            report.temperature,
            report.humidity,
        );

        // No subscriber is not an error
        let _ = self.updates.send(report.clone());

        let scene = SceneState::compute(report, now_utc);
        tracing::info!(
            "Skybox for {}: {:?} ({}), sun intensity {:.2}",
            city.display_name,
            scene.skybox.preset,
            scene.skybox.kind,
            scene.sun.intensity
        );
        self.telemetry.skybox_changed(
            &scene.report.weather_main,
            scene.skybox.kind.as_str(),
            scene.skybox.is_daytime,
        );

        self.current_scene = Some(scene.clone());
        Ok(scene)
    }
}
