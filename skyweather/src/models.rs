//! Data models for the weather API
//!
//! [`WeatherResponse`] mirrors the JSON payload of the current-weather
//! endpoint; [`WeatherReport`] is the flattened view the scene works with.

use crate::error::{Error, Result};
use chrono::{DateTime, Duration, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// Cities
// ============================================================================

/// A city in the rotation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct City {
    /// Name sent to the API (e.g., "Tokyo")
    pub name: String,
    /// ISO 3166 country code sent to the API (e.g., "jp")
    pub country_code: String,
    /// Human-readable label (e.g., "Tokyo, JP")
    pub display_name: String,
}

impl City {
    pub fn new(
        name: impl Into<String>,
        country_code: impl Into<String>,
        display_name: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            country_code: country_code.into(),
            display_name: display_name.into(),
        }
    }

    /// Value of the `q` query parameter (`"{name},{country_code}"`)
    pub fn query(&self) -> String {
        format!("{},{}", self.name, self.country_code)
    }
}

/// Built-in rotation used when no city is configured
pub fn default_cities() -> Vec<City> {
    vec![
        City::new("Orlando", "us", "Orlando, US"),
        City::new("Tokyo", "jp", "Tokyo, JP"),
        City::new("London", "gb", "London, UK"),
        City::new("Sydney", "au", "Sydney, AU"),
        City::new("Cairo", "eg", "Cairo, EG"),
    ]
}

// ============================================================================
// API payload
// ============================================================================

/// Response from the current-weather endpoint
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WeatherResponse {
    #[serde(default)]
    pub weather: Vec<Condition>,
    pub main: MainReadings,
    pub sys: SysInfo,
    pub name: String,
    /// Observation time (Unix timestamp)
    pub dt: i64,
    /// Shift from UTC in seconds
    pub timezone: i32,
}

/// One weather condition (e.g., "Rain", "light rain")
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Condition {
    pub main: String,
    pub description: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MainReadings {
    /// Temperature in °C (metric units)
    pub temp: f32,
    /// Relative humidity in %
    pub humidity: f32,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SysInfo {
    #[serde(default)]
    pub sunrise: i64,
    #[serde(default)]
    pub sunset: i64,
    #[serde(default)]
    pub country: Option<String>,
}

// ============================================================================
// Flattened report
// ============================================================================

/// Weather of one city, as displayed and mapped to scene presets
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherReport {
    pub city_name: String,
    pub weather_main: String,
    pub weather_description: String,
    pub temperature: f32,
    pub humidity: f32,
    pub sunrise: i64,
    pub sunset: i64,
    pub timestamp: i64,
    pub timezone: i32,
}

impl TryFrom<WeatherResponse> for WeatherReport {
    type Error = Error;

    fn try_from(response: WeatherResponse) -> Result<Self> {
        let condition = response
            .weather
            .into_iter()
            .next()
            .ok_or_else(|| Error::MissingCondition(response.name.clone()))?;

        Ok(Self {
            city_name: response.name,
            weather_main: condition.main,
            weather_description: condition.description,
            temperature: response.main.temp,
            humidity: response.main.humidity,
            sunrise: response.sys.sunrise,
            sunset: response.sys.sunset,
            timestamp: response.dt,
            timezone: response.timezone,
        })
    }
}

impl WeatherReport {
    /// Wall-clock time in the city at `now_utc`
    pub fn local_time(&self, now_utc: DateTime<Utc>) -> NaiveDateTime {
        (now_utc + Duration::seconds(i64::from(self.timezone))).naive_utc()
    }
}
