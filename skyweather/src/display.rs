//! Text shown by the weather panel

use crate::models::{City, WeatherReport};

/// Shown in every field while the first report is loading
pub const LOADING: &str = "Loading...";

pub fn city_label(city: &City) -> String {
    city.display_name.clone()
}

/// `"{main} ({description})"`
pub fn condition_label(report: &WeatherReport) -> String {
    format!("{} ({})", report.weather_main, report.weather_description)
}

/// Temperature with one decimal, humidity as reported
pub fn temperature_label(report: &WeatherReport) -> String {
    format!(
        "Temp: {:.1}°C\nHumidity: {}%",
        report.temperature, report.humidity
    )
}
