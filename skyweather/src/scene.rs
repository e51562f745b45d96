//! Scene presets derived from the weather
//!
//! Pure functions mapping a weather condition and the city's local time to
//! a skybox preset and directional light settings.

use crate::models::WeatherReport;
use chrono::{DateTime, Duration, NaiveDateTime, Timelike, Utc};
use serde::Serialize;

/// Local wall-clock time of a city whose offset from UTC is `timezone_offset_secs`
pub fn city_local_time(now_utc: DateTime<Utc>, timezone_offset_secs: i32) -> NaiveDateTime {
    (now_utc + Duration::seconds(i64::from(timezone_offset_secs))).naive_utc()
}

/// Daytime is `[06:00, 18:00)`
pub fn is_daytime(local: &NaiveDateTime) -> bool {
    (6..18).contains(&local.hour())
}

// ============================================================================
// Skybox
// ============================================================================

/// Skybox slots, in the order the scene assets are registered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SkyboxPreset {
    Day = 0,
    Night = 1,
    Cloudy = 2,
    Rainy = 3,
    Snowy = 4,
}

impl SkyboxPreset {
    pub fn slot(self) -> usize {
        self as usize
    }

    fn by_time(daytime: bool) -> Self {
        if daytime {
            Self::Day
        } else {
            Self::Night
        }
    }
}

/// Category reported to analytics for a skybox change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SkyboxKind {
    Clear,
    Cloudy,
    Rainy,
    Snowy,
    Default,
}

impl SkyboxKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Clear => "Clear",
            Self::Cloudy => "Cloudy",
            Self::Rainy => "Rainy",
            Self::Snowy => "Snowy",
            Self::Default => "Default",
        }
    }
}

impl std::fmt::Display for SkyboxKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SkyboxSelection {
    pub preset: SkyboxPreset,
    pub kind: SkyboxKind,
    /// Always `true` for weather-specific presets
    pub is_daytime: bool,
}

/// Picks the skybox for `condition` at `local` time
///
/// The condition is lower-cased and matched by substring; the first match wins.
pub fn select_skybox(condition: &str, local: &NaiveDateTime) -> SkyboxSelection {
    let weather = condition.to_lowercase();
    let daytime = is_daytime(local);

    let (preset, kind, is_daytime) = if weather.contains("clear") {
        (SkyboxPreset::by_time(daytime), SkyboxKind::Clear, daytime)
    } else if weather.contains("cloud") || weather.contains("overcast") {
        (SkyboxPreset::Cloudy, SkyboxKind::Cloudy, true)
    } else if weather.contains("rain") || weather.contains("drizzle") {
        (SkyboxPreset::Rainy, SkyboxKind::Rainy, true)
    } else if weather.contains("snow") {
        (SkyboxPreset::Snowy, SkyboxKind::Snowy, true)
    } else {
        (SkyboxPreset::by_time(daytime), SkyboxKind::Default, daytime)
    };

    SkyboxSelection {
        preset,
        kind,
        is_daytime,
    }
}

// ============================================================================
// Sun
// ============================================================================

/// Linear RGB colour, components in `[0, 1]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const RED: Rgb = Rgb::new(1.0, 0.0, 0.0);
    pub const WHITE: Rgb = Rgb::new(1.0, 1.0, 1.0);
    pub const NIGHT: Rgb = Rgb::new(0.0, 0.0, 0.3);

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Interpolates towards `other`; `t` is clamped to `[0, 1]`
    pub fn lerp(self, other: Rgb, t: f32) -> Rgb {
        Rgb::new(
            lerp(self.r, other.r, t),
            lerp(self.g, other.g, t),
            lerp(self.b, other.b, t),
        )
    }
}

fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t.clamp(0.0, 1.0)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SunSettings {
    pub intensity: f32,
    pub color: Rgb,
}

/// Directional light for `condition` at `local` time
///
/// Between 06:00 and 18:00 inclusive, `t = |h - 12| / 6` drives both the
/// intensity (0.3 to 1.2) and the colour (red to white). Precipitation
/// halves the intensity, clouds scale it by 0.7.
pub fn sun_settings(condition: &str, local: &NaiveDateTime) -> SunSettings {
    let hour = local.hour() as f32 + local.minute() as f32 / 60.0;

    let (mut intensity, color) = if (6.0..=18.0).contains(&hour) {
        let t = (hour - 12.0).abs() / 6.0;
        (lerp(0.3, 1.2, t), Rgb::RED.lerp(Rgb::WHITE, t))
    } else {
        (0.1, Rgb::NIGHT)
    };

    let weather = condition.to_lowercase();
    if weather.contains("rain") || weather.contains("snow") {
        intensity *= 0.5;
    } else if weather.contains("cloud") {
        intensity *= 0.7;
    }

    SunSettings { intensity, color }
}

// ============================================================================
// Scene state
// ============================================================================

/// Everything the scene shows for the current city
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SceneState {
    pub report: WeatherReport,
    pub local_time: NaiveDateTime,
    pub skybox: SkyboxSelection,
    pub sun: SunSettings,
}

impl SceneState {
    pub fn compute(report: WeatherReport, now_utc: DateTime<Utc>) -> Self {
        let local_time = city_local_time(now_utc, report.timezone);
        let skybox = select_skybox(&report.weather_main, &local_time);
        let sun = sun_settings(&report.weather_main, &local_time);
        Self {
            report,
            local_time,
            skybox,
            sun,
        }
    }
}
