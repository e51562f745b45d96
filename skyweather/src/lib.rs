//! Weather for SkyScene
//!
//! This crate fetches the current weather of a rotation of cities and maps
//! it to what the scene displays: a skybox preset, directional light
//! settings and the labels of the weather panel.
//!
//! # Features
//!
//! - **HTTP client**: [`WeatherClient`] for the current-weather endpoint
//!   (metric units)
//! - **Scene presets**: [`select_skybox`] and [`sun_settings`] as pure
//!   functions of the condition and the city's local time
//! - **City rotation**: [`WeatherManager`] with a broadcast channel of
//!   [`WeatherReport`]s and analytics through an optional
//!   [`skytelemetry::Telemetry`] handle
//! - **Configuration Extension**: [`WeatherConfigExt`] when the `skyconfig`
//!   feature is enabled
//!
//! # Example
//!
//! ```no_run
//! use skyweather::{default_cities, WeatherClient, WeatherManager};
//! use skytelemetry::Telemetry;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = WeatherClient::builder().api_key("my-key").build()?;
//!     let mut manager = WeatherManager::new(client, default_cities(), Telemetry::disabled());
//!
//!     let scene = manager.refresh().await?;
//!     println!("{:?} at {}", scene.skybox.preset, scene.local_time);
//!
//!     let scene = manager.next_city().await?;
//!     println!("{}: {:.2}", scene.report.city_name, scene.sun.intensity);
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod display;
pub mod error;
pub mod manager;
pub mod models;
pub mod scene;

#[cfg(feature = "skyconfig")]
pub mod config_ext;

// Re-exports
pub use client::{ClientBuilder, WeatherClient};
pub use error::{Error, Result};
pub use manager::WeatherManager;
pub use models::{default_cities, City, WeatherReport, WeatherResponse};
pub use scene::{
    city_local_time, is_daytime, select_skybox, sun_settings, Rgb, SceneState, SkyboxKind,
    SkyboxPreset, SkyboxSelection, SunSettings,
};

#[cfg(feature = "skyconfig")]
pub use config_ext::WeatherConfigExt;
