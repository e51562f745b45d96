//! Extension pour intégrer la météo dans skyconfig
//!
//! Ce module fournit le trait `WeatherConfigExt` qui ajoute à
//! `skyconfig::Config` les réglages de l'API météo et la liste des villes.
//!
//! # Exemple
//!
//! ```no_run
//! use skyconfig::Config;
//! use skyweather::WeatherConfigExt;
//!
//! # fn main() -> anyhow::Result<()> {
//! let config = Config::load_config("")?;
//!
//! for city in config.get_weather_cities()? {
//!     println!("{}", city.display_name);
//! }
//! let client = config.create_weather_client()?;
//! # Ok(())
//! # }
//! ```

use crate::client::{WeatherClient, DEFAULT_BASE_URL, DEFAULT_REQUEST_TIMEOUT_SECS};
use crate::models::{default_cities, City};
use anyhow::Result;
use serde_yaml::Value;
use skyconfig::Config;
use std::time::Duration;

/// Délai par défaut entre deux changements de ville (60 secondes)
pub const DEFAULT_REFRESH_INTERVAL_SECS: u64 = 60;

/// Trait d'extension pour gérer la configuration météo dans skyconfig
pub trait WeatherConfigExt {
    /// Clé de l'API météo (vide si absente)
    fn get_weather_api_key(&self) -> Result<String>;

    fn set_weather_api_key(&self, api_key: String) -> Result<()>;

    /// URL de l'endpoint météo courant
    fn get_weather_base_url(&self) -> Result<String>;

    fn set_weather_base_url(&self, url: String) -> Result<()>;

    /// Timeout des requêtes, en secondes (défaut : 30)
    fn get_weather_timeout_secs(&self) -> Result<u64>;

    fn set_weather_timeout_secs(&self, secs: u64) -> Result<()>;

    /// Délai entre deux villes, en secondes (défaut : 60)
    fn get_weather_refresh_interval_secs(&self) -> Result<u64>;

    fn set_weather_refresh_interval_secs(&self, secs: u64) -> Result<()>;

    /// Liste des villes
    ///
    /// Une liste absente, vide ou invalide est remplacée par les villes
    /// par défaut.
    fn get_weather_cities(&self) -> Result<Vec<City>>;

    fn set_weather_cities(&self, cities: &[City]) -> Result<()>;

    /// Crée le client météo configuré
    fn create_weather_client(&self) -> Result<WeatherClient>;
}

impl WeatherConfigExt for Config {
    fn get_weather_api_key(&self) -> Result<String> {
        match self.get_value(&["weather", "api_key"]) {
            Ok(Value::String(s)) => Ok(s),
            _ => Ok(String::new()),
        }
    }

    fn set_weather_api_key(&self, api_key: String) -> Result<()> {
        self.set_value(&["weather", "api_key"], Value::String(api_key))
    }

    fn get_weather_base_url(&self) -> Result<String> {
        match self.get_value(&["weather", "base_url"]) {
            Ok(Value::String(s)) if !s.trim().is_empty() => Ok(s),
            _ => Ok(DEFAULT_BASE_URL.to_string()),
        }
    }

    fn set_weather_base_url(&self, url: String) -> Result<()> {
        self.set_value(&["weather", "base_url"], Value::String(url))
    }

    fn get_weather_timeout_secs(&self) -> Result<u64> {
        Ok(self.get_u64_or(&["weather", "timeout_secs"], DEFAULT_REQUEST_TIMEOUT_SECS))
    }

    fn set_weather_timeout_secs(&self, secs: u64) -> Result<()> {
        self.set_u64(&["weather", "timeout_secs"], secs)
    }

    fn get_weather_refresh_interval_secs(&self) -> Result<u64> {
        Ok(self.get_u64_or(
            &["weather", "refresh_interval_secs"],
            DEFAULT_REFRESH_INTERVAL_SECS,
        ))
    }

    fn set_weather_refresh_interval_secs(&self, secs: u64) -> Result<()> {
        self.set_u64(&["weather", "refresh_interval_secs"], secs)
    }

    fn get_weather_cities(&self) -> Result<Vec<City>> {
        match self.get_typed::<Vec<City>>(&["weather", "cities"]) {
            Ok(cities) if !cities.is_empty() => Ok(cities),
            Ok(_) => {
                tracing::warn!("Empty city list in configuration, using defaults");
                Ok(default_cities())
            }
            Err(e) => {
                tracing::warn!("Invalid city list in configuration ({}), using defaults", e);
                Ok(default_cities())
            }
        }
    }

    fn set_weather_cities(&self, cities: &[City]) -> Result<()> {
        self.set_typed(&["weather", "cities"], &cities)
    }

    fn create_weather_client(&self) -> Result<WeatherClient> {
        let client = WeatherClient::builder()
            .base_url(self.get_weather_base_url()?)
            .api_key(self.get_weather_api_key()?)
            .timeout(Duration::from_secs(self.get_weather_timeout_secs()?))
            .build()?;
        Ok(client)
    }
}
