//! Extension pour intégrer l'analytique dans skyconfig
//!
//! Ce module fournit le trait `AnalyticsConfigExt` qui ajoute à
//! `skyconfig::Config` les réglages du collecteur d'événements, ainsi que
//! [`telemetry_from_config`] qui construit le handle correspondant.

use crate::http::{HttpSink, PLACEHOLDER_TITLE_ID};
use crate::sink::{LogSink, Telemetry};
use anyhow::Result;
use serde_yaml::Value;
use skyconfig::Config;

/// Trait d'extension pour gérer la configuration analytique dans skyconfig
pub trait AnalyticsConfigExt {
    /// Vérifie si l'analytique est activée (défaut : `true`)
    fn get_analytics_enabled(&self) -> Result<bool>;

    /// Active ou désactive l'analytique
    fn set_analytics_enabled(&self, enabled: bool) -> Result<()>;

    /// Identifiant de titre envoyé avec chaque événement
    fn get_analytics_title_id(&self) -> Result<String>;

    fn set_analytics_title_id(&self, title_id: String) -> Result<()>;

    /// URL du collecteur (vide = pas d'envoi distant)
    fn get_analytics_endpoint(&self) -> Result<String>;

    fn set_analytics_endpoint(&self, endpoint: String) -> Result<()>;
}

impl AnalyticsConfigExt for Config {
    fn get_analytics_enabled(&self) -> Result<bool> {
        match self.get_value(&["analytics", "enabled"]) {
            Ok(Value::Bool(b)) => Ok(b),
            _ => Ok(true),
        }
    }

    fn set_analytics_enabled(&self, enabled: bool) -> Result<()> {
        self.set_value(&["analytics", "enabled"], Value::Bool(enabled))
    }

    fn get_analytics_title_id(&self) -> Result<String> {
        match self.get_value(&["analytics", "title_id"]) {
            Ok(Value::String(s)) => Ok(s),
            _ => Ok(PLACEHOLDER_TITLE_ID.to_string()),
        }
    }

    fn set_analytics_title_id(&self, title_id: String) -> Result<()> {
        self.set_value(&["analytics", "title_id"], Value::String(title_id))
    }

    fn get_analytics_endpoint(&self) -> Result<String> {
        match self.get_value(&["analytics", "endpoint"]) {
            Ok(Value::String(s)) => Ok(s),
            _ => Ok(String::new()),
        }
    }

    fn set_analytics_endpoint(&self, endpoint: String) -> Result<()> {
        self.set_value(&["analytics", "endpoint"], Value::String(endpoint))
    }
}

/// Construit le handle de télémétrie décrit par la configuration
///
/// - analytique désactivée : handle inactif
/// - activée sans endpoint : événements écrits dans les logs
/// - activée avec endpoint : envoi au collecteur HTTP
pub fn telemetry_from_config(config: &Config) -> Result<Telemetry> {
    if !config.get_analytics_enabled()? {
        tracing::info!("Analytics disabled");
        return Ok(Telemetry::disabled());
    }

    let endpoint = config.get_analytics_endpoint()?;
    if endpoint.trim().is_empty() {
        tracing::info!("No analytics endpoint configured, logging events locally");
        return Ok(Telemetry::from_sink(LogSink));
    }

    let sink = HttpSink::builder()
        .endpoint(endpoint)
        .title_id(config.get_analytics_title_id()?)
        .build()?;
    Ok(Telemetry::from_sink(sink))
}
