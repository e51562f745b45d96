mod billboard;
mod logs;

use billboard::{BillboardConfigExt, spawn_billboards};
use skycache::ImageCacheConfigExt;
use skyconfig::Config;
use skytelemetry::telemetry_from_config;
use skyweather::{WeatherConfigExt, WeatherManager, WeatherReport, display};
use std::time::Duration;
use tokio::sync::broadcast;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ========== PHASE 1 : Configuration et logs ==========
    let config = Config::load_config("")?;
    logs::init_logging(&config);
    info!("🌤️ Starting SkyScene...");

    let telemetry = telemetry_from_config(&config)?;

    // ========== PHASE 2 : Billboards ==========
    let cache = config.create_image_cache(telemetry.clone())?;

    let images = config.get_billboard_images()?;
    let billboards = spawn_billboards(&images, config.get_billboard_spacing()?);
    info!("🖼️ {} billboard(s) placed", billboards.len());
    for billboard in &billboards {
        info!(
            "  - {} at {:?} <- {}",
            billboard.name(),
            billboard.position(),
            billboard.url()
        );
        billboard.load(&cache);
    }

    // ========== PHASE 3 : Météo ==========
    let client = config.create_weather_client()?;
    let mut manager = WeatherManager::new(client, config.get_weather_cities()?, telemetry);
    let panel = tokio::spawn(weather_panel(manager.subscribe()));

    info!("Weather panel: {}", display::LOADING);
    if let Some(city) = manager.current_city() {
        info!("City: {}", display::city_label(city));
    }
    if let Err(e) = manager.refresh().await {
        warn!("⚠️ Initial weather refresh failed: {}", e);
    }

    let period = Duration::from_secs(config.get_weather_refresh_interval_secs()?.max(1));
    let mut ticker = tokio::time::interval(period);
    // Le premier tick est immédiat
    ticker.tick().await;

    info!("✅ SkyScene is ready!");
    info!("Press Ctrl+C to stop...");

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                match manager.next_city().await {
                    Ok(scene) => info!(
                        "Scene: {:?} skybox (slot {}), sun {:.2}",
                        scene.skybox.preset,
                        scene.skybox.preset.slot(),
                        scene.sun.intensity
                    ),
                    Err(e) => warn!("⚠️ Weather refresh failed: {}", e),
                }
                if let Some(city) = manager.current_city() {
                    info!("City: {}", display::city_label(city));
                }
            }
            result = &mut shutdown => {
                if let Err(e) = result {
                    warn!("Failed to listen for Ctrl+C: {}", e);
                }
                break;
            }
        }
    }

    // ========== PHASE 4 : Arrêt ==========
    info!("🛑 Shutting down SkyScene...");
    panel.abort();
    let fulfilled = billboards.iter().filter(|b| b.is_fulfilled()).count();
    info!("{}/{} billboard(s) textured", fulfilled, billboards.len());
    cache.clear();

    Ok(())
}

/// Affiche les libellés du panneau météo à chaque mise à jour
async fn weather_panel(mut updates: broadcast::Receiver<WeatherReport>) {
    loop {
        match updates.recv().await {
            Ok(report) => {
                info!(
                    "{} | {} | {}",
                    report.city_name,
                    display::condition_label(&report),
                    display::temperature_label(&report).replace('\n', " | ")
                );
            }
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                warn!("Weather panel skipped {} update(s)", skipped);
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}
