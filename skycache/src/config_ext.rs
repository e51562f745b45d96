//! Extension pour intégrer le cache d'images dans skyconfig
//!
//! Ce module fournit le trait `ImageCacheConfigExt` qui ajoute à
//! `skyconfig::Config` les réglages du téléchargement d'images.

use crate::{FetchOnceCache, HttpImageFetcher, ImageCache};
use anyhow::Result;
use skyconfig::Config;
use skytelemetry::Telemetry;
use std::sync::Arc;
use std::time::Duration;

const DEFAULT_IMAGE_TIMEOUT_SECS: u64 = 30;

/// Trait d'extension pour gérer le cache d'images dans skyconfig
///
/// # Exemple
///
/// ```rust,ignore
/// use skyconfig::Config;
/// use skycache::ImageCacheConfigExt;
///
/// let config = Config::load_config("")?;
/// let cache = config.create_image_cache(Telemetry::disabled())?;
/// ```
pub trait ImageCacheConfigExt {
    /// Timeout d'un téléchargement d'image, en secondes (défaut : 30)
    fn get_images_timeout_secs(&self) -> Result<u64>;

    fn set_images_timeout_secs(&self, secs: u64) -> Result<()>;

    /// Crée le cache d'images configuré
    ///
    /// # Arguments
    ///
    /// * `telemetry` - Collaborateur recevant un événement par téléchargement
    fn create_image_cache(&self, telemetry: Telemetry) -> Result<Arc<ImageCache>>;
}

impl ImageCacheConfigExt for Config {
    fn get_images_timeout_secs(&self) -> Result<u64> {
        Ok(self.get_u64_or(&["images", "timeout_secs"], DEFAULT_IMAGE_TIMEOUT_SECS))
    }

    fn set_images_timeout_secs(&self, secs: u64) -> Result<()> {
        self.set_u64(&["images", "timeout_secs"], secs)
    }

    fn create_image_cache(&self, telemetry: Telemetry) -> Result<Arc<ImageCache>> {
        let fetcher = HttpImageFetcher::builder()
            .timeout(Duration::from_secs(self.get_images_timeout_secs()?))
            .telemetry(telemetry)
            .build()?;
        Ok(Arc::new(FetchOnceCache::new(fetcher)))
    }
}
