//! # skycache - Cache d'images à chargement unique pour SkyScene
//!
//! Cette crate fournit le chargeur de ressources distantes utilisé par les
//! billboards de la scène : un cache mémoire indexé par URL qui ne lance
//! jamais deux téléchargements simultanés pour la même clé.
//!
//! ## Architecture
//!
//! ```text
//! skycache
//!     ├── fetcher.rs  - Trait Fetcher + FetchError (un chargement, un résultat)
//!     ├── cache.rs    - FetchOnceCache (mémorisation + fusion des demandes)
//!     ├── texture.rs  - Texture (image décodée)
//!     └── http.rs     - HttpImageFetcher (reqwest + image + télémétrie)
//! ```
//!
//! ## Utilisation
//!
//! ```rust,no_run
//! use skycache::{new_image_cache, Fetched};
//! use skytelemetry::Telemetry;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let cache = new_image_cache(Telemetry::disabled())?;
//!
//!     cache.request("https://picsum.photos/800/600", |fetched| match fetched {
//!         Fetched::Ready(texture) => println!("{}x{}", texture.width(), texture.height()),
//!         Fetched::Unavailable => println!("image indisponible"),
//!     });
//!
//!     // Ou en attendant directement le résultat
//!     let fetched = cache.get("https://picsum.photos/800/600").await;
//!     if let Some(texture) = fetched.resource() {
//!         println!("format: {:?}", texture.format());
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Garanties
//!
//! - au plus un chargement en cours par clé ;
//! - les demandeurs d'une même clé sont notifiés dans l'ordre des demandes ;
//! - un échec ne laisse aucune entrée : la demande suivante relance un chargement ;
//! - `clear()` vide le cache ; un chargement en cours est mené à terme mais
//!   son résultat est ignoré.

pub mod cache;
pub mod fetcher;
pub mod http;
pub mod texture;

#[cfg(feature = "skyconfig")]
pub mod config_ext;

pub use cache::{FetchOnceCache, Fetched};
pub use fetcher::{FetchError, Fetcher};
pub use http::{FetcherBuilder, HttpImageFetcher};
pub use texture::{FilterMode, Texture, WrapMode};

#[cfg(feature = "skyconfig")]
pub use config_ext::ImageCacheConfigExt;

use std::sync::Arc;

/// Type alias pour le cache d'images HTTP
pub type ImageCache = FetchOnceCache<HttpImageFetcher>;

/// Crée un cache d'images HTTP avec les réglages par défaut
///
/// # Arguments
///
/// * `telemetry` - Collaborateur recevant un événement par téléchargement
pub fn new_image_cache(telemetry: skytelemetry::Telemetry) -> anyhow::Result<Arc<ImageCache>> {
    let fetcher = HttpImageFetcher::builder().telemetry(telemetry).build()?;
    Ok(Arc::new(FetchOnceCache::new(fetcher)))
}
