//! Billboards de la scène
//!
//! Chaque billboard affiche une image distante obtenue via le cache
//! d'images partagé : plusieurs billboards sur la même URL ne déclenchent
//! qu'un seul téléchargement.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use skycache::{FetchOnceCache, Fetched, Fetcher, Texture};
use skyconfig::Config;
use std::sync::{Arc, Mutex};
use tracing::{info, warn};

/// Image configurée pour un billboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BillboardImage {
    pub url: String,
    pub display_name: String,
}

pub type Position = [f32; 3];

const DEFAULT_SPACING: Position = [3.0, 0.0, 0.0];

/// Un panneau placé dans la scène
#[derive(Debug)]
pub struct Billboard {
    name: String,
    url: String,
    position: Position,
    texture: Mutex<Option<Arc<Texture>>>,
}

impl Billboard {
    /// Crée le billboard d'indice `index`, placé à `index * spacing`
    pub fn new(index: usize, image: &BillboardImage, spacing: Position) -> Self {
        let i = index as f32;
        Self {
            name: format!("Billboard_{}", image.display_name),
            url: image.url.clone(),
            position: [i * spacing[0], i * spacing[1], i * spacing[2]],
            texture: Mutex::new(None),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn position(&self) -> Position {
        self.position
    }

    /// Texture appliquée, si le chargement a abouti
    pub fn texture(&self) -> Option<Arc<Texture>> {
        self.texture
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn is_fulfilled(&self) -> bool {
        self.texture().is_some()
    }

    /// Demande l'image au cache ; la texture est appliquée à la livraison
    pub fn load<F>(self: &Arc<Self>, cache: &FetchOnceCache<F>)
    where
        F: Fetcher<Resource = Texture>,
    {
        let billboard = Arc::clone(self);
        cache.request(&self.url, move |fetched| billboard.apply(fetched));
    }

    fn apply(&self, fetched: Fetched<Texture>) {
        match fetched {
            Fetched::Ready(texture) => {
                info!(
                    billboard = %self.name,
                    "Texture applied: {}x{} ({:?}, {:?})",
                    texture.width(),
                    texture.height(),
                    texture.wrap_mode,
                    texture.filter_mode
                );
                *self
                    .texture
                    .lock()
                    .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(texture);
            }
            Fetched::Unavailable => {
                warn!(billboard = %self.name, url = %self.url, "Failed to load image");
            }
        }
    }
}

/// Place un billboard par image
pub fn spawn_billboards(images: &[BillboardImage], spacing: Position) -> Vec<Arc<Billboard>> {
    images
        .iter()
        .enumerate()
        .map(|(i, image)| Arc::new(Billboard::new(i, image, spacing)))
        .collect()
}

/// Trait d'extension pour la configuration des billboards
pub trait BillboardConfigExt {
    /// Images à afficher (liste vide si absente ou invalide)
    fn get_billboard_images(&self) -> Result<Vec<BillboardImage>>;

    fn set_billboard_images(&self, images: &[BillboardImage]) -> Result<()>;

    /// Décalage entre deux billboards successifs (défaut : `[3, 0, 0]`)
    fn get_billboard_spacing(&self) -> Result<Position>;

    fn set_billboard_spacing(&self, spacing: Position) -> Result<()>;
}

impl BillboardConfigExt for Config {
    fn get_billboard_images(&self) -> Result<Vec<BillboardImage>> {
        match self.get_typed(&["billboards", "images"]) {
            Ok(images) => Ok(images),
            Err(e) => {
                warn!("No usable billboard images in configuration: {}", e);
                Ok(Vec::new())
            }
        }
    }

    fn set_billboard_images(&self, images: &[BillboardImage]) -> Result<()> {
        self.set_typed(&["billboards", "images"], &images)
    }

    fn get_billboard_spacing(&self) -> Result<Position> {
        Ok(self
            .get_typed(&["billboards", "spacing"])
            .unwrap_or(DEFAULT_SPACING))
    }

    fn set_billboard_spacing(&self, spacing: Position) -> Result<()> {
        self.set_typed(&["billboards", "spacing"], &spacing)
    }
}
