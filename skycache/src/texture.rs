//! Texture : image décodée prête à être appliquée

use crate::fetcher::FetchError;
use image::{ColorType, DynamicImage};

/// Adressage hors de l'intervalle `[0, 1]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WrapMode {
    #[default]
    Clamp,
}

/// Filtre d'échantillonnage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FilterMode {
    #[default]
    Bilinear,
}

/// Tampon de pixels 2D décodé, appliqué aux billboards
///
/// Les textures téléchargées sont toujours en `Clamp` et filtrées en bilinéaire.
#[derive(Debug, Clone)]
pub struct Texture {
    image: DynamicImage,
    pub wrap_mode: WrapMode,
    pub filter_mode: FilterMode,
}

impl Texture {
    pub fn new(image: DynamicImage) -> Self {
        Self {
            image,
            wrap_mode: WrapMode::default(),
            filter_mode: FilterMode::default(),
        }
    }

    /// Décode une image encodée (PNG, JPEG...) présente en mémoire
    pub fn decode(bytes: &[u8]) -> Result<Self, FetchError> {
        let image = image::load_from_memory(bytes).map_err(FetchError::decode)?;
        Ok(Self::new(image))
    }

    /// Texture RGBA transparente de la taille donnée
    pub fn placeholder(width: u32, height: u32) -> Self {
        Self::new(DynamicImage::new_rgba8(width, height))
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Format des pixels du tampon décodé
    pub fn format(&self) -> ColorType {
        self.image.color()
    }

    pub fn image(&self) -> &DynamicImage {
        &self.image
    }

    /// Taille du tampon de pixels, en octets
    pub fn byte_len(&self) -> usize {
        self.image.as_bytes().len()
    }
}
