//! Abstraction du chargement distant
//!
//! Un [`Fetcher`] effectue un chargement pour une clé et en rend le résultat
//! une seule fois, par sa valeur de retour. Le cache traduit un échec (ou
//! une panique) en [`crate::Fetched::Unavailable`].

use async_trait::async_trait;

/// Raison de l'échec d'un chargement
///
/// Le texte `Display` est le diagnostic transmis à la télémétrie.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    /// Réseau injoignable, échec DNS, connexion coupée, timeout...
    #[error("Transport error: {0}")]
    Transport(String),

    /// Statut HTTP hors 2xx
    #[error("HTTP {status} {reason}")]
    Status { status: u16, reason: String },

    /// Charge utile reçue mais indécodable
    #[error("Decode error: {0}")]
    Decode(String),
}

impl FetchError {
    pub fn transport(err: impl std::fmt::Display) -> Self {
        Self::Transport(err.to_string())
    }

    pub fn decode(err: impl std::fmt::Display) -> Self {
        Self::Decode(err.to_string())
    }
}

/// Chargeur asynchrone à usage unique, indexé par clé
#[async_trait]
pub trait Fetcher: Send + Sync + 'static {
    /// Ressource produite par un chargement réussi
    type Resource: Send + Sync + 'static;

    /// Récupère et décode la ressource de `key`
    async fn fetch(&self, key: &str) -> Result<Self::Resource, FetchError>;
}
