//! Request and result types for the classification service.

use eframe::egui::ColorImage;
use serde::Deserialize;
use thiserror::Error;

/// Which image slot a request belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PanelKind {
    /// The unprocessed survey image
    Raw,
    /// The service-rendered image with classifications overlaid
    Classified,
}

impl PanelKind {
    pub fn label(&self) -> &'static str {
        match self {
            PanelKind::Raw => "raw image",
            PanelKind::Classified => "classified image",
        }
    }
}

/// Errors from the service boundary.
#[derive(Error, Debug)]
pub enum FetchError {
    /// Transport failure or non-success HTTP status
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body was not the expected JSON
    #[error("Invalid response: {0}")]
    InvalidResponse(#[from] serde_json::Error),

    /// Image bytes could not be decoded
    #[error("Image decode error: {0}")]
    Decode(#[from] image::ImageError),
}

/// Body of the `/image-url` endpoint.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ImageUrlResponse {
    pub url: String,
}

impl ImageUrlResponse {
    pub fn parse(body: &[u8]) -> Result<Self, FetchError> {
        Ok(serde_json::from_slice(body)?)
    }
}

/// Result of an async fetch, tagged with the query generation that issued it.
pub enum FetchResult {
    /// The raw image location was resolved
    ImageUrlResolved { generation: u64, url: String },
    /// An image was downloaded and decoded
    ImageLoaded {
        generation: u64,
        panel: PanelKind,
        url: String,
        image: ColorImage,
    },
    /// A request failed
    Failed {
        generation: u64,
        /// `None` for the URL resolution request
        panel: Option<PanelKind>,
        error: FetchError,
    },
}
