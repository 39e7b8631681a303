//! Classification service integration.
//!
//! This module provides functionality for:
//! - Building the service endpoint URLs with cache-busting
//! - Fetching the raw image location and both images off the UI thread
//! - Decoding image bytes and holding them as egui textures

mod decode;
mod fetch;
mod texture_cache;
mod types;
mod urls;

pub use fetch::FetchChannel;
pub use texture_cache::PanelTextures;
pub use types::{FetchResult, PanelKind};
pub use urls::{unix_millis, CacheBuster, ServiceEndpoints};
