//! HTTP pipeline for the classification service.
//!
//! Uses channel-based communication to bridge async requests
//! with egui's synchronous update loop.

use super::decode::decode_image;
use super::types::{FetchError, FetchResult, ImageUrlResponse, PanelKind};
use eframe::egui::{self, ColorImage};
use std::sync::mpsc::{channel, Receiver, Sender};
use std::time::Duration;

#[cfg(not(target_arch = "wasm32"))]
type HttpClient = reqwest::blocking::Client;
#[cfg(target_arch = "wasm32")]
type HttpClient = reqwest::Client;

/// Channel-based fetcher for service requests.
///
/// Requests run off the UI thread (a worker thread on native, a local
/// future on WASM). Each result is tagged with the generation it was
/// issued for; deciding whether it is still relevant is up to the caller.
pub struct FetchChannel {
    sender: Sender<FetchResult>,
    receiver: Receiver<FetchResult>,
    client: HttpClient,
}

impl FetchChannel {
    /// Creates the channel and the shared HTTP client.
    ///
    /// `timeout` bounds each native request; browsers enforce their own.
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let (sender, receiver) = channel();

        #[cfg(not(target_arch = "wasm32"))]
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()?;

        #[cfg(target_arch = "wasm32")]
        let client = {
            let _ = timeout;
            reqwest::Client::new()
        };

        Ok(Self {
            sender,
            receiver,
            client,
        })
    }

    /// Resolves the raw image location via the `/image-url` endpoint.
    pub fn resolve_image_url(&self, ctx: egui::Context, generation: u64, url: String) {
        log::debug!("Resolving image URL (generation {}): {}", generation, url);
        let sender = self.sender.clone();
        let client = self.client.clone();

        #[cfg(not(target_arch = "wasm32"))]
        std::thread::spawn(move || {
            let result = resolve_blocking(&client, &url);
            deliver(&sender, &ctx, url_result(generation, result));
        });

        #[cfg(target_arch = "wasm32")]
        wasm_bindgen_futures::spawn_local(async move {
            let result = resolve_async(&client, &url).await;
            deliver(&sender, &ctx, url_result(generation, result));
        });
    }

    /// Downloads and decodes an image for one of the panels.
    pub fn fetch_image(&self, ctx: egui::Context, generation: u64, panel: PanelKind, url: String) {
        log::debug!(
            "Fetching {} (generation {}): {}",
            panel.label(),
            generation,
            url
        );
        let sender = self.sender.clone();
        let client = self.client.clone();

        #[cfg(not(target_arch = "wasm32"))]
        std::thread::spawn(move || {
            let result = image_blocking(&client, &url);
            deliver(&sender, &ctx, image_result(generation, panel, url, result));
        });

        #[cfg(target_arch = "wasm32")]
        wasm_bindgen_futures::spawn_local(async move {
            let result = image_async(&client, &url).await;
            deliver(&sender, &ctx, image_result(generation, panel, url, result));
        });
    }

    /// Non-blocking check for a completed request.
    pub fn try_recv(&self) -> Option<FetchResult> {
        self.receiver.try_recv().ok()
    }
}

fn deliver(sender: &Sender<FetchResult>, ctx: &egui::Context, result: FetchResult) {
    // The receiver only goes away when the app shuts down.
    let _ = sender.send(result);
    ctx.request_repaint();
}

fn url_result(generation: u64, result: Result<String, FetchError>) -> FetchResult {
    match result {
        Ok(url) => FetchResult::ImageUrlResolved { generation, url },
        Err(error) => FetchResult::Failed {
            generation,
            panel: None,
            error,
        },
    }
}

fn image_result(
    generation: u64,
    panel: PanelKind,
    url: String,
    result: Result<ColorImage, FetchError>,
) -> FetchResult {
    match result {
        Ok(image) => FetchResult::ImageLoaded {
            generation,
            panel,
            url,
            image,
        },
        Err(error) => FetchResult::Failed {
            generation,
            panel: Some(panel),
            error,
        },
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn resolve_blocking(client: &HttpClient, url: &str) -> Result<String, FetchError> {
    let body = client.get(url).send()?.error_for_status()?.bytes()?;
    Ok(ImageUrlResponse::parse(&body)?.url)
}

#[cfg(not(target_arch = "wasm32"))]
fn image_blocking(client: &HttpClient, url: &str) -> Result<ColorImage, FetchError> {
    let bytes = client.get(url).send()?.error_for_status()?.bytes()?;
    log::debug!("Downloaded {} bytes from {}", bytes.len(), url);
    decode_image(&bytes)
}

#[cfg(target_arch = "wasm32")]
async fn resolve_async(client: &HttpClient, url: &str) -> Result<String, FetchError> {
    let body = client
        .get(url)
        .send()
        .await?
        .error_for_status()?
        .bytes()
        .await?;
    Ok(ImageUrlResponse::parse(&body)?.url)
}

#[cfg(target_arch = "wasm32")]
async fn image_async(client: &HttpClient, url: &str) -> Result<ColorImage, FetchError> {
    let bytes = client
        .get(url)
        .send()
        .await?
        .error_for_status()?
        .bytes()
        .await?;
    log::debug!("Downloaded {} bytes from {}", bytes.len(), url);
    decode_image(&bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pixel() -> ColorImage {
        ColorImage::from_rgba_unmultiplied([1, 1], &[0, 0, 0, 255])
    }

    #[test]
    fn test_resolved_url_keeps_generation() {
        let result = url_result(4, Ok("http://x/img.png".to_string()));
        assert!(matches!(
            result,
            FetchResult::ImageUrlResolved { generation: 4, ref url } if url == "http://x/img.png"
        ));
    }

    #[test]
    fn test_failed_lookup_has_no_panel() {
        let error = ImageUrlResponse::parse(b"<html>").unwrap_err();
        let result = url_result(2, Err(error));
        assert!(matches!(
            result,
            FetchResult::Failed {
                generation: 2,
                panel: None,
                error: FetchError::InvalidResponse(_),
            }
        ));
    }

    #[test]
    fn test_loaded_image_keeps_request_url() {
        let url = "http://x/img.png?no-cache-str=7".to_string();
        let result = image_result(3, PanelKind::Raw, url, Ok(pixel()));
        match result {
            FetchResult::ImageLoaded {
                generation,
                panel,
                url,
                image,
            } => {
                assert_eq!(generation, 3);
                assert_eq!(panel, PanelKind::Raw);
                assert_eq!(url, "http://x/img.png?no-cache-str=7");
                assert_eq!(image.size, [1, 1]);
            }
            _ => panic!("expected a loaded image"),
        }
    }

    #[test]
    fn test_failed_image_names_its_panel() {
        let error = decode_image(b"not an image").unwrap_err();
        let url = "http://svc/?mock=1".to_string();
        let result = image_result(5, PanelKind::Classified, url, Err(error));
        assert!(matches!(
            result,
            FetchResult::Failed {
                generation: 5,
                panel: Some(PanelKind::Classified),
                error: FetchError::Decode(_),
            }
        ));
    }
}
