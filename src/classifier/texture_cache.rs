//! GPU textures for the raw and classified image panels.

use super::types::PanelKind;
use eframe::egui::{self, ColorImage, TextureHandle, TextureOptions};

/// Texture for one panel, remembering the generation it was uploaded for.
struct PanelTexture {
    generation: u64,
    texture: TextureHandle,
}

/// Holds at most one texture per panel.
///
/// Textures are tied to a query generation so a texture from a previous
/// query is never drawn under a new one.
#[derive(Default)]
pub struct PanelTextures {
    raw: Option<PanelTexture>,
    classified: Option<PanelTexture>,
}

impl PanelTextures {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot_mut(&mut self, panel: PanelKind) -> &mut Option<PanelTexture> {
        match panel {
            PanelKind::Raw => &mut self.raw,
            PanelKind::Classified => &mut self.classified,
        }
    }

    /// Upload a decoded image for a panel.
    pub fn upload(
        &mut self,
        ctx: &egui::Context,
        generation: u64,
        panel: PanelKind,
        image: ColorImage,
    ) {
        log::debug!(
            "Uploading {} texture {}x{} (generation {})",
            panel.label(),
            image.width(),
            image.height(),
            generation
        );

        let name = match panel {
            PanelKind::Raw => "raw_region_texture",
            PanelKind::Classified => "classified_region_texture",
        };
        let texture = ctx.load_texture(
            name,
            image,
            TextureOptions {
                magnification: egui::TextureFilter::Linear,
                minification: egui::TextureFilter::Linear,
                ..Default::default()
            },
        );

        *self.slot_mut(panel) = Some(PanelTexture {
            generation,
            texture,
        });
    }

    /// The texture for a panel, if it belongs to `generation`.
    pub fn get(&self, generation: u64, panel: PanelKind) -> Option<&TextureHandle> {
        let slot = match panel {
            PanelKind::Raw => &self.raw,
            PanelKind::Classified => &self.classified,
        };
        slot.as_ref()
            .filter(|entry| entry.generation == generation)
            .map(|entry| &entry.texture)
    }

    /// Drop both textures.
    pub fn clear(&mut self) {
        self.raw = None;
        self.classified = None;
    }
}
