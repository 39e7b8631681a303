#![warn(clippy::all)]

//! Sky Region Workbench - A web-based viewer for classified sky regions.
//!
//! The user enters two equatorial corners of a sky region (or picks a preset),
//! and the application shows the raw survey image of that region while an
//! external service classifies it, then swaps in the classified image.

mod classifier;
mod state;
mod ui;

use classifier::{FetchChannel, FetchResult, PanelKind, PanelTextures};
use eframe::egui;
use state::query::FetchCommand;
use state::{AppState, RegionQuery, ServiceSettings, READY_STATUS};
use web_time::Instant;

// Native entry point
#[cfg(not(target_arch = "wasm32"))]
fn main() -> eframe::Result<()> {
    env_logger::init();

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Sky Region Workbench")
            .with_inner_size([620.0, 760.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Sky Region Workbench",
        native_options,
        Box::new(|cc| Ok(Box::new(WorkbenchApp::new(cc)))),
    )
}

// WASM entry point - main is not called on wasm32
#[cfg(target_arch = "wasm32")]
fn main() {}

/// Entry point for the WASM application.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub async fn start() {
    use eframe::wasm_bindgen::JsCast as _;

    // Redirect `log` messages to `console.log`:
    eframe::WebLogger::init(log::LevelFilter::Debug).ok();

    let web_options = eframe::WebOptions::default();

    wasm_bindgen_futures::spawn_local(async {
        let document = web_sys::window()
            .expect("No window")
            .document()
            .expect("No document");

        let canvas = document
            .get_element_by_id("app_canvas")
            .expect("Failed to find app_canvas")
            .dyn_into::<web_sys::HtmlCanvasElement>()
            .expect("app_canvas was not a HtmlCanvasElement");

        let start_result = eframe::WebRunner::new()
            .start(
                canvas,
                web_options,
                Box::new(|cc| Ok(Box::new(WorkbenchApp::new(cc)))),
            )
            .await;

        // Remove the loading text once the app has loaded:
        if let Some(loading_text) = document.get_element_by_id("loading_text") {
            match start_result {
                Ok(_) => {
                    loading_text.remove();
                }
                Err(e) => {
                    loading_text.set_inner_html(
                        "<p>The app has crashed. See the developer console for details.</p>",
                    );
                    panic!("Failed to start eframe: {e:?}");
                }
            }
        }
    });
}

/// Status and failure message when no HTTP client could be built.
const CLIENT_UNAVAILABLE: &str = "Cliente HTTP no disponible";

/// Main application state and logic.
pub struct WorkbenchApp {
    /// Application state containing all sub-states
    state: AppState,

    /// Channel for async service requests; `None` if the HTTP client
    /// could not be created
    fetch_channel: Option<FetchChannel>,

    /// Textures for the raw and classified image panels
    textures: PanelTextures,
}

impl WorkbenchApp {
    /// Creates a new WorkbenchApp instance.
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let mut fonts = egui::FontDefinitions::default();
        egui_phosphor::add_to_fonts(&mut fonts, egui_phosphor::Variant::Regular);
        cc.egui_ctx.set_fonts(fonts);
        cc.egui_ctx.set_visuals(egui::Visuals::dark());

        let settings = ServiceSettings::load();
        match FetchChannel::new(settings.timeout) {
            Ok(channel) => Self::with_channel(settings, Some(channel)),
            Err(e) => {
                log::error!("Failed to create HTTP client: {}", e);
                let mut app = Self::with_channel(settings, None);
                app.state.status_message = format!("{}: {}", CLIENT_UNAVAILABLE, e);
                app
            }
        }
    }

    fn with_channel(settings: ServiceSettings, fetch_channel: Option<FetchChannel>) -> Self {
        Self {
            state: AppState::new(settings),
            fetch_channel,
            textures: PanelTextures::new(),
        }
    }

    fn next_result(&self) -> Option<FetchResult> {
        self.fetch_channel.as_ref()?.try_recv()
    }

    /// Start a query and issue its requests.
    fn submit(&mut self, ctx: &egui::Context, query: RegionQuery, now: Instant) {
        self.textures.clear();
        let commands = self
            .state
            .query
            .submit(query, now, classifier::unix_millis());
        self.state.status_message = "Clasificando región...".to_string();

        for command in commands {
            self.issue(ctx, command);
        }
    }

    /// Hand a request to the fetch channel, or fail it when there is none.
    fn issue(&mut self, ctx: &egui::Context, command: FetchCommand) {
        let Some(channel) = &self.fetch_channel else {
            let message = CLIENT_UNAVAILABLE.to_string();
            let (generation, panel) = (command.generation(), command.panel());
            if self.state.query.fetch_failed(generation, panel, message) {
                self.state.status_message = CLIENT_UNAVAILABLE.to_string();
            }
            return;
        };

        match command {
            FetchCommand::ResolveImageUrl { generation, url } => {
                channel.resolve_image_url(ctx.clone(), generation, url);
            }
            FetchCommand::FetchImage {
                generation,
                panel,
                url,
            } => {
                channel.fetch_image(ctx.clone(), generation, panel, url);
            }
        }
    }

    /// Apply one completed request to the query state.
    fn handle_fetch_result(&mut self, ctx: &egui::Context, result: FetchResult) {
        match result {
            FetchResult::ImageUrlResolved { generation, url } => {
                log::info!("Raw image located at {}", url);
                let now_ms = classifier::unix_millis();
                let query = &mut self.state.query;
                if let Some(command) = query.raw_url_resolved(generation, url, now_ms) {
                    self.issue(ctx, command);
                }
            }
            FetchResult::ImageLoaded {
                generation,
                panel,
                url,
                image,
            } => {
                if self.state.query.panel_loaded(generation, panel, &url) {
                    self.textures.upload(ctx, generation, panel, image);
                    if panel == PanelKind::Classified {
                        self.state.status_message = "Clasificación lista".to_string();
                    }
                }
            }
            FetchResult::Failed {
                generation,
                panel,
                error,
            } => {
                let message = error.to_string();
                let query = &mut self.state.query;
                if query.fetch_failed(generation, panel, message.clone()) {
                    self.state.status_message = match panel {
                        Some(PanelKind::Classified) => {
                            format!("Falló la clasificación: {}", message)
                        }
                        _ => format!("Imagen de la región no disponible: {}", message),
                    };
                }
            }
        }
    }
}

impl eframe::App for WorkbenchApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = Instant::now();

        // Apply completed requests in arrival order
        while let Some(result) = self.next_result() {
            self.handle_fetch_result(ctx, result);
        }

        // Handle reset request from UI
        if self.state.reset_requested {
            self.state.reset_requested = false;
            self.state.query.reset();
            self.textures.clear();
            self.state.status_message = READY_STATUS.to_string();
        }

        // Handle submission from the coordinate form
        if let Some(query) = self.state.pending_submission.take() {
            self.submit(ctx, query, now);
        }

        if self.state.query.check_deadline(now) {
            self.state.status_message = "La clasificación tardó demasiado".to_string();
        }

        ui::render_top_bar(ctx, &self.state);
        ui::render_central_panel(ctx, &mut self.state, &self.textures, now);
    }
}
