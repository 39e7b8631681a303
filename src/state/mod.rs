//! Application state management.
//!
//! State is organized into logical groupings that correspond to different
//! areas of functionality: the coordinate form, the live query, and the
//! service settings.

pub mod input;
pub mod narration;
pub mod query;
pub mod region;
pub mod settings;

pub use input::RegionInputState;
pub use query::{QueryPhase, RegionQueryState};
pub use region::RegionQuery;
pub use settings::ServiceSettings;

use crate::classifier::ServiceEndpoints;

/// Status shown when no query is running.
pub const READY_STATUS: &str = "Listo";

/// Root application state containing all sub-states.
pub struct AppState {
    /// Coordinate input form
    pub input: RegionInputState,

    /// The live region query
    pub query: RegionQueryState,

    /// Service configuration
    pub settings: ServiceSettings,

    /// Query submitted by the UI this frame, picked up by the update loop
    pub pending_submission: Option<RegionQuery>,

    /// Set by the UI when the user asks for another region
    pub reset_requested: bool,

    /// Application status message displayed in top bar
    pub status_message: String,
}

impl AppState {
    pub fn new(settings: ServiceSettings) -> Self {
        let endpoints = ServiceEndpoints::new(settings.server_url.clone());
        Self {
            input: RegionInputState::new(),
            query: RegionQueryState::new(endpoints, settings.timeout),
            settings,
            pending_submission: None,
            reset_requested: false,
            status_message: READY_STATUS.to_string(),
        }
    }
}
