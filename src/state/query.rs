//! Region query state machine.
//!
//! Sequences the two image fetches of a query: the raw image (whose location
//! must first be resolved) and the classified image (whose URL is built
//! directly from the region). Both start as soon as a region is submitted.
//!
//! Every submission gets a new generation number. Results carry the
//! generation they were requested for, and anything not matching the active
//! generation is dropped, so a late response from a superseded query can
//! never touch the current one.

use super::narration::LoadingTimer;
use super::region::RegionQuery;
use crate::classifier::{CacheBuster, PanelKind, ServiceEndpoints};
use std::time::Duration;
use web_time::Instant;

/// Current phase of the query lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryPhase {
    /// No region submitted.
    Idle,
    /// Waiting for the raw image location.
    AwaitingRawImage,
    /// Raw image location known or its lookup failed; classification
    /// still pending.
    AwaitingClassification,
    /// Classified image loaded.
    Ready,
    /// Classification failed or timed out.
    Failed,
}

impl QueryPhase {
    pub fn label(&self) -> &'static str {
        match self {
            QueryPhase::Idle => "En espera",
            QueryPhase::AwaitingRawImage => "Obteniendo imagen",
            QueryPhase::AwaitingClassification => "Clasificando",
            QueryPhase::Ready => "Listo",
            QueryPhase::Failed => "Error",
        }
    }
}

/// Display state of one image panel.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImagePanelState {
    /// Image location without the cache-busting suffix.
    pub url: Option<String>,
    /// The exact URL of the request in flight (with cache-busting suffix).
    pub request_url: Option<String>,
    pub loaded: bool,
    pub error: Option<String>,
}

impl ImagePanelState {
    fn with_url(url: String) -> Self {
        Self {
            url: Some(url),
            ..Default::default()
        }
    }

    fn begin_request(&mut self, request_url: String) {
        self.request_url = Some(request_url);
        self.loaded = false;
        self.error = None;
    }

    /// Applies a load event. Only the first event for the in-flight
    /// request URL counts.
    fn mark_loaded(&mut self, request_url: &str) -> bool {
        if self.loaded || self.request_url.as_deref() != Some(request_url) {
            return false;
        }
        self.loaded = true;
        true
    }
}

/// Where a failed query gave up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureStage {
    /// The classified image request failed or could not be decoded.
    Classification,
    /// Classification did not arrive within the configured timeout.
    Timeout,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryFailure {
    pub stage: FailureStage,
    pub message: String,
}

/// The single live query.
#[derive(Debug, Clone)]
pub struct ActiveQuery {
    pub generation: u64,
    pub query: RegionQuery,
    pub raw: ImagePanelState,
    pub classified: ImagePanelState,
    /// True from submission until the classified image loads or fails.
    pub loading_classifications: bool,
    pub failure: Option<QueryFailure>,
}

impl ActiveQuery {
    fn panel_mut(&mut self, panel: PanelKind) -> &mut ImagePanelState {
        match panel {
            PanelKind::Raw => &mut self.raw,
            PanelKind::Classified => &mut self.classified,
        }
    }

    /// Whether results are still being accepted.
    fn is_open(&self) -> bool {
        self.failure.is_none()
    }
}

/// A request the caller should issue on behalf of the state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchCommand {
    ResolveImageUrl {
        generation: u64,
        url: String,
    },
    FetchImage {
        generation: u64,
        panel: PanelKind,
        url: String,
    },
}

impl FetchCommand {
    pub fn generation(&self) -> u64 {
        match self {
            FetchCommand::ResolveImageUrl { generation, .. }
            | FetchCommand::FetchImage { generation, .. } => *generation,
        }
    }

    /// Panel the request feeds; `None` for the image location lookup.
    pub fn panel(&self) -> Option<PanelKind> {
        match self {
            FetchCommand::ResolveImageUrl { .. } => None,
            FetchCommand::FetchImage { panel, .. } => Some(*panel),
        }
    }
}

/// Owner of the query lifecycle.
pub struct RegionQueryState {
    endpoints: ServiceEndpoints,
    cache_buster: CacheBuster,
    timeout: Duration,
    last_generation: u64,
    active: Option<ActiveQuery>,
    timer: LoadingTimer,
}

impl RegionQueryState {
    pub fn new(endpoints: ServiceEndpoints, timeout: Duration) -> Self {
        Self {
            endpoints,
            cache_buster: CacheBuster::new(),
            timeout,
            last_generation: 0,
            active: None,
            timer: LoadingTimer::default(),
        }
    }

    pub fn phase(&self) -> QueryPhase {
        match &self.active {
            None => QueryPhase::Idle,
            Some(active) if active.failure.is_some() => QueryPhase::Failed,
            Some(active) if active.classified.loaded => QueryPhase::Ready,
            Some(active) if active.raw.url.is_none() && active.raw.error.is_none() => {
                QueryPhase::AwaitingRawImage
            }
            Some(_) => QueryPhase::AwaitingClassification,
        }
    }

    pub fn active(&self) -> Option<&ActiveQuery> {
        self.active.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.active
            .as_ref()
            .is_some_and(|active| active.loading_classifications)
    }

    /// Time spent waiting for classification, `None` when not loading.
    pub fn loading_elapsed(&self, now: Instant) -> Option<Duration> {
        self.timer.elapsed(now)
    }

    /// Start a new query, replacing any existing one.
    ///
    /// Returns the two requests to issue: the raw image location lookup
    /// and the classified image fetch.
    pub fn submit(&mut self, query: RegionQuery, now: Instant, now_ms: u64) -> Vec<FetchCommand> {
        self.last_generation += 1;
        let generation = self.last_generation;

        if let Some(previous) = &self.active {
            log::info!(
                "Replacing query generation {} with {}",
                previous.generation,
                generation
            );
        }

        let lookup_url = self.endpoints.image_url_lookup(&query);
        let classified_url = self.endpoints.classified_image(&query);
        let request_url = self.cache_buster.apply(&classified_url, now_ms);

        let mut classified = ImagePanelState::with_url(classified_url);
        classified.begin_request(request_url.clone());

        self.active = Some(ActiveQuery {
            generation,
            query,
            raw: ImagePanelState::default(),
            classified,
            loading_classifications: true,
            failure: None,
        });
        self.timer.start(now);

        log::info!(
            "Submitted region query (generation {}, preset {}): {:?}",
            generation,
            query.preset_id,
            query.region
        );

        vec![
            FetchCommand::ResolveImageUrl {
                generation,
                url: lookup_url,
            },
            FetchCommand::FetchImage {
                generation,
                panel: PanelKind::Classified,
                url: request_url,
            },
        ]
    }

    /// Look up the active query if `generation` still matches it.
    fn current_mut(&mut self, generation: u64, event: &str) -> Option<&mut ActiveQuery> {
        match self.active.as_mut() {
            Some(active) if active.generation == generation && active.is_open() => Some(active),
            _ => {
                log::debug!("Dropping stale {} for generation {}", event, generation);
                None
            }
        }
    }

    /// The raw image location arrived. Returns the image fetch to issue.
    pub fn raw_url_resolved(
        &mut self,
        generation: u64,
        url: String,
        now_ms: u64,
    ) -> Option<FetchCommand> {
        let request_url = self.cache_buster.apply(&url, now_ms);
        let active = self.current_mut(generation, "image URL")?;

        active.raw = ImagePanelState::with_url(url);
        active.raw.begin_request(request_url.clone());

        Some(FetchCommand::FetchImage {
            generation,
            panel: PanelKind::Raw,
            url: request_url,
        })
    }

    /// An image finished loading. Returns whether it was applied.
    ///
    /// A classified load ends the loading phase and stops the narration
    /// timer before returning.
    pub fn panel_loaded(&mut self, generation: u64, panel: PanelKind, request_url: &str) -> bool {
        let Some(active) = self.current_mut(generation, panel.label()) else {
            return false;
        };

        if !active.panel_mut(panel).mark_loaded(request_url) {
            log::debug!("Ignoring repeated load of {}", panel.label());
            return false;
        }

        if panel == PanelKind::Classified {
            active.loading_classifications = false;
            self.timer.stop();
            log::info!("Classification ready (generation {})", generation);
        }
        true
    }

    /// A request failed.
    ///
    /// Raw image failures only mark the raw panel; the classification may
    /// still arrive. Classified image failures end the query. Returns
    /// whether the failure was applied.
    pub fn fetch_failed(
        &mut self,
        generation: u64,
        panel: Option<PanelKind>,
        message: String,
    ) -> bool {
        let Some(active) = self.current_mut(generation, "failure") else {
            return false;
        };

        match panel {
            None | Some(PanelKind::Raw) => {
                log::warn!("Raw image unavailable: {}", message);
                active.raw.error = Some(message);
            }
            Some(PanelKind::Classified) => {
                log::error!("Classification failed: {}", message);
                active.classified.error = Some(message.clone());
                active.loading_classifications = false;
                active.failure = Some(QueryFailure {
                    stage: FailureStage::Classification,
                    message,
                });
                self.timer.stop();
            }
        }
        true
    }

    /// Fail the query if classification has been pending past the timeout.
    ///
    /// Returns true when this call caused the failure.
    pub fn check_deadline(&mut self, now: Instant) -> bool {
        let Some(elapsed) = self.timer.elapsed(now) else {
            return false;
        };
        if elapsed < self.timeout {
            return false;
        }
        let Some(active) = self.active.as_mut() else {
            return false;
        };

        let message = format!("No classification after {} seconds", self.timeout.as_secs());
        log::error!("{} (generation {})", message, active.generation);
        active.loading_classifications = false;
        active.failure = Some(QueryFailure {
            stage: FailureStage::Timeout,
            message,
        });
        self.timer.stop();
        true
    }

    /// Discard the current query and return to idle.
    pub fn reset(&mut self) {
        if let Some(active) = self.active.take() {
            log::info!("Reset query generation {}", active.generation);
        }
        self.timer.stop();
    }

    /// Whether the raw image should be visible (only while loading).
    pub fn show_raw(&self) -> bool {
        self.is_loading()
    }

    /// Whether the classified image should be visible.
    pub fn show_classified(&self) -> bool {
        self.phase() == QueryPhase::Ready
    }

    /// Reset is offered once the query stops loading.
    pub fn can_reset(&self) -> bool {
        self.active.is_some() && !self.is_loading()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::region::{Coordinate, Preset, Region};

    const TIMEOUT: Duration = Duration::from_secs(120);

    fn state() -> RegionQueryState {
        RegionQueryState::new(ServiceEndpoints::new("http://svc"), TIMEOUT)
    }

    fn manual_query() -> RegionQuery {
        RegionQuery::manual(Region::new(
            Coordinate::new(10.0, 20.0),
            Coordinate::new(11.0, 21.0),
        ))
    }

    fn image_url(command: &FetchCommand) -> &str {
        match command {
            FetchCommand::FetchImage { url, .. } => url,
            other => panic!("expected image fetch, got {:?}", other),
        }
    }

    /// Submit and return (generation, classified request URL).
    fn submit(state: &mut RegionQueryState, query: RegionQuery, t0: Instant) -> (u64, String) {
        let commands = state.submit(query, t0, 1_000);
        assert_eq!(commands.len(), 2);
        let generation = state.active().unwrap().generation;
        (generation, image_url(&commands[1]).to_string())
    }

    #[test]
    fn test_starts_idle() {
        let state = state();
        assert_eq!(state.phase(), QueryPhase::Idle);
        assert!(state.active().is_none());
        assert!(!state.is_loading());
    }

    #[test]
    fn test_submit_issues_both_requests() {
        let mut state = state();
        let commands = state.submit(manual_query(), Instant::now(), 1_000);

        assert_eq!(
            commands[0],
            FetchCommand::ResolveImageUrl {
                generation: 1,
                url: "http://svc/image-url?ra1=10&dec1=20&ra2=11&dec2=21".to_string(),
            }
        );
        assert_eq!(
            commands[1],
            FetchCommand::FetchImage {
                generation: 1,
                panel: PanelKind::Classified,
                url: "http://svc/?ra1=10&dec1=20&ra2=11&dec2=21&mock=0&no-cache-str=1000"
                    .to_string(),
            }
        );
        assert_eq!(state.phase(), QueryPhase::AwaitingRawImage);
        assert!(state.is_loading());
        assert!(state.show_raw());
        assert!(!state.show_classified());
    }

    #[test]
    fn test_commands_name_their_target() {
        let mut state = state();
        let commands = state.submit(manual_query(), Instant::now(), 1_000);

        assert_eq!(commands[0].generation(), 1);
        assert_eq!(commands[0].panel(), None);
        assert_eq!(commands[1].generation(), 1);
        assert_eq!(commands[1].panel(), Some(PanelKind::Classified));
    }

    #[test]
    fn test_preset_submission_carries_mock() {
        let mut state = state();
        let t0 = Instant::now();
        let (_, url) = submit(&mut state, Preset::all()[0].query(), t0);
        assert!(url.contains("ra1=339.06204&dec1=33.99082&ra2=338.95632&dec2=33.9296&mock=1"));

        let (_, url) = submit(&mut state, Preset::all()[1].query(), t0);
        assert!(url.contains("&mock=2&"));
    }

    #[test]
    fn test_full_lifecycle() {
        let mut state = state();
        let t0 = Instant::now();
        let (generation, classified_url) = submit(&mut state, manual_query(), t0);

        let raw_fetch = state
            .raw_url_resolved(generation, "http://x/img.png".to_string(), 2_000)
            .unwrap();
        let raw_url = image_url(&raw_fetch).to_string();
        assert_eq!(raw_url, "http://x/img.png?no-cache-str=2000");
        assert_eq!(state.phase(), QueryPhase::AwaitingClassification);

        assert!(state.panel_loaded(generation, PanelKind::Raw, &raw_url));
        assert!(state.is_loading());
        assert!(state.loading_elapsed(t0).is_some());

        assert!(state.panel_loaded(generation, PanelKind::Classified, &classified_url));
        assert_eq!(state.phase(), QueryPhase::Ready);
        assert!(!state.is_loading());
        assert!(!state.show_raw());
        assert!(state.show_classified());
        assert!(state.can_reset());
        assert_eq!(state.loading_elapsed(t0 + Duration::from_secs(1)), None);
    }

    #[test]
    fn test_classified_can_load_before_raw_url() {
        let mut state = state();
        let (generation, classified_url) = submit(&mut state, manual_query(), Instant::now());

        assert!(state.panel_loaded(generation, PanelKind::Classified, &classified_url));
        assert_eq!(state.phase(), QueryPhase::Ready);
    }

    #[test]
    fn test_raw_url_gets_distinct_suffix_each_request() {
        let mut state = state();
        let t0 = Instant::now();
        let (g1, _) = submit(&mut state, manual_query(), t0);
        let first = state
            .raw_url_resolved(g1, "http://x/img.png".to_string(), 5_000)
            .unwrap();

        let (g2, _) = submit(&mut state, manual_query(), t0);
        let second = state
            .raw_url_resolved(g2, "http://x/img.png".to_string(), 5_000)
            .unwrap();

        assert!(image_url(&first).starts_with("http://x/img.png?no-cache-str="));
        assert_ne!(image_url(&first), image_url(&second));
    }

    #[test]
    fn test_load_event_applies_once() {
        let mut state = state();
        let (generation, classified_url) = submit(&mut state, manual_query(), Instant::now());

        assert!(state.panel_loaded(generation, PanelKind::Classified, &classified_url));
        assert!(!state.panel_loaded(generation, PanelKind::Classified, &classified_url));
    }

    #[test]
    fn test_raw_load_without_url_is_ignored() {
        let mut state = state();
        let (generation, _) = submit(&mut state, manual_query(), Instant::now());

        assert!(!state.panel_loaded(generation, PanelKind::Raw, "http://x/img.png"));
        let active = state.active().unwrap();
        assert!(!active.raw.loaded);
        assert!(active.raw.url.is_none());
    }

    #[test]
    fn test_reset_from_ready_clears_everything() {
        let mut state = state();
        let query = Preset::all()[1].query();
        let (generation, classified_url) = submit(&mut state, query, Instant::now());
        state.panel_loaded(generation, PanelKind::Classified, &classified_url);

        state.reset();
        assert_eq!(state.phase(), QueryPhase::Idle);
        assert!(state.active().is_none());
        assert!(!state.is_loading());
        assert!(!state.can_reset());
    }

    #[test]
    fn test_resubmission_drops_stale_results() {
        let mut state = state();
        let t0 = Instant::now();
        let (old, old_classified) = submit(&mut state, manual_query(), t0);
        let (new, _) = submit(&mut state, Preset::all()[0].query(), t0);
        assert!(new > old);

        assert!(state
            .raw_url_resolved(old, "http://x/old.png".to_string(), 3_000)
            .is_none());
        assert!(!state.panel_loaded(old, PanelKind::Classified, &old_classified));
        state.fetch_failed(old, Some(PanelKind::Classified), "boom".to_string());

        assert_eq!(state.phase(), QueryPhase::AwaitingRawImage);
        assert!(state.is_loading());
        let active = state.active().unwrap();
        assert_eq!(active.generation, new);
        assert!(active.raw.url.is_none());
        assert_eq!(active.query.preset_id, 1);
        assert_eq!(
            active.classified.url.as_deref(),
            Some("http://svc/?ra1=339.06204&dec1=33.99082&ra2=338.95632&dec2=33.9296&mock=1")
        );
    }

    #[test]
    fn test_results_after_reset_are_dropped() {
        let mut state = state();
        let (generation, classified_url) = submit(&mut state, manual_query(), Instant::now());
        state.reset();

        assert!(!state.panel_loaded(generation, PanelKind::Classified, &classified_url));
        assert!(state
            .raw_url_resolved(generation, "http://x/img.png".to_string(), 0)
            .is_none());
        assert_eq!(state.phase(), QueryPhase::Idle);
    }

    #[test]
    fn test_classification_failure_is_terminal() {
        let mut state = state();
        let (generation, classified_url) = submit(&mut state, manual_query(), Instant::now());

        state.fetch_failed(
            generation,
            Some(PanelKind::Classified),
            "HTTP 500".to_string(),
        );
        assert_eq!(state.phase(), QueryPhase::Failed);
        assert!(!state.is_loading());
        assert!(state.can_reset());

        let failure = state.active().unwrap().failure.clone().unwrap();
        assert_eq!(failure.stage, FailureStage::Classification);
        assert_eq!(failure.message, "HTTP 500");

        // Late success does not revive a failed query
        assert!(!state.panel_loaded(generation, PanelKind::Classified, &classified_url));
        assert_eq!(state.phase(), QueryPhase::Failed);
    }

    #[test]
    fn test_raw_failure_keeps_loading() {
        let mut state = state();
        let (generation, _) = submit(&mut state, manual_query(), Instant::now());

        state.fetch_failed(generation, None, "connection refused".to_string());
        assert!(state.is_loading());
        assert_eq!(
            state.active().unwrap().raw.error.as_deref(),
            Some("connection refused")
        );
        assert_ne!(state.phase(), QueryPhase::Failed);
    }

    #[test]
    fn test_failed_lookup_moves_on_to_classification() {
        let mut state = state();
        let (generation, _) = submit(&mut state, manual_query(), Instant::now());
        assert_eq!(state.phase(), QueryPhase::AwaitingRawImage);

        state.fetch_failed(generation, None, "HTTP 404".to_string());
        assert_eq!(state.phase(), QueryPhase::AwaitingClassification);
        assert!(state.active().unwrap().raw.url.is_none());
    }

    #[test]
    fn test_deadline_expiry_fails_query() {
        let mut state = state();
        let t0 = Instant::now();
        submit(&mut state, manual_query(), t0);

        assert!(!state.check_deadline(t0 + Duration::from_secs(60)));
        assert!(state.is_loading());

        assert!(state.check_deadline(t0 + TIMEOUT));
        assert_eq!(state.phase(), QueryPhase::Failed);
        assert_eq!(
            state.active().unwrap().failure.as_ref().unwrap().stage,
            FailureStage::Timeout
        );
        assert!(!state.check_deadline(t0 + TIMEOUT * 2));
    }

    #[test]
    fn test_deadline_ignored_when_ready() {
        let mut state = state();
        let t0 = Instant::now();
        let (generation, classified_url) = submit(&mut state, manual_query(), t0);
        state.panel_loaded(generation, PanelKind::Classified, &classified_url);

        assert!(!state.check_deadline(t0 + TIMEOUT * 2));
        assert_eq!(state.phase(), QueryPhase::Ready);
    }

    #[test]
    fn test_never_returns_idle_without_reset() {
        let mut state = state();
        let t0 = Instant::now();
        let (generation, classified_url) = submit(&mut state, manual_query(), t0);

        state.fetch_failed(generation, None, "x".to_string());
        assert_ne!(state.phase(), QueryPhase::Idle);
        state.panel_loaded(generation, PanelKind::Classified, &classified_url);
        assert_ne!(state.phase(), QueryPhase::Idle);
        state.check_deadline(t0 + TIMEOUT * 3);
        assert_ne!(state.phase(), QueryPhase::Idle);
    }
}
