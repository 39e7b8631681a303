//! Progress narration shown while classification is pending.
//!
//! Everything here is a pure function of elapsed time. The only stateful
//! piece is [`LoadingTimer`], which is started when the loading flag turns
//! on and stopped when it turns off.

use std::time::Duration;
use web_time::Instant;

/// Status phrases, shown in order and wrapping.
pub const PHRASES: [&str; 5] = [
    "Obteniendo Imagen",
    "Buscando regiones de interés",
    "Filtrando regiones de interés",
    "Clasificando",
    "Construyendo el resultado",
];

/// Time each phrase stays on screen.
pub const PHRASE_INTERVAL: Duration = Duration::from_secs(2);

/// Length of the fade in and of the fade out within each phrase slot.
pub const CROSSFADE: Duration = Duration::from_millis(300);

/// Duration of the decorative progress bar sweep.
pub const PROGRESS_DURATION: Duration = Duration::from_secs(20);

/// Index into [`PHRASES`] for the given elapsed time.
pub fn phrase_index(elapsed: Duration) -> usize {
    let slot = elapsed.as_millis() / PHRASE_INTERVAL.as_millis();
    (slot % PHRASES.len() as u128) as usize
}

pub fn phrase_at(elapsed: Duration) -> &'static str {
    PHRASES[phrase_index(elapsed)]
}

/// Opacity (0.0 - 1.0) of the current phrase.
///
/// Fades in over the first [`CROSSFADE`] of a slot and out over the last.
pub fn phrase_opacity(elapsed: Duration) -> f32 {
    let interval = PHRASE_INTERVAL.as_secs_f32();
    let fade = CROSSFADE.as_secs_f32();
    let into_slot = elapsed.as_secs_f32() % interval;

    let fade_in = (into_slot / fade).min(1.0);
    let fade_out = ((interval - into_slot) / fade).min(1.0);
    fade_in.min(fade_out).clamp(0.0, 1.0)
}

/// Width fraction (0.0 - 1.0) of the progress overlay.
///
/// Purely cosmetic; it does not track real request progress.
pub fn progress_fraction(elapsed: Duration) -> f32 {
    (elapsed.as_secs_f32() / PROGRESS_DURATION.as_secs_f32()).min(1.0)
}

/// Start/stop timer backing the loading animations.
#[derive(Default, Debug, Clone, Copy)]
pub struct LoadingTimer {
    started_at: Option<Instant>,
}

impl LoadingTimer {
    pub fn start(&mut self, now: Instant) {
        self.started_at = Some(now);
    }

    pub fn stop(&mut self) {
        self.started_at = None;
    }

    /// Elapsed time since start, or `None` when stopped.
    pub fn elapsed(&self, now: Instant) -> Option<Duration> {
        self.started_at
            .map(|start| now.saturating_duration_since(start))
    }
}
