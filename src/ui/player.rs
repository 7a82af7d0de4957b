//! Player view state
//!
//! Wall-clock playback simulation over the resolved stream URL: while
//! playing, the position advances with real elapsed time and every tick
//! feeds the throttled progress tracker. Leaving the view flushes the
//! last pending write so resume never loses more than a moment.

use std::time::Instant;

use crate::models::{Movie, ProgressRecord};
use crate::sync::progress::{ProgressStore, ProgressTracker};

/// Player view state for one playback session
#[derive(Debug, Clone)]
pub struct PlayerView {
    pub movie_id: u64,
    pub title: String,
    pub stream_url: String,
    /// Current position in seconds
    pub position_secs: f64,
    /// Total duration in seconds (0 when unknown)
    pub duration_secs: f64,
    pub playing: bool,
    pub muted: bool,
    /// Volume 0.0-1.0
    pub volume: f32,
    tracker: ProgressTracker,
    last_tick: Option<Instant>,
}

impl PlayerView {
    /// Open the player for a movie, seeking to the resume position
    /// already computed from the stored record.
    pub fn open(movie: &Movie, stream_url: impl Into<String>, resume_secs: f64) -> Self {
        Self {
            movie_id: movie.id,
            title: movie.title.clone(),
            stream_url: stream_url.into(),
            position_secs: resume_secs,
            duration_secs: movie.duration_secs(),
            playing: true,
            muted: false,
            volume: 1.0,
            tracker: ProgressTracker::new(movie.id),
            last_tick: None,
        }
    }

    /// Advance playback by wall-clock elapsed time and schedule a
    /// progress write. Paused playback keeps its position but still
    /// tracks the tick instant so resuming doesn't jump.
    pub fn tick_at(&mut self, now: Instant, now_ms: u64, store: &mut ProgressStore) {
        let elapsed = self
            .last_tick
            .map(|last| now.duration_since(last).as_secs_f64())
            .unwrap_or(0.0);
        self.last_tick = Some(now);

        if !self.playing {
            return;
        }

        self.position_secs += elapsed;
        if self.duration_secs > 0.0 && self.position_secs >= self.duration_secs {
            self.position_secs = self.duration_secs;
            self.playing = false;
        }

        self.tracker.update_at(
            now,
            ProgressRecord::new(self.position_secs, self.duration_secs, now_ms),
            store,
        );
    }

    /// Flush any pending progress write. Called on navigation away and
    /// on app shutdown (the teardown analog of the page-unload hook).
    pub fn teardown(&mut self, store: &mut ProgressStore) {
        self.tracker.flush(store);
    }

    pub fn toggle_play(&mut self) {
        self.playing = !self.playing;
    }

    pub fn toggle_mute(&mut self) {
        self.muted = !self.muted;
    }

    pub fn volume_up(&mut self) {
        self.volume = (self.volume + 0.1).min(1.0);
    }

    pub fn volume_down(&mut self) {
        self.volume = (self.volume - 0.1).max(0.0);
    }

    /// Seek by a signed number of seconds, clamped to the stream bounds
    pub fn seek(&mut self, delta_secs: f64) {
        let target = self.position_secs + delta_secs;
        self.position_secs = if self.duration_secs > 0.0 {
            target.clamp(0.0, self.duration_secs)
        } else {
            target.max(0.0)
        };
    }

    /// Played fraction (0.0-1.0) for the progress bar
    pub fn fraction(&self) -> f64 {
        if self.duration_secs > 0.0 {
            (self.position_secs / self.duration_secs).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }
}
