//! Search view state
//!
//! Text input plus the debounced fetch gate: every keystroke cancels the
//! pending timer; after 300 ms of quiet with at least two characters the
//! view asks for results and suggestions. Shorter queries clear both
//! immediately without touching the network.

use std::time::{Duration, Instant};

use crate::models::Movie;
use crate::sync::timer::Debouncer;

/// Quiet period after the last keystroke before a request goes out
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);

/// Minimum query length that triggers a request
pub const MIN_QUERY_LEN: usize = 2;

/// Search view state
#[derive(Debug, Clone)]
pub struct SearchView {
    /// Current query (kept in sync with the Search nav entry)
    pub query: String,
    /// Cursor position in query (byte offset)
    pub cursor: usize,
    /// Search results
    pub results: Vec<Movie>,
    /// Suggestion strings shown under the input
    pub suggestions: Vec<String>,
    /// Selected result index
    pub selected: usize,
    /// A request is in flight
    pub loading: bool,
    debouncer: Debouncer,
}

impl Default for SearchView {
    fn default() -> Self {
        Self {
            query: String::new(),
            cursor: 0,
            results: Vec::new(),
            suggestions: Vec::new(),
            selected: 0,
            loading: false,
            debouncer: Debouncer::new(SEARCH_DEBOUNCE),
        }
    }
}

impl SearchView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert character at cursor
    pub fn insert_at(&mut self, c: char, now: Instant) {
        self.query.insert(self.cursor, c);
        self.cursor += c.len_utf8();
        self.on_query_changed(now);
    }

    /// Delete character before cursor
    pub fn backspace_at(&mut self, now: Instant) {
        if self.cursor > 0 {
            let prev = self.query[..self.cursor]
                .chars()
                .next_back()
                .map(|c| c.len_utf8())
                .unwrap_or(1);
            self.cursor -= prev;
            self.query.remove(self.cursor);
            self.on_query_changed(now);
        }
    }

    /// Replace the whole query (suggestion accepted, or restored on
    /// back-navigation)
    pub fn set_query_at(&mut self, query: impl Into<String>, now: Instant) {
        self.query = query.into();
        self.cursor = self.query.len();
        self.on_query_changed(now);
    }

    /// Clear query and results
    pub fn clear(&mut self) {
        self.query.clear();
        self.cursor = 0;
        self.results.clear();
        self.suggestions.clear();
        self.selected = 0;
        self.loading = false;
        self.debouncer.cancel();
    }

    /// Debounce gate, called on every query edit: short queries cancel
    /// the timer and drop stale results right away; long enough queries
    /// (re)arm it.
    fn on_query_changed(&mut self, now: Instant) {
        if self.query.chars().count() >= MIN_QUERY_LEN {
            self.debouncer.schedule_at(now);
        } else {
            self.debouncer.cancel();
            self.results.clear();
            self.suggestions.clear();
            self.selected = 0;
            self.loading = false;
        }
    }

    /// Called every event-loop tick. Returns the query to fetch when the
    /// debounce window just elapsed.
    pub fn poll_fetch_at(&mut self, now: Instant) -> Option<String> {
        if self.debouncer.fire_at(now) && self.query.chars().count() >= MIN_QUERY_LEN {
            self.loading = true;
            Some(self.query.clone())
        } else {
            None
        }
    }

    /// A fetch finished. Results for a superseded query are dropped.
    pub fn set_results(&mut self, query: &str, results: Vec<Movie>, suggestions: Vec<String>) {
        if query != self.query {
            return;
        }
        self.selected = 0;
        self.results = results;
        self.suggestions = suggestions;
        self.loading = false;
    }

    /// A fetch failed: show empty results, never crash
    pub fn set_failed(&mut self, query: &str) {
        if query != self.query {
            return;
        }
        self.results.clear();
        self.suggestions.clear();
        self.loading = false;
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn select_next(&mut self) {
        if !self.results.is_empty() && self.selected < self.results.len() - 1 {
            self.selected += 1;
        }
    }

    pub fn selected_movie(&self) -> Option<&Movie> {
        self.results.get(self.selected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS: Duration = Duration::from_millis(1);

    fn movie(id: u64, title: &str) -> Movie {
        Movie {
            id,
            title: title.to_string(),
            overview: String::new(),
            poster_path: None,
            backdrop_path: None,
            vote_average: 0.0,
            release_date: None,
            runtime: None,
            genres: Vec::new(),
        }
    }

    fn type_str(view: &mut SearchView, s: &str, now: Instant) {
        for c in s.chars() {
            view.insert_at(c, now);
        }
    }

    #[test]
    fn test_short_query_never_fetches() {
        let mut view = SearchView::new();
        let t0 = Instant::now();

        view.insert_at('m', t0);
        assert!(view.poll_fetch_at(t0 + 400 * MS).is_none());
    }

    #[test]
    fn test_fetch_after_quiet_period() {
        let mut view = SearchView::new();
        let t0 = Instant::now();

        type_str(&mut view, "matrix", t0);
        assert!(view.poll_fetch_at(t0 + 100 * MS).is_none());
        assert_eq!(view.poll_fetch_at(t0 + 300 * MS).as_deref(), Some("matrix"));
        assert!(view.loading);
        // Fired once; quiet until the next edit
        assert!(view.poll_fetch_at(t0 + 600 * MS).is_none());
    }

    #[test]
    fn test_keystroke_supersedes_pending_fetch() {
        let mut view = SearchView::new();
        let t0 = Instant::now();

        type_str(&mut view, "ma", t0);
        // Another keystroke 200ms later restarts the window
        view.insert_at('t', t0 + 200 * MS);
        assert!(view.poll_fetch_at(t0 + 300 * MS).is_none());
        assert_eq!(view.poll_fetch_at(t0 + 500 * MS).as_deref(), Some("mat"));
    }

    #[test]
    fn test_shrinking_below_min_clears_immediately() {
        let mut view = SearchView::new();
        let t0 = Instant::now();

        type_str(&mut view, "ma", t0);
        view.set_results("ma", vec![movie(1, "The Matrix")], vec!["matrix".into()]);
        assert_eq!(view.results.len(), 1);

        view.backspace_at(t0 + 50 * MS);
        assert!(view.results.is_empty());
        assert!(view.suggestions.is_empty());
        // And the pending timer died with it
        assert!(view.poll_fetch_at(t0 + 500 * MS).is_none());
    }

    #[test]
    fn test_results_render_exactly_what_the_api_returned() {
        let mut view = SearchView::new();
        let t0 = Instant::now();

        type_str(&mut view, "matrix", t0);
        assert!(view.poll_fetch_at(t0 + 300 * MS).is_some());

        view.set_results("matrix", vec![movie(1, "The Matrix")], Vec::new());
        assert_eq!(view.results.len(), 1);
        assert_eq!(view.results[0].id, 1);
        assert_eq!(view.results[0].title, "The Matrix");
        assert!(!view.loading);
    }

    #[test]
    fn test_stale_results_are_dropped() {
        let mut view = SearchView::new();
        let t0 = Instant::now();

        type_str(&mut view, "matrix", t0);
        // The user kept typing before the old response landed
        view.insert_at('!', t0 + 100 * MS);

        view.set_results("matrix", vec![movie(1, "The Matrix")], Vec::new());
        assert!(view.results.is_empty());
    }

    #[test]
    fn test_failed_fetch_shows_empty_results() {
        let mut view = SearchView::new();
        let t0 = Instant::now();

        type_str(&mut view, "matrix", t0);
        assert!(view.poll_fetch_at(t0 + 300 * MS).is_some());

        view.set_failed("matrix");
        assert!(view.results.is_empty());
        assert!(!view.loading);
    }

    #[test]
    fn test_accepting_a_suggestion_reschedules() {
        let mut view = SearchView::new();
        let t0 = Instant::now();

        type_str(&mut view, "ma", t0);
        view.set_query_at("matrix reloaded", t0 + 100 * MS);
        assert_eq!(view.query, "matrix reloaded");
        assert_eq!(
            view.poll_fetch_at(t0 + 400 * MS).as_deref(),
            Some("matrix reloaded")
        );
    }

    #[test]
    fn test_selection_navigation() {
        let mut view = SearchView::new();
        view.query = "xx".into();
        view.set_results("xx", vec![movie(1, "A"), movie(2, "B")], Vec::new());

        view.select_next();
        assert_eq!(view.selected_movie().unwrap().id, 2);
        view.select_next();
        assert_eq!(view.selected, 1);
        view.select_prev();
        assert_eq!(view.selected_movie().unwrap().id, 1);
    }

    #[test]
    fn test_clear_resets_everything() {
        let mut view = SearchView::new();
        let t0 = Instant::now();

        type_str(&mut view, "matrix", t0);
        view.set_results("matrix", vec![movie(1, "The Matrix")], vec!["m".into()]);
        view.clear();

        assert!(view.query.is_empty());
        assert!(view.results.is_empty());
        assert!(view.poll_fetch_at(t0 + 400 * MS).is_none());
    }
}
