//! App state and core application logic
//!
//! Manages the application state machine, navigation stack, and the
//! message/action seam between the synchronous event loop and spawned
//! network tasks. Everything here is synchronous and testable; main.rs
//! owns the terminal and the tokio spawns.

use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::config::Config;
use crate::models::{Movie, Notification, Session};
use crate::session::SessionStore;
use crate::storage::{epoch_ms, Storage};
use crate::sync::notify::NotificationPoller;
use crate::sync::progress::ProgressStore;
use crate::ui::auth_form::AuthForm;
use crate::ui::browser::{Direction, MovieRow};
use crate::ui::detail::DetailView;
use crate::ui::player::PlayerView;
use crate::ui::search::SearchView;

/// How long a notification toast stays on screen
const TOAST_DURATION: Duration = Duration::from_secs(5);

/// Seek step for the player's arrow keys, in seconds
const SEEK_STEP_SECS: f64 = 10.0;

// =============================================================================
// App State Enum
// =============================================================================

/// Application state enum representing the current screen.
/// Mirrors the original route surface: `/`, `/movies`, `/search`,
/// `/movie/:id`, `/login`, `/register`, `/profile` plus the player and
/// the not-found page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppState {
    /// Home screen: featured hero + curated carousels
    #[default]
    Home,
    /// Full catalog list
    Library,
    /// Search input with live results
    Search,
    /// Detail view for one movie
    Detail,
    /// Playback view
    Player,
    /// Login form
    Login,
    /// Registration form
    Register,
    /// Profile / sign-out screen
    Profile,
    /// Missing entity screen
    NotFound,
}

// =============================================================================
// Input Mode
// =============================================================================

/// Current input mode for keyboard handling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    /// Normal navigation mode
    #[default]
    Normal,
    /// Text input mode (search box or a form field focused)
    Editing,
}

// =============================================================================
// Selection State (list views)
// =============================================================================

/// Selection state for vertical list views
#[derive(Debug, Clone, Default)]
pub struct ListState {
    /// Currently selected index
    pub selected: usize,
    /// Scroll offset for viewport
    pub offset: usize,
    /// Total number of items
    pub len: usize,
}

impl ListState {
    pub fn new(len: usize) -> Self {
        Self {
            selected: 0,
            offset: 0,
            len,
        }
    }

    pub fn up(&mut self) {
        if self.selected > 0 {
            self.selected -= 1;
            if self.selected < self.offset {
                self.offset = self.selected;
            }
        }
    }

    pub fn down(&mut self) {
        if self.len > 0 && self.selected < self.len - 1 {
            self.selected += 1;
        }
    }

    /// Update offset to keep the selected item visible
    pub fn scroll_into_view(&mut self, visible_height: usize) {
        if self.selected < self.offset {
            self.offset = self.selected;
        } else if visible_height > 0 && self.selected >= self.offset + visible_height {
            self.offset = self.selected - visible_height + 1;
        }
    }

    /// Update length, clamping the selection into range
    pub fn set_len(&mut self, len: usize) {
        self.len = len;
        if len == 0 {
            self.selected = 0;
        } else if self.selected >= len {
            self.selected = len - 1;
        }
    }
}

// =============================================================================
// View-Specific State
// =============================================================================

/// Home view: curated rows with one active row
#[derive(Debug, Clone, Default)]
pub struct HomeState {
    pub rows: Vec<MovieRow>,
    pub active_row: usize,
    pub loading: bool,
}

impl HomeState {
    pub fn active_row(&self) -> Option<&MovieRow> {
        self.rows.get(self.active_row)
    }

    pub fn selected_movie(&self) -> Option<&Movie> {
        self.active_row().and_then(|r| r.selected_movie())
    }
}

/// Library view: the whole catalog as a vertical list
#[derive(Debug, Clone, Default)]
pub struct LibraryState {
    pub movies: Vec<Movie>,
    pub list: ListState,
    pub loading: bool,
}

impl LibraryState {
    pub fn set_movies(&mut self, movies: Vec<Movie>) {
        self.list.set_len(movies.len());
        self.movies = movies;
        self.loading = false;
    }

    pub fn selected_movie(&self) -> Option<&Movie> {
        self.movies.get(self.list.selected)
    }
}

// =============================================================================
// Actions and Messages
// =============================================================================

/// Asynchronous work requested by the state machine; the event loop
/// spawns a task per action and feeds the result back as a [`UiMessage`].
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    FetchHome,
    FetchLibrary,
    FetchDetail(u64),
    /// Resolve the stream URL, then open the player for this movie
    FetchStream(Box<Movie>),
    FetchSearch(String),
    PollCatalog,
    Login {
        login: String,
        password: String,
    },
    Register {
        name: String,
        email: String,
        password: String,
    },
}

/// Results coming back from spawned tasks
#[derive(Debug, Clone)]
pub enum UiMessage {
    /// Curated home rows, in display order (label, movies)
    HomeLoaded(Vec<(String, Vec<Movie>)>),
    LibraryLoaded(Vec<Movie>),
    DetailLoaded(Box<Movie>),
    DetailNotFound(u64),
    StreamReady {
        movie: Box<Movie>,
        url: String,
    },
    SearchLoaded {
        query: String,
        results: Vec<Movie>,
        suggestions: Vec<String>,
    },
    SearchFailed {
        query: String,
    },
    CatalogPolled(Vec<Movie>),
    AuthSucceeded(Box<Session>),
    AuthFailed(String),
    /// Non-fatal network failure; shown as a dismissable popup
    FetchFailed(String),
}

// =============================================================================
// Main Application State
// =============================================================================

/// Main application state
#[derive(Debug)]
pub struct App {
    /// Current state/screen
    pub state: AppState,
    /// Navigation history stack
    pub nav_stack: Vec<AppState>,
    /// Whether the app is running
    pub running: bool,
    /// Current input mode
    pub input_mode: InputMode,
    /// Global error message (popup)
    pub error: Option<String>,

    // View-specific states
    pub home: HomeState,
    pub library: LibraryState,
    pub search: SearchView,
    pub detail: DetailView,
    pub player: Option<PlayerView>,
    pub auth_form: Option<AuthForm>,
    /// Message shown on the not-found screen
    pub not_found: String,

    // Notifications
    pub notifications: Vec<Notification>,
    /// Toast visible until this instant
    pub toast_until: Option<Instant>,

    // Stores (single-threaded, owned by the main loop)
    pub session: SessionStore,
    pub progress: ProgressStore,
    pub poller: NotificationPoller,

    /// Cards per carousel page
    page_size: usize,
    /// Work queued for the event loop to spawn
    pending_actions: Vec<Action>,
}

impl App {
    /// Build the app over its storage-backed stores
    pub fn new(storage: Storage, config: &Config) -> Self {
        let session = SessionStore::load(storage.clone());
        let progress = ProgressStore::load(storage.clone());
        let poller = NotificationPoller::load(storage, config.poll_interval());

        Self {
            state: AppState::Home,
            nav_stack: Vec::new(),
            running: true,
            input_mode: InputMode::Normal,
            error: None,

            home: HomeState {
                loading: true,
                ..HomeState::default()
            },
            library: LibraryState::default(),
            search: SearchView::new(),
            detail: DetailView::default(),
            player: None,
            auth_form: None,
            not_found: String::new(),

            notifications: Vec::new(),
            toast_until: None,

            session,
            progress,
            poller,

            page_size: config.page_size(),
            pending_actions: vec![Action::FetchHome],
        }
    }

    /// Drain queued async work
    pub fn take_actions(&mut self) -> Vec<Action> {
        std::mem::take(&mut self.pending_actions)
    }

    fn push_action(&mut self, action: Action) {
        self.pending_actions.push(action);
    }

    // -------------------------------------------------------------------------
    // Navigation
    // -------------------------------------------------------------------------

    /// Navigate to a new state, pushing current to stack
    pub fn navigate(&mut self, state: AppState) {
        if self.state != state {
            let prev = self.state;
            self.leave_current_state();
            // Playback is torn down on exit; never navigate back into it
            if prev != AppState::Player {
                self.nav_stack.push(prev);
            }
            self.state = state;
        }
        self.input_mode = match state {
            AppState::Login | AppState::Register => InputMode::Editing,
            _ => InputMode::Normal,
        };
    }

    /// Go back to previous state
    pub fn back(&mut self) -> bool {
        if self.input_mode == InputMode::Editing
            && !matches!(self.state, AppState::Login | AppState::Register)
        {
            self.input_mode = InputMode::Normal;
            return true;
        }

        if let Some(prev) = self.nav_stack.pop() {
            self.leave_current_state();
            self.state = prev;
            self.input_mode = InputMode::Normal;
            true
        } else {
            false
        }
    }

    /// Teardown hooks for the state being left
    fn leave_current_state(&mut self) {
        if self.state == AppState::Player {
            if let Some(mut player) = self.player.take() {
                player.teardown(&mut self.progress);
            }
        }
        if matches!(self.state, AppState::Login | AppState::Register) {
            self.auth_form = None;
        }
    }

    /// Quit the application, flushing any pending progress write
    pub fn quit(&mut self) {
        if let Some(mut player) = self.player.take() {
            player.teardown(&mut self.progress);
        }
        self.running = false;
    }

    /// Open the detail screen for a movie id
    pub fn open_detail(&mut self, id: u64) {
        self.detail = DetailView::loading();
        self.navigate(AppState::Detail);
        self.push_action(Action::FetchDetail(id));
    }

    /// Start playback for the movie currently on the detail screen
    pub fn play_selected(&mut self) {
        if let Some(movie) = self.detail.movie.clone() {
            self.push_action(Action::FetchStream(Box::new(movie)));
        }
    }

    /// Focus the search input (navigating there first if needed)
    pub fn focus_search(&mut self) {
        if self.state != AppState::Search {
            self.navigate(AppState::Search);
        }
        self.input_mode = InputMode::Editing;
    }

    // -------------------------------------------------------------------------
    // Tick
    // -------------------------------------------------------------------------

    /// Per-frame housekeeping: drive the timers and the playback clock.
    /// Called once per event-loop tick.
    pub fn tick_at(&mut self, now: Instant, now_ms: u64) {
        // Search debounce window elapsed?
        if let Some(query) = self.search.poll_fetch_at(now) {
            self.push_action(Action::FetchSearch(query));
        }

        // Catalog poll due? (first call fires immediately at startup)
        if self.poller.due_at(now) {
            self.push_action(Action::PollCatalog);
        }

        // Advance playback
        if self.state == AppState::Player {
            if let Some(player) = self.player.as_mut() {
                player.tick_at(now, now_ms, &mut self.progress);
            }
        }

        // Expire the notification toast
        if let Some(until) = self.toast_until {
            if now >= until {
                self.toast_until = None;
            }
        }
    }

    pub fn tick(&mut self) {
        self.tick_at(Instant::now(), epoch_ms());
    }

    /// Whether the toast overlay is visible
    pub fn toast_visible(&self) -> bool {
        self.toast_until.is_some()
    }

    // -------------------------------------------------------------------------
    // Message Application
    // -------------------------------------------------------------------------

    /// Fold a completed async task's result into the state
    pub fn apply_at(&mut self, msg: UiMessage, now: Instant, now_ms: u64) {
        match msg {
            UiMessage::HomeLoaded(rows) => {
                self.home.rows = rows
                    .into_iter()
                    .map(|(label, movies)| MovieRow::new(label, movies, self.page_size))
                    .collect();
                self.home.active_row = 0;
                self.home.loading = false;
            }

            UiMessage::LibraryLoaded(movies) => {
                self.library.set_movies(movies);
            }

            UiMessage::DetailLoaded(movie) => {
                let resume = self.progress.resume_position(movie.id, now_ms);
                self.detail.set_movie(*movie, resume);
            }

            UiMessage::DetailNotFound(id) => {
                self.not_found = format!("Movie {} was not found", id);
                // Replace the loading detail screen rather than stacking on it
                if self.state == AppState::Detail {
                    self.state = AppState::NotFound;
                } else {
                    self.navigate(AppState::NotFound);
                }
            }

            UiMessage::StreamReady { movie, url } => {
                let resume = self.progress.resume_position(movie.id, now_ms);
                self.player = Some(PlayerView::open(&movie, url, resume));
                self.navigate(AppState::Player);
            }

            UiMessage::SearchLoaded {
                query,
                results,
                suggestions,
            } => {
                self.search.set_results(&query, results, suggestions);
            }

            UiMessage::SearchFailed { query } => {
                self.search.set_failed(&query);
            }

            UiMessage::CatalogPolled(movies) => {
                let fresh = self.poller.observe(&movies);
                if !fresh.is_empty() {
                    self.notifications.extend(fresh);
                    self.toast_until = Some(now + TOAST_DURATION);
                }
            }

            UiMessage::AuthSucceeded(session) => {
                self.session.set(*session);
                self.auth_form = None;
                // Land on home after login/register
                self.nav_stack.clear();
                self.state = AppState::Home;
                self.input_mode = InputMode::Normal;
                if self.home.rows.is_empty() {
                    self.home.loading = true;
                    self.push_action(Action::FetchHome);
                }
            }

            UiMessage::AuthFailed(message) => {
                if let Some(form) = self.auth_form.as_mut() {
                    form.fail(message);
                }
            }

            UiMessage::FetchFailed(message) => {
                self.home.loading = false;
                self.library.loading = false;
                self.error = Some(message);
            }
        }
    }

    pub fn apply(&mut self, msg: UiMessage) {
        self.apply_at(msg, Instant::now(), epoch_ms());
    }

    // -------------------------------------------------------------------------
    // Keyboard Event Handling
    // -------------------------------------------------------------------------

    /// Handle keyboard event, returns true if the event was consumed
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        self.handle_key_at(key, Instant::now())
    }

    /// Keyboard handling with an explicit tick instant (drives the
    /// search debouncer deterministically in tests)
    pub fn handle_key_at(&mut self, key: KeyEvent, now: Instant) -> bool {
        // Any keypress dismisses the error popup
        self.error = None;

        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.quit();
            return true;
        }

        if self.input_mode == InputMode::Editing {
            self.handle_editing_key(key, now)
        } else {
            self.handle_normal_key(key)
        }
    }

    /// Keys in editing mode route to whichever text surface is focused
    fn handle_editing_key(&mut self, key: KeyEvent, now: Instant) -> bool {
        match self.state {
            AppState::Search => self.handle_search_editing_key(key, now),
            AppState::Login | AppState::Register => self.handle_form_key(key),
            // Editing mode is only meaningful on text surfaces
            _ => {
                self.input_mode = InputMode::Normal;
                false
            }
        }
    }

    fn handle_search_editing_key(&mut self, key: KeyEvent, now: Instant) -> bool {
        match key.code {
            KeyCode::Esc => {
                self.input_mode = InputMode::Normal;
                true
            }
            KeyCode::Enter => {
                // Down into the result list
                self.input_mode = InputMode::Normal;
                true
            }
            KeyCode::Char(c) => {
                self.search.insert_at(c, now);
                true
            }
            KeyCode::Backspace => {
                self.search.backspace_at(now);
                true
            }
            _ => false,
        }
    }

    fn handle_form_key(&mut self, key: KeyEvent) -> bool {
        // Switch between the login and register forms
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('r') if self.state == AppState::Login => {
                    self.auth_form = Some(AuthForm::register());
                    self.state = AppState::Register;
                    return true;
                }
                KeyCode::Char('l') if self.state == AppState::Register => {
                    self.auth_form = Some(AuthForm::login());
                    self.state = AppState::Login;
                    return true;
                }
                _ => {}
            }
        }

        let Some(form) = self.auth_form.as_mut() else {
            return false;
        };

        match key.code {
            KeyCode::Esc => {
                self.back();
                true
            }
            KeyCode::Tab | KeyCode::Down => {
                form.focus_next();
                true
            }
            KeyCode::BackTab | KeyCode::Up => {
                form.focus_prev();
                true
            }
            KeyCode::Char(c) => {
                form.insert(c);
                true
            }
            KeyCode::Backspace => {
                form.backspace();
                true
            }
            KeyCode::Enter => {
                self.submit_auth_form();
                true
            }
            _ => false,
        }
    }

    /// Validate and submit the login/register form
    fn submit_auth_form(&mut self) {
        let Some(form) = self.auth_form.as_mut() else {
            return;
        };
        if form.submitting {
            return;
        }
        if !form.is_complete() {
            form.error = Some("All fields are required".to_string());
            return;
        }

        form.submitting = true;
        form.error = None;
        let values: Vec<String> = form.values().iter().map(|v| v.to_string()).collect();

        let action = match self.state {
            AppState::Register => Action::Register {
                name: values[0].clone(),
                email: values[1].clone(),
                password: values[2].clone(),
            },
            _ => Action::Login {
                login: values[0].clone(),
                password: values[1].clone(),
            },
        };
        self.push_action(action);
    }

    /// Keys in normal navigation mode
    fn handle_normal_key(&mut self, key: KeyEvent) -> bool {
        // Global shortcuts
        match key.code {
            KeyCode::Char('q') => {
                self.quit();
                return true;
            }
            KeyCode::Char('/') => {
                self.focus_search();
                return true;
            }
            KeyCode::Char('m') => {
                if self.library.movies.is_empty() {
                    self.library.loading = true;
                    self.push_action(Action::FetchLibrary);
                }
                self.navigate(AppState::Library);
                return true;
            }
            KeyCode::Char('u') => {
                if self.session.is_authenticated() {
                    self.navigate(AppState::Profile);
                } else {
                    self.auth_form = Some(AuthForm::login());
                    self.navigate(AppState::Login);
                }
                return true;
            }
            KeyCode::Esc => {
                return self.back();
            }
            _ => {}
        }

        match self.state {
            AppState::Home => self.handle_home_key(key),
            AppState::Library => self.handle_library_key(key),
            AppState::Search => self.handle_search_key(key),
            AppState::Detail => self.handle_detail_key(key),
            AppState::Player => self.handle_player_key(key),
            AppState::Profile => self.handle_profile_key(key),
            AppState::NotFound => matches!(key.code, KeyCode::Enter),
            // Forms only exist in editing mode
            AppState::Login | AppState::Register => false,
        }
    }

    fn handle_home_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.home.active_row = self.home.active_row.saturating_sub(1);
                true
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if !self.home.rows.is_empty() && self.home.active_row < self.home.rows.len() - 1 {
                    self.home.active_row += 1;
                }
                true
            }
            KeyCode::Left | KeyCode::Char('h') => {
                if let Some(row) = self.home.rows.get_mut(self.home.active_row) {
                    row.carousel.select_prev();
                }
                true
            }
            KeyCode::Right | KeyCode::Char('l') => {
                if let Some(row) = self.home.rows.get_mut(self.home.active_row) {
                    row.carousel.select_next();
                }
                true
            }
            KeyCode::Char('[') => {
                if let Some(row) = self.home.rows.get_mut(self.home.active_row) {
                    row.carousel.scroll(Direction::Left);
                }
                true
            }
            KeyCode::Char(']') => {
                if let Some(row) = self.home.rows.get_mut(self.home.active_row) {
                    row.carousel.scroll(Direction::Right);
                }
                true
            }
            KeyCode::Enter => {
                if let Some(movie) = self.home.selected_movie() {
                    let id = movie.id;
                    self.open_detail(id);
                }
                true
            }
            _ => false,
        }
    }

    fn handle_library_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.library.list.up();
                true
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.library.list.down();
                true
            }
            KeyCode::Enter => {
                if let Some(movie) = self.library.selected_movie() {
                    let id = movie.id;
                    self.open_detail(id);
                }
                true
            }
            _ => false,
        }
    }

    fn handle_search_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.search.select_prev();
                true
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.search.select_next();
                true
            }
            KeyCode::Enter => {
                if let Some(movie) = self.search.selected_movie() {
                    let id = movie.id;
                    self.open_detail(id);
                }
                true
            }
            _ => false,
        }
    }

    fn handle_detail_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Enter | KeyCode::Char('p') => {
                self.play_selected();
                true
            }
            _ => false,
        }
    }

    fn handle_player_key(&mut self, key: KeyEvent) -> bool {
        let Some(player) = self.player.as_mut() else {
            return false;
        };

        match key.code {
            KeyCode::Char(' ') => {
                player.toggle_play();
                true
            }
            KeyCode::Left => {
                player.seek(-SEEK_STEP_SECS);
                true
            }
            KeyCode::Right => {
                player.seek(SEEK_STEP_SECS);
                true
            }
            KeyCode::Char('x') => {
                player.toggle_mute();
                true
            }
            KeyCode::Up => {
                player.volume_up();
                true
            }
            KeyCode::Down => {
                player.volume_down();
                true
            }
            _ => false,
        }
    }

    fn handle_profile_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            // Sign out: unconditional return to anonymous
            KeyCode::Enter | KeyCode::Char('o') => {
                self.session.clear();
                self.nav_stack.clear();
                self.state = AppState::Home;
                true
            }
            _ => false,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::empty())
    }

    fn movie(id: u64, title: &str) -> Movie {
        Movie {
            id,
            title: title.to_string(),
            overview: String::new(),
            poster_path: None,
            backdrop_path: None,
            vote_average: 7.0,
            release_date: None,
            runtime: Some(100),
            genres: Vec::new(),
        }
    }

    fn app() -> (tempfile::TempDir, App) {
        let dir = tempfile::tempdir().unwrap();
        let app = App::new(Storage::at(dir.path()), &Config::default());
        (dir, app)
    }

    // -------------------------------------------------------------------------
    // ListState Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_list_state_navigation() {
        let mut list = ListState::new(5);
        list.down();
        list.down();
        assert_eq!(list.selected, 2);
        list.up();
        assert_eq!(list.selected, 1);
    }

    #[test]
    fn test_list_state_empty() {
        let mut list = ListState::new(0);
        list.down();
        list.up();
        assert_eq!(list.selected, 0);
    }

    #[test]
    fn test_list_state_set_len_clamps() {
        let mut list = ListState::new(10);
        list.selected = 8;
        list.set_len(5);
        assert_eq!(list.selected, 4);
    }

    #[test]
    fn test_list_state_scroll_into_view() {
        let mut list = ListState::new(50);
        list.selected = 20;
        list.scroll_into_view(10);
        assert_eq!(list.offset, 11);
        list.selected = 5;
        list.scroll_into_view(10);
        assert_eq!(list.offset, 5);
    }

    // -------------------------------------------------------------------------
    // Startup
    // -------------------------------------------------------------------------

    #[test]
    fn test_startup_queues_home_fetch() {
        let (_dir, mut app) = app();
        assert_eq!(app.state, AppState::Home);
        assert!(app.take_actions().contains(&Action::FetchHome));
        // Drained
        assert!(app.take_actions().is_empty());
    }

    #[test]
    fn test_first_tick_queues_catalog_poll() {
        let (_dir, mut app) = app();
        app.take_actions();
        app.tick_at(Instant::now(), 0);
        assert!(app.take_actions().contains(&Action::PollCatalog));
    }

    // -------------------------------------------------------------------------
    // Navigation
    // -------------------------------------------------------------------------

    #[test]
    fn test_navigation_stack() {
        let (_dir, mut app) = app();
        app.navigate(AppState::Library);
        app.navigate(AppState::Detail);
        assert_eq!(app.nav_stack.len(), 2);

        assert!(app.back());
        assert_eq!(app.state, AppState::Library);
        assert!(app.back());
        assert_eq!(app.state, AppState::Home);
        assert!(!app.back());
    }

    #[test]
    fn test_navigate_same_state_no_push() {
        let (_dir, mut app) = app();
        app.navigate(AppState::Library);
        app.navigate(AppState::Library);
        assert_eq!(app.nav_stack.len(), 1);
    }

    #[test]
    fn test_quit_keys() {
        let (_dir, mut app1) = app();
        app1.handle_key(key(KeyCode::Char('q')));
        assert!(!app1.running);

        let (_dir2, mut app2) = app();
        app2.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(!app2.running);
    }

    #[test]
    fn test_slash_focuses_search() {
        let (_dir, mut app) = app();
        app.handle_key(key(KeyCode::Char('/')));
        assert_eq!(app.state, AppState::Search);
        assert_eq!(app.input_mode, InputMode::Editing);
    }

    #[test]
    fn test_escape_leaves_editing_first() {
        let (_dir, mut app) = app();
        app.focus_search();

        app.handle_key(key(KeyCode::Esc));
        assert_eq!(app.input_mode, InputMode::Normal);
        assert_eq!(app.state, AppState::Search);

        app.handle_key(key(KeyCode::Esc));
        assert_eq!(app.state, AppState::Home);
    }

    // -------------------------------------------------------------------------
    // Home / Library
    // -------------------------------------------------------------------------

    #[test]
    fn test_home_rows_load_and_navigate() {
        let (_dir, mut app) = app();
        app.apply(UiMessage::HomeLoaded(vec![
            ("Trending Now".into(), vec![movie(1, "A"), movie(2, "B")]),
            ("Popular".into(), vec![movie(3, "C")]),
        ]));
        assert!(!app.home.loading);
        assert_eq!(app.home.rows.len(), 2);

        app.handle_key(key(KeyCode::Down));
        assert_eq!(app.home.active_row, 1);
        app.handle_key(key(KeyCode::Up));
        app.handle_key(key(KeyCode::Right));
        assert_eq!(app.home.selected_movie().unwrap().id, 2);
    }

    #[test]
    fn test_home_enter_opens_detail() {
        let (_dir, mut app) = app();
        app.apply(UiMessage::HomeLoaded(vec![(
            "Trending Now".into(),
            vec![movie(7, "Dune")],
        )]));
        app.take_actions();

        app.handle_key(key(KeyCode::Enter));
        assert_eq!(app.state, AppState::Detail);
        assert!(app.detail.loading);
        assert!(app.take_actions().contains(&Action::FetchDetail(7)));
    }

    #[test]
    fn test_library_key_fetches_once() {
        let (_dir, mut app) = app();
        app.take_actions();

        app.handle_key(key(KeyCode::Char('m')));
        assert_eq!(app.state, AppState::Library);
        assert!(app.take_actions().contains(&Action::FetchLibrary));

        app.apply(UiMessage::LibraryLoaded(vec![movie(1, "A")]));
        app.back();
        app.handle_key(key(KeyCode::Char('m')));
        // Already loaded: no refetch
        assert!(app.take_actions().is_empty());
    }

    // -------------------------------------------------------------------------
    // Detail / Player
    // -------------------------------------------------------------------------

    #[test]
    fn test_detail_not_found_replaces_detail() {
        let (_dir, mut app) = app();
        app.open_detail(99);
        app.apply(UiMessage::DetailNotFound(99));
        assert_eq!(app.state, AppState::NotFound);
        assert!(app.not_found.contains("99"));
    }

    #[test]
    fn test_stream_ready_opens_player_with_resume() {
        let (_dir, mut app) = app();
        let m = movie(5, "Heat");
        app.progress
            .record(5, crate::models::ProgressRecord::new(300.0, 6000.0, 1_000));

        app.apply_at(
            UiMessage::StreamReady {
                movie: Box::new(m),
                url: "http://s/5".into(),
            },
            Instant::now(),
            2_000,
        );
        assert_eq!(app.state, AppState::Player);
        let player = app.player.as_ref().unwrap();
        assert_eq!(player.position_secs, 300.0);
        assert_eq!(player.stream_url, "http://s/5");
    }

    #[test]
    fn test_leaving_player_flushes_progress() {
        let (_dir, mut app) = app();
        app.apply_at(
            UiMessage::StreamReady {
                movie: Box::new(movie(5, "Heat")),
                url: "http://s/5".into(),
            },
            Instant::now(),
            0,
        );

        // Two quick ticks: second write is throttled, stays pending
        let t0 = Instant::now();
        app.state = AppState::Player;
        app.player
            .as_mut()
            .unwrap()
            .tick_at(t0, 0, &mut app.progress);
        app.player
            .as_mut()
            .unwrap()
            .tick_at(t0 + Duration::from_millis(100), 100, &mut app.progress);

        app.back();
        assert!(app.player.is_none());
        // The flushed record is the later one
        assert!(app.progress.get(5).unwrap().position_secs > 0.0);
    }

    // -------------------------------------------------------------------------
    // Auth Flow
    // -------------------------------------------------------------------------

    fn fill_login(app: &mut App) {
        app.handle_key(key(KeyCode::Char('u')));
        assert_eq!(app.state, AppState::Login);
        app.handle_key(key(KeyCode::Char('a')));
        app.handle_key(key(KeyCode::Tab));
        app.handle_key(key(KeyCode::Char('p')));
    }

    fn session() -> Session {
        Session {
            token: "tok".into(),
            user: crate::models::User {
                id: "1".into(),
                name: "Ada".into(),
                email: "a@b.c".into(),
                avatar: None,
            },
        }
    }

    #[test]
    fn test_login_submit_queues_action() {
        let (_dir, mut app) = app();
        app.take_actions();
        fill_login(&mut app);

        app.handle_key(key(KeyCode::Enter));
        let actions = app.take_actions();
        assert!(actions.contains(&Action::Login {
            login: "a".into(),
            password: "p".into()
        }));
        assert!(app.auth_form.as_ref().unwrap().submitting);
    }

    #[test]
    fn test_incomplete_form_errors_without_request() {
        let (_dir, mut app) = app();
        app.take_actions();
        app.handle_key(key(KeyCode::Char('u')));
        app.handle_key(key(KeyCode::Enter));

        assert!(app.take_actions().is_empty());
        assert!(app.auth_form.as_ref().unwrap().error.is_some());
    }

    #[test]
    fn test_auth_success_transitions_and_persists() {
        let (_dir, mut app) = app();
        fill_login(&mut app);
        app.handle_key(key(KeyCode::Enter));

        app.apply(UiMessage::AuthSucceeded(Box::new(session())));
        assert!(app.session.is_authenticated());
        assert_eq!(app.state, AppState::Home);
        assert!(app.auth_form.is_none());
    }

    #[test]
    fn test_auth_failure_stays_anonymous_with_error() {
        let (_dir, mut app) = app();
        fill_login(&mut app);
        app.handle_key(key(KeyCode::Enter));

        app.apply(UiMessage::AuthFailed("Invalid credentials".into()));
        assert!(!app.session.is_authenticated());
        assert_eq!(app.state, AppState::Login);
        assert_eq!(
            app.auth_form.as_ref().unwrap().error.as_deref(),
            Some("Invalid credentials")
        );
    }

    #[test]
    fn test_profile_signout() {
        let (_dir, mut app) = app();
        app.session.set(session());
        app.handle_key(key(KeyCode::Char('u')));
        assert_eq!(app.state, AppState::Profile);

        app.handle_key(key(KeyCode::Enter));
        assert!(!app.session.is_authenticated());
        assert_eq!(app.state, AppState::Home);
    }

    // -------------------------------------------------------------------------
    // Search Flow
    // -------------------------------------------------------------------------

    #[test]
    fn test_search_typing_then_debounce_fetch() {
        let (_dir, mut app) = app();
        app.take_actions();
        let t0 = Instant::now();

        app.focus_search();
        for c in "matrix".chars() {
            app.handle_key_at(key(KeyCode::Char(c)), t0);
        }
        app.take_actions();

        app.tick_at(t0 + Duration::from_millis(300), 0);
        assert!(app
            .take_actions()
            .contains(&Action::FetchSearch("matrix".into())));
    }

    #[test]
    fn test_search_single_char_no_fetch() {
        let (_dir, mut app) = app();
        app.take_actions();
        let t0 = Instant::now();

        app.focus_search();
        app.handle_key_at(key(KeyCode::Char('m')), t0);
        app.tick_at(t0 + Duration::from_millis(400), 0);

        let actions = app.take_actions();
        assert!(!actions
            .iter()
            .any(|a| matches!(a, Action::FetchSearch(_))));
    }

    // -------------------------------------------------------------------------
    // Notifications
    // -------------------------------------------------------------------------

    #[test]
    fn test_poll_result_surfaces_notifications() {
        let (_dir, mut app) = app();
        let t0 = Instant::now();

        app.apply_at(
            UiMessage::CatalogPolled(vec![movie(1, "Dune")]),
            t0,
            0,
        );
        assert_eq!(app.notifications.len(), 1);
        assert!(app.toast_visible());
        assert!(app.poller.known_titles().contains(&"Dune".to_string()));

        // Toast expires on tick
        app.tick_at(t0 + Duration::from_secs(6), 0);
        assert!(!app.toast_visible());

        // Second poll with the same title is quiet
        app.apply_at(UiMessage::CatalogPolled(vec![movie(1, "Dune")]), t0, 0);
        assert_eq!(app.notifications.len(), 1);
    }

    // -------------------------------------------------------------------------
    // Error Popup
    // -------------------------------------------------------------------------

    #[test]
    fn test_fetch_failure_shows_and_dismisses() {
        let (_dir, mut app) = app();
        app.apply(UiMessage::FetchFailed("network down".into()));
        assert_eq!(app.error.as_deref(), Some("network down"));

        app.handle_key(key(KeyCode::Char('j')));
        assert!(app.error.is_none());
    }
}
