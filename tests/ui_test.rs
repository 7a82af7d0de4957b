//! UI component and flow tests
//!
//! Theme contrast, carousel paging, and full keyboard-driven flows
//! through the App state machine (search, detail, playback, auth).

use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{backend::TestBackend, Terminal};

use mflix::app::{Action, App, AppState, InputMode, UiMessage};
use mflix::config::Config;
use mflix::models::{Movie, ProgressRecord};
use mflix::storage::Storage;
use mflix::ui::browser::{Carousel, Direction};
use mflix::ui::theme::{color_to_rgb, contrast_ratio, meets_wcag_aa, Theme};

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::empty())
}

fn movie(id: u64, title: &str) -> Movie {
    Movie {
        id,
        title: title.to_string(),
        overview: "overview".to_string(),
        poster_path: None,
        backdrop_path: None,
        vote_average: 7.5,
        release_date: Some("2020-01-01".to_string()),
        runtime: Some(120),
        genres: Vec::new(),
    }
}

fn app() -> (tempfile::TempDir, App) {
    let dir = tempfile::tempdir().unwrap();
    let app = App::new(Storage::at(dir.path()), &Config::default());
    (dir, app)
}

// =============================================================================
// Theme Tests
// =============================================================================

#[test]
fn test_theme_core_colors_are_rgb() {
    for color in [
        Theme::BACKGROUND,
        Theme::BRAND,
        Theme::TEXT,
        Theme::DIM,
        Theme::ACCENT,
        Theme::SUCCESS,
        Theme::ERROR,
    ] {
        assert!(color_to_rgb(color).is_some());
    }
}

#[test]
fn test_text_readability() {
    let text = color_to_rgb(Theme::TEXT).unwrap();
    let bg = color_to_rgb(Theme::BACKGROUND).unwrap();
    assert!(
        meets_wcag_aa(text, bg),
        "text/background contrast {:.2}:1 below WCAG AA",
        contrast_ratio(text, bg)
    );
}

// =============================================================================
// Carousel Tests: one page per scroll, edge arrows
// =============================================================================

#[test]
fn test_carousel_scroll_contract() {
    let mut carousel = Carousel::new(15, 5);

    // At the left edge only the right arrow shows
    assert!(!carousel.show_left_arrow());
    assert!(carousel.show_right_arrow());

    // Each scroll moves exactly one visible page
    carousel.scroll(Direction::Right);
    assert_eq!(carousel.offset, 5);
    carousel.scroll(Direction::Right);
    assert_eq!(carousel.offset, 10);

    // Fully scrolled: right arrow disappears
    assert!(!carousel.show_right_arrow());
    assert!(carousel.show_left_arrow());

    carousel.scroll(Direction::Left);
    carousel.scroll(Direction::Left);
    assert_eq!(carousel.offset, 0);
    assert!(!carousel.show_left_arrow());
}

// =============================================================================
// Rendering Smoke Test
// =============================================================================

#[test]
fn test_layout_renders_at_min_and_large_sizes() {
    // The views must not panic at a small or large terminal
    for (width, height) in [(80u16, 24u16), (200, 50)] {
        let backend = TestBackend::new(width, height);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|frame| {
                use ratatui::layout::{Constraint, Direction, Layout};
                use ratatui::widgets::{Block, Borders, Paragraph};

                let chunks = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([
                        Constraint::Length(3),
                        Constraint::Min(1),
                        Constraint::Length(1),
                    ])
                    .split(frame.area());

                frame.render_widget(
                    Paragraph::new("MFLIX").block(Block::default().borders(Borders::ALL)),
                    chunks[0],
                );
                frame.render_widget(
                    Paragraph::new("content").style(Theme::text()),
                    chunks[1],
                );
                frame.render_widget(Paragraph::new("status").style(Theme::status_bar()), chunks[2]);
            })
            .unwrap();
    }
}

// =============================================================================
// Search Flow: debounce, minimum length, exact rendering
// =============================================================================

#[test]
fn test_full_search_flow() {
    let (_dir, mut app) = app();
    let t0 = Instant::now();

    // Drain the startup work (home fetch + first catalog poll)
    app.tick_at(t0, 0);
    app.take_actions();

    // '/' focuses the search input
    app.handle_key_at(key(KeyCode::Char('/')), t0);
    assert_eq!(app.state, AppState::Search);
    assert_eq!(app.input_mode, InputMode::Editing);

    // Type a query; nothing fires inside the 300ms window
    for c in "matrix".chars() {
        app.handle_key_at(key(KeyCode::Char(c)), t0);
    }
    app.tick_at(t0 + Duration::from_millis(100), 0);
    assert!(app.take_actions().is_empty());

    // After 300ms quiet the fetch goes out
    app.tick_at(t0 + Duration::from_millis(310), 0);
    assert!(app
        .take_actions()
        .contains(&Action::FetchSearch("matrix".into())));

    // The response renders exactly what the API returned
    app.apply(UiMessage::SearchLoaded {
        query: "matrix".into(),
        results: vec![movie(1, "The Matrix")],
        suggestions: vec!["matrix reloaded".into()],
    });
    assert_eq!(app.search.results.len(), 1);
    assert_eq!(app.search.results[0].title, "The Matrix");
    assert_eq!(app.search.suggestions.len(), 1);

    // Enter drops to the list, second Enter opens the detail view
    app.handle_key_at(key(KeyCode::Enter), t0);
    assert_eq!(app.input_mode, InputMode::Normal);
    app.handle_key_at(key(KeyCode::Enter), t0);
    assert_eq!(app.state, AppState::Detail);
    assert!(app.take_actions().contains(&Action::FetchDetail(1)));
}

#[test]
fn test_single_character_clears_without_fetch() {
    let (_dir, mut app) = app();
    app.take_actions();
    let t0 = Instant::now();

    app.handle_key_at(key(KeyCode::Char('/')), t0);
    app.handle_key_at(key(KeyCode::Char('m')), t0);
    app.handle_key_at(key(KeyCode::Char('a')), t0);
    app.apply(UiMessage::SearchLoaded {
        query: "ma".into(),
        results: vec![movie(1, "The Matrix")],
        suggestions: Vec::new(),
    });

    // Shrinking to one character clears immediately, no request later
    app.handle_key_at(key(KeyCode::Backspace), t0);
    assert!(app.search.results.is_empty());
    app.tick_at(t0 + Duration::from_secs(1), 0);
    assert!(!app
        .take_actions()
        .iter()
        .any(|a| matches!(a, Action::FetchSearch(_))));
}

// =============================================================================
// Detail → Player Flow: resume rules applied on open
// =============================================================================

#[test]
fn test_play_resumes_from_stored_position() {
    let (_dir, mut app) = app();
    let t0 = Instant::now();

    // Stored halfway through a two-hour runtime, an hour ago
    app.progress
        .record(5, ProgressRecord::new(3600.0, 7200.0, 0));

    app.open_detail(5);
    app.take_actions();
    app.apply_at(
        UiMessage::DetailLoaded(Box::new(movie(5, "Heat"))),
        t0,
        60_000,
    );
    assert!(app.detail.can_resume());

    // Play resolves the stream and opens the player at the stored spot
    app.handle_key_at(key(KeyCode::Enter), t0);
    let actions = app.take_actions();
    assert!(matches!(actions.first(), Some(Action::FetchStream(m)) if m.id == 5));

    app.apply_at(
        UiMessage::StreamReady {
            movie: Box::new(movie(5, "Heat")),
            url: "https://cdn/5.m3u8".into(),
        },
        t0,
        60_000,
    );
    assert_eq!(app.state, AppState::Player);
    assert_eq!(app.player.as_ref().unwrap().position_secs, 3600.0);
}

#[test]
fn test_stale_progress_starts_from_zero() {
    let (_dir, mut app) = app();
    let t0 = Instant::now();
    let eight_days_ms = 8 * 24 * 60 * 60 * 1000;

    app.progress
        .record(5, ProgressRecord::new(3600.0, 7200.0, 0));

    app.apply_at(
        UiMessage::StreamReady {
            movie: Box::new(movie(5, "Heat")),
            url: "https://cdn/5.m3u8".into(),
        },
        t0,
        eight_days_ms,
    );
    assert_eq!(app.player.as_ref().unwrap().position_secs, 0.0);
}

#[test]
fn test_player_keys() {
    let (_dir, mut app) = app();
    let t0 = Instant::now();

    app.apply_at(
        UiMessage::StreamReady {
            movie: Box::new(movie(5, "Heat")),
            url: "https://cdn/5.m3u8".into(),
        },
        t0,
        0,
    );

    app.handle_key_at(key(KeyCode::Char(' ')), t0);
    assert!(!app.player.as_ref().unwrap().playing);

    app.handle_key_at(key(KeyCode::Right), t0);
    assert_eq!(app.player.as_ref().unwrap().position_secs, 10.0);
    app.handle_key_at(key(KeyCode::Left), t0);
    assert_eq!(app.player.as_ref().unwrap().position_secs, 0.0);

    app.handle_key_at(key(KeyCode::Char('x')), t0);
    assert!(app.player.as_ref().unwrap().muted);
}

// =============================================================================
// Auth Flow: success persists, failure surfaces inline
// =============================================================================

#[test]
fn test_login_flow_via_keyboard() {
    let (_dir, mut app) = app();
    app.take_actions();

    app.handle_key(key(KeyCode::Char('u')));
    assert_eq!(app.state, AppState::Login);
    assert_eq!(app.input_mode, InputMode::Editing);

    for c in "ada".chars() {
        app.handle_key(key(KeyCode::Char(c)));
    }
    app.handle_key(key(KeyCode::Tab));
    for c in "pw".chars() {
        app.handle_key(key(KeyCode::Char(c)));
    }
    app.handle_key(key(KeyCode::Enter));

    let actions = app.take_actions();
    assert!(actions.contains(&Action::Login {
        login: "ada".into(),
        password: "pw".into()
    }));

    // Failure: anonymous, inline error, form still there
    app.apply(UiMessage::AuthFailed("Invalid credentials".into()));
    assert_eq!(app.state, AppState::Login);
    assert!(!app.session.is_authenticated());
    assert_eq!(
        app.auth_form.as_ref().unwrap().error.as_deref(),
        Some("Invalid credentials")
    );
}

#[test]
fn test_register_toggle() {
    let (_dir, mut app) = app();

    app.handle_key(key(KeyCode::Char('u')));
    assert_eq!(app.state, AppState::Login);

    app.handle_key(KeyEvent::new(KeyCode::Char('r'), KeyModifiers::CONTROL));
    assert_eq!(app.state, AppState::Register);
    assert_eq!(app.auth_form.as_ref().unwrap().fields.len(), 3);

    app.handle_key(KeyEvent::new(KeyCode::Char('l'), KeyModifiers::CONTROL));
    assert_eq!(app.state, AppState::Login);
}
