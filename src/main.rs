//! mflix - terminal client for the mflix streaming catalog
//!
//! Browse, search and resume titles from a terminal.
//!
//! # Usage
//!
//! ```bash
//! # Launch interactive TUI
//! mflix
//!
//! # CLI mode (for automation)
//! mflix search "the matrix"
//! mflix browse trending --json
//! mflix login ada secret
//! ```

use std::io::{stdout, Stdout};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, List, ListItem, Paragraph, Wrap},
    Frame, Terminal,
};
use tokio::sync::mpsc::{self, UnboundedSender};
use tracing_subscriber::EnvFilter;

use mflix::api::catalog::Category;
use mflix::api::{ApiError, AuthClient, CatalogClient};
use mflix::app::{Action, App, AppState, InputMode, UiMessage};
use mflix::cli::{Cli, Command, ExitCode, Output};
use mflix::commands;
use mflix::config::Config;
use mflix::models::format_secs;
use mflix::storage::Storage;
use mflix::ui::Theme;

/// Terminal type alias for convenience
type Tui = Terminal<CrosstermBackend<Stdout>>;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = cli
        .config
        .as_deref()
        .map(Config::load_from)
        .unwrap_or_else(Config::load);

    if cli.is_cli_mode() {
        // CLI mode: execute command and exit
        init_tracing_stderr();
        let exit_code = run_cli(cli, &config).await;
        std::process::exit(exit_code.into());
    } else {
        // TUI mode: launch interactive interface
        run_tui(&config).await
    }
}

/// CLI-mode logging goes to stderr, filtered by RUST_LOG
fn init_tracing_stderr() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("mflix=warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// TUI-mode logging goes to a file so the alternate screen stays clean
fn init_tracing_file(storage: &Storage) {
    let Ok(file) = std::fs::File::create(storage.root().join("mflix.log")) else {
        return;
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("mflix=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Arc::new(file))
        .init();
}

/// Run CLI command and return exit code
async fn run_cli(cli: Cli, config: &Config) -> ExitCode {
    let output = Output::new(&cli);

    match cli.command {
        Some(Command::List(cmd)) => commands::list_cmd(cmd, config, &output).await,
        Some(Command::Browse(cmd)) => commands::browse_cmd(cmd, config, &output).await,
        Some(Command::Search(cmd)) => commands::search_cmd(cmd, config, &output).await,
        Some(Command::Suggest(cmd)) => commands::suggest_cmd(cmd, config, &output).await,
        Some(Command::Info(cmd)) => commands::info_cmd(cmd, config, &output).await,
        Some(Command::StreamUrl(cmd)) => commands::stream_url_cmd(cmd, config, &output).await,
        Some(Command::Login(cmd)) => commands::login_cmd(cmd, config, &output).await,
        Some(Command::Register(cmd)) => commands::register_cmd(cmd, config, &output).await,
        Some(Command::Logout) => commands::logout_cmd(&output).await,
        Some(Command::Whoami) => commands::whoami_cmd(&output).await,
        Some(Command::Progress(cmd)) => commands::progress_cmd(cmd, &output).await,
        Some(Command::Notifications(cmd)) => {
            commands::notifications_cmd(cmd, config, &output).await
        }

        None => {
            // This shouldn't happen (handled by is_cli_mode check)
            ExitCode::Success
        }
    }
}

// =============================================================================
// TUI Mode
// =============================================================================

/// Initialize the terminal for TUI mode
fn init_terminal() -> Result<Tui> {
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Restore terminal to normal state
fn restore_terminal(terminal: &mut Tui) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

/// Run interactive TUI
async fn run_tui(config: &Config) -> Result<()> {
    let storage = Storage::open_default()
        .ok_or_else(|| anyhow::anyhow!("Could not open the local data directory"))?;
    init_tracing_file(&storage);

    let mut terminal = init_terminal()?;
    let mut app = App::new(storage, config);

    let result = run_event_loop(&mut terminal, &mut app, config).await;

    // Always restore terminal, even on error
    restore_terminal(&mut terminal)?;

    result
}

/// Main event loop - drains task results, runs timers, renders, handles input
async fn run_event_loop(terminal: &mut Tui, app: &mut App, config: &Config) -> Result<()> {
    const TICK_RATE: Duration = Duration::from_millis(100);

    let (tx, mut rx) = mpsc::unbounded_channel();
    let catalog = CatalogClient::new(config.api_base_url());
    let auth = AuthClient::new(config.api_base_url());

    while app.running {
        // Fold in completed async work
        while let Ok(msg) = rx.try_recv() {
            app.apply(msg);
        }

        // Drive timers: search debounce, catalog poll, playback clock
        app.tick();

        // Spawn newly requested async work
        for action in app.take_actions() {
            spawn_action(action, catalog.clone(), auth.clone(), tx.clone());
        }

        // Render current state
        terminal.draw(|frame| render_ui(frame, app))?;

        // Poll for input with timeout
        if event::poll(TICK_RATE)? {
            if let Event::Key(key) = event::read()? {
                // Only handle key press events (ignore releases on Windows)
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key);
                }
            }
        }
    }

    Ok(())
}

// =============================================================================
// Async Actions
// =============================================================================

/// Run one action on a spawned task and report back over the channel
fn spawn_action(
    action: Action,
    catalog: CatalogClient,
    auth: AuthClient,
    tx: UnboundedSender<UiMessage>,
) {
    tokio::spawn(async move {
        if let Some(msg) = run_action(action, &catalog, &auth).await {
            let _ = tx.send(msg);
        }
    });
}

/// Execute an action against the API. Returns None when a failure is
/// best-effort (the catalog poll) and only deserves a log line.
async fn run_action(
    action: Action,
    catalog: &CatalogClient,
    auth: &AuthClient,
) -> Option<UiMessage> {
    match action {
        Action::FetchHome => {
            let (featured, trending, popular, top_rated) = tokio::join!(
                catalog.category(Category::Featured),
                catalog.category(Category::Trending),
                catalog.category(Category::Popular),
                catalog.category(Category::TopRated),
            );

            let mut rows = Vec::new();
            let mut failures = 0;
            for (category, result) in [
                (Category::Featured, featured),
                (Category::Trending, trending),
                (Category::Popular, popular),
                (Category::TopRated, top_rated),
            ] {
                match result {
                    Ok(movies) if !movies.is_empty() => {
                        rows.push((category.label().to_string(), movies));
                    }
                    Ok(_) => {}
                    Err(e) => {
                        failures += 1;
                        tracing::warn!(row = category.label(), error = %e, "home row fetch failed");
                    }
                }
            }

            if rows.is_empty() && failures > 0 {
                Some(UiMessage::FetchFailed("Could not load the catalog".into()))
            } else {
                Some(UiMessage::HomeLoaded(rows))
            }
        }

        Action::FetchLibrary => match catalog.list().await {
            Ok(movies) => Some(UiMessage::LibraryLoaded(movies)),
            Err(e) => {
                tracing::warn!(error = %e, "catalog list failed");
                Some(UiMessage::FetchFailed("Could not load the catalog".into()))
            }
        },

        Action::FetchDetail(id) => match catalog.detail(id).await {
            Ok(movie) => Some(UiMessage::DetailLoaded(Box::new(movie))),
            Err(e) => {
                if matches!(e.downcast_ref::<ApiError>(), Some(ApiError::NotFound)) {
                    Some(UiMessage::DetailNotFound(id))
                } else {
                    tracing::warn!(id, error = %e, "detail fetch failed");
                    Some(UiMessage::FetchFailed(format!(
                        "Could not load movie {}",
                        id
                    )))
                }
            }
        },

        Action::FetchStream(movie) => match catalog.stream_url(movie.id).await {
            Ok(url) => Some(UiMessage::StreamReady { movie, url }),
            Err(e) => {
                tracing::warn!(id = movie.id, error = %e, "stream lookup failed");
                Some(UiMessage::FetchFailed("Could not start playback".into()))
            }
        },

        Action::FetchSearch(query) => {
            // Results and suggestions go out in parallel
            let (results, suggestions) =
                tokio::join!(catalog.search(&query), catalog.suggestions(&query));

            match results {
                Ok(results) => {
                    let suggestions = suggestions.unwrap_or_else(|e| {
                        tracing::warn!(error = %e, "suggestions fetch failed");
                        Vec::new()
                    });
                    Some(UiMessage::SearchLoaded {
                        query,
                        results,
                        suggestions,
                    })
                }
                Err(e) => {
                    tracing::warn!(error = %e, "search failed");
                    Some(UiMessage::SearchFailed { query })
                }
            }
        }

        Action::PollCatalog => match catalog.list().await {
            Ok(movies) => Some(UiMessage::CatalogPolled(movies)),
            Err(e) => {
                // Best-effort: log and let the next tick proceed
                tracing::warn!(error = %e, "catalog poll failed");
                None
            }
        },

        Action::Login { login, password } => match auth.login(&login, &password).await {
            Ok(session) => Some(UiMessage::AuthSucceeded(Box::new(session))),
            Err(e) => {
                let message =
                    if matches!(e.downcast_ref::<ApiError>(), Some(ApiError::Unauthorized)) {
                        "Invalid credentials".to_string()
                    } else {
                        format!("Login failed: {}", e)
                    };
                Some(UiMessage::AuthFailed(message))
            }
        },

        Action::Register {
            name,
            email,
            password,
        } => match auth.register(&name, &email, &password).await {
            Ok(session) => Some(UiMessage::AuthSucceeded(Box::new(session))),
            Err(e) => {
                let message =
                    if matches!(e.downcast_ref::<ApiError>(), Some(ApiError::Unauthorized)) {
                        "Registration failed".to_string()
                    } else {
                        format!("Registration failed: {}", e)
                    };
                Some(UiMessage::AuthFailed(message))
            }
        },
    }
}

// =============================================================================
// UI Rendering
// =============================================================================

/// Main render function - dispatches to view-specific renderers
fn render_ui(frame: &mut Frame, app: &App) {
    let area = frame.area();

    frame.render_widget(Clear, area);
    frame.render_widget(
        Block::default().style(ratatui::style::Style::default().bg(Theme::BACKGROUND)),
        area,
    );

    // Main layout: header, content, status bar
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(1),    // Content
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    render_header(frame, chunks[0], app);
    render_content(frame, chunks[1], app);
    render_status_bar(frame, chunks[2], app);

    // Overlays
    if app.toast_visible() {
        render_toast(frame, area, app);
    }
    if let Some(ref error) = app.error {
        render_error_popup(frame, area, error);
    }
}

/// Render the header with logo, search box and account indicator
fn render_header(frame: &mut Frame, area: Rect, app: &App) {
    let header_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(12), // Logo
            Constraint::Min(1),     // Search box
            Constraint::Length(24), // Bell + account
        ])
        .split(area);

    // Logo
    let logo = Paragraph::new(Line::from(Span::styled(
        "MFLIX",
        ratatui::style::Style::default()
            .fg(Theme::BRAND)
            .add_modifier(Modifier::BOLD),
    )))
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Theme::border()),
    );
    frame.render_widget(logo, header_chunks[0]);

    // Search box
    let editing = app.input_mode == InputMode::Editing && app.state == AppState::Search;
    let search_style = if editing {
        Theme::border_focused()
    } else {
        Theme::border()
    };

    let search_text = if editing {
        let query = &app.search.query;
        let cursor = app.search.cursor.min(query.len());
        let (before, after) = query.split_at(cursor);
        format!("⌕ {}│{}", before, after)
    } else if app.search.query.is_empty() {
        "⌕ Type / to search...".to_string()
    } else {
        format!("⌕ {}", app.search.query)
    };

    let search_box = Paragraph::new(search_text)
        .style(if editing {
            Theme::input().fg(Theme::TEXT)
        } else {
            Theme::input()
        })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(search_style)
                .title(Span::styled(" SEARCH ", Theme::title())),
        );
    frame.render_widget(search_box, header_chunks[1]);

    // Bell + account
    let bell = if app.notifications.is_empty() {
        Span::styled("🔔 -", Theme::dimmed())
    } else {
        Span::styled(format!("🔔 {}", app.notifications.len()), Theme::accent())
    };
    let account = match app.session.user() {
        Some(user) => Span::styled(format!(" {} ", user.name), Theme::text()),
        None => Span::styled(" Sign in (u) ", Theme::dimmed()),
    };
    let account_box = Paragraph::new(Line::from(vec![bell, Span::raw(" "), account]))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Theme::border()),
        );
    frame.render_widget(account_box, header_chunks[2]);
}

/// Render the main content area based on current state
fn render_content(frame: &mut Frame, area: Rect, app: &App) {
    match app.state {
        AppState::Home => render_home(frame, area, app),
        AppState::Library => render_library(frame, area, app),
        AppState::Search => render_search_results(frame, area, app),
        AppState::Detail => render_detail(frame, area, app),
        AppState::Player => render_player(frame, area, app),
        AppState::Login | AppState::Register => render_auth_form(frame, area, app),
        AppState::Profile => render_profile(frame, area, app),
        AppState::NotFound => render_not_found(frame, area, app),
    }
}

/// Render home: hero banner for the selected title plus carousel rows
fn render_home(frame: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Theme::border())
        .title(Span::styled(" HOME ", Theme::title()));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if app.home.loading {
        let loading = Paragraph::new("⟳ Loading catalog...")
            .style(Theme::loading())
            .alignment(Alignment::Center);
        frame.render_widget(loading, inner);
        return;
    }

    if app.home.rows.is_empty() {
        let empty = Paragraph::new("Catalog is empty")
            .style(Theme::dimmed())
            .alignment(Alignment::Center);
        frame.render_widget(empty, inner);
        return;
    }

    // Hero banner + one slot per row
    let mut constraints = vec![Constraint::Length(6)];
    constraints.extend(app.home.rows.iter().map(|_| Constraint::Length(3)));
    constraints.push(Constraint::Min(0));
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(inner);

    render_hero(frame, chunks[0], app);
    for (i, row) in app.home.rows.iter().enumerate() {
        render_movie_row(frame, chunks[i + 1], row, i == app.home.active_row);
    }
}

/// Hero banner: the currently selected title, large
fn render_hero(frame: &mut Frame, area: Rect, app: &App) {
    let Some(movie) = app.home.selected_movie() else {
        return;
    };

    let mut overview = movie.overview.clone();
    overview.truncate(200);

    let lines = vec![
        Line::from(Span::styled(
            movie.title.clone(),
            ratatui::style::Style::default()
                .fg(Theme::TEXT)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(vec![
            Span::styled(
                movie.year().map(|y| y.to_string()).unwrap_or_default(),
                Theme::year(),
            ),
            Span::raw("  "),
            Span::styled(
                format!("★ {:.1}", movie.vote_average),
                Theme::rating(movie.vote_average),
            ),
            Span::raw("  "),
            Span::styled(movie.genre_line(), Theme::genre()),
        ]),
        Line::from(Span::styled(overview, Theme::dimmed())),
    ];

    let hero = Paragraph::new(lines).wrap(Wrap { trim: true }).block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Theme::border()),
    );
    frame.render_widget(hero, area);
}

/// One carousel row: heading plus a page of cards with edge arrows
fn render_movie_row(frame: &mut Frame, area: Rect, row: &mflix::ui::browser::MovieRow, active: bool) {
    let heading_style = if active { Theme::accent() } else { Theme::dimmed() };

    let mut spans = vec![Span::styled(
        if row.carousel.show_left_arrow() {
            "◀ "
        } else {
            "  "
        },
        Theme::dimmed(),
    )];

    for idx in row.carousel.visible_range() {
        let Some(movie) = row.movies.get(idx) else {
            continue;
        };
        let selected = active && idx == row.carousel.selected;
        let card_style = if selected {
            Theme::highlighted()
        } else {
            Theme::text()
        };
        spans.push(Span::styled(format!(" {} ", movie.title), card_style));
        spans.push(Span::raw(" "));
    }

    if row.carousel.show_right_arrow() {
        spans.push(Span::styled("▶", Theme::dimmed()));
    }

    let paragraph = Paragraph::new(vec![
        Line::from(Span::styled(format!("{}", row.title), heading_style)),
        Line::from(spans),
    ]);
    frame.render_widget(paragraph, area);
}

/// Render the full catalog list
fn render_library(frame: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Theme::border())
        .title(Span::styled(
            format!(" MOVIES ({}) ", app.library.movies.len()),
            Theme::title(),
        ));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if app.library.loading {
        let loading = Paragraph::new("⟳ Loading...")
            .style(Theme::loading())
            .alignment(Alignment::Center);
        frame.render_widget(loading, inner);
        return;
    }

    let height = inner.height as usize;
    let selected = app.library.list.selected;
    let start = selected.saturating_sub(height / 2);

    let items: Vec<ListItem> = app
        .library
        .movies
        .iter()
        .enumerate()
        .skip(start)
        .take(height)
        .map(|(i, movie)| movie_list_item(movie, i == selected))
        .collect();

    frame.render_widget(List::new(items).style(Theme::text()), inner);
}

/// Shared list entry: marker, title, year, rating
fn movie_list_item(movie: &mflix::models::Movie, selected: bool) -> ListItem<'static> {
    let marker = if selected { "▸ " } else { "  " };
    let year_str = movie.year().map(|y| format!(" ({})", y)).unwrap_or_default();

    let line = Line::from(vec![
        Span::styled(
            marker.to_string(),
            if selected {
                Theme::accent()
            } else {
                Theme::dimmed()
            },
        ),
        Span::styled(
            movie.title.clone(),
            if selected {
                Theme::highlighted()
            } else {
                Theme::text()
            },
        ),
        Span::styled(year_str, Theme::year()),
        Span::raw(" "),
        Span::styled(
            format!("★ {:.1}", movie.vote_average),
            Theme::rating(movie.vote_average),
        ),
    ]);

    ListItem::new(line)
}

/// Render search results and suggestions
fn render_search_results(frame: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Theme::border())
        .title(Span::styled(
            format!(" RESULTS ({}) ", app.search.results.len()),
            Theme::title(),
        ));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if app.search.loading {
        let loading = Paragraph::new("⟳ Searching...")
            .style(Theme::loading())
            .alignment(Alignment::Center);
        frame.render_widget(loading, inner);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(1)])
        .split(inner);

    // Suggestion strip
    if !app.search.suggestions.is_empty() {
        let strip = Paragraph::new(Line::from(vec![
            Span::styled("Suggestions: ", Theme::dimmed()),
            Span::styled(app.search.suggestions.join("  ·  "), Theme::accent()),
        ]));
        frame.render_widget(strip, chunks[0]);
    }

    if app.search.results.is_empty() {
        let empty = Paragraph::new(if app.search.query.chars().count() < 2 {
            "Type at least two characters to search...".to_string()
        } else {
            format!("No results found for \"{}\"", app.search.query)
        })
        .style(Theme::dimmed())
        .alignment(Alignment::Center);
        frame.render_widget(empty, chunks[1]);
        return;
    }

    let items: Vec<ListItem> = app
        .search
        .results
        .iter()
        .enumerate()
        .map(|(i, movie)| movie_list_item(movie, i == app.search.selected))
        .collect();

    frame.render_widget(List::new(items).style(Theme::text()), chunks[1]);
}

/// Render detail view for one movie
fn render_detail(frame: &mut Frame, area: Rect, app: &App) {
    let title = app
        .detail
        .movie
        .as_ref()
        .map(|m| m.title.as_str())
        .unwrap_or("DETAIL");

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Theme::border())
        .title(Span::styled(format!(" {} ", title), Theme::title()));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if app.detail.loading {
        let loading = Paragraph::new("⟳ Loading...")
            .style(Theme::loading())
            .alignment(Alignment::Center);
        frame.render_widget(loading, inner);
        return;
    }

    let Some(movie) = app.detail.movie.as_ref() else {
        return;
    };

    let play_hint = if app.detail.can_resume() {
        format!("Resume from {}", format_secs(app.detail.resume_secs))
    } else {
        "Play from the beginning".to_string()
    };

    let content = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(movie.to_string(), Theme::text())),
        Line::from(Span::styled(movie.genre_line(), Theme::genre())),
        Line::from(""),
        Line::from(Span::styled(movie.overview.clone(), Theme::dimmed())),
        Line::from(""),
        Line::from(vec![
            Span::styled("  ↵  ", Theme::keybind()),
            Span::styled(play_hint, Theme::dimmed()),
        ]),
        Line::from(vec![
            Span::styled(" ESC ", Theme::keybind()),
            Span::styled("Go back", Theme::dimmed()),
        ]),
    ])
    .wrap(Wrap { trim: true });
    frame.render_widget(content, inner);
}

/// Render the player view
fn render_player(frame: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Theme::border_focused())
        .title(Span::styled(" ▶ NOW PLAYING ", Theme::success()));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let Some(player) = app.player.as_ref() else {
        let connecting = Paragraph::new("Connecting...")
            .style(Theme::loading())
            .alignment(Alignment::Center);
        frame.render_widget(connecting, inner);
        return;
    };

    let filled = (player.fraction() * 40.0) as usize;
    let empty = 40 - filled;

    let state_label = if player.playing {
        Span::styled("▶ Playing", Theme::success())
    } else {
        Span::styled("⏸ Paused", Theme::accent())
    };

    let mute_label = if player.muted { "  (muted)" } else { "" };

    let content = vec![
        Line::from(""),
        Line::from(Span::styled(
            player.title.clone(),
            ratatui::style::Style::default()
                .fg(Theme::BRAND)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(state_label),
        Line::from(""),
        Line::from(format!("{}{}", "█".repeat(filled), "░".repeat(empty))),
        Line::from(Span::styled(
            format!(
                "{} / {}",
                format_secs(player.position_secs),
                format_secs(player.duration_secs)
            ),
            Theme::dimmed(),
        )),
        Line::from(""),
        Line::from(Span::styled(
            format!("Volume: {:.0}%{}", player.volume * 100.0, mute_label),
            Theme::text(),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled(" SPACE ", Theme::keybind()),
            Span::styled("Play/Pause  ", Theme::dimmed()),
            Span::styled(" ←→ ", Theme::keybind()),
            Span::styled("Seek  ", Theme::dimmed()),
            Span::styled(" ↑↓ ", Theme::keybind()),
            Span::styled("Volume  ", Theme::dimmed()),
            Span::styled(" x ", Theme::keybind()),
            Span::styled("Mute", Theme::dimmed()),
        ]),
    ];

    let para = Paragraph::new(content).alignment(Alignment::Center);
    frame.render_widget(para, inner);
}

/// Render the login/register form
fn render_auth_form(frame: &mut Frame, area: Rect, app: &App) {
    let (title, footer) = match app.state {
        AppState::Register => (
            " REGISTER ",
            "Enter: create account   Ctrl+L: sign in   ESC: back",
        ),
        _ => (
            " SIGN IN ",
            "Enter: sign in   Ctrl+R: create account   ESC: back",
        ),
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Theme::border_focused())
        .title(Span::styled(title, Theme::title()));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let Some(form) = app.auth_form.as_ref() else {
        return;
    };

    let mut lines = vec![Line::from("")];
    for (i, field) in form.fields.iter().enumerate() {
        let focused = i == form.focus;
        let marker = if focused { "▸ " } else { "  " };
        lines.push(Line::from(vec![
            Span::styled(
                marker,
                if focused {
                    Theme::accent()
                } else {
                    Theme::dimmed()
                },
            ),
            Span::styled(format!("{:>8}: ", field.label), Theme::dimmed()),
            Span::styled(
                format!("{}{}", field.display_value(), if focused { "│" } else { "" }),
                Theme::text(),
            ),
        ]));
    }

    lines.push(Line::from(""));
    if form.submitting {
        lines.push(Line::from(Span::styled("⟳ Submitting...", Theme::loading())));
    } else if let Some(ref error) = form.error {
        lines.push(Line::from(Span::styled(error.clone(), Theme::error())));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(footer, Theme::dimmed())));

    let para = Paragraph::new(lines).alignment(Alignment::Center);
    frame.render_widget(para, inner);
}

/// Render the profile screen
fn render_profile(frame: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Theme::border())
        .title(Span::styled(" PROFILE ", Theme::title()));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let lines = match app.session.user() {
        Some(user) => vec![
            Line::from(""),
            Line::from(Span::styled(user.name.clone(), Theme::text())),
            Line::from(Span::styled(user.email.clone(), Theme::dimmed())),
            Line::from(""),
            Line::from(vec![
                Span::styled("  ↵  ", Theme::keybind()),
                Span::styled("Sign out", Theme::dimmed()),
            ]),
        ],
        None => vec![
            Line::from(""),
            Line::from(Span::styled("Not signed in", Theme::dimmed())),
        ],
    };

    let para = Paragraph::new(lines).alignment(Alignment::Center);
    frame.render_widget(para, inner);
}

/// Render the missing-entity screen
fn render_not_found(frame: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Theme::border())
        .title(Span::styled(" NOT FOUND ", Theme::title()));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let para = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(app.not_found.clone(), Theme::text())),
        Line::from(""),
        Line::from(Span::styled("ESC to go back", Theme::dimmed())),
    ])
    .alignment(Alignment::Center);
    frame.render_widget(para, inner);
}

/// Render status bar at bottom
fn render_status_bar(frame: &mut Frame, area: Rect, app: &App) {
    let mode_indicator = match app.input_mode {
        InputMode::Normal => Span::styled(
            " NORMAL ",
            ratatui::style::Style::default()
                .fg(Theme::BACKGROUND)
                .bg(Theme::BRAND),
        ),
        InputMode::Editing => Span::styled(
            " INSERT ",
            ratatui::style::Style::default()
                .fg(Theme::BACKGROUND)
                .bg(Theme::ACCENT),
        ),
    };

    let state_indicator = Span::styled(
        format!(" {} ", format!("{:?}", app.state).to_uppercase()),
        ratatui::style::Style::default().fg(Theme::DIM),
    );

    let account = match app.session.user() {
        Some(user) => Span::styled(format!(" {} ", user.name), Theme::success()),
        None => Span::styled(" anonymous ", Theme::dimmed()),
    };

    let help = Span::styled(" q:quit  /:search  m:movies  u:account  ESC:back ", Theme::dimmed());

    let status_line = Line::from(vec![
        mode_indicator,
        state_indicator,
        Span::raw(" "),
        account,
        Span::raw(" │ "),
        help,
    ]);

    let status = Paragraph::new(status_line).style(Theme::status_bar());
    frame.render_widget(status, area);
}

/// Render the notification toast overlay (top right)
fn render_toast(frame: &mut Frame, area: Rect, app: &App) {
    // Show up to the three most recent notifications
    let recent: Vec<&mflix::models::Notification> =
        app.notifications.iter().rev().take(3).collect();
    if recent.is_empty() {
        return;
    }

    let width = recent
        .iter()
        .map(|n| n.to_string().len() as u16 + 4)
        .max()
        .unwrap_or(20)
        .min(area.width.saturating_sub(4));
    let height = recent.len() as u16 + 2;

    let toast_area = Rect {
        x: area.x + area.width.saturating_sub(width + 2),
        y: area.y + 3,
        width,
        height,
    };

    frame.render_widget(Clear, toast_area);

    let lines: Vec<Line> = recent
        .iter()
        .map(|n| Line::from(Span::styled(n.to_string(), Theme::text())))
        .collect();

    let toast = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Theme::accent())
            .title(Span::styled(" 🔔 NEW ", Theme::notification()))
            .style(ratatui::style::Style::default().bg(Theme::BACKGROUND)),
    );
    frame.render_widget(toast, toast_area);
}

/// Render error popup overlay
fn render_error_popup(frame: &mut Frame, area: Rect, error: &str) {
    let popup_width = 60.min(area.width.saturating_sub(4));
    let popup_height = 5;

    let popup_area = Rect {
        x: area.x + (area.width.saturating_sub(popup_width)) / 2,
        y: area.y + (area.height.saturating_sub(popup_height)) / 2,
        width: popup_width,
        height: popup_height,
    };

    frame.render_widget(Clear, popup_area);

    let error_block = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(error.to_string(), Theme::error())),
    ])
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Double)
            .border_style(Theme::error())
            .title(Span::styled(" ✗ ERROR ", Theme::error()))
            .style(ratatui::style::Style::default().bg(Theme::BACKGROUND)),
    );

    frame.render_widget(error_block, popup_area);
}
