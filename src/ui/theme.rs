//! Dark streaming-service theme for mflix
//!
//! Color palette and style helpers for the TUI: near-black background,
//! signature red brand color, soft white text.

use ratatui::style::{Color, Modifier, Style};

/// mflix color palette
pub struct Theme;

impl Theme {
    // ═══════════════════════════════════════════════════════════════════════
    // CORE PALETTE
    // ═══════════════════════════════════════════════════════════════════════

    /// Background: #141414 (near black)
    pub const BACKGROUND: Color = Color::Rgb(0x14, 0x14, 0x14);

    /// Brand: #e50914 (signature red)
    pub const BRAND: Color = Color::Rgb(0xe5, 0x09, 0x14);

    /// Text: #e5e5e5 (soft white)
    pub const TEXT: Color = Color::Rgb(0xe5, 0xe5, 0xe5);

    /// Dim: #6d6d6d (muted gray)
    pub const DIM: Color = Color::Rgb(0x6d, 0x6d, 0x6d);

    /// Accent: #ffd700 (gold, ratings)
    pub const ACCENT: Color = Color::Rgb(0xff, 0xd7, 0x00);

    /// Success: #46d369 (green)
    pub const SUCCESS: Color = Color::Rgb(0x46, 0xd3, 0x69);

    /// Error: #ff4d4d (light red, distinct from brand)
    pub const ERROR: Color = Color::Rgb(0xff, 0x4d, 0x4d);

    // ═══════════════════════════════════════════════════════════════════════
    // DERIVED COLORS
    // ═══════════════════════════════════════════════════════════════════════

    /// Slightly lighter background for panels/cards
    pub const BACKGROUND_LIGHT: Color = Color::Rgb(0x1f, 0x1f, 0x1f);

    /// Border color (dark gray)
    pub const BORDER: Color = Color::Rgb(0x40, 0x40, 0x40);

    /// Border color when focused (brand red)
    pub const BORDER_FOCUSED: Color = Self::BRAND;

    // ═══════════════════════════════════════════════════════════════════════
    // STYLE HELPERS
    // ═══════════════════════════════════════════════════════════════════════

    /// Default text style
    pub fn text() -> Style {
        Style::default().fg(Self::TEXT).bg(Self::BACKGROUND)
    }

    /// Selected item (inverted on brand red)
    pub fn highlighted() -> Style {
        Style::default()
            .fg(Self::TEXT)
            .bg(Self::BRAND)
            .add_modifier(Modifier::BOLD)
    }

    /// Dimmed/muted text
    pub fn dimmed() -> Style {
        Style::default().fg(Self::DIM)
    }

    /// Error style
    pub fn error() -> Style {
        Style::default()
            .fg(Self::ERROR)
            .add_modifier(Modifier::BOLD)
    }

    /// Success style
    pub fn success() -> Style {
        Style::default()
            .fg(Self::SUCCESS)
            .add_modifier(Modifier::BOLD)
    }

    /// Title/header style
    pub fn title() -> Style {
        Style::default()
            .fg(Self::BRAND)
            .add_modifier(Modifier::BOLD)
    }

    /// Accent text style (gold)
    pub fn accent() -> Style {
        Style::default()
            .fg(Self::ACCENT)
            .add_modifier(Modifier::BOLD)
    }

    /// Normal/unfocused border
    pub fn border() -> Style {
        Style::default().fg(Self::BORDER)
    }

    /// Focused border
    pub fn border_focused() -> Style {
        Style::default()
            .fg(Self::BORDER_FOCUSED)
            .add_modifier(Modifier::BOLD)
    }

    /// Progress bar filled portion
    pub fn progress_bar() -> Style {
        Style::default().fg(Self::BRAND).bg(Self::BACKGROUND_LIGHT)
    }

    /// Progress bar unfilled portion
    pub fn progress_bar_empty() -> Style {
        Style::default().fg(Self::DIM).bg(Self::BACKGROUND_LIGHT)
    }

    /// Style for input fields
    pub fn input() -> Style {
        Style::default().fg(Self::TEXT).bg(Self::BACKGROUND_LIGHT)
    }

    /// Keybinding hint style
    pub fn keybind() -> Style {
        Style::default().fg(Self::ACCENT)
    }

    /// Status bar style
    pub fn status_bar() -> Style {
        Style::default().fg(Self::TEXT).bg(Self::BACKGROUND_LIGHT)
    }

    /// Loading/spinner indicator
    pub fn loading() -> Style {
        Style::default()
            .fg(Self::BRAND)
            .add_modifier(Modifier::BOLD)
    }

    /// Rating style by score (high = green, mid = gold, low = gray)
    pub fn rating(vote_average: f32) -> Style {
        if vote_average >= 7.0 {
            Style::default().fg(Self::SUCCESS)
        } else if vote_average >= 5.0 {
            Style::default().fg(Self::ACCENT)
        } else {
            Style::default().fg(Self::DIM)
        }
    }

    /// Notification toast style
    pub fn notification() -> Style {
        Style::default()
            .fg(Self::BACKGROUND)
            .bg(Self::ACCENT)
            .add_modifier(Modifier::BOLD)
    }

    /// Year/date metadata
    pub fn year() -> Style {
        Style::default().fg(Self::DIM)
    }

    /// Genre tags
    pub fn genre() -> Style {
        Style::default().fg(Self::DIM)
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// COLOR UTILITIES
// ═══════════════════════════════════════════════════════════════════════════

/// Calculate relative luminance for a color (used in contrast ratio)
/// Formula: https://www.w3.org/TR/WCAG20/#relativeluminancedef
pub fn relative_luminance(r: u8, g: u8, b: u8) -> f64 {
    fn channel_luminance(c: u8) -> f64 {
        let c = c as f64 / 255.0;
        if c <= 0.03928 {
            c / 12.92
        } else {
            ((c + 0.055) / 1.055).powf(2.4)
        }
    }

    0.2126 * channel_luminance(r) + 0.7152 * channel_luminance(g) + 0.0722 * channel_luminance(b)
}

/// Calculate contrast ratio between two colors
/// Returns a value between 1 (same color) and 21 (black/white)
pub fn contrast_ratio(fg: (u8, u8, u8), bg: (u8, u8, u8)) -> f64 {
    let l1 = relative_luminance(fg.0, fg.1, fg.2);
    let l2 = relative_luminance(bg.0, bg.1, bg.2);

    let (lighter, darker) = if l1 > l2 { (l1, l2) } else { (l2, l1) };

    (lighter + 0.05) / (darker + 0.05)
}

/// Check if a foreground/background pair meets WCAG AA for normal text
pub fn meets_wcag_aa(fg: (u8, u8, u8), bg: (u8, u8, u8)) -> bool {
    contrast_ratio(fg, bg) >= 4.5
}

/// Check if a foreground/background pair meets WCAG AA for large text
pub fn meets_wcag_aa_large(fg: (u8, u8, u8), bg: (u8, u8, u8)) -> bool {
    contrast_ratio(fg, bg) >= 3.0
}

/// Extract RGB tuple from ratatui Color (only works for Rgb variant)
pub fn color_to_rgb(color: Color) -> Option<(u8, u8, u8)> {
    match color {
        Color::Rgb(r, g, b) => Some((r, g, b)),
        _ => None,
    }
}
