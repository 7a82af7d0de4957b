//! Movie detail view state

use crate::models::Movie;

/// Detail view: one fetched movie plus its saved resume position
#[derive(Debug, Clone, Default)]
pub struct DetailView {
    pub movie: Option<Movie>,
    /// Saved resume position in seconds (0 ⇒ start from the beginning)
    pub resume_secs: f64,
    pub loading: bool,
}

impl DetailView {
    /// Start loading a fresh detail fetch
    pub fn loading() -> Self {
        Self {
            movie: None,
            resume_secs: 0.0,
            loading: true,
        }
    }

    pub fn set_movie(&mut self, movie: Movie, resume_secs: f64) {
        self.movie = Some(movie);
        self.resume_secs = resume_secs;
        self.loading = false;
    }

    /// Whether the play action should offer "Resume" instead of "Play"
    pub fn can_resume(&self) -> bool {
        self.resume_secs > 0.0
    }
}
