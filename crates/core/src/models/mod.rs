//! Shared domain models.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One game entry normalised from any store's library export.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GameRecord {
    /// Game title as reported by the store.
    pub title: String,
    /// Store/launcher backend (e.g. `gog`, `legendary`, `nile`).
    pub runner: String,
    /// Whether the game can be started without a network connection.
    pub can_run_offline: bool,
    /// Whether the store ships a native Linux build.
    pub is_linux_native: bool,
    /// Install size in gibibytes, `0.0` when unknown.
    pub install_size: f64,
    /// Long-form store description.
    pub description: Option<String>,
    /// Short store blurb.
    pub short_description: Option<String>,
    /// Link to the store page.
    pub store_url: Option<String>,
    /// Genre labels in store order.
    pub genres: Vec<String>,
    /// Release date, when the store reports one we can read.
    pub release_date: Option<NaiveDate>,
}

impl GameRecord {
    /// The `(title, runner)` pair identifying a row in the `games` table.
    pub fn natural_key(&self) -> (&str, &str) {
        (&self.title, &self.runner)
    }

    /// Genres in their persisted form: comma separated, empty when none.
    pub fn genres_joined(&self) -> String {
        self.genres.join(",")
    }
}
