//! Importer configuration.
//!
//! Settings come from a `heroic-import.{json,toml,yaml}` file found by
//! walking up from the working directory (or next to the executable), with
//! `HEROIC_IMPORT_*` environment variables layered on top.

use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

use anyhow::{anyhow, Context, Result};
use ::config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::provider::{ConnectionDescriptor, ProviderKind};

/// File stem searched for when no explicit path is given.
pub const CONFIG_FILE_STEM: &str = "heroic-import";
/// Extensions tried for each candidate directory, in order.
pub const CONFIG_EXTENSIONS: &[&str] = &["json", "toml", "yaml", "yml"];
/// Prefix for environment overrides, e.g. `HEROIC_IMPORT_CONNECTION_STRING`.
pub const ENV_PREFIX: &str = "HEROIC_IMPORT";
/// Replaces the database file of a SQLite connection string when set.
pub const SQLITE_PATH_ENV: &str = "SQLITE_DB_PATH";

const SQLITE_SCHEMES: &[&str] = &["sqlite://", "sqlite:"];

/// Runtime configuration for the importer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Directory holding `*_library.json` files, relative to the user's
    /// config directory unless absolute.
    pub library_path: PathBuf,
    /// Provider selector, `mysql` or `sqlite`.
    #[serde(default = "default_provider")]
    pub database_provider: String,
    /// Connection URL for the selected provider.
    pub connection_string: String,
}

fn default_provider() -> String {
    ProviderKind::MySql.as_str().to_string()
}

impl AppConfig {
    /// Load configuration from `explicit`, or from the first config file found
    /// by [`locate_config`], applying overrides from the process environment.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => locate_config()?.ok_or_else(|| {
                anyhow!(
                    "could not find {CONFIG_FILE_STEM}.{{{}}} in parent directories or executable directory",
                    CONFIG_EXTENSIONS.join(",")
                )
            })?,
        };

        let env: HashMap<String, String> = std::env::vars().collect();
        Self::load_from(&path, &env)
    }

    /// Load configuration from `path` with overrides taken from `env`.
    pub fn load_from(path: &Path, env: &HashMap<String, String>) -> Result<Self> {
        if !path.is_file() {
            anyhow::bail!("config file {} does not exist", path.display());
        }

        let settings = Config::builder()
            .add_source(File::from(path.to_path_buf()))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .source(Some(env.iter().map(|(k, v)| (k.clone(), v.clone())).collect())),
            )
            .build()
            .with_context(|| format!("failed to read config {}", path.display()))?;

        let mut config: AppConfig = settings
            .try_deserialize()
            .with_context(|| format!("failed to parse config {}", path.display()))?;

        if let Some(db_path) = env.get(SQLITE_PATH_ENV) {
            if config.apply_sqlite_path(db_path) {
                info!("Using SQLite DB file at: {}", db_path.trim());
            }
        }

        Ok(config)
    }

    /// Absolute directory holding the library exports.
    pub fn library_dir(&self) -> Result<PathBuf> {
        if self.library_path.is_absolute() {
            return Ok(self.library_path.clone());
        }
        let base = dirs::config_dir().context("unable to determine user config directory")?;
        Ok(base.join(&self.library_path))
    }

    /// Connection descriptor for the configured database.
    pub fn connection(&self) -> ConnectionDescriptor {
        ConnectionDescriptor::new(&self.connection_string, &self.database_provider)
    }

    /// Point a SQLite connection string at `db_path`, keeping its query options.
    ///
    /// Returns `false` and leaves the config untouched for other providers or
    /// a blank path.
    pub fn apply_sqlite_path(&mut self, db_path: &str) -> bool {
        let db_path = db_path.trim();
        let is_sqlite = matches!(
            self.database_provider.parse::<ProviderKind>(),
            Ok(ProviderKind::Sqlite)
        );
        if !is_sqlite || db_path.is_empty() {
            return false;
        }

        let current = SQLITE_SCHEMES
            .iter()
            .find_map(|scheme| self.connection_string.strip_prefix(scheme))
            .unwrap_or(self.connection_string.as_str());
        let options = current.find('?').map(|index| &current[index..]).unwrap_or("");

        self.connection_string = format!("sqlite://{db_path}{options}");
        true
    }
}

/// Find the config file in the working directory, its parents, or next to
/// the executable.
pub fn locate_config() -> Result<Option<PathBuf>> {
    let cwd = std::env::current_dir().context("failed to determine working directory")?;
    if let Some(found) = find_in_ancestors(&cwd) {
        return Ok(Some(found));
    }

    let exe_dir = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf));
    Ok(exe_dir.and_then(|dir| find_in_dir(&dir)))
}

/// Search `start` and each of its ancestors for a config file.
pub fn find_in_ancestors(start: &Path) -> Option<PathBuf> {
    start.ancestors().find_map(find_in_dir)
}

fn find_in_dir(dir: &Path) -> Option<PathBuf> {
    CONFIG_EXTENSIONS
        .iter()
        .map(|ext| dir.join(format!("{CONFIG_FILE_STEM}.{ext}")))
        .find(|candidate| candidate.is_file())
}
