use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::ImportError;

/// Relational backends the importer can write to.
///
/// The set is closed: supporting another backend means adding a variant
/// here and a matching arm in [`super::Connection`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Networked MySQL/MariaDB server.
    MySql,
    /// Local SQLite database file.
    Sqlite,
}

impl ProviderKind {
    /// Selector string used in configuration.
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::MySql => "mysql",
            ProviderKind::Sqlite => "sqlite",
        }
    }

    /// Placeholder text for the parameter with the given 1-based ordinal.
    ///
    /// MySQL only understands anonymous `?` markers bound in order of
    /// appearance. SQLite gets numbered `$N` markers so a parameter used
    /// twice is bound once.
    pub fn placeholder(&self, ordinal: usize) -> String {
        match self {
            ProviderKind::MySql => "?".to_string(),
            ProviderKind::Sqlite => format!("${ordinal}"),
        }
    }

    /// Whether a repeated parameter name reuses its placeholder.
    pub(crate) fn numbered_placeholders(&self) -> bool {
        matches!(self, ProviderKind::Sqlite)
    }
}

impl FromStr for ProviderKind {
    type Err = ImportError;

    fn from_str(selector: &str) -> Result<Self, Self::Err> {
        match selector.trim().to_ascii_lowercase().as_str() {
            "mysql" => Ok(ProviderKind::MySql),
            "sqlite" => Ok(ProviderKind::Sqlite),
            _ => Err(ImportError::UnsupportedProvider(selector.to_string())),
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
