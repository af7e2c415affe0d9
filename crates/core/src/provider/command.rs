use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Utc};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::error::ImportError;

use super::ProviderKind;

// Quoted literals and identifiers match first so colons inside them stay put.
static PARAMETER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"'(?:[^']|'')*'|"(?:[^"]|"")*"|:([A-Za-z_][A-Za-z0-9_]*)"#)
        .expect("failed to compile parameter regex")
});

/// A value bound to a command parameter. `None` payloads bind as SQL NULL.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    /// Nullable text.
    Text(Option<String>),
    /// Boolean flag.
    Bool(bool),
    /// Double precision number.
    Double(f64),
    /// Nullable calendar date.
    Date(Option<NaiveDate>),
    /// UTC timestamp.
    Timestamp(DateTime<Utc>),
}

impl From<String> for SqlValue {
    fn from(value: String) -> Self {
        SqlValue::Text(Some(value))
    }
}

impl From<&str> for SqlValue {
    fn from(value: &str) -> Self {
        SqlValue::Text(Some(value.to_string()))
    }
}

impl From<Option<String>> for SqlValue {
    fn from(value: Option<String>) -> Self {
        SqlValue::Text(value)
    }
}

impl From<bool> for SqlValue {
    fn from(value: bool) -> Self {
        SqlValue::Bool(value)
    }
}

impl From<f64> for SqlValue {
    fn from(value: f64) -> Self {
        SqlValue::Double(value)
    }
}

impl From<Option<NaiveDate>> for SqlValue {
    fn from(value: Option<NaiveDate>) -> Self {
        SqlValue::Date(value)
    }
}

impl From<DateTime<Utc>> for SqlValue {
    fn from(value: DateTime<Utc>) -> Self {
        SqlValue::Timestamp(value)
    }
}

/// SQL text rendered for one provider plus its named parameter values.
///
/// Templates use `:name` tokens. Preparing rewrites them into the provider's
/// placeholder syntax and remembers which name feeds each bind slot. Text
/// inside single-quoted literals or double-quoted identifiers is copied
/// unchanged.
#[derive(Debug, Clone)]
pub struct Command {
    kind: ProviderKind,
    sql: String,
    slots: Vec<String>,
    values: HashMap<String, SqlValue>,
}

impl Command {
    /// Render `template` for `kind`.
    pub fn prepare(kind: ProviderKind, template: &str) -> Self {
        let mut names: Vec<String> = Vec::new();
        let mut occurrences: Vec<String> = Vec::new();

        let sql = PARAMETER_RE
            .replace_all(template, |caps: &Captures<'_>| {
                let Some(token) = caps.get(1) else {
                    return caps[0].to_string();
                };
                let name = token.as_str().to_string();
                let ordinal = match names.iter().position(|known| known == &name) {
                    Some(index) => index + 1,
                    None => {
                        names.push(name.clone());
                        names.len()
                    }
                };
                occurrences.push(name);
                kind.placeholder(ordinal)
            })
            .into_owned();

        let slots = if kind.numbered_placeholders() {
            names
        } else {
            occurrences
        };

        Self {
            kind,
            sql,
            slots,
            values: HashMap::new(),
        }
    }

    /// Attach a value to the parameter called `name`, replacing any earlier one.
    pub fn bind(&mut self, name: &str, value: impl Into<SqlValue>) -> &mut Self {
        self.values.insert(name.to_string(), value.into());
        self
    }

    /// Provider the SQL text was rendered for.
    pub fn kind(&self) -> ProviderKind {
        self.kind
    }

    /// Provider-specific SQL text.
    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// Values in bind order, failing on the first slot nobody bound.
    pub fn arguments(&self) -> Result<Vec<&SqlValue>, ImportError> {
        self.slots
            .iter()
            .map(|name| {
                self.values
                    .get(name)
                    .ok_or_else(|| ImportError::UnboundParameter(name.clone()))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEMPLATE: &str = "SELECT COUNT(*) FROM games WHERE title = :title AND runner = :runner";

    #[test]
    fn renders_mysql_markers() {
        let command = Command::prepare(ProviderKind::MySql, TEMPLATE);
        assert_eq!(
            command.sql(),
            "SELECT COUNT(*) FROM games WHERE title = ? AND runner = ?"
        );
    }

    #[test]
    fn renders_sqlite_markers() {
        let command = Command::prepare(ProviderKind::Sqlite, TEMPLATE);
        assert_eq!(
            command.sql(),
            "SELECT COUNT(*) FROM games WHERE title = $1 AND runner = $2"
        );
    }

    #[test]
    fn repeated_names_follow_provider_rules() -> anyhow::Result<()> {
        let template = "SELECT :a, :b, :a";

        let mut mysql = Command::prepare(ProviderKind::MySql, template);
        mysql.bind("a", "x").bind("b", true);
        assert_eq!(mysql.sql(), "SELECT ?, ?, ?");
        assert_eq!(
            mysql.arguments()?,
            vec![&SqlValue::from("x"), &SqlValue::Bool(true), &SqlValue::from("x")]
        );

        let mut sqlite = Command::prepare(ProviderKind::Sqlite, template);
        sqlite.bind("a", "x").bind("b", true);
        assert_eq!(sqlite.sql(), "SELECT $1, $2, $1");
        assert_eq!(
            sqlite.arguments()?,
            vec![&SqlValue::from("x"), &SqlValue::Bool(true)]
        );
        Ok(())
    }

    #[test]
    fn missing_values_are_reported() {
        let mut command = Command::prepare(ProviderKind::MySql, TEMPLATE);
        command.bind("title", "Foo");
        let err = command.arguments().unwrap_err();
        assert!(matches!(err, ImportError::UnboundParameter(ref name) if name == "runner"));
    }

    #[test]
    fn absent_values_bind_as_null() -> anyhow::Result<()> {
        let mut command = Command::prepare(ProviderKind::Sqlite, "VALUES (:description, :released)");
        command
            .bind("description", None::<String>)
            .bind("released", None::<NaiveDate>);
        assert_eq!(
            command.arguments()?,
            vec![&SqlValue::Text(None), &SqlValue::Date(None)]
        );
        Ok(())
    }

    #[test]
    fn quoted_literals_are_left_alone() -> anyhow::Result<()> {
        let template = r#"SELECT 'a:b', 'it''s :x', "col:y", :real"#;

        let mut mysql = Command::prepare(ProviderKind::MySql, template);
        mysql.bind("real", "z");
        assert_eq!(mysql.sql(), r#"SELECT 'a:b', 'it''s :x', "col:y", ?"#);
        assert_eq!(mysql.arguments()?, vec![&SqlValue::from("z")]);

        let sqlite = Command::prepare(ProviderKind::Sqlite, template);
        assert_eq!(sqlite.sql(), r#"SELECT 'a:b', 'it''s :x', "col:y", $1"#);
        Ok(())
    }
}
