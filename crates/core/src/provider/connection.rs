use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{
    query::Query, Connection as SqlxConnection, Database, Encode, MySql, MySqlConnection, Row,
    Sqlite, SqliteConnection, Type,
};
use tracing::debug;

use crate::error::ImportError;

use super::{Command, ProviderKind, SqlValue};

/// Connection string plus the provider selector it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionDescriptor {
    /// Backend-specific connection URL (`mysql://…`, `sqlite://…`).
    pub connection_string: String,
    /// Provider selector, e.g. `mysql` or `sqlite`.
    pub provider: String,
}

impl ConnectionDescriptor {
    /// Build a descriptor from its parts.
    pub fn new(connection_string: impl Into<String>, provider: impl Into<String>) -> Self {
        Self {
            connection_string: connection_string.into(),
            provider: provider.into(),
        }
    }

    /// Resolve the provider selector without connecting.
    pub fn kind(&self) -> Result<ProviderKind, ImportError> {
        self.provider.parse()
    }

    /// Open a connection to the described database.
    pub async fn open(&self) -> Result<Connection, ImportError> {
        open_connection(&self.connection_string, &self.provider).await
    }
}

/// Open a connection for the provider named by `provider`.
pub async fn open_connection(
    connection_string: &str,
    provider: &str,
) -> Result<Connection, ImportError> {
    let kind: ProviderKind = provider.parse()?;
    Connection::open(kind, connection_string).await
}

/// A live connection to one of the supported backends.
pub enum Connection {
    /// MySQL/MariaDB server connection.
    MySql(MySqlConnection),
    /// SQLite file connection.
    Sqlite(SqliteConnection),
}

impl Connection {
    /// Connect to `connection_string` using the backend for `kind`.
    pub async fn open(kind: ProviderKind, connection_string: &str) -> Result<Self, ImportError> {
        debug!("opening {kind} connection");
        let connection = match kind {
            ProviderKind::MySql => {
                Connection::MySql(MySqlConnection::connect(connection_string).await?)
            }
            ProviderKind::Sqlite => {
                Connection::Sqlite(SqliteConnection::connect(connection_string).await?)
            }
        };
        Ok(connection)
    }

    /// Provider backing this connection.
    pub fn kind(&self) -> ProviderKind {
        match self {
            Connection::MySql(_) => ProviderKind::MySql,
            Connection::Sqlite(_) => ProviderKind::Sqlite,
        }
    }

    /// Render a `:name` template with this connection's placeholder syntax.
    pub fn prepare(&self, template: &str) -> Command {
        Command::prepare(self.kind(), template)
    }

    /// Run a statement whose first column is a count, returning it.
    pub async fn fetch_count(&mut self, command: &Command) -> Result<i64, ImportError> {
        let arguments = command.arguments()?;
        let count = match self {
            Connection::MySql(conn) => {
                let row = bind_arguments(sqlx::query::<MySql>(command.sql()), &arguments)
                    .fetch_one(&mut *conn)
                    .await?;
                row.try_get::<i64, _>(0)?
            }
            Connection::Sqlite(conn) => {
                let row = bind_arguments(sqlx::query::<Sqlite>(command.sql()), &arguments)
                    .fetch_one(&mut *conn)
                    .await?;
                row.try_get::<i64, _>(0)?
            }
        };
        Ok(count)
    }

    /// Run a statement, returning the number of affected rows.
    pub async fn execute(&mut self, command: &Command) -> Result<u64, ImportError> {
        let arguments = command.arguments()?;
        let affected = match self {
            Connection::MySql(conn) => {
                bind_arguments(sqlx::query::<MySql>(command.sql()), &arguments)
                    .execute(&mut *conn)
                    .await?
                    .rows_affected()
            }
            Connection::Sqlite(conn) => {
                bind_arguments(sqlx::query::<Sqlite>(command.sql()), &arguments)
                    .execute(&mut *conn)
                    .await?
                    .rows_affected()
            }
        };
        Ok(affected)
    }

    /// Close the connection, flushing any pending shutdown with the server.
    pub async fn close(self) -> Result<(), ImportError> {
        match self {
            Connection::MySql(conn) => conn.close().await?,
            Connection::Sqlite(conn) => conn.close().await?,
        }
        Ok(())
    }
}

impl fmt::Debug for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Connection").field(&self.kind()).finish()
    }
}

fn bind_arguments<'q, DB>(
    mut query: Query<'q, DB, <DB as Database>::Arguments<'q>>,
    arguments: &[&SqlValue],
) -> Query<'q, DB, <DB as Database>::Arguments<'q>>
where
    DB: Database,
    Option<String>: Encode<'q, DB> + Type<DB>,
    bool: Encode<'q, DB> + Type<DB>,
    f64: Encode<'q, DB> + Type<DB>,
    Option<NaiveDate>: Encode<'q, DB> + Type<DB>,
    DateTime<Utc>: Encode<'q, DB> + Type<DB>,
{
    for value in arguments {
        query = match value {
            SqlValue::Text(text) => query.bind(text.clone()),
            SqlValue::Bool(flag) => query.bind(*flag),
            SqlValue::Double(number) => query.bind(*number),
            SqlValue::Date(date) => query.bind(*date),
            SqlValue::Timestamp(timestamp) => query.bind(*timestamp),
        };
    }
    query
}
