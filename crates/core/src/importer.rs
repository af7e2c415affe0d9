//! Existence-check-then-insert import of library documents.
//!
//! Each record is checked against the `games` table by its `(title, runner)`
//! pair and inserted only when no such row exists. There is no transaction
//! around a file: rows inserted before a failure stay committed. The check
//! and the insert are separate round trips, so two concurrent importers can
//! both insert the same key unless the table carries a unique constraint.

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::{
    error::ImportError,
    library::extract_records,
    models::GameRecord,
    provider::{Connection, ConnectionDescriptor},
};

const EXISTS_SQL: &str = "SELECT COUNT(*) FROM games WHERE title = :title AND runner = :runner";

const INSERT_SQL: &str = "INSERT INTO games \
    (title, runner, can_run_offline, is_linux_native, install_size, \
     description, short_description, store_url, genres, release_date, date_added) \
    VALUES \
    (:title, :runner, :canRunOffline, :isLinuxNative, :installSize, \
     :description, :shortDescription, :storeUrl, :genres, :releaseDate, :dateAdded)";

/// Source of the `date_added` timestamp.
pub trait Clock: Send + Sync {
    /// Current instant in UTC.
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Outcome of importing one document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    /// Records extracted from the document.
    pub total: usize,
    /// Records written as new rows.
    pub inserted: usize,
    /// Records skipped because their natural key already existed.
    pub skipped: usize,
}

/// Loads library documents into the `games` table.
#[derive(Debug, Clone, Default)]
pub struct Importer<C = SystemClock> {
    clock: C,
}

impl Importer<SystemClock> {
    /// Importer stamping rows with wall-clock time.
    pub fn new() -> Self {
        Self::default()
    }
}

impl<C: Clock> Importer<C> {
    /// Importer stamping rows with `clock`.
    pub fn with_clock(clock: C) -> Self {
        Self { clock }
    }

    /// Import `json` over an already open connection.
    ///
    /// Records are processed one at a time in extraction order. The first
    /// database error aborts the remaining records.
    pub async fn import_games(
        &self,
        json: &str,
        connection: &mut Connection,
    ) -> Result<ImportSummary, ImportError> {
        let records = extract_records(json)?;
        self.import_records(&records, connection).await
    }

    /// Import `json` into the database described by `descriptor`.
    ///
    /// The provider is resolved and the document parsed before connecting, so
    /// neither an unknown provider nor malformed JSON touches the database.
    /// The connection is closed whether or not the import succeeds.
    pub async fn import_with(
        &self,
        json: &str,
        descriptor: &ConnectionDescriptor,
    ) -> Result<ImportSummary, ImportError> {
        let kind = descriptor.kind()?;
        let records = extract_records(json)?;

        let mut connection = Connection::open(kind, &descriptor.connection_string).await?;
        let result = self.import_records(&records, &mut connection).await;

        match (result, connection.close().await) {
            (Ok(summary), Ok(())) => Ok(summary),
            (Ok(_), Err(err)) => Err(err),
            (Err(err), Ok(())) => Err(err),
            (Err(err), Err(close_err)) => {
                warn!("failed to close {kind} connection after error: {close_err}");
                Err(err)
            }
        }
    }

    async fn import_records(
        &self,
        records: &[GameRecord],
        connection: &mut Connection,
    ) -> Result<ImportSummary, ImportError> {
        let mut summary = ImportSummary {
            total: records.len(),
            ..ImportSummary::default()
        };

        for record in records {
            if record_exists(connection, record).await? {
                debug!("skipping existing game {:?} ({})", record.title, record.runner);
                summary.skipped += 1;
                continue;
            }

            insert_record(connection, record, self.clock.now()).await?;
            summary.inserted += 1;
        }

        info!(
            "imported {} games ({} new, {} already present)",
            summary.total, summary.inserted, summary.skipped
        );
        Ok(summary)
    }
}

async fn record_exists(
    connection: &mut Connection,
    record: &GameRecord,
) -> Result<bool, ImportError> {
    let mut command = connection.prepare(EXISTS_SQL);
    command
        .bind("title", record.title.as_str())
        .bind("runner", record.runner.as_str());
    Ok(connection.fetch_count(&command).await? > 0)
}

async fn insert_record(
    connection: &mut Connection,
    record: &GameRecord,
    date_added: DateTime<Utc>,
) -> Result<(), ImportError> {
    let mut command = connection.prepare(INSERT_SQL);
    command
        .bind("title", record.title.as_str())
        .bind("runner", record.runner.as_str())
        .bind("canRunOffline", record.can_run_offline)
        .bind("isLinuxNative", record.is_linux_native)
        .bind("installSize", record.install_size)
        .bind("description", record.description.clone())
        .bind("shortDescription", record.short_description.clone())
        .bind("storeUrl", record.store_url.clone())
        .bind("genres", record.genres_joined())
        .bind("releaseDate", record.release_date)
        .bind("dateAdded", date_added);
    connection.execute(&command).await?;
    Ok(())
}
