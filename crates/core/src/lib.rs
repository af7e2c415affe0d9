#![warn(clippy::all, missing_docs)]

//! Core logic for importing launcher game libraries into a SQL table.
//!
//! This crate hosts the canonical record model, the library export parser,
//! the database provider layer and the existence-check-then-insert importer
//! used by the command line frontend.

pub mod config;
pub mod error;
pub mod importer;
pub mod library;
pub mod models;
pub mod provider;

pub use config::AppConfig;
pub use error::ImportError;
pub use importer::{Clock, ImportSummary, Importer, SystemClock};
pub use library::{extract_records, library_files};
pub use models::GameRecord;
pub use provider::{
    open_connection, Command, Connection, ConnectionDescriptor, ProviderKind, SqlValue,
};
