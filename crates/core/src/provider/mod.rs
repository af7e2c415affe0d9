//! Database provider abstraction.
//!
//! Hides the two things that differ between backends: how a connection is
//! opened from a connection string, and how bound parameters are spelled.

mod command;
mod connection;
mod kind;

pub use command::{Command, SqlValue};
pub use connection::{open_connection, Connection, ConnectionDescriptor};
pub use kind::ProviderKind;
