//! Database access layer.
//!
//! This module provides database access functionality:
//! - Database directory scanning
//! - Per-interaction sessions
//! - Schema introspection
//! - Query execution
//! - Statement classification
//! - Value decoding

pub mod catalog;
pub mod executor;
pub mod schema;
pub mod session;
pub mod statement;
pub mod types;

pub use catalog::{DATABASE_FILE_SUFFIX, DatabaseDirectory, find_database};
pub use executor::QueryExecutor;
pub use schema::{SchemaInspector, choose_table, quote_ident};
pub use session::Session;
