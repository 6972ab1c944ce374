//! Data models for the SQL playground.
//!
//! This module re-exports all model types used throughout the application.

pub mod database;
pub mod query;

pub use database::DatabaseFile;
pub use query::{QueryOutcome, QueryResult, SAMPLE_ROW_LIMIT};
