//! Database module
//!
//! Handles SQLite connection, decimal column mapping and migrations.

pub mod connection;
pub mod decimal;
pub mod migrations;

pub use connection::{Database, DbError, DbResult};
pub use decimal::SqlDecimal;
