//! Storage for clients, properties, consultations and soil analyses.
//!
//! Layout:
//! - `models.rs`: row structs, raw forms and validated inputs
//! - `schema.rs`: SQL DDL for initializing the database (SQLite)
//! - `sqlite.rs`: pool construction and schema bootstrap

pub mod models;
pub mod schema;
pub mod sqlite;

pub use models::{Client, Consultation, Property, PropertyRow, SoilAnalysis};
pub use schema::SQLITE_INIT;
pub use sqlite::{SqlitePool, connect, open_in_memory};
