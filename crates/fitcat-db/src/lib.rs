//! Storage layer for the fitcat plan catalog.
//!
//! Plans are stored one row per document in PostgreSQL. Validation and
//! defaulting happen once, at this boundary, so every write path shares the
//! same semantics.

pub mod config;
pub mod models;
pub mod pool;
pub mod queries;
