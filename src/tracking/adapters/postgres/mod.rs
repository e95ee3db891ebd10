//! `PostgreSQL` adapters for work-item persistence and directory lookups.

mod directory;
mod membership;
mod models;
mod repository;
mod schema;
mod sql;

pub use repository::{PostgresTrackingStore, TrackingPgPool};
