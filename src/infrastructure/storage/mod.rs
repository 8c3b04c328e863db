//! Storage infrastructure - PostgreSQL pooling and migrations

pub mod migrations;
mod postgres;

pub use migrations::{run_storage_migrations, Migration, PostgresMigrator};
pub use postgres::{connect_pool, PostgresConfig};
