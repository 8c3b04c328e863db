//! PMP Team Service
//!
//! Team membership and invitation management backed by PostgreSQL:
//! - Membership-guarded member and invite listings with search, sorting
//!   and pagination
//! - Batched invite creation with signup tokens, revocation and
//!   token-based acceptance
//! - Role-based member management (owner, admin, member)

pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use domain::DomainError;
use infrastructure::logging::init_logging;
use infrastructure::storage::{connect_pool, run_storage_migrations, PostgresConfig};
use infrastructure::team::{PostgresTeamRepository, TeamService};
use tracing::info;

/// Create the team service with configuration loaded from config files and
/// the environment. Initializes the global tracing subscriber.
pub async fn connect_team_service() -> Result<TeamService<PostgresTeamRepository>, DomainError> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().unwrap_or_default();
    init_logging(&config.logging);

    connect_team_service_with_config(&config).await
}

/// Create the team service with custom configuration
pub async fn connect_team_service_with_config(
    config: &AppConfig,
) -> Result<TeamService<PostgresTeamRepository>, DomainError> {
    let postgres_config = PostgresConfig::new(config.database.url.as_str())
        .with_max_connections(config.database.max_connections)
        .with_min_connections(config.database.min_connections)
        .with_connect_timeout(config.database.connect_timeout_secs)
        .with_idle_timeout(config.database.idle_timeout_secs);

    info!("Connecting to PostgreSQL...");
    let pool = connect_pool(&postgres_config).await?;
    info!("PostgreSQL connection established");

    run_storage_migrations(&pool).await?;

    let repository = Arc::new(PostgresTeamRepository::new(pool));
    Ok(TeamService::new(repository))
}
