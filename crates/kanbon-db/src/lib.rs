//! # kanbon-db
//!
//! PostgreSQL implementations of the repository traits in `kanbon-core`.
//!
//! - Connection pool management and schema migrations
//! - Database models with SQLx `FromRow` derives
//! - Entity <-> model mappers
//! - Repository implementations
//!
//! ```rust,ignore
//! use kanbon_db::{create_pool, run_migrations, DatabaseConfig, PgAccountRepository};
//!
//! let pool = create_pool(&DatabaseConfig::from(&config.database)).await?;
//! run_migrations(&pool).await?;
//! let accounts = PgAccountRepository::new(pool);
//! ```

pub mod mappers;
pub mod models;
pub mod pool;
pub mod repositories;

pub use pool::{create_pool, run_migrations, DatabaseConfig, PgPool};
pub use repositories::{
    PgAccountRepository, PgFieldRepository, PgFormRepository, PgOrganizationRepository,
    PgSystemMessageRepository,
};
