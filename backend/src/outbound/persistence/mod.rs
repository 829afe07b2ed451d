//! PostgreSQL persistence adapters using Diesel.
//!
//! Repositories are thin: they translate between the internal row structs in
//! `models` and domain types and map database failures onto port errors.
//! Connections come from a `bb8` pool of `diesel-async` connections.
//!
//! ```no_run
//! # async fn wire() -> Result<(), Box<dyn std::error::Error>> {
//! use classifieds::outbound::persistence::{DbPool, DieselAdRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/classifieds")).await?;
//! let ads = DieselAdRepository::new(pool);
//! # let _ = ads;
//! # Ok(())
//! # }
//! ```

mod diesel_ad_repository;
mod diesel_error_mapping;
mod diesel_review_repository;
mod diesel_user_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_ad_repository::DieselAdRepository;
pub use diesel_review_repository::DieselReviewRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use migrations::{MigrationError, run_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
