//! SQLite persistence adapters using Diesel ORM.
//!
//! This module provides concrete implementations of domain repository ports
//! backed by a single SQLite file via the Diesel ORM, with async support
//! through `diesel-async` and `bb8` connection pooling.
//!
//! # Architecture
//!
//! The persistence layer follows these principles:
//!
//! - **Thin adapters**: Repository implementations translate between Diesel
//!   rows and domain types. Booking rules live in the domain; adapters load a
//!   snapshot, ask the rules, then write.
//! - **Internal models**: Diesel row structs (`models.rs`) and schema
//!   definitions (`schema.rs`) are internal implementation details, never
//!   exposed to the domain layer.
//! - **Explicit lifecycle**: the pool is built once in `main`, migrations run
//!   before it, and every adapter receives the pool through its constructor.
//! - **Strongly typed errors**: All database errors are mapped to domain
//!   persistence error types.
//!
//! # Example
//!
//! ```no_run
//! use rideshare::outbound::persistence::{
//!     DbPool, DieselUserRepository, PoolConfig, run_migrations,
//! };
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! run_migrations("rideshare.db").await?;
//! let pool = DbPool::new(PoolConfig::new("rideshare.db")).await?;
//! let repo = DieselUserRepository::new(pool);
//! # let _ = repo;
//! # Ok(())
//! # }
//! ```

mod diesel_basic_error_mapping;
mod diesel_booking_repository;
mod diesel_demo_data_seed_repository;
mod diesel_review_repository;
mod diesel_ride_repository;
mod diesel_user_repository;
mod migrations;
mod models;
mod pool;
mod row_mapping;
mod schema;

pub use diesel_booking_repository::DieselBookingRepository;
pub use diesel_demo_data_seed_repository::DieselDemoDataSeedRepository;
pub use diesel_review_repository::DieselReviewRepository;
pub use diesel_ride_repository::DieselRideRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use migrations::{MigrationError, run_migrations};
pub use pool::{BUSY_TIMEOUT_MS, DbPool, PoolConfig, PoolError};
