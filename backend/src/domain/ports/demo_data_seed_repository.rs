//! Port abstraction for loading demo users and rides into an empty store.
//!
//! Adapters must apply the whole seed in one transaction and must not touch a
//! store that already contains users.

use async_trait::async_trait;

use crate::domain::{Avatar, EmailAddress, PasswordDigest, PhoneNumber, RideDraft, UserName};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by demo data seed repository adapters.
    pub enum DemoDataSeedRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "demo data seeding connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "demo data seeding query failed: {message}",
    }
}

/// Outcome of a seeding attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedingResult {
    /// Seed data was written.
    Applied,
    /// The store already had users; nothing was written.
    AlreadySeeded,
}

/// Demo account with its reputation figures.
#[derive(Debug, Clone, PartialEq)]
pub struct DemoUser {
    pub name: UserName,
    pub email: EmailAddress,
    pub password: PasswordDigest,
    pub phone: Option<PhoneNumber>,
    pub avatar: Avatar,
    pub rating: f64,
    pub trips_count: u32,
}

/// Demo ride offered by the user at `driver_index` in [`DemoDataSeed::users`].
#[derive(Debug, Clone, PartialEq)]
pub struct DemoRide {
    pub driver_index: usize,
    pub draft: RideDraft,
}

/// Complete seed payload.
#[derive(Debug, Clone, PartialEq)]
pub struct DemoDataSeed {
    pub users: Vec<DemoUser>,
    pub rides: Vec<DemoRide>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DemoDataSeedRepository: Send + Sync {
    /// Write `seed` when the users table is empty.
    async fn seed_if_empty(
        &self,
        seed: &DemoDataSeed,
    ) -> Result<SeedingResult, DemoDataSeedRepositoryError>;
}
