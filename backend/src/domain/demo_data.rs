//! Demo data seeding orchestration.
//!
//! Validates a demo fixture against the domain rules, hashes the shared demo
//! password, and hands the result to the seeding repository port.

use std::sync::Arc;

use serde::Deserialize;
use thiserror::Error;

use crate::domain::ports::{
    DemoDataSeed, DemoDataSeedRepository, DemoDataSeedRepositoryError, DemoRide, DemoUser,
    PasswordHashError, PasswordHasher, SeedingResult,
};
use crate::domain::{
    Avatar, EmailAddress, PasswordDigest, PhoneNumber, RideDraft, RideDraftInput,
    RideValidationError, UserName, UserValidationError,
};

/// Demo account as written in the fixture file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DemoUserFixture {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub avatar: Option<String>,
    pub rating: f64,
    pub trips_count: u32,
}

/// Demo ride as written in the fixture file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DemoRideFixture {
    pub origin: String,
    pub destination: String,
    pub departure_date: String,
    pub departure_time: String,
    pub seats: u32,
    pub price: f64,
    pub car_model: Option<String>,
    pub car_color: Option<String>,
    pub description: Option<String>,
}

/// Complete demo fixture. Every user shares `password`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DemoFixture {
    pub password: String,
    pub users: Vec<DemoUserFixture>,
    pub rides: Vec<DemoRideFixture>,
}

/// Result of a seeding attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DemoDataSeedOutcome {
    pub user_count: usize,
    pub ride_count: usize,
    pub result: SeedingResult,
}

/// Errors raised while preparing or applying demo data.
#[derive(Debug, Error)]
pub enum DemoDataSeedingError {
    /// A fixture user failed validation.
    #[error("demo user {index} is invalid: {source}")]
    InvalidUser {
        index: usize,
        #[source]
        source: UserValidationError,
    },
    /// A fixture ride failed validation.
    #[error("demo ride {index} is invalid: {source}")]
    InvalidRide {
        index: usize,
        #[source]
        source: RideValidationError,
    },
    /// Rides were supplied without any driver to offer them.
    #[error("demo fixture has rides but no users")]
    NoDrivers,
    /// The shared password could not be hashed.
    #[error("demo password hashing failed: {0}")]
    Hash(#[from] PasswordHashError),
    /// Persistence adapter failed while seeding.
    #[error("demo data persistence error: {0}")]
    Persistence(#[from] DemoDataSeedRepositoryError),
}

/// Service that validates and applies demo data.
#[derive(Clone)]
pub struct DemoDataSeeder<R, H> {
    repository: Arc<R>,
    hasher: Arc<H>,
}

impl<R, H> DemoDataSeeder<R, H> {
    /// Create a seeder over a persistence adapter and a password hasher.
    pub fn new(repository: Arc<R>, hasher: Arc<H>) -> Self {
        Self { repository, hasher }
    }
}

impl<R, H> DemoDataSeeder<R, H>
where
    R: DemoDataSeedRepository,
    H: PasswordHasher,
{
    /// Seed `fixture` into an empty store.
    ///
    /// Rides are assigned to users round-robin in fixture order.
    ///
    /// # Errors
    ///
    /// Returns [`DemoDataSeedingError`] if validation, hashing or persistence
    /// fails.
    pub async fn seed(
        &self,
        fixture: &DemoFixture,
    ) -> Result<DemoDataSeedOutcome, DemoDataSeedingError> {
        let seed = self.prepare(fixture)?;
        let outcome = DemoDataSeedOutcome {
            user_count: seed.users.len(),
            ride_count: seed.rides.len(),
            result: SeedingResult::AlreadySeeded,
        };
        let result = self.repository.seed_if_empty(&seed).await?;
        Ok(DemoDataSeedOutcome { result, ..outcome })
    }

    fn prepare(&self, fixture: &DemoFixture) -> Result<DemoDataSeed, DemoDataSeedingError> {
        if fixture.users.is_empty() && !fixture.rides.is_empty() {
            return Err(DemoDataSeedingError::NoDrivers);
        }
        let password = self.hasher.hash(&fixture.password)?;

        let users = fixture
            .users
            .iter()
            .enumerate()
            .map(|(index, user)| {
                convert_user(user, password.clone())
                    .map_err(|source| DemoDataSeedingError::InvalidUser { index, source })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let rides = fixture
            .rides
            .iter()
            .zip((0..users.len()).cycle())
            .enumerate()
            .map(|(index, (ride, driver_index))| {
                let draft = convert_ride(ride)
                    .map_err(|source| DemoDataSeedingError::InvalidRide { index, source })?;
                Ok(DemoRide {
                    driver_index,
                    draft,
                })
            })
            .collect::<Result<Vec<_>, DemoDataSeedingError>>()?;

        Ok(DemoDataSeed { users, rides })
    }
}

fn convert_user(
    user: &DemoUserFixture,
    password: PasswordDigest,
) -> Result<DemoUser, UserValidationError> {
    Ok(DemoUser {
        name: UserName::new(&user.name)?,
        email: EmailAddress::new(&user.email)?,
        password,
        phone: PhoneNumber::parse_optional(user.phone.as_deref())?,
        avatar: user.avatar.clone().map(Avatar::new).unwrap_or_default(),
        rating: user.rating,
        trips_count: user.trips_count,
    })
}

fn convert_ride(ride: &DemoRideFixture) -> Result<RideDraft, RideValidationError> {
    RideDraft::try_from_input(RideDraftInput {
        origin: Some(&ride.origin),
        destination: Some(&ride.destination),
        departure_date: Some(&ride.departure_date),
        departure_time: Some(&ride.departure_time),
        seats: Some(ride.seats),
        price: Some(ride.price),
        car_model: ride.car_model.as_deref(),
        car_color: ride.car_color.as_deref(),
        description: ride.description.as_deref(),
    })
}
