//! Shared fixtures for integration tests against a temporary SQLite store.

#![allow(dead_code, reason = "each test binary uses a different subset")]

use std::sync::Arc;

use chrono::TimeDelta;
use mockable::DefaultClock;
use rideshare::domain::ports::{AccountCommand, RideCommand};
use rideshare::domain::{
    AccountService, AuthSession, BookingService, Registration, Ride, RideDraft, RideDraftInput,
    RideService, UserId,
};
use rideshare::outbound::persistence::{
    DbPool, DieselBookingRepository, DieselRideRepository, DieselUserRepository, PoolConfig,
    run_migrations,
};
use rideshare::outbound::security::{Argon2PasswordHasher, JwtCodec};
use tempfile::TempDir;

pub type Accounts = AccountService<DieselUserRepository, Argon2PasswordHasher, JwtCodec>;
pub type Rides = RideService<DieselRideRepository>;
pub type Bookings = BookingService<DieselBookingRepository>;

/// Migrated database file that lives as long as the value.
pub struct TestStore {
    pub pool: DbPool,
    pub path: String,
    _dir: TempDir,
}

impl TestStore {
    pub async fn new() -> Self {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir
            .path()
            .join("rideshare.db")
            .to_string_lossy()
            .into_owned();
        run_migrations(&path).await.expect("migrations apply");
        let pool = DbPool::new(PoolConfig::new(path.as_str()))
            .await
            .expect("pool builds");
        Self {
            pool,
            path,
            _dir: dir,
        }
    }

    pub fn accounts(&self) -> Accounts {
        AccountService::new(
            Arc::new(DieselUserRepository::new(self.pool.clone())),
            Arc::new(Argon2PasswordHasher::new()),
            Arc::new(JwtCodec::new(
                b"integration-secret",
                TimeDelta::hours(1),
                Arc::new(DefaultClock),
            )),
        )
    }

    pub fn rides(&self) -> Rides {
        RideService::new(Arc::new(DieselRideRepository::new(self.pool.clone())))
    }

    pub fn bookings(&self) -> Bookings {
        BookingService::new(Arc::new(DieselBookingRepository::new(self.pool.clone())))
    }

    /// Register a rider called `name` with address `<name>@example.com`.
    pub async fn register(&self, name: &str) -> AuthSession {
        let email = format!("{}@example.com", name.to_lowercase());
        let registration = Registration::try_from_parts(name, &email, "password123", None)
            .expect("valid registration");
        self.accounts()
            .register(registration)
            .await
            .expect("registration succeeds")
    }

    /// Publish a ride leaving at 08:00 on `date`.
    pub async fn offer(
        &self,
        driver: UserId,
        origin: &str,
        destination: &str,
        date: &str,
        seats: u32,
    ) -> Ride {
        self.rides()
            .publish(driver, draft(origin, destination, date, seats))
            .await
            .expect("ride publishes")
    }
}

pub fn draft(origin: &str, destination: &str, date: &str, seats: u32) -> RideDraft {
    RideDraft::try_from_input(RideDraftInput {
        origin: Some(origin),
        destination: Some(destination),
        departure_date: Some(date),
        departure_time: Some("08:00"),
        seats: Some(seats),
        price: Some(25.0),
        car_model: Some("Toyota Prius"),
        car_color: None,
        description: None,
    })
    .expect("valid ride draft")
}
