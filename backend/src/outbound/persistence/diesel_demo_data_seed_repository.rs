//! SQLite-backed demo data seeding adapter.
//!
//! This adapter implements the `DemoDataSeedRepository` port. Users and rides
//! are written in one transaction, and only when the users table is empty, so
//! restarting with demo data enabled never duplicates anything.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};

use crate::domain::ports::{
    DemoDataSeed, DemoDataSeedRepository, DemoDataSeedRepositoryError, DemoRide, DemoUser,
    SeedingResult,
};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{NewRideRow, NewUserRow};
use super::pool::{DbPool, PoolError, SqliteConn};
use super::row_mapping::{column_count, departure_columns, seat_column};
use super::schema::{rides, users};

/// Diesel-backed implementation of the demo data seeding repository.
#[derive(Clone)]
pub struct DieselDemoDataSeedRepository {
    pool: DbPool,
}

impl DieselDemoDataSeedRepository {
    /// Create a new seeding repository with the given connection pool.
    #[must_use]
    pub const fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Map pool errors to domain persistence errors.
fn map_pool_error(error: PoolError) -> DemoDataSeedRepositoryError {
    map_basic_pool_error(error, |message| {
        DemoDataSeedRepositoryError::connection(message)
    })
}

/// Map Diesel errors to domain persistence errors.
fn map_diesel_error(error: diesel::result::Error) -> DemoDataSeedRepositoryError {
    map_basic_diesel_error(
        error,
        DemoDataSeedRepositoryError::query,
        DemoDataSeedRepositoryError::connection,
    )
}

fn map_seed_users(users: &[DemoUser]) -> Result<Vec<NewUserRow<'_>>, DemoDataSeedRepositoryError> {
    users
        .iter()
        .map(|user| {
            let trips_count = column_count(user.trips_count)
                .map_err(|err| DemoDataSeedRepositoryError::query(err.to_string()))?;
            Ok(NewUserRow {
                name: user.name.as_str(),
                email: user.email.as_str(),
                password: user.password.as_str(),
                phone: user.phone.as_ref().map(|phone| phone.as_str()),
                avatar: user.avatar.as_str(),
                rating: user.rating,
                trips_count,
            })
        })
        .collect()
}

/// Resolve each ride's driver index against the inserted user ids.
fn map_seed_rides<'a>(
    rides: &'a [DemoRide],
    driver_ids: &[i64],
) -> Result<Vec<NewRideRow<'a>>, DemoDataSeedRepositoryError> {
    rides
        .iter()
        .map(|ride| {
            let driver_id = driver_ids.get(ride.driver_index).copied().ok_or_else(|| {
                DemoDataSeedRepositoryError::query(format!(
                    "ride driver index {} has no seeded user",
                    ride.driver_index
                ))
            })?;
            let draft = &ride.draft;
            let seats = seat_column(draft.seats)
                .map_err(|err| DemoDataSeedRepositoryError::query(err.to_string()))?;
            let (departure_date, departure_time) = departure_columns(draft);
            Ok(NewRideRow {
                driver_id,
                origin: &draft.origin,
                destination: &draft.destination,
                departure_date,
                departure_time,
                seats_available: seats,
                seat_capacity: seats,
                price: draft.price,
                car_model: draft.car_model.as_deref(),
                car_color: draft.car_color.as_deref(),
                description: draft.description.as_deref(),
            })
        })
        .collect()
}

#[derive(Debug)]
enum SeedTxError {
    Diesel(diesel::result::Error),
    Invalid(DemoDataSeedRepositoryError),
}

impl From<diesel::result::Error> for SeedTxError {
    fn from(value: diesel::result::Error) -> Self {
        Self::Diesel(value)
    }
}

async fn seed_users_and_rides(
    conn: &mut SqliteConn,
    user_rows: &[NewUserRow<'_>],
    seed: &DemoDataSeed,
) -> Result<SeedingResult, SeedTxError> {
    let existing = users::table.count().get_result::<i64>(conn).await?;
    if existing > 0 {
        return Ok(SeedingResult::AlreadySeeded);
    }

    let mut driver_ids = Vec::with_capacity(user_rows.len());
    for row in user_rows {
        let id = diesel::insert_into(users::table)
            .values(row)
            .returning(users::id)
            .get_result::<i64>(conn)
            .await?;
        driver_ids.push(id);
    }

    let ride_rows = map_seed_rides(&seed.rides, &driver_ids).map_err(SeedTxError::Invalid)?;
    for row in &ride_rows {
        diesel::insert_into(rides::table)
            .values(row)
            .execute(conn)
            .await?;
    }

    Ok(SeedingResult::Applied)
}

#[async_trait]
impl DemoDataSeedRepository for DieselDemoDataSeedRepository {
    async fn seed_if_empty(
        &self,
        seed: &DemoDataSeed,
    ) -> Result<SeedingResult, DemoDataSeedRepositoryError> {
        let user_rows = map_seed_users(&seed.users)?;
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let result = conn
            .transaction(|conn| {
                async move { seed_users_and_rides(conn, &user_rows, seed).await }.scope_boxed()
            })
            .await
            .map_err(|err| match err {
                SeedTxError::Diesel(err) => map_diesel_error(err),
                SeedTxError::Invalid(err) => err,
            })?;

        Ok(result)
    }
}
