//! SQLite-backed `RideRepository` implementation using Diesel ORM.
//!
//! Public listings join each ride with its driver and only include active
//! rides that still have a free seat. Text search uses `LIKE` with escaped
//! wildcards; SQLite compares ASCII letters case-insensitively.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::result::Error as DieselError;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{RideRepository, RideRepositoryError};
use crate::domain::{
    BookingStatus, DATE_FORMAT, OfferedRide, Ride, RideDetails, RideDraft, RideId, RideListing,
    RideSearch, RideStatus, UserId,
};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{NewRideRow, PassengerRow, RideRow, UserRow};
use super::pool::{DbPool, PoolError};
use super::row_mapping::{
    RowError, departure_columns, driver_summary, listing_from_rows, passenger_from_row,
    ride_from_row, seat_column,
};
use super::schema::{bookings, rides, users};

/// Diesel-backed implementation of the ride repository port.
#[derive(Clone)]
pub struct DieselRideRepository {
    pool: DbPool,
}

impl DieselRideRepository {
    /// Create a new repository with the given connection pool.
    #[must_use]
    pub const fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Map pool errors to domain repository errors.
fn map_pool_error(error: PoolError) -> RideRepositoryError {
    map_basic_pool_error(error, |message| RideRepositoryError::connection(message))
}

/// Map Diesel errors to domain repository errors.
fn map_diesel_error(error: DieselError) -> RideRepositoryError {
    map_basic_diesel_error(
        error,
        RideRepositoryError::query,
        RideRepositoryError::connection,
    )
}

fn map_row_error(error: RowError) -> RideRepositoryError {
    RideRepositoryError::query(error.to_string())
}

/// `LIKE` pattern matching `term` anywhere, with wildcards in `term` escaped.
fn contains_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for ch in term.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

fn listings(rows: Vec<(RideRow, UserRow)>) -> Result<Vec<RideListing>, RideRepositoryError> {
    rows.into_iter()
        .map(|(ride, driver)| listing_from_rows(ride, &driver))
        .collect::<Result<Vec<_>, _>>()
        .map_err(map_row_error)
}

#[async_trait]
impl RideRepository for DieselRideRepository {
    async fn insert(
        &self,
        driver_id: UserId,
        draft: &RideDraft,
    ) -> Result<Ride, RideRepositoryError> {
        let (departure_date, departure_time) = departure_columns(draft);
        let seats = seat_column(draft.seats).map_err(map_row_error)?;
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = diesel::insert_into(rides::table)
            .values(&NewRideRow {
                driver_id: driver_id.as_i64(),
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
            .returning(RideRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        ride_from_row(row).map_err(map_row_error)
    }

    async fn list_active(&self, limit: u32) -> Result<Vec<RideListing>, RideRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows = rides::table
            .inner_join(users::table)
            .filter(rides::status.eq(RideStatus::Active.as_str()))
            .filter(rides::seats_available.gt(0))
            .order((rides::created_at.desc(), rides::id.desc()))
            .limit(i64::from(limit))
            .select((RideRow::as_select(), UserRow::as_select()))
            .load::<(RideRow, UserRow)>(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        listings(rows)
    }

    async fn search(&self, search: &RideSearch) -> Result<Vec<RideListing>, RideRepositoryError> {
        let mut query = rides::table
            .inner_join(users::table)
            .select((RideRow::as_select(), UserRow::as_select()))
            .filter(rides::status.eq(RideStatus::Active.as_str()))
            .filter(rides::seats_available.gt(0))
            .into_boxed();
        if let Some(origin) = &search.origin {
            query = query.filter(rides::origin.like(contains_pattern(origin)).escape('\\'));
        }
        if let Some(destination) = &search.destination {
            query = query.filter(
                rides::destination
                    .like(contains_pattern(destination))
                    .escape('\\'),
            );
        }
        if let Some(date) = search.date {
            query = query.filter(rides::departure_date.eq(date.format(DATE_FORMAT).to_string()));
        }

        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows = query
            .order((
                rides::departure_date.asc(),
                rides::departure_time.asc(),
                rides::id.asc(),
            ))
            .load::<(RideRow, UserRow)>(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        listings(rows)
    }

    async fn find_details(
        &self,
        ride_id: RideId,
    ) -> Result<Option<RideDetails>, RideRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let Some((ride, driver)) = rides::table
            .inner_join(users::table)
            .filter(rides::id.eq(ride_id.as_i64()))
            .select((RideRow::as_select(), UserRow::as_select()))
            .first::<(RideRow, UserRow)>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?
        else {
            return Ok(None);
        };

        let passengers = bookings::table
            .inner_join(users::table)
            .filter(bookings::ride_id.eq(ride_id.as_i64()))
            .filter(bookings::status.eq(BookingStatus::Confirmed.as_str()))
            .order(bookings::id.asc())
            .select((
                bookings::passenger_id,
                bookings::seats_booked,
                users::name,
                users::avatar,
            ))
            .load::<PassengerRow>(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        let listing = RideListing {
            ride: ride_from_row(ride).map_err(map_row_error)?,
            driver: driver_summary(&driver).map_err(map_row_error)?,
        };
        let passengers = passengers
            .into_iter()
            .map(passenger_from_row)
            .collect::<Result<Vec<_>, _>>()
            .map_err(map_row_error)?;
        Ok(Some(RideDetails {
            listing,
            passengers,
        }))
    }

    async fn list_offered_by(
        &self,
        driver_id: UserId,
    ) -> Result<Vec<OfferedRide>, RideRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows = rides::table
            .filter(rides::driver_id.eq(driver_id.as_i64()))
            .order((rides::created_at.desc(), rides::id.desc()))
            .select(RideRow::as_select())
            .load::<RideRow>(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        // Confirmed seats are whatever the seat invariant says is missing.
        rows.into_iter()
            .map(|row| {
                ride_from_row(row).map(|ride| OfferedRide {
                    booked_seats: ride.seat_capacity.saturating_sub(ride.seats_available),
                    ride,
                })
            })
            .collect::<Result<Vec<_>, _>>()
            .map_err(map_row_error)
    }
}
