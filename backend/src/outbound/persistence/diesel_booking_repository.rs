//! SQLite-backed `BookingRepository` implementation using Diesel ORM.
//!
//! Every mutating operation is a single transaction whose first statement is a
//! no-op `UPDATE`. That takes SQLite's write lock before anything is read, so
//! the snapshot handed to the booking rules cannot go stale before the writes
//! that follow it. Competing writers wait on the busy timeout; a writer that
//! gives up surfaces as a connection failure and nothing it did is kept.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};

use crate::domain::ports::{BookingRepository, BookingRepositoryError};
use crate::domain::{
    Booking, BookingId, BookingRejection, BookingRequest, BookingStatus, CancelledBooking,
    CancelledRide, PassengerBooking, RideId, RideSeats, RideStatus, UserId, authorise_booking,
    authorise_booking_cancellation, authorise_ride_cancellation,
};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{BookingRow, BookingSeatsRow, NewBookingRow, RideRow, RideSeatsRow, UserRow};
use super::pool::{DbPool, PoolError, SqliteConn};
use super::row_mapping::{
    RowError, affected, booking_from_row, booking_seats_from_row, column_count, count,
    passenger_booking_from_rows, ride_seats_from_row, seat_column,
};
use super::schema::{bookings, rides, users};

/// Diesel-backed implementation of the booking repository port.
#[derive(Clone)]
pub struct DieselBookingRepository {
    pool: DbPool,
}

impl DieselBookingRepository {
    /// Create a new repository with the given connection pool.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use rideshare::outbound::persistence::{DbPool, DieselBookingRepository, PoolConfig};
    ///
    /// # async fn run() -> Result<(), Box<dyn std::error::Error>> {
    /// let pool = DbPool::new(PoolConfig::new("rideshare.db")).await?;
    /// let repository = DieselBookingRepository::new(pool);
    /// # let _ = repository;
    /// # Ok(())
    /// # }
    /// ```
    #[must_use]
    pub const fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Failure inside a booking transaction.
#[derive(Debug)]
enum BookingTxError {
    Diesel(DieselError),
    Rejected(BookingRejection),
    Corrupt(RowError),
}

impl From<DieselError> for BookingTxError {
    fn from(value: DieselError) -> Self {
        Self::Diesel(value)
    }
}

impl From<BookingRejection> for BookingTxError {
    fn from(value: BookingRejection) -> Self {
        Self::Rejected(value)
    }
}

impl From<RowError> for BookingTxError {
    fn from(value: RowError) -> Self {
        Self::Corrupt(value)
    }
}

/// Map pool errors to domain repository errors.
fn map_pool_error(error: PoolError) -> BookingRepositoryError {
    map_basic_pool_error(error, |message| BookingRepositoryError::connection(message))
}

/// Map Diesel errors to domain repository errors.
fn map_diesel_error(error: DieselError) -> BookingRepositoryError {
    map_basic_diesel_error(
        error,
        BookingRepositoryError::query,
        BookingRepositoryError::connection,
    )
}

fn map_tx_error(error: BookingTxError) -> BookingRepositoryError {
    match error {
        BookingTxError::Diesel(err) => map_diesel_error(err),
        BookingTxError::Rejected(reason) => BookingRepositoryError::rejected(reason),
        BookingTxError::Corrupt(err) => BookingRepositoryError::query(err.to_string()),
    }
}

/// The partial unique index only fires when two confirmed bookings race.
fn map_insert_error(error: DieselError) -> BookingTxError {
    match error {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
            BookingTxError::Rejected(BookingRejection::AlreadyBooked)
        }
        other => BookingTxError::Diesel(other),
    }
}

async fn acquire_write_lock(conn: &mut SqliteConn) -> Result<(), DieselError> {
    diesel::sql_query("UPDATE rides SET seats_available = seats_available WHERE 0")
        .execute(conn)
        .await?;
    Ok(())
}

async fn load_ride_seats(
    conn: &mut SqliteConn,
    ride_id: RideId,
) -> Result<Option<RideSeats>, BookingTxError> {
    let row = rides::table
        .find(ride_id.as_i64())
        .select(RideSeatsRow::as_select())
        .first(conn)
        .await
        .optional()?;
    Ok(row.as_ref().map(ride_seats_from_row).transpose()?)
}

async fn insert_booking(
    conn: &mut SqliteConn,
    request: BookingRequest,
) -> Result<Booking, BookingTxError> {
    acquire_write_lock(conn).await?;

    let ride = load_ride_seats(conn, request.ride_id).await?;
    let has_confirmed_booking = diesel::select(diesel::dsl::exists(
        bookings::table
            .filter(bookings::ride_id.eq(request.ride_id.as_i64()))
            .filter(bookings::passenger_id.eq(request.passenger_id.as_i64()))
            .filter(bookings::status.eq(BookingStatus::Confirmed.as_str())),
    ))
    .get_result::<bool>(conn)
    .await?;
    authorise_booking(ride.as_ref(), &request, has_confirmed_booking)?;
    let ride = ride.ok_or(BookingRejection::RideUnavailable)?;

    let seats = seat_column(request.seats)?;
    let taken = diesel::update(
        rides::table
            .filter(rides::id.eq(request.ride_id.as_i64()))
            .filter(rides::status.eq(RideStatus::Active.as_str()))
            .filter(rides::seats_available.ge(seats)),
    )
    .set(rides::seats_available.eq(rides::seats_available - seats))
    .execute(conn)
    .await?;
    if taken != 1 {
        return Err(BookingRejection::NotEnoughSeats {
            requested: request.seats.get(),
            available: ride.seats_available,
        }
        .into());
    }

    let row = diesel::insert_into(bookings::table)
        .values(&NewBookingRow {
            ride_id: request.ride_id.as_i64(),
            passenger_id: request.passenger_id.as_i64(),
            seats_booked: seats,
        })
        .returning(BookingRow::as_returning())
        .get_result(conn)
        .await
        .map_err(map_insert_error)?;

    diesel::update(
        users::table.filter(
            users::id.eq_any([request.passenger_id.as_i64(), ride.driver_id.as_i64()]),
        ),
    )
    .set(users::trips_count.eq(users::trips_count + 1))
    .execute(conn)
    .await?;

    Ok(booking_from_row(row)?)
}

async fn cancel_confirmed_booking(
    conn: &mut SqliteConn,
    booking_id: BookingId,
    requester: UserId,
) -> Result<CancelledBooking, BookingTxError> {
    acquire_write_lock(conn).await?;

    let row = bookings::table
        .find(booking_id.as_i64())
        .select(BookingSeatsRow::as_select())
        .first(conn)
        .await
        .optional()?;
    let booking = row.as_ref().map(booking_seats_from_row).transpose()?;
    let seats_restored = authorise_booking_cancellation(booking.as_ref(), requester)?;
    let booking = booking.ok_or(BookingRejection::BookingNotFound)?;

    let cancelled = diesel::update(
        bookings::table
            .filter(bookings::id.eq(booking_id.as_i64()))
            .filter(bookings::status.eq(BookingStatus::Confirmed.as_str())),
    )
    .set(bookings::status.eq(BookingStatus::Cancelled.as_str()))
    .execute(conn)
    .await?;
    if cancelled != 1 {
        return Err(BookingRejection::BookingAlreadyCancelled.into());
    }

    let seats = column_count(seats_restored)?;
    diesel::update(rides::table.filter(rides::id.eq(booking.ride_id.as_i64())))
        .set(rides::seats_available.eq(rides::seats_available + seats))
        .execute(conn)
        .await?;

    Ok(CancelledBooking {
        booking_id,
        ride_id: booking.ride_id,
        seats_restored,
    })
}

async fn cancel_owned_ride(
    conn: &mut SqliteConn,
    ride_id: RideId,
    requester: UserId,
) -> Result<CancelledRide, BookingTxError> {
    acquire_write_lock(conn).await?;

    let ride = load_ride_seats(conn, ride_id).await?;
    authorise_ride_cancellation(ride.as_ref(), requester)?;

    let confirmed = bookings::table
        .filter(bookings::ride_id.eq(ride_id.as_i64()))
        .filter(bookings::status.eq(BookingStatus::Confirmed.as_str()))
        .select(bookings::seats_booked)
        .load::<i32>(conn)
        .await?;
    let seats_restored = confirmed.into_iter().try_fold(0_u32, |total, seats| {
        count("booking", ride_id.as_i64(), seats).map(|seats| total.saturating_add(seats))
    })?;

    let cancelled = diesel::update(
        bookings::table
            .filter(bookings::ride_id.eq(ride_id.as_i64()))
            .filter(bookings::status.eq(BookingStatus::Confirmed.as_str())),
    )
    .set(bookings::status.eq(BookingStatus::Cancelled.as_str()))
    .execute(conn)
    .await?;

    diesel::update(rides::table.filter(rides::id.eq(ride_id.as_i64())))
        .set((
            rides::status.eq(RideStatus::Cancelled.as_str()),
            rides::seats_available.eq(rides::seat_capacity),
        ))
        .execute(conn)
        .await?;

    Ok(CancelledRide {
        ride_id,
        bookings_cancelled: affected("ride", ride_id.as_i64(), cancelled)?,
        seats_restored,
    })
}

#[async_trait]
impl BookingRepository for DieselBookingRepository {
    async fn create_booking(
        &self,
        request: &BookingRequest,
    ) -> Result<Booking, BookingRepositoryError> {
        let request = *request;
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        conn.transaction(|conn| {
            async move { insert_booking(conn, request).await }.scope_boxed()
        })
        .await
        .map_err(map_tx_error)
    }

    async fn cancel_booking(
        &self,
        booking_id: BookingId,
        requester: UserId,
    ) -> Result<CancelledBooking, BookingRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        conn.transaction(|conn| {
            async move { cancel_confirmed_booking(conn, booking_id, requester).await }
                .scope_boxed()
        })
        .await
        .map_err(map_tx_error)
    }

    async fn cancel_ride(
        &self,
        ride_id: RideId,
        requester: UserId,
    ) -> Result<CancelledRide, BookingRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        conn.transaction(|conn| {
            async move { cancel_owned_ride(conn, ride_id, requester).await }.scope_boxed()
        })
        .await
        .map_err(map_tx_error)
    }

    async fn list_for_passenger(
        &self,
        passenger_id: UserId,
    ) -> Result<Vec<PassengerBooking>, BookingRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows = bookings::table
            .inner_join(rides::table.inner_join(users::table))
            .filter(bookings::passenger_id.eq(passenger_id.as_i64()))
            .order((
                rides::departure_date.desc(),
                rides::departure_time.desc(),
                bookings::id.desc(),
            ))
            .select((
                BookingRow::as_select(),
                RideRow::as_select(),
                UserRow::as_select(),
            ))
            .load::<(BookingRow, RideRow, UserRow)>(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter()
            .map(|(booking, ride, driver)| passenger_booking_from_rows(booking, ride, &driver))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|err| BookingRepositoryError::query(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for booking repository error mapping.
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn pool_error_maps_to_connection_error() {
        let error = map_pool_error(PoolError::checkout("timed out"));

        assert!(matches!(error, BookingRepositoryError::Connection { .. }));
        assert!(error.to_string().contains("timed out"));
    }

    #[rstest]
    fn lock_contention_maps_to_connection_error() {
        let error = map_tx_error(BookingTxError::Diesel(DieselError::DatabaseError(
            DatabaseErrorKind::Unknown,
            Box::new("database is locked".to_owned()),
        )));

        assert_eq!(error, BookingRepositoryError::connection("database is busy"));
    }

    #[rstest]
    fn rejections_pass_through_unchanged() {
        let error = map_tx_error(BookingTxError::Rejected(BookingRejection::OwnRide));

        assert_eq!(
            error,
            BookingRepositoryError::rejected(BookingRejection::OwnRide)
        );
    }

    #[rstest]
    fn unique_violation_on_insert_means_already_booked() {
        let mapped = map_insert_error(DieselError::DatabaseError(
            DatabaseErrorKind::UniqueViolation,
            Box::new("UNIQUE constraint failed".to_owned()),
        ));

        assert!(matches!(
            mapped,
            BookingTxError::Rejected(BookingRejection::AlreadyBooked)
        ));
    }

    #[rstest]
    fn other_insert_failures_stay_diesel_errors() {
        let mapped = map_insert_error(DieselError::NotFound);

        assert!(matches!(mapped, BookingTxError::Diesel(DieselError::NotFound)));
    }
}
