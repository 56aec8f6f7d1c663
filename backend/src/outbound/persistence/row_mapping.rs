//! Conversions from Diesel rows into validated domain values.
//!
//! Stored rows are re-validated on the way out; a row that no longer passes
//! domain validation is reported as a [`RowError`], which repositories turn
//! into query failures.

use crate::domain::{
    Avatar, Booking, BookingId, BookingSeats, BookingStatus, DATE_FORMAT, DriverSummary,
    EmailAddress, PassengerBooking, PhoneNumber, Rating, Review, ReviewId, Ride, RideDraft,
    RideId, RideListing, RidePassenger, RideSeats, RideStatus, RideValidationError, SeatCount,
    TIME_FORMAT, User, UserId, UserName, UserValidationError, parse_departure_date,
    parse_departure_time,
};

use super::models::{
    BookingRow, BookingSeatsRow, PassengerRow, ReviewRow, RideRow, RideSeatsRow, UserRow,
};

/// A stored row failed domain validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("stored {entity} {id} is invalid: {reason}")]
pub struct RowError {
    entity: &'static str,
    id: i64,
    reason: String,
}

impl RowError {
    fn new(entity: &'static str, id: i64, reason: impl ToString) -> Self {
        Self {
            entity,
            id,
            reason: reason.to_string(),
        }
    }
}

/// Convert a non-negative stored count.
pub fn count(entity: &'static str, id: i64, value: i32) -> Result<u32, RowError> {
    u32::try_from(value).map_err(|err| RowError::new(entity, id, err))
}

/// Convert a domain count into a column value.
pub fn column_count(value: u32) -> Result<i32, RowError> {
    i32::try_from(value).map_err(|err| RowError::new("count", i64::from(value), err))
}

/// Convert an affected-row count.
pub fn affected(entity: &'static str, id: i64, rows: usize) -> Result<u32, RowError> {
    u32::try_from(rows).map_err(|err| RowError::new(entity, id, err))
}

pub fn user_from_row(row: UserRow) -> Result<User, RowError> {
    let id = row.id;
    let invalid = |err: UserValidationError| RowError::new("user", id, err);
    Ok(User {
        id: UserId::new(id),
        name: UserName::new(&row.name).map_err(invalid)?,
        email: EmailAddress::new(&row.email).map_err(invalid)?,
        phone: PhoneNumber::parse_optional(row.phone.as_deref()).map_err(invalid)?,
        avatar: Avatar::new(row.avatar),
        rating: row.rating,
        trips_count: count("user", id, row.trips_count)?,
        created_at: row.created_at,
    })
}

pub fn driver_summary(row: &UserRow) -> Result<DriverSummary, RowError> {
    let invalid = |err: UserValidationError| RowError::new("user", row.id, err);
    Ok(DriverSummary {
        name: UserName::new(&row.name).map_err(invalid)?,
        avatar: Avatar::new(row.avatar.clone()),
        rating: row.rating,
        trips_count: count("user", row.id, row.trips_count)?,
        phone: PhoneNumber::parse_optional(row.phone.as_deref()).map_err(invalid)?,
    })
}

fn ride_status(entity: &'static str, id: i64, raw: &str) -> Result<RideStatus, RowError> {
    raw.parse().map_err(|err| RowError::new(entity, id, err))
}

fn booking_status(id: i64, raw: &str) -> Result<BookingStatus, RowError> {
    raw.parse().map_err(|err| RowError::new("booking", id, err))
}

pub fn ride_from_row(row: RideRow) -> Result<Ride, RowError> {
    let id = row.id;
    let invalid = |err: RideValidationError| RowError::new("ride", id, err);
    Ok(Ride {
        id: RideId::new(id),
        driver_id: UserId::new(row.driver_id),
        departure_date: parse_departure_date(&row.departure_date).map_err(invalid)?,
        departure_time: parse_departure_time(&row.departure_time).map_err(invalid)?,
        seats_available: count("ride", id, row.seats_available)?,
        seat_capacity: count("ride", id, row.seat_capacity)?,
        status: ride_status("ride", id, &row.status)?,
        origin: row.origin,
        destination: row.destination,
        price: row.price,
        car_model: row.car_model,
        car_color: row.car_color,
        description: row.description,
        created_at: row.created_at,
    })
}

pub fn listing_from_rows(ride: RideRow, driver: &UserRow) -> Result<RideListing, RowError> {
    Ok(RideListing {
        ride: ride_from_row(ride)?,
        driver: DriverSummary {
            phone: None,
            ..driver_summary(driver)?
        },
    })
}

pub fn passenger_from_row(row: PassengerRow) -> Result<RidePassenger, RowError> {
    let id = row.passenger_id;
    Ok(RidePassenger {
        passenger_id: UserId::new(id),
        name: UserName::new(&row.name).map_err(|err| RowError::new("user", id, err))?,
        avatar: Avatar::new(row.avatar),
        seats_booked: count("booking", id, row.seats_booked)?,
    })
}

pub fn ride_seats_from_row(row: &RideSeatsRow) -> Result<RideSeats, RowError> {
    Ok(RideSeats {
        ride_id: RideId::new(row.id),
        driver_id: UserId::new(row.driver_id),
        status: ride_status("ride", row.id, &row.status)?,
        seats_available: count("ride", row.id, row.seats_available)?,
    })
}

pub fn booking_seats_from_row(row: &BookingSeatsRow) -> Result<BookingSeats, RowError> {
    Ok(BookingSeats {
        booking_id: BookingId::new(row.id),
        ride_id: RideId::new(row.ride_id),
        passenger_id: UserId::new(row.passenger_id),
        seats_booked: count("booking", row.id, row.seats_booked)?,
        status: booking_status(row.id, &row.status)?,
    })
}

pub fn booking_from_row(row: BookingRow) -> Result<Booking, RowError> {
    Ok(Booking {
        id: BookingId::new(row.id),
        ride_id: RideId::new(row.ride_id),
        passenger_id: UserId::new(row.passenger_id),
        seats_booked: count("booking", row.id, row.seats_booked)?,
        status: booking_status(row.id, &row.status)?,
        created_at: row.created_at,
    })
}

pub fn passenger_booking_from_rows(
    booking: BookingRow,
    ride: RideRow,
    driver: &UserRow,
) -> Result<PassengerBooking, RowError> {
    let ride = ride_from_row(ride)?;
    let driver = driver_summary(driver)?;
    Ok(PassengerBooking {
        booking: booking_from_row(booking)?,
        origin: ride.origin,
        destination: ride.destination,
        departure_date: ride.departure_date,
        departure_time: ride.departure_time,
        price: ride.price,
        car_model: ride.car_model,
        car_color: ride.car_color,
        ride_status: ride.status,
        driver_name: driver.name,
        driver_avatar: driver.avatar,
        driver_rating: driver.rating,
        driver_phone: driver.phone,
    })
}

pub fn review_from_row(row: ReviewRow) -> Result<Review, RowError> {
    let rating = u8::try_from(row.rating)
        .map_err(|err| RowError::new("review", row.id, err))
        .and_then(|value| Rating::new(value).map_err(|err| RowError::new("review", row.id, err)))?;
    Ok(Review {
        id: ReviewId::new(row.id),
        reviewer_id: UserId::new(row.reviewer_id),
        reviewee_id: UserId::new(row.reviewee_id),
        ride_id: RideId::new(row.ride_id),
        rating,
        comment: row.comment,
        created_at: row.created_at,
    })
}

/// Stored text form of a draft's departure date and time.
#[must_use]
pub fn departure_columns(draft: &RideDraft) -> (String, String) {
    (
        draft.departure_date.format(DATE_FORMAT).to_string(),
        draft.departure_time.format(TIME_FORMAT).to_string(),
    )
}

/// Column value for a validated seat count.
pub fn seat_column(seats: SeatCount) -> Result<i32, RowError> {
    column_count(seats.get())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rstest::{fixture, rstest};

    fn timestamp() -> chrono::NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 3, 1)
            .and_then(|date| date.and_hms_opt(9, 0, 0))
            .expect("valid timestamp")
    }

    #[fixture]
    fn ride_row() -> RideRow {
        RideRow {
            id: 7,
            driver_id: 1,
            origin: "Seattle".to_owned(),
            destination: "Portland".to_owned(),
            departure_date: "2026-03-09".to_owned(),
            departure_time: "06:30".to_owned(),
            seats_available: 2,
            seat_capacity: 2,
            price: 20.0,
            car_model: Some("Tesla Model 3".to_owned()),
            car_color: Some("Red".to_owned()),
            description: None,
            status: "active".to_owned(),
            created_at: timestamp(),
        }
    }

    #[rstest]
    fn ride_rows_convert(ride_row: RideRow) {
        let ride = ride_from_row(ride_row).expect("valid row");
        assert_eq!(ride.id, RideId::new(7));
        assert_eq!(ride.status, RideStatus::Active);
        assert_eq!(ride.departure_time.format(TIME_FORMAT).to_string(), "06:30");
    }

    #[rstest]
    #[case::status(RideRow { status: "paused".to_owned(), ..ride_row() })]
    #[case::negative_seats(RideRow { seats_available: -1, ..ride_row() })]
    #[case::bad_date(RideRow { departure_date: "09/03/2026".to_owned(), ..ride_row() })]
    fn corrupt_ride_rows_are_rejected(#[case] row: RideRow) {
        let error = ride_from_row(row).expect_err("corrupt row");
        assert!(error.to_string().starts_with("stored ride 7 is invalid"));
    }

    #[rstest]
    fn out_of_range_review_rating_is_rejected() {
        let row = ReviewRow {
            id: 3,
            reviewer_id: 1,
            reviewee_id: 2,
            ride_id: 7,
            rating: 9,
            comment: None,
            created_at: timestamp(),
        };
        assert!(review_from_row(row).is_err());
    }
}
