//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. Conversions into domain types live in
//! [`super::row_mapping`].

use chrono::NaiveDateTime;
use diesel::prelude::*;

use super::schema::{bookings, reviews, rides, users};

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub(crate) struct UserRow {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub password: String,
    pub phone: Option<String>,
    pub avatar: String,
    pub rating: f64,
    pub trips_count: i32,
    pub created_at: NaiveDateTime,
}

/// Insertable struct for creating user records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub password: &'a str,
    pub phone: Option<&'a str>,
    pub avatar: &'a str,
    pub rating: f64,
    pub trips_count: i32,
}

/// Changeset for profile edits; `None` fields are left untouched.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = users)]
pub(crate) struct UserProfileChanges<'a> {
    pub name: Option<&'a str>,
    pub phone: Option<&'a str>,
}

// ---------------------------------------------------------------------------
// Rides
// ---------------------------------------------------------------------------

/// Row struct for reading from the rides table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = rides)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub(crate) struct RideRow {
    pub id: i64,
    pub driver_id: i64,
    pub origin: String,
    pub destination: String,
    pub departure_date: String,
    pub departure_time: String,
    pub seats_available: i32,
    pub seat_capacity: i32,
    pub price: f64,
    pub car_model: Option<String>,
    pub car_color: Option<String>,
    pub description: Option<String>,
    pub status: String,
    pub created_at: NaiveDateTime,
}

/// Insertable struct for publishing rides.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = rides)]
pub(crate) struct NewRideRow<'a> {
    pub driver_id: i64,
    pub origin: &'a str,
    pub destination: &'a str,
    pub departure_date: String,
    pub departure_time: String,
    pub seats_available: i32,
    pub seat_capacity: i32,
    pub price: f64,
    pub car_model: Option<&'a str>,
    pub car_color: Option<&'a str>,
    pub description: Option<&'a str>,
}

/// Seat-relevant ride columns loaded inside booking transactions.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = rides)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub(crate) struct RideSeatsRow {
    pub id: i64,
    pub driver_id: i64,
    pub status: String,
    pub seats_available: i32,
}

// ---------------------------------------------------------------------------
// Bookings
// ---------------------------------------------------------------------------

/// Row struct for reading from the bookings table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = bookings)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub(crate) struct BookingRow {
    pub id: i64,
    pub ride_id: i64,
    pub passenger_id: i64,
    pub seats_booked: i32,
    pub status: String,
    pub created_at: NaiveDateTime,
}

/// Insertable struct for confirmed bookings.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = bookings)]
pub(crate) struct NewBookingRow {
    pub ride_id: i64,
    pub passenger_id: i64,
    pub seats_booked: i32,
}

/// Booking columns loaded inside cancellation transactions.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = bookings)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub(crate) struct BookingSeatsRow {
    pub id: i64,
    pub ride_id: i64,
    pub passenger_id: i64,
    pub seats_booked: i32,
    pub status: String,
}

/// Confirmed passenger listed on the ride detail view.
#[derive(Debug, Clone, Queryable)]
pub(crate) struct PassengerRow {
    pub passenger_id: i64,
    pub seats_booked: i32,
    pub name: String,
    pub avatar: String,
}

// ---------------------------------------------------------------------------
// Reviews
// ---------------------------------------------------------------------------

/// Row struct for reading from the reviews table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = reviews)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub(crate) struct ReviewRow {
    pub id: i64,
    pub reviewer_id: i64,
    pub reviewee_id: i64,
    pub ride_id: i64,
    pub rating: i32,
    pub comment: Option<String>,
    pub created_at: NaiveDateTime,
}

/// Insertable struct for appending reviews.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = reviews)]
pub(crate) struct NewReviewRow<'a> {
    pub reviewer_id: i64,
    pub reviewee_id: i64,
    pub ride_id: i64,
    pub rating: i32,
    pub comment: Option<&'a str>,
}
