//! Diesel table definitions for the SQLite schema.
//!
//! These definitions must match the migrations under `backend/migrations`
//! exactly. Dates and times are stored as `TEXT` in `YYYY-MM-DD` and `HH:MM`
//! form so lexical ordering matches chronological ordering.

diesel::table! {
    /// Registered riders. Any user may both drive and book.
    users (id) {
        id -> BigInt,
        name -> Text,
        /// Unique, stored lowercased.
        email -> Text,
        /// Argon2 PHC string.
        password -> Text,
        phone -> Nullable<Text>,
        avatar -> Text,
        rating -> Double,
        trips_count -> Integer,
        created_at -> Timestamp,
    }
}

diesel::table! {
    /// Ride offers.
    ///
    /// `seats_available + Σ confirmed bookings.seats_booked == seat_capacity`.
    rides (id) {
        id -> BigInt,
        driver_id -> BigInt,
        origin -> Text,
        destination -> Text,
        departure_date -> Text,
        departure_time -> Text,
        seats_available -> Integer,
        seat_capacity -> Integer,
        price -> Double,
        car_model -> Nullable<Text>,
        car_color -> Nullable<Text>,
        description -> Nullable<Text>,
        /// `active` or `cancelled`.
        status -> Text,
        created_at -> Timestamp,
    }
}

diesel::table! {
    /// Seat reservations. At most one confirmed row per (ride, passenger).
    bookings (id) {
        id -> BigInt,
        ride_id -> BigInt,
        passenger_id -> BigInt,
        seats_booked -> Integer,
        /// `confirmed` or `cancelled`.
        status -> Text,
        created_at -> Timestamp,
    }
}

diesel::table! {
    /// Append-only reviews between riders.
    reviews (id) {
        id -> BigInt,
        reviewer_id -> BigInt,
        reviewee_id -> BigInt,
        ride_id -> BigInt,
        rating -> Integer,
        comment -> Nullable<Text>,
        created_at -> Timestamp,
    }
}

diesel::joinable!(rides -> users (driver_id));
diesel::joinable!(bookings -> rides (ride_id));
diesel::joinable!(bookings -> users (passenger_id));

diesel::allow_tables_to_appear_in_same_query!(users, rides, bookings, reviews);
