//! Test helpers for inbound HTTP components.
//!
//! Every port starts as a mock with no expectations, so any call the test did
//! not arrange fails loudly. The token codec accepts `token-<id>` and rejects
//! everything else.

use std::sync::Arc;

use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::http::header::AUTHORIZATION;
use actix_web::{App, web};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::domain::ports::{
    MockAccountCommand, MockAccountQuery, MockBookingCommand, MockBookingQuery,
    MockReviewCommand, MockRideCommand, MockRideQuery, MockTokenCodec, TokenError,
};
use crate::domain::{
    Avatar, DriverSummary, EmailAddress, PhoneNumber, Ride, RideId, RideListing, RideStatus,
    User, UserId, UserName,
};

use super::configure_api;
use super::state::HttpState;

/// Codec resolving `token-<id>` to `UserId(id)`.
pub fn accepting_tokens() -> MockTokenCodec {
    let mut tokens = MockTokenCodec::new();
    tokens.expect_verify().returning(|token| {
        token
            .strip_prefix("token-")
            .and_then(|id| id.parse::<i64>().ok())
            .map(UserId::new)
            .ok_or_else(|| TokenError::invalid("unknown test token"))
    });
    tokens
}

/// `Authorization` header for the given user id.
pub fn bearer(user_id: i64) -> (actix_web::http::header::HeaderName, String) {
    (AUTHORIZATION, format!("Bearer token-{user_id}"))
}

/// State built from bare mocks, then adjusted by `configure`.
pub fn state_with(configure: impl FnOnce(&mut HttpState)) -> HttpState {
    let mut state = HttpState {
        accounts: Arc::new(MockAccountCommand::new()),
        account_query: Arc::new(MockAccountQuery::new()),
        rides: Arc::new(MockRideCommand::new()),
        ride_query: Arc::new(MockRideQuery::new()),
        bookings: Arc::new(MockBookingCommand::new()),
        booking_query: Arc::new(MockBookingQuery::new()),
        reviews: Arc::new(MockReviewCommand::new()),
        tokens: Arc::new(accepting_tokens()),
    };
    configure(&mut state);
    state
}

/// Application serving the `/api/v1` routes over `state`.
pub fn test_app(
    state: HttpState,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(state))
        .service(web::scope("/api/v1").configure(configure_api))
}

pub fn timestamp() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 3, 1)
        .and_then(|date| date.and_hms_opt(8, 30, 0))
        .expect("valid fixture timestamp")
}

pub fn sample_user(id: i64) -> User {
    User {
        id: UserId::new(id),
        name: UserName::new("Sarah Chen").expect("valid name"),
        email: EmailAddress::new("sarah@example.com").expect("valid email"),
        phone: Some(PhoneNumber::new("+44 7700 900123").expect("valid phone")),
        avatar: Avatar::new("👩"),
        rating: 4.8,
        trips_count: 12,
        created_at: timestamp(),
    }
}

pub fn sample_ride(id: i64, driver_id: i64) -> Ride {
    Ride {
        id: RideId::new(id),
        driver_id: UserId::new(driver_id),
        origin: "San Francisco".to_owned(),
        destination: "Los Angeles".to_owned(),
        departure_date: NaiveDate::from_ymd_opt(2026, 3, 15).expect("valid date"),
        departure_time: NaiveTime::from_hms_opt(8, 0, 0).expect("valid time"),
        seats_available: 3,
        seat_capacity: 3,
        price: 45.0,
        car_model: Some("Toyota Prius".to_owned()),
        car_color: Some("Silver".to_owned()),
        description: None,
        status: RideStatus::Active,
        created_at: timestamp(),
    }
}

pub fn sample_listing(id: i64, driver_id: i64) -> RideListing {
    let driver = sample_user(driver_id);
    RideListing {
        ride: sample_ride(id, driver_id),
        driver: DriverSummary {
            name: driver.name,
            avatar: driver.avatar,
            rating: driver.rating,
            trips_count: driver.trips_count,
            phone: None,
        },
    }
}
