//! Domain primitives, rules and services.
//!
//! Purpose: define strongly typed entities for riders, rides, bookings and
//! reviews, the rules that protect seat counts, and the services that drive
//! the ports. Nothing in this module depends on HTTP or SQL types.
//!
//! Public surface:
//! - Error / ErrorCode: API error payload and stable error identifiers.
//! - User, Ride, Booking, Review: aggregates and their identifiers.
//! - `authorise_*`: booking engine decisions applied inside store transactions.
//! - `*Service`: implementations of the driving ports.

pub mod account_service;
pub mod auth;
pub mod booking;
pub mod booking_service;
pub mod demo_data;
pub mod error;
pub mod ports;
pub mod review;
pub mod review_service;
pub mod ride;
pub mod ride_service;
pub mod trace_id;
pub mod user;

pub use self::account_service::AccountService;
pub use self::auth::{
    AccessToken, AuthSession, CredentialsValidationError, LoginCredentials, PASSWORD_MIN,
    PasswordDigest, Registration,
};
pub use self::booking::{
    Booking, BookingId, BookingRejection, BookingRequest, BookingSeats, BookingStatus,
    CancelledBooking, CancelledRide, PassengerBooking, RideSeats, authorise_booking,
    authorise_booking_cancellation, authorise_ride_cancellation,
};
pub use self::booking_service::BookingService;
pub use self::demo_data::{
    DemoDataSeedOutcome, DemoDataSeeder, DemoDataSeedingError, DemoFixture, DemoRideFixture,
    DemoUserFixture,
};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::review::{
    COMMENT_MAX, Rating, Review, ReviewDraft, ReviewId, ReviewValidationError,
};
pub use self::review_service::ReviewService;
pub use self::ride::{
    DATE_FORMAT, DriverSummary, MAX_SEATS, OfferedRide, RIDE_TEXT_MAX, Ride, RideDetails,
    RideDraft, RideDraftInput, RideId, RideListing, RidePassenger, RideSearch, RideStatus,
    RideValidationError, SeatCount, TIME_FORMAT, UnknownStatus, parse_departure_date,
    parse_departure_time,
};
pub use self::ride_service::{RIDE_LISTING_LIMIT, RideService};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{
    AVATARS, Avatar, DEFAULT_AVATAR, EmailAddress, PHONE_MAX, PhoneNumber, ProfileUpdate,
    USER_NAME_MAX, User, UserId, UserName, UserValidationError,
};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use rideshare::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
