//! Builders wiring Diesel repositories into the HTTP port bundle.

use std::sync::Arc;

use mockable::DefaultClock;

use rideshare::domain::ports::{
    AccountCommand, AccountQuery, BookingCommand, BookingQuery, RideCommand, RideQuery,
    TokenCodec,
};
use rideshare::domain::{AccountService, BookingService, ReviewService, RideService};
use rideshare::inbound::http::state::HttpState;
use rideshare::outbound::persistence::{
    DbPool, DieselBookingRepository, DieselReviewRepository, DieselRideRepository,
    DieselUserRepository,
};
use rideshare::outbound::security::{Argon2PasswordHasher, JwtCodec};

use super::ServerConfig;

/// Share one service value behind both its command and query ports.
fn service_pair<S, Cmd, Query>(
    service: S,
    cast: fn(Arc<S>) -> (Arc<Cmd>, Arc<Query>),
) -> (Arc<Cmd>, Arc<Query>)
where
    Cmd: ?Sized,
    Query: ?Sized,
{
    cast(Arc::new(service))
}

fn build_token_codec(config: &ServerConfig) -> Arc<JwtCodec> {
    Arc::new(JwtCodec::new(
        config.jwt_secret.as_slice(),
        config.token_ttl,
        Arc::new(DefaultClock),
    ))
}

fn build_account_pair(
    pool: &DbPool,
    tokens: Arc<JwtCodec>,
) -> (Arc<dyn AccountCommand>, Arc<dyn AccountQuery>) {
    service_pair(
        AccountService::new(
            Arc::new(DieselUserRepository::new(pool.clone())),
            Arc::new(Argon2PasswordHasher::new()),
            tokens,
        ),
        |service| {
            (
                service.clone() as Arc<dyn AccountCommand>,
                service as Arc<dyn AccountQuery>,
            )
        },
    )
}

fn build_ride_pair(pool: &DbPool) -> (Arc<dyn RideCommand>, Arc<dyn RideQuery>) {
    service_pair(
        RideService::new(Arc::new(DieselRideRepository::new(pool.clone()))),
        |service| {
            (
                service.clone() as Arc<dyn RideCommand>,
                service as Arc<dyn RideQuery>,
            )
        },
    )
}

fn build_booking_pair(pool: &DbPool) -> (Arc<dyn BookingCommand>, Arc<dyn BookingQuery>) {
    service_pair(
        BookingService::new(Arc::new(DieselBookingRepository::new(pool.clone()))),
        |service| {
            (
                service.clone() as Arc<dyn BookingCommand>,
                service as Arc<dyn BookingQuery>,
            )
        },
    )
}

/// Assemble every port the handlers need over the shared pool.
pub(super) fn build_http_state(config: &ServerConfig) -> HttpState {
    let pool = &config.db_pool;
    let tokens = build_token_codec(config);
    let (accounts, account_query) = build_account_pair(pool, tokens.clone());
    let (rides, ride_query) = build_ride_pair(pool);
    let (bookings, booking_query) = build_booking_pair(pool);

    HttpState {
        accounts,
        account_query,
        rides,
        ride_query,
        bookings,
        booking_query,
        reviews: Arc::new(ReviewService::new(Arc::new(DieselReviewRepository::new(
            pool.clone(),
        )))),
        tokens: tokens as Arc<dyn TokenCodec>,
    }
}
