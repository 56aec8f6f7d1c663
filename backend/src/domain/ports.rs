//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driving ports (`*Command`, `*Query`) are called by inbound adapters.
//! Driven ports (`*Repository`, [`PasswordHasher`], [`TokenCodec`]) are
//! implemented by outbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod account_command;
mod account_query;
mod booking_command;
mod booking_query;
mod booking_repository;
mod demo_data_seed_repository;
mod password_hasher;
mod review_command;
mod review_repository;
mod ride_command;
mod ride_query;
mod ride_repository;
mod token_codec;
mod user_repository;

#[cfg(test)]
pub use account_command::MockAccountCommand;
pub use account_command::AccountCommand;
#[cfg(test)]
pub use account_query::MockAccountQuery;
pub use account_query::AccountQuery;
#[cfg(test)]
pub use booking_command::MockBookingCommand;
pub use booking_command::BookingCommand;
#[cfg(test)]
pub use booking_query::MockBookingQuery;
pub use booking_query::BookingQuery;
#[cfg(test)]
pub use booking_repository::MockBookingRepository;
pub use booking_repository::{BookingRepository, BookingRepositoryError};
#[cfg(test)]
pub use demo_data_seed_repository::MockDemoDataSeedRepository;
pub use demo_data_seed_repository::{
    DemoDataSeed, DemoDataSeedRepository, DemoDataSeedRepositoryError, DemoRide, DemoUser,
    SeedingResult,
};
#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
pub use password_hasher::{PasswordHashError, PasswordHasher};
#[cfg(test)]
pub use review_command::MockReviewCommand;
pub use review_command::ReviewCommand;
#[cfg(test)]
pub use review_repository::MockReviewRepository;
pub use review_repository::{ReviewRepository, ReviewRepositoryError};
#[cfg(test)]
pub use ride_command::MockRideCommand;
pub use ride_command::RideCommand;
#[cfg(test)]
pub use ride_query::MockRideQuery;
pub use ride_query::RideQuery;
#[cfg(test)]
pub use ride_repository::MockRideRepository;
pub use ride_repository::{RideRepository, RideRepositoryError};
#[cfg(test)]
pub use token_codec::MockTokenCodec;
pub use token_codec::{TokenCodec, TokenError};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{NewUser, UserCredentials, UserPersistenceError, UserRepository};
