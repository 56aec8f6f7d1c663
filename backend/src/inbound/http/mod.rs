//! HTTP inbound adapter exposing the REST API.

use actix_web::web;

pub mod accounts;
pub mod auth;
pub mod bookings;
pub mod error;
pub mod health;
pub mod reviews;
pub mod rides;
pub mod schemas;
pub mod state;
#[cfg(test)]
pub mod test_utils;

pub use error::ApiResult;

/// Register every `/api/v1` handler and extractor configuration.
///
/// Fixed ride paths are registered before `/rides/{id}` so they are not
/// captured by the identifier route.
///
/// # Examples
/// ```
/// use actix_web::{App, web};
/// use rideshare::inbound::http::configure_api;
///
/// let _app = App::new().service(web::scope("/api/v1").configure(configure_api));
/// ```
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.app_data(error::json_config())
        .app_data(error::path_config())
        .app_data(error::query_config())
        .service(accounts::register)
        .service(accounts::login)
        .service(accounts::current_user)
        .service(accounts::update_profile)
        .service(rides::list_rides)
        .service(rides::search_rides)
        .service(rides::my_rides)
        .service(rides::ride_details)
        .service(rides::create_ride)
        .service(rides::cancel_ride)
        .service(bookings::create_booking)
        .service(bookings::my_bookings)
        .service(bookings::cancel_booking)
        .service(reviews::create_review);
}
