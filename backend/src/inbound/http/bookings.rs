//! Booking API handlers.
//!
//! ```text
//! POST   /api/v1/bookings {"rideId":10,"seats":2}
//! GET    /api/v1/bookings/mine
//! DELETE /api/v1/bookings/{id}
//! ```

use actix_web::{HttpResponse, delete, get, post, web};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::domain::{
    Booking, BookingId, BookingRequest, DATE_FORMAT, Error, MAX_SEATS, PassengerBooking, RideId,
    SeatCount, TIME_FORMAT,
};

use super::ApiResult;
use super::auth::AuthenticatedUser;
use super::schemas::ErrorSchema;
use super::state::HttpState;

/// Body of `POST /api/v1/bookings`; `seats` defaults to one.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct CreateBookingRequest {
    #[schema(example = 10)]
    pub ride_id: Option<i64>,
    #[schema(example = 1)]
    pub seats: Option<u32>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookingResponse {
    pub id: i64,
    pub ride_id: i64,
    pub passenger_id: i64,
    pub seats_booked: u32,
    #[schema(example = "confirmed")]
    pub status: String,
    #[schema(value_type = String, example = "2026-03-01T08:30:00")]
    pub created_at: NaiveDateTime,
}

impl From<Booking> for BookingResponse {
    fn from(booking: Booking) -> Self {
        Self {
            id: booking.id.as_i64(),
            ride_id: booking.ride_id.as_i64(),
            passenger_id: booking.passenger_id.as_i64(),
            seats_booked: booking.seats_booked,
            status: booking.status.as_str().to_owned(),
            created_at: booking.created_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BookingCreatedResponse {
    #[schema(example = "Ride booked successfully!")]
    pub message: String,
    pub booking: BookingResponse,
}

/// A passenger's booking with the ride and driver it belongs to.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PassengerBookingResponse {
    #[serde(flatten)]
    pub booking: BookingResponse,
    pub origin: String,
    pub destination: String,
    pub departure_date: String,
    pub departure_time: String,
    pub price: f64,
    pub car_model: Option<String>,
    pub car_color: Option<String>,
    pub ride_status: String,
    pub driver_name: String,
    pub driver_avatar: String,
    #[schema(example = 4.9)]
    pub driver_rating: f64,
    pub driver_phone: Option<String>,
}

impl From<PassengerBooking> for PassengerBookingResponse {
    fn from(entry: PassengerBooking) -> Self {
        Self {
            booking: entry.booking.into(),
            departure_date: entry.departure_date.format(DATE_FORMAT).to_string(),
            departure_time: entry.departure_time.format(TIME_FORMAT).to_string(),
            origin: entry.origin,
            destination: entry.destination,
            price: entry.price,
            car_model: entry.car_model,
            car_color: entry.car_color,
            ride_status: entry.ride_status.as_str().to_owned(),
            driver_name: entry.driver_name.as_str().to_owned(),
            driver_avatar: entry.driver_avatar.as_str().to_owned(),
            driver_rating: entry.driver_rating,
            driver_phone: entry.driver_phone.map(|phone| phone.as_str().to_owned()),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookingCancelledResponse {
    #[schema(example = "Booking cancelled successfully.")]
    pub message: String,
    pub booking_id: i64,
    pub ride_id: i64,
    pub seats_restored: u32,
}

fn booking_request(
    caller: AuthenticatedUser,
    body: CreateBookingRequest,
) -> Result<BookingRequest, Error> {
    let ride_id = body.ride_id.ok_or_else(|| {
        Error::invalid_request("Ride ID is required.").with_details(json!({ "field": "rideId" }))
    })?;
    let seats = match body.seats {
        None => SeatCount::ONE,
        Some(requested) => SeatCount::new(requested).map_err(|_| {
            Error::invalid_request(format!("Seats must be between 1 and {MAX_SEATS}."))
                .with_details(json!({ "field": "seats" }))
        })?,
    };
    Ok(BookingRequest {
        ride_id: RideId::new(ride_id),
        passenger_id: caller.id(),
        seats,
    })
}

/// Reserve seats on a ride.
#[utoipa::path(
    post,
    path = "/api/v1/bookings",
    request_body = CreateBookingRequest,
    responses(
        (status = 201, description = "Seats reserved", body = BookingCreatedResponse),
        (status = 400, description = "Own ride, duplicate booking or not enough seats", body = ErrorSchema),
        (status = 401, description = "Missing or invalid token", body = ErrorSchema),
        (status = 404, description = "Ride not found or no longer active", body = ErrorSchema),
        (status = 503, description = "Store busy, retry", body = ErrorSchema)
    ),
    tags = ["bookings"],
    operation_id = "createBooking"
)]
#[post("/bookings")]
pub async fn create_booking(
    state: web::Data<HttpState>,
    caller: AuthenticatedUser,
    payload: web::Json<CreateBookingRequest>,
) -> ApiResult<HttpResponse> {
    let request = booking_request(caller, payload.into_inner())?;
    let booking = state.bookings.create_booking(request).await?;
    Ok(HttpResponse::Created().json(BookingCreatedResponse {
        message: "Ride booked successfully!".to_owned(),
        booking: booking.into(),
    }))
}

/// The caller's bookings, latest departure first.
#[utoipa::path(
    get,
    path = "/api/v1/bookings/mine",
    responses(
        (status = 200, description = "Bookings of any status", body = [PassengerBookingResponse]),
        (status = 401, description = "Missing or invalid token", body = ErrorSchema)
    ),
    tags = ["bookings"],
    operation_id = "myBookings"
)]
#[get("/bookings/mine")]
pub async fn my_bookings(
    state: web::Data<HttpState>,
    caller: AuthenticatedUser,
) -> ApiResult<web::Json<Vec<PassengerBookingResponse>>> {
    let bookings = state.booking_query.bookings_for_passenger(caller.id()).await?;
    Ok(web::Json(bookings.into_iter().map(Into::into).collect()))
}

/// Cancel one of the caller's confirmed bookings.
#[utoipa::path(
    delete,
    path = "/api/v1/bookings/{id}",
    params(("id" = i64, Path, description = "Booking identifier")),
    responses(
        (status = 200, description = "Booking cancelled", body = BookingCancelledResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorSchema),
        (status = 404, description = "Booking not found or already cancelled", body = ErrorSchema),
        (status = 503, description = "Store busy, retry", body = ErrorSchema)
    ),
    tags = ["bookings"],
    operation_id = "cancelBooking"
)]
#[delete("/bookings/{id}")]
pub async fn cancel_booking(
    state: web::Data<HttpState>,
    caller: AuthenticatedUser,
    path: web::Path<i64>,
) -> ApiResult<web::Json<BookingCancelledResponse>> {
    let cancelled = state
        .bookings
        .cancel_booking(BookingId::new(path.into_inner()), caller.id())
        .await?;
    Ok(web::Json(BookingCancelledResponse {
        message: "Booking cancelled successfully.".to_owned(),
        booking_id: cancelled.booking_id.as_i64(),
        ride_id: cancelled.ride_id.as_i64(),
        seats_restored: cancelled.seats_restored,
    }))
}

#[cfg(test)]
#[path = "bookings_tests.rs"]
mod tests;
