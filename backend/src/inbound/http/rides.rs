//! Ride API handlers: discovery, publication and cancellation.
//!
//! ```text
//! GET    /api/v1/rides
//! GET    /api/v1/rides/search?origin=san&date=2026-03-15
//! GET    /api/v1/rides/mine
//! GET    /api/v1/rides/{id}
//! POST   /api/v1/rides
//! DELETE /api/v1/rides/{id}
//! ```

use actix_web::{HttpResponse, delete, get, post, web};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{
    DATE_FORMAT, DriverSummary, Error, OfferedRide, Ride, RideDetails, RideDraft, RideDraftInput,
    RideId, RideListing, RidePassenger, RideSearch, RideValidationError, TIME_FORMAT,
};

use super::ApiResult;
use super::auth::AuthenticatedUser;
use super::error::invalid_field;
use super::schemas::ErrorSchema;
use super::state::HttpState;

/// Body of `POST /api/v1/rides`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct CreateRideRequest {
    #[schema(example = "San Francisco")]
    pub origin: Option<String>,
    #[schema(example = "Los Angeles")]
    pub destination: Option<String>,
    #[schema(example = "2026-03-15")]
    pub departure_date: Option<String>,
    #[schema(example = "08:00")]
    pub departure_time: Option<String>,
    #[schema(example = 3)]
    pub seats: Option<u32>,
    #[schema(example = 45.0)]
    pub price: Option<f64>,
    pub car_model: Option<String>,
    pub car_color: Option<String>,
    pub description: Option<String>,
}

impl CreateRideRequest {
    fn to_draft(&self) -> Result<RideDraft, RideValidationError> {
        RideDraft::try_from_input(RideDraftInput {
            origin: self.origin.as_deref(),
            destination: self.destination.as_deref(),
            departure_date: self.departure_date.as_deref(),
            departure_time: self.departure_time.as_deref(),
            seats: self.seats,
            price: self.price,
            car_model: self.car_model.as_deref(),
            car_color: self.car_color.as_deref(),
            description: self.description.as_deref(),
        })
    }
}

/// Query string of `GET /api/v1/rides/search`. Blank values are ignored.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(default)]
#[into_params(parameter_in = Query)]
pub struct SearchQuery {
    /// Case-insensitive substring of the origin.
    pub origin: Option<String>,
    /// Case-insensitive substring of the destination.
    pub destination: Option<String>,
    /// Exact departure date, `YYYY-MM-DD`.
    pub date: Option<String>,
}

/// A ride as returned by the API.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RideResponse {
    pub id: i64,
    pub driver_id: i64,
    pub origin: String,
    pub destination: String,
    #[schema(example = "2026-03-15")]
    pub departure_date: String,
    #[schema(example = "08:00")]
    pub departure_time: String,
    pub seats_available: u32,
    pub seat_capacity: u32,
    pub price: f64,
    pub car_model: Option<String>,
    pub car_color: Option<String>,
    pub description: Option<String>,
    #[schema(example = "active")]
    pub status: String,
    #[schema(value_type = String, example = "2026-03-01T08:30:00")]
    pub created_at: NaiveDateTime,
}

impl From<Ride> for RideResponse {
    fn from(ride: Ride) -> Self {
        Self {
            id: ride.id.as_i64(),
            driver_id: ride.driver_id.as_i64(),
            departure_date: ride.departure_date.format(DATE_FORMAT).to_string(),
            departure_time: ride.departure_time.format(TIME_FORMAT).to_string(),
            origin: ride.origin,
            destination: ride.destination,
            seats_available: ride.seats_available,
            seat_capacity: ride.seat_capacity,
            price: ride.price,
            car_model: ride.car_model,
            car_color: ride.car_color,
            description: ride.description,
            status: ride.status.as_str().to_owned(),
            created_at: ride.created_at,
        }
    }
}

/// Driver shown alongside a ride. `phone` only appears on the details view.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DriverResponse {
    pub name: String,
    pub avatar: String,
    pub rating: f64,
    pub trips_count: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl From<DriverSummary> for DriverResponse {
    fn from(driver: DriverSummary) -> Self {
        Self {
            name: driver.name.as_str().to_owned(),
            avatar: driver.avatar.as_str().to_owned(),
            rating: driver.rating,
            trips_count: driver.trips_count,
            phone: driver.phone.map(|phone| phone.as_str().to_owned()),
        }
    }
}

/// A bookable ride with its driver.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RideListingResponse {
    #[serde(flatten)]
    pub ride: RideResponse,
    pub driver: DriverResponse,
}

impl From<RideListing> for RideListingResponse {
    fn from(listing: RideListing) -> Self {
        Self {
            ride: listing.ride.into(),
            driver: listing.driver.into(),
        }
    }
}

/// A confirmed passenger on a ride.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PassengerResponse {
    pub id: i64,
    pub name: String,
    pub avatar: String,
    pub seats_booked: u32,
}

impl From<RidePassenger> for PassengerResponse {
    fn from(passenger: RidePassenger) -> Self {
        Self {
            id: passenger.passenger_id.as_i64(),
            name: passenger.name.as_str().to_owned(),
            avatar: passenger.avatar.as_str().to_owned(),
            seats_booked: passenger.seats_booked,
        }
    }
}

/// One ride with driver contact details and its confirmed passengers.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RideDetailsResponse {
    #[serde(flatten)]
    pub listing: RideListingResponse,
    pub passengers: Vec<PassengerResponse>,
}

impl From<RideDetails> for RideDetailsResponse {
    fn from(details: RideDetails) -> Self {
        Self {
            listing: details.listing.into(),
            passengers: details.passengers.into_iter().map(Into::into).collect(),
        }
    }
}

/// A ride published by the caller with its confirmed seat total.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OfferedRideResponse {
    #[serde(flatten)]
    pub ride: RideResponse,
    pub booked_seats: u32,
}

impl From<OfferedRide> for OfferedRideResponse {
    fn from(offered: OfferedRide) -> Self {
        Self {
            ride: offered.ride.into(),
            booked_seats: offered.booked_seats,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RideCreatedResponse {
    #[schema(example = "Ride created successfully!")]
    pub message: String,
    pub ride: RideResponse,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RideCancelledResponse {
    #[schema(example = "Ride cancelled successfully.")]
    pub message: String,
    pub ride_id: i64,
    pub bookings_cancelled: u32,
    pub seats_restored: u32,
}

fn ride_field_error(err: RideValidationError) -> Error {
    invalid_field(err.field(), &err)
}

fn listings(rides: Vec<RideListing>) -> web::Json<Vec<RideListingResponse>> {
    web::Json(rides.into_iter().map(Into::into).collect())
}

/// Newest bookable rides.
#[utoipa::path(
    get,
    path = "/api/v1/rides",
    responses(
        (status = 200, description = "Up to 50 active rides with free seats", body = [RideListingResponse]),
        (status = 503, description = "Store busy", body = ErrorSchema)
    ),
    tags = ["rides"],
    operation_id = "listRides",
    security([])
)]
#[get("/rides")]
pub async fn list_rides(
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<Vec<RideListingResponse>>> {
    Ok(listings(state.ride_query.list_active().await?))
}

/// Filter bookable rides by route and date.
#[utoipa::path(
    get,
    path = "/api/v1/rides/search",
    params(SearchQuery),
    responses(
        (status = 200, description = "Matching rides ordered by departure", body = [RideListingResponse]),
        (status = 400, description = "Malformed date", body = ErrorSchema)
    ),
    tags = ["rides"],
    operation_id = "searchRides",
    security([])
)]
#[get("/rides/search")]
pub async fn search_rides(
    state: web::Data<HttpState>,
    query: web::Query<SearchQuery>,
) -> ApiResult<web::Json<Vec<RideListingResponse>>> {
    let SearchQuery {
        origin,
        destination,
        date,
    } = query.into_inner();
    let search = RideSearch::try_from_parts(
        origin.as_deref(),
        destination.as_deref(),
        date.as_deref(),
    )
    .map_err(|err| {
        Error::invalid_request("Date must use YYYY-MM-DD.")
            .with_details(serde_json::json!({ "field": "date", "reason": err.to_string() }))
    })?;
    Ok(listings(state.ride_query.search(search).await?))
}

/// Rides published by the caller, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/rides/mine",
    responses(
        (status = 200, description = "Offered rides with booked seat totals", body = [OfferedRideResponse]),
        (status = 401, description = "Missing or invalid token", body = ErrorSchema)
    ),
    tags = ["rides"],
    operation_id = "myRides"
)]
#[get("/rides/mine")]
pub async fn my_rides(
    state: web::Data<HttpState>,
    caller: AuthenticatedUser,
) -> ApiResult<web::Json<Vec<OfferedRideResponse>>> {
    let offered = state.ride_query.offered_by(caller.id()).await?;
    Ok(web::Json(offered.into_iter().map(Into::into).collect()))
}

/// One ride with driver contact details and confirmed passengers.
#[utoipa::path(
    get,
    path = "/api/v1/rides/{id}",
    params(("id" = i64, Path, description = "Ride identifier")),
    responses(
        (status = 200, description = "Ride details", body = RideDetailsResponse),
        (status = 404, description = "Ride not found", body = ErrorSchema)
    ),
    tags = ["rides"],
    operation_id = "getRide",
    security([])
)]
#[get("/rides/{id}")]
pub async fn ride_details(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
) -> ApiResult<web::Json<RideDetailsResponse>> {
    let details = state
        .ride_query
        .details(RideId::new(path.into_inner()))
        .await?;
    Ok(web::Json(details.into()))
}

/// Publish a ride with the caller as driver.
#[utoipa::path(
    post,
    path = "/api/v1/rides",
    request_body = CreateRideRequest,
    responses(
        (status = 201, description = "Ride published", body = RideCreatedResponse),
        (status = 400, description = "Missing or malformed field", body = ErrorSchema),
        (status = 401, description = "Missing or invalid token", body = ErrorSchema)
    ),
    tags = ["rides"],
    operation_id = "createRide"
)]
#[post("/rides")]
pub async fn create_ride(
    state: web::Data<HttpState>,
    caller: AuthenticatedUser,
    payload: web::Json<CreateRideRequest>,
) -> ApiResult<HttpResponse> {
    let draft = payload.to_draft().map_err(ride_field_error)?;
    let ride = state.rides.publish(caller.id(), draft).await?;
    Ok(HttpResponse::Created().json(RideCreatedResponse {
        message: "Ride created successfully!".to_owned(),
        ride: ride.into(),
    }))
}

/// Cancel one of the caller's rides together with all of its bookings.
#[utoipa::path(
    delete,
    path = "/api/v1/rides/{id}",
    params(("id" = i64, Path, description = "Ride identifier")),
    responses(
        (status = 200, description = "Ride cancelled", body = RideCancelledResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorSchema),
        (status = 404, description = "Ride not found, not owned or already cancelled", body = ErrorSchema),
        (status = 503, description = "Store busy, retry", body = ErrorSchema)
    ),
    tags = ["rides"],
    operation_id = "cancelRide"
)]
#[delete("/rides/{id}")]
pub async fn cancel_ride(
    state: web::Data<HttpState>,
    caller: AuthenticatedUser,
    path: web::Path<i64>,
) -> ApiResult<web::Json<RideCancelledResponse>> {
    let cancelled = state
        .bookings
        .cancel_ride(RideId::new(path.into_inner()), caller.id())
        .await?;
    Ok(web::Json(RideCancelledResponse {
        message: "Ride cancelled successfully.".to_owned(),
        ride_id: cancelled.ride_id.as_i64(),
        bookings_cancelled: cancelled.bookings_cancelled,
        seats_restored: cancelled.seats_restored,
    }))
}

#[cfg(test)]
#[path = "rides_tests.rs"]
mod tests;
