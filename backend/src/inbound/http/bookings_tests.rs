//! Tests for booking API handlers.

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::test as actix_test;
use chrono::{NaiveDate, NaiveTime};
use rstest::rstest;
use serde_json::{Value, json};

use super::*;
use crate::domain::ports::{MockBookingCommand, MockBookingQuery};
use crate::domain::{
    Avatar, BookingRejection, BookingStatus, CancelledBooking, RideStatus, UserId, UserName,
};
use crate::inbound::http::test_utils::{bearer, state_with, test_app, timestamp};

async fn send(state: HttpState, req: actix_test::TestRequest) -> (StatusCode, Value) {
    let app = actix_test::init_service(test_app(state)).await;
    let res = actix_test::call_service(&app, req.to_request()).await;
    let status = res.status();
    (status, actix_test::read_body_json(res).await)
}

fn confirmed(request: &BookingRequest) -> Booking {
    Booking {
        id: BookingId::new(5),
        ride_id: request.ride_id,
        passenger_id: request.passenger_id,
        seats_booked: request.seats.get(),
        status: BookingStatus::Confirmed,
        created_at: timestamp(),
    }
}

fn post_booking(payload: Value) -> actix_test::TestRequest {
    actix_test::TestRequest::post()
        .uri("/api/v1/bookings")
        .insert_header(bearer(2))
        .set_json(payload)
}

#[rstest]
#[case(json!({"rideId": 10}), 1)]
#[case(json!({"rideId": 10, "seats": 2}), 2)]
#[actix_web::test]
async fn booking_reserves_the_requested_seats(#[case] payload: Value, #[case] seats: u32) {
    let mut bookings = MockBookingCommand::new();
    bookings
        .expect_create_booking()
        .withf(move |request| {
            request.ride_id == RideId::new(10)
                && request.passenger_id == UserId::new(2)
                && request.seats.get() == seats
        })
        .return_once(|request| Ok(confirmed(&request)));
    let state = state_with(|state| state.bookings = Arc::new(bookings));

    let (status, body) = send(state, post_booking(payload)).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Ride booked successfully!");
    assert_eq!(body["booking"]["seatsBooked"], seats);
    assert_eq!(body["booking"]["status"], "confirmed");
}

#[actix_web::test]
async fn booking_requires_a_ride_id() {
    let (status, body) = send(state_with(|_| {}), post_booking(json!({"seats": 1}))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Ride ID is required.");
}

#[rstest]
#[case(0)]
#[case(17)]
#[actix_web::test]
async fn seat_requests_outside_the_range_are_rejected(#[case] seats: u32) {
    let (status, body) = send(
        state_with(|_| {}),
        post_booking(json!({"rideId": 10, "seats": seats})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"]["field"], "seats");
}

#[rstest]
#[case(BookingRejection::RideUnavailable, StatusCode::NOT_FOUND, "Ride not found or no longer active.")]
#[case(BookingRejection::OwnRide, StatusCode::BAD_REQUEST, "You can't book your own ride.")]
#[case(BookingRejection::AlreadyBooked, StatusCode::BAD_REQUEST, "You already have a booking for this ride.")]
#[case(
    BookingRejection::NotEnoughSeats { requested: 2, available: 1 },
    StatusCode::BAD_REQUEST,
    "Not enough seats available."
)]
#[actix_web::test]
async fn booking_rejections_keep_their_reason(
    #[case] rejection: BookingRejection,
    #[case] expected_status: StatusCode,
    #[case] message: &str,
) {
    let mut bookings = MockBookingCommand::new();
    bookings
        .expect_create_booking()
        .return_once(move |_| Err(rejection.into()));
    let state = state_with(|state| state.bookings = Arc::new(bookings));

    let (status, body) = send(state, post_booking(json!({"rideId": 10}))).await;

    assert_eq!(status, expected_status);
    assert_eq!(body["message"], message);
}

#[actix_web::test]
async fn busy_stores_surface_as_retryable() {
    let mut bookings = MockBookingCommand::new();
    bookings
        .expect_create_booking()
        .return_once(|_| Err(Error::service_unavailable("booking store unavailable: database is busy")));
    let state = state_with(|state| state.bookings = Arc::new(bookings));

    let (status, body) = send(state, post_booking(json!({"rideId": 10}))).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["code"], "service_unavailable");
}

#[actix_web::test]
async fn my_bookings_join_ride_and_driver() {
    let mut query = MockBookingQuery::new();
    query
        .expect_bookings_for_passenger()
        .withf(|id| *id == UserId::new(2))
        .return_once(|_| {
            Ok(vec![PassengerBooking {
                booking: Booking {
                    id: BookingId::new(5),
                    ride_id: RideId::new(10),
                    passenger_id: UserId::new(2),
                    seats_booked: 1,
                    status: BookingStatus::Cancelled,
                    created_at: timestamp(),
                },
                origin: "Chicago".to_owned(),
                destination: "Detroit".to_owned(),
                departure_date: NaiveDate::from_ymd_opt(2026, 3, 20).expect("valid date"),
                departure_time: NaiveTime::from_hms_opt(17, 45, 0).expect("valid time"),
                price: 30.0,
                car_model: None,
                car_color: None,
                ride_status: RideStatus::Cancelled,
                driver_name: UserName::new("Emily Davis").expect("valid name"),
                driver_avatar: Avatar::new("👱"),
                driver_rating: 4.7,
                driver_phone: None,
            }])
        });
    let state = state_with(|state| state.booking_query = Arc::new(query));

    let (status, body) = send(
        state,
        actix_test::TestRequest::get()
            .uri("/api/v1/bookings/mine")
            .insert_header(bearer(2)),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["status"], "cancelled");
    assert_eq!(body[0]["rideStatus"], "cancelled");
    assert_eq!(body[0]["departureTime"], "17:45");
    assert_eq!(body[0]["driverName"], "Emily Davis");
    assert_eq!(body[0]["driverRating"], 4.7);
}

#[actix_web::test]
async fn cancelling_restores_seats() {
    let mut bookings = MockBookingCommand::new();
    bookings
        .expect_cancel_booking()
        .withf(|booking, requester| *booking == BookingId::new(5) && *requester == UserId::new(2))
        .return_once(|booking_id, _| {
            Ok(CancelledBooking {
                booking_id,
                ride_id: RideId::new(10),
                seats_restored: 2,
            })
        });
    let state = state_with(|state| state.bookings = Arc::new(bookings));

    let (status, body) = send(
        state,
        actix_test::TestRequest::delete()
            .uri("/api/v1/bookings/5")
            .insert_header(bearer(2)),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Booking cancelled successfully.");
    assert_eq!(body["seatsRestored"], 2);
}

#[actix_web::test]
async fn cancelling_twice_is_not_found() {
    let mut bookings = MockBookingCommand::new();
    bookings
        .expect_cancel_booking()
        .return_once(|_, _| Err(BookingRejection::BookingAlreadyCancelled.into()));
    let state = state_with(|state| state.bookings = Arc::new(bookings));

    let (status, body) = send(
        state,
        actix_test::TestRequest::delete()
            .uri("/api/v1/bookings/5")
            .insert_header(bearer(2)),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Booking is already cancelled.");
}
