//! Booking engine behaviour against a real SQLite store.
//!
//! Every scenario goes through the domain services and the Diesel adapters,
//! then re-reads the ride to check that
//! `seats_available + confirmed seats == seat_capacity` still holds.

mod support;

use rideshare::domain::ports::{AccountQuery, BookingCommand, BookingQuery, RideQuery};
use rideshare::domain::{
    BookingRequest, BookingStatus, ErrorCode, RideId, RideStatus, SeatCount, UserId,
};
use rstest::rstest;

use support::TestStore;

async fn seats_left(store: &TestStore, ride_id: RideId) -> u32 {
    store
        .rides()
        .details(ride_id)
        .await
        .expect("ride details")
        .listing
        .ride
        .seats_available
}

async fn assert_seat_invariant(store: &TestStore, ride_id: RideId) {
    let details = store.rides().details(ride_id).await.expect("ride details");
    let booked: u32 = details.passengers.iter().map(|p| p.seats_booked).sum();
    let ride = details.listing.ride;
    assert_eq!(
        ride.seats_available + booked,
        ride.seat_capacity,
        "seat counter drifted from confirmed bookings"
    );
}

async fn trips(store: &TestStore, user: UserId) -> u32 {
    store
        .accounts()
        .profile(user)
        .await
        .expect("profile")
        .trips_count
}

fn request(ride_id: RideId, passenger: UserId, seats: u32) -> BookingRequest {
    BookingRequest {
        ride_id,
        passenger_id: passenger,
        seats: SeatCount::new(seats).expect("valid seat count"),
    }
}

#[tokio::test]
async fn seats_are_taken_and_returned() {
    let store = TestStore::new().await;
    let driver = store.register("Dana").await.user;
    let first = store.register("Priya").await.user;
    let second = store.register("Omar").await.user;
    let third = store.register("Lena").await.user;
    let ride = store
        .offer(driver.id, "Leeds", "York", "2026-11-02", 3)
        .await;
    let bookings = store.bookings();

    let booking = bookings
        .create_booking(request(ride.id, first.id, 2))
        .await
        .expect("two seats fit");
    bookings
        .create_booking(request(ride.id, second.id, 1))
        .await
        .expect("last seat fits");
    assert_eq!(seats_left(&store, ride.id).await, 0);

    let refused = bookings
        .create_booking(request(ride.id, third.id, 1))
        .await
        .expect_err("ride is full");
    assert_eq!(refused.code(), ErrorCode::InvalidRequest);
    assert_eq!(refused.message(), "Not enough seats available.");

    let cancelled = bookings
        .cancel_booking(booking.id, first.id)
        .await
        .expect("passenger cancels");
    assert_eq!(cancelled.seats_restored, 2);
    assert_eq!(seats_left(&store, ride.id).await, 2);
    assert_seat_invariant(&store, ride.id).await;
}

#[tokio::test]
async fn drivers_cannot_book_their_own_ride() {
    let store = TestStore::new().await;
    let driver = store.register("Dana").await.user;
    let ride = store
        .offer(driver.id, "Leeds", "York", "2026-11-02", 3)
        .await;

    let error = store
        .bookings()
        .create_booking(request(ride.id, driver.id, 1))
        .await
        .expect_err("own ride");

    assert_eq!(error.message(), "You can't book your own ride.");
    assert_eq!(seats_left(&store, ride.id).await, 3);
}

#[tokio::test]
async fn a_passenger_holds_one_booking_per_ride() {
    let store = TestStore::new().await;
    let driver = store.register("Dana").await.user;
    let passenger = store.register("Priya").await.user;
    let ride = store
        .offer(driver.id, "Leeds", "York", "2026-11-02", 3)
        .await;
    let bookings = store.bookings();

    bookings
        .create_booking(request(ride.id, passenger.id, 1))
        .await
        .expect("first booking");
    let error = bookings
        .create_booking(request(ride.id, passenger.id, 1))
        .await
        .expect_err("duplicate booking");

    assert_eq!(error.message(), "You already have a booking for this ride.");
    assert_eq!(seats_left(&store, ride.id).await, 2);
}

#[tokio::test]
async fn a_cancelled_booking_frees_the_passenger_to_rebook() {
    let store = TestStore::new().await;
    let driver = store.register("Dana").await.user;
    let passenger = store.register("Priya").await.user;
    let ride = store
        .offer(driver.id, "Leeds", "York", "2026-11-02", 3)
        .await;
    let bookings = store.bookings();

    let booking = bookings
        .create_booking(request(ride.id, passenger.id, 1))
        .await
        .expect("first booking");
    bookings
        .cancel_booking(booking.id, passenger.id)
        .await
        .expect("cancel");
    bookings
        .create_booking(request(ride.id, passenger.id, 2))
        .await
        .expect("rebooking after cancel");

    assert_eq!(seats_left(&store, ride.id).await, 1);
    assert_seat_invariant(&store, ride.id).await;
}

#[tokio::test]
async fn cancelling_twice_restores_seats_once() {
    let store = TestStore::new().await;
    let driver = store.register("Dana").await.user;
    let passenger = store.register("Priya").await.user;
    let ride = store
        .offer(driver.id, "Leeds", "York", "2026-11-02", 3)
        .await;
    let bookings = store.bookings();
    let booking = bookings
        .create_booking(request(ride.id, passenger.id, 2))
        .await
        .expect("booking");

    bookings
        .cancel_booking(booking.id, passenger.id)
        .await
        .expect("first cancel");
    let error = bookings
        .cancel_booking(booking.id, passenger.id)
        .await
        .expect_err("second cancel");

    assert_eq!(error.message(), "Booking is already cancelled.");
    assert_eq!(seats_left(&store, ride.id).await, 3);
}

#[tokio::test]
async fn only_the_passenger_may_cancel_a_booking() {
    let store = TestStore::new().await;
    let driver = store.register("Dana").await.user;
    let passenger = store.register("Priya").await.user;
    let ride = store
        .offer(driver.id, "Leeds", "York", "2026-11-02", 3)
        .await;
    let bookings = store.bookings();
    let booking = bookings
        .create_booking(request(ride.id, passenger.id, 1))
        .await
        .expect("booking");

    let error = bookings
        .cancel_booking(booking.id, driver.id)
        .await
        .expect_err("not the passenger");

    assert_eq!(error.code(), ErrorCode::NotFound);
    assert_eq!(seats_left(&store, ride.id).await, 2);
}

#[tokio::test]
async fn cancelling_a_ride_cascades_to_its_bookings() {
    let store = TestStore::new().await;
    let driver = store.register("Dana").await.user;
    let first = store.register("Priya").await.user;
    let second = store.register("Omar").await.user;
    let ride = store
        .offer(driver.id, "Leeds", "York", "2026-11-02", 4)
        .await;
    let bookings = store.bookings();
    bookings
        .create_booking(request(ride.id, first.id, 2))
        .await
        .expect("first booking");
    bookings
        .create_booking(request(ride.id, second.id, 1))
        .await
        .expect("second booking");

    let outcome = bookings
        .cancel_ride(ride.id, driver.id)
        .await
        .expect("driver cancels");

    assert_eq!(outcome.bookings_cancelled, 2);
    assert_eq!(outcome.seats_restored, 3);
    let passenger_view = bookings
        .bookings_for_passenger(first.id)
        .await
        .expect("passenger bookings");
    assert_eq!(passenger_view.len(), 1);
    assert_eq!(passenger_view[0].booking.status, BookingStatus::Cancelled);
    assert_eq!(passenger_view[0].ride_status, RideStatus::Cancelled);

    let listed = store.rides().list_active().await.expect("active rides");
    assert!(listed.iter().all(|listing| listing.ride.id != ride.id));

    let late = bookings
        .create_booking(request(ride.id, store.register("Lena").await.user.id, 1))
        .await
        .expect_err("cancelled ride");
    assert_eq!(late.message(), "Ride not found or no longer active.");
}

#[rstest]
#[case::stranger(false)]
#[case::twice(true)]
#[tokio::test]
async fn ride_cancellation_is_guarded(#[case] cancel_first: bool) {
    let store = TestStore::new().await;
    let driver = store.register("Dana").await.user;
    let stranger = store.register("Priya").await.user;
    let ride = store
        .offer(driver.id, "Leeds", "York", "2026-11-02", 2)
        .await;
    let bookings = store.bookings();

    let requester = if cancel_first {
        bookings
            .cancel_ride(ride.id, driver.id)
            .await
            .expect("first cancel");
        driver.id
    } else {
        stranger.id
    };
    let error = bookings
        .cancel_ride(ride.id, requester)
        .await
        .expect_err("guarded");

    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[tokio::test]
async fn passenger_listing_carries_ride_and_driver() {
    let store = TestStore::new().await;
    let driver = store.register("Dana").await.user;
    let passenger = store.register("Priya").await.user;
    let ride = store
        .offer(driver.id, "Leeds", "York", "2026-11-02", 3)
        .await;
    store
        .bookings()
        .create_booking(request(ride.id, passenger.id, 1))
        .await
        .expect("booking");

    let listed = store
        .bookings()
        .bookings_for_passenger(passenger.id)
        .await
        .expect("listing");

    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].origin, "Leeds");
    assert_eq!(listed[0].driver_name.as_str(), "Dana");
    assert!((listed[0].driver_rating - 5.0).abs() < f64::EPSILON);
    assert_eq!(listed[0].booking.seats_booked, 1);
}

#[tokio::test]
async fn unknown_ride_cannot_be_booked() {
    let store = TestStore::new().await;
    let passenger = store.register("Priya").await.user;

    let error = store
        .bookings()
        .create_booking(request(RideId::new(999), passenger.id, 1))
        .await
        .expect_err("no such ride");

    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[tokio::test]
async fn confirmed_bookings_count_a_trip_for_both_riders() {
    let store = TestStore::new().await;
    let driver = store.register("Dana").await.user;
    let passenger = store.register("Priya").await.user;
    let ride = store
        .offer(driver.id, "Leeds", "York", "2026-11-02", 2)
        .await;
    let bookings = store.bookings();

    let own_ride = bookings
        .create_booking(request(ride.id, driver.id, 1))
        .await
        .expect_err("drivers cannot book their own ride");
    assert_eq!(own_ride.code(), ErrorCode::InvalidRequest);
    let too_many = bookings
        .create_booking(request(ride.id, passenger.id, 3))
        .await
        .expect_err("only two seats offered");
    assert_eq!(too_many.message(), "Not enough seats available.");
    assert_eq!(trips(&store, driver.id).await, 0);
    assert_eq!(trips(&store, passenger.id).await, 0);

    bookings
        .create_booking(request(ride.id, passenger.id, 2))
        .await
        .expect("booking confirmed");

    assert_eq!(trips(&store, driver.id).await, 1);
    assert_eq!(trips(&store, passenger.id).await, 1);
    assert_seat_invariant(&store, ride.id).await;
}
