//! End-to-end tests for the booking/tour consistency rules, driven through
//! the service layer over in-memory stores.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use homestay_booking::config::StorageConfig;
use homestay_booking::models::{Booking, Homestay, Tour, TourStatus};
use homestay_booking::repository::Repository;
use homestay_booking::services::Services;
use homestay_booking::AppError;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Fresh services over empty in-memory stores (no backing files involved)
fn setup() -> (Repository, Services) {
    let storage = StorageConfig {
        homestays_file: "nonexistent/homestays.txt".to_string(),
        tours_file: "nonexistent/tours.txt".to_string(),
        bookings_file: "nonexistent/bookings.txt".to_string(),
    };
    let repository = Repository::new(&storage);
    let services = Services::new(repository.clone());
    (repository, services)
}

fn seed_homestay(repository: &Repository, id: &str, capacity: u32) {
    let homestay = Homestay::new(id, format!("Homestay {}", id), 3, "Test Address", capacity)
        .expect("valid homestay");
    assert!(repository.homestays.save(homestay));
}

fn tour(id: &str, homestay_id: &str, tourists: u32, dep: NaiveDate, end: NaiveDate) -> Tour {
    Tour::new(
        id,
        format!("Tour {}", id),
        "3 days 2 nights",
        Decimal::new(15000, 1),
        homestay_id,
        dep,
        end,
        tourists,
        false,
    )
    .expect("valid tour")
}

fn booking(id: &str, tour_id: &str, booking_date: NaiveDate) -> Booking {
    Booking::new(id, "Nguyen Van A", tour_id, booking_date, "0123456789").expect("valid booking")
}

// ---------------------------------------------------------------------------
// Tour creation
// ---------------------------------------------------------------------------

#[test]
fn overlapping_tour_on_same_homestay_is_rejected() {
    let (repository, services) = setup();
    seed_homestay(&repository, "HS0001", 10);

    services
        .tours
        .create_tour(tour("T00001", "HS0001", 10, date(2025, 12, 10), date(2025, 12, 12)))
        .expect("first tour fits");

    let err = services
        .tours
        .create_tour(tour("T00002", "HS0001", 5, date(2025, 12, 11), date(2025, 12, 13)))
        .unwrap_err();
    assert!(matches!(err, AppError::BusinessRule(_)));
    assert!(err.to_string().contains("T00001"));
    assert!(services.tours.get("T00002").is_err());
}

#[test]
fn touching_date_ranges_count_as_overlap() {
    let (repository, services) = setup();
    seed_homestay(&repository, "HS0001", 10);

    services
        .tours
        .create_tour(tour("T00001", "HS0001", 5, date(2025, 12, 10), date(2025, 12, 12)))
        .unwrap();

    // starts the day the first one ends: closed-interval conflict
    let err = services
        .tours
        .create_tour(tour("T00002", "HS0001", 5, date(2025, 12, 12), date(2025, 12, 14)))
        .unwrap_err();
    assert!(err.to_string().contains("overlap"));
}

#[test]
fn same_dates_on_another_homestay_are_fine() {
    let (repository, services) = setup();
    seed_homestay(&repository, "HS0001", 10);
    seed_homestay(&repository, "HS0002", 10);

    services
        .tours
        .create_tour(tour("T00001", "HS0001", 5, date(2025, 12, 10), date(2025, 12, 12)))
        .unwrap();
    services
        .tours
        .create_tour(tour("T00002", "HS0002", 5, date(2025, 12, 10), date(2025, 12, 12)))
        .expect("different homestay, no conflict");
}

#[test]
fn capacity_boundary_is_inclusive() {
    let (repository, services) = setup();
    seed_homestay(&repository, "HS0001", 10);

    // headcount equal to capacity is accepted
    services
        .tours
        .create_tour(tour("T00001", "HS0001", 10, date(2025, 12, 10), date(2025, 12, 12)))
        .expect("exact capacity fits");

    // one over is rejected, naming the limit
    let err = services
        .tours
        .create_tour(tour("T00002", "HS0001", 11, date(2026, 1, 10), date(2026, 1, 12)))
        .unwrap_err();
    assert!(err.to_string().contains("capacity (10)"));
}

#[test]
fn tour_for_unknown_homestay_is_rejected() {
    let (_repository, services) = setup();
    let err = services
        .tours
        .create_tour(tour("T00001", "HS9999", 5, date(2025, 12, 10), date(2025, 12, 12)))
        .unwrap_err();
    assert!(err.to_string().contains("HS9999"));
}

#[test]
fn duplicate_tour_id_is_rejected() {
    let (repository, services) = setup();
    seed_homestay(&repository, "HS0001", 10);

    services
        .tours
        .create_tour(tour("T00001", "HS0001", 5, date(2025, 12, 10), date(2025, 12, 12)))
        .unwrap();
    let err = services
        .tours
        .create_tour(tour("T00001", "HS0001", 5, date(2026, 1, 10), date(2026, 1, 12)))
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));
}

// ---------------------------------------------------------------------------
// Tour update
// ---------------------------------------------------------------------------

#[test]
fn update_rejects_moved_dates_that_collide_and_names_the_conflict() {
    let (repository, services) = setup();
    seed_homestay(&repository, "HS0001", 10);

    services
        .tours
        .create_tour(tour("T00001", "HS0001", 5, date(2025, 12, 1), date(2025, 12, 3)))
        .unwrap();
    services
        .tours
        .create_tour(tour("T00007", "HS0001", 5, date(2025, 12, 10), date(2025, 12, 12)))
        .unwrap();

    let old_tour = services.tours.get("T00001").unwrap();
    let mut moved = old_tour.clone();
    moved.departure_date = date(2025, 12, 11);
    moved.end_date = date(2025, 12, 13);

    let err = services.tours.update_tour(moved, &old_tour).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Business rule violation: Updated tour dates overlap with existing tour T00007"
    );
    // store unchanged on rejection
    assert_eq!(
        services.tours.get("T00001").unwrap().departure_date,
        date(2025, 12, 1)
    );
}

#[test]
fn update_without_date_change_skips_the_overlap_check() {
    let (repository, services) = setup();
    seed_homestay(&repository, "HS0001", 10);

    services
        .tours
        .create_tour(tour("T00001", "HS0001", 5, date(2025, 12, 1), date(2025, 12, 3)))
        .unwrap();

    let old_tour = services.tours.get("T00001").unwrap();
    let mut renamed = old_tour.clone();
    renamed.name = "Renamed Tour".to_string();
    renamed.price_per_person = Decimal::new(20000, 1);

    services.tours.update_tour(renamed, &old_tour).unwrap();
    assert_eq!(services.tours.get("T00001").unwrap().name, "Renamed Tour");
}

#[test]
fn update_rechecks_capacity() {
    let (repository, services) = setup();
    seed_homestay(&repository, "HS0001", 10);

    services
        .tours
        .create_tour(tour("T00001", "HS0001", 5, date(2025, 12, 1), date(2025, 12, 3)))
        .unwrap();

    let old_tour = services.tours.get("T00001").unwrap();
    let mut bigger = old_tour.clone();
    bigger.tourist_count = 11;

    let err = services.tours.update_tour(bigger, &old_tour).unwrap_err();
    assert!(err.to_string().contains("capacity"));
}

// ---------------------------------------------------------------------------
// Booking lifecycle (scenarios B, C, D)
// ---------------------------------------------------------------------------

#[test]
fn booking_marks_the_tour_booked_and_blocks_a_second_booking() {
    let (repository, services) = setup();
    seed_homestay(&repository, "HS0001", 10);
    services
        .tours
        .create_tour(tour("T00001", "HS0001", 10, date(2025, 12, 10), date(2025, 12, 12)))
        .unwrap();

    services
        .bookings
        .create_booking(booking("B00001", "T00001", date(2025, 12, 5)))
        .expect("booking fits");
    assert!(services.tours.get("T00001").unwrap().booked);

    let err = services
        .bookings
        .create_booking(booking("B00002", "T00001", date(2025, 12, 6)))
        .unwrap_err();
    assert!(err.to_string().contains("already booked"));
    assert!(services.bookings.get("B00002").is_err());
}

#[test]
fn booking_date_must_be_strictly_before_departure() {
    let (repository, services) = setup();
    seed_homestay(&repository, "HS0001", 10);
    services
        .tours
        .create_tour(tour("T00001", "HS0001", 10, date(2025, 12, 10), date(2025, 12, 12)))
        .unwrap();

    // same-day booking is invalid
    let err = services
        .bookings
        .create_booking(booking("B00001", "T00001", date(2025, 12, 10)))
        .unwrap_err();
    assert!(err.to_string().contains("before tour departure"));
    // the rejection left the tour untouched
    assert!(!services.tours.get("T00001").unwrap().booked);
}

#[test]
fn duplicate_booking_id_aborts_before_any_tour_mutation() {
    let (repository, services) = setup();
    seed_homestay(&repository, "HS0001", 10);
    services
        .tours
        .create_tour(tour("T00001", "HS0001", 10, date(2025, 12, 10), date(2025, 12, 12)))
        .unwrap();
    services
        .tours
        .create_tour(tour("T00002", "HS0001", 5, date(2026, 1, 10), date(2026, 1, 12)))
        .unwrap();

    services
        .bookings
        .create_booking(booking("B00001", "T00001", date(2025, 12, 5)))
        .unwrap();

    // same booking ID against a different, free tour
    let err = services
        .bookings
        .create_booking(booking("B00001", "T00002", date(2025, 12, 5)))
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));
    assert!(!services.tours.get("T00002").unwrap().booked);
}

#[test]
fn removing_a_booking_frees_the_tour_for_rebooking() {
    let (repository, services) = setup();
    seed_homestay(&repository, "HS0001", 10);
    services
        .tours
        .create_tour(tour("T00001", "HS0001", 10, date(2025, 12, 10), date(2025, 12, 12)))
        .unwrap();
    services
        .bookings
        .create_booking(booking("B00001", "T00001", date(2025, 12, 5)))
        .unwrap();

    services.bookings.remove_booking("B00001").expect("removable");
    assert!(!services.tours.get("T00001").unwrap().booked);
    assert!(services.bookings.get("B00001").is_err());

    // the slot is free again
    services
        .bookings
        .create_booking(booking("B00002", "T00001", date(2025, 12, 6)))
        .expect("rebooking succeeds");
    assert!(services.tours.get("T00001").unwrap().booked);
}

#[test]
fn removing_a_missing_booking_fails_without_side_effects() {
    let (repository, services) = setup();
    seed_homestay(&repository, "HS0001", 10);
    services
        .tours
        .create_tour(tour("T00001", "HS0001", 10, date(2025, 12, 10), date(2025, 12, 12)))
        .unwrap();
    services
        .bookings
        .create_booking(booking("B00001", "T00001", date(2025, 12, 5)))
        .unwrap();

    assert!(services.bookings.remove_booking("B99999").is_err());
    assert!(services.tours.get("T00001").unwrap().booked);
}

#[test]
fn removing_a_booking_whose_tour_is_gone_still_succeeds() {
    let (repository, services) = setup();
    seed_homestay(&repository, "HS0001", 10);
    services
        .tours
        .create_tour(tour("T00001", "HS0001", 10, date(2025, 12, 10), date(2025, 12, 12)))
        .unwrap();
    services
        .bookings
        .create_booking(booking("B00001", "T00001", date(2025, 12, 5)))
        .unwrap();

    // the tour disappears out from under the booking
    assert!(repository.tours.delete("T00001"));

    services
        .bookings
        .remove_booking("B00001")
        .expect("tour-less booking is still removable");
}

#[test]
fn moving_a_booking_to_a_booked_tour_restores_the_released_slot() {
    let (repository, services) = setup();
    seed_homestay(&repository, "HS0001", 10);
    services
        .tours
        .create_tour(tour("T00001", "HS0001", 10, date(2025, 12, 10), date(2025, 12, 12)))
        .unwrap();
    services
        .tours
        .create_tour(tour("T00003", "HS0001", 5, date(2026, 1, 10), date(2026, 1, 12)))
        .unwrap();

    services
        .bookings
        .create_booking(booking("B00001", "T00001", date(2025, 12, 5)))
        .unwrap();
    services
        .bookings
        .create_booking(booking("B00002", "T00003", date(2025, 12, 5)))
        .unwrap();

    // Try to repoint B00001 at T00003, which is already taken
    let old_booking = services.bookings.get("B00001").unwrap();
    let moved = booking("B00001", "T00003", date(2025, 12, 5));
    let err = services.bookings.update_booking(moved, &old_booking).unwrap_err();
    assert!(err.to_string().contains("T00003"));

    // the compensating action re-locked the original tour
    assert!(services.tours.get("T00001").unwrap().booked);
    assert!(services.tours.get("T00003").unwrap().booked);
    assert_eq!(services.bookings.get("B00001").unwrap().tour_id, "T00001");
}

#[test]
fn moving_a_booking_to_a_free_tour_swaps_the_flags() {
    let (repository, services) = setup();
    seed_homestay(&repository, "HS0001", 10);
    services
        .tours
        .create_tour(tour("T00001", "HS0001", 10, date(2025, 12, 10), date(2025, 12, 12)))
        .unwrap();
    services
        .tours
        .create_tour(tour("T00002", "HS0001", 5, date(2026, 1, 10), date(2026, 1, 12)))
        .unwrap();

    services
        .bookings
        .create_booking(booking("B00001", "T00001", date(2025, 12, 5)))
        .unwrap();

    let old_booking = services.bookings.get("B00001").unwrap();
    services
        .bookings
        .update_booking(booking("B00001", "T00002", date(2025, 12, 5)), &old_booking)
        .expect("free target tour");

    assert!(!services.tours.get("T00001").unwrap().booked);
    assert!(services.tours.get("T00002").unwrap().booked);
    assert_eq!(services.bookings.get("B00001").unwrap().tour_id, "T00002");
}

#[test]
fn updating_a_booking_without_changing_tours_leaves_flags_alone() {
    let (repository, services) = setup();
    seed_homestay(&repository, "HS0001", 10);
    services
        .tours
        .create_tour(tour("T00001", "HS0001", 10, date(2025, 12, 10), date(2025, 12, 12)))
        .unwrap();
    services
        .bookings
        .create_booking(booking("B00001", "T00001", date(2025, 12, 5)))
        .unwrap();

    let old_booking = services.bookings.get("B00001").unwrap();
    let mut renamed = old_booking.clone();
    renamed.customer_name = "Tran Thi B".to_string();

    services.bookings.update_booking(renamed, &old_booking).unwrap();
    assert!(services.tours.get("T00001").unwrap().booked);
    assert_eq!(
        services.bookings.get("B00001").unwrap().customer_name,
        "Tran Thi B"
    );
}

// ---------------------------------------------------------------------------
// Query surface
// ---------------------------------------------------------------------------

#[test]
fn upcoming_and_expired_tours_split_around_today() {
    let (repository, services) = setup();
    seed_homestay(&repository, "HS0001", 10);

    let today = chrono::Local::now().date_naive();
    let past = today - chrono::Duration::days(20);
    let soon = today + chrono::Duration::days(10);
    let later = today + chrono::Duration::days(40);

    services
        .tours
        .create_tour(tour("T00001", "HS0001", 2, past, past + chrono::Duration::days(2)))
        .unwrap();
    // cheap upcoming tour
    services
        .tours
        .create_tour(tour("T00002", "HS0001", 1, soon, soon + chrono::Duration::days(2)))
        .unwrap();
    // pricier upcoming tour (more tourists, same price per person)
    services
        .tours
        .create_tour(tour("T00003", "HS0001", 8, later, later + chrono::Duration::days(2)))
        .unwrap();

    let upcoming: Vec<String> = services.tours.upcoming_tours().into_iter().map(|t| t.id).collect();
    assert_eq!(upcoming, vec!["T00003".to_string(), "T00002".to_string()]);

    let expired: Vec<String> = services.tours.expired_tours().into_iter().map(|t| t.id).collect();
    assert_eq!(expired, vec!["T00001".to_string()]);

    assert_eq!(services.tours.tours_by_homestay("hs0001").len(), 3);
}

#[test]
fn customer_name_search_and_capacity_probe() {
    let (repository, services) = setup();
    seed_homestay(&repository, "HS0001", 10);
    services
        .tours
        .create_tour(tour("T00001", "HS0001", 4, date(2025, 12, 10), date(2025, 12, 12)))
        .unwrap();
    services
        .bookings
        .create_booking(booking("B00001", "T00001", date(2025, 12, 5)))
        .unwrap();

    assert_eq!(services.bookings.find_by_customer_name("van").len(), 1);
    assert!(services.bookings.find_by_customer_name("tran").is_empty());

    assert!(services.homestays.can_accommodate("HS0001", 10));
    assert!(!services.homestays.can_accommodate("HS0001", 11));
    assert!(!services.homestays.can_accommodate("HS9999", 1));
    assert_eq!(services.homestays.find_by_name("hs0001").len(), 1);
}

// ---------------------------------------------------------------------------
// Statistics
// ---------------------------------------------------------------------------

#[test]
fn statistics_count_booked_tours_only_in_homestay_order() {
    let (repository, services) = setup();
    seed_homestay(&repository, "HS0001", 10);
    seed_homestay(&repository, "HS0002", 20);

    services
        .tours
        .create_tour(tour("T00001", "HS0001", 4, date(2025, 12, 10), date(2025, 12, 12)))
        .unwrap();
    services
        .tours
        .create_tour(tour("T00002", "HS0001", 3, date(2026, 1, 10), date(2026, 1, 12)))
        .unwrap();
    services
        .tours
        .create_tour(tour("T00003", "HS0002", 7, date(2025, 12, 10), date(2025, 12, 12)))
        .unwrap();

    // Book two of the three tours
    services
        .bookings
        .create_booking(booking("B00001", "T00001", date(2025, 12, 5)))
        .unwrap();
    services
        .bookings
        .create_booking(booking("B00002", "T00003", date(2025, 12, 5)))
        .unwrap();

    let stats = services.stats.tourists_per_homestay();
    assert_eq!(stats.len(), 2);
    assert_eq!(stats[0].homestay_name, "Homestay HS0001");
    assert_eq!(stats[0].total_tourists, 4); // T00002 is unbooked
    assert_eq!(stats[1].homestay_name, "Homestay HS0002");
    assert_eq!(stats[1].total_tourists, 7);

    // releasing a booking is reflected immediately
    services.bookings.remove_booking("B00001").unwrap();
    let stats = services.stats.tourists_per_homestay();
    assert_eq!(stats[0].total_tourists, 0);
}

// ---------------------------------------------------------------------------
// Derived status
// ---------------------------------------------------------------------------

#[test]
fn status_reflects_booking_state() {
    let (repository, services) = setup();
    seed_homestay(&repository, "HS0001", 10);
    services
        .tours
        .create_tour(tour("T00001", "HS0001", 4, date(2025, 12, 10), date(2025, 12, 12)))
        .unwrap();

    let observed = date(2025, 12, 1);
    assert_eq!(services.tours.get("T00001").unwrap().status(observed), TourStatus::Available);

    services
        .bookings
        .create_booking(booking("B00001", "T00001", date(2025, 12, 5)))
        .unwrap();
    let tour = services.tours.get("T00001").unwrap();
    assert_eq!(tour.status(observed), TourStatus::Booked);
    // expiry outranks the booked flag
    assert_eq!(tour.status(date(2026, 2, 1)), TourStatus::Expired);
}
