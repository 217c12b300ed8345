//! Event booking from the event page through checkout.

use axum::http::StatusCode;
use portell_core::BookingStatus;
use portell_gateway::SortSpec;
use portell_integration_tests::{
    BOOKING_CONTACT, Browser, Portell, book, complete_checkout, tasting,
};
use rust_decimal::Decimal;
use tokio::task::JoinSet;

const NOT_ENOUGH_SPOTS: &str = "Niewystarczająca liczba wolnych miejsc";

/// Booking form then the event checkout, stopping before the last step.
async fn start_booking(browser: &mut Browser, event_id: &str, guests: &str) {
    let page = book(browser, event_id, guests).await;
    assert_eq!(page.status, StatusCode::SEE_OTHER, "{}", page.body);
    assert_eq!(page.location(), Some("/checkout?type=event"));

    let page = browser.get("/checkout?type=event").await;
    assert_eq!(page.status, StatusCode::OK);
}

#[tokio::test]
async fn test_booking_is_stored_counted_and_confirmed() {
    let portell = Portell::new();
    let event = portell.gateway.events.create(&tasting(10)).await.unwrap();
    let mut visitor = portell.visitor();

    start_booking(&mut visitor, &event.id.to_string(), "2").await;
    let page = complete_checkout(&mut visitor, BOOKING_CONTACT).await;
    assert_eq!(page.status, StatusCode::SEE_OTHER, "{}", page.body);
    assert_eq!(page.location(), Some("/checkout/confirmation"));

    let stored = portell.gateway.events.get(event.id).await.unwrap();
    assert_eq!(stored.booked_count, 2);

    let bookings = portell
        .gateway
        .bookings
        .list(&SortSpec::default(), None)
        .await
        .unwrap();
    assert_eq!(bookings.len(), 1);
    assert_eq!(bookings[0].event_id, event.id);
    assert_eq!(bookings[0].guests, 2);
    assert_eq!(bookings[0].total_price, Decimal::new(300, 0));
    assert_eq!(bookings[0].status, BookingStatus::Confirmed);

    let page = visitor.get("/checkout/confirmation").await;
    assert_eq!(page.status, StatusCode::OK);
    assert!(page.body.contains("Rezerwacja potwierdzona!"));
    assert!(page.body.contains(&bookings[0].confirmation_code));
    assert!(page.body.contains("/checkout/confirmation/calendar.ics"));

    let sent = portell.mailer.sent().await;
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, vec!["jan@example.com".to_owned()]);

    let ics = visitor.get("/checkout/confirmation/calendar.ics").await;
    assert_eq!(ics.status, StatusCode::OK);
    assert!(ics.body.contains("DTSTART:20310601T180000"));
}

#[tokio::test]
async fn test_booking_form_rejects_more_guests_than_spots_left() {
    let portell = Portell::new();
    let event = portell
        .gateway
        .events
        .create(&portell_core::models::Event {
            booked_count: 9,
            ..tasting(10)
        })
        .await
        .unwrap();
    let mut visitor = portell.visitor();

    let page = book(&mut visitor, &event.id.to_string(), "2").await;
    assert_eq!(page.status, StatusCode::OK);
    assert!(page.body.contains(NOT_ENOUGH_SPOTS));

    let page = visitor.get("/checkout?type=event").await;
    assert_eq!(page.status, StatusCode::SEE_OTHER);
    assert_eq!(page.location(), Some("/events"));
}

#[tokio::test]
async fn test_booking_form_rerenders_on_unreadable_guest_count() {
    let portell = Portell::new();
    let event = portell.gateway.events.create(&tasting(10)).await.unwrap();
    let mut visitor = portell.visitor();

    for guests in ["", "abc"] {
        let page = book(&mut visitor, &event.id.to_string(), guests).await;
        assert_eq!(page.status, StatusCode::OK, "guests = {guests:?}");
        assert!(page.body.contains("Podaj liczbę gości (co najmniej 1)"));
    }

    let stored = portell.gateway.events.get(event.id).await.unwrap();
    assert_eq!(stored.booked_count, 0);
}

#[tokio::test]
async fn test_read_modify_write_can_overbook_interleaved_checkouts() {
    let portell = Portell::new();
    let event = portell.gateway.events.create(&tasting(2)).await.unwrap();
    let id = event.id.to_string();

    // Both visitors pass the booking form while no seat is taken yet.
    let mut first = portell.visitor();
    let mut second = portell.visitor();
    start_booking(&mut first, &id, "2").await;
    start_booking(&mut second, &id, "2").await;

    let page = complete_checkout(&mut first, BOOKING_CONTACT).await;
    assert_eq!(page.status, StatusCode::SEE_OTHER);
    let page = complete_checkout(&mut second, BOOKING_CONTACT).await;
    assert_eq!(page.status, StatusCode::SEE_OTHER);

    let stored = portell.gateway.events.get(event.id).await.unwrap();
    assert_eq!(stored.booked_count, 4);
    assert!(stored.booked_count > stored.capacity);
}

#[tokio::test]
async fn test_atomic_bookings_refuse_the_second_checkout() {
    let portell = Portell::atomic();
    let event = portell.gateway.events.create(&tasting(2)).await.unwrap();
    let id = event.id.to_string();

    let mut first = portell.visitor();
    let mut second = portell.visitor();
    start_booking(&mut first, &id, "2").await;
    start_booking(&mut second, &id, "2").await;

    let page = complete_checkout(&mut first, BOOKING_CONTACT).await;
    assert_eq!(page.status, StatusCode::SEE_OTHER);

    let page = complete_checkout(&mut second, BOOKING_CONTACT).await;
    assert_eq!(page.status, StatusCode::OK);
    assert!(page.body.contains(NOT_ENOUGH_SPOTS));
    assert!(page.body.contains("name=\"consent\""), "stays on the review step");

    let stored = portell.gateway.events.get(event.id).await.unwrap();
    assert_eq!(stored.booked_count, 2);
    let bookings = portell
        .gateway
        .bookings
        .list(&SortSpec::default(), None)
        .await
        .unwrap();
    assert_eq!(bookings.len(), 1);
}

#[tokio::test]
async fn test_atomic_bookings_never_exceed_capacity_under_concurrency() {
    const CAPACITY: i64 = 3;
    const VISITORS: usize = 8;

    let portell = Portell::atomic();
    let event = portell.gateway.events.create(&tasting(CAPACITY)).await.unwrap();
    let id = event.id.to_string();

    let mut tasks = JoinSet::new();
    for _ in 0..VISITORS {
        let mut visitor = portell.visitor();
        let id = id.clone();
        tasks.spawn(async move {
            let page = book(&mut visitor, &id, "1").await;
            if page.status != StatusCode::SEE_OTHER {
                return false;
            }
            visitor.get("/checkout?type=event").await;
            let page = complete_checkout(&mut visitor, BOOKING_CONTACT).await;
            page.status == StatusCode::SEE_OTHER
        });
    }

    let mut confirmed = 0;
    while let Some(result) = tasks.join_next().await {
        if result.unwrap() {
            confirmed += 1;
        }
    }

    assert_eq!(confirmed, 3);
    let stored = portell.gateway.events.get(event.id).await.unwrap();
    assert_eq!(stored.booked_count, CAPACITY);
    let bookings = portell
        .gateway
        .bookings
        .list(&SortSpec::default(), None)
        .await
        .unwrap();
    assert_eq!(bookings.len(), 3);
}

#[tokio::test]
async fn test_booking_email_failure_keeps_the_booking() {
    let portell = Portell::new();
    let event = portell.gateway.events.create(&tasting(10)).await.unwrap();
    portell.mailer.fail_with("smtp unreachable").await;
    let mut visitor = portell.visitor();

    start_booking(&mut visitor, &event.id.to_string(), "1").await;
    let page = complete_checkout(&mut visitor, BOOKING_CONTACT).await;
    assert_eq!(page.status, StatusCode::SEE_OTHER);

    let page = visitor.get("/checkout/confirmation").await;
    assert!(page.body.contains("Rezerwacja utworzona, ale wysłanie emaila nie powiodło się."));
    let stored = portell.gateway.events.get(event.id).await.unwrap();
    assert_eq!(stored.booked_count, 1);
}
