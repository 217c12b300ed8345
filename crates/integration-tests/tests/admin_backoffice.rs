//! Back-office changes as the storefront sees them.

use axum::http::StatusCode;
use portell_gateway::SortSpec;
use portell_integration_tests::{
    ADMIN_PASSWORD, BOOKING_CONTACT, Portell, book, complete_checkout, tasting, wine,
};
use rust_decimal::Decimal;

#[tokio::test]
async fn test_admin_pages_require_login() {
    let portell = Portell::new();
    let mut browser = portell.admin_browser();

    for path in ["/", "/products", "/events/new"] {
        let page = browser.get(path).await;
        assert_eq!(page.status, StatusCode::SEE_OTHER, "{path}");
        assert_eq!(page.location(), Some("/login"));
    }

    let page = browser
        .post_form("/login", &[("username", "admin"), ("password", "wrong")])
        .await;
    assert_eq!(page.status, StatusCode::UNAUTHORIZED);

    let page = browser
        .post_form("/login", &[("username", " admin "), ("password", ADMIN_PASSWORD)])
        .await;
    assert_eq!(page.status, StatusCode::SEE_OTHER);
    let page = browser.get("/products").await;
    assert_eq!(page.status, StatusCode::OK);

    browser.post_form("/logout", &[]).await;
    let page = browser.get("/products").await;
    assert_eq!(page.location(), Some("/login"));
}

#[tokio::test]
async fn test_event_created_in_admin_is_bookable() {
    let portell = Portell::new();
    let mut admin = portell.logged_in_admin().await;

    let page = admin
        .post_form(
            "/events",
            &[
                ("title", "Kolacja przy winie"),
                ("title_en", "Wine dinner"),
                ("date", "2031-09-12"),
                ("time", "19:30"),
                ("price", "250,00"),
                ("capacity", "16"),
                ("event_type", "dinner"),
                ("active", "on"),
            ],
        )
        .await;
    assert_eq!(page.status, StatusCode::SEE_OTHER);

    let events = portell
        .gateway
        .events
        .list(&SortSpec::default(), None)
        .await
        .unwrap();
    assert_eq!(events.len(), 1);
    let id = events[0].id.to_string();
    assert_eq!(events[0].price, Decimal::new(250, 0));

    let mut visitor = portell.visitor();
    let page = visitor.get("/events").await;
    assert!(page.body.contains("Kolacja przy winie"));

    let page = book(&mut visitor, &id, "3").await;
    assert_eq!(page.status, StatusCode::SEE_OTHER);
    visitor.get("/checkout?type=event").await;
    let page = complete_checkout(&mut visitor, BOOKING_CONTACT).await;
    assert_eq!(page.status, StatusCode::SEE_OTHER);

    let page = admin.get("/").await;
    assert_eq!(page.status, StatusCode::OK);
    assert!(page.body.contains("Jan Kowalski"));
    assert!(page.body.contains("Kolacja przy winie"));
    assert!(page.body.contains("750.00 PLN"));

    // Capacity can not drop below the seats already sold.
    let page = admin
        .post_form(
            &format!("/events/{id}"),
            &[
                ("title", "Kolacja przy winie"),
                ("date", "2031-09-12"),
                ("time", "19:30"),
                ("price", "250"),
                ("capacity", "2"),
                ("event_type", "dinner"),
                ("active", "on"),
            ],
        )
        .await;
    assert_eq!(page.status, StatusCode::OK);
    assert!(page.body.contains("Capacity cannot be lower than the 3 seats already booked"));

    // Editing other fields leaves the booked count alone.
    let page = admin
        .post_form(
            &format!("/events/{id}"),
            &[
                ("title", "Kolacja przy winie"),
                ("date", "2031-09-12"),
                ("time", "20:00"),
                ("price", "250"),
                ("capacity", "20"),
                ("event_type", "dinner"),
                ("active", "on"),
            ],
        )
        .await;
    assert_eq!(page.status, StatusCode::SEE_OTHER);
    let stored = portell.gateway.events.get(events[0].id).await.unwrap();
    assert_eq!(stored.booked_count, 3);
    assert_eq!(stored.capacity, 20);
}

#[tokio::test]
async fn test_hidden_and_deleted_products_leave_the_shop() {
    let portell = Portell::new();
    let regent = portell
        .gateway
        .products
        .create(&wine("Regent 2021", Decimal::new(60, 0)))
        .await
        .unwrap();
    let id = regent.id.to_string();
    let mut admin = portell.logged_in_admin().await;
    let mut visitor = portell.visitor();

    let page = visitor.get(&format!("/shop/{id}")).await;
    assert_eq!(page.status, StatusCode::OK);

    // Unticked `active` hides the wine.
    let page = admin
        .post_form(
            &format!("/products/{id}"),
            &[
                ("name", "Regent 2021"),
                ("price", "60"),
                ("category", "red"),
                ("stock", "24"),
            ],
        )
        .await;
    assert_eq!(page.status, StatusCode::SEE_OTHER);
    let page = visitor.get(&format!("/shop/{id}")).await;
    assert_eq!(page.status, StatusCode::NOT_FOUND);

    let page = admin.post_form(&format!("/products/{id}/delete"), &[]).await;
    assert_eq!(page.status, StatusCode::SEE_OTHER);
    assert!(
        portell
            .gateway
            .products
            .find_optional(regent.id)
            .await
            .unwrap()
            .is_none()
    );
}

#[tokio::test]
async fn test_deleting_an_event_keeps_its_bookings() {
    let portell = Portell::new();
    let event = portell.gateway.events.create(&tasting(10)).await.unwrap();
    let mut visitor = portell.visitor();
    book(&mut visitor, &event.id.to_string(), "1").await;
    visitor.get("/checkout?type=event").await;
    complete_checkout(&mut visitor, BOOKING_CONTACT).await;

    let mut admin = portell.logged_in_admin().await;
    let page = admin
        .post_form(&format!("/events/{}/delete", event.id), &[])
        .await;
    assert_eq!(page.status, StatusCode::SEE_OTHER);

    let bookings = portell
        .gateway
        .bookings
        .list(&SortSpec::default(), None)
        .await
        .unwrap();
    assert_eq!(bookings.len(), 1);

    let page = admin.get("/").await;
    assert!(page.body.contains("Deleted event"));
}
