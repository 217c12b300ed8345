//! The language preference follows the visitor across pages.

use axum::http::StatusCode;
use portell_integration_tests::{Portell, book, tasting};

#[tokio::test]
async fn test_language_choice_persists_for_the_session() {
    let portell = Portell::new();
    portell.gateway.events.create(&tasting(10)).await.unwrap();
    let mut visitor = portell.visitor();

    let page = visitor.get("/events").await;
    assert!(page.body.contains("<html lang=\"pl\">"));
    assert!(page.body.contains("Degustacja win"));

    let page = visitor.post_form("/language", &[("lang", "en")]).await;
    assert_eq!(page.status, StatusCode::SEE_OTHER);
    assert_eq!(page.location(), Some("/"));
    assert_eq!(page.hx_trigger(), Some("language-changed"));

    for path in ["/", "/events", "/cart"] {
        let page = visitor.get(path).await;
        assert!(page.body.contains("<html lang=\"en\">"), "{path}");
    }
    let page = visitor.get("/events").await;
    assert!(page.body.contains("Wine tasting"));

    let mut stranger = portell.visitor();
    let page = stranger.get("/").await;
    assert!(page.body.contains("<html lang=\"pl\">"));
}

#[tokio::test]
async fn test_validation_messages_follow_the_language() {
    let portell = Portell::new();
    let event = portell.gateway.events.create(&tasting(1)).await.unwrap();
    let id = event.id.to_string();
    let mut visitor = portell.visitor();

    let page = book(&mut visitor, &id, "2").await;
    assert!(page.body.contains("Niewystarczająca liczba wolnych miejsc"));

    visitor.post_form("/language", &[("lang", "en")]).await;
    let page = book(&mut visitor, &id, "2").await;
    assert_eq!(page.status, StatusCode::OK);
    assert!(page.body.contains("Not enough spots available"));
}

#[tokio::test]
async fn test_switching_back_to_polish() {
    let portell = Portell::new();
    let mut visitor = portell.visitor();

    visitor.post_form("/language", &[("lang", "en")]).await;
    visitor.post_form("/language", &[("lang", "pl")]).await;
    let page = visitor.get("/").await;
    assert!(page.body.contains("<html lang=\"pl\">"));
}
