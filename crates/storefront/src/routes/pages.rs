//! Static content page route handlers.
//!
//! The about, privacy and terms pages are short localized texts from the
//! label tables.

use askama::Template;
use askama_web::WebTemplate;
use tracing::instrument;

use crate::filters;
use crate::i18n::Labels;
use crate::middleware::ClientState;
use crate::views::Chrome;

/// Content page template.
#[derive(Template, WebTemplate)]
#[template(path = "pages/static_page.html")]
pub struct StaticPageTemplate {
    pub chrome: Chrome,
    pub title: &'static str,
    pub body: &'static str,
}

async fn serve_page(
    client: &ClientState,
    pick: fn(&Labels) -> (&'static str, &'static str),
) -> StaticPageTemplate {
    let (title, body) = pick(Labels::for_lang(client.language()));
    StaticPageTemplate {
        chrome: Chrome::load(client).await,
        title,
        body,
    }
}

/// Display the About page.
#[instrument(skip(client))]
pub async fn about(client: ClientState) -> StaticPageTemplate {
    serve_page(&client, |t| (t.about_title, t.about_text)).await
}

/// Display the Privacy Policy page.
#[instrument(skip(client))]
pub async fn privacy(client: ClientState) -> StaticPageTemplate {
    serve_page(&client, |t| (t.privacy_policy, t.privacy_text)).await
}

/// Display the Terms of Service page.
#[instrument(skip(client))]
pub async fn terms(client: ClientState) -> StaticPageTemplate {
    serve_page(&client, |t| (t.terms_of_service, t.terms_text)).await
}
