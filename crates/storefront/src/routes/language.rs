//! Language toggle.

use axum::{
    Form,
    http::{HeaderMap, Uri, header},
    response::{IntoResponse, Redirect, Response},
};
use portell_core::Language;
use serde::Deserialize;
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::middleware::ClientState;

/// Language toggle form data.
#[derive(Debug, Deserialize)]
pub struct LanguageForm {
    pub lang: String,
}

/// Store the chosen language and go back to the page the visitor was on.
///
/// # Errors
///
/// Returns 400 for unknown language codes.
#[instrument(skip(client, headers))]
pub async fn switch(
    mut client: ClientState,
    headers: HeaderMap,
    Form(form): Form<LanguageForm>,
) -> Result<Response> {
    let lang: Language = form
        .lang
        .parse()
        .map_err(|_| AppError::BadRequest(format!("unsupported language: {}", form.lang)))?;

    let event = client.set_language(lang).await?;
    tracing::debug!(lang = lang.code(), "Language changed");

    Ok((event, Redirect::to(&back_path(&headers))).into_response())
}

/// Path of the referring page on this site, `/` otherwise.
///
/// Only the path and query are kept so the redirect can never leave the site.
fn back_path(headers: &HeaderMap) -> String {
    headers
        .get(header::REFERER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.parse::<Uri>().ok())
        .and_then(|uri| uri.path_and_query().map(|pq| pq.as_str().to_owned()))
        .filter(|path| path.starts_with('/') && !path.starts_with("//"))
        .unwrap_or_else(|| "/".to_owned())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    fn with_referer(referer: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::REFERER, HeaderValue::from_str(referer).unwrap());
        headers
    }

    #[test]
    fn test_back_path_keeps_path_and_query() {
        let headers = with_referer("https://portell.wine/shop?category=red");
        assert_eq!(back_path(&headers), "/shop?category=red");
    }

    #[test]
    fn test_back_path_defaults_to_home() {
        assert_eq!(back_path(&HeaderMap::new()), "/");
        assert_eq!(back_path(&with_referer("not a uri at all")), "/");
    }
}
