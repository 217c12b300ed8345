//! Security headers for every storefront response.
//!
//! The storefront serves its own scripts and styles (htmx included), posts
//! forms only to itself and shows images from object storage. The policy
//! below allows exactly that.

use axum::{
    extract::Request,
    http::{HeaderName, HeaderValue, header},
    middleware::Next,
    response::Response,
};

/// `Content-Security-Policy` value.
///
/// Images may come from any HTTPS host because product and event photos
/// live in the storage bucket, whose host differs per deployment.
pub const CONTENT_SECURITY_POLICY: &str = "default-src 'none'; \
     script-src 'self'; \
     style-src 'self'; \
     font-src 'self'; \
     img-src 'self' https:; \
     connect-src 'self'; \
     frame-src 'none'; \
     object-src 'none'; \
     base-uri 'self'; \
     form-action 'self'; \
     frame-ancestors 'none'; \
     upgrade-insecure-requests";

/// Browser features the site never uses.
const PERMISSIONS_POLICY: &str = "accelerometer=(), camera=(), display-capture=(), \
     geolocation=(), gyroscope=(), magnetometer=(), microphone=(), midi=(), payment=(), \
     publickey-credentials-get=(), usb=(), xr-spatial-tracking=()";

/// Header name and value pairs set on every response.
fn policy() -> [(HeaderName, &'static str); 10] {
    [
        (header::X_FRAME_OPTIONS, "DENY"),
        (header::X_CONTENT_TYPE_OPTIONS, "nosniff"),
        // The language toggle reads Referer to send visitors back.
        (header::REFERRER_POLICY, "same-origin"),
        (header::CONTENT_SECURITY_POLICY, CONTENT_SECURITY_POLICY),
        (HeaderName::from_static("permissions-policy"), PERMISSIONS_POLICY),
        // Pages render the session's cart and language.
        (header::CACHE_CONTROL, "no-store, max-age=0"),
        (HeaderName::from_static("cross-origin-opener-policy"), "same-origin"),
        (HeaderName::from_static("cross-origin-resource-policy"), "same-origin"),
        // Storage-hosted images carry no CORP header.
        (HeaderName::from_static("cross-origin-embedder-policy"), "credentialless"),
        (header::X_DNS_PREFETCH_CONTROL, "off"),
    ]
}

/// Add the security headers to a response.
///
/// `/api/send-email` answers cross-origin callers, so it overrides
/// `Cross-Origin-Resource-Policy` itself; values a handler already set are
/// kept.
pub async fn security_headers_middleware(request: Request, next: Next) -> Response {
    let mut response = next.run(request).await;
    let headers = response.headers_mut();

    for (name, value) in policy() {
        headers
            .entry(name)
            .or_insert_with(|| HeaderValue::from_static(value));
    }

    response
}
