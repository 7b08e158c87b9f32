use axum::http::HeaderValue;
use reqwest::Url;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tracing::warn;

/// `scheme://host[:port]` origin of a URI, `None` if it has no tuple origin.
fn origin_of(uri: &str) -> Option<String> {
    let origin = Url::parse(uri).ok()?.origin();
    origin.is_tuple().then(|| origin.ascii_serialization())
}

/// Lets the voting frontend call the relay from the browser.
pub fn cors_layer(frontend_uri: &str) -> CorsLayer {
    let origin = origin_of(frontend_uri).and_then(|o| HeaderValue::from_str(&o).ok());
    let allow_origin = match origin {
        Some(origin) => AllowOrigin::exact(origin),
        None => {
            warn!(
                "Frontend URI '{}' has no usable origin, allowing any origin",
                frontend_uri
            );
            AllowOrigin::any()
        }
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(Any)
        .allow_headers(Any)
}
