//! Cross-origin policy for browser callers

use axum::http::{header, header::InvalidHeaderValue, HeaderValue, Method};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

/// Restrict to `allowed_origin` when set, otherwise allow any origin.
/// Preflights for JSON POSTs are answered either way.
///
/// A restricted layer only echoes `Access-Control-Allow-Origin` back to the
/// configured origin; other origins get no header at all.
pub fn cors_layer(allowed_origin: Option<&str>) -> Result<CorsLayer, InvalidHeaderValue> {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    Ok(match allowed_origin {
        // tower-http refuses a wildcard inside an origin list
        None | Some("*") => layer.allow_origin(Any),
        Some(origin) => layer.allow_origin(AllowOrigin::list([HeaderValue::from_str(origin)?])),
    })
}
