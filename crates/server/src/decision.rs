//! Decision endpoint for gateways that ask before forwarding.

use axum::{
    Extension, Json,
    extract::State,
    response::{IntoResponse, Response},
};
use context::QuotaDecision;
use http::{HeaderMap, HeaderName};

/// Returns the decision made by the quota layer for this very request, as JSON
/// and mirrored into the response headers.
pub(crate) async fn decision(
    State(client_name_header): State<HeaderName>,
    Extension(decision): Extension<QuotaDecision>,
) -> Response {
    let mut headers = HeaderMap::new();
    crate::headers::insert_decision(&mut headers, &decision, &client_name_header);

    (headers, Json(decision.variables())).into_response()
}
