//! HTTP status mapping for access denials.

use axum::{
    Json,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};

use super::Denial;

/// Challenge sent with 401 responses.
pub const WWW_AUTHENTICATE_CHALLENGE: &str = "Bearer realm=\"storefront\"";

impl Denial {
    pub fn status_code(self) -> StatusCode {
        match self {
            Denial::Unauthorized => StatusCode::UNAUTHORIZED,
            Denial::Forbidden => StatusCode::FORBIDDEN,
        }
    }

    /// Machine-readable code used in response bodies.
    pub fn code(self) -> &'static str {
        match self {
            Denial::Unauthorized => "not_authenticated",
            Denial::Forbidden => "permission_denied",
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Denial::Unauthorized => "Authentication credentials were not provided.",
            Denial::Forbidden => "You do not have permission to perform this action.",
        }
    }
}

impl IntoResponse for Denial {
    fn into_response(self) -> Response {
        let body = serde_json::json!({
            "error": self.message(),
            "code": self.code(),
        });

        let mut response = (self.status_code(), Json(body)).into_response();
        if self == Denial::Unauthorized {
            response.headers_mut().insert(
                header::WWW_AUTHENTICATE,
                HeaderValue::from_static(WWW_AUTHENTICATE_CHALLENGE),
            );
        }
        response
    }
}
