use axum::{
    extract::rejection::JsonRejection,
    extract::{FromRequest, Request},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::de::DeserializeOwned;
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("Invalid input")]
    Validation(Vec<String>),

    #[error("Not authenticated")]
    Unauthorized(String),

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Token expired")]
    ExpiredToken,

    #[error("Place not found or you do not own this place")]
    NotFoundOrForbidden,

    #[error("No active subscription exists for this place")]
    NoActiveSubscription,

    #[error("Insufficient credits. You need {required} credits but have {available}.")]
    InsufficientCredits { required: i32, available: i32 },

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // Validation failures carry field-level details; everything else is
        // a flat { "error": message } body per the public API contract.
        let (status, body) = match self {
            ApiError::Validation(details) => (
                StatusCode::BAD_REQUEST,
                json!({ "error": "Invalid input", "details": details }),
            ),
            ApiError::Database(ref e) => {
                tracing::error!("Database error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "An internal database error occurred" }),
                )
            }
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, json!({ "error": msg })),
            ApiError::InvalidToken(_) | ApiError::ExpiredToken => {
                (StatusCode::UNAUTHORIZED, json!({ "error": self.to_string() }))
            }
            // Not-found and not-owned are deliberately reported identically
            // so callers cannot probe for the existence of other places.
            ApiError::NotFoundOrForbidden
            | ApiError::NoActiveSubscription
            | ApiError::InsufficientCredits { .. } => {
                (StatusCode::BAD_REQUEST, json!({ "error": self.to_string() }))
            }
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, json!({ "error": msg })),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, json!({ "error": msg })),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, json!({ "error": msg })),
            ApiError::RateLimitExceeded => (
                StatusCode::TOO_MANY_REQUESTS,
                json!({ "error": "Too many requests, please try again later" }),
            ),
            ApiError::Internal(ref e) => {
                tracing::error!("Internal error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "An internal error occurred" }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

impl ApiError {
    /// Flatten `validator` errors into "field: reason" strings for the
    /// details array of a 400 response.
    pub fn from_validation(errors: validator::ValidationErrors) -> Self {
        let mut details: Vec<String> = errors
            .field_errors()
            .iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| {
                    let reason = e
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| e.code.to_string());
                    format!("{}: {}", field, reason)
                })
            })
            .collect();
        details.sort();
        ApiError::Validation(details)
    }
}

/// Body deserialization failures render with the same details shape as field
/// validation: missing and unknown fields keep their name, everything else
/// (wrong types, bad JSON) is attributed to the body as a whole.
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        let text = rejection.body_text();
        let reason = text
            .split_once("target type: ")
            .map(|(_, tail)| tail)
            .unwrap_or(text.as_str());

        let detail = if let Some(field) = backticked_field(reason, "missing field `") {
            format!("{}: missing field", field)
        } else if let Some(field) = backticked_field(reason, "unknown field `") {
            format!("{}: unknown field", field)
        } else {
            format!("body: {}", reason)
        };
        ApiError::Validation(vec![detail])
    }
}

fn backticked_field<'a>(reason: &'a str, prefix: &str) -> Option<&'a str> {
    reason.strip_prefix(prefix)?.split('`').next()
}

/// JSON body extractor for the POST handlers. Axum's stock `Json<T>` rejects
/// malformed bodies with a plain-text 422; the public contract is a 400 with
/// the validation details shape, so this wrapper maps the rejection through
/// `ApiError` instead.
#[derive(Debug)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> std::result::Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        Ok(Self(value))
    }
}

// Helper type for results
pub type Result<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::premium::TogglePremiumRequest;
    use axum::body::Body;
    use validator::Validate;

    #[derive(Validate)]
    struct Probe {
        #[validate(range(min = -90.0, max = 90.0, message = "must be between -90 and 90"))]
        latitude: f64,
    }

    #[test]
    fn validation_errors_become_field_details() {
        let probe = Probe { latitude: 123.0 };
        let err = ApiError::from_validation(probe.validate().unwrap_err());
        match err {
            ApiError::Validation(details) => {
                assert_eq!(details.len(), 1);
                assert!(details[0].starts_with("latitude: "));
            }
            other => panic!("expected Validation, got {:?}", other),
        }
    }

    fn json_request(body: &'static str) -> Request {
        axum::http::Request::builder()
            .method("POST")
            .uri("/toggle-premium")
            .header("content-type", "application/json")
            .body(Body::from(body))
            .unwrap()
    }

    async fn error_body(err: ApiError) -> serde_json::Value {
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn body_missing_a_field_yields_details_shape() {
        let req = json_request(r#"{"placeId":"b2e6d297-72f8-4e29-a8d5-907a2c1d6a0b"}"#);
        let err = ValidatedJson::<TogglePremiumRequest>::from_request(req, &())
            .await
            .map(|_| ())
            .expect_err("missing field must be rejected");

        let json = error_body(err).await;
        assert_eq!(json["error"], "Invalid input");
        assert_eq!(json["details"][0], "isPremium: missing field");
    }

    #[tokio::test]
    async fn body_with_unknown_field_yields_details_shape() {
        let req = json_request(
            r#"{"placeId":"b2e6d297-72f8-4e29-a8d5-907a2c1d6a0b","isPremium":true,"extra":1}"#,
        );
        let err = ValidatedJson::<TogglePremiumRequest>::from_request(req, &())
            .await
            .map(|_| ())
            .expect_err("unknown field must be rejected");

        let json = error_body(err).await;
        assert_eq!(json["error"], "Invalid input");
        assert!(json["details"][0]
            .as_str()
            .unwrap()
            .starts_with("extra: unknown field"));
    }

    #[tokio::test]
    async fn body_with_wrong_type_yields_details_shape() {
        let req = json_request(
            r#"{"placeId":"b2e6d297-72f8-4e29-a8d5-907a2c1d6a0b","isPremium":"yes"}"#,
        );
        let err = ValidatedJson::<TogglePremiumRequest>::from_request(req, &())
            .await
            .map(|_| ())
            .expect_err("wrong type must be rejected");

        let json = error_body(err).await;
        assert_eq!(json["error"], "Invalid input");
        assert!(json["details"][0].as_str().unwrap().starts_with("body: "));
    }
}
