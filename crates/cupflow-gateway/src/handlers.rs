// SPDX-FileCopyrightText: 2026 Cupflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP request handlers for the submission API.
//!
//! Handles POST /api/submit, GET /api/applications, GET /test. Validation
//! error messages are part of the client contract and mirror the intake
//! form's expectations.

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use cupflow_core::types::{Application, ApplicationKind, NewApplication};
use cupflow_storage::queries::applications;

use crate::server::GatewayState;

/// Request body for POST /api/submit.
///
/// Every field is optional at the serde layer so validation can produce the
/// contract's specific 400 messages instead of a generic decode rejection.
#[derive(Debug, Deserialize)]
pub struct SubmitRequest {
    /// Application kind: "cups" or "brand".
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub contact: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub size: Option<String>,
    #[serde(default)]
    pub comment: Option<String>,
}

/// Success response body.
#[derive(Debug, Serialize)]
pub struct OkResponse {
    pub ok: bool,
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error description.
    pub error: String,
}

/// Submission API errors, rendered as the JSON error contract.
#[derive(Debug, PartialEq, Eq)]
pub enum ApiError {
    /// `type` was missing or not one of "cups"/"brand".
    InvalidType,
    /// A kind-specific required field was empty or absent.
    MissingFields(ApplicationKind),
    /// The store failed to persist or re-read the record.
    Save,
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidType | ApiError::MissingFields(_) => StatusCode::BAD_REQUEST,
            ApiError::Save => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn message(&self) -> &'static str {
        match self {
            ApiError::InvalidType => "Тип заявки: \"cups\" или \"brand\"",
            ApiError::MissingFields(ApplicationKind::Cups) => {
                "Для стаканчиков нужны: контактное лицо, город и телефон"
            }
            ApiError::MissingFields(ApplicationKind::Brand) => {
                "Для брендов нужны: контактное лицо, телефон и размер"
            }
            ApiError::Save => "Ошибка сохранения",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status(),
            Json(ErrorResponse {
                error: self.message().to_string(),
            }),
        )
            .into_response()
    }
}

/// Validate a submission into an insertable record.
///
/// Order: kind first, then the kind-specific required fields. Whitespace-only
/// values count as missing. Fields not applicable to the kind are forced to
/// `None` regardless of what the client sent.
pub fn validate(body: &SubmitRequest) -> Result<NewApplication, ApiError> {
    let kind = match body.kind.as_deref() {
        Some("cups") => ApplicationKind::Cups,
        Some("brand") => ApplicationKind::Brand,
        _ => return Err(ApiError::InvalidType),
    };

    match kind {
        ApplicationKind::Cups => {
            match (
                required(&body.contact),
                required(&body.city),
                required(&body.phone),
            ) {
                (Some(contact), Some(city), Some(phone)) => Ok(NewApplication {
                    kind,
                    contact,
                    phone,
                    city: Some(city),
                    size: None,
                    comment: None,
                }),
                _ => Err(ApiError::MissingFields(kind)),
            }
        }
        ApplicationKind::Brand => {
            match (
                required(&body.contact),
                required(&body.phone),
                required(&body.size),
            ) {
                (Some(contact), Some(phone), Some(size)) => Ok(NewApplication {
                    kind,
                    contact,
                    phone,
                    city: None,
                    size: Some(size),
                    comment: required(&body.comment),
                }),
                _ => Err(ApiError::MissingFields(kind)),
            }
        }
    }
}

fn required(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// GET /test
///
/// Liveness probe; succeeds unconditionally.
pub async fn get_test() -> Json<OkResponse> {
    Json(OkResponse { ok: true })
}

/// POST /api/submit
///
/// Validates and stores a new application, then kicks off the admin push
/// notification without awaiting it: delivery is best-effort and must not
/// delay or fail the HTTP response.
pub async fn post_submit(
    State(state): State<GatewayState>,
    Json(body): Json<SubmitRequest>,
) -> Result<Json<OkResponse>, ApiError> {
    let record = validate(&body)?;

    let id = applications::create(&state.db, &record).await.map_err(|e| {
        error!(error = %e, "failed to insert application");
        ApiError::Save
    })?;

    let app = applications::get(&state.db, id)
        .await
        .map_err(|e| {
            error!(error = %e, id, "failed to re-read stored application");
            ApiError::Save
        })?
        .ok_or(ApiError::Save)?;

    info!(id, kind = %app.kind, "application stored");

    let notifier = state.notifier.clone();
    tokio::spawn(async move {
        notifier.notify_created(&app).await;
    });

    Ok(Json(OkResponse { ok: true }))
}

/// GET /api/applications
///
/// Every record, all fields, newest first. No pagination or filtering; this
/// is the external administrative export.
pub async fn get_applications(
    State(state): State<GatewayState>,
) -> Result<Json<Vec<Application>>, ApiError> {
    applications::list_all(&state.db).await.map(Json).map_err(|e| {
        error!(error = %e, "failed to list applications");
        ApiError::Save
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body(json: serde_json::Value) -> SubmitRequest {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn valid_cups_submission_passes_validation() {
        let record = validate(&body(serde_json::json!({
            "type": "cups",
            "contact": "Анна",
            "city": "Казань",
            "phone": "79990001122",
        })))
        .unwrap();
        assert_eq!(record.kind, ApplicationKind::Cups);
        assert_eq!(record.city.as_deref(), Some("Казань"));
        assert_eq!(record.size, None);
        assert_eq!(record.comment, None);
    }

    #[test]
    fn cups_submission_drops_brand_only_fields() {
        let record = validate(&body(serde_json::json!({
            "type": "cups",
            "contact": "Анна",
            "city": "Казань",
            "phone": "79990001122",
            "size": "500 шт",
            "comment": "не для стаканчиков",
        })))
        .unwrap();
        assert_eq!(record.size, None);
        assert_eq!(record.comment, None);
    }

    #[test]
    fn brand_submission_keeps_optional_comment() {
        let record = validate(&body(serde_json::json!({
            "type": "brand",
            "contact": "ООО Ромашка",
            "phone": "79995556677",
            "size": "500 шт",
            "comment": "логотип на крышке",
        })))
        .unwrap();
        assert_eq!(record.kind, ApplicationKind::Brand);
        assert_eq!(record.city, None);
        assert_eq!(record.comment.as_deref(), Some("логотип на крышке"));
    }

    #[test]
    fn missing_city_fails_with_cups_message() {
        let err = validate(&body(serde_json::json!({
            "type": "cups",
            "contact": "A",
            "phone": "1",
        })))
        .unwrap_err();
        assert_eq!(err, ApiError::MissingFields(ApplicationKind::Cups));
        assert!(err.message().contains("стаканчиков"));
    }

    #[test]
    fn whitespace_only_field_counts_as_missing() {
        let err = validate(&body(serde_json::json!({
            "type": "brand",
            "contact": "A",
            "phone": "1",
            "size": "   ",
        })))
        .unwrap_err();
        assert_eq!(err, ApiError::MissingFields(ApplicationKind::Brand));
    }

    #[test]
    fn unknown_type_fails_before_field_checks() {
        let err = validate(&body(serde_json::json!({
            "type": "widget",
            "contact": "A",
        })))
        .unwrap_err();
        assert_eq!(err, ApiError::InvalidType);
    }

    #[test]
    fn absent_type_fails_as_invalid_type() {
        let err = validate(&body(serde_json::json!({ "contact": "A" }))).unwrap_err();
        assert_eq!(err, ApiError::InvalidType);
    }

    #[test]
    fn api_error_statuses_match_the_contract() {
        assert_eq!(ApiError::InvalidType.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ApiError::MissingFields(ApplicationKind::Brand).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(ApiError::Save.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
