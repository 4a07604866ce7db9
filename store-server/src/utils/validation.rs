//! Input validation helpers
//!
//! Text length limits, `validator` bridging and the body/query extractors
//! that render rejections in the unified error envelope.

use axum::extract::{FromRequest, FromRequestParts, Request};
use http::request::Parts;
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors};

use crate::utils::AppError;

// ── Text length limits ──────────────────────────────────────────────

/// Entity names: student, product, category
pub const MAX_NAME_LEN: usize = 200;

/// Notes, descriptions, stock adjustment reasons
pub const MAX_NOTE_LEN: usize = 500;

/// Short identifiers: roll number, barcode, username
pub const MAX_SHORT_TEXT_LEN: usize = 100;

/// Passwords (before hashing)
pub const MAX_PASSWORD_LEN: usize = 128;

// ── Validation helpers ──────────────────────────────────────────────

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::validation(format!("{field} must not be empty")));
    }
    if value.len() > max_len {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            value.len()
        )));
    }
    Ok(())
}

/// Validate that an optional string, if present, is within the length limit.
pub fn validate_optional_text(
    value: &Option<String>,
    field: &str,
    max_len: usize,
) -> Result<(), AppError> {
    if let Some(v) = value
        && v.len() > max_len
    {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            v.len()
        )));
    }
    Ok(())
}

/// Validate that a monetary value is finite (not NaN, not Infinity)
pub fn require_finite(value: f64, field: &str) -> Result<(), AppError> {
    if !value.is_finite() {
        return Err(AppError::validation(format!(
            "{field} must be a finite number, got {value}"
        )));
    }
    Ok(())
}

/// Run `validator` rules and convert failures into a validation error
/// carrying one detail entry per offending field.
pub fn validate_payload<T: Validate>(payload: &T) -> Result<(), AppError> {
    payload.validate().map_err(validation_errors_to_app_error)
}

fn validation_errors_to_app_error(errors: ValidationErrors) -> AppError {
    let mut fields: Vec<String> = errors
        .errors()
        .keys()
        .map(|field| field.to_string())
        .collect();
    fields.sort();

    let mut err = AppError::validation(format!("Invalid fields: {}", fields.join(", ")));
    for (field, kind) in errors.errors() {
        err = err.with_detail(field.to_string(), describe(kind));
    }
    err
}

fn describe(kind: &validator::ValidationErrorsKind) -> String {
    use validator::ValidationErrorsKind;
    match kind {
        ValidationErrorsKind::Field(errs) => errs
            .iter()
            .map(|e| e.code.to_string())
            .collect::<Vec<_>>()
            .join(","),
        ValidationErrorsKind::Struct(_) => "invalid".to_string(),
        ValidationErrorsKind::List(items) => {
            let mut idx: Vec<String> = items.keys().map(|i| i.to_string()).collect();
            idx.sort();
            format!("invalid items: {}", idx.join(","))
        }
    }
}

// ── Extractors ──────────────────────────────────────────────────────

/// JSON body, deserialized and checked with `validator`
pub struct ValidJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let axum::Json(payload) = axum::Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| AppError::validation(rejection.body_text()))?;
        validate_payload(&payload)?;
        Ok(Self(payload))
    }
}

/// JSON body with the rejection rendered as a validation error
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let axum::Json(payload) = axum::Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| AppError::validation(rejection.body_text()))?;
        Ok(Self(payload))
    }
}

/// Query string with the rejection rendered as a validation error
pub struct QueryParams<T>(pub T);

impl<S, T> FromRequestParts<S> for QueryParams<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let axum::extract::Query(params) =
            axum::extract::Query::<T>::from_request_parts(parts, state)
                .await
                .map_err(|rejection| AppError::validation(rejection.body_text()))?;
        Ok(Self(params))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::{ProductCreate, SaleItemInput, SaleRequest, StudentRef};

    #[test]
    fn required_text_rejects_blank() {
        assert!(validate_required_text("   ", "name", MAX_NAME_LEN).is_err());
        assert!(validate_required_text("Pens", "name", MAX_NAME_LEN).is_ok());
        assert!(validate_required_text(&"x".repeat(201), "name", MAX_NAME_LEN).is_err());
    }

    #[test]
    fn optional_text_limit() {
        assert!(validate_optional_text(&None, "reason", MAX_NOTE_LEN).is_ok());
        assert!(validate_optional_text(&Some("x".repeat(501)), "reason", MAX_NOTE_LEN).is_err());
    }

    #[test]
    fn finite_check() {
        assert!(require_finite(1.5, "price").is_ok());
        assert!(require_finite(f64::NAN, "price").is_err());
        assert!(require_finite(f64::INFINITY, "price").is_err());
    }

    #[test]
    fn payload_errors_name_fields() {
        let payload = ProductCreate {
            name: String::new(),
            category_id: 1,
            price: -1.0,
            stock: Some(-3),
            low_stock_threshold: None,
            barcode: None,
            description: None,
            is_active: None,
        };
        let err = validate_payload(&payload).unwrap_err();
        assert_eq!(err.code, shared::ErrorCode::ValidationFailed);
        let details = err.details.unwrap();
        assert!(details.contains_key("name"));
        assert!(details.contains_key("price"));
        assert!(details.contains_key("stock"));
    }

    #[test]
    fn sale_request_line_rules() {
        let empty = SaleRequest {
            student_id: StudentRef::Id(1),
            items: vec![],
        };
        assert!(validate_payload(&empty).is_err());

        let zero_qty = SaleRequest {
            student_id: StudentRef::Id(1),
            items: vec![SaleItemInput {
                product_id: 1,
                quantity: 0,
                price: 10.0,
            }],
        };
        assert!(validate_payload(&zero_qty).is_err());

        let ok = SaleRequest {
            student_id: StudentRef::Id(1),
            items: vec![SaleItemInput {
                product_id: 1,
                quantity: 2,
                price: 30.0,
            }],
        };
        assert!(validate_payload(&ok).is_ok());
    }
}
