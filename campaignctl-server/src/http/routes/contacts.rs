//! Contact endpoints, including bulk import

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use campaignctl_core::{BulkImportReport, ImportFailure};

use super::MessageResponse;
use crate::db::repos::{Contact, ContactRepo};
use crate::http::auth::AuthUser;
use crate::http::error::ApiError;
use crate::http::extractors::{ValidJson, ValidUuid};
use crate::http::server::AppState;
use crate::models::{ContactFilter, ContactInput, ValidationError};

/// Contact response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactResponse {
    pub id: Uuid,
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub tags: Vec<String>,
    pub status: String,
    pub last_activity: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Contact> for ContactResponse {
    fn from(c: Contact) -> Self {
        Self {
            id: c.id,
            name: c.name,
            phone: c.phone,
            email: c.email,
            tags: c.tags,
            status: c.status,
            last_activity: c.last_activity,
            created_at: c.created_at,
            updated_at: c.updated_at,
        }
    }
}

/// Bulk import request. Items stay raw so one malformed entry fails alone.
#[derive(Debug, Deserialize)]
pub struct BulkImportRequest {
    pub contacts: Option<Vec<Value>>,
}

/// Bulk import response
#[derive(Debug, Serialize)]
pub struct BulkImportResponse {
    pub message: String,
    pub imported: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failed: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<ImportFailure>>,
}

/// 201 when every item was imported, 207 with the failures otherwise.
fn import_response(report: BulkImportReport) -> (StatusCode, BulkImportResponse) {
    let message = report.message();
    let imported = report.imported();

    if report.is_complete() {
        return (
            StatusCode::CREATED,
            BulkImportResponse {
                message,
                imported,
                failed: None,
                errors: None,
            },
        );
    }

    let failed = report.failed();
    (
        StatusCode::MULTI_STATUS,
        BulkImportResponse {
            message,
            imported,
            failed: Some(failed),
            errors: Some(report.into_errors()),
        },
    )
}

/// GET /contacts?search=&status=
async fn list_contacts(
    State(state): State<Arc<AppState>>,
    _auth: AuthUser,
    Query(filter): Query<ContactFilter>,
) -> Result<Json<Vec<ContactResponse>>, ApiError> {
    let status = filter.status()?;
    let contacts = ContactRepo::new(&state.pool)
        .list(filter.search(), status)
        .await?;
    Ok(Json(contacts.into_iter().map(ContactResponse::from).collect()))
}

/// POST /contacts
async fn create_contact(
    State(state): State<Arc<AppState>>,
    _auth: AuthUser,
    ValidJson(req): ValidJson<ContactInput>,
) -> Result<(StatusCode, Json<ContactResponse>), ApiError> {
    let fields = req.into_fields()?;
    let contact = ContactRepo::new(&state.pool).create(&fields).await?;
    tracing::info!(contact_id = %contact.id, "contact created");

    Ok((StatusCode::CREATED, Json(ContactResponse::from(contact))))
}

/// GET /contacts/{id}
async fn get_contact(
    State(state): State<Arc<AppState>>,
    _auth: AuthUser,
    ValidUuid(id): ValidUuid,
) -> Result<Json<ContactResponse>, ApiError> {
    let contact = ContactRepo::new(&state.pool).get(id).await?;
    Ok(Json(ContactResponse::from(contact)))
}

/// PUT /contacts/{id} - partial update
async fn update_contact(
    State(state): State<Arc<AppState>>,
    _auth: AuthUser,
    ValidUuid(id): ValidUuid,
    ValidJson(req): ValidJson<ContactInput>,
) -> Result<Json<ContactResponse>, ApiError> {
    let repo = ContactRepo::new(&state.pool);
    let current = repo.get(id).await?;
    let fields = req.merge(current.fields()?)?;
    let contact = repo.update(id, &fields).await?;

    Ok(Json(ContactResponse::from(contact)))
}

/// DELETE /contacts/{id}
async fn delete_contact(
    State(state): State<Arc<AppState>>,
    _auth: AuthUser,
    ValidUuid(id): ValidUuid,
) -> Result<Json<MessageResponse>, ApiError> {
    ContactRepo::new(&state.pool).delete(id).await?;
    tracing::info!(contact_id = %id, "contact deleted");
    Ok(MessageResponse::new("Contact deleted successfully"))
}

/// POST /contacts/bulk-import
///
/// Items are validated and inserted one by one, in order, without an
/// enclosing transaction. Validation and duplicate-phone failures are
/// collected; any other database error aborts the request.
async fn bulk_import(
    State(state): State<Arc<AppState>>,
    _auth: AuthUser,
    ValidJson(req): ValidJson<BulkImportRequest>,
) -> Result<(StatusCode, Json<BulkImportResponse>), ApiError> {
    let items = req
        .contacts
        .ok_or(ValidationError::Empty { field: "contacts" })?;

    let repo = ContactRepo::new(&state.pool);
    let mut report = BulkImportReport::new();

    for (index, item) in items.into_iter().enumerate() {
        let phone = submitted_phone(&item);

        let fields = match serde_json::from_value::<ContactInput>(item)
            .map_err(|e| e.to_string())
            .and_then(|input| input.into_fields().map_err(|e| e.to_string()))
        {
            Ok(fields) => fields,
            Err(message) => {
                report.record_failure(index, phone, message);
                continue;
            }
        };

        match repo.create(&fields).await {
            Ok(_) => report.record_success(),
            Err(e) if e.is_duplicate() => report.record_failure(index, phone, e.to_string()),
            Err(e) => return Err(e.into()),
        }
    }

    tracing::info!(
        imported = report.imported(),
        failed = report.failed(),
        "bulk contact import finished"
    );

    let (status, body) = import_response(report);
    Ok((status, Json(body)))
}

/// Phone as submitted, for failure reports.
fn submitted_phone(item: &Value) -> String {
    match item.get("phone") {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    }
}

/// Contact routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/contacts", get(list_contacts).post(create_contact))
        .route("/contacts/bulk-import", post(bulk_import))
        .route(
            "/contacts/{id}",
            get(get_contact).put(update_contact).delete(delete_contact),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn complete_import_is_201_without_errors() {
        let mut report = BulkImportReport::new();
        report.record_success();
        report.record_success();

        let (status, body) = import_response(report);
        assert_eq!(status, StatusCode::CREATED);
        let json = serde_json::to_value(body).unwrap();
        assert_eq!(json, json!({"message": "2 contacts imported successfully", "imported": 2}));
    }

    #[test]
    fn partial_import_is_207_with_errors() {
        let mut report = BulkImportReport::new();
        for _ in 0..3 {
            report.record_success();
        }
        report.record_failure(3, "+1555", "Phone number already exists");
        report.record_failure(4, "+1666", "Phone number already exists");

        let (status, body) = import_response(report);
        assert_eq!(status, StatusCode::MULTI_STATUS);
        let json = serde_json::to_value(body).unwrap();
        assert_eq!(json["imported"], 3);
        assert_eq!(json["failed"], 2);
        assert_eq!(json["message"], "3 contacts imported, 2 failed");
        assert_eq!(json["errors"][0]["index"], 3);
        assert_eq!(json["errors"][1]["phone"], "+1666");
    }

    #[test]
    fn submitted_phone_variants() {
        assert_eq!(submitted_phone(&json!({"phone": " +1 "})), " +1 ");
        assert_eq!(submitted_phone(&json!({"phone": 15550100})), "15550100");
        assert_eq!(submitted_phone(&json!({"name": "x"})), "");
        assert_eq!(submitted_phone(&json!("not an object")), "");
    }

    #[test]
    fn missing_contacts_array_deserializes_to_none() {
        let req: BulkImportRequest = serde_json::from_str("{}").unwrap();
        assert!(req.contacts.is_none());
    }
}
