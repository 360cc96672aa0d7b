//! Student handlers
//!
//! Implements student CRUD operations and the major/status filters

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::Json,
};
use chrono::NaiveDate;
use sea_orm::{ActiveModelTrait, ColumnTrait, IntoActiveModel, QueryFilter, Set};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::entity::student::{self, StudentStatus};
use crate::error::{AppError, AppResult};
use crate::handlers::bind::{bind, flexible_date, overlay, PathId, QueryParams};
use crate::repo::{find_live, soft_delete, SoftDelete};
use crate::routes::{ApiResponse, MessageResponse};
use crate::state::AppState;

/// Client-writable student fields, used for both create and update
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct StudentPayload {
    #[validate(length(min = 1, max = 20))]
    pub student_code: String,
    #[validate(length(min = 1, max = 100))]
    pub first_name: String,
    #[validate(length(min = 1, max = 100))]
    pub last_name: String,
    #[validate(length(min = 1, max = 255))]
    pub email: String,
    #[serde(default)]
    #[validate(length(max = 20))]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "flexible_date::deserialize")]
    pub date_of_birth: Option<NaiveDate>,
    #[serde(default)]
    #[validate(length(max = 500))]
    pub address: Option<String>,
    #[serde(default)]
    #[validate(length(max = 100))]
    pub major: Option<String>,
    #[serde(default)]
    #[validate(range(min = 1, max = 6))]
    pub year: Option<i32>,
    #[serde(default)]
    #[validate(range(min = 0.0, max = 4.0))]
    pub gpa: Option<f64>,
    #[serde(default)]
    pub status: StudentStatus,
}

impl From<&student::Model> for StudentPayload {
    fn from(m: &student::Model) -> Self {
        Self {
            student_code: m.student_code.clone(),
            first_name: m.first_name.clone(),
            last_name: m.last_name.clone(),
            email: m.email.clone(),
            phone: m.phone.clone(),
            date_of_birth: m.date_of_birth,
            address: m.address.clone(),
            major: m.major.clone(),
            year: m.year,
            gpa: m.gpa,
            status: m.status,
        }
    }
}

impl StudentPayload {
    /// Write every field onto the active model (full-record replace)
    fn apply(self, am: &mut student::ActiveModel) {
        am.student_code = Set(self.student_code);
        am.first_name = Set(self.first_name);
        am.last_name = Set(self.last_name);
        am.email = Set(self.email);
        am.phone = Set(self.phone);
        am.date_of_birth = Set(self.date_of_birth);
        am.address = Set(self.address);
        am.major = Set(self.major);
        am.year = Set(self.year);
        am.gpa = Set(self.gpa);
        am.status = Set(self.status);
    }
}

#[derive(Debug, Deserialize)]
pub struct MajorQuery {
    pub major: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct StatusQuery {
    pub status: Option<String>,
}

/// GET /api/v1/students
pub async fn get_students(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<Vec<student::Model>>>> {
    let students = student::Entity::live().all(&state.db).await?;
    Ok(Json(ApiResponse::list(students)))
}

/// GET /api/v1/students/:id
pub async fn get_student(
    State(state): State<AppState>,
    PathId(id): PathId,
) -> AppResult<Json<ApiResponse<student::Model>>> {
    let student = find_live::<student::Entity, _>(&state.db, id).await?;
    Ok(Json(ApiResponse::success(student)))
}

/// POST /api/v1/students
pub async fn create_student(
    State(state): State<AppState>,
    body: Bytes,
) -> AppResult<(StatusCode, Json<ApiResponse<student::Model>>)> {
    let payload: StudentPayload = bind(&body)?;

    let mut am = student::ActiveModel {
        ..Default::default()
    };
    payload.apply(&mut am);

    let student = am.insert(&state.db).await?;
    tracing::info!("Created student {} ({})", student.id, student.student_code);

    Ok((StatusCode::CREATED, Json(ApiResponse::success(student))))
}

/// PUT /api/v1/students/:id
pub async fn update_student(
    State(state): State<AppState>,
    PathId(id): PathId,
    body: Bytes,
) -> AppResult<Json<ApiResponse<student::Model>>> {
    let existing = find_live::<student::Entity, _>(&state.db, id).await?;
    let payload = overlay(&StudentPayload::from(&existing), &body)?;

    let mut am = existing.into_active_model();
    payload.apply(&mut am);
    am.update(&state.db).await?;

    let student = find_live::<student::Entity, _>(&state.db, id).await?;
    Ok(Json(ApiResponse::success(student)))
}

/// DELETE /api/v1/students/:id
pub async fn delete_student(
    State(state): State<AppState>,
    PathId(id): PathId,
) -> AppResult<Json<MessageResponse>> {
    soft_delete::<student::Entity, _>(&state.db, id).await?;
    tracing::info!("Soft-deleted student {}", id);
    Ok(Json(MessageResponse::new("Student deleted successfully")))
}

/// GET /api/v1/students/major?major=X
pub async fn get_students_by_major(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<MajorQuery>,
) -> AppResult<Json<ApiResponse<Vec<student::Model>>>> {
    let major = query.major.unwrap_or_default();
    if major.is_empty() {
        return Err(AppError::BadRequest("Major parameter is required".to_string()));
    }

    let students = student::Entity::live()
        .filter(student::Column::Major.eq(major.as_str()))
        .all(&state.db)
        .await?;

    Ok(Json(ApiResponse::list(students).with_filter("major", major)))
}

/// GET /api/v1/students/status?status=X (defaults to active)
pub async fn get_students_by_status(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<StatusQuery>,
) -> AppResult<Json<ApiResponse<Vec<student::Model>>>> {
    let status = query
        .status
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "active".to_string());

    let students = student::Entity::live()
        .filter(student::Column::Status.eq(status.as_str()))
        .all(&state.db)
        .await?;

    Ok(Json(ApiResponse::list(students).with_filter("status", status)))
}

#[cfg(test)]
mod tests {
    use crate::test_support::{send, TestApp};
    use axum::http::StatusCode;
    use serde_json::json;

    fn sv(code: &str, email: &str) -> serde_json::Value {
        json!({"student_code": code, "first_name": "A", "last_name": "B", "email": email})
    }

    #[tokio::test]
    async fn test_create_student_defaults_to_active() {
        let app = TestApp::new().await;
        let (status, body) = send(&app, "POST", "/api/v1/students", Some(sv("SV100", "a@b.com"))).await;

        assert_eq!(status, StatusCode::CREATED);
        let data = &body["data"];
        assert!(data["id"].as_i64().unwrap() > 0);
        assert_eq!(data["student_code"], "SV100");
        assert_eq!(data["status"], "active");
        assert!(data.get("deleted_at").is_none());
    }

    #[tokio::test]
    async fn test_duplicate_code_or_email_is_internal_error() {
        let app = TestApp::new().await;
        send(&app, "POST", "/api/v1/students", Some(sv("SV1", "one@x.com"))).await;

        let (status, body) = send(&app, "POST", "/api/v1/students", Some(sv("SV1", "two@x.com"))).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["error"].is_string());

        let (status, _) = send(&app, "POST", "/api/v1/students", Some(sv("SV2", "one@x.com"))).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_input() {
        let app = TestApp::new().await;

        let (status, _) = send(&app, "POST", "/api/v1/students", Some(json!({"student_code": "X"}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let mut bad_year = sv("SV9", "y@x.com");
        bad_year["year"] = json!(7);
        let (status, _) = send(&app, "POST", "/api/v1/students", Some(bad_year)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let mut bad_gpa = sv("SV9", "y@x.com");
        bad_gpa["gpa"] = json!(4.5);
        let (status, _) = send(&app, "POST", "/api/v1/students", Some(bad_gpa)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let mut bad_status = sv("SV9", "y@x.com");
        bad_status["status"] = json!("expelled");
        let (status, _) = send(&app, "POST", "/api/v1/students", Some(bad_status)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = app.raw("POST", "/api/v1/students", "{not json").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn test_get_missing_student() {
        let app = TestApp::new().await;
        let (status, body) = send(&app, "GET", "/api/v1/students/99999", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({"error": "Student not found"}));

        let (status, _) = send(&app, "GET", "/api/v1/students/abc", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_delete_then_get_and_delete_again() {
        let app = TestApp::new().await;
        let (_, created) = send(&app, "POST", "/api/v1/students", Some(sv("SV3", "c@x.com"))).await;
        let uri = format!("/api/v1/students/{}", created["data"]["id"]);

        let (status, body) = send(&app, "DELETE", &uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"message": "Student deleted successfully"}));

        let (status, _) = send(&app, "GET", &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(&app, "DELETE", &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (_, list) = send(&app, "GET", "/api/v1/students", None).await;
        assert_eq!(list["count"], 0);
    }

    #[tokio::test]
    async fn test_deleted_code_can_be_reused() {
        let app = TestApp::new().await;
        let (_, created) = send(&app, "POST", "/api/v1/students", Some(sv("SV4", "d@x.com"))).await;
        let uri = format!("/api/v1/students/{}", created["data"]["id"]);
        send(&app, "DELETE", &uri, None).await;

        let (status, _) = send(&app, "POST", "/api/v1/students", Some(sv("SV4", "d@x.com"))).await;
        assert_eq!(status, StatusCode::CREATED);
    }

    #[tokio::test]
    async fn test_update_overlays_fields() {
        let app = TestApp::new().await;
        let mut input = sv("SV5", "e@x.com");
        input["major"] = json!("Data Science");
        input["year"] = json!(2);
        let (_, created) = send(&app, "POST", "/api/v1/students", Some(input)).await;
        let uri = format!("/api/v1/students/{}", created["data"]["id"]);

        let (status, body) = send(
            &app,
            "PUT",
            &uri,
            Some(json!({"year": 3, "status": "graduated", "id": 12345})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let data = &body["data"];
        assert_eq!(data["id"], created["data"]["id"]);
        assert_eq!(data["year"], 3);
        assert_eq!(data["status"], "graduated");
        assert_eq!(data["major"], "Data Science");
        assert_eq!(data["student_code"], "SV5");
    }

    #[tokio::test]
    async fn test_bad_update_leaves_row_unchanged() {
        let app = TestApp::new().await;
        let mut input = sv("SV6", "f@x.com");
        input["year"] = json!(1);
        let (_, created) = send(&app, "POST", "/api/v1/students", Some(input)).await;
        let uri = format!("/api/v1/students/{}", created["data"]["id"]);

        let (status, _) = app.raw("PUT", &uri, "{\"year\": ").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send(&app, "PUT", &uri, Some(json!({"year": 10}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (_, body) = send(&app, "GET", &uri, None).await;
        assert_eq!(body["data"]["year"], 1);
    }

    #[tokio::test]
    async fn test_update_missing_student() {
        let app = TestApp::new().await;
        let (status, _) = send(&app, "PUT", "/api/v1/students/42", Some(json!({"year": 2}))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_filter_by_major() {
        let app = TestApp::new().await;
        for (code, email, major) in [("M1", "m1@x.com", "CS"), ("M2", "m2@x.com", "IT"), ("M3", "m3@x.com", "CS")] {
            let mut input = sv(code, email);
            input["major"] = json!(major);
            send(&app, "POST", "/api/v1/students", Some(input)).await;
        }

        let (status, body) = send(&app, "GET", "/api/v1/students/major?major=CS", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["count"], 2);
        assert_eq!(body["major"], "CS");

        let (status, body) = send(&app, "GET", "/api/v1/students/major", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"error": "Major parameter is required"}));
    }

    #[tokio::test]
    async fn test_filter_by_status_defaults_to_active() {
        let app = TestApp::new().await;
        send(&app, "POST", "/api/v1/students", Some(sv("S1", "s1@x.com"))).await;
        let mut graduated = sv("S2", "s2@x.com");
        graduated["status"] = json!("graduated");
        send(&app, "POST", "/api/v1/students", Some(graduated)).await;

        let (_, body) = send(&app, "GET", "/api/v1/students/status", None).await;
        assert_eq!(body["count"], 1);
        assert_eq!(body["status"], "active");
        assert_eq!(body["data"][0]["student_code"], "S1");

        let (_, body) = send(&app, "GET", "/api/v1/students/status?status=graduated", None).await;
        assert_eq!(body["count"], 1);
        assert_eq!(body["data"][0]["student_code"], "S2");
    }

    #[tokio::test]
    async fn test_malformed_query_uses_error_envelope() {
        let app = TestApp::new().await;
        let (status, body) = send(&app, "GET", "/api/v1/students/status?status=a&status=b", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("status"));

        let (status, body) = send(&app, "GET", "/api/v1/students/major?major=CS&major=IT", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn test_email_is_stored_as_given() {
        let app = TestApp::new().await;
        let (status, body) = send(&app, "POST", "/api/v1/students", Some(sv("SV7", "student-seven"))).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["data"]["email"], "student-seven");

        let (status, _) = send(&app, "POST", "/api/v1/students", Some(sv("SV8", ""))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
