use std::collections::BTreeMap;

use axum::{
    http::StatusCode,
    middleware,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use serde::Serialize;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::handlers;
use crate::middleware::preflight_layer;
use crate::state::AppState;

pub mod health;

/// API response wrapper: `{"data": ..., "count"?: n}` plus any echoed filter
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    #[serde(flatten)]
    pub filter: BTreeMap<&'static str, String>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            data,
            count: None,
            filter: BTreeMap::new(),
        }
    }

    /// Echo an applied query filter next to the data
    pub fn with_filter(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.filter.insert(name, value.into());
        self
    }
}

impl<T: Serialize> ApiResponse<Vec<T>> {
    pub fn list(data: Vec<T>) -> Self {
        let count = data.len();
        Self {
            data,
            count: Some(count),
            filter: BTreeMap::new(),
        }
    }
}

/// `{"message": ...}` body for operations without data
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Create the main router
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        // Student routes
        .route(
            "/students",
            get(handlers::student::get_students).post(handlers::student::create_student),
        )
        .route("/students/major", get(handlers::student::get_students_by_major))
        .route("/students/status", get(handlers::student::get_students_by_status))
        .route(
            "/students/:id",
            get(handlers::student::get_student)
                .put(handlers::student::update_student)
                .delete(handlers::student::delete_student),
        )
        // Employee routes
        .route(
            "/employees",
            get(handlers::employee::get_employees).post(handlers::employee::create_employee),
        )
        .route("/employees/status", get(handlers::employee::get_employees_by_status))
        .route(
            "/employees/department/:department_id",
            get(handlers::employee::get_employees_by_department),
        )
        .route(
            "/employees/:id",
            get(handlers::employee::get_employee)
                .put(handlers::employee::update_employee)
                .delete(handlers::employee::delete_employee),
        )
        // Department routes
        .route(
            "/departments",
            get(handlers::department::get_departments)
                .post(handlers::department::create_department),
        )
        .route(
            "/departments/:id",
            get(handlers::department::get_department)
                .put(handlers::department::update_department)
                .delete(handlers::department::delete_department),
        )
        // User routes
        .route(
            "/users",
            get(handlers::user::get_users).post(handlers::user::create_user),
        )
        .route(
            "/users/:id",
            get(handlers::user::get_user)
                .put(handlers::user::update_user)
                .delete(handlers::user::delete_user),
        );

    Router::new()
        .route("/health", get(health::health_check))
        .nest("/api/v1", api_routes)
        .fallback(fallback)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(middleware::from_fn(preflight_layer))
        .with_state(state)
}

/// Fallback handler for 404
pub async fn fallback() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(serde_json::json!({"error": "Not Found"})),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{send, TestApp};
    use axum::{body::Body, http::Request};
    use serde_json::json;
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_health() {
        let app = TestApp::new().await;
        let (status, body) = send(&app, "GET", "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"status": "ok"}));
    }

    #[tokio::test]
    async fn test_preflight_returns_no_content() {
        let app = TestApp::new().await;
        let request = Request::builder()
            .method("OPTIONS")
            .uri("/api/v1/students")
            .header("origin", "http://localhost:3000")
            .header("access-control-request-method", "POST")
            .body(Body::empty())
            .unwrap();
        let response = app.router.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert_eq!(
            response.headers().get("access-control-allow-origin").unwrap(),
            "*"
        );

        let (status, _) = app.raw("OPTIONS", "/api/v1/anything", "").await;
        assert_eq!(status, StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn test_cors_header_on_regular_requests() {
        let app = TestApp::new().await;
        let request = Request::builder()
            .uri("/api/v1/students")
            .header("origin", "http://localhost:3000")
            .body(Body::empty())
            .unwrap();
        let response = app.router.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get("access-control-allow-origin").unwrap(),
            "*"
        );
    }

    #[tokio::test]
    async fn test_unknown_route() {
        let app = TestApp::new().await;
        let (status, body) = send(&app, "GET", "/api/v1/courses", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({"error": "Not Found"}));
    }

    #[test]
    fn test_list_envelope() {
        let body = serde_json::to_value(ApiResponse::list(vec![1, 2, 3])).unwrap();
        assert_eq!(body, serde_json::json!({"data": [1, 2, 3], "count": 3}));
    }

    #[test]
    fn test_single_envelope_and_filter() {
        let body = serde_json::to_value(ApiResponse::success("x")).unwrap();
        assert_eq!(body, serde_json::json!({"data": "x"}));

        let body =
            serde_json::to_value(ApiResponse::list(Vec::<i32>::new()).with_filter("status", "active"))
                .unwrap();
        assert_eq!(
            body,
            serde_json::json!({"data": [], "count": 0, "status": "active"})
        );
    }
}
