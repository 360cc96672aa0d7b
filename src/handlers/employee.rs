//! Employee handlers
//!
//! Every read attaches the employee's (live) department.

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::Json,
};
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, IntoActiveModel, QueryFilter, Set,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::entity::department;
use crate::entity::employee::{self, EmployeeStatus};
use crate::error::AppResult;
use crate::handlers::bind::{bind, overlay, PathId, QueryParams};
use crate::repo::{find_live, index_live, soft_delete, SoftDelete};
use crate::routes::{ApiResponse, MessageResponse};
use crate::state::AppState;

/// Employee with its department attached
#[derive(Debug, Serialize)]
pub struct EmployeeView {
    #[serde(flatten)]
    pub employee: employee::Model,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<department::Model>,
}

/// Client-writable employee fields, used for both create and update
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct EmployeePayload {
    #[validate(length(min = 1, max = 100))]
    pub first_name: String,
    #[validate(length(min = 1, max = 100))]
    pub last_name: String,
    #[validate(length(min = 1, max = 255))]
    pub email: String,
    #[serde(default)]
    #[validate(length(max = 20))]
    pub phone: Option<String>,
    #[serde(default)]
    pub department_id: Option<i64>,
    #[serde(default)]
    #[validate(length(max = 100))]
    pub position: Option<String>,
    #[serde(default)]
    pub status: EmployeeStatus,
    #[serde(default)]
    pub face_descriptor: Option<Vec<f64>>,
    /// Defaults to the creation time
    #[serde(default)]
    pub join_date: Option<DateTime<Utc>>,
    #[serde(default)]
    #[validate(length(max = 20))]
    pub employee_id: Option<String>,
}

impl From<&employee::Model> for EmployeePayload {
    fn from(m: &employee::Model) -> Self {
        Self {
            first_name: m.first_name.clone(),
            last_name: m.last_name.clone(),
            email: m.email.clone(),
            phone: m.phone.clone(),
            department_id: m.department_id,
            position: m.position.clone(),
            status: m.status,
            face_descriptor: m
                .face_descriptor
                .as_ref()
                .and_then(|v| serde_json::from_value(v.clone()).ok()),
            join_date: Some(m.join_date),
            employee_id: m.employee_id.clone(),
        }
    }
}

impl EmployeePayload {
    /// Write every field onto the active model (full-record replace)
    fn apply(self, am: &mut employee::ActiveModel) {
        am.first_name = Set(self.first_name);
        am.last_name = Set(self.last_name);
        am.email = Set(self.email);
        am.phone = Set(self.phone);
        am.department_id = Set(self.department_id);
        am.position = Set(self.position);
        am.status = Set(self.status);
        am.face_descriptor = Set(self.face_descriptor.map(serde_json::Value::from));
        if let Some(join_date) = self.join_date {
            am.join_date = Set(join_date);
        }
        am.employee_id = Set(self.employee_id);
    }
}

#[derive(Debug, Deserialize)]
pub struct StatusQuery {
    pub status: Option<String>,
}

/// Attach live departments to a batch of employees
pub async fn with_departments<C>(db: &C, employees: Vec<employee::Model>) -> AppResult<Vec<EmployeeView>>
where
    C: ConnectionTrait,
{
    let departments = index_live::<department::Entity, _, _>(
        db,
        employees.iter().filter_map(|e| e.department_id),
        |d| d.id,
    )
    .await?;

    let views = employees
        .into_iter()
        .map(|employee| {
            let department = employee
                .department_id
                .and_then(|id| departments.get(&id).cloned());
            EmployeeView { employee, department }
        })
        .collect();
    Ok(views)
}

async fn load_view<C>(db: &C, id: i64) -> AppResult<EmployeeView>
where
    C: ConnectionTrait,
{
    let employee = find_live::<employee::Entity, _>(db, id).await?;
    let mut views = with_departments(db, vec![employee]).await?;
    Ok(views.remove(0))
}

/// GET /api/v1/employees
pub async fn get_employees(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<Vec<EmployeeView>>>> {
    let employees = employee::Entity::live().all(&state.db).await?;
    let views = with_departments(&state.db, employees).await?;
    Ok(Json(ApiResponse::list(views)))
}

/// GET /api/v1/employees/:id
pub async fn get_employee(
    State(state): State<AppState>,
    PathId(id): PathId,
) -> AppResult<Json<ApiResponse<EmployeeView>>> {
    let view = load_view(&state.db, id).await?;
    Ok(Json(ApiResponse::success(view)))
}

/// POST /api/v1/employees
pub async fn create_employee(
    State(state): State<AppState>,
    body: Bytes,
) -> AppResult<(StatusCode, Json<ApiResponse<EmployeeView>>)> {
    let payload: EmployeePayload = bind(&body)?;

    let mut am = employee::ActiveModel {
        ..Default::default()
    };
    payload.apply(&mut am);
    let employee = am.insert(&state.db).await?;
    tracing::info!("Created employee {} ({})", employee.id, employee.email);

    let view = load_view(&state.db, employee.id).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(view))))
}

/// PUT /api/v1/employees/:id
pub async fn update_employee(
    State(state): State<AppState>,
    PathId(id): PathId,
    body: Bytes,
) -> AppResult<Json<ApiResponse<EmployeeView>>> {
    let existing = find_live::<employee::Entity, _>(&state.db, id).await?;
    let payload = overlay(&EmployeePayload::from(&existing), &body)?;

    let mut am = existing.into_active_model();
    payload.apply(&mut am);
    am.update(&state.db).await?;

    let view = load_view(&state.db, id).await?;
    Ok(Json(ApiResponse::success(view)))
}

/// DELETE /api/v1/employees/:id
pub async fn delete_employee(
    State(state): State<AppState>,
    PathId(id): PathId,
) -> AppResult<Json<MessageResponse>> {
    soft_delete::<employee::Entity, _>(&state.db, id).await?;
    tracing::info!("Soft-deleted employee {}", id);
    Ok(Json(MessageResponse::new("Employee deleted successfully")))
}

/// GET /api/v1/employees/department/:department_id
pub async fn get_employees_by_department(
    State(state): State<AppState>,
    PathId(department_id): PathId,
) -> AppResult<Json<ApiResponse<Vec<EmployeeView>>>> {
    let employees = employee::Entity::live()
        .filter(employee::Column::DepartmentId.eq(department_id))
        .all(&state.db)
        .await?;
    let views = with_departments(&state.db, employees).await?;
    Ok(Json(ApiResponse::list(views)))
}

/// GET /api/v1/employees/status?status=X (defaults to active)
pub async fn get_employees_by_status(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<StatusQuery>,
) -> AppResult<Json<ApiResponse<Vec<EmployeeView>>>> {
    let status = query
        .status
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "active".to_string());

    let employees = employee::Entity::live()
        .filter(employee::Column::Status.eq(status.as_str()))
        .all(&state.db)
        .await?;
    let views = with_departments(&state.db, employees).await?;

    Ok(Json(ApiResponse::list(views).with_filter("status", status)))
}
