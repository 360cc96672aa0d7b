//! Department handlers
//!
//! Implements department CRUD operations. Lists attach each department's manager;
//! a single department also carries its live employees.

use axum::{body::Bytes, extract::State, http::StatusCode, response::Json};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, IntoActiveModel, ModelTrait, QueryFilter,
    QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::entity::{department, employee};
use crate::error::AppResult;
use crate::handlers::bind::{bind, overlay, PathId};
use crate::repo::{find_live, index_live, soft_delete, SoftDelete};
use crate::routes::{ApiResponse, MessageResponse};
use crate::state::AppState;

/// Department with manager and, for single reads, its employees
#[derive(Debug, Serialize)]
pub struct DepartmentView {
    #[serde(flatten)]
    pub department: department::Model,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manager: Option<employee::Model>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub employees: Option<Vec<employee::Model>>,
}

/// Client-writable department fields
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct DepartmentPayload {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub manager_id: Option<i64>,
}

impl From<&department::Model> for DepartmentPayload {
    fn from(m: &department::Model) -> Self {
        Self {
            name: m.name.clone(),
            description: m.description.clone(),
            manager_id: m.manager_id,
        }
    }
}

impl DepartmentPayload {
    fn apply(self, am: &mut department::ActiveModel) {
        am.name = Set(self.name);
        am.description = Set(self.description);
        am.manager_id = Set(self.manager_id);
    }
}

/// Attach live managers to a batch of departments
async fn with_managers<C>(db: &C, departments: Vec<department::Model>) -> AppResult<Vec<DepartmentView>>
where
    C: ConnectionTrait,
{
    let managers = index_live::<employee::Entity, _, _>(
        db,
        departments.iter().filter_map(|d| d.manager_id),
        |e| e.id,
    )
    .await?;

    Ok(departments
        .into_iter()
        .map(|department| {
            let manager = department
                .manager_id
                .and_then(|id| managers.get(&id).cloned());
            DepartmentView {
                department,
                manager,
                employees: None,
            }
        })
        .collect())
}

/// Load one live department with manager and employees
async fn load_view<C>(db: &C, id: i64) -> AppResult<DepartmentView>
where
    C: ConnectionTrait,
{
    let department = find_live::<department::Entity, _>(db, id).await?;

    let employees = department
        .find_related(employee::Entity)
        .filter(employee::Column::DeletedAt.is_null())
        .order_by_asc(employee::Column::Id)
        .all(db)
        .await?;

    let manager = match department.manager_id {
        Some(manager_id) => employee::Entity::live_by_id(manager_id).one(db).await?,
        None => None,
    };

    Ok(DepartmentView {
        department,
        manager,
        employees: Some(employees),
    })
}

/// GET /api/v1/departments
pub async fn get_departments(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<Vec<DepartmentView>>>> {
    let departments = department::Entity::live().all(&state.db).await?;
    let views = with_managers(&state.db, departments).await?;
    Ok(Json(ApiResponse::list(views)))
}

/// GET /api/v1/departments/:id
pub async fn get_department(
    State(state): State<AppState>,
    PathId(id): PathId,
) -> AppResult<Json<ApiResponse<DepartmentView>>> {
    let view = load_view(&state.db, id).await?;
    Ok(Json(ApiResponse::success(view)))
}

/// POST /api/v1/departments
pub async fn create_department(
    State(state): State<AppState>,
    body: Bytes,
) -> AppResult<(StatusCode, Json<ApiResponse<department::Model>>)> {
    let payload: DepartmentPayload = bind(&body)?;

    let mut am = department::ActiveModel {
        ..Default::default()
    };
    payload.apply(&mut am);
    let department = am.insert(&state.db).await?;
    tracing::info!("Created department {} ({})", department.id, department.name);

    Ok((StatusCode::CREATED, Json(ApiResponse::success(department))))
}

/// PUT /api/v1/departments/:id
pub async fn update_department(
    State(state): State<AppState>,
    PathId(id): PathId,
    body: Bytes,
) -> AppResult<Json<ApiResponse<DepartmentView>>> {
    let existing = find_live::<department::Entity, _>(&state.db, id).await?;
    let payload = overlay(&DepartmentPayload::from(&existing), &body)?;

    let mut am = existing.into_active_model();
    payload.apply(&mut am);
    am.update(&state.db).await?;

    let view = load_view(&state.db, id).await?;
    Ok(Json(ApiResponse::success(view)))
}

/// DELETE /api/v1/departments/:id
pub async fn delete_department(
    State(state): State<AppState>,
    PathId(id): PathId,
) -> AppResult<Json<MessageResponse>> {
    soft_delete::<department::Entity, _>(&state.db, id).await?;
    tracing::info!("Soft-deleted department {}", id);
    Ok(Json(MessageResponse::new("Department deleted successfully")))
}
