//! User handlers
//!
//! Implements user CRUD operations. Passwords are stored as bcrypt hashes and
//! never serialized back to clients.

use axum::{body::Bytes, extract::State, http::StatusCode, response::Json};
use sea_orm::{ActiveModelTrait, IntoActiveModel, Set};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::entity::user;
use crate::error::{AppError, AppResult};
use crate::handlers::bind::{bind, overlay, PathId};
use crate::repo::{find_live, soft_delete, SoftDelete};
use crate::routes::{ApiResponse, MessageResponse};
use crate::state::AppState;

/// Client-writable user fields. `password` is write-only.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UserPayload {
    #[validate(length(min = 1, max = 32))]
    pub username: String,
    #[validate(length(min = 1, max = 255))]
    pub email: String,
    #[serde(default)]
    #[validate(length(max = 100))]
    pub full_name: Option<String>,
    #[serde(default, skip_serializing)]
    #[validate(length(min = 6, max = 72))]
    pub password: Option<String>,
}

impl From<&user::Model> for UserPayload {
    fn from(m: &user::Model) -> Self {
        Self {
            username: m.username.clone(),
            email: m.email.clone(),
            full_name: m.full_name.clone(),
            password: None,
        }
    }
}

impl UserPayload {
    /// Write every field onto the active model; a new password is hashed first
    fn apply(self, am: &mut user::ActiveModel) -> AppResult<()> {
        am.username = Set(self.username);
        am.email = Set(self.email);
        am.full_name = Set(self.full_name);
        if let Some(password) = self.password {
            am.password = Set(bcrypt::hash(password, bcrypt::DEFAULT_COST)?);
        }
        Ok(())
    }
}

/// GET /api/v1/users
pub async fn get_users(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<Vec<user::Model>>>> {
    let users = user::Entity::live().all(&state.db).await?;
    Ok(Json(ApiResponse::list(users)))
}

/// GET /api/v1/users/:id
pub async fn get_user(
    State(state): State<AppState>,
    PathId(id): PathId,
) -> AppResult<Json<ApiResponse<user::Model>>> {
    let user = find_live::<user::Entity, _>(&state.db, id).await?;
    Ok(Json(ApiResponse::success(user)))
}

/// POST /api/v1/users
pub async fn create_user(
    State(state): State<AppState>,
    body: Bytes,
) -> AppResult<(StatusCode, Json<ApiResponse<user::Model>>)> {
    let payload: UserPayload = bind(&body)?;
    if payload.password.is_none() {
        return Err(AppError::BadRequest("password is required".to_string()));
    }

    let mut am = user::ActiveModel {
        ..Default::default()
    };
    payload.apply(&mut am)?;
    let user = am.insert(&state.db).await?;
    tracing::info!("Created user {} ({})", user.id, user.username);

    Ok((StatusCode::CREATED, Json(ApiResponse::success(user))))
}

/// PUT /api/v1/users/:id
pub async fn update_user(
    State(state): State<AppState>,
    PathId(id): PathId,
    body: Bytes,
) -> AppResult<Json<ApiResponse<user::Model>>> {
    let existing = find_live::<user::Entity, _>(&state.db, id).await?;
    let payload = overlay(&UserPayload::from(&existing), &body)?;

    let mut am = existing.into_active_model();
    payload.apply(&mut am)?;
    am.update(&state.db).await?;

    let user = find_live::<user::Entity, _>(&state.db, id).await?;
    Ok(Json(ApiResponse::success(user)))
}

/// DELETE /api/v1/users/:id
pub async fn delete_user(
    State(state): State<AppState>,
    PathId(id): PathId,
) -> AppResult<Json<MessageResponse>> {
    soft_delete::<user::Entity, _>(&state.db, id).await?;
    tracing::info!("Soft-deleted user {}", id);
    Ok(Json(MessageResponse::new("User deleted successfully")))
}
