//! Repository helpers
//!
//! Every entity carries a nullable `deleted_at`. Reads go through [`SoftDelete::live`]
//! so a soft-deleted row is invisible to every query path, including eager loads.

use std::collections::{BTreeSet, HashMap};

use sea_orm::sea_query::Expr;
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Select};

use crate::entity::{department, employee, student, user};
use crate::error::{AppError, AppResult, OptionExt};

pub trait SoftDelete: EntityTrait {
    /// Display name used in "<noun> not found" messages
    const NOUN: &'static str;

    fn id_column() -> Self::Column;

    fn deleted_at_column() -> Self::Column;

    /// Live rows, ordered by id
    fn live() -> Select<Self> {
        Self::find()
            .filter(Self::deleted_at_column().is_null())
            .order_by_asc(Self::id_column())
    }

    fn live_by_id(id: i64) -> Select<Self> {
        Self::live().filter(Self::id_column().eq(id))
    }

    fn live_by_ids(ids: Vec<i64>) -> Select<Self> {
        Self::live().filter(Self::id_column().is_in(ids))
    }

    fn not_found() -> String {
        format!("{} not found", Self::NOUN)
    }
}

/// Fetch a live row by primary key or fail with NotFound
pub async fn find_live<E, C>(db: &C, id: i64) -> AppResult<E::Model>
where
    E: SoftDelete,
    C: ConnectionTrait,
{
    E::live_by_id(id).one(db).await?.ok_or_not_found(E::not_found())
}

/// Set `deleted_at` on a live row. A row that is missing or already deleted is NotFound.
pub async fn soft_delete<E, C>(db: &C, id: i64) -> AppResult<()>
where
    E: SoftDelete,
    C: ConnectionTrait,
{
    let result = E::update_many()
        .col_expr(E::deleted_at_column(), Expr::value(chrono::Utc::now()))
        .filter(E::id_column().eq(id))
        .filter(E::deleted_at_column().is_null())
        .exec(db)
        .await?;

    if result.rows_affected == 0 {
        return Err(AppError::NotFound(E::not_found()));
    }
    Ok(())
}

/// Load the live rows whose ids appear in `ids`, indexed by id
pub async fn index_live<E, C, F>(
    db: &C,
    ids: impl IntoIterator<Item = i64>,
    key: F,
) -> AppResult<HashMap<i64, E::Model>>
where
    E: SoftDelete,
    C: ConnectionTrait,
    F: Fn(&E::Model) -> i64,
{
    let ids: BTreeSet<i64> = ids.into_iter().collect();
    if ids.is_empty() {
        return Ok(HashMap::new());
    }

    let rows = E::live_by_ids(ids.into_iter().collect()).all(db).await?;
    Ok(rows.into_iter().map(|m| (key(&m), m)).collect())
}

impl SoftDelete for student::Entity {
    const NOUN: &'static str = "Student";

    fn id_column() -> Self::Column {
        student::Column::Id
    }

    fn deleted_at_column() -> Self::Column {
        student::Column::DeletedAt
    }
}

impl SoftDelete for employee::Entity {
    const NOUN: &'static str = "Employee";

    fn id_column() -> Self::Column {
        employee::Column::Id
    }

    fn deleted_at_column() -> Self::Column {
        employee::Column::DeletedAt
    }
}

impl SoftDelete for department::Entity {
    const NOUN: &'static str = "Department";

    fn id_column() -> Self::Column {
        department::Column::Id
    }

    fn deleted_at_column() -> Self::Column {
        department::Column::DeletedAt
    }
}

impl SoftDelete for user::Entity {
    const NOUN: &'static str = "User";

    fn id_column() -> Self::Column {
        user::Column::Id
    }

    fn deleted_at_column() -> Self::Column {
        user::Column::DeletedAt
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::memory_database;
    use sea_orm::{ActiveModelTrait, DbBackend, QueryTrait, Set};

    #[test]
    fn test_live_filters_deleted() {
        let sql = student::Entity::live_by_id(7)
            .build(DbBackend::Postgres)
            .to_string();
        assert!(sql.contains(r#""students"."deleted_at" IS NULL"#), "{sql}");
        assert!(sql.contains(r#""students"."id" = 7"#), "{sql}");
    }

    #[tokio::test]
    async fn test_soft_delete_only_once() {
        let db = memory_database().await;
        let stored = student::ActiveModel {
            student_code: Set("SV1".to_string()),
            first_name: Set("A".to_string()),
            last_name: Set("B".to_string()),
            email: Set("a@b.com".to_string()),
            status: Set(student::StudentStatus::Active),
            ..Default::default()
        }
        .insert(&db)
        .await
        .unwrap();

        soft_delete::<student::Entity, _>(&db, stored.id).await.unwrap();
        assert!(find_live::<student::Entity, _>(&db, stored.id).await.is_err());

        let err = soft_delete::<student::Entity, _>(&db, stored.id)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(ref msg) if msg == "Student not found"));

        let err = soft_delete::<student::Entity, _>(&db, 999).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[test]
    fn test_not_found_message() {
        assert_eq!(student::Entity::not_found(), "Student not found");
        assert_eq!(department::Entity::not_found(), "Department not found");
    }
}
