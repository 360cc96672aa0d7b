//! Employee entity
//!
//! Table: employees

use async_trait::async_trait;
use sea_orm::entity::prelude::*;
use sea_orm::Set;
use serde::{Deserialize, Serialize};

/// Employment status
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(Some(20))")]
#[serde(rename_all = "lowercase")]
pub enum EmployeeStatus {
    #[default]
    #[sea_orm(string_value = "active")]
    Active,
    #[sea_orm(string_value = "inactive")]
    Inactive,
    #[sea_orm(string_value = "suspended")]
    Suspended,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "employees")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    #[sea_orm(column_type = "String(Some(100))")]
    pub first_name: String,

    #[sea_orm(column_type = "String(Some(100))")]
    pub last_name: String,

    /// Unique among live rows
    #[sea_orm(column_type = "String(Some(255))")]
    pub email: String,

    #[sea_orm(column_type = "String(Some(20))", nullable)]
    pub phone: Option<String>,

    #[sea_orm(nullable)]
    pub department_id: Option<i64>,

    #[sea_orm(column_type = "String(Some(100))", nullable)]
    pub position: Option<String>,

    pub status: EmployeeStatus,

    /// Face embedding, stored as an opaque JSON array
    #[sea_orm(nullable)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub face_descriptor: Option<Json>,

    pub join_date: DateTimeUtc,

    /// External employee code
    #[sea_orm(column_type = "String(Some(20))", nullable)]
    pub employee_id: Option<String>,

    pub created_at: DateTimeUtc,

    pub updated_at: DateTimeUtc,

    #[sea_orm(nullable)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::department::Entity",
        from = "Column::DepartmentId",
        to = "super::department::Column::Id"
    )]
    Department,
}

impl Related<super::department::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Department.def()
    }
}

#[async_trait]
impl ActiveModelBehavior for ActiveModel {
    async fn before_save<C>(mut self, _db: &C, insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        let now = chrono::Utc::now();
        if insert {
            self.created_at = Set(now);
            if self.join_date.is_not_set() {
                self.join_date = Set(now);
            }
        }
        self.updated_at = Set(now);
        Ok(self)
    }
}
