//! Student entity
//!
//! Table: students

use async_trait::async_trait;
use sea_orm::entity::prelude::*;
use sea_orm::Set;
use serde::{Deserialize, Serialize};

/// Enrollment status
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(Some(20))")]
#[serde(rename_all = "lowercase")]
pub enum StudentStatus {
    #[default]
    #[sea_orm(string_value = "active")]
    Active,
    #[sea_orm(string_value = "inactive")]
    Inactive,
    #[sea_orm(string_value = "graduated")]
    Graduated,
    #[sea_orm(string_value = "suspended")]
    Suspended,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "students")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    /// Unique among live rows (partial index, see db::migrate)
    #[sea_orm(column_type = "String(Some(20))")]
    pub student_code: String,

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
    pub date_of_birth: Option<Date>,

    #[sea_orm(column_type = "String(Some(500))", nullable)]
    pub address: Option<String>,

    #[sea_orm(column_type = "String(Some(100))", nullable)]
    pub major: Option<String>,

    /// 1..=6
    #[sea_orm(nullable)]
    pub year: Option<i32>,

    /// 0.0..=4.0
    #[sea_orm(nullable)]
    pub gpa: Option<f64>,

    pub status: StudentStatus,

    pub created_at: DateTimeUtc,

    pub updated_at: DateTimeUtc,

    #[sea_orm(nullable)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

#[async_trait]
impl ActiveModelBehavior for ActiveModel {
    async fn before_save<C>(mut self, _db: &C, insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        let now = chrono::Utc::now();
        if insert {
            self.created_at = Set(now);
        }
        self.updated_at = Set(now);
        Ok(self)
    }
}
