use sea_orm::{
    ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbBackend, DbErr, Schema,
    Statement,
};
use sea_orm::sea_query::TableCreateStatement;
use std::time::Duration;
use tracing::info;

use crate::config::DatabaseConfig;
use crate::entity::{department, employee, student, user};

/// Partial unique indexes: uniqueness only holds among live (non-deleted) rows
const LIVE_UNIQUE_INDEXES: &[(&str, &str, &str)] = &[
    ("uq_students_student_code_live", "students", "student_code"),
    ("uq_students_email_live", "students", "email"),
    ("uq_employees_email_live", "employees", "email"),
    ("uq_departments_name_live", "departments", "name"),
    ("uq_users_username_live", "users", "username"),
    ("uq_users_email_live", "users", "email"),
];

/// Plain indexes on the soft-delete marker and filtered columns
const LOOKUP_INDEXES: &[(&str, &str, &str)] = &[
    ("idx_students_deleted_at", "students", "deleted_at"),
    ("idx_employees_deleted_at", "employees", "deleted_at"),
    ("idx_employees_department_id", "employees", "department_id"),
    ("idx_departments_deleted_at", "departments", "deleted_at"),
    ("idx_users_deleted_at", "users", "deleted_at"),
];

/// Initialize database connection and auto-migrate tables
pub async fn init_database(config: &DatabaseConfig) -> Result<DatabaseConnection, DbErr> {
    let database_url = config.connection_url();

    info!("Connecting to database: {}:{}/{}", config.host, config.port, config.name);

    let mut opt = ConnectOptions::new(&database_url);
    opt.max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .acquire_timeout(Duration::from_secs(config.connect_timeout_secs))
        .sqlx_logging(true)
        .sqlx_logging_level(tracing::log::LevelFilter::Debug);

    let db = Database::connect(opt).await?;
    info!("Database connection established");

    migrate(&db).await?;

    Ok(db)
}

/// Create tables and indexes from the entity definitions (idempotent)
pub async fn migrate(db: &DatabaseConnection) -> Result<(), DbErr> {
    let backend = db.get_database_backend();
    let schema = Schema::new(backend);

    info!("Running auto-migration for all entities...");

    // departments before employees: employees.department_id references it
    create_table_if_not_exists(db, backend, schema.create_table_from_entity(student::Entity)).await?;
    create_table_if_not_exists(db, backend, schema.create_table_from_entity(department::Entity)).await?;
    create_table_if_not_exists(db, backend, schema.create_table_from_entity(employee::Entity)).await?;
    create_table_if_not_exists(db, backend, schema.create_table_from_entity(user::Entity)).await?;

    for (name, table, column) in LIVE_UNIQUE_INDEXES {
        let sql = format!(
            "CREATE UNIQUE INDEX IF NOT EXISTS {} ON {} ({}) WHERE deleted_at IS NULL",
            name, table, column
        );
        db.execute(Statement::from_string(backend, sql)).await?;
    }

    for (name, table, column) in LOOKUP_INDEXES {
        let sql = format!("CREATE INDEX IF NOT EXISTS {} ON {} ({})", name, table, column);
        db.execute(Statement::from_string(backend, sql)).await?;
    }

    info!("Auto-migration completed successfully");
    Ok(())
}

/// Create a table if it doesn't exist
async fn create_table_if_not_exists(
    db: &DatabaseConnection,
    backend: DbBackend,
    mut stmt: TableCreateStatement,
) -> Result<(), DbErr> {
    stmt.if_not_exists();

    let sql = backend.build(&stmt);

    db.execute(Statement::from_string(backend, sql.to_string())).await?;

    Ok(())
}

/// In-memory SQLite database with the full schema, for tests
#[cfg(test)]
pub async fn memory_database() -> DatabaseConnection {
    let mut opt = ConnectOptions::new("sqlite::memory:");
    // every pooled connection would otherwise get its own empty database
    opt.max_connections(1).min_connections(1).sqlx_logging(false);

    let db = Database::connect(opt).await.unwrap();
    migrate(&db).await.unwrap();
    db
}
