use async_trait::async_trait;
use sqlx::MySqlPool;

use crate::error::AppError;
use crate::model::audit::AuditEntry;
use crate::store::AuditStore;

pub struct MySqlAuditStore {
    pool: MySqlPool,
}

impl MySqlAuditStore {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuditStore for MySqlAuditStore {
    async fn append(&self, entry: &AuditEntry) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO audit_logs
                (employeeNumber, action, table_name, record_id, description, ip_address, user_agent, timestamp)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&entry.employee_number)
        .bind(entry.action.as_ref())
        .bind(&entry.table_name)
        .bind(&entry.record_id)
        .bind(&entry.description)
        .bind(&entry.ip_address)
        .bind(&entry.user_agent)
        .bind(entry.timestamp)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
