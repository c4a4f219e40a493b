use async_trait::async_trait;
use sqlx::MySqlPool;
use tracing::{debug, warn};

use crate::error::AppError;
use crate::model::leave_type::{LeaveAssignment, LeaveAssignmentInput, LeaveType, LeaveTypeInput};
use crate::store::LeaveCatalog;
use crate::utils::leave_type_cache::LeaveTypeCache;

/// `leave_table` and `leave_assignment` backed by MySQL, with code lookups
/// served from a moka cache.
pub struct MySqlLeaveCatalog {
    pool: MySqlPool,
    cache: LeaveTypeCache,
}

impl MySqlLeaveCatalog {
    pub fn new(pool: MySqlPool, cache: LeaveTypeCache) -> Self {
        Self { pool, cache }
    }

    async fn get_leave_type(&self, id: u64) -> Result<LeaveType, AppError> {
        sqlx::query_as::<_, LeaveType>(
            "SELECT id, leave_description, leave_code, leave_hours FROM leave_table WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::not_found("Leave type"))
    }
}

#[async_trait]
impl LeaveCatalog for MySqlLeaveCatalog {
    async fn leave_description(&self, leave_code: &str) -> Result<Option<String>, AppError> {
        if let Some(description) = self.cache.get(leave_code).await {
            return Ok(Some(description));
        }

        let description = sqlx::query_scalar::<_, String>(
            "SELECT leave_description FROM leave_table WHERE leave_code = ? LIMIT 1",
        )
        .bind(leave_code)
        .fetch_optional(&self.pool)
        .await?;

        if let Some(d) = &description {
            self.cache.insert(leave_code, d).await;
        } else {
            debug!(leave_code, "No leave type registered for code");
        }

        Ok(description)
    }

    async fn list_leave_types(&self) -> Result<Vec<LeaveType>, AppError> {
        Ok(sqlx::query_as::<_, LeaveType>(
            "SELECT id, leave_description, leave_code, leave_hours FROM leave_table ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?)
    }

    async fn create_leave_type(&self, input: LeaveTypeInput) -> Result<LeaveType, AppError> {
        let result = sqlx::query(
            "INSERT INTO leave_table (leave_description, leave_code, leave_hours) VALUES (?, ?, ?)",
        )
        .bind(&input.leave_description)
        .bind(&input.leave_code)
        .bind(input.leave_hours)
        .execute(&self.pool)
        .await?;

        self.cache
            .insert(&input.leave_code, &input.leave_description)
            .await;

        Ok(LeaveType {
            id: result.last_insert_id(),
            leave_description: input.leave_description,
            leave_code: input.leave_code,
            leave_hours: input.leave_hours,
        })
    }

    async fn update_leave_type(
        &self,
        id: u64,
        input: LeaveTypeInput,
    ) -> Result<LeaveType, AppError> {
        // fail with NotFound before touching anything
        self.get_leave_type(id).await?;

        sqlx::query(
            "UPDATE leave_table SET leave_description = ?, leave_code = ?, leave_hours = ? WHERE id = ?",
        )
        .bind(&input.leave_description)
        .bind(&input.leave_code)
        .bind(input.leave_hours)
        .bind(id)
        .execute(&self.pool)
        .await?;

        self.cache.invalidate_all();

        Ok(LeaveType {
            id,
            leave_description: input.leave_description,
            leave_code: input.leave_code,
            leave_hours: input.leave_hours,
        })
    }

    async fn delete_leave_type(&self, id: u64) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM leave_table WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found("Leave type"));
        }

        self.cache.invalidate_all();
        Ok(())
    }

    async fn list_assignments(&self) -> Result<Vec<LeaveAssignment>, AppError> {
        Ok(sqlx::query_as::<_, LeaveAssignment>(
            "SELECT id, leave_code, employeeNumber FROM leave_assignment ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?)
    }

    async fn create_assignment(
        &self,
        input: LeaveAssignmentInput,
    ) -> Result<LeaveAssignment, AppError> {
        let result =
            sqlx::query("INSERT INTO leave_assignment (leave_code, employeeNumber) VALUES (?, ?)")
                .bind(&input.leave_code)
                .bind(&input.employee_number)
                .execute(&self.pool)
                .await?;

        Ok(LeaveAssignment {
            id: result.last_insert_id(),
            leave_code: input.leave_code,
            employee_number: input.employee_number,
        })
    }

    async fn update_assignment(
        &self,
        id: u64,
        input: LeaveAssignmentInput,
    ) -> Result<LeaveAssignment, AppError> {
        let found = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM leave_assignment WHERE id = ?",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        if found == 0 {
            return Err(AppError::not_found("Leave assignment"));
        }

        sqlx::query("UPDATE leave_assignment SET leave_code = ?, employeeNumber = ? WHERE id = ?")
            .bind(&input.leave_code)
            .bind(&input.employee_number)
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(LeaveAssignment {
            id,
            leave_code: input.leave_code,
            employee_number: input.employee_number,
        })
    }

    async fn delete_assignment(&self, id: u64) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM leave_assignment WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            warn!(id, "Delete of unknown leave assignment");
            return Err(AppError::not_found("Leave assignment"));
        }

        Ok(())
    }
}
