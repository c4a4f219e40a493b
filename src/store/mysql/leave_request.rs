use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{FromRow, MySqlPool};
use tracing::{debug, error};

use crate::error::AppError;
use crate::model::leave_request::{LeaveRequest, LeaveRequestPatch, LeaveStatus, NewLeaveRequest};
use crate::store::LeaveLedger;

#[derive(FromRow)]
struct LeaveRequestRow {
    id: u64,
    #[sqlx(rename = "employeeNumber")]
    employee_number: String,
    leave_code: String,
    leave_date: NaiveDate,
    status: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<LeaveRequestRow> for LeaveRequest {
    type Error = AppError;

    fn try_from(row: LeaveRequestRow) -> Result<Self, Self::Error> {
        Ok(LeaveRequest {
            id: row.id,
            employee_number: row.employee_number,
            leave_code: row.leave_code,
            leave_date: row.leave_date,
            status: LeaveStatus::parse(&row.status)?,
            created_at: row.created_at,
        })
    }
}

const SELECT_COLUMNS: &str =
    "SELECT id, employeeNumber, leave_code, leave_date, status, created_at FROM leave_request";

/// `leave_request` backed by MySQL. Duplicate detection relies on the
/// `UNIQUE (employeeNumber, leave_date)` key, so concurrent submissions for
/// the same date cannot both land.
pub struct MySqlLeaveLedger {
    pool: MySqlPool,
}

impl MySqlLeaveLedger {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

fn map_write_error(e: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db_err) = &e {
        if db_err.is_unique_violation() {
            return AppError::DuplicateRequest;
        }
    }
    AppError::from(e)
}

#[async_trait]
impl LeaveLedger for MySqlLeaveLedger {
    async fn create(&self, new: NewLeaveRequest) -> Result<LeaveRequest, AppError> {
        let result = sqlx::query(
            r#"
            INSERT INTO leave_request (employeeNumber, leave_code, leave_date, status, created_at)
            VALUES (?, ?, ?, ?, NOW())
            "#,
        )
        .bind(&new.employee_number)
        .bind(&new.leave_code)
        .bind(new.leave_date)
        .bind(new.status.as_ref())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            let mapped = map_write_error(e);
            if !matches!(mapped, AppError::DuplicateRequest) {
                error!(error = %mapped, employee = %new.employee_number, "Failed to create leave request");
            }
            mapped
        })?;

        let id = result.last_insert_id();
        debug!(id, employee = %new.employee_number, "Leave request inserted");

        self.get(id).await
    }

    async fn get(&self, id: u64) -> Result<LeaveRequest, AppError> {
        let row = sqlx::query_as::<_, LeaveRequestRow>(&format!("{} WHERE id = ?", SELECT_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => row.try_into(),
            None => Err(AppError::not_found("Leave request")),
        }
    }

    async fn update(
        &self,
        id: u64,
        patch: LeaveRequestPatch,
    ) -> Result<(LeaveRequest, LeaveRequest), AppError> {
        let mut tx = self.pool.begin().await?;

        // row lock: a concurrent update or delete waits for this commit
        let previous: LeaveRequest = sqlx::query_as::<_, LeaveRequestRow>(&format!(
            "{} WHERE id = ? FOR UPDATE",
            SELECT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::not_found("Leave request"))?
        .try_into()?;

        let next = patch.apply_to(&previous);

        let result = sqlx::query(
            r#"
            UPDATE leave_request
            SET employeeNumber = ?, leave_code = ?, leave_date = ?, status = ?
            WHERE id = ?
            "#,
        )
        .bind(&next.employee_number)
        .bind(&next.leave_code)
        .bind(next.leave_date)
        .bind(next.status.as_ref())
        .bind(id)
        .execute(&mut *tx)
        .await
        .map_err(map_write_error)?;

        tx.commit().await?;

        debug!(id, rows = result.rows_affected(), "Leave request updated");

        Ok((previous, next))
    }

    async fn delete(&self, id: u64) -> Result<String, AppError> {
        let owner = sqlx::query_scalar::<_, String>(
            "SELECT employeeNumber FROM leave_request WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::not_found("Leave request"))?;

        let result = sqlx::query("DELETE FROM leave_request WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found("Leave request"));
        }

        Ok(owner)
    }

    async fn list_all(&self) -> Result<Vec<LeaveRequest>, AppError> {
        let rows = sqlx::query_as::<_, LeaveRequestRow>(&format!(
            "{} ORDER BY leave_date DESC, id DESC",
            SELECT_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(LeaveRequest::try_from).collect()
    }
}
