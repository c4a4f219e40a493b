use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, MySqlPool};
use tracing::{debug, warn};

use crate::error::AppError;
use crate::model::notification::{NewNotification, Notification, Recipient, RecipientRole};
use crate::store::NotificationStore;

#[derive(FromRow)]
struct NotificationRow {
    id: u64,
    title: String,
    message: String,
    #[sqlx(rename = "type")]
    kind: String,
    recipient_role: Option<String>,
    #[sqlx(rename = "employeeNumber")]
    employee_number: Option<String>,
    related_id: Option<u64>,
    is_read: bool,
    created_at: DateTime<Utc>,
}

impl From<NotificationRow> for Notification {
    fn from(row: NotificationRow) -> Self {
        let recipient_role = row.recipient_role.as_deref().and_then(|r| {
            r.parse::<RecipientRole>()
                .map_err(|_| warn!(id = row.id, role = r, "Unknown recipient role"))
                .ok()
        });

        Notification {
            id: row.id,
            title: row.title,
            message: row.message,
            kind: row.kind,
            recipient_role,
            employee_number: row.employee_number,
            related_id: row.related_id,
            is_read: row.is_read,
            created_at: row.created_at,
        }
    }
}

const SELECT_COLUMNS: &str = "SELECT id, title, message, type, recipient_role, employeeNumber, related_id, is_read, created_at FROM notifications";

/// WHERE clause and its single bind value for a recipient filter.
fn recipient_filter(recipient: &Recipient) -> (&'static str, String) {
    match recipient {
        Recipient::Broadcast(role) => (
            "recipient_role IN (?, 'all')",
            role.as_ref().to_string(),
        ),
        Recipient::Direct(employee) => ("employeeNumber = ?", employee.clone()),
    }
}

pub struct MySqlNotificationStore {
    pool: MySqlPool,
}

impl MySqlNotificationStore {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NotificationStore for MySqlNotificationStore {
    async fn create(&self, new: NewNotification) -> Result<Notification, AppError> {
        let (role, employee) = new.recipient.columns();

        let result = sqlx::query(
            r#"
            INSERT INTO notifications
                (title, message, type, recipient_role, employeeNumber, related_id, is_read, created_at)
            VALUES (?, ?, ?, ?, ?, ?, 0, NOW())
            "#,
        )
        .bind(&new.title)
        .bind(&new.message)
        .bind(&new.kind)
        .bind(role.map(|r| r.as_ref().to_string()))
        .bind(&employee)
        .bind(new.related_id)
        .execute(&self.pool)
        .await?;

        let id = result.last_insert_id();
        debug!(id, kind = %new.kind, "Notification created");

        let row = sqlx::query_as::<_, NotificationRow>(&format!("{} WHERE id = ?", SELECT_COLUMNS))
            .bind(id)
            .fetch_one(&self.pool)
            .await?;

        Ok(row.into())
    }

    async fn mark_read(&self, id: u64) -> Result<(), AppError> {
        let result = sqlx::query("UPDATE notifications SET is_read = 1 WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() > 0 {
            return Ok(());
        }

        // MySQL counts changed rows only, so an already-read notification also lands here
        let found = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM notifications WHERE id = ?")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;

        if found == 0 {
            return Err(AppError::not_found("Notification"));
        }

        Ok(())
    }

    async fn mark_all_read(&self) -> Result<u64, AppError> {
        let result = sqlx::query("UPDATE notifications SET is_read = 1 WHERE is_read = 0")
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    async fn list_for(&self, recipient: &Recipient) -> Result<Vec<Notification>, AppError> {
        let (clause, value) = recipient_filter(recipient);
        let sql = format!(
            "{} WHERE {} ORDER BY created_at DESC, id DESC",
            SELECT_COLUMNS, clause
        );

        let rows = sqlx::query_as::<_, NotificationRow>(&sql)
            .bind(value)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(Notification::from).collect())
    }

    async fn list_all(&self) -> Result<Vec<Notification>, AppError> {
        let rows = sqlx::query_as::<_, NotificationRow>(&format!(
            "{} ORDER BY created_at DESC, id DESC",
            SELECT_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Notification::from).collect())
    }

    async fn unread_count(&self, recipient: &Recipient) -> Result<i64, AppError> {
        let (clause, value) = recipient_filter(recipient);
        let sql = format!(
            "SELECT COUNT(*) FROM notifications WHERE {} AND is_read = 0",
            clause
        );

        Ok(sqlx::query_scalar::<_, i64>(&sql)
            .bind(value)
            .fetch_one(&self.pool)
            .await?)
    }
}
