//! In-memory stores for tests.

use async_trait::async_trait;
use chrono::Utc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use crate::error::AppError;
use crate::model::{
    audit::AuditEntry,
    leave_request::{LeaveRequest, LeaveRequestPatch, NewLeaveRequest},
    leave_type::{LeaveAssignment, LeaveAssignmentInput, LeaveType, LeaveTypeInput},
    notification::{NewNotification, Notification, Recipient},
};
use crate::store::{AuditStore, LeaveCatalog, LeaveLedger, NotificationStore};

fn unavailable() -> AppError {
    AppError::Store(anyhow::anyhow!("store unavailable"))
}

#[derive(Default)]
pub struct MemoryLeaveLedger {
    rows: Mutex<Vec<LeaveRequest>>,
    next_id: AtomicU64,
}

impl MemoryLeaveLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.rows.lock().unwrap().len()
    }
}

#[async_trait]
impl LeaveLedger for MemoryLeaveLedger {
    async fn create(&self, new: NewLeaveRequest) -> Result<LeaveRequest, AppError> {
        let mut rows = self.rows.lock().unwrap();
        if rows
            .iter()
            .any(|r| r.employee_number == new.employee_number && r.leave_date == new.leave_date)
        {
            return Err(AppError::DuplicateRequest);
        }

        let request = LeaveRequest {
            id: self.next_id.fetch_add(1, Ordering::SeqCst) + 1,
            employee_number: new.employee_number,
            leave_code: new.leave_code,
            leave_date: new.leave_date,
            status: new.status,
            created_at: Utc::now(),
        };
        rows.push(request.clone());
        Ok(request)
    }

    async fn get(&self, id: u64) -> Result<LeaveRequest, AppError> {
        self.rows
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.id == id)
            .cloned()
            .ok_or_else(|| AppError::not_found("Leave request"))
    }

    async fn update(
        &self,
        id: u64,
        patch: LeaveRequestPatch,
    ) -> Result<(LeaveRequest, LeaveRequest), AppError> {
        let mut rows = self.rows.lock().unwrap();
        let idx = rows
            .iter()
            .position(|r| r.id == id)
            .ok_or_else(|| AppError::not_found("Leave request"))?;

        let next = patch.apply_to(&rows[idx]);
        if rows.iter().any(|r| {
            r.id != id
                && r.employee_number == next.employee_number
                && r.leave_date == next.leave_date
        }) {
            return Err(AppError::DuplicateRequest);
        }

        let previous = std::mem::replace(&mut rows[idx], next.clone());
        Ok((previous, next))
    }

    async fn delete(&self, id: u64) -> Result<String, AppError> {
        let mut rows = self.rows.lock().unwrap();
        let idx = rows
            .iter()
            .position(|r| r.id == id)
            .ok_or_else(|| AppError::not_found("Leave request"))?;
        Ok(rows.remove(idx).employee_number)
    }

    async fn list_all(&self) -> Result<Vec<LeaveRequest>, AppError> {
        let mut rows = self.rows.lock().unwrap().clone();
        rows.sort_by(|a, b| b.leave_date.cmp(&a.leave_date).then(b.id.cmp(&a.id)));
        Ok(rows)
    }
}

#[derive(Default)]
pub struct MemoryLeaveCatalog {
    types: Mutex<Vec<LeaveType>>,
    assignments: Mutex<Vec<LeaveAssignment>>,
    next_id: AtomicU64,
    pub fail_lookups: AtomicBool,
}

impl MemoryLeaveCatalog {
    pub fn with_type(code: &str, description: &str) -> Self {
        let catalog = Self::default();
        catalog.types.lock().unwrap().push(LeaveType {
            id: catalog.next_id.fetch_add(1, Ordering::SeqCst) + 1,
            leave_description: description.to_string(),
            leave_code: code.to_string(),
            leave_hours: 8.0,
        });
        catalog
    }
}

#[async_trait]
impl LeaveCatalog for MemoryLeaveCatalog {
    async fn leave_description(&self, leave_code: &str) -> Result<Option<String>, AppError> {
        if self.fail_lookups.load(Ordering::SeqCst) {
            return Err(unavailable());
        }
        Ok(self
            .types
            .lock()
            .unwrap()
            .iter()
            .find(|t| t.leave_code == leave_code)
            .map(|t| t.leave_description.clone()))
    }

    async fn list_leave_types(&self) -> Result<Vec<LeaveType>, AppError> {
        Ok(self.types.lock().unwrap().clone())
    }

    async fn create_leave_type(&self, input: LeaveTypeInput) -> Result<LeaveType, AppError> {
        let leave_type = LeaveType {
            id: self.next_id.fetch_add(1, Ordering::SeqCst) + 1,
            leave_description: input.leave_description,
            leave_code: input.leave_code,
            leave_hours: input.leave_hours,
        };
        self.types.lock().unwrap().push(leave_type.clone());
        Ok(leave_type)
    }

    async fn update_leave_type(
        &self,
        id: u64,
        input: LeaveTypeInput,
    ) -> Result<LeaveType, AppError> {
        let mut types = self.types.lock().unwrap();
        let existing = types
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| AppError::not_found("Leave type"))?;
        existing.leave_description = input.leave_description;
        existing.leave_code = input.leave_code;
        existing.leave_hours = input.leave_hours;
        Ok(existing.clone())
    }

    async fn delete_leave_type(&self, id: u64) -> Result<(), AppError> {
        let mut types = self.types.lock().unwrap();
        let before = types.len();
        types.retain(|t| t.id != id);
        if types.len() == before {
            return Err(AppError::not_found("Leave type"));
        }
        Ok(())
    }

    async fn list_assignments(&self) -> Result<Vec<LeaveAssignment>, AppError> {
        Ok(self.assignments.lock().unwrap().clone())
    }

    async fn create_assignment(
        &self,
        input: LeaveAssignmentInput,
    ) -> Result<LeaveAssignment, AppError> {
        let assignment = LeaveAssignment {
            id: self.next_id.fetch_add(1, Ordering::SeqCst) + 1,
            leave_code: input.leave_code,
            employee_number: input.employee_number,
        };
        self.assignments.lock().unwrap().push(assignment.clone());
        Ok(assignment)
    }

    async fn update_assignment(
        &self,
        id: u64,
        input: LeaveAssignmentInput,
    ) -> Result<LeaveAssignment, AppError> {
        let mut assignments = self.assignments.lock().unwrap();
        let existing = assignments
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or_else(|| AppError::not_found("Leave assignment"))?;
        existing.leave_code = input.leave_code;
        existing.employee_number = input.employee_number;
        Ok(existing.clone())
    }

    async fn delete_assignment(&self, id: u64) -> Result<(), AppError> {
        let mut assignments = self.assignments.lock().unwrap();
        let before = assignments.len();
        assignments.retain(|a| a.id != id);
        if assignments.len() == before {
            return Err(AppError::not_found("Leave assignment"));
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryNotificationStore {
    rows: Mutex<Vec<Notification>>,
    next_id: AtomicU64,
    pub fail_writes: AtomicBool,
}

impl MemoryNotificationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn all(&self) -> Vec<Notification> {
        self.rows.lock().unwrap().clone()
    }

    pub fn of_kind(&self, kind: &str) -> Vec<Notification> {
        self.all().into_iter().filter(|n| n.kind == kind).collect()
    }
}

fn newest_first(rows: &mut [Notification]) {
    rows.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
}

#[async_trait]
impl NotificationStore for MemoryNotificationStore {
    async fn create(&self, new: NewNotification) -> Result<Notification, AppError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(unavailable());
        }

        let (recipient_role, employee_number) = new.recipient.columns();
        let notification = Notification {
            id: self.next_id.fetch_add(1, Ordering::SeqCst) + 1,
            title: new.title,
            message: new.message,
            kind: new.kind,
            recipient_role,
            employee_number,
            related_id: new.related_id,
            is_read: false,
            created_at: Utc::now(),
        };
        self.rows.lock().unwrap().push(notification.clone());
        Ok(notification)
    }

    async fn mark_read(&self, id: u64) -> Result<(), AppError> {
        let mut rows = self.rows.lock().unwrap();
        let row = rows
            .iter_mut()
            .find(|n| n.id == id)
            .ok_or_else(|| AppError::not_found("Notification"))?;
        row.is_read = true;
        Ok(())
    }

    async fn mark_all_read(&self) -> Result<u64, AppError> {
        let mut flipped = 0;
        for row in self.rows.lock().unwrap().iter_mut().filter(|n| !n.is_read) {
            row.is_read = true;
            flipped += 1;
        }
        Ok(flipped)
    }

    async fn list_for(&self, recipient: &Recipient) -> Result<Vec<Notification>, AppError> {
        let mut rows: Vec<_> = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|n| n.is_for(recipient))
            .cloned()
            .collect();
        newest_first(&mut rows);
        Ok(rows)
    }

    async fn list_all(&self) -> Result<Vec<Notification>, AppError> {
        let mut rows = self.all();
        newest_first(&mut rows);
        Ok(rows)
    }

    async fn unread_count(&self, recipient: &Recipient) -> Result<i64, AppError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|n| !n.is_read && n.is_for(recipient))
            .count() as i64)
    }
}

#[derive(Default)]
pub struct MemoryAuditStore {
    entries: Mutex<Vec<AuditEntry>>,
    pub fail_writes: AtomicBool,
}

impl MemoryAuditStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<AuditEntry> {
        self.entries.lock().unwrap().clone()
    }
}

#[async_trait]
impl AuditStore for MemoryAuditStore {
    async fn append(&self, entry: &AuditEntry) -> Result<(), AppError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(unavailable());
        }
        self.entries.lock().unwrap().push(entry.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::leave_request::LeaveStatus;
    use crate::model::notification::RecipientRole;
    use chrono::NaiveDate;

    fn new_request(employee: &str, day: u32) -> NewLeaveRequest {
        NewLeaveRequest {
            employee_number: employee.into(),
            leave_code: "SL".into(),
            leave_date: NaiveDate::from_ymd_opt(2025, 5, day).unwrap(),
            status: LeaveStatus::Pending,
        }
    }

    fn broadcast(role: RecipientRole) -> NewNotification {
        NewNotification {
            title: "t".into(),
            message: "m".into(),
            kind: "announcement".into(),
            recipient: Recipient::Broadcast(role),
            related_id: None,
        }
    }

    #[tokio::test]
    async fn ledger_rejects_second_request_for_same_day() {
        let ledger = MemoryLeaveLedger::new();
        ledger.create(new_request("E1", 1)).await.unwrap();

        let err = ledger.create(new_request("E1", 1)).await.unwrap_err();
        assert!(matches!(err, AppError::DuplicateRequest));
        assert_eq!(ledger.len(), 1);

        // other employee, same day is fine
        ledger.create(new_request("E2", 1)).await.unwrap();
    }

    #[tokio::test]
    async fn ledger_lists_by_leave_date_descending() {
        let ledger = MemoryLeaveLedger::new();
        ledger.create(new_request("E1", 3)).await.unwrap();
        ledger.create(new_request("E1", 9)).await.unwrap();
        ledger.create(new_request("E1", 5)).await.unwrap();

        let days: Vec<_> = ledger
            .list_all()
            .await
            .unwrap()
            .iter()
            .map(|r| r.leave_date.format("%d").to_string())
            .collect();
        assert_eq!(days, vec!["09", "05", "03"]);
    }

    #[tokio::test]
    async fn ledger_delete_returns_owner() {
        let ledger = MemoryLeaveLedger::new();
        let created = ledger.create(new_request("E7", 2)).await.unwrap();

        assert_eq!(ledger.delete(created.id).await.unwrap(), "E7");
        assert!(ledger.list_all().await.unwrap().is_empty());
        assert!(ledger.delete(created.id).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn unread_count_tracks_mutations() {
        let store = MemoryNotificationStore::new();
        let admin = Recipient::Broadcast(RecipientRole::Admin);

        let a = store.create(broadcast(RecipientRole::Admin)).await.unwrap();
        store.create(broadcast(RecipientRole::All)).await.unwrap();
        store.create(broadcast(RecipientRole::Staff)).await.unwrap();
        assert_eq!(store.unread_count(&admin).await.unwrap(), 2);

        store.mark_read(a.id).await.unwrap();
        store.mark_read(a.id).await.unwrap();
        assert_eq!(store.unread_count(&admin).await.unwrap(), 1);

        assert_eq!(store.mark_all_read().await.unwrap(), 2);
        assert_eq!(store.mark_all_read().await.unwrap(), 0);
        assert_eq!(store.unread_count(&admin).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn mark_read_unknown_id_is_not_found() {
        let store = MemoryNotificationStore::new();
        assert!(store.mark_read(42).await.unwrap_err().is_not_found());
    }
}
