//! Persistence seams for the leave workflow.
//!
//! Each store is an async trait so the workflow can run against the shared
//! MySQL pool in production and against in-memory doubles in tests.

use async_trait::async_trait;

use crate::error::AppError;
use crate::model::{
    audit::AuditEntry,
    leave_request::{LeaveRequest, LeaveRequestPatch, NewLeaveRequest},
    leave_type::{LeaveAssignment, LeaveAssignmentInput, LeaveType, LeaveTypeInput},
    notification::{NewNotification, Notification, Recipient},
};

#[cfg(test)]
pub mod memory;
pub mod mysql;

/// Durable collection of leave requests.
#[async_trait]
pub trait LeaveLedger: Send + Sync {
    /// Fails with `DuplicateRequest` when (employee, date) is already taken,
    /// whatever the status of the existing request.
    async fn create(&self, new: NewLeaveRequest) -> Result<LeaveRequest, AppError>;

    async fn get(&self, id: u64) -> Result<LeaveRequest, AppError>;

    /// Overwrites the provided fields without checking the prior status.
    ///
    /// Returns `(previous, updated)` read and written as one atomic step, so
    /// concurrent updates each see the state the other one left behind.
    async fn update(
        &self,
        id: u64,
        patch: LeaveRequestPatch,
    ) -> Result<(LeaveRequest, LeaveRequest), AppError>;

    /// Removes the row and returns the employee number that owned it.
    async fn delete(&self, id: u64) -> Result<String, AppError>;

    /// Ordered by leave date, newest first.
    async fn list_all(&self) -> Result<Vec<LeaveRequest>, AppError>;
}

/// Leave types and per-employee entitlements.
#[async_trait]
pub trait LeaveCatalog: Send + Sync {
    async fn leave_description(&self, leave_code: &str) -> Result<Option<String>, AppError>;

    async fn list_leave_types(&self) -> Result<Vec<LeaveType>, AppError>;
    async fn create_leave_type(&self, input: LeaveTypeInput) -> Result<LeaveType, AppError>;
    async fn update_leave_type(&self, id: u64, input: LeaveTypeInput)
    -> Result<LeaveType, AppError>;
    async fn delete_leave_type(&self, id: u64) -> Result<(), AppError>;

    async fn list_assignments(&self) -> Result<Vec<LeaveAssignment>, AppError>;
    async fn create_assignment(
        &self,
        input: LeaveAssignmentInput,
    ) -> Result<LeaveAssignment, AppError>;
    async fn update_assignment(
        &self,
        id: u64,
        input: LeaveAssignmentInput,
    ) -> Result<LeaveAssignment, AppError>;
    async fn delete_assignment(&self, id: u64) -> Result<(), AppError>;
}

/// Mailbox of role broadcasts and per-employee messages.
#[async_trait]
pub trait NotificationStore: Send + Sync {
    /// Persists unread, stamped now. No deduplication.
    async fn create(&self, new: NewNotification) -> Result<Notification, AppError>;

    /// Idempotent; `NotFound` only when the id does not exist.
    async fn mark_read(&self, id: u64) -> Result<(), AppError>;

    /// Returns how many notifications flipped from unread to read.
    async fn mark_all_read(&self) -> Result<u64, AppError>;

    /// Newest first.
    async fn list_for(&self, recipient: &Recipient) -> Result<Vec<Notification>, AppError>;

    async fn list_all(&self) -> Result<Vec<Notification>, AppError>;

    async fn unread_count(&self, recipient: &Recipient) -> Result<i64, AppError>;
}

/// Append-only audit trail.
#[async_trait]
pub trait AuditStore: Send + Sync {
    async fn append(&self, entry: &AuditEntry) -> Result<(), AppError>;
}
