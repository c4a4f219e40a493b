use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};
use utoipa::ToSchema;

pub const KIND_LEAVE_REQUEST: &str = "leave_request";
pub const KIND_LEAVE_STATUS_UPDATE: &str = "leave_status_update";
pub const KIND_ANNOUNCEMENT: &str = "announcement";

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumString, Display, AsRefStr, ToSchema,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum RecipientRole {
    Admin,
    Staff,
    All,
}

/// Who a notification is addressed to.
///
/// Role broadcasts and per-employee messages share one store; neither
/// scheme is folded into the other.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Recipient {
    Broadcast(RecipientRole),
    Direct(String),
}

impl Recipient {
    /// Column values (recipient_role, employeeNumber) for this address.
    pub fn columns(&self) -> (Option<RecipientRole>, Option<String>) {
        match self {
            Recipient::Broadcast(role) => (Some(*role), None),
            Recipient::Direct(employee) => (None, Some(employee.clone())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({
    "id": 10,
    "title": "New Leave Request Submitted",
    "message": "Employee E1 has submitted a new Sick Leave request for 2025-05-01",
    "type": "leave_request",
    "recipient_role": "admin",
    "employeeNumber": null,
    "related_id": 1,
    "is_read": false,
    "created_at": "2025-04-20T08:00:00Z"
}))]
pub struct Notification {
    pub id: u64,
    pub title: String,
    pub message: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[schema(value_type = Option<String>)]
    pub recipient_role: Option<RecipientRole>,
    #[serde(rename = "employeeNumber")]
    pub employee_number: Option<String>,
    pub related_id: Option<u64>,
    pub is_read: bool,
    #[schema(value_type = String, format = "date-time")]
    pub created_at: DateTime<Utc>,
}

impl Notification {
    /// Role listings also include notifications sent to "all".
    pub fn is_for(&self, recipient: &Recipient) -> bool {
        match recipient {
            Recipient::Broadcast(role) => matches!(
                self.recipient_role,
                Some(r) if r == *role || r == RecipientRole::All
            ),
            Recipient::Direct(employee) => self.employee_number.as_deref() == Some(employee.as_str()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewNotification {
    pub title: String,
    pub message: String,
    pub kind: String,
    pub recipient: Recipient,
    pub related_id: Option<u64>,
}
