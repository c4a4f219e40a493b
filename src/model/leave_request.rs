use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use strum_macros::{AsRefStr, Display, EnumString};
use utoipa::ToSchema;

use crate::error::AppError;

/// Leave request status as stored and exchanged on the wire ("0".."3").
///
/// Any status may move to any other; no transition is rejected based on
/// the prior state.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumString, Display, AsRefStr, ToSchema,
)]
pub enum LeaveStatus {
    #[serde(rename = "0")]
    #[strum(serialize = "0")]
    Pending,
    #[serde(rename = "1")]
    #[strum(serialize = "1")]
    ManagerApproved,
    #[serde(rename = "2")]
    #[strum(serialize = "2")]
    HrApproved,
    #[serde(rename = "3")]
    #[strum(serialize = "3")]
    Denied,
}

impl Default for LeaveStatus {
    fn default() -> Self {
        LeaveStatus::Pending
    }
}

impl LeaveStatus {
    /// Parse a wire value, failing with `InvalidStatus` outside the four known codes.
    pub fn parse(value: &str) -> Result<Self, AppError> {
        LeaveStatus::from_str(value).map_err(|_| AppError::InvalidStatus(value.to_string()))
    }

    /// Human readable phrase used in status-change notifications.
    pub fn phrase(&self) -> &'static str {
        match self {
            LeaveStatus::ManagerApproved => "approved by manager",
            LeaveStatus::HrApproved => "approved by HR",
            LeaveStatus::Denied => "denied",
            LeaveStatus::Pending => "updated",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({
    "id": 1,
    "employeeNumber": "E1",
    "leave_code": "SL",
    "leave_date": "2025-05-01",
    "status": "0",
    "created_at": "2025-04-20T08:00:00Z"
}))]
pub struct LeaveRequest {
    pub id: u64,
    #[serde(rename = "employeeNumber")]
    pub employee_number: String,
    pub leave_code: String,
    #[schema(value_type = String, format = "date")]
    pub leave_date: NaiveDate,
    #[schema(value_type = String)]
    pub status: LeaveStatus,
    #[schema(value_type = String, format = "date-time")]
    pub created_at: DateTime<Utc>,
}

/// Raw leave request body as sent by the dashboard. Every field is optional
/// here; the workflow engine decides what is required.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct LeaveRequestInput {
    #[serde(rename = "employeeNumber")]
    #[schema(example = "E1")]
    pub employee_number: Option<String>,
    #[schema(example = "SL")]
    pub leave_code: Option<String>,
    #[schema(example = "2025-05-01", format = "date")]
    pub leave_date: Option<String>,
    #[schema(example = "0")]
    pub status: Option<String>,
}

/// Validated input for a new ledger row.
#[derive(Debug, Clone)]
pub struct NewLeaveRequest {
    pub employee_number: String,
    pub leave_code: String,
    pub leave_date: NaiveDate,
    pub status: LeaveStatus,
}

/// Mutable fields of a leave request; `None` keeps the stored value.
#[derive(Debug, Clone, Default)]
pub struct LeaveRequestPatch {
    pub employee_number: Option<String>,
    pub leave_code: Option<String>,
    pub leave_date: Option<NaiveDate>,
    pub status: Option<LeaveStatus>,
}

impl LeaveRequestPatch {
    pub fn apply_to(&self, current: &LeaveRequest) -> LeaveRequest {
        LeaveRequest {
            id: current.id,
            employee_number: self
                .employee_number
                .clone()
                .unwrap_or_else(|| current.employee_number.clone()),
            leave_code: self
                .leave_code
                .clone()
                .unwrap_or_else(|| current.leave_code.clone()),
            leave_date: self.leave_date.unwrap_or(current.leave_date),
            status: self.status.unwrap_or(current.status),
            created_at: current.created_at,
        }
    }
}
