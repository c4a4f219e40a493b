use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::AppError;

/// Catalog entry for a kind of leave (sick, vacation, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct LeaveType {
    #[schema(example = 1)]
    pub id: u64,
    #[schema(example = "Sick Leave")]
    pub leave_description: String,
    #[schema(example = "SL")]
    pub leave_code: String,
    #[schema(example = 8.0)]
    pub leave_hours: f64,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct LeaveTypeInput {
    #[schema(example = "Sick Leave")]
    pub leave_description: String,
    #[schema(example = "SL")]
    pub leave_code: String,
    #[schema(example = 8.0)]
    pub leave_hours: f64,
}

impl LeaveTypeInput {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.leave_description.trim().is_empty() || self.leave_code.trim().is_empty() {
            return Err(AppError::Validation("Missing required fields".to_string()));
        }
        if !self.leave_hours.is_finite() || self.leave_hours < 0.0 {
            return Err(AppError::Validation(
                "leave_hours must be a non-negative number".to_string(),
            ));
        }
        Ok(())
    }
}

/// Entitlement of one employee to one leave code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct LeaveAssignment {
    #[schema(example = 1)]
    pub id: u64,
    #[schema(example = "SL")]
    pub leave_code: String,
    #[serde(rename = "employeeNumber")]
    #[sqlx(rename = "employeeNumber")]
    #[schema(example = "E1")]
    pub employee_number: String,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct LeaveAssignmentInput {
    #[schema(example = "SL")]
    pub leave_code: String,
    #[serde(rename = "employeeNumber")]
    #[schema(example = "E1")]
    pub employee_number: String,
}

impl LeaveAssignmentInput {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.leave_code.trim().is_empty() || self.employee_number.trim().is_empty() {
            return Err(AppError::Validation(
                "Missing required fields: leave_code and employeeNumber".to_string(),
            ));
        }
        Ok(())
    }
}
