use chrono::{DateTime, NaiveDate};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use crate::error::AppError;
use crate::model::{
    audit::{AuditAction, AuditRecord, RequestContext},
    leave_request::{LeaveRequest, LeaveRequestInput, LeaveRequestPatch, LeaveStatus, NewLeaveRequest},
    notification::{
        KIND_LEAVE_REQUEST, KIND_LEAVE_STATUS_UPDATE, NewNotification, Recipient, RecipientRole,
    },
};
use crate::store::{LeaveCatalog, LeaveLedger};
use crate::workflow::dispatcher::SideEffectDispatcher;

const TABLE: &str = "leave_request";

/// Blank strings count as missing, like an empty form field.
fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Accepts `YYYY-MM-DD` or a full RFC 3339 timestamp (date part kept).
fn parse_leave_date(raw: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .or_else(|_| DateTime::parse_from_rfc3339(raw).map(|dt| dt.date_naive()))
        .map_err(|_| AppError::Validation(format!("Invalid leave_date '{}', expected YYYY-MM-DD", raw)))
}

fn duplicate_as_conflict(e: AppError) -> AppError {
    match e {
        AppError::DuplicateRequest => AppError::Conflict(AppError::DuplicateRequest.to_string()),
        other => other,
    }
}

/// Owns every leave request mutation and the notifications/audit entries
/// that follow from it. Side effects are queued on the dispatcher after the
/// ledger write succeeds and can never fail the request.
pub struct WorkflowEngine {
    ledger: Arc<dyn LeaveLedger>,
    catalog: Arc<dyn LeaveCatalog>,
    effects: SideEffectDispatcher,
}

impl WorkflowEngine {
    pub fn new(
        ledger: Arc<dyn LeaveLedger>,
        catalog: Arc<dyn LeaveCatalog>,
        effects: SideEffectDispatcher,
    ) -> Self {
        Self {
            ledger,
            catalog,
            effects,
        }
    }

    #[instrument(name = "submit_leave_request", skip(self, ctx, input))]
    pub async fn submit_leave_request(
        &self,
        ctx: &RequestContext,
        input: LeaveRequestInput,
    ) -> Result<LeaveRequest, AppError> {
        let (employee_number, leave_code, raw_date) = match (
            non_empty(input.employee_number),
            non_empty(input.leave_code),
            non_empty(input.leave_date),
        ) {
            (Some(e), Some(c), Some(d)) => (e, c, d),
            _ => {
                return Err(AppError::Validation(
                    "Missing required fields: employeeNumber, leave_code, and leave_date are required"
                        .to_string(),
                ));
            }
        };

        // an explicit initial status is allowed, but it must be a known one
        let status = input
            .status
            .as_deref()
            .map(LeaveStatus::parse)
            .transpose()?
            .unwrap_or_default();
        let leave_date = parse_leave_date(&raw_date)?;

        let created = self
            .ledger
            .create(NewLeaveRequest {
                employee_number,
                leave_code,
                leave_date,
                status,
            })
            .await
            .map_err(duplicate_as_conflict)?;

        info!(id = created.id, employee = %created.employee_number, "Leave request submitted");

        let description = self.leave_description(&created.leave_code).await;
        self.effects.notify(NewNotification {
            title: "New Leave Request Submitted".to_string(),
            message: format!(
                "Employee {} has submitted a new {} request for {}",
                created.employee_number, description, created.leave_date
            ),
            kind: KIND_LEAVE_REQUEST.to_string(),
            recipient: Recipient::Broadcast(RecipientRole::Admin),
            related_id: Some(created.id),
        });

        self.effects.audit(AuditRecord {
            actor: Some(created.employee_number.clone()),
            action: AuditAction::Create,
            table_name: TABLE,
            record_id: Some(created.id.to_string()),
            description: format!(
                "Submitted {} leave request for {}",
                created.leave_code, created.leave_date
            ),
            context: ctx.clone(),
        });

        Ok(created)
    }

    /// Approver update: any field, any status.
    #[instrument(name = "update_leave_request", skip(self, ctx, input))]
    pub async fn update_leave_request(
        &self,
        ctx: &RequestContext,
        id: u64,
        input: LeaveRequestInput,
    ) -> Result<LeaveRequest, AppError> {
        self.apply_update(ctx, id, input, None).await
    }

    /// Employee editing their own request. The status stays with approvers.
    #[instrument(name = "update_own_leave_request", skip(self, ctx, input))]
    pub async fn update_own_leave_request(
        &self,
        ctx: &RequestContext,
        id: u64,
        input: LeaveRequestInput,
        employee_number: &str,
    ) -> Result<LeaveRequest, AppError> {
        self.apply_update(ctx, id, input, Some(employee_number)).await
    }

    async fn apply_update(
        &self,
        ctx: &RequestContext,
        id: u64,
        input: LeaveRequestInput,
        owner: Option<&str>,
    ) -> Result<LeaveRequest, AppError> {
        let current = self.ledger.get(id).await?;

        // a blank status is omitted; anything else must be an exact code
        let status = input
            .status
            .filter(|s| !s.trim().is_empty())
            .map(|s| LeaveStatus::parse(&s))
            .transpose()?;
        let leave_date = non_empty(input.leave_date)
            .map(|d| parse_leave_date(&d))
            .transpose()?;
        let employee_number = non_empty(input.employee_number);

        if let Some(owner) = owner {
            if current.employee_number != owner
                || employee_number.as_deref().is_some_and(|e| e != owner)
            {
                return Err(AppError::Forbidden(
                    "Employees can only edit their own leave requests".to_string(),
                ));
            }
            if status.is_some() {
                return Err(AppError::Forbidden(
                    "Only HR or Admin can change a leave request status".to_string(),
                ));
            }
        }

        let patch = LeaveRequestPatch {
            employee_number,
            leave_code: non_empty(input.leave_code),
            leave_date,
            status,
        };

        // compare against what the ledger replaced, not the earlier read
        let (previous, updated) = self
            .ledger
            .update(id, patch)
            .await
            .map_err(duplicate_as_conflict)?;

        if updated.status != previous.status {
            info!(id, from = %previous.status, to = %updated.status, "Leave request status changed");

            self.effects.notify(NewNotification {
                title: "Leave Request Status Updated".to_string(),
                message: format!(
                    "Leave request for Employee {} has been {}",
                    updated.employee_number,
                    updated.status.phrase()
                ),
                kind: KIND_LEAVE_STATUS_UPDATE.to_string(),
                recipient: Recipient::Broadcast(RecipientRole::Staff),
                related_id: Some(updated.id),
            });
        } else {
            debug!(id, "Leave request updated without status change");
        }

        self.effects.audit(AuditRecord {
            actor: ctx
                .actor
                .clone()
                .or_else(|| Some(updated.employee_number.clone())),
            action: AuditAction::Update,
            table_name: TABLE,
            record_id: Some(id.to_string()),
            description: format!(
                "Updated leave request (status {} -> {})",
                previous.status, updated.status
            ),
            context: ctx.clone(),
        });

        Ok(updated)
    }

    /// Administrative delete; bypasses the status machine and notifies nobody.
    #[instrument(name = "delete_leave_request", skip(self, ctx))]
    pub async fn delete_leave_request(&self, ctx: &RequestContext, id: u64) -> Result<(), AppError> {
        let owner = self.ledger.delete(id).await?;

        info!(id, employee = %owner, "Leave request deleted");

        self.effects.audit(AuditRecord {
            actor: Some(owner),
            action: AuditAction::Delete,
            table_name: TABLE,
            record_id: Some(id.to_string()),
            description: format!("Deleted leave request {}", id),
            context: ctx.clone(),
        });

        Ok(())
    }

    pub async fn view_leave_request(
        &self,
        ctx: &RequestContext,
        id: u64,
    ) -> Result<LeaveRequest, AppError> {
        let request = self.ledger.get(id).await?;

        self.effects.audit(AuditRecord {
            actor: ctx.actor.clone(),
            action: AuditAction::View,
            table_name: TABLE,
            record_id: Some(id.to_string()),
            description: format!("Viewed leave request of employee {}", request.employee_number),
            context: ctx.clone(),
        });

        Ok(request)
    }

    pub async fn view_all_leave_requests(
        &self,
        ctx: &RequestContext,
    ) -> Result<Vec<LeaveRequest>, AppError> {
        let requests = self.ledger.list_all().await?;

        self.effects.audit(AuditRecord {
            actor: ctx.actor.clone(),
            action: AuditAction::View,
            table_name: TABLE,
            record_id: None,
            description: format!("Viewed all leave requests ({} records)", requests.len()),
            context: ctx.clone(),
        });

        Ok(requests)
    }

    /// Falls back to the raw code when the catalog has nothing or fails.
    async fn leave_description(&self, leave_code: &str) -> String {
        match self.catalog.leave_description(leave_code).await {
            Ok(Some(description)) if !description.trim().is_empty() => description,
            Ok(_) => leave_code.to_string(),
            Err(e) => {
                warn!(error = %e, leave_code, "Leave type lookup failed, using code");
                leave_code.to_string()
            }
        }
    }
}
