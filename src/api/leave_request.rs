use crate::auth::auth::AuthUser;
use crate::model::audit::RequestContext;
use crate::model::leave_request::LeaveRequestInput;
use crate::workflow::WorkflowEngine;
use actix_web::{HttpResponse, Responder, web};
use serde_json::json;

/* =========================
List leave requests
========================= */
/// All leave requests, newest leave date first
#[utoipa::path(
    get,
    path = "/api/leave_request",
    responses(
        (status = 200, description = "Leave requests ordered by leave_date desc", body = [LeaveRequest]),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave Request"
)]
pub async fn leave_list(
    ctx: RequestContext,
    engine: web::Data<WorkflowEngine>,
) -> actix_web::Result<impl Responder> {
    let requests = engine.view_all_leave_requests(&ctx).await?;
    Ok(HttpResponse::Ok().json(requests))
}

/// Single leave request
#[utoipa::path(
    get,
    path = "/api/leave_request/{id}",
    params(
        ("id" = u64, Path, description = "ID of the leave request to fetch")
    ),
    responses(
        (status = 200, description = "Leave request found", body = LeaveRequest),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Leave request not found", body = Object, example = json!({
            "error": "Leave request not found"
        }))
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave Request"
)]
pub async fn get_leave(
    ctx: RequestContext,
    engine: web::Data<WorkflowEngine>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    let request = engine.view_leave_request(&ctx, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(request))
}

/* =========================
Submit leave request
========================= */
/// Submit a leave request; admins are notified
#[utoipa::path(
    post,
    path = "/api/leave_request",
    request_body(
        content = LeaveRequestInput,
        description = "Leave request payload; status defaults to 0 (Pending)",
        content_type = "application/json"
    ),
    responses(
        (status = 200, description = "Leave request created", body = LeaveRequest),
        (status = 400, description = "Missing fields, invalid status or a request already exists for the date", body = Object, example = json!({
            "error": "A leave request already exists for this date"
        })),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave Request"
)]
pub async fn create_leave(
    ctx: RequestContext,
    engine: web::Data<WorkflowEngine>,
    payload: web::Json<LeaveRequestInput>,
) -> actix_web::Result<impl Responder> {
    let created = engine
        .submit_leave_request(&ctx, payload.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(created))
}

/* =========================
Update leave request
========================= */
/// Update a leave request; staff are notified when the status changes.
/// Employees may edit their own request but only HR/Admin change its status.
#[utoipa::path(
    put,
    path = "/api/leave_request/{id}",
    params(
        ("id" = u64, Path, description = "ID of the leave request to update")
    ),
    request_body = LeaveRequestInput,
    responses(
        (status = 200, description = "Leave request updated", body = LeaveRequest),
        (status = 400, description = "Invalid status value"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not the owner, or a status change by a non-approver"),
        (status = 404, description = "Leave request not found")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave Request"
)]
pub async fn update_leave(
    auth: AuthUser,
    ctx: RequestContext,
    engine: web::Data<WorkflowEngine>,
    path: web::Path<u64>,
    payload: web::Json<LeaveRequestInput>,
) -> actix_web::Result<impl Responder> {
    let id = path.into_inner();
    let input = payload.into_inner();

    let updated = if auth.is_employee() {
        // employees may fix their own request; approving is for HR/Admin
        let employee_number = auth.employee_number.as_deref().ok_or_else(|| {
            actix_web::error::ErrorForbidden("No employee record linked to this user")
        })?;
        engine
            .update_own_leave_request(&ctx, id, input, employee_number)
            .await?
    } else {
        auth.require_hr_or_admin()?;
        engine.update_leave_request(&ctx, id, input).await?
    };

    Ok(HttpResponse::Ok().json(updated))
}

/* =========================
Delete leave request (HR/Admin)
========================= */
/// Administrative delete
#[utoipa::path(
    delete,
    path = "/api/leave_request/{id}",
    params(
        ("id" = u64, Path, description = "ID of the leave request to delete")
    ),
    responses(
        (status = 200, description = "Deleted", body = Object, example = json!({
            "message": "Deleted successfully"
        })),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Leave request not found")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave Request"
)]
pub async fn delete_leave(
    auth: AuthUser,
    ctx: RequestContext,
    engine: web::Data<WorkflowEngine>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    auth.require_hr_or_admin()?;

    engine.delete_leave_request(&ctx, path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Deleted successfully"
    })))
}
