use crate::auth::auth::AuthUser;
use crate::model::audit::{AuditAction, AuditRecord, RequestContext};
use crate::model::leave_type::{LeaveAssignmentInput, LeaveTypeInput};
use crate::store::LeaveCatalog;
use crate::workflow::SideEffectDispatcher;
use actix_web::{HttpResponse, Responder, web};
use serde_json::json;

fn audit(
    effects: &SideEffectDispatcher,
    ctx: &RequestContext,
    action: AuditAction,
    table_name: &'static str,
    record_id: u64,
    description: String,
) {
    effects.audit(AuditRecord {
        actor: ctx.actor.clone(),
        action,
        table_name,
        record_id: Some(record_id.to_string()),
        description,
        context: ctx.clone(),
    });
}

// ---------------- leave types ----------------

/// List leave types
#[utoipa::path(
    get,
    path = "/api/leave_table",
    responses(
        (status = 200, description = "Leave type catalog", body = [LeaveType]),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Leave Catalog"
)]
pub async fn list_leave_types(
    catalog: web::Data<dyn LeaveCatalog>,
) -> actix_web::Result<impl Responder> {
    Ok(HttpResponse::Ok().json(catalog.list_leave_types().await?))
}

/// Create leave type (HR/Admin)
#[utoipa::path(
    post,
    path = "/api/leave_table",
    request_body = LeaveTypeInput,
    responses(
        (status = 200, description = "Leave type created", body = LeaveType),
        (status = 400, description = "Missing required fields"),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Leave Catalog"
)]
pub async fn create_leave_type(
    auth: AuthUser,
    ctx: RequestContext,
    catalog: web::Data<dyn LeaveCatalog>,
    effects: web::Data<SideEffectDispatcher>,
    payload: web::Json<LeaveTypeInput>,
) -> actix_web::Result<impl Responder> {
    auth.require_hr_or_admin()?;
    payload.validate()?;

    let created = catalog.create_leave_type(payload.into_inner()).await?;
    tracing::info!(id = created.id, code = %created.leave_code, "Leave type created");

    audit(
        &effects,
        &ctx,
        AuditAction::Create,
        "leave_table",
        created.id,
        format!("Created leave type {}", created.leave_code),
    );

    Ok(HttpResponse::Ok().json(created))
}

/// Update leave type (HR/Admin)
#[utoipa::path(
    put,
    path = "/api/leave_table/{id}",
    params(("id" = u64, Path, description = "Leave type id")),
    request_body = LeaveTypeInput,
    responses(
        (status = 200, description = "Leave type updated", body = LeaveType),
        (status = 404, description = "Leave type not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Leave Catalog"
)]
pub async fn update_leave_type(
    auth: AuthUser,
    ctx: RequestContext,
    catalog: web::Data<dyn LeaveCatalog>,
    effects: web::Data<SideEffectDispatcher>,
    path: web::Path<u64>,
    payload: web::Json<LeaveTypeInput>,
) -> actix_web::Result<impl Responder> {
    auth.require_hr_or_admin()?;
    payload.validate()?;

    let id = path.into_inner();
    let updated = catalog.update_leave_type(id, payload.into_inner()).await?;

    audit(
        &effects,
        &ctx,
        AuditAction::Update,
        "leave_table",
        id,
        format!("Updated leave type {}", updated.leave_code),
    );

    Ok(HttpResponse::Ok().json(updated))
}

/// Delete leave type (HR/Admin)
#[utoipa::path(
    delete,
    path = "/api/leave_table/{id}",
    params(("id" = u64, Path, description = "Leave type id")),
    responses(
        (status = 200, description = "Deleted", body = Object, example = json!({"message": "Deleted successfully"})),
        (status = 404, description = "Leave type not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Leave Catalog"
)]
pub async fn delete_leave_type(
    auth: AuthUser,
    ctx: RequestContext,
    catalog: web::Data<dyn LeaveCatalog>,
    effects: web::Data<SideEffectDispatcher>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    auth.require_hr_or_admin()?;

    let id = path.into_inner();
    catalog.delete_leave_type(id).await?;

    audit(
        &effects,
        &ctx,
        AuditAction::Delete,
        "leave_table",
        id,
        format!("Deleted leave type {}", id),
    );

    Ok(HttpResponse::Ok().json(json!({ "message": "Deleted successfully" })))
}

// ---------------- leave assignments ----------------

/// List leave assignments
#[utoipa::path(
    get,
    path = "/api/leave_assignment",
    responses(
        (status = 200, description = "Leave assignments", body = [LeaveAssignment])
    ),
    security(("bearer_auth" = [])),
    tag = "Leave Catalog"
)]
pub async fn list_assignments(
    catalog: web::Data<dyn LeaveCatalog>,
) -> actix_web::Result<impl Responder> {
    Ok(HttpResponse::Ok().json(catalog.list_assignments().await?))
}

/// Assign a leave code to an employee
#[utoipa::path(
    post,
    path = "/api/leave_assignment",
    request_body = LeaveAssignmentInput,
    responses(
        (status = 200, description = "Assignment created", body = LeaveAssignment),
        (status = 400, description = "Missing required fields")
    ),
    security(("bearer_auth" = [])),
    tag = "Leave Catalog"
)]
pub async fn create_assignment(
    auth: AuthUser,
    ctx: RequestContext,
    catalog: web::Data<dyn LeaveCatalog>,
    effects: web::Data<SideEffectDispatcher>,
    payload: web::Json<LeaveAssignmentInput>,
) -> actix_web::Result<impl Responder> {
    auth.require_hr_or_admin()?;
    payload.validate()?;

    let created = catalog.create_assignment(payload.into_inner()).await?;

    audit(
        &effects,
        &ctx,
        AuditAction::Create,
        "leave_assignment",
        created.id,
        format!(
            "Assigned leave {} to employee {}",
            created.leave_code, created.employee_number
        ),
    );

    Ok(HttpResponse::Ok().json(created))
}

/// Update a leave assignment
#[utoipa::path(
    put,
    path = "/api/leave_assignment/{id}",
    params(("id" = u64, Path, description = "Assignment id")),
    request_body = LeaveAssignmentInput,
    responses(
        (status = 200, description = "Assignment updated", body = LeaveAssignment),
        (status = 404, description = "Leave assignment not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Leave Catalog"
)]
pub async fn update_assignment(
    auth: AuthUser,
    ctx: RequestContext,
    catalog: web::Data<dyn LeaveCatalog>,
    effects: web::Data<SideEffectDispatcher>,
    path: web::Path<u64>,
    payload: web::Json<LeaveAssignmentInput>,
) -> actix_web::Result<impl Responder> {
    auth.require_hr_or_admin()?;
    payload.validate()?;

    let id = path.into_inner();
    let updated = catalog.update_assignment(id, payload.into_inner()).await?;

    audit(
        &effects,
        &ctx,
        AuditAction::Update,
        "leave_assignment",
        id,
        format!("Updated leave assignment of employee {}", updated.employee_number),
    );

    Ok(HttpResponse::Ok().json(updated))
}

/// Delete a leave assignment
#[utoipa::path(
    delete,
    path = "/api/leave_assignment/{id}",
    params(("id" = u64, Path, description = "Assignment id")),
    responses(
        (status = 200, description = "Deleted", body = Object, example = json!({"message": "Deleted successfully"})),
        (status = 404, description = "Leave assignment not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Leave Catalog"
)]
pub async fn delete_assignment(
    auth: AuthUser,
    ctx: RequestContext,
    catalog: web::Data<dyn LeaveCatalog>,
    effects: web::Data<SideEffectDispatcher>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    auth.require_hr_or_admin()?;

    let id = path.into_inner();
    catalog.delete_assignment(id).await?;

    audit(
        &effects,
        &ctx,
        AuditAction::Delete,
        "leave_assignment",
        id,
        format!("Deleted leave assignment {}", id),
    );

    Ok(HttpResponse::Ok().json(json!({ "message": "Deleted successfully" })))
}
