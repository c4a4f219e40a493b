use crate::auth::auth::AuthUser;
use crate::error::AppError;
use crate::model::audit::{AuditAction, AuditRecord, RequestContext};
use crate::model::notification::{
    KIND_ANNOUNCEMENT, KIND_LEAVE_REQUEST, NewNotification, Notification, Recipient,
    RecipientRole,
};
use crate::store::NotificationStore;
use crate::workflow::SideEffectDispatcher;
use actix_web::{HttpResponse, Responder, web};
use serde::Deserialize;
use serde_json::json;
use utoipa::ToSchema;

const TABLE: &str = "notifications";

#[derive(Debug, Deserialize, ToSchema)]
pub struct NotificationInput {
    #[schema(example = "Office closed")]
    pub title: String,
    #[schema(example = "The office is closed on Friday")]
    pub message: String,
    #[serde(rename = "type", default)]
    #[schema(example = "general")]
    pub kind: Option<String>,
    #[schema(value_type = Option<String>, example = "staff")]
    pub recipient_role: Option<RecipientRole>,
    #[serde(rename = "employeeNumber")]
    pub employee_number: Option<String>,
    pub related_id: Option<u64>,
}

impl NotificationInput {
    fn into_new(self) -> Result<NewNotification, AppError> {
        if self.title.trim().is_empty() || self.message.trim().is_empty() {
            return Err(AppError::Validation(
                "Missing required fields: title and message".to_string(),
            ));
        }

        let employee = self.employee_number.filter(|e| !e.trim().is_empty());
        let recipient = match (self.recipient_role, employee) {
            (Some(role), None) => Recipient::Broadcast(role),
            (None, Some(employee)) => Recipient::Direct(employee),
            _ => {
                return Err(AppError::Validation(
                    "Provide exactly one of recipient_role or employeeNumber".to_string(),
                ));
            }
        };

        Ok(NewNotification {
            title: self.title,
            message: self.message,
            kind: self
                .kind
                .filter(|k| !k.trim().is_empty())
                .unwrap_or_else(|| "general".to_string()),
            recipient,
            related_id: self.related_id,
        })
    }
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnnouncementNotice {
    #[schema(example = 3)]
    pub announcement_id: u64,
    #[schema(example = "Holiday schedule")]
    pub title: String,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LeaveNotice {
    #[schema(example = 1)]
    pub leave_request_id: u64,
    #[schema(example = "E1")]
    pub employee_number: String,
    #[schema(example = "Sick Leave")]
    pub leave_type: String,
    #[schema(example = "2025-05-01")]
    pub leave_date: String,
}

fn audit(
    effects: &SideEffectDispatcher,
    ctx: &RequestContext,
    action: AuditAction,
    record_id: Option<u64>,
    description: String,
) {
    effects.audit(AuditRecord {
        actor: ctx.actor.clone(),
        action,
        table_name: TABLE,
        record_id: record_id.map(|id| id.to_string()),
        description,
        context: ctx.clone(),
    });
}

async fn create_and_audit(
    store: &dyn NotificationStore,
    effects: &SideEffectDispatcher,
    ctx: &RequestContext,
    new: NewNotification,
) -> Result<Notification, AppError> {
    let created = store.create(new).await?;
    tracing::info!(id = created.id, kind = %created.kind, "Notification created");

    audit(
        effects,
        ctx,
        AuditAction::Create,
        Some(created.id),
        format!("Created notification: {}", created.title),
    );

    Ok(created)
}

/// Broadcast notifications for the caller's role, including those sent to everyone
#[utoipa::path(
    get,
    path = "/api/notifications",
    responses(
        (status = 200, description = "Notifications, newest first", body = [Notification]),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Notifications"
)]
pub async fn list_notifications(
    auth: AuthUser,
    store: web::Data<dyn NotificationStore>,
) -> actix_web::Result<impl Responder> {
    let recipient = Recipient::Broadcast(auth.role.recipient_role());
    Ok(HttpResponse::Ok().json(store.list_for(&recipient).await?))
}

#[utoipa::path(
    get,
    path = "/api/notifications/unread/count",
    responses(
        (status = 200, description = "Unread count", body = Object, example = json!({"count": 2}))
    ),
    security(("bearer_auth" = [])),
    tag = "Notifications"
)]
pub async fn unread_count(
    auth: AuthUser,
    store: web::Data<dyn NotificationStore>,
) -> actix_web::Result<impl Responder> {
    let recipient = Recipient::Broadcast(auth.role.recipient_role());
    let count = store.unread_count(&recipient).await?;
    Ok(HttpResponse::Ok().json(json!({ "count": count })))
}

/// Every notification (HR/Admin)
#[utoipa::path(
    get,
    path = "/api/notifications/admin",
    responses(
        (status = 200, description = "All notifications", body = [Notification]),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Notifications"
)]
pub async fn list_all_notifications(
    auth: AuthUser,
    store: web::Data<dyn NotificationStore>,
) -> actix_web::Result<impl Responder> {
    auth.require_hr_or_admin()?;
    Ok(HttpResponse::Ok().json(store.list_all().await?))
}

/// Direct notifications of one employee; staff may only read their own
#[utoipa::path(
    get,
    path = "/api/notifications/user/{employeeNumber}",
    params(("employeeNumber" = String, Path, description = "Employee number")),
    responses(
        (status = 200, description = "Notifications, newest first", body = [Notification]),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Notifications"
)]
pub async fn list_user_notifications(
    auth: AuthUser,
    store: web::Data<dyn NotificationStore>,
    path: web::Path<String>,
) -> actix_web::Result<impl Responder> {
    let employee_number = path.into_inner();

    if auth.is_employee() && auth.employee_number.as_deref() != Some(employee_number.as_str()) {
        return Err(actix_web::error::ErrorForbidden(
            "Employees can only read their own notifications",
        ));
    }

    let recipient = Recipient::Direct(employee_number);
    Ok(HttpResponse::Ok().json(store.list_for(&recipient).await?))
}

/// Create a notification directly (HR/Admin)
#[utoipa::path(
    post,
    path = "/api/notifications",
    request_body = NotificationInput,
    responses(
        (status = 200, description = "Notification created", body = Notification),
        (status = 400, description = "Missing title, message or recipient"),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Notifications"
)]
pub async fn create_notification(
    auth: AuthUser,
    ctx: RequestContext,
    store: web::Data<dyn NotificationStore>,
    effects: web::Data<SideEffectDispatcher>,
    payload: web::Json<NotificationInput>,
) -> actix_web::Result<impl Responder> {
    auth.require_hr_or_admin()?;

    let new = payload.into_inner().into_new()?;
    let created = create_and_audit(store.get_ref(), &effects, &ctx, new).await?;

    Ok(HttpResponse::Ok().json(created))
}

#[utoipa::path(
    put,
    path = "/api/notifications/{id}/read",
    params(("id" = u64, Path, description = "Notification id")),
    responses(
        (status = 200, description = "Marked as read", body = Object, example = json!({"message": "Notification marked as read"})),
        (status = 404, description = "Notification not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Notifications"
)]
pub async fn mark_read(
    ctx: RequestContext,
    store: web::Data<dyn NotificationStore>,
    effects: web::Data<SideEffectDispatcher>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    let id = path.into_inner();
    store.mark_read(id).await?;

    audit(
        &effects,
        &ctx,
        AuditAction::Update,
        Some(id),
        format!("Marked notification {} as read", id),
    );

    Ok(HttpResponse::Ok().json(json!({ "message": "Notification marked as read" })))
}

#[utoipa::path(
    put,
    path = "/api/notifications/read-all",
    responses(
        (status = 200, description = "Number of notifications flipped to read", body = Object, example = json!({"updated": 4})),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Notifications"
)]
pub async fn mark_all_read(
    auth: AuthUser,
    ctx: RequestContext,
    store: web::Data<dyn NotificationStore>,
    effects: web::Data<SideEffectDispatcher>,
) -> actix_web::Result<impl Responder> {
    auth.require_hr_or_admin()?;

    let updated = store.mark_all_read().await?;

    audit(
        &effects,
        &ctx,
        AuditAction::Update,
        None,
        format!("Marked {} notifications as read", updated),
    );

    Ok(HttpResponse::Ok().json(json!({ "updated": updated })))
}

/// Announce to everyone (HR/Admin)
#[utoipa::path(
    post,
    path = "/api/notifications/from-announcement",
    request_body = AnnouncementNotice,
    responses(
        (status = 200, description = "Notification created", body = Notification),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Notifications"
)]
pub async fn from_announcement(
    auth: AuthUser,
    ctx: RequestContext,
    store: web::Data<dyn NotificationStore>,
    effects: web::Data<SideEffectDispatcher>,
    payload: web::Json<AnnouncementNotice>,
) -> actix_web::Result<impl Responder> {
    auth.require_hr_or_admin()?;

    let notice = payload.into_inner();
    if notice.title.trim().is_empty() {
        return Err(AppError::Validation("Missing required field: title".to_string()).into());
    }

    let new = NewNotification {
        title: "New Announcement".to_string(),
        message: notice.title,
        kind: KIND_ANNOUNCEMENT.to_string(),
        recipient: Recipient::Broadcast(RecipientRole::All),
        related_id: Some(notice.announcement_id),
    };
    let created = create_and_audit(store.get_ref(), &effects, &ctx, new).await?;

    Ok(HttpResponse::Ok().json(created))
}

/// Tell one employee about a leave request (HR/Admin)
#[utoipa::path(
    post,
    path = "/api/notifications/from-leave",
    request_body = LeaveNotice,
    responses(
        (status = 200, description = "Notification created", body = Notification),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Notifications"
)]
pub async fn from_leave(
    auth: AuthUser,
    ctx: RequestContext,
    store: web::Data<dyn NotificationStore>,
    effects: web::Data<SideEffectDispatcher>,
    payload: web::Json<LeaveNotice>,
) -> actix_web::Result<impl Responder> {
    auth.require_hr_or_admin()?;

    let notice = payload.into_inner();
    if notice.employee_number.trim().is_empty() {
        return Err(
            AppError::Validation("Missing required field: employeeNumber".to_string()).into(),
        );
    }

    let new = NewNotification {
        title: "Leave Request".to_string(),
        message: format!(
            "Your {} request for {} has been recorded",
            notice.leave_type, notice.leave_date
        ),
        kind: KIND_LEAVE_REQUEST.to_string(),
        recipient: Recipient::Direct(notice.employee_number),
        related_id: Some(notice.leave_request_id),
    };
    let created = create_and_audit(store.get_ref(), &effects, &ctx, new).await?;

    Ok(HttpResponse::Ok().json(created))
}
