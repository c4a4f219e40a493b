use crate::api::notification::{AnnouncementNotice, LeaveNotice, NotificationInput};
use crate::model::leave_request::{LeaveRequest, LeaveRequestInput};
use crate::model::leave_type::{LeaveAssignment, LeaveAssignmentInput, LeaveType, LeaveTypeInput};
use crate::model::notification::Notification;
use utoipa::Modify;
use utoipa::OpenApi;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "HRM Leave Workflow API",
        version = "1.0.0",
        description = r#"
## Leave workflow and notifications

Leave requests move through numeric statuses:
`0` Pending, `1` Approved by manager, `2` Approved by HR, `3` Denied.

- **Leave Request**: submit, update, review and delete leave requests.
  One request per employee per date.
- **Leave Catalog**: leave types and per-employee assignments.
- **Notifications**: role broadcasts (admin, staff, all) and direct
  per-employee messages, with read tracking.

Every state change is written to the audit trail.

All endpoints require a **JWT Bearer** access token.
"#,
    ),
    paths(
        crate::api::leave_request::leave_list,
        crate::api::leave_request::get_leave,
        crate::api::leave_request::create_leave,
        crate::api::leave_request::update_leave,
        crate::api::leave_request::delete_leave,

        crate::api::leave_catalog::list_leave_types,
        crate::api::leave_catalog::create_leave_type,
        crate::api::leave_catalog::update_leave_type,
        crate::api::leave_catalog::delete_leave_type,
        crate::api::leave_catalog::list_assignments,
        crate::api::leave_catalog::create_assignment,
        crate::api::leave_catalog::update_assignment,
        crate::api::leave_catalog::delete_assignment,

        crate::api::notification::list_notifications,
        crate::api::notification::unread_count,
        crate::api::notification::list_all_notifications,
        crate::api::notification::list_user_notifications,
        crate::api::notification::create_notification,
        crate::api::notification::mark_read,
        crate::api::notification::mark_all_read,
        crate::api::notification::from_announcement,
        crate::api::notification::from_leave
    ),
    components(
        schemas(
            LeaveRequest,
            LeaveRequestInput,
            LeaveType,
            LeaveTypeInput,
            LeaveAssignment,
            LeaveAssignmentInput,
            Notification,
            NotificationInput,
            AnnouncementNotice,
            LeaveNotice
        )
    ),
    modifiers(&BearerAuth),
    tags(
        (name = "Leave Request", description = "Leave request workflow"),
        (name = "Leave Catalog", description = "Leave types and assignments"),
        (name = "Notifications", description = "Notification inbox"),
    )
)]
pub struct ApiDoc;
