mod audit;
mod leave_catalog;
mod leave_request;
mod notification;

pub use audit::MySqlAuditStore;
pub use leave_catalog::MySqlLeaveCatalog;
pub use leave_request::MySqlLeaveLedger;
pub use notification::MySqlNotificationStore;
