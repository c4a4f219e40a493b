pub mod audit;
pub mod leave_request;
pub mod leave_type;
pub mod notification;
pub mod role;
