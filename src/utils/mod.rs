pub mod leave_type_cache;
pub mod request_context;
