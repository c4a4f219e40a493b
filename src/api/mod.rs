pub mod leave_catalog;
pub mod leave_request;
pub mod notification;

#[cfg(test)]
pub mod test_support;
