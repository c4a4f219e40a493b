pub mod audit;
pub mod dispatcher;
pub mod engine;

pub use audit::AuditRecorder;
pub use dispatcher::SideEffectDispatcher;
pub use engine::WorkflowEngine;
