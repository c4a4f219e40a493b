use actix_web::web::{self, Data};
use std::sync::Arc;

use crate::error::json_error_handler;
use crate::store::{AuditStore, LeaveCatalog, LeaveLedger, NotificationStore};
use crate::workflow::{AuditRecorder, SideEffectDispatcher, WorkflowEngine};

/// Everything the handlers need, wired once at startup.
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<WorkflowEngine>,
    pub effects: SideEffectDispatcher,
    pub catalog: Arc<dyn LeaveCatalog>,
    pub notifications: Arc<dyn NotificationStore>,
}

impl AppState {
    /// Must run inside a tokio runtime: it spawns the side-effect worker.
    pub fn new(
        ledger: Arc<dyn LeaveLedger>,
        catalog: Arc<dyn LeaveCatalog>,
        notifications: Arc<dyn NotificationStore>,
        audit: Arc<dyn AuditStore>,
    ) -> Self {
        let effects = SideEffectDispatcher::spawn(notifications.clone(), AuditRecorder::new(audit));
        let engine = Arc::new(WorkflowEngine::new(ledger, catalog.clone(), effects.clone()));

        Self {
            engine,
            effects,
            catalog,
            notifications,
        }
    }

    pub fn register(&self, cfg: &mut web::ServiceConfig) {
        cfg.app_data(web::JsonConfig::default().error_handler(json_error_handler))
            .app_data(Data::from(self.engine.clone()))
            .app_data(Data::new(self.effects.clone()))
            .app_data(Data::from(self.catalog.clone()))
            .app_data(Data::from(self.notifications.clone()));
    }
}
