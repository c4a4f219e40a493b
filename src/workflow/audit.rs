//! Audit recorder - appends one entry per audited action.
//!
//! `record` never fails: a store error is logged and dropped so that the
//! operation being described is never blocked by its own audit trail.

use chrono::Utc;
use std::sync::Arc;

use crate::model::audit::{AuditEntry, AuditRecord};
use crate::store::AuditStore;

#[derive(Clone)]
pub struct AuditRecorder {
    store: Arc<dyn AuditStore>,
}

impl AuditRecorder {
    pub fn new(store: Arc<dyn AuditStore>) -> Self {
        Self { store }
    }

    pub async fn record(&self, record: AuditRecord) {
        let entry = AuditEntry::from_record(record, Utc::now());

        if let Err(e) = self.store.append(&entry).await {
            tracing::warn!(
                error = %e,
                table = %entry.table_name,
                record_id = ?entry.record_id,
                action = %entry.action,
                "Failed to save audit entry"
            );
        }
    }
}
