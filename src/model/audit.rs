use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Actor recorded when no authenticated employee applies.
pub const SYSTEM_ACTOR: &str = "SYSTEM";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumString, Display, AsRefStr)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum AuditAction {
    View,
    Create,
    Update,
    Delete,
}

/// Caller details captured from the inbound request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestContext {
    pub actor: Option<String>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

/// What a caller asks the audit recorder to write.
#[derive(Debug, Clone)]
pub struct AuditRecord {
    pub actor: Option<String>,
    pub action: AuditAction,
    pub table_name: &'static str,
    pub record_id: Option<String>,
    pub description: String,
    pub context: RequestContext,
}

/// Append-only row in `audit_logs`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuditEntry {
    pub employee_number: String,
    pub action: AuditAction,
    pub table_name: String,
    pub record_id: Option<String>,
    pub description: String,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl AuditEntry {
    pub fn from_record(record: AuditRecord, timestamp: DateTime<Utc>) -> Self {
        let employee_number = record
            .actor
            .filter(|a| !a.trim().is_empty())
            .unwrap_or_else(|| SYSTEM_ACTOR.to_string());

        Self {
            employee_number,
            action: record.action,
            table_name: record.table_name.to_string(),
            record_id: record.record_id,
            description: record.description,
            ip_address: record.context.ip_address,
            user_agent: record.context.user_agent,
            timestamp,
        }
    }
}
