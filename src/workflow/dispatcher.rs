//! Best-effort side effects (notifications, audit entries).
//!
//! Callers hand effects to an unbounded channel and return immediately. A
//! single worker applies them in arrival order; every failure is logged
//! there and never reaches the caller.

use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error, warn};

use crate::model::{audit::AuditRecord, notification::NewNotification};
use crate::store::NotificationStore;
use crate::workflow::audit::AuditRecorder;

#[derive(Debug)]
pub enum SideEffect {
    Notify(NewNotification),
    Audit(AuditRecord),
}

enum Message {
    Effect(SideEffect),
    Flush(oneshot::Sender<()>),
}

#[derive(Clone)]
pub struct SideEffectDispatcher {
    tx: mpsc::UnboundedSender<Message>,
}

impl SideEffectDispatcher {
    /// Start the worker on the current tokio runtime.
    pub fn spawn(notifications: Arc<dyn NotificationStore>, audit: AuditRecorder) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        tokio::spawn(run_worker(rx, notifications, audit));
        Self { tx }
    }

    pub fn dispatch(&self, effect: SideEffect) {
        if self.tx.send(Message::Effect(effect)).is_err() {
            warn!("Side-effect worker is gone, dropping effect");
        }
    }

    pub fn notify(&self, notification: NewNotification) {
        self.dispatch(SideEffect::Notify(notification));
    }

    pub fn audit(&self, record: AuditRecord) {
        self.dispatch(SideEffect::Audit(record));
    }

    /// Resolves once every effect queued before this call has been applied.
    pub async fn flush(&self) {
        let (done_tx, done_rx) = oneshot::channel();
        if self.tx.send(Message::Flush(done_tx)).is_err() {
            return;
        }
        let _ = done_rx.await;
    }
}

async fn run_worker(
    mut rx: mpsc::UnboundedReceiver<Message>,
    notifications: Arc<dyn NotificationStore>,
    audit: AuditRecorder,
) {
    while let Some(message) = rx.recv().await {
        match message {
            Message::Effect(SideEffect::Notify(notification)) => {
                let kind = notification.kind.clone();
                let related_id = notification.related_id;

                match notifications.create(notification).await {
                    Ok(created) => debug!(id = created.id, kind = %kind, "Notification emitted"),
                    Err(e) => error!(error = %e, kind = %kind, related_id = ?related_id, "Failed to emit notification"),
                }
            }
            Message::Effect(SideEffect::Audit(record)) => audit.record(record).await,
            Message::Flush(done) => {
                let _ = done.send(());
            }
        }
    }

    debug!("Side-effect worker stopped");
}
