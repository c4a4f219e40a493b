//! Shared wiring for handler tests: in-memory stores behind the real
//! routes and auth middleware.

use actix_web::{test::TestRequest, web, web::Data};
use serde_json::Value;
use std::sync::Arc;

use crate::auth::jwt::test_tokens;
use crate::config::Config;
use crate::routes;
use crate::state::AppState;
use crate::store::memory::{
    MemoryAuditStore, MemoryLeaveCatalog, MemoryLeaveLedger, MemoryNotificationStore,
};
use crate::workflow::SideEffectDispatcher;

pub struct TestContext {
    pub config: Config,
    pub state: AppState,
    pub effects: SideEffectDispatcher,
    pub catalog: Arc<MemoryLeaveCatalog>,
    pub notifications: Arc<MemoryNotificationStore>,
    pub audit: Arc<MemoryAuditStore>,
}

impl TestContext {
    pub fn new() -> Self {
        let catalog = Arc::new(MemoryLeaveCatalog::with_type("SL", "Sick Leave"));
        let notifications = Arc::new(MemoryNotificationStore::new());
        let audit = Arc::new(MemoryAuditStore::new());
        let state = AppState::new(
            Arc::new(MemoryLeaveLedger::new()),
            catalog.clone(),
            notifications.clone(),
            audit.clone(),
        );

        Self {
            config: Config {
                server_addr: "127.0.0.1:0".into(),
                database_url: "mysql://unused".into(),
                jwt_secret: test_tokens::SECRET.into(),
                db_max_connections: 1,
                rate_protected_per_min: 10_000,
                api_prefix: "/api".into(),
                log_dir: "logs".into(),
                leave_type_cache_ttl_secs: 60,
            },
            effects: state.effects.clone(),
            state,
            catalog,
            notifications,
            audit,
        }
    }

    pub fn register(&self, cfg: &mut web::ServiceConfig) {
        cfg.app_data(Data::new(self.config.clone()));
        self.state.register(cfg);
        routes::configure(cfg, self.config.clone());
    }

    pub fn token(&self, role: u8, employee_number: Option<&str>) -> String {
        test_tokens::access(role, employee_number)
    }
}

pub fn authed(req: TestRequest, token: &str, body: Option<&Value>) -> TestRequest {
    let req = req
        .insert_header(("Authorization", format!("Bearer {}", token)))
        .insert_header(("User-Agent", "hrm-tests"))
        .peer_addr("127.0.0.1:9000".parse().unwrap());

    match body {
        Some(json) => req.set_json(json),
        None => req,
    }
}

macro_rules! call {
    ($app:expr, $req:expr, $token:expr, $body:expr $(,)?) => {
        actix_web::test::call_service(
            $app,
            $crate::api::test_support::authed($req, $token, $body).to_request(),
        )
    };
}

pub(crate) use call;
