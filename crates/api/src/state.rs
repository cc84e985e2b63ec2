use std::sync::Arc;

use haulage_report::ReportGenerator;

use crate::config::ServerConfig;
use crate::delivery::email::ReportMailer;
use crate::vision::ItemIdentifier;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: haulage_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// PDF report generator.
    pub reports: Arc<ReportGenerator>,
    /// SMTP mailer for report delivery; `None` when SMTP is not configured.
    pub mailer: Option<Arc<ReportMailer>>,
    /// Vision model used by AI identification; `None` without an API key.
    pub identifier: Option<Arc<dyn ItemIdentifier>>,
}

impl AppState {
    /// Build state from config, wiring the optional collaborators it enables.
    pub fn new(pool: haulage_db::DbPool, config: ServerConfig) -> Self {
        let reports = Arc::new(ReportGenerator::new(config.reports.clone()));
        let mailer = config
            .email
            .clone()
            .map(|cfg| Arc::new(ReportMailer::new(cfg)));
        let identifier = config.vision.clone().map(|cfg| {
            Arc::new(crate::vision::gemini::GeminiIdentifier::new(cfg)) as Arc<dyn ItemIdentifier>
        });

        Self {
            pool,
            config: Arc::new(config),
            reports,
            mailer,
            identifier,
        }
    }
}
