use std::sync::Arc;

use sqlx::PgPool;

use crate::llm_client::TextGenerator;
use crate::mailer::Mailer;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    /// The single model client. Tests swap in a scripted generator.
    pub llm: Arc<dyn TextGenerator>,
    /// `None` when RESEND_API_KEY / MAIL_FROM are not configured.
    pub mailer: Option<Mailer>,
}
