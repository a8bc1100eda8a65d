pub mod handlers;
pub mod upload;

use crate::{config::Config, error::Result, gemini::TextGenerator, prompt::STATS_PROMPT};
use actix_web::{middleware, web, App, HttpServer};
use std::sync::Arc;

/// Immutable state shared by every worker.
#[derive(Clone)]
pub struct AppState {
    pub generator: Arc<dyn TextGenerator>,
    pub prompt: &'static str,
    pub max_upload_bytes: usize,
}

impl AppState {
    pub fn new(generator: Arc<dyn TextGenerator>, max_upload_bytes: usize) -> Self {
        Self {
            generator,
            prompt: STATS_PROMPT,
            max_upload_bytes,
        }
    }
}

pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(handlers::parse_stats).service(handlers::health);
}

pub async fn run(config: Config, generator: Arc<dyn TextGenerator>) -> Result<()> {
    let state = web::Data::new(AppState::new(generator, config.max_upload_bytes()));

    log::info!("✅ Serving on {}:{}", config.host(), config.port());

    HttpServer::new(move || {
        App::new()
            .wrap(middleware::Logger::new("%a \"%r\" %s %b %Dms"))
            .app_data(state.clone())
            .configure(routes)
    })
    .bind((config.host(), config.port()))?
    .run()
    .await?;

    log::info!("👋 Server stopped");
    Ok(())
}
