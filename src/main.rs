use std::sync::Arc;

use actix_web::{web, App, HttpServer};
use tracing::info;

use linkforge::ai::{AiEnrichment, HttpInferenceClient, InferenceClient};
use linkforge::analytics::{GeoIpProvider, VisitEnricher};
use linkforge::api;
use linkforge::config::AppConfig;
use linkforge::services::{LinkService, RedirectResolver};
use linkforge::storage::memory::MemoryStore;
use linkforge::storage::LinkStore;
use linkforge::system::logging::init_logging;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env()?;
    init_logging(&config.logging);
    config.log_startup_diagnostics();

    let store: Arc<dyn LinkStore> = Arc::new(MemoryStore::new());
    info!("Using storage backend: {}", store.backend_name());

    let geoip = GeoIpProvider::new(&config.analytics);
    let enricher = Arc::new(VisitEnricher::new(Arc::clone(&store), geoip));
    let resolver = Arc::new(RedirectResolver::new(
        Arc::clone(&store),
        Arc::clone(&enricher),
    ));

    let inference: Arc<dyn InferenceClient> = Arc::new(HttpInferenceClient::new(
        config.inference.base_url.clone(),
        config.inference.api_key.clone(),
        config.inference.model.clone(),
    ));
    let ai = Arc::new(AiEnrichment::new(inference, &config.inference));
    let link_service = Arc::new(LinkService::new(Arc::clone(&store), ai));

    let bind_addr = (config.server.host.clone(), config.server.port);
    info!("Listening on {}:{}", bind_addr.0, bind_addr.1);

    let server_config = config.server.clone();
    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(server_config.clone()))
            .app_data(web::Data::new(Arc::clone(&resolver)))
            .app_data(web::Data::new(Arc::clone(&link_service)))
            // /api scope first; /{code} is a catch-all
            .configure(api::links_routes)
            .configure(api::redirect_routes)
    })
    .bind(bind_addr)?
    .run()
    .await?;

    Ok(())
}
