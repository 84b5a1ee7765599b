mod cache;
mod config;
mod inference;
mod routes;

use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use cache::cache_service::CacheService;
use config::AppConfig;
use inference::model::Model;
use routes::configure_routes;
use std::env;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    if let Ok(current_dir) = env::current_dir() {
        log::info!("Current working directory: {}", current_dir.display());
    } else {
        log::error!("Failed to get the current working directory.");
    }

    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(e) => {
            log::error!("Failed to load configuration: {}", e);
            return Err(std::io::Error::other(format!("Configuration error: {}", e)));
        }
    };

    let model = match Model::load(&config.model) {
        Ok(model) => model,
        Err(e) => {
            log::error!("{}", e);
            return Err(std::io::Error::other(format!("Model loading failed: {}", e)));
        }
    };
    log::info!(
        "Model ready: {} ({} engine, {}x{} input)",
        config.model.path.display(),
        model.info().engine,
        config.model.input_size,
        config.model.input_size
    );

    let cache_service = CacheService::new(config.cache.capacity);
    if cache_service.is_enabled() {
        log::info!("Caching up to {} inference results", config.cache.capacity);
    } else {
        log::warn!("Inference cache disabled");
    }

    let frontend_dir = config.server.frontend_dir.clone();
    if !frontend_dir.is_dir() {
        log::warn!(
            "Frontend directory {} not found; only the API will be served",
            frontend_dir.display()
        );
    }

    let bind_address = config.bind_address();
    let server_config = config.server.clone();
    log::info!("Starting server on {}", bind_address);

    HttpServer::new(move || {
        App::new()
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allowed_methods(vec!["GET", "POST", "DELETE", "OPTIONS"])
                    .allowed_headers(vec![
                        actix_web::http::header::ACCEPT,
                        actix_web::http::header::CONTENT_TYPE,
                    ])
                    .max_age(3600),
            )
            .app_data(web::Data::new(model.clone()))
            .app_data(web::Data::new(cache_service.clone()))
            .app_data(web::Data::new(server_config.clone()))
            .configure(|cfg| configure_routes(cfg, frontend_dir.clone()))
    })
    .bind(&bind_address)?
    .run()
    .await
}
