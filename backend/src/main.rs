mod classifier;
mod config;
mod routes;
mod upload;
#[cfg(test)]
mod test_support;

use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use classifier::catalog::Catalog;
use classifier::mock::{FixedSelector, MockClassifier, RandomSelector, SeededSelector, Selector};
use classifier::remote::{RemoteClassifier, DEFAULT_TIMEOUT};
use classifier::Classifier;
use config::AppConfig;
use routes::configure_routes;
use std::env;
use std::sync::Arc;
use upload::UploadConfig;

fn build_classifier(config: &AppConfig) -> std::io::Result<Arc<dyn Classifier>> {
    if let Some(url) = &config.inference_url {
        let remote = RemoteClassifier::new(url.clone(), DEFAULT_TIMEOUT).map_err(|e| {
            log::error!("Failed to create inference client: {}", e);
            std::io::Error::other(format!("Inference client setup failed: {}", e))
        })?;
        log::info!("Forwarding classifications to {}", remote.endpoint());
        return Ok(Arc::new(remote));
    }

    let catalog = match &config.catalog_path {
        Some(path) => {
            let catalog = Catalog::load(path).map_err(|e| {
                log::error!("Failed to load catalog from {}: {}", path.display(), e);
                std::io::Error::other(format!("Catalog loading failed: {}", e))
            })?;
            log::info!("Loaded catalog from {}", path.display());
            catalog
        }
        None => Catalog::builtin(),
    };

    let selector: Box<dyn Selector> = match (config.classifier_fixed_index, config.classifier_seed) {
        (Some(index), _) => {
            log::warn!("Classifier pinned to catalog entry {}", index);
            Box::new(FixedSelector(index))
        }
        (None, Some(seed)) => {
            log::info!("Classifier selection seeded with {}", seed);
            Box::new(SeededSelector::new(seed))
        }
        (None, None) => Box::new(RandomSelector),
    };

    let mock = MockClassifier::new(catalog, config.classify_delay, selector);
    log::info!(
        "Mock classifier ready: {} catalog entries, {:?} simulated latency",
        mock.catalog().entries().len(),
        config.classify_delay
    );
    Ok(Arc::new(mock))
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    if let Ok(current_dir) = env::current_dir() {
        log::info!("Current working directory: {}", current_dir.display());
    } else {
        log::error!("Failed to get the current working directory.");
    }

    let config = AppConfig::from_env().map_err(|e| {
        log::error!("Invalid configuration: {}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string())
    })?;

    let classifier = build_classifier(&config)?;
    let upload_config = UploadConfig::new(config.max_upload_bytes);
    let frontend_dir = config.frontend_dir.clone();
    let bind_address = config.bind_address();

    log::info!(
        "Upload limit {} bytes, serving frontend from {}",
        upload_config.max_file_size,
        frontend_dir
    );
    log::info!("Starting server on {}", bind_address);

    HttpServer::new(move || {
        App::new()
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allowed_methods(vec!["GET", "POST", "OPTIONS"])
                    .allowed_headers(vec![
                        actix_web::http::header::ACCEPT,
                        actix_web::http::header::CONTENT_TYPE,
                    ])
                    .max_age(3600),
            )
            .app_data(web::Data::from(classifier.clone()))
            .app_data(upload_config)
            .configure(|cfg| configure_routes(cfg, frontend_dir.clone()))
    })
    .bind(&bind_address)?
    .run()
    .await
}
