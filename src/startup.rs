use std::net::TcpListener;
use std::sync::Arc;

use actix_web::dev::Server;
use actix_web::{web, App, HttpServer};
use anyhow::Context;
use tracing_actix_web::TracingLogger;

use crate::config::Settings;
use crate::repository::document_store::DocumentStoreRepository;
use crate::repository::in_memory::InMemoryRepository;
use crate::repository::SubscriberRepository;
use crate::routes::{handle_create_subscription, handle_list_subscriptions, health_check};
use crate::service::NewsletterService;

pub struct Application {
    pub port: u16,
    pub server: Server,
}

impl Application {
    pub async fn build(config: Settings) -> Result<Self, anyhow::Error> {
        let repository = build_repository(&config).await?;

        let listener =
            TcpListener::bind(config.get_address()).context("Failed to bind the address.")?;
        let port = listener.local_addr()?.port();
        let server = run(listener, repository)?;

        Ok(Self { port, server })
    }

    pub fn get_port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stop(self) -> Result<(), std::io::Error> {
        self.server.await
    }
}

/// Reads the feature flag once and binds exactly one repository variant for
/// the lifetime of the process.
pub async fn build_repository(
    config: &Settings,
) -> Result<Arc<dyn SubscriberRepository>, anyhow::Error> {
    if config.feature_flags.use_document_store {
        let settings = config
            .document_store
            .as_ref()
            .context("Document store selected but the document_store section is missing.")?;
        let repository = DocumentStoreRepository::connect(settings).await?;

        tracing::info!("Using the document store subscriber repository");

        Ok(Arc::new(repository))
    } else {
        tracing::info!("Using the in-memory subscriber repository");

        Ok(Arc::new(InMemoryRepository::new()))
    }
}

pub fn run(
    listener: TcpListener,
    repository: Arc<dyn SubscriberRepository>,
) -> Result<Server, std::io::Error> {
    let service = web::Data::new(NewsletterService::new(repository));

    let server = HttpServer::new(move || {
        // App is where your application logic lives: routing, middlewares, request handler, etc
        App::new()
            // 'wrap' method adds a middleware to the App. This specific middleware provide incoming
            // request logger
            .wrap(TracingLogger::default())
            .route("/health_check", web::get().to(health_check))
            .route("/subscriptions", web::post().to(handle_create_subscription))
            .route("/subscriptions", web::get().to(handle_list_subscriptions))
            .app_data(service.clone())
    })
    .listen(listener)?
    .run();

    Ok(server)
}
