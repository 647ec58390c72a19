//! Course checkout server binary.

use std::sync::Arc;

use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use course_checkout::adapters::{
    build_router, CheckoutAppState, CheckoutEventLogger, HttpCourseLookup,
    HttpCourseLookupConfig, InMemoryCheckoutRepository, InMemoryCourseCatalogue,
    InMemoryEventBus,
};
use course_checkout::config::{AppConfig, CatalogueSource, ServerConfig};
use course_checkout::domain::checkout::CheckoutEvent;
use course_checkout::ports::{CourseLookup, EventSubscriber};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!(error = %e, "Server terminated");
        eprintln!("course-checkout: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    init_tracing(&config.server);
    config.validate()?;

    let course_lookup = course_lookup(&config)?;
    let default_locale = config.navigation.default_locale()?;

    let bus = Arc::new(InMemoryEventBus::new());
    bus.subscribe_all(&CheckoutEvent::EVENT_TYPES, Arc::new(CheckoutEventLogger));

    let repository = InMemoryCheckoutRepository::new();
    let sweeper = repository.spawn_idle_sweeper(
        config.checkout.idle_ttl(),
        config.checkout.sweep_interval(),
    );

    let state = CheckoutAppState::new(
        Arc::new(repository),
        course_lookup,
        bus,
        config.navigation.paths(),
        default_locale,
    );
    let app = build_router(state, &config.server);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, environment = ?config.server.environment, "Course checkout listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    sweeper.abort();
    info!("Server stopped");
    Ok(())
}

/// Human-readable logs in development, JSON lines in production.
/// `RUST_LOG` overrides the configured filter.
fn init_tracing(server: &ServerConfig) {
    let filter = EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| server.log_level.clone()),
    );
    let registry = tracing_subscriber::registry().with(filter);

    if server.is_production() {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_target(false))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_target(false))
            .init();
    }
}

fn course_lookup(config: &AppConfig) -> Result<Arc<dyn CourseLookup>, Box<dyn std::error::Error>> {
    let lookup: Arc<dyn CourseLookup> = match config.catalogue.source() {
        CatalogueSource::Http { base_url, timeout } => {
            info!(%base_url, "Using HTTP course catalogue");
            let config = HttpCourseLookupConfig::new(base_url).with_timeout(timeout);
            Arc::new(HttpCourseLookup::new(config)?)
        }
        CatalogueSource::Seed(path) => {
            let catalogue = InMemoryCourseCatalogue::from_yaml_file(path)?;
            info!(path = %path.display(), "Using seeded course catalogue");
            Arc::new(catalogue)
        }
        CatalogueSource::Empty => {
            info!("No catalogue configured, every checkout will resolve to not found");
            Arc::new(InMemoryCourseCatalogue::new())
        }
    };
    Ok(lookup)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for shutdown signal");
    }
}
