use actix_web::{middleware::NormalizePath, web, App, HttpServer};
use anyhow::Context;
use portfolio_contact::{
    background_task::start_purge_task,
    graceful_shutdown::{serve_until, shutdown_signal},
    middlewares::security_headers::security_headers,
    routes::configure_routes,
    settings::AppConfig, AppState
};
use tracing_actix_web::TracingLogger;
use tracing_subscriber::EnvFilter;

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::new();
    init_tracing(matches!(&config, Ok(cfg) if cfg.is_production()));

    let config = match config {
        Ok(cfg) => {
            tracing::info!("Loaded configuration: {:?}", cfg);
            cfg
        },
        Err(e) => {
            tracing::error!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    let app_state = web::Data::new(AppState::new(&config));
    let limiter = app_state.contact_handler.rate_limiter.clone();

    let server_addr = format!("{}:{}", config.host, config.port);
    let server_config = config.clone();

    tracing::info!(
        "🚀 Starting {} v{} on {} (email provider: {})",
        config.name,
        env!("CARGO_PKG_VERSION"),
        server_addr,
        config.email_provider
    );

    let server = HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .wrap(NormalizePath::trim())
            .wrap(security_headers())
            .wrap(TracingLogger::default())
            .configure(|cfg| configure_routes(cfg, &server_config))
    })
    .workers(config.worker_count)
    .disable_signals()
    .bind(&server_addr)
    .with_context(|| format!("Failed to bind {}", server_addr))?
    .run();

    tokio::spawn(start_purge_task(limiter));

    serve_until(server, shutdown_signal()).await
}
