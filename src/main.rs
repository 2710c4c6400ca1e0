use actix_multipart::form::MultipartFormConfig;
use actix_web::{web, App, HttpServer};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{
    filter::LevelFilter, layer::SubscriberExt, util::SubscriberInitExt, Layer,
};

mod api;
mod cli;
mod config;
mod db;
mod shutdown;

use crate::api::auth::{handlers::auth_config, AuthService};
use crate::api::health::health_config;
use crate::api::jobs::{handlers::job_config, JobService};
use crate::api::locations::{handlers::location_config, LocationService};
use crate::api::organizations::{handlers::organization_config, OrganizationService};
use crate::api::validation;
use crate::shutdown::ShutdownCoordinator;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let cli = cli::Cli::parse();

    // Load configuration from environment
    let config = config::Config::from_env().expect("Failed to load configuration");

    // Create logs directory if it doesn't exist
    std::fs::create_dir_all(&config.log_dir).expect("Failed to create logs directory");

    // File-based logging with daily rotation and level separation, plus
    // console output. Log files land as logs/info.<date>.log etc.
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info".into());

    let info_file = tracing_appender::rolling::daily(&config.log_dir, "info.log");
    let warn_file = tracing_appender::rolling::daily(&config.log_dir, "warn.log");
    let error_file = tracing_appender::rolling::daily(&config.log_dir, "error.log");

    let info_layer = tracing_subscriber::fmt::layer()
        .with_writer(info_file)
        .with_ansi(false)
        .with_filter(LevelFilter::INFO);

    let warn_layer = tracing_subscriber::fmt::layer()
        .with_writer(warn_file)
        .with_ansi(false)
        .with_filter(LevelFilter::WARN);

    let error_layer = tracing_subscriber::fmt::layer()
        .with_writer(error_file)
        .with_ansi(false)
        .with_filter(LevelFilter::ERROR);

    let console_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stdout)
        .with_ansi(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(info_layer)
        .with(warn_layer)
        .with(error_layer)
        .init();

    // Get database connection pool
    let pool = db::connection::get_connection(&config.database_url, config.max_db_connections)
        .await
        .expect("Failed to connect to database");

    // Run migrations on startup
    db::migrations::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");

    // Admin subcommands run against the migrated database and exit
    if let Some(command) = cli.command {
        cli::run(&pool, command).await.expect("Admin command failed");
        pool.close().await;
        return Ok(());
    }

    info!("Starting job-tracker application");
    info!("Configuration loaded successfully:");
    info!("  - Bind address: {}:{}", config.host, config.port);
    info!("  - Max payload size: {} bytes", config.max_payload_size);
    info!("  - Max database connections: {}", config.max_db_connections);
    info!("  - Upload directory: {:?}", config.upload_dir);
    info!("Database connection pool established");

    std::fs::create_dir_all(&config.upload_dir).expect("Failed to create upload directory");

    // Clone pool for the HTTP server (original is used for shutdown)
    let server_pool = pool.clone();
    let server_config = config.clone();

    let server = HttpServer::new(move || {
        let auth_service = web::Data::new(AuthService::new(
            server_pool.clone(),
            server_config.jwt_secret.clone(),
            server_config.jwt_expire_days,
        ));
        let job_service = web::Data::new(JobService::new(server_pool.clone()));
        let location_service = web::Data::new(LocationService::new(
            server_pool.clone(),
            server_config.upload_dir.clone(),
        ));
        let organization_service = web::Data::new(OrganizationService::new(server_pool.clone()));

        // Payload size limits apply globally
        let payload_config = web::PayloadConfig::default().limit(server_config.max_payload_size);
        let multipart_config =
            MultipartFormConfig::default().total_limit(server_config.max_payload_size);

        App::new()
            .app_data(web::Data::new(server_pool.clone())) // Share DB pool across workers
            .app_data(web::Data::new(server_config.clone())) // Auth extractor reads the secret
            .app_data(auth_service)
            .app_data(job_service)
            .app_data(location_service)
            .app_data(organization_service)
            .app_data(payload_config)
            .app_data(multipart_config)
            .app_data(validation::json_config()) // Global validation config
            .configure(health_config)
            .service(
                web::scope("/api")
                    .configure(auth_config)
                    .configure(job_config)
                    .configure(location_config)
                    .configure(organization_config),
            )
    });

    info!("Server starting on http://{}:{}", config.host, config.port);

    let server = server.bind((config.host.as_str(), config.port))?.run();

    let server_handle = server.handle();
    let server_task = tokio::spawn(server);

    let coordinator = ShutdownCoordinator::new(server_handle, server_task, pool);
    coordinator.wait_for_shutdown().await
}
