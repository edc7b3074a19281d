use adapt_api::cli::CliArgs;
use adapt_api::config::init_app_config;
use adapt_api::db::create_database_pool;
use adapt_api::{build_router, AdminGate, AppState, Notifier};
use clap::Parser;
use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let args = CliArgs::parse();
    args.apply_env_overrides();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = init_app_config()?;
    let pool = create_database_pool(&config.database_url).await?;

    if args.migrate_only {
        tracing::info!("migrations applied, exiting");
        return Ok(());
    }

    if config.admin_tokens.is_empty() {
        tracing::warn!("ADMIN_TOKENS is empty, admin routes will reject every request");
    }

    let state = AppState {
        pool,
        notifier: Notifier::from_config(&config.mail),
        gate: AdminGate::new(config.admin_tokens.iter().cloned()),
    };
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .wrap_err_with(|| format!("failed to bind {}", config.bind_addr))?;
    tracing::info!("listening on {}", config.bind_addr);
    axum::serve(listener, app).await?;

    Ok(())
}
