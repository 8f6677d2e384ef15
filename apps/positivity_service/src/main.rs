use anyhow::Context;
use dotenvy::dotenv;
use positivity_service::{app_module::AppState, app_router::application, config::AppConfig};
use tracing_subscriber::{fmt::format::FmtSpan, EnvFilter, FmtSubscriber};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let config = AppConfig::from_env().context("failed to load configuration")?;

    let subscriber_builder = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_level(true)
        .with_span_events(FmtSpan::CLOSE);

    if config.is_dev() {
        tracing::subscriber::set_global_default(
            subscriber_builder
                .compact()
                .pretty()
                .with_ansi(true)
                .finish(),
        )
        .context("setting dev subscriber failed")?;
    } else {
        tracing::subscriber::set_global_default(
            subscriber_builder.json().with_ansi(false).finish(),
        )
        .context("setting prod subscriber failed")?;
    }

    tracing::info!(
        environment = %config.environment,
        model = %config.llm.model,
        tone_analysis = config.tone_analysis,
        debug_endpoints = config.debug_endpoints,
        "Configuration loaded"
    );

    let bind_address = config.bind_address;
    let app = application(AppState::new(config));

    let listener = tokio::net::TcpListener::bind(bind_address)
        .await
        .with_context(|| format!("unable to bind {}", bind_address))?;

    tracing::info!("Server started, listening on {}", bind_address);
    axum::serve(listener, app)
        .await
        .context("server terminated unexpectedly")?;

    Ok(())
}
