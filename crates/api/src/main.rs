use anyhow::Context;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    edudesk_observability::init();

    let config = edudesk_api::config::AppConfig::from_env().context("invalid configuration")?;
    let app = edudesk_api::app::build_app(&config)
        .await
        .context("failed to build application")?;

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
