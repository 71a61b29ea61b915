use jobboard::api;
use jobboard::config;
use jobboard::db;
use jobboard::i18n::Catalog;
use jobboard::queue::{QueueNamespace, RedisQueueBackend};
use jobboard::settings::SiteSettingsRepo;

use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cfg = config::Config::from_env()?;
    let namespace = QueueNamespace::from_config(&cfg);

    tracing::info!(
        listen_addr = %cfg.listen_addr,
        queue_namespace = %namespace.prefix(),
        default_site = cfg.default_site.as_deref().unwrap_or("none"),
        disable_scheduler = cfg.disable_scheduler,
        migrate_on_startup = cfg.migrate_on_startup,
        "jobboard starting"
    );

    let pool = db::make_pool(&cfg.database_url).await?;
    if cfg.migrate_on_startup {
        db::run_migrations(&pool).await?;
    }

    let catalog = match &cfg.translations_dir {
        Some(dir) => Catalog::load_dir(dir)?,
        None => Catalog::new(),
    };

    let queues = RedisQueueBackend::open(&cfg.redis_url)?;

    let state = api::ApiState {
        queues: Arc::new(queues),
        settings: Arc::new(SiteSettingsRepo::new(pool)),
        catalog: Arc::new(catalog),
        namespace,
        default_site: cfg.default_site.clone(),
        disable_scheduler: cfg.disable_scheduler,
    };
    let app = api::router(state);

    let listener = tokio::net::TcpListener::bind(&cfg.listen_addr).await?;
    tracing::info!("jobboard listening on http://{}", cfg.listen_addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
