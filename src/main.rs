use anyhow::Result;
use pressroom_core::application::{
    ports::{
        page_cache::PageCache, queue::PublishQueue, revalidate::CacheInvalidator,
        security::TokenManager, time::Clock,
    },
    services::ApplicationServices,
    worker::PublishWorker,
};
use pressroom_core::config::AppConfig;
use pressroom_core::domain::{
    article::{ArticleReadRepository, ArticleWriteRepository},
    audit::AuditLogRepository,
};
use pressroom_core::infrastructure::{
    cache::{InMemoryPageCache, RedisPageCache},
    database,
    queue::{DisabledPublishQueue, RedisPublishQueue},
    repositories::{
        PostgresArticleReadRepository, PostgresArticleWriteRepository, PostgresAuditLogRepository,
    },
    revalidate::HttpCacheInvalidator,
    security::StaticTokenManager,
    time::SystemClock,
};
use pressroom_core::presentation::http::{routes::build_router, state::HttpState};
use std::{net::SocketAddr, sync::Arc};
use tokio::signal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    if let Err(err) = bootstrap().await {
        tracing::error!(error = %err, "fatal error");
        eprintln!("fatal error: {err}");
        std::process::exit(1);
    }
}

async fn bootstrap() -> Result<()> {
    init_tracing();

    let config = AppConfig::from_env()?;

    let pool = database::init_pool(config.database_url()).await?;
    database::run_migrations(&pool).await?;

    let article_read_repo: Arc<dyn ArticleReadRepository> =
        Arc::new(PostgresArticleReadRepository::new(pool.clone()));
    let article_write_repo: Arc<dyn ArticleWriteRepository> =
        Arc::new(PostgresArticleWriteRepository::new(pool.clone()));
    let audit_log_repo: Arc<dyn AuditLogRepository> =
        Arc::new(PostgresAuditLogRepository::new(pool.clone()));

    let queue: Arc<dyn PublishQueue> = match config.redis_url() {
        Some(url) => Arc::new(RedisPublishQueue::from_url(url)?),
        None => {
            tracing::warn!("REDIS_URL not set, publishing falls back to the synchronous path");
            Arc::new(DisabledPublishQueue)
        }
    };

    let page_cache: Arc<dyn PageCache> = match config.redis_url() {
        Some(url) => Arc::new(RedisPageCache::from_url(url)?),
        None => Arc::new(InMemoryPageCache::new()),
    };

    let invalidator: Arc<dyn CacheInvalidator> = Arc::new(HttpCacheInvalidator::new(
        config.revalidate_endpoint(),
        config.revalidation_secret().to_string(),
        config.revalidate_timeout(),
    )?);

    let token_manager: Arc<dyn TokenManager> =
        Arc::new(StaticTokenManager::from_entries(config.api_tokens())?);
    let clock: Arc<dyn Clock> = Arc::new(SystemClock::default());

    let services = Arc::new(ApplicationServices::new(
        article_read_repo,
        article_write_repo,
        audit_log_repo,
        Arc::clone(&queue),
        invalidator,
        page_cache,
        token_manager,
        clock,
        config.revalidation_secret(),
    ));

    // Worker loops only make sense against a real broker; without one
    // every publish already completes inline.
    let worker = config.redis_url().map(|_| {
        PublishWorker::new(Arc::clone(&queue), Arc::clone(&services.article_commands))
            .spawn(config.worker_concurrency())
    });

    let state = HttpState {
        services: Arc::clone(&services),
    };
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(config.listen_addr()).await?;
    let address: SocketAddr = listener.local_addr()?;
    tracing::info!("listening on {address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(worker) = worker {
        worker.shutdown().await;
    }
    if let Err(err) = queue.close().await {
        tracing::warn!(error = %err, "queue close failed");
    }

    Ok(())
}

fn init_tracing() {
    let env_filter = std::env::var("RUST_LOG")
        .ok()
        .unwrap_or_else(|| "info,tower_http=info,sqlx=warn".to_string());

    let subscriber = tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(env_filter))
        .with(tracing_subscriber::fmt::layer());

    if subscriber.try_init().is_err() {
        tracing::warn!("tracing subscriber already initialised");
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install CTRL+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install terminate handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
    tracing::info!("shutdown signal received");
}
