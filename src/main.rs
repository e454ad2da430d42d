use clap::{Parser, ValueEnum};
use marquee::{
    application::social::{
        dto::{LoadStatus, ThreadConfig},
        notices::NoticeBus,
        use_case::ThreadSession,
    },
    config::Config,
    domain::shared::identity::{CompositeKey, EntityId, EntityKind},
    infrastructure::http::client::HttpBackend,
};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ThreadKind {
    /// Comments under a community post
    PostComments,
    /// Replies under a review
    ReviewReplies,
}

/// Load a thread page by page and print its entries as JSON lines.
#[derive(Debug, Parser)]
#[command(name = "marquee", version)]
struct Args {
    #[arg(value_enum)]
    kind: ThreadKind,

    /// Id of the post or review owning the thread
    parent_id: String,

    /// Stop after this many pages
    #[arg(long, default_value_t = 3, env = "MARQUEE_MAX_PAGES")]
    max_pages: u32,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new("info,marquee=debug"))
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = Config::from_env()?;
    let backend = Arc::new(HttpBackend::from_config(&config)?);

    let parent_id = EntityId::parse(&args.parent_id)?;
    let thread = match args.kind {
        ThreadKind::PostComments => ThreadConfig::post_comments(
            CompositeKey::new(EntityKind::Post, parent_id),
            config.page_size,
        ),
        ThreadKind::ReviewReplies => ThreadConfig::review_replies(
            CompositeKey::new(EntityKind::Review, parent_id),
            config.page_size,
        ),
    };

    let notices = NoticeBus::new(config.notice_capacity);
    let mut notice_rx = notices.subscribe();
    tokio::spawn(async move {
        while let Ok(notice) = notice_rx.recv().await {
            tracing::warn!(?notice, "notice");
        }
    });

    let shutdown = CancellationToken::new();
    let session = ThreadSession::new(backend, thread, notices).with_parent_token(&shutdown);
    tokio::spawn(async move {
        shutdown_signal().await;
        shutdown.cancel();
    });

    for page in 1..=args.max_pages.max(1) {
        match session.load_page(page).await {
            LoadStatus::Loaded { has_more, added, .. } => {
                tracing::info!(page, added, has_more, "page loaded");
                if !has_more {
                    break;
                }
            }
            LoadStatus::Skipped => break,
            LoadStatus::Cancelled => {
                tracing::info!("interrupted, printing what was loaded");
                break;
            }
            LoadStatus::Failed(failure) => {
                anyhow::bail!("loading page {} failed: {}", page, failure);
            }
        }
    }

    for entry in session.entries() {
        println!("{}", serde_json::to_string(&entry)?);
    }
    tracing::info!(
        total = session.total(),
        loaded = session.entries().len(),
        "thread printed"
    );
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {}", err);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!("failed to install SIGTERM handler: {}", err);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Ctrl+C received, cancelling thread session");
        }
        _ = terminate => {
            tracing::info!("SIGTERM received, cancelling thread session");
        }
    }
}
