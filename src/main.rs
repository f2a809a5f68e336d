use chatterbox::{config::Config, store::Backend, AppState, Store};
use sqlx::sqlite::SqlitePoolOptions;
use tower_sessions::{cookie::SameSite, Expiry, MemoryStore, SessionManagerLayer};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("chatterbox=info,tower_sessions=warn")),
        )
        .init();

    let config = Config::from_env()?;

    let backend = match &config.database_url {
        Some(url) => {
            let db_pool = SqlitePoolOptions::new()
                .max_connections(16)
                .connect(url)
                .await?;
            info!(url = %url, "using sqlite store");
            Backend::sqlite(db_pool).await?
        }
        None => {
            info!("DATABASE_URL unset, using in-memory store");
            Backend::memory()
        }
    };

    let session_layer = SessionManagerLayer::new(MemoryStore::default())
        .with_secure(false)
        .with_same_site(SameSite::Lax)
        .with_expiry(Expiry::OnInactivity(config.session_inactivity));

    let app_state = AppState {
        store: Store::new(backend, config.event_capacity),
    };

    let app = chatterbox::router()
        .with_state(app_state)
        .layer(session_layer);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    info!(addr = %config.bind_addr, "listening");
    axum::serve(listener, app).await?;

    Ok(())
}
