use chrono::Utc;
use estate_listings::{
    AppState,
    config::{AppConfig, Env},
    create_router, fixtures,
    models::{Role, User},
    repository::{InMemoryRepository, PostgresRepository, Repository, RepositoryState},
};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

const DEMO_SELLER_EMAIL: &str = "demo.seller@example.com";
const DEMO_SELLER_PASSWORD: &str = "demo-seller";

/// main
///
/// Entry point: configuration, logging, store selection, then the HTTP server.
#[tokio::main]
async fn main() {
    // 1. Configuration (fail-fast in production)
    dotenv::dotenv().ok();
    let config = AppConfig::load();

    // 2. Logging: RUST_LOG wins, otherwise crate debug and request info.
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "estate_listings=debug,tower_http=info".into());

    match config.env {
        Env::Local => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
        Env::Production => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
    }

    tracing::info!("Application starting in {:?} mode", config.env);

    // 3. Store selection: Postgres when configured, in-memory otherwise (local only).
    let repo: RepositoryState = match &config.db_url {
        Some(db_url) => {
            let pool = PgPoolOptions::new()
                .max_connections(5)
                .connect(db_url)
                .await
                .expect("FATAL: Failed to connect to Postgres. Check DATABASE_URL.");

            sqlx::migrate!("./migrations")
                .run(&pool)
                .await
                .expect("FATAL: Database migrations failed.");
            tracing::info!("Postgres connected and migrated");

            Arc::new(PostgresRepository::new(pool))
        }
        None => {
            tracing::warn!("DATABASE_URL not set; using the in-memory store (data is lost on exit)");
            let memory = InMemoryRepository::new();
            if config.seed_demo {
                seed_demo_catalog(&memory, config.password_hash_cost).await;
            }
            Arc::new(memory)
        }
    };

    // 4. State and router
    let bind_addr = config.bind_addr.clone();
    let app = create_router(AppState::new(repo, config));

    let listener = TcpListener::bind(&bind_addr)
        .await
        .expect("FATAL: Could not bind the HTTP listener. Check BIND_ADDR.");

    tracing::info!("Listening on {}", bind_addr);
    tracing::info!("API Documentation (Swagger UI) available at: http://{}/swagger-ui", bind_addr);

    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!(error = %e, "server terminated");
    }
}

/// seed_demo_catalog
///
/// Registers a demo seller and loads the ten international listings under it.
async fn seed_demo_catalog(repo: &InMemoryRepository, cost: u32) {
    let password_hash = match bcrypt::hash(DEMO_SELLER_PASSWORD, cost) {
        Ok(hash) => hash,
        Err(e) => {
            tracing::error!(error = %e, "demo seed skipped: hashing failed");
            return;
        }
    };

    let seller = User {
        id: Uuid::new_v4(),
        name: "Demo Seller".to_string(),
        email: DEMO_SELLER_EMAIL.to_string(),
        password_hash,
        role: Role::Seller,
        is_verified: true,
        contact: None,
        created_at: Utc::now(),
    };

    if let Err(e) = repo.create_user(&seller).await {
        tracing::error!(error = %e, "demo seed skipped: seller not created");
        return;
    }

    for listing in fixtures::international_listings(seller.id) {
        if let Err(e) = repo.insert_listing(&listing).await {
            tracing::error!(error = %e, title = %listing.title, "demo listing not inserted");
        }
    }
    tracing::info!(seller = DEMO_SELLER_EMAIL, "demo catalog seeded");
}
