use axum::{
    Router,
    extract::FromRef,
    http::HeaderName,
    middleware,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::{Level, Span};

// --- Module Structure ---

// Access-control and lifecycle core.
pub mod auth;
pub mod catalog;
pub mod lifecycle;
pub mod policy;

// Persistence, payloads and the HTTP surface.
pub mod config;
pub mod error;
pub mod extract;
pub mod fixtures;
pub mod handlers;
pub mod models;
pub mod repository;

// Routers grouped by access level (public, authenticated, admin).
pub mod routes;
use routes::{admin, authenticated, public};

// --- Public Re-exports ---

pub use auth::{Principal, TokenCodec};
pub use config::AppConfig;
pub use error::ApiError;
pub use repository::{InMemoryRepository, PostgresRepository, RepositoryState};

/// ApiDoc
///
/// OpenAPI document served at `/api-docs/openapi.json`.
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::register_user, handlers::login, handlers::get_me, handlers::get_my_listings,
        handlers::get_listings, handlers::get_listing, handlers::create_listing,
        handlers::update_listing, handlers::delete_listing, handlers::get_admin_listings,
        handlers::approve_listing, handlers::reject_listing, handlers::get_admin_users,
        handlers::get_admin_payments, handlers::get_admin_stats
    ),
    components(
        schemas(
            models::Listing, models::ListingStatus, models::Role, models::Payment,
            models::PaymentStatus, models::CreateListingRequest, models::UpdateListingRequest,
            models::RegisterRequest, models::LoginRequest, models::AuthResponse,
            models::UserProfile, models::AdminDashboardStats,
        )
    ),
    tags(
        (name = "estate-listings", description = "Property listing marketplace API")
    )
)]
struct ApiDoc;

/// AppState
///
/// Everything a handler may need, shared by cheap clones. Nothing in it is
/// mutated after startup except through the repository.
#[derive(Clone)]
pub struct AppState {
    pub repo: RepositoryState,
    pub config: AppConfig,
    pub tokens: TokenCodec,
}

impl AppState {
    /// Builds the state, deriving the token codec from the config's secret and TTL.
    pub fn new(repo: RepositoryState, config: AppConfig) -> Self {
        let tokens = TokenCodec::from_config(&config);
        Self {
            repo,
            config,
            tokens,
        }
    }
}

// --- Axum FromRef Extractor Implementations ---

impl FromRef<AppState> for RepositoryState {
    fn from_ref(app_state: &AppState) -> RepositoryState {
        app_state.repo.clone()
    }
}

impl FromRef<AppState> for AppConfig {
    fn from_ref(app_state: &AppState) -> AppConfig {
        app_state.config.clone()
    }
}

impl FromRef<AppState> for TokenCodec {
    fn from_ref(app_state: &AppState) -> TokenCodec {
        app_state.tokens.clone()
    }
}

/// create_router
///
/// Public routes go straight to their handlers; authenticated and admin routes
/// first pass the session guard, which attaches the `Principal`.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_origin(Any)
        .allow_headers(Any);

    let x_request_id = HeaderName::from_static("x-request-id");

    let base_router = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(public::public_routes())
        .merge(
            authenticated::authenticated_routes().route_layer(middleware::from_fn_with_state(
                state.clone(),
                auth::require_session,
            )),
        )
        .nest(
            "/admin",
            admin::admin_routes().route_layer(middleware::from_fn_with_state(
                state.clone(),
                auth::require_session,
            )),
        )
        .with_state(state);

    base_router
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(x_request_id.clone(), MakeRequestUuid))
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(trace_span_logger)
                        .on_response(
                            DefaultOnResponse::new()
                                .level(Level::INFO)
                                .latency_unit(tower_http::LatencyUnit::Millis),
                        ),
                )
                .layer(PropagateRequestIdLayer::new(x_request_id)),
        )
        .layer(cors)
}

/// trace_span_logger
///
/// Request span carrying method, URI and the `x-request-id`, so every log
/// line of one request can be correlated.
fn trace_span_logger(request: &axum::http::Request<axum::body::Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown");

    tracing::info_span!(
        "http_request",
        method = ?request.method(),
        uri = ?request.uri(),
        req_id = %request_id,
    )
}
