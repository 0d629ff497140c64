use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{get, post},
};

/// Public Router Module
///
/// Endpoints reachable without a credential. The collection read applies the
/// `status = active` filter; the single-item read does not.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        // GET /health
        // Liveness probe for load balancers.
        .route("/health", get(|| async { "ok" }))
        // POST /auth/register
        // Creates a seller or buyer account and returns a credential.
        .route("/auth/register", post(handlers::register_user))
        // POST /auth/login
        // Exchanges e-mail and password for a credential.
        .route("/auth/login", post(handlers::login))
        // GET /listings?search=&location=&min_price=&max_price=&country=
        // The public catalog: active listings only.
        .route("/listings", get(handlers::get_listings))
        // GET /listings/{id}
        // Detail view, whatever the listing's status.
        .route("/listings/{id}", get(handlers::get_listing))
}
