use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{get, post, put},
};

/// Authenticated Router Module
///
/// Routes for any signed-in principal. The session guard is layered over this
/// router; ownership and role checks happen in the handlers via the policy.
pub fn authenticated_routes() -> Router<AppState> {
    Router::<AppState>::new()
        // GET /me
        .route("/me", get(handlers::get_me))
        // GET /me/listings
        // The caller's own listings in every status (seller dashboard).
        .route("/me/listings", get(handlers::get_my_listings))
        // POST /listings
        // Sellers only.
        .route("/listings", post(handlers::create_listing))
        // PUT/DELETE /listings/{id}
        // Owner or admin.
        .route(
            "/listings/{id}",
            put(handlers::update_listing).delete(handlers::delete_listing),
        )
}
