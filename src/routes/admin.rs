use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{get, post},
};

/// Admin Router Module
///
/// Moderation and oversight, nested under `/admin`. The session guard runs
/// first; each handler then asks the policy for the `Moderate` action.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        // GET /admin/stats
        .route("/stats", get(handlers::get_admin_stats))
        // GET /admin/listings
        // Every listing, flagged ones first: the moderation queue.
        .route("/listings", get(handlers::get_admin_listings))
        // POST /admin/listings/{id}/approve
        // Flagged -> active and unflagged.
        .route("/listings/{id}/approve", post(handlers::approve_listing))
        // POST /admin/listings/{id}/reject
        // Flagged -> rejected; the flag stays.
        .route("/listings/{id}/reject", post(handlers::reject_listing))
        // GET /admin/users
        .route("/users", get(handlers::get_admin_users))
        // GET /admin/payments
        // Read-only gateway records.
        .route("/payments", get(handlers::get_admin_payments))
}
