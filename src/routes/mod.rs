/// Router Module Index
///
/// Routes are split by who may call them, and the session requirement is
/// applied per router in `create_router` rather than per handler.

/// Anonymous routes: health, sign-in, and catalog reads.
pub mod public;

/// Routes behind the session guard.
pub mod authenticated;

/// Moderation routes. Behind the session guard; every handler also requires the admin role.
pub mod admin;
