use crate::{
    AppState,
    auth::Principal,
    catalog,
    error::{ApiError, ApiResult},
    extract::{ApiJson, ApiPath, ApiQuery},
    lifecycle,
    models::{
        AdminDashboardStats, AuthResponse, CreateListingRequest, Listing, ListingFilter,
        LoginRequest, Payment, RegisterRequest, Role, UpdateListingRequest, User, UserProfile,
    },
    policy::{self, Action, DenyReason},
};
use axum::{Json, extract::State, http::StatusCode};
use chrono::Utc;
use uuid::Uuid;

const MIN_PASSWORD_LEN: usize = 6;

// --- Account Handlers ---

/// register_user
///
/// [Public Route] Creates a seller or buyer account and signs the caller in.
/// Admin accounts are provisioned in the store, never through this endpoint.
#[utoipa::path(
    post,
    path = "/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Registered", body = AuthResponse),
        (status = 400, description = "Invalid input"),
        (status = 409, description = "Email already registered")
    )
)]
pub async fn register_user(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<AuthResponse>)> {
    let name = payload.name.trim().to_string();
    let email = payload.email.trim().to_string();
    if name.is_empty() {
        return Err(ApiError::Validation("name is required".to_string()));
    }
    if !email.contains('@') {
        return Err(ApiError::Validation("a valid email is required".to_string()));
    }
    if payload.password.len() < MIN_PASSWORD_LEN {
        return Err(ApiError::Validation(format!(
            "password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    let role = payload.role.unwrap_or_default();
    if role == Role::Admin {
        return Err(ApiError::Validation("role must be seller or buyer".to_string()));
    }

    let password_hash = hash_password(payload.password, state.config.password_hash_cost).await?;
    let user = User {
        id: Uuid::new_v4(),
        name,
        email,
        password_hash,
        role,
        is_verified: false,
        contact: payload.contact.filter(|contact| !contact.trim().is_empty()),
        created_at: Utc::now(),
    };

    let created = state.repo.create_user(&user).await?;
    tracing::info!(user_id = %created.id, role = ?created.role, "user registered");

    let token = state.tokens.issue(&Principal::new(created.id, created.role))?;
    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            token,
            user: UserProfile::from(&created),
        }),
    ))
}

/// login
///
/// [Public Route] Exchanges e-mail and password for a bearer credential.
/// Unknown e-mail and wrong password produce the same 401.
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Signed in", body = AuthResponse),
        (status = 401, description = "Invalid email or password")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<LoginRequest>,
) -> ApiResult<Json<AuthResponse>> {
    let user = state
        .repo
        .get_user_by_email(payload.email.trim())
        .await?
        .ok_or(ApiError::BadLogin)?;

    if !verify_password(payload.password, user.password_hash.clone()).await? {
        tracing::debug!(user_id = %user.id, "password mismatch");
        return Err(ApiError::BadLogin);
    }

    let token = state.tokens.issue(&Principal::new(user.id, user.role))?;
    Ok(Json(AuthResponse {
        token,
        user: UserProfile::from(&user),
    }))
}

/// get_me
///
/// [Authenticated Route] Profile of the signed-in user.
#[utoipa::path(
    get,
    path = "/me",
    responses((status = 200, description = "Profile", body = UserProfile))
)]
pub async fn get_me(principal: Principal, State(state): State<AppState>) -> ApiResult<Json<UserProfile>> {
    let user = state
        .repo
        .get_user(principal.subject_id)
        .await?
        .ok_or(ApiError::NotFound)?;
    Ok(Json(UserProfile::from(&user)))
}

/// get_my_listings
///
/// [Authenticated Route] Every listing the caller owns, whatever its status.
#[utoipa::path(
    get,
    path = "/me/listings",
    responses((status = 200, description = "My listings", body = [Listing]))
)]
pub async fn get_my_listings(
    principal: Principal,
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<Listing>>> {
    let listings = state.repo.get_listings_by_seller(principal.subject_id).await?;
    Ok(Json(listings))
}

// --- Catalog Handlers ---

/// get_listings
///
/// [Public Route] The public catalog: active listings matching every supplied filter.
#[utoipa::path(
    get,
    path = "/listings",
    params(ListingFilter),
    responses((status = 200, description = "Matching active listings", body = [Listing]))
)]
pub async fn get_listings(
    State(state): State<AppState>,
    ApiQuery(filter): ApiQuery<ListingFilter>,
) -> ApiResult<Json<Vec<Listing>>> {
    let active = state.repo.get_active_listings().await?;
    Ok(Json(catalog::search(active, &filter)))
}

/// get_listing
///
/// [Public Route] A single listing by id. Not filtered by status, so pending,
/// sold and rejected listings are reachable by direct link. An id that is not
/// a UUID is simply not found.
#[utoipa::path(
    get,
    path = "/listings/{id}",
    params(("id" = Uuid, Path, description = "Listing ID")),
    responses(
        (status = 200, description = "Found", body = Listing),
        (status = 404, description = "Not Found")
    )
)]
pub async fn get_listing(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Json<Listing>> {
    let listing = state.repo.get_listing(id).await?.ok_or(ApiError::NotFound)?;
    Ok(Json(listing))
}

// --- Listing Mutations ---

/// create_listing
///
/// [Authenticated Route] Sellers publish a new listing. The role check runs
/// before the payload is looked at, so a buyer is refused whatever the body,
/// even one that does not decode.
#[utoipa::path(
    post,
    path = "/listings",
    request_body = CreateListingRequest,
    responses(
        (status = 201, description = "Created", body = Listing),
        (status = 400, description = "Missing required fields"),
        (status = 403, description = "Not a seller")
    )
)]
pub async fn create_listing(
    principal: Principal,
    State(state): State<AppState>,
    payload: Result<ApiJson<CreateListingRequest>, ApiError>,
) -> ApiResult<(StatusCode, Json<Listing>)> {
    policy::authorize(&principal, Action::CreateListing).into_result()?;
    let ApiJson(payload) = payload?;

    // The owner must still exist as a seller account.
    let seller = state.repo.get_user(principal.subject_id).await?;
    if !seller.is_some_and(|user| user.role == Role::Seller) {
        return Err(ApiError::Forbidden(DenyReason::NotASeller));
    }

    let listing = lifecycle::new_listing(principal.subject_id, payload, Utc::now())?;
    let created = state.repo.insert_listing(&listing).await?;
    tracing::info!(listing_id = %created.id, seller_id = %created.seller_id, "listing created");
    Ok((StatusCode::CREATED, Json(created)))
}

/// update_listing
///
/// [Authenticated Route] Owner or admin edit. Owners change content and move
/// between active/pending/sold; `flagged` and rejection are admin-only. Only the
/// supplied fields are written, so a concurrent moderation decision survives.
#[utoipa::path(
    put,
    path = "/listings/{id}",
    params(("id" = Uuid, Path, description = "Listing ID")),
    request_body = UpdateListingRequest,
    responses(
        (status = 200, description = "Updated", body = Listing),
        (status = 403, description = "Not owner or admin"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn update_listing(
    principal: Principal,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(payload): ApiJson<UpdateListingRequest>,
) -> ApiResult<Json<Listing>> {
    let current = state.repo.get_listing(id).await?.ok_or(ApiError::NotFound)?;
    policy::authorize(
        &principal,
        Action::UpdateListing {
            listing: &current,
            changes: &payload,
        },
    )
    .into_result()?;

    let (edit, moderation) = lifecycle::split_update(payload);
    let patch = lifecycle::prepare_patch(edit, moderation, principal.is_admin(), Utc::now())?;

    let saved = state
        .repo
        .patch_listing(id, &patch)
        .await?
        .ok_or(ApiError::NotFound)?;
    tracing::info!(listing_id = %saved.id, actor = %principal.subject_id, "listing updated");
    Ok(Json(saved))
}

/// delete_listing
///
/// [Authenticated Route] Owner or admin removes a listing for good.
#[utoipa::path(
    delete,
    path = "/listings/{id}",
    params(("id" = Uuid, Path, description = "Listing ID")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 403, description = "Not owner or admin"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn delete_listing(
    principal: Principal,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<StatusCode> {
    let current = state.repo.get_listing(id).await?.ok_or(ApiError::NotFound)?;
    policy::authorize(&principal, Action::DeleteListing(&current)).into_result()?;

    // A concurrent delete may have won the race.
    if !state.repo.delete_listing(id).await? {
        return Err(ApiError::NotFound);
    }
    tracing::info!(listing_id = %id, actor = %principal.subject_id, "listing deleted");
    Ok(StatusCode::NO_CONTENT)
}

// --- Admin Handlers ---

/// get_admin_listings
///
/// [Admin Route] Every listing, flagged ones first.
#[utoipa::path(
    get,
    path = "/admin/listings",
    responses((status = 200, description = "All listings", body = [Listing]))
)]
pub async fn get_admin_listings(
    principal: Principal,
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<Listing>>> {
    policy::authorize(&principal, Action::Moderate).into_result()?;
    Ok(Json(state.repo.get_all_listings().await?))
}

/// approve_listing
///
/// [Admin Route] Clears a flag and republishes the listing.
#[utoipa::path(
    post,
    path = "/admin/listings/{id}/approve",
    params(("id" = Uuid, Path, description = "Listing ID")),
    responses(
        (status = 200, description = "Approved", body = Listing),
        (status = 400, description = "Listing is not flagged"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn approve_listing(
    principal: Principal,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Json<Listing>> {
    policy::authorize(&principal, Action::Moderate).into_result()?;
    let current = state.repo.get_listing(id).await?.ok_or(ApiError::NotFound)?;
    let patch = lifecycle::approve(&current, Utc::now())?;
    let saved = state
        .repo
        .patch_listing(id, &patch)
        .await?
        .ok_or(ApiError::NotFound)?;
    tracing::info!(listing_id = %id, admin = %principal.subject_id, "listing approved");
    Ok(Json(saved))
}

/// reject_listing
///
/// [Admin Route] Marks a flagged listing rejected. The flag stays set.
#[utoipa::path(
    post,
    path = "/admin/listings/{id}/reject",
    params(("id" = Uuid, Path, description = "Listing ID")),
    responses(
        (status = 200, description = "Rejected", body = Listing),
        (status = 400, description = "Listing is not flagged or already rejected"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn reject_listing(
    principal: Principal,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Json<Listing>> {
    policy::authorize(&principal, Action::Moderate).into_result()?;
    let current = state.repo.get_listing(id).await?.ok_or(ApiError::NotFound)?;
    let patch = lifecycle::reject(&current, Utc::now())?;
    let saved = state
        .repo
        .patch_listing(id, &patch)
        .await?
        .ok_or(ApiError::NotFound)?;
    tracing::info!(listing_id = %id, admin = %principal.subject_id, "listing rejected");
    Ok(Json(saved))
}

#[utoipa::path(
    get,
    path = "/admin/users",
    responses((status = 200, description = "All users", body = [UserProfile]))
)]
pub async fn get_admin_users(
    principal: Principal,
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<UserProfile>>> {
    policy::authorize(&principal, Action::Moderate).into_result()?;
    let users = state.repo.get_users().await?;
    Ok(Json(users.iter().map(UserProfile::from).collect()))
}

#[utoipa::path(
    get,
    path = "/admin/payments",
    responses((status = 200, description = "All payments", body = [Payment]))
)]
pub async fn get_admin_payments(
    principal: Principal,
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<Payment>>> {
    policy::authorize(&principal, Action::Moderate).into_result()?;
    Ok(Json(state.repo.get_payments().await?))
}

#[utoipa::path(
    get,
    path = "/admin/stats",
    responses((status = 200, description = "Stats", body = AdminDashboardStats))
)]
pub async fn get_admin_stats(
    principal: Principal,
    State(state): State<AppState>,
) -> ApiResult<Json<AdminDashboardStats>> {
    policy::authorize(&principal, Action::Moderate).into_result()?;
    Ok(Json(state.repo.get_stats().await?))
}

// --- Password Hashing ---

// bcrypt is CPU-bound; keep it off the async workers.
async fn hash_password(password: String, cost: u32) -> ApiResult<String> {
    tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
        .await
        .map_err(|e| ApiError::Store(format!("hashing task failed: {e}")))?
        .map_err(|e| ApiError::Store(format!("password hashing failed: {e}")))
}

async fn verify_password(password: String, hash: String) -> ApiResult<bool> {
    tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
        .await
        .map_err(|e| ApiError::Store(format!("hashing task failed: {e}")))?
        .map_err(|e| ApiError::Store(format!("password verification failed: {e}")))
}
