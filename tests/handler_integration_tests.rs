use axum::{
    Json,
    body::Body,
    extract::State,
    http::{Method, Request, StatusCode, header},
    response::IntoResponse,
};
use chrono::Utc;
use estate_listings::{
    ApiError, AppState,
    auth::Principal,
    config::AppConfig,
    create_router,
    extract::{ApiJson, ApiPath, ApiQuery},
    fixtures, handlers,
    models::{
        CreateListingRequest, Listing, ListingFilter, ListingStatus, LoginRequest, Payment,
        PaymentStatus, RegisterRequest, Role, UpdateListingRequest, User,
    },
    policy::DenyReason,
    repository::{InMemoryRepository, Repository},
};
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceExt;
use uuid::Uuid;

// --- Test Harness ---

struct Harness {
    state: AppState,
    repo: Arc<InMemoryRepository>,
    seller: Principal,
    other_seller: Principal,
    buyer: Principal,
    admin: Principal,
}

fn account(role: Role, email: &str) -> User {
    User {
        id: Uuid::new_v4(),
        name: format!("{role:?} account"),
        email: email.to_string(),
        password_hash: "not-a-real-hash".to_string(),
        role,
        is_verified: true,
        contact: None,
        created_at: Utc::now(),
    }
}

async fn harness() -> Harness {
    let repo = Arc::new(InMemoryRepository::new());
    let config = AppConfig {
        password_hash_cost: 4,
        ..AppConfig::default()
    };
    let state = AppState::new(repo.clone(), config);

    let mut principals = Vec::new();
    for (role, email) in [
        (Role::Seller, "seller@example.com"),
        (Role::Seller, "other.seller@example.com"),
        (Role::Buyer, "buyer@example.com"),
        (Role::Admin, "admin@example.com"),
    ] {
        let user = repo.create_user(&account(role, email)).await.unwrap();
        principals.push(Principal::new(user.id, user.role));
    }

    Harness {
        state,
        repo,
        seller: principals[0],
        other_seller: principals[1],
        buyer: principals[2],
        admin: principals[3],
    }
}

fn condo_request() -> CreateListingRequest {
    CreateListingRequest {
        title: Some("Downtown Condo".to_string()),
        description: Some("Modern condo with skyline views.".to_string()),
        price: Some(1_200_000),
        location: Some("New York, USA".to_string()),
        images: vec!["https://images.example.com/condo.jpg".to_string()],
    }
}

async fn create_as(h: &Harness, principal: Principal) -> Listing {
    let (status, Json(listing)) = handlers::create_listing(
        principal,
        State(h.state.clone()),
        Ok(ApiJson(condo_request())),
    )
    .await
    .unwrap();
    assert_eq!(status, StatusCode::CREATED);
    listing
}

async fn update_as(
    h: &Harness,
    principal: Principal,
    id: Uuid,
    changes: UpdateListingRequest,
) -> Result<Listing, ApiError> {
    handlers::update_listing(principal, State(h.state.clone()), ApiPath(id), ApiJson(changes))
        .await
        .map(|Json(listing)| listing)
}

async fn public_catalog(h: &Harness) -> Vec<Listing> {
    let Json(listings) = handlers::get_listings(
        State(h.state.clone()),
        ApiQuery(ListingFilter::default()),
    )
    .await
    .unwrap();
    listings
}

// --- Creation ---

#[tokio::test]
async fn seller_creates_active_unflagged_listing() {
    let h = harness().await;
    let listing = create_as(&h, h.seller).await;

    assert_eq!(listing.seller_id, h.seller.subject_id);
    assert_eq!(listing.status, ListingStatus::Active);
    assert!(!listing.flagged);
    assert_eq!(listing.created_at, listing.updated_at);
    assert_eq!(h.repo.get_listing(listing.id).await.unwrap(), Some(listing));
}

#[tokio::test]
async fn buyer_cannot_create_even_with_valid_payload() {
    let h = harness().await;
    let result =
        handlers::create_listing(h.buyer, State(h.state.clone()), Ok(ApiJson(condo_request()))).await;

    assert!(matches!(
        result,
        Err(ApiError::Forbidden(DenyReason::NotASeller))
    ));
    assert!(h.repo.get_all_listings().await.unwrap().is_empty());
}

#[tokio::test]
async fn admin_cannot_create_listing() {
    let h = harness().await;
    let result =
        handlers::create_listing(h.admin, State(h.state.clone()), Ok(ApiJson(condo_request()))).await;
    assert!(matches!(result, Err(ApiError::Forbidden(_))));
}

#[tokio::test]
async fn seller_token_for_deleted_account_cannot_create() {
    let h = harness().await;
    let ghost = Principal::new(Uuid::new_v4(), Role::Seller);
    let result = handlers::create_listing(ghost, State(h.state.clone()), Ok(ApiJson(condo_request()))).await;
    assert!(matches!(result, Err(ApiError::Forbidden(_))));
}

#[tokio::test]
async fn missing_fields_are_validation_failures() {
    let h = harness().await;
    let payloads = [
        CreateListingRequest {
            title: None,
            ..condo_request()
        },
        CreateListingRequest {
            description: Some("   ".to_string()),
            ..condo_request()
        },
        CreateListingRequest {
            price: None,
            ..condo_request()
        },
        CreateListingRequest {
            location: Some(String::new()),
            ..condo_request()
        },
        CreateListingRequest {
            price: Some(-1),
            ..condo_request()
        },
    ];

    for payload in payloads {
        let result = handlers::create_listing(h.seller, State(h.state.clone()), Ok(ApiJson(payload))).await;
        assert!(matches!(result, Err(ApiError::Validation(_))));
    }
}

// --- Visibility ---

#[tokio::test]
async fn pending_listing_is_reachable_by_id_but_not_in_catalog() {
    let h = harness().await;
    let listing = create_as(&h, h.seller).await;

    let pending = update_as(
        &h,
        h.seller,
        listing.id,
        UpdateListingRequest {
            status: Some(ListingStatus::Pending),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(pending.status, ListingStatus::Pending);

    assert!(public_catalog(&h).await.is_empty());

    let Json(detail) = handlers::get_listing(State(h.state.clone()), ApiPath(listing.id))
        .await
        .unwrap();
    assert_eq!(detail.status, ListingStatus::Pending);
}

#[tokio::test]
async fn unknown_listing_is_not_found() {
    let h = harness().await;
    let result = handlers::get_listing(State(h.state.clone()), ApiPath(Uuid::new_v4())).await;
    assert!(matches!(result, Err(ApiError::NotFound)));
}

#[tokio::test]
async fn my_listings_include_every_status() {
    let h = harness().await;
    let first = create_as(&h, h.seller).await;
    let _second = create_as(&h, h.seller).await;
    let _theirs = create_as(&h, h.other_seller).await;
    update_as(
        &h,
        h.seller,
        first.id,
        UpdateListingRequest {
            status: Some(ListingStatus::Sold),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    let Json(mine) = handlers::get_my_listings(h.seller, State(h.state.clone()))
        .await
        .unwrap();
    assert_eq!(mine.len(), 2);
    assert!(mine.iter().all(|l| l.seller_id == h.seller.subject_id));
    assert!(mine.iter().any(|l| l.status == ListingStatus::Sold));
}

// --- Updates ---

#[tokio::test]
async fn owner_edit_changes_only_supplied_fields() {
    let h = harness().await;
    let listing = create_as(&h, h.seller).await;

    let updated = update_as(
        &h,
        h.seller,
        listing.id,
        UpdateListingRequest {
            price: Some(1_100_000),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    assert_eq!(updated.price, 1_100_000);
    assert_eq!(updated.title, listing.title);
    assert_eq!(updated.status, listing.status);
    assert_eq!(updated.created_at, listing.created_at);
    assert!(updated.updated_at >= listing.updated_at);
}

#[tokio::test]
async fn non_owner_seller_cannot_update() {
    let h = harness().await;
    let listing = create_as(&h, h.seller).await;

    let result = update_as(
        &h,
        h.other_seller,
        listing.id,
        UpdateListingRequest {
            price: Some(1),
            ..Default::default()
        },
    )
    .await;
    assert!(matches!(
        result,
        Err(ApiError::Forbidden(DenyReason::NotOwnerOrAdmin))
    ));
    assert_eq!(
        h.repo.get_listing(listing.id).await.unwrap().unwrap().price,
        1_200_000
    );
}

#[tokio::test]
async fn update_of_missing_listing_is_not_found_before_forbidden() {
    let h = harness().await;
    let result = update_as(&h, h.buyer, Uuid::new_v4(), UpdateListingRequest::default()).await;
    assert!(matches!(result, Err(ApiError::NotFound)));
}

#[tokio::test]
async fn admin_may_edit_any_listing_and_set_flag() {
    let h = harness().await;
    let listing = create_as(&h, h.seller).await;

    let flagged = update_as(
        &h,
        h.admin,
        listing.id,
        UpdateListingRequest {
            flagged: Some(true),
            title: Some("Downtown Condo (under review)".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    assert!(flagged.flagged);
    assert_eq!(flagged.seller_id, h.seller.subject_id);
    assert_eq!(flagged.title, "Downtown Condo (under review)");
}

#[tokio::test]
async fn owner_cannot_clear_flag_set_by_admin() {
    let h = harness().await;
    let listing = create_as(&h, h.seller).await;
    update_as(
        &h,
        h.admin,
        listing.id,
        UpdateListingRequest {
            flagged: Some(true),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    let result = update_as(
        &h,
        h.seller,
        listing.id,
        UpdateListingRequest {
            flagged: Some(false),
            ..Default::default()
        },
    )
    .await;
    assert!(matches!(
        result,
        Err(ApiError::Forbidden(DenyReason::ModerationRequiresAdmin))
    ));
    assert!(h.repo.get_listing(listing.id).await.unwrap().unwrap().flagged);
}

// --- Deletion ---

#[tokio::test]
async fn owner_deletes_then_second_delete_is_not_found() {
    let h = harness().await;
    let listing = create_as(&h, h.seller).await;

    let status = handlers::delete_listing(h.seller, State(h.state.clone()), ApiPath(listing.id))
        .await
        .unwrap();
    assert_eq!(status, StatusCode::NO_CONTENT);

    let again = handlers::delete_listing(h.seller, State(h.state.clone()), ApiPath(listing.id)).await;
    assert!(matches!(again, Err(ApiError::NotFound)));

    let detail = handlers::get_listing(State(h.state.clone()), ApiPath(listing.id)).await;
    assert!(matches!(detail, Err(ApiError::NotFound)));
}

#[tokio::test]
async fn buyer_cannot_delete_but_admin_can() {
    let h = harness().await;
    let listing = create_as(&h, h.seller).await;

    let denied = handlers::delete_listing(h.buyer, State(h.state.clone()), ApiPath(listing.id)).await;
    assert!(matches!(denied, Err(ApiError::Forbidden(_))));

    handlers::delete_listing(h.admin, State(h.state.clone()), ApiPath(listing.id))
        .await
        .unwrap();
    assert!(h.repo.get_listing(listing.id).await.unwrap().is_none());
}

// --- Moderation ---

async fn flag(h: &Harness, id: Uuid) {
    update_as(
        h,
        h.admin,
        id,
        UpdateListingRequest {
            flagged: Some(true),
            ..Default::default()
        },
    )
    .await
    .unwrap();
}

#[tokio::test]
async fn approve_republishes_flagged_listing() {
    let h = harness().await;
    let listing = create_as(&h, h.seller).await;
    update_as(
        &h,
        h.seller,
        listing.id,
        UpdateListingRequest {
            status: Some(ListingStatus::Pending),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    flag(&h, listing.id).await;

    let Json(approved) =
        handlers::approve_listing(h.admin, State(h.state.clone()), ApiPath(listing.id))
            .await
            .unwrap();
    assert_eq!(approved.status, ListingStatus::Active);
    assert!(!approved.flagged);
    assert_eq!(public_catalog(&h).await.len(), 1);
}

#[tokio::test]
async fn approve_requires_flag() {
    let h = harness().await;
    let listing = create_as(&h, h.seller).await;
    let result = handlers::approve_listing(h.admin, State(h.state.clone()), ApiPath(listing.id)).await;
    assert!(matches!(result, Err(ApiError::Validation(_))));
}

#[tokio::test]
async fn reject_keeps_flag_and_hides_listing() {
    let h = harness().await;
    let listing = create_as(&h, h.seller).await;
    flag(&h, listing.id).await;

    let Json(rejected) =
        handlers::reject_listing(h.admin, State(h.state.clone()), ApiPath(listing.id))
            .await
            .unwrap();
    assert_eq!(rejected.status, ListingStatus::Rejected);
    assert!(rejected.flagged);
    assert!(public_catalog(&h).await.is_empty());

    let again = handlers::reject_listing(h.admin, State(h.state.clone()), ApiPath(listing.id)).await;
    assert!(matches!(again, Err(ApiError::Validation(_))));

    // The owner cannot lift the rejection by editing status.
    let lifted = update_as(
        &h,
        h.seller,
        listing.id,
        UpdateListingRequest {
            status: Some(ListingStatus::Active),
            ..Default::default()
        },
    )
    .await;
    assert!(matches!(lifted, Err(ApiError::Forbidden(_))));
}

#[tokio::test]
async fn moderation_endpoints_require_admin() {
    let h = harness().await;
    let listing = create_as(&h, h.seller).await;
    flag(&h, listing.id).await;

    let approve =
        handlers::approve_listing(h.seller, State(h.state.clone()), ApiPath(listing.id)).await;
    assert!(matches!(
        approve,
        Err(ApiError::Forbidden(DenyReason::NotAdmin))
    ));
    let reject = handlers::reject_listing(h.buyer, State(h.state.clone()), ApiPath(listing.id)).await;
    assert!(matches!(reject, Err(ApiError::Forbidden(_))));
    assert!(
        handlers::get_admin_stats(h.seller, State(h.state.clone()))
            .await
            .is_err()
    );
}

#[tokio::test]
async fn admin_listing_view_puts_flagged_first() {
    let h = harness().await;
    let clean = create_as(&h, h.seller).await;
    let flagged = create_as(&h, h.other_seller).await;
    flag(&h, flagged.id).await;

    let Json(all) = handlers::get_admin_listings(h.admin, State(h.state.clone()))
        .await
        .unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].id, flagged.id);
    assert_eq!(all[1].id, clean.id);
}

#[tokio::test]
async fn admin_stats_users_and_payments() {
    let h = harness().await;
    for listing in fixtures::international_listings(h.seller.subject_id) {
        h.repo.insert_listing(&listing).await.unwrap();
    }
    let first = h.repo.get_active_listings().await.unwrap()[0].clone();
    flag(&h, first.id).await;
    h.repo
        .record_payment(Payment {
            id: Uuid::new_v4(),
            user_id: h.buyer.subject_id,
            amount: 5_000,
            status: PaymentStatus::Completed,
            payment_id: Some("pay_123".to_string()),
            created_at: Utc::now(),
        })
        .await;

    let Json(stats) = handlers::get_admin_stats(h.admin, State(h.state.clone()))
        .await
        .unwrap();
    assert_eq!(stats.total_listings, 10);
    assert_eq!(stats.active_listings, 10);
    assert_eq!(stats.flagged_listings, 1);
    assert_eq!(stats.total_users, 4);
    assert_eq!(stats.total_payments, 1);

    let Json(users) = handlers::get_admin_users(h.admin, State(h.state.clone()))
        .await
        .unwrap();
    assert_eq!(users.len(), 4);

    let Json(payments) = handlers::get_admin_payments(h.admin, State(h.state.clone()))
        .await
        .unwrap();
    assert_eq!(payments[0].payment_id.as_deref(), Some("pay_123"));
}

// --- Accounts ---

#[tokio::test]
async fn register_then_login_issues_verifiable_credentials() {
    let h = harness().await;
    let (status, Json(registered)) = handlers::register_user(
        State(h.state.clone()),
        ApiJson(RegisterRequest {
            name: "Priya".to_string(),
            email: "priya@example.com".to_string(),
            password: "s3cret-pass".to_string(),
            role: Some(Role::Seller),
            contact: Some("+91 98765 43210".to_string()),
        }),
    )
    .await
    .unwrap();
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(registered.user.role, Role::Seller);

    let principal = h.state.tokens.verify(&registered.token).unwrap();
    assert_eq!(principal.subject_id, registered.user.id);

    let Json(logged_in) = handlers::login(
        State(h.state.clone()),
        ApiJson(LoginRequest {
            email: "PRIYA@example.com".to_string(),
            password: "s3cret-pass".to_string(),
        }),
    )
    .await
    .unwrap();
    assert_eq!(logged_in.user.id, registered.user.id);

    let Json(me) = handlers::get_me(principal, State(h.state.clone()))
        .await
        .unwrap();
    assert_eq!(me.email, "priya@example.com");
}

#[tokio::test]
async fn register_rejects_duplicates_admin_role_and_short_password() {
    let h = harness().await;
    let request = |email: &str, password: &str, role: Option<Role>| RegisterRequest {
        name: "Sam".to_string(),
        email: email.to_string(),
        password: password.to_string(),
        role,
        contact: None,
    };

    let duplicate = handlers::register_user(
        State(h.state.clone()),
        ApiJson(request("seller@example.com", "long-enough", None)),
    )
    .await;
    assert!(matches!(duplicate, Err(ApiError::Conflict(_))));

    let admin = handlers::register_user(
        State(h.state.clone()),
        ApiJson(request("sam@example.com", "long-enough", Some(Role::Admin))),
    )
    .await;
    assert!(matches!(admin, Err(ApiError::Validation(_))));

    let short = handlers::register_user(
        State(h.state.clone()),
        ApiJson(request("sam@example.com", "123", None)),
    )
    .await;
    assert!(matches!(short, Err(ApiError::Validation(_))));
}

#[tokio::test]
async fn login_failures_look_the_same() {
    let h = harness().await;
    handlers::register_user(
        State(h.state.clone()),
        ApiJson(RegisterRequest {
            name: "Lee".to_string(),
            email: "lee@example.com".to_string(),
            password: "correct-horse".to_string(),
            role: None,
            contact: None,
        }),
    )
    .await
    .unwrap();

    for (email, password) in [
        ("lee@example.com", "wrong-horse"),
        ("nobody@example.com", "correct-horse"),
    ] {
        let result = handlers::login(
            State(h.state.clone()),
            ApiJson(LoginRequest {
                email: email.to_string(),
                password: password.to_string(),
            }),
        )
        .await;
        assert!(matches!(result, Err(ApiError::BadLogin)));
    }
}

#[tokio::test]
async fn owner_content_edit_keeps_moderation_state() {
    let h = harness().await;
    let listing = create_as(&h, h.seller).await;
    flag(&h, listing.id).await;
    handlers::reject_listing(h.admin, State(h.state.clone()), ApiPath(listing.id))
        .await
        .unwrap();

    let edited = update_as(
        &h,
        h.seller,
        listing.id,
        UpdateListingRequest {
            title: Some("Downtown Condo, price reduced".to_string()),
            price: Some(990_000),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    assert_eq!(edited.title, "Downtown Condo, price reduced");
    assert_eq!(edited.status, ListingStatus::Rejected);
    assert!(edited.flagged);
}

// --- Over the Router ---

async fn send(
    h: &Harness,
    method: Method,
    uri: &str,
    principal: Option<Principal>,
    body: Option<String>,
) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    if let Some(principal) = principal {
        let token = h.state.tokens.issue(&principal).unwrap();
        request = request.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => request
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body)),
        None => request.body(Body::empty()),
    }
    .unwrap();

    let response = create_router(h.state.clone()).oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

fn condo_body(price: Value, images: Value) -> String {
    json!({
        "title": "Downtown Condo",
        "description": "Modern condo with skyline views.",
        "price": price,
        "location": "New York, USA",
        "images": images
    })
    .to_string()
}

#[tokio::test]
async fn price_posted_as_text_is_accepted() {
    let h = harness().await;
    let body = condo_body(json!("1500000"), json!([]));
    let (status, listing) = send(&h, Method::POST, "/listings", Some(h.seller), Some(body)).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(listing["price"], 1_500_000);
}

#[tokio::test]
async fn null_images_become_an_empty_list() {
    let h = harness().await;
    let body = condo_body(json!(1_500_000), Value::Null);
    let (status, listing) = send(&h, Method::POST, "/listings", Some(h.seller), Some(body)).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(listing["images"], json!([]));
}

#[tokio::test]
async fn undecodable_body_is_a_json_validation_error() {
    let h = harness().await;
    for body in [
        condo_body(json!("cheap"), json!([])),
        condo_body(json!(1_500_000), json!("not-a-list")),
        "{ not json".to_string(),
    ] {
        let (status, error) =
            send(&h, Method::POST, "/listings", Some(h.seller), Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(error["code"], "VALIDATION_ERROR");
    }
    assert!(h.repo.get_all_listings().await.unwrap().is_empty());

    let (status, error) = send(
        &h,
        Method::PUT,
        &format!("/listings/{}", Uuid::new_v4()),
        Some(h.seller),
        Some(json!({ "price": "cheap" }).to_string()),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn buyer_with_bad_body_is_still_forbidden() {
    let h = harness().await;
    let body = condo_body(json!("cheap"), json!([]));
    let (status, error) = send(&h, Method::POST, "/listings", Some(h.buyer), Some(body)).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(error["code"], "FORBIDDEN");
}

#[tokio::test]
async fn non_uuid_listing_id_is_not_found() {
    let h = harness().await;
    let cases = [
        (Method::GET, "/listings/abc", None),
        (Method::DELETE, "/listings/abc", Some(h.seller)),
        (Method::POST, "/admin/listings/abc/approve", Some(h.admin)),
    ];

    for (method, uri, principal) in cases {
        let (status, error) = send(&h, method, uri, principal, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
        assert_eq!(error["code"], "NOT_FOUND");
    }

    let (status, error) = send(
        &h,
        Method::PUT,
        "/listings/abc",
        Some(h.seller),
        Some(json!({ "title": "x" }).to_string()),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error["code"], "NOT_FOUND");
}

#[tokio::test]
async fn bad_catalog_query_is_a_json_validation_error() {
    let h = harness().await;
    let (status, error) = send(&h, Method::GET, "/listings?min_price=cheap", None, None).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["code"], "VALIDATION_ERROR");
}

// --- Error Responses ---

#[test]
fn api_errors_map_to_status_codes() {
    let cases = [
        (ApiError::MissingCredential, StatusCode::UNAUTHORIZED),
        (ApiError::BadLogin, StatusCode::UNAUTHORIZED),
        (ApiError::InvalidCredential, StatusCode::FORBIDDEN),
        (
            ApiError::Forbidden(DenyReason::NotOwnerOrAdmin),
            StatusCode::FORBIDDEN,
        ),
        (ApiError::NotFound, StatusCode::NOT_FOUND),
        (
            ApiError::Validation("title is required".to_string()),
            StatusCode::BAD_REQUEST,
        ),
        (
            ApiError::Conflict("Email already registered".to_string()),
            StatusCode::CONFLICT,
        ),
        (
            ApiError::Store("connection reset".to_string()),
            StatusCode::INTERNAL_SERVER_ERROR,
        ),
    ];

    for (error, expected) in cases {
        assert_eq!(error.into_response().status(), expected);
    }
}

#[tokio::test]
async fn store_error_body_hides_details() {
    let response = ApiError::Store("password authentication failed for user".to_string())
        .into_response();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(json["code"], "INTERNAL_SERVER_ERROR");
    assert_eq!(json["message"], "Server error");
    assert!(!String::from_utf8_lossy(&body).contains("password"));
}
