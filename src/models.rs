use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;
use ts_rs::TS;
use utoipa::ToSchema;
use uuid::Uuid;

// --- Enumerations (stored as lowercase text) ---

/// Role
///
/// The RBAC field carried by every user and every credential.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS, ToSchema, sqlx::Type,
)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "text", rename_all = "lowercase")]
#[ts(export)]
pub enum Role {
    Admin,
    Seller,
    #[default]
    Buyer,
}

/// ListingStatus
///
/// Publication state of a listing. Only `Active` listings appear in the public catalog.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS, ToSchema, sqlx::Type,
)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "text", rename_all = "lowercase")]
#[ts(export)]
pub enum ListingStatus {
    #[default]
    Active,
    Pending,
    Sold,
    Rejected,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS, ToSchema, sqlx::Type,
)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "text", rename_all = "lowercase")]
#[ts(export)]
pub enum PaymentStatus {
    #[default]
    Pending,
    Completed,
    Failed,
}

// --- Core Application Schemas (Mapped to Database) ---

/// User
///
/// A registered account from the `users` table. Deliberately not `Serialize`:
/// it carries the password hash. Responses use [`UserProfile`].
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    // Unique across all users.
    pub email: String,
    pub password_hash: String,
    // Fixed at registration.
    pub role: Role,
    pub is_verified: bool,
    // Phone or other free-form contact details.
    pub contact: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Listing
///
/// A property listing from the `listings` table.
#[derive(
    Debug, Clone, PartialEq, Default, Serialize, Deserialize, TS, ToSchema, FromRow,
)]
#[ts(export)]
pub struct Listing {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub price: i64,
    // Free text ending in the country/region, e.g. "Pune, India".
    pub location: String,
    // Ordered image URLs produced by the external image host.
    pub images: Vec<String>,
    // FK to users.id (the owning seller).
    pub seller_id: Uuid,
    pub status: ListingStatus,
    // Moderation marker, independent of `status`.
    pub flagged: bool,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    #[ts(type = "string")]
    pub updated_at: DateTime<Utc>,
}

/// Payment
///
/// Read-only record from the `payments` table, surfaced in the admin view.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, TS, ToSchema, FromRow)]
#[ts(export)]
pub struct Payment {
    pub id: Uuid,
    pub user_id: Uuid,
    pub amount: i64,
    pub status: PaymentStatus,
    // Gateway-side identifier, opaque to this service.
    pub payment_id: Option<String>,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
}

// --- Request Payloads (Input Schemas) ---

/// CreateListingRequest
///
/// Input payload for `POST /listings`. Every field is optional on the wire so
/// that missing fields surface as a validation failure rather than a decode error.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct CreateListingRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    // Form inputs post the price as text; both `1500000` and `"1500000"` are accepted.
    #[serde(default, deserialize_with = "number_or_numeric_text")]
    pub price: Option<i64>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub images: Vec<String>,
}

/// UpdateListingRequest
///
/// Partial update payload for `PUT /listings/{id}`. Absent fields are left as
/// they are. `status` and `flagged` are subject to the moderation rules.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct UpdateListingRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(
        default,
        deserialize_with = "number_or_numeric_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub price: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ListingStatus>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flagged: Option<bool>,
}

/// RegisterRequest
///
/// Input payload for `POST /auth/register`. `role` defaults to buyer.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub role: Option<Role>,
    #[serde(default)]
    pub contact: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// ListingFilter
///
/// Catalog query parameters for `GET /listings`. Empty strings count as absent.
#[derive(Debug, Clone, Default, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListingFilter {
    /// Case-insensitive match against title, location or description.
    #[serde(default, deserialize_with = "blank_as_none")]
    pub search: Option<String>,
    /// Case-insensitive match against location.
    #[serde(default, deserialize_with = "blank_as_none")]
    pub location: Option<String>,
    /// Inclusive lower price bound.
    #[serde(default, deserialize_with = "blank_as_none_number")]
    pub min_price: Option<i64>,
    /// Inclusive upper price bound.
    #[serde(default, deserialize_with = "blank_as_none_number")]
    pub max_price: Option<i64>,
    /// Exact suffix of location, e.g. "India".
    #[serde(default, deserialize_with = "blank_as_none")]
    pub country: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrText {
    Number(i64),
    Text(String),
}

fn number_or_numeric_text<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<NumberOrText>::deserialize(deserializer)? {
        None => Ok(None),
        Some(NumberOrText::Number(value)) => Ok(Some(value)),
        Some(NumberOrText::Text(raw)) if raw.trim().is_empty() => Ok(None),
        Some(NumberOrText::Text(raw)) => raw.trim().parse::<i64>().map(Some).map_err(|_| {
            serde::de::Error::custom(format!("price must be a whole number, got {raw:?}"))
        }),
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.filter(|value| !value.trim().is_empty()))
}

fn blank_as_none_number<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    match blank_as_none(deserializer)? {
        Some(raw) => raw
            .trim()
            .parse::<i64>()
            .map(Some)
            .map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

// --- Response Schemas (Output) ---

/// UserProfile
///
/// Public view of a user. Never includes the password hash.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct UserProfile {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub is_verified: bool,
    pub contact: Option<String>,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role,
            is_verified: user.is_verified,
            contact: user.contact.clone(),
        }
    }
}

/// AuthResponse
///
/// Returned by register and login: a fresh bearer credential plus the profile.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserProfile,
}

/// AdminDashboardStats
///
/// Counters for `GET /admin/stats`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct AdminDashboardStats {
    pub total_listings: i64,
    pub active_listings: i64,
    /// Listings awaiting an approve/reject decision.
    pub flagged_listings: i64,
    pub total_users: i64,
    pub total_payments: i64,
}
