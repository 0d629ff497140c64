use crate::{
    lifecycle::{self, ListingPatch},
    models::{AdminDashboardStats, Listing, ListingStatus, Payment, User},
};
use async_trait::async_trait;
use sqlx::PgPool;
use std::{collections::HashMap, sync::Arc};
use thiserror::Error;
use tokio::sync::RwLock;
use uuid::Uuid;

/// RepositoryError
///
/// Persistence failures. `DuplicateEmail` is the only expected one.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("email already registered")]
    DuplicateEmail,
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

pub type RepoResult<T> = Result<T, RepositoryError>;

/// Repository Trait
///
/// The persistence contract: by-id lookup, insert, column patch and delete,
/// each atomic on a single row. No transactions span calls; concurrent patches
/// to one listing are last-write-wins per column.
#[async_trait]
pub trait Repository: Send + Sync {
    // --- Listing Retrieval ---
    // Public collection: `status = active` only, newest first.
    async fn get_active_listings(&self) -> RepoResult<Vec<Listing>>;
    // Admin view: every listing regardless of status or flag.
    async fn get_all_listings(&self) -> RepoResult<Vec<Listing>>;
    async fn get_listings_by_seller(&self, seller_id: Uuid) -> RepoResult<Vec<Listing>>;
    // No status check: the detail view shows pending/sold/rejected listings too.
    async fn get_listing(&self, id: Uuid) -> RepoResult<Option<Listing>>;

    // --- Listing Writes ---
    async fn insert_listing(&self, listing: &Listing) -> RepoResult<Listing>;
    // Writes only the columns the patch names. `None` when the listing no longer exists.
    async fn patch_listing(&self, id: Uuid, patch: &ListingPatch) -> RepoResult<Option<Listing>>;
    // `false` when nothing was deleted.
    async fn delete_listing(&self, id: Uuid) -> RepoResult<bool>;

    // --- Users ---
    async fn get_user(&self, id: Uuid) -> RepoResult<Option<User>>;
    async fn get_user_by_email(&self, email: &str) -> RepoResult<Option<User>>;
    // Fails with `DuplicateEmail` when the address is taken.
    async fn create_user(&self, user: &User) -> RepoResult<User>;
    async fn get_users(&self) -> RepoResult<Vec<User>>;

    // --- Admin ---
    async fn get_payments(&self) -> RepoResult<Vec<Payment>>;
    async fn get_stats(&self) -> RepoResult<AdminDashboardStats>;
}

/// RepositoryState
///
/// The shared handle stored in the application state.
pub type RepositoryState = Arc<dyn Repository>;

const LISTING_COLUMNS: &str = "id, title, description, price, location, images, seller_id, \
                               status, flagged, created_at, updated_at";

const USER_COLUMNS: &str = "id, name, email, password_hash, role, is_verified, contact, created_at";

/// PostgresRepository
///
/// `Repository` backed by PostgreSQL (see `migrations/`).
pub struct PostgresRepository {
    pool: PgPool,
}

impl PostgresRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Repository for PostgresRepository {
    async fn get_active_listings(&self) -> RepoResult<Vec<Listing>> {
        let sql = format!(
            "SELECT {LISTING_COLUMNS} FROM listings WHERE status = 'active' ORDER BY created_at DESC"
        );
        Ok(sqlx::query_as::<_, Listing>(&sql)
            .fetch_all(&self.pool)
            .await?)
    }

    /// Flagged listings sort first so the moderation queue is on top.
    async fn get_all_listings(&self) -> RepoResult<Vec<Listing>> {
        let sql = format!(
            "SELECT {LISTING_COLUMNS} FROM listings ORDER BY flagged DESC, created_at DESC"
        );
        Ok(sqlx::query_as::<_, Listing>(&sql)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn get_listings_by_seller(&self, seller_id: Uuid) -> RepoResult<Vec<Listing>> {
        let sql = format!(
            "SELECT {LISTING_COLUMNS} FROM listings WHERE seller_id = $1 ORDER BY created_at DESC"
        );
        Ok(sqlx::query_as::<_, Listing>(&sql)
            .bind(seller_id)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn get_listing(&self, id: Uuid) -> RepoResult<Option<Listing>> {
        let sql = format!("SELECT {LISTING_COLUMNS} FROM listings WHERE id = $1");
        Ok(sqlx::query_as::<_, Listing>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn insert_listing(&self, listing: &Listing) -> RepoResult<Listing> {
        let sql = format!(
            "INSERT INTO listings ({LISTING_COLUMNS}) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11) \
             RETURNING {LISTING_COLUMNS}"
        );
        Ok(sqlx::query_as::<_, Listing>(&sql)
            .bind(listing.id)
            .bind(&listing.title)
            .bind(&listing.description)
            .bind(listing.price)
            .bind(&listing.location)
            .bind(&listing.images)
            .bind(listing.seller_id)
            .bind(listing.status)
            .bind(listing.flagged)
            .bind(listing.created_at)
            .bind(listing.updated_at)
            .fetch_one(&self.pool)
            .await?)
    }

    async fn patch_listing(&self, id: Uuid, patch: &ListingPatch) -> RepoResult<Option<Listing>> {
        let sql = format!(
            "UPDATE listings \
             SET title = COALESCE($2, title), \
                 description = COALESCE($3, description), \
                 price = COALESCE($4, price), \
                 location = COALESCE($5, location), \
                 images = COALESCE($6, images), \
                 status = CASE \
                     WHEN $7::text IS NULL OR (status = 'rejected' AND $8) THEN status \
                     ELSE $7::text \
                 END, \
                 flagged = COALESCE($9, flagged), \
                 updated_at = $10 \
             WHERE id = $1 \
             RETURNING {LISTING_COLUMNS}"
        );
        let edit = &patch.edit;
        Ok(sqlx::query_as::<_, Listing>(&sql)
            .bind(id)
            .bind(edit.title.as_deref())
            .bind(edit.description.as_deref())
            .bind(edit.price)
            .bind(edit.location.as_deref())
            .bind(edit.images.as_deref())
            .bind(edit.status)
            .bind(patch.keep_rejected)
            .bind(patch.flagged)
            .bind(patch.updated_at)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn delete_listing(&self, id: Uuid) -> RepoResult<bool> {
        let result = sqlx::query("DELETE FROM listings WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn get_user(&self, id: Uuid) -> RepoResult<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        Ok(sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn get_user_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE lower(email) = lower($1)");
        Ok(sqlx::query_as::<_, User>(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn create_user(&self, user: &User) -> RepoResult<User> {
        let sql = format!(
            "INSERT INTO users ({USER_COLUMNS}) VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             RETURNING {USER_COLUMNS}"
        );
        sqlx::query_as::<_, User>(&sql)
            .bind(user.id)
            .bind(&user.name)
            .bind(&user.email)
            .bind(&user.password_hash)
            .bind(user.role)
            .bind(user.is_verified)
            .bind(&user.contact)
            .bind(user.created_at)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| match e {
                sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                    RepositoryError::DuplicateEmail
                }
                other => RepositoryError::Database(other),
            })
    }

    async fn get_users(&self) -> RepoResult<Vec<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users ORDER BY created_at DESC");
        Ok(sqlx::query_as::<_, User>(&sql)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn get_payments(&self) -> RepoResult<Vec<Payment>> {
        Ok(sqlx::query_as::<_, Payment>(
            "SELECT id, user_id, amount, status, payment_id, created_at \
             FROM payments ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await?)
    }

    /// All counters in one round trip.
    async fn get_stats(&self) -> RepoResult<AdminDashboardStats> {
        let (total_listings, active_listings, flagged_listings, total_users, total_payments) =
            sqlx::query_as::<_, (i64, i64, i64, i64, i64)>(
                r#"
                SELECT
                    (SELECT COUNT(*) FROM listings),
                    (SELECT COUNT(*) FROM listings WHERE status = 'active'),
                    (SELECT COUNT(*) FROM listings WHERE flagged),
                    (SELECT COUNT(*) FROM users),
                    (SELECT COUNT(*) FROM payments)
                "#,
            )
            .fetch_one(&self.pool)
            .await?;

        Ok(AdminDashboardStats {
            total_listings,
            active_listings,
            flagged_listings,
            total_users,
            total_payments,
        })
    }
}

/// InMemoryRepository
///
/// `Repository` held in process memory. Used by the test suites and by local
/// runs without `DATABASE_URL`. Each call takes the lock once, so every
/// operation is atomic on its own.
#[derive(Default)]
pub struct InMemoryRepository {
    users: RwLock<HashMap<Uuid, User>>,
    listings: RwLock<HashMap<Uuid, Listing>>,
    payments: RwLock<Vec<Payment>>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Payments arrive from the gateway, never through this API.
    pub async fn record_payment(&self, payment: Payment) {
        self.payments.write().await.push(payment);
    }

    async fn collect_listings<F>(&self, keep: F) -> Vec<Listing>
    where
        F: Fn(&Listing) -> bool,
    {
        let mut listings: Vec<Listing> = self
            .listings
            .read()
            .await
            .values()
            .filter(|listing| keep(listing))
            .cloned()
            .collect();
        listings.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        listings
    }
}

#[async_trait]
impl Repository for InMemoryRepository {
    async fn get_active_listings(&self) -> RepoResult<Vec<Listing>> {
        Ok(self
            .collect_listings(|listing| listing.status == ListingStatus::Active)
            .await)
    }

    async fn get_all_listings(&self) -> RepoResult<Vec<Listing>> {
        let mut listings = self.collect_listings(|_| true).await;
        // Stable sort keeps newest-first within each group.
        listings.sort_by_key(|listing| !listing.flagged);
        Ok(listings)
    }

    async fn get_listings_by_seller(&self, seller_id: Uuid) -> RepoResult<Vec<Listing>> {
        Ok(self
            .collect_listings(|listing| listing.seller_id == seller_id)
            .await)
    }

    async fn get_listing(&self, id: Uuid) -> RepoResult<Option<Listing>> {
        Ok(self.listings.read().await.get(&id).cloned())
    }

    async fn insert_listing(&self, listing: &Listing) -> RepoResult<Listing> {
        self.listings
            .write()
            .await
            .insert(listing.id, listing.clone());
        Ok(listing.clone())
    }

    async fn patch_listing(&self, id: Uuid, patch: &ListingPatch) -> RepoResult<Option<Listing>> {
        let mut listings = self.listings.write().await;
        Ok(listings.get_mut(&id).map(|stored| {
            *stored = lifecycle::apply_patch(stored.clone(), patch);
            stored.clone()
        }))
    }

    async fn delete_listing(&self, id: Uuid) -> RepoResult<bool> {
        Ok(self.listings.write().await.remove(&id).is_some())
    }

    async fn get_user(&self, id: Uuid) -> RepoResult<Option<User>> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn get_user_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|user| user.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn create_user(&self, user: &User) -> RepoResult<User> {
        let mut users = self.users.write().await;
        if users
            .values()
            .any(|existing| existing.email.eq_ignore_ascii_case(&user.email))
        {
            return Err(RepositoryError::DuplicateEmail);
        }
        users.insert(user.id, user.clone());
        Ok(user.clone())
    }

    async fn get_users(&self) -> RepoResult<Vec<User>> {
        let mut users: Vec<User> = self.users.read().await.values().cloned().collect();
        users.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(users)
    }

    async fn get_payments(&self) -> RepoResult<Vec<Payment>> {
        let mut payments = self.payments.read().await.clone();
        payments.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(payments)
    }

    async fn get_stats(&self) -> RepoResult<AdminDashboardStats> {
        let listings = self.listings.read().await;
        let count = |keep: fn(&Listing) -> bool| listings.values().filter(|l| keep(l)).count() as i64;

        Ok(AdminDashboardStats {
            total_listings: listings.len() as i64,
            active_listings: count(|l| l.status == ListingStatus::Active),
            flagged_listings: count(|l| l.flagged),
            total_users: self.users.read().await.len() as i64,
            total_payments: self.payments.read().await.len() as i64,
        })
    }
}
