//! Authorization policy for listing mutations and moderation.
//!
//! Pure functions over a [`Principal`] and the target resource. The result is a
//! tagged [`Decision`] so the rules can be tested without a request in flight;
//! handlers turn a denial into `ApiError::Forbidden`.

use crate::{
    auth::Principal,
    error::ApiError,
    models::{Listing, ListingStatus, Role, UpdateListingRequest},
};

/// What the principal is trying to do.
#[derive(Debug, Clone, Copy)]
pub enum Action<'a> {
    CreateListing,
    UpdateListing {
        listing: &'a Listing,
        changes: &'a UpdateListingRequest,
    },
    DeleteListing(&'a Listing),
    /// Approve/reject and the admin-only read views.
    Moderate,
}

/// Why a request was refused. Callers only ever see "forbidden".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    NotASeller,
    NotOwnerOrAdmin,
    NotAdmin,
    /// An owner tried to touch `flagged`, reject their own listing, or lift a rejection.
    ModerationRequiresAdmin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny(DenyReason),
}

impl Decision {
    pub fn is_allowed(self) -> bool {
        matches!(self, Decision::Allow)
    }

    pub fn into_result(self) -> Result<(), ApiError> {
        match self {
            Decision::Allow => Ok(()),
            Decision::Deny(reason) => Err(ApiError::Forbidden(reason)),
        }
    }
}

/// authorize
///
/// Rules, in precedence order:
/// 1. only sellers create listings;
/// 2. only the owner or an admin updates or deletes a listing;
/// 3. owners may edit content and move between active/pending/sold, but the
///    moderation fields belong to admins.
pub fn authorize(principal: &Principal, action: Action<'_>) -> Decision {
    match action {
        Action::CreateListing => {
            if principal.role == Role::Seller {
                Decision::Allow
            } else {
                Decision::Deny(DenyReason::NotASeller)
            }
        }
        Action::DeleteListing(listing) => owner_or_admin(principal, listing),
        Action::UpdateListing { listing, changes } => {
            match owner_or_admin(principal, listing) {
                Decision::Allow if principal.is_admin() => Decision::Allow,
                Decision::Allow if touches_moderation(listing, changes) => {
                    Decision::Deny(DenyReason::ModerationRequiresAdmin)
                }
                decision => decision,
            }
        }
        Action::Moderate => {
            if principal.is_admin() {
                Decision::Allow
            } else {
                Decision::Deny(DenyReason::NotAdmin)
            }
        }
    }
}

fn owner_or_admin(principal: &Principal, listing: &Listing) -> Decision {
    if principal.subject_id == listing.seller_id || principal.is_admin() {
        Decision::Allow
    } else {
        Decision::Deny(DenyReason::NotOwnerOrAdmin)
    }
}

/// True when `changes` would do something only moderation may do.
fn touches_moderation(listing: &Listing, changes: &UpdateListingRequest) -> bool {
    if changes.flagged.is_some() {
        return true;
    }
    match changes.status {
        Some(ListingStatus::Rejected) => true,
        Some(status) => listing.status == ListingStatus::Rejected && status != listing.status,
        None => false,
    }
}
