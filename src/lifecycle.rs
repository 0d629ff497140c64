//! Listing lifecycle: creation, owner edits, admin moderation.
//!
//! `status` moves between active, pending, sold and rejected; `flagged` is an
//! independent overlay that only moderation clears. Edits and moderation
//! decisions are expressed as a `ListingPatch` naming only the columns they
//! change, which the repository applies to the stored row in one write.
//! Deletion has no transition: the row is simply removed.

use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::models::{CreateListingRequest, Listing, ListingStatus, UpdateListingRequest};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LifecycleError {
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("price must not be negative")]
    NegativePrice,
    #[error("listing is not flagged for review")]
    NotFlagged,
    #[error("listing is already rejected")]
    AlreadyRejected,
}

/// Fields the owning seller may change in a normal edit.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListingEdit {
    pub title: Option<String>,
    pub description: Option<String>,
    pub price: Option<i64>,
    pub location: Option<String>,
    pub images: Option<Vec<String>>,
    pub status: Option<ListingStatus>,
}

/// Fields only an admin may change.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ModerationEdit {
    pub flagged: Option<bool>,
}

impl ModerationEdit {
    pub fn is_empty(&self) -> bool {
        self.flagged.is_none()
    }
}

/// Splits a wire payload into its owner-editable and admin-only halves.
pub fn split_update(request: UpdateListingRequest) -> (ListingEdit, ModerationEdit) {
    let UpdateListingRequest {
        title,
        description,
        price,
        location,
        images,
        status,
        flagged,
    } = request;

    (
        ListingEdit {
            title,
            description,
            price,
            location,
            images,
            status,
        },
        ModerationEdit { flagged },
    )
}

/// new_listing
///
/// Builds a fresh listing for `seller_id`: active, unflagged, timestamps at `now`.
pub fn new_listing(
    seller_id: Uuid,
    request: CreateListingRequest,
    now: DateTime<Utc>,
) -> Result<Listing, LifecycleError> {
    let title = required_text(request.title, "title")?;
    let description = required_text(request.description, "description")?;
    let location = required_text(request.location, "location")?;
    let price = request.price.ok_or(LifecycleError::MissingField("price"))?;
    check_price(price)?;

    Ok(Listing {
        id: Uuid::new_v4(),
        title,
        description,
        price,
        location,
        images: request.images,
        seller_id,
        status: ListingStatus::Active,
        flagged: false,
        created_at: now,
        updated_at: now,
    })
}

/// ListingPatch
///
/// The columns one write changes. `None` leaves the stored value alone, so an
/// owner's content edit never carries `flagged` or a stale `status` along.
#[derive(Debug, Clone, PartialEq)]
pub struct ListingPatch {
    pub edit: ListingEdit,
    pub flagged: Option<bool>,
    /// Set for non-admin writes: a stored `rejected` status is kept.
    pub keep_rejected: bool,
    pub updated_at: DateTime<Utc>,
}

/// prepare_patch
///
/// Validates an edit and turns it into a patch. Text fields are trimmed and
/// must stay non-blank; price must stay non-negative. Moderation fields are
/// dropped unless `by_admin` is set.
pub fn prepare_patch(
    edit: ListingEdit,
    moderation: ModerationEdit,
    by_admin: bool,
    now: DateTime<Utc>,
) -> Result<ListingPatch, LifecycleError> {
    let ListingEdit {
        title,
        description,
        price,
        location,
        images,
        status,
    } = edit;

    if let Some(price) = price {
        check_price(price)?;
    }
    let edit = ListingEdit {
        title: title.map(|text| required_text(Some(text), "title")).transpose()?,
        description: description
            .map(|text| required_text(Some(text), "description"))
            .transpose()?,
        price,
        location: location
            .map(|text| required_text(Some(text), "location"))
            .transpose()?,
        images,
        status,
    };

    Ok(ListingPatch {
        edit,
        flagged: if by_admin { moderation.flagged } else { None },
        keep_rejected: !by_admin,
        updated_at: now,
    })
}

/// apply_patch
///
/// Writes the supplied columns onto `listing`. Identity, owner and creation
/// time are never touched.
pub fn apply_patch(mut listing: Listing, patch: &ListingPatch) -> Listing {
    let edit = &patch.edit;
    if let Some(title) = &edit.title {
        listing.title = title.clone();
    }
    if let Some(description) = &edit.description {
        listing.description = description.clone();
    }
    if let Some(price) = edit.price {
        listing.price = price;
    }
    if let Some(location) = &edit.location {
        listing.location = location.clone();
    }
    if let Some(images) = &edit.images {
        listing.images = images.clone();
    }
    if let Some(status) = edit.status {
        if !(patch.keep_rejected && listing.status == ListingStatus::Rejected) {
            listing.status = status;
        }
    }
    if let Some(flagged) = patch.flagged {
        listing.flagged = flagged;
    }
    listing.updated_at = patch.updated_at;
    listing
}

fn moderation_patch(status: ListingStatus, flagged: Option<bool>, now: DateTime<Utc>) -> ListingPatch {
    ListingPatch {
        edit: ListingEdit {
            status: Some(status),
            ..ListingEdit::default()
        },
        flagged,
        keep_rejected: false,
        updated_at: now,
    }
}

/// approve
///
/// Flagged listing (any status) becomes active and unflagged.
pub fn approve(listing: &Listing, now: DateTime<Utc>) -> Result<ListingPatch, LifecycleError> {
    if !listing.flagged {
        return Err(LifecycleError::NotFlagged);
    }
    Ok(moderation_patch(ListingStatus::Active, Some(false), now))
}

/// reject
///
/// Flagged, not-yet-rejected listing becomes rejected. `flagged` is left as it
/// was; clearing it is a separate moderation write.
pub fn reject(listing: &Listing, now: DateTime<Utc>) -> Result<ListingPatch, LifecycleError> {
    if !listing.flagged {
        return Err(LifecycleError::NotFlagged);
    }
    if listing.status == ListingStatus::Rejected {
        return Err(LifecycleError::AlreadyRejected);
    }
    Ok(moderation_patch(ListingStatus::Rejected, None, now))
}

fn required_text(value: Option<String>, field: &'static str) -> Result<String, LifecycleError> {
    match value {
        Some(text) if !text.trim().is_empty() => Ok(text.trim().to_string()),
        _ => Err(LifecycleError::MissingField(field)),
    }
}

fn check_price(price: i64) -> Result<(), LifecycleError> {
    if price < 0 {
        Err(LifecycleError::NegativePrice)
    } else {
        Ok(())
    }
}
