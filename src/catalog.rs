//! Catalog query: the public search over listings.

use crate::models::{Listing, ListingFilter, ListingStatus};

/// Only active listings are visible in the public collection.
pub fn is_publicly_listed(listing: &Listing) -> bool {
    listing.status == ListingStatus::Active
}

/// matches
///
/// True when `listing` satisfies every filter that is set.
pub fn matches(listing: &Listing, filter: &ListingFilter) -> bool {
    if let Some(search) = filter.search.as_deref() {
        let needle = search.to_lowercase();
        let hit = [&listing.title, &listing.location, &listing.description]
            .iter()
            .any(|field| field.to_lowercase().contains(&needle));
        if !hit {
            return false;
        }
    }

    if let Some(location) = filter.location.as_deref() {
        if !listing
            .location
            .to_lowercase()
            .contains(&location.to_lowercase())
        {
            return false;
        }
    }

    if let Some(country) = filter.country.as_deref() {
        if !listing.location.ends_with(country) {
            return false;
        }
    }

    if filter.min_price.is_some_and(|min| listing.price < min) {
        return false;
    }
    if filter.max_price.is_some_and(|max| listing.price > max) {
        return false;
    }

    true
}

/// search
///
/// Keeps the active listings matching `filter`, in input order.
pub fn search(listings: Vec<Listing>, filter: &ListingFilter) -> Vec<Listing> {
    listings
        .into_iter()
        .filter(|listing| is_publicly_listed(listing) && matches(listing, filter))
        .collect()
}
