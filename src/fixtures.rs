//! Demo catalog: ten international listings owned by one seller.

use chrono::{Duration, Utc};
use uuid::Uuid;

use crate::models::{Listing, ListingStatus};

const DEMO_LISTINGS: [(&str, &str, i64, &str, [&str; 2]); 10] = [
    (
        "Modern Apartment in City Center",
        "A beautiful 2BHK apartment with all amenities, close to metro and shopping.",
        7_500_000,
        "Bangalore, India",
        [
            "https://images.unsplash.com/photo-1506744038136-46273834b3fb",
            "https://images.unsplash.com/photo-1465101046530-73398c7f28ca",
        ],
    ),
    (
        "Cozy Villa with Garden",
        "Spacious villa with a private garden, perfect for families.",
        12_500_000,
        "Pune, India",
        [
            "https://images.unsplash.com/photo-1507089947368-19c1da9775ae",
            "https://images.unsplash.com/photo-1512918728675-ed5a9ecdebfd",
        ],
    ),
    (
        "Luxury Penthouse",
        "Top-floor penthouse with city views and premium facilities.",
        25_000_000,
        "Mumbai, India",
        [
            "https://images.unsplash.com/photo-1468436139062-f60a71c5c892",
            "https://images.unsplash.com/photo-1503389152951-9c3d0c6b7a5a",
        ],
    ),
    (
        "Downtown Condo",
        "Modern condo in the heart of New York City with skyline views.",
        1_200_000,
        "New York, USA",
        [
            "https://images.unsplash.com/photo-1464983953574-0892a716854b",
            "https://images.unsplash.com/photo-1501594907352-04cda38ebc29",
        ],
    ),
    (
        "Beachfront Villa",
        "Stunning villa with private beach access in Miami.",
        3_500_000,
        "Miami, USA",
        [
            "https://images.unsplash.com/photo-1505691938895-1758d7feb511",
            "https://images.unsplash.com/photo-1507003211169-0a1dd7228f2d",
        ],
    ),
    (
        "Central London Flat",
        "Elegant flat in Central London, close to Hyde Park.",
        2_200_000,
        "London, UK",
        [
            "https://images.unsplash.com/photo-1465101178521-c1a9136a3b99",
            "https://images.unsplash.com/photo-1465101046530-73398c7f28ca",
        ],
    ),
    (
        "Dubai Marina Apartment",
        "Luxury apartment with marina views and world-class amenities.",
        1_800_000,
        "Dubai, UAE",
        [
            "https://images.unsplash.com/photo-1507089947368-19c1da9775ae",
            "https://images.unsplash.com/photo-1512918728675-ed5a9ecdebfd",
        ],
    ),
    (
        "Singapore City Loft",
        "Chic loft in Singapore's business district, perfect for professionals.",
        950_000,
        "Singapore",
        [
            "https://images.unsplash.com/photo-1468436139062-f60a71c5c892",
            "https://images.unsplash.com/photo-1503389152951-9c3d0c6b7a5a",
        ],
    ),
    (
        "Sydney Harbour House",
        "House with breathtaking views of Sydney Harbour Bridge.",
        2_700_000,
        "Sydney, Australia",
        [
            "https://images.unsplash.com/photo-1464983953574-0892a716854b",
            "https://images.unsplash.com/photo-1501594907352-04cda38ebc29",
        ],
    ),
    (
        "Parisian Penthouse",
        "Romantic penthouse with Eiffel Tower views.",
        2_100_000,
        "Paris, France",
        [
            "https://images.unsplash.com/photo-1505691938895-1758d7feb511",
            "https://images.unsplash.com/photo-1507003211169-0a1dd7228f2d",
        ],
    ),
];

/// international_listings
///
/// The demo catalog, all active and unflagged. Creation times step back one
/// minute per entry so newest-first order matches the table order above.
pub fn international_listings(seller_id: Uuid) -> Vec<Listing> {
    let now = Utc::now();
    DEMO_LISTINGS
        .iter()
        .enumerate()
        .map(|(index, (title, description, price, location, images))| {
            let created_at = now - Duration::minutes(index as i64);
            Listing {
                id: Uuid::new_v4(),
                title: title.to_string(),
                description: description.to_string(),
                price: *price,
                location: location.to_string(),
                images: images.iter().map(|url| url.to_string()).collect(),
                seller_id,
                status: ListingStatus::Active,
                flagged: false,
                created_at,
                updated_at: created_at,
            }
        })
        .collect()
}
