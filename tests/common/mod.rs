//! Fixtures shared by the store integration tests.

#![allow(dead_code)]

use chrono::{DateTime, Duration, TimeZone, Utc};
use fyyur::{ArtistFields, Genres, Show, Store, VenueFields};

pub fn store() -> Store {
    Store::open_in_memory().expect("in-memory store")
}

/// A fixed "now" so partition tests do not depend on the wall clock.
pub fn reference_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2030, 6, 15, 20, 0, 0).unwrap()
}

pub fn days_from_reference(days: i64) -> DateTime<Utc> {
    reference_time() + Duration::days(days)
}

pub fn venue_fields(name: &str, city: &str, state: &str) -> VenueFields {
    VenueFields {
        name: name.to_string(),
        address: "1 Main Street".to_string(),
        city: city.to_string(),
        state: state.to_string(),
        phone: "555-000-1111".to_string(),
        genres: Genres::new(["Jazz", "Folk"]),
        image_link: Some(format!("https://img.example.com/{}.png", name.len())),
        ..VenueFields::default()
    }
}

pub fn artist_fields(name: &str) -> ArtistFields {
    ArtistFields {
        name: name.to_string(),
        city: "San Francisco".to_string(),
        state: "CA".to_string(),
        phone: "555-222-3333".to_string(),
        genres: Genres::new(["Rock n Roll"]),
        image_link: Some(format!("https://img.example.com/artist-{}.png", name.len())),
        ..ArtistFields::default()
    }
}

pub fn book(store: &mut Store, artist_id: i64, venue_id: i64, start_time: DateTime<Utc>) -> Show {
    store
        .create_show(&Show {
            artist_id,
            venue_id,
            start_time,
        })
        .expect("booking should succeed")
}
