use chrono::{DateTime, Duration, Utc};
use log::info;

use crate::db::Store;
use crate::error::Result;
use crate::genres::Genres;
use crate::models::{ArtistFields, Show, VenueFields};

/// Fills an empty store with a few venues, artists and shows placed around
/// `now`. Returns false when the store already had venues or artists.
pub fn seed_if_empty(store: &mut Store, now: DateTime<Utc>) -> Result<bool> {
    if !store.list_venues()?.is_empty() || !store.list_artists()?.is_empty() {
        return Ok(false);
    }

    let musical_hop = store.create_venue(&sample_venue(
        "The Musical Hop",
        "1015 Folsom Street",
        "San Francisco",
        "CA",
        "123-123-1234",
        &["Jazz", "Reggae", "Swing", "Classical", "Folk"],
        Some("We are on the lookout for a local artist to play every two weeks."),
    ))?;
    store.create_venue(&sample_venue(
        "The Dueling Pianos Bar",
        "335 Delancey Street",
        "New York",
        "NY",
        "914-003-1132",
        &["Classical", "R&B", "Hip-Hop"],
        None,
    ))?;
    let park_square = store.create_venue(&sample_venue(
        "Park Square Live Music & Coffee",
        "34 Whiskey Moore Ave",
        "San Francisco",
        "CA",
        "415-000-1234",
        &["Rock n Roll", "Jazz", "Classical", "Folk"],
        None,
    ))?;

    let guns_n_petals = store.create_artist(&sample_artist(
        "Guns N Petals",
        "San Francisco",
        "CA",
        "326-123-5000",
        &["Rock n Roll"],
        Some("Looking for shows to perform at in the San Francisco Bay Area!"),
    ))?;
    let matt_quevedo = store.create_artist(&sample_artist(
        "Matt Quevedo",
        "New York",
        "NY",
        "300-400-5005",
        &["Jazz"],
        None,
    ))?;
    let wild_sax = store.create_artist(&sample_artist(
        "The Wild Sax Band",
        "San Francisco",
        "CA",
        "432-325-5432",
        &["Jazz", "Classical"],
        None,
    ))?;

    let bookings = [
        (guns_n_petals.id, musical_hop.id, now - Duration::days(30)),
        (matt_quevedo.id, park_square.id, now - Duration::days(12)),
        (wild_sax.id, park_square.id, now + Duration::days(10)),
        (guns_n_petals.id, park_square.id, now + Duration::days(24)),
    ];
    for (artist_id, venue_id, start_time) in bookings {
        store.create_show(&Show {
            artist_id,
            venue_id,
            start_time,
        })?;
    }

    info!("seeded demo venues, artists and shows");
    Ok(true)
}

fn sample_venue(
    name: &str,
    address: &str,
    city: &str,
    state: &str,
    phone: &str,
    genres: &[&str],
    seeking: Option<&str>,
) -> VenueFields {
    VenueFields {
        name: name.to_string(),
        address: address.to_string(),
        city: city.to_string(),
        state: state.to_string(),
        phone: phone.to_string(),
        genres: genres.iter().copied().collect::<Genres>(),
        image_link: None,
        website_link: None,
        facebook_link: None,
        is_looking_talent: seeking.is_some(),
        seeking_description: seeking.map(str::to_string),
    }
}

fn sample_artist(
    name: &str,
    city: &str,
    state: &str,
    phone: &str,
    genres: &[&str],
    seeking: Option<&str>,
) -> ArtistFields {
    ArtistFields {
        name: name.to_string(),
        city: city.to_string(),
        state: state.to_string(),
        phone: phone.to_string(),
        genres: genres.iter().copied().collect::<Genres>(),
        image_link: None,
        website_link: None,
        facebook_link: None,
        is_looking_venues: seeking.is_some(),
        seeking_description: seeking.map(str::to_string),
    }
}
