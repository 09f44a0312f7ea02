//! Page-shaped, read-only views assembled from store queries.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::db::Store;
use crate::error::Result;
use crate::models::{Artist, ShowDetails, ShowListing, ShowOwner, Venue};

#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct VenueSummary {
    pub id: i64,
    pub name: String,
    pub num_upcoming_shows: i64,
}

#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct ArtistSummary {
    pub id: i64,
    pub name: String,
    pub num_upcoming_shows: i64,
}

#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct VenueArea {
    pub city: String,
    pub state: String,
    pub venues: Vec<VenueSummary>,
}

#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct SearchResults<T> {
    pub count: usize,
    pub data: Vec<T>,
}

impl<T> From<Vec<T>> for SearchResults<T> {
    fn from(data: Vec<T>) -> Self {
        Self {
            count: data.len(),
            data,
        }
    }
}

#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct VenueShow {
    pub artist_id: i64,
    pub artist_name: String,
    pub artist_image_link: Option<String>,
    pub start_time: DateTime<Utc>,
}

impl From<ShowListing> for VenueShow {
    fn from(listing: ShowListing) -> Self {
        Self {
            artist_id: listing.counterpart_id,
            artist_name: listing.counterpart_name,
            artist_image_link: listing.counterpart_image_link,
            start_time: listing.start_time,
        }
    }
}

#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct ArtistShow {
    pub venue_id: i64,
    pub venue_name: String,
    pub venue_image_link: Option<String>,
    pub start_time: DateTime<Utc>,
}

impl From<ShowListing> for ArtistShow {
    fn from(listing: ShowListing) -> Self {
        Self {
            venue_id: listing.counterpart_id,
            venue_name: listing.counterpart_name,
            venue_image_link: listing.counterpart_image_link,
            start_time: listing.start_time,
        }
    }
}

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct VenueDetail {
    pub id: i64,
    pub name: String,
    pub genres: Vec<String>,
    pub address: String,
    pub city: String,
    pub state: String,
    pub phone: String,
    pub website: Option<String>,
    pub facebook_link: Option<String>,
    pub seeking_talent: bool,
    pub seeking_description: Option<String>,
    pub image_link: String,
    pub past_shows: Vec<VenueShow>,
    pub upcoming_shows: Vec<VenueShow>,
    pub past_shows_count: usize,
    pub upcoming_shows_count: usize,
}

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct ArtistDetail {
    pub id: i64,
    pub name: String,
    pub genres: Vec<String>,
    pub city: String,
    pub state: String,
    pub phone: String,
    pub website: Option<String>,
    pub facebook_link: Option<String>,
    pub seeking_venue: bool,
    pub seeking_description: Option<String>,
    pub image_link: Option<String>,
    pub past_shows: Vec<ArtistShow>,
    pub upcoming_shows: Vec<ArtistShow>,
    pub past_shows_count: usize,
    pub upcoming_shows_count: usize,
}

#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct ArtistEntry {
    pub id: i64,
    pub name: String,
}

/// Venues grouped by city and state, each with its upcoming show count.
pub fn venue_directory(store: &Store, now: DateTime<Utc>) -> Result<Vec<VenueArea>> {
    store
        .group_venues_by_city_state()?
        .into_iter()
        .map(|group| {
            let venues = group
                .venues
                .iter()
                .map(|venue| venue_summary(store, venue, now))
                .collect::<Result<Vec<_>>>()?;
            Ok(VenueArea {
                city: group.city,
                state: group.state,
                venues,
            })
        })
        .collect()
}

pub fn search_venues(
    store: &Store,
    term: &str,
    now: DateTime<Utc>,
) -> Result<SearchResults<VenueSummary>> {
    let hits = store
        .search_venues(term)?
        .iter()
        .map(|venue| venue_summary(store, venue, now))
        .collect::<Result<Vec<_>>>()?;
    Ok(hits.into())
}

pub fn search_artists(
    store: &Store,
    term: &str,
    now: DateTime<Utc>,
) -> Result<SearchResults<ArtistSummary>> {
    let hits = store
        .search_artists(term)?
        .iter()
        .map(|artist| {
            Ok(ArtistSummary {
                id: artist.id,
                name: artist.name.clone(),
                num_upcoming_shows: store
                    .count_upcoming_shows(ShowOwner::Artist(artist.id), now)?,
            })
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(hits.into())
}

pub fn artist_list(store: &Store) -> Result<Vec<ArtistEntry>> {
    Ok(store
        .list_artists()?
        .into_iter()
        .map(|artist| ArtistEntry {
            id: artist.id,
            name: artist.name,
        })
        .collect())
}

pub fn show_board(store: &Store) -> Result<Vec<ShowDetails>> {
    store.list_shows()
}

pub fn venue_detail(store: &Store, id: i64, now: DateTime<Utc>) -> Result<VenueDetail> {
    let venue = store.find_venue(id)?;
    let shows = store.partition_shows(ShowOwner::Venue(id), now)?;
    let past_shows: Vec<VenueShow> = shows.past.into_iter().map(Into::into).collect();
    let upcoming_shows: Vec<VenueShow> = shows.upcoming.into_iter().map(Into::into).collect();

    let Venue {
        id,
        name,
        address,
        city,
        state,
        phone,
        genres,
        image_link,
        website_link,
        facebook_link,
        is_looking_talent,
        seeking_description,
    } = venue;

    Ok(VenueDetail {
        id,
        name,
        genres: genres.into_vec(),
        address,
        city,
        state,
        phone,
        website: website_link,
        facebook_link,
        seeking_talent: is_looking_talent,
        seeking_description,
        image_link: image_link.unwrap_or_default(),
        past_shows_count: past_shows.len(),
        upcoming_shows_count: upcoming_shows.len(),
        past_shows,
        upcoming_shows,
    })
}

pub fn artist_detail(store: &Store, id: i64, now: DateTime<Utc>) -> Result<ArtistDetail> {
    let artist = store.find_artist(id)?;
    let shows = store.partition_shows(ShowOwner::Artist(id), now)?;
    let past_shows: Vec<ArtistShow> = shows.past.into_iter().map(Into::into).collect();
    let upcoming_shows: Vec<ArtistShow> = shows.upcoming.into_iter().map(Into::into).collect();

    let Artist {
        id,
        name,
        city,
        state,
        phone,
        genres,
        image_link,
        website_link,
        facebook_link,
        is_looking_venues,
        seeking_description,
    } = artist;

    Ok(ArtistDetail {
        id,
        name,
        genres: genres.into_vec(),
        city,
        state,
        phone,
        website: website_link,
        facebook_link,
        seeking_venue: is_looking_venues,
        seeking_description,
        image_link,
        past_shows_count: past_shows.len(),
        upcoming_shows_count: upcoming_shows.len(),
        past_shows,
        upcoming_shows,
    })
}

fn venue_summary(store: &Store, venue: &Venue, now: DateTime<Utc>) -> Result<VenueSummary> {
    Ok(VenueSummary {
        id: venue.id,
        name: venue.name.clone(),
        num_upcoming_shows: store.count_upcoming_shows(ShowOwner::Venue(venue.id), now)?,
    })
}
