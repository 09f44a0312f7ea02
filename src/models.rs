use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::genres::Genres;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Venue {
    pub id: i64,
    pub name: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub phone: String,
    pub genres: Genres,
    pub image_link: Option<String>,
    pub website_link: Option<String>,
    pub facebook_link: Option<String>,
    pub is_looking_talent: bool,
    pub seeking_description: Option<String>,
}

/// Mutable columns of a venue, used for both insert and update.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default)]
pub struct VenueFields {
    pub name: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub phone: String,
    pub genres: Genres,
    pub image_link: Option<String>,
    pub website_link: Option<String>,
    pub facebook_link: Option<String>,
    pub is_looking_talent: bool,
    pub seeking_description: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Artist {
    pub id: i64,
    pub name: String,
    pub city: String,
    pub state: String,
    pub phone: String,
    pub genres: Genres,
    pub image_link: Option<String>,
    pub website_link: Option<String>,
    pub facebook_link: Option<String>,
    pub is_looking_venues: bool,
    pub seeking_description: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default)]
pub struct ArtistFields {
    pub name: String,
    pub city: String,
    pub state: String,
    pub phone: String,
    pub genres: Genres,
    pub image_link: Option<String>,
    pub website_link: Option<String>,
    pub facebook_link: Option<String>,
    pub is_looking_venues: bool,
    pub seeking_description: Option<String>,
}

/// One booking. Identity is the (artist_id, venue_id) pair.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Show {
    pub artist_id: i64,
    pub venue_id: i64,
    pub start_time: DateTime<Utc>,
}

/// Which side of the show relation a query is anchored on.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum ShowOwner {
    Artist(i64),
    Venue(i64),
}

impl ShowOwner {
    pub fn entity(&self) -> &'static str {
        match self {
            ShowOwner::Artist(_) => "artist",
            ShowOwner::Venue(_) => "venue",
        }
    }

    pub fn id(&self) -> i64 {
        match self {
            ShowOwner::Artist(id) | ShowOwner::Venue(id) => *id,
        }
    }
}

/// A show seen from its owner: the counterpart's id, name and image are
/// already joined in.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ShowListing {
    pub counterpart_id: i64,
    pub counterpart_name: String,
    pub counterpart_image_link: Option<String>,
    pub start_time: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct ShowPartition {
    pub upcoming: Vec<ShowListing>,
    pub past: Vec<ShowListing>,
}

/// A show joined with both of its sides.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ShowDetails {
    pub venue_id: i64,
    pub venue_name: String,
    pub artist_id: i64,
    pub artist_name: String,
    pub artist_image_link: Option<String>,
    pub start_time: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct CityStateGroup {
    pub city: String,
    pub state: String,
    pub venues: Vec<Venue>,
}
