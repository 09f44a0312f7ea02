//! Form-shaped values exchanged with the presentation layer.
//!
//! Edit forms are built from stored records as read-only copies and turned
//! back into write payloads only after the submitted values pass validation.
//! The store itself never runs these checks.

use chrono::{DateTime, NaiveDateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{Result, StoreError};
use crate::genres::Genres;
use crate::models::{Artist, ArtistFields, Show, Venue, VenueFields};

static NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z]{2,25}( [A-Za-z]{2,25})?$").expect("valid name regex"));

/// One or two words of 2 to 25 ASCII letters each.
pub fn validate_name(name: &str) -> Result<()> {
    if NAME_RE.is_match(name) {
        Ok(())
    } else {
        Err(StoreError::Validation(format!(
            "name format is not correct: {name:?}"
        )))
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default)]
pub struct VenueForm {
    pub name: String,
    pub genres: Vec<String>,
    pub address: String,
    pub city: String,
    pub state: String,
    pub phone: String,
    pub image_link: Option<String>,
    pub website_link: Option<String>,
    pub facebook_link: Option<String>,
    pub seeking_talent: bool,
    pub seeking_description: Option<String>,
}

impl From<&Venue> for VenueForm {
    fn from(venue: &Venue) -> Self {
        Self {
            name: venue.name.clone(),
            genres: venue.genres.as_slice().to_vec(),
            address: venue.address.clone(),
            city: venue.city.clone(),
            state: venue.state.clone(),
            phone: venue.phone.clone(),
            image_link: venue.image_link.clone(),
            website_link: venue.website_link.clone(),
            facebook_link: venue.facebook_link.clone(),
            seeking_talent: venue.is_looking_talent,
            seeking_description: venue.seeking_description.clone(),
        }
    }
}

impl VenueForm {
    pub fn into_fields(self) -> Result<VenueFields> {
        validate_name(&self.name)?;
        Ok(VenueFields {
            name: self.name,
            address: self.address,
            city: self.city,
            state: self.state,
            phone: self.phone,
            genres: Genres::new(self.genres),
            image_link: self.image_link,
            website_link: self.website_link,
            facebook_link: self.facebook_link,
            is_looking_talent: self.seeking_talent,
            seeking_description: self.seeking_description,
        })
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default)]
pub struct ArtistForm {
    pub name: String,
    pub genres: Vec<String>,
    pub city: String,
    pub state: String,
    pub phone: String,
    pub image_link: Option<String>,
    pub website_link: Option<String>,
    pub facebook_link: Option<String>,
    pub seeking_venue: bool,
    pub seeking_description: Option<String>,
}

impl From<&Artist> for ArtistForm {
    fn from(artist: &Artist) -> Self {
        Self {
            name: artist.name.clone(),
            genres: artist.genres.as_slice().to_vec(),
            city: artist.city.clone(),
            state: artist.state.clone(),
            phone: artist.phone.clone(),
            image_link: artist.image_link.clone(),
            website_link: artist.website_link.clone(),
            facebook_link: artist.facebook_link.clone(),
            seeking_venue: artist.is_looking_venues,
            seeking_description: artist.seeking_description.clone(),
        }
    }
}

impl ArtistForm {
    pub fn into_fields(self) -> Result<ArtistFields> {
        validate_name(&self.name)?;
        Ok(ArtistFields {
            name: self.name,
            city: self.city,
            state: self.state,
            phone: self.phone,
            genres: Genres::new(self.genres),
            image_link: self.image_link,
            website_link: self.website_link,
            facebook_link: self.facebook_link,
            is_looking_venues: self.seeking_venue,
            seeking_description: self.seeking_description,
        })
    }
}

/// Raw booking form, every field as submitted.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(default)]
pub struct ShowForm {
    pub artist_id: String,
    pub venue_id: String,
    pub start_time: String,
}

impl ShowForm {
    pub fn parse(&self) -> Result<Show> {
        Ok(Show {
            artist_id: parse_id("artist_id", &self.artist_id)?,
            venue_id: parse_id("venue_id", &self.venue_id)?,
            start_time: parse_start_time(&self.start_time)?,
        })
    }
}

fn parse_id(field: &str, raw: &str) -> Result<i64> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(StoreError::Validation(format!("{field} is required")));
    }
    raw.parse()
        .map_err(|_| StoreError::Validation(format!("{field} is not a number: {raw:?}")))
}

/// Accepts RFC 3339, or `YYYY-MM-DD HH:MM[:SS]` read as UTC.
pub fn parse_start_time(raw: &str) -> Result<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(StoreError::Validation("start_time is required".into()));
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }
    ["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
        .ok_or_else(|| StoreError::Validation(format!("start_time is not a timestamp: {raw:?}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn name_format() {
        assert!(validate_name("Musical Hop").is_ok());
        assert!(validate_name("Hop").is_ok());
        assert!(matches!(
            validate_name("The Musical Hop"),
            Err(StoreError::Validation(_))
        ));
        assert!(validate_name("A").is_err());
        assert!(validate_name("Guns N Petals").is_err());
        assert!(validate_name("").is_err());
    }

    #[test]
    fn show_form_parses_both_time_formats() {
        let form = ShowForm {
            artist_id: " 4 ".into(),
            venue_id: "1".into(),
            start_time: "2035-04-01 20:00:00".into(),
        };
        let show = form.parse().unwrap();
        assert_eq!(show.artist_id, 4);
        assert_eq!(show.venue_id, 1);
        assert_eq!(
            show.start_time,
            Utc.with_ymd_and_hms(2035, 4, 1, 20, 0, 0).unwrap()
        );

        let rfc = parse_start_time("2035-04-01T22:00:00+02:00").unwrap();
        assert_eq!(rfc, show.start_time);
    }

    #[test]
    fn show_form_rejects_missing_start_time() {
        let form = ShowForm {
            artist_id: "1".into(),
            venue_id: "1".into(),
            start_time: "  ".into(),
        };
        assert!(matches!(form.parse(), Err(StoreError::Validation(_))));
    }

    #[test]
    fn show_form_rejects_bad_ids() {
        let form = ShowForm {
            artist_id: "one".into(),
            venue_id: "".into(),
            start_time: "2035-04-01 20:00".into(),
        };
        assert!(matches!(form.parse(), Err(StoreError::Validation(msg)) if msg.contains("artist_id")));
    }

    #[test]
    fn venue_form_round_trip_keeps_genres() {
        let venue = Venue {
            id: 7,
            name: "Musical Hop".into(),
            address: "1015 Folsom Street".into(),
            city: "San Francisco".into(),
            state: "CA".into(),
            phone: "123-123-1234".into(),
            genres: Genres::new(["Jazz", "Folk"]),
            image_link: None,
            website_link: None,
            facebook_link: None,
            is_looking_talent: true,
            seeking_description: Some("Looking for local acts".into()),
        };
        let form = VenueForm::from(&venue);
        assert_eq!(form.genres, ["Jazz", "Folk"]);
        assert!(form.seeking_talent);

        let fields = form.into_fields().unwrap();
        assert_eq!(fields.genres, venue.genres);
        assert_eq!(fields.name, venue.name);
    }
}
