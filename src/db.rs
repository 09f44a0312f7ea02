use std::{collections::HashMap, path::Path, time::Duration};

use chrono::{DateTime, Datelike, SecondsFormat, Utc};
use log::{debug, trace};
use rusqlite::{functions::FunctionFlags, params, Connection, OptionalExtension, Row};
use serde::{Deserialize, Serialize};

use crate::error::{Result, StoreError};
use crate::models::{
    Artist, ArtistFields, CityStateGroup, Show, ShowDetails, ShowListing, ShowOwner,
    ShowPartition, Venue, VenueFields,
};
use crate::utils;

const VENUE_COLUMNS: &str = "id, name, address, city, state, phone, genres, image_link, \
     website_link, facebook_link, is_looking_talent, seeking_description";

const ARTIST_COLUMNS: &str = "id, name, city, state, phone, genres, image_link, website_link, \
     facebook_link, is_looking_venues, seeking_description";

/// What happens to booked shows when their venue or artist is deleted.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DeletePolicy {
    /// Refuse to delete while any show references the record.
    #[default]
    Restrict,
    /// Delete the dependent shows in the same transaction.
    Cascade,
}

pub struct Store {
    conn: Connection,
    delete_policy: DeletePolicy,
}

impl Store {
    pub fn open(path: &Path) -> Result<Self> {
        utils::ensure_parent(path);
        Self::from_connection(Connection::open(path)?)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        conn.busy_timeout(Duration::from_secs(5))?;
        register_functions(&conn)?;
        let store = Self {
            conn,
            delete_policy: DeletePolicy::default(),
        };
        store.init_schema()?;
        Ok(store)
    }

    pub fn with_delete_policy(mut self, policy: DeletePolicy) -> Self {
        self.delete_policy = policy;
        self
    }

    pub fn delete_policy(&self) -> DeletePolicy {
        self.delete_policy
    }

    fn init_schema(&self) -> rusqlite::Result<()> {
        self.conn.execute_batch(
            "PRAGMA foreign_keys = ON;
            CREATE TABLE IF NOT EXISTS venues(
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                address TEXT NOT NULL,
                city TEXT NOT NULL,
                state TEXT NOT NULL,
                phone TEXT NOT NULL,
                genres TEXT NOT NULL DEFAULT '',
                image_link TEXT,
                website_link TEXT,
                facebook_link TEXT,
                is_looking_talent INTEGER NOT NULL DEFAULT 0,
                seeking_description TEXT
            );
            CREATE TABLE IF NOT EXISTS artists(
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                city TEXT NOT NULL,
                state TEXT NOT NULL,
                phone TEXT NOT NULL,
                genres TEXT NOT NULL DEFAULT '',
                image_link TEXT,
                website_link TEXT,
                facebook_link TEXT,
                is_looking_venues INTEGER NOT NULL DEFAULT 0,
                seeking_description TEXT
            );
            CREATE TABLE IF NOT EXISTS shows(
                artist_id INTEGER NOT NULL REFERENCES artists(id),
                venue_id INTEGER NOT NULL REFERENCES venues(id),
                start_time TEXT NOT NULL,
                PRIMARY KEY (artist_id, venue_id)
            );
            CREATE INDEX IF NOT EXISTS shows_venue_idx ON shows(venue_id);",
        )?;
        debug!("schema ready");
        Ok(())
    }

    // ---- venues ----

    pub fn create_venue(&mut self, fields: &VenueFields) -> Result<Venue> {
        let tx = self.conn.transaction()?;
        tx.execute(
            "INSERT INTO venues (name, address, city, state, phone, genres, image_link,
                website_link, facebook_link, is_looking_talent, seeking_description)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            params![
                fields.name,
                fields.address,
                fields.city,
                fields.state,
                fields.phone,
                fields.genres,
                fields.image_link,
                fields.website_link,
                fields.facebook_link,
                fields.is_looking_talent,
                fields.seeking_description
            ],
        )?;
        let venue = venue_by_id(&tx, tx.last_insert_rowid())?;
        tx.commit()?;
        debug!("created venue {} ({})", venue.id, venue.name);
        Ok(venue)
    }

    pub fn update_venue(&mut self, id: i64, fields: &VenueFields) -> Result<Venue> {
        let tx = self.conn.transaction()?;
        let changed = tx.execute(
            "UPDATE venues SET name = ?2, address = ?3, city = ?4, state = ?5, phone = ?6,
                genres = ?7, image_link = ?8, website_link = ?9, facebook_link = ?10,
                is_looking_talent = ?11, seeking_description = ?12
             WHERE id = ?1",
            params![
                id,
                fields.name,
                fields.address,
                fields.city,
                fields.state,
                fields.phone,
                fields.genres,
                fields.image_link,
                fields.website_link,
                fields.facebook_link,
                fields.is_looking_talent,
                fields.seeking_description
            ],
        )?;
        if changed == 0 {
            return Err(StoreError::not_found("venue", id));
        }
        let venue = venue_by_id(&tx, id)?;
        tx.commit()?;
        debug!("updated venue {id}");
        Ok(venue)
    }

    /// Removes a venue under the store's [`DeletePolicy`]. Returns the number
    /// of shows removed along with it.
    pub fn delete_venue(&mut self, id: i64) -> Result<usize> {
        self.delete_owner(ShowOwner::Venue(id))
    }

    pub fn find_venue(&self, id: i64) -> Result<Venue> {
        venue_by_id(&self.conn, id)
    }

    pub fn list_venues(&self) -> Result<Vec<Venue>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {VENUE_COLUMNS} FROM venues ORDER BY id"))?;
        let rows = stmt.query_map([], venue_from_row)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    /// Case-insensitive substring search on the name. An empty term matches
    /// every venue.
    pub fn search_venues(&self, text: &str) -> Result<Vec<Venue>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {VENUE_COLUMNS} FROM venues
             WHERE fyyur_fold(name) LIKE '%' || fyyur_fold(?1) || '%' ESCAPE '\\'
             ORDER BY id"
        ))?;
        let rows = stmt.query_map(params![escape_like(text)], venue_from_row)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    /// Groups venues by exact (city, state). Groups keep the order in which
    /// their first venue was created.
    pub fn group_venues_by_city_state(&self) -> Result<Vec<CityStateGroup>> {
        let mut groups: Vec<CityStateGroup> = Vec::new();
        let mut index: HashMap<(String, String), usize> = HashMap::new();

        for venue in self.list_venues()? {
            let key = (venue.city.clone(), venue.state.clone());
            match index.get(&key) {
                Some(&slot) => groups[slot].venues.push(venue),
                None => {
                    index.insert(key, groups.len());
                    groups.push(CityStateGroup {
                        city: venue.city.clone(),
                        state: venue.state.clone(),
                        venues: vec![venue],
                    });
                }
            }
        }

        Ok(groups)
    }

    // ---- artists ----

    pub fn create_artist(&mut self, fields: &ArtistFields) -> Result<Artist> {
        let tx = self.conn.transaction()?;
        tx.execute(
            "INSERT INTO artists (name, city, state, phone, genres, image_link, website_link,
                facebook_link, is_looking_venues, seeking_description)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                fields.name,
                fields.city,
                fields.state,
                fields.phone,
                fields.genres,
                fields.image_link,
                fields.website_link,
                fields.facebook_link,
                fields.is_looking_venues,
                fields.seeking_description
            ],
        )?;
        let artist = artist_by_id(&tx, tx.last_insert_rowid())?;
        tx.commit()?;
        debug!("created artist {} ({})", artist.id, artist.name);
        Ok(artist)
    }

    pub fn update_artist(&mut self, id: i64, fields: &ArtistFields) -> Result<Artist> {
        let tx = self.conn.transaction()?;
        let changed = tx.execute(
            "UPDATE artists SET name = ?2, city = ?3, state = ?4, phone = ?5, genres = ?6,
                image_link = ?7, website_link = ?8, facebook_link = ?9,
                is_looking_venues = ?10, seeking_description = ?11
             WHERE id = ?1",
            params![
                id,
                fields.name,
                fields.city,
                fields.state,
                fields.phone,
                fields.genres,
                fields.image_link,
                fields.website_link,
                fields.facebook_link,
                fields.is_looking_venues,
                fields.seeking_description
            ],
        )?;
        if changed == 0 {
            return Err(StoreError::not_found("artist", id));
        }
        let artist = artist_by_id(&tx, id)?;
        tx.commit()?;
        debug!("updated artist {id}");
        Ok(artist)
    }

    pub fn delete_artist(&mut self, id: i64) -> Result<usize> {
        self.delete_owner(ShowOwner::Artist(id))
    }

    pub fn find_artist(&self, id: i64) -> Result<Artist> {
        artist_by_id(&self.conn, id)
    }

    pub fn list_artists(&self) -> Result<Vec<Artist>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {ARTIST_COLUMNS} FROM artists ORDER BY id"))?;
        let rows = stmt.query_map([], artist_from_row)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    pub fn search_artists(&self, text: &str) -> Result<Vec<Artist>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {ARTIST_COLUMNS} FROM artists
             WHERE fyyur_fold(name) LIKE '%' || fyyur_fold(?1) || '%' ESCAPE '\\'
             ORDER BY id"
        ))?;
        let rows = stmt.query_map(params![escape_like(text)], artist_from_row)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    // ---- shows ----

    pub fn create_show(&mut self, show: &Show) -> Result<Show> {
        let start_time = encode_time(&show.start_time)?;
        let tx = self.conn.transaction()?;
        for owner in [
            ShowOwner::Artist(show.artist_id),
            ShowOwner::Venue(show.venue_id),
        ] {
            if !owner_exists(&tx, owner)? {
                return Err(StoreError::Referential(format!(
                    "{} {} does not exist",
                    owner.entity(),
                    owner.id()
                )));
            }
        }
        tx.execute(
            "INSERT INTO shows (artist_id, venue_id, start_time) VALUES (?1, ?2, ?3)",
            params![show.artist_id, show.venue_id, start_time],
        )
        .map_err(|err| StoreError::from_constraint(err, show.artist_id, show.venue_id))?;
        let stored = show_by_key(&tx, show.artist_id, show.venue_id)?;
        tx.commit()?;
        debug!(
            "booked artist {} at venue {} for {}",
            stored.artist_id, stored.venue_id, stored.start_time
        );
        Ok(stored)
    }

    pub fn find_show(&self, artist_id: i64, venue_id: i64) -> Result<Show> {
        show_by_key(&self.conn, artist_id, venue_id)
    }

    pub fn count_shows(&self) -> Result<i64> {
        let count = self
            .conn
            .query_row("SELECT COUNT(*) FROM shows", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Every show joined with its venue and artist, earliest first.
    pub fn list_shows(&self) -> Result<Vec<ShowDetails>> {
        let mut stmt = self.conn.prepare(
            "SELECT s.venue_id, v.name, s.artist_id, a.name, a.image_link, s.start_time
             FROM shows s
             JOIN venues v ON v.id = s.venue_id
             JOIN artists a ON a.id = s.artist_id
             ORDER BY s.start_time, s.venue_id, s.artist_id",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(ShowDetails {
                venue_id: row.get(0)?,
                venue_name: row.get(1)?,
                artist_id: row.get(2)?,
                artist_name: row.get(3)?,
                artist_image_link: row.get(4)?,
                start_time: time_column(row, 5)?,
            })
        })?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    /// Splits the owner's shows around `reference`. Shows starting exactly at
    /// `reference` are in neither half.
    pub fn partition_shows(
        &self,
        owner: ShowOwner,
        reference: DateTime<Utc>,
    ) -> Result<ShowPartition> {
        self.require_owner(owner)?;

        let (counterpart_table, join_column, anchor_column) = match owner {
            ShowOwner::Venue(_) => ("artists", "artist_id", "venue_id"),
            ShowOwner::Artist(_) => ("venues", "venue_id", "artist_id"),
        };
        let mut stmt = self.conn.prepare(&format!(
            "SELECT c.id, c.name, c.image_link, s.start_time, s.start_time > ?2
             FROM shows s
             JOIN {counterpart_table} c ON c.id = s.{join_column}
             WHERE s.{anchor_column} = ?1 AND s.start_time <> ?2
             ORDER BY s.start_time, c.id"
        ))?;
        let rows = stmt.query_map(params![owner.id(), encode_time(&reference)?], |row| {
            let listing = ShowListing {
                counterpart_id: row.get(0)?,
                counterpart_name: row.get(1)?,
                counterpart_image_link: row.get(2)?,
                start_time: time_column(row, 3)?,
            };
            let upcoming: bool = row.get(4)?;
            Ok((upcoming, listing))
        })?;

        let mut partition = ShowPartition::default();
        for row in rows {
            match row? {
                (true, listing) => partition.upcoming.push(listing),
                (false, listing) => partition.past.push(listing),
            }
        }
        trace!(
            "{} {}: {} upcoming, {} past",
            owner.entity(),
            owner.id(),
            partition.upcoming.len(),
            partition.past.len()
        );
        Ok(partition)
    }

    pub fn count_upcoming_shows(&self, owner: ShowOwner, reference: DateTime<Utc>) -> Result<i64> {
        self.require_owner(owner)?;
        let count = self.conn.query_row(
            &format!(
                "SELECT COUNT(*) FROM shows WHERE {} = ?1 AND start_time > ?2",
                owner_column(owner)
            ),
            params![owner.id(), encode_time(&reference)?],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    fn require_owner(&self, owner: ShowOwner) -> Result<()> {
        if owner_exists(&self.conn, owner)? {
            Ok(())
        } else {
            Err(StoreError::not_found(owner.entity(), owner.id()))
        }
    }

    fn delete_owner(&mut self, owner: ShowOwner) -> Result<usize> {
        let tx = self.conn.transaction()?;
        if !owner_exists(&tx, owner)? {
            return Err(StoreError::not_found(owner.entity(), owner.id()));
        }

        let column = owner_column(owner);
        let booked: i64 = tx.query_row(
            &format!("SELECT COUNT(*) FROM shows WHERE {column} = ?1"),
            params![owner.id()],
            |row| row.get(0),
        )?;

        let removed = match (self.delete_policy, booked) {
            (_, 0) => 0,
            (DeletePolicy::Restrict, n) => {
                return Err(StoreError::Referential(format!(
                    "{} {} still has {n} booked show(s)",
                    owner.entity(),
                    owner.id()
                )));
            }
            (DeletePolicy::Cascade, _) => tx.execute(
                &format!("DELETE FROM shows WHERE {column} = ?1"),
                params![owner.id()],
            )?,
        };

        tx.execute(
            &format!("DELETE FROM {} WHERE id = ?1", owner_table(owner)),
            params![owner.id()],
        )?;
        tx.commit()?;
        debug!(
            "deleted {} {} with {removed} show(s)",
            owner.entity(),
            owner.id()
        );
        Ok(removed)
    }
}

/// Fixed-width UTC text with nanoseconds, so SQLite string comparison
/// matches time order exactly.
/// Years outside 0..=9999 would break the fixed width and are rejected.
pub(crate) fn encode_time(time: &DateTime<Utc>) -> Result<String> {
    if !(0..=9999).contains(&time.year()) {
        return Err(StoreError::Validation(format!(
            "timestamp out of range: {time}"
        )));
    }
    Ok(time.to_rfc3339_opts(SecondsFormat::Nanos, true))
}

fn time_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let raw: String = row.get(idx)?;
    DateTime::parse_from_rfc3339(&raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|err| {
            rusqlite::Error::FromSqlConversionFailure(
                idx,
                rusqlite::types::Type::Text,
                Box::new(err),
            )
        })
}

/// `fyyur_fold(text)`: Unicode lowercase, since SQLite's own `LIKE` and
/// `lower()` only fold ASCII.
fn register_functions(conn: &Connection) -> rusqlite::Result<()> {
    conn.create_scalar_function(
        "fyyur_fold",
        1,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        |ctx| {
            let text: Option<String> = ctx.get(0)?;
            Ok(text.map(|text| text.to_lowercase()))
        },
    )
}

fn escape_like(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}

fn owner_table(owner: ShowOwner) -> &'static str {
    match owner {
        ShowOwner::Artist(_) => "artists",
        ShowOwner::Venue(_) => "venues",
    }
}

fn owner_column(owner: ShowOwner) -> &'static str {
    match owner {
        ShowOwner::Artist(_) => "artist_id",
        ShowOwner::Venue(_) => "venue_id",
    }
}

fn owner_exists(conn: &Connection, owner: ShowOwner) -> rusqlite::Result<bool> {
    conn.query_row(
        &format!(
            "SELECT EXISTS(SELECT 1 FROM {} WHERE id = ?1)",
            owner_table(owner)
        ),
        params![owner.id()],
        |row| row.get(0),
    )
}

fn venue_by_id(conn: &Connection, id: i64) -> Result<Venue> {
    conn.query_row(
        &format!("SELECT {VENUE_COLUMNS} FROM venues WHERE id = ?1"),
        params![id],
        venue_from_row,
    )
    .optional()?
    .ok_or_else(|| StoreError::not_found("venue", id))
}

fn artist_by_id(conn: &Connection, id: i64) -> Result<Artist> {
    conn.query_row(
        &format!("SELECT {ARTIST_COLUMNS} FROM artists WHERE id = ?1"),
        params![id],
        artist_from_row,
    )
    .optional()?
    .ok_or_else(|| StoreError::not_found("artist", id))
}

fn show_by_key(conn: &Connection, artist_id: i64, venue_id: i64) -> Result<Show> {
    conn.query_row(
        "SELECT artist_id, venue_id, start_time FROM shows
         WHERE artist_id = ?1 AND venue_id = ?2",
        params![artist_id, venue_id],
        |row| {
            Ok(Show {
                artist_id: row.get(0)?,
                venue_id: row.get(1)?,
                start_time: time_column(row, 2)?,
            })
        },
    )
    .optional()?
    .ok_or(StoreError::ShowNotFound {
        artist_id,
        venue_id,
    })
}

fn venue_from_row(row: &Row<'_>) -> rusqlite::Result<Venue> {
    Ok(Venue {
        id: row.get(0)?,
        name: row.get(1)?,
        address: row.get(2)?,
        city: row.get(3)?,
        state: row.get(4)?,
        phone: row.get(5)?,
        genres: row.get(6)?,
        image_link: row.get(7)?,
        website_link: row.get(8)?,
        facebook_link: row.get(9)?,
        is_looking_talent: row.get(10)?,
        seeking_description: row.get(11)?,
    })
}

fn artist_from_row(row: &Row<'_>) -> rusqlite::Result<Artist> {
    Ok(Artist {
        id: row.get(0)?,
        name: row.get(1)?,
        city: row.get(2)?,
        state: row.get(3)?,
        phone: row.get(4)?,
        genres: row.get(5)?,
        image_link: row.get(6)?,
        website_link: row.get(7)?,
        facebook_link: row.get(8)?,
        is_looking_venues: row.get(9)?,
        seeking_description: row.get(10)?,
    })
}
