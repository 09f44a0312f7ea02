use rusqlite::ffi;
use thiserror::Error;

pub type Result<T, E = StoreError> = std::result::Result<T, E>;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: i64 },

    #[error("no show for artist {artist_id} at venue {venue_id}")]
    ShowNotFound { artist_id: i64, venue_id: i64 },

    #[error("referential integrity violated: {0}")]
    Referential(String),

    #[error("show already booked for artist {artist_id} at venue {venue_id}")]
    DuplicateKey { artist_id: i64, venue_id: i64 },

    #[error("invalid field: {0}")]
    Validation(String),

    #[error(transparent)]
    Sql(#[from] rusqlite::Error),
}

impl StoreError {
    pub fn not_found(entity: &'static str, id: i64) -> Self {
        Self::NotFound { entity, id }
    }

    /// Translates SQLite constraint failures into the typed kinds, leaving
    /// everything else as `Sql`.
    pub(crate) fn from_constraint(err: rusqlite::Error, artist_id: i64, venue_id: i64) -> Self {
        let extended = match &err {
            rusqlite::Error::SqliteFailure(failure, _)
                if failure.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                failure.extended_code
            }
            _ => return Self::Sql(err),
        };
        match extended {
            ffi::SQLITE_CONSTRAINT_PRIMARYKEY | ffi::SQLITE_CONSTRAINT_UNIQUE => {
                Self::DuplicateKey {
                    artist_id,
                    venue_id,
                }
            }
            ffi::SQLITE_CONSTRAINT_FOREIGNKEY => Self::Referential(format!(
                "show references artist {artist_id} and venue {venue_id}"
            )),
            ffi::SQLITE_CONSTRAINT_NOTNULL => Self::Validation(err.to_string()),
            _ => Self::Sql(err),
        }
    }
}
