use rusqlite::types::{FromSql, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};

/// Column delimiter. Tags containing it do not survive a round trip.
pub const DELIMITER: char = ',';

/// Ordered list of genre tags. Only the SQLite edge sees the joined form.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(transparent)]
pub struct Genres(Vec<String>);

impl Genres {
    pub fn new<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(tags.into_iter().map(Into::into).collect())
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<String> {
        self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn to_column(&self) -> String {
        self.0.join(&DELIMITER.to_string())
    }

    pub fn from_column(raw: &str) -> Self {
        if raw.is_empty() {
            return Self::default();
        }
        Self(raw.split(DELIMITER).map(str::to_string).collect())
    }
}

impl<S: Into<String>> FromIterator<S> for Genres {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter)
    }
}

impl ToSql for Genres {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.to_column()))
    }
}

impl FromSql for Genres {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match value {
            ValueRef::Null => Ok(Self::default()),
            other => other.as_str().map(Self::from_column),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_in_order() {
        let genres = Genres::new(["Jazz", "Reggae", "Swing"]);
        assert_eq!(genres.to_column(), "Jazz,Reggae,Swing");
    }

    #[test]
    fn splits_without_trimming() {
        let genres = Genres::from_column("Rock n Roll, Folk");
        assert_eq!(genres.as_slice(), ["Rock n Roll", " Folk"]);
    }

    #[test]
    fn empty_column_is_empty_list() {
        assert!(Genres::from_column("").is_empty());
        assert_eq!(Genres::default().to_column(), "");
    }

    #[test]
    fn embedded_delimiter_is_not_escaped() {
        let genres = Genres::new(["Hip-Hop, Rap"]);
        let back = Genres::from_column(&genres.to_column());
        assert_eq!(back.as_slice(), ["Hip-Hop", " Rap"]);
    }
}
