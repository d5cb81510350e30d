//! String-keyed storage slots.
//!
//! # Invariants
//! - One value per key; writes replace the previous value.
//! - Values are opaque strings; JSON encoding is the caller's concern.

use crate::db::DbError;
use crate::model::quote::QuoteValidationError;
use log::debug;
use rusqlite::{params, Connection, OptionalExtension};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Durable slot holding the JSON-serialized quote list.
pub const QUOTES_SLOT: &str = "quotes";
/// Durable slot holding the last selected list filter.
pub const SELECTED_CATEGORY_SLOT: &str = "selectedCategory";
/// Session slot holding the JSON-serialized last displayed quote.
pub const LAST_VIEWED_QUOTE_SLOT: &str = "lastViewedQuote";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for slot storage and quote mutations.
#[derive(Debug)]
pub enum RepoError {
    Validation(QuoteValidationError),
    Db(DbError),
    InvalidData(String),
    NotASequence,
    Io(std::io::Error),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid quote data: {message}"),
            Self::NotASequence => write!(f, "import payload must be a JSON array of quotes"),
            Self::Io(err) => write!(f, "quote file error: {err}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::Io(err) => Some(err),
            Self::InvalidData(_) | Self::NotASequence => None,
        }
    }
}

impl From<QuoteValidationError> for RepoError {
    fn from(value: QuoteValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<std::io::Error> for RepoError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Key/value storage contract shared by durable and session stores.
pub trait SlotStore {
    fn get_slot(&self, key: &str) -> RepoResult<Option<String>>;
    fn set_slot(&self, key: &str, value: &str) -> RepoResult<()>;
}

/// SQLite-backed slot store.
///
/// Durable when built over [`crate::db::open_db`], session-scoped when built
/// over [`crate::db::open_db_in_memory`].
pub struct SqliteSlotStore {
    conn: Connection,
}

impl SqliteSlotStore {
    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }
}

impl SlotStore for SqliteSlotStore {
    fn get_slot(&self, key: &str) -> RepoResult<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM storage_slots WHERE key = ?1;",
                [key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set_slot(&self, key: &str, value: &str) -> RepoResult<()> {
        self.conn.execute(
            "INSERT INTO storage_slots (key, value, updated_at)
             VALUES (?1, ?2, strftime('%s', 'now') * 1000)
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at;",
            params![key, value],
        )?;
        debug!(
            "event=slot_write module=repo status=ok key={key} bytes={}",
            value.len()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{SlotStore, SqliteSlotStore};
    use crate::db::open_db_in_memory;

    #[test]
    fn missing_slot_reads_as_none() {
        let store = SqliteSlotStore::new(open_db_in_memory().unwrap());
        assert_eq!(store.get_slot("quotes").unwrap(), None);
    }

    #[test]
    fn set_slot_replaces_previous_value() {
        let store = SqliteSlotStore::new(open_db_in_memory().unwrap());
        store.set_slot("selectedCategory", "Life").unwrap();
        store.set_slot("selectedCategory", "Success").unwrap();
        assert_eq!(
            store.get_slot("selectedCategory").unwrap().as_deref(),
            Some("Success")
        );
    }
}
