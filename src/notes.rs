//! Notes, the only entity of the service

use core::fmt;
use core::str::FromStr;

use chrono::naive::NaiveDateTime;
use uuid::Uuid;

/// Literal cursor value asking for the first page of a listing
pub const START_CURSOR: &str = "start";

/// A single note
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Note {
    /// Note ID, assigned by the storage on creation
    pub id: Uuid,

    /// Title of the note
    pub title: String,

    /// Content of the note
    ///
    /// Can be anything, including empty
    pub content: String,

    /// Creation date
    ///
    /// Ordering key for listings, never shown to callers
    pub created_at: NaiveDateTime,
}

/// Position to resume a listing from
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cursor {
    /// Start from the oldest note
    Start,

    /// Continue with the notes created after the note with this ID
    After(Uuid),
}

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Cursor::Start => f.write_str(START_CURSOR),
            Cursor::After(id) => write!(f, "{id}"),
        }
    }
}

impl FromStr for Cursor {
    type Err = uuid::Error;

    fn from_str(cursor: &str) -> Result<Self, Self::Err> {
        if cursor == START_CURSOR {
            return Ok(Cursor::Start);
        }

        Uuid::parse_str(cursor).map(Cursor::After)
    }
}

/// A single page of a notes listing
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Page {
    /// Notes in ascending creation order
    pub notes: Vec<Note>,

    /// Cursor for the next page, `None` when the listing is exhausted
    pub next_cursor: Option<Uuid>,
}

impl Page {
    /// Build a page out of at most `limit + 1` rows
    ///
    /// The extra row only signals that more notes exist; it is dropped and the
    /// last retained note becomes the cursor for the next page.
    pub fn from_overfetched(mut notes: Vec<Note>, limit: usize) -> Self {
        if notes.len() > limit {
            notes.truncate(limit);

            let next_cursor = notes.last().map(|note| note.id);

            Self { notes, next_cursor }
        } else {
            Self {
                notes,
                next_cursor: None,
            }
        }
    }
}
