//! All things related to the storage of notes

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::notes::Cursor;
use crate::notes::Note;
use crate::notes::Page;

pub use memory::Memory;
pub use postgres::Postgres;

mod memory;
mod postgres;

/// Storage errors
#[derive(Debug, Error)]
pub enum Error {
    /// The referenced note (or listing cursor) does not exist
    #[error("Note not found: {0}")]
    NotFound(Uuid),

    /// A connection error with the storage
    #[error("Connection error: {0}")]
    Connection(String),
}

/// Result type for all storage interactions
pub type Result<T> = core::result::Result<T, Error>;

/// Values to create a Note
pub struct CreateNoteValues<'a> {
    /// Title of the note
    ///
    /// Not validated by the storage
    pub title: &'a str,

    /// Content of the note
    pub content: &'a str,
}

/// Values to update a Note
pub struct UpdateNoteValues<'a> {
    /// New title of the note
    pub title: &'a str,

    /// New content of the note
    pub content: &'a str,
}

/// Storage with all supported operations
///
/// Every operation is atomic on its own: the existence check of an update or
/// delete can not be raced by another request.
#[async_trait]
pub trait Storage: Clone + Send + Sync + 'static {
    /// Create a note, the storage assigns the ID and creation date
    async fn create_note(&self, values: &CreateNoteValues<'_>) -> Result<Uuid>;

    /// Find a single note by its ID
    async fn find_single_note_by_id(&self, id: &Uuid) -> Result<Note>;

    /// Update title and content of a note
    ///
    /// Returns the note as stored after the update
    async fn update_note(&self, id: &Uuid, values: &UpdateNoteValues<'_>) -> Result<Note>;

    /// Delete a note for good
    ///
    /// Returns the note as it was right before the delete
    async fn delete_note(&self, id: &Uuid) -> Result<Note>;

    /// List at most `limit` notes created after `cursor`, oldest first
    async fn list_notes(&self, limit: u32, cursor: &Cursor) -> Result<Page>;
}
