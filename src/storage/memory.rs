//! Memory storage
//!
//! Will be destroyed on system shutdown

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDateTime;
use chrono::Utc;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::notes::Cursor;
use crate::notes::Note;
use crate::notes::Page;

use super::CreateNoteValues;
use super::Error;
use super::Result;
use super::Storage;
use super::UpdateNoteValues;

/// A note with its insertion sequence
#[derive(Clone, Debug)]
struct MemoryNote {
    /// Tie-breaker for notes with the same creation date
    sequence: u64,

    /// The note itself
    note: Note,
}

impl MemoryNote {
    /// Listing order of the note
    fn key(&self) -> (NaiveDateTime, u64) {
        (self.note.created_at, self.sequence)
    }
}

/// Everything behind the lock
#[derive(Debug, Default)]
struct Inner {
    /// All notes in storage
    notes: HashMap<Uuid, MemoryNote>,

    /// Sequence of the next note
    next_sequence: u64,

    /// Creation date of the last note, creation dates never go backwards
    last_created_at: Option<NaiveDateTime>,
}

/// An in-memory storage
///
/// Will be destroyed on system shutdown
#[derive(Clone, Debug, Default)]
pub struct Memory {
    /// Notes and bookkeeping, one lock per operation
    inner: Arc<Mutex<Inner>>,
}

impl Memory {
    /// Create a new empty Memory storage
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Storage for Memory {
    async fn create_note(&self, values: &CreateNoteValues<'_>) -> Result<Uuid> {
        let mut inner = self.inner.lock().await;

        let now = Utc::now().naive_utc();
        let created_at = inner.last_created_at.map_or(now, |last| last.max(now));

        let sequence = inner.next_sequence;
        inner.next_sequence += 1;
        inner.last_created_at = Some(created_at);

        let note = Note {
            id: Uuid::new_v4(),
            title: values.title.to_string(),
            content: values.content.to_string(),
            created_at,
        };

        let id = note.id;
        inner.notes.insert(id, MemoryNote { sequence, note });

        Ok(id)
    }

    async fn find_single_note_by_id(&self, id: &Uuid) -> Result<Note> {
        self.inner
            .lock()
            .await
            .notes
            .get(id)
            .map(|stored| stored.note.clone())
            .ok_or(Error::NotFound(*id))
    }

    async fn update_note(&self, id: &Uuid, values: &UpdateNoteValues<'_>) -> Result<Note> {
        self.inner
            .lock()
            .await
            .notes
            .get_mut(id)
            .map(|stored| {
                stored.note.title = values.title.to_string();
                stored.note.content = values.content.to_string();

                stored.note.clone()
            })
            .ok_or(Error::NotFound(*id))
    }

    async fn delete_note(&self, id: &Uuid) -> Result<Note> {
        self.inner
            .lock()
            .await
            .notes
            .remove(id)
            .map(|stored| stored.note)
            .ok_or(Error::NotFound(*id))
    }

    async fn list_notes(&self, limit: u32, cursor: &Cursor) -> Result<Page> {
        let inner = self.inner.lock().await;

        let after = match cursor {
            Cursor::Start => None,
            Cursor::After(id) => Some(
                inner
                    .notes
                    .get(id)
                    .map(MemoryNote::key)
                    .ok_or(Error::NotFound(*id))?,
            ),
        };

        let mut stored = inner
            .notes
            .values()
            .filter(|stored| after.is_none_or(|after| stored.key() > after))
            .collect::<Vec<&MemoryNote>>();

        stored.sort_by_key(|stored| stored.key());

        let limit = limit as usize;
        let notes = stored
            .into_iter()
            .take(limit + 1)
            .map(|stored| stored.note.clone())
            .collect::<Vec<Note>>();

        Ok(Page::from_overfetched(notes, limit))
    }
}
