//! Notes domain service
//!
//! Forwards every call exactly once to the storage and reports the outcome to
//! an [`Observer`]. Errors keep their storage kind, annotated with the
//! operation that produced them.

use core::fmt;
use std::sync::Arc;

use thiserror::Error;
use uuid::Uuid;

use crate::notes::Cursor;
use crate::notes::Note;
use crate::notes::Page;
use crate::storage;
use crate::storage::CreateNoteValues;
use crate::storage::Storage;
use crate::storage::UpdateNoteValues;

pub use observer::Observer;
pub use observer::Record;
pub use observer::TracingObserver;

mod observer;

/// Operations of the service
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operation {
    /// Create a note
    CreateNote,

    /// Get a single note
    GetNoteById,

    /// Update a note
    UpdateNote,

    /// Delete a note
    DeleteNote,

    /// List a page of notes
    ListNotes,
}

impl Operation {
    /// Name of the operation, used in logs
    pub fn as_str(self) -> &'static str {
        match self {
            Operation::CreateNote => "create_note",
            Operation::GetNoteById => "get_note_by_id",
            Operation::UpdateNote => "update_note",
            Operation::DeleteNote => "delete_note",
            Operation::ListNotes => "list_notes",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of a service error, for programmatic matching
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// The note or cursor does not exist
    NotFound,

    /// The storage failed
    Storage,
}

/// A storage error with the operation it happened in
#[derive(Debug, Error)]
#[error("{operation} failed: {source}")]
pub struct Error {
    /// Operation that failed
    pub operation: Operation,

    /// Underlying storage error
    #[source]
    pub source: storage::Error,
}

impl Error {
    /// Kind of the underlying storage error
    pub fn kind(&self) -> ErrorKind {
        match self.source {
            storage::Error::NotFound(_) => ErrorKind::NotFound,
            storage::Error::Connection(_) => ErrorKind::Storage,
        }
    }
}

/// Result type for all service interactions
pub type Result<T> = core::result::Result<T, Error>;

/// The notes service
#[derive(Clone)]
pub struct Notes<S: Storage> {
    /// Storage of the notes
    storage: S,

    /// Receives a record of every operation
    observer: Arc<dyn Observer>,
}

impl<S: Storage> Notes<S> {
    /// Create the service on top of a storage
    pub fn new(storage: S, observer: Arc<dyn Observer>) -> Self {
        Self { storage, observer }
    }

    /// Create a note, returns the ID assigned by the storage
    pub async fn create_note(&self, title: &str, content: &str) -> Result<Uuid> {
        let result = self
            .storage
            .create_note(&CreateNoteValues { title, content })
            .await;

        self.finish(Operation::CreateNote, result, |id| Record::note_id(*id))
    }

    /// Get a single note
    pub async fn get_note_by_id(&self, id: &Uuid) -> Result<Note> {
        let result = self.storage.find_single_note_by_id(id).await;

        self.finish(Operation::GetNoteById, result, |note| {
            Record::note_id(note.id)
        })
    }

    /// Replace title and content of a note
    pub async fn update_note(&self, id: &Uuid, title: &str, content: &str) -> Result<Note> {
        let result = self
            .storage
            .update_note(id, &UpdateNoteValues { title, content })
            .await;

        self.finish(Operation::UpdateNote, result, |note| {
            Record::note_id(note.id)
        })
    }

    /// Delete a note, returns the note as it was before the delete
    pub async fn delete_note(&self, id: &Uuid) -> Result<Note> {
        let result = self.storage.delete_note(id).await;

        self.finish(Operation::DeleteNote, result, |note| {
            Record::note_id(note.id)
        })
    }

    /// List a page of notes
    pub async fn list_notes(&self, limit: u32, cursor: &Cursor) -> Result<Page> {
        let result = self.storage.list_notes(limit, cursor).await;

        self.finish(Operation::ListNotes, result, |page| Record {
            cursor: Some(*cursor),
            returned: Some(page.notes.len()),
            next_cursor: page.next_cursor,
            ..Record::default()
        })
    }

    /// Report the outcome to the observer and attach the operation to errors
    fn finish<T, F>(
        &self,
        operation: Operation,
        result: storage::Result<T>,
        record: F,
    ) -> Result<T>
    where
        F: FnOnce(&T) -> Record,
    {
        match result {
            Ok(value) => {
                self.observer.succeeded(operation, &record(&value));

                Ok(value)
            }
            Err(source) => {
                let err = Error { operation, source };

                self.observer.failed(&err);

                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use crate::storage::Memory;

    use super::*;

    /// Observer keeping everything it receives
    #[derive(Default)]
    struct RecordingObserver {
        succeeded: Mutex<Vec<(Operation, Record)>>,
        failed: Mutex<Vec<(Operation, ErrorKind)>>,
    }

    impl Observer for RecordingObserver {
        fn succeeded(&self, operation: Operation, record: &Record) {
            self.succeeded
                .lock()
                .unwrap()
                .push((operation, record.clone()));
        }

        fn failed(&self, err: &Error) {
            self.failed
                .lock()
                .unwrap()
                .push((err.operation, err.kind()));
        }
    }

    fn setup() -> (Notes<Memory>, Arc<RecordingObserver>) {
        let observer = Arc::new(RecordingObserver::default());

        (Notes::new(Memory::new(), observer.clone()), observer)
    }

    #[tokio::test]
    async fn test_success_is_recorded() {
        let (notes, observer) = setup();

        let id = notes.create_note("Title", "Secret content").await.unwrap();
        let note = notes.get_note_by_id(&id).await.unwrap();
        assert_eq!("Secret content", note.content);

        let succeeded = observer.succeeded.lock().unwrap();
        assert_eq!(
            vec![
                (Operation::CreateNote, Record::note_id(id)),
                (Operation::GetNoteById, Record::note_id(id)),
            ],
            *succeeded
        );
        assert!(observer.failed.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_is_recorded() {
        let (notes, observer) = setup();

        let first = notes.create_note("A", "").await.unwrap();
        notes.create_note("B", "").await.unwrap();

        let page = notes.list_notes(1, &Cursor::Start).await.unwrap();
        assert_eq!(Some(first), page.next_cursor);

        let succeeded = observer.succeeded.lock().unwrap();
        let (operation, record) = succeeded.last().unwrap();
        assert_eq!(Operation::ListNotes, *operation);
        assert_eq!(Some(Cursor::Start), record.cursor);
        assert_eq!(Some(1), record.returned);
        assert_eq!(Some(first), record.next_cursor);
    }

    #[tokio::test]
    async fn test_not_found_keeps_its_kind() {
        let (notes, observer) = setup();
        let id = Uuid::new_v4();

        let err = notes.get_note_by_id(&id).await.unwrap_err();
        assert_eq!(ErrorKind::NotFound, err.kind());
        assert_eq!(Operation::GetNoteById, err.operation);

        let err = notes.update_note(&id, "Title", "").await.unwrap_err();
        assert_eq!(ErrorKind::NotFound, err.kind());
        assert_eq!(Operation::UpdateNote, err.operation);

        let err = notes.delete_note(&id).await.unwrap_err();
        assert_eq!(ErrorKind::NotFound, err.kind());
        assert_eq!(Operation::DeleteNote, err.operation);

        let err = notes
            .list_notes(3, &Cursor::After(id))
            .await
            .unwrap_err();
        assert_eq!(ErrorKind::NotFound, err.kind());
        assert_eq!(Operation::ListNotes, err.operation);

        assert_eq!(
            vec![
                (Operation::GetNoteById, ErrorKind::NotFound),
                (Operation::UpdateNote, ErrorKind::NotFound),
                (Operation::DeleteNote, ErrorKind::NotFound),
                (Operation::ListNotes, ErrorKind::NotFound),
            ],
            *observer.failed.lock().unwrap()
        );
        assert!(observer.succeeded.lock().unwrap().is_empty());
    }

    #[test]
    fn test_error_message_names_operation() {
        let id = Uuid::nil();
        let err = Error {
            operation: Operation::DeleteNote,
            source: storage::Error::NotFound(id),
        };

        assert_eq!(
            format!("delete_note failed: Note not found: {id}"),
            err.to_string()
        );

        let err = Error {
            operation: Operation::CreateNote,
            source: storage::Error::Connection("pool timed out".to_string()),
        };
        assert_eq!(ErrorKind::Storage, err.kind());
    }
}
