//! Observability of the notes service

use uuid::Uuid;

use crate::notes::Cursor;

use super::Error;
use super::ErrorKind;
use super::Operation;

/// Structured fields describing a successful operation
///
/// Never holds titles or contents of notes
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Record {
    /// The note created, read, updated or deleted
    pub note_id: Option<Uuid>,

    /// Cursor a listing started from
    pub cursor: Option<Cursor>,

    /// Number of notes in a listed page
    pub returned: Option<usize>,

    /// Cursor of the next page of a listing
    pub next_cursor: Option<Uuid>,
}

impl Record {
    /// Record for an operation on a single note
    pub fn note_id(id: Uuid) -> Self {
        Self {
            note_id: Some(id),
            ..Self::default()
        }
    }
}

/// Receives the outcome of every service operation
pub trait Observer: Send + Sync {
    /// The operation succeeded
    fn succeeded(&self, operation: Operation, record: &Record);

    /// The operation failed
    fn failed(&self, err: &Error);
}

/// Observer writing everything to `tracing`
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingObserver;

impl Observer for TracingObserver {
    fn succeeded(&self, operation: Operation, record: &Record) {
        let note_id = record.note_id.map(tracing::field::display);
        let cursor = record.cursor.map(tracing::field::display);
        let next_cursor = record.next_cursor.map(tracing::field::display);

        tracing::info!(
            op = operation.as_str(),
            note_id,
            cursor,
            returned = record.returned,
            next_cursor,
            "Notes operation succeeded"
        );
    }

    fn failed(&self, err: &Error) {
        match err.kind() {
            ErrorKind::NotFound => {
                tracing::warn!(op = err.operation.as_str(), error = %err.source, "Note not found");
            }
            ErrorKind::Storage => {
                tracing::error!(op = err.operation.as_str(), error = %err.source, "Storage failure");
            }
        }
    }
}
