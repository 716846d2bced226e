//! Storages standing in for the real ones

use std::sync::Arc;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;

use async_trait::async_trait;
use uuid::Uuid;

use crate::notes::Cursor;
use crate::notes::Note;
use crate::notes::Page;
use crate::storage::CreateNoteValues;
use crate::storage::Error;
use crate::storage::Memory;
use crate::storage::Result;
use crate::storage::Storage;
use crate::storage::UpdateNoteValues;

/// Memory storage counting every call that reaches it
#[derive(Clone, Default)]
pub struct CountingStorage {
    memory: Memory,
    calls: Arc<AtomicUsize>,
}

impl CountingStorage {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn count(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl Storage for CountingStorage {
    async fn create_note(&self, values: &CreateNoteValues<'_>) -> Result<Uuid> {
        self.count();
        self.memory.create_note(values).await
    }

    async fn find_single_note_by_id(&self, id: &Uuid) -> Result<Note> {
        self.count();
        self.memory.find_single_note_by_id(id).await
    }

    async fn update_note(&self, id: &Uuid, values: &UpdateNoteValues<'_>) -> Result<Note> {
        self.count();
        self.memory.update_note(id, values).await
    }

    async fn delete_note(&self, id: &Uuid) -> Result<Note> {
        self.count();
        self.memory.delete_note(id).await
    }

    async fn list_notes(&self, limit: u32, cursor: &Cursor) -> Result<Page> {
        self.count();
        self.memory.list_notes(limit, cursor).await
    }
}

/// Detail of every failure, must never reach a caller
pub const FAILURE_DETAIL: &str = "connection to 10.0.0.7:5432 refused";

/// Storage where every operation fails
#[derive(Clone, Default)]
pub struct FailingStorage;

fn failure() -> Error {
    Error::Connection(FAILURE_DETAIL.to_string())
}

#[async_trait]
impl Storage for FailingStorage {
    async fn create_note(&self, _values: &CreateNoteValues<'_>) -> Result<Uuid> {
        Err(failure())
    }

    async fn find_single_note_by_id(&self, _id: &Uuid) -> Result<Note> {
        Err(failure())
    }

    async fn update_note(&self, _id: &Uuid, _values: &UpdateNoteValues<'_>) -> Result<Note> {
        Err(failure())
    }

    async fn delete_note(&self, _id: &Uuid) -> Result<Note> {
        Err(failure())
    }

    async fn list_notes(&self, _limit: u32, _cursor: &Cursor) -> Result<Page> {
        Err(failure())
    }
}

/// Storage where no operation ever completes
#[derive(Clone, Default)]
pub struct PendingStorage;

#[async_trait]
impl Storage for PendingStorage {
    async fn create_note(&self, _values: &CreateNoteValues<'_>) -> Result<Uuid> {
        std::future::pending().await
    }

    async fn find_single_note_by_id(&self, _id: &Uuid) -> Result<Note> {
        std::future::pending().await
    }

    async fn update_note(&self, _id: &Uuid, _values: &UpdateNoteValues<'_>) -> Result<Note> {
        std::future::pending().await
    }

    async fn delete_note(&self, _id: &Uuid) -> Result<Note> {
        std::future::pending().await
    }

    async fn list_notes(&self, _limit: u32, _cursor: &Cursor) -> Result<Page> {
        std::future::pending().await
    }
}
