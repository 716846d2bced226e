//! Notes RPC procedures
//!
//! Every procedure is a `POST` with a JSON request message. Missing fields get
//! their zero value and are validated here, before the service is called.

use axum::Extension;
use serde::Deserialize;
use serde::Serialize;
use uuid::Uuid;

use crate::notes::Note;
use crate::notes::Page;
use crate::service::Notes;
use crate::storage::Storage;

use super::Error;
use super::Form;
use super::Success;
use super::parse_cursor;
use super::parse_id;
use super::parse_limit;

/// Note response going to the caller
///
/// The creation date stays internal
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteResponse {
    pub id: Uuid,
    pub title: String,
    pub content: String,
}

impl NoteResponse {
    fn from_note(note: Note) -> Self {
        Self {
            id: note.id,
            title: note.title,
            content: note.content,
        }
    }

    fn from_note_multiple(mut notes: Vec<Note>) -> Vec<Self> {
        notes.drain(..).map(Self::from_note).collect::<Vec<Self>>()
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateNoteResponse {
    pub id: Uuid,
}

/// A page of notes
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListNotesResponse {
    pub notes: Vec<NoteResponse>,

    /// ID of the last note in `notes`, empty when there is nothing left
    pub next_cursor: String,
}

impl ListNotesResponse {
    fn from_page(page: Page) -> Self {
        Self {
            notes: NoteResponse::from_note_multiple(page.notes),
            next_cursor: page
                .next_cursor
                .map(|next_cursor| next_cursor.to_string())
                .unwrap_or_default(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CreateNoteForm {
    title: String,
    content: String,
}

/// Create a note
///
/// Request:
/// ```sh
/// curl -v -H 'Content-Type: application/json' \
///     -d '{"title": "Groceries", "content": "Milk"}' \
///     http://localhost:6000/rpc/notes.Notes/CreateNote
/// ```
pub async fn create<S: Storage>(
    Extension(notes): Extension<Notes<S>>,
    Form(form): Form<CreateNoteForm>,
) -> Result<Success<CreateNoteResponse>, Error> {
    if form.title.is_empty() {
        return Err(Error::bad_request("title is required"));
    }

    let id = notes
        .create_note(&form.title, &form.content)
        .await
        .map_err(Error::from_service)?;

    Ok(Success::ok(CreateNoteResponse { id }))
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NoteIdForm {
    id: String,
}

/// Get a single note
///
/// Request:
/// ```sh
/// curl -v -H 'Content-Type: application/json' \
///     -d '{"id": "<uuid>"}' \
///     http://localhost:6000/rpc/notes.Notes/GetNoteById
/// ```
pub async fn single<S: Storage>(
    Extension(notes): Extension<Notes<S>>,
    Form(form): Form<NoteIdForm>,
) -> Result<Success<NoteResponse>, Error> {
    let id = parse_id(&form.id)?;

    notes
        .get_note_by_id(&id)
        .await
        .map(|note| Success::ok(NoteResponse::from_note(note)))
        .map_err(Error::from_service)
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UpdateNoteForm {
    id: String,
    title: String,
    content: String,
}

/// Replace title and content of a note
///
/// Request:
/// ```sh
/// curl -v -H 'Content-Type: application/json' \
///     -d '{"id": "<uuid>", "title": "Groceries", "content": "Milk, eggs"}' \
///     http://localhost:6000/rpc/notes.Notes/UpdateNote
/// ```
pub async fn update<S: Storage>(
    Extension(notes): Extension<Notes<S>>,
    Form(form): Form<UpdateNoteForm>,
) -> Result<Success<NoteResponse>, Error> {
    let id = parse_id(&form.id)?;

    notes
        .update_note(&id, &form.title, &form.content)
        .await
        .map(|note| Success::ok(NoteResponse::from_note(note)))
        .map_err(Error::from_service)
}

/// Delete a note, responds with the note as it was
///
/// Request:
/// ```sh
/// curl -v -H 'Content-Type: application/json' \
///     -d '{"id": "<uuid>"}' \
///     http://localhost:6000/rpc/notes.Notes/DeleteNote
/// ```
pub async fn delete<S: Storage>(
    Extension(notes): Extension<Notes<S>>,
    Form(form): Form<NoteIdForm>,
) -> Result<Success<NoteResponse>, Error> {
    let id = parse_id(&form.id)?;

    notes
        .delete_note(&id)
        .await
        .map(|note| Success::ok(NoteResponse::from_note(note)))
        .map_err(Error::from_service)
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ListNotesForm {
    limit: i32,
    cursor: String,
}

/// List a page of notes, oldest first
///
/// The first page is requested with the cursor `start`, the next ones with
/// the `nextCursor` of the previous page.
///
/// Request:
/// ```sh
/// curl -v -H 'Content-Type: application/json' \
///     -d '{"limit": 10, "cursor": "start"}' \
///     http://localhost:6000/rpc/notes.Notes/ListNotes
/// ```
pub async fn list<S: Storage>(
    Extension(notes): Extension<Notes<S>>,
    Form(form): Form<ListNotesForm>,
) -> Result<Success<ListNotesResponse>, Error> {
    let cursor = parse_cursor(&form.cursor)?;
    let limit = parse_limit(form.limit)?;

    notes
        .list_notes(limit, &cursor)
        .await
        .map(|page| Success::ok(ListNotesResponse::from_page(page)))
        .map_err(Error::from_service)
}
