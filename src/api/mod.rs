//! All RPC endpoint setup

use axum::Router;
use axum::routing::post;

pub use request::Form;
pub use request::parse_cursor;
pub use request::parse_id;
pub use request::parse_limit;
pub use response::Error;
pub use response::Success;

use crate::storage::Storage;

mod notes;
mod request;
mod response;

/// Prefix of all notes procedures
pub const NOTES_SERVICE_PATH: &str = "/rpc/notes.Notes";

/// Get the Axum router for all notes procedures
pub fn router<S: Storage>() -> Router {
    let notes = Router::new()
        .route("/CreateNote", post(notes::create::<S>))
        .route("/GetNoteById", post(notes::single::<S>))
        .route("/UpdateNote", post(notes::update::<S>))
        .route("/DeleteNote", post(notes::delete::<S>))
        .route("/ListNotes", post(notes::list::<S>));

    Router::new().nest(NOTES_SERVICE_PATH, notes)
}
