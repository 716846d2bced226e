//! Postgres storage

use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDateTime;
use sqlx::migrate::Migrator;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use uuid::Uuid;

use crate::notes::Cursor;
use crate::notes::Note;
use crate::notes::Page;

use super::CreateNoteValues;
use super::Error;
use super::Result;
use super::Storage;
use super::UpdateNoteValues;

/// Migrator to run migrations on startup
static MIGRATOR: Migrator = sqlx::migrate!();

/// Postgres storage
#[derive(Clone, Debug)]
pub struct Postgres {
    /// Pool of connections
    connection_pool: PgPool,
}

impl Postgres {
    /// Create Postgres storage
    ///
    /// Migrations will be run
    pub async fn connect(database_url: &str, max_connections: u32) -> anyhow::Result<Self> {
        let connection_pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(Duration::from_secs(3))
            .connect(database_url)
            .await?;

        Self::new_with_pool(connection_pool).await
    }

    /// Create Postgres storage with existing pool
    ///
    /// Migrations will be run
    pub async fn new_with_pool(connection_pool: PgPool) -> anyhow::Result<Self> {
        MIGRATOR.run(&connection_pool).await?;

        Ok(Self { connection_pool })
    }

    /// Close all connections of the pool
    pub async fn close(&self) {
        self.connection_pool.close().await;
    }
}

/// Postgres version of note
#[derive(sqlx::FromRow)]
struct PostgresNote {
    /// Note ID
    id: Uuid,

    /// Title
    title: String,

    /// Content
    content: String,

    /// Creation date
    created_at: NaiveDateTime,
}

impl Note {
    /// Create note from postgres version
    fn from_postgres_note(note: PostgresNote) -> Self {
        Self {
            id: note.id,
            title: note.title,
            content: note.content,
            created_at: note.created_at,
        }
    }

    /// Create multiple notes from postgres version
    fn from_postgres_note_multiple(mut notes: Vec<PostgresNote>) -> Vec<Self> {
        notes
            .drain(..)
            .map(Self::from_postgres_note)
            .collect::<Vec<Self>>()
    }
}

#[async_trait]
impl Storage for Postgres {
    async fn create_note(&self, values: &CreateNoteValues<'_>) -> Result<Uuid> {
        let id = Uuid::new_v4();

        sqlx::query(
            r"
            INSERT INTO notes (id, title, content)
            VALUES ($1, $2, $3)
            ",
        )
        .bind(id)
        .bind(values.title)
        .bind(values.content)
        .execute(&self.connection_pool)
        .await
        .map_err(connection_error)?;

        Ok(id)
    }

    async fn find_single_note_by_id(&self, id: &Uuid) -> Result<Note> {
        sqlx::query_as::<_, PostgresNote>(
            r"
            SELECT id, title, content, created_at
            FROM notes
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(&self.connection_pool)
        .await
        .map_err(connection_error)?
        .map(Note::from_postgres_note)
        .ok_or(Error::NotFound(*id))
    }

    async fn update_note(&self, id: &Uuid, values: &UpdateNoteValues<'_>) -> Result<Note> {
        let mut transaction = self
            .connection_pool
            .begin()
            .await
            .map_err(connection_error)?;

        let existing = sqlx::query_scalar::<_, Uuid>(
            r"
            SELECT id
            FROM notes
            WHERE id = $1
            FOR UPDATE
            ",
        )
        .bind(id)
        .fetch_optional(&mut *transaction)
        .await
        .map_err(connection_error)?;

        if existing.is_none() {
            return Err(Error::NotFound(*id));
        }

        let note = sqlx::query_as::<_, PostgresNote>(
            r"
            UPDATE notes
            SET title = $1, content = $2
            WHERE id = $3
            RETURNING id, title, content, created_at
            ",
        )
        .bind(values.title)
        .bind(values.content)
        .bind(id)
        .fetch_one(&mut *transaction)
        .await
        .map(Note::from_postgres_note)
        .map_err(connection_error)?;

        transaction.commit().await.map_err(connection_error)?;

        Ok(note)
    }

    async fn delete_note(&self, id: &Uuid) -> Result<Note> {
        let mut transaction = self
            .connection_pool
            .begin()
            .await
            .map_err(connection_error)?;

        let note = sqlx::query_as::<_, PostgresNote>(
            r"
            SELECT id, title, content, created_at
            FROM notes
            WHERE id = $1
            FOR UPDATE
            ",
        )
        .bind(id)
        .fetch_optional(&mut *transaction)
        .await
        .map_err(connection_error)?
        .map(Note::from_postgres_note)
        .ok_or(Error::NotFound(*id))?;

        let deleted = sqlx::query(
            r"
            DELETE FROM notes
            WHERE id = $1
            ",
        )
        .bind(id)
        .execute(&mut *transaction)
        .await
        .map_err(connection_error)?;

        if deleted.rows_affected() != 1 {
            return Err(Error::Connection(format!(
                "Expected to delete 1 note, deleted {}",
                deleted.rows_affected()
            )));
        }

        transaction.commit().await.map_err(connection_error)?;

        Ok(note)
    }

    async fn list_notes(&self, limit: u32, cursor: &Cursor) -> Result<Page> {
        let mut transaction = self
            .connection_pool
            .begin()
            .await
            .map_err(connection_error)?;

        // cursor lookup and page must see the same snapshot
        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ")
            .execute(&mut *transaction)
            .await
            .map_err(connection_error)?;

        let fetch_limit = i64::from(limit) + 1;

        let notes = match cursor {
            Cursor::Start => sqlx::query_as::<_, PostgresNote>(
                r"
                SELECT id, title, content, created_at
                FROM notes
                ORDER BY created_at, sequence
                LIMIT $1
                ",
            )
            .bind(fetch_limit)
            .fetch_all(&mut *transaction)
            .await
            .map_err(connection_error)?,
            Cursor::After(cursor_id) => {
                let (created_at, sequence) = sqlx::query_as::<_, (NaiveDateTime, i64)>(
                    r"
                    SELECT created_at, sequence
                    FROM notes
                    WHERE id = $1
                    ",
                )
                .bind(cursor_id)
                .fetch_optional(&mut *transaction)
                .await
                .map_err(connection_error)?
                .ok_or(Error::NotFound(*cursor_id))?;

                sqlx::query_as::<_, PostgresNote>(
                    r"
                    SELECT id, title, content, created_at
                    FROM notes
                    WHERE (created_at, sequence) > ($1, $2)
                    ORDER BY created_at, sequence
                    LIMIT $3
                    ",
                )
                .bind(created_at)
                .bind(sequence)
                .bind(fetch_limit)
                .fetch_all(&mut *transaction)
                .await
                .map_err(connection_error)?
            }
        };

        transaction.commit().await.map_err(connection_error)?;

        Ok(Page::from_overfetched(
            Note::from_postgres_note_multiple(notes),
            limit as usize,
        ))
    }
}

/// Map any error to a connection error
fn connection_error<E>(err: E) -> Error
where
    E: std::error::Error,
{
    Error::Connection(err.to_string())
}
