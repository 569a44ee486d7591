//! Note repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Persist full note records, including checklist and label links.
//! - Own label-link replacement (`set_note_labels`) with atomic semantics.
//!
//! # Invariants
//! - Note row and label links are always written in one transaction.
//! - Label names are normalized before persistence; unseen names are
//!   registered in `labels` with the default label color.
//! - Note list is ordered by `updated_at DESC, id ASC`.

use crate::model::label::{normalize_labels, DEFAULT_LABEL_COLOR};
use crate::model::mood::Mood;
use crate::model::note::{now_epoch_ms, ChecklistItem, Note, NoteColor, NoteId, NoteKind};
use crate::repo::error::{RepoError, RepoResult};
use rusqlite::{params, Connection, Row, Transaction, TransactionBehavior};
use uuid::Uuid;

const NOTES_DEFAULT_LIMIT: u32 = 100;
const NOTES_LIMIT_MAX: u32 = 500;

const NOTE_SELECT_SQL: &str = "SELECT
    id,
    title,
    content,
    kind,
    checklist_json,
    drawing_data,
    mood,
    mood_confidence,
    mood_detection,
    category,
    color,
    is_pinned,
    is_archived,
    is_favorite,
    image_url,
    audio_url,
    link_url,
    link_text,
    reminder_at,
    created_at,
    updated_at
FROM notes";

/// Pagination options for note list use-cases.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteListQuery {
    /// Maximum rows to return. Defaults to 100 and clamps to 500.
    pub limit: Option<u32>,
    /// Number of rows to skip.
    pub offset: u32,
}

/// Repository interface for note operations.
pub trait NoteRepository {
    /// Inserts one note with its labels and returns its stable id.
    fn create_note(&mut self, note: &Note) -> RepoResult<NoteId>;
    /// Replaces every stored field of an existing note, labels included.
    fn update_note(&mut self, note: &Note) -> RepoResult<()>;
    fn get_note(&self, id: NoteId) -> RepoResult<Option<Note>>;
    /// Lists one page of notes.
    fn list_notes(&self, query: &NoteListQuery) -> RepoResult<Vec<Note>>;
    /// Lists every note, in list order.
    fn list_all_notes(&self) -> RepoResult<Vec<Note>>;
    /// Hard-deletes a note; label links cascade.
    fn delete_note(&mut self, id: NoteId) -> RepoResult<()>;
    /// Replaces all labels of a note in one transaction and bumps `updated_at`.
    fn set_note_labels(&mut self, id: NoteId, labels: &[String]) -> RepoResult<()>;
}

/// SQLite-backed note repository.
pub struct SqliteNoteRepository<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> SqliteNoteRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    ///
    /// # Errors
    /// - Returns `MissingRequiredTable`/`MissingRequiredColumn` when the
    ///   connection was not opened through [`crate::db::open_db`].
    pub fn try_new(conn: &'conn mut Connection) -> RepoResult<Self> {
        ensure_table(conn, "notes", &["id", "title", "mood", "updated_at"])?;
        ensure_table(conn, "labels", &["id", "name", "color"])?;
        ensure_table(conn, "note_labels", &["note_id", "label_id"])?;
        Ok(Self { conn })
    }
}

impl NoteRepository for SqliteNoteRepository<'_> {
    fn create_note(&mut self, note: &Note) -> RepoResult<NoteId> {
        note.validate()?;
        let checklist_json = encode_checklist(&note.checklist)?;

        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        tx.execute(
            "INSERT INTO notes (
                id, title, content, kind, checklist_json, drawing_data,
                mood, mood_confidence, mood_detection, category, color,
                is_pinned, is_archived, is_favorite,
                image_url, audio_url, link_url, link_text, reminder_at,
                created_at, updated_at
            ) VALUES (
                ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11,
                ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19, ?20, ?21
            );",
            params![
                note.id.to_string(),
                note.title.as_str(),
                note.content.as_str(),
                note.kind.as_str(),
                checklist_json,
                note.drawing_data.as_deref(),
                note.mood.map(|mood| mood.as_str()),
                note.mood_confidence,
                note.mood_detection,
                note.category.as_deref(),
                note.color.as_str(),
                note.is_pinned,
                note.is_archived,
                note.is_favorite,
                note.image_url.as_deref(),
                note.audio_url.as_deref(),
                note.link_url.as_deref(),
                note.link_text.as_deref(),
                note.reminder_at,
                note.created_at,
                note.updated_at,
            ],
        )?;
        replace_labels_in_tx(&tx, &note.id.to_string(), &note.labels)?;
        tx.commit()?;

        Ok(note.id)
    }

    fn update_note(&mut self, note: &Note) -> RepoResult<()> {
        note.validate()?;
        let checklist_json = encode_checklist(&note.checklist)?;
        let id_text = note.id.to_string();

        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        let changed = tx.execute(
            "UPDATE notes
             SET
                title = ?2,
                content = ?3,
                kind = ?4,
                checklist_json = ?5,
                drawing_data = ?6,
                mood = ?7,
                mood_confidence = ?8,
                mood_detection = ?9,
                category = ?10,
                color = ?11,
                is_pinned = ?12,
                is_archived = ?13,
                is_favorite = ?14,
                image_url = ?15,
                audio_url = ?16,
                link_url = ?17,
                link_text = ?18,
                reminder_at = ?19,
                updated_at = ?20
             WHERE id = ?1;",
            params![
                id_text.as_str(),
                note.title.as_str(),
                note.content.as_str(),
                note.kind.as_str(),
                checklist_json,
                note.drawing_data.as_deref(),
                note.mood.map(|mood| mood.as_str()),
                note.mood_confidence,
                note.mood_detection,
                note.category.as_deref(),
                note.color.as_str(),
                note.is_pinned,
                note.is_archived,
                note.is_favorite,
                note.image_url.as_deref(),
                note.audio_url.as_deref(),
                note.link_url.as_deref(),
                note.link_text.as_deref(),
                note.reminder_at,
                note.updated_at,
            ],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound(note.id));
        }

        replace_labels_in_tx(&tx, &id_text, &note.labels)?;
        tx.commit()?;
        Ok(())
    }

    fn get_note(&self, id: NoteId) -> RepoResult<Option<Note>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{NOTE_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        match rows.next()? {
            Some(row) => Ok(Some(note_from_row(&*self.conn, row)?)),
            None => Ok(None),
        }
    }

    fn list_notes(&self, query: &NoteListQuery) -> RepoResult<Vec<Note>> {
        let limit = normalize_note_limit(query.limit);
        let mut stmt = self.conn.prepare(&format!(
            "{NOTE_SELECT_SQL} ORDER BY updated_at DESC, id ASC LIMIT ?1 OFFSET ?2;"
        ))?;
        let mut rows = stmt.query(params![i64::from(limit), i64::from(query.offset)])?;
        let mut notes = Vec::new();
        while let Some(row) = rows.next()? {
            notes.push(note_from_row(&*self.conn, row)?);
        }
        Ok(notes)
    }

    fn list_all_notes(&self) -> RepoResult<Vec<Note>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{NOTE_SELECT_SQL} ORDER BY updated_at DESC, id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut notes = Vec::new();
        while let Some(row) = rows.next()? {
            notes.push(note_from_row(&*self.conn, row)?);
        }
        Ok(notes)
    }

    fn delete_note(&mut self, id: NoteId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM notes WHERE id = ?1;", [id.to_string()])?;
        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }
        Ok(())
    }

    fn set_note_labels(&mut self, id: NoteId, labels: &[String]) -> RepoResult<()> {
        let id_text = id.to_string();
        let normalized = normalize_labels(labels);
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        let created_at: Option<i64> = tx
            .query_row(
                "SELECT created_at FROM notes WHERE id = ?1;",
                [id_text.as_str()],
                |row| row.get(0),
            )
            .map(Some)
            .or_else(|err| match err {
                rusqlite::Error::QueryReturnedNoRows => Ok(None),
                other => Err(other),
            })?;
        let Some(created_at) = created_at else {
            return Err(RepoError::NotFound(id));
        };

        replace_labels_in_tx(&tx, &id_text, &normalized)?;
        tx.execute(
            "UPDATE notes SET updated_at = MAX(updated_at, ?2) WHERE id = ?1;",
            params![id_text.as_str(), now_epoch_ms().max(created_at)],
        )?;
        tx.commit()?;
        Ok(())
    }
}

/// Normalizes list limit according to the notes paging contract.
pub fn normalize_note_limit(limit: Option<u32>) -> u32 {
    match limit {
        Some(0) | None => NOTES_DEFAULT_LIMIT,
        Some(value) if value > NOTES_LIMIT_MAX => NOTES_LIMIT_MAX,
        Some(value) => value,
    }
}

fn replace_labels_in_tx(tx: &Transaction<'_>, note_id: &str, labels: &[String]) -> RepoResult<()> {
    tx.execute("DELETE FROM note_labels WHERE note_id = ?1;", [note_id])?;

    for label in labels {
        tx.execute(
            "INSERT OR IGNORE INTO labels (id, name, color, created_at)
             VALUES (?1, ?2, ?3, ?4);",
            params![
                Uuid::new_v4().to_string(),
                label.as_str(),
                DEFAULT_LABEL_COLOR.as_str(),
                now_epoch_ms(),
            ],
        )?;
        tx.execute(
            "INSERT OR IGNORE INTO note_labels (note_id, label_id)
             SELECT ?1, id
             FROM labels
             WHERE name = ?2 COLLATE NOCASE;",
            params![note_id, label.as_str()],
        )?;
    }
    Ok(())
}

fn note_from_row(conn: &Connection, row: &Row<'_>) -> RepoResult<Note> {
    let id_text: String = row.get("id")?;
    let id = parse_uuid(&id_text)?;
    let kind_text: String = row.get("kind")?;
    let color_text: String = row.get("color")?;
    let mood_text: Option<String> = row.get("mood")?;
    let checklist_json: String = row.get("checklist_json")?;

    let note = Note {
        id,
        title: row.get("title")?,
        content: row.get("content")?,
        kind: kind_text
            .parse::<NoteKind>()
            .map_err(|err| RepoError::InvalidData(format!("{err} in notes.kind")))?,
        checklist: serde_json::from_str::<Vec<ChecklistItem>>(&checklist_json)
            .map_err(|err| RepoError::InvalidData(format!("notes.checklist_json: {err}")))?,
        drawing_data: row.get("drawing_data")?,
        mood: mood_text
            .map(|value| value.parse::<Mood>())
            .transpose()
            .map_err(|err| RepoError::InvalidData(format!("{err} in notes.mood")))?,
        mood_confidence: row.get("mood_confidence")?,
        mood_detection: row.get("mood_detection")?,
        category: row.get("category")?,
        labels: load_labels_for_note(conn, &id_text)?,
        color: color_text
            .parse::<NoteColor>()
            .map_err(|err| RepoError::InvalidData(format!("{err} in notes.color")))?,
        is_pinned: row.get("is_pinned")?,
        is_archived: row.get("is_archived")?,
        is_favorite: row.get("is_favorite")?,
        image_url: row.get("image_url")?,
        audio_url: row.get("audio_url")?,
        link_url: row.get("link_url")?,
        link_text: row.get("link_text")?,
        reminder_at: row.get("reminder_at")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    };
    note.validate()?;
    Ok(note)
}

fn load_labels_for_note(conn: &Connection, note_id: &str) -> RepoResult<Vec<String>> {
    let mut stmt = conn.prepare(
        "SELECT l.name
         FROM note_labels nl
         INNER JOIN labels l ON l.id = nl.label_id
         WHERE nl.note_id = ?1;",
    )?;
    let mut rows = stmt.query([note_id])?;
    let mut names = Vec::new();
    while let Some(row) = rows.next()? {
        let value: String = row.get(0)?;
        names.push(value);
    }
    Ok(normalize_labels(&names))
}

fn encode_checklist(items: &[ChecklistItem]) -> RepoResult<String> {
    serde_json::to_string(items)
        .map_err(|err| RepoError::InvalidData(format!("checklist encode failed: {err}")))
}

fn parse_uuid(value: &str) -> RepoResult<NoteId> {
    Uuid::parse_str(value)
        .map_err(|_| RepoError::InvalidData(format!("invalid uuid value `{value}`")))
}

/// Checks that `table` exists with at least the listed columns.
pub(crate) fn ensure_table(
    conn: &Connection,
    table: &'static str,
    columns: &[&'static str],
) -> RepoResult<()> {
    if !table_exists(conn, table)? {
        return Err(RepoError::MissingRequiredTable(table));
    }
    for column in columns {
        if !table_has_column(conn, table, column)? {
            return Err(RepoError::MissingRequiredColumn {
                table,
                column: *column,
            });
        }
    }
    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::normalize_note_limit;

    #[test]
    fn limit_defaults_and_caps() {
        assert_eq!(normalize_note_limit(None), 100);
        assert_eq!(normalize_note_limit(Some(0)), 100);
        assert_eq!(normalize_note_limit(Some(7)), 7);
        assert_eq!(normalize_note_limit(Some(9_999)), 500);
    }
}
