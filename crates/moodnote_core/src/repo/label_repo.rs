//! Label catalog persistence.
//!
//! # Invariants
//! - Label names are stored normalized and are unique ignoring case.
//! - Listing is ordered by name.

use crate::model::label::{Label, LabelId};
use crate::model::note::NoteColor;
use crate::repo::error::{RepoError, RepoResult};
use crate::repo::note_repo::ensure_table;
use rusqlite::{params, Connection, ErrorCode, Row};
use uuid::Uuid;

/// Repository interface for the label catalog.
pub trait LabelRepository {
    /// Inserts one label.
    ///
    /// # Errors
    /// - [`RepoError::Duplicate`] when the name is already taken.
    fn create_label(&mut self, label: &Label) -> RepoResult<LabelId>;
    fn list_labels(&self) -> RepoResult<Vec<Label>>;
}

/// SQLite-backed label repository.
pub struct SqliteLabelRepository<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> SqliteLabelRepository<'conn> {
    pub fn try_new(conn: &'conn mut Connection) -> RepoResult<Self> {
        ensure_table(conn, "labels", &["id", "name", "color", "created_at"])?;
        Ok(Self { conn })
    }
}

impl LabelRepository for SqliteLabelRepository<'_> {
    fn create_label(&mut self, label: &Label) -> RepoResult<LabelId> {
        let result = self.conn.execute(
            "INSERT INTO labels (id, name, color, created_at) VALUES (?1, ?2, ?3, ?4);",
            params![
                label.id.to_string(),
                label.name.as_str(),
                label.color.as_str(),
                label.created_at,
            ],
        );

        match result {
            Ok(_) => Ok(label.id),
            Err(rusqlite::Error::SqliteFailure(err, _))
                if err.code == ErrorCode::ConstraintViolation =>
            {
                Err(RepoError::Duplicate(label.name.clone()))
            }
            Err(err) => Err(err.into()),
        }
    }

    fn list_labels(&self) -> RepoResult<Vec<Label>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, color, created_at
             FROM labels
             ORDER BY name ASC;",
        )?;
        let mut rows = stmt.query([])?;
        let mut labels = Vec::new();
        while let Some(row) = rows.next()? {
            labels.push(label_from_row(row)?);
        }
        Ok(labels)
    }
}

fn label_from_row(row: &Row<'_>) -> RepoResult<Label> {
    let id_text: String = row.get(0)?;
    let color_text: String = row.get(2)?;
    Ok(Label {
        id: Uuid::parse_str(&id_text)
            .map_err(|_| RepoError::InvalidData(format!("invalid uuid value `{id_text}`")))?,
        name: row.get(1)?,
        color: color_text
            .parse::<NoteColor>()
            .map_err(|err| RepoError::InvalidData(format!("{err} in labels.color")))?,
        created_at: row.get(3)?,
    })
}
