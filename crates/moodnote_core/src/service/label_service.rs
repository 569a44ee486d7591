//! Label catalog use-cases.

use crate::model::label::{Label, DEFAULT_LABEL_COLOR};
use crate::model::note::NoteColor;
use crate::repo::error::RepoError;
use crate::repo::label_repo::LabelRepository;
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for label use-cases.
#[derive(Debug)]
pub enum LabelServiceError {
    /// Name is blank after trimming.
    BlankName,
    /// A label with the same normalized name exists.
    Duplicate(String),
    Repo(RepoError),
}

impl Display for LabelServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankName => write!(f, "label name must not be blank"),
            Self::Duplicate(name) => write!(f, "label `{name}` already exists"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for LabelServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for LabelServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Duplicate(name) => Self::Duplicate(name),
            other => Self::Repo(other),
        }
    }
}

pub struct LabelService<R: LabelRepository> {
    repo: R,
}

impl<R: LabelRepository> LabelService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates a label; `color` defaults to blue.
    pub fn create_label(
        &mut self,
        name: &str,
        color: Option<NoteColor>,
    ) -> Result<Label, LabelServiceError> {
        let label = Label::new(name, color.unwrap_or(DEFAULT_LABEL_COLOR))
            .ok_or(LabelServiceError::BlankName)?;
        self.repo.create_label(&label)?;
        info!(
            "event=label_create module=service status=ok label_id={} color={}",
            label.id, label.color
        );
        Ok(label)
    }

    /// Lists labels sorted by name.
    pub fn list_labels(&self) -> Result<Vec<Label>, LabelServiceError> {
        Ok(self.repo.list_labels()?)
    }
}
