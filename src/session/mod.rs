use crate::errors::{GenError, SubmitError};
use crate::wire::{FileSet, GeneratedFile};

#[derive(Debug, Clone, Default)]
pub enum State {
    #[default]
    Idle,
    Generating,
    Succeeded(FileSet),
    Failed(GenError),
}

/// Controller state for a single generation at a time. Moves to
/// `Generating` on submit and to `Succeeded`/`Failed` when that request
/// settles; nothing else changes it.
#[derive(Debug, Default)]
pub struct Session {
    state: State,
    selected: Option<String>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    pub fn is_busy(&self) -> bool {
        matches!(self.state, State::Generating)
    }

    /// Accept a submission. Returns the trimmed description to generate from.
    pub fn begin(&mut self, description: &str) -> Result<String, SubmitError> {
        if self.is_busy() {
            return Err(SubmitError::Busy);
        }
        let description = description.trim();
        if description.is_empty() {
            return Err(SubmitError::EmptyDescription);
        }
        self.state = State::Generating;
        self.selected = None;
        Ok(description.to_string())
    }

    /// Record the outcome of the in-flight request. Returns false, and
    /// changes nothing, when no request was in flight.
    pub fn settle(&mut self, outcome: Result<FileSet, GenError>) -> bool {
        if !self.is_busy() {
            tracing::warn!("settle called with no generation in flight");
            return false;
        }
        self.state = match outcome {
            Ok(files) if files.is_empty() => State::Failed(GenError::EmptyResult),
            Ok(files) => {
                self.selected = files.default_selection().map(|f| f.path.clone());
                State::Succeeded(files)
            }
            Err(e) => State::Failed(e),
        };
        true
    }

    pub fn files(&self) -> Option<&FileSet> {
        match &self.state {
            State::Succeeded(files) => Some(files),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&GenError> {
        match &self.state {
            State::Failed(e) => Some(e),
            _ => None,
        }
    }

    pub fn selected(&self) -> Option<&GeneratedFile> {
        let path = self.selected.as_deref()?;
        self.files()?.get(path)
    }

    /// Select a file by path. Unknown paths leave the selection alone.
    pub fn select(&mut self, path: &str) -> bool {
        let known = self.files().is_some_and(|files| files.get(path).is_some());
        if known {
            self.selected = Some(path.to_string());
        }
        known
    }
}
