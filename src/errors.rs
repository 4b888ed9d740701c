use thiserror::Error;

/// Every failure a generation can end in. `Display` is what the user sees;
/// the extra fields are for the log only.
#[derive(Error, Debug, Clone)]
pub enum GenError {
    #[error("{0}")]
    Transport(String),

    #[error("Could not parse the generated content. The model may have returned an invalid format. Check the log for the raw response.")]
    Parse { reason: String, raw: String },

    #[error("The model returned an empty set of files. Please try a different description.")]
    EmptyResult,

    #[error("path conflict at '{path}': '{segment}' is used as both a file and a directory")]
    PathConflict { path: String, segment: String },

    #[error("Failed to build archive: {0}")]
    Archive(String),
}

impl GenError {
    /// Keeps the whole cause chain, e.g. a missing API key or a refused connection.
    pub fn transport(e: &anyhow::Error) -> Self {
        GenError::Transport(format!("{e:#}"))
    }

    pub fn parse(reason: impl Into<String>, raw: &str) -> Self {
        GenError::Parse { reason: reason.into(), raw: raw.to_string() }
    }

    pub fn label(&self) -> &'static str {
        match self {
            GenError::Transport(_) => "transport",
            GenError::Parse { .. } => "parse",
            GenError::EmptyResult => "empty-result",
            GenError::PathConflict { .. } => "path-conflict",
            GenError::Archive(_) => "archive",
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SubmitError {
    #[error("description must not be empty")]
    EmptyDescription,
    #[error("a generation is already in progress")]
    Busy,
}
