use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathViolation {
    Empty,
    Absolute,
    EmptySegment,
    DotSegment(String),
    Backslash,
}

impl fmt::Display for PathViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathViolation::Empty => write!(f, "path is empty"),
            PathViolation::Absolute => write!(f, "path must be relative"),
            PathViolation::EmptySegment => write!(f, "path has an empty segment"),
            PathViolation::DotSegment(s) => write!(f, "path segment '{s}' is not allowed"),
            PathViolation::Backslash => write!(f, "path must use '/' separators"),
        }
    }
}

/// Check that `candidate` is a relative `/`-separated path that cannot climb
/// out of whatever root it is joined to.
///
/// Rules:
/// - non-empty, no leading `/`
/// - no empty segments (`a//b`, trailing `/`)
/// - no `..` segments
pub fn validate_relative_path(candidate: &str) -> Result<(), PathViolation> {
    if candidate.is_empty() {
        return Err(PathViolation::Empty);
    }
    if candidate.starts_with('/') {
        return Err(PathViolation::Absolute);
    }
    for seg in candidate.split('/') {
        match seg {
            "" => return Err(PathViolation::EmptySegment),
            ".." => return Err(PathViolation::DotSegment(seg.to_string())),
            _ => {}
        }
    }
    Ok(())
}

/// Stricter check for paths written to the local filesystem: on top of
/// `validate_relative_path`, no `.` segments and no `\` (a separator on
/// Windows).
pub fn validate_output_path(candidate: &str) -> Result<(), PathViolation> {
    validate_relative_path(candidate)?;
    if candidate.contains('\\') {
        return Err(PathViolation::Backslash);
    }
    if candidate.split('/').any(|seg| seg == ".") {
        return Err(PathViolation::DotSegment(".".into()));
    }
    Ok(())
}
