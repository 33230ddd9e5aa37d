use std::io;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    TypeConflict,
    Ownership,
    Bounds,
    Schema,
    UnregisteredClass,
    MalformedDocument,
    InvalidArgument,
    InvalidHandle,
    Io,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::TypeConflict => "type conflict",
            ErrorKind::Ownership => "ownership violation",
            ErrorKind::Bounds => "bounds violation",
            ErrorKind::Schema => "schema violation",
            ErrorKind::UnregisteredClass => "unregistered class",
            ErrorKind::MalformedDocument => "malformed document",
            ErrorKind::InvalidArgument => "invalid argument",
            ErrorKind::InvalidHandle => "invalid handle",
            ErrorKind::Io => "io",
        }
    }
}

#[derive(Debug, Clone, thiserror::Error)]
#[error("{}: {message}{}", .kind.as_str(), key_suffix(.key))]
pub struct Error {
    pub kind: ErrorKind,
    pub message: String,
    pub key: Option<String>,
}

fn key_suffix(key: &Option<String>) -> String {
    match key {
        Some(key) => format!(" (at key {key:?})"),
        None => String::new(),
    }
}

impl Error {
    fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            key: None,
        }
    }

    pub fn type_conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::TypeConflict, message)
    }

    pub fn ownership(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Ownership, message)
    }

    pub fn bounds(index: usize, len: usize) -> Self {
        Self::new(
            ErrorKind::Bounds,
            format!("index {index} out of range for length {len}"),
        )
    }

    pub fn schema(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Schema, message)
    }

    pub fn unregistered_class(name: &str) -> Self {
        Self::new(
            ErrorKind::UnregisteredClass,
            format!("no factory registered for class {name:?}"),
        )
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::MalformedDocument, message)
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidArgument, message)
    }

    pub fn invalid_handle(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidHandle, message)
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        if self.key.is_none() {
            self.key = Some(key.into());
        }
        self
    }

    pub fn is(&self, kind: ErrorKind) -> bool {
        self.kind == kind
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Self::new(ErrorKind::Io, err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        if err.is_io() {
            return Self::new(ErrorKind::Io, err.to_string());
        }
        Self::new(ErrorKind::MalformedDocument, err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[rstest::rstest]
    fn display_includes_kind_and_key() {
        let err = Error::malformed("\"type\" must be a string").with_key("Health");
        assert_eq!(
            err.to_string(),
            "malformed document: \"type\" must be a string (at key \"Health\")"
        );
    }

    #[rstest::rstest]
    fn innermost_key_wins() {
        let err = Error::bounds(3, 2).with_key("inner").with_key("outer");
        assert_eq!(err.key.as_deref(), Some("inner"));
        assert!(err.is(ErrorKind::Bounds));
    }

    #[rstest::rstest]
    fn json_syntax_errors_are_malformed() {
        let err: Error = serde_json::from_str::<serde_json::Value>("{")
            .unwrap_err()
            .into();
        assert_eq!(err.kind, ErrorKind::MalformedDocument);
    }
}
