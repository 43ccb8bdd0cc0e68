use std::fmt;

use crate::sink::SinkError;

/// Errors that can occur while auditing user management actions.
#[derive(Debug)]
pub enum Error {
    /// The caller passed an event that violates its contract
    InvalidEvent(InvalidEvent),
    /// A log record failed its structural invariants
    Record(RecordError),
    /// The sink refused or failed to store a record
    Sink(SinkError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidEvent(e) => write!(f, "Invalid event: {}", e),
            Error::Record(e) => write!(f, "Invalid log record: {}", e),
            Error::Sink(e) => write!(f, "Audit sink failure: {}", e),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::InvalidEvent(e) => Some(e),
            Error::Record(e) => Some(e),
            Error::Sink(e) => Some(e),
        }
    }
}

impl From<InvalidEvent> for Error {
    fn from(e: InvalidEvent) -> Self {
        Error::InvalidEvent(e)
    }
}

impl From<RecordError> for Error {
    fn from(e: RecordError) -> Self {
        Error::Record(e)
    }
}

impl From<SinkError> for Error {
    fn from(e: SinkError) -> Self {
        Error::Sink(e)
    }
}

/// A malformed event, with the reason it was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidEvent {
    /// Which required field was missing
    pub kind: InvalidEventKind,
    /// Name of the event variant, for diagnostics
    pub event: &'static str,
}

impl InvalidEvent {
    /// Creates a new invalid-event error.
    pub fn new(kind: InvalidEventKind, event: &'static str) -> Self {
        Self { kind, event }
    }
}

impl fmt::Display for InvalidEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} in {} event", self.kind, self.event)
    }
}

impl std::error::Error for InvalidEvent {}

/// The kind of contract violation found in an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidEventKind {
    /// The user id is empty
    EmptyUid,
    /// A change event names no feature
    EmptyFeature,
    /// A password event names no backend
    EmptyBackend,
}

impl fmt::Display for InvalidEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvalidEventKind::EmptyUid => write!(f, "empty uid"),
            InvalidEventKind::EmptyFeature => write!(f, "empty feature"),
            InvalidEventKind::EmptyBackend => write!(f, "empty backend name"),
        }
    }
}

/// A log record whose template, fields and sensitive names disagree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordError {
    /// A sensitive name does not appear among the fields
    UnknownSensitiveField(String),
    /// The template has more `%s` placeholders than there are fields
    MissingField {
        /// Placeholders found in the template
        placeholders: usize,
        /// Fields supplied
        fields: usize,
    },
    /// The same field name was supplied twice
    DuplicateField(String),
}

impl fmt::Display for RecordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordError::UnknownSensitiveField(name) => {
                write!(f, "sensitive field '{}' was missing", name)
            }
            RecordError::MissingField {
                placeholders,
                fields,
            } => write!(
                f,
                "template expects {} values but {} fields were given",
                placeholders, fields
            ),
            RecordError::DuplicateField(name) => write!(f, "field '{}' given twice", name),
        }
    }
}

impl std::error::Error for RecordError {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::SinkErrorKind;
    use std::error::Error as _;

    #[test]
    fn invalid_event_display_names_variant() {
        let err = InvalidEvent::new(InvalidEventKind::EmptyUid, "created");
        assert_eq!(err.to_string(), "empty uid in created event");
    }

    #[test]
    fn record_error_display() {
        let err = RecordError::MissingField {
            placeholders: 2,
            fields: 1,
        };
        assert_eq!(
            err.to_string(),
            "template expects 2 values but 1 fields were given"
        );
        assert_eq!(
            RecordError::UnknownSensitiveField("uid".into()).to_string(),
            "sensitive field 'uid' was missing"
        );
    }

    #[test]
    fn error_wraps_sources() {
        let err: Error = SinkError::new(SinkErrorKind::Io).into();
        assert!(err.to_string().starts_with("Audit sink failure"));
        assert!(err.source().is_some());

        let err: Error =
            InvalidEvent::new(InvalidEventKind::EmptyBackend, "password_updated").into();
        assert!(matches!(
            err,
            Error::InvalidEvent(InvalidEvent {
                kind: InvalidEventKind::EmptyBackend,
                ..
            })
        ));
    }
}
