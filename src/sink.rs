use std::fmt;
use std::sync::{Mutex, PoisonError};

use crate::LogRecord;

/// Why an [`AuditSink`] could not take a record.
///
/// The dispatcher passes this through unchanged inside [`Error::Sink`](crate::Error::Sink).
///
/// # Examples
///
/// ```
/// use admin_audit::{SinkError, SinkErrorKind};
///
/// let error = SinkError::with_message(SinkErrorKind::Io, "disk full");
/// assert_eq!(error.kind(), SinkErrorKind::Io);
/// assert_eq!(error.message(), Some("disk full"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SinkError {
    kind: SinkErrorKind,
    message: Option<String>,
}

impl SinkError {
    /// Creates an error of `kind` with no detail.
    pub fn new(kind: SinkErrorKind) -> Self {
        Self {
            kind,
            message: None,
        }
    }

    /// Creates an error of `kind` with a human-readable detail.
    pub fn with_message(kind: SinkErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: Some(message.into()),
        }
    }

    /// Returns what went wrong.
    pub fn kind(&self) -> SinkErrorKind {
        self.kind
    }

    /// Returns the detail, if the sink gave one.
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }
}

impl fmt::Display for SinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(msg) = &self.message {
            return write!(f, "sink error ({}): {}", self.kind, msg);
        }
        write!(f, "sink error ({})", self.kind)
    }
}

impl std::error::Error for SinkError {}

/// Kind of sink error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkErrorKind {
    /// I/O error occurred while writing the record.
    Io,
    /// A bounded sink already holds its maximum number of records.
    Full,
    /// A writer panicked while holding the sink's lock.
    Poisoned,
    /// The sink's own policy refused the record.
    Rejected,
}

impl fmt::Display for SinkErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io => write!(f, "I/O error"),
            Self::Full => write!(f, "sink full"),
            Self::Poisoned => write!(f, "lock poisoned"),
            Self::Rejected => write!(f, "record rejected"),
        }
    }
}

/// The logging backend that stores or renders audit records.
///
/// The dispatcher shares one sink across calls and threads, so
/// implementations must be `Send + Sync`.
pub trait AuditSink: Send + Sync {
    /// Writes one record.
    ///
    /// # Errors
    ///
    /// Returns `SinkError` if the record could not be stored.
    fn log(&self, record: &LogRecord) -> Result<(), SinkError>;
}

/// A sink that collects records in memory.
///
/// Useful for tests and for hosts that forward records themselves.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use admin_audit::{MemorySink, UserManagementAudit};
///
/// let sink = Arc::new(MemorySink::new());
/// let audit = UserManagementAudit::new(sink.clone());
///
/// audit.assign("carol").unwrap();
///
/// let records = sink.records();
/// assert_eq!(records.len(), 1);
/// assert_eq!(records[0].render(), r#"UserID assigned: "carol""#);
/// ```
#[derive(Debug, Default)]
pub struct MemorySink {
    records: Mutex<Vec<LogRecord>>,
    limit: Option<usize>,
}

impl MemorySink {
    /// Creates a new, unbounded sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a sink that refuses records once it holds `limit` of them.
    pub fn bounded(limit: usize) -> Self {
        Self {
            records: Mutex::new(Vec::new()),
            limit: Some(limit),
        }
    }

    /// Returns the number of stored records.
    pub fn len(&self) -> usize {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Returns `true` if no record has been stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Provides borrowed access to the stored records.
    pub fn with_records<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&[LogRecord]) -> R,
    {
        f(&self.records.lock().unwrap_or_else(PoisonError::into_inner))
    }

    /// Returns a snapshot of the stored records.
    pub fn records(&self) -> Vec<LogRecord> {
        self.with_records(|records| records.to_vec())
    }

    /// Removes every stored record.
    pub fn clear(&self) {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    /// Consumes the sink and returns the stored records.
    pub fn into_vec(self) -> Vec<LogRecord> {
        self.records
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl AuditSink for MemorySink {
    fn log(&self, record: &LogRecord) -> Result<(), SinkError> {
        let mut records = self
            .records
            .lock()
            .map_err(|_| SinkError::new(SinkErrorKind::Poisoned))?;

        if let Some(limit) = self.limit {
            if records.len() >= limit {
                return Err(SinkError::with_message(
                    SinkErrorKind::Full,
                    format!("limit of {} records reached", limit),
                ));
            }
        }

        records.push(record.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::panic::{self, AssertUnwindSafe};
    use std::sync::Arc;
    use std::thread;

    fn record(uid: &str) -> LogRecord {
        LogRecord::new(r#"User created: "%s""#, [("uid", uid)], ["uid"]).unwrap()
    }

    #[test]
    fn sink_error_display() {
        assert_eq!(
            SinkError::new(SinkErrorKind::Poisoned).to_string(),
            "sink error (lock poisoned)"
        );
        assert_eq!(
            SinkError::with_message(SinkErrorKind::Io, "disk full").to_string(),
            "sink error (I/O error): disk full"
        );
    }

    #[test]
    fn sink_error_kinds_display() {
        assert_eq!(SinkErrorKind::Io.to_string(), "I/O error");
        assert_eq!(SinkErrorKind::Full.to_string(), "sink full");
        assert_eq!(SinkErrorKind::Rejected.to_string(), "record rejected");
    }

    #[test]
    fn memory_sink_starts_empty() {
        let sink = MemorySink::new();
        assert!(sink.is_empty());
        assert_eq!(sink.len(), 0);
    }

    #[test]
    fn memory_sink_keeps_order() {
        let sink = MemorySink::new();
        for uid in ["a", "b", "c"] {
            sink.log(&record(uid)).expect("should succeed");
        }

        let uids: Vec<String> = sink
            .into_vec()
            .iter()
            .map(|r| r.field("uid").unwrap_or_default().to_string())
            .collect();
        assert_eq!(uids, vec!["a", "b", "c"]);
    }

    #[test]
    fn memory_sink_with_records_is_borrowed() {
        let sink = MemorySink::new();
        sink.log(&record("alice")).unwrap();

        let count = sink.with_records(|records| records.len());
        assert_eq!(count, 1);
    }

    #[test]
    fn memory_sink_can_be_cleared() {
        let sink = MemorySink::new();
        sink.log(&record("alice")).unwrap();
        sink.clear();
        assert!(sink.is_empty());
    }

    #[test]
    fn bounded_sink_reports_full_without_side_effects() {
        let sink = MemorySink::bounded(1);
        sink.log(&record("alice")).unwrap();

        let err = sink.log(&record("bob")).unwrap_err();
        assert_eq!(err.kind(), SinkErrorKind::Full);
        assert_eq!(sink.len(), 1);
    }

    #[test]
    fn poisoned_sink_refuses_writes_but_stays_readable() {
        let sink = MemorySink::new();
        sink.log(&record("alice")).unwrap();

        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            sink.with_records(|_| panic!("reader panicked while holding the lock"))
        }));
        assert!(result.is_err());

        let err = sink.log(&record("bob")).unwrap_err();
        assert_eq!(err.kind(), SinkErrorKind::Poisoned);

        assert_eq!(sink.len(), 1);
        assert_eq!(sink.records()[0].field("uid"), Some("alice"));
    }

    #[test]
    fn poisoned_sink_error_reaches_dispatcher_caller() {
        let sink = Arc::new(MemorySink::new());
        let audit = crate::UserManagementAudit::new(sink.clone());

        let _ = panic::catch_unwind(AssertUnwindSafe(|| {
            sink.with_records(|_| panic!("reader panicked while holding the lock"))
        }));

        match audit.handle(&crate::UserEvent::created("bob")) {
            Err(crate::Error::Sink(e)) => assert_eq!(e.kind(), SinkErrorKind::Poisoned),
            other => panic!("expected poisoned sink, got {:?}", other),
        }
        assert!(sink.is_empty());
    }

    #[test]
    fn memory_sink_accepts_concurrent_writers() {
        let sink = Arc::new(MemorySink::new());

        let handles: Vec<_> = (0..4)
            .map(|i| {
                let sink = Arc::clone(&sink);
                thread::spawn(move || {
                    for j in 0..10 {
                        sink.log(&record(&format!("user-{}-{}", i, j))).unwrap();
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(sink.len(), 40);
    }
}
