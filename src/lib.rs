//! Structured audit logging for user management.
//!
//! This crate turns user lifecycle events emitted by a host application into
//! audit log records:
//! - **Events**: a closed set of user lifecycle notifications ([`UserEvent`])
//! - **Records**: a template, ordered fields and the names of sensitive fields ([`LogRecord`])
//! - **Sinks**: the injected backend that stores or renders records ([`AuditSink`])
//!
//! # Core Types
//!
//! - [`UserManagementAudit`]: Maps events and backend calls to records
//! - [`LogRecord`]: Validated template + fields + sensitivity markers
//! - [`MemorySink`]: Collects records in memory
//! - [`TracingSink`]: Emits records through `tracing` with optional redaction
//! - [`Sensitive<T>`]: Wrapper that redacts values in `Debug`/`Display`
//! - [`AuditConfig`]: Audited password backends and redaction policy
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//! use admin_audit::{MemorySink, UserEvent, UserManagementAudit};
//!
//! let sink = Arc::new(MemorySink::new());
//! let audit = UserManagementAudit::new(sink.clone());
//!
//! audit.handle(&UserEvent::changed("alice", "enabled", false)).unwrap();
//! audit.handle(&UserEvent::password_updated("bob", "LDAP")).unwrap(); // not audited
//!
//! let records = sink.records();
//! assert_eq!(records.len(), 1);
//! assert_eq!(records[0].render(), r#"User disabled: "alice""#);
//! assert_eq!(records[0].to_string(), r#"User disabled: "[REDACTED]""#);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod dispatcher;
mod error;
mod event;
mod logging;
mod record;
mod redact;
mod sink;

pub use config::{AuditConfig, DATABASE_BACKEND};
pub use dispatcher::UserManagementAudit;
pub use error::{Error, InvalidEvent, InvalidEventKind, RecordError};
pub use event::{FEATURE_EMAIL, FEATURE_ENABLED, FeatureValue, UserEvent};
pub use logging::{AUDIT_TARGET, TracingSink};
pub use record::LogRecord;
pub use redact::{REDACTED, RedactionPolicy, Sensitive};
pub use sink::{AuditSink, MemorySink, SinkError, SinkErrorKind};
