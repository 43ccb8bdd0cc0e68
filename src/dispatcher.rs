//! Turns user management actions into audit records.

use std::fmt;
use std::sync::Arc;

use crate::error::{Error, InvalidEvent, InvalidEventKind};
use crate::event::{FEATURE_EMAIL, FEATURE_ENABLED};
use crate::logging::AUDIT_TARGET;
use crate::{AuditConfig, AuditSink, LogRecord, UserEvent};

const USER_CREATED: &str = r#"User created: "%s""#;
const USER_DELETED: &str = r#"User deleted: "%s""#;
const USER_ENABLED: &str = r#"User enabled: "%s""#;
const USER_DISABLED: &str = r#"User disabled: "%s""#;
const EMAIL_CHANGED: &str = "Email address changed for user %s";
const PASSWORD_CHANGED: &str = r#"Password of user "%s" has been changed"#;
const UID_ASSIGNED: &str = r#"UserID assigned: "%s""#;
const UID_UNASSIGNED: &str = r#"UserID unassigned: "%s""#;

/// Audits user management actions.
///
/// Each call derives at most one [`LogRecord`] and hands it to the shared
/// sink. Nothing is remembered between calls: the same input always yields
/// the same record, and repeated inputs are logged repeatedly.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use admin_audit::{MemorySink, UserEvent, UserManagementAudit};
///
/// let sink = Arc::new(MemorySink::new());
/// let audit = UserManagementAudit::new(sink.clone());
///
/// audit.handle(&UserEvent::created("alice")).unwrap();
/// audit.handle(&UserEvent::changed("alice", "quota", "10GB")).unwrap();
///
/// let records = sink.records();
/// assert_eq!(records.len(), 1);
/// assert_eq!(records[0].template(), r#"User created: "%s""#);
/// assert_eq!(records[0].field("uid"), Some("alice"));
/// ```
#[derive(Clone)]
pub struct UserManagementAudit {
    sink: Arc<dyn AuditSink>,
    config: AuditConfig,
}

impl UserManagementAudit {
    /// Creates a dispatcher with the default configuration.
    pub fn new(sink: Arc<dyn AuditSink>) -> Self {
        Self::with_config(sink, AuditConfig::default())
    }

    /// Creates a dispatcher with an explicit configuration.
    pub fn with_config(sink: Arc<dyn AuditSink>, config: AuditConfig) -> Self {
        Self { sink, config }
    }

    /// Returns the active configuration.
    pub fn config(&self) -> &AuditConfig {
        &self.config
    }

    /// Logs the record for `event`, if it has one.
    ///
    /// Changes to features other than `enabled` and `eMailAddress`, and
    /// password updates in backends the host does not manage, are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidEvent`] for malformed events and
    /// [`Error::Sink`] if the sink fails.
    pub fn handle(&self, event: &UserEvent) -> Result<(), Error> {
        match self.derive(event)? {
            Some(record) => self.emit(&record),
            None => {
                tracing::debug!(
                    target: AUDIT_TARGET,
                    event = event.name(),
                    "event not audited"
                );
                Ok(())
            }
        }
    }

    /// Computes the record for `event` without logging it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidEvent`] if the event is malformed.
    pub fn derive(&self, event: &UserEvent) -> Result<Option<LogRecord>, Error> {
        event.validate()?;

        let record = match event {
            UserEvent::Created { uid } => Some(single(USER_CREATED, "uid", uid)?),
            UserEvent::Deleted { uid } => Some(single(USER_DELETED, "uid", uid)?),
            UserEvent::Changed {
                uid,
                feature,
                value,
            } => match feature.as_str() {
                FEATURE_ENABLED => {
                    let template = if value.is_true() {
                        USER_ENABLED
                    } else {
                        USER_DISABLED
                    };
                    Some(single(template, "user", uid)?)
                }
                FEATURE_EMAIL => Some(single(EMAIL_CHANGED, "user", uid)?),
                _ => None,
            },
            UserEvent::PasswordUpdated { uid, backend_name } => {
                if self.config.is_local_password_backend(backend_name) {
                    Some(single(PASSWORD_CHANGED, "user", uid)?)
                } else {
                    None
                }
            }
        };

        Ok(record)
    }

    /// Logs that a user backend assigned `uid`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidEvent`] for an empty uid and [`Error::Sink`]
    /// if the sink fails.
    pub fn assign(&self, uid: &str) -> Result<(), Error> {
        self.emit_uid(UID_ASSIGNED, "assign", uid)
    }

    /// Logs that a user backend unassigned `uid`. No user data is removed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidEvent`] for an empty uid and [`Error::Sink`]
    /// if the sink fails.
    pub fn unassign(&self, uid: &str) -> Result<(), Error> {
        self.emit_uid(UID_UNASSIGNED, "unassign", uid)
    }

    fn emit_uid(
        &self,
        template: &'static str,
        action: &'static str,
        uid: &str,
    ) -> Result<(), Error> {
        if uid.is_empty() {
            return Err(InvalidEvent::new(InvalidEventKind::EmptyUid, action).into());
        }
        let record = single(template, "uid", uid)?;
        self.emit(&record)
    }

    fn emit(&self, record: &LogRecord) -> Result<(), Error> {
        self.sink.log(record)?;
        Ok(())
    }
}

impl fmt::Debug for UserManagementAudit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserManagementAudit")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// A record with one sensitive field.
fn single(template: &'static str, name: &'static str, value: &str) -> Result<LogRecord, Error> {
    Ok(LogRecord::new(template, [(name, value)], [name])?)
}
