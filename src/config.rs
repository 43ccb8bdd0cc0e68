use std::collections::BTreeSet;

use crate::redact::RedactionPolicy;

/// Backend whose passwords the host manages itself.
pub const DATABASE_BACKEND: &str = "Database";

/// Settings for a [`UserManagementAudit`](crate::UserManagementAudit) and
/// its sinks.
///
/// Loading these from files or the environment is left to the host.
///
/// # Examples
///
/// ```
/// use admin_audit::{AuditConfig, RedactionPolicy};
///
/// let config = AuditConfig::new()
///     .with_local_password_backend("Sql")
///     .with_redaction(RedactionPolicy::Redact);
///
/// assert!(config.is_local_password_backend("Database"));
/// assert!(config.is_local_password_backend("Sql"));
/// assert!(!config.is_local_password_backend("LDAP"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditConfig {
    local_password_backends: BTreeSet<String>,
    redaction: RedactionPolicy,
}

impl AuditConfig {
    /// Creates the default configuration: only `Database` passwords are
    /// audited and sensitive values are revealed.
    pub fn new() -> Self {
        Self {
            local_password_backends: BTreeSet::from([DATABASE_BACKEND.to_string()]),
            redaction: RedactionPolicy::default(),
        }
    }

    /// Adds a backend whose password changes should be audited.
    pub fn with_local_password_backend(mut self, backend: impl Into<String>) -> Self {
        self.local_password_backends.insert(backend.into());
        self
    }

    /// Replaces the whole set of audited password backends.
    pub fn with_local_password_backends<I, S>(mut self, backends: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.local_password_backends = backends.into_iter().map(Into::into).collect();
        self
    }

    /// Sets how sinks treat sensitive fields.
    pub fn with_redaction(mut self, redaction: RedactionPolicy) -> Self {
        self.redaction = redaction;
        self
    }

    /// Returns `true` if password changes in `backend` are audited.
    ///
    /// Matching is exact and case-sensitive.
    pub fn is_local_password_backend(&self, backend: &str) -> bool {
        self.local_password_backends.contains(backend)
    }

    /// Returns the audited password backends.
    pub fn local_password_backends(&self) -> &BTreeSet<String> {
        &self.local_password_backends
    }

    /// Returns the redaction policy.
    pub fn redaction(&self) -> RedactionPolicy {
        self.redaction
    }
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self::new()
    }
}
