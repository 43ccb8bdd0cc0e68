use crate::redact::RedactionPolicy;
use crate::sink::{AuditSink, SinkError};
use crate::{AuditConfig, LogRecord};

/// Tracing target every audit line is emitted under.
pub const AUDIT_TARGET: &str = "admin_audit";

/// A sink that writes records through `tracing`.
///
/// Each record becomes one `info`-level event under the
/// [`AUDIT_TARGET`] target. The rendered message honours the sink's
/// [`RedactionPolicy`]; the raw template is attached as a field so the line
/// can still be grouped when values are masked.
///
/// Install a subscriber (e.g. `tracing_subscriber::fmt`) to see the output.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink {
    policy: RedactionPolicy,
}

impl TracingSink {
    /// Creates a sink with the given redaction policy.
    pub fn new(policy: RedactionPolicy) -> Self {
        Self { policy }
    }

    /// Creates a sink using the configuration's redaction policy.
    pub fn from_config(config: &AuditConfig) -> Self {
        Self::new(config.redaction())
    }

    /// Returns the redaction policy.
    pub fn policy(&self) -> RedactionPolicy {
        self.policy
    }
}

impl AuditSink for TracingSink {
    fn log(&self, record: &LogRecord) -> Result<(), SinkError> {
        let message = record.render_with(self.policy);
        tracing::info!(
            target: AUDIT_TARGET,
            template = %record.template(),
            sensitive = record.sensitive().len(),
            redaction = %self.policy,
            "{}",
            message
        );
        Ok(())
    }
}
