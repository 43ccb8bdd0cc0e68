//! Example: auditing a user's lifecycle through `tracing`.
//!
//! Run with: cargo run --example user_lifecycle

use std::sync::Arc;

use admin_audit::{AuditConfig, RedactionPolicy, TracingSink, UserEvent, UserManagementAudit};

fn main() -> Result<(), admin_audit::Error> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    println!("=== Revealing sink ===\n");
    let audit = UserManagementAudit::new(Arc::new(TracingSink::default()));
    run(&audit)?;

    println!("\n=== Redacting sink ===\n");
    let config = AuditConfig::new().with_redaction(RedactionPolicy::Redact);
    let audit =
        UserManagementAudit::with_config(Arc::new(TracingSink::from_config(&config)), config);
    run(&audit)?;

    Ok(())
}

fn run(audit: &UserManagementAudit) -> Result<(), admin_audit::Error> {
    audit.handle(&UserEvent::created("alice"))?;
    audit.assign("alice")?;
    audit.handle(&UserEvent::changed("alice", "eMailAddress", "alice@example.com"))?;
    audit.handle(&UserEvent::changed("alice", "quota", "10GB"))?; // not audited
    audit.handle(&UserEvent::password_updated("alice", "Database"))?;
    audit.handle(&UserEvent::password_updated("alice", "LDAP"))?; // not audited
    audit.handle(&UserEvent::changed("alice", "enabled", false))?;
    audit.unassign("alice")?;
    audit.handle(&UserEvent::deleted("alice"))?;
    Ok(())
}
