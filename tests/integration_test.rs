use std::sync::Arc;

use admin_audit::{
    AuditConfig, AuditSink, Error, InvalidEventKind, LogRecord, MemorySink, RedactionPolicy,
    SinkError, SinkErrorKind, TracingSink, UserEvent, UserManagementAudit,
};

fn setup() -> (Arc<MemorySink>, UserManagementAudit) {
    let sink = Arc::new(MemorySink::new());
    let audit = UserManagementAudit::new(sink.clone());
    (sink, audit)
}

#[test]
fn full_user_lifecycle_is_audited_in_order() {
    let (sink, audit) = setup();

    audit.handle(&UserEvent::created("alice")).unwrap();
    audit.assign("alice").unwrap();
    audit
        .handle(&UserEvent::changed("alice", "eMailAddress", "alice@example.com"))
        .unwrap();
    audit
        .handle(&UserEvent::changed("alice", "quota", "10GB"))
        .unwrap();
    audit
        .handle(&UserEvent::password_updated("alice", "Database"))
        .unwrap();
    audit
        .handle(&UserEvent::changed("alice", "enabled", false))
        .unwrap();
    audit.unassign("alice").unwrap();
    audit.handle(&UserEvent::deleted("alice")).unwrap();

    let lines: Vec<String> = sink.records().iter().map(LogRecord::render).collect();
    assert_eq!(
        lines,
        vec![
            r#"User created: "alice""#,
            r#"UserID assigned: "alice""#,
            "Email address changed for user alice",
            r#"Password of user "alice" has been changed"#,
            r#"User disabled: "alice""#,
            r#"UserID unassigned: "alice""#,
            r#"User deleted: "alice""#,
        ]
    );
}

#[test]
fn every_record_marks_its_only_field_sensitive() {
    let (sink, audit) = setup();

    audit.handle(&UserEvent::created("alice")).unwrap();
    audit
        .handle(&UserEvent::changed("alice", "enabled", true))
        .unwrap();
    audit.assign("alice").unwrap();

    sink.with_records(|records| {
        for record in records {
            assert_eq!(record.fields().len(), 1);
            let (name, value) = &record.fields()[0];
            assert_eq!(value, "alice");
            assert!(record.is_sensitive(name));
            assert_eq!(record.sensitive().len(), 1);
        }
    });
}

#[test]
fn redacted_rendering_hides_uids() {
    let (sink, audit) = setup();
    audit
        .handle(&UserEvent::password_updated("bob", "Database"))
        .unwrap();

    let record = &sink.records()[0];
    let redacted = record.render_with(RedactionPolicy::Redact);
    assert_eq!(redacted, r#"Password of user "[REDACTED]" has been changed"#);
    assert!(!format!("{:?}", record).contains("bob"));
}

#[test]
fn invalid_events_surface_to_the_host() {
    let (sink, audit) = setup();

    match audit.handle(&UserEvent::deleted("")) {
        Err(Error::InvalidEvent(e)) => assert_eq!(e.kind, InvalidEventKind::EmptyUid),
        other => panic!("expected invalid event, got {:?}", other),
    }
    assert!(sink.is_empty());
}

#[test]
fn shared_dispatcher_across_threads() {
    let (sink, audit) = setup();

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let audit = audit.clone();
            std::thread::spawn(move || {
                audit
                    .handle(&UserEvent::created(format!("user-{}", i)))
                    .unwrap();
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(sink.len(), 4);
}

#[test]
fn full_sink_error_reaches_caller() {
    let sink = Arc::new(MemorySink::bounded(1));
    let audit = UserManagementAudit::new(sink.clone());

    audit.assign("carol").unwrap();
    match audit.assign("dave") {
        Err(Error::Sink(e)) => assert_eq!(e.kind(), SinkErrorKind::Full),
        other => panic!("expected sink error, got {:?}", other),
    }
    assert_eq!(sink.len(), 1);
}

struct RejectEmail;

impl AuditSink for RejectEmail {
    fn log(&self, record: &LogRecord) -> Result<(), SinkError> {
        if record.template().starts_with("Email") {
            return Err(SinkError::new(SinkErrorKind::Rejected));
        }
        Ok(())
    }
}

#[test]
fn custom_sink_policy() {
    let audit = UserManagementAudit::new(Arc::new(RejectEmail));

    assert!(audit.handle(&UserEvent::created("alice")).is_ok());
    assert!(audit
        .handle(&UserEvent::changed("alice", "eMailAddress", "x@example.com"))
        .is_err());
}

#[test]
fn tracing_sink_from_config() {
    let config = AuditConfig::new().with_redaction(RedactionPolicy::Redact);
    let sink = Arc::new(TracingSink::from_config(&config));
    let audit = UserManagementAudit::with_config(sink, config);

    // Without a subscriber installed the event is dropped; the call still succeeds.
    audit.handle(&UserEvent::created("alice")).unwrap();
    assert_eq!(audit.config().redaction(), RedactionPolicy::Redact);
}
