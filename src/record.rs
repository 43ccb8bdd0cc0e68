//! Structured log records handed to audit sinks.

use std::collections::BTreeSet;
use std::fmt;

use crate::error::RecordError;
use crate::redact::{RedactionPolicy, Sensitive};

/// One audit log line in structured form.
///
/// A record carries a `printf`-style template whose `%s` placeholders are
/// filled, in order, by the values of its fields. Some field names are marked
/// sensitive so the sink's redaction policy can mask them. `%%` renders as a
/// literal percent sign.
///
/// # Invariants
///
/// - Every sensitive name is a field name
/// - The template has no more placeholders than there are fields
/// - Field names are unique
///
/// # Example
///
/// ```
/// use admin_audit::{LogRecord, RedactionPolicy};
///
/// let record = LogRecord::new(
///     r#"User created: "%s""#,
///     [("uid", "alice")],
///     ["uid"],
/// )
/// .unwrap();
///
/// assert_eq!(record.render(), r#"User created: "alice""#);
/// assert_eq!(
///     record.render_with(RedactionPolicy::Redact),
///     r#"User created: "[REDACTED]""#
/// );
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct LogRecord {
    template: String,
    fields: Vec<(String, String)>,
    sensitive: BTreeSet<String>,
}

impl LogRecord {
    /// Builds a record after checking its invariants.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError`] if a field name repeats, a sensitive name is
    /// not a field, or the template needs more values than were given.
    pub fn new<K, V, N>(
        template: impl Into<String>,
        fields: impl IntoIterator<Item = (K, V)>,
        sensitive: impl IntoIterator<Item = N>,
    ) -> Result<Self, RecordError>
    where
        K: Into<String>,
        V: Into<String>,
        N: Into<String>,
    {
        let template = template.into();

        let mut seen = BTreeSet::new();
        let mut collected = Vec::new();
        for (name, value) in fields {
            let name = name.into();
            if !seen.insert(name.clone()) {
                return Err(RecordError::DuplicateField(name));
            }
            collected.push((name, value.into()));
        }

        let mut marked = BTreeSet::new();
        for name in sensitive {
            let name = name.into();
            if !seen.contains(&name) {
                return Err(RecordError::UnknownSensitiveField(name));
            }
            marked.insert(name);
        }

        let placeholders = count_placeholders(&template);
        if placeholders > collected.len() {
            return Err(RecordError::MissingField {
                placeholders,
                fields: collected.len(),
            });
        }

        Ok(Self {
            template,
            fields: collected,
            sensitive: marked,
        })
    }

    /// Returns the unrendered template.
    pub fn template(&self) -> &str {
        &self.template
    }

    /// Returns the fields in insertion order.
    pub fn fields(&self) -> &[(String, String)] {
        &self.fields
    }

    /// Looks up a field value by name.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Returns the names of the sensitive fields.
    pub fn sensitive(&self) -> &BTreeSet<String> {
        &self.sensitive
    }

    /// Returns `true` if `name` is marked sensitive.
    pub fn is_sensitive(&self, name: &str) -> bool {
        self.sensitive.contains(name)
    }

    /// Renders the message with every value shown.
    pub fn render(&self) -> String {
        self.render_with(RedactionPolicy::Reveal)
    }

    /// Renders the message, masking sensitive values if the policy says so.
    pub fn render_with(&self, policy: RedactionPolicy) -> String {
        let mut out = String::with_capacity(self.template.len());
        let mut values = self.fields.iter();
        let mut chars = self.template.chars().peekable();

        while let Some(c) = chars.next() {
            if c != '%' {
                out.push(c);
                continue;
            }
            match chars.peek() {
                Some('%') => {
                    chars.next();
                    out.push('%');
                }
                Some('s') => {
                    chars.next();
                    // Construction guarantees a value for every placeholder.
                    if let Some((name, value)) = values.next() {
                        if policy == RedactionPolicy::Redact && self.is_sensitive(name) {
                            out.push_str(&Sensitive::new(value).to_string());
                        } else {
                            out.push_str(value);
                        }
                    }
                }
                _ => out.push('%'),
            }
        }

        out
    }
}

/// Counts `%s` placeholders, skipping `%%` escapes.
fn count_placeholders(template: &str) -> usize {
    let mut count = 0;
    let mut chars = template.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '%' {
            match chars.peek() {
                Some('%') => {
                    chars.next();
                }
                Some('s') => {
                    chars.next();
                    count += 1;
                }
                _ => {}
            }
        }
    }
    count
}

impl fmt::Display for LogRecord {
    /// Displays the redacted rendering.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render_with(RedactionPolicy::Redact))
    }
}

impl fmt::Debug for LogRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        struct Fields<'a>(&'a LogRecord);

        impl fmt::Debug for Fields<'_> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                let mut map = f.debug_map();
                for (name, value) in &self.0.fields {
                    if self.0.is_sensitive(name) {
                        map.entry(name, &Sensitive::new(value));
                    } else {
                        map.entry(name, value);
                    }
                }
                map.finish()
            }
        }

        f.debug_struct("LogRecord")
            .field("template", &self.template)
            .field("fields", &Fields(self))
            .field("sensitive", &self.sensitive)
            .finish()
    }
}
