use std::fmt;

/// Placeholder written in place of a redacted value.
pub const REDACTED: &str = "[REDACTED]";

/// How a sink treats fields a record marks as sensitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RedactionPolicy {
    /// Write sensitive values as-is
    #[default]
    Reveal,
    /// Replace every sensitive value with [`REDACTED`]
    Redact,
}

impl fmt::Display for RedactionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RedactionPolicy::Reveal => write!(f, "reveal"),
            RedactionPolicy::Redact => write!(f, "redact"),
        }
    }
}

/// A field value that must not leak through formatting.
///
/// `Debug` and `Display` always print `[REDACTED]`. The value is only
/// reachable through [`expose`](Self::expose).
///
/// # Examples
///
/// ```
/// use admin_audit::Sensitive;
///
/// let uid = Sensitive::new("alice");
/// assert_eq!(format!("{}", uid), "[REDACTED]");
/// assert_eq!(format!("{:?}", uid), "[REDACTED]");
/// assert_eq!(*uid.expose(), "alice");
/// ```
// Do NOT derive Debug or implement Deref/AsRef: either would print or hand out the value implicitly.
pub struct Sensitive<T> {
    inner: T,
}

impl<T> Sensitive<T> {
    /// Wraps a sensitive value.
    pub fn new(value: T) -> Self {
        Self { inner: value }
    }

    /// Returns the wrapped value.
    pub fn expose(&self) -> &T {
        &self.inner
    }
}

impl<T> fmt::Debug for Sensitive<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(REDACTED)
    }
}

impl<T> fmt::Display for Sensitive<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(REDACTED)
    }
}
