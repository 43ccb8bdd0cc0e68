//! User lifecycle events emitted by the host's user management.
//!
//! Events are immutable descriptions of something that already happened.
//! The emitter owns them; the dispatcher only borrows them for one call.

use std::fmt;

use crate::error::{InvalidEvent, InvalidEventKind};

/// Feature name the host uses when a user account is enabled or disabled.
pub const FEATURE_ENABLED: &str = "enabled";

/// Feature name the host uses when a user's email address changes.
pub const FEATURE_EMAIL: &str = "eMailAddress";

/// The new value of a changed user feature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeatureValue {
    /// A boolean flag, e.g. `enabled`
    Bool(bool),
    /// A textual value, e.g. an email address or a quota like `10GB`
    Text(String),
    /// An integral value
    Int(i64),
    /// The feature was cleared
    Null,
}

impl FeatureValue {
    /// Returns `true` only for `Bool(true)`.
    ///
    /// Truthy-looking text such as `"true"` or `"1"` does not count.
    pub fn is_true(&self) -> bool {
        matches!(self, FeatureValue::Bool(true))
    }
}

impl fmt::Display for FeatureValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeatureValue::Bool(b) => write!(f, "{}", b),
            FeatureValue::Text(s) => f.write_str(s),
            FeatureValue::Int(i) => write!(f, "{}", i),
            FeatureValue::Null => f.write_str("null"),
        }
    }
}

impl From<bool> for FeatureValue {
    fn from(b: bool) -> Self {
        FeatureValue::Bool(b)
    }
}

impl From<&str> for FeatureValue {
    fn from(s: &str) -> Self {
        FeatureValue::Text(s.to_string())
    }
}

impl From<String> for FeatureValue {
    fn from(s: String) -> Self {
        FeatureValue::Text(s)
    }
}

impl From<i64> for FeatureValue {
    fn from(i: i64) -> Self {
        FeatureValue::Int(i)
    }
}

/// A user lifecycle event.
///
/// # Example
///
/// ```
/// use admin_audit::UserEvent;
///
/// let event = UserEvent::changed("alice", "enabled", true);
/// assert_eq!(event.uid(), "alice");
/// assert!(event.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserEvent {
    /// A user account was created
    Created {
        /// User id
        uid: String,
    },
    /// A user account was deleted
    Deleted {
        /// User id
        uid: String,
    },
    /// A property of a user account changed
    Changed {
        /// User id
        uid: String,
        /// Name of the changed feature
        feature: String,
        /// The feature's new value
        value: FeatureValue,
    },
    /// A user's password was updated
    PasswordUpdated {
        /// User id
        uid: String,
        /// Name of the user backend holding the credential
        backend_name: String,
    },
}

impl UserEvent {
    /// Creates a `Created` event.
    pub fn created(uid: impl Into<String>) -> Self {
        UserEvent::Created { uid: uid.into() }
    }

    /// Creates a `Deleted` event.
    pub fn deleted(uid: impl Into<String>) -> Self {
        UserEvent::Deleted { uid: uid.into() }
    }

    /// Creates a `Changed` event.
    pub fn changed(
        uid: impl Into<String>,
        feature: impl Into<String>,
        value: impl Into<FeatureValue>,
    ) -> Self {
        UserEvent::Changed {
            uid: uid.into(),
            feature: feature.into(),
            value: value.into(),
        }
    }

    /// Creates a `PasswordUpdated` event.
    pub fn password_updated(uid: impl Into<String>, backend_name: impl Into<String>) -> Self {
        UserEvent::PasswordUpdated {
            uid: uid.into(),
            backend_name: backend_name.into(),
        }
    }

    /// Returns the id of the user the event is about.
    pub fn uid(&self) -> &str {
        match self {
            UserEvent::Created { uid }
            | UserEvent::Deleted { uid }
            | UserEvent::Changed { uid, .. }
            | UserEvent::PasswordUpdated { uid, .. } => uid,
        }
    }

    /// Returns a short, stable name for the variant.
    pub fn name(&self) -> &'static str {
        match self {
            UserEvent::Created { .. } => "created",
            UserEvent::Deleted { .. } => "deleted",
            UserEvent::Changed { .. } => "changed",
            UserEvent::PasswordUpdated { .. } => "password_updated",
        }
    }

    /// Checks that every required field is present.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidEvent`] naming the first empty field.
    pub fn validate(&self) -> Result<(), InvalidEvent> {
        let fail = |kind: InvalidEventKind| -> Result<(), InvalidEvent> {
            Err(InvalidEvent::new(kind, self.name()))
        };

        if self.uid().is_empty() {
            return fail(InvalidEventKind::EmptyUid);
        }
        match self {
            UserEvent::Changed { feature, .. } if feature.is_empty() => {
                fail(InvalidEventKind::EmptyFeature)
            }
            UserEvent::PasswordUpdated { backend_name, .. } if backend_name.is_empty() => {
                fail(InvalidEventKind::EmptyBackend)
            }
            _ => Ok(()),
        }
    }
}
