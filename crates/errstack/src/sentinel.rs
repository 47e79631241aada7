//! `Sentinel`: a declarable constant error value.

use std::borrow::Cow;

/// An error that is nothing but a message.
///
/// Meant for declaring `const` sentinel errors that can be compared by
/// value and recovered from an error tree with the query functions:
///
/// ```
/// use errstack::Sentinel;
///
/// const ERR_USER_NOT_FOUND: Sentinel = Sentinel::new("user not found");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, thiserror::Error)]
#[error("{0}")]
pub struct Sentinel(Cow<'static, str>);

impl Sentinel {
    /// A sentinel from a static message, usable in `const` position.
    pub const fn new(text: &'static str) -> Self {
        Sentinel(Cow::Borrowed(text))
    }

    /// A sentinel from a runtime message.
    pub fn from_text(text: impl Into<String>) -> Self {
        Sentinel(Cow::Owned(text.into()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for Sentinel {
    fn from(text: String) -> Self {
        Sentinel(Cow::Owned(text))
    }
}

impl From<&'static str> for Sentinel {
    fn from(text: &'static str) -> Self {
        Sentinel(Cow::Borrowed(text))
    }
}
