//! Redaction boundary for sensitive values.
//!
//! A [`Secret`] holds an arbitrary payload for programmatic use but always
//! renders as the fixed [`REDACTED`] marker. Because redaction lives in the
//! `Debug`/`Display` implementations, a secret nested anywhere inside a
//! larger value is redacted at any depth of a `{:?}` rendering.

use std::any::Any;
use std::fmt;

/// The fixed marker substituted for every secret value.
pub const REDACTED: &str = "***REDACTED***";

/// Wraps a value so it can never leak into rendered output.
pub struct Secret {
    value: Box<dyn Any + Send + Sync>,
}

/// Wraps `value` in a [`Secret`] to keep it out of error call stacks,
/// logs and any other formatted output.
pub fn keep_secret<T: Any + Send + Sync>(value: T) -> Secret {
    Secret {
        value: Box::new(value),
    }
}

impl Secret {
    /// The wrapped payload, for programmatic use only.
    pub fn reveal<T: Any>(&self) -> Option<&T> {
        self.value.downcast_ref()
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(REDACTED)
    }
}

impl fmt::Display for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(REDACTED)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_marker_not_payload() {
        let secret = keep_secret("password123");
        assert_eq!(format!("{secret:?}"), REDACTED);
        assert_eq!(secret.to_string(), REDACTED);
    }

    #[test]
    fn reveal_returns_typed_payload() {
        let secret = keep_secret(String::from("token"));
        assert_eq!(secret.reveal::<String>().map(String::as_str), Some("token"));
        assert!(secret.reveal::<u32>().is_none());
    }

    #[test]
    fn redacts_when_nested() {
        #[derive(Debug)]
        #[allow(dead_code)]
        struct Credentials {
            user: &'static str,
            password: Secret,
        }
        let creds = Credentials {
            user: "alice",
            password: keep_secret("hunter2"),
        };
        let rendered = format!("{creds:?}");
        assert!(rendered.contains(REDACTED));
        assert!(!rendered.contains("hunter2"));
    }
}
