//! Redaction-aware rendering of errors, call stacks and parameters.
//!
//! Two layers live here:
//!
//! - [`Param`]: a captured parameter rendering, with
//!   [`format_function_call`] rendering a call as `function(p1, p2, …)`,
//!   substituting the redaction marker for secrets and truncating
//!   oversized renderings.
//! - [`format_error`]: the full error text: the innermost message first,
//!   then every call-stack layer from the innermost wrap outward, which is
//!   conventional stack-trace reading order.

use std::error::Error as StdError;
use std::fmt;

use crate::config::Config;
use crate::secret::REDACTED;
use crate::wrap::{WithCallStack, WithFuncParams};

/// Appended to a parameter rendering cut at [`Config::format_param_max_len`].
pub const TRUNCATED: &str = "…(TRUNCATED)";

/// Rendered by [`format_error`] when the wrap chain contains no plain
/// error node. Cannot happen for chains built by this crate.
const NO_WRAPPED_ERROR: &str = "no wrapped error found";

/// A captured function parameter: its `Debug` rendering, taken eagerly at
/// the capture site, plus the knowledge whether it is a
/// [`Secret`](crate::Secret).
///
/// Capturing the rendering instead of the value is what allows borrowed
/// function arguments (`&str`, `&T`) to be captured: the text is owned by
/// the `Param`, so the borrow ends with the capturing call instead of
/// having to live as long as the error.
pub struct Param {
    value: CapturedDebug,
    secret: bool,
}

/// `Debug` view writing the captured rendering verbatim, so the printer
/// hook sees the same text the original value would have produced.
struct CapturedDebug(String);

impl fmt::Debug for CapturedDebug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Param {
    pub fn new<T: fmt::Debug + ?Sized>(value: &T) -> Self {
        let rendered = format!("{value:?}");
        // A secret renders as the bare marker (string payloads render
        // quoted, so they cannot collide with it).
        let secret = rendered == REDACTED;
        Param {
            value: CapturedDebug(rendered),
            secret,
        }
    }

    /// True when the captured value is a [`Secret`](crate::Secret). The
    /// printer hook is never invoked on a secret.
    pub fn is_secret(&self) -> bool {
        self.secret
    }

    pub fn value(&self) -> &dyn fmt::Debug {
        &self.value
    }

    /// Renders this parameter: the redaction marker for secrets, otherwise
    /// the printer output truncated to the configured length bound.
    pub fn render(&self, config: &Config) -> String {
        if self.secret {
            return REDACTED.to_string();
        }
        let mut rendered = (config.printer)(self.value());
        if rendered.len() > config.format_param_max_len {
            let mut end = config.format_param_max_len;
            while end > 0 && !rendered.is_char_boundary(end) {
                end -= 1;
            }
            rendered.truncate(end);
            rendered.push_str(TRUNCATED);
        }
        rendered
    }
}

impl fmt::Debug for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.secret {
            f.write_str(REDACTED)
        } else {
            f.write_str(&self.value.0)
        }
    }
}

/// Collects function parameters into a `Vec<Param>`.
///
/// Each parameter is captured by reference and rendered immediately, so
/// borrowed function arguments work as-is:
///
/// ```
/// use errstack::{keep_secret, params};
///
/// fn login(user: &str, attempts: u32) -> Vec<errstack::Param> {
///     params![user, attempts, keep_secret("pw")]
/// }
/// assert_eq!(login("alice", 2).len(), 3);
/// ```
#[macro_export]
macro_rules! params {
    () => {
        ::std::vec::Vec::<$crate::Param>::new()
    };
    ($($param:expr),+ $(,)?) => {
        ::std::vec![$($crate::Param::new(&$param)),+]
    };
}

/// Renders `function(p1, p2, …)` using the process-wide configuration's
/// call-formatting hook.
pub fn format_function_call(function: &str, params: &[Param]) -> String {
    let config = Config::global();
    (config.format_function_call)(config, function, params)
}

/// The default call-formatting hook: `function(p1, p2, …)` with each
/// parameter rendered through [`Param::render`].
pub fn default_format_function_call(config: &Config, function: &str, params: &[Param]) -> String {
    let mut out = String::with_capacity(function.len() + 2 + params.len() * 8);
    out.push_str(function);
    out.push('(');
    for (i, param) in params.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        out.push_str(&param.render(config));
    }
    out.push(')');
    out
}

/// Renders the full text of an error using the process-wide configuration.
///
/// See [`format_error_with`].
pub fn format_error(err: &(dyn StdError + 'static)) -> String {
    format_error_with(Config::global(), err)
}

/// Renders the full text of an error: walks the wrap chain from outermost
/// to innermost collecting each call-stack layer plus the first node that
/// is neither, then emits the innermost message followed by the collected
/// frames in reverse, deepest call first.
pub fn format_error_with(config: &Config, err: &(dyn StdError + 'static)) -> String {
    let mut calls: Vec<String> = Vec::new();
    let mut message: Option<String> = None;

    let mut node: Option<&(dyn StdError + 'static)> = Some(err);
    while let Some(current) = node {
        if let Some(with_params) = current.downcast_ref::<WithFuncParams>() {
            calls.push(with_params.format_call(config));
        } else if let Some(with_stack) = current.downcast_ref::<WithCallStack>() {
            calls.push(with_stack.call_stack().format(config));
        } else if message.is_none() {
            message = Some(current.to_string());
        }
        node = current.source();
    }

    let mut out = message.unwrap_or_else(|| NO_WRAPPED_ERROR.to_string());
    out.push('\n');
    for call in calls.iter().rev() {
        out.push_str(call);
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::secret::keep_secret;

    #[test]
    fn formats_call_without_params() {
        assert_eq!(format_function_call("no_args", &params![]), "no_args()");
    }

    #[test]
    fn formats_call_with_params() {
        let rendered = format_function_call("process_user", &params!["alice", 42]);
        assert_eq!(rendered, "process_user(\"alice\", 42)");
    }

    #[test]
    fn secret_param_renders_marker_only() {
        let rendered = format_function_call("login", &params!["alice", keep_secret("pw")]);
        assert!(rendered.contains(REDACTED));
        assert!(!rendered.contains("pw"));
    }

    #[test]
    fn oversized_param_is_truncated_at_char_boundary() {
        let config = Config {
            format_param_max_len: 10,
            ..Config::new()
        };
        // "ä" is two bytes; the 10-byte cut would split the sixth one.
        let param = Param::new(&"äääääää".to_string());
        let rendered = param.render(&config);
        assert!(rendered.ends_with(TRUNCATED));
        let kept = rendered.strip_suffix(TRUNCATED).unwrap();
        assert!(kept.len() <= 10);
        assert!(std::str::from_utf8(kept.as_bytes()).is_ok());
    }

    #[test]
    fn param_within_limit_is_untouched() {
        let config = Config::new();
        let param = Param::new("short");
        assert_eq!(param.render(&config), "\"short\"");
    }

    #[test]
    fn captures_borrowed_arguments() {
        fn render(user_id: &str, age: u32) -> String {
            format_function_call("load_profile", &params![user_id, age])
        }
        assert_eq!(render("alice", 42), "load_profile(\"alice\", 42)");
    }

    #[test]
    fn custom_printer_is_used() {
        let config = Config {
            printer: |_| "<value>".to_string(),
            ..Config::new()
        };
        let param = Param::new(&123);
        assert_eq!(param.render(&config), "<value>");
    }

    #[test]
    fn custom_printer_never_sees_secret_payload() {
        let config = Config {
            printer: |_| panic!("printer must not run on secrets"),
            ..Config::new()
        };
        let param = Param::new(&keep_secret("pw"));
        assert_eq!(param.render(&config), REDACTED);
    }
}
