//! The logger consumer contract.
//!
//! Sinks implement the single-capability [`Logger`] trait; errors opt out
//! of logging by being wrapped in [`DontLog`]. [`TracingLogger`] bridges
//! the contract onto the `tracing` ecosystem.

use std::error::Error as StdError;
use std::fmt;

use crate::format::{format_function_call, Param};
use crate::BoxError;

/// A minimal logging sink: one printf-style capability.
pub trait Logger {
    fn printf(&self, args: fmt::Arguments<'_>);
}

/// Forwards every message to `tracing::error!`.
pub struct TracingLogger;

impl Logger for TracingLogger {
    fn printf(&self, args: fmt::Arguments<'_>) {
        tracing::error!("{args}");
    }
}

/// Marks an error as not worth logging without disturbing its chain.
#[derive(Debug)]
pub struct DontLog(pub BoxError);

/// Wraps `err` so [`should_log`] answers `false` for it.
pub fn dont_log(err: BoxError) -> BoxError {
    Box::new(DontLog(err))
}

impl fmt::Display for DontLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl StdError for DontLog {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        Some(self.0.as_ref() as &(dyn StdError + 'static))
    }
}

/// Whether an error should be logged: `false` for no error at all and for
/// errors marked with [`DontLog`], `true` otherwise.
pub fn should_log(err: Option<&(dyn StdError + 'static)>) -> bool {
    match err {
        None => false,
        Some(err) => !err.is::<DontLog>(),
    }
}

/// Logs a formatted function call with its parameters, if a logger is
/// present. Useful for tracing call sites next to the errors they produce.
pub fn log_function_call(logger: Option<&dyn Logger>, function: &str, params: &[Param]) {
    if let Some(logger) = logger {
        logger.printf(format_args!("{}", format_function_call(function, params)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params;
    use crate::sentinel::Sentinel;
    use std::sync::Mutex;

    struct CaptureLogger {
        messages: Mutex<Vec<String>>,
    }

    impl Logger for CaptureLogger {
        fn printf(&self, args: fmt::Arguments<'_>) {
            self.messages.lock().unwrap().push(args.to_string());
        }
    }

    #[test]
    fn should_log_none_is_false() {
        assert!(!should_log(None));
    }

    #[test]
    fn should_log_plain_error_is_true() {
        let err = Sentinel::new("plain");
        assert!(should_log(Some(&err)));
    }

    #[test]
    fn should_log_dont_log_is_false() {
        let err = dont_log(Box::new(Sentinel::new("quiet")));
        assert!(!should_log(Some(
            err.as_ref() as &(dyn StdError + 'static)
        )));
    }

    #[test]
    fn dont_log_preserves_message_and_chain() {
        let err = dont_log(Box::new(Sentinel::new("quiet")));
        assert_eq!(err.to_string(), "quiet");
        let inner = err.source().expect("source");
        assert!(inner.is::<Sentinel>());
    }

    #[test]
    fn log_function_call_without_logger_is_a_noop() {
        log_function_call(None, "my_func", &params![1]);
    }

    #[test]
    fn log_function_call_formats_the_call() {
        let logger = CaptureLogger {
            messages: Mutex::new(Vec::new()),
        };
        log_function_call(Some(&logger), "my_func", &params!["arg1", 42]);
        let messages = logger.messages.lock().unwrap();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0], "my_func(\"arg1\", 42)");
    }
}
