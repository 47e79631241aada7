//! Converting recovered panics into errors.
//!
//! A panic payload is classified ([`error_from_panic`]): an error value
//! passes through, string payloads become sentinel leaves, anything else
//! degrades to a generic description. The catch helpers re-attach a call
//! stack at the recovery point, and a panic recovered while an error was
//! already set is chained onto it instead of silently replacing it.

use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};

use crate::format::Param;
use crate::sentinel::Sentinel;
use crate::wrap::{wrap_with_call_stack_skip, wrap_with_func_params_skip};
use crate::BoxError;

/// Classifies a recovered panic payload as an error, without wrapping it.
pub fn error_from_panic(payload: Box<dyn Any + Send>) -> BoxError {
    let payload = match payload.downcast::<BoxError>() {
        Ok(err) => return *err,
        Err(payload) => payload,
    };
    let payload = match payload.downcast::<String>() {
        Ok(text) => return Box::new(Sentinel::from_text(*text)),
        Err(payload) => payload,
    };
    match payload.downcast::<&'static str>() {
        Ok(text) => Box::new(Sentinel::new(*text)),
        Err(_) => Box::new(Sentinel::new("panic with non-string payload")),
    }
}

/// Converts a recovered panic payload into a call-stack-wrapped error.
///
/// When `prior` carries an error that was already set before the panic,
/// the panic is chained onto it via [`PanickedWithError`] rather than
/// dropping either of the two.
pub fn panic_to_error(payload: Box<dyn Any + Send>, prior: Option<BoxError>) -> BoxError {
    let panic = wrap_with_call_stack_skip(1, error_from_panic(payload));
    match prior {
        None => panic,
        Some(prior) => Box::new(PanickedWithError { prior, panic }),
    }
}

/// A panic that occurred while an error result was already set.
#[derive(Debug, thiserror::Error)]
#[error("function returning error ({prior}) panicked with: {panic}")]
pub struct PanickedWithError {
    /// The error that was set before the panic.
    pub prior: BoxError,
    /// The recovered panic, wrapped with the recovery call stack.
    #[source]
    pub panic: BoxError,
}

/// Runs `body`, converting a panic into a call-stack-wrapped `Err`.
pub fn catch_panic<T>(body: impl FnOnce() -> Result<T, BoxError>) -> Result<T, BoxError> {
    match catch_unwind(AssertUnwindSafe(body)) {
        Ok(result) => result,
        Err(payload) => Err(wrap_with_call_stack_skip(1, error_from_panic(payload))),
    }
}

/// Like [`catch_panic`], additionally attaching the function's parameter
/// values to the recovered error.
pub fn catch_panic_with_params<T>(
    params: Vec<Param>,
    body: impl FnOnce() -> Result<T, BoxError>,
) -> Result<T, BoxError> {
    match catch_unwind(AssertUnwindSafe(body)) {
        Ok(result) => result,
        Err(payload) => Err(wrap_with_func_params_skip(
            1,
            error_from_panic(payload),
            params,
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params;
    use crate::wrap::{WithCallStack, WithFuncParams};

    fn recover(body: impl FnOnce()) -> Box<dyn Any + Send> {
        catch_unwind(AssertUnwindSafe(body)).expect_err("body must panic")
    }

    #[test]
    fn str_payload_becomes_its_message() {
        let payload = recover(|| panic!("exploded"));
        assert_eq!(error_from_panic(payload).to_string(), "exploded");
    }

    #[test]
    fn string_payload_becomes_its_message() {
        let payload = recover(|| panic!("code {}", 7));
        assert_eq!(error_from_panic(payload).to_string(), "code 7");
    }

    #[test]
    fn error_payload_passes_through() {
        let payload = recover(|| {
            std::panic::panic_any(Box::new(Sentinel::new("typed")) as BoxError)
        });
        let err = error_from_panic(payload);
        assert!(err.is::<Sentinel>());
    }

    #[test]
    fn unknown_payload_degrades_to_generic_message() {
        let payload = recover(|| std::panic::panic_any(42_u64));
        assert_eq!(
            error_from_panic(payload).to_string(),
            "panic with non-string payload"
        );
    }

    #[test]
    fn catch_panic_wraps_with_call_stack() {
        let result: Result<(), BoxError> = catch_panic(|| panic!("late failure"));
        let err = result.unwrap_err();
        assert!(err.is::<WithCallStack>());
        assert!(err.to_string().starts_with("late failure\n"));
    }

    #[test]
    fn catch_panic_passes_through_ok_and_err() {
        let ok: Result<u8, BoxError> = catch_panic(|| Ok(1));
        assert_eq!(ok.unwrap(), 1);

        let err: Result<u8, BoxError> =
            catch_panic(|| Err(Box::new(Sentinel::new("plain")) as BoxError));
        assert!(err.unwrap_err().is::<Sentinel>());
    }

    #[test]
    fn catch_panic_with_params_attaches_them() {
        let result: Result<(), BoxError> =
            catch_panic_with_params(params!["user-1"], || panic!("boom"));
        let err = result.unwrap_err();
        let layer = err.downcast_ref::<WithFuncParams>().expect("params layer");
        assert_eq!(layer.params().len(), 1);
    }

    #[test]
    fn prior_error_is_chained_not_dropped() {
        let payload = recover(|| panic!("cleanup failed"));
        let prior: BoxError = Box::new(Sentinel::new("original failure"));
        let err = panic_to_error(payload, Some(prior));

        let chained = err.downcast_ref::<PanickedWithError>().expect("chained");
        assert_eq!(chained.prior.to_string(), "original failure");
        let rendered = err.to_string();
        assert!(rendered.contains("original failure"));
        assert!(rendered.contains("cleanup failed"));
    }
}
