//! Wrapping errors with call stacks and function parameters.
//!
//! Two node shapes live here:
//!
//! - [`WithCallStack`]: wraps exactly one child error with a bounded
//!   [`CallStack`] captured at construction.
//! - [`WithFuncParams`]: a call-stack layer that additionally owns the
//!   parameter values of the call site.
//!
//! Re-wrap rule: attaching parameters to an error already wrapped with a
//! bare [`WithCallStack`] transplants the captured frames into the new
//! parameterized layer and discards the bare one, so a call boundary
//! never produces two stack layers. A [`WithFuncParams`] layer, by
//! contrast, marks a distinct call boundary and is wrapped normally.

use std::error::Error as StdError;
use std::fmt;

use crate::callstack::{CallStack, UNRESOLVED_CALL_STACK};
use crate::config::Config;
use crate::format::{format_error, Param};
use crate::sentinel::Sentinel;
use crate::BoxError;

/// A new leaf error with the passed text, wrapped with the current
/// call stack.
pub fn new(text: impl Into<String>) -> BoxError {
    wrap_with_call_stack_skip(1, Box::new(Sentinel::from_text(text)))
}

/// A new leaf error from a format string, wrapped with the current
/// call stack.
///
/// ```
/// let err = errstack::errorf!("row {} missing", 7);
/// assert!(err.to_string().starts_with("row 7 missing"));
/// ```
#[macro_export]
macro_rules! errorf {
    ($($arg:tt)*) => {
        $crate::new(::std::format!($($arg)*))
    };
}

/// Wraps an error with the current call stack.
pub fn wrap_with_call_stack(err: BoxError) -> BoxError {
    wrap_with_call_stack_skip(1, err)
}

/// Wraps an error with the current call stack, skipping `skip` additional
/// frames. Increase `skip` by one for each wrapper function you add.
pub fn wrap_with_call_stack_skip(skip: usize, err: BoxError) -> BoxError {
    Box::new(WithCallStack {
        stack: CallStack::capture(skip + 1),
        inner: err,
    })
}

/// Wraps an error with the current call stack and the parameter values of
/// the failing call. Meant to be applied at the function's exit boundary,
/// see [`wrap_scope`] and [`WrapResult::wrap_func_params`].
pub fn wrap_with_func_params(err: BoxError, params: Vec<Param>) -> BoxError {
    wrap_with_func_params_skip(1, err, params)
}

/// [`wrap_with_func_params`] with `skip` additional frames skipped.
pub fn wrap_with_func_params_skip(skip: usize, err: BoxError, params: Vec<Param>) -> BoxError {
    if err.is::<WithFuncParams>() {
        // A parameterized layer is its own call boundary, stack on top of it.
        return Box::new(WithFuncParams {
            stack: CallStack::capture(skip + 1),
            params,
            inner: err,
        });
    }
    match err.downcast::<WithCallStack>() {
        // Already wrapped with a bare call stack: reuse the captured
        // frames instead of re-capturing, and drop the bare layer.
        Ok(bare) => {
            let WithCallStack { stack, inner } = *bare;
            Box::new(WithFuncParams {
                stack,
                params,
                inner,
            })
        }
        Err(err) => Box::new(WithFuncParams {
            stack: CallStack::capture(skip + 1),
            params,
            inner: err,
        }),
    }
}

/// Runs `body` and wraps its `Err` arm with the current call stack and
/// `params` on every exit path, the explicit-scope rendition of wrapping
/// at function exit:
///
/// ```
/// use errstack::{params, wrap_scope, BoxError};
///
/// fn process_user(user_id: &str) -> Result<(), BoxError> {
///     wrap_scope(params![user_id], || {
///         Err(errstack::new("downstream failed"))
///     })
/// }
/// ```
pub fn wrap_scope<T>(
    params: Vec<Param>,
    body: impl FnOnce() -> Result<T, BoxError>,
) -> Result<T, BoxError> {
    body().map_err(|err| wrap_with_func_params_skip(1, err, params))
}

/// Result adapters for wrapping the `Err` arm in place.
pub trait WrapResult<T> {
    /// Wraps the `Err` arm with the current call stack.
    fn wrap_call_stack(self) -> Result<T, BoxError>;

    /// Wraps the `Err` arm with the current call stack and `params`.
    fn wrap_func_params(self, params: Vec<Param>) -> Result<T, BoxError>;
}

impl<T, E: Into<BoxError>> WrapResult<T> for Result<T, E> {
    fn wrap_call_stack(self) -> Result<T, BoxError> {
        self.map_err(|err| wrap_with_call_stack_skip(1, err.into()))
    }

    fn wrap_func_params(self, params: Vec<Param>) -> Result<T, BoxError> {
        self.map_err(|err| wrap_with_func_params_skip(1, err.into(), params))
    }
}

/// Wraps exactly one child error with the call stack captured at
/// construction. Rendering is delegated to [`format_error`].
#[derive(Debug)]
pub struct WithCallStack {
    stack: CallStack,
    inner: BoxError,
}

impl WithCallStack {
    pub fn call_stack(&self) -> &CallStack {
        &self.stack
    }

    pub fn inner(&self) -> &(dyn StdError + 'static) {
        self.inner.as_ref() as &(dyn StdError + 'static)
    }
}

impl fmt::Display for WithCallStack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_error(self))
    }
}

impl StdError for WithCallStack {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        Some(self.inner.as_ref() as &(dyn StdError + 'static))
    }
}

/// A call-stack layer that additionally owns the ordered parameter values
/// of the call site.
#[derive(Debug)]
pub struct WithFuncParams {
    stack: CallStack,
    params: Vec<Param>,
    inner: BoxError,
}

impl WithFuncParams {
    pub fn call_stack(&self) -> &CallStack {
        &self.stack
    }

    pub fn params(&self) -> &[Param] {
        &self.params
    }

    pub fn inner(&self) -> &(dyn StdError + 'static) {
        self.inner.as_ref() as &(dyn StdError + 'static)
    }

    /// Renders this layer as `function(p1, p2, …)` plus `file:line`,
    /// resolving the function name from the captured frames.
    pub(crate) fn format_call(&self, config: &Config) -> String {
        match self.stack.resolve_first(config) {
            Some(frame) => {
                let call = (config.format_function_call)(config, &frame.function, &self.params);
                format!("{call}\n    {}:{}", frame.file, frame.line)
            }
            None => UNRESOLVED_CALL_STACK.to_string(),
        }
    }
}

impl fmt::Display for WithFuncParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_error(self))
    }
}

impl StdError for WithFuncParams {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        Some(self.inner.as_ref() as &(dyn StdError + 'static))
    }
}
