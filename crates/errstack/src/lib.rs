//! errstack: error introspection with call stacks, function parameters
//! and redaction.
//!
//! This crate augments plain error values with provenance and provides
//! the algorithms to combine, flatten, search and redact the resulting
//! error trees:
//!
//! - [`new`] / [`errorf!`] / [`wrap_with_call_stack`]: leaf creation and
//!   wrapping with a bounded, lazily resolved call stack
//! - [`wrap_with_func_params`] / [`wrap_scope`] / [`WrapResult`]: call
//!   boundaries that also capture the function's parameter values
//! - [`combine`] / [`uncombine`]: flat multi-error combination
//! - [`root`], [`find_all`], [`has`], [`has_type`], [`is_type`],
//!   [`unwrap_call_stack`]: traversal and type-directed matching over
//!   arbitrary tree shapes
//! - [`keep_secret`]: a redaction boundary that survives every
//!   formatting path
//! - [`catch_panic`] / [`error_from_panic`]: panic recovery as errors
//!
//! Basic usage:
//!
//! ```
//! use errstack::{params, wrap_scope, BoxError};
//!
//! fn process_user(user_id: &str, age: u32) -> Result<(), BoxError> {
//!     wrap_scope(params![user_id, age], || {
//!         if age == 0 {
//!             return Err(errstack::new("invalid age"));
//!         }
//!         Ok(())
//!     })
//! }
//!
//! let err = process_user("user-1", 0).unwrap_err();
//! // deepest failure first, then each caller with its parameters
//! assert!(err.to_string().starts_with("invalid age\n"));
//! ```
//!
//! All nodes are immutable after construction and traversal is a pure,
//! reentrant read, so error values can be shared and inspected from
//! multiple threads. The only process-wide state is [`Config`], which
//! follows a set-once-at-init convention.

pub mod callstack;
pub mod config;
pub mod format;
pub mod logger;
pub mod matcher;
pub mod multi;
pub mod notfound;
pub mod panics;
pub mod query;
pub mod secret;
pub mod sentinel;
pub mod wrap;

/// The type-erased error currency of this crate.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

pub use callstack::{CallStack, ResolvedFrame, UNRESOLVED_CALL_STACK};
pub use config::{AlreadyInstalled, Config, FormatFunctionCallFn, PrinterFn};
pub use format::{format_error, format_error_with, format_function_call, Param, TRUNCATED};
pub use logger::{dont_log, log_function_call, should_log, DontLog, Logger, TracingLogger};
pub use matcher::{ClaimMatcher, MatchRequest, Matcher, WithMatcher};
pub use multi::{combine, uncombine, uncombine_ref, MultiError};
pub use notfound::{is_err_not_found, replace_err_not_found, ERR_NOT_FOUND};
pub use panics::{
    catch_panic, catch_panic_with_params, error_from_panic, panic_to_error, PanickedWithError,
};
pub use query::{find_all, has, has_type, is_type, root, unwrap_call_stack};
pub use secret::{keep_secret, Secret, REDACTED};
pub use sentinel::Sentinel;
pub use wrap::{
    new, wrap_with_call_stack, wrap_with_call_stack_skip, wrap_with_func_params,
    wrap_with_func_params_skip, wrap_scope, WithCallStack, WithFuncParams, WrapResult,
};
