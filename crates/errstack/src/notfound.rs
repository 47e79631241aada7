//! The universal "not found" error and its matching helpers.

use std::error::Error as StdError;
use std::io;

use crate::query::find_all;
use crate::sentinel::Sentinel;
use crate::BoxError;

/// Returned when a requested resource could not be found.
///
/// Return it directly from functions that request only one kind of
/// resource; wrap it (or claim it via a matcher) when differentiation
/// is needed. Check with [`is_err_not_found`] rather than a plain
/// sentinel comparison to also catch `std::io` "not found" errors.
pub const ERR_NOT_FOUND: Sentinel = Sentinel::new("not found");

/// True when the tree of `err` contains [`ERR_NOT_FOUND`] or an
/// `std::io::Error` with `ErrorKind::NotFound`.
pub fn is_err_not_found(err: &(dyn StdError + 'static)) -> bool {
    find_all::<Sentinel>(err)
        .iter()
        .any(|sentinel| **sentinel == ERR_NOT_FOUND)
        || find_all::<io::Error>(err)
            .iter()
            .any(|io_err| io_err.kind() == io::ErrorKind::NotFound)
}

/// Replaces every optionally wrapped "not found" error with `replacement`,
/// passing all other errors through unchanged.
pub fn replace_err_not_found(err: BoxError, replacement: BoxError) -> BoxError {
    if is_err_not_found(err.as_ref() as &(dyn StdError + 'static)) {
        replacement
    } else {
        err
    }
}
