//! Tree traversal and type-directed matching over wrapped, joined and
//! leaf errors.
//!
//! Every function here is a pure, reentrant read of an immutable tree.
//! Node shapes are recognized in one fixed order per node:
//!
//! 1. structural identity against the requested type (downcast),
//! 2. the matcher capability ([`WithMatcher`]), consulted independently
//!    (both may report for the same node),
//! 3. the single-child unwrap (`source()`), followed iteratively so long
//!    wrap chains cannot grow the call stack,
//! 4. the multi-child unwrap ([`MultiError`]), recursed per child in
//!    order, which terminates the iteration for that branch.
//!
//! Matches are collected in depth-first pre-order and are deliberately
//! not deduplicated.

use std::error::Error as StdError;

use crate::matcher::{MatchRequest, WithMatcher};
use crate::multi::MultiError;
use crate::wrap::{WithCallStack, WithFuncParams};

/// Follows the single-child unwrap until none remains and returns the
/// root cause.
///
/// A [`MultiError`] is structurally opaque to `root`: it represents
/// several independent causes with no single root, so it is returned
/// as-is rather than descended into.
pub fn root<'a>(err: &'a (dyn StdError + 'static)) -> &'a (dyn StdError + 'static) {
    let mut current = err;
    loop {
        if current.is::<MultiError>() {
            return current;
        }
        match current.source() {
            Some(source) => current = source,
            None => return current,
        }
    }
}

/// Strips top-level call-stack layers only, preserving the rest of the
/// chain. Unlike [`root`], a non-stack context layer below the stack
/// wrapping survives.
///
/// Useful for comparing errors without their capture provenance: two
/// wraps of the same sentinel differ, their unwrapped forms do not.
pub fn unwrap_call_stack<'a>(err: &'a (dyn StdError + 'static)) -> &'a (dyn StdError + 'static) {
    let mut current = err;
    loop {
        if let Some(layer) = current.downcast_ref::<WithFuncParams>() {
            current = layer.inner();
        } else if let Some(layer) = current.downcast_ref::<WithCallStack>() {
            current = layer.inner();
        } else {
            return current;
        }
    }
}

/// Collects all errors of type `T` in the tree of `err`, in depth-first
/// pre-order. Structural matches and matcher-claimed matches both count;
/// results are not deduplicated.
///
/// With multi-errors this finds every branch's matches, where a
/// first-match lookup would stop at the first:
///
/// ```
/// use errstack::{combine, find_all, Sentinel};
///
/// let err = combine([
///     Some(Box::new(Sentinel::new("name missing")) as errstack::BoxError),
///     Some(Box::new(Sentinel::new("email missing")) as errstack::BoxError),
/// ])
/// .unwrap();
/// let all = find_all::<Sentinel>(err.as_ref());
/// assert_eq!(all.len(), 2);
/// ```
pub fn find_all<'a, T: StdError + 'static>(err: &'a (dyn StdError + 'static)) -> Vec<&'a T> {
    let mut found = Vec::new();
    collect(err, &mut found);
    found
}

fn collect<'a, T: StdError + 'static>(err: &'a (dyn StdError + 'static), found: &mut Vec<&'a T>) {
    let mut current = err;
    loop {
        if let Some(matched) = current.downcast_ref::<T>() {
            found.push(matched);
        }
        if let Some(with_matcher) = current.downcast_ref::<WithMatcher>() {
            let probe = |candidate: &(dyn StdError + 'static)| candidate.is::<T>();
            let request = MatchRequest::new(&probe);
            if let Some(claimed) = with_matcher.match_ref(&request) {
                if let Some(matched) = claimed.downcast_ref::<T>() {
                    found.push(matched);
                }
            }
        }
        if let Some(multi) = current.downcast_ref::<MultiError>() {
            for child in multi.errors() {
                collect(child.as_ref() as &(dyn StdError + 'static), found);
            }
            return;
        }
        match current.source() {
            Some(source) => current = source,
            None => return,
        }
    }
}

/// Reports whether the tree of `err` contains an error of type `T`,
/// short-circuiting on the first structural or matcher-claimed match.
pub fn has<T: StdError + 'static>(err: &(dyn StdError + 'static)) -> bool {
    contains::<T>(err, true)
}

/// Like [`has`], but only structural identity counts: the matcher
/// capability is ignored.
pub fn has_type<T: StdError + 'static>(err: &(dyn StdError + 'static)) -> bool {
    contains::<T>(err, false)
}

fn contains<T: StdError + 'static>(
    err: &(dyn StdError + 'static),
    consult_matcher: bool,
) -> bool {
    let mut current = err;
    loop {
        if current.is::<T>() {
            return true;
        }
        if consult_matcher {
            if let Some(with_matcher) = current.downcast_ref::<WithMatcher>() {
                let probe = |candidate: &(dyn StdError + 'static)| candidate.is::<T>();
                let request = MatchRequest::new(&probe);
                if with_matcher
                    .match_ref(&request)
                    .is_some_and(|claimed| claimed.is::<T>())
                {
                    return true;
                }
            }
        }
        if let Some(multi) = current.downcast_ref::<MultiError>() {
            return multi.errors().iter().any(|child| {
                contains::<T>(child.as_ref() as &(dyn StdError + 'static), consult_matcher)
            });
        }
        match current.source() {
            Some(source) => current = source,
            None => return false,
        }
    }
}

/// Reports whether `err` is `reference` itself (by pointer identity) or
/// whether any node in its tree has the same dynamic type as `reference`.
/// Matcher claims are ignored, exactly as in [`has_type`].
pub fn is_type<E: StdError + Send + Sync + 'static>(
    err: &(dyn StdError + 'static),
    reference: &E,
) -> bool {
    if std::ptr::eq(
        err as *const _ as *const (),
        reference as *const _ as *const (),
    ) {
        return true;
    }
    has_type::<E>(err)
}
