//! Combining independent failures into one flat multi-error.
//!
//! [`combine`] joins different logical errors into one value, as opposed
//! to wrapping, which adds information to one logical error. The result
//! is always flat: a [`MultiError`] produced by `combine` never directly
//! contains another `MultiError` produced by the same operation.

use std::error::Error as StdError;
use std::fmt;

use crate::BoxError;

/// An ordered, non-empty sequence of independent child errors.
///
/// Insertion order is significant: it drives both the rendered output
/// (child messages joined by `'\n'`) and the order in which the query
/// functions report matches.
#[derive(Debug)]
pub struct MultiError {
    errors: Vec<BoxError>,
}

impl MultiError {
    /// The child errors, in insertion order.
    pub fn errors(&self) -> &[BoxError] {
        &self.errors
    }

    pub fn into_errors(self) -> Vec<BoxError> {
        self.errors
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }
}

impl fmt::Display for MultiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, err) in self.errors.iter().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            write!(f, "{err}")?;
        }
        Ok(())
    }
}

impl StdError for MultiError {}

/// Combines errors into a [`MultiError`] when two or more are present.
///
/// Each `None` input is skipped. An input that is itself a `MultiError`
/// contributes its children in place of itself, keeping the result flat.
/// Zero remaining errors yield `None`, exactly one yields that error
/// itself without wrapping.
///
/// `combine` does not wrap the passed errors with a text or call stack.
pub fn combine(errs: impl IntoIterator<Item = Option<BoxError>>) -> Option<BoxError> {
    let mut combined: Vec<BoxError> = Vec::new();
    for err in errs.into_iter().flatten() {
        match err.downcast::<MultiError>() {
            Ok(multi) => combined.extend(multi.into_errors()),
            Err(err) => combined.push(err),
        }
    }
    match combined.len() {
        0 => None,
        1 => combined.pop(),
        _ => Some(Box::new(MultiError { errors: combined })),
    }
}

/// The inverse boundary of [`combine`]: a [`MultiError`] yields its
/// children, anything else yields a single-element list.
pub fn uncombine(err: BoxError) -> Vec<BoxError> {
    match err.downcast::<MultiError>() {
        Ok(multi) => multi.into_errors(),
        Err(err) => vec![err],
    }
}

/// Like [`uncombine`], for callers that do not own the error: a
/// [`MultiError`] yields views of its children, anything else a
/// single-element list containing `err` itself.
pub fn uncombine_ref<'a>(err: &'a (dyn StdError + 'static)) -> Vec<&'a (dyn StdError + 'static)> {
    match err.downcast_ref::<MultiError>() {
        Some(multi) => multi
            .errors()
            .iter()
            .map(|child| child.as_ref() as &(dyn StdError + 'static))
            .collect(),
        None => vec![err],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sentinel::Sentinel;

    fn leaf(text: &'static str) -> Option<BoxError> {
        Some(Box::new(Sentinel::new(text)))
    }

    #[test]
    fn combine_nothing_is_none() {
        assert!(combine([]).is_none());
        assert!(combine([None, None]).is_none());
    }

    #[test]
    fn combine_one_returns_it_unwrapped() {
        let err = combine([None, leaf("only")]).expect("one error");
        let sentinel = err.downcast_ref::<Sentinel>().expect("no wrapping");
        assert_eq!(sentinel.as_str(), "only");
    }

    #[test]
    fn combine_two_renders_joined_by_newline() {
        let err = combine([leaf("first"), leaf("second")]).expect("combined");
        assert_eq!(err.to_string(), "first\nsecond");
    }

    #[test]
    fn combine_flattens_nested_multi_errors() {
        let inner = combine([leaf("b"), leaf("c")]);
        let outer = combine([leaf("a"), inner]).expect("combined");
        let multi = outer.downcast_ref::<MultiError>().expect("multi");
        assert_eq!(multi.len(), 3);
        let texts: Vec<_> = multi.errors().iter().map(|e| e.to_string()).collect();
        assert_eq!(texts, ["a", "b", "c"]);
    }

    #[test]
    fn uncombine_inverts_combine_in_order() {
        let combined = combine([leaf("e0"), leaf("e1"), leaf("e2")]).expect("combined");
        let errors = uncombine(combined);
        let texts: Vec<_> = errors.iter().map(|e| e.to_string()).collect();
        assert_eq!(texts, ["e0", "e1", "e2"]);
    }

    #[test]
    fn uncombine_single_error_is_single_element() {
        let errors = uncombine(Box::new(Sentinel::new("alone")));
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].to_string(), "alone");
    }

    #[test]
    fn uncombine_ref_views_children_without_taking_ownership() {
        let combined = combine([leaf("e0"), leaf("e1")]).expect("combined");
        let children = uncombine_ref(combined.as_ref() as &(dyn StdError + 'static));
        let texts: Vec<_> = children.iter().map(|e| e.to_string()).collect();
        assert_eq!(texts, ["e0", "e1"]);
        // the combined error stays usable afterwards
        assert_eq!(combined.to_string(), "e0\ne1");

        let single = Sentinel::new("alone");
        assert_eq!(uncombine_ref(&single).len(), 1);
    }
}
