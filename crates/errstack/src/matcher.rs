//! The matcher capability: letting an error claim a match for a requested
//! type beyond its own structural identity.
//!
//! The query engine probes every node structurally (by downcast). A node
//! wrapped in [`WithMatcher`] is additionally asked to claim a match: it
//! receives a [`MatchRequest`] describing the requested type and may answer
//! with a reference to any error value it holds. [`has`](crate::query::has)
//! and [`find_all`](crate::query::find_all) consult the capability,
//! [`has_type`](crate::query::has_type) deliberately does not.

use std::error::Error as StdError;
use std::fmt;

use crate::BoxError;

/// A type-directed match request built by the query engine.
///
/// Matchers cannot name the requested type directly (it is a compile-time
/// parameter of the query), so the request carries a probe instead:
/// [`MatchRequest::matches`] reports whether a candidate error value is of
/// the requested type.
pub struct MatchRequest<'r> {
    probe: &'r dyn Fn(&(dyn StdError + 'static)) -> bool,
}

impl<'r> MatchRequest<'r> {
    pub(crate) fn new(probe: &'r dyn Fn(&(dyn StdError + 'static)) -> bool) -> Self {
        MatchRequest { probe }
    }

    /// True when `candidate` is of the requested type.
    pub fn matches(&self, candidate: &(dyn StdError + 'static)) -> bool {
        (self.probe)(candidate)
    }
}

/// Implemented by matchers attached via [`WithMatcher`].
pub trait Matcher: Send + Sync + 'static {
    /// Returns an error value that should count as a match for the
    /// request, or `None` to decline.
    fn match_ref<'a>(&'a self, request: &MatchRequest<'_>) -> Option<&'a (dyn StdError + 'static)>;
}

/// A matcher that claims a fixed list of alternative error identities.
///
/// The first claimed value of the requested type wins. Typical use is an
/// error claiming equivalence to one or more sentinel errors it does not
/// structurally contain.
pub struct ClaimMatcher {
    claims: Vec<BoxError>,
}

impl ClaimMatcher {
    pub fn new(claims: Vec<BoxError>) -> Self {
        ClaimMatcher { claims }
    }
}

impl Matcher for ClaimMatcher {
    fn match_ref<'a>(&'a self, request: &MatchRequest<'_>) -> Option<&'a (dyn StdError + 'static)> {
        self.claims
            .iter()
            .map(|claim| claim.as_ref() as &(dyn StdError + 'static))
            .find(|claim| request.matches(*claim))
    }
}

/// Attaches a [`Matcher`] to an error without disturbing its chain:
/// the wrapped error stays reachable through the single-child unwrap,
/// and the matcher is consulted independently at this node.
pub struct WithMatcher {
    inner: BoxError,
    matcher: Box<dyn Matcher>,
}

impl WithMatcher {
    pub fn new(inner: BoxError, matcher: impl Matcher) -> Self {
        WithMatcher {
            inner,
            matcher: Box::new(matcher),
        }
    }

    /// Convenience for the common case: `inner` additionally matches as
    /// each of `claims`.
    pub fn claiming(inner: BoxError, claims: Vec<BoxError>) -> Self {
        Self::new(inner, ClaimMatcher::new(claims))
    }

    pub fn inner(&self) -> &(dyn StdError + 'static) {
        self.inner.as_ref() as &(dyn StdError + 'static)
    }

    pub(crate) fn match_ref<'a>(
        &'a self,
        request: &MatchRequest<'_>,
    ) -> Option<&'a (dyn StdError + 'static)> {
        self.matcher.match_ref(request)
    }
}

impl fmt::Debug for WithMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WithMatcher")
            .field("inner", &self.inner)
            .finish()
    }
}

impl fmt::Display for WithMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.inner)
    }
}

impl StdError for WithMatcher {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        Some(self.inner.as_ref() as &(dyn StdError + 'static))
    }
}
