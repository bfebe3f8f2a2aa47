//! Redirect Handling
//!
//! A [`Redirect`] describes what a client does when a response carries a 3xx
//! status: whether it follows redirects at all, how many hops it allows in a
//! chain, and whether a `POST` keeps its method after a 301, 302 or 303.
//!
//! By default redirects are followed, up to 50 hops, and `POST` is preserved
//! for every status.
//!
//! A transport applies the policy by describing each received redirect as an
//! [`Attempt`] and asking [`Redirect::check`] for the [`Action`] to take.

use http::{Method, StatusCode};
use log::{debug, trace};
use url::Url;

use crate::error::{self, Error};
use crate::flags::{any, PostRedirectFlags};

/// A type that controls the policy on how to handle the following of redirects.
///
/// - `max` caps the number of hops in a chain. `0` refuses any redirect and
///   `-1` removes the cap.
/// - `follow` turns redirect handling off entirely when `false`.
/// - `post_flags` decides, per status, whether a redirected `POST` stays a
///   `POST` or becomes a `GET`.
///
/// # Example
///
/// ```rust
/// use redirect_policy::{PostRedirectFlags, Redirect};
///
/// let policy = Redirect::new()
///     .max_redirects(5)
///     .post_flags(PostRedirectFlags::POST_301 | PostRedirectFlags::POST_303);
///
/// assert_eq!(policy.limit(), Some(5));
/// assert!(policy.follow);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Redirect {
    /// The maximum number of redirects to follow.
    ///
    /// `0` refuses any redirect, `-1` follows an unlimited number. Other
    /// negative values are also treated as unlimited by [`Redirect::limit`].
    ///
    /// Default: 50. Same meaning as libcurl's `CURLOPT_MAXREDIRS`.
    pub max: i64,
    /// Follow 3xx redirects.
    ///
    /// Default: true. Same meaning as libcurl's `CURLOPT_FOLLOWLOCATION`.
    pub follow: bool,
    /// How to act after a redirect for a `POST` request.
    ///
    /// Default: [`PostRedirectFlags::POST_ALL`].
    pub post_flags: PostRedirectFlags,
}

const DEFAULT_MAX: i64 = 50;

impl Redirect {
    /// Create the default policy: 50 hops, follow, keep `POST` everywhere.
    pub const fn new() -> Self {
        Self::from_parts(DEFAULT_MAX, true, PostRedirectFlags::POST_ALL)
    }

    /// Create a policy with every field given.
    pub const fn from_parts(max: i64, follow: bool, post_flags: PostRedirectFlags) -> Self {
        Redirect {
            max,
            follow,
            post_flags,
        }
    }

    /// Create a default policy with a different maximum number of redirects.
    pub const fn from_max(max: i64) -> Self {
        Self::new().max_redirects(max)
    }

    /// Create a default policy with a different `follow` toggle.
    pub const fn from_follow(follow: bool) -> Self {
        Self::new().follow(follow)
    }

    /// Create a default policy with different post-redirect flags.
    pub const fn from_post_flags(post_flags: PostRedirectFlags) -> Self {
        Self::new().post_flags(post_flags)
    }

    /// Create a policy that does not follow any redirect.
    pub const fn none() -> Self {
        Self::from_follow(false)
    }

    /// Create a policy with a maximum number of redirects.
    ///
    /// Values that do not fit an `i64` saturate.
    pub fn limited(max: usize) -> Self {
        Self::from_max(i64::try_from(max).unwrap_or(i64::MAX))
    }

    /// Create a policy that follows any number of redirects.
    pub const fn unlimited() -> Self {
        Self::from_max(-1)
    }

    /// Sets the maximum number of redirects.
    pub const fn max_redirects(mut self, max: i64) -> Self {
        self.max = max;
        self
    }

    /// Sets whether redirects are followed.
    pub const fn follow(mut self, follow: bool) -> Self {
        self.follow = follow;
        self
    }

    /// Sets the post-redirect flags.
    pub const fn post_flags(mut self, post_flags: PostRedirectFlags) -> Self {
        self.post_flags = post_flags;
        self
    }

    /// Returns the hop limit, or `None` when unlimited.
    ///
    /// Any negative `max` counts as unlimited, not just `-1`.
    pub fn limit(&self) -> Option<usize> {
        usize::try_from(self.max).ok()
    }

    /// Returns whether a `POST` keeps its method after a redirect with `status`.
    ///
    /// Statuses without a flag, such as 307 and 308, never change the method,
    /// so this returns `true` for them.
    pub fn preserves_post(&self, status: StatusCode) -> bool {
        PostRedirectFlags::for_status(status).map_or(true, |bit| any(self.post_flags & bit))
    }

    /// Returns the method to reissue the request with after `status`.
    ///
    /// A `POST` after 301, 302 or 303 stays a `POST` only if its flag is set.
    /// A 303 turns every other method except `GET` and `HEAD` into a `GET`.
    /// Anything else keeps its method.
    pub fn next_method(&self, status: StatusCode, method: &Method) -> Method {
        match status {
            StatusCode::MOVED_PERMANENTLY | StatusCode::FOUND | StatusCode::SEE_OTHER
                if method == Method::POST =>
            {
                if self.preserves_post(status) {
                    Method::POST
                } else {
                    debug!("switching POST to GET after {status}");
                    Method::GET
                }
            }
            StatusCode::SEE_OTHER if method != Method::GET && method != Method::HEAD => {
                debug!("switching {method} to GET after {status}");
                Method::GET
            }
            _ => method.clone(),
        }
    }

    /// Apply this policy to a given [`Attempt`] to produce an [`Action`].
    ///
    /// Statuses that are not followable redirects (anything besides 301, 302,
    /// 303, 307 and 308) and policies with `follow` off produce
    /// [`Action::Stop`]. An exhausted hop budget produces [`Action::Error`].
    pub fn check(&self, attempt: Attempt<'_>) -> Action {
        if !is_followable(attempt.status) {
            trace!("status {} is not a followable redirect", attempt.status);
            return Action::Stop;
        }

        if !self.follow {
            debug!("redirect policy disallowed redirection to '{}'", attempt.next);
            return Action::Stop;
        }

        if let Some(max) = self.limit() {
            if attempt.hops() >= max {
                debug!("redirect limit of {max} reached at '{}'", attempt.next);
                return Action::Error(error::too_many_redirects(attempt.next.clone()));
            }
        } else if self.max != -1 {
            trace!("treating max redirects of {} as unlimited", self.max);
        }

        let method = self.next_method(attempt.status, attempt.method);
        trace!("redirecting to {:?} '{}'", method, attempt.next);
        Action::Follow(method)
    }
}

impl Default for Redirect {
    fn default() -> Redirect {
        Redirect::new()
    }
}

impl From<i64> for Redirect {
    fn from(max: i64) -> Redirect {
        Redirect::from_max(max)
    }
}

impl From<bool> for Redirect {
    fn from(follow: bool) -> Redirect {
        Redirect::from_follow(follow)
    }
}

impl From<PostRedirectFlags> for Redirect {
    fn from(post_flags: PostRedirectFlags) -> Redirect {
        Redirect::from_post_flags(post_flags)
    }
}

/// A type that holds information on the next request and previous requests
/// in redirect chain.
#[derive(Debug)]
pub struct Attempt<'a> {
    status: StatusCode,
    method: &'a Method,
    next: &'a Url,
    previous: &'a [Url],
}

impl<'a> Attempt<'a> {
    /// Describe a received redirect.
    ///
    /// `previous` lists every URL requested so far in the chain, including
    /// the one that just answered with `status`.
    pub fn new(status: StatusCode, method: &'a Method, next: &'a Url, previous: &'a [Url]) -> Self {
        Attempt {
            status,
            method,
            next,
            previous,
        }
    }

    /// Get the type of redirect.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Get the method of the request that was redirected.
    pub fn method(&self) -> &Method {
        self.method
    }

    /// Get the next URL to redirect to.
    pub fn url(&self) -> &Url {
        self.next
    }

    /// Get the list of previous URLs that have already been requested in this chain.
    pub fn previous(&self) -> &[Url] {
        self.previous
    }

    /// Number of redirects already followed in this chain.
    pub fn hops(&self) -> usize {
        self.previous.len().saturating_sub(1)
    }
}

/// An action to perform when a redirect status code is found.
#[derive(Debug)]
pub enum Action {
    /// Reissue the request to the next URL with the given method.
    Follow(Method),
    /// Do not follow. The 3xx response is returned to the caller as is.
    Stop,
    /// Fail the request, for example because the hop budget is exhausted.
    Error(Error),
}

impl Action {
    /// Returns the method to follow with, if this action follows.
    pub fn follow_method(&self) -> Option<&Method> {
        match self {
            Action::Follow(method) => Some(method),
            _ => None,
        }
    }
}

fn is_followable(status: StatusCode) -> bool {
    matches!(
        status,
        StatusCode::MOVED_PERMANENTLY
            | StatusCode::FOUND
            | StatusCode::SEE_OTHER
            | StatusCode::TEMPORARY_REDIRECT
            | StatusCode::PERMANENT_REDIRECT
    )
}

#[test]
fn test_redirect_default() {
    let policy = Redirect::default();
    assert_eq!(policy.max, 50);
    assert!(policy.follow);
    assert_eq!(policy.post_flags, PostRedirectFlags::POST_ALL);
    assert_eq!(policy, Redirect::new());
}

#[test]
fn test_redirect_single_field_constructors() {
    assert_eq!(
        Redirect::from_follow(false),
        Redirect::from_parts(50, false, PostRedirectFlags::POST_ALL)
    );
    assert_eq!(
        Redirect::from_max(3),
        Redirect::from_parts(3, true, PostRedirectFlags::POST_ALL)
    );
    assert_eq!(
        Redirect::from_post_flags(PostRedirectFlags::NONE),
        Redirect::from_parts(50, true, PostRedirectFlags::NONE)
    );
    assert_eq!(Redirect::from(false), Redirect::none());
    assert_eq!(Redirect::from(-1i64), Redirect::unlimited());
    assert_eq!(Redirect::from(7i64), Redirect::limited(7));
}

#[test]
fn test_redirect_limit_interpretation() {
    assert_eq!(Redirect::from_max(0).limit(), Some(0));
    assert_eq!(Redirect::from_max(10).limit(), Some(10));
    assert_eq!(Redirect::unlimited().limit(), None);
    assert_eq!(Redirect::from_max(-7).limit(), None);
}

#[test]
fn test_redirect_policy_limit() {
    let policy = Redirect::limited(10);
    let next = Url::parse("http://x.y/z").unwrap();
    let mut previous = (0..10)
        .map(|i| Url::parse(&format!("http://a.b/c/{i}")).unwrap())
        .collect::<Vec<_>>();

    match policy.check(Attempt::new(StatusCode::FOUND, &Method::GET, &next, &previous)) {
        Action::Follow(ref method) if *method == Method::GET => (),
        other => panic!("unexpected {other:?}"),
    }

    previous.push(Url::parse("http://a.b.d/e/33").unwrap());

    match policy.check(Attempt::new(StatusCode::FOUND, &Method::GET, &next, &previous)) {
        Action::Error(err) if err.is_redirect() => assert_eq!(err.url(), Some(&next)),
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn test_redirect_policy_limit_to_0() {
    let policy = Redirect::from_max(0);
    let next = Url::parse("http://x.y/z").unwrap();
    let previous = vec![Url::parse("http://a.b/c").unwrap()];

    match policy.check(Attempt::new(StatusCode::FOUND, &Method::GET, &next, &previous)) {
        Action::Error(err) if err.is_redirect() => (),
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn test_redirect_policy_unlimited() {
    let next = Url::parse("http://x.y/z").unwrap();
    let previous = (0..500)
        .map(|i| Url::parse(&format!("http://a.b/c/{i}")).unwrap())
        .collect::<Vec<_>>();

    for policy in [Redirect::unlimited(), Redirect::from_max(-2)] {
        let action = policy.check(Attempt::new(StatusCode::FOUND, &Method::GET, &next, &previous));
        assert_eq!(action.follow_method(), Some(&Method::GET));
    }
}

#[test]
fn test_redirect_policy_none() {
    let policy = Redirect::none();
    let next = Url::parse("http://x.y/z").unwrap();

    for status in [StatusCode::MOVED_PERMANENTLY, StatusCode::FOUND, StatusCode::PERMANENT_REDIRECT] {
        match policy.check(Attempt::new(status, &Method::POST, &next, &[])) {
            Action::Stop => (),
            other => panic!("unexpected {other:?}"),
        }
    }
}

#[test]
fn test_not_followable_status() {
    let policy = Redirect::default();
    let next = Url::parse("http://x.y/z").unwrap();

    for status in [StatusCode::NOT_MODIFIED, StatusCode::MULTIPLE_CHOICES, StatusCode::OK] {
        match policy.check(Attempt::new(status, &Method::GET, &next, &[])) {
            Action::Stop => (),
            other => panic!("unexpected {other:?}"),
        }
    }
}

#[test]
fn test_next_method() {
    let keep_301 = Redirect::from_post_flags(PostRedirectFlags::POST_301);

    assert_eq!(keep_301.next_method(StatusCode::MOVED_PERMANENTLY, &Method::POST), Method::POST);
    assert_eq!(keep_301.next_method(StatusCode::FOUND, &Method::POST), Method::GET);
    assert_eq!(keep_301.next_method(StatusCode::SEE_OTHER, &Method::POST), Method::GET);
    assert_eq!(keep_301.next_method(StatusCode::TEMPORARY_REDIRECT, &Method::POST), Method::POST);

    assert_eq!(keep_301.next_method(StatusCode::FOUND, &Method::PUT), Method::PUT);
    assert_eq!(keep_301.next_method(StatusCode::SEE_OTHER, &Method::DELETE), Method::GET);
    assert_eq!(keep_301.next_method(StatusCode::SEE_OTHER, &Method::HEAD), Method::HEAD);
    assert_eq!(keep_301.next_method(StatusCode::PERMANENT_REDIRECT, &Method::PATCH), Method::PATCH);
}

#[test]
fn test_preserves_post() {
    let policy = Redirect::from_post_flags(PostRedirectFlags::POST_302 | PostRedirectFlags::POST_303);
    assert!(!policy.preserves_post(StatusCode::MOVED_PERMANENTLY));
    assert!(policy.preserves_post(StatusCode::FOUND));
    assert!(policy.preserves_post(StatusCode::SEE_OTHER));
    assert!(policy.preserves_post(StatusCode::TEMPORARY_REDIRECT));
}
