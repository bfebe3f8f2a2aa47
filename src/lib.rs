#![deny(missing_docs)]
#![deny(missing_debug_implementations)]
#![cfg_attr(test, deny(warnings))]

//! # redirect-policy
//!
//! The `redirect-policy` crate describes how an HTTP client behaves when a
//! response carries a redirect status.
//!
//! - Whether redirects are followed at all
//! - How many hops a redirect chain may take
//! - Whether a `POST` keeps its method after a 301, 302 or 303, or is
//!   reissued as a `GET` (RFC 7231, section 6.4)
//!
//! It does no networking. A transport holds a [`Redirect`], and when a 3xx
//! arrives it describes it as a [`redirect::Attempt`] and asks the policy
//! what to do.
//!
//! ## Building a policy
//!
//! ```rust
//! use redirect_policy::{PostRedirectFlags, Redirect};
//!
//! // 50 hops, follow, POST kept for 301, 302 and 303
//! let default = Redirect::default();
//! assert_eq!(default, Redirect::from_parts(50, true, PostRedirectFlags::POST_ALL));
//!
//! // only override what you need
//! let no_follow = Redirect::from_follow(false);
//! assert_eq!(no_follow.max, 50);
//!
//! let strict = Redirect::new()
//!     .max_redirects(3)
//!     .post_flags(PostRedirectFlags::NONE);
//! assert_eq!(strict.limit(), Some(3));
//! ```
//!
//! ## Applying a policy
//!
//! ```rust
//! use http::{Method, StatusCode};
//! use redirect_policy::redirect::{Action, Attempt};
//! use redirect_policy::{PostRedirectFlags, Redirect};
//! use url::Url;
//!
//! let policy = Redirect::from_post_flags(PostRedirectFlags::POST_301);
//! let next = Url::parse("https://example.com/next").unwrap();
//! let previous = [Url::parse("https://example.com/form").unwrap()];
//!
//! let method = Method::POST;
//! let attempt = Attempt::new(StatusCode::FOUND, &method, &next, &previous);
//! match policy.check(attempt) {
//!     Action::Follow(method) => assert_eq!(method, Method::GET),
//!     other => panic!("unexpected {other:?}"),
//! }
//! ```
//!
//! ## Optional Features
//!
//! - **serde**: Provides `Serialize` and `Deserialize` for [`Redirect`] and
//!   [`PostRedirectFlags`], so policies can be loaded from config files.

pub use self::error::{Error, Result};
pub use self::flags::{any, PostRedirectFlags};
pub use self::redirect::Redirect;

pub mod config;
mod error;
pub mod flags;
pub mod redirect;
