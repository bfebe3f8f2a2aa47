//! Request-scoped configuration.
//!
//! A client usually holds one [`Redirect`] policy for all of its requests.
//! Individual requests can carry their own policy in their
//! [`http::Extensions`], which takes precedence when the transport resolves
//! the policy to apply.
//!
//! Config keys are marker types implementing [`RequestConfigValue`], which
//! links each key to its value type. [`RequestConfig<T>`] stores one optional
//! value for key `T`, both on the client and inside request extensions.
//!
//! ```rust
//! use http::Extensions;
//! use redirect_policy::config::{RedirectConfig, RequestConfig};
//! use redirect_policy::Redirect;
//!
//! let client = RequestConfig::<RedirectConfig>::new(Some(Redirect::limited(10)));
//!
//! let mut ext = Extensions::new();
//! assert_eq!(client.fetch(&ext), Some(&Redirect::limited(10)));
//!
//! *RequestConfig::<RedirectConfig>::get_mut(&mut ext) = Some(Redirect::none());
//! assert_eq!(client.fetch(&ext), Some(&Redirect::none()));
//! ```

use std::any::type_name;
use std::fmt::{self, Debug};

use http::Extensions;

use crate::Redirect;

/// Associates a configuration key type with its value type.
pub trait RequestConfigValue: Copy + Clone + 'static {
    /// The type stored under this key.
    type Value: Clone + Debug + Send + Sync + 'static;
}

/// Carries an optional configuration value for key `T`.
#[derive(Clone, Copy)]
pub struct RequestConfig<T: RequestConfigValue>(Option<T::Value>);

impl<T: RequestConfigValue> Default for RequestConfig<T> {
    fn default() -> Self {
        RequestConfig(None)
    }
}

impl<T> RequestConfig<T>
where
    T: RequestConfigValue,
{
    /// Wrap a value, usually the client-wide one.
    pub fn new(v: Option<T::Value>) -> Self {
        RequestConfig(v)
    }

    /// Format the value as a struct field, if set.
    pub fn fmt_as_field(&self, f: &mut fmt::DebugStruct<'_, '_>) {
        if let Some(v) = &self.0 {
            f.field(type_name::<T>(), v);
        }
    }

    /// Retrieve the value to use for a request.
    ///
    /// If the request specifies a value, use that value; otherwise fall back
    /// to the one held by `self` (typically a client instance).
    pub fn fetch<'client, 'request>(
        &'client self,
        ext: &'request Extensions,
    ) -> Option<&'request T::Value>
    where
        'client: 'request,
    {
        ext.get::<RequestConfig<T>>()
            .and_then(|v| v.0.as_ref())
            .or(self.0.as_ref())
    }

    /// Retrieve the value from the request's Extensions.
    pub fn get(ext: &Extensions) -> Option<&T::Value> {
        ext.get::<RequestConfig<T>>().and_then(|v| v.0.as_ref())
    }

    /// Retrieve the mutable value from the request's Extensions.
    pub fn get_mut(ext: &mut Extensions) -> &mut Option<T::Value> {
        let cfg = ext.get_or_insert_default::<RequestConfig<T>>();
        &mut cfg.0
    }
}

impl<T: RequestConfigValue> Debug for RequestConfig<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut builder = f.debug_struct("RequestConfig");
        self.fmt_as_field(&mut builder);
        builder.finish()
    }
}

/// Config key for the [`Redirect`] policy of a request.
#[derive(Clone, Copy, Debug)]
pub struct RedirectConfig;

impl RequestConfigValue for RedirectConfig {
    type Value = Redirect;
}
