//! Post-redirect flags
//!
//! A [`PostRedirectFlags`] value says, per redirect status, whether a `POST`
//! request keeps its method when the redirect is followed, or is reissued as
//! a `GET`. The bit values match libcurl's `CURL_REDIR_POST_301`,
//! `CURL_REDIR_POST_302` and `CURL_REDIR_POST_303`, so [`bits()`] can be
//! handed to `CURLOPT_POSTREDIR` directly.
//!
//! Flags combine with the usual operators:
//!
//! ```rust
//! use redirect_policy::flags::{any, PostRedirectFlags};
//!
//! let flags = PostRedirectFlags::POST_301 | PostRedirectFlags::POST_303;
//! assert!(any(flags & PostRedirectFlags::POST_303));
//! assert!(!any(flags & PostRedirectFlags::POST_302));
//! assert_eq!(!flags, PostRedirectFlags::POST_302);
//! ```
//!
//! [`bits()`]: PostRedirectFlags::bits

use std::fmt;
use std::ops::{BitAnd, BitAndAssign, BitOr, BitOrAssign, BitXor, BitXorAssign, Not};
use std::str::FromStr;

use http::StatusCode;

use crate::error;

/// Controls which redirect statuses keep a `POST` request's method.
///
/// The default is [`POST_ALL`](PostRedirectFlags::POST_ALL).
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct PostRedirectFlags(u8);

impl PostRedirectFlags {
    /// Keep the request method after a 301 redirect.
    ///
    /// Respects RFC 7231 section 6.4.2.
    pub const POST_301: Self = Self(0x1 << 0);
    /// Keep the request method after a 302 redirect.
    pub const POST_302: Self = Self(0x1 << 1);
    /// Keep the request method after a 303 redirect.
    pub const POST_303: Self = Self(0x1 << 2);
    /// Keep the request method for every status above. This is the default.
    pub const POST_ALL: Self = Self(Self::POST_301.0 | Self::POST_302.0 | Self::POST_303.0);
    /// Downgrade to `GET` after any of the statuses above.
    pub const NONE: Self = Self(0x0);

    const NAMED: [(Self, &'static str); 3] = [
        (Self::POST_301, "POST_301"),
        (Self::POST_302, "POST_302"),
        (Self::POST_303, "POST_303"),
    ];

    /// Returns the raw bit pattern.
    #[inline]
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Converts a raw bit pattern, returning `None` if any unknown bit is set.
    #[inline]
    pub const fn from_bits(bits: u8) -> Option<Self> {
        if bits & !Self::POST_ALL.0 == 0 {
            Some(Self(bits))
        } else {
            None
        }
    }

    /// Converts a raw bit pattern, dropping any unknown bits.
    #[inline]
    pub const fn from_bits_truncate(bits: u8) -> Self {
        Self(bits & Self::POST_ALL.0)
    }

    /// Returns the flag governing the given redirect status, if any.
    ///
    /// Only 301, 302 and 303 have a flag. Every other status returns `None`.
    pub fn for_status(status: StatusCode) -> Option<Self> {
        match status {
            StatusCode::MOVED_PERMANENTLY => Some(Self::POST_301),
            StatusCode::FOUND => Some(Self::POST_302),
            StatusCode::SEE_OTHER => Some(Self::POST_303),
            _ => None,
        }
    }

    /// Returns `true` if at least one flag is set.
    #[inline]
    pub const fn any(self) -> bool {
        self.0 != Self::NONE.0
    }

    /// Returns `true` if no flag is set.
    #[inline]
    pub const fn is_empty(self) -> bool {
        !self.any()
    }

    /// Returns `true` if every flag is set.
    #[inline]
    pub const fn is_all(self) -> bool {
        self.0 == Self::POST_ALL.0
    }

    /// Returns `true` if all flags in `other` are also set in `self`.
    #[inline]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Returns `true` if `self` and `other` share at least one flag.
    #[inline]
    pub const fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }

    /// The flags set in either value. Same as `self | other`.
    #[inline]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// The flags set in both values. Same as `self & other`.
    #[inline]
    pub const fn intersection(self, other: Self) -> Self {
        Self(self.0 & other.0)
    }

    /// The flags set in exactly one of the values. Same as `self ^ other`.
    #[inline]
    pub const fn symmetric_difference(self, other: Self) -> Self {
        Self(self.0 ^ other.0)
    }

    /// The flags not set in `self`. Same as `!self`.
    #[inline]
    pub const fn complement(self) -> Self {
        Self::from_bits_truncate(!self.0)
    }
}

/// Returns `true` if `flags` is not [`NONE`](PostRedirectFlags::NONE).
///
/// Usually called on an intersection, to test a single status:
/// `any(policy.post_flags & PostRedirectFlags::POST_302)`.
#[inline]
pub const fn any(flags: PostRedirectFlags) -> bool {
    flags.any()
}

impl Default for PostRedirectFlags {
    fn default() -> Self {
        Self::POST_ALL
    }
}

impl BitOr for PostRedirectFlags {
    type Output = Self;

    #[inline]
    fn bitor(self, rhs: Self) -> Self {
        self.union(rhs)
    }
}

impl BitAnd for PostRedirectFlags {
    type Output = Self;

    #[inline]
    fn bitand(self, rhs: Self) -> Self {
        self.intersection(rhs)
    }
}

impl BitXor for PostRedirectFlags {
    type Output = Self;

    #[inline]
    fn bitxor(self, rhs: Self) -> Self {
        self.symmetric_difference(rhs)
    }
}

impl Not for PostRedirectFlags {
    type Output = Self;

    #[inline]
    fn not(self) -> Self {
        self.complement()
    }
}

impl BitOrAssign for PostRedirectFlags {
    #[inline]
    fn bitor_assign(&mut self, rhs: Self) {
        *self = *self | rhs;
    }
}

impl BitAndAssign for PostRedirectFlags {
    #[inline]
    fn bitand_assign(&mut self, rhs: Self) {
        *self = *self & rhs;
    }
}

impl BitXorAssign for PostRedirectFlags {
    #[inline]
    fn bitxor_assign(&mut self, rhs: Self) {
        *self = *self ^ rhs;
    }
}

impl TryFrom<u8> for PostRedirectFlags {
    type Error = crate::Error;

    fn try_from(bits: u8) -> crate::Result<Self> {
        Self::from_bits(bits).ok_or_else(|| error::unknown_bits(bits))
    }
}

impl From<PostRedirectFlags> for u8 {
    fn from(flags: PostRedirectFlags) -> u8 {
        flags.bits()
    }
}

impl fmt::Display for PostRedirectFlags {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("NONE");
        }
        if self.is_all() {
            return f.write_str("POST_ALL");
        }

        let mut first = true;
        for (flag, name) in Self::NAMED {
            if self.contains(flag) {
                if !first {
                    f.write_str(" | ")?;
                }
                f.write_str(name)?;
                first = false;
            }
        }
        Ok(())
    }
}

impl fmt::Debug for PostRedirectFlags {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "PostRedirectFlags({self})")
    }
}

impl FromStr for PostRedirectFlags {
    type Err = crate::Error;

    /// Parses names joined by `|`, such as `"POST_301 | POST_303"`.
    ///
    /// Names are case insensitive and the `POST_` prefix is optional, so
    /// `"301|303"` parses the same. `"ALL"`, `"POST_ALL"` and `"NONE"` are
    /// accepted, and an empty string is `NONE`.
    fn from_str(s: &str) -> crate::Result<Self> {
        let mut flags = Self::NONE;
        if s.trim().is_empty() {
            return Ok(flags);
        }

        for part in s.split('|') {
            let name = part.trim();
            let short = name
                .get(..5)
                .filter(|prefix| prefix.eq_ignore_ascii_case("post_"))
                .map_or(name, |_| &name[5..]);

            flags |= match short.to_ascii_uppercase().as_str() {
                "301" => Self::POST_301,
                "302" => Self::POST_302,
                "303" => Self::POST_303,
                "ALL" => Self::POST_ALL,
                "NONE" => Self::NONE,
                _ => return Err(error::unknown_flag(name)),
            };
        }
        Ok(flags)
    }
}

#[cfg(feature = "serde")]
mod serde_impls {
    use std::fmt;

    use serde::de::{self, Deserializer, Visitor};
    use serde::ser::Serializer;
    use serde::{Deserialize, Serialize};

    use super::PostRedirectFlags;

    impl Serialize for PostRedirectFlags {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            serializer.collect_str(self)
        }
    }

    struct FlagsVisitor;

    impl<'de> Visitor<'de> for FlagsVisitor {
        type Value = PostRedirectFlags;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("post-redirect flag names or a bit pattern")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
            v.parse().map_err(E::custom)
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
            u8::try_from(v)
                .ok()
                .and_then(PostRedirectFlags::from_bits)
                .ok_or_else(|| E::invalid_value(de::Unexpected::Unsigned(v), &self))
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
            match u64::try_from(v) {
                Ok(v) => self.visit_u64(v),
                Err(_) => Err(E::invalid_value(de::Unexpected::Signed(v), &self)),
            }
        }
    }

    impl<'de> Deserialize<'de> for PostRedirectFlags {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            deserializer.deserialize_any(FlagsVisitor)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_VALUES: [PostRedirectFlags; 8] = [
        PostRedirectFlags(0),
        PostRedirectFlags(1),
        PostRedirectFlags(2),
        PostRedirectFlags(3),
        PostRedirectFlags(4),
        PostRedirectFlags(5),
        PostRedirectFlags(6),
        PostRedirectFlags(7),
    ];

    #[test]
    fn post_all_is_union_of_bits() {
        assert_eq!(
            PostRedirectFlags::POST_ALL,
            PostRedirectFlags::POST_301 | PostRedirectFlags::POST_302 | PostRedirectFlags::POST_303
        );
        assert_eq!(PostRedirectFlags::POST_ALL.bits(), 0x7);
        assert_eq!(PostRedirectFlags::default(), PostRedirectFlags::POST_ALL);
    }

    #[test]
    fn curl_bit_values() {
        assert_eq!(PostRedirectFlags::POST_301.bits(), 1);
        assert_eq!(PostRedirectFlags::POST_302.bits(), 2);
        assert_eq!(PostRedirectFlags::POST_303.bits(), 4);
        assert_eq!(PostRedirectFlags::NONE.bits(), 0);
    }

    #[test]
    fn algebra_laws() {
        for a in ALL_VALUES {
            assert_eq!(a & a, a);
            assert_eq!(a ^ a, PostRedirectFlags::NONE);
            assert_eq!(!!a, a);
            assert_eq!(a | !a, PostRedirectFlags::POST_ALL);
            assert_eq!(a & !a, PostRedirectFlags::NONE);

            for b in ALL_VALUES {
                assert_eq!(a | b, b | a);
                assert_eq!(a & b, b & a);
                assert_eq!(a ^ b, b ^ a);

                for c in ALL_VALUES {
                    assert_eq!((a | b) | c, a | (b | c));
                    assert_eq!((a & b) & c, a & (b & c));
                    assert_eq!((a ^ b) ^ c, a ^ (b ^ c));
                }
            }
        }
    }

    #[test]
    fn complement_stays_in_width() {
        assert_eq!(!PostRedirectFlags::NONE, PostRedirectFlags::POST_ALL);
        assert_eq!(!PostRedirectFlags::POST_ALL, PostRedirectFlags::NONE);
        for a in ALL_VALUES {
            assert_eq!((!a).bits() & !0x7, 0);
        }
    }

    #[test]
    fn assign_matches_operators() {
        for a in ALL_VALUES {
            for b in ALL_VALUES {
                let mut x = a;
                x |= b;
                assert_eq!(x, a | b);

                let mut x = a;
                x &= b;
                assert_eq!(x, a & b);

                let mut x = a;
                x ^= b;
                assert_eq!(x, a ^ b);
            }
        }
    }

    #[test]
    fn any_membership() {
        assert!(!any(PostRedirectFlags::NONE));
        for a in &ALL_VALUES[1..] {
            assert!(any(*a));
        }
        assert!(any(PostRedirectFlags::POST_ALL & PostRedirectFlags::POST_301));
        assert!(!any(PostRedirectFlags::NONE & PostRedirectFlags::POST_301));
    }

    #[test]
    fn from_bits() {
        assert_eq!(
            PostRedirectFlags::from_bits(0x5),
            Some(PostRedirectFlags::POST_301 | PostRedirectFlags::POST_303)
        );
        assert_eq!(PostRedirectFlags::from_bits(0x8), None);
        assert_eq!(
            PostRedirectFlags::from_bits_truncate(0xff),
            PostRedirectFlags::POST_ALL
        );
        assert!(PostRedirectFlags::try_from(0x10u8).unwrap_err().is_parse());
    }

    #[test]
    fn for_status() {
        assert_eq!(
            PostRedirectFlags::for_status(StatusCode::MOVED_PERMANENTLY),
            Some(PostRedirectFlags::POST_301)
        );
        assert_eq!(
            PostRedirectFlags::for_status(StatusCode::FOUND),
            Some(PostRedirectFlags::POST_302)
        );
        assert_eq!(
            PostRedirectFlags::for_status(StatusCode::SEE_OTHER),
            Some(PostRedirectFlags::POST_303)
        );
        assert_eq!(
            PostRedirectFlags::for_status(StatusCode::TEMPORARY_REDIRECT),
            None
        );
    }

    #[test]
    fn display() {
        assert_eq!(PostRedirectFlags::NONE.to_string(), "NONE");
        assert_eq!(PostRedirectFlags::POST_ALL.to_string(), "POST_ALL");
        assert_eq!(
            (PostRedirectFlags::POST_301 | PostRedirectFlags::POST_303).to_string(),
            "POST_301 | POST_303"
        );
        assert_eq!(
            format!("{:?}", PostRedirectFlags::POST_302),
            "PostRedirectFlags(POST_302)"
        );
    }

    #[test]
    fn parse() {
        assert_eq!(
            "post_301 | 303".parse::<PostRedirectFlags>().unwrap(),
            PostRedirectFlags::POST_301 | PostRedirectFlags::POST_303
        );
        assert_eq!(
            "ALL".parse::<PostRedirectFlags>().unwrap(),
            PostRedirectFlags::POST_ALL
        );
        assert_eq!(
            "".parse::<PostRedirectFlags>().unwrap(),
            PostRedirectFlags::NONE
        );
        assert!("POST_307".parse::<PostRedirectFlags>().unwrap_err().is_parse());
        assert!("301||302".parse::<PostRedirectFlags>().is_err());

        for a in ALL_VALUES {
            assert_eq!(a.to_string().parse::<PostRedirectFlags>().unwrap(), a);
        }
    }
}
