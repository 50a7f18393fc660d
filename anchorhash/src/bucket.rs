//! Bucket id widths and the removal policy
//!
//! An anchor keeps four arrays of bucket ids (or working-set sizes, which
//! share the same range) with one entry per bucket. Their element type is a
//! [`BucketId`], chosen at compile time: `u32` for large anchors, or `u16`
//! for anchors of up to 65,536 buckets that want the denser, more cache
//! friendly layout.

use num_traits::{PrimInt, Unsigned};
use std::fmt::{Debug, Display};
use std::hash::Hash;

/// How [`crate::Anchor::remove_bucket`] treats a bucket that isn't working
///
/// Removal events may be delivered more than once in some deployments. The
/// two policies are intentionally different contracts, and the choice is
/// part of an anchor's configuration.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, strum::Display, strum::EnumString)]
#[strum(serialize_all = "lowercase")]
#[non_exhaustive]
pub enum RemovePolicy {
    /// Report [`crate::Error::AlreadyRemoved`] and leave the anchor untouched.
    ///
    /// This is the default for [`crate::WideAnchor`].
    Strict,
    /// Ignore the request. Duplicate removals are harmless.
    ///
    /// This is the default for [`crate::CompactAnchor`].
    Lenient,
}

/// Private module for the [`BucketId`] seal
#[allow(unreachable_pub)]
mod sealed {
    /// Implemented only for the bucket id widths this crate supports
    pub trait Sealed {}
    impl Sealed for u16 {}
    impl Sealed for u32 {}
}

/// Unsigned integer type used to store bucket ids
///
/// Implemented for `u32` and `u16` only.
pub trait BucketId:
    PrimInt + Unsigned + Debug + Display + Hash + Send + Sync + sealed::Sealed + 'static
{
    /// Largest anchor capacity this width can address
    const MAX_CAPACITY: usize;

    /// Removal policy used when none is configured
    const DEFAULT_POLICY: RemovePolicy;

    /// Convert an array index to a bucket id.
    ///
    /// The index must be below [`Self::MAX_CAPACITY`].
    fn from_index(index: usize) -> Self;

    /// Convert a bucket id to an array index.
    fn index(self) -> usize;
}

impl BucketId for u32 {
    const MAX_CAPACITY: usize = (u32::MAX as usize).saturating_add(1);
    const DEFAULT_POLICY: RemovePolicy = RemovePolicy::Strict;

    #[inline(always)]
    fn from_index(index: usize) -> Self {
        debug_assert!(index < Self::MAX_CAPACITY);
        index as u32
    }

    #[inline(always)]
    fn index(self) -> usize {
        self as usize
    }
}

impl BucketId for u16 {
    const MAX_CAPACITY: usize = 1 << 16;
    const DEFAULT_POLICY: RemovePolicy = RemovePolicy::Lenient;

    #[inline(always)]
    fn from_index(index: usize) -> Self {
        debug_assert!(index < Self::MAX_CAPACITY);
        index as u16
    }

    #[inline(always)]
    fn index(self) -> usize {
        usize::from(self)
    }
}

#[cfg(test)]
mod test {
    use super::{BucketId, RemovePolicy};
    use std::str::FromStr;

    #[test]
    fn index_conversions() {
        assert_eq!(u16::from_index(65535), u16::MAX);
        assert_eq!(u16::MAX.index(), 65535);
        assert_eq!(u32::from_index(70_000).index(), 70_000);
        assert_eq!(<u16 as BucketId>::MAX_CAPACITY, 65536);
    }

    #[test]
    fn policy_names() {
        assert_eq!(RemovePolicy::Strict.to_string(), "strict");
        assert_eq!(
            RemovePolicy::from_str("lenient").ok(),
            Some(RemovePolicy::Lenient)
        );
        assert!(RemovePolicy::from_str("sloppy").is_err());
        assert_eq!(u32::DEFAULT_POLICY, RemovePolicy::Strict);
        assert_eq!(u16::DEFAULT_POLICY, RemovePolicy::Lenient);
    }
}
