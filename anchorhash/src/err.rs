//! Error types for the `anchorhash` crate

/// Errors applicable to constructing and mutating an [`crate::Anchor`]
///
/// Lookups never fail; every error here comes from construction or from
/// a bucket addition or removal, and is reported synchronously to the
/// caller. None of them are transient.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The requested capacity and working count can't be represented.
    ///
    /// Capacity must be nonzero and no larger than `max`, the limit for the
    /// chosen bucket id width. The working count can't exceed the capacity.
    #[error("invalid anchor size: {working} working of {capacity} buckets (capacity limit {max})")]
    Size {
        /// Requested number of buckets
        capacity: usize,
        /// Requested number of initially working buckets
        working: usize,
        /// Largest capacity supported by the bucket id width
        max: usize,
    },

    /// A bucket addition was requested but every bucket is already working.
    #[error("no removed buckets available to add")]
    NoRemovedBuckets,

    /// Strict removal of a bucket that isn't currently working.
    ///
    /// Under [`crate::RemovePolicy::Lenient`] the same call is ignored.
    #[error("bucket {bucket} is not working and can't be removed")]
    AlreadyRemoved {
        /// The rejected bucket id
        bucket: usize,
    },

    /// A bucket id outside `[0, capacity)` was passed to a mutation.
    #[error("bucket {bucket} is out of range for capacity {capacity}")]
    OutOfRange {
        /// The rejected bucket id
        bucket: usize,
        /// Capacity of the anchor
        capacity: usize,
    },
}
