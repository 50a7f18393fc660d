//! Working-set state and the bucket mutation operations
//!
//! An [`Anchor`] of capacity `C` tracks every bucket id in `[0, C)` in a set
//! of fixed arrays:
//!
//! - `status[b]` is zero for a working bucket. For a removed bucket it is the
//!   size of the working set just after `b` was removed, so later removals
//!   have smaller values.
//! - `order[0..N)` lists the working buckets. Removal swaps the last working
//!   bucket into the removed bucket's slot; entries past `N` are residue that
//!   additions rely on to undo those swaps.
//! - `location[b]` is the slot `b` occupies (or last occupied) in `order`.
//! - `successor[b]` is the bucket that took over the slot of a removed `b`,
//!   and `b` itself for a working bucket.
//! - `removed` is a stack of removed buckets, most recent on top.
//!
//! Additions always restore the most recently removed bucket. That strict
//! LIFO order is what lets an addition exactly undo a removal, and it's the
//! reason callers don't get to choose which bucket comes back.

use crate::bucket::{BucketId, RemovePolicy};
use crate::err::Error;
use tracing::{debug, trace};

/// Consistent hash over a fixed-capacity set of buckets
///
/// The anchor is mutated in place and has no internal synchronization.
/// Independent anchors constructed with the same capacity and working
/// count, and fed the same sequence of additions and removals, hold
/// identical state and assign every key identically.
///
/// Once every bucket is removed, the last one removed records a status of
/// zero like a working bucket; use [`Self::is_working`] rather than
/// [`Self::status`] to test membership.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Anchor<T: BucketId> {
    /// Zero for working buckets, otherwise the working-set size just after
    /// the bucket's removal
    pub(crate) status: Box<[T]>,
    /// Working buckets in `[0, len)`, swap residue beyond
    order: Box<[T]>,
    /// Slot of each bucket within `order`
    location: Box<[T]>,
    /// Replacement for each removed bucket, identity for working buckets
    pub(crate) successor: Box<[T]>,
    /// Removed buckets, most recently removed last
    removed: Vec<T>,
    /// Number of working buckets
    len: usize,
    /// How to treat removal of a bucket that isn't working
    policy: RemovePolicy,
}

impl<T: BucketId> Anchor<T> {
    /// Make a new anchor with `capacity` buckets, of which the first
    /// `working` are working, using the width's default [`RemovePolicy`].
    pub fn new(capacity: usize, working: usize) -> Result<Self, Error> {
        Self::with_policy(capacity, working, T::DEFAULT_POLICY)
    }

    /// Make a new anchor with an explicit [`RemovePolicy`].
    ///
    /// All buckets start out working. Buckets `capacity - 1` down to
    /// `working` are then removed in descending order, so the lowest of
    /// them is on top of the removal stack and is the first one a later
    /// [`Self::add_bucket`] brings back.
    pub fn with_policy(
        capacity: usize,
        working: usize,
        policy: RemovePolicy,
    ) -> Result<Self, Error> {
        if capacity == 0 || capacity > T::MAX_CAPACITY || working > capacity {
            return Err(Error::Size {
                capacity,
                working,
                max: T::MAX_CAPACITY,
            });
        }

        let identity: Box<[T]> = (0..capacity).map(T::from_index).collect();
        let mut anchor = Self {
            status: vec![T::zero(); capacity].into_boxed_slice(),
            order: identity.clone(),
            location: identity.clone(),
            successor: identity,
            removed: Vec::with_capacity(capacity),
            len: capacity,
            policy,
        };
        for bucket in (working..capacity).rev() {
            anchor.remove_working(T::from_index(bucket));
        }

        debug!(capacity, working, %policy, "created anchor");
        Ok(anchor)
    }

    /// Total number of buckets, working or not.
    pub fn capacity(&self) -> usize {
        self.status.len()
    }

    /// Number of working buckets.
    pub fn len(&self) -> usize {
        self.len
    }

    /// True if no bucket is working.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of removed buckets available to [`Self::add_bucket`].
    pub fn removed_len(&self) -> usize {
        self.removed.len()
    }

    /// The configured [`RemovePolicy`].
    pub fn remove_policy(&self) -> RemovePolicy {
        self.policy
    }

    /// Check whether `bucket` is currently working.
    ///
    /// Out-of-range ids are not working. When the working set is empty,
    /// the most recently removed bucket has a status of zero; we still
    /// report it as removed.
    pub fn is_working(&self, bucket: T) -> bool {
        self.len > 0
            && self
                .status
                .get(bucket.index())
                .is_some_and(|status| status.is_zero())
    }

    /// Working buckets, in their current order.
    pub fn working_buckets(&self) -> &[T] {
        &self.order[..self.len]
    }

    /// Per-bucket status: zero when working, otherwise the working-set size
    /// recorded when the bucket was removed.
    pub fn status(&self) -> &[T] {
        &self.status
    }

    /// Full `order` array, including the residue past [`Self::len`].
    pub fn order(&self) -> &[T] {
        &self.order
    }

    /// Slot of each bucket within [`Self::order`].
    pub fn location(&self) -> &[T] {
        &self.location
    }

    /// Successor of each bucket.
    pub fn successor(&self) -> &[T] {
        &self.successor
    }

    /// Removed buckets, oldest removal first.
    pub fn removed(&self) -> &[T] {
        &self.removed
    }

    /// Bring back the most recently removed bucket, and return it.
    ///
    /// The bucket returns to the slot it held before removal, and the
    /// bucket that was swapped into that slot moves back to the end of the
    /// working set. Fails with [`Error::NoRemovedBuckets`] if every bucket
    /// is already working.
    pub fn add_bucket(&mut self) -> Result<T, Error> {
        let bucket = self.removed.pop().ok_or(Error::NoRemovedBuckets)?;
        let index = bucket.index();
        let slot = self.len;

        self.status[index] = T::zero();
        let displaced = self.order[slot];
        self.location[displaced.index()] = T::from_index(slot);
        self.order[self.location[index].index()] = bucket;
        self.successor[index] = bucket;
        self.len += 1;

        debug!(bucket = index, working = self.len, "added bucket");
        Ok(bucket)
    }

    /// Remove a working bucket.
    ///
    /// Keys assigned to `bucket` move to other working buckets; no other key
    /// changes assignment. If `bucket` is not working, the result depends on
    /// the [`RemovePolicy`]: `Strict` returns [`Error::AlreadyRemoved`] and
    /// `Lenient` returns `Ok` without changing anything. Ids outside the
    /// anchor's capacity always fail with [`Error::OutOfRange`].
    pub fn remove_bucket(&mut self, bucket: T) -> Result<(), Error> {
        let index = bucket.index();
        if index >= self.capacity() {
            return Err(Error::OutOfRange {
                bucket: index,
                capacity: self.capacity(),
            });
        }
        if !self.is_working(bucket) {
            return match self.policy {
                RemovePolicy::Strict => Err(Error::AlreadyRemoved { bucket: index }),
                RemovePolicy::Lenient => {
                    trace!(bucket = index, "ignoring removal of non-working bucket");
                    Ok(())
                }
            };
        }

        self.remove_working(bucket);
        debug!(bucket = index, working = self.len, "removed bucket");
        Ok(())
    }

    /// Move a bucket known to be working into the removed state.
    ///
    /// The last working bucket takes over the removed bucket's slot and
    /// becomes its successor.
    fn remove_working(&mut self, bucket: T) {
        let index = bucket.index();
        self.len -= 1;
        let last = self.order[self.len];
        let slot = self.location[index];

        self.removed.push(bucket);
        self.status[index] = T::from_index(self.len);
        self.order[slot.index()] = last;
        self.successor[index] = last;
        self.location[last.index()] = slot;
    }
}
