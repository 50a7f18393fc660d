//! Key lookup: resolving a key to a working bucket
//!
//! A key's probe sequence picks a first candidate uniformly from the whole
//! capacity. While the candidate is removed, the next probe picks a bucket
//! from the working set as it was just after that removal, `[0, status[b])`,
//! and successor links are followed until they reach a bucket that was
//! still working at that time. Each step lands in a strictly smaller,
//! older working set, so the walk ends at a currently working bucket.
//!
//! The expected number of removed buckets visited is about `ln(C / N)`.

use crate::anchor::Anchor;
use crate::bucket::BucketId;
use crate::rand::{fast_range, ProbeRng};
use rand_core::RngCore;

impl<T: BucketId> Anchor<T> {
    /// Find the working bucket assigned to `key`.
    ///
    /// The result depends only on the key, the capacity, the initial
    /// working count and the sequence of mutations applied so far. If the
    /// working set is empty, this returns the last bucket removed.
    pub fn get_bucket(&self, key: u64) -> T {
        self.walk(key, |_| ())
    }

    /// Trace the lookup path for `key`.
    ///
    /// Every candidate bucket visited on the way, including each successor
    /// hop, is appended to `path`, and the buffer is returned. The last
    /// element appended is the bucket [`Self::get_bucket`] would return.
    pub fn get_path(&self, key: u64, mut path: Vec<T>) -> Vec<T> {
        let _ = self.walk(key, |bucket| path.push(bucket));
        path
    }

    /// Lookup walk shared by [`Self::get_bucket`] and [`Self::get_path`]
    #[inline(always)]
    fn walk<F: FnMut(T)>(&self, key: u64, mut visit: F) -> T {
        let status = &self.status[..];
        let successor = &self.successor[..];
        let mut rng = ProbeRng::new(key);

        let mut bucket = T::from_index(fast_range(rng.next_u32(), status.len()));
        visit(bucket);
        loop {
            let epoch = status[bucket.index()];
            if epoch.is_zero() {
                return bucket;
            }
            let mut candidate = T::from_index(fast_range(rng.next_u32(), epoch.index()));
            visit(candidate);
            while status[candidate.index()] >= epoch {
                candidate = successor[candidate.index()];
                visit(candidate);
            }
            bucket = candidate;
        }
    }
}

#[cfg(test)]
mod test {
    use crate::Anchor;

    #[test]
    fn all_working_uses_first_probe() {
        let anchor = Anchor::<u32>::new(10, 10).unwrap();
        for key in 0..100 {
            let path = anchor.get_path(key, Vec::new());
            assert_eq!(path, vec![anchor.get_bucket(key)]);
        }
    }

    #[test]
    fn path_appends_to_buffer() {
        let mut anchor = Anchor::<u16>::new(7, 7).unwrap();
        for bucket in [6, 5, 1, 0] {
            anchor.remove_bucket(bucket).unwrap();
        }
        let path = anchor.get_path(5, vec![99]);
        assert_eq!(path, vec![99, 5, 0, 1, 4]);
        assert_eq!(anchor.get_path(21, Vec::new()), vec![6, 1, 1, 4]);
        assert_eq!(anchor.get_path(37, Vec::new()), vec![0, 0, 3]);
        assert_eq!(anchor.get_path(2, Vec::with_capacity(1)), vec![1, 2]);
    }

    #[test]
    fn empty_working_set_stays_total() {
        let anchor = Anchor::<u32>::new(4, 0).unwrap();
        for key in 0..50 {
            assert_eq!(anchor.get_bucket(key), 0);
        }
    }
}
