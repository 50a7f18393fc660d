//! Fuzzer for bucket addition and removal.
//!
//! Applies the same operations to a wide anchor, a compact anchor and a
//! plain simulated working set, and checks that all three agree.

#![no_main]
use anchorhash::{Anchor, AnchorBuilder, BucketId, Error, RemovePolicy};
use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use std::collections::BTreeSet;

#[derive(Clone, Debug, Arbitrary)]
enum Op {
    Remove(u8),
    Add,
    Lookup(u64),
}

#[derive(Clone, Debug, Arbitrary)]
struct Input {
    capacity: u8,
    working: u8,
    lenient: bool,
    ops: Vec<Op>,
}

/// Working set and removal stack, without any of the index tricks
#[derive(Debug)]
struct Simulated {
    working: BTreeSet<usize>,
    removed: Vec<usize>,
}

impl Simulated {
    fn new(capacity: usize, working: usize) -> Self {
        Self {
            working: (0..working).collect(),
            removed: (working..capacity).rev().collect(),
        }
    }
}

fn check<T: BucketId>(anchor: &Anchor<T>, sim: &Simulated) {
    assert_eq!(anchor.len(), sim.working.len());
    let removed: Vec<usize> = anchor.removed().iter().map(|b| b.index()).collect();
    assert_eq!(removed, sim.removed);
    let mut working: Vec<usize> = anchor.working_buckets().iter().map(|b| b.index()).collect();
    working.sort_unstable();
    assert!(working.iter().eq(sim.working.iter()));
    for &bucket in anchor.working_buckets() {
        assert!(anchor.is_working(bucket));
        assert_eq!(anchor.order()[anchor.location()[bucket.index()].index()], bucket);
    }
    for &bucket in anchor.removed() {
        assert!(!anchor.is_working(bucket));
        let successor = anchor.successor()[bucket.index()];
        assert!(anchor.status()[successor.index()] <= anchor.status()[bucket.index()]);
    }
}

fuzz_target!(|input: Input| {
    let capacity = usize::from(input.capacity) + 1;
    let working = usize::from(input.working) % (capacity + 1);
    let policy = if input.lenient {
        RemovePolicy::Lenient
    } else {
        RemovePolicy::Strict
    };
    let mut builder = AnchorBuilder::new();
    builder.working(working).remove_policy(policy);
    let mut wide = builder.build::<u32>(capacity).unwrap();
    let mut compact = builder.build::<u16>(capacity).unwrap();
    let mut sim = Simulated::new(capacity, working);

    for op in input.ops {
        match op {
            Op::Remove(bucket) => {
                let bucket = usize::from(bucket);
                let r1 = wide.remove_bucket(bucket as u32);
                let r2 = compact.remove_bucket(bucket as u16);
                assert_eq!(r1, r2);
                let expected = if bucket >= capacity {
                    Err(Error::OutOfRange { bucket, capacity })
                } else if sim.working.remove(&bucket) {
                    sim.removed.push(bucket);
                    Ok(())
                } else if input.lenient {
                    Ok(())
                } else {
                    Err(Error::AlreadyRemoved { bucket })
                };
                assert_eq!(r1, expected);
            }
            Op::Add => {
                let r1 = wide.add_bucket().map(|b| b.index());
                let r2 = compact.add_bucket().map(|b| b.index());
                assert_eq!(r1, r2);
                match sim.removed.pop() {
                    Some(bucket) => {
                        sim.working.insert(bucket);
                        assert_eq!(r1, Ok(bucket));
                    }
                    None => assert_eq!(r1, Err(Error::NoRemovedBuckets)),
                }
            }
            Op::Lookup(key) => {
                let bucket = wide.get_bucket(key);
                assert_eq!(bucket.index(), compact.get_bucket(key).index());
                if !sim.working.is_empty() {
                    assert!(sim.working.contains(&bucket.index()));
                }
                let path = wide.get_path(key, Vec::new());
                assert_eq!(path.last(), Some(&bucket));
            }
        }
        check(&wide, &sim);
        check(&compact, &sim);
    }
});
