//! State traces for small anchors, following the worked examples in the
//! AnchorHash paper (Fig. 2 and Examples 13-15)

use anchorhash::{Anchor, CompactAnchor, WideAnchor};

#[test]
fn paper_example() {
    let mut anchor = WideAnchor::new(7, 7).unwrap();

    // Fig. 2(d)
    anchor.remove_bucket(6).unwrap();
    anchor.remove_bucket(5).unwrap();

    // Ex. 13
    anchor.remove_bucket(1).unwrap();
    assert_eq!(anchor.order(), &[0, 4, 2, 3, 4, 5, 6]);
    assert_eq!(anchor.location(), &[0, 1, 2, 3, 1, 5, 6]);

    // Ex. 14/15
    anchor.remove_bucket(0).unwrap();
    assert_eq!(anchor.successor(), &[3, 4, 2, 3, 4, 5, 6]);
    assert_eq!(anchor.status(), &[3, 4, 0, 0, 0, 5, 6]);
    assert_eq!(anchor.working_buckets(), &[3, 4, 2]);
    assert_eq!(anchor.removed(), &[6, 5, 1, 0]);

    // Restore
    assert_eq!(anchor.add_bucket(), Ok(0));
    assert_eq!(anchor.add_bucket(), Ok(1));
    assert_eq!(anchor.add_bucket(), Ok(5));
    assert_eq!(anchor.add_bucket(), Ok(6));

    let identity = [0, 1, 2, 3, 4, 5, 6];
    assert_eq!(anchor.order(), &identity);
    assert_eq!(anchor.location(), &identity);
    assert_eq!(anchor.successor(), &identity);
    assert_eq!(anchor.status(), &[0; 7]);
}

#[test]
fn paper_example_compact() {
    let mut wide = WideAnchor::new(7, 7).unwrap();
    let mut compact = CompactAnchor::new(7, 7).unwrap();
    for bucket in [6, 5, 1, 0] {
        wide.remove_bucket(bucket).unwrap();
        compact.remove_bucket(bucket as u16).unwrap();
        assert!(wide
            .order()
            .iter()
            .copied()
            .eq(compact.order().iter().map(|&b| u32::from(b))));
        assert!(wide
            .successor()
            .iter()
            .copied()
            .eq(compact.successor().iter().map(|&b| u32::from(b))));
    }
}

#[test]
fn lifo_restore_order() {
    let mut anchor = Anchor::<u32>::new(32, 32).unwrap();
    let removals = [17, 3, 29, 0, 8, 31, 12];
    for bucket in removals {
        anchor.remove_bucket(bucket).unwrap();
    }
    assert_eq!(anchor.len(), 32 - removals.len());

    let restored: Vec<u32> = removals
        .iter()
        .map(|_| anchor.add_bucket().unwrap())
        .collect();
    let mut expected = removals.to_vec();
    expected.reverse();
    assert_eq!(restored, expected);
    assert_eq!(anchor, Anchor::<u32>::new(32, 32).unwrap());
}

#[test]
fn initially_removed_come_back_lowest_first() {
    let mut anchor = CompactAnchor::new(8, 3).unwrap();
    let added: Vec<u16> = (0..5).map(|_| anchor.add_bucket().unwrap()).collect();
    assert_eq!(added, vec![3, 4, 5, 6, 7]);
    assert_eq!(anchor, CompactAnchor::new(8, 8).unwrap());
}

#[test]
fn remove_then_add_is_identity() {
    let mut anchor = WideAnchor::new(12, 9).unwrap();
    for bucket in [3, 7, 0] {
        anchor.remove_bucket(bucket).unwrap();
    }
    let snapshot = anchor.clone();

    for bucket in 0..12 {
        if !anchor.is_working(bucket) {
            continue;
        }
        anchor.remove_bucket(bucket).unwrap();
        assert_eq!(anchor.add_bucket(), Ok(bucket));
        assert_eq!(anchor.status(), snapshot.status());
        assert_eq!(anchor.order(), snapshot.order());
        assert_eq!(anchor.location(), snapshot.location());
        assert_eq!(anchor.successor(), snapshot.successor());
        assert_eq!(anchor, snapshot);
    }
}
