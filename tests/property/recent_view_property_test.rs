//! Property-based tests for the recently-viewed MRU list.
//!
//! For any sequence of views, the list never exceeds its bound, contains no
//! duplicate bookmark ids, and keeps the latest viewed bookmark at index 0.

use std::collections::HashSet;

use linkstash::store::record_view;
use linkstash::types::bookmark::RecentView;
use proptest::prelude::*;

/// A small id pool so re-views are common.
fn arb_view_sequence() -> impl Strategy<Value = Vec<u8>> {
    proptest::collection::vec(0u8..8, 0..40)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn list_stays_bounded_and_unique(sequence in arb_view_sequence()) {
        let mut views: Vec<RecentView> = Vec::new();
        for (step, id) in sequence.iter().enumerate() {
            record_view(&mut views, &format!("b{}", id), step as i64);

            prop_assert!(views.len() <= 10, "list exceeded its bound");
            let unique: HashSet<&str> =
                views.iter().map(|rv| rv.bookmark_id.as_str()).collect();
            prop_assert_eq!(unique.len(), views.len(), "duplicate bookmark id");
        }
    }

    #[test]
    fn latest_view_is_always_front(sequence in arb_view_sequence()) {
        let mut views: Vec<RecentView> = Vec::new();
        for (step, id) in sequence.iter().enumerate() {
            let bookmark_id = format!("b{}", id);
            record_view(&mut views, &bookmark_id, step as i64);
            prop_assert_eq!(&views[0].bookmark_id, &bookmark_id);
            prop_assert_eq!(views[0].viewed_at, step as i64);
        }
    }

    #[test]
    fn reviewing_never_grows_the_list(sequence in arb_view_sequence()) {
        let mut views: Vec<RecentView> = Vec::new();
        for (step, id) in sequence.iter().enumerate() {
            let bookmark_id = format!("b{}", id);
            let was_present = views.iter().any(|rv| rv.bookmark_id == bookmark_id);
            let len_before = views.len();
            record_view(&mut views, &bookmark_id, step as i64);
            if was_present {
                prop_assert_eq!(views.len(), len_before, "re-view grew the list");
            }
        }
    }
}
