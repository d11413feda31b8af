use texmatch::{
    distance, reduce_per_label, FeatureVector, IndexEntry, MatchConfig, Matcher, ReferenceIndex,
    HIST_BUCKETS,
};

fn concentrated(bucket: usize, edge: f32) -> FeatureVector {
    let mut hist = vec![0.0f32; HIST_BUCKETS];
    hist[bucket] = 1.0;
    FeatureVector { hist, edge }
}

fn entry(label: &str, source: &str, features: FeatureVector) -> IndexEntry {
    IndexEntry {
        label_key: label.into(),
        source_ref: source.into(),
        features,
    }
}

fn two_label_index() -> ReferenceIndex {
    ReferenceIndex::new(vec![
        entry("a", "a_0.jpg", concentrated(0, 0.1)),
        entry("b", "b_0.jpg", concentrated(63, 0.9)),
    ])
    .unwrap()
}

#[test]
fn returns_at_most_min_of_topk_and_label_count() {
    let index = two_label_index();
    let query = concentrated(0, 0.1);

    for top_k in [1usize, 2, 3, 10] {
        let matcher = Matcher::new(index.clone()).with_config(MatchConfig { top_k, ..MatchConfig::default() });
        let results = matcher.match_features(&query);
        assert_eq!(results.len(), top_k.min(2));
    }
}

#[test]
fn close_match_outranks_distant_label() {
    let matcher = Matcher::new(two_label_index()).with_config(MatchConfig { top_k: 2, ..MatchConfig::default() });
    // Nearly A's distribution with most mass in bucket 0.
    let mut query = concentrated(0, 0.12);
    query.hist[0] = 0.96;
    query.hist[1] = 0.04;

    let results = matcher.match_features(&query);
    assert_eq!(results.len(), 2);
    assert_eq!(results[0].label_key, "a");
    assert_eq!(results[0].rank, 1);
    assert!(results[0].confidence >= 0.9);
    assert_eq!(results[1].label_key, "b");
    assert_eq!(results[1].rank, 2);
    assert!(results[1].confidence <= 0.6);
}

#[test]
fn top_one_always_scores_exactly_ninety_five() {
    let matcher = Matcher::new(two_label_index()).with_config(MatchConfig { top_k: 1, ..MatchConfig::default() });
    let results = matcher.match_features(&concentrated(17, 0.4));
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].confidence, 0.95);
}

#[test]
fn confidence_is_non_increasing_and_bounded() {
    let index = ReferenceIndex::new(vec![
        entry("a", "a.jpg", concentrated(0, 0.0)),
        entry("b", "b.jpg", concentrated(21, 0.3)),
        entry("c", "c.jpg", concentrated(42, 0.6)),
        entry("d", "d.jpg", concentrated(63, 0.9)),
    ])
    .unwrap();
    let matcher = Matcher::new(index).with_config(MatchConfig { top_k: 4, ..MatchConfig::default() });
    let results = matcher.match_features(&concentrated(0, 0.0));

    assert_eq!(results.len(), 4);
    for (i, r) in results.iter().enumerate() {
        assert_eq!(r.rank, i + 1);
        assert!((0.05..=0.99).contains(&r.confidence));
    }
    for pair in results.windows(2) {
        assert!(pair[0].distance <= pair[1].distance);
        assert!(pair[0].confidence >= pair[1].confidence);
    }
    // Labels are pairwise distinct.
    for i in 0..results.len() {
        for j in i + 1..results.len() {
            assert_ne!(results[i].label_key, results[j].label_key);
        }
    }
}

#[test]
fn empty_index_yields_empty_results() {
    let matcher = Matcher::new(ReferenceIndex::default());
    assert!(matcher.match_features(&concentrated(0, 0.5)).is_empty());
}

#[test]
fn repeated_queries_are_bit_identical() {
    let matcher = Matcher::new(two_label_index()).with_config(MatchConfig { top_k: 2, ..MatchConfig::default() });
    let query = concentrated(3, 0.42);
    let first = matcher.match_features(&query);
    let second = matcher.match_features(&query);
    assert_eq!(first, second);
}

#[test]
fn reduction_step_is_usable_on_its_own() {
    // Hosts can run the scoring stage directly on a precomputed vector and
    // inspect the per-label candidates before ranking.
    let index = two_label_index();
    let query = concentrated(0, 0.1);

    let candidates = reduce_per_label(&query, &index);
    assert_eq!(candidates.len(), 2);
    assert_eq!(candidates[0].label_key, "a");
    assert_eq!(
        candidates[0].distance,
        distance(&query, &concentrated(0, 0.1))
    );
    assert_eq!(candidates[0].source_ref, "a_0.jpg");
    assert_eq!(candidates[1].label_key, "b");
}

#[test]
fn multiple_samples_per_label_collapse_to_the_best_one() {
    let index = ReferenceIndex::new(vec![
        entry("a", "a_far.jpg", concentrated(63, 0.9)),
        entry("b", "b_mid.jpg", concentrated(32, 0.5)),
        entry("a", "a_near.jpg", concentrated(0, 0.1)),
    ])
    .unwrap();
    let matcher = Matcher::new(index).with_config(MatchConfig { top_k: 3, ..MatchConfig::default() });
    let results = matcher.match_features(&concentrated(0, 0.1));

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].label_key, "a");
    assert_eq!(results[0].source_ref, "a_near.jpg");
    assert_eq!(results[0].distance, 0.0);
}
