use chrono::{TimeZone, Utc};
use dossier_core::research::scoring::{recency, ScoringEngine};
use dossier_core::ResultRecord;

fn keywords(query: &str) -> Vec<String> {
    query.split_whitespace().map(str::to_string).collect()
}

#[test]
fn test_missing_published_at_scores_neutral_recency() {
    let now = Utc.with_ymd_and_hms(2025, 1, 15, 0, 0, 0).unwrap();
    let record = ResultRecord::new("https://unknown.net/a", "nothing relevant", "at all");
    assert!(record.published_at.is_none());
    assert_eq!(recency(record.published_at.as_deref(), now), 0.5);

    // 0.6 * 0 + 0.25 * 0.5 + 0.15 * 0.5
    let scored = ScoringEngine::default().score_at(vec![record], &keywords("rust"), now);
    assert_eq!(scored[0].score, Some(0.2));
}

#[test]
fn test_scores_in_unit_range_with_four_decimals() {
    let now = Utc.with_ymd_and_hms(2025, 1, 15, 0, 0, 0).unwrap();
    let records = vec![
        ResultRecord::new("https://wikipedia.org/Rust", "Rust language", "memory safety")
            .with_published_at("2024-12-01T00:00:00Z"),
        ResultRecord::new("https://example.org/x", "Gardening", "tomatoes")
            .with_published_at("2019-05-05"),
        ResultRecord::new("https://research.example/y", "Rust memory", "safety study")
            .with_published_at("2030-01-01T00:00:00Z"),
    ];
    let scored = ScoringEngine::default().score_at(records, &keywords("rust memory safety"), now);

    for record in &scored {
        let score = record.score.unwrap();
        assert!((0.0..=1.0).contains(&score));
        assert_eq!((score * 10_000.0).round() / 10_000.0, score);
    }
    assert!(scored
        .windows(2)
        .all(|pair| pair[0].score.unwrap() >= pair[1].score.unwrap()));
    assert_eq!(scored[0].url, "https://research.example/y");
}

#[test]
fn test_equal_scores_order_by_source_rank() {
    let records: Vec<ResultRecord> = [4, 2, 3, 1]
        .iter()
        .map(|rank| {
            ResultRecord::new(format!("https://same.net/{rank}"), "same", "text")
                .with_source_rank(*rank)
        })
        .collect();
    let scored = ScoringEngine::default().score(records, &[]);
    let ranks: Vec<u32> = scored.iter().filter_map(|r| r.source_rank).collect();
    assert_eq!(ranks, vec![1, 2, 3, 4]);
}

#[test]
fn test_identical_url_and_title_share_id() {
    let a = ResultRecord::new("https://a.com/x", "Title", "one snippet");
    let b = ResultRecord::new("https://a.com/x", "Title", "another snippet");
    let c = ResultRecord::new("https://a.com/x", "Other title", "one snippet");
    assert_eq!(a.id, b.id);
    assert_ne!(a.id, c.id);
}
