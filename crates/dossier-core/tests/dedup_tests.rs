use std::collections::HashSet;

use dossier_core::research::Deduplicator;
use dossier_core::ResultRecord;

fn make_result(url: &str, title: &str, snippet: &str, score: f64) -> ResultRecord {
    ResultRecord::new(url, title, snippet).with_score(score)
}

fn mixed_input() -> Vec<ResultRecord> {
    vec![
        make_result("https://a.com/1", "Paris is the capital of France", "official sources", 0.9),
        make_result("https://b.com/2", "Paris is the capital of France", "official sources agree", 0.8),
        make_result("https://a.com/1", "Duplicate url", "different text", 0.7),
        make_result("https://c.com/3", "Lyon is a large city", "in the south east", 0.6),
        make_result("https://d.com/4", "", "", 0.5),
        make_result("https://e.com/5", "Lyon is a large city", "in the south east", 0.95),
    ]
}

#[test]
fn test_dedup_is_idempotent() {
    let dedup = Deduplicator::default();
    let once = dedup.deduplicate(mixed_input());
    let twice = dedup.deduplicate(once.clone());
    assert_eq!(once, twice);
}

#[test]
fn test_dedup_never_grows_or_invents() {
    let input = mixed_input();
    let input_urls: HashSet<String> = input.iter().map(|r| r.url.clone()).collect();
    let output = Deduplicator::default().deduplicate(input.clone());

    assert!(output.len() <= input.len());
    assert!(output.iter().all(|r| input.contains(r)));
    assert!(output.iter().all(|r| input_urls.contains(&r.url)));
}

#[test]
fn test_dedup_urls_are_unique() {
    let output = Deduplicator::default().deduplicate(mixed_input());
    let urls: HashSet<&str> = output.iter().map(|r| r.url.as_str()).collect();
    assert_eq!(urls.len(), output.len());
}

#[test]
fn test_dedup_expected_survivors() {
    let output = Deduplicator::default().deduplicate(mixed_input());
    let urls: Vec<&str> = output.iter().map(|r| r.url.as_str()).collect();
    // b.com loses to a.com; e.com displaces c.com and moves to the end
    assert_eq!(urls, vec!["https://a.com/1", "https://d.com/4", "https://e.com/5"]);
}

#[test]
fn test_dedup_first_match_only() {
    // The third record overlaps both kept records but only the first decides
    let records = vec![
        make_result("https://1.com", "a b c d", "", 0.5),
        make_result("https://2.com", "e f g h", "", 0.5),
        make_result("https://3.com", "a b c d e f g h", "", 0.9),
    ];
    // 4/8 = 0.5 against each, so use a lower threshold
    let output = Deduplicator::new(0.4).deduplicate(records);
    let urls: Vec<&str> = output.iter().map(|r| r.url.as_str()).collect();
    assert_eq!(urls, vec!["https://2.com", "https://3.com"]);
}

const SAME_TITLE: &str = "paris is the capital of france";

fn survivors(records: Vec<ResultRecord>) -> Vec<String> {
    Deduplicator::default()
        .deduplicate(records)
        .into_iter()
        .map(|r| r.url)
        .collect()
}

#[test]
fn test_dedup_three_similar_in_score_order_keeps_first() {
    let records = vec![
        make_result("https://a", SAME_TITLE, "", 0.9),
        make_result("https://b", SAME_TITLE, "", 0.8),
        make_result("https://c", SAME_TITLE, "", 0.7),
    ];
    assert_eq!(survivors(records), vec!["https://a"]);
}

#[test]
fn test_dedup_three_similar_later_winner_faces_next_record() {
    // b displaces a, then c is compared against b and displaces it in turn
    let records = vec![
        make_result("https://a", SAME_TITLE, "", 0.5),
        make_result("https://b", SAME_TITLE, "", 0.9),
        make_result("https://c", SAME_TITLE, "", 0.95),
    ];
    assert_eq!(survivors(records), vec!["https://c"]);
}

#[test]
fn test_dedup_three_similar_third_loses_to_new_incumbent() {
    // c outscores the displaced a but not b, which now holds the slot
    let records = vec![
        make_result("https://a", SAME_TITLE, "", 0.5),
        make_result("https://b", SAME_TITLE, "", 0.9),
        make_result("https://c", SAME_TITLE, "", 0.7),
    ];
    assert_eq!(survivors(records), vec!["https://b"]);
}
