//! Near-duplicate collapsing by exact URL and word-set overlap.
//!
//! Records are merged in a single sequential pass: each incoming record is
//! compared against the records kept so far, in the order they were kept,
//! and the first one it overlaps with decides its fate. This is not
//! transitive clustering; with three mutually similar records the outcome
//! depends on input order.

use std::collections::HashSet;

use crate::config::DEFAULT_DEDUP_THRESHOLD;
use crate::record::ResultRecord;
use crate::text::jaccard;

/// Collapses near-duplicate evidence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Deduplicator {
    threshold: f64,
}

impl Default for Deduplicator {
    fn default() -> Self {
        Self::new(DEFAULT_DEDUP_THRESHOLD)
    }
}

impl Deduplicator {
    /// `threshold` is the Jaccard similarity that must be exceeded for two
    /// records to count as duplicates.
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    /// Removes duplicates from `records`, which should already be sorted by
    /// score descending.
    ///
    /// A record whose URL was already kept is skipped. Otherwise the first
    /// kept record whose title+snippet overlaps it by more than the
    /// threshold is its match: the higher score survives, ties going to the
    /// record already kept. A winning newcomer replaces the loser, which is
    /// dropped along with its URL, and joins the end of the kept list.
    pub fn deduplicate(&self, records: Vec<ResultRecord>) -> Vec<ResultRecord> {
        let input_len = records.len();
        let mut kept: Vec<ResultRecord> = Vec::with_capacity(input_len);
        let mut seen_urls: HashSet<String> = HashSet::new();

        for record in records {
            if seen_urls.contains(&record.url) {
                continue;
            }

            let text = record.text();
            let matched = kept
                .iter()
                .position(|k| jaccard(&text, &k.text()) > self.threshold);

            match matched {
                None => {
                    seen_urls.insert(record.url.clone());
                    kept.push(record);
                }
                Some(index) => {
                    let incumbent = &kept[index];
                    if record.score.unwrap_or(0.0) > incumbent.score.unwrap_or(0.0) {
                        let loser = kept.remove(index);
                        seen_urls.remove(&loser.url);
                        tracing::trace!(kept = %record.url, dropped = %loser.url, "replaced near-duplicate");
                        seen_urls.insert(record.url.clone());
                        kept.push(record);
                    } else {
                        tracing::trace!(kept = %incumbent.url, dropped = %record.url, "dropped near-duplicate");
                    }
                }
            }
        }

        tracing::debug!(input = input_len, output = kept.len(), "deduplicated evidence");
        kept
    }
}
