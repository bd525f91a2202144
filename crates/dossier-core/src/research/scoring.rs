//! Evidence scoring by relevance, recency, and source reliability.
//!
//! Each record gets an independent combined score:
//!
//! ```text
//! combined  = w_rel * relevance + w_rec * recency + w_src * reliability
//! relevance = matched keywords / max(1, keywords)
//! recency   = clamp(exp(-age_days / 365), 0, 1), or 0.5 without a timestamp
//! ```
//!
//! With the default weights (0.6, 0.25, 0.15) the result stays in [0, 1].
//! Scores are rounded to 4 decimals, then records are sorted by score
//! descending with ascending provider rank as the tie-break.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use crate::config::{
    ScoringConfig, DEFAULT_DOMAIN_RELIABILITY, DEFAULT_RECENCY_WEIGHT, DEFAULT_RELEVANCE_WEIGHT,
    DEFAULT_RELIABILITY, DEFAULT_RELIABILITY_WEIGHT, MISSING_SOURCE_RANK, NEUTRAL_RECENCY,
    RECENCY_DECAY_DAYS,
};
use crate::record::ResultRecord;

const SECONDS_PER_DAY: i64 = 86_400;

/// Weights of the three score components.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreWeights {
    pub relevance: f64,
    pub recency: f64,
    pub reliability: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            relevance: DEFAULT_RELEVANCE_WEIGHT,
            recency: DEFAULT_RECENCY_WEIGHT,
            reliability: DEFAULT_RELIABILITY_WEIGHT,
        }
    }
}

/// Domain → reliability lookup with a fallback for unknown domains.
#[derive(Debug, Clone, PartialEq)]
pub struct ReliabilityTable {
    default: f64,
    domains: BTreeMap<String, f64>,
}

impl ReliabilityTable {
    pub fn new(default: f64, domains: BTreeMap<String, f64>) -> Self {
        Self { default, domains }
    }

    /// Reliability of `domain` (exact hostname match), clamped to [0, 1].
    pub fn get(&self, domain: &str) -> f64 {
        self.domains
            .get(domain)
            .copied()
            .unwrap_or(self.default)
            .clamp(0.0, 1.0)
    }
}

impl Default for ReliabilityTable {
    fn default() -> Self {
        Self::new(
            DEFAULT_RELIABILITY,
            DEFAULT_DOMAIN_RELIABILITY
                .iter()
                .map(|(domain, value)| (domain.to_string(), *value))
                .collect(),
        )
    }
}

/// Ranks evidence records.
#[derive(Debug, Clone, Default)]
pub struct ScoringEngine {
    weights: ScoreWeights,
    reliability: ReliabilityTable,
}

impl ScoringEngine {
    pub fn new(weights: ScoreWeights, reliability: ReliabilityTable) -> Self {
        Self {
            weights,
            reliability,
        }
    }

    pub fn from_config(config: &ScoringConfig) -> Self {
        Self::new(
            ScoreWeights {
                relevance: config.relevance_weight,
                recency: config.recency_weight,
                reliability: config.reliability_weight,
            },
            ReliabilityTable::new(config.default_reliability, config.domain_reliability.clone()),
        )
    }

    /// Scores and sorts `records` against the current time.
    pub fn score(&self, records: Vec<ResultRecord>, keywords: &[String]) -> Vec<ResultRecord> {
        self.score_at(records, keywords, Utc::now())
    }

    /// Scores and sorts `records`, measuring ages from `now`.
    pub fn score_at(
        &self,
        mut records: Vec<ResultRecord>,
        keywords: &[String],
        now: DateTime<Utc>,
    ) -> Vec<ResultRecord> {
        for record in records.iter_mut() {
            let relevance = relevance(record, keywords);
            let recency = recency(record.published_at.as_deref(), now);
            let reliability = self.reliability(&record.domain);
            let combined = self.combine(relevance, recency, reliability);

            tracing::trace!(
                url = %record.url,
                relevance,
                recency,
                reliability,
                combined,
                "scored record"
            );
            record.score = Some(combined);
        }

        records.sort_by(compare_ranked);
        records
    }

    /// Weighted blend of the three components, rounded to 4 decimals.
    pub fn combine(&self, relevance: f64, recency: f64, reliability: f64) -> f64 {
        let combined = self.weights.relevance * relevance
            + self.weights.recency * recency
            + self.weights.reliability * reliability;
        round4(combined.clamp(0.0, 1.0))
    }

    pub fn reliability(&self, domain: &str) -> f64 {
        self.reliability.get(domain)
    }
}

/// Fraction of `keywords` found (case-insensitively) in the record's title
/// and snippet.
pub fn relevance(record: &ResultRecord, keywords: &[String]) -> f64 {
    let haystack = record.text().to_lowercase();
    let matched = keywords
        .iter()
        .filter(|k| haystack.contains(&k.to_lowercase()))
        .count();
    matched as f64 / keywords.len().max(1) as f64
}

/// Exponential recency decay with a one-year time constant.
///
/// Missing or unparsable timestamps score [`NEUTRAL_RECENCY`]. Future
/// timestamps produce a negative age and clamp to 1.
pub fn recency(published_at: Option<&str>, now: DateTime<Utc>) -> f64 {
    let Some(published) = published_at.and_then(parse_timestamp) else {
        return NEUTRAL_RECENCY;
    };
    let age_days = (now - published).num_seconds().div_euclid(SECONDS_PER_DAY);
    (-(age_days as f64) / RECENCY_DECAY_DAYS).exp().clamp(0.0, 1.0)
}

/// Parses the timestamp shapes providers commonly return.
///
/// Timestamps without an offset are taken as UTC.
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(value) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Score descending, then provider rank ascending (unranked last).
pub fn compare_ranked(a: &ResultRecord, b: &ResultRecord) -> Ordering {
    let score_a = a.score.unwrap_or(0.0);
    let score_b = b.score.unwrap_or(0.0);
    score_b
        .partial_cmp(&score_a)
        .unwrap_or(Ordering::Equal)
        .then_with(|| rank_of(a).cmp(&rank_of(b)))
}

fn rank_of(record: &ResultRecord) -> u32 {
    record.source_rank.unwrap_or(MISSING_SOURCE_RANK)
}

fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}
