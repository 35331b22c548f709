//! Family clustering and ranking over loaded graph data.
//!
//! Everything here is pure: the pipeline loads words and edges once, and
//! the functions below derive families from that snapshot. Nothing is
//! persisted. First-seen order breaks every tie, so identical input
//! always yields identical output.

pub mod export;
pub mod filter;

pub use filter::{FilterOutcome, FilterPolicy, RemovedWord};

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::config;
use crate::graph::models::{RhymeEdgeRecord, WordRecord};

/// Clustering knobs.
#[derive(Debug, Clone)]
pub struct AnalysisPolicy {
    /// Minimum member count for a family to surface at all.
    pub min_family_size: usize,
    /// Maximum slant words kept per family.
    pub slant_limit: usize,
    /// Trailing characters considered for the label suffix.
    pub suffix_len: usize,
}

impl Default for AnalysisPolicy {
    fn default() -> Self {
        Self {
            min_family_size: config::DEFAULT_MIN_FAMILY_SIZE,
            slant_limit: config::DEFAULT_SLANT_LIMIT,
            suffix_len: config::DEFAULT_SUFFIX_LEN,
        }
    }
}

/// The four syllable buckets families are reported under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyllableBucket {
    One,
    Two,
    Three,
    FourPlus,
}

impl SyllableBucket {
    pub const ALL: [SyllableBucket; 4] = [
        SyllableBucket::One,
        SyllableBucket::Two,
        SyllableBucket::Three,
        SyllableBucket::FourPlus,
    ];

    /// Export document key for this bucket.
    pub fn key(&self) -> &'static str {
        match self {
            SyllableBucket::One => "1",
            SyllableBucket::Two => "2",
            SyllableBucket::Three => "3",
            SyllableBucket::FourPlus => "4_plus",
        }
    }

    /// Lowest syllable count in the bucket.
    pub fn floor(&self) -> u32 {
        match self {
            SyllableBucket::One => 1,
            SyllableBucket::Two => 2,
            SyllableBucket::Three => 3,
            SyllableBucket::FourPlus => 4,
        }
    }

    pub fn contains(&self, syllables: i64) -> bool {
        match self {
            SyllableBucket::One => syllables == 1,
            SyllableBucket::Two => syllables == 2,
            SyllableBucket::Three => syllables == 3,
            SyllableBucket::FourPlus => syllables >= 4,
        }
    }
}

/// A ranked rhyme family within one syllable bucket.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RhymeFamily {
    /// The family key the members share.
    pub family_id: String,
    /// Human-readable label, e.g. `CAT Family (-cat)`.
    pub label: String,
    /// Member count.
    pub count: usize,
    /// Member words, in discovery order.
    pub words: Vec<String>,
    /// Near-rhyme neighbors, strongest consensus first.
    pub slant_words: Vec<String>,
}

/// Cluster the bucket's words into families and rank them by size.
///
/// Groups words sharing a family key, drops groups under the minimum
/// size, labels each group, and attaches its slant-rhyme neighbors.
pub fn build_families(
    words: &[WordRecord],
    edges: &[RhymeEdgeRecord],
    bucket: SyllableBucket,
    policy: &AnalysisPolicy,
) -> Vec<RhymeFamily> {
    // id (in `word:xxx` string form) -> text, over every word: slant
    // targets may live outside the bucket entirely.
    let id_to_text: HashMap<String, &str> = words
        .iter()
        .filter_map(|w| w.id.as_ref().map(|id| (id.to_string(), w.text.as_str())))
        .collect();

    let mut key_order: Vec<&str> = Vec::new();
    let mut groups: HashMap<&str, Vec<&WordRecord>> = HashMap::new();
    for word in words {
        let (Some(key), Some(syllables)) = (word.family_key.as_deref(), word.syllables) else {
            continue;
        };
        if !bucket.contains(syllables) {
            continue;
        }
        if !groups.contains_key(key) {
            key_order.push(key);
        }
        groups.entry(key).or_default().push(word);
    }

    let mut families: Vec<RhymeFamily> = Vec::new();
    for key in key_order {
        let members = &groups[key];
        if members.len() < policy.min_family_size {
            continue;
        }

        let member_ids: HashSet<String> = members
            .iter()
            .filter_map(|w| w.id.as_ref().map(|id| id.to_string()))
            .collect();
        let member_texts: Vec<String> = members.iter().map(|w| w.text.clone()).collect();

        families.push(RhymeFamily {
            family_id: key.to_string(),
            label: family_label(&member_texts, policy.suffix_len),
            count: members.len(),
            words: member_texts,
            slant_words: rank_slant_words(&member_ids, edges, &id_to_text, policy.slant_limit),
        });
    }

    // Stable: equal-sized families keep first-seen key order.
    families.sort_by(|a, b| b.count.cmp(&a.count));
    families
}

/// Label a family after its shortest member and the most common trailing
/// suffix among members. Members shorter than the suffix length sit out
/// the suffix tally. Ties keep the earliest member or suffix.
fn family_label(members: &[String], suffix_len: usize) -> String {
    let mut representative = "";
    for member in members {
        if representative.is_empty() || member.chars().count() < representative.chars().count() {
            representative = member;
        }
    }

    let mut suffix_order: Vec<String> = Vec::new();
    let mut suffix_counts: HashMap<String, usize> = HashMap::new();
    for member in members {
        let chars: Vec<char> = member.chars().collect();
        if chars.len() < suffix_len {
            continue;
        }
        let suffix: String = chars[chars.len() - suffix_len..].iter().collect();
        if !suffix_counts.contains_key(&suffix) {
            suffix_order.push(suffix.clone());
        }
        *suffix_counts.entry(suffix).or_insert(0) += 1;
    }

    let mut dominant = "";
    let mut best = 0usize;
    for suffix in &suffix_order {
        let count = suffix_counts[suffix];
        if count > best {
            best = count;
            dominant = suffix;
        }
    }

    if dominant.is_empty() {
        return format!("{} Family", representative.to_uppercase());
    }
    format!("{} Family (-{})", representative.to_uppercase(), dominant)
}

/// Rank words outside the family by how many members rhyme with them.
///
/// Edge dedup on (source, target) means each member contributes at most
/// one edge per target, so the edge count is the distinct-member count.
/// Consensus beats intensity: order is match count descending, then max
/// edge score descending, then first-seen.
fn rank_slant_words(
    member_ids: &HashSet<String>,
    edges: &[RhymeEdgeRecord],
    id_to_text: &HashMap<String, &str>,
    limit: usize,
) -> Vec<String> {
    let mut target_order: Vec<&str> = Vec::new();
    let mut tallies: HashMap<&str, (usize, i64)> = HashMap::new();

    for edge in edges {
        if !member_ids.contains(&edge.source) || member_ids.contains(&edge.target) {
            continue;
        }
        let tally = tallies.entry(edge.target.as_str()).or_insert_with(|| {
            target_order.push(edge.target.as_str());
            (0, i64::MIN)
        });
        tally.0 += 1;
        tally.1 = tally.1.max(edge.score);
    }

    target_order.sort_by(|a, b| {
        let (count_a, score_a) = tallies[a];
        let (count_b, score_b) = tallies[b];
        count_b.cmp(&count_a).then(score_b.cmp(&score_a))
    });

    target_order
        .into_iter()
        .filter_map(|id| id_to_text.get(id).map(|t| t.to_string()))
        .take(limit)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use surrealdb::sql::Thing;

    fn word(text: &str, syllables: i64, family_key: Option<&str>) -> WordRecord {
        let mut w = WordRecord::new(text);
        w.id = Some(Thing::from(("word", text)));
        w.syllables = Some(syllables);
        w.family_key = family_key.map(|k| k.to_string());
        w
    }

    fn edge(source: &str, target: &str, score: i64) -> RhymeEdgeRecord {
        RhymeEdgeRecord {
            id: None,
            source: Thing::from(("word", source)).to_string(),
            target: Thing::from(("word", target)).to_string(),
            score,
            is_perfect: false,
        }
    }

    #[test]
    fn test_min_family_size_boundary() {
        let words = vec![
            word("cat", 1, Some("AE1 T")),
            word("bat", 1, Some("AE1 T")),
            word("glow", 1, Some("OW1")),
        ];
        let families = build_families(
            &words,
            &[],
            SyllableBucket::One,
            &AnalysisPolicy::default(),
        );

        // Two members meet the threshold, one does not.
        assert_eq!(families.len(), 1);
        assert_eq!(families[0].family_id, "AE1 T");
        assert_eq!(families[0].count, 2);
    }

    #[test]
    fn test_slant_consensus_beats_score() {
        let words = vec![
            word("cat", 1, Some("AE1 T")),
            word("bat", 1, Some("AE1 T")),
            word("cot", 1, Some("AA1 T")),
            word("kite", 1, Some("AY1 T")),
        ];
        // Two members agree on cot weakly; one member loves kite.
        let edges = vec![
            edge("cat", "cot", 5),
            edge("bat", "cot", 3),
            edge("cat", "kite", 9),
        ];
        let families = build_families(
            &words,
            &edges,
            SyllableBucket::One,
            &AnalysisPolicy::default(),
        );

        assert_eq!(families[0].family_id, "AE1 T");
        assert_eq!(families[0].slant_words, vec!["cot", "kite"]);
    }

    #[test]
    fn test_slant_excludes_members_and_honors_limit() {
        let words = vec![
            word("cat", 1, Some("AE1 T")),
            word("bat", 1, Some("AE1 T")),
            word("cot", 1, Some("AA1 T")),
            word("kite", 1, Some("AY1 T")),
        ];
        let edges = vec![
            edge("cat", "bat", 99), // inside the family, never slant
            edge("cat", "cot", 5),
            edge("cat", "kite", 9),
        ];
        let policy = AnalysisPolicy {
            slant_limit: 1,
            ..AnalysisPolicy::default()
        };
        let families = build_families(&words, &edges, SyllableBucket::One, &policy);

        // Equal counts: higher max score wins, then the limit truncates.
        assert_eq!(families[0].slant_words, vec!["kite"]);
    }

    #[test]
    fn test_family_label_and_ordering() {
        let words = vec![
            word("cat", 1, Some("AE1 T")),
            word("bat", 1, Some("AE1 T")),
            word("hat", 1, Some("AE1 T")),
            word("scat", 1, Some("AE1 T")),
            word("glow", 1, Some("OW1")),
            word("flow", 1, Some("OW1")),
        ];
        let families = build_families(
            &words,
            &[],
            SyllableBucket::One,
            &AnalysisPolicy::default(),
        );

        assert_eq!(families.len(), 2);
        // Largest family first.
        assert_eq!(families[0].label, "CAT Family (-cat)");
        assert_eq!(families[0].count, 4);
        assert_eq!(families[0].words, vec!["cat", "bat", "hat", "scat"]);
        assert_eq!(families[1].label, "GLOW Family (-low)");
    }

    #[test]
    fn test_short_members_sit_out_the_suffix_tally() {
        // "an" is both shortest member and, as a whole word, would win a
        // naive suffix count; only the 3-letter-or-longer members vote.
        let members: Vec<String> = ["an", "ban", "man", "plan"]
            .iter()
            .map(|m| m.to_string())
            .collect();
        assert_eq!(family_label(&members, 3), "AN Family (-ban)");

        // Every member too short for a suffix: label carries none.
        let tiny: Vec<String> = ["a", "uh"].iter().map(|m| m.to_string()).collect();
        assert_eq!(family_label(&tiny, 3), "A Family");
    }

    #[test]
    fn test_buckets_partition_by_syllables() {
        let words = vec![
            word("cat", 1, Some("AE1 T")),
            word("combat", 2, Some("AE1 T")),
            word("acrobat", 3, Some("AE1 T")),
            word("aristocrat", 4, Some("AE1 T")),
            word("uncopyrightable", 7, Some("AE1 T")),
        ];
        assert!(SyllableBucket::One.contains(1));
        assert!(!SyllableBucket::One.contains(2));
        assert!(SyllableBucket::FourPlus.contains(7));

        let policy = AnalysisPolicy {
            min_family_size: 1,
            ..AnalysisPolicy::default()
        };
        for (bucket, expected) in [
            (SyllableBucket::One, vec!["cat"]),
            (SyllableBucket::Two, vec!["combat"]),
            (SyllableBucket::Three, vec!["acrobat"]),
            (SyllableBucket::FourPlus, vec!["aristocrat", "uncopyrightable"]),
        ] {
            let families = build_families(&words, &[], bucket, &policy);
            assert_eq!(families[0].words, expected, "bucket {:?}", bucket);
        }
    }
}
