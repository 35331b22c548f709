//! Frequency filtering of family members.
//!
//! Obscure dictionary entries drown out usable rhymes in the biggest
//! families. This pass drops members below a zipf-frequency floor and
//! drops families left too small afterwards, keeping a record of every
//! removal for the audit log.

use crate::config;
use crate::oracle::FrequencyOracle;

use super::RhymeFamily;

/// Frequency-filter knobs.
#[derive(Debug, Clone)]
pub struct FilterPolicy {
    /// Zipf frequency below which a member is dropped.
    pub min_zipf: f64,
    /// Minimum surviving member count for the family to survive.
    pub min_filtered_size: usize,
}

impl Default for FilterPolicy {
    fn default() -> Self {
        Self {
            min_zipf: config::DEFAULT_MIN_ZIPF,
            min_filtered_size: config::DEFAULT_MIN_FILTERED_SIZE,
        }
    }
}

/// A member dropped by the filter, with the frequency that condemned it.
#[derive(Debug, Clone, PartialEq)]
pub struct RemovedWord {
    pub word: String,
    pub zipf: f64,
}

/// Result of filtering one family.
#[derive(Debug, Clone)]
pub struct FilterOutcome {
    /// The surviving family, or `None` when too few members remain.
    pub kept: Option<RhymeFamily>,
    /// Members dropped for obscurity, in original member order.
    pub removed: Vec<RemovedWord>,
}

/// Drop obscure members, then the family itself if it shrank below the
/// survival threshold. Slant words are left untouched.
pub fn filter_family(
    family: RhymeFamily,
    frequency: &dyn FrequencyOracle,
    policy: &FilterPolicy,
) -> FilterOutcome {
    let mut surviving = Vec::with_capacity(family.words.len());
    let mut removed = Vec::new();

    for word in family.words {
        let zipf = frequency.frequency(&word);
        if zipf >= policy.min_zipf {
            surviving.push(word);
        } else {
            removed.push(RemovedWord { word, zipf });
        }
    }

    let kept = if surviving.len() >= policy.min_filtered_size {
        Some(RhymeFamily {
            count: surviving.len(),
            words: surviving,
            ..family
        })
    } else {
        None
    };

    FilterOutcome { kept, removed }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::RhymeFamily;
    use crate::oracle::ZipfTable;

    fn family(words: &[&str]) -> RhymeFamily {
        RhymeFamily {
            family_id: "AE1 T".to_string(),
            label: "CAT Family (-cat)".to_string(),
            count: words.len(),
            words: words.iter().map(|w| w.to_string()).collect(),
            slant_words: vec!["cot".to_string()],
        }
    }

    #[test]
    fn test_common_words_survive_obscure_words_logged() {
        let table = ZipfTable::from_pairs([("cat", 5.2), ("bat", 4.1), ("lat", 1.9)], 1.0);
        let outcome = filter_family(family(&["cat", "bat", "lat", "zat"]), &table, &FilterPolicy::default());

        let kept = outcome.kept.unwrap();
        assert_eq!(kept.words, vec!["cat", "bat"]);
        assert_eq!(kept.count, 2);
        // Slant words pass through unfiltered.
        assert_eq!(kept.slant_words, vec!["cot"]);

        // "zat" is unknown and gets the low default.
        assert_eq!(
            outcome.removed,
            vec![
                RemovedWord { word: "lat".to_string(), zipf: 1.9 },
                RemovedWord { word: "zat".to_string(), zipf: 1.0 },
            ]
        );
    }

    #[test]
    fn test_family_dropped_when_too_few_survive() {
        let table = ZipfTable::from_pairs([("cat", 5.2)], 1.0);
        let outcome = filter_family(family(&["cat", "zat"]), &table, &FilterPolicy::default());

        assert!(outcome.kept.is_none());
        assert_eq!(outcome.removed.len(), 1);
        assert_eq!(outcome.removed[0].word, "zat");
    }

    #[test]
    fn test_boundary_zipf_is_kept() {
        let table = ZipfTable::from_pairs([("cat", 3.0), ("bat", 2.999)], 1.0);
        let policy = FilterPolicy {
            min_filtered_size: 1,
            ..FilterPolicy::default()
        };
        let outcome = filter_family(family(&["cat", "bat"]), &table, &policy);

        let kept = outcome.kept.unwrap();
        assert_eq!(kept.words, vec!["cat"]);
        assert_eq!(outcome.removed[0].word, "bat");
    }
}
