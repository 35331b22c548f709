//! Pure phonetic derivations: syllable counts and rhyme-family keys.
//!
//! Works over CMU-style ARPAbet phoneme sequences, where vowel phones carry
//! a trailing stress digit (`AE1`, `ER0`). Nothing here performs I/O; the
//! pronunciations themselves come from a [`crate::oracle::Pronouncer`].

/// Resolved phonetic metadata for one word.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    /// Syllable count, exact when a pronunciation exists, estimated otherwise.
    pub syllables: u32,
    /// Space-joined first pronunciation, when one is known.
    pub phonemes: Option<String>,
    /// Rhyming part of the first pronunciation. `None` means the word
    /// participates in no family.
    pub family_key: Option<String>,
}

/// Derive syllable count and family key from the preferred pronunciation,
/// falling back to a spelling estimate when none is known.
pub fn resolve(pronunciations: &[Vec<String>], spelled: &str) -> Resolved {
    match pronunciations.first() {
        Some(phones) => Resolved {
            syllables: syllable_count(phones).max(1),
            phonemes: Some(phones.join(" ")),
            family_key: Some(rhyming_part(phones)),
        },
        None => Resolved {
            syllables: estimate_syllables(spelled),
            phonemes: None,
            family_key: None,
        },
    }
}

/// Number of vowel phones, i.e. phones carrying a stress digit.
pub fn syllable_count(phones: &[String]) -> u32 {
    phones.iter().filter(|p| has_stress_digit(p)).count() as u32
}

/// The phoneme subsequence from the last stressed vowel (primary or
/// secondary stress) to the end of the word. Pronunciations without a
/// stressed vowel keep the whole sequence as their key.
pub fn rhyming_part(phones: &[String]) -> String {
    for (i, phone) in phones.iter().enumerate().rev() {
        if phone.ends_with('1') || phone.ends_with('2') {
            return phones[i..].join(" ");
        }
    }
    phones.join(" ")
}

/// Approximate syllables from spelling alone: each run of vowels counts
/// once, a trailing silent `e` is discounted, and every word gets at
/// least one syllable.
pub fn estimate_syllables(word: &str) -> u32 {
    let lower = word.to_lowercase();
    let mut count = 0u32;
    let mut prev_vowel = false;
    for c in lower.chars() {
        let vowel = matches!(c, 'a' | 'e' | 'i' | 'o' | 'u' | 'y');
        if vowel && !prev_vowel {
            count += 1;
        }
        prev_vowel = vowel;
    }
    if count > 1 && lower.ends_with('e') && !lower.ends_with("le") {
        count -= 1;
    }
    count.max(1)
}

fn has_stress_digit(phone: &str) -> bool {
    phone.chars().last().map(|c| c.is_ascii_digit()).unwrap_or(false)
}
