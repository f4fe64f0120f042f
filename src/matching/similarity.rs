// src/matching/similarity.rs - Edit-distance and prefix-weighted similarity over normalized names
//
// Everything except `similarity` expects inputs already passed through `normalize`.
// Lengths are counted in chars, not bytes.
use strsim::levenshtein;

use crate::matching::normalize::normalize;

/// Common-prefix characters considered by the Winkler adjustment.
const MAX_PREFIX: usize = 4;
const PREFIX_SCALE: f64 = 0.1;

/// Containment scores start at this floor and rise with the length ratio.
const CONTAINMENT_FLOOR: f64 = 0.7;
const CONTAINMENT_SPAN: f64 = 0.3;

/// `1 - distance / max_len`, floored at 0. Empty on either side scores 0.
pub fn levenshtein_similarity(a: &str, b: &str) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    if a == b {
        return 1.0;
    }
    let max_len = a.chars().count().max(b.chars().count());
    let distance = levenshtein(a, b);
    (1.0 - distance as f64 / max_len as f64).max(0.0)
}

/// Edit-distance similarity with the substring-containment rule: when one name fully
/// contains the other the score is `0.7 + 0.3 * shorter / longer`, regardless of distance.
pub fn containment_similarity(a: &str, b: &str) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    if a == b {
        return 1.0;
    }
    if a.contains(b) || b.contains(a) {
        let (len_a, len_b) = (a.chars().count(), b.chars().count());
        let shorter = len_a.min(len_b) as f64;
        let longer = len_a.max(len_b) as f64;
        return CONTAINMENT_FLOOR + CONTAINMENT_SPAN * (shorter / longer);
    }
    levenshtein_similarity(a, b)
}

/// Jaro-Winkler similarity with the prefix boost capped at four characters.
///
/// Matches are searched within `max(len_a, len_b) / 2 - 1` positions; transpositions are
/// counted over matched characters in original order and halved as a real number.
pub fn jaro_winkler(a: &str, b: &str) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    if a == b {
        return 1.0;
    }

    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();
    let (len_a, len_b) = (a_chars.len(), b_chars.len());
    let window = (len_a.max(len_b) / 2).saturating_sub(1);

    let mut a_matched = vec![false; len_a];
    let mut b_matched = vec![false; len_b];
    let mut matches = 0usize;

    for (i, ca) in a_chars.iter().enumerate() {
        let start = i.saturating_sub(window);
        let end = (i + window + 1).min(len_b);
        for j in start..end {
            if b_matched[j] || *ca != b_chars[j] {
                continue;
            }
            a_matched[i] = true;
            b_matched[j] = true;
            matches += 1;
            break;
        }
    }

    if matches == 0 {
        return 0.0;
    }

    let mut transpositions = 0usize;
    let mut k = 0usize;
    for (i, ca) in a_chars.iter().enumerate() {
        if !a_matched[i] {
            continue;
        }
        while !b_matched[k] {
            k += 1;
        }
        if *ca != b_chars[k] {
            transpositions += 1;
        }
        k += 1;
    }

    let m = matches as f64;
    let jaro = (m / len_a as f64 + m / len_b as f64 + (m - transpositions as f64 / 2.0) / m) / 3.0;

    let prefix = a_chars
        .iter()
        .zip(b_chars.iter())
        .take(MAX_PREFIX)
        .take_while(|(x, y)| x == y)
        .count();

    jaro + prefix as f64 * PREFIX_SCALE * (1.0 - jaro)
}

/// Mean of pure edit-distance similarity and Jaro-Winkler, without the containment rule.
pub fn blended_similarity(a: &str, b: &str) -> f64 {
    (levenshtein_similarity(a, b) + jaro_winkler(a, b)) / 2.0
}

/// Per-field score used for ranking: containment-aware edit similarity averaged with Jaro-Winkler.
pub fn field_similarity(query: &str, field: &str) -> f64 {
    (containment_similarity(query, field) + jaro_winkler(query, field)) / 2.0
}

/// Field score plus the exact-match boost when both normalized names are equal, capped at 1.0.
pub fn boosted_field_similarity(query: &str, field: &str, exact_match_boost: f64) -> f64 {
    let score = field_similarity(query, field);
    if !query.is_empty() && query == field {
        (score + exact_match_boost).min(1.0)
    } else {
        score
    }
}

/// Similarity of two raw names in [0, 1]. Both sides are normalized first.
pub fn similarity(a: &str, b: &str) -> f64 {
    field_similarity(&normalize(a), &normalize(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_identical_names_score_one() {
        assert_eq!(similarity("テスト", "テスト"), 1.0);
        assert_eq!(similarity("Acme Ltd.", "ACME"), 1.0);
        assert_eq!(jaro_winkler("martha", "martha"), 1.0);
    }

    #[test]
    fn test_empty_scores_zero() {
        assert_eq!(similarity("", "テスト"), 0.0);
        assert_eq!(similarity("テスト", ""), 0.0);
        assert_eq!(levenshtein_similarity("", "abc"), 0.0);
        assert_eq!(jaro_winkler("", "abc"), 0.0);
        assert_eq!(similarity("株式会社", "Acme"), 0.0);
    }

    #[test]
    fn test_jaro_winkler_reference_values() {
        // MARTHA/MARHTA: 6 matches, 1 transposition, prefix 3.
        assert!((jaro_winkler("martha", "marhta") - 0.961_111_111).abs() < 1e-6);
        // DIXON/DICKSONX: 4 matches, no transpositions, prefix 2.
        assert!((jaro_winkler("dixon", "dicksonx") - 0.813_333_333).abs() < 1e-6);
        assert_eq!(jaro_winkler("abc", "xyz"), 0.0);
    }

    #[test]
    fn test_jaro_winkler_prefix_capped_at_four() {
        let base_jaro = (6.0 / 6.0 + 6.0 / 8.0 + 1.0) / 3.0;
        let expected = base_jaro + 4.0 * 0.1 * (1.0 - base_jaro);
        assert!((jaro_winkler("abcdef", "abcdefgh") - expected).abs() < EPS);
    }

    #[test]
    fn test_levenshtein_similarity() {
        assert!((levenshtein_similarity("kitten", "sitting") - (1.0 - 3.0 / 7.0)).abs() < EPS);
        assert!(levenshtein_similarity("あいうえお", "かきくけこ") < 0.5);
    }

    #[test]
    fn test_containment_rule() {
        let score = containment_similarity("セブンイレブン", "セブンイレブン代々木");
        assert!((score - (0.7 + 0.3 * 7.0 / 10.0)).abs() < EPS);
        // Containment supersedes the lower pure edit-distance score.
        assert!(score > levenshtein_similarity("セブンイレブン", "セブンイレブン代々木"));
    }

    #[test]
    fn test_scores_bounded() {
        let pairs = [
            ("seveneleven", "sevenelevenshibuya"),
            ("ab", "ba"),
            ("a", "b"),
            ("ファミマ", "ファミリーマート"),
        ];
        for (a, b) in pairs {
            for score in [field_similarity(a, b), blended_similarity(a, b), jaro_winkler(a, b)] {
                assert!((0.0..=1.0).contains(&score), "{} vs {} -> {}", a, b, score);
            }
        }
    }

    #[test]
    fn test_exact_boost_capped() {
        assert_eq!(boosted_field_similarity("acme", "acme", 0.3), 1.0);
        let plain = field_similarity("acme", "acmes");
        assert_eq!(boosted_field_similarity("acme", "acmes", 0.3), plain);
    }
}
