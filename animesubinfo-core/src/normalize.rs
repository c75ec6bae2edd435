//! Title normalization used by catalog lookup and fitness scoring.
//!
//! Titles on the site and in release names disagree on punctuation, case,
//! Roman numerals and zero padding. Normalizing both sides first reduces
//! comparisons to plain string equality, containment or subsequence overlap.

/// Normalizes a title for comparison.
///
/// Steps per whitespace-separated token:
/// 1. An upper-case Roman numeral (`I`..`XXXIX`) becomes its decimal value
/// 2. Everything that is not ASCII alphanumeric is dropped
/// 3. Lower-case
/// 4. Leading zeros are stripped from tokens that start with a digit
///
/// Tokens are then concatenated without separators.
#[must_use]
pub fn normalize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for token in text.split_whitespace() {
        let token = roman_to_decimal(token).map_or_else(|| token.to_string(), |n| n.to_string());
        let cleaned: String = token
            .chars()
            .filter(char::is_ascii_alphanumeric)
            .map(|c| c.to_ascii_lowercase())
            .collect();
        out.push_str(strip_leading_zeros(&cleaned));
    }
    out
}

/// Indel similarity of two titles after [`normalize`].
///
/// `2 * lcs / (len_a + len_b)`, where `lcs` is the length of the longest
/// common subsequence. Returns a value in `[0, 1]`; two titles that
/// normalize to nothing compare as `0`.
///
/// ```
/// use animesubinfo::similarity;
///
/// let score = similarity("Higurashi", "Higurashi no Naku Koro ni");
/// assert!((score - 0.6).abs() < 1e-9);
/// ```
#[must_use]
pub fn similarity(a: &str, b: &str) -> f64 {
    let a = normalize(a);
    let b = normalize(b);
    let total = a.len() + b.len();
    if total == 0 {
        return 0.0;
    }
    #[allow(clippy::cast_precision_loss)]
    let ratio = (2 * lcs_len(a.as_bytes(), b.as_bytes())) as f64 / total as f64;
    ratio
}

/// Longest common subsequence length, one DP row at a time.
fn lcs_len(a: &[u8], b: &[u8]) -> usize {
    let mut prev = vec![0usize; b.len() + 1];
    let mut row = vec![0usize; b.len() + 1];
    for &x in a {
        for (j, &y) in b.iter().enumerate() {
            row[j + 1] = if x == y {
                prev[j] + 1
            } else {
                prev[j + 1].max(row[j])
            };
        }
        std::mem::swap(&mut prev, &mut row);
    }
    prev[b.len()]
}

fn strip_leading_zeros(token: &str) -> &str {
    if !token.starts_with(|c: char| c.is_ascii_digit()) {
        return token;
    }
    let trimmed = token.trim_start_matches('0');
    if trimmed.is_empty() || !trimmed.starts_with(|c: char| c.is_ascii_digit()) {
        // "000" keeps one zero; "0abc" keeps the zero before the letters.
        &token[token.len() - trimmed.len() - 1..]
    } else {
        trimmed
    }
}

/// Parses an upper-case Roman numeral in the range commonly used for season
/// and sequel numbers.
fn roman_to_decimal(token: &str) -> Option<u32> {
    if token.is_empty() || token.len() > 8 {
        return None;
    }
    let mut total = 0u32;
    let mut prev = 0u32;
    for ch in token.chars().rev() {
        let value = match ch {
            'I' => 1,
            'V' => 5,
            'X' => 10,
            _ => return None,
        };
        if value < prev {
            total = total.checked_sub(value)?;
        } else {
            total += value;
            prev = value;
        }
    }
    // Reject non-canonical spellings like "IIII" or "VX".
    (to_roman(total) == token).then_some(total)
}

fn to_roman(mut n: u32) -> String {
    const TABLE: [(u32, &str); 5] = [(10, "X"), (9, "IX"), (5, "V"), (4, "IV"), (1, "I")];
    let mut out = String::new();
    for (value, symbol) in TABLE {
        while n >= value {
            out.push_str(symbol);
            n -= value;
        }
    }
    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_removes_whitespace() {
        assert_eq!(normalize("f o  o 2"), "foo2");
    }

    #[test]
    fn test_normalize_lowercases() {
        assert_eq!(normalize("FOO"), "foo");
    }

    #[test]
    fn test_normalize_drops_punctuation_and_non_ascii() {
        assert_eq!(normalize("f-o!o&b'a_r.b\u{c2}\u{a3}a)z"), "foobarbaz");
    }

    #[test]
    fn test_normalize_strips_leading_zeros() {
        assert_eq!(normalize("02 03foo 01 bar01 11"), "23foo1bar0111");
        assert_eq!(normalize("0"), "0");
        assert_eq!(normalize("00"), "0");
    }

    #[test]
    fn test_normalize_converts_roman_numerals() {
        assert_eq!(normalize("Season IV Episode II"), "season4episode2");
        assert_eq!(normalize("Bakuman II"), "bakuman2");
        assert_eq!(normalize("XII Kingdoms"), "12kingdoms");
    }

    #[test]
    fn test_normalize_ignores_lowercase_and_mixed_roman_lookalikes() {
        assert_eq!(normalize("ix"), "ix");
        assert_eq!(normalize("Xi"), "xi");
        assert_eq!(normalize("IIII"), "iiii");
        assert_eq!(normalize("MIX"), "mix");
    }

    #[test]
    fn test_similarity_bounds() {
        assert!((similarity("Yuru Camp", "yuru-camp") - 1.0).abs() < f64::EPSILON);
        assert!(similarity("Yuru Camp", "Bakuman") < 0.6);
        assert!(similarity("", "").abs() < f64::EPSILON);
        assert!(similarity("Yuru Camp", "").abs() < f64::EPSILON);
    }

    #[test]
    fn test_similarity_is_lcs_ratio() {
        // "yurucampmovie" (13) inside "yurucampthemovie" (16): 26/29
        let movie = similarity("Yuru Camp Movie", "Yuru Camp The Movie");
        assert!((movie - 26.0 / 29.0).abs() < 1e-9, "movie {movie}");
        assert!((movie - 0.897).abs() < 1e-3);

        // "ren" and "rane" share two letters in order: 26/29
        let elf = similarity("Elf Princess Ren", "Elf Princess Rane");
        assert!((elf - 26.0 / 29.0).abs() < 1e-9, "elf {elf}");
    }

    #[test]
    fn test_similarity_bare_title_against_longer_catalog_title() {
        let score = similarity("Higurashi", "Higurashi no Naku Koro ni");
        assert!((score - 0.6).abs() < 1e-9, "score {score}");
        assert!(similarity("Elf", "Elfen Lied") < 0.6);
    }

    #[test]
    fn test_similarity_is_symmetric() {
        let a = similarity("Kimetsu no Yaiba", "Kimetsu no Yaiba Season 2");
        let b = similarity("Kimetsu no Yaiba Season 2", "Kimetsu no Yaiba");
        assert!((a - b).abs() < f64::EPSILON);
        assert!((a - 0.8).abs() < 1e-9);
    }

    #[test]
    fn test_lcs_len() {
        assert_eq!(lcs_len(b"ren", b"rane"), 2);
        assert_eq!(lcs_len(b"", b"abc"), 0);
        assert_eq!(lcs_len(b"abc", b"abc"), 3);
    }
}
