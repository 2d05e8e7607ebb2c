//! Aggregation helpers for the note builder's `frequency-harmonic-rank`,
//! `frequency-harmonic-occurrence`, `frequency-average-rank` and
//! `frequency-average-occurrence` markers (§4.8/§4.9 of the spec).
//!
//! The underlying numbers come from [`crate::dictionary::TermFrequency`],
//! which already coerces a dictionary's raw frequency value (an integer, a
//! star rating, or an opaque string) down to `frequency: i128`. These
//! functions only do the cross-dictionary arithmetic; they take one number
//! per dictionary, picking the first non-null frequency for each.

use crate::dictionary::TermFrequency;

/// Default rank used when a term has no frequency data in any dictionary.
/// Mirrors Yomitan's convention of treating "no data" as "very rare".
pub const DEFAULT_RANK: f64 = 9_999_999.0;
/// Default occurrence count used when a term has no frequency data.
pub const DEFAULT_OCCURRENCE: f64 = 0.0;

/// Star-rating strings occasionally used in place of a numeric frequency,
/// mapped onto the `20..100` scale the note builder's `frequencies` marker
/// uses for `★`..`★★★★★`.
pub fn star_rating_value(display: &str) -> Option<f64> {
    let trimmed = display.trim();
    if trimmed.is_empty() || !trimmed.chars().all(|c| c == '★') {
        return None;
    }
    let stars = trimmed.chars().count();
    if stars == 0 || stars > 5 {
        return None;
    }
    Some((stars * 20) as f64)
}

/// Picks one number per dictionary: the first frequency recorded for that
/// dictionary (by `dictionary_index`), in the order dictionaries were
/// searched. Dictionaries with zero frequencies contribute nothing.
fn one_number_per_dictionary(frequencies: &[TermFrequency]) -> Vec<f64> {
    let mut seen = std::collections::HashSet::new();
    let mut out = Vec::new();
    for f in frequencies {
        if !seen.insert(f.dictionary_index) {
            continue;
        }
        if let Some(display) = &f.display_value {
            if let Some(star) = star_rating_value(display) {
                out.push(star);
                continue;
            }
        }
        out.push(f.frequency as f64);
    }
    out
}

/// Arithmetic mean of a set of values. `None` on an empty input.
pub fn arithmetic_mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Harmonic mean of a set of values. `None` on an empty input or if any
/// value is zero (harmonic mean is undefined there).
///
/// Testable property (§8 P5): for any non-empty input the harmonic mean is
/// never greater than the arithmetic mean, and both collapse to `x` when the
/// input is the singleton `[x]`.
pub fn harmonic_mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() || values.iter().any(|v| *v == 0.0) {
        return None;
    }
    let n = values.len() as f64;
    let recip_sum: f64 = values.iter().map(|v| 1.0 / v).sum();
    Some(n / recip_sum)
}

/// `frequency-harmonic-rank`: harmonic mean over one rank per dictionary,
/// defaulting to [`DEFAULT_RANK`] when there's no data at all.
pub fn harmonic_rank(frequencies: &[TermFrequency]) -> f64 {
    let values = one_number_per_dictionary(frequencies);
    harmonic_mean(&values).unwrap_or(DEFAULT_RANK)
}

/// `frequency-harmonic-occurrence`: harmonic mean over one occurrence count
/// per dictionary, defaulting to [`DEFAULT_OCCURRENCE`].
pub fn harmonic_occurrence(frequencies: &[TermFrequency]) -> f64 {
    let values = one_number_per_dictionary(frequencies);
    harmonic_mean(&values).unwrap_or(DEFAULT_OCCURRENCE)
}

/// `frequency-average-rank`: arithmetic mean over one rank per dictionary.
pub fn average_rank(frequencies: &[TermFrequency]) -> f64 {
    let values = one_number_per_dictionary(frequencies);
    arithmetic_mean(&values).unwrap_or(DEFAULT_RANK)
}

/// `frequency-average-occurrence`: arithmetic mean over one occurrence count
/// per dictionary.
pub fn average_occurrence(frequencies: &[TermFrequency]) -> f64 {
    let values = one_number_per_dictionary(frequencies);
    arithmetic_mean(&values).unwrap_or(DEFAULT_OCCURRENCE)
}

/// The single lowest numeric frequency value across dictionaries, used by
/// the `frequencies:min-value=true` marker argument.
pub fn min_value(frequencies: &[TermFrequency]) -> Option<f64> {
    one_number_per_dictionary(frequencies)
        .into_iter()
        .fold(None, |acc, v| match acc {
            None => Some(v),
            Some(m) if v < m => Some(v),
            Some(m) => Some(m),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn freq(dict_index: usize, value: i128) -> TermFrequency {
        TermFrequency {
            index: 0,
            headword_index: 0,
            dictionary: format!("dict{dict_index}"),
            dictionary_index: dict_index,
            dictionary_alias: String::new(),
            has_reading: false,
            frequency: value,
            display_value: None,
            display_value_parsed: false,
        }
    }

    #[test]
    fn harmonic_mean_le_arithmetic_mean() {
        let values = [1.0, 10.0, 100.0];
        let h = harmonic_mean(&values).unwrap();
        let a = arithmetic_mean(&values).unwrap();
        assert!(h <= a);
    }

    #[test]
    fn singleton_means_equal_input() {
        let values = [42.0];
        assert_eq!(harmonic_mean(&values), Some(42.0));
        assert_eq!(arithmetic_mean(&values), Some(42.0));
    }

    #[test]
    fn no_data_defaults() {
        assert_eq!(harmonic_rank(&[]), DEFAULT_RANK);
        assert_eq!(average_occurrence(&[]), DEFAULT_OCCURRENCE);
    }

    #[test]
    fn one_per_dictionary_dedups() {
        let freqs = vec![freq(1, 100), freq(1, 200), freq(2, 50)];
        let values = one_number_per_dictionary(&freqs);
        assert_eq!(values, vec![100.0, 50.0]);
    }

    #[test]
    fn star_rating_maps_to_20_step_scale() {
        assert_eq!(star_rating_value("★"), Some(20.0));
        assert_eq!(star_rating_value("★★★★★"), Some(100.0));
        assert_eq!(star_rating_value("not a rating"), None);
    }
}
