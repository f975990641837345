//! Validation of source documents and compiled tables.
//!
//! Validation happens in stages: structural checks of the source document against its JSON
//! schema ([`schema`]), checks that references between entities resolve ([`cross_reference`]),
//! then checks of the compiled tables against their structural schema and the per-tag table shapes
//! ([`table_shape`]). The [`canonical`] checks are an additional pass run before handing tables to
//! the downstream checker.
use strsim::normalized_levenshtein;

pub mod canonical;
pub mod cross_reference;
pub mod schema;
pub mod table_shape;

/// Minimum similarity for a name to be suggested as a correction
const SUGGESTION_CUTOFF: f64 = 0.6;

/// Similarity of two names between 0 and 1.
///
/// This is the normalised Levenshtein similarity, raised for names where one contains the other
/// (e.g. `NGAS` and `NG`) to the share of characters they have in common.
fn similarity(a: &str, b: &str) -> f64 {
    let score = normalized_levenshtein(a, b);
    let (shorter, longer) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    if shorter.is_empty() || !longer.contains(shorter) {
        return score;
    }

    let shared = 2 * shorter.chars().count();
    let total = shorter.chars().count() + longer.chars().count();
    score.max(shared as f64 / total as f64)
}

/// Find the candidate most similar to `name`, if any is similar enough to be a likely typo.
///
/// Where several candidates are equally similar, the first is returned.
pub fn closest_match<'a, I>(name: &str, candidates: I) -> Option<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut best: Option<(&str, f64)> = None;
    for candidate in candidates {
        let score = similarity(name, candidate);
        if score >= SUGGESTION_CUTOFF && best.is_none_or(|(_, best_score)| score > best_score) {
            best = Some((candidate, score));
        }
    }

    best.map(|(candidate, _)| candidate)
}

/// A `" Did you mean 'X'?"` suffix for an error message, or an empty string
pub fn suggestion<'a, I>(name: &str, candidates: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    closest_match(name, candidates)
        .map(|candidate| format!(" Did you mean '{candidate}'?"))
        .unwrap_or_default()
}
