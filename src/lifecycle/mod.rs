//! Round result lifecycle.
//!
//! A round moves from `Paired` to `Resulted` when its result is recorded,
//! and stays `Resulted` through any number of re-saves; there is no closed
//! state. Because [`crate::models::PlayerPoints`] is a running total shared
//! across rounds, a re-save must not simply add the new points again: the
//! previously recorded contribution of the round is subtracted before the
//! new one is applied, so resubmitting an identical result is a no-op and a
//! corrected result replaces exactly its own earlier contribution.

use std::collections::HashMap;

use crate::error::EngineError;
use crate::models::{Pair, PairResult, PlayerId, Round, RoundResult};

/// One row of a result entry form: a pairing plus the raw point strings as
/// entered.
#[derive(Debug, Clone)]
pub struct ResultEntry {
    pub white: PlayerId,
    pub black: Option<PlayerId>,
    pub white_points: String,
    pub black_points: String,
}

/// Parse raw result entries into a [`RoundResult`].
///
/// Any non-numeric point value fails the whole parse with
/// [`EngineError::InvalidPointValue`]; no partial result is produced, which
/// keeps the save all-or-nothing.
pub fn parse_result_entries(entries: &[ResultEntry]) -> Result<RoundResult, EngineError> {
    let mut pairs = Vec::with_capacity(entries.len());

    for entry in entries {
        let white_points = parse_points(&entry.white_points)?;
        let black_points = parse_points(&entry.black_points)?;
        pairs.push(PairResult {
            white: entry.white.clone(),
            black: entry.black.clone(),
            white_points,
            black_points,
        });
    }

    Ok(RoundResult { pairs })
}

fn parse_points(raw: &str) -> Result<f64, EngineError> {
    raw.trim()
        .parse::<f64>()
        .map_err(|_| EngineError::InvalidPointValue {
            value: raw.to_string(),
        })
}

/// Check that a result covers exactly the round's pairings.
///
/// Every (white, black) key in the result must match a pairing of the round
/// and vice versa; order does not matter (the pairing list may have been
/// reordered since generation).
pub fn validate_result_membership(
    round: &Round,
    result: &RoundResult,
) -> Result<(), EngineError> {
    if round.pairings.len() != result.pairs.len() {
        return Err(EngineError::PairingMismatch);
    }

    for pair in &round.pairings {
        if result.entry_for(pair).is_none() {
            return Err(EngineError::PairingMismatch);
        }
    }

    // Equal lengths plus full coverage of distinct pairings implies the
    // result has no extra entries, unless it duplicated one; check that too.
    let mut seen: Vec<Pair> = Vec::with_capacity(result.pairs.len());
    for entry in &result.pairs {
        let pair = entry.pair();
        if seen.contains(&pair) {
            return Err(EngineError::PairingMismatch);
        }
        seen.push(pair);
    }

    Ok(())
}

/// Per-player point deltas to reconcile a round's stored total contribution
/// with a new result.
///
/// For every non-bye participant the delta is (new contribution) minus
/// (contribution of the round's previously recorded result, if any). Byes
/// contribute no points. Applying the returned deltas to the running totals
/// makes them consistent with "this round contributed exactly the new
/// result's points".
pub fn reconcile_points(round: &Round, new_result: &RoundResult) -> Vec<(PlayerId, f64)> {
    let mut deltas: HashMap<PlayerId, f64> = HashMap::new();

    for entry in &new_result.pairs {
        let Some(black) = &entry.black else {
            continue;
        };
        *deltas.entry(entry.white.clone()).or_default() += entry.white_points;
        *deltas.entry(black.clone()).or_default() += entry.black_points;
    }

    if let Some(previous) = &round.result {
        for entry in &previous.pairs {
            let Some(black) = &entry.black else {
                continue;
            };
            *deltas.entry(entry.white.clone()).or_default() -= entry.white_points;
            *deltas.entry(black.clone()).or_default() -= entry.black_points;
        }
    }

    let mut out: Vec<(PlayerId, f64)> = deltas
        .into_iter()
        .filter(|(_, delta)| *delta != 0.0)
        .collect();
    out.sort_by(|a, b| a.0.cmp(&b.0));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EntityId;

    fn pid(s: &str) -> PlayerId {
        EntityId::from(s)
    }

    fn entry(white: &str, black: Option<&str>, wp: &str, bp: &str) -> ResultEntry {
        ResultEntry {
            white: pid(white),
            black: black.map(pid),
            white_points: wp.to_string(),
            black_points: bp.to_string(),
        }
    }

    fn round_with_pairs(pairs: Vec<Pair>) -> Round {
        Round::new(EntityId::from("t1"), 1, pairs)
    }

    #[test]
    fn test_parse_valid_entries() {
        let result = parse_result_entries(&[
            entry("a", Some("b"), "1", "0"),
            entry("c", Some("d"), "0.5", "0.5"),
        ])
        .unwrap();

        assert_eq!(result.pairs.len(), 2);
        assert_eq!(result.pairs[0].white_points, 1.0);
        assert_eq!(result.pairs[1].black_points, 0.5);
    }

    #[test]
    fn test_parse_rejects_non_numeric() {
        let err = parse_result_entries(&[
            entry("a", Some("b"), "1", "0"),
            entry("c", Some("d"), "half", "0.5"),
        ])
        .unwrap_err();
        assert!(matches!(err, EngineError::InvalidPointValue { .. }));
    }

    #[test]
    fn test_parse_trims_whitespace() {
        let result = parse_result_entries(&[entry("a", Some("b"), " 1 ", "0")]).unwrap();
        assert_eq!(result.pairs[0].white_points, 1.0);
    }

    #[test]
    fn test_membership_accepts_reordered_result() {
        let round = round_with_pairs(vec![
            Pair::new(pid("a"), pid("b")),
            Pair::new(pid("c"), pid("d")),
        ]);
        let result = parse_result_entries(&[
            entry("c", Some("d"), "0.5", "0.5"),
            entry("a", Some("b"), "1", "0"),
        ])
        .unwrap();

        assert!(validate_result_membership(&round, &result).is_ok());
    }

    #[test]
    fn test_membership_rejects_wrong_pairing() {
        let round = round_with_pairs(vec![Pair::new(pid("a"), pid("b"))]);
        let result = parse_result_entries(&[entry("a", Some("c"), "1", "0")]).unwrap();

        let err = validate_result_membership(&round, &result).unwrap_err();
        assert!(matches!(err, EngineError::PairingMismatch));
    }

    #[test]
    fn test_membership_rejects_missing_entry() {
        let round = round_with_pairs(vec![
            Pair::new(pid("a"), pid("b")),
            Pair::bye(pid("c")),
        ]);
        let result = parse_result_entries(&[entry("a", Some("b"), "1", "0")]).unwrap();

        assert!(validate_result_membership(&round, &result).is_err());
    }

    #[test]
    fn test_membership_rejects_duplicate_entry() {
        let round = round_with_pairs(vec![
            Pair::new(pid("a"), pid("b")),
            Pair::new(pid("c"), pid("d")),
        ]);
        let result = parse_result_entries(&[
            entry("a", Some("b"), "1", "0"),
            entry("a", Some("b"), "0", "1"),
        ])
        .unwrap();

        assert!(validate_result_membership(&round, &result).is_err());
    }

    #[test]
    fn test_first_save_adds_full_contribution() {
        let round = round_with_pairs(vec![
            Pair::new(pid("a"), pid("b")),
            Pair::new(pid("c"), pid("d")),
        ]);
        let result = parse_result_entries(&[
            entry("a", Some("b"), "1", "0"),
            entry("c", Some("d"), "0.5", "0.5"),
        ])
        .unwrap();

        let deltas = reconcile_points(&round, &result);
        assert_eq!(
            deltas,
            vec![(pid("a"), 1.0), (pid("c"), 0.5), (pid("d"), 0.5)]
        );
    }

    #[test]
    fn test_identical_resave_is_noop() {
        let mut round = round_with_pairs(vec![Pair::new(pid("a"), pid("b"))]);
        let result = parse_result_entries(&[entry("a", Some("b"), "1", "0")]).unwrap();

        round.result = Some(result.clone());
        let deltas = reconcile_points(&round, &result);
        assert!(deltas.is_empty());
    }

    #[test]
    fn test_corrected_resave_applies_difference_only() {
        let mut round = round_with_pairs(vec![Pair::new(pid("a"), pid("b"))]);
        let first = parse_result_entries(&[entry("a", Some("b"), "1", "0")]).unwrap();
        round.result = Some(first);

        // Correction: it was actually a draw.
        let second = parse_result_entries(&[entry("a", Some("b"), "0.5", "0.5")]).unwrap();
        let deltas = reconcile_points(&round, &second);

        assert_eq!(deltas, vec![(pid("a"), -0.5), (pid("b"), 0.5)]);
    }

    #[test]
    fn test_byes_contribute_no_points() {
        let round = round_with_pairs(vec![
            Pair::new(pid("a"), pid("b")),
            Pair::bye(pid("c")),
        ]);
        let result = parse_result_entries(&[
            entry("a", Some("b"), "0", "1"),
            entry("c", None, "0", "0"),
        ])
        .unwrap();

        let deltas = reconcile_points(&round, &result);
        assert_eq!(deltas, vec![(pid("b"), 1.0)]);
    }
}
