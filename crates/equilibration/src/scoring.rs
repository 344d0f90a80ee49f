//! Candidate scoring.

use crate::{Candidate, Histogram, SelectionError, DEFAULT_BINS};

/// Rescale energies so the lowest maps to 1 and the highest to 0.
///
/// Energies are shifted so the maximum becomes zero, leaving every value at
/// or below zero, then divided by the (negative) minimum.
pub fn normalize_energies(candidates: &[Candidate]) -> Result<Vec<f64>, SelectionError> {
    let max = candidates
        .iter()
        .map(|c| c.energy)
        .fold(f64::NEG_INFINITY, f64::max);
    let shifted: Vec<f64> = candidates.iter().map(|c| c.energy - max).collect();
    let min = shifted.iter().copied().fold(f64::INFINITY, f64::min);

    if min == 0.0 {
        return Err(SelectionError::DegenerateEnergy {
            energy: max,
            rows: candidates.len(),
        });
    }
    Ok(shifted.into_iter().map(|e| e / min).collect())
}

/// Replace each similarity by the frequency of its nearest histogram bin.
///
/// Candidates in densely sampled regions get weights near their share of the
/// population; isolated ones get weights near zero.
pub fn similarity_weights(candidates: &[Candidate]) -> Vec<f64> {
    let similarities: Vec<f64> = candidates.iter().map(|c| c.similarity).collect();
    let histogram = Histogram::new(&similarities, DEFAULT_BINS);
    let frequencies = histogram.frequencies();
    similarities
        .iter()
        .map(|&s| frequencies[histogram.nearest_bin(s)])
        .collect()
}

/// Index of the best candidate.
///
/// The score of a row is its normalized energy plus its similarity weight;
/// the first row with the highest score wins.
pub fn select_best(candidates: &[Candidate]) -> Result<usize, SelectionError> {
    if candidates.is_empty() {
        return Err(SelectionError::NoCandidates);
    }
    if let Some(row) = candidates
        .iter()
        .position(|c| !c.energy.is_finite() || !c.similarity.is_finite())
    {
        return Err(SelectionError::NonFiniteValue { row });
    }

    let energies = normalize_energies(candidates)?;
    let weights = similarity_weights(candidates);

    let mut best = 0;
    let mut best_score = f64::NEG_INFINITY;
    for (row, (energy, weight)) in energies.iter().zip(&weights).enumerate() {
        let score = energy + weight;
        if score > best_score {
            best = row;
            best_score = score;
        }
    }
    Ok(best)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-12
    }

    #[test]
    fn test_normalize_maps_lowest_to_one() {
        let candidates = [
            Candidate::new(-10.0, 0.0),
            Candidate::new(-20.0, 0.0),
            Candidate::new(-30.0, 0.0),
            Candidate::new(-15.0, 0.0),
        ];
        let energies = normalize_energies(&candidates).unwrap();
        let expected = [0.0, 0.5, 1.0, 0.25];
        for (e, x) in energies.iter().zip(expected) {
            assert!(close(*e, x), "{e} != {x}");
        }
    }

    #[test]
    fn test_normalize_handles_positive_energies() {
        let candidates = [Candidate::new(5.0, 0.0), Candidate::new(1.0, 0.0)];
        let energies = normalize_energies(&candidates).unwrap();
        assert!(close(energies[0], 0.0));
        assert!(close(energies[1], 1.0));
    }

    #[test]
    fn test_constant_energy_is_degenerate() {
        let candidates = [Candidate::new(-7.0, 0.1), Candidate::new(-7.0, 0.9)];
        let err = normalize_energies(&candidates).unwrap_err();
        assert!(matches!(
            err,
            SelectionError::DegenerateEnergy { energy, rows: 2 } if energy == -7.0
        ));
        assert!(matches!(
            select_best(&candidates),
            Err(SelectionError::DegenerateEnergy { .. })
        ));
    }

    #[test]
    fn test_similarity_weights_follow_population() {
        let candidates = [
            Candidate::new(0.0, 1.0),
            Candidate::new(0.0, 1.0),
            Candidate::new(0.0, 1.0),
            Candidate::new(0.0, 5.0),
        ];
        let weights = similarity_weights(&candidates);
        assert_eq!(weights, vec![0.75, 0.75, 0.75, 0.25]);
    }

    #[test]
    fn test_common_state_beats_rare_lower_energy() {
        // Row 0 has the lowest energy but sits alone; rows 1 and 2 tie on
        // score and the first one wins.
        let candidates = [
            Candidate::new(-20.0, 9.0),
            Candidate::new(-19.5, 1.0),
            Candidate::new(-19.5, 1.0),
            Candidate::new(-10.0, 1.0),
        ];
        assert_eq!(select_best(&candidates).unwrap(), 1);
    }

    #[test]
    fn test_rejects_empty_and_non_finite() {
        assert!(matches!(select_best(&[]), Err(SelectionError::NoCandidates)));
        let candidates = [Candidate::new(-1.0, 0.0), Candidate::new(f64::NAN, 0.0)];
        assert!(matches!(
            select_best(&candidates),
            Err(SelectionError::NonFiniteValue { row: 1 })
        ));
    }
}
