//! Walks a satisfying model back to per-line direction sequences.

use crate::direction::{Cell, Direction};
use crate::error::DecodeError;
use crate::spec::Spec;
use crate::varspace::VarSpace;
use std::collections::HashMap;

/// Decode a SAT model into one direction sequence per metro line.
///
/// `raw_assignment` is the full signed literal list the oracle returned (sign-negative tokens and
/// a trailing `0` terminator are both harmless here — only positive primary-variable literals are
/// consulted; occupancy and auxiliary IDs are silently skipped since they carry no path
/// information).
///
/// Returns one entry per line, in line order. A `DecodeError` here means the model satisfied the
/// CNF but does not correspond to a well-formed walk — that indicates an unsound encoding, not a
/// bad input, and is always a bug.
pub fn decode_model(spec: &Spec, raw_assignment: &[i64]) -> Result<Vec<Vec<Direction>>, DecodeError> {
    let vs = VarSpace::new(spec.n, spec.m, spec.k);

    let mut cell_dir: Vec<HashMap<Cell, Direction>> = vec![HashMap::new(); spec.k];
    for &lit in raw_assignment {
        if lit <= 0 {
            continue;
        }
        if let Some((k, x, y, d)) = vs.decode_primary(lit as u32) {
            cell_dir[k].insert(Cell::new(x, y), d);
        }
    }

    let mut all_paths = Vec::with_capacity(spec.k);
    // A sound model cannot produce a path longer than every cell visited once.
    let step_limit = (spec.n * spec.m) as usize + 1;

    for k in 0..spec.k {
        let start = spec.starts[k];
        let end = spec.ends[k];
        let mut current = start;
        let mut directions = Vec::new();

        loop {
            if current == end {
                break;
            }
            match cell_dir[k].get(&current) {
                Some(&d) => {
                    directions.push(d);
                    current = current.step(d);
                }
                None => {
                    return Err(DecodeError::Stuck {
                        line: k,
                        cell: current.to_string(),
                    })
                }
            }
            if directions.len() > step_limit {
                return Err(DecodeError::Diverged {
                    line: k,
                    limit: step_limit,
                });
            }
        }

        all_paths.push(directions);
    }

    Ok(all_paths)
}

/// Count direction changes between consecutive steps of a decoded path. This is the turn count the
/// encoder's `J` budget actually enforces, independent of the `occ` occupancy variables the
/// encoder uses to account for it.
pub fn count_turns(path: &[Direction]) -> usize {
    path.windows(2).filter(|w| w[0] != w[1]).count()
}

/// Cross-check the turn-budget bookkeeping: under a satisfying model, a cell is marked
/// `occ(k,x,y)` exactly when the path arrives at it from one direction and departs in a different
/// one. Not part of the encoder itself — a diagnostic used by tests and by the `metroplan` demo
/// binary to catch an unsound turn-counter wiring early.
pub fn verify_turn_accounting(spec: &Spec, raw_assignment: &[i64]) -> Result<(), DecodeError> {
    let vs = VarSpace::new(spec.n, spec.m, spec.k);

    let mut occ_true: Vec<std::collections::HashSet<Cell>> = vec![Default::default(); spec.k];
    let mut cell_dir: Vec<HashMap<Cell, Direction>> = vec![HashMap::new(); spec.k];
    for &lit in raw_assignment {
        if lit <= 0 {
            continue;
        }
        let id = lit as u32;
        if let Some((k, x, y, d)) = vs.decode_primary(id) {
            cell_dir[k].insert(Cell::new(x, y), d);
            continue;
        }
        for k in 0..spec.k {
            for y in 0..spec.m {
                for x in 0..spec.n {
                    if vs.occ(k, x, y) == id {
                        occ_true[k].insert(Cell::new(x, y));
                    }
                }
            }
        }
    }

    let paths = decode_model(spec, raw_assignment)?;
    for (k, path) in paths.iter().enumerate() {
        let mut current = spec.starts[k];
        let mut arrival: Option<Direction> = None;
        for &departure in path {
            if let Some(prev) = arrival {
                let is_turn = prev != departure;
                let marked = occ_true[k].contains(&current);
                if is_turn != marked {
                    return Err(DecodeError::Stuck {
                        line: k,
                        cell: format!("{} (turn-accounting mismatch)", current),
                    });
                }
            }
            current = current.step(departure);
            arrival = Some(departure);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::varspace::VarSpace;

    #[test]
    fn decodes_a_hand_built_straight_path() {
        let spec = Spec::new(
            1,
            4,
            4,
            1,
            vec![Cell::new(0, 0)],
            vec![Cell::new(3, 0)],
            vec![],
        )
        .unwrap();
        let vs = VarSpace::new(spec.n, spec.m, spec.k);
        let assignment: Vec<i64> = vec![
            vs.dir(0, 0, 0, Direction::R) as i64,
            vs.dir(0, 1, 0, Direction::R) as i64,
            vs.dir(0, 2, 0, Direction::R) as i64,
        ];
        let paths = decode_model(&spec, &assignment).unwrap();
        assert_eq!(paths.len(), 1);
        assert_eq!(paths[0], vec![Direction::R, Direction::R, Direction::R]);
    }

    #[test]
    fn stuck_path_is_an_error() {
        let spec = Spec::new(
            1,
            4,
            4,
            1,
            vec![Cell::new(0, 0)],
            vec![Cell::new(3, 3)],
            vec![],
        )
        .unwrap();
        // No direction variables at all: the walk is stuck immediately at the start cell.
        let err = decode_model(&spec, &[]).unwrap_err();
        assert!(matches!(err, DecodeError::Stuck { line: 0, .. }));
    }

    #[test]
    fn turn_counting_counts_direction_changes() {
        let path = vec![Direction::R, Direction::R, Direction::D, Direction::D, Direction::L];
        assert_eq!(count_turns(&path), 2);
    }

    #[test]
    fn ignores_negative_and_zero_tokens() {
        let spec = Spec::new(
            1,
            2,
            1,
            0,
            vec![Cell::new(0, 0)],
            vec![Cell::new(1, 0)],
            vec![],
        )
        .unwrap();
        let vs = VarSpace::new(spec.n, spec.m, spec.k);
        let r = vs.dir(0, 0, 0, Direction::R) as i64;
        let assignment = vec![0, -r, r];
        let paths = decode_model(&spec, &assignment).unwrap();
        assert_eq!(paths[0], vec![Direction::R]);
    }

    #[test]
    fn turn_accounting_matches_an_honestly_encoded_turn() {
        use crate::encoder::encode;
        use crate::oracle::{BruteForceOracle, SatOracle};
        use crate::dimacs::SolverOutcome;

        let spec = Spec::new(
            1,
            4,
            4,
            2,
            vec![Cell::new(0, 0)],
            vec![Cell::new(3, 3)],
            vec![],
        )
        .unwrap();
        let (num_vars, clauses) = encode(&spec).unwrap();
        let outcome = BruteForceOracle::new().solve(num_vars, &clauses).unwrap();
        let assignment = match outcome {
            SolverOutcome::Sat(a) => a,
            SolverOutcome::Unsat => panic!("expected SAT"),
        };
        verify_turn_accounting(&spec, &assignment).unwrap();
    }
}
