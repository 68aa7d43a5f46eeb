//! Translates a [`Spec`] into a CNF formula.
//!
//! The emission order below is fixed on purpose: given the same `Spec`, two runs of [`encode`]
//! produce the same `(num_vars, clauses)` pair, because `ClauseBuilder` canonicalizes and stores
//! clauses in a `BTreeSet`.

use crate::clauses::{Clause, ClauseBuilder};
use crate::direction::{Cell, Direction};
use crate::error::EncodingError;
use crate::spec::Spec;
use crate::varspace::VarSpace;
use std::collections::BTreeSet;

#[cfg(feature = "logging")]
use log::debug;

/// Encode `spec` into a CNF formula. Returns the number of variables and the (deduplicated,
/// canonically ordered) clause set.
///
/// `EncodingError` is reserved for internal consistency violations that should never occur for a
/// validated `Spec` — it exists so a release build fails closed instead of panicking if one ever
/// does.
pub fn encode(spec: &Spec) -> Result<(u32, BTreeSet<Clause>), EncodingError> {
    let mut vs = VarSpace::new(spec.n, spec.m, spec.k);
    let mut cb = ClauseBuilder::new();

    turn_budget(spec, &mut vs, &mut cb);
    #[cfg(feature = "logging")]
    debug!("turn budget clauses added: {} total", cb.len());

    one_direction_per_cell(spec, &mut vs, &mut cb);
    #[cfg(feature = "logging")]
    debug!("at-most-one-direction clauses added: {} total", cb.len());

    boundary_exclusions(spec, &vs, &mut cb);
    #[cfg(feature = "logging")]
    debug!("boundary clauses added: {} total", cb.len());

    endpoints(spec, &vs, &mut cb);
    #[cfg(feature = "logging")]
    debug!("endpoint clauses added: {} total", cb.len());

    continuation(spec, &vs, &mut cb);
    #[cfg(feature = "logging")]
    debug!("continuation clauses added: {} total", cb.len());

    other_lines_avoid_end(spec, &vs, &mut cb);
    #[cfg(feature = "logging")]
    debug!("cross-line end-avoidance clauses added: {} total", cb.len());

    global_non_overlap(spec, &vs, &mut cb);
    #[cfg(feature = "logging")]
    debug!("global non-overlap clauses added: {} total", cb.len());

    if spec.scenario == 2 {
        popular_cells(spec, &vs, &mut cb);
        #[cfg(feature = "logging")]
        debug!("popular-cell clauses added: {} total", cb.len());
    }

    let num_vars = vs.count();
    for clause in cb.iter() {
        for &l in clause.iter() {
            let v = l.unsigned_abs();
            if v == 0 || v > num_vars as u64 {
                return Err(EncodingError::Invariant(
                    "clause literal references an unallocated variable id",
                ));
            }
        }
    }

    Ok((num_vars, cb.into_clauses()))
}

/// At-most-`(J-1)` occupied cells per line: the turn budget is enforced indirectly, via the
/// `occ` occupancy variables `continuation` marks at genuine direction changes, rather than
/// counting turns directly.
fn turn_budget(spec: &Spec, vs: &mut VarSpace, cb: &mut ClauseBuilder) {
    for k in 0..spec.k {
        let occ_list = occ_row_major(spec, vs, k);
        cb.at_most_k_minus_one_seq(&occ_list, spec.j, vs, k);
    }
}

fn occ_row_major(spec: &Spec, vs: &VarSpace, k: usize) -> Vec<u32> {
    let mut out = Vec::with_capacity((spec.n * spec.m) as usize);
    for y in 0..spec.m {
        for x in 0..spec.n {
            out.push(vs.occ(k, x, y));
        }
    }
    out
}

/// At most one outbound direction per cell per line: a cell can't be part of the same line's
/// path in two directions at once.
fn one_direction_per_cell(spec: &Spec, vs: &VarSpace, cb: &mut ClauseBuilder) {
    for k in 0..spec.k {
        for y in 0..spec.m {
            for x in 0..spec.n {
                let vars: Vec<u32> = Direction::ALL.iter().map(|&d| vs.dir(k, x, y, d)).collect();
                cb.at_most_one(&vars);
            }
        }
    }
}

/// Forbid any direction that would step off the grid.
fn boundary_exclusions(spec: &Spec, vs: &VarSpace, cb: &mut ClauseBuilder) {
    for k in 0..spec.k {
        for y in 0..spec.m {
            for x in 0..spec.n {
                if x == 0 {
                    cb.add_unit(-(vs.dir(k, x, y, Direction::L) as i64));
                }
                if x == spec.n - 1 {
                    cb.add_unit(-(vs.dir(k, x, y, Direction::R) as i64));
                }
                if y == 0 {
                    cb.add_unit(-(vs.dir(k, x, y, Direction::U) as i64));
                }
                if y == spec.m - 1 {
                    cb.add_unit(-(vs.dir(k, x, y, Direction::D) as i64));
                }
            }
        }
    }
}

fn in_bounds_neighbors(spec: &Spec, cell: Cell) -> Vec<(Direction, Cell)> {
    Direction::ALL
        .iter()
        .filter_map(|&d| {
            let nb = cell.step(d);
            if nb.in_bounds(spec.n, spec.m) {
                Some((d, nb))
            } else {
                None
            }
        })
        .collect()
}

/// Fixes the shape of a line's path at its two endpoints: the end cell is a dead end that
/// contributes no turn occupancy, the start cell has exactly one outbound direction, the end cell
/// has exactly one incoming edge, and nothing points back into the start.
fn endpoints(spec: &Spec, vs: &VarSpace, cb: &mut ClauseBuilder) {
    for k in 0..spec.k {
        let start = spec.starts[k];
        let end = spec.ends[k];

        // The end cell is a dead end: no outbound direction, no turn occupancy.
        cb.add_unit(-(vs.occ(k, end.x, end.y) as i64));
        for d in Direction::ALL {
            cb.add_unit(-(vs.dir(k, end.x, end.y, d) as i64));
        }

        // The start cell has exactly one outbound direction, among in-bounds neighbors.
        cb.add_unit(-(vs.occ(k, start.x, start.y) as i64));
        let start_neighbors = in_bounds_neighbors(spec, start);
        let start_dirs: Vec<u32> = start_neighbors
            .iter()
            .map(|&(d, _)| vs.dir(k, start.x, start.y, d))
            .collect();
        cb.exactly_one(&start_dirs);

        // The end cell has exactly one incoming edge.
        let end_neighbors = in_bounds_neighbors(spec, end);
        let incoming: Vec<u32> = end_neighbors
            .iter()
            .map(|&(d, nb)| vs.dir(k, nb.x, nb.y, d.opposite()))
            .collect();
        cb.exactly_one(&incoming);

        // Neighbors of start must not point back at it.
        for &(d, nb) in &start_neighbors {
            cb.add_unit(-(vs.dir(k, nb.x, nb.y, d.opposite()) as i64));
        }
    }
}

/// Path continuation without backtracking, plus turn-occupancy marking and the per-cell
/// anti-fan-in clause. The anti-fan-in constraint is emitted once per cell rather than once per
/// outbound direction of the predecessor, since "at most one incoming edge" is a property of the
/// cell being entered, not of any one direction it could be entered from.
fn continuation(spec: &Spec, vs: &VarSpace, cb: &mut ClauseBuilder) {
    for k in 0..spec.k {
        let start = spec.starts[k];
        let end = spec.ends[k];

        for y in 0..spec.m {
            for x in 0..spec.n {
                let cell = Cell::new(x, y);
                if cell == end {
                    continue;
                }

                for d in Direction::ALL {
                    let nb = cell.step(d);
                    if !nb.in_bounds(spec.n, spec.m) {
                        continue;
                    }
                    if nb == start || nb == end {
                        continue;
                    }

                    let from_var = vs.dir(k, x, y, d) as i64;

                    // The neighbor must continue in some non-reversing direction.
                    let mut continue_clause: Vec<i64> = vec![-from_var];
                    continue_clause.extend(Direction::ALL.iter().filter_map(|&d2| {
                        if d2 == d.opposite() {
                            None
                        } else {
                            Some(vs.dir(k, nb.x, nb.y, d2) as i64)
                        }
                    }));
                    cb.add_clause(continue_clause);

                    // A genuine turn at the neighbor marks it as a turn-budget occupancy.
                    for d2 in Direction::ALL {
                        if d2 == d || d2 == d.opposite() {
                            continue;
                        }
                        cb.add_clause([
                            -from_var,
                            -(vs.dir(k, nb.x, nb.y, d2) as i64),
                            vs.occ(k, nb.x, nb.y) as i64,
                        ]);
                    }
                }

                // Anti-fan-in: at most one neighbor of this non-start, non-end cell points at
                // it, across all four incoming directions at once.
                if cell != start {
                    let back_pointers: Vec<u32> = in_bounds_neighbors(spec, cell)
                        .into_iter()
                        .map(|(d, nb)| vs.dir(k, nb.x, nb.y, d.opposite()))
                        .collect();
                    cb.at_most_one(&back_pointers);
                }
            }
        }
    }
}

/// Other lines don't touch line k's end cell or point into it. Redundant with the global
/// non-overlap pass below, but stated directly here too so a solver can propagate it without
/// first reasoning about disjointness across all lines at a cell.
fn other_lines_avoid_end(spec: &Spec, vs: &VarSpace, cb: &mut ClauseBuilder) {
    for k in 0..spec.k {
        let end = spec.ends[k];
        let neighbors = in_bounds_neighbors(spec, end);
        for k1 in 0..spec.k {
            if k1 == k {
                continue;
            }
            for d in Direction::ALL {
                cb.add_unit(-(vs.dir(k1, end.x, end.y, d) as i64));
            }
            for &(d, nb) in &neighbors {
                cb.add_unit(-(vs.dir(k1, nb.x, nb.y, d.opposite()) as i64));
            }
        }
    }
}

/// Edge-disjointness across all lines: at each cell, at most one (line, direction) pair may be
/// active, so no two lines ever share an outbound edge from the same cell.
fn global_non_overlap(spec: &Spec, vs: &VarSpace, cb: &mut ClauseBuilder) {
    for y in 0..spec.m {
        for x in 0..spec.n {
            let mut vars = Vec::with_capacity(spec.k * 4);
            for k in 0..spec.k {
                for d in Direction::ALL {
                    vars.push(vs.dir(k, x, y, d));
                }
            }
            cb.at_most_one(&vars);
        }
    }
}

/// Each popular cell is visited by exactly one line, in exactly one direction. Each cell gets its
/// own `exactly_one` group over its `(line, direction)` variables rather than one combined group
/// over every popular cell, since cells are independent: requiring exactly one true literal per
/// cell is not the same constraint as requiring exactly one true literal across the whole set.
fn popular_cells(spec: &Spec, vs: &VarSpace, cb: &mut ClauseBuilder) {
    for &p in &spec.popular {
        let mut vars = Vec::with_capacity(spec.k * 4);
        for k in 0..spec.k {
            for d in Direction::ALL {
                vars.push(vs.dir(k, p.x, p.y, d));
            }
        }
        cb.exactly_one(&vars);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::direction::Cell;

    fn simple_spec() -> Spec {
        Spec::new(
            1,
            4,
            4,
            1,
            vec![Cell::new(0, 0)],
            vec![Cell::new(3, 3)],
            vec![],
        )
        .unwrap()
    }

    #[test]
    fn variable_count_matches_formula() {
        let spec = simple_spec();
        let (num_vars, _) = encode(&spec).unwrap();
        let primary = 4 * spec.n * spec.m * spec.k as i64;
        let occ = spec.n * spec.m * spec.k as i64;
        assert!(num_vars as i64 >= primary + occ);
    }

    #[test]
    fn encoding_is_deterministic() {
        let spec = simple_spec();
        let (n1, c1) = encode(&spec).unwrap();
        let (n2, c2) = encode(&spec).unwrap();
        assert_eq!(n1, n2);
        assert_eq!(c1, c2);
    }

    #[test]
    fn k_zero_yields_no_clauses() {
        let spec = Spec::new(1, 3, 3, 0, vec![], vec![], vec![]).unwrap();
        let (_num_vars, clauses) = encode(&spec).unwrap();
        assert!(clauses.is_empty());
    }

    #[test]
    fn all_literals_reference_allocated_ids() {
        let spec = simple_spec();
        let (num_vars, clauses) = encode(&spec).unwrap();
        for clause in &clauses {
            for &l in clause {
                let v = l.unsigned_abs();
                assert!(v >= 1 && v <= num_vars as u64);
            }
        }
    }

    #[test]
    fn one_by_one_grid_has_only_turn_budget_trivial_and_endpoint_clauses() {
        // A 1x1 grid with K=0 is the degenerate case exercised elsewhere; here we check N=1 still
        // produces boundary clauses that forbid all four directions everywhere (every cell is a
        // boundary cell on a 1-wide strip).
        let spec = Spec::new(1, 1, 3, 0, vec![Cell::new(0, 0)], vec![Cell::new(0, 2)], vec![]).unwrap();
        let (_num_vars, clauses) = encode(&spec).unwrap();
        assert!(!clauses.is_empty());
    }
}
