//! SAT oracle abstraction: something that takes a CNF formula and returns a verdict.
//!
//! Two implementations are provided. [`ExternalOracle`] shells out to a configured solver binary
//! and is what the CLI binaries use by default. [`BruteForceOracle`] is a small self-contained
//! DPLL solver kept in-tree so the crate's own tests don't depend on an external binary being on
//! `PATH`.

use crate::clauses::Clause;
use crate::dimacs::{self, SolverOutcome};
use crate::error::OracleError;
use std::collections::{BTreeSet, HashMap};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

#[cfg(feature = "logging")]
use log::debug;

/// Something that can decide satisfiability of a CNF formula and, if satisfiable, produce a
/// model.
pub trait SatOracle {
    fn solve(&self, num_vars: u32, clauses: &BTreeSet<Clause>) -> Result<SolverOutcome, OracleError>;
}

/// Invokes an external SAT solver as a subprocess: writes DIMACS CNF to its stdin, reads its
/// DIMACS-style SAT/UNSAT verdict from stdout.
///
/// The solver is expected to follow the common convention of printing `SAT`/`UNSAT` (optionally
/// prefixed with `s `) and, on SAT, a line of signed literals terminated by `0` (optionally
/// prefixed with `v `).
pub struct ExternalOracle {
    solver_path: PathBuf,
}

impl ExternalOracle {
    pub fn new<P: Into<PathBuf>>(solver_path: P) -> Self {
        ExternalOracle {
            solver_path: solver_path.into(),
        }
    }

    fn solver(&self) -> &Path {
        &self.solver_path
    }
}

impl SatOracle for ExternalOracle {
    fn solve(&self, num_vars: u32, clauses: &BTreeSet<Clause>) -> Result<SolverOutcome, OracleError> {
        let mut child = Command::new(self.solver())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .spawn()
            .map_err(|source| OracleError::Spawn {
                solver: self.solver().to_path_buf(),
                source,
            })?;

        {
            let stdin = child.stdin.as_mut().expect("stdin was piped");
            let mut cnf = Vec::new();
            dimacs::write_cnf(&mut cnf, num_vars, clauses)?;
            stdin.write_all(&cnf)?;
        }

        let output = child.wait_with_output()?;
        #[cfg(feature = "logging")]
        debug!("external solver exited with status {:?}", output.status);
        let text = String::from_utf8_lossy(&output.stdout);
        Ok(dimacs::parse_sat_output(&text)?)
    }
}

/// A textbook recursive DPLL solver: unit propagation, pure-literal elimination, then branch on
/// the first undecided variable. Adequate for the small instances exercised by this crate's own
/// tests; not meant to compete with a real solver on anything large.
#[derive(Debug, Default)]
pub struct BruteForceOracle;

impl BruteForceOracle {
    pub fn new() -> Self {
        BruteForceOracle
    }
}

type Assignment = Vec<Option<bool>>;

impl SatOracle for BruteForceOracle {
    fn solve(&self, num_vars: u32, clauses: &BTreeSet<Clause>) -> Result<SolverOutcome, OracleError> {
        let formula: Vec<Vec<i64>> = clauses.iter().map(|c| c.to_vec()).collect();
        let assignment = vec![None; num_vars as usize + 1];
        match dpll(&formula, assignment) {
            Some(assignment) => {
                let lits = assignment
                    .into_iter()
                    .enumerate()
                    .skip(1)
                    .map(|(var, value)| match value {
                        Some(true) => var as i64,
                        _ => -(var as i64),
                    })
                    .collect();
                Ok(SolverOutcome::Sat(lits))
            }
            None => Ok(SolverOutcome::Unsat),
        }
    }
}

fn clause_status(clause: &[i64], assignment: &Assignment) -> Option<bool> {
    let mut any_unassigned = false;
    for &lit in clause {
        let var = lit.unsigned_abs() as usize;
        match assignment[var] {
            None => any_unassigned = true,
            Some(v) if (lit > 0) == v => return Some(true),
            Some(_) => {}
        }
    }
    if any_unassigned {
        None
    } else {
        Some(false)
    }
}

fn unit_propagate(formula: &[Vec<i64>], assignment: &mut Assignment) -> bool {
    let mut progressed = false;
    for clause in formula {
        match clause_status(clause, assignment) {
            Some(false) => return false,
            Some(true) => continue,
            None => {
                let unassigned: Vec<i64> = clause
                    .iter()
                    .copied()
                    .filter(|&lit| assignment[lit.unsigned_abs() as usize].is_none())
                    .collect();
                if unassigned.len() == 1 {
                    let lit = unassigned[0];
                    assignment[lit.unsigned_abs() as usize] = Some(lit > 0);
                    progressed = true;
                }
            }
        }
    }
    true
}

/// Assigns every variable that appears with only one polarity across all not-yet-satisfied
/// clauses: such a variable can always be set to make those clauses true without risking a
/// future conflict, so it never needs to be branched on.
fn pure_literal_assign(formula: &[Vec<i64>], assignment: &mut Assignment) -> bool {
    let mut polarity: HashMap<usize, Option<bool>> = HashMap::new();
    for clause in formula {
        if clause_status(clause, assignment) == Some(true) {
            continue;
        }
        for &lit in clause {
            let var = lit.unsigned_abs() as usize;
            if assignment[var].is_some() {
                continue;
            }
            let sign = lit > 0;
            polarity
                .entry(var)
                .and_modify(|seen| {
                    if *seen != Some(sign) {
                        *seen = None;
                    }
                })
                .or_insert(Some(sign));
        }
    }

    let mut progressed = false;
    for (var, sign) in polarity {
        if let Some(sign) = sign {
            assignment[var] = Some(sign);
            progressed = true;
        }
    }
    progressed
}

/// Propagates units and eliminates pure literals until neither makes progress.
fn simplify(formula: &[Vec<i64>], mut assignment: Assignment) -> Option<Assignment> {
    loop {
        if !unit_propagate(formula, &mut assignment) {
            return None;
        }
        if !pure_literal_assign(formula, &mut assignment) {
            return Some(assignment);
        }
    }
}

fn dpll(formula: &[Vec<i64>], assignment: Assignment) -> Option<Assignment> {
    let assignment = simplify(formula, assignment)?;

    let mut satisfied = true;
    let mut branch_var = None;
    for clause in formula {
        match clause_status(clause, &assignment) {
            Some(false) => return None,
            Some(true) => continue,
            None => {
                satisfied = false;
                if branch_var.is_none() {
                    branch_var = clause
                        .iter()
                        .map(|&lit| lit.unsigned_abs() as usize)
                        .find(|&var| assignment[var].is_none());
                }
            }
        }
    }
    if satisfied {
        return Some(assignment);
    }
    let var = branch_var?;

    let mut try_true = assignment.clone();
    try_true[var] = Some(true);
    if let Some(result) = dpll(formula, try_true) {
        return Some(result);
    }

    let mut try_false = assignment;
    try_false[var] = Some(false);
    dpll(formula, try_false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use smallvec::smallvec;

    fn clauses(lits: Vec<Vec<i64>>) -> BTreeSet<Clause> {
        lits.into_iter()
            .map(|c| {
                let mut v: Clause = smallvec![];
                v.extend(c);
                v
            })
            .collect()
    }

    #[test]
    fn solves_a_trivially_satisfiable_formula() {
        let cs = clauses(vec![vec![1, 2], vec![-1]]);
        let outcome = BruteForceOracle::new().solve(2, &cs).unwrap();
        match outcome {
            SolverOutcome::Sat(lits) => {
                assert!(lits.contains(&-1));
                assert!(lits.contains(&2));
            }
            SolverOutcome::Unsat => panic!("expected SAT"),
        }
    }

    #[test]
    fn detects_unsat() {
        let cs = clauses(vec![vec![1], vec![-1]]);
        let outcome = BruteForceOracle::new().solve(1, &cs).unwrap();
        assert_eq!(outcome, SolverOutcome::Unsat);
    }

    #[test]
    fn solves_an_encoded_instance() {
        use crate::direction::Cell;
        use crate::encoder::encode;
        use crate::spec::Spec;

        let spec = Spec::new(1, 2, 1, 0, vec![Cell::new(0, 0)], vec![Cell::new(1, 0)], vec![]).unwrap();
        let (num_vars, cs) = encode(&spec).unwrap();
        let outcome = BruteForceOracle::new().solve(num_vars, &cs).unwrap();
        assert!(matches!(outcome, SolverOutcome::Sat(_)));
    }
}
