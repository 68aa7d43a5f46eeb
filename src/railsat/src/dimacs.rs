//! DIMACS CNF writer and SAT-oracle output parser.
//!
//! Kept deliberately thin and separate from the encoder/decoder: this module knows nothing about
//! metro lines, only about the DIMACS text format.

use crate::clauses::Clause;
use crate::error::ModelError;
use std::collections::BTreeSet;
use std::io::{self, Write};

/// The verdict of a SAT oracle invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SolverOutcome {
    /// Satisfiable, with the full signed-literal assignment as reported by the oracle.
    Sat(Vec<i64>),
    Unsat,
}

/// Write `clauses` as a DIMACS CNF file: header `p cnf V C`, then one clause per line terminated
/// by a literal `0`.
pub fn write_cnf<W: Write>(w: &mut W, num_vars: u32, clauses: &BTreeSet<Clause>) -> io::Result<()> {
    writeln!(w, "p cnf {} {}", num_vars, clauses.len())?;
    for clause in clauses {
        for lit in clause {
            write!(w, "{} ", lit)?;
        }
        writeln!(w, "0")?;
    }
    Ok(())
}

/// Parse SAT-oracle output text: a `SAT`/`SATISFIABLE` line followed by a signed-literal
/// assignment, or a line beginning `UNSAT`. Both the status line and the assignment lines may
/// carry the `s `/`v ` prefixes minisat-family solvers print (`s SATISFIABLE`, `v 1 -2 0`).
pub fn parse_sat_output(text: &str) -> Result<SolverOutcome, ModelError> {
    let mut lines = text.lines().map(str::trim).filter(|l| !l.is_empty());
    let first = lines.next().ok_or(ModelError::Empty)?;
    let status = first.strip_prefix("s ").unwrap_or(first);

    if status.starts_with("UNSAT") {
        return Ok(SolverOutcome::Unsat);
    }
    if status.starts_with("SATISFIABLE") || status.starts_with("SAT") {
        let mut assignment = Vec::new();
        for line in lines {
            let line = line.strip_prefix("v ").unwrap_or(line);
            for tok in line.split_whitespace() {
                if tok == "v" {
                    continue;
                }
                let v: i64 = tok
                    .parse()
                    .map_err(|_| ModelError::BadInt { token: tok.to_string() })?;
                if v != 0 {
                    assignment.push(v);
                }
            }
        }
        return Ok(SolverOutcome::Sat(assignment));
    }
    Err(ModelError::BadStatusLine(first.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use smallvec::smallvec;

    #[test]
    fn writes_dimacs_header_and_clauses() {
        let mut clauses: BTreeSet<Clause> = BTreeSet::new();
        clauses.insert(smallvec![1, -2]);
        clauses.insert(smallvec![-1, 2, 3]);
        let mut buf = Vec::new();
        write_cnf(&mut buf, 3, &clauses).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next().unwrap(), "p cnf 3 2");
        assert_eq!(lines.count(), 2);
    }

    #[test]
    fn parses_unsat() {
        assert_eq!(parse_sat_output("UNSAT\n").unwrap(), SolverOutcome::Unsat);
    }

    #[test]
    fn parses_sat_with_assignment() {
        let out = parse_sat_output("SAT\n1 -2 3 0\n").unwrap();
        assert_eq!(out, SolverOutcome::Sat(vec![1, -2, 3]));
    }

    #[test]
    fn parses_minisat_style_s_v_prefixed_output() {
        let out = parse_sat_output("s SATISFIABLE\nv 1 -2 3 0\n").unwrap();
        assert_eq!(out, SolverOutcome::Sat(vec![1, -2, 3]));
    }

    #[test]
    fn parses_s_prefixed_unsat() {
        assert_eq!(parse_sat_output("s UNSATISFIABLE\n").unwrap(), SolverOutcome::Unsat);
    }

    #[test]
    fn rejects_garbage_status_line() {
        let err = parse_sat_output("MAYBE\n").unwrap_err();
        assert!(matches!(err, ModelError::BadStatusLine(_)));
    }

    #[test]
    fn rejects_non_integer_tokens() {
        let err = parse_sat_output("SAT\n1 two 3\n").unwrap_err();
        assert!(matches!(err, ModelError::BadInt { .. }));
    }

    #[test]
    fn rejects_empty_input() {
        let err = parse_sat_output("").unwrap_err();
        assert!(matches!(err, ModelError::Empty));
    }
}
