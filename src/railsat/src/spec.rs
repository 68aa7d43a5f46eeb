//! The immutable problem instance.

use crate::direction::Cell;
use crate::error::ParseError;
use std::collections::HashSet;

/// An immutable metro-layout problem instance.
///
/// Constructed only through [`Spec::new`], which enforces the instance's structural invariants:
/// starts and ends are each duplicate-free, and no cell is both a start and an end. Once built, a
/// `Spec` never changes — [`crate::varspace::VarSpace`] and [`crate::encoder::Encoder`] treat it
/// as a read-only key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Spec {
    pub scenario: u8,
    pub n: i64,
    pub m: i64,
    pub k: usize,
    pub j: usize,
    pub p: usize,
    pub starts: Vec<Cell>,
    pub ends: Vec<Cell>,
    pub popular: Vec<Cell>,
}

impl Spec {
    /// Build and validate a `Spec`: pairwise-distinct starts, pairwise-distinct ends, and `starts`
    /// disjoint from `ends`. Bounds-checking of individual
    /// cells is the caller's responsibility (the `.city` parser does it per-cell so it can report
    /// which line or popular cell is out of bounds).
    pub fn new(
        scenario: u8,
        n: i64,
        m: i64,
        j: usize,
        starts: Vec<Cell>,
        ends: Vec<Cell>,
        popular: Vec<Cell>,
    ) -> Result<Spec, ParseError> {
        let k = starts.len();
        assert_eq!(k, ends.len(), "starts/ends length mismatch is a caller bug");

        let start_set: HashSet<Cell> = starts.iter().copied().collect();
        if start_set.len() != starts.len() {
            return Err(ParseError::DuplicateStarts);
        }
        let end_set: HashSet<Cell> = ends.iter().copied().collect();
        if end_set.len() != ends.len() {
            return Err(ParseError::DuplicateEnds);
        }
        if start_set.intersection(&end_set).next().is_some() {
            return Err(ParseError::StartEqualsEnd);
        }

        let p = popular.len();
        Ok(Spec {
            scenario,
            n,
            m,
            k,
            j,
            p,
            starts,
            ends,
            popular,
        })
    }

    pub fn cell_in_bounds(&self, c: Cell) -> bool {
        c.in_bounds(self.n, self.m)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_duplicate_starts() {
        let err = Spec::new(
            1,
            4,
            4,
            1,
            vec![Cell::new(0, 0), Cell::new(0, 0)],
            vec![Cell::new(1, 1), Cell::new(2, 2)],
            vec![],
        )
        .unwrap_err();
        assert!(matches!(err, ParseError::DuplicateStarts));
    }

    #[test]
    fn rejects_start_equals_end() {
        let err = Spec::new(
            1,
            1,
            1,
            0,
            vec![Cell::new(0, 0)],
            vec![Cell::new(0, 0)],
            vec![],
        )
        .unwrap_err();
        assert!(matches!(err, ParseError::StartEqualsEnd));
    }

    #[test]
    fn accepts_a_well_formed_spec() {
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
        assert_eq!(spec.k, 1);
        assert_eq!(spec.p, 0);
    }
}
