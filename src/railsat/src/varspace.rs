//! Variable ID assignment.
//!
//! Primary and occupancy IDs are computed by a direct index formula — no hash lookups on the hot
//! path the encoder walks once per cell. Auxiliary (turn-counter) IDs are requested on demand in
//! an order that depends on `J`, so those go through [`railsat_term_allocator::AuxAllocator`]
//! instead; that allocator is still only ever touched once per auxiliary variable, never per
//! clause.

use crate::direction::Direction;
use railsat_term_allocator::AuxAllocator;

/// Debug tag attached to an auxiliary sequential-counter variable: `(line, position, threshold)`.
pub type AuxTag = (usize, usize, usize);

/// Assigns integer IDs to every Boolean variable the encoder will use.
///
/// The mapping is totally determined by `(n, m, k)` and a fixed iteration order: k-major, then
/// y-major, then x, then direction in `[L, R, U, D]` order for primaries; row-major `(y, x)` per
/// line for occupancies, immediately after the primary block. Keeping that order fixed rather than
/// hashed means a primary or occupancy ID can be reversed back to its `(k, x, y, d)` or `(k, x, y)`
/// tuple by pure arithmetic, via [`VarSpace::decode_primary`].
#[derive(Debug)]
pub struct VarSpace {
    n: i64,
    m: i64,
    k: usize,
    aux: AuxAllocator<AuxTag>,
}

impl VarSpace {
    pub fn new(n: i64, m: i64, k: usize) -> Self {
        let cells_per_line = (n * m) as u64;
        let num_primary = cells_per_line * 4 * k as u64;
        let num_occ = cells_per_line * k as u64;
        let first_aux = num_primary + num_occ + 1;
        assert!(
            first_aux <= u32::MAX as u64,
            "variable space too large for a 32-bit DIMACS id"
        );
        VarSpace {
            n,
            m,
            k,
            aux: AuxAllocator::new(first_aux as u32),
        }
    }

    fn dir_index(&self, k: usize, x: i64, y: i64, d: Direction) -> u64 {
        debug_assert!(k < self.k);
        debug_assert!(x >= 0 && x < self.n && y >= 0 && y < self.m);
        let d_idx = Direction::ALL.iter().position(|&dd| dd == d).unwrap() as u64;
        let cells_per_line = (self.n * self.m) as u64;
        (k as u64 * cells_per_line + (y * self.n + x) as u64) * 4 + d_idx
    }

    /// `dir(k,x,y,d)`: 1-based ID of the direction variable.
    pub fn dir(&self, k: usize, x: i64, y: i64, d: Direction) -> u32 {
        (self.dir_index(k, x, y, d) + 1) as u32
    }

    fn num_primary(&self) -> u64 {
        (self.n * self.m) as u64 * 4 * self.k as u64
    }

    /// `occ(k,x,y)`: 1-based ID of the occupancy variable, placed right after the primary block.
    pub fn occ(&self, k: usize, x: i64, y: i64) -> u32 {
        debug_assert!(k < self.k);
        debug_assert!(x >= 0 && x < self.n && y >= 0 && y < self.m);
        let cells_per_line = (self.n * self.m) as u64;
        let idx = k as u64 * cells_per_line + (y * self.n + x) as u64;
        (self.num_primary() + idx + 1) as u32
    }

    /// Allocate the next auxiliary variable, tagging it `(line, position, threshold)` for
    /// diagnostics.
    pub fn alloc_aux(&mut self, line: usize, position: usize, threshold: usize) -> u32 {
        self.aux.alloc((line, position, threshold))
    }

    /// Total number of variables allocated so far (primaries + occupancies + auxiliaries).
    pub fn count(&self) -> u32 {
        self.aux.next_id() - 1
    }

    /// Reverse-map a positive primary-variable ID back to `(k, x, y, d)`. Returns `None` if `id`
    /// falls outside the primary block (an occupancy or auxiliary ID, or out of range).
    pub fn decode_primary(&self, id: u32) -> Option<(usize, i64, i64, Direction)> {
        let num_primary = self.num_primary();
        let idx = id.checked_sub(1)? as u64;
        if idx >= num_primary {
            return None;
        }
        let d_idx = (idx % 4) as usize;
        let rest = idx / 4;
        let cells_per_line = (self.n * self.m) as u64;
        let k = (rest / cells_per_line) as usize;
        let cell_idx = (rest % cells_per_line) as i64;
        let x = cell_idx % self.n;
        let y = cell_idx / self.n;
        Some((k, x, y, Direction::ALL[d_idx]))
    }
}
