//! Error kinds, one per component boundary.
//!
//! The core never recovers silently: every error surfaces to the CLI. `EncodingError` and
//! `DecodeError` indicate a bug in this crate rather than bad input, and are documented as such.

use thiserror::Error;

/// A malformed `.city` file, or a structurally valid one that fails a cross-field validation
/// rule (duplicate or overlapping start/end cells, out-of-bounds coordinates).
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("failed reading city file {path:?}: {source}")]
    Io {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("city file contains only whitespace")]
    Blank,
    #[error("first non-empty line must be '1' or '2' (scenario); got {0:?}")]
    BadScenario(String),
    #[error("missing grid parameter line (N M K J [P])")]
    MissingParams,
    #[error("scenario {scenario} expects {expected} integers on the parameter line, got {got}")]
    WrongParamCount {
        scenario: u8,
        expected: usize,
        got: usize,
    },
    #[error("non-integer token {token:?} in parameter line")]
    BadInt { token: String },
    #[error("invalid numeric values in header (N,M must be > 0; K,J,P must be >= 0)")]
    InvalidHeader,
    #[error("expected {k} metro lines but file ended early")]
    TooFewLines { k: usize },
    #[error("metro line {index}: expected 4 integers (sx sy ex ey), got {got}")]
    BadLineTokenCount { index: usize, got: usize },
    #[error("metro line {index} coordinates out of bounds: ({sx},{sy}) -> ({ex},{ey})")]
    OutOfBounds {
        index: usize,
        sx: i64,
        sy: i64,
        ex: i64,
        ey: i64,
    },
    #[error("scenario 2: missing line with popular cells")]
    MissingPopularLine,
    #[error("scenario 2: expected {expected} tokens for {p} popular cells, got {got}")]
    WrongPopularTokenCount { expected: usize, p: usize, got: usize },
    #[error("popular cell {index} out of bounds: ({x},{y})")]
    PopularOutOfBounds { index: usize, x: i64, y: i64 },
    #[error("duplicate start locations in city file")]
    DuplicateStarts,
    #[error("duplicate end locations in city file")]
    DuplicateEnds,
    #[error("some start equals some end location (all starts & ends must be unique)")]
    StartEqualsEnd,
}

/// An internal consistency violation while building variables. Should never fire; if it does,
/// it's a bug in the encoder, not in the caller's input.
#[derive(Debug, Error)]
pub enum EncodingError {
    #[error("variable space exhausted requesting id for {what}")]
    VarSpaceExhausted { what: &'static str },
    #[error("clause builder invariant violated: {0}")]
    Invariant(&'static str),
}

/// Oracle output that isn't a well-formed SAT/UNSAT verdict.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("empty SAT oracle output")]
    Empty,
    #[error("oracle output is neither SAT nor UNSAT: first line was {0:?}")]
    BadStatusLine(String),
    #[error("non-integer token {token:?} in oracle assignment line")]
    BadInt { token: String },
}

/// A model that satisfies the CNF should always decode to a well-formed walk; if it doesn't, the
/// encoding was unsound. Treated as fatal with full diagnostic, never silently patched over.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("line {line}: no outbound direction at non-end cell {cell}")]
    Stuck { line: usize, cell: String },
    #[error("line {line}: walk exceeded {limit} steps without reaching its end cell (cycle in model?)")]
    Diverged { line: usize, limit: usize },
}

/// Failure to invoke or read from the external SAT oracle. Kept distinct from
/// [`ModelError`], which is about the *content* of oracle output rather than the act of obtaining
/// it.
#[derive(Debug, Error)]
pub enum OracleError {
    #[error("failed to spawn SAT solver {solver:?}: {source}")]
    Spawn {
        solver: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("I/O error talking to SAT solver: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Model(#[from] ModelError),
}
