//! CNF encoder/decoder for non-overlapping metro rail layouts on a grid.
//!
//! A [`spec::Spec`] describes the grid, the lines to route, and the turn budget. [`encoder::encode`]
//! turns it into a CNF formula; an [`oracle::SatOracle`] decides satisfiability; and
//! [`decoder::decode_model`] walks a satisfying model back into one direction sequence per line.

pub mod city;
pub mod clauses;
pub mod decoder;
pub mod dimacs;
pub mod direction;
pub mod encoder;
pub mod error;
pub mod metromap;
pub mod oracle;
pub mod spec;
pub mod varspace;

pub use city::{parse_city, parse_city_file};
pub use clauses::{Clause, ClauseBuilder, Lit};
pub use decoder::{count_turns, decode_model, verify_turn_accounting};
pub use dimacs::{parse_sat_output, write_cnf, SolverOutcome};
pub use direction::{Cell, Direction};
pub use encoder::encode;
pub use error::{DecodeError, EncodingError, ModelError, OracleError, ParseError};
pub use metromap::{format_metromap, write_metromap};
pub use oracle::{BruteForceOracle, ExternalOracle, SatOracle};
pub use spec::Spec;
pub use varspace::VarSpace;
