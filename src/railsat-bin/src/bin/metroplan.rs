//! `metroplan <basename> [--solver PATH]`: encodes, solves, and decodes in one step.
//!
//! Not part of the `.city`/`.satinput`/`.satoutput`/`.metromap` file contract the `encoder` and
//! `decoder` binaries honor; a convenience demo path that chains them through an oracle.

use anyhow::{Context, Result};
use clap::{App, Arg};
use railsat::{city, decoder, encoder, metromap, BruteForceOracle, ExternalOracle, SatOracle, SolverOutcome};
use std::path::PathBuf;

fn main() {
    #[cfg(feature = "logging")]
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("metroplan: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let matches = App::new("metroplan")
        .about("Encodes, solves, and decodes a .city instance in one step")
        .arg(
            Arg::with_name("basename")
                .help("instance basename, e.g. 'grid7' for 'grid7.city'")
                .required(true),
        )
        .arg(
            Arg::with_name("solver")
                .long("solver")
                .takes_value(true)
                .help("path to an external SAT solver; defaults to the in-tree reference DPLL oracle"),
        )
        .get_matches();

    let basename = matches.value_of("basename").expect("required arg");
    let basename = basename.trim_end_matches(".city");

    let city_path = PathBuf::from(format!("{}.city", basename));
    let spec = city::parse_city_file(&city_path)
        .with_context(|| format!("parsing {}", city_path.display()))?;

    let (num_vars, clauses) = encoder::encode(&spec).context("encoding instance")?;

    let outcome = match matches.value_of("solver") {
        Some(path) => ExternalOracle::new(path).solve(num_vars, &clauses),
        None => BruteForceOracle::new().solve(num_vars, &clauses),
    }
    .context("running SAT oracle")?;

    match outcome {
        SolverOutcome::Unsat => {
            println!("{}", metromap::format_metromap(None));
        }
        SolverOutcome::Sat(assignment) => {
            let paths = decoder::decode_model(&spec, &assignment).context("decoding model")?;
            if let Err(e) = decoder::verify_turn_accounting(&spec, &assignment) {
                eprintln!("metroplan: warning: turn accounting mismatch: {}", e);
            }
            print!("{}", metromap::format_metromap(Some(&paths)));
        }
    }

    Ok(())
}
