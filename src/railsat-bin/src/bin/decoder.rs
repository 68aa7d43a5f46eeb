//! `decoder <basename>`: reads `<basename>.city` and `<basename>.satoutput`, writes
//! `<basename>.metromap`.

use anyhow::{Context, Result};
use clap::{App, Arg};
use railsat::{city, decoder, dimacs, metromap, SolverOutcome};
use std::fs::File;
use std::path::PathBuf;

fn main() {
    #[cfg(feature = "logging")]
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("decoder: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let matches = App::new("decoder")
        .about("Decodes a SAT oracle verdict back into per-line metro paths")
        .arg(
            Arg::with_name("basename")
                .help("instance basename, e.g. 'grid7' for 'grid7.city'/'grid7.satoutput'")
                .required(true),
        )
        .get_matches();

    let basename = matches.value_of("basename").expect("required arg");
    let basename = basename.trim_end_matches(".city");

    let city_path = PathBuf::from(format!("{}.city", basename));
    let spec = city::parse_city_file(&city_path)
        .with_context(|| format!("parsing {}", city_path.display()))?;

    let satoutput_path = PathBuf::from(format!("{}.satoutput", basename));
    let raw = std::fs::read_to_string(&satoutput_path)
        .with_context(|| format!("reading {}", satoutput_path.display()))?;
    let outcome = dimacs::parse_sat_output(&raw).context("parsing oracle output")?;

    let out_path = PathBuf::from(format!("{}.metromap", basename));
    let mut out = File::create(&out_path).with_context(|| format!("creating {}", out_path.display()))?;

    match outcome {
        SolverOutcome::Unsat => {
            metromap::write_metromap(&mut out, None)
                .with_context(|| format!("writing {}", out_path.display()))?;
            println!("wrote {} (UNSAT)", out_path.display());
        }
        SolverOutcome::Sat(assignment) => {
            let paths = decoder::decode_model(&spec, &assignment).context("decoding model")?;
            metromap::write_metromap(&mut out, Some(&paths))
                .with_context(|| format!("writing {}", out_path.display()))?;
            println!("wrote {} ({} lines)", out_path.display(), paths.len());
        }
    }

    Ok(())
}
