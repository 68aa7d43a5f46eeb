//! `encoder <basename>`: reads `<basename>.city`, writes `<basename>.satinput`.

use anyhow::{Context, Result};
use clap::{App, Arg};
use railsat::{city, dimacs, encoder};
use std::fs::File;
use std::path::PathBuf;

fn main() {
    #[cfg(feature = "logging")]
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("encoder: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let matches = App::new("encoder")
        .about("Encodes a .city instance into DIMACS CNF")
        .arg(
            Arg::with_name("basename")
                .help("instance basename, e.g. 'grid7' for 'grid7.city'")
                .required(true),
        )
        .get_matches();

    let basename = matches.value_of("basename").expect("required arg");
    let basename = basename.trim_end_matches(".city");

    let city_path = PathBuf::from(format!("{}.city", basename));
    let spec = city::parse_city_file(&city_path)
        .with_context(|| format!("parsing {}", city_path.display()))?;

    let (num_vars, clauses) = encoder::encode(&spec).context("encoding instance")?;

    let out_path = PathBuf::from(format!("{}.satinput", basename));
    let mut out = File::create(&out_path).with_context(|| format!("creating {}", out_path.display()))?;
    dimacs::write_cnf(&mut out, num_vars, &clauses)
        .with_context(|| format!("writing {}", out_path.display()))?;

    println!("wrote {} ({} vars, {} clauses)", out_path.display(), num_vars, clauses.len());
    Ok(())
}
