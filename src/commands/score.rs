use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result, bail};
use polars::{frame::DataFrame, io::SerWriter, prelude::{Column, CsvWriter}};

use crate::cli::{Cli, ScoreArgs};
use crate::common;
use crate::needs::{Weights, compute_needs_index};

pub fn run(cli: &Cli, args: &ScoreArgs) -> Result<()> {
    // Assert output path is not stdout
    if args.output == Path::new("-") {
        bail!("stdout is not supported.");
    }
    if args.output.exists() && !args.force {
        bail!("{} already exists (use --force to overwrite)", args.output.display());
    }

    let weights = match &args.weights {
        Some(raw) => super::parse_weights(raw)?,
        None => Weights::EQUAL,
    };

    if cli.verbose > 0 {
        eprintln!("[score] data={} weights={weights:?}", args.data.display());
    }

    let frame = common::read_from_csv(&args.data)?;
    let mut entities = common::entities_from_frame(&frame)?;
    compute_needs_index(&mut entities, &weights);

    // Rank highest need first.
    entities.sort_by(|a, b| b.needs_index.partial_cmp(&a.needs_index).unwrap_or(std::cmp::Ordering::Equal));

    let keys: Vec<String> = entities.iter().map(|e| e.key.as_str().to_owned()).collect();
    let names: Vec<String> = entities.iter().map(|e| e.name.to_string()).collect();
    let scores: Vec<f64> = entities.iter().map(|e| e.needs_index.unwrap_or(0.0)).collect();

    let mut df = DataFrame::new(vec![
        Column::new("fips".into(), keys),
        Column::new("county".into(), names),
        Column::new("needs_index".into(), scores),
    ])?;

    let file = File::create(&args.output)
        .with_context(|| format!("Failed to create {}", args.output.display()))?;
    CsvWriter::new(file).finish(&mut df)?;

    println!("Wrote {} county scores -> {}", df.height(), args.output.display());
    Ok(())
}
