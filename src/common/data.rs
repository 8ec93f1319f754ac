use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use polars::{
    frame::DataFrame,
    io::SerReader,
    prelude::{CsvReader, DataType},
};

use crate::dataset::{CountyEntity, GeoKey};

/// Reads a CSV file from `path` into a Polars DataFrame.
pub(crate) fn read_from_csv(path: &Path) -> Result<DataFrame> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open CSV: {}", path.display()))?;
    let df = CsvReader::new(file).finish()?;
    Ok(df)
}

/// Converts a county DataFrame into typed entities, failing fast on any
/// missing column or non-numeric cell.
///
/// Expected columns: `fips`, `county`, `depression_aa`, `depression_crude`,
/// `total_population`, `adult_population`, `median_income`, `poverty_rate`,
/// `bachelors_pct`.
pub(crate) fn entities_from_frame(df: &DataFrame) -> Result<Vec<CountyEntity>> {
    let keys = key_column(df, "fips")?;
    let names = string_column(df, "county")?;
    let depression_aa = numeric_column(df, "depression_aa")?;
    let depression_crude = numeric_column(df, "depression_crude")?;
    let total_population = numeric_column(df, "total_population")?;
    let adult_population = numeric_column(df, "adult_population")?;
    let median_income = numeric_column(df, "median_income")?;
    let poverty_rate = numeric_column(df, "poverty_rate")?;
    let bachelors_pct = numeric_column(df, "bachelors_pct")?;

    let entities = (0..df.height())
        .map(|row| CountyEntity {
            key: keys[row].clone(),
            name: names[row].clone().into(),
            depression_age_adjusted: depression_aa[row],
            depression_crude: depression_crude[row],
            total_population: total_population[row],
            adult_population: adult_population[row],
            median_income: median_income[row],
            poverty_rate: poverty_rate[row],
            bachelors_pct: bachelors_pct[row],
            needs_index: None,
        })
        .collect();

    Ok(entities)
}

/// Extract a column as f64 values, casting from whatever numeric type the
/// CSV reader inferred.
fn numeric_column(df: &DataFrame, name: &str) -> Result<Vec<f64>> {
    let column = df.column(name)
        .with_context(|| format!("missing column {name:?}"))?;

    let column = if column.dtype() != &DataType::Float64 {
        column.cast(&DataType::Float64)
            .with_context(|| format!("column {name:?} is not numeric"))?
    } else {
        column.clone()
    };

    let values = column.f64()
        .with_context(|| format!("column {name:?} is not numeric"))?;

    values.into_iter().enumerate()
        .map(|(row, v)| v.ok_or_else(|| anyhow!("column {name:?}, row {row}: missing value")))
        .collect()
}

fn string_column(df: &DataFrame, name: &str) -> Result<Vec<String>> {
    let column = df.column(name)
        .with_context(|| format!("missing column {name:?}"))?;

    let column = if column.dtype() != &DataType::String {
        column.cast(&DataType::String)
            .with_context(|| format!("column {name:?} is not text"))?
    } else {
        column.clone()
    };

    let values = column.str()
        .with_context(|| format!("column {name:?} is not text"))?;

    values.into_iter().enumerate()
        .map(|(row, v)| {
            v.map(str::to_owned)
                .ok_or_else(|| anyhow!("column {name:?}, row {row}: missing value"))
        })
        .collect()
}

/// The join key column, normalized to the canonical zero-padded form.
/// A CSV reader may infer a FIPS column as integers (dropping leading
/// zeros), so padding happens here rather than trusting the raw text.
fn key_column(df: &DataFrame, name: &str) -> Result<Vec<GeoKey>> {
    Ok(string_column(df, name)?
        .into_iter()
        .map(|raw| GeoKey::new(raw.trim()))
        .collect())
}
