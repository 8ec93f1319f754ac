use clap::{Args, Parser, Subcommand, ValueHint};
use std::path::PathBuf;

/// County mapping CLI (argument schema only)
#[derive(Parser, Debug)]
#[command(name = "countylens", version, about, propagate_version = true)]
pub struct Cli {
    /// Increase output verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Render the choropleth, scatterplots, and legend as SVG files
    Render(RenderArgs),

    /// Compute the needs index and write a ranked CSV
    Score(ScoreArgs),
}

#[derive(Args, Debug)]
pub struct RenderArgs {
    /// County data table (CSV)
    #[arg(value_hint = ValueHint::FilePath)]
    pub data: PathBuf,

    /// County boundaries (GeoJSON FeatureCollection)
    #[arg(value_hint = ValueHint::FilePath)]
    pub boundaries: PathBuf,

    /// Output directory for the SVG surfaces
    #[arg(short, long, value_hint = ValueHint::DirPath)]
    pub out: PathBuf,

    /// Color the map by the needs index computed under these weights,
    /// given as income,education,depression,poverty (e.g. 25,25,25,25)
    #[arg(long)]
    pub weights: Option<String>,
}

#[derive(Args, Debug)]
pub struct ScoreArgs {
    /// County data table (CSV)
    #[arg(value_hint = ValueHint::FilePath)]
    pub data: PathBuf,

    /// Output CSV file (must be a file path; "-" is rejected)
    #[arg(short, long, value_hint = ValueHint::FilePath)]
    pub output: PathBuf,

    /// Weights as income,education,depression,poverty (default 25,25,25,25)
    #[arg(long)]
    pub weights: Option<String>,

    /// Overwrite if the file exists
    #[arg(long)]
    pub force: bool,
}
