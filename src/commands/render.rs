use std::fs::{self, File};
use std::io::BufWriter;

use anyhow::{Context, Result};

use crate::cli::{Cli, RenderArgs};
use crate::dataset::Variable;
use crate::session::{ControlAction, Session};
use crate::view::SCATTER_VARIABLES;

fn scatter_file_name(variable: Variable) -> String {
    format!("scatter_{}.svg", variable.slug())
}

pub fn run(cli: &Cli, args: &RenderArgs) -> Result<()> {
    if cli.verbose > 0 {
        eprintln!(
            "[render] data={} boundaries={} -> {}",
            args.data.display(),
            args.boundaries.display(),
            args.out.display(),
        );
    }

    let mut session = Session::load(&args.data, &args.boundaries)?;

    if let Some(raw) = &args.weights {
        let weights = super::parse_weights(raw)?;
        session.handle_control(ControlAction::ApplyWeights(weights.into()));
        if cli.verbose > 0 {
            eprintln!("[render] coloring by needs index, weights={raw}");
        }
    }

    fs::create_dir_all(&args.out)
        .with_context(|| format!("Failed to create {}", args.out.display()))?;

    let map_path = args.out.join("map.svg");
    session.write_map_svg(BufWriter::new(File::create(&map_path)?))?;

    for variable in SCATTER_VARIABLES {
        let path = args.out.join(scatter_file_name(variable));
        session.write_scatter_svg(variable, BufWriter::new(File::create(&path)?))?;
    }

    let legend_path = args.out.join("legend.svg");
    session.write_legend_svg(BufWriter::new(File::create(&legend_path)?))?;

    println!("Wrote 5 surfaces -> {}", args.out.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::scatter_file_name;
    use crate::view::SCATTER_VARIABLES;

    #[test]
    fn each_tracked_variable_gets_its_own_file() {
        let names: Vec<String> = SCATTER_VARIABLES.iter().map(|v| scatter_file_name(*v)).collect();
        assert_eq!(names, ["scatter_income.svg", "scatter_poverty.svg", "scatter_education.svg"]);
    }
}
