use std::io::Write;

use anyhow::Result;

use crate::common::SvgWriter;

use super::{color::ColorRamp, map_view::LegendSpec};

const WIDTH: f64 = 320.0;
const HEIGHT: f64 = 64.0;
const BAR_STEPS: usize = 24;

/// Emit the legend surface for the active color layer: a stepped gradient
/// bar with the domain endpoints and the layer title.
pub fn write_legend<W: Write>(out: W, ramp: &ColorRamp, spec: &LegendSpec) -> Result<()> {
    let mut writer = SvgWriter::new(out);
    writer.write_header(WIDTH, HEIGHT)?;
    writer.write_styles("    .legend-label { font: 11px sans-serif; fill: #374151; }")?;

    writeln!(writer, r#"<text class="legend-label" x="10" y="16">{}</text>"#, spec.title)?;

    let bar_x = 10.0;
    let bar_w = WIDTH - 20.0;
    let step_w = bar_w / BAR_STEPS as f64;
    for step in 0..BAR_STEPS {
        let t = (step as f64 + 0.5) / BAR_STEPS as f64;
        let value = ramp.min + t * (ramp.max - ramp.min);
        writeln!(
            writer,
            r#"<rect x="{:.2}" y="24" width="{:.2}" height="14" fill="{}"/>"#,
            bar_x + step as f64 * step_w,
            step_w + 0.5,
            ramp.color(value),
        )?;
    }

    writeln!(writer, r#"<text class="legend-label" x="10" y="54">{:.1}</text>"#, ramp.min)?;
    writeln!(
        writer,
        r#"<text class="legend-label" x="{}" y="54" text-anchor="end">{:.1}</text>"#,
        WIDTH - 10.0,
        ramp.max,
    )?;

    writer.write_footer()?;
    writer.flush()?;
    Ok(())
}
