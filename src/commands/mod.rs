pub mod render;
pub mod score;

use anyhow::{Result, bail};

use crate::needs::Weights;

/// Parse a `--weights` value: four comma-separated non-negative numbers in
/// income,education,depression,poverty order.
pub(crate) fn parse_weights(raw: &str) -> Result<Weights> {
    let parts: Vec<&str> = raw.split(',').map(str::trim).collect();
    if parts.len() != 4 {
        bail!("expected 4 comma-separated weights (income,education,depression,poverty), got {}", parts.len());
    }

    let mut values = [0.0f64; 4];
    for (i, part) in parts.iter().enumerate() {
        let value: f64 = part.parse()
            .map_err(|_| anyhow::anyhow!("weight {:?} is not a number", part))?;
        if value < 0.0 {
            bail!("weight {value} is negative");
        }
        values[i] = value;
    }

    Ok(Weights {
        income: values[0],
        education: values[1],
        depression: values[2],
        poverty: values[3],
    })
}
