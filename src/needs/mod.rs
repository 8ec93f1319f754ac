//! Composite "needs index": min/max-normalized socioeconomic and health
//! variables combined under user weights into a 0-10 score per county.

use crate::dataset::CountyEntity;

/// Raw (un-normalized) weights for the four index variables. Any scale is
/// accepted; they are normalized to sum to 1 before combination.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Weights {
    pub income: f64,
    pub education: f64,
    pub depression: f64,
    pub poverty: f64,
}

impl Weights {
    pub const EQUAL: Weights = Weights { income: 25.0, education: 25.0, depression: 25.0, poverty: 25.0 };

    pub fn total(&self) -> f64 {
        self.income + self.education + self.depression + self.poverty
    }
}

impl Default for Weights {
    fn default() -> Self {
        Weights::EQUAL
    }
}

/// Weight inputs as surfaced by the host controls: a value plus an
/// inclusion checkbox per variable. An excluded variable contributes zero
/// weight regardless of its input value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightControls {
    pub income: f64,
    pub education: f64,
    pub depression: f64,
    pub poverty: f64,
    pub include_income: bool,
    pub include_education: bool,
    pub include_depression: bool,
    pub include_poverty: bool,
}

impl WeightControls {
    pub fn effective(&self) -> Weights {
        let gate = |on: bool, w: f64| if on { w } else { 0.0 };
        Weights {
            income: gate(self.include_income, self.income),
            education: gate(self.include_education, self.education),
            depression: gate(self.include_depression, self.depression),
            poverty: gate(self.include_poverty, self.poverty),
        }
    }
}

impl From<Weights> for WeightControls {
    fn from(w: Weights) -> Self {
        WeightControls {
            income: w.income,
            education: w.education,
            depression: w.depression,
            poverty: w.poverty,
            include_income: true,
            include_education: true,
            include_depression: true,
            include_poverty: true,
        }
    }
}

/// Recompute `needs_index` for every entity, in place.
///
/// Each variable is normalized to [0, 1] over the full entity set; income and
/// education are inverted (higher values mean less need). A variable with no
/// spread (min == max) contributes 0.5 for every entity. Weights are
/// normalized to sum to 1; an all-zero weight vector uses total 1, yielding a
/// defined all-zero index instead of NaN. The weighted sum is scaled by 10
/// and rounded to 2 decimals.
///
/// This is a full batch recomputation on every call, and idempotent for a
/// fixed weight vector.
pub fn compute_needs_index(entities: &mut [CountyEntity], weights: &Weights) {
    let income = normalized(entities, |e| e.median_income, true);
    let education = normalized(entities, |e| e.bachelors_pct, true);
    let depression = normalized(entities, |e| e.depression_age_adjusted, false);
    let poverty = normalized(entities, |e| e.poverty_rate, false);

    let total = match weights.total() {
        t if t == 0.0 => 1.0,
        t => t,
    };

    for (i, entity) in entities.iter_mut().enumerate() {
        let score = (weights.income / total) * income[i]
            + (weights.education / total) * education[i]
            + (weights.depression / total) * depression[i]
            + (weights.poverty / total) * poverty[i];
        entity.needs_index = Some(round2(score * 10.0));
    }
}

/// Drop every computed index, returning entities to the unscored state.
pub fn clear_needs_index(entities: &mut [CountyEntity]) {
    for entity in entities {
        entity.needs_index = None;
    }
}

/// Min/max normalize one variable across all entities, optionally inverting.
fn normalized(entities: &[CountyEntity], value: impl Fn(&CountyEntity) -> f64, invert: bool) -> Vec<f64> {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for entity in entities {
        let v = value(entity);
        min = min.min(v);
        max = max.max(v);
    }

    entities.iter()
        .map(|entity| {
            // No spread means no discriminative power: everyone gets 0.5.
            let t = if max > min {
                (value(entity) - min) / (max - min)
            } else {
                0.5
            };
            if invert { 1.0 - t } else { t }
        })
        .collect()
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}
