use std::sync::Arc;

use super::geo_key::GeoKey;

/// One county: a tabular row joined (by key) to an optional map shape.
/// All raw attributes are immutable after load; only `needs_index` is
/// recomputed in place when the user applies new weights.
#[derive(Debug, Clone)]
pub struct CountyEntity {
    pub key: GeoKey,
    pub name: Arc<str>,
    pub depression_age_adjusted: f64,
    pub depression_crude: f64,
    pub total_population: f64,
    pub adult_population: f64,
    pub median_income: f64,
    pub poverty_rate: f64,
    pub bachelors_pct: f64,
    pub needs_index: Option<f64>,
}

/// The numeric attributes a view or color layer can be keyed to.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Variable {
    DepressionAgeAdjusted,
    DepressionCrude,
    TotalPopulation,
    AdultPopulation,
    MedianIncome,
    PovertyRate,
    BachelorsPct,
    NeedsIndex,
}

impl Variable {
    /// Axis / legend label.
    pub fn label(&self) -> &'static str {
        match self {
            Variable::DepressionAgeAdjusted => "Depression rate (age-adjusted, %)",
            Variable::DepressionCrude => "Depression rate (crude, %)",
            Variable::TotalPopulation => "Total population",
            Variable::AdultPopulation => "Adults 18+",
            Variable::MedianIncome => "Median household income ($)",
            Variable::PovertyRate => "Poverty rate (%)",
            Variable::BachelorsPct => "Bachelor's degree or higher (%)",
            Variable::NeedsIndex => "Needs index (0-10)",
        }
    }

    /// Short machine name, used in output file names.
    pub fn slug(&self) -> &'static str {
        match self {
            Variable::DepressionAgeAdjusted => "depression",
            Variable::DepressionCrude => "depression_crude",
            Variable::TotalPopulation => "population",
            Variable::AdultPopulation => "adults",
            Variable::MedianIncome => "income",
            Variable::PovertyRate => "poverty",
            Variable::BachelorsPct => "education",
            Variable::NeedsIndex => "needs",
        }
    }
}

impl CountyEntity {
    /// Attribute lookup by variable. `NeedsIndex` is `None` until computed.
    pub fn value(&self, variable: Variable) -> Option<f64> {
        Some(match variable {
            Variable::DepressionAgeAdjusted => self.depression_age_adjusted,
            Variable::DepressionCrude => self.depression_crude,
            Variable::TotalPopulation => self.total_population,
            Variable::AdultPopulation => self.adult_population,
            Variable::MedianIncome => self.median_income,
            Variable::PovertyRate => self.poverty_rate,
            Variable::BachelorsPct => self.bachelors_pct,
            Variable::NeedsIndex => return self.needs_index,
        })
    }
}
