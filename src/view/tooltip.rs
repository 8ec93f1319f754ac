use serde::Serialize;

use crate::common::group_thousands;
use crate::dataset::CountyEntity;

/// Transient hover readout. Produced on pointer-enter, dropped on leave;
/// never persisted and never written to the selection store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tooltip {
    pub title: String,
    pub lines: Vec<String>,
}

pub fn tooltip_for(entity: &CountyEntity) -> Tooltip {
    Tooltip {
        title: entity.name.to_string(),
        lines: vec![
            format!("Depression (age-adjusted): {:.1}%", entity.depression_age_adjusted),
            format!("Median income: ${}", group_thousands(entity.median_income)),
            format!("Poverty: {:.1}%", entity.poverty_rate),
            format!("Bachelor's or higher: {:.1}%", entity.bachelors_pct),
        ],
    }
}
