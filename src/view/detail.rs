use serde::Serialize;

use crate::common::group_thousands;
use crate::dataset::CountyEntity;

/// One labeled line of the detail panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetailField {
    pub label: &'static str,
    pub value: String,
}

/// What the detail surface shows for the current single selection.
/// A pure projection of one entity; never touches shared state.
/// Serializable so hosts can ship it to a text surface as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetailRecord {
    pub title: String,
    pub fields: Vec<DetailField>,
}

impl DetailRecord {
    pub fn is_placeholder(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Project an entity into the fixed, ordered field list; `None` yields the
/// placeholder record.
pub fn present(entity: Option<&CountyEntity>) -> DetailRecord {
    let Some(entity) = entity else {
        return DetailRecord {
            title: "No county selected".into(),
            fields: Vec::new(),
        };
    };

    let field = |label, value| DetailField { label, value };
    let needs = match entity.needs_index {
        Some(score) => format!("{score:.2}/10"),
        None => "N/A".into(),
    };

    DetailRecord {
        title: entity.name.to_string(),
        fields: vec![
            field("Needs index", needs),
            field("Depression rate (age-adjusted)", format!("{:.1}%", entity.depression_age_adjusted)),
            field("Depression rate (crude)", format!("{:.1}%", entity.depression_crude)),
            field("Total population", group_thousands(entity.total_population)),
            field("Adults 18+", group_thousands(entity.adult_population)),
            field("Median household income", format!("${}", group_thousands(entity.median_income))),
            field("Poverty rate", format!("{:.1}%", entity.poverty_rate)),
            field("Bachelor's or higher", format!("{:.1}%", entity.bachelors_pct)),
        ],
    }
}
