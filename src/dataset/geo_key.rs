use std::sync::Arc;

use serde_json::Value;

/// State FIPS prefix for county-only codes in the geometry source.
pub(crate) const STATE_PREFIX: &str = "47";

/// Width of a canonical county FIPS key.
const KEY_WIDTH: usize = 5;

/// Stable join key for a county: the five-digit zero-padded FIPS code.
/// Keep the original text (with leading zeros) but avoid repeated owned Strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GeoKey(Arc<str>);

impl GeoKey {
    /// Build a key from raw text, left-padding with zeros to the canonical
    /// width. Empty input stays empty, meaning "unjoinable".
    pub fn new(raw: &str) -> Self {
        if raw.is_empty() {
            return Self::empty();
        }
        if raw.len() >= KEY_WIDTH {
            return GeoKey(Arc::from(raw));
        }
        let mut padded = String::with_capacity(KEY_WIDTH);
        for _ in raw.len()..KEY_WIDTH {
            padded.push('0');
        }
        padded.push_str(raw);
        GeoKey(Arc::from(padded.as_str()))
    }

    pub fn empty() -> Self {
        GeoKey(Arc::from(""))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for GeoKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Resolve a canonical key from a geometry's properties bag.
///
/// Geometry sources disagree on how they encode the county identifier, so
/// this tries a fixed priority order, each later rule a fallback only:
/// 1. `GEOID`: full state+county FIPS, padded.
/// 2. `COUNTYFP`: county-only code, prefixed with [`STATE_PREFIX`].
/// 3. `COUNTY`: alternate county-only field name, same treatment.
/// 4. The feature-level `id`, padded.
///
/// Returns an empty key when nothing matches; callers must treat that as
/// unjoinable (neutral map fill), never an error.
pub fn resolve_geo_key(properties: &serde_json::Map<String, Value>, feature_id: Option<&Value>) -> GeoKey {
    if let Some(code) = properties.get("GEOID").and_then(value_as_code) {
        return GeoKey::new(&code);
    }
    if let Some(code) = properties.get("COUNTYFP").and_then(value_as_code) {
        return county_code_key(&code);
    }
    if let Some(code) = properties.get("COUNTY").and_then(value_as_code) {
        return county_code_key(&code);
    }
    if let Some(code) = feature_id.and_then(value_as_code) {
        return GeoKey::new(&code);
    }
    GeoKey::empty()
}

/// County-only code: pad to three digits, then prepend the state prefix.
fn county_code_key(code: &str) -> GeoKey {
    GeoKey::new(&format!("{STATE_PREFIX}{code:0>3}"))
}

/// Identifier values arrive as strings or numbers depending on the source.
fn value_as_code(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_owned())
        }
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Some(i.to_string())
            } else {
                Some(n.to_string())
            }
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{Map, Value, json};

    use super::{GeoKey, resolve_geo_key};

    fn props(pairs: &[(&str, Value)]) -> Map<String, Value> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.clone())).collect()
    }

    #[test]
    fn pads_short_keys_to_five_digits() {
        assert_eq!(GeoKey::new("1001").as_str(), "01001");
        assert_eq!(GeoKey::new("47001").as_str(), "47001");
        assert_eq!(GeoKey::new("").as_str(), "");
    }

    #[test]
    fn geoid_wins_over_county_code() {
        let p = props(&[("GEOID", json!("47001")), ("COUNTYFP", json!("099"))]);
        assert_eq!(resolve_geo_key(&p, None).as_str(), "47001");
    }

    #[test]
    fn county_code_gets_state_prefix() {
        let p = props(&[("COUNTYFP", json!("37"))]);
        assert_eq!(resolve_geo_key(&p, None).as_str(), "47037");

        let p = props(&[("COUNTY", json!(1))]);
        assert_eq!(resolve_geo_key(&p, None).as_str(), "47001");
    }

    #[test]
    fn numeric_geoid_is_repadded() {
        let p = props(&[("GEOID", json!(1001))]);
        assert_eq!(resolve_geo_key(&p, None).as_str(), "01001");
    }

    #[test]
    fn feature_id_is_last_resort() {
        let p = props(&[("COUNTY", json!("003"))]);
        assert_eq!(resolve_geo_key(&p, Some(&json!("47999"))).as_str(), "47003");

        let p = props(&[]);
        assert_eq!(resolve_geo_key(&p, Some(&json!("47999"))).as_str(), "47999");
    }

    #[test]
    fn unmatched_properties_yield_empty_key() {
        let p = props(&[("NAME", json!("Anderson"))]);
        let key = resolve_geo_key(&p, None);
        assert!(key.is_empty());
    }
}
