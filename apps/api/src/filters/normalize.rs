use super::{FilterMap, ADVANCED_TITLE_FILTER, DESCRIPTION_FILTER, LOCATION_FILTER, TITLE_FILTER};

/// Alternate names the front-end uses for canonical filter keys.
const RENAMES: &[(&str, &str)] = &[
    ("title", TITLE_FILTER),
    ("advancedTitle", ADVANCED_TITLE_FILTER),
    ("description", DESCRIPTION_FILTER),
    ("location", LOCATION_FILTER),
];

fn canonical_key(key: &str) -> &str {
    RENAMES
        .iter()
        .find(|(alias, _)| *alias == key)
        .map(|(_, canonical)| *canonical)
        .unwrap_or(key)
}

/// Maps alias keys onto the canonical vocabulary; other keys pass through.
///
/// When both an alias and its canonical key are present, the alias value
/// wins: aliases are applied after the pass-through keys.
pub fn normalize_keys(filters: FilterMap) -> FilterMap {
    let (aliased, plain): (Vec<_>, Vec<_>) = filters
        .into_iter()
        .partition(|(k, _)| canonical_key(k) != k.as_str());

    let mut out: FilterMap = plain.into_iter().collect();
    for (key, value) in aliased {
        out.insert(canonical_key(&key).to_string(), value);
    }
    out
}
