use super::{pagination_default, FilterMap, ProviderQuery, ADVANCED_TITLE_FILTER, TITLE_OR_DELIMITER};

/// Turns a loosely-typed filter map into a provider-safe query.
///
/// - keys outside `allowed` are dropped
/// - empty strings are dropped
/// - booleans become `"true"` / `"false"`, everything else its string form
/// - pagination keys must be non-negative integers, else their default
/// - multi-word `advanced_title_filter` terms are single-quoted
///
/// Never fails: bad input degrades to defaults.
pub fn sanitize(filters: &FilterMap, allowed: &[&str]) -> ProviderQuery {
    let mut clean = ProviderQuery::new();

    for (key, value) in filters {
        if !allowed.contains(&key.as_str()) || value.is_blank() {
            continue;
        }
        let rendered = match pagination_default(key) {
            Some(default) => value
                .as_int()
                .filter(|n| *n >= 0)
                .unwrap_or(default)
                .to_string(),
            None => value.to_string(),
        };
        clean.insert(key.clone(), rendered);
    }

    if let Some(raw) = clean.get(ADVANCED_TITLE_FILTER) {
        let quoted = quote_title_terms(raw);
        if quoted.is_empty() {
            clean.remove(ADVANCED_TITLE_FILTER);
        } else {
            clean.insert(ADVANCED_TITLE_FILTER.to_string(), quoted);
        }
    }

    clean
}

/// Splits on the OR operator, trims each term and wraps unquoted multi-word
/// terms in single quotes so the upstream search treats them as phrases.
pub fn quote_title_terms(raw: &str) -> String {
    raw.split(TITLE_OR_DELIMITER)
        .map(str::trim)
        .filter(|term| !term.is_empty())
        .map(|term| {
            let already_quoted = term.starts_with('\'') || term.starts_with('"');
            if term.contains(' ') && !already_quoted {
                format!("'{term}'")
            } else {
                term.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(TITLE_OR_DELIMITER)
}
