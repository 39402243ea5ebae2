use std::collections::BTreeSet;

/// Split a comma-delimited ingredient text into trimmed, non-empty names.
pub fn split_ingredients(text: &str) -> impl Iterator<Item = &str> {
    text.split(',').map(str::trim).filter(|s| !s.is_empty())
}

/// Merge the ingredient texts of the planned recipes into one sorted list.
///
/// Deduplication is exact and case-sensitive: "Tomato" and "tomato" are two
/// different items. Callers pass each distinct recipe's text once.
pub fn derive_shopping_list<'a, I>(texts: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    texts
        .into_iter()
        .flat_map(split_ingredients)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(String::from)
        .collect()
}
